//! Maintainability Index, radon/SEI variant.
//!
//! ```text
//! MI = max(0, min(100, (171 - 5.2 ln V - 0.23 G - 16.2 ln L
//!                       + 50 sin(sqrt(2.46 * rad(C)))) * 100 / 171))
//! ```
//!
//! V is the Halstead volume, G the cyclomatic complexity, L the source lines
//! of code and C the comment percentage. A block with no volume or no code
//! scores 100.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaintainabilityInputs {
    pub halstead_volume: f64,
    pub cyclomatic: u32,
    pub source_lines: usize,
    pub comment_lines: usize,
}

impl MaintainabilityInputs {
    /// Comment lines as a percentage of source lines.
    pub fn comment_percent(&self) -> f64 {
        if self.source_lines == 0 {
            0.0
        } else {
            self.comment_lines as f64 / self.source_lines as f64 * 100.0
        }
    }
}

/// Returns `None` when the computation does not produce a finite number.
pub fn maintainability_index(inputs: &MaintainabilityInputs) -> Option<f64> {
    if inputs.halstead_volume <= 0.0 || inputs.source_lines == 0 {
        return Some(100.0);
    }

    let volume_scale = inputs.halstead_volume.ln();
    let sloc_scale = (inputs.source_lines as f64).ln();
    let comments_scale = (2.46 * inputs.comment_percent().to_radians()).sqrt();

    let raw = 171.0 - 5.2 * volume_scale - 0.23 * f64::from(inputs.cyclomatic) - 16.2 * sloc_scale
        + 50.0 * comments_scale.sin();
    let scaled = raw * 100.0 / 171.0;

    scaled.is_finite().then(|| scaled.clamp(0.0, 100.0))
}
