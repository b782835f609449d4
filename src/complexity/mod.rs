pub mod cyclomatic;
pub mod time_estimator;

pub use cyclomatic::calculate_cyclomatic;
pub use time_estimator::ComplexityLabel;

pub fn max_complexity(complexities: &[u32]) -> u32 {
    complexities.iter().copied().max().unwrap_or(0)
}

pub fn average_complexity(complexities: &[u32]) -> f64 {
    if complexities.is_empty() {
        return 0.0;
    }
    let sum: u32 = complexities.iter().sum();
    sum as f64 / complexities.len() as f64
}

/// Letter grade for a unit's average cyclomatic complexity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub enum EfficiencyGrade {
    A,
    B,
    C,
    D,
}

impl EfficiencyGrade {
    pub fn from_average(average: f64) -> Self {
        if average <= 5.0 {
            EfficiencyGrade::A
        } else if average <= 10.0 {
            EfficiencyGrade::B
        } else if average <= 15.0 {
            EfficiencyGrade::C
        } else {
            EfficiencyGrade::D
        }
    }
}

impl std::fmt::Display for EfficiencyGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let letter = match self {
            EfficiencyGrade::A => "A",
            EfficiencyGrade::B => "B",
            EfficiencyGrade::C => "C",
            EfficiencyGrade::D => "D",
        };
        write!(f, "{letter}")
    }
}
