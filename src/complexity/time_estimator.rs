//! Heuristic Big-O labels from loop nesting and recursion.
//!
//! | loops            | recursive | label     |
//! |------------------|-----------|-----------|
//! | none             | no        | `O(1)`    |
//! | max depth 1      | no        | `O(n)`    |
//! | max depth d >= 2 | no        | `O(n^d)`  |
//! | none             | yes       | `O(2^n)`  |
//! | any              | yes       | `unknown` |
//!
//! Recursion without loops is assumed to branch, so it is labelled
//! exponential. This is an approximation and never a proven bound.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ComplexityLabel {
    Constant,
    Linear,
    Polynomial(u32),
    Exponential,
    Unknown,
}

impl ComplexityLabel {
    /// Label a function from its deepest loop nesting and recursion flag.
    ///
    /// `max_loop_depth` is `None` when the front-end could not report loop
    /// nesting; the estimator then declines to guess.
    pub fn estimate(max_loop_depth: Option<u32>, is_recursive: bool) -> Self {
        match (max_loop_depth, is_recursive) {
            (None, _) => ComplexityLabel::Unknown,
            (Some(0), false) => ComplexityLabel::Constant,
            (Some(1), false) => ComplexityLabel::Linear,
            (Some(depth), false) => ComplexityLabel::Polynomial(depth),
            (Some(0), true) => ComplexityLabel::Exponential,
            (Some(_), true) => ComplexityLabel::Unknown,
        }
    }
}

impl fmt::Display for ComplexityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComplexityLabel::Constant => write!(f, "O(1)"),
            ComplexityLabel::Linear => write!(f, "O(n)"),
            ComplexityLabel::Polynomial(depth) => write!(f, "O(n^{depth})"),
            ComplexityLabel::Exponential => write!(f, "O(2^n)"),
            ComplexityLabel::Unknown => write!(f, "unknown"),
        }
    }
}

impl FromStr for ComplexityLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "O(1)" => Ok(ComplexityLabel::Constant),
            "O(n)" => Ok(ComplexityLabel::Linear),
            "O(2^n)" => Ok(ComplexityLabel::Exponential),
            "unknown" => Ok(ComplexityLabel::Unknown),
            other => other
                .strip_prefix("O(n^")
                .and_then(|rest| rest.strip_suffix(')'))
                .and_then(|depth| depth.parse::<u32>().ok())
                .filter(|depth| *depth >= 2)
                .map(ComplexityLabel::Polynomial)
                .ok_or_else(|| format!("invalid complexity label: {other}")),
        }
    }
}

impl Serialize for ComplexityLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ComplexityLabel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
