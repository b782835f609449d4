//! Whole-program analysis passes that run after parsing and graph building.

pub mod dead_code;

pub use dead_code::{find_unused_variables, DeadCode, DeadCodeDetector};
