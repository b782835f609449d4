pub mod analysis;

pub use analysis::analyze;
