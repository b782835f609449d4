//! Call graph between declared functions.
//!
//! Call sites carry unresolved callee names; [`CallGraphBuilder`] links them to
//! declarations by exact name, either within the calling unit or across all
//! analyzed units.

pub mod builder;
mod graph_operations;
mod types;

pub use builder::{CallGraphBuild, CallGraphBuilder};
pub use types::{CallGraph, FunctionCall, FunctionId};
