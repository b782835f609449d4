use crate::core::{DecisionKind, FunctionDecl};

/// `1 + decision points`: every function has at least one path.
pub fn calculate_cyclomatic(decl: &FunctionDecl) -> u32 {
    1 + decl.decision_points.len() as u32
}

/// Decision points of one kind, for breakdowns in reports and tests.
pub fn count_decisions(decl: &FunctionDecl, kind: DecisionKind) -> usize {
    decl.decision_points
        .iter()
        .filter(|d| d.kind == kind)
        .count()
}

/// Cyclomatic complexity of a unit taken as one block: the sum over its
/// functions, and 1 for a unit without functions.
pub fn combine_cyclomatic(branches: impl IntoIterator<Item = u32>) -> u32 {
    branches.into_iter().sum::<u32>().max(1)
}
