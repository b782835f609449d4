//! Basic graph operations for adding and querying nodes and edges

use super::types::{CallGraph, FunctionCall, FunctionId};
use std::collections::{BTreeSet, VecDeque};

impl CallGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `other`, keeping this graph's edges first.
    pub fn merge(&mut self, other: CallGraph) {
        for id in other.functions {
            self.add_function(id);
        }
        for call in other.edges {
            self.add_call(call);
        }
    }

    pub fn add_function(&mut self, id: FunctionId) {
        self.functions.insert(id);
    }

    pub fn add_call(&mut self, call: FunctionCall) {
        let caller = call.caller.clone();
        let callee = call.callee.clone();

        self.functions.insert(caller.clone());
        self.functions.insert(callee.clone());
        self.edges.push_back(call);

        self.callee_index
            .entry(caller.clone())
            .or_default()
            .insert(callee.clone());

        self.caller_index.entry(callee).or_default().insert(caller);
    }

    pub fn add_call_parts(&mut self, caller: FunctionId, callee: FunctionId, line: usize) {
        self.add_call(FunctionCall {
            caller,
            callee,
            line,
        });
    }

    pub fn get_callees(&self, func_id: &FunctionId) -> Vec<FunctionId> {
        self.callee_index
            .get(func_id)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn get_callers(&self, func_id: &FunctionId) -> Vec<FunctionId> {
        self.caller_index
            .get(func_id)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn has_edge(&self, caller: &FunctionId, callee: &FunctionId) -> bool {
        self.callee_index
            .get(caller)
            .is_some_and(|set| set.contains(callee))
    }

    pub fn contains(&self, func_id: &FunctionId) -> bool {
        self.functions.contains(func_id)
    }

    /// All functions in the graph, in identity order.
    pub fn functions(&self) -> impl Iterator<Item = &FunctionId> {
        self.functions.iter()
    }

    pub fn edges(&self) -> impl Iterator<Item = &FunctionCall> {
        self.edges.iter()
    }

    pub fn node_count(&self) -> usize {
        self.functions.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Functions reachable from `roots` along call edges, roots included.
    pub fn reachable_from(
        &self,
        roots: impl IntoIterator<Item = FunctionId>,
    ) -> BTreeSet<FunctionId> {
        self.reachable_with(roots, |_| Vec::new())
    }

    /// Multi-source BFS that also follows `extra(node)` successors, for
    /// liveness links that are not call edges.
    pub fn reachable_with<F>(
        &self,
        roots: impl IntoIterator<Item = FunctionId>,
        mut extra: F,
    ) -> BTreeSet<FunctionId>
    where
        F: FnMut(&FunctionId) -> Vec<FunctionId>,
    {
        let mut visited = BTreeSet::new();
        let mut queue = VecDeque::new();

        for root in roots {
            if visited.insert(root.clone()) {
                queue.push_back(root);
            }
        }

        while let Some(current) = queue.pop_front() {
            let successors = self
                .get_callees(&current)
                .into_iter()
                .chain(extra(&current));
            for next in successors {
                if visited.insert(next.clone()) {
                    queue.push_back(next);
                }
            }
        }

        visited
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(name: &str) -> FunctionId {
        FunctionId::new("a.c", name, 1)
    }

    fn chain() -> CallGraph {
        let mut graph = CallGraph::new();
        graph.add_function(id("orphan"));
        graph.add_call_parts(id("main"), id("parse"), 3);
        graph.add_call_parts(id("parse"), id("lex"), 8);
        graph.add_call_parts(id("lex"), id("lex"), 12);
        graph
    }

    #[test]
    fn test_indexes_follow_edges() {
        let graph = chain();
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.get_callees(&id("main")), vec![id("parse")]);
        assert_eq!(graph.get_callers(&id("lex")), vec![id("lex"), id("parse")]);
        assert!(graph.has_edge(&id("lex"), &id("lex")));
        assert!(!graph.has_edge(&id("lex"), &id("main")));
    }

    #[test]
    fn test_reachable_from_roots() {
        let graph = chain();
        let reachable = graph.reachable_from([id("main")]);
        assert!(reachable.contains(&id("lex")));
        assert!(!reachable.contains(&id("orphan")));
        assert_eq!(reachable.len(), 3);
    }

    #[test]
    fn test_reachable_with_extra_links() {
        let graph = chain();
        let reachable = graph.reachable_with([id("lex")], |node| {
            if *node == id("lex") {
                vec![id("orphan")]
            } else {
                Vec::new()
            }
        });
        assert!(reachable.contains(&id("orphan")));
        assert!(!reachable.contains(&id("main")));
    }

    #[test]
    fn test_merge_keeps_both() {
        let mut left = CallGraph::new();
        left.add_call_parts(id("a"), id("b"), 1);
        let mut right = CallGraph::new();
        right.add_call_parts(FunctionId::new("b.c", "x", 2), FunctionId::new("b.c", "y", 5), 3);
        left.merge(right);
        assert_eq!(left.node_count(), 4);
        assert_eq!(left.edges().next().unwrap().caller, id("a"));
    }
}
