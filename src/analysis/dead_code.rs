//! Reachability-based dead code detection.
//!
//! Functions are live when reachable over call edges from a root. Variables
//! are checked by a separate local pass that never consults the call graph.

use crate::call_graph::{CallGraphBuild, FunctionId};
use crate::config::AnalysisConfig;
use crate::core::{FunctionDecl, SourceUnit};
use crate::report::UnusedVariable;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeadCode {
    pub unused_functions: Vec<FunctionId>,
    pub unused_variables: Vec<UnusedVariable>,
}

pub struct DeadCodeDetector<'a> {
    units: &'a [SourceUnit],
    build: &'a CallGraphBuild,
    config: &'a AnalysisConfig,
}

impl<'a> DeadCodeDetector<'a> {
    pub fn new(
        units: &'a [SourceUnit],
        build: &'a CallGraphBuild,
        config: &'a AnalysisConfig,
    ) -> Self {
        Self {
            units,
            build,
            config,
        }
    }

    pub fn detect(&self) -> DeadCode {
        let _span = tracing::debug_span!("detect_dead_code").entered();
        DeadCode {
            unused_functions: self.unused_functions(),
            unused_variables: find_unused_variables(self.units),
        }
    }

    /// Reachability roots across all units.
    pub fn entry_points(&self) -> BTreeSet<FunctionId> {
        self.units
            .iter()
            .flat_map(|unit| self.unit_roots(unit))
            .collect()
    }

    /// Declared functions not reachable from any root, in declaration order.
    pub fn unused_functions(&self) -> Vec<FunctionId> {
        let reachable = self.build.graph.reachable_with(self.entry_points(), |node| {
            self.build
                .ambiguous
                .get(&Some(node.clone()))
                .map(|candidates| candidates.iter().cloned().collect())
                .unwrap_or_default()
        });

        self.units
            .iter()
            .flat_map(|unit| {
                unit.functions
                    .iter()
                    .map(|decl| FunctionId::of(&unit.path, decl))
            })
            .filter(|id| !reachable.contains(id))
            .collect()
    }

    fn unit_roots(&self, unit: &SourceUnit) -> Vec<FunctionId> {
        let in_unit = |id: &&FunctionId| id.file == unit.path;
        let mut roots: Vec<FunctionId> = unit
            .functions
            .iter()
            .filter(|decl| self.is_declared_root(decl))
            .map(|decl| FunctionId::of(&unit.path, decl))
            .collect();
        roots.extend(self.build.module_targets.iter().filter(in_unit).cloned());
        if let Some(candidates) = self.build.ambiguous.get(&None) {
            roots.extend(candidates.iter().filter(in_unit).cloned());
        }

        if roots.is_empty() && !unit.language.has_conventional_entry_point() {
            roots.extend(
                unit.functions
                    .iter()
                    .filter(|decl| decl.is_top_level)
                    .map(|decl| FunctionId::of(&unit.path, decl)),
            );
        }

        roots.extend(
            unit.functions
                .iter()
                .filter(|decl| is_implicitly_invoked(decl))
                .map(|decl| FunctionId::of(&unit.path, decl)),
        );
        roots
    }

    fn is_declared_root(&self, decl: &FunctionDecl) -> bool {
        self.config.entry_point_names.contains(&decl.name)
            || (self.config.exported_entry_points && decl.is_exported)
    }
}

/// Constructors and dunder methods run without a call site naming them.
fn is_implicitly_invoked(decl: &FunctionDecl) -> bool {
    let dunder = decl.name.len() > 4 && decl.name.starts_with("__") && decl.name.ends_with("__");
    let constructor = decl.owner.as_deref().is_some_and(|owner| {
        owner == decl.name || decl.name == "constructor"
    });
    dunder || constructor
}

/// Locals never referenced in their function, then module variables never
/// referenced anywhere in their unit.
pub fn find_unused_variables(units: &[SourceUnit]) -> Vec<UnusedVariable> {
    let mut unused = Vec::new();
    for unit in units {
        for decl in &unit.functions {
            unused.extend(
                decl.locals
                    .iter()
                    .filter(|local| !decl.references.contains(&local.name))
                    .map(|local| UnusedVariable {
                        unit: unit.path.clone(),
                        function: Some(decl.qualified_name()),
                        name: local.name.clone(),
                        line: local.line,
                    }),
            );
        }

        let referenced = |name: &str| {
            unit.module_references.contains(name)
                || unit.functions.iter().any(|f| f.references.contains(name))
        };
        unused.extend(
            unit.variables
                .iter()
                .filter(|var| !referenced(&var.name))
                .map(|var| UnusedVariable {
                    unit: unit.path.clone(),
                    function: None,
                    name: var.name.clone(),
                    line: var.line,
                }),
        );
    }
    unused
}
