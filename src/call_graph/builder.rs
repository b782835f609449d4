//! Resolve call sites against declarations and assemble the [`CallGraph`].
//!
//! Resolution is by exact name only. A call resolves when exactly one
//! declaration carries the callee name in scope (the calling unit, or every
//! unit when cross-unit resolution is enabled). Several candidates produce an
//! `AmbiguousResolution` warning and no edge; no candidate means the callee is
//! external. A call to the enclosing function's own name is a self-edge.

use super::{CallGraph, FunctionId};
use crate::core::{CallSite, SourceUnit};
use crate::report::AnalysisWarning;
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

/// Candidates per caller for calls that could not be resolved uniquely.
/// The `None` key holds module-level calls.
pub type AmbiguousTargets = BTreeMap<Option<FunctionId>, BTreeSet<FunctionId>>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallGraphBuild {
    pub graph: CallGraph,
    /// Declarations invoked from module scope.
    pub module_targets: BTreeSet<FunctionId>,
    pub ambiguous: AmbiguousTargets,
    pub warnings: Vec<AnalysisWarning>,
}

impl CallGraphBuild {
    fn merge(&mut self, other: CallGraphBuild) {
        self.graph.merge(other.graph);
        self.module_targets.extend(other.module_targets);
        for (caller, candidates) in other.ambiguous {
            self.ambiguous.entry(caller).or_default().extend(candidates);
        }
        self.warnings.extend(other.warnings);
    }
}

pub struct CallGraphBuilder<'a> {
    units: &'a [SourceUnit],
    cross_unit: bool,
    global_index: BTreeMap<&'a str, Vec<FunctionId>>,
}

impl<'a> CallGraphBuilder<'a> {
    pub fn new(units: &'a [SourceUnit], cross_unit: bool) -> Self {
        let mut global_index: BTreeMap<&'a str, Vec<FunctionId>> = BTreeMap::new();
        if cross_unit {
            for unit in units {
                for decl in &unit.functions {
                    global_index
                        .entry(decl.name.as_str())
                        .or_default()
                        .push(FunctionId::of(&unit.path, decl));
                }
            }
        }
        Self {
            units,
            cross_unit,
            global_index,
        }
    }

    pub fn build(&self, parallel: bool) -> CallGraphBuild {
        let _span = tracing::debug_span!("build_call_graph", units = self.units.len()).entered();

        let fragments: Vec<CallGraphBuild> = if parallel {
            self.units.par_iter().map(|u| self.build_unit(u)).collect()
        } else {
            self.units.iter().map(|u| self.build_unit(u)).collect()
        };

        fragments
            .into_iter()
            .fold(CallGraphBuild::default(), |mut acc, fragment| {
                acc.merge(fragment);
                acc
            })
    }

    fn build_unit(&self, unit: &SourceUnit) -> CallGraphBuild {
        let local_index = local_index(unit);
        let mut fragment = CallGraphBuild {
            warnings: duplicate_declarations(unit),
            ..Default::default()
        };

        for decl in &unit.functions {
            fragment.graph.add_function(FunctionId::of(&unit.path, decl));
        }

        for decl in &unit.functions {
            let caller = FunctionId::of(&unit.path, decl);
            for call in &decl.calls {
                if call.callee == decl.name {
                    fragment
                        .graph
                        .add_call_parts(caller.clone(), caller.clone(), call.line);
                    continue;
                }
                match self.resolve(&local_index, &call.callee) {
                    Resolution::External => {}
                    Resolution::Unique(callee) => {
                        fragment.graph.add_call_parts(caller.clone(), callee, call.line)
                    }
                    Resolution::Ambiguous(candidates) => {
                        record_ambiguity(&mut fragment, unit, Some(&caller), call, candidates)
                    }
                }
            }
        }

        for call in &unit.module_calls {
            match self.resolve(&local_index, &call.callee) {
                Resolution::External => {}
                Resolution::Unique(callee) => {
                    fragment.module_targets.insert(callee);
                }
                Resolution::Ambiguous(candidates) => {
                    record_ambiguity(&mut fragment, unit, None, call, candidates)
                }
            }
        }

        fragment
    }

    fn resolve(&self, local_index: &BTreeMap<&str, Vec<FunctionId>>, callee: &str) -> Resolution {
        let index = if self.cross_unit {
            &self.global_index
        } else {
            local_index
        };
        match index.get(callee).map(Vec::as_slice) {
            None | Some([]) => Resolution::External,
            Some([only]) => Resolution::Unique(only.clone()),
            Some(many) => Resolution::Ambiguous(many.to_vec()),
        }
    }
}

enum Resolution {
    External,
    Unique(FunctionId),
    Ambiguous(Vec<FunctionId>),
}

fn local_index(unit: &SourceUnit) -> BTreeMap<&str, Vec<FunctionId>> {
    let mut index: BTreeMap<&str, Vec<FunctionId>> = BTreeMap::new();
    for decl in &unit.functions {
        index
            .entry(decl.name.as_str())
            .or_default()
            .push(FunctionId::of(&unit.path, decl));
    }
    index
}

fn record_ambiguity(
    fragment: &mut CallGraphBuild,
    unit: &SourceUnit,
    caller: Option<&FunctionId>,
    call: &CallSite,
    candidates: Vec<FunctionId>,
) {
    tracing::warn!(
        unit = %unit.path.display(),
        callee = %call.callee,
        line = call.line,
        candidates = candidates.len(),
        "ambiguous call resolution"
    );
    fragment
        .ambiguous
        .entry(caller.cloned())
        .or_default()
        .extend(candidates.iter().cloned());
    fragment.warnings.push(AnalysisWarning::AmbiguousResolution {
        unit: unit.path.clone(),
        caller: caller.cloned(),
        callee: call.callee.clone(),
        line: call.line,
        candidates,
    });
}

fn duplicate_declarations(unit: &SourceUnit) -> Vec<AnalysisWarning> {
    let mut by_name: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for decl in &unit.functions {
        by_name
            .entry(decl.qualified_name())
            .or_default()
            .push(decl.span.start);
    }
    by_name
        .into_iter()
        .filter(|(_, lines)| lines.len() > 1)
        .map(|(name, lines)| AnalysisWarning::DuplicateDeclaration {
            unit: unit.path.clone(),
            name,
            lines,
        })
        .collect()
}
