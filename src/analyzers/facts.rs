//! Facts gathered while walking one body (a function or module scope).
//!
//! Front-ends fill a `BodyFacts` during their walk and then fold it into a
//! `FunctionDecl` or into the module-level fields of a `SourceUnit`.

use crate::core::{
    CallSite, DecisionKind, DecisionPoint, FunctionDecl, LoopDecl, LoopKind, SourceUnit,
};
use std::collections::BTreeSet;

#[derive(Debug, Default)]
pub(crate) struct BodyFacts {
    pub loops: Vec<LoopDecl>,
    pub decisions: Vec<DecisionPoint>,
    pub calls: Vec<(String, usize)>,
    pub declared: Vec<(String, usize)>,
    pub references: BTreeSet<String>,
    pub statements: usize,
}

impl BodyFacts {
    pub fn loop_at(&mut self, depth: u32, kind: LoopKind, line: usize) {
        self.loops.push(LoopDecl { depth, kind, line });
        self.decision(DecisionKind::Loop, line);
    }

    pub fn decision(&mut self, kind: DecisionKind, line: usize) {
        self.decisions.push(DecisionPoint { kind, line });
    }

    pub fn call(&mut self, callee: impl Into<String>, line: usize) {
        self.calls.push((callee.into(), line));
    }

    pub fn declare(&mut self, name: impl Into<String>, line: usize) {
        self.declared.push((name.into(), line));
    }

    pub fn reference(&mut self, name: impl Into<String>) {
        self.references.insert(name.into());
    }

    pub fn apply_to_function(self, decl: &mut FunctionDecl) {
        decl.loops.extend(self.loops);
        decl.decision_points.extend(self.decisions);
        for (callee, line) in self.calls {
            decl.record_call(callee, line);
        }
        for (name, line) in self.declared {
            decl.declare_local(name, line);
        }
        decl.references.extend(self.references);
        decl.statement_count += self.statements;
    }

    /// Module scope keeps calls, declarations and references; loops and
    /// decisions outside any function are not attributed to anything.
    pub fn apply_to_unit(self, unit: &mut SourceUnit) {
        unit.module_calls
            .extend(self.calls.into_iter().map(|(callee, line)| CallSite {
                callee,
                caller: None,
                line,
            }));
        for (name, line) in self.declared {
            unit.declare_variable(name, line);
        }
        unit.module_references.extend(self.references);
    }
}
