use crate::core::FunctionDecl;
use im::{OrdMap, OrdSet, Vector};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Identity of a declared function: its unit, qualified name and first line.
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FunctionId {
    pub file: PathBuf,
    pub name: String,
    pub line: usize,
}

impl FunctionId {
    pub fn new(file: impl Into<PathBuf>, name: impl Into<String>, line: usize) -> Self {
        Self {
            file: file.into(),
            name: name.into(),
            line,
        }
    }

    pub fn of(unit_path: &Path, decl: &FunctionDecl) -> Self {
        Self::new(unit_path, decl.qualified_name(), decl.span.start)
    }
}

impl fmt::Display for FunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file.display(), self.name, self.line)
    }
}

/// A resolved call edge.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FunctionCall {
    pub caller: FunctionId,
    pub callee: FunctionId,
    pub line: usize,
}

/// Caller to callee edges between declared functions.
///
/// Only resolved calls appear here; calls to library functions and calls
/// with ambiguous targets have no edge. Serialized as the function list and
/// the edge list; the lookup indexes are derived.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CallGraph {
    pub(super) functions: OrdSet<FunctionId>,
    pub(super) edges: Vector<FunctionCall>,
    #[serde(skip)]
    pub(super) caller_index: OrdMap<FunctionId, OrdSet<FunctionId>>,
    #[serde(skip)]
    pub(super) callee_index: OrdMap<FunctionId, OrdSet<FunctionId>>,
}
