pub mod errors;

pub use errors::{AnalysisError, ParseError};

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Raw input handed to the analyzer: one file's text and its language tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceInput {
    pub path: PathBuf,
    pub text: String,
    pub language: Language,
}

impl SourceInput {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>, language: Language) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
            language,
        }
    }

    /// Build an input, deriving the language from the path's extension.
    pub fn from_path(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        let path = path.into();
        let language = Language::from_path(&path);
        Self::new(path, text, language)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Copy, PartialOrd, Ord)]
pub enum Language {
    Python,
    JavaScript,
    Java,
    C,
    Unknown,
}

impl Language {
    pub fn from_extension(ext: &str) -> Self {
        static EXTENSION_MAP: &[(&[&str], Language)] = &[
            (&["py", "pyw"], Language::Python),
            (&["js", "jsx", "mjs", "cjs"], Language::JavaScript),
            (&["java"], Language::Java),
            (&["c", "h"], Language::C),
        ];

        EXTENSION_MAP
            .iter()
            .find(|(exts, _)| exts.contains(&ext))
            .map(|(_, lang)| *lang)
            .unwrap_or(Language::Unknown)
    }

    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(Language::Unknown)
    }

    /// Parse a user-facing language tag such as `python`, `js` or `java`.
    pub fn from_tag(tag: &str) -> Self {
        static TAG_MAP: &[(&[&str], Language)] = &[
            (&["python", "py"], Language::Python),
            (&["javascript", "js"], Language::JavaScript),
            (&["java"], Language::Java),
            (&["c"], Language::C),
        ];

        let tag = tag.trim().to_ascii_lowercase();
        TAG_MAP
            .iter()
            .find(|(tags, _)| tags.contains(&tag.as_str()))
            .map(|(_, lang)| *lang)
            .unwrap_or(Language::Unknown)
    }

    /// Whether programs in this language start at a conventional `main`.
    ///
    /// Scripts in languages without one run their module body instead, which
    /// changes how dead-code roots are chosen.
    pub fn has_conventional_entry_point(&self) -> bool {
        matches!(self, Language::Java | Language::C)
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        static DISPLAY_STRINGS: &[(Language, &str)] = &[
            (Language::Python, "Python"),
            (Language::JavaScript, "JavaScript"),
            (Language::Java, "Java"),
            (Language::C, "C"),
            (Language::Unknown, "Unknown"),
        ];

        let display_str = DISPLAY_STRINGS
            .iter()
            .find(|(l, _)| l == self)
            .map(|(_, s)| *s)
            .unwrap_or("Unknown");

        write!(f, "{display_str}")
    }
}

/// Inclusive, 1-based line range.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineSpan {
    pub start: usize,
    pub end: usize,
}

impl LineSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    pub fn contains(&self, line: usize) -> bool {
        (self.start..=self.end).contains(&line)
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum LoopKind {
    For,
    While,
    DoWhile,
    Other,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoopDecl {
    /// 1 for an outermost loop, otherwise 1 + depth of the enclosing loop.
    pub depth: u32,
    pub kind: LoopKind,
    pub line: usize,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum DecisionKind {
    If,
    ElseIf,
    Loop,
    BooleanOperator,
    CaseLabel,
    Catch,
    Conditional,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DecisionPoint {
    pub kind: DecisionKind,
    pub line: usize,
}

/// An unresolved call. `caller` is `None` for calls made at module scope.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallSite {
    pub callee: String,
    pub caller: Option<String>,
    pub line: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariableDecl {
    pub name: String,
    pub line: usize,
}

/// Operator/operand tallies used for the Halstead volume.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HalsteadCounts {
    pub distinct_operators: usize,
    pub distinct_operands: usize,
    pub total_operators: usize,
    pub total_operands: usize,
}

impl HalsteadCounts {
    pub fn vocabulary(&self) -> usize {
        self.distinct_operators + self.distinct_operands
    }

    pub fn length(&self) -> usize {
        self.total_operators + self.total_operands
    }

    /// `N * log2(n)`; zero for an empty vocabulary.
    pub fn volume(&self) -> f64 {
        let vocabulary = self.vocabulary();
        if vocabulary == 0 {
            return 0.0;
        }
        self.length() as f64 * (vocabulary as f64).log2()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FunctionDecl {
    pub name: String,
    /// Enclosing class, if the function is a method.
    pub owner: Option<String>,
    pub span: LineSpan,
    pub parameter_count: usize,
    pub statement_count: usize,
    pub loops: Vec<LoopDecl>,
    pub decision_points: Vec<DecisionPoint>,
    pub calls: BTreeSet<CallSite>,
    pub locals: Vec<VariableDecl>,
    pub references: BTreeSet<String>,
    pub is_recursive: bool,
    pub is_exported: bool,
    pub is_top_level: bool,
    pub halstead: Option<HalsteadCounts>,
}

impl FunctionDecl {
    pub fn new(name: impl Into<String>, span: LineSpan) -> Self {
        Self {
            name: name.into(),
            owner: None,
            span,
            parameter_count: 0,
            statement_count: 0,
            loops: Vec::new(),
            decision_points: Vec::new(),
            calls: BTreeSet::new(),
            locals: Vec::new(),
            references: BTreeSet::new(),
            is_recursive: false,
            is_exported: false,
            is_top_level: false,
            halstead: None,
        }
    }

    /// `Owner.name` for methods, plain `name` otherwise.
    pub fn qualified_name(&self) -> String {
        match &self.owner {
            Some(owner) => format!("{owner}.{}", self.name),
            None => self.name.clone(),
        }
    }

    pub fn max_loop_depth(&self) -> u32 {
        self.loops.iter().map(|l| l.depth).max().unwrap_or(0)
    }

    pub fn nested_loop_count(&self) -> usize {
        self.loops.iter().filter(|l| l.depth >= 2).count()
    }

    pub fn record_call(&mut self, callee: impl Into<String>, line: usize) {
        self.calls.insert(CallSite {
            callee: callee.into(),
            caller: Some(self.name.clone()),
            line,
        });
    }

    /// Record a local declaration; only the first declaration of a name is kept.
    pub fn declare_local(&mut self, name: impl Into<String>, line: usize) {
        let name = name.into();
        if !self.locals.iter().any(|v| v.name == name) {
            self.locals.push(VariableDecl { name, line });
        }
    }

    pub fn record_decision(&mut self, kind: DecisionKind, line: usize) {
        self.decision_points.push(DecisionPoint { kind, line });
    }

    /// Derive `is_recursive` from the recorded call sites. Front-ends call this
    /// once extraction of the body is complete.
    pub fn finish(mut self) -> Self {
        self.is_recursive = self.calls.iter().any(|c| c.callee == self.name);
        self
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum LineKind {
    Code,
    Comment,
    Blank,
}

/// Facets a front-end guarantees for its units. Metrics that need a facet the
/// unit lacks are skipped rather than guessed.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Capabilities {
    pub loop_nesting: bool,
    pub comments: bool,
    pub halstead: bool,
}

impl Capabilities {
    pub fn structural() -> Self {
        Self {
            loop_nesting: true,
            comments: true,
            halstead: false,
        }
    }

    pub fn with_halstead(mut self) -> Self {
        self.halstead = true;
        self
    }
}

/// One parsed file in language-neutral form.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceUnit {
    pub path: PathBuf,
    pub language: Language,
    pub functions: Vec<FunctionDecl>,
    pub variables: Vec<VariableDecl>,
    pub module_calls: BTreeSet<CallSite>,
    pub module_references: BTreeSet<String>,
    pub line_kinds: Vec<LineKind>,
    pub comment_count: usize,
    pub line_count: usize,
    pub halstead: Option<HalsteadCounts>,
    pub capabilities: Capabilities,
}

impl SourceUnit {
    pub fn new(path: impl Into<PathBuf>, language: Language, line_kinds: Vec<LineKind>) -> Self {
        let comment_count = line_kinds
            .iter()
            .filter(|k| **k == LineKind::Comment)
            .count();
        Self {
            path: path.into(),
            language,
            functions: Vec::new(),
            variables: Vec::new(),
            module_calls: BTreeSet::new(),
            module_references: BTreeSet::new(),
            line_count: line_kinds.len(),
            line_kinds,
            comment_count,
            halstead: None,
            capabilities: Capabilities::structural(),
        }
    }

    pub fn declare_variable(&mut self, name: impl Into<String>, line: usize) {
        let name = name.into();
        if !self.variables.iter().any(|v| v.name == name) {
            self.variables.push(VariableDecl { name, line });
        }
    }

    fn count_kind_in(&self, span: LineSpan, kind: LineKind) -> usize {
        self.line_kinds
            .iter()
            .enumerate()
            .filter(|(idx, k)| span.contains(idx + 1) && **k == kind)
            .count()
    }

    pub fn comment_lines_in(&self, span: LineSpan) -> usize {
        self.count_kind_in(span, LineKind::Comment)
    }

    pub fn code_lines_in(&self, span: LineSpan) -> usize {
        self.count_kind_in(span, LineKind::Code)
    }

    pub fn code_line_count(&self) -> usize {
        self.line_kinds
            .iter()
            .filter(|k| **k == LineKind::Code)
            .count()
    }
}
