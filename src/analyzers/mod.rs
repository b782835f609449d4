//! Language front-ends.
//!
//! Every front-end turns raw source text into the same `SourceUnit` shape.
//! Python and JavaScript walk a tree-sitter syntax tree; Java and C use the
//! lexical brace-counting scanner in [`lexical`].

use crate::core::{Language, ParseError, SourceInput, SourceUnit};
use std::path::Path;

mod facts;
pub mod javascript;
pub mod lexical;
pub mod python;
mod tree_sitter_support;

pub trait Analyzer: Send + Sync {
    fn parse(&self, content: &str, path: &Path) -> Result<SourceUnit, ParseError>;
    fn language(&self) -> Language;
}

/// Parse one input with the front-end registered for its language.
pub fn analyze_source(input: &SourceInput) -> Result<SourceUnit, ParseError> {
    let _span = tracing::debug_span!(
        "parse_unit",
        path = %input.path.display(),
        language = %input.language
    )
    .entered();
    get_analyzer(input.language).parse(&input.text, &input.path)
}

pub fn get_analyzer(language: Language) -> Box<dyn Analyzer> {
    type AnalyzerFactory = fn() -> Box<dyn Analyzer>;

    static ANALYZER_MAP: &[(Language, AnalyzerFactory)] = &[
        (Language::Python, || Box::new(python::PythonAnalyzer::new())),
        (Language::JavaScript, || {
            Box::new(javascript::JavaScriptAnalyzer::new())
        }),
        (Language::Java, || Box::new(lexical::LexicalAnalyzer::java())),
        (Language::C, || Box::new(lexical::LexicalAnalyzer::c())),
    ];

    ANALYZER_MAP
        .iter()
        .find(|(lang, _)| *lang == language)
        .map(|(_, factory)| factory())
        .unwrap_or_else(|| Box::new(NullAnalyzer))
}

/// Front-end for languages without support; every parse fails.
struct NullAnalyzer;

impl Analyzer for NullAnalyzer {
    fn parse(&self, _content: &str, path: &Path) -> Result<SourceUnit, ParseError> {
        Err(ParseError::new(path, "unsupported language"))
    }

    fn language(&self) -> Language {
        Language::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_get_analyzer_python() {
        let analyzer = get_analyzer(Language::Python);
        assert_eq!(analyzer.language(), Language::Python);
    }

    #[test]
    fn test_get_analyzer_java_and_c() {
        assert_eq!(get_analyzer(Language::Java).language(), Language::Java);
        assert_eq!(get_analyzer(Language::C).language(), Language::C);
    }

    #[test]
    fn test_get_analyzer_unknown() {
        let analyzer = get_analyzer(Language::Unknown);
        assert_eq!(analyzer.language(), Language::Unknown);
    }

    #[test]
    fn test_null_analyzer_rejects_input() {
        let err = NullAnalyzer
            .parse("anything", &PathBuf::from("notes.txt"))
            .unwrap_err();
        assert_eq!(err.message, "unsupported language");
        assert_eq!(err.path, PathBuf::from("notes.txt"));
    }

    #[test]
    fn test_analyze_source_dispatches_on_language() {
        let input = SourceInput::new("a.py", "def f():\n    return 1\n", Language::Python);
        let unit = analyze_source(&input).unwrap();
        assert_eq!(unit.language, Language::Python);
        assert_eq!(unit.functions.len(), 1);
    }
}
