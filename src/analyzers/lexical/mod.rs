//! Lexical front-end shared by Java and C.
//!
//! No grammar is available for these languages, so structure is recovered
//! from a token stream: brackets are matched, function bodies are found by
//! their `name(...) {` shape, and loop nesting is lexical containment of
//! loop statement extents.

mod scanner;
mod tokenizer;

use super::Analyzer;
use crate::core::{Language, ParseError, SourceUnit};
use crate::metrics::loc_counter::classify_lines;
use lazy_static::lazy_static;
use scanner::Scanner;
use std::collections::HashSet;
use std::path::Path;
use tokenizer::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Java,
    C,
}

lazy_static! {
    /// Words that open a statement which can never be a declaration.
    static ref STATEMENT_KEYWORDS: HashSet<&'static str> = [
        "return", "throw", "goto", "case", "default", "break", "continue", "else", "do", "if",
        "for", "while", "switch", "try", "catch", "finally", "new", "delete", "yield", "assert",
        "sizeof", "this", "super", "import", "package", "typedef", "extern", "synchronized",
    ]
    .into_iter()
    .collect();

    static ref JAVA_KEYWORDS: HashSet<&'static str> = [
        "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
        "continue", "default", "do", "double", "else", "enum", "extends", "final", "finally",
        "float", "for", "goto", "if", "implements", "import", "instanceof", "int", "interface",
        "long", "native", "new", "package", "private", "protected", "public", "return", "short",
        "static", "strictfp", "super", "switch", "synchronized", "this", "throw", "throws",
        "transient", "try", "void", "volatile", "while", "true", "false", "null", "var", "yield",
    ]
    .into_iter()
    .collect();

    static ref C_KEYWORDS: HashSet<&'static str> = [
        "auto", "break", "case", "char", "const", "continue", "default", "do", "double", "else",
        "enum", "extern", "float", "for", "goto", "if", "inline", "int", "long", "register",
        "restrict", "return", "short", "signed", "sizeof", "static", "struct", "switch", "typedef",
        "union", "unsigned", "void", "volatile", "while", "_Bool",
    ]
    .into_iter()
    .collect();
}

impl Dialect {
    pub fn language(self) -> Language {
        match self {
            Dialect::Java => Language::Java,
            Dialect::C => Language::C,
        }
    }

    pub(crate) fn is_keyword(self, word: &str) -> bool {
        match self {
            Dialect::Java => JAVA_KEYWORDS.contains(word),
            Dialect::C => C_KEYWORDS.contains(word),
        }
    }

    pub(crate) fn opens_statement_only(word: &str) -> bool {
        STATEMENT_KEYWORDS.contains(word)
    }

    /// Keywords that introduce a type body (`class Foo {`, `struct s {`).
    fn type_body_keywords(self) -> &'static [&'static str] {
        match self {
            Dialect::Java => &["class", "interface", "enum", "record"],
            Dialect::C => &["struct", "union", "enum"],
        }
    }

    /// Java type bodies hold methods; C struct bodies hold only fields.
    fn type_bodies_contain_functions(self) -> bool {
        self == Dialect::Java
    }

    fn is_exported(self, header: &[Token]) -> bool {
        match self {
            Dialect::Java => header.iter().any(|t| t.text == "public"),
            Dialect::C => !header.iter().any(|t| t.text == "static"),
        }
    }

    /// Whether a declaration at type or file scope is tracked as a unit
    /// variable. Non-private Java fields and `extern` C declarations may be
    /// used from other units.
    fn tracks_scope_variable(self, statement: &[Token]) -> bool {
        match self {
            Dialect::Java => statement.iter().any(|t| t.text == "private"),
            Dialect::C => !statement.iter().any(|t| t.text == "extern"),
        }
    }
}

pub struct LexicalAnalyzer {
    dialect: Dialect,
}

impl LexicalAnalyzer {
    pub fn java() -> Self {
        Self {
            dialect: Dialect::Java,
        }
    }

    pub fn c() -> Self {
        Self { dialect: Dialect::C }
    }
}

impl Analyzer for LexicalAnalyzer {
    fn parse(&self, content: &str, path: &Path) -> Result<SourceUnit, ParseError> {
        let language = self.dialect.language();
        let tokens = tokenizer::tokenize(content, self.dialect, path)?;
        let scanner = Scanner::new(&tokens, self.dialect, path)?;

        let mut unit = SourceUnit::new(path, language, classify_lines(content, language));
        scanner.scan_unit(&mut unit);

        tracing::trace!(
            path = %path.display(),
            tokens = tokens.len(),
            functions = unit.functions.len(),
            "scanned {language} unit"
        );
        Ok(unit)
    }

    fn language(&self) -> Language {
        self.dialect.language()
    }
}
