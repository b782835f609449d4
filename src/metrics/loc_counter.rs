//! Line classification shared by every front-end.
//!
//! Each physical line is classified as code, comment or blank so the metrics
//! engine can compute comment ratios and source-lines-of-code over any line
//! span without knowing the language.
//!
//! - Python: `#` comments; lines of a triple-quoted string that opens at the
//!   start of a line (docstrings) count as comments.
//! - JavaScript, Java, C: `//` and `/* ... */` comments. C preprocessor lines
//!   are code.
//!
//! Comment markers inside string literals are not detected.

use crate::core::{Language, LineKind};

/// Aggregate line counts for a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LocCount {
    pub physical_lines: usize,
    pub code_lines: usize,
    pub comment_lines: usize,
    pub blank_lines: usize,
}

impl LocCount {
    pub fn from_kinds(kinds: &[LineKind]) -> Self {
        kinds.iter().fold(
            LocCount {
                physical_lines: kinds.len(),
                ..Default::default()
            },
            |mut acc, kind| {
                match kind {
                    LineKind::Code => acc.code_lines += 1,
                    LineKind::Comment => acc.comment_lines += 1,
                    LineKind::Blank => acc.blank_lines += 1,
                }
                acc
            },
        )
    }
}

#[derive(Clone, Debug, Default)]
struct CommentState {
    in_block_comment: bool,
    /// Closing delimiter of an open Python docstring.
    open_docstring: Option<&'static str>,
}

/// Classify every line of `content`. The result has one entry per line.
pub fn classify_lines(content: &str, language: Language) -> Vec<LineKind> {
    let mut state = CommentState::default();
    content
        .lines()
        .map(|line| classify_line(line.trim(), &mut state, language))
        .collect()
}

fn classify_line(trimmed: &str, state: &mut CommentState, language: Language) -> LineKind {
    if let Some(delimiter) = state.open_docstring {
        if trimmed.contains(delimiter) {
            state.open_docstring = None;
        }
        return LineKind::Comment;
    }

    if trimmed.is_empty() {
        return LineKind::Blank;
    }

    if state.in_block_comment {
        if let Some(end_idx) = trimmed.find("*/") {
            state.in_block_comment = false;
            let after = trimmed[end_idx + 2..].trim();
            if !after.is_empty() && !after.starts_with("//") {
                return LineKind::Code;
            }
        }
        return LineKind::Comment;
    }

    match language {
        Language::Python => classify_python_line(trimmed, state),
        _ => classify_c_style_line(trimmed, state),
    }
}

fn classify_python_line(trimmed: &str, state: &mut CommentState) -> LineKind {
    if trimmed.starts_with('#') {
        return LineKind::Comment;
    }

    for delimiter in ["\"\"\"", "'''"] {
        if let Some(rest) = trimmed.strip_prefix(delimiter) {
            if !rest.contains(delimiter) {
                state.open_docstring = Some(delimiter);
            }
            return LineKind::Comment;
        }
    }

    LineKind::Code
}

fn classify_c_style_line(trimmed: &str, state: &mut CommentState) -> LineKind {
    if trimmed.starts_with("//") {
        return LineKind::Comment;
    }

    let Some(start_idx) = trimmed.find("/*") else {
        return LineKind::Code;
    };

    let has_code_before = !trimmed[..start_idx].trim().is_empty();
    let after_open = &trimmed[start_idx + 2..];
    match after_open.find("*/") {
        Some(end_idx) => {
            let after = after_open[end_idx + 2..].trim();
            if has_code_before || (!after.is_empty() && !after.starts_with("//")) {
                LineKind::Code
            } else {
                LineKind::Comment
            }
        }
        None => {
            state.in_block_comment = true;
            if has_code_before {
                LineKind::Code
            } else {
                LineKind::Comment
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use LineKind::{Blank, Code, Comment};

    #[test]
    fn test_python_hash_comments_and_blanks() {
        let source = indoc! {"
            # header
            x = 1

            y = 2  # trailing
        "};
        assert_eq!(
            classify_lines(source, Language::Python),
            vec![Comment, Code, Blank, Code]
        );
    }

    #[test]
    fn test_python_docstring_lines_are_comments() {
        let source = indoc! {r#"
            def f():
                """Summary.

                Details.
                """
                return 1
        "#};
        assert_eq!(
            classify_lines(source, Language::Python),
            vec![Code, Comment, Comment, Comment, Comment, Code]
        );
    }

    #[test]
    fn test_single_line_docstring_does_not_leak() {
        let source = "def f():\n    '''One liner.'''\n    return 2\n";
        assert_eq!(
            classify_lines(source, Language::Python),
            vec![Code, Comment, Code]
        );
    }

    #[test]
    fn test_c_style_block_comment_spans_lines() {
        let source = indoc! {"
            /* start
               middle
            end */
            int x = 0; /* trailing */
            // line
        "};
        assert_eq!(
            classify_lines(source, Language::Java),
            vec![Comment, Comment, Comment, Code, Comment]
        );
    }

    #[test]
    fn test_code_after_block_comment_close() {
        let source = "/* a\n*/ int y = 1;\n";
        assert_eq!(classify_lines(source, Language::C), vec![Comment, Code]);
    }

    #[test]
    fn test_preprocessor_line_is_code() {
        assert_eq!(
            classify_lines("#include <stdio.h>\n", Language::C),
            vec![Code]
        );
    }

    #[test]
    fn test_loc_count_from_kinds() {
        let count = LocCount::from_kinds(&[Code, Comment, Blank, Code]);
        assert_eq!(
            count,
            LocCount {
                physical_lines: 4,
                code_lines: 2,
                comment_lines: 1,
                blank_lines: 1,
            }
        );
        assert_eq!(
            count.physical_lines,
            count.code_lines + count.comment_lines + count.blank_lines
        );
    }
}
