use crate::core::{HalsteadCounts, LineSpan, ParseError};
use std::collections::HashSet;
use std::path::Path;
use tree_sitter::{Node, Parser, Tree};

/// Deepest syntax tree the body walkers accept. The walkers recurse once
/// per level, so deeper trees are reported as a per-unit failure.
const MAX_SYNTAX_DEPTH: usize = 512;

/// Parse `content`, rejecting trees that contain ERROR or MISSING nodes or
/// nest deeper than [`MAX_SYNTAX_DEPTH`].
pub(crate) fn parse_tree(
    grammar: tree_sitter::Language,
    content: &str,
    path: &Path,
    language_name: &str,
) -> Result<Tree, ParseError> {
    let mut parser = Parser::new();
    parser.set_language(&grammar).map_err(|e| {
        ParseError::new(path, format!("failed to set {language_name} language: {e}"))
    })?;

    let tree = parser
        .parse(content, None)
        .ok_or_else(|| ParseError::new(path, format!("failed to parse {language_name} code")))?;

    let root = tree.root_node();
    if root.has_error() {
        let line = first_error_line(root).unwrap_or(1);
        return Err(ParseError::at_line(
            path,
            line,
            format!("malformed {language_name} source"),
        ));
    }

    if let Some(line) = line_past_depth(root, MAX_SYNTAX_DEPTH) {
        return Err(ParseError::at_line(
            path,
            line,
            format!("{language_name} syntax nests deeper than {MAX_SYNTAX_DEPTH} levels"),
        ));
    }

    Ok(tree)
}

fn first_error_line(root: Node) -> Option<usize> {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            return Some(start_line(node));
        }
        let mut cursor = node.walk();
        let erroneous: Vec<Node> = node
            .children(&mut cursor)
            .filter(|child| child.has_error())
            .collect();
        stack.extend(erroneous.into_iter().rev());
    }
    None
}

/// Line of the first node lying more than `limit` levels below `root`.
fn line_past_depth(root: Node, limit: usize) -> Option<usize> {
    let mut cursor = root.walk();
    let mut depth = 0usize;
    loop {
        if depth > limit {
            return Some(start_line(cursor.node()));
        }
        if cursor.goto_first_child() {
            depth += 1;
            continue;
        }
        while !cursor.goto_next_sibling() {
            if !cursor.goto_parent() {
                return None;
            }
            depth -= 1;
        }
    }
}

pub(crate) fn node_text<'a>(node: Node, source: &'a str) -> &'a str {
    node.utf8_text(source.as_bytes()).unwrap_or("")
}

pub(crate) fn start_line(node: Node) -> usize {
    node.start_position().row + 1
}

pub(crate) fn span_of(node: Node) -> LineSpan {
    LineSpan::new(start_line(node), node.end_position().row + 1)
}

pub(crate) fn children(node: Node) -> Vec<Node> {
    let mut cursor = node.walk();
    node.children(&mut cursor).collect()
}

/// True when `child` is the node stored in `parent`'s `field`.
pub(crate) fn is_field(parent: Node, field: &str, child: Node) -> bool {
    parent
        .child_by_field_name(field)
        .is_some_and(|n| n.id() == child.id())
}

/// Grouping punctuation carries no operator meaning.
const IGNORED_TOKENS: &[&str] = &["(", ")", "[", "]", "{", "}", ",", ":", ";"];

/// Count Halstead operators and operands over the leaves of `node`.
///
/// Named leaves (identifiers, literals) are operands; anonymous leaves
/// (keywords, operator symbols) are operators. String literals count as a
/// single operand.
pub(crate) fn halstead_counts(node: Node, source: &str) -> HalsteadCounts {
    let mut operators = HashSet::new();
    let mut operands = HashSet::new();
    let mut counts = HalsteadCounts::default();
    collect_halstead(node, source, &mut operators, &mut operands, &mut counts);
    counts.distinct_operators = operators.len();
    counts.distinct_operands = operands.len();
    counts
}

fn collect_halstead<'a>(
    root: Node,
    source: &'a str,
    operators: &mut HashSet<&'a str>,
    operands: &mut HashSet<&'a str>,
    counts: &mut HalsteadCounts,
) {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        let kind = node.kind();
        if kind == "comment" {
            continue;
        }
        if kind == "string" || kind == "template_string" || node.child_count() == 0 {
            let text = node_text(node, source);
            if node.is_named() {
                operands.insert(text);
                counts.total_operands += 1;
            } else if !IGNORED_TOKENS.contains(&text) {
                operators.insert(text);
                counts.total_operators += 1;
            }
            continue;
        }
        stack.extend(children(node).into_iter().rev());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn python() -> tree_sitter::Language {
        tree_sitter_python::LANGUAGE.into()
    }

    #[test]
    fn test_parse_tree_accepts_valid_source() {
        let tree = parse_tree(python(), "x = 1\n", &PathBuf::from("a.py"), "Python").unwrap();
        assert_eq!(tree.root_node().kind(), "module");
    }

    #[test]
    fn test_parse_tree_reports_error_line() {
        let err = parse_tree(
            python(),
            "x = 1\ndef broken(:\n    pass\n",
            &PathBuf::from("bad.py"),
            "Python",
        )
        .unwrap_err();
        assert_eq!(err.path, PathBuf::from("bad.py"));
        assert!(err.line.is_some());
        assert!(err.message.contains("Python"));
    }

    #[test]
    fn test_parse_tree_rejects_excessive_nesting() {
        let terms = vec!["x"; 5_000].join(" + ");
        let source = format!("def f(x):\n    return {terms}\n");
        let err = parse_tree(python(), &source, &PathBuf::from("deep.py"), "Python").unwrap_err();
        assert_eq!(err.line, Some(2));
        assert!(err.message.contains("deeper than"));

        let shallow = vec!["x"; 100].join(" + ");
        let source = format!("def f(x):\n    return {shallow}\n");
        assert!(parse_tree(python(), &source, &PathBuf::from("ok.py"), "Python").is_ok());
    }

    #[test]
    fn test_halstead_counts_simple_expression() {
        let source = "a = b + b\n";
        let tree = parse_tree(python(), source, &PathBuf::from("h.py"), "Python").unwrap();
        let counts = halstead_counts(tree.root_node(), source);
        // operators: = +    operands: a b b
        assert_eq!(counts.total_operators, 2);
        assert_eq!(counts.distinct_operators, 2);
        assert_eq!(counts.total_operands, 3);
        assert_eq!(counts.distinct_operands, 2);
    }
}
