mod complexity;

use super::tree_sitter_support::{node_text, parse_tree, span_of};
use super::Analyzer;
use crate::core::{FunctionDecl, Language, ParseError, SourceUnit};
use crate::metrics::loc_counter::classify_lines;
use complexity::BodyWalker;
use std::path::Path;
use tree_sitter::Node;

/// JavaScript front-end built on tree-sitter-javascript.
///
/// Named functions are declarations, methods and function values bound to a
/// variable or assigned to a name. Anonymous function values (callbacks) are
/// part of the body that contains them.
pub struct JavaScriptAnalyzer;

impl JavaScriptAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JavaScriptAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer for JavaScriptAnalyzer {
    fn parse(&self, content: &str, path: &Path) -> Result<SourceUnit, ParseError> {
        let tree = parse_tree(
            tree_sitter_javascript::LANGUAGE.into(),
            content,
            path,
            "JavaScript",
        )?;
        let root = tree.root_node();

        let mut unit = SourceUnit::new(
            path,
            Language::JavaScript,
            classify_lines(content, Language::JavaScript),
        );

        let placement = Placement {
            owner: None,
            top_level: true,
            exported: false,
        };
        collect_functions(root, content, placement, &mut unit.functions);

        let mut module = BodyWalker::new(content);
        module.visit_children(root);
        module.facts.apply_to_unit(&mut unit);

        tracing::trace!(
            path = %path.display(),
            functions = unit.functions.len(),
            "parsed JavaScript unit"
        );
        Ok(unit)
    }

    fn language(&self) -> Language {
        Language::JavaScript
    }
}

#[derive(Clone, Copy)]
struct Placement<'a> {
    owner: Option<&'a str>,
    top_level: bool,
    exported: bool,
}

impl Placement<'_> {
    fn nested() -> Self {
        Placement {
            owner: None,
            top_level: false,
            exported: false,
        }
    }
}

fn is_function_value(node: Node) -> bool {
    matches!(
        node.kind(),
        "function_expression" | "arrow_function" | "generator_function"
    )
}

/// The name a function value is bound to, if any.
pub(super) fn bound_name<'a>(node: Node, source: &'a str) -> Option<&'a str> {
    if let Some(name) = node.child_by_field_name("name") {
        return Some(node_text(name, source));
    }
    let parent = node.parent()?;
    match parent.kind() {
        "variable_declarator" => {
            let value = parent.child_by_field_name("value")?;
            if value.id() != node.id() {
                return None;
            }
            let name = parent.child_by_field_name("name")?;
            (name.kind() == "identifier").then(|| node_text(name, source))
        }
        "assignment_expression" => {
            let right = parent.child_by_field_name("right")?;
            if right.id() != node.id() {
                return None;
            }
            let left = parent.child_by_field_name("left")?;
            match left.kind() {
                "identifier" => Some(node_text(left, source)),
                "member_expression" => left
                    .child_by_field_name("property")
                    .map(|p| node_text(p, source)),
                _ => None,
            }
        }
        _ => None,
    }
}

fn collect_functions(node: Node, source: &str, placement: Placement, out: &mut Vec<FunctionDecl>) {
    for child in node.children(&mut node.walk()) {
        match child.kind() {
            "function_declaration" | "generator_function_declaration" | "method_definition" => {
                let name = child
                    .child_by_field_name("name")
                    .map(|n| node_text(n, source))
                    .unwrap_or("<anonymous>");
                out.push(extract_function(child, name, source, placement));
                collect_in_body(child, source, out);
            }
            "class_declaration" | "class" => {
                let class_name = child
                    .child_by_field_name("name")
                    .map(|n| node_text(n, source));
                let inner = Placement {
                    owner: class_name,
                    top_level: false,
                    exported: false,
                };
                if let Some(body) = child.child_by_field_name("body") {
                    collect_functions(body, source, inner, out);
                }
            }
            "export_statement" => {
                let exported = Placement {
                    exported: placement.top_level,
                    ..placement
                };
                collect_functions(child, source, exported, out);
            }
            _ if is_function_value(child) => match bound_name(child, source) {
                Some(name) => {
                    let value_placement = Placement {
                        owner: None,
                        ..placement
                    };
                    out.push(extract_function(child, name, source, value_placement));
                    collect_in_body(child, source, out);
                }
                None => collect_in_body(child, source, out),
            },
            _ => collect_functions(child, source, placement, out),
        }
    }
}

fn collect_in_body(function: Node, source: &str, out: &mut Vec<FunctionDecl>) {
    if let Some(body) = function.child_by_field_name("body") {
        collect_functions(body, source, Placement::nested(), out);
    }
}

fn extract_function(node: Node, name: &str, source: &str, placement: Placement) -> FunctionDecl {
    let mut decl = FunctionDecl::new(name, span_of(node));
    decl.owner = placement.owner.map(str::to_string);
    decl.is_top_level = placement.top_level;
    decl.is_exported = placement.exported;
    decl.parameter_count = count_parameters(node);

    let mut walker = BodyWalker::new(source);
    if let Some(body) = node.child_by_field_name("body") {
        if body.kind() == "statement_block" {
            walker.visit_children(body);
        } else {
            // Expression-bodied arrow function.
            walker.visit(body);
        }
    }
    walker.facts.apply_to_function(&mut decl);
    decl.finish()
}

fn count_parameters(function: Node) -> usize {
    if let Some(parameters) = function.child_by_field_name("parameters") {
        return parameters
            .named_children(&mut parameters.walk())
            .filter(|p| p.kind() != "comment")
            .count();
    }
    // `x => ...`
    usize::from(function.child_by_field_name("parameter").is_some())
}
