//! Python front-end built on tree-sitter-python.
//!
//! Functions are collected from every scope: top-level definitions, methods
//! (owner set to the enclosing class) and nested definitions. Each body is
//! walked on its own, so facts of a nested function never leak into the
//! function that contains it.
//!
//! Only plain assignments (`x = ...`, tuple targets, walrus) declare
//! variables. Loop targets, parameters and imports do not.

use super::facts::BodyFacts;
use super::tree_sitter_support::{
    halstead_counts, is_field, node_text, parse_tree, span_of, start_line,
};
use super::Analyzer;
use crate::core::{
    Capabilities, DecisionKind, FunctionDecl, Language, LoopKind, ParseError, SourceUnit,
};
use crate::metrics::loc_counter::classify_lines;
use std::path::Path;
use tree_sitter::Node;

pub struct PythonAnalyzer;

impl PythonAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PythonAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer for PythonAnalyzer {
    fn parse(&self, content: &str, path: &Path) -> Result<SourceUnit, ParseError> {
        let tree = parse_tree(tree_sitter_python::LANGUAGE.into(), content, path, "Python")?;
        let root = tree.root_node();

        let mut unit = SourceUnit::new(
            path,
            Language::Python,
            classify_lines(content, Language::Python),
        );
        unit.capabilities = Capabilities::structural().with_halstead();
        unit.halstead = Some(halstead_counts(root, content));

        collect_functions(root, content, None, true, &mut unit.functions);

        let mut module = BodyWalker::new(content);
        module.visit_children(root);
        module.facts.apply_to_unit(&mut unit);

        tracing::trace!(
            path = %path.display(),
            functions = unit.functions.len(),
            "parsed Python unit"
        );
        Ok(unit)
    }

    fn language(&self) -> Language {
        Language::Python
    }
}

fn collect_functions(
    node: Node,
    source: &str,
    owner: Option<&str>,
    top_level: bool,
    out: &mut Vec<FunctionDecl>,
) {
    for child in node.children(&mut node.walk()) {
        match child.kind() {
            "function_definition" => {
                out.push(extract_function(child, source, owner, top_level));
                if let Some(body) = child.child_by_field_name("body") {
                    collect_functions(body, source, None, false, out);
                }
            }
            "class_definition" => {
                let class_name = child
                    .child_by_field_name("name")
                    .map(|n| node_text(n, source));
                if let Some(body) = child.child_by_field_name("body") {
                    collect_functions(body, source, class_name, false, out);
                }
            }
            _ => collect_functions(child, source, owner, top_level, out),
        }
    }
}

fn extract_function(
    node: Node,
    source: &str,
    owner: Option<&str>,
    top_level: bool,
) -> FunctionDecl {
    let name = node
        .child_by_field_name("name")
        .map(|n| node_text(n, source))
        .unwrap_or("<anonymous>");

    let mut decl = FunctionDecl::new(name, span_of(node));
    decl.owner = owner.map(str::to_string);
    decl.is_top_level = top_level;
    decl.is_exported = top_level && !name.starts_with('_');
    decl.parameter_count = node
        .child_by_field_name("parameters")
        .map(count_parameters)
        .unwrap_or(0);
    decl.halstead = Some(halstead_counts(node, source));

    let mut walker = BodyWalker::new(source);
    if let Some(body) = node.child_by_field_name("body") {
        walker.visit_children(body);
    }
    walker.facts.apply_to_function(&mut decl);
    decl.finish()
}

fn count_parameters(parameters: Node) -> usize {
    parameters
        .named_children(&mut parameters.walk())
        .filter(|p| {
            !matches!(
                p.kind(),
                "positional_separator" | "keyword_separator" | "comment"
            )
        })
        .count()
}

struct BodyWalker<'a> {
    source: &'a str,
    facts: BodyFacts,
    loop_depth: u32,
    /// Non-zero while inside a class body; class attributes are not variables.
    class_depth: u32,
}

impl<'a> BodyWalker<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            facts: BodyFacts::default(),
            loop_depth: 0,
            class_depth: 0,
        }
    }

    fn visit_children(&mut self, node: Node) {
        for child in node.children(&mut node.walk()) {
            self.visit(child);
        }
    }

    fn visit_field(&mut self, node: Node, field: &str) {
        if let Some(child) = node.child_by_field_name(field) {
            self.visit(child);
        }
    }

    fn visit(&mut self, node: Node) {
        let kind = node.kind();
        let line = start_line(node);
        if kind.ends_with("_statement") {
            self.facts.statements += 1;
        }

        match kind {
            // Analyzed as a separate function.
            "function_definition" => self.facts.statements += 1,
            "class_definition" => {
                self.visit_field(node, "superclasses");
                self.class_depth += 1;
                self.visit_field(node, "body");
                self.class_depth -= 1;
            }
            "for_statement" => self.visit_loop(node, LoopKind::For),
            "while_statement" => self.visit_loop(node, LoopKind::While),
            "if_statement" => {
                self.facts.decision(DecisionKind::If, line);
                self.visit_children(node);
            }
            "elif_clause" => {
                self.facts.decision(DecisionKind::ElseIf, line);
                self.visit_children(node);
            }
            "conditional_expression" => {
                self.facts.decision(DecisionKind::Conditional, line);
                self.visit_children(node);
            }
            "boolean_operator" => {
                self.facts.decision(DecisionKind::BooleanOperator, line);
                self.visit_children(node);
            }
            "case_clause" => {
                self.facts.decision(DecisionKind::CaseLabel, line);
                self.visit_children(node);
            }
            "except_clause" => {
                self.facts.decision(DecisionKind::Catch, line);
                self.visit_children(node);
            }
            "call" => self.visit_call(node),
            "assignment" => self.visit_assignment(node),
            "named_expression" => {
                if let Some(name) = node.child_by_field_name("name") {
                    self.declare(name);
                }
                self.visit_field(node, "value");
            }
            "attribute" => self.visit_field(node, "object"),
            "keyword_argument" => self.visit_field(node, "value"),
            "lambda" => self.visit_field(node, "body"),
            "identifier" => self.facts.reference(node_text(node, self.source)),
            "comment" | "import_statement" | "import_from_statement"
            | "future_import_statement" => {}
            _ => self.visit_children(node),
        }
    }

    fn visit_loop(&mut self, node: Node, loop_kind: LoopKind) {
        self.loop_depth += 1;
        self.facts
            .loop_at(self.loop_depth, loop_kind, start_line(node));
        for child in node.children(&mut node.walk()) {
            if !is_field(node, "left", child) {
                self.visit(child);
            }
        }
        self.loop_depth -= 1;
    }

    fn visit_call(&mut self, node: Node) {
        if let Some(function) = node.child_by_field_name("function") {
            match function.kind() {
                "identifier" => {
                    self.facts
                        .call(node_text(function, self.source), start_line(node));
                }
                "attribute" => {
                    if let Some(method) = function.child_by_field_name("attribute") {
                        self.facts
                            .call(node_text(method, self.source), start_line(node));
                    }
                    self.visit_field(function, "object");
                }
                _ => self.visit(function),
            }
        }
        self.visit_field(node, "arguments");
    }

    fn visit_assignment(&mut self, node: Node) {
        if let Some(left) = node.child_by_field_name("left") {
            match left.kind() {
                "identifier" => self.declare(left),
                "pattern_list" | "tuple_pattern" | "list_pattern" => {
                    for target in left.named_children(&mut left.walk()) {
                        if target.kind() == "identifier" {
                            self.declare(target);
                        } else {
                            self.visit(target);
                        }
                    }
                }
                _ => self.visit(left),
            }
        }
        self.visit_field(node, "right");
    }

    fn declare(&mut self, name: Node) {
        if self.class_depth == 0 {
            self.facts
                .declare(node_text(name, self.source), start_line(name));
        }
    }
}
