use super::bound_name;
use crate::analyzers::facts::BodyFacts;
use crate::analyzers::tree_sitter_support::{is_field, node_text, start_line};
use crate::core::{DecisionKind, LoopKind};
use tree_sitter::Node;

/// Walks one JavaScript body and records loops, decision points, calls and
/// variable facts. Named nested functions and classes are skipped; they are
/// extracted on their own.
pub(super) struct BodyWalker<'a> {
    source: &'a str,
    pub facts: BodyFacts,
    loop_depth: u32,
}

impl<'a> BodyWalker<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            facts: BodyFacts::default(),
            loop_depth: 0,
        }
    }

    pub fn visit_children(&mut self, node: Node) {
        for child in node.children(&mut node.walk()) {
            self.visit(child);
        }
    }

    fn visit_field(&mut self, node: Node, field: &str) {
        if let Some(child) = node.child_by_field_name(field) {
            self.visit(child);
        }
    }

    pub fn visit(&mut self, node: Node) {
        let kind = node.kind();
        let line = start_line(node);
        if kind.ends_with("_statement") || kind.ends_with("_declaration") {
            self.facts.statements += 1;
        }

        match kind {
            "function_declaration" | "generator_function_declaration" | "method_definition" => {}
            "function_expression" | "arrow_function" | "generator_function" => {
                // Anonymous callbacks belong to the enclosing body.
                if bound_name(node, self.source).is_none() {
                    self.visit_field(node, "body");
                }
            }
            "class_declaration" | "class" => {
                for child in node.children(&mut node.walk()) {
                    if child.kind() == "class_heritage" {
                        self.visit(child);
                    }
                }
            }
            "for_statement" | "for_in_statement" => self.visit_loop(node, LoopKind::For),
            "while_statement" => self.visit_loop(node, LoopKind::While),
            "do_statement" => self.visit_loop(node, LoopKind::DoWhile),
            "if_statement" => {
                let else_if = node.parent().is_some_and(|p| p.kind() == "else_clause");
                let decision = if else_if {
                    DecisionKind::ElseIf
                } else {
                    DecisionKind::If
                };
                self.facts.decision(decision, line);
                self.visit_children(node);
            }
            "switch_case" => {
                self.facts.decision(DecisionKind::CaseLabel, line);
                self.visit_children(node);
            }
            "ternary_expression" => {
                self.facts.decision(DecisionKind::Conditional, line);
                self.visit_children(node);
            }
            "catch_clause" => {
                self.facts.decision(DecisionKind::Catch, line);
                self.visit_field(node, "body");
            }
            "binary_expression" => {
                let operator = node
                    .child_by_field_name("operator")
                    .map(|op| node_text(op, self.source));
                if matches!(operator, Some("&&" | "||" | "??")) {
                    self.facts.decision(DecisionKind::BooleanOperator, line);
                }
                self.visit_children(node);
            }
            "call_expression" => self.visit_call(node),
            "variable_declarator" => {
                if let Some(name) = node.child_by_field_name("name") {
                    if name.kind() == "identifier" {
                        self.facts
                            .declare(node_text(name, self.source), start_line(name));
                    } else {
                        self.visit(name);
                    }
                }
                self.visit_field(node, "value");
            }
            "assignment_expression" => {
                if let Some(left) = node.child_by_field_name("left") {
                    if left.kind() != "identifier" {
                        self.visit(left);
                    }
                }
                self.visit_field(node, "right");
            }
            "member_expression" => self.visit_field(node, "object"),
            "identifier" | "shorthand_property_identifier" => {
                self.facts.reference(node_text(node, self.source));
            }
            "comment" | "import_statement" => {}
            _ => self.visit_children(node),
        }
    }

    fn visit_loop(&mut self, node: Node, loop_kind: LoopKind) {
        self.loop_depth += 1;
        self.facts
            .loop_at(self.loop_depth, loop_kind, start_line(node));
        for child in node.children(&mut node.walk()) {
            // `for (const x of xs)` binds x; it is neither declared nor read.
            if node.kind() == "for_in_statement" && is_field(node, "left", child) {
                continue;
            }
            self.visit(child);
        }
        self.loop_depth -= 1;
    }

    fn visit_call(&mut self, node: Node) {
        let line = start_line(node);
        if let Some(function) = node.child_by_field_name("function") {
            match function.kind() {
                "identifier" => self.facts.call(node_text(function, self.source), line),
                "member_expression" => {
                    if let Some(property) = function.child_by_field_name("property") {
                        self.facts.call(node_text(property, self.source), line);
                    }
                    self.visit_field(function, "object");
                }
                _ => self.visit(function),
            }
        }
        self.visit_field(node, "arguments");
    }
}
