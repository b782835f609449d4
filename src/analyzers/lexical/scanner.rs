use super::tokenizer::{Token, TokenKind};
use super::Dialect;
use crate::analyzers::facts::BodyFacts;
use crate::core::{DecisionKind, FunctionDecl, LineSpan, LoopKind, ParseError, SourceUnit};
use std::collections::HashSet;
use std::path::Path;

/// Tokens allowed in the type part of a declaration (`Map<K, V>`, `int *`, `char[]`).
const TYPE_PUNCTUATION: &[&str] = &["<", ">", ">>", ",", ".", "*", "[", "]", "?", "&", "@"];

/// Tokens that may directly precede a declared name.
const TYPE_ENDINGS: &[&str] = &[">", ">>", "]", "*"];

/// `name(...) {` header found at file or type scope.
struct Signature<'a> {
    name: &'a str,
    name_idx: usize,
    params_open: usize,
    params_close: usize,
}

pub(super) struct Scanner<'t, 'a> {
    tokens: &'t [Token<'a>],
    /// For every bracket token, the index of its partner.
    partner: Vec<Option<usize>>,
    dialect: Dialect,
}

impl<'t, 'a> Scanner<'t, 'a> {
    pub fn new(tokens: &'t [Token<'a>], dialect: Dialect, path: &Path) -> Result<Self, ParseError> {
        let partner = match_brackets(tokens, path)?;
        Ok(Self {
            tokens,
            partner,
            dialect,
        })
    }

    pub fn scan_unit(&self, unit: &mut SourceUnit) {
        let mut module = BodyFacts::default();
        self.scan_scope(0, self.tokens.len(), None, &mut unit.functions, &mut module);
        module.apply_to_unit(unit);
    }

    fn text(&self, idx: usize) -> &'a str {
        self.tokens.get(idx).map(|t| t.text).unwrap_or("")
    }

    fn partner_of(&self, idx: usize) -> usize {
        self.partner[idx].unwrap_or(idx)
    }

    /// Index just past a parenthesized group starting at `idx`, or `idx`.
    fn skip_parens(&self, idx: usize) -> usize {
        if self.text(idx) == "(" {
            self.partner_of(idx) + 1
        } else {
            idx
        }
    }

    /// Walk a file or type scope, extracting functions and scope-level
    /// statements.
    fn scan_scope(
        &self,
        start: usize,
        end: usize,
        owner: Option<&'a str>,
        functions: &mut Vec<FunctionDecl>,
        module: &mut BodyFacts,
    ) {
        let mut header_start = start;
        let mut i = start;
        while i < end {
            match self.text(i) {
                ";" => {
                    self.scope_statement(header_start, i, module);
                    header_start = i + 1;
                    i += 1;
                }
                "{" => {
                    let close = self.partner_of(i);
                    let header = &self.tokens[header_start..i];
                    if let Some(type_name) = self.type_body_name(header) {
                        if self.dialect.type_bodies_contain_functions() {
                            self.scan_scope(i + 1, close, type_name, functions, module);
                        }
                    } else if header.iter().any(|t| t.text == "=") {
                        // Initializer list; the statement continues to its `;`.
                        i = close + 1;
                        continue;
                    } else if let Some(sig) = self.signature(header_start, i) {
                        functions.push(self.extract_function(&sig, header_start, i, close, owner));
                    } else if self.is_initializer_block(header) {
                        self.initializer_block(i, close, module);
                    }
                    header_start = close + 1;
                    i = close + 1;
                }
                "(" | "[" => i = self.partner_of(i) + 1,
                _ => i += 1,
            }
        }
    }

    /// `Some(name)` when `header` opens a type body (`name` is `None` for
    /// anonymous C structs).
    fn type_body_name(&self, header: &[Token<'a>]) -> Option<Option<&'a str>> {
        let keywords = self.dialect.type_body_keywords();
        header.iter().enumerate().find_map(|(idx, token)| {
            if !keywords.contains(&token.text) || (idx > 0 && header[idx - 1].text == ".") {
                return None;
            }
            // `struct node *make(int v) {` is a function returning a struct.
            let has_params = header[idx + 1..].iter().any(|t| t.text == "(");
            if has_params && token.text != "record" {
                return None;
            }
            match header.get(idx + 1) {
                Some(next) if next.is_ident() => Some(Some(next.text)),
                // `record` is only a keyword when a name follows.
                _ if token.text == "record" => None,
                Some(next) if next.text == "{" => Some(None),
                None => Some(None),
                Some(_) => None,
            }
        })
    }

    /// Java `static { ... }` and instance `{ ... }` initializers.
    fn is_initializer_block(&self, header: &[Token<'a>]) -> bool {
        self.dialect == Dialect::Java && matches!(header, [] | [Token { text: "static", .. }])
    }

    /// Initializers run when the type loads, so their calls and references
    /// count as scope-level flow. Their locals stay private to the block.
    fn initializer_block(&self, open: usize, close: usize, module: &mut BodyFacts) {
        let block = self.scan_body(open + 1, close);
        module.calls.extend(block.calls);
        module.references.extend(block.references);
    }

    fn signature(&self, header_start: usize, brace: usize) -> Option<Signature<'a>> {
        let last_close = (header_start..brace)
            .rev()
            .find(|&idx| self.text(idx) == ")")?;

        let tail = &self.tokens[last_close + 1..brace];
        let tail_ok = match self.dialect {
            Dialect::Java => {
                tail.is_empty()
                    || (tail[0].text == "throws"
                        && tail[1..]
                            .iter()
                            .all(|t| t.is_ident() || matches!(t.text, "." | "," | "<" | ">")))
            }
            Dialect::C => tail.is_empty(),
        };
        if !tail_ok {
            return None;
        }

        let params_close = self.declarator_params(header_start, last_close);
        let params_open = self.partner_of(params_close);
        let name_idx = params_open.checked_sub(1).filter(|&idx| idx >= header_start)?;
        let name = &self.tokens[name_idx];
        if !name.is_ident() || self.dialect.is_keyword(name.text) {
            return None;
        }
        if name_idx > header_start && matches!(self.text(name_idx - 1), "new" | "." | "->") {
            return None;
        }

        Some(Signature {
            name: name.text,
            name_idx,
            params_open,
            params_close,
        })
    }

    /// Closing paren of the function's own parameter list. For a C
    /// function returning a function pointer, `int (*pick(void))(int)`, the
    /// trailing group belongs to the return type and the parameters sit
    /// inside the parenthesized declarator.
    fn declarator_params(&self, header_start: usize, mut params_close: usize) -> usize {
        if self.dialect != Dialect::C {
            return params_close;
        }
        loop {
            let Some(before) = self.partner_of(params_close).checked_sub(1) else {
                return params_close;
            };
            let declarator_open = self.partner_of(before);
            let nested = before > header_start
                && self.text(before) == ")"
                && self.text(before - 1) == ")"
                && declarator_open >= header_start
                && self.text(declarator_open + 1) == "*";
            if !nested {
                return params_close;
            }
            params_close = before - 1;
        }
    }

    fn extract_function(
        &self,
        sig: &Signature<'a>,
        header_start: usize,
        open: usize,
        close: usize,
        owner: Option<&'a str>,
    ) -> FunctionDecl {
        let span = LineSpan::new(self.tokens[sig.name_idx].line, self.tokens[close].line);
        let mut decl = FunctionDecl::new(sig.name, span);
        decl.owner = owner.map(str::to_string);
        decl.is_top_level = owner.is_none();
        decl.is_exported = self
            .dialect
            .is_exported(&self.tokens[header_start..sig.name_idx]);
        decl.parameter_count = self.count_parameters(sig.params_open, sig.params_close);

        self.scan_body(open + 1, close).apply_to_function(&mut decl);
        decl.finish()
    }

    fn count_parameters(&self, open: usize, close: usize) -> usize {
        let params = &self.tokens[open + 1..close];
        if params.is_empty() || (params.len() == 1 && params[0].text == "void") {
            return 0;
        }
        let mut angle_depth = 0usize;
        let mut count = 1;
        let mut idx = open + 1;
        while idx < close {
            match self.text(idx) {
                "(" | "[" | "{" => idx = self.partner_of(idx),
                "<" => angle_depth += 1,
                ">" => angle_depth = angle_depth.saturating_sub(1),
                ">>" => angle_depth = angle_depth.saturating_sub(2),
                "," if angle_depth == 0 => count += 1,
                _ => {}
            }
            idx += 1;
        }
        count
    }

    /// A `;`-terminated statement at file or type scope: a field, global,
    /// prototype, import or similar.
    fn scope_statement(&self, start: usize, end: usize, module: &mut BodyFacts) {
        if start >= end {
            return;
        }
        let names = self.declared_names(start, end);
        if self.dialect.tracks_scope_variable(&self.tokens[start..end]) {
            for &idx in &names {
                module.declare(self.tokens[idx].text, self.tokens[idx].line);
            }
        }
        // Only initializers run at load time; prototypes and bare fields do not.
        if Dialect::opens_statement_only(self.text(start)) {
            return;
        }
        if let Some(assign) = (start..end).find(|&j| self.text(j) == "=") {
            let positions: HashSet<usize> = names.into_iter().collect();
            self.collect_flow(assign + 1, end, &positions, &HashSet::new(), module);
        }
    }

    fn scan_body(&self, start: usize, end: usize) -> BodyFacts {
        let mut facts = BodyFacts::default();
        let trailers = self.collect_loops(start, end, &mut facts);
        let declared = self.collect_locals(start, end, &mut facts);
        self.collect_flow(start, end, &declared, &trailers, &mut facts);
        facts
    }

    /// Record every loop with its depth: 1 plus the number of other loop
    /// statements whose extent contains it. Returns the `while` tokens that
    /// close a `do` loop.
    fn collect_loops(&self, start: usize, end: usize, facts: &mut BodyFacts) -> HashSet<usize> {
        let mut loops: Vec<(usize, usize, LoopKind)> = Vec::new();
        let mut trailers = HashSet::new();
        for idx in start..end {
            if !self.tokens[idx].is_ident() {
                continue;
            }
            match self.text(idx) {
                "for" => loops.push((idx, self.statement_end(idx, end), LoopKind::For)),
                "while" if !trailers.contains(&idx) => {
                    loops.push((idx, self.statement_end(idx, end), LoopKind::While))
                }
                "do" => {
                    let (extent, trailer) = self.do_extent(idx, end);
                    if let Some(trailer) = trailer {
                        trailers.insert(trailer);
                    }
                    loops.push((idx, extent, LoopKind::DoWhile));
                }
                _ => {}
            }
        }

        for &(idx, _, kind) in &loops {
            let enclosing = loops
                .iter()
                .filter(|(other, other_end, _)| *other < idx && idx <= *other_end)
                .count();
            facts.loop_at(enclosing as u32 + 1, kind, self.tokens[idx].line);
        }
        trailers
    }

    /// Index of the last token of the statement starting at `idx`.
    fn statement_end(&self, idx: usize, end: usize) -> usize {
        if idx >= end {
            return end.saturating_sub(1);
        }
        match self.text(idx) {
            "{" => self.partner_of(idx),
            "if" => {
                // `else if` chains are followed iteratively.
                let mut head = idx;
                loop {
                    let last = self.statement_end(self.skip_parens(head + 1), end);
                    if last + 1 >= end || self.text(last + 1) != "else" {
                        return last;
                    }
                    if self.text(last + 2) != "if" {
                        return self.statement_end(last + 2, end);
                    }
                    head = last + 2;
                }
            }
            "for" | "while" | "switch" | "synchronized" => {
                self.statement_end(self.skip_parens(idx + 1), end)
            }
            "do" => self.do_extent(idx, end).0,
            "try" => {
                let mut last = self.statement_end(self.skip_parens(idx + 1), end);
                loop {
                    let next = last + 1;
                    if next >= end {
                        break;
                    }
                    match self.text(next) {
                        "catch" => last = self.statement_end(self.skip_parens(next + 1), end),
                        "finally" => last = self.statement_end(next + 1, end),
                        _ => break,
                    }
                }
                last
            }
            "else" => self.statement_end(idx + 1, end),
            _ => {
                let mut j = idx;
                while j < end {
                    match self.text(j) {
                        ";" => return j,
                        "}" => return j.saturating_sub(1).max(idx),
                        "(" | "[" | "{" => j = self.partner_of(j) + 1,
                        _ => j += 1,
                    }
                }
                end - 1
            }
        }
    }

    /// Extent of a `do ... while (...);` loop and the index of its `while`.
    fn do_extent(&self, idx: usize, end: usize) -> (usize, Option<usize>) {
        let body_end = self.statement_end(idx + 1, end);
        let trailer = body_end + 1;
        if trailer >= end || self.text(trailer) != "while" {
            return (body_end, None);
        }
        let after = self.skip_parens(trailer + 1);
        let last = if after < end && self.text(after) == ";" {
            after
        } else {
            after - 1
        };
        (last, Some(trailer))
    }

    /// Declare locals found at statement starts and in classic `for`
    /// initializers. Returns the token positions of declared names.
    fn collect_locals(&self, start: usize, end: usize, facts: &mut BodyFacts) -> HashSet<usize> {
        let mut positions = HashSet::new();
        let mut paren_depth = 0usize;
        let mut at_statement_start = true;
        let mut idx = start;

        while idx < end {
            let text = self.text(idx);
            if at_statement_start && paren_depth == 0 && self.tokens[idx].is_ident() {
                let stmt_end = self.flat_statement_end(idx, end);
                positions.extend(self.declared_names(idx, stmt_end));
            }
            at_statement_start = false;

            match text {
                "(" => {
                    if idx > start && self.text(idx - 1) == "for" {
                        let close = self.partner_of(idx);
                        if let Some(semi) = (idx + 1..close).find(|&j| self.text(j) == ";") {
                            positions.extend(self.declared_names(idx + 1, semi));
                        }
                    }
                    paren_depth += 1;
                }
                ")" => paren_depth = paren_depth.saturating_sub(1),
                ";" | "{" | "}" | ":" if paren_depth == 0 => at_statement_start = true,
                _ => {}
            }
            idx += 1;
        }

        let mut ordered: Vec<usize> = positions.iter().copied().collect();
        ordered.sort_unstable();
        for pos in ordered {
            facts.declare(self.tokens[pos].text, self.tokens[pos].line);
        }
        positions
    }

    /// End (exclusive) of a simple statement: the next `;`, `{` or `}` outside
    /// brackets.
    fn flat_statement_end(&self, idx: usize, end: usize) -> usize {
        let mut j = idx;
        while j < end {
            match self.text(j) {
                ";" | "}" => return j,
                "{" if !self.statement_has_assignment(idx, j) => return j,
                "(" | "[" | "{" => j = self.partner_of(j) + 1,
                _ => j += 1,
            }
        }
        end
    }

    fn statement_has_assignment(&self, start: usize, end: usize) -> bool {
        (start..end).any(|j| self.text(j) == "=")
    }

    /// Names declared by the statement `[start, end)`, if it is a
    /// declaration such as `int x = 1, y;` or `List<String> names;`.
    fn declared_names(&self, start: usize, end: usize) -> Vec<usize> {
        if start >= end || Dialect::opens_statement_only(self.text(start)) {
            return Vec::new();
        }

        let mut assign = None;
        let mut j = start;
        while j < end {
            match self.text(j) {
                "=" => {
                    assign = Some(j);
                    break;
                }
                "(" | "{" => return Vec::new(),
                "[" => j = self.partner_of(j) + 1,
                _ => j += 1,
            }
        }

        let mut name_end = assign.unwrap_or(end);
        while name_end > start && self.text(name_end - 1) == "]" {
            name_end = self.partner_of(name_end - 1);
        }
        if name_end <= start + 1 {
            return Vec::new();
        }
        let name_idx = name_end - 1;
        if !self.is_plain_name(name_idx) {
            return Vec::new();
        }

        let type_part = &self.tokens[start..name_idx];
        let before = &self.tokens[name_idx - 1];
        let type_ok = type_part
            .iter()
            .all(|t| {
                (t.is_ident() && !Dialect::opens_statement_only(t.text))
                    || TYPE_PUNCTUATION.contains(&t.text)
            })
            && type_part.iter().any(|t| t.is_ident())
            && (before.is_ident() || TYPE_ENDINGS.contains(&before.text));
        if !type_ok {
            return Vec::new();
        }

        let mut names = vec![name_idx];
        if let Some(assign) = assign {
            let mut k = assign + 1;
            while k < end {
                match self.text(k) {
                    "(" | "[" | "{" => k = self.partner_of(k) + 1,
                    "," => {
                        let candidate = k + 1;
                        let follower = self.text(candidate + 1);
                        if candidate < end
                            && self.is_plain_name(candidate)
                            && (candidate + 1 == end || matches!(follower, "=" | "," | "["))
                        {
                            names.push(candidate);
                        }
                        k += 1;
                    }
                    _ => k += 1,
                }
            }
        }
        names
    }

    fn is_plain_name(&self, idx: usize) -> bool {
        self.tokens
            .get(idx)
            .is_some_and(|t| t.is_ident() && !self.dialect.is_keyword(t.text))
    }

    /// `?` is a Java wildcard in `List<?>` and `<? extends T>`.
    fn is_wildcard(&self, idx: usize) -> bool {
        idx > 0
            && matches!(self.text(idx - 1), "<" | ",")
            && matches!(self.text(idx + 1), ">" | ">>" | "extends" | "super" | ",")
    }

    /// `name(...)` followed by a body or `throws` declares rather than calls.
    fn is_declaration_parens(&self, open: usize) -> bool {
        let after = self.partner_of(open) + 1;
        matches!(self.text(after), "{" | "throws")
    }

    /// Decision points, calls, references and statement counts over
    /// `[start, end)`.
    fn collect_flow(
        &self,
        start: usize,
        end: usize,
        declared: &HashSet<usize>,
        trailers: &HashSet<usize>,
        facts: &mut BodyFacts,
    ) {
        let mut paren_depth = 0usize;
        for idx in start..end {
            let token = &self.tokens[idx];
            let prev = if idx > start { self.text(idx - 1) } else { "" };
            match token.kind {
                TokenKind::Ident => match token.text {
                    "if" => {
                        facts.statements += 1;
                        let kind = if prev == "else" {
                            DecisionKind::ElseIf
                        } else {
                            DecisionKind::If
                        };
                        facts.decision(kind, token.line);
                    }
                    "case" => facts.decision(DecisionKind::CaseLabel, token.line),
                    "catch" => facts.decision(DecisionKind::Catch, token.line),
                    "for" | "do" | "switch" | "try" => facts.statements += 1,
                    "while" if !trailers.contains(&idx) => facts.statements += 1,
                    word if self.dialect.is_keyword(word) => {}
                    word => {
                        if self.text(idx + 1) == "(" && !matches!(prev, "new" | "@") {
                            if !self.is_declaration_parens(idx + 1) {
                                facts.call(word, token.line);
                            }
                            continue;
                        }
                        let member_access = matches!(prev, "." | "->")
                            && !(idx >= 2 && self.text(idx - 2) == "this");
                        if !declared.contains(&idx) && prev != "@" && !member_access {
                            facts.reference(word);
                        }
                    }
                },
                TokenKind::Punct => match token.text {
                    "&&" | "||" => facts.decision(DecisionKind::BooleanOperator, token.line),
                    "?" if !self.is_wildcard(idx) => {
                        facts.decision(DecisionKind::Conditional, token.line)
                    }
                    "(" => paren_depth += 1,
                    ")" => paren_depth = paren_depth.saturating_sub(1),
                    ";" if paren_depth == 0 => facts.statements += 1,
                    _ => {}
                },
                _ => {}
            }
        }
    }
}

/// Pair every bracket with its partner, failing on the first mismatch.
fn match_brackets(tokens: &[Token], path: &Path) -> Result<Vec<Option<usize>>, ParseError> {
    let mut partner = vec![None; tokens.len()];
    let mut stack: Vec<usize> = Vec::new();

    for (idx, token) in tokens.iter().enumerate() {
        if token.kind != TokenKind::Punct {
            continue;
        }
        let expected_open = match token.text {
            "(" | "[" | "{" => {
                stack.push(idx);
                continue;
            }
            ")" => "(",
            "]" => "[",
            "}" => "{",
            _ => continue,
        };
        match stack.pop() {
            Some(open) if tokens[open].text == expected_open => {
                partner[open] = Some(idx);
                partner[idx] = Some(open);
            }
            Some(open) => {
                return Err(ParseError::at_line(
                    path,
                    token.line,
                    format!(
                        "mismatched `{}` closing `{}` opened on line {}",
                        token.text, tokens[open].text, tokens[open].line
                    ),
                ));
            }
            None => {
                return Err(ParseError::at_line(
                    path,
                    token.line,
                    format!("unexpected `{}`", token.text),
                ));
            }
        }
    }

    match stack.pop() {
        Some(open) => Err(ParseError::at_line(
            path,
            tokens[open].line,
            format!("unclosed `{}`", tokens[open].text),
        )),
        None => Ok(partner),
    }
}
