//! Recursive-descent parser for declaration files.
//!
//! The parser never fails: errors become diagnostics on the returned
//! [`SourceFile`] and parsing resumes at the next `;` or `}`. Callers decide
//! whether a file with syntax errors may take part in a merge.

use jsm_common::diagnostics::{Diagnostic, diagnostic_codes};
use jsm_common::limits::{MAX_DIAGNOSTICS_PER_FILE, MAX_TYPE_NESTING_DEPTH};
use jsm_common::Span;
use tracing::{debug, trace};

use crate::ast::{
    Directive, FunctionNode, InterfaceNode, Keyword, LiteralType, MemberNode, MemberNodeKind,
    ObjectMember, Param, PropertyName, Signature, SourceFile, Statement, TupleElement,
    TypeAliasNode, TypeNode, TypeParam, VariableKind, VariableNode,
};
use crate::scanner::{ScannerState, SyntaxKind};

/// Parse one declaration file.
#[tracing::instrument(level = "debug", skip(source), fields(len = source.len()))]
pub fn parse_source_file(file_name: &str, source: &str) -> SourceFile {
    let mut parser = ParserState::new(file_name, source);
    let file = parser.parse_source_file();
    debug!(
        statements = file.statements.len(),
        diagnostics = file.diagnostics.len(),
        "parsed declaration file"
    );
    file
}

pub struct ParserState<'a> {
    scanner: ScannerState<'a>,
    diagnostics: Vec<Diagnostic>,
    /// End of the previous token, for statement spans.
    last_token_end: u32,
    type_depth: u32,
    /// Set once the per-file diagnostic limit is hit; parsing stops.
    abandoned: bool,
}

impl<'a> ParserState<'a> {
    pub fn new(file_name: &str, source: &'a str) -> Self {
        ParserState {
            scanner: ScannerState::new(file_name, source),
            diagnostics: Vec::new(),
            last_token_end: 0,
            type_depth: 0,
            abandoned: false,
        }
    }

    pub fn parse_source_file(&mut self) -> SourceFile {
        self.scanner.scan();
        let directives = self.parse_leading_directives();

        let mut statements = Vec::new();
        while self.token() != SyntaxKind::EndOfFile && !self.abandoned {
            if self.token() == SyntaxKind::Semicolon {
                self.next_token();
                continue;
            }
            match self.parse_statement() {
                Some(statement) => statements.push(statement),
                None => self.recover_to_statement(),
            }
        }

        let mut diagnostics = self.scanner.take_diagnostics();
        diagnostics.append(&mut self.diagnostics);
        diagnostics.sort_by_key(|d| d.start);
        if diagnostics.len() > MAX_DIAGNOSTICS_PER_FILE {
            diagnostics.truncate(MAX_DIAGNOSTICS_PER_FILE);
        }

        SourceFile {
            file_name: self.scanner.file_name().to_string(),
            directives,
            statements,
            diagnostics,
        }
    }

    // =========================================================================
    // Token helpers
    // =========================================================================

    fn token(&self) -> SyntaxKind {
        self.scanner.token()
    }

    fn token_value(&self) -> &str {
        self.scanner.get_token_value_ref()
    }

    fn is_identifier(&self, text: &str) -> bool {
        self.scanner.is_identifier_text(text)
    }

    /// Advance, skipping directive lines that appear after the header.
    fn next_token(&mut self) -> SyntaxKind {
        self.last_token_end = self.scanner.token_end();
        loop {
            let kind = self.scanner.scan();
            if kind != SyntaxKind::TripleSlashDirective {
                return kind;
            }
        }
    }

    fn parse_optional(&mut self, kind: SyntaxKind) -> bool {
        if self.token() == kind {
            self.next_token();
            true
        } else {
            false
        }
    }

    fn parse_expected(&mut self, kind: SyntaxKind) -> bool {
        if self.parse_optional(kind) {
            return true;
        }
        self.error_at_current(diagnostic_codes::EXPECTED_TOKEN, &[kind.text()]);
        false
    }

    fn error_at_current(&mut self, code: u32, args: &[&str]) {
        let span = self.scanner.token_span();
        self.error(span, code, args);
    }

    fn error(&mut self, span: Span, code: u32, args: &[&str]) {
        if self.abandoned {
            return;
        }
        // One diagnostic per position keeps cascades quiet.
        if self.diagnostics.last().is_some_and(|d| d.start == span.start) {
            return;
        }
        if self.diagnostics.len() + 1 >= MAX_DIAGNOSTICS_PER_FILE {
            let file = self.scanner.file_name().to_string();
            self.diagnostics.push(Diagnostic::from_code(
                file.clone(),
                span.start,
                span.len(),
                diagnostic_codes::TOO_MANY_ERRORS,
                &[&file],
            ));
            self.abandoned = true;
            return;
        }
        self.diagnostics.push(Diagnostic::from_code(
            self.scanner.file_name().to_string(),
            span.start,
            span.len(),
            code,
            args,
        ));
    }

    fn unexpected_token(&mut self) {
        let text = match self.token() {
            SyntaxKind::Identifier | SyntaxKind::NumericLiteral => self.token_value().to_string(),
            SyntaxKind::StringLiteral => format!("\"{}\"", self.token_value()),
            other => other.text().to_string(),
        };
        self.error_at_current(diagnostic_codes::UNEXPECTED_TOKEN, &[&text]);
    }

    /// Identifier, keyword-as-name included.
    fn parse_identifier(&mut self) -> Option<(String, Span)> {
        if self.token() == SyntaxKind::Identifier {
            let name = self.token_value().to_string();
            let span = self.scanner.token_span();
            self.next_token();
            Some((name, span))
        } else {
            self.error_at_current(diagnostic_codes::EXPECTED_TOKEN, &["identifier"]);
            None
        }
    }

    fn span_from(&self, start: u32) -> Span {
        Span::new(start, self.last_token_end.max(start))
    }

    fn recover_to_statement(&mut self) {
        let mut depth = 0u32;
        loop {
            match self.token() {
                SyntaxKind::EndOfFile => return,
                SyntaxKind::OpenBrace => depth += 1,
                SyntaxKind::CloseBrace => {
                    if depth <= 1 {
                        self.next_token();
                        return;
                    }
                    depth -= 1;
                }
                SyntaxKind::Semicolon if depth == 0 => {
                    self.next_token();
                    return;
                }
                SyntaxKind::Identifier
                    if depth == 0
                        && self.scanner.has_preceding_line_break()
                        && matches!(self.token_value(), "interface" | "declare" | "type") =>
                {
                    return;
                }
                _ => {}
            }
            self.next_token();
        }
    }

    // =========================================================================
    // Directives
    // =========================================================================

    fn parse_leading_directives(&mut self) -> Vec<Directive> {
        let mut directives = Vec::new();
        while self.token() == SyntaxKind::TripleSlashDirective {
            let text = self.token_value().to_string();
            let span = self.scanner.token_span();
            if text.starts_with('<') {
                match parse_directive_text(&text) {
                    Some((name, attributes)) => directives.push(Directive { name, attributes, span }),
                    None => self.error(span, diagnostic_codes::MALFORMED_DIRECTIVE, &[&text]),
                }
            }
            self.last_token_end = self.scanner.token_end();
            self.scanner.scan();
        }
        trace!(count = directives.len(), "directives");
        directives
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn parse_statement(&mut self) -> Option<Statement> {
        let start = self.scanner.token_pos();
        if self.token() != SyntaxKind::Identifier {
            self.error_at_current(diagnostic_codes::DECLARATION_EXPECTED, &[]);
            return None;
        }

        let declared = self.is_identifier("declare");
        if declared {
            self.next_token();
        }

        let keyword = self.token_value().to_string();
        match keyword.as_str() {
            "interface" => self.parse_interface(start).map(Statement::Interface),
            "type" => self.parse_type_alias(start).map(Statement::TypeAlias),
            "var" | "let" | "const" if declared => self.parse_variable(start).map(Statement::Variable),
            "function" if declared => self.parse_function(start).map(Statement::Function),
            _ => {
                self.error_at_current(diagnostic_codes::DECLARATION_EXPECTED, &[]);
                None
            }
        }
    }

    fn parse_interface(&mut self, start: u32) -> Option<InterfaceNode> {
        self.next_token();
        let (name, name_span) = self.parse_identifier()?;
        let type_params = self.parse_type_parameters();

        let mut heritage = Vec::new();
        if self.is_identifier("extends") {
            self.next_token();
            loop {
                heritage.push(self.parse_type_reference()?);
                if !self.parse_optional(SyntaxKind::Comma) {
                    break;
                }
            }
        }

        let members = self.parse_member_block()?;
        Some(InterfaceNode {
            name,
            type_params,
            heritage,
            members,
            span: self.span_from(start),
            name_span,
        })
    }

    fn parse_type_alias(&mut self, start: u32) -> Option<TypeAliasNode> {
        self.next_token();
        let (name, name_span) = self.parse_identifier()?;
        let type_params = self.parse_type_parameters();
        if !self.parse_expected(SyntaxKind::Equals) {
            return None;
        }
        let ty = self.parse_type()?;
        self.parse_semicolon();
        Some(TypeAliasNode {
            name,
            type_params,
            ty,
            span: self.span_from(start),
            name_span,
        })
    }

    fn parse_variable(&mut self, start: u32) -> Option<VariableNode> {
        let kind = match self.token_value() {
            "let" => VariableKind::Let,
            "const" => VariableKind::Const,
            _ => VariableKind::Var,
        };
        self.next_token();
        let (name, name_span) = self.parse_identifier()?;
        let ty = if self.parse_optional(SyntaxKind::Colon) {
            self.parse_type()?
        } else {
            TypeNode::Keyword(Keyword::Any)
        };
        self.parse_semicolon();
        Some(VariableNode {
            kind,
            name,
            ty,
            span: self.span_from(start),
            name_span,
        })
    }

    fn parse_function(&mut self, start: u32) -> Option<FunctionNode> {
        self.next_token();
        let (name, name_span) = self.parse_identifier()?;
        let signature = self.parse_signature(SyntaxKind::Colon)?;
        self.parse_semicolon();
        Some(FunctionNode {
            name,
            signature,
            span: self.span_from(start),
            name_span,
        })
    }

    fn parse_semicolon(&mut self) {
        if self.parse_optional(SyntaxKind::Semicolon) {
            return;
        }
        if self.token() == SyntaxKind::CloseBrace
            || self.token() == SyntaxKind::EndOfFile
            || self.scanner.has_preceding_line_break()
        {
            return;
        }
        self.error_at_current(diagnostic_codes::EXPECTED_TOKEN, &[";"]);
    }

    // =========================================================================
    // Members
    // =========================================================================

    fn parse_member_block(&mut self) -> Option<Vec<MemberNode>> {
        if !self.parse_expected(SyntaxKind::OpenBrace) {
            return None;
        }
        let mut members = Vec::new();
        while !matches!(self.token(), SyntaxKind::CloseBrace | SyntaxKind::EndOfFile) && !self.abandoned {
            if matches!(self.token(), SyntaxKind::Semicolon | SyntaxKind::Comma) {
                self.next_token();
                continue;
            }
            match self.parse_member() {
                Some(member) => members.push(member),
                None => self.recover_to_member(),
            }
        }
        self.parse_expected(SyntaxKind::CloseBrace);
        Some(members)
    }

    fn recover_to_member(&mut self) {
        let mut depth = 0u32;
        loop {
            match self.token() {
                SyntaxKind::EndOfFile => return,
                SyntaxKind::OpenBrace | SyntaxKind::OpenParen | SyntaxKind::OpenBracket => depth += 1,
                SyntaxKind::CloseParen | SyntaxKind::CloseBracket => depth = depth.saturating_sub(1),
                SyntaxKind::CloseBrace => {
                    if depth == 0 {
                        return;
                    }
                    depth -= 1;
                }
                SyntaxKind::Semicolon | SyntaxKind::Comma if depth == 0 => {
                    self.next_token();
                    return;
                }
                _ if depth == 0 && self.scanner.has_preceding_line_break() => return,
                _ => {}
            }
            self.next_token();
        }
    }

    fn parse_member(&mut self) -> Option<MemberNode> {
        let start = self.scanner.token_pos();

        if matches!(self.token(), SyntaxKind::OpenParen | SyntaxKind::LessThan) {
            let signature = self.parse_signature(SyntaxKind::Colon)?;
            return Some(self.finish_member(start, MemberNodeKind::Call(signature)));
        }
        if self.is_identifier("new") && self.next_is(|k| matches!(k, SyntaxKind::OpenParen | SyntaxKind::LessThan)) {
            self.next_token();
            let signature = self.parse_signature(SyntaxKind::Colon)?;
            return Some(self.finish_member(start, MemberNodeKind::Construct(signature)));
        }

        let readonly = self.is_identifier("readonly")
            && self.next_is(|k| {
                matches!(
                    k,
                    SyntaxKind::Identifier
                        | SyntaxKind::StringLiteral
                        | SyntaxKind::NumericLiteral
                        | SyntaxKind::OpenBracket
                )
            });
        if readonly {
            self.next_token();
        }

        if self.token() == SyntaxKind::OpenBracket && self.is_index_signature_start() {
            self.next_token();
            let (key_name, _) = self.parse_identifier()?;
            self.parse_expected(SyntaxKind::Colon);
            let key_type = self.parse_type()?;
            if !self.parse_expected(SyntaxKind::CloseBracket) || !self.parse_expected(SyntaxKind::Colon) {
                return None;
            }
            let ty = self.parse_type()?;
            let kind = MemberNodeKind::Index { readonly, key_name, key_type, ty };
            return Some(self.finish_member(start, kind));
        }

        let name = self.parse_property_name()?;
        let optional = self.parse_optional(SyntaxKind::Question);

        if !readonly && matches!(self.token(), SyntaxKind::OpenParen | SyntaxKind::LessThan) {
            let signature = self.parse_signature(SyntaxKind::Colon)?;
            let kind = MemberNodeKind::Method { name, optional, signature };
            return Some(self.finish_member(start, kind));
        }

        let ty = if self.parse_optional(SyntaxKind::Colon) {
            self.parse_type()?
        } else {
            TypeNode::Keyword(Keyword::Any)
        };
        Some(self.finish_member(start, MemberNodeKind::Property { name, readonly, optional, ty }))
    }

    fn finish_member(&mut self, start: u32, kind: MemberNodeKind) -> MemberNode {
        let span = self.span_from(start);
        if !matches!(
            self.token(),
            SyntaxKind::Semicolon | SyntaxKind::Comma | SyntaxKind::CloseBrace | SyntaxKind::EndOfFile
        ) && !self.scanner.has_preceding_line_break()
        {
            self.error_at_current(diagnostic_codes::EXPECTED_TOKEN, &[";"]);
        }
        MemberNode { kind, span }
    }

    fn parse_property_name(&mut self) -> Option<PropertyName> {
        let name = match self.token() {
            SyntaxKind::Identifier => PropertyName::Identifier(self.token_value().to_string()),
            SyntaxKind::StringLiteral => PropertyName::String(self.token_value().to_string()),
            SyntaxKind::NumericLiteral => PropertyName::Numeric(self.token_value().to_string()),
            SyntaxKind::OpenBracket => {
                self.next_token();
                let mut expr = self.parse_identifier()?.0;
                while self.parse_optional(SyntaxKind::Dot) {
                    expr.push('.');
                    expr.push_str(&self.parse_identifier()?.0);
                }
                if self.token() != SyntaxKind::CloseBracket {
                    self.parse_expected(SyntaxKind::CloseBracket);
                    return None;
                }
                PropertyName::Computed(expr)
            }
            _ => {
                self.unexpected_token();
                return None;
            }
        };
        self.next_token();
        Some(name)
    }

    /// `[` identifier `:` marks an index signature; anything else is a computed name.
    fn is_index_signature_start(&mut self) -> bool {
        let snapshot = self.scanner.save_state();
        self.scanner.scan();
        let result = self.scanner.token() == SyntaxKind::Identifier && self.scanner.scan() == SyntaxKind::Colon;
        self.scanner.restore_state(snapshot);
        result
    }

    /// `name:` or `name?:` inside a tuple.
    fn is_named_tuple_member(&mut self) -> bool {
        let snapshot = self.scanner.save_state();
        let result = match self.scanner.scan() {
            SyntaxKind::Colon => true,
            SyntaxKind::Question => self.scanner.scan() == SyntaxKind::Colon,
            _ => false,
        };
        self.scanner.restore_state(snapshot);
        result
    }

    fn next_is(&mut self, predicate: impl FnOnce(SyntaxKind) -> bool) -> bool {
        let snapshot = self.scanner.save_state();
        let next = self.scanner.scan();
        self.scanner.restore_state(snapshot);
        predicate(next)
    }

    // =========================================================================
    // Signatures
    // =========================================================================

    fn parse_type_parameters(&mut self) -> Vec<TypeParam> {
        let mut params = Vec::new();
        if !self.parse_optional(SyntaxKind::LessThan) {
            return params;
        }
        while self.token() != SyntaxKind::GreaterThan {
            let Some((name, _)) = self.parse_identifier() else {
                break;
            };
            let constraint = if self.is_identifier("extends") {
                self.next_token();
                self.parse_type()
            } else {
                None
            };
            let default = if self.parse_optional(SyntaxKind::Equals) {
                self.parse_type()
            } else {
                None
            };
            params.push(TypeParam { name, constraint, default });
            if !self.parse_optional(SyntaxKind::Comma) {
                break;
            }
        }
        self.parse_expected(SyntaxKind::GreaterThan);
        params
    }

    /// `<T>(params) <return_marker> R`. The marker is `:` for members and
    /// declared functions and `=>` for function types.
    fn parse_signature(&mut self, return_marker: SyntaxKind) -> Option<Signature> {
        let type_params = self.parse_type_parameters();
        if !self.parse_expected(SyntaxKind::OpenParen) {
            return None;
        }
        let mut params = Vec::new();
        while self.token() != SyntaxKind::CloseParen {
            let rest = self.parse_optional(SyntaxKind::DotDotDot);
            let (name, _) = self.parse_identifier()?;
            let optional = self.parse_optional(SyntaxKind::Question);
            let ty = if self.parse_optional(SyntaxKind::Colon) {
                self.parse_type()?
            } else {
                TypeNode::Keyword(Keyword::Any)
            };
            params.push(Param { name, ty, optional, rest });
            if !self.parse_optional(SyntaxKind::Comma) {
                break;
            }
        }
        if !self.parse_expected(SyntaxKind::CloseParen) {
            return None;
        }

        let return_type = if return_marker == SyntaxKind::EqualsGreaterThan {
            if !self.parse_expected(SyntaxKind::EqualsGreaterThan) {
                return None;
            }
            self.parse_return_type()?
        } else if self.parse_optional(return_marker) {
            self.parse_return_type()?
        } else {
            TypeNode::Keyword(Keyword::Any)
        };

        Some(Signature { type_params, params, return_type })
    }

    fn parse_return_type(&mut self) -> Option<TypeNode> {
        if self.token() == SyntaxKind::Identifier {
            let snapshot = self.scanner.save_state();
            let parameter = self.token_value().to_string();
            let next = self.scanner.scan();
            if next == SyntaxKind::Identifier
                && self.scanner.get_token_value_ref() == "is"
                && !self.scanner.has_preceding_line_break()
            {
                self.next_token();
                let ty = self.parse_type()?;
                return Some(TypeNode::Predicate { parameter, ty: Box::new(ty) });
            }
            self.scanner.restore_state(snapshot);
        }
        self.parse_type()
    }

    // =========================================================================
    // Types
    // =========================================================================

    pub fn parse_type(&mut self) -> Option<TypeNode> {
        self.type_depth += 1;
        let result = if self.type_depth > MAX_TYPE_NESTING_DEPTH {
            let depth = MAX_TYPE_NESTING_DEPTH.to_string();
            self.error_at_current(diagnostic_codes::TYPE_NESTING_TOO_DEEP, &[&depth]);
            self.abandoned = true;
            None
        } else {
            self.parse_type_worker()
        };
        self.type_depth -= 1;
        result
    }

    fn parse_type_worker(&mut self) -> Option<TypeNode> {
        if self.token() == SyntaxKind::LessThan || self.is_start_of_function_type() {
            let signature = self.parse_signature(SyntaxKind::EqualsGreaterThan)?;
            return Some(TypeNode::Function(Box::new(signature)));
        }
        if self.is_identifier("new") && self.next_is(|k| matches!(k, SyntaxKind::OpenParen | SyntaxKind::LessThan)) {
            self.next_token();
            let signature = self.parse_signature(SyntaxKind::EqualsGreaterThan)?;
            return Some(TypeNode::Constructor(Box::new(signature)));
        }
        self.parse_union_type()
    }

    fn is_start_of_function_type(&mut self) -> bool {
        if self.token() != SyntaxKind::OpenParen {
            return false;
        }
        let snapshot = self.scanner.save_state();
        let result = match self.scanner.scan() {
            SyntaxKind::CloseParen | SyntaxKind::DotDotDot => true,
            SyntaxKind::Identifier => match self.scanner.scan() {
                SyntaxKind::Colon | SyntaxKind::Comma | SyntaxKind::Question | SyntaxKind::Equals => true,
                SyntaxKind::CloseParen => self.scanner.scan() == SyntaxKind::EqualsGreaterThan,
                _ => false,
            },
            _ => false,
        };
        self.scanner.restore_state(snapshot);
        result
    }

    fn parse_union_type(&mut self) -> Option<TypeNode> {
        self.parse_optional(SyntaxKind::Bar);
        let first = self.parse_intersection_type()?;
        if self.token() != SyntaxKind::Bar {
            return Some(first);
        }
        let mut types = vec![first];
        while self.parse_optional(SyntaxKind::Bar) {
            types.push(self.parse_intersection_or_function()?);
        }
        Some(TypeNode::Union(types))
    }

    fn parse_intersection_or_function(&mut self) -> Option<TypeNode> {
        if self.token() == SyntaxKind::LessThan || self.is_start_of_function_type() {
            let signature = self.parse_signature(SyntaxKind::EqualsGreaterThan)?;
            return Some(TypeNode::Function(Box::new(signature)));
        }
        self.parse_intersection_type()
    }

    fn parse_intersection_type(&mut self) -> Option<TypeNode> {
        self.parse_optional(SyntaxKind::Ampersand);
        let first = self.parse_type_operator()?;
        if self.token() != SyntaxKind::Ampersand {
            return Some(first);
        }
        let mut types = vec![first];
        while self.parse_optional(SyntaxKind::Ampersand) {
            types.push(self.parse_type_operator()?);
        }
        Some(TypeNode::Intersection(types))
    }

    fn parse_type_operator(&mut self) -> Option<TypeNode> {
        if self.is_identifier("keyof")
            && self.next_is(|k| {
                matches!(
                    k,
                    SyntaxKind::Identifier | SyntaxKind::OpenParen | SyntaxKind::OpenBrace | SyntaxKind::OpenBracket
                )
            }) {
            self.next_token();
            let operand = self.parse_type_operator()?;
            return Some(TypeNode::KeyOf(Box::new(operand)));
        }
        if self.is_identifier("readonly")
            && self.next_is(|k| matches!(k, SyntaxKind::Identifier | SyntaxKind::OpenBracket | SyntaxKind::OpenParen))
        {
            self.next_token();
            let operand = self.parse_type_operator()?;
            return Some(TypeNode::Readonly(Box::new(operand)));
        }
        self.parse_postfix_type()
    }

    fn parse_postfix_type(&mut self) -> Option<TypeNode> {
        let mut ty = self.parse_primary_type()?;
        while self.token() == SyntaxKind::OpenBracket
            && !self.scanner.has_preceding_line_break()
            && self.next_is(|k| k == SyntaxKind::CloseBracket)
        {
            self.next_token();
            self.next_token();
            ty = TypeNode::Array(Box::new(ty));
        }
        Some(ty)
    }

    fn parse_primary_type(&mut self) -> Option<TypeNode> {
        match self.token() {
            SyntaxKind::Identifier => {
                if let Some(keyword) = Keyword::from_text(self.token_value())
                    && !self.next_is(|k| k == SyntaxKind::Dot)
                {
                    self.next_token();
                    return Some(TypeNode::Keyword(keyword));
                }
                let value = match self.token_value() {
                    "true" => Some(true),
                    "false" => Some(false),
                    _ => None,
                };
                match value {
                    Some(value) => {
                        self.next_token();
                        Some(TypeNode::Literal(LiteralType::Boolean(value)))
                    }
                    None => self.parse_type_reference(),
                }
            }
            SyntaxKind::StringLiteral => {
                let value = self.token_value().to_string();
                self.next_token();
                Some(TypeNode::Literal(LiteralType::String(value)))
            }
            SyntaxKind::NumericLiteral => {
                let value = self.token_value().to_string();
                self.next_token();
                Some(TypeNode::Literal(LiteralType::Number(value)))
            }
            SyntaxKind::Minus if self.next_is(|k| k == SyntaxKind::NumericLiteral) => {
                self.next_token();
                let value = format!("-{}", self.token_value());
                self.next_token();
                Some(TypeNode::Literal(LiteralType::Number(value)))
            }
            SyntaxKind::OpenParen => {
                self.next_token();
                let inner = self.parse_type()?;
                self.parse_expected(SyntaxKind::CloseParen);
                Some(inner)
            }
            SyntaxKind::OpenBrace => {
                let members = self.parse_member_block()?;
                Some(TypeNode::Object(members.into_iter().map(|m| ObjectMember::from(m.kind)).collect()))
            }
            SyntaxKind::OpenBracket => self.parse_tuple_type(),
            _ => {
                self.error_at_current(diagnostic_codes::TYPE_EXPECTED, &[]);
                None
            }
        }
    }

    fn parse_type_reference(&mut self) -> Option<TypeNode> {
        let (mut name, _) = self.parse_identifier()?;
        while self.parse_optional(SyntaxKind::Dot) {
            name.push('.');
            name.push_str(&self.parse_identifier()?.0);
        }
        let mut args = Vec::new();
        if self.token() == SyntaxKind::LessThan && !self.scanner.has_preceding_line_break() {
            self.next_token();
            while self.token() != SyntaxKind::GreaterThan {
                args.push(self.parse_type()?);
                if !self.parse_optional(SyntaxKind::Comma) {
                    break;
                }
            }
            if !self.parse_expected(SyntaxKind::GreaterThan) {
                return None;
            }
        }
        Some(TypeNode::Reference { name, args })
    }

    fn parse_tuple_type(&mut self) -> Option<TypeNode> {
        self.next_token();
        let mut elements = Vec::new();
        while self.token() != SyntaxKind::CloseBracket {
            let rest = self.parse_optional(SyntaxKind::DotDotDot);
            // Named members: `[start: int, end?: int]`
            let named_optional = if self.token() == SyntaxKind::Identifier && self.is_named_tuple_member() {
                self.next_token();
                let optional = self.parse_optional(SyntaxKind::Question);
                self.parse_expected(SyntaxKind::Colon);
                optional
            } else {
                false
            };
            let ty = self.parse_type()?;
            let optional = named_optional || self.parse_optional(SyntaxKind::Question);
            elements.push(TupleElement { ty, optional, rest });
            if !self.parse_optional(SyntaxKind::Comma) {
                break;
            }
        }
        if !self.parse_expected(SyntaxKind::CloseBracket) {
            return None;
        }
        Some(TypeNode::Tuple(elements))
    }
}

/// Split `<name key="value" ... />` into its tag name and attributes.
pub(crate) fn parse_directive_text(text: &str) -> Option<(String, Vec<(String, String)>)> {
    let body = text.strip_prefix('<')?.trim_end();
    let body = body.strip_suffix("/>").or_else(|| body.strip_suffix('>'))?.trim();

    let name_end = body.find(char::is_whitespace).unwrap_or(body.len());
    let name = &body[..name_end];
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return None;
    }

    let mut attributes = Vec::new();
    let mut rest = body[name_end..].trim_start();
    while !rest.is_empty() {
        let eq = rest.find('=')?;
        let key = rest[..eq].trim();
        if key.is_empty() || key.contains(char::is_whitespace) {
            return None;
        }
        let after = rest[eq + 1..].trim_start();
        let quote = after.chars().next().filter(|c| *c == '"' || *c == '\'')?;
        let close = after[1..].find(quote)?;
        attributes.push((key.to_string(), after[1..1 + close].to_string()));
        rest = after[close + 2..].trim_start();
    }
    Some((name.to_string(), attributes))
}

