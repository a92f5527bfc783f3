//! Binding: parsed declaration files to [`DeclarationSet`]s.
//!
//! Reads the `/// <set ... />` header and `/// <reference set="..." />`
//! directives, converts statements into the declaration model and merges
//! repeated declarations within the file (methods and functions gather
//! overloads).

use jsm_common::Span;
use jsm_common::diagnostics::{Diagnostic, diagnostic_codes};
use jsm_syntax::ast::{InterfaceNode, MemberNode, MemberNodeKind, SourceFile, Statement};
use jsm_syntax::parse_source_file;
use smallvec::smallvec;
use tracing::debug;

use crate::decl::{
    DeclarationSet, Declarations, FunctionDecl, IndexKeyKind, InterfaceDecl, Member, MemberFlags,
    MemberKey, MemberKind, Origin, SetKind, TypeAliasDecl, TypeDecl, ValueDecl, VariableDecl,
};
use crate::merge::{MemberPolicy, merge_declarations, merge_interfaces_with};
use crate::mode::Mode;
use crate::relate::AssignabilityChecker;

/// Parse and bind one declaration file.
pub fn parse_declaration_set(file_name: &str, source: &str) -> Result<DeclarationSet, Vec<Diagnostic>> {
    let file = parse_source_file(file_name, source);
    bind_source_file(&file)
}

/// Bind a parsed file. Syntax errors, a missing or malformed header and
/// conflicting repeated declarations are all returned together.
#[tracing::instrument(level = "debug", skip(file), fields(file = %file.file_name))]
pub fn bind_source_file(file: &SourceFile) -> Result<DeclarationSet, Vec<Diagnostic>> {
    let mut diagnostics: Vec<Diagnostic> = file.diagnostics.iter().filter(|d| d.is_error()).cloned().collect();

    let header = read_header(file, &mut diagnostics);
    let (id, kind, version, deprecated) = match header {
        Some(header) => header,
        None => (String::new(), SetKind::Base, String::new(), false),
    };

    let references = file
        .directives
        .iter()
        .filter(|d| d.name == "reference")
        .filter_map(|d| match d.attribute("set") {
            Some(set) => Some(set.to_string()),
            None => {
                diagnostics.push(directive_error(file, d.span, "reference"));
                None
            }
        })
        .collect();

    let mut binder = Binder {
        set_id: &id,
        file_name: &file.file_name,
        declarations: Declarations::default(),
        diagnostics: Vec::new(),
    };
    for statement in &file.statements {
        binder.bind_statement(statement);
    }
    diagnostics.append(&mut binder.diagnostics);
    let declarations = binder.declarations;

    if !diagnostics.is_empty() {
        return Err(diagnostics);
    }

    debug!(
        id = %id,
        types = declarations.types.len(),
        values = declarations.values.len(),
        "bound declaration set"
    );
    Ok(DeclarationSet {
        id,
        version,
        kind,
        deprecated,
        file: file.file_name.clone(),
        references,
        declarations,
    })
}

fn directive_error(file: &SourceFile, span: Span, name: &str) -> Diagnostic {
    Diagnostic::from_code(
        file.file_name.clone(),
        span.start,
        span.len(),
        diagnostic_codes::MALFORMED_DIRECTIVE,
        &[name],
    )
}

fn read_header(file: &SourceFile, diagnostics: &mut Vec<Diagnostic>) -> Option<(String, SetKind, String, bool)> {
    let Some(directive) = file.directive("set") else {
        diagnostics.push(Diagnostic::from_code(
            file.file_name.clone(),
            0,
            0,
            diagnostic_codes::MISSING_SET_HEADER,
            &[&file.file_name],
        ));
        return None;
    };

    let Some(id) = directive.attribute("id").filter(|id| !id.is_empty()) else {
        diagnostics.push(directive_error(file, directive.span, "set"));
        return None;
    };

    let kind = match directive.attribute("mode") {
        None => SetKind::Base,
        Some(text) => match text.parse::<Mode>() {
            Ok(mode) => SetKind::Mode(mode),
            Err(_) => {
                diagnostics.push(Diagnostic::from_code(
                    file.file_name.clone(),
                    directive.span.start,
                    directive.span.len(),
                    diagnostic_codes::UNKNOWN_MODE,
                    &[text, &Mode::expected_list()],
                ));
                return None;
            }
        },
    };

    let version = directive.attribute("version").unwrap_or("0.0.0").to_string();
    let deprecated = directive.attribute("deprecated").is_some_and(|v| v.eq_ignore_ascii_case("true"));
    Some((id.to_string(), kind, version, deprecated))
}

struct Binder<'a> {
    set_id: &'a str,
    file_name: &'a str,
    declarations: Declarations,
    diagnostics: Vec<Diagnostic>,
}

impl Binder<'_> {
    fn origin(&self, span: Span) -> Origin {
        Origin::new(self.set_id, self.file_name, span)
    }

    fn bind_statement(&mut self, statement: &Statement) {
        let mut single = Declarations::default();
        match statement {
            Statement::Interface(node) => {
                let decl = self.bind_interface(node);
                single.types.insert(decl.name.clone(), TypeDecl::Interface(decl));
            }
            Statement::TypeAlias(node) => {
                let decl = TypeAliasDecl {
                    name: node.name.clone(),
                    type_params: node.type_params.clone(),
                    ty: node.ty.clone(),
                    origin: self.origin(node.span),
                };
                single.types.insert(decl.name.clone(), TypeDecl::Alias(decl));
            }
            Statement::Variable(node) => {
                let decl = VariableDecl {
                    name: node.name.clone(),
                    kind: node.kind,
                    ty: node.ty.clone(),
                    origin: self.origin(node.span),
                };
                single.values.insert(decl.name.clone(), ValueDecl::Variable(decl));
            }
            Statement::Function(node) => {
                let decl = FunctionDecl {
                    name: node.name.clone(),
                    overloads: smallvec![node.signature.clone()],
                    origin: self.origin(node.span),
                };
                single.values.insert(decl.name.clone(), ValueDecl::Function(decl));
            }
        }
        let mut conflicts = merge_declarations(&mut self.declarations, &single, MemberPolicy::Overload);
        self.diagnostics.append(&mut conflicts);
    }

    fn bind_interface(&mut self, node: &InterfaceNode) -> InterfaceDecl {
        let mut decl = InterfaceDecl {
            name: node.name.clone(),
            type_params: node.type_params.clone(),
            extends: node.heritage.clone(),
            members: Default::default(),
            origin: self.origin(node.span),
        };

        // Members of one body merge like repeated declarations in one file.
        let mut checker = AssignabilityChecker::new();
        for member_node in &node.members {
            let member = self.bind_member(member_node);
            let mut single = InterfaceDecl::new(&decl.name);
            single.type_params = decl.type_params.clone();
            single.origin = decl.origin.clone();
            single.members.insert(member.key.clone(), member);
            let merged = merge_interfaces_with(&mut checker, &decl, &single, MemberPolicy::Overload);
            self.diagnostics.extend(merged.conflicts);
            decl = merged.value;
        }
        decl
    }

    fn bind_member(&self, node: &MemberNode) -> Member {
        let origin = self.origin(node.span);
        let (key, name, kind, flags) = match &node.kind {
            MemberNodeKind::Property { name, readonly, optional, ty } => (
                MemberKey::Named(name.key()),
                Some(name.clone()),
                MemberKind::Property(ty.clone()),
                flags(*readonly, *optional),
            ),
            MemberNodeKind::Method { name, optional, signature } => (
                MemberKey::Named(name.key()),
                Some(name.clone()),
                MemberKind::Method(smallvec![signature.clone()]),
                flags(false, *optional),
            ),
            MemberNodeKind::Index { readonly, key_name, key_type, ty } => (
                MemberKey::Index(IndexKeyKind::of(key_type)),
                None,
                MemberKind::Index {
                    key_name: key_name.clone(),
                    key_type: key_type.clone(),
                    value: ty.clone(),
                },
                flags(*readonly, false),
            ),
            MemberNodeKind::Call(signature) => (
                MemberKey::Call,
                None,
                MemberKind::Call(smallvec![signature.clone()]),
                MemberFlags::empty(),
            ),
            MemberNodeKind::Construct(signature) => (
                MemberKey::Construct,
                None,
                MemberKind::Construct(smallvec![signature.clone()]),
                MemberFlags::empty(),
            ),
        };
        Member { key, name, kind, flags, origin }
    }
}

fn flags(readonly: bool, optional: bool) -> MemberFlags {
    let mut flags = MemberFlags::empty();
    flags.set(MemberFlags::READONLY, readonly);
    flags.set(MemberFlags::OPTIONAL, optional);
    flags
}

