//! Index type consistency.
//!
//! Lengths, indices, counts and positions must be typed with the index type
//! everywhere on the surface. Members are recognised by name: property names
//! like `length`, methods returning a position like `indexOf`, and
//! parameters like `fromIndex` (callback parameters included, so
//! `map((value, index) => ...)` is covered). Numeric index signature keys
//! count too.
//!
//! Non-generic aliases are expanded first, so `type Num = number` cannot hide
//! a `number`. Anything other than `int` or an integral literal in one of
//! these positions is reported.

use indexmap::IndexMap;
use jsm_common::diagnostics::{Diagnostic, diagnostic_codes};
use jsm_common::limits::MAX_RELATION_DEPTH;
use jsm_syntax::ast::{Signature, TypeNode};

use crate::decl::{Declarations, MemberKey, MemberKind, Origin, TypeDecl, TypeExpr, ValueDecl};
use crate::index::{INDEX_TYPE_NAME, is_index_valued, is_plain_number};
use crate::relate::expand_alias;

/// Properties holding a length, count or position.
pub const INDEX_PROPERTIES: &[&str] = &["length", "size", "lastIndex", "index"];

/// Methods whose result is a position or a new length.
pub const INDEX_RETURNING_METHODS: &[&str] = &[
    "indexOf",
    "lastIndexOf",
    "findIndex",
    "findLastIndex",
    "search",
    "push",
    "unshift",
];

/// Parameter names that denote an index, length, count or position.
pub const INDEX_PARAMETERS: &[&str] = &[
    "index",
    "currentIndex",
    "fromIndex",
    "start",
    "end",
    "from",
    "length",
    "limit",
    "depth",
    "count",
    "position",
    "pos",
    "deleteCount",
    "targetLength",
    "maxLength",
    "arrayLength",
];

/// Parameter names that denote a position only when numeric: `target` is an
/// index in `copyWithin` and an object in `Object.assign`.
pub const NUMERIC_INDEX_PARAMETERS: &[&str] = &["target"];

/// Every member of `declarations` that should use the index type but does not.
pub fn audit_index_types(declarations: &Declarations) -> Vec<Diagnostic> {
    let mut auditor = Auditor { types: &declarations.types, diagnostics: Vec::new() };

    for (name, decl) in &declarations.types {
        let TypeDecl::Interface(interface) = decl else {
            continue;
        };
        for (key, member) in &interface.members {
            let origin = &member.origin;
            match (&member.kind, key) {
                (MemberKind::Property(ty), MemberKey::Named(member_name)) => {
                    if INDEX_PROPERTIES.contains(&member_name.as_str()) {
                        auditor.check(ty, member_name, name, origin);
                    }
                    if let TypeNode::Function(signature) = ty {
                        auditor.check_signature(signature, member_name, &format!("{name}.{member_name}"), origin);
                    }
                }
                (MemberKind::Index { key_type, .. }, _) => {
                    auditor.check_numeric(key_type, &member.describe(), name, origin);
                }
                (MemberKind::Method(overloads), MemberKey::Named(member_name)) => {
                    let owner = format!("{name}.{member_name}");
                    for signature in overloads {
                        auditor.check_signature(signature, member_name, &owner, origin);
                    }
                }
                (MemberKind::Call(overloads) | MemberKind::Construct(overloads), _) => {
                    let owner = format!("{name}{key}");
                    for signature in overloads {
                        auditor.check_signature(signature, "", &owner, origin);
                    }
                }
                _ => {}
            }
        }
    }

    for (name, decl) in &declarations.values {
        if let ValueDecl::Function(function) = decl {
            for signature in &function.overloads {
                auditor.check_signature(signature, name, name, &function.origin);
            }
        }
    }

    auditor.diagnostics
}

struct Auditor<'a> {
    types: &'a IndexMap<String, TypeDecl>,
    diagnostics: Vec<Diagnostic>,
}

impl Auditor<'_> {
    /// Report `ty` unless it is index valued.
    fn check(&mut self, ty: &TypeExpr, member: &str, owner: &str, origin: &Origin) {
        if !is_index_valued(&self.resolve(ty, 0)) {
            self.report(member, owner, ty, origin);
        }
    }

    /// Report `ty` only when it is a number that is not index valued.
    fn check_numeric(&mut self, ty: &TypeExpr, member: &str, owner: &str, origin: &Origin) {
        if is_plain_number(&self.resolve(ty, 0)) {
            self.report(member, owner, ty, origin);
        }
    }

    /// Expand aliases at the top level and through unions.
    fn resolve(&self, ty: &TypeExpr, depth: u32) -> TypeExpr {
        if depth < MAX_RELATION_DEPTH {
            if let Some(expanded) = expand_alias(self.types, ty) {
                return self.resolve(expanded, depth + 1);
            }
            if let TypeNode::Union(members) = ty {
                return TypeNode::Union(members.iter().map(|member| self.resolve(member, depth + 1)).collect());
            }
        }
        ty.clone()
    }

    fn report(&mut self, member: &str, owner: &str, found: &TypeExpr, origin: &Origin) {
        self.diagnostics.push(Diagnostic::from_code(
            origin.file.clone(),
            origin.span.start,
            origin.span.len(),
            diagnostic_codes::INDEX_TYPE_INCONSISTENCY,
            &[member, owner, INDEX_TYPE_NAME, &found.to_string()],
        ));
    }

    /// Return type (for position-returning methods) and index-like
    /// parameters, descending into callback types.
    fn check_signature(&mut self, signature: &Signature, method: &str, owner: &str, origin: &Origin) {
        if INDEX_RETURNING_METHODS.contains(&method) {
            self.check(&signature.return_type, "return type", owner, origin);
        }
        self.check_params(signature, owner, origin);
        for param in signature.value_params() {
            self.check_nested(&param.ty, owner, origin, 0);
        }
    }

    fn check_params(&mut self, signature: &Signature, owner: &str, origin: &Origin) {
        for param in signature.value_params() {
            let name = param.name.as_str();
            if INDEX_PARAMETERS.contains(&name) {
                self.check(&param.ty, &format!("parameter {name}"), owner, origin);
            } else if NUMERIC_INDEX_PARAMETERS.contains(&name) {
                self.check_numeric(&param.ty, &format!("parameter {name}"), owner, origin);
            }
        }
    }

    fn check_nested(&mut self, ty: &TypeExpr, owner: &str, origin: &Origin, depth: u32) {
        if depth >= MAX_RELATION_DEPTH {
            return;
        }
        if let Some(expanded) = expand_alias(self.types, ty) {
            self.check_nested(expanded, owner, origin, depth + 1);
            return;
        }
        match ty {
            TypeNode::Function(callback) => {
                self.check_params(callback, &format!("{owner} callback"), origin);
            }
            TypeNode::Union(members) => {
                for member in members {
                    self.check_nested(member, owner, origin, depth + 1);
                }
            }
            _ => {}
        }
    }
}
