//! Capability profiles: what a mode promises and what it must never expose.
//!
//! JS mode promises a documented surface (`required`); host-native mode
//! promises the absence of host capabilities the target cannot provide
//! (`excluded`). Exclusions apply to declarations and to every type
//! expression, so an excluded name reachable through a member type is caught
//! as well.

use jsm_common::diagnostics::{Diagnostic, diagnostic_codes};
use jsm_syntax::ast::TypeNode;
use rustc_hash::FxHashSet;
use serde::Serialize;
use std::fmt;

use crate::decl::{Declarations, InterfaceDecl, MemberKind, Origin, TypeDecl, TypeExpr, ValueDecl};
use crate::mode::Mode;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Requirement {
    /// `interface.member` must exist (declared or inherited).
    Member { interface: String, member: String },
    /// A global name must be declared in either namespace.
    Global { name: String },
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Requirement::Member { interface, member } => write!(f, "{interface}.{member}"),
            Requirement::Global { name } => f.write_str(name),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct CapabilityProfile {
    pub mode: Mode,
    pub required: Vec<Requirement>,
    pub excluded: Vec<String>,
}

impl CapabilityProfile {
    pub fn new(mode: Mode) -> Self {
        CapabilityProfile { mode, required: Vec::new(), excluded: Vec::new() }
    }

    #[must_use]
    pub fn require_members(mut self, interface: &str, members: &[&str]) -> Self {
        self.required.extend(members.iter().map(|member| Requirement::Member {
            interface: interface.to_string(),
            member: (*member).to_string(),
        }));
        self
    }

    #[must_use]
    pub fn require_globals(mut self, names: &[&str]) -> Self {
        self.required
            .extend(names.iter().map(|name| Requirement::Global { name: (*name).to_string() }));
        self
    }

    #[must_use]
    pub fn exclude(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        for name in names {
            let name = name.into();
            if !self.excluded.contains(&name) {
                self.excluded.push(name);
            }
        }
        self
    }

    pub fn is_excluded(&self, name: &str) -> bool {
        self.excluded.iter().any(|excluded| excluded == name)
    }
}

// =============================================================================
// Coverage
// =============================================================================

/// Every requirement of `profile` that `declarations` does not satisfy, in
/// profile order.
pub fn validate_coverage(profile: &CapabilityProfile, declarations: &Declarations) -> Result<(), Vec<Requirement>> {
    let missing: Vec<Requirement> = profile
        .required
        .iter()
        .filter(|requirement| !is_satisfied(requirement, declarations))
        .cloned()
        .collect();
    if missing.is_empty() { Ok(()) } else { Err(missing) }
}

fn is_satisfied(requirement: &Requirement, declarations: &Declarations) -> bool {
    match requirement {
        Requirement::Global { name } => declarations.declares(name),
        Requirement::Member { interface, member } => declarations
            .interface(interface)
            .is_some_and(|decl| has_member_inherited(decl, member, declarations, &mut FxHashSet::default())),
    }
}

fn has_member_inherited<'a>(
    decl: &'a InterfaceDecl,
    member: &str,
    declarations: &'a Declarations,
    visited: &mut FxHashSet<&'a str>,
) -> bool {
    if !visited.insert(decl.name.as_str()) {
        return false;
    }
    if decl.has_member(member) {
        return true;
    }
    decl.extends.iter().any(|heritage| match heritage {
        TypeNode::Reference { name, .. } => declarations
            .interface(name)
            .is_some_and(|parent| has_member_inherited(parent, member, declarations, visited)),
        _ => false,
    })
}

/// Coverage failures as diagnostics.
pub fn coverage_diagnostics(profile: &CapabilityProfile, missing: &[Requirement]) -> Vec<Diagnostic> {
    let mode = profile.mode.as_str();
    missing
        .iter()
        .map(|requirement| match requirement {
            Requirement::Member { interface, member } => {
                Diagnostic::global(diagnostic_codes::MISSING_REQUIRED_MEMBER, &[mode, member, interface])
            }
            Requirement::Global { name } => {
                Diagnostic::global(diagnostic_codes::MISSING_REQUIRED_GLOBAL, &[mode, name])
            }
        })
        .collect()
}

// =============================================================================
// Exclusions
// =============================================================================

/// Report excluded names that are declared, or referenced from any type
/// expression in the surface.
///
/// Each excluded name is reported once per declaration that exposes it.
pub fn check_exclusions(profile: &CapabilityProfile, declarations: &Declarations) -> Vec<Diagnostic> {
    if profile.excluded.is_empty() {
        return Vec::new();
    }
    let excluded: FxHashSet<&str> = profile.excluded.iter().map(String::as_str).collect();
    let mode = profile.mode.as_str();
    let mut diagnostics = Vec::new();

    for name in &profile.excluded {
        if let Some(origin) = declarations.origin_of(name) {
            diagnostics.push(Diagnostic::from_code(
                origin.file.clone(),
                origin.span.start,
                origin.span.len(),
                diagnostic_codes::CAPABILITY_VIOLATION,
                &[name, mode, &origin.set],
            ));
        }
    }

    let mut report = |owner: &str, paths: Vec<(String, String)>, origin: &Origin| {
        let mut seen = FxHashSet::default();
        for (name, path) in paths {
            if owner == name || !seen.insert(name.clone()) {
                continue;
            }
            diagnostics.push(Diagnostic::from_code(
                origin.file.clone(),
                origin.span.start,
                origin.span.len(),
                diagnostic_codes::CAPABILITY_REACHABLE,
                &[&name, mode, &path],
            ));
        }
    };

    for (name, decl) in &declarations.types {
        let mut paths = Vec::new();
        match decl {
            TypeDecl::Interface(interface) => {
                for heritage in &interface.extends {
                    collect_references(heritage, &excluded, &format!("{name} extends"), &mut paths);
                }
                for (key, member) in &interface.members {
                    let path = format!("{name}.{key}");
                    for ty in member_types(&member.kind) {
                        collect_references(ty, &excluded, &path, &mut paths);
                    }
                }
            }
            TypeDecl::Alias(alias) => collect_references(&alias.ty, &excluded, name, &mut paths),
        }
        report(name, paths, decl.origin());
    }

    for (name, decl) in &declarations.values {
        let mut paths = Vec::new();
        match decl {
            ValueDecl::Variable(variable) => collect_references(&variable.ty, &excluded, name, &mut paths),
            ValueDecl::Function(function) => {
                for signature in &function.overloads {
                    signature.walk(&mut |ty| note_reference(ty, &excluded, name, &mut paths));
                }
            }
        }
        report(name, paths, decl.origin());
    }

    diagnostics
}

fn member_types(kind: &MemberKind) -> Vec<&TypeExpr> {
    let mut types = Vec::new();
    match kind {
        MemberKind::Property(ty) => types.push(ty),
        MemberKind::Index { key_type, value, .. } => {
            types.push(key_type);
            types.push(value);
        }
        MemberKind::Method(overloads) | MemberKind::Call(overloads) | MemberKind::Construct(overloads) => {
            for signature in overloads {
                signature.walk(&mut |ty| types.push(ty));
            }
        }
    }
    types
}

fn collect_references(ty: &TypeExpr, excluded: &FxHashSet<&str>, path: &str, out: &mut Vec<(String, String)>) {
    ty.walk(&mut |node| note_reference(node, excluded, path, out));
}

fn note_reference(node: &TypeExpr, excluded: &FxHashSet<&str>, path: &str, out: &mut Vec<(String, String)>) {
    if let TypeNode::Reference { name, .. } = node {
        // `NodeJS.Process` is reachable through `NodeJS`.
        let root = name.split('.').next().unwrap_or(name);
        if excluded.contains(root) {
            out.push((root.to_string(), path.to_string()));
        } else if excluded.contains(name.as_str()) {
            out.push((name.clone(), path.to_string()));
        }
    }
}
