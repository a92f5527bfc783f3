//! Declaration merging.
//!
//! Interfaces merge member by member: the effective member map is the base's
//! members in base order followed by members only the extension declares.
//! Where both declare a member the extension's declaration is kept, provided
//! it still serves every caller of the base declaration. Aliases and
//! variables cannot be redeclared with a different body; functions follow the
//! method rule. Conflicts are collected, never resolved silently, and the
//! pipeline refuses to validate a surface that has any.

use indexmap::IndexMap;
use jsm_common::diagnostics::{Diagnostic, diagnostic_codes};
use tracing::{debug, trace};

use crate::decl::{
    DeclarationSet, Declarations, FunctionDecl, InterfaceDecl, Member, MemberKind, Origin, TypeDecl, ValueDecl,
};
use crate::relate::AssignabilityChecker;

/// One incompatibility between two declarations of the same name, reported
/// with related information pointing at the other declaration.
pub type MergeConflict = Diagnostic;

/// A merge result together with every conflict found while producing it.
///
/// On conflict the base side's declaration is kept in `value`.
#[derive(Debug, Clone)]
pub struct Merged<T> {
    pub value: T,
    pub conflicts: Vec<MergeConflict>,
}

impl<T> Merged<T> {
    pub fn is_clean(&self) -> bool {
        self.conflicts.is_empty()
    }

    pub fn into_result(self) -> Result<T, Vec<MergeConflict>> {
        if self.conflicts.is_empty() { Ok(self.value) } else { Err(self.conflicts) }
    }
}

/// How repeated members combine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemberPolicy {
    /// Across declaration sets: the extension replaces the base member.
    Override,
    /// Within one set: repeated methods and functions add overloads.
    Overload,
}

/// Merge an extension's view of an interface into the base's.
pub fn merge_interfaces(base: &InterfaceDecl, extension: &InterfaceDecl) -> Merged<InterfaceDecl> {
    let mut checker = AssignabilityChecker::new();
    merge_interfaces_with(&mut checker, base, extension, MemberPolicy::Override)
}

pub(crate) fn merge_interfaces_with(
    checker: &mut AssignabilityChecker<'_>,
    base: &InterfaceDecl,
    extension: &InterfaceDecl,
    policy: MemberPolicy,
) -> Merged<InterfaceDecl> {
    let mut conflicts = Vec::new();
    let mut merged = base.clone();

    let same_params = base.type_params.len() == extension.type_params.len()
        && base.type_params.iter().zip(&extension.type_params).all(|(b, e)| b.name == e.name);
    if !same_params {
        conflicts.push(conflict(
            diagnostic_codes::TYPE_PARAMETER_MISMATCH,
            &[
                &base.name,
                &base.type_params_text(),
                &base.origin.set,
                &extension.type_params_text(),
                &extension.origin.set,
            ],
            &extension.origin,
            &base.origin,
            &base.name,
        ));
    }

    for heritage in &extension.extends {
        if !merged.extends.contains(heritage) {
            merged.extends.push(heritage.clone());
        }
    }

    for (key, member) in &extension.members {
        let Some(existing) = merged.members.get_mut(key) else {
            merged.members.insert(key.clone(), member.clone());
            continue;
        };
        match merge_member(checker, existing, member, policy) {
            Some(effective) => *existing = effective,
            None => {
                trace!(interface = %base.name, member = %key, "incompatible member");
                conflicts.push(conflict(
                    diagnostic_codes::INCOMPATIBLE_MEMBER,
                    &[
                        &key.to_string(),
                        &base.name,
                        &existing.describe(),
                        &existing.origin.set,
                        &member.describe(),
                        &member.origin.set,
                    ],
                    &member.origin,
                    &existing.origin,
                    &format!("{}.{key}", base.name),
                ));
            }
        }
    }

    debug!(
        interface = %base.name,
        members = merged.members.len(),
        conflicts = conflicts.len(),
        "merged interface"
    );
    Merged { value: merged, conflicts }
}

/// The effective member when `extension` meets `base`, or `None` when the
/// extension would break callers of the base declaration.
fn merge_member(
    checker: &mut AssignabilityChecker<'_>,
    base: &Member,
    extension: &Member,
    policy: MemberPolicy,
) -> Option<Member> {
    if base.same_shape(extension) {
        return Some(extension.clone());
    }
    if !base.is_optional() && extension.is_optional() {
        return None;
    }

    match (&base.kind, &extension.kind) {
        (MemberKind::Property(b), MemberKind::Property(e))
        | (MemberKind::Index { value: b, .. }, MemberKind::Index { value: e, .. }) => {
            if base.is_readonly() && !extension.is_readonly() {
                return None;
            }
            checker.is_assignable(e, b).then(|| extension.clone())
        }
        (MemberKind::Method(b), MemberKind::Method(e))
        | (MemberKind::Call(b), MemberKind::Call(e))
        | (MemberKind::Construct(b), MemberKind::Construct(e)) => match policy {
            MemberPolicy::Overload => {
                let mut merged = base.clone();
                let overloads = match &mut merged.kind {
                    MemberKind::Method(o) | MemberKind::Call(o) | MemberKind::Construct(o) => o,
                    _ => return None,
                };
                for signature in e {
                    if !overloads.contains(signature) {
                        overloads.push(signature.clone());
                    }
                }
                Some(merged)
            }
            MemberPolicy::Override => checker.overloads_cover(e, b).then(|| extension.clone()),
        },
        _ => None,
    }
}

/// Diagnostic at `at`, pointing back at the other declaration through related information.
fn conflict(code: u32, args: &[&str], at: &Origin, other: &Origin, name: &str) -> Diagnostic {
    Diagnostic::from_code(at.file.clone(), at.span.start, at.span.len(), code, args).with_related(
        other.file.clone(),
        other.span.start,
        other.span.len(),
        format!("'{name}' is also declared here by '{}'.", other.set),
    )
}

// =============================================================================
// Whole declaration sets
// =============================================================================

/// Fold `extension` into `into`, returning the conflicts.
pub fn merge_declarations(into: &mut Declarations, extension: &Declarations, policy: MemberPolicy) -> Vec<Diagnostic> {
    let mut conflicts = Vec::new();

    // Non-generic aliases from both sides, so `type Count = int` relates to `int`.
    let aliases: IndexMap<String, TypeDecl> = into
        .types
        .iter()
        .chain(&extension.types)
        .filter(|(_, decl)| matches!(decl, TypeDecl::Alias(_)))
        .map(|(name, decl)| (name.clone(), decl.clone()))
        .collect();
    let mut checker = AssignabilityChecker::with_types(&aliases);

    for (name, decl) in &extension.types {
        let Some(existing) = into.types.get(name) else {
            into.types.insert(name.clone(), decl.clone());
            continue;
        };
        match (existing, decl) {
            (TypeDecl::Interface(base), TypeDecl::Interface(ext)) => {
                let merged = merge_interfaces_with(&mut checker, base, ext, policy);
                conflicts.extend(merged.conflicts);
                into.types.insert(name.clone(), TypeDecl::Interface(merged.value));
            }
            (TypeDecl::Alias(base), TypeDecl::Alias(ext)) => {
                if base.type_params != ext.type_params || base.ty != ext.ty {
                    conflicts.push(conflict(
                        diagnostic_codes::CONFLICTING_TYPE_ALIAS,
                        &[name, &base.ty.to_string(), &base.origin.set, &ext.ty.to_string(), &ext.origin.set],
                        &ext.origin,
                        &base.origin,
                        name,
                    ));
                }
            }
            (existing, decl) => conflicts.push(kind_conflict(
                name,
                existing.kind_name(),
                existing.origin(),
                decl.kind_name(),
                decl.origin(),
            )),
        }
    }

    for (name, decl) in &extension.values {
        let Some(existing) = into.values.get(name) else {
            into.values.insert(name.clone(), decl.clone());
            continue;
        };
        match (existing, decl) {
            (ValueDecl::Variable(base), ValueDecl::Variable(ext)) => {
                if base.kind != ext.kind {
                    conflicts.push(kind_conflict(
                        name,
                        existing.kind_name(),
                        &base.origin,
                        decl.kind_name(),
                        &ext.origin,
                    ));
                } else if base.ty != ext.ty {
                    conflicts.push(conflict(
                        diagnostic_codes::CONFLICTING_VALUE,
                        &[name, &base.ty.to_string(), &base.origin.set, &ext.ty.to_string(), &ext.origin.set],
                        &ext.origin,
                        &base.origin,
                        name,
                    ));
                }
            }
            (ValueDecl::Function(base), ValueDecl::Function(ext)) => {
                match merge_functions(&mut checker, base, ext, policy) {
                    Some(merged) => {
                        into.values.insert(name.clone(), ValueDecl::Function(merged));
                    }
                    None => conflicts.push(conflict(
                        diagnostic_codes::CONFLICTING_VALUE,
                        &[name, &overloads_text(base), &base.origin.set, &overloads_text(ext), &ext.origin.set],
                        &ext.origin,
                        &base.origin,
                        name,
                    )),
                }
            }
            (existing, decl) => conflicts.push(kind_conflict(
                name,
                existing.kind_name(),
                existing.origin(),
                decl.kind_name(),
                decl.origin(),
            )),
        }
    }

    conflicts
}

fn merge_functions(
    checker: &mut AssignabilityChecker<'_>,
    base: &FunctionDecl,
    extension: &FunctionDecl,
    policy: MemberPolicy,
) -> Option<FunctionDecl> {
    match policy {
        MemberPolicy::Overload => {
            let mut merged = base.clone();
            for signature in &extension.overloads {
                if !merged.overloads.contains(signature) {
                    merged.overloads.push(signature.clone());
                }
            }
            Some(merged)
        }
        MemberPolicy::Override => checker
            .overloads_cover(&extension.overloads, &base.overloads)
            .then(|| extension.clone()),
    }
}

fn overloads_text(function: &FunctionDecl) -> String {
    function
        .overloads
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

fn kind_conflict(name: &str, base_kind: &str, base: &Origin, ext_kind: &str, ext: &Origin) -> Diagnostic {
    conflict(
        diagnostic_codes::DECLARATION_KIND_CONFLICT,
        &[name, base_kind, &base.set, ext_kind, &ext.set],
        ext,
        base,
        name,
    )
}

/// Merge declaration sets left to right, the first one being the base.
#[tracing::instrument(level = "debug", skip_all, fields(sets = sets.len()))]
pub fn merge_sets(sets: &[&DeclarationSet]) -> Merged<Declarations> {
    let Some((first, rest)) = sets.split_first() else {
        return Merged { value: Declarations::default(), conflicts: Vec::new() };
    };
    let mut declarations = first.declarations.clone();
    let mut conflicts = Vec::new();
    for set in rest {
        conflicts.extend(merge_declarations(&mut declarations, &set.declarations, MemberPolicy::Override));
    }
    Merged { value: declarations, conflicts }
}
