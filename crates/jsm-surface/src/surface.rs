//! The published global type surface.

use indexmap::IndexMap;
use rustc_hash::FxHasher;
use serde::Serialize;
use std::hash::Hasher;

use crate::decl::{Declarations, InterfaceDecl, Member, MemberKey, TypeDecl, ValueDecl};
use crate::mode::Mode;

/// Identity of one declaration set that went into a surface.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SetInfo {
    pub id: String,
    pub version: String,
    pub deprecated: bool,
}

/// The merged, validated and immutable global namespace for one mode.
///
/// Constructed only by the pipeline; there are no setters.
#[derive(Clone, Debug, Serialize)]
pub struct GlobalTypeSurface {
    mode: Mode,
    sets: Vec<SetInfo>,
    declarations: Declarations,
}

/// A member resolved through [`GlobalTypeSurface::resolve_member`].
#[derive(Clone, Copy, Debug)]
pub struct ResolvedMember<'a> {
    pub interface: &'a InterfaceDecl,
    pub member: &'a Member,
}

impl GlobalTypeSurface {
    pub(crate) fn new(mode: Mode, sets: Vec<SetInfo>, declarations: Declarations) -> Self {
        GlobalTypeSurface { mode, sets, declarations }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn sets(&self) -> &[SetInfo] {
        &self.sets
    }

    pub fn declarations(&self) -> &Declarations {
        &self.declarations
    }

    pub fn types(&self) -> &IndexMap<String, TypeDecl> {
        &self.declarations.types
    }

    pub fn values(&self) -> &IndexMap<String, ValueDecl> {
        &self.declarations.values
    }

    pub fn interface(&self, name: &str) -> Option<&InterfaceDecl> {
        self.declarations.interface(name)
    }

    pub fn declares(&self, name: &str) -> bool {
        self.declarations.declares(name)
    }

    /// Resolve `Interface.member` (or `Interface[number]`, `Interface()`,
    /// `Interface.new()`) to exactly one member.
    pub fn resolve_member(&self, key: &str) -> Option<ResolvedMember<'_>> {
        let split = key.find(['.', '[', '('])?;
        let interface = self.interface(&key[..split])?;
        let rest = key[split..].strip_prefix('.').unwrap_or(&key[split..]);
        let member = interface
            .members
            .iter()
            .find(|(member_key, _)| member_key.to_string() == rest)
            .map(|(_, member)| member)?;
        Some(ResolvedMember { interface, member })
    }

    /// Every member of every interface as `Interface.member`, plus every
    /// global value name. Each key appears exactly once.
    pub fn member_keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        for decl in self.declarations.types.values() {
            let TypeDecl::Interface(interface) = decl else {
                continue;
            };
            for key in interface.members.keys() {
                keys.push(match key {
                    MemberKey::Named(name) => format!("{}.{name}", interface.name),
                    MemberKey::Construct => format!("{}.{key}", interface.name),
                    other => format!("{}{other}", interface.name),
                });
            }
        }
        keys.extend(self.declarations.values.keys().cloned());
        keys
    }

    /// Declaration text; see [`crate::printer`].
    pub fn to_declaration_text(&self) -> String {
        crate::printer::print_surface(self)
    }

    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty { serde_json::to_string_pretty(self) } else { serde_json::to_string(self) }
    }

    /// Stable 64-bit hash of the declaration text.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = FxHasher::default();
        hasher.write(self.to_declaration_text().as_bytes());
        hasher.finish()
    }
}
