//! Declaration model shared by declaration sets and the merged surface.
//!
//! Interfaces are ordered member maps keyed by [`MemberKey`]; every other
//! declaration is a single entry. Two namespaces are kept apart: `types`
//! (interfaces and aliases) and `values` (variables and functions), since
//! `interface Array<T>` and `declare var Array` legitimately share a name.

use bitflags::bitflags;
use indexmap::IndexMap;
use jsm_common::Span;
use jsm_syntax::ast::{Keyword, PropertyName, Signature, TypeNode, TypeParam, VariableKind};
use serde::Serialize;
use smallvec::SmallVec;
use std::fmt;

use crate::mode::Mode;

/// Type expressions are the parser's span-free type nodes.
pub type TypeExpr = TypeNode;

/// Overload list of a method, call/construct signature or declared function.
pub type Overloads = SmallVec<[Signature; 2]>;

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
    pub struct MemberFlags: u8 {
        const READONLY = 1 << 0;
        const OPTIONAL = 1 << 1;
    }
}

/// Where a declaration came from.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Origin {
    pub set: String,
    pub file: String,
    pub span: Span,
}

impl Origin {
    pub fn new(set: impl Into<String>, file: impl Into<String>, span: Span) -> Self {
        Origin { set: set.into(), file: file.into(), span }
    }
}

// =============================================================================
// Members
// =============================================================================

/// Key kinds of index signatures. `int` and `number` keys are one kind.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum IndexKeyKind {
    Number,
    String,
    Symbol,
    Other(String),
}

impl IndexKeyKind {
    pub fn of(key_type: &TypeExpr) -> IndexKeyKind {
        match key_type {
            TypeNode::Keyword(Keyword::Number) => IndexKeyKind::Number,
            TypeNode::Keyword(Keyword::String) => IndexKeyKind::String,
            TypeNode::Keyword(Keyword::Symbol) => IndexKeyKind::Symbol,
            ty if crate::index::is_index_type(ty) => IndexKeyKind::Number,
            other => IndexKeyKind::Other(other.to_string()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum MemberKey {
    Named(String),
    Index(IndexKeyKind),
    Call,
    Construct,
}

impl MemberKey {
    pub fn named(name: impl Into<String>) -> Self {
        MemberKey::Named(name.into())
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            MemberKey::Named(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for MemberKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberKey::Named(name) => f.write_str(name),
            MemberKey::Index(IndexKeyKind::Number) => f.write_str("[number]"),
            MemberKey::Index(IndexKeyKind::String) => f.write_str("[string]"),
            MemberKey::Index(IndexKeyKind::Symbol) => f.write_str("[symbol]"),
            MemberKey::Index(IndexKeyKind::Other(text)) => write!(f, "[{text}]"),
            MemberKey::Call => f.write_str("()"),
            MemberKey::Construct => f.write_str("new()"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum MemberKind {
    Property(TypeExpr),
    Method(Overloads),
    Index {
        key_name: String,
        key_type: TypeExpr,
        value: TypeExpr,
    },
    Call(Overloads),
    Construct(Overloads),
}

impl MemberKind {
    pub fn kind_name(&self) -> &'static str {
        match self {
            MemberKind::Property(_) => "property",
            MemberKind::Method(_) => "method",
            MemberKind::Index { .. } => "index signature",
            MemberKind::Call(_) => "call signature",
            MemberKind::Construct(_) => "construct signature",
        }
    }

    pub fn overloads(&self) -> Option<&Overloads> {
        match self {
            MemberKind::Method(overloads) | MemberKind::Call(overloads) | MemberKind::Construct(overloads) => {
                Some(overloads)
            }
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct Member {
    pub key: MemberKey,
    /// Name as written (`"[Symbol.iterator]"`, `length`); used by the printer.
    pub name: Option<PropertyName>,
    pub kind: MemberKind,
    pub flags: MemberFlags,
    #[serde(skip)]
    pub origin: Origin,
}

impl Member {
    pub fn property(name: impl Into<String>, ty: TypeExpr) -> Self {
        let name = name.into();
        Member {
            key: MemberKey::Named(name.clone()),
            name: Some(PropertyName::Identifier(name)),
            kind: MemberKind::Property(ty),
            flags: MemberFlags::empty(),
            origin: Origin::default(),
        }
    }

    pub fn method(name: impl Into<String>, signature: Signature) -> Self {
        let name = name.into();
        Member {
            key: MemberKey::Named(name.clone()),
            name: Some(PropertyName::Identifier(name)),
            kind: MemberKind::Method(SmallVec::from_elem(signature, 1)),
            flags: MemberFlags::empty(),
            origin: Origin::default(),
        }
    }

    #[must_use]
    pub fn with_flags(mut self, flags: MemberFlags) -> Self {
        self.flags = flags;
        self
    }

    #[must_use]
    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }

    pub fn is_readonly(&self) -> bool {
        self.flags.contains(MemberFlags::READONLY)
    }

    pub fn is_optional(&self) -> bool {
        self.flags.contains(MemberFlags::OPTIONAL)
    }

    /// Same declared shape, wherever it was declared.
    pub fn same_shape(&self, other: &Member) -> bool {
        self.key == other.key && self.kind == other.kind && self.flags == other.flags
    }

    /// Short text of the member's type, as used in conflict messages.
    pub fn describe(&self) -> String {
        let optional = if self.is_optional() { "?" } else { "" };
        let readonly = if self.is_readonly() { "readonly " } else { "" };
        match &self.kind {
            MemberKind::Property(ty) => format!("{readonly}{}{optional}: {ty}", self.key),
            MemberKind::Index { key_name, key_type, value } => format!("{readonly}[{key_name}: {key_type}]: {value}"),
            MemberKind::Method(overloads) => join_overloads(&format!("{}{optional}", self.key), overloads),
            MemberKind::Call(overloads) => join_overloads("", overloads),
            MemberKind::Construct(overloads) => join_overloads("new ", overloads),
        }
    }
}

fn join_overloads(prefix: &str, overloads: &Overloads) -> String {
    overloads
        .iter()
        .map(|signature| format!("{prefix}{signature}"))
        .collect::<Vec<_>>()
        .join("; ")
}

// =============================================================================
// Declarations
// =============================================================================

#[derive(Clone, Debug, Serialize)]
pub struct InterfaceDecl {
    pub name: String,
    pub type_params: Vec<TypeParam>,
    pub extends: Vec<TypeExpr>,
    #[serde(serialize_with = "serialize_members")]
    pub members: IndexMap<MemberKey, Member>,
    #[serde(skip)]
    pub origin: Origin,
}

impl InterfaceDecl {
    pub fn new(name: impl Into<String>) -> Self {
        InterfaceDecl {
            name: name.into(),
            type_params: Vec::new(),
            extends: Vec::new(),
            members: IndexMap::new(),
            origin: Origin::default(),
        }
    }

    pub fn member(&self, name: &str) -> Option<&Member> {
        self.members.get(&MemberKey::Named(name.to_string()))
    }

    pub fn has_member(&self, name: &str) -> bool {
        self.member(name).is_some()
    }

    /// Type parameter list as written, `<T, U>`; `<>` when there are none.
    pub fn type_params_text(&self) -> String {
        type_params_text(&self.type_params)
    }
}

fn serialize_members<S: serde::Serializer>(
    members: &IndexMap<MemberKey, Member>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_map(members.iter().map(|(key, member)| (key.to_string(), member)))
}

pub(crate) fn type_params_text(params: &[TypeParam]) -> String {
    if params.is_empty() {
        return "<>".to_string();
    }
    let inner: Vec<String> = params.iter().map(ToString::to_string).collect();
    format!("<{}>", inner.join(", "))
}

#[derive(Clone, Debug, Serialize)]
pub struct TypeAliasDecl {
    pub name: String,
    pub type_params: Vec<TypeParam>,
    pub ty: TypeExpr,
    #[serde(skip)]
    pub origin: Origin,
}

#[derive(Clone, Debug, Serialize)]
pub struct VariableDecl {
    pub name: String,
    pub kind: VariableKind,
    pub ty: TypeExpr,
    #[serde(skip)]
    pub origin: Origin,
}

#[derive(Clone, Debug, Serialize)]
pub struct FunctionDecl {
    pub name: String,
    pub overloads: Overloads,
    #[serde(skip)]
    pub origin: Origin,
}

/// Entry of the types namespace.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum TypeDecl {
    Interface(InterfaceDecl),
    Alias(TypeAliasDecl),
}

impl TypeDecl {
    pub fn name(&self) -> &str {
        match self {
            TypeDecl::Interface(decl) => &decl.name,
            TypeDecl::Alias(decl) => &decl.name,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            TypeDecl::Interface(_) => "interface",
            TypeDecl::Alias(_) => "type alias",
        }
    }

    pub fn origin(&self) -> &Origin {
        match self {
            TypeDecl::Interface(decl) => &decl.origin,
            TypeDecl::Alias(decl) => &decl.origin,
        }
    }

    pub fn as_interface(&self) -> Option<&InterfaceDecl> {
        match self {
            TypeDecl::Interface(decl) => Some(decl),
            TypeDecl::Alias(_) => None,
        }
    }
}

/// Entry of the values namespace.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ValueDecl {
    Variable(VariableDecl),
    Function(FunctionDecl),
}

impl ValueDecl {
    pub fn name(&self) -> &str {
        match self {
            ValueDecl::Variable(decl) => &decl.name,
            ValueDecl::Function(decl) => &decl.name,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            ValueDecl::Variable(decl) => decl.kind.keyword(),
            ValueDecl::Function(_) => "function",
        }
    }

    pub fn origin(&self) -> &Origin {
        match self {
            ValueDecl::Variable(decl) => &decl.origin,
            ValueDecl::Function(decl) => &decl.origin,
        }
    }
}

/// The two global namespaces, in declaration order.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Declarations {
    pub types: IndexMap<String, TypeDecl>,
    pub values: IndexMap<String, ValueDecl>,
}

impl Declarations {
    pub fn interface(&self, name: &str) -> Option<&InterfaceDecl> {
        self.types.get(name).and_then(TypeDecl::as_interface)
    }

    /// Whether `name` is declared in either namespace.
    pub fn declares(&self, name: &str) -> bool {
        self.types.contains_key(name) || self.values.contains_key(name)
    }

    /// Declaring origin of `name`, types namespace first.
    pub fn origin_of(&self, name: &str) -> Option<&Origin> {
        self.types
            .get(name)
            .map(TypeDecl::origin)
            .or_else(|| self.values.get(name).map(ValueDecl::origin))
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.values.is_empty()
    }
}

// =============================================================================
// Declaration sets
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SetKind {
    Base,
    Mode(Mode),
}

/// A named, versioned bundle of declarations authored in one file.
#[derive(Clone, Debug, Serialize)]
pub struct DeclarationSet {
    pub id: String,
    pub version: String,
    pub kind: SetKind,
    pub deprecated: bool,
    pub file: String,
    /// Ids named by `/// <reference set="..." />`.
    pub references: Vec<String>,
    pub declarations: Declarations,
}

impl DeclarationSet {
    pub fn new(id: impl Into<String>, kind: SetKind) -> Self {
        let id = id.into();
        DeclarationSet {
            file: format!("{id}.d.ts"),
            id,
            version: "0.0.0".to_string(),
            kind,
            deprecated: false,
            references: Vec::new(),
            declarations: Declarations::default(),
        }
    }

    pub fn is_base(&self) -> bool {
        self.kind == SetKind::Base
    }

    pub fn mode(&self) -> Option<Mode> {
        match self.kind {
            SetKind::Base => None,
            SetKind::Mode(mode) => Some(mode),
        }
    }

    /// `id@version`
    pub fn label(&self) -> String {
        format!("{}@{}", self.id, self.version)
    }

    pub fn interface(&self, name: &str) -> Option<&InterfaceDecl> {
        self.declarations.interface(name)
    }

    /// Every global name the set declares or extends, types first.
    pub fn global_names(&self) -> impl Iterator<Item = &str> {
        self.declarations
            .types
            .keys()
            .chain(self.declarations.values.keys())
            .map(String::as_str)
    }
}
