//! AST for declaration files.
//!
//! Type-level nodes ([`TypeNode`], [`Signature`], [`Param`], [`TypeParam`])
//! carry no spans so that two declarations written identically compare
//! equal regardless of where they appear. Statements and members keep their
//! spans for diagnostics.

use jsm_common::Span;
use serde::Serialize;

#[derive(Clone, Debug, Serialize)]
pub struct SourceFile {
    pub file_name: String,
    pub directives: Vec<Directive>,
    pub statements: Vec<Statement>,
    #[serde(skip)]
    pub diagnostics: Vec<jsm_common::Diagnostic>,
}

impl SourceFile {
    /// The first directive with the given tag name (`set`, `reference`).
    pub fn directive(&self, name: &str) -> Option<&Directive> {
        self.directives.iter().find(|d| d.name == name)
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(jsm_common::Diagnostic::is_error)
    }
}

/// `/// <name key="value" ... />`
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Directive {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub span: Span,
}

impl Directive {
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Clone, Debug, Serialize)]
pub enum Statement {
    Interface(InterfaceNode),
    TypeAlias(TypeAliasNode),
    Variable(VariableNode),
    Function(FunctionNode),
}

impl Statement {
    pub fn name(&self) -> &str {
        match self {
            Statement::Interface(node) => &node.name,
            Statement::TypeAlias(node) => &node.name,
            Statement::Variable(node) => &node.name,
            Statement::Function(node) => &node.name,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Statement::Interface(node) => node.span,
            Statement::TypeAlias(node) => node.span,
            Statement::Variable(node) => node.span,
            Statement::Function(node) => node.span,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct InterfaceNode {
    pub name: String,
    pub type_params: Vec<TypeParam>,
    pub heritage: Vec<TypeNode>,
    pub members: Vec<MemberNode>,
    pub span: Span,
    pub name_span: Span,
}

#[derive(Clone, Debug, Serialize)]
pub struct TypeAliasNode {
    pub name: String,
    pub type_params: Vec<TypeParam>,
    pub ty: TypeNode,
    pub span: Span,
    pub name_span: Span,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum VariableKind {
    Var,
    Let,
    Const,
}

impl VariableKind {
    pub fn keyword(self) -> &'static str {
        match self {
            VariableKind::Var => "var",
            VariableKind::Let => "let",
            VariableKind::Const => "const",
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct VariableNode {
    pub kind: VariableKind,
    pub name: String,
    pub ty: TypeNode,
    pub span: Span,
    pub name_span: Span,
}

#[derive(Clone, Debug, Serialize)]
pub struct FunctionNode {
    pub name: String,
    pub signature: Signature,
    pub span: Span,
    pub name_span: Span,
}

// =============================================================================
// Members
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum PropertyName {
    Identifier(String),
    String(String),
    Numeric(String),
    /// `[Symbol.iterator]`; holds the dotted expression text.
    Computed(String),
}

impl PropertyName {
    /// Key used to match members across declaration sets.
    pub fn key(&self) -> String {
        match self {
            PropertyName::Identifier(name) | PropertyName::String(name) | PropertyName::Numeric(name) => name.clone(),
            PropertyName::Computed(expr) => format!("[{expr}]"),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct MemberNode {
    pub kind: MemberNodeKind,
    pub span: Span,
}

#[derive(Clone, Debug, Serialize)]
pub enum MemberNodeKind {
    Property {
        name: PropertyName,
        readonly: bool,
        optional: bool,
        ty: TypeNode,
    },
    Method {
        name: PropertyName,
        optional: bool,
        signature: Signature,
    },
    /// `[key: K]: T`
    Index {
        readonly: bool,
        key_name: String,
        key_type: TypeNode,
        ty: TypeNode,
    },
    Call(Signature),
    Construct(Signature),
}

// =============================================================================
// Types
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct TypeParam {
    pub name: String,
    pub constraint: Option<TypeNode>,
    pub default: Option<TypeNode>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Param {
    pub name: String,
    pub ty: TypeNode,
    pub optional: bool,
    pub rest: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Signature {
    pub type_params: Vec<TypeParam>,
    pub params: Vec<Param>,
    pub return_type: TypeNode,
}

impl Signature {
    /// Parameters that bind call arguments (`this` parameters excluded).
    pub fn value_params(&self) -> impl Iterator<Item = &Param> {
        self.params.iter().filter(|p| p.name != "this")
    }

    /// Smallest number of arguments a call must supply.
    pub fn min_arity(&self) -> usize {
        self.value_params().filter(|p| !p.optional && !p.rest).count()
    }

    /// Largest number of arguments a call may supply; `None` with a rest parameter.
    pub fn max_arity(&self) -> Option<usize> {
        if self.value_params().any(|p| p.rest) {
            None
        } else {
            Some(self.value_params().count())
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Keyword {
    Any,
    Unknown,
    Never,
    Void,
    Undefined,
    Null,
    Boolean,
    String,
    Number,
    BigInt,
    Symbol,
    Object,
    This,
}

impl Keyword {
    pub fn from_text(text: &str) -> Option<Keyword> {
        Some(match text {
            "any" => Keyword::Any,
            "unknown" => Keyword::Unknown,
            "never" => Keyword::Never,
            "void" => Keyword::Void,
            "undefined" => Keyword::Undefined,
            "null" => Keyword::Null,
            "boolean" => Keyword::Boolean,
            "string" => Keyword::String,
            "number" => Keyword::Number,
            "bigint" => Keyword::BigInt,
            "symbol" => Keyword::Symbol,
            "object" => Keyword::Object,
            "this" => Keyword::This,
            _ => return None,
        })
    }

    pub fn text(self) -> &'static str {
        match self {
            Keyword::Any => "any",
            Keyword::Unknown => "unknown",
            Keyword::Never => "never",
            Keyword::Void => "void",
            Keyword::Undefined => "undefined",
            Keyword::Null => "null",
            Keyword::Boolean => "boolean",
            Keyword::String => "string",
            Keyword::Number => "number",
            Keyword::BigInt => "bigint",
            Keyword::Symbol => "symbol",
            Keyword::Object => "object",
            Keyword::This => "this",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum LiteralType {
    String(String),
    /// Numeric text as written, including a leading `-`.
    Number(String),
    Boolean(bool),
}

impl LiteralType {
    /// Numeric value of a number literal (hex/octal/binary and `_` separators accepted).
    pub fn numeric_value(&self) -> Option<f64> {
        let LiteralType::Number(text) = self else {
            return None;
        };
        let (negative, digits) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.as_str()),
        };
        let digits = digits.replace('_', "");
        let radix = match digits.get(..2) {
            Some("0x" | "0X") => Some(16),
            Some("0o" | "0O") => Some(8),
            Some("0b" | "0B") => Some(2),
            _ => None,
        };
        let value = match radix {
            Some(radix) => u64::from_str_radix(&digits[2..], radix).ok()? as f64,
            None => digits.parse::<f64>().ok()?,
        };
        Some(if negative { -value } else { value })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct TupleElement {
    pub ty: TypeNode,
    pub optional: bool,
    pub rest: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum TypeNode {
    Keyword(Keyword),
    /// `Name` or `Name<Args>`; dotted names keep their dots.
    Reference {
        name: String,
        args: Vec<TypeNode>,
    },
    Literal(LiteralType),
    Array(Box<TypeNode>),
    Tuple(Vec<TupleElement>),
    Union(Vec<TypeNode>),
    Intersection(Vec<TypeNode>),
    Function(Box<Signature>),
    Constructor(Box<Signature>),
    Object(Vec<ObjectMember>),
    KeyOf(Box<TypeNode>),
    /// `readonly T[]` / `readonly [A, B]`
    Readonly(Box<TypeNode>),
    /// `x is T` in return position.
    Predicate {
        parameter: String,
        ty: Box<TypeNode>,
    },
}

/// Object type literal member; the span-free twin of [`MemberNodeKind`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ObjectMember {
    Property {
        name: PropertyName,
        readonly: bool,
        optional: bool,
        ty: TypeNode,
    },
    Method {
        name: PropertyName,
        optional: bool,
        signature: Signature,
    },
    Index {
        readonly: bool,
        key_name: String,
        key_type: TypeNode,
        ty: TypeNode,
    },
    Call(Signature),
    Construct(Signature),
}

impl From<MemberNodeKind> for ObjectMember {
    fn from(kind: MemberNodeKind) -> Self {
        match kind {
            MemberNodeKind::Property { name, readonly, optional, ty } => {
                ObjectMember::Property { name, readonly, optional, ty }
            }
            MemberNodeKind::Method { name, optional, signature } => ObjectMember::Method { name, optional, signature },
            MemberNodeKind::Index { readonly, key_name, key_type, ty } => {
                ObjectMember::Index { readonly, key_name, key_type, ty }
            }
            MemberNodeKind::Call(signature) => ObjectMember::Call(signature),
            MemberNodeKind::Construct(signature) => ObjectMember::Construct(signature),
        }
    }
}

impl TypeNode {
    pub fn keyword(keyword: Keyword) -> Self {
        TypeNode::Keyword(keyword)
    }

    pub fn reference(name: impl Into<String>) -> Self {
        TypeNode::Reference {
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        matches!(self, TypeNode::Keyword(k) if *k == keyword)
    }

    /// Whether this is a plain reference to `name` without type arguments.
    pub fn is_reference_to(&self, name: &str) -> bool {
        matches!(self, TypeNode::Reference { name: n, args } if n == name && args.is_empty())
    }

    /// Visit this node and every nested type node, depth first.
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a TypeNode)) {
        visit(self);
        match self {
            TypeNode::Keyword(_) | TypeNode::Literal(_) => {}
            TypeNode::Reference { args, .. } => args.iter().for_each(|arg| arg.walk(visit)),
            TypeNode::Array(inner) | TypeNode::KeyOf(inner) | TypeNode::Readonly(inner) => inner.walk(visit),
            TypeNode::Predicate { ty, .. } => ty.walk(visit),
            TypeNode::Tuple(elements) => elements.iter().for_each(|e| e.ty.walk(visit)),
            TypeNode::Union(members) | TypeNode::Intersection(members) => {
                members.iter().for_each(|m| m.walk(visit));
            }
            TypeNode::Function(signature) | TypeNode::Constructor(signature) => signature.walk(visit),
            TypeNode::Object(members) => {
                for member in members {
                    match member {
                        ObjectMember::Property { ty, .. } => ty.walk(visit),
                        ObjectMember::Method { signature, .. }
                        | ObjectMember::Call(signature)
                        | ObjectMember::Construct(signature) => signature.walk(visit),
                        ObjectMember::Index { key_type, ty, .. } => {
                            key_type.walk(visit);
                            ty.walk(visit);
                        }
                    }
                }
            }
        }
    }
}

impl Signature {
    /// Visit every type node mentioned by this signature.
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a TypeNode)) {
        for param in &self.type_params {
            if let Some(constraint) = &param.constraint {
                constraint.walk(visit);
            }
            if let Some(default) = &param.default {
                default.walk(visit);
            }
        }
        for param in &self.params {
            param.ty.walk(visit);
        }
        self.return_type.walk(visit);
    }
}
