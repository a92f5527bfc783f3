//! Canonical text for type-level nodes.
//!
//! Used by diagnostics ("declared as '...'"), by the surface printer and by
//! fingerprinting, so the output must be stable: one space after `:` and
//! `,`, ` | ` and ` & ` between constituents, `;` between object members.

use std::fmt::{self, Display, Formatter, Write};

use crate::ast::{
    LiteralType, MemberNodeKind, ObjectMember, Param, PropertyName, Signature, TupleElement,
    TypeNode, TypeParam,
};

impl Display for TypeNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            TypeNode::Keyword(keyword) => f.write_str(keyword.text()),
            TypeNode::Reference { name, args } => {
                f.write_str(name)?;
                if !args.is_empty() {
                    f.write_char('<')?;
                    write_list(f, args.iter(), ", ")?;
                    f.write_char('>')?;
                }
                Ok(())
            }
            TypeNode::Literal(literal) => literal.fmt(f),
            TypeNode::Array(element) => {
                write_operand(f, element, needs_parens_as_postfix_operand(element))?;
                f.write_str("[]")
            }
            TypeNode::Tuple(elements) => {
                f.write_char('[')?;
                write_list(f, elements.iter(), ", ")?;
                f.write_char(']')
            }
            TypeNode::Union(members) => {
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    write_operand(f, member, matches!(member, TypeNode::Function(_) | TypeNode::Constructor(_)))?;
                }
                Ok(())
            }
            TypeNode::Intersection(members) => {
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" & ")?;
                    }
                    let parens =
                        matches!(member, TypeNode::Union(_) | TypeNode::Function(_) | TypeNode::Constructor(_));
                    write_operand(f, member, parens)?;
                }
                Ok(())
            }
            TypeNode::Function(signature) => write_signature(f, signature, " => "),
            TypeNode::Constructor(signature) => {
                f.write_str("new ")?;
                write_signature(f, signature, " => ")
            }
            TypeNode::Object(members) => {
                if members.is_empty() {
                    return f.write_str("{}");
                }
                f.write_str("{ ")?;
                for member in members {
                    write!(f, "{member}; ")?;
                }
                f.write_char('}')
            }
            TypeNode::KeyOf(operand) => {
                f.write_str("keyof ")?;
                write_operand(f, operand, needs_parens_as_prefix_operand(operand))
            }
            TypeNode::Readonly(operand) => {
                f.write_str("readonly ")?;
                write_operand(f, operand, needs_parens_as_prefix_operand(operand))
            }
            TypeNode::Predicate { parameter, ty } => write!(f, "{parameter} is {ty}"),
        }
    }
}

fn needs_parens_as_postfix_operand(ty: &TypeNode) -> bool {
    matches!(
        ty,
        TypeNode::Union(_)
            | TypeNode::Intersection(_)
            | TypeNode::Function(_)
            | TypeNode::Constructor(_)
            | TypeNode::KeyOf(_)
            | TypeNode::Readonly(_)
            | TypeNode::Predicate { .. }
    )
}

fn needs_parens_as_prefix_operand(ty: &TypeNode) -> bool {
    matches!(
        ty,
        TypeNode::Union(_) | TypeNode::Intersection(_) | TypeNode::Function(_) | TypeNode::Constructor(_)
    )
}

fn write_operand(f: &mut Formatter<'_>, ty: &TypeNode, parens: bool) -> fmt::Result {
    if parens { write!(f, "({ty})") } else { write!(f, "{ty}") }
}

fn write_list<T: Display>(f: &mut Formatter<'_>, items: impl Iterator<Item = T>, separator: &str) -> fmt::Result {
    for (i, item) in items.enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

/// `<T>(a: T) => R` with `return_separator` between `)` and the return type.
fn write_signature(f: &mut Formatter<'_>, signature: &Signature, return_separator: &str) -> fmt::Result {
    if !signature.type_params.is_empty() {
        f.write_char('<')?;
        write_list(f, signature.type_params.iter(), ", ")?;
        f.write_char('>')?;
    }
    f.write_char('(')?;
    write_list(f, signature.params.iter(), ", ")?;
    f.write_char(')')?;
    f.write_str(return_separator)?;
    write!(f, "{}", signature.return_type)
}

/// Member-style text: `<T>(a: T): R`.
impl Display for Signature {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_signature(f, self, ": ")
    }
}

impl Display for TypeParam {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if let Some(constraint) = &self.constraint {
            write!(f, " extends {constraint}")?;
        }
        if let Some(default) = &self.default {
            write!(f, " = {default}")?;
        }
        Ok(())
    }
}

impl Display for Param {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.rest {
            f.write_str("...")?;
        }
        f.write_str(&self.name)?;
        if self.optional {
            f.write_char('?')?;
        }
        write!(f, ": {}", self.ty)
    }
}

impl Display for TupleElement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.rest {
            f.write_str("...")?;
        }
        let parens = self.optional && needs_parens_as_postfix_operand(&self.ty);
        write_operand(f, &self.ty, parens)?;
        if self.optional {
            f.write_char('?')?;
        }
        Ok(())
    }
}

impl Display for LiteralType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            LiteralType::String(value) => write!(f, "{value:?}"),
            LiteralType::Number(text) => f.write_str(text),
            LiteralType::Boolean(value) => write!(f, "{value}"),
        }
    }
}

impl Display for PropertyName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            PropertyName::Identifier(name) | PropertyName::Numeric(name) => f.write_str(name),
            PropertyName::String(name) => write!(f, "{name:?}"),
            PropertyName::Computed(expr) => write!(f, "[{expr}]"),
        }
    }
}

impl Display for ObjectMember {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ObjectMember::Property { name, readonly, optional, ty } => {
                if *readonly {
                    f.write_str("readonly ")?;
                }
                write!(f, "{name}{}: {ty}", if *optional { "?" } else { "" })
            }
            ObjectMember::Method { name, optional, signature } => {
                write!(f, "{name}{}{signature}", if *optional { "?" } else { "" })
            }
            ObjectMember::Index { readonly, key_name, key_type, ty } => {
                if *readonly {
                    f.write_str("readonly ")?;
                }
                write!(f, "[{key_name}: {key_type}]: {ty}")
            }
            ObjectMember::Call(signature) => write!(f, "{signature}"),
            ObjectMember::Construct(signature) => write!(f, "new {signature}"),
        }
    }
}

impl Display for MemberNodeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        ObjectMember::from(self.clone()).fmt(f)
    }
}
