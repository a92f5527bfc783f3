//! The semantic index type.
//!
//! `int` names every index, length, count and position. It is declared by
//! the base set as `type int = number;` and relates to `number` in both
//! directions; the distinct name is what downstream bounds analysis keys on.
//! Negative sentinels such as `-1` are index values.

use jsm_syntax::ast::{Keyword, LiteralType, TypeNode};

use crate::decl::TypeExpr;

pub const INDEX_TYPE_NAME: &str = "int";

/// Returned by `indexOf` and friends when nothing matches.
pub const NOT_FOUND: i64 = -1;

/// `int`, written as a plain reference.
pub fn is_index_type(ty: &TypeExpr) -> bool {
    ty.is_reference_to(INDEX_TYPE_NAME)
}

/// The index type as a type expression.
pub fn index_type() -> TypeExpr {
    TypeNode::reference(INDEX_TYPE_NAME)
}

/// Whether a numeric value is a valid index value: finite and integral, any sign.
pub fn admits_literal(value: f64) -> bool {
    value.is_finite() && value.fract() == 0.0
}

/// `number`, `int` or a numeric literal.
pub fn is_numeric(ty: &TypeExpr) -> bool {
    match ty {
        TypeNode::Keyword(Keyword::Number) => true,
        TypeNode::Literal(literal @ LiteralType::Number(_)) => literal.numeric_value().is_some(),
        other => is_index_type(other),
    }
}

/// `int`, an integral literal, or a union of those that may also admit
/// `undefined` or `null`.
pub fn is_index_valued(ty: &TypeExpr) -> bool {
    match ty {
        TypeNode::Union(members) => {
            let nullish = |member: &TypeExpr| member.is_keyword(Keyword::Undefined) || member.is_keyword(Keyword::Null);
            members.iter().all(|member| nullish(member) || is_index_valued(member))
                && members.iter().any(|member| !nullish(member))
        }
        TypeNode::Literal(literal @ LiteralType::Number(_)) => literal.numeric_value().is_some_and(admits_literal),
        other => is_index_type(other),
    }
}

/// `number`, or a literal no index could hold.
pub fn is_plain_number(ty: &TypeExpr) -> bool {
    match ty {
        TypeNode::Union(members) => members.iter().any(is_plain_number),
        TypeNode::Keyword(Keyword::Number) => true,
        TypeNode::Literal(literal @ LiteralType::Number(_)) => {
            literal.numeric_value().is_some_and(|value| !admits_literal(value))
        }
        _ => false,
    }
}
