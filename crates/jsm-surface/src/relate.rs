//! Assignability between type expressions.
//!
//! This is the structural relation the merge rules need, not a full type
//! checker: enough to decide whether an extension's member narrows the base
//! member or contradicts it. The relation is conservative; when it cannot
//! prove assignability it answers `false`, which surfaces as a merge
//! conflict an author can look at.
//!
//! Rules beyond identity:
//! - `any`/`unknown` accept everything, `any` and `never` go anywhere
//! - `int` and `number` are interchangeable; numeric literals go to `number`,
//!   and to `int` only when integral (negative sentinels included)
//! - unions/intersections distribute as usual
//! - `Array<T>` is `T[]`, `ReadonlyArray<T>` is `readonly T[]`
//! - functions compare parameters bivariantly and returns covariantly
//! - object type literals compare member by member

use indexmap::IndexMap;
use jsm_common::limits::MAX_RELATION_DEPTH;
use jsm_syntax::ast::{Keyword, LiteralType, ObjectMember, Signature, TypeNode, TypeParam};
use rustc_hash::FxHashMap;

use crate::decl::{TypeDecl, TypeExpr};
use crate::index::{admits_literal, is_index_type};

/// `source` assignable to `target`, without alias information.
pub fn is_assignable(source: &TypeExpr, target: &TypeExpr) -> bool {
    AssignabilityChecker::new().is_assignable(source, target)
}

pub struct AssignabilityChecker<'a> {
    types: Option<&'a IndexMap<String, TypeDecl>>,
    depth: u32,
}

impl Default for AssignabilityChecker<'_> {
    fn default() -> Self {
        AssignabilityChecker::new()
    }
}

impl<'a> AssignabilityChecker<'a> {
    pub fn new() -> Self {
        AssignabilityChecker { types: None, depth: 0 }
    }

    /// Expand non-generic type aliases found in `types` while relating.
    pub fn with_types(types: &'a IndexMap<String, TypeDecl>) -> Self {
        AssignabilityChecker { types: Some(types), depth: 0 }
    }

    pub fn is_assignable(&mut self, source: &TypeExpr, target: &TypeExpr) -> bool {
        if source == target {
            return true;
        }
        if self.depth >= MAX_RELATION_DEPTH {
            return false;
        }
        self.depth += 1;
        let result = self.check(source, target);
        self.depth -= 1;
        result
    }

    /// Every overload of `base` is served by some overload of `extension`.
    pub fn overloads_cover(&mut self, extension: &[Signature], base: &[Signature]) -> bool {
        base.iter()
            .all(|wanted| extension.iter().any(|offered| self.signature_covers(offered, wanted)))
    }

    /// `offered` can stand in wherever `wanted` was declared: it accepts at
    /// least the same argument counts, its parameters relate to the wanted
    /// ones in either direction, and its return type is assignable.
    pub fn signature_covers(&mut self, offered: &Signature, wanted: &Signature) -> bool {
        if offered.type_params.len() != wanted.type_params.len() {
            return false;
        }
        let renamed;
        let offered = if offered.type_params.is_empty() || same_param_names(&offered.type_params, &wanted.type_params) {
            offered
        } else {
            renamed = rename_type_params(offered, &wanted.type_params);
            &renamed
        };

        if offered.min_arity() > wanted.min_arity() {
            return false;
        }
        match (offered.max_arity(), wanted.max_arity()) {
            (Some(offered_max), Some(wanted_max)) if offered_max < wanted_max => return false,
            (Some(_), None) => return false,
            _ => {}
        }

        let offered_params: Vec<_> = offered.value_params().collect();
        for (i, wanted_param) in wanted.value_params().enumerate() {
            let Some(offered_param) = offered_params.get(i).or_else(|| offered_params.last().filter(|p| p.rest))
            else {
                break;
            };
            let offered_ty = rest_element(offered_param.rest, &offered_param.ty);
            let wanted_ty = rest_element(wanted_param.rest, &wanted_param.ty);
            if !self.is_assignable(wanted_ty, offered_ty) && !self.is_assignable(offered_ty, wanted_ty) {
                return false;
            }
        }

        self.return_assignable(&offered.return_type, &wanted.return_type)
    }

    fn return_assignable(&mut self, source: &TypeExpr, target: &TypeExpr) -> bool {
        target.is_keyword(Keyword::Void) || self.is_assignable(source, target)
    }

    // =========================================================================
    // Structural rules
    // =========================================================================

    fn check(&mut self, source: &TypeExpr, target: &TypeExpr) -> bool {
        if let Some(expanded) = self.expand_alias(source) {
            return self.is_assignable(&expanded, target);
        }
        if let Some(expanded) = self.expand_alias(target) {
            return self.is_assignable(source, &expanded);
        }

        if matches!(target, TypeNode::Keyword(Keyword::Any | Keyword::Unknown))
            || matches!(source, TypeNode::Keyword(Keyword::Any | Keyword::Never))
        {
            return true;
        }

        // Unions and intersections before anything structural.
        if let TypeNode::Union(members) = source {
            return members.iter().all(|member| self.is_assignable(member, target));
        }
        if let TypeNode::Intersection(members) = target {
            return members.iter().all(|member| self.is_assignable(source, member));
        }
        if let TypeNode::Union(members) = target {
            return members.iter().any(|member| self.is_assignable(source, member));
        }
        if let TypeNode::Intersection(members) = source {
            return members.iter().any(|member| self.is_assignable(member, target));
        }

        if target.is_keyword(Keyword::Object) {
            return match normalize(source) {
                Shape::Array(_) | Shape::ReadonlyArray(_) | Shape::Tuple(_) => true,
                Shape::Other(other) => matches!(
                    other,
                    TypeNode::Reference { .. } | TypeNode::Function(_) | TypeNode::Constructor(_) | TypeNode::Object(_)
                ) && !is_index_type(other),
            };
        }

        if let Some(result) = relate_primitives(source, target) {
            return result;
        }

        match (normalize(source), normalize(target)) {
            (Shape::Array(s), Shape::Array(t)) | (Shape::Array(s), Shape::ReadonlyArray(t)) => self.is_assignable(s, t),
            (Shape::ReadonlyArray(s), Shape::ReadonlyArray(t)) => self.is_assignable(s, t),
            (Shape::Tuple(elements), Shape::Array(t) | Shape::ReadonlyArray(t)) => {
                elements.iter().all(|e| self.is_assignable(rest_element(e.rest, &e.ty), t))
            }
            (Shape::Tuple(s), Shape::Tuple(t)) => {
                s.len() == t.len()
                    && s.iter().zip(t).all(|(s, t)| {
                        s.rest == t.rest && (t.optional || !s.optional) && self.is_assignable(&s.ty, &t.ty)
                    })
            }
            (Shape::Other(s), Shape::Other(t)) => self.check_structural(s, t),
            _ => false,
        }
    }

    fn check_structural(&mut self, source: &TypeExpr, target: &TypeExpr) -> bool {
        match (source, target) {
            (
                TypeNode::Reference { name: s_name, args: s_args },
                TypeNode::Reference { name: t_name, args: t_args },
            ) => {
                s_name == t_name
                    && s_args.len() == t_args.len()
                    && s_args.iter().zip(t_args).all(|(s, t)| self.is_assignable(s, t))
            }
            (TypeNode::Function(s), TypeNode::Function(t)) | (TypeNode::Constructor(s), TypeNode::Constructor(t)) => {
                self.function_assignable(s, t)
            }
            (TypeNode::Object(s), TypeNode::Object(t)) => self.object_assignable(s, t),
            (TypeNode::Predicate { parameter: sp, ty: s }, TypeNode::Predicate { parameter: tp, ty: t }) => {
                sp == tp && self.is_assignable(s, t)
            }
            _ => false,
        }
    }

    /// Function-typed values: the source may take fewer parameters than the
    /// target passes, not more required ones.
    fn function_assignable(&mut self, source: &Signature, target: &Signature) -> bool {
        if source.type_params.len() != target.type_params.len() {
            return false;
        }
        let source_params: Vec<_> = source.value_params().collect();
        if source.min_arity() > target.value_params().count() && target.max_arity().is_some() {
            return false;
        }
        for (i, target_param) in target.value_params().enumerate() {
            let Some(source_param) = source_params.get(i).or_else(|| source_params.last().filter(|p| p.rest)) else {
                break;
            };
            let s = rest_element(source_param.rest, &source_param.ty);
            let t = rest_element(target_param.rest, &target_param.ty);
            if !self.is_assignable(t, s) && !self.is_assignable(s, t) {
                return false;
            }
        }
        self.return_assignable(&source.return_type, &target.return_type)
    }

    fn object_assignable(&mut self, source: &[ObjectMember], target: &[ObjectMember]) -> bool {
        target.iter().all(|wanted| {
            let found = source.iter().find(|offered| object_member_key(offered) == object_member_key(wanted));
            match (found, wanted) {
                (None, ObjectMember::Property { optional: true, .. } | ObjectMember::Method { optional: true, .. }) => {
                    true
                }
                (None, _) => false,
                (Some(ObjectMember::Property { ty: s, .. }), ObjectMember::Property { ty: t, .. }) => {
                    self.is_assignable(s, t)
                }
                (Some(ObjectMember::Index { ty: s, .. }), ObjectMember::Index { ty: t, .. }) => {
                    self.is_assignable(s, t)
                }
                (
                    Some(ObjectMember::Method { signature: s, .. }),
                    ObjectMember::Method { signature: t, .. },
                )
                | (Some(ObjectMember::Call(s)), ObjectMember::Call(t))
                | (Some(ObjectMember::Construct(s)), ObjectMember::Construct(t)) => self.signature_covers(s, t),
                _ => false,
            }
        })
    }

    fn expand_alias(&self, ty: &TypeExpr) -> Option<TypeExpr> {
        expand_alias(self.types?, ty).cloned()
    }
}

/// One step of non-generic alias expansion. `int` is never expanded.
pub fn expand_alias<'t>(types: &'t IndexMap<String, TypeDecl>, ty: &TypeExpr) -> Option<&'t TypeExpr> {
    let TypeNode::Reference { name, args } = ty else {
        return None;
    };
    if !args.is_empty() || name == crate::index::INDEX_TYPE_NAME {
        return None;
    }
    match types.get(name)? {
        TypeDecl::Alias(alias) if alias.type_params.is_empty() && alias.ty != *ty => Some(&alias.ty),
        _ => None,
    }
}

/// Keyword and literal rules; `None` when neither side is primitive.
fn relate_primitives(source: &TypeExpr, target: &TypeExpr) -> Option<bool> {
    let numeric_kind = |ty: &TypeExpr| ty.is_keyword(Keyword::Number) || is_index_type(ty);

    if numeric_kind(target) {
        return Some(match source {
            _ if numeric_kind(source) => true,
            TypeNode::Literal(literal @ LiteralType::Number(_)) => literal
                .numeric_value()
                .is_some_and(|value| target.is_keyword(Keyword::Number) || admits_literal(value)),
            _ => false,
        });
    }

    match (source, target) {
        (TypeNode::Literal(LiteralType::String(_)), TypeNode::Keyword(Keyword::String))
        | (TypeNode::Literal(LiteralType::Boolean(_)), TypeNode::Keyword(Keyword::Boolean))
        | (TypeNode::Keyword(Keyword::Undefined), TypeNode::Keyword(Keyword::Void))
        | (TypeNode::Predicate { .. }, TypeNode::Keyword(Keyword::Boolean)) => Some(true),
        (TypeNode::Keyword(_) | TypeNode::Literal(_), _) | (_, TypeNode::Keyword(_)) => Some(false),
        (_, TypeNode::Literal(_)) => Some(false),
        _ => None,
    }
}

enum Shape<'t> {
    Array(&'t TypeExpr),
    ReadonlyArray(&'t TypeExpr),
    Tuple(&'t [jsm_syntax::ast::TupleElement]),
    Other(&'t TypeExpr),
}

fn normalize(ty: &TypeExpr) -> Shape<'_> {
    match ty {
        TypeNode::Array(element) => Shape::Array(element),
        TypeNode::Tuple(elements) => Shape::Tuple(elements),
        TypeNode::Readonly(inner) => match inner.as_ref() {
            TypeNode::Array(element) => Shape::ReadonlyArray(element),
            TypeNode::Tuple(elements) => Shape::Tuple(elements),
            other => Shape::Other(other),
        },
        TypeNode::Reference { name, args } if args.len() == 1 && name == "Array" => Shape::Array(&args[0]),
        TypeNode::Reference { name, args } if args.len() == 1 && name == "ReadonlyArray" => {
            Shape::ReadonlyArray(&args[0])
        }
        other => Shape::Other(other),
    }
}

/// Element type of a rest parameter (`...items: T[]` → `T`).
fn rest_element(rest: bool, ty: &TypeExpr) -> &TypeExpr {
    if !rest {
        return ty;
    }
    match normalize(ty) {
        Shape::Array(element) | Shape::ReadonlyArray(element) => element,
        _ => ty,
    }
}

fn object_member_key(member: &ObjectMember) -> String {
    match member {
        ObjectMember::Property { name, .. } | ObjectMember::Method { name, .. } => name.key(),
        ObjectMember::Index { key_type, .. } => format!("[{key_type}]"),
        ObjectMember::Call(_) => "()".to_string(),
        ObjectMember::Construct(_) => "new()".to_string(),
    }
}

fn same_param_names(a: &[TypeParam], b: &[TypeParam]) -> bool {
    a.iter().zip(b).all(|(a, b)| a.name == b.name)
}

/// Rename `signature`'s type parameters to `names`, positionally.
fn rename_type_params(signature: &Signature, names: &[TypeParam]) -> Signature {
    let map: FxHashMap<&str, &str> = signature
        .type_params
        .iter()
        .zip(names)
        .map(|(from, to)| (from.name.as_str(), to.name.as_str()))
        .collect();
    let mut renamed = signature.clone();
    for (param, to) in renamed.type_params.iter_mut().zip(names) {
        param.name.clone_from(&to.name);
        if let Some(constraint) = &mut param.constraint {
            substitute(constraint, &map);
        }
        if let Some(default) = &mut param.default {
            substitute(default, &map);
        }
    }
    for param in &mut renamed.params {
        substitute(&mut param.ty, &map);
    }
    substitute(&mut renamed.return_type, &map);
    renamed
}

fn substitute(ty: &mut TypeExpr, map: &FxHashMap<&str, &str>) {
    match ty {
        TypeNode::Reference { name, args } => {
            if args.is_empty()
                && let Some(to) = map.get(name.as_str())
            {
                *name = (*to).to_string();
            }
            args.iter_mut().for_each(|arg| substitute(arg, map));
        }
        TypeNode::Keyword(_) | TypeNode::Literal(_) => {}
        TypeNode::Array(inner) | TypeNode::KeyOf(inner) | TypeNode::Readonly(inner) => substitute(inner, map),
        TypeNode::Predicate { ty, .. } => substitute(ty, map),
        TypeNode::Tuple(elements) => elements.iter_mut().for_each(|e| substitute(&mut e.ty, map)),
        TypeNode::Union(members) | TypeNode::Intersection(members) => {
            members.iter_mut().for_each(|m| substitute(m, map));
        }
        TypeNode::Function(signature) | TypeNode::Constructor(signature) => {
            for param in &mut signature.params {
                substitute(&mut param.ty, map);
            }
            substitute(&mut signature.return_type, map);
        }
        TypeNode::Object(members) => {
            for member in members {
                match member {
                    ObjectMember::Property { ty, .. } => substitute(ty, map),
                    ObjectMember::Index { key_type, ty, .. } => {
                        substitute(key_type, map);
                        substitute(ty, map);
                    }
                    ObjectMember::Method { signature, .. }
                    | ObjectMember::Call(signature)
                    | ObjectMember::Construct(signature) => {
                        for param in &mut signature.params {
                            substitute(&mut param.ty, map);
                        }
                        substitute(&mut signature.return_type, map);
                    }
                }
            }
        }
    }
}
