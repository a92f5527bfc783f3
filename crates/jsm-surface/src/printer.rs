//! Deterministic declaration text for a surface.
//!
//! Output depends only on the merged declarations and their order, so the
//! same mode and set versions always print byte-identical text.

use std::fmt::Write;

use jsm_syntax::ast::TypeParam;

use crate::decl::{Declarations, InterfaceDecl, Member, MemberKind, TypeDecl, ValueDecl};
use crate::surface::GlobalTypeSurface;

const INDENT: &str = "    ";

/// Header comment naming mode and sets, then the declarations.
pub fn print_surface(surface: &GlobalTypeSurface) -> String {
    let mut out = String::new();
    out.push_str("// jsm global type surface\n");
    let _ = writeln!(out, "// mode: {}", surface.mode());
    let sets: Vec<String> = surface.sets().iter().map(|set| format!("{}@{}", set.id, set.version)).collect();
    let _ = writeln!(out, "// sets: {}", sets.join(", "));
    out.push('\n');
    out.push_str(&print_declarations(surface.declarations()));
    out
}

pub fn print_declarations(declarations: &Declarations) -> String {
    let mut out = String::new();
    for decl in declarations.types.values() {
        match decl {
            TypeDecl::Interface(interface) => print_interface(&mut out, interface),
            TypeDecl::Alias(alias) => {
                let _ = writeln!(out, "type {}{} = {};", alias.name, type_params(&alias.type_params), alias.ty);
            }
        }
        out.push('\n');
    }
    for decl in declarations.values.values() {
        match decl {
            ValueDecl::Variable(variable) => {
                let _ = writeln!(out, "declare {} {}: {};", variable.kind.keyword(), variable.name, variable.ty);
            }
            ValueDecl::Function(function) => {
                for signature in &function.overloads {
                    let _ = writeln!(out, "declare function {}{signature};", function.name);
                }
            }
        }
    }
    out
}

fn type_params(params: &[TypeParam]) -> String {
    if params.is_empty() {
        return String::new();
    }
    let inner: Vec<String> = params.iter().map(ToString::to_string).collect();
    format!("<{}>", inner.join(", "))
}

fn print_interface(out: &mut String, interface: &InterfaceDecl) {
    let _ = write!(out, "interface {}{}", interface.name, type_params(&interface.type_params));
    if !interface.extends.is_empty() {
        let heritage: Vec<String> = interface.extends.iter().map(ToString::to_string).collect();
        let _ = write!(out, " extends {}", heritage.join(", "));
    }
    if interface.members.is_empty() {
        out.push_str(" {}\n");
        return;
    }
    out.push_str(" {\n");
    for member in interface.members.values() {
        print_member(out, member);
    }
    out.push_str("}\n");
}

fn print_member(out: &mut String, member: &Member) {
    let readonly = if member.is_readonly() { "readonly " } else { "" };
    let optional = if member.is_optional() { "?" } else { "" };
    let name = match &member.name {
        Some(name) => name.to_string(),
        None => member.key.to_string(),
    };
    match &member.kind {
        MemberKind::Property(ty) => {
            let _ = writeln!(out, "{INDENT}{readonly}{name}{optional}: {ty};");
        }
        MemberKind::Index { key_name, key_type, value } => {
            let _ = writeln!(out, "{INDENT}{readonly}[{key_name}: {key_type}]: {value};");
        }
        MemberKind::Method(overloads) => {
            for signature in overloads {
                let _ = writeln!(out, "{INDENT}{name}{optional}{signature};");
            }
        }
        MemberKind::Call(overloads) => {
            for signature in overloads {
                let _ = writeln!(out, "{INDENT}{signature};");
            }
        }
        MemberKind::Construct(overloads) => {
            for signature in overloads {
                let _ = writeln!(out, "{INDENT}new {signature};");
            }
        }
    }
}
