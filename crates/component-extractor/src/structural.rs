//! Properties read from a component's parameter destructuring.
//!
//! `({ label, size = "md", onClick }: Props)` names three properties even
//! when `Props` cannot be resolved, and is the only place defaults are
//! written. Types are guessed from default values only.

use crate::functions::FunctionLike;
use component_registry::{PropertyDescriptor, PropertySource};
use swc_common::Spanned;
use swc_ecma_ast::{Expr, Lit, ObjectPat, ObjectPatProp, Pat, PropName};
use tsx_parser::ParsedFile;

/// Reads the destructured properties of a component's first parameter.
pub(crate) fn structural_properties(
    file: &ParsedFile,
    function: &FunctionLike<'_>,
) -> Vec<PropertyDescriptor> {
    let Some(pattern) = function.first_pat().and_then(object_pattern) else {
        return Vec::new();
    };

    let mut props = Vec::new();
    for prop in &pattern.props {
        match prop {
            ObjectPatProp::Assign(assign) => {
                let name = assign.key.id.sym.as_str();
                props.push(structural_prop(file, name, assign.value.as_deref()));
            }
            ObjectPatProp::KeyValue(key_value) => {
                let Some(name) = prop_name(&key_value.key) else {
                    continue;
                };
                let default = match &*key_value.value {
                    Pat::Assign(assign) => Some(&*assign.right),
                    _ => None,
                };
                props.push(structural_prop(file, &name, default));
            }
            ObjectPatProp::Rest(_) => {}
        }
    }
    props
}

fn object_pattern(pat: &Pat) -> Option<&ObjectPat> {
    match pat {
        Pat::Object(object) => Some(object),
        Pat::Assign(assign) => object_pattern(&assign.left),
        _ => None,
    }
}

fn structural_prop(file: &ParsedFile, name: &str, default: Option<&Expr>) -> PropertyDescriptor {
    let ty = default.map_or(PropertyDescriptor::UNKNOWN_TYPE, type_of_default);
    let prop = PropertyDescriptor::new(name, ty, PropertySource::Structural);
    match default.and_then(|expr| file.signature(expr.span())) {
        Some(text) => prop.with_required(false).with_default(text),
        None => prop,
    }
}

fn type_of_default(expr: &Expr) -> &'static str {
    match expr {
        Expr::Lit(Lit::Str(_)) | Expr::Tpl(_) => "string",
        Expr::Lit(Lit::Num(_)) => "number",
        Expr::Lit(Lit::Bool(_)) => "boolean",
        Expr::Arrow(_) | Expr::Fn(_) => "function",
        Expr::Array(_) => "array",
        Expr::Object(_) => "object",
        _ => PropertyDescriptor::UNKNOWN_TYPE,
    }
}

pub(crate) fn prop_name(key: &PropName) -> Option<String> {
    match key {
        PropName::Ident(ident) => Some(ident.sym.to_string()),
        PropName::Str(value) => value.value.as_str().map(str::to_string),
        PropName::Num(number) => Some(number.value.to_string()),
        _ => None,
    }
}
