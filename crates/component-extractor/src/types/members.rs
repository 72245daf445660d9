//! Members of interfaces and type literals.

use super::TypeEngine;
use crate::functions::entity_name;
use component_registry::{PropertyDescriptor, PropertySource};
use swc_common::{Span, Spanned};
use swc_ecma_ast::{
    Expr, Lit, TsFnParam, TsLit, TsType, TsTypeElement, TsUnionOrIntersectionType,
};
use tsx_parser::{ExportBinding, ImportedName, ParsedFile, TypeDecl};

/// The outcome of resolving one interface or type-literal member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberResolution {
    /// The member's name and type are known.
    Resolved(PropertyDescriptor),
    /// The member exists but its type could not be read; `fallback` is
    /// recorded with type `unknown`.
    Unknown {
        /// The fallback property.
        fallback: PropertyDescriptor,
        /// Why the type is unknown.
        reason: String,
    },
}

impl MemberResolution {
    /// The property to record for this member.
    pub fn into_property(self) -> PropertyDescriptor {
        match self {
            MemberResolution::Resolved(prop) => prop,
            MemberResolution::Unknown { fallback, reason } => {
                tracing::debug!(property = %fallback.name, %reason, "member type unknown");
                fallback
            }
        }
    }
}

impl TypeEngine<'_> {
    pub(super) fn resolve_members(
        &self,
        file: &ParsedFile,
        members: &[TsTypeElement],
        depth: usize,
    ) -> Vec<PropertyDescriptor> {
        members
            .iter()
            .filter_map(|member| self.resolve_member(file, member, depth))
            .map(MemberResolution::into_property)
            .collect()
    }

    /// Resolves one member. Index, call and construct signatures are not
    /// properties and yield `None`.
    pub fn resolve_member(
        &self,
        file: &ParsedFile,
        member: &TsTypeElement,
        depth: usize,
    ) -> Option<MemberResolution> {
        match member {
            TsTypeElement::TsPropertySignature(sig) => {
                let name = match member_name(file, &sig.key, sig.computed) {
                    Ok(name) => name,
                    Err(text) => {
                        return Some(unknown(file, text, sig.span, !sig.optional, "computed key"))
                    }
                };
                let Some(ann) = &sig.type_ann else {
                    let reason = "missing type annotation";
                    return Some(unknown(file, name, sig.span, !sig.optional, reason));
                };
                let (ty, options) = self.describe_member_type(file, &ann.type_ann, depth);
                let prop = documented(
                    file,
                    sig.span,
                    PropertyDescriptor::new(name, ty, PropertySource::ResolvedType)
                        .with_required(!sig.optional)
                        .with_options(options),
                );
                Some(MemberResolution::Resolved(prop))
            }
            TsTypeElement::TsMethodSignature(method) => {
                let name = match member_name(file, &method.key, method.computed) {
                    Ok(name) => name,
                    Err(text) => {
                        return Some(unknown(file, text, method.span, !method.optional, "computed key"))
                    }
                };
                let params: Vec<String> = method
                    .params
                    .iter()
                    .filter_map(|param| fn_param_text(file, param))
                    .collect();
                let ret = method
                    .type_ann
                    .as_ref()
                    .and_then(|ann| file.signature(ann.type_ann.span()))
                    .unwrap_or_else(|| "void".to_string());
                let ty = format!("({}) => {}", params.join(", "), ret);
                let prop = documented(
                    file,
                    method.span,
                    PropertyDescriptor::new(name, ty, PropertySource::ResolvedType)
                        .with_required(!method.optional),
                );
                Some(MemberResolution::Resolved(prop))
            }
            TsTypeElement::TsGetterSignature(getter) => {
                let name = match member_name(file, &getter.key, getter.computed) {
                    Ok(name) => name,
                    Err(text) => return Some(unknown(file, text, getter.span, true, "computed key")),
                };
                let Some(ann) = &getter.type_ann else {
                    let reason = "missing type annotation";
                    return Some(unknown(file, name, getter.span, true, reason));
                };
                let (ty, options) = self.describe_member_type(file, &ann.type_ann, depth);
                let prop = documented(
                    file,
                    getter.span,
                    PropertyDescriptor::new(name, ty, PropertySource::ResolvedType)
                        .with_options(options),
                );
                Some(MemberResolution::Resolved(prop))
            }
            _ => None,
        }
    }

    /// The recorded type text and literal options of a member type.
    fn describe_member_type(
        &self,
        file: &ParsedFile,
        ty: &TsType,
        depth: usize,
    ) -> (String, Vec<String>) {
        if let Some(expanded) = self.literal_type(file, ty, depth) {
            return expanded;
        }
        let text = file
            .signature(ty.span())
            .unwrap_or_else(|| PropertyDescriptor::UNKNOWN_TYPE.to_string());
        (text, Vec::new())
    }

    /// The literal members of `ty`, following aliases: used for `Pick`
    /// and `Omit` keys.
    pub(super) fn literal_members(&self, file: &ParsedFile, ty: &TsType, depth: usize) -> Vec<String> {
        self.literal_type(file, ty, depth)
            .map(|(_, options)| options)
            .unwrap_or_default()
    }

    /// A literal union written inline or behind an alias, as
    /// `(union text, members)`.
    fn literal_type(
        &self,
        file: &ParsedFile,
        ty: &TsType,
        depth: usize,
    ) -> Option<(String, Vec<String>)> {
        if let Some(options) = literal_union(ty) {
            return Some((file.signature(ty.span())?, options));
        }
        match ty {
            TsType::TsTypeRef(type_ref) if type_ref.type_params.is_none() => {
                self.literal_alias(file, &entity_name(&type_ref.type_name), depth)
            }
            _ => None,
        }
    }

    fn literal_alias(
        &self,
        file: &ParsedFile,
        name: &str,
        depth: usize,
    ) -> Option<(String, Vec<String>)> {
        if depth > self.session.config().max_type_depth || name.contains('.') {
            return None;
        }
        if let Some(decl) = file.type_decl(name) {
            return match decl {
                TypeDecl::Alias(alias) => self.literal_type(file, &alias.type_ann, depth + 1),
                TypeDecl::Interface(_) => None,
            };
        }

        let binding = file.index().import(name)?;
        let imported = match &binding.imported {
            ImportedName::Named(imported) => imported.as_str(),
            ImportedName::Default => "default",
            ImportedName::Namespace => return None,
        };
        let path = self.session.resolve_module(file.path(), &binding.specifier)?;
        let target = self.session.load(&path)?;
        let local = match target.index().export(imported) {
            Some(ExportBinding::Local(local)) => local.to_string(),
            _ => imported.to_string(),
        };
        self.literal_alias(&target, &local, depth + 1)
    }
}

fn member_name(file: &ParsedFile, key: &Expr, computed: bool) -> Result<String, String> {
    let name = match key {
        Expr::Ident(ident) if !computed => Some(ident.sym.to_string()),
        Expr::Lit(Lit::Str(value)) => value.value.as_str().map(str::to_string),
        Expr::Lit(Lit::Num(number)) => Some(number.value.to_string()),
        _ => None,
    };
    name.ok_or_else(|| {
        file.signature(key.span())
            .unwrap_or_else(|| PropertyDescriptor::UNKNOWN_TYPE.to_string())
    })
}

fn fn_param_text(file: &ParsedFile, param: &TsFnParam) -> Option<String> {
    match param {
        TsFnParam::Ident(binding) => {
            let optional = if binding.id.optional { "?" } else { "" };
            let name = binding.id.sym.as_str();
            match &binding.type_ann {
                Some(ann) => Some(format!(
                    "{name}{optional}: {}",
                    file.signature(ann.type_ann.span())?
                )),
                None => Some(format!("{name}{optional}")),
            }
        }
        other => file.signature(other.span()),
    }
}

fn unknown(
    file: &ParsedFile,
    name: String,
    span: Span,
    required: bool,
    reason: &str,
) -> MemberResolution {
    MemberResolution::Unknown {
        fallback: documented(file, span, PropertyDescriptor::unknown(name).with_required(required)),
        reason: reason.to_string(),
    }
}

/// Attaches the member's leading doc comment.
fn documented(file: &ParsedFile, span: Span, prop: PropertyDescriptor) -> PropertyDescriptor {
    let Some(doc) = file.leading_doc(span) else {
        return prop;
    };
    let prop = prop.with_description(doc.description);
    match doc.default_value {
        Some(default_value) => prop.with_default(default_value),
        None => prop,
    }
}

/// The members of a literal union (`'sm' | 'md' | 1 | true`), ignoring
/// `undefined`, `null` and `void`. `None` if any other member is present.
pub(super) fn literal_union(ty: &TsType) -> Option<Vec<String>> {
    match ty {
        TsType::TsLitType(lit) => literal_text(&lit.lit).map(|text| vec![text]),
        TsType::TsParenthesizedType(paren) => literal_union(&paren.type_ann),
        TsType::TsUnionOrIntersectionType(TsUnionOrIntersectionType::TsUnionType(union)) => {
            let mut options = Vec::new();
            for member in &union.types {
                if is_nullish(member) {
                    continue;
                }
                options.extend(literal_union(member)?);
            }
            (!options.is_empty()).then_some(options)
        }
        _ => None,
    }
}

fn literal_text(lit: &TsLit) -> Option<String> {
    match lit {
        TsLit::Str(value) => value.value.as_str().map(str::to_string),
        TsLit::Number(number) => Some(number.value.to_string()),
        TsLit::Bool(value) => Some(value.value.to_string()),
        _ => None,
    }
}

pub(super) fn is_nullish(ty: &TsType) -> bool {
    use swc_ecma_ast::TsKeywordTypeKind::{TsNullKeyword, TsUndefinedKeyword, TsVoidKeyword};
    matches!(
        ty,
        TsType::TsKeywordType(keyword)
            if matches!(keyword.kind, TsNullKeyword | TsUndefinedKeyword | TsVoidKeyword)
    )
}
