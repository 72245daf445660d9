//! Finding the props type of a component declaration.

use super::TypeHandle;
use crate::functions::{callee_name, entity_name, FunctionLike};
use crate::session::ResolutionSession;
use swc_ecma_ast::{CallExpr, TsFnOrConstructorType, TsFnParam, TsType, TsTypeAliasDecl};
use tsx_parser::{ExportBinding, ImportedName, ParsedFile, TypeDecl};

/// The parts of a component declaration that can carry its props type.
#[derive(Debug, Clone)]
pub(crate) struct ComponentShape<'a> {
    /// The function that renders the component.
    pub(crate) function: FunctionLike<'a>,
    /// The variable's annotation: `const Button: FC<Props> = …`.
    pub(crate) annotation: Option<&'a TsType>,
    /// Higher-order wrapper calls, outermost first.
    pub(crate) wrappers: Vec<&'a CallExpr>,
}

/// Locates the type node describing a component's props.
///
/// Tried in order:
/// 1. the first parameter's annotation of an unwrapped function
/// 2. the first type argument of a generic component annotation
///    (`FC<Props>`), or the argument matching the props parameter of a
///    function-type alias (`type Wrapper<P> = (props: P) => …`)
/// 3. for wrapped components, the inner function's parameter annotation,
///    then the wrapper calls' type arguments (`forwardRef<Ref, Props>`)
pub(crate) fn get_component_property_type<'a>(
    file: &'a ParsedFile,
    shape: &ComponentShape<'a>,
    session: &ResolutionSession,
) -> Option<TypeHandle<'a>> {
    let handle = |ty: &'a TsType| TypeHandle { file, ty };

    if shape.wrappers.is_empty() {
        if let Some(ty) = shape.function.first_param_type() {
            return Some(handle(ty));
        }
    }

    if let Some(ty) = shape
        .annotation
        .and_then(|annotation| wrapper_type_argument(file, annotation, session))
    {
        return Some(handle(ty));
    }

    if shape.wrappers.is_empty() {
        return None;
    }
    if let Some(ty) = shape.function.first_param_type() {
        return Some(handle(ty));
    }
    shape
        .wrappers
        .iter()
        .rev()
        .find_map(|call| call_type_argument(*call))
        .map(handle)
}

/// `FC<Props>` / `Wrapper<Props>` to `Props`.
fn wrapper_type_argument<'a>(
    file: &ParsedFile,
    annotation: &'a TsType,
    session: &ResolutionSession,
) -> Option<&'a TsType> {
    let TsType::TsTypeRef(type_ref) = annotation else {
        return None;
    };
    let args = &type_ref.type_params.as_ref()?.params;
    let name = entity_name(&type_ref.type_name);
    if session.config().is_component_wrapper_type(&name) {
        return args.first().map(|arg| &**arg);
    }
    let index = props_param_index(file, &name, session)?;
    args.get(index).map(|arg| &**arg)
}

/// The type argument holding props in a wrapper call.
fn call_type_argument(call: &CallExpr) -> Option<&TsType> {
    let args = &call.type_args.as_ref()?.params;
    let is_forward_ref = callee_name(&call.callee)
        .is_some_and(|name| name.rsplit('.').next() == Some("forwardRef"));
    let index = if is_forward_ref && args.len() > 1 { 1 } else { 0 };
    args.get(index).map(|arg| &**arg)
}

/// For a function-type alias `type W<A, P> = (props: P) => …` named `name`,
/// returns the position of `P` in the alias's type parameters.
fn props_param_index(file: &ParsedFile, name: &str, session: &ResolutionSession) -> Option<usize> {
    if name.contains('.') {
        return None;
    }
    if let Some(TypeDecl::Alias(alias)) = file.type_decl(name) {
        return alias_props_index(alias);
    }

    let binding = file.index().import(name)?;
    let ImportedName::Named(imported) = &binding.imported else {
        return None;
    };
    let path = session.resolve_module(file.path(), &binding.specifier)?;
    let target = session.load(&path)?;
    let local = match target.index().export(imported) {
        Some(ExportBinding::Local(local)) => local.clone(),
        _ => imported.clone(),
    };
    match target.type_decl(&local)? {
        TypeDecl::Alias(alias) => alias_props_index(alias),
        TypeDecl::Interface(_) => None,
    }
}

fn alias_props_index(alias: &TsTypeAliasDecl) -> Option<usize> {
    let TsType::TsFnOrConstructorType(TsFnOrConstructorType::TsFnType(fn_type)) =
        &*alias.type_ann
    else {
        return None;
    };
    let param_type = match fn_type.params.first()? {
        TsFnParam::Ident(binding) => binding.type_ann.as_deref(),
        TsFnParam::Object(object) => object.type_ann.as_deref(),
        TsFnParam::Array(array) => array.type_ann.as_deref(),
        TsFnParam::Rest(rest) => rest.type_ann.as_deref(),
    }?;
    let TsType::TsTypeRef(type_ref) = &*param_type.type_ann else {
        return None;
    };
    let param_name = entity_name(&type_ref.type_name);
    alias
        .type_params
        .as_ref()?
        .params
        .iter()
        .position(|param| param.name.sym.as_str() == param_name)
}
