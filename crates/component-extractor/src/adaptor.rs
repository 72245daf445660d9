//! Per-file component extraction.
//!
//! One pass over a module's top-level items classifies each item into a
//! [`DeclarationShape`]. Every shape has its own handler that locates the
//! component's function, annotation and wrapper calls; located declarations
//! are then assembled into [`ComponentDescriptor`]s. Re-exports go through
//! the barrel resolver and are assembled from the file that declares them.

use crate::barrel::{resolve_export, BarrelContext, DeclarationTarget, ExportNode};
use crate::config::ExtractorConfig;
use crate::error::ExtractError;
use crate::functions::{
    callee_name, is_component_name, strip_parens, unwrap_component_expr, FunctionLike, Unwrapped,
    WrappedTarget,
};
use crate::loader::normalize_path;
use crate::merge::{deduplicate_components, merge_properties};
use crate::session::{is_relative_specifier, ResolutionSession};
use crate::structural::{prop_name, structural_properties};
use crate::tokens::{scan_class_list, scan_css, scan_item, scan_module, TokenScan};
use crate::types::{ComponentShape, TypeEngine};
use camino::{Utf8Path, Utf8PathBuf};
use component_registry::{
    ComponentDescriptor, Composition, DeclarationKind, Diagnostic, DiagnosticCode, Extensions,
    PropertyDescriptor, TokenUsage,
};
use rustc_hash::FxHashMap;
use std::sync::Arc;
use swc_common::{Span, Spanned};
use swc_ecma_ast::{
    AssignTarget, CallExpr, Decl, DefaultDecl, ExportAll, Expr, FnExpr, Function, MemberProp,
    Module, ModuleDecl, ModuleItem, NamedExport, Pat, Prop, PropOrSpread, SimpleAssignTarget, Stmt,
    TsType, VarDeclarator,
};
use tsx_parser::{item_decl, ParsedFile, ValueDecl};

/// Property names treated as variant axes when typed as literal unions.
const VARIANT_AXES: [&str; 7] = ["variant", "size", "color", "intent", "tone", "kind", "appearance"];

/// Directory names too generic to be a category.
const GENERIC_DIRS: [&str; 5] = ["src", "lib", "app", "components", "component"];

/// Types that mark a property as a content slot.
const SLOT_TYPES: [&str; 3] = ["ReactNode", "ReactElement", "JSX.Element"];

/// The name recorded for anonymous default exports.
const DEFAULT_DECLARATION: &str = "default";

/// The components and diagnostics of one file.
#[derive(Debug, Clone, Default)]
pub struct FileExtraction {
    /// The extracted file.
    pub file: Utf8PathBuf,
    /// Deduplicated components, in declaration order.
    pub components: Vec<ComponentDescriptor>,
    /// Problems found while extracting.
    pub diagnostics: Vec<Diagnostic>,
}

impl FileExtraction {
    /// A file that produced no components because of `err`.
    pub fn failed(path: &Utf8Path, err: &ExtractError) -> Self {
        let code = match err {
            ExtractError::Parse { .. } => DiagnosticCode::ParseError,
            ExtractError::Read { .. } => DiagnosticCode::ReadFailed,
            ExtractError::WrapperDepthExceeded { .. } => DiagnosticCode::WrapperDepthExceeded,
            ExtractError::MissingDeclaration { .. } => DiagnosticCode::DeclarationSkipped,
        };
        let mut diagnostic = Diagnostic::new(code, err.to_string(), path);
        if let ExtractError::Parse { source, .. } = err {
            if let Some(position) = source.position {
                diagnostic = diagnostic.at(position.line, position.column);
            }
        }
        tracing::warn!(%path, error = %err, "file produced no components");
        Self {
            file: path.to_owned(),
            components: Vec::new(),
            diagnostics: vec![diagnostic],
        }
    }
}

/// Extracts every component declared or re-exported by one file.
///
/// Never fails: a file that does not parse yields a `parse-error`
/// diagnostic, and a declaration that cannot be extracted is skipped with
/// a diagnostic while the rest of the file is kept.
pub fn extract_components(
    path: &Utf8Path,
    source: &str,
    session: &ResolutionSession,
) -> FileExtraction {
    match session.parse_source(path, source) {
        Ok(file) => extract_parsed(&file, session),
        Err(err) => FileExtraction::failed(path, &err),
    }
}

pub(crate) fn extract_parsed(file: &ParsedFile, session: &ResolutionSession) -> FileExtraction {
    let mut extractor = Extractor {
        session,
        facts: FxHashMap::default(),
        components: Vec::new(),
        diagnostics: Vec::new(),
    };
    for (item, shape) in classify(file.module()) {
        extractor.handle(file, item, shape);
    }
    FileExtraction {
        file: file.path().to_owned(),
        components: deduplicate_components(extractor.components),
        diagnostics: extractor.diagnostics,
    }
}

/// A top-level item that may declare or expose components.
#[derive(Debug, Clone, Copy)]
enum DeclarationShape<'a> {
    /// `function Button() {}`
    Function {
        name: &'a str,
        function: &'a Function,
    },
    /// `const Button = …`
    Variable {
        name: &'a str,
        declarator: &'a VarDeclarator,
    },
    /// `export default …`
    DefaultExport(DefaultShape<'a>),
    /// `export { … } from './x'`
    ReExport(&'a NamedExport),
    /// `export * from './x'`
    ReExportAll(&'a ExportAll),
}

#[derive(Debug, Clone, Copy)]
enum DefaultShape<'a> {
    Function(&'a FnExpr),
    Expr(&'a Expr),
    Class,
}

fn classify(module: &Module) -> Vec<(usize, DeclarationShape<'_>)> {
    let mut shapes = Vec::new();
    for (item, module_item) in module.body.iter().enumerate() {
        match module_item {
            ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultDecl(default_decl)) => {
                let shape = match &default_decl.decl {
                    DefaultDecl::Fn(fn_expr) => DefaultShape::Function(fn_expr),
                    DefaultDecl::Class(_) => DefaultShape::Class,
                    DefaultDecl::TsInterfaceDecl(_) => continue,
                };
                shapes.push((item, DeclarationShape::DefaultExport(shape)));
            }
            ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultExpr(default_expr)) => {
                let shape = DefaultShape::Expr(&default_expr.expr);
                shapes.push((item, DeclarationShape::DefaultExport(shape)));
            }
            ModuleItem::ModuleDecl(ModuleDecl::ExportNamed(named)) if named.src.is_some() => {
                shapes.push((item, DeclarationShape::ReExport(named)));
            }
            ModuleItem::ModuleDecl(ModuleDecl::ExportAll(all)) => {
                shapes.push((item, DeclarationShape::ReExportAll(all)));
            }
            _ => match item_decl(module_item) {
                Some(Decl::Fn(fn_decl)) => shapes.push((
                    item,
                    DeclarationShape::Function {
                        name: fn_decl.ident.sym.as_str(),
                        function: &fn_decl.function,
                    },
                )),
                Some(Decl::Var(var)) => {
                    for declarator in &var.decls {
                        if let Pat::Ident(binding) = &declarator.name {
                            shapes.push((
                                item,
                                DeclarationShape::Variable {
                                    name: binding.id.sym.as_str(),
                                    declarator,
                                },
                            ));
                        }
                    }
                }
                _ => {}
            },
        }
    }
    shapes
}

/// A component declaration found in some file.
struct Located<'a> {
    /// The name consumers see.
    name: String,
    /// The name declared in the file, or `default`.
    declared_name: String,
    kind: DeclarationKind,
    shape: ComponentShape<'a>,
    /// The module item holding the declaration.
    item: usize,
    /// Members attached through `Object.assign(Root, { … })`.
    sub_components: Vec<String>,
}

fn function_component<'a>(
    name: &str,
    function: &'a Function,
    item: usize,
    kind: DeclarationKind,
) -> Option<Located<'a>> {
    if !is_component_name(name) {
        return None;
    }
    let function = FunctionLike::from_function(function);
    if !function.returns_markup() {
        tracing::debug!(name, "function does not render markup");
        return None;
    }
    Some(Located {
        name: name.to_string(),
        declared_name: name.to_string(),
        kind,
        shape: ComponentShape {
            function,
            annotation: None,
            wrappers: Vec::new(),
        },
        item,
        sub_components: Vec::new(),
    })
}

fn variable_component<'a>(
    file: &'a ParsedFile,
    name: &str,
    declarator: &'a VarDeclarator,
    item: usize,
    config: &ExtractorConfig,
) -> Result<Option<Located<'a>>, ExtractError> {
    if !is_component_name(name) {
        return Ok(None);
    }
    let Some(init) = declarator.init.as_deref() else {
        return Ok(None);
    };
    let annotation = match &declarator.name {
        Pat::Ident(binding) => binding.type_ann.as_deref().map(|ann| &*ann.type_ann),
        _ => None,
    };
    let Some(unwrapped) = unwrap_component_expr(name, init, config)? else {
        return Ok(None);
    };
    let sub_components = assigned_members(&unwrapped.wrappers);
    let Some(shape) = component_shape(file, unwrapped, annotation, config)? else {
        tracing::debug!(name, "variable is not component-shaped");
        return Ok(None);
    };
    let kind = if shape.wrappers.is_empty() {
        DeclarationKind::Variable
    } else {
        DeclarationKind::WrappedComponent
    };
    Ok(Some(Located {
        name: name.to_string(),
        declared_name: name.to_string(),
        kind,
        shape,
        item,
        sub_components,
    }))
}

/// Completes an unwrapped initializer into a component shape.
///
/// A reference to a local component (`memo(Button)`) is followed one
/// level. Plain functions must render markup unless a wrapper call or a
/// type annotation marks them as components.
fn component_shape<'a>(
    file: &'a ParsedFile,
    unwrapped: Unwrapped<'a>,
    annotation: Option<&'a TsType>,
    config: &ExtractorConfig,
) -> Result<Option<ComponentShape<'a>>, ExtractError> {
    let Unwrapped {
        target,
        mut wrappers,
    } = unwrapped;
    let (function, annotation) = match target {
        WrappedTarget::Function(function) => (function, annotation),
        WrappedTarget::Reference(inner) => match file.value_decl(inner) {
            Some(ValueDecl::Function(fn_decl)) => {
                (FunctionLike::from_function(&fn_decl.function), annotation)
            }
            Some(ValueDecl::DefaultFunction(fn_expr)) => {
                (FunctionLike::from_function(&fn_expr.function), annotation)
            }
            Some(ValueDecl::Variable(declarator)) => {
                let Some(init) = declarator.init.as_deref() else {
                    return Ok(None);
                };
                let Some(Unwrapped {
                    target: WrappedTarget::Function(function),
                    wrappers: inner_wrappers,
                }) = unwrap_component_expr(inner, init, config)?
                else {
                    return Ok(None);
                };
                let inner_annotation = match &declarator.name {
                    Pat::Ident(binding) => binding.type_ann.as_deref().map(|ann| &*ann.type_ann),
                    _ => None,
                };
                wrappers.extend(inner_wrappers);
                (function, annotation.or(inner_annotation))
            }
            Some(ValueDecl::Class) | None => return Ok(None),
        },
    };

    let wrapped = wrappers.iter().any(|call| {
        callee_name(&call.callee).is_some_and(|callee| {
            callee == "Object.assign" || config.is_higher_order_wrapper(&callee)
        })
    });
    if !wrapped && annotation.is_none() && !function.returns_markup() {
        return Ok(None);
    }
    Ok(Some(ComponentShape {
        function,
        annotation,
        wrappers,
    }))
}

fn default_component<'a>(
    file: &'a ParsedFile,
    shape: DefaultShape<'a>,
    item: usize,
    config: &ExtractorConfig,
) -> Result<Option<Located<'a>>, ExtractError> {
    let stem = stem_component_name(file.path());
    match shape {
        DefaultShape::Class => Ok(None),
        DefaultShape::Function(fn_expr) => {
            let declared = fn_expr.ident.as_ref().map(|ident| ident.sym.to_string());
            let name = declared.clone().unwrap_or(stem);
            let mut located =
                function_component(&name, &fn_expr.function, item, DeclarationKind::DefaultExport);
            if let Some(located) = &mut located {
                located.declared_name = declared.unwrap_or_else(|| DEFAULT_DECLARATION.to_string());
            }
            Ok(located)
        }
        DefaultShape::Expr(expr) => match strip_parens(expr) {
            Expr::Ident(ident) => {
                let located = local_component(file, ident.sym.as_str(), config)?;
                Ok(located.map(|located| Located {
                    kind: DeclarationKind::DefaultExport,
                    ..located
                }))
            }
            expr => {
                let Some(unwrapped) = unwrap_component_expr(&stem, expr, config)? else {
                    return Ok(None);
                };
                let reference = match unwrapped.target {
                    WrappedTarget::Reference(name) => Some(name.to_string()),
                    WrappedTarget::Function(_) => None,
                };
                let sub_components = assigned_members(&unwrapped.wrappers);
                let Some(shape) = component_shape(file, unwrapped, None, config)? else {
                    return Ok(None);
                };
                Ok(Some(Located {
                    name: reference.clone().unwrap_or(stem),
                    declared_name: reference.unwrap_or_else(|| DEFAULT_DECLARATION.to_string()),
                    kind: DeclarationKind::DefaultExport,
                    shape,
                    item,
                    sub_components,
                }))
            }
        },
    }
}

/// Locates the component a file declares under `name`.
fn local_component<'a>(
    file: &'a ParsedFile,
    name: &str,
    config: &ExtractorConfig,
) -> Result<Option<Located<'a>>, ExtractError> {
    let Some(site) = file.index().value(name) else {
        return Ok(None);
    };
    match file.value_decl_at(site) {
        Some(ValueDecl::Function(fn_decl)) => Ok(function_component(
            name,
            &fn_decl.function,
            site.item,
            DeclarationKind::FunctionDeclaration,
        )),
        Some(ValueDecl::DefaultFunction(fn_expr)) => Ok(function_component(
            name,
            &fn_expr.function,
            site.item,
            DeclarationKind::DefaultExport,
        )),
        Some(ValueDecl::Variable(declarator)) => {
            variable_component(file, name, declarator, site.item, config)
        }
        Some(ValueDecl::Class) | None => Ok(None),
    }
}

/// Locates the component held by the default-export item at `item`.
fn default_item_component<'a>(
    file: &'a ParsedFile,
    item: usize,
    config: &ExtractorConfig,
) -> Result<Option<Located<'a>>, ExtractError> {
    let shape = match file.item(item) {
        Some(ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultDecl(default_decl))) => {
            match &default_decl.decl {
                DefaultDecl::Fn(fn_expr) => DefaultShape::Function(fn_expr),
                _ => return Ok(None),
            }
        }
        Some(ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultExpr(default_expr))) => {
            DefaultShape::Expr(&default_expr.expr)
        }
        _ => return Ok(None),
    };
    default_component(file, shape, item, config)
}

/// Keys of the objects merged in by `Object.assign(Root, { Header, Body })`.
fn assigned_members(wrappers: &[&CallExpr]) -> Vec<String> {
    let mut members = Vec::new();
    for call in wrappers {
        if callee_name(&call.callee).as_deref() != Some("Object.assign") {
            continue;
        }
        for arg in call.args.iter().skip(1) {
            let Expr::Object(object) = strip_parens(&arg.expr) else {
                continue;
            };
            for prop in &object.props {
                let PropOrSpread::Prop(prop) = prop else {
                    continue;
                };
                let name = match &**prop {
                    Prop::Shorthand(ident) => Some(ident.sym.to_string()),
                    Prop::KeyValue(kv) => prop_name(&kv.key),
                    _ => None,
                };
                members.extend(name);
            }
        }
    }
    members
}

/// `Card.Header = CardHeader` assignments, by parent name.
fn member_assignments(module: &Module) -> FxHashMap<String, Vec<String>> {
    let mut members: FxHashMap<String, Vec<String>> = FxHashMap::default();
    for item in &module.body {
        let ModuleItem::Stmt(Stmt::Expr(stmt)) = item else {
            continue;
        };
        let Expr::Assign(assign) = &*stmt.expr else {
            continue;
        };
        let AssignTarget::Simple(SimpleAssignTarget::Member(member)) = &assign.left else {
            continue;
        };
        let (Expr::Ident(parent), MemberProp::Ident(child)) = (&*member.obj, &member.prop) else {
            continue;
        };
        if is_component_name(parent.sym.as_str()) && is_component_name(child.sym.as_str()) {
            members
                .entry(parent.sym.to_string())
                .or_default()
                .push(child.sym.to_string());
        }
    }
    members
}

/// What a file contributes to every component assembled from it.
#[derive(Debug, Default)]
struct FileFacts {
    /// Every token and variant factory call in the file.
    scan: TokenScan,
    /// Custom properties of the file's style sheets.
    style_tokens: TokenUsage,
    sub_components: FxHashMap<String, Vec<String>>,
}

impl FileFacts {
    fn collect(file: &ParsedFile, session: &ResolutionSession) -> Self {
        Self {
            scan: scan_module(file, session.config()),
            style_tokens: style_tokens(file, session),
            sub_components: member_assignments(file.module()),
        }
    }
}

/// Reads the style sheets next to a file (`button.module.css` beside
/// `button.tsx`) and the ones it imports.
fn style_tokens(file: &ParsedFile, session: &ResolutionSession) -> TokenUsage {
    let config = session.config();
    let path = file.path();
    let dir = path.parent().unwrap_or(Utf8Path::new(""));

    let mut sheets: Vec<Utf8PathBuf> = Vec::new();
    if let Some(stem) = path.file_stem() {
        for suffix in &config.style_file_suffixes {
            sheets.push(dir.join(format!("{stem}{suffix}")));
        }
    }
    for item in &file.module().body {
        let ModuleItem::ModuleDecl(ModuleDecl::Import(import)) = item else {
            continue;
        };
        let Some(specifier) = import.src.value.as_str() else {
            continue;
        };
        let is_style = config
            .style_file_suffixes
            .iter()
            .any(|suffix| specifier.ends_with(suffix.as_str()));
        if is_style && is_relative_specifier(specifier) {
            sheets.push(normalize_path(&dir.join(specifier)));
        }
    }
    sheets.sort();
    sheets.dedup();

    let loader = session.loader();
    let mut usage = TokenUsage::new();
    for sheet in sheets {
        if !loader.exists(&sheet) {
            continue;
        }
        match loader.read(&sheet) {
            Ok(text) => scan_css(&text, &mut usage),
            Err(err) => tracing::warn!(path = %sheet, error = %err, "failed to read style file"),
        }
    }
    usage
}

struct Extractor<'s> {
    session: &'s ResolutionSession,
    facts: FxHashMap<Utf8PathBuf, Arc<FileFacts>>,
    components: Vec<ComponentDescriptor>,
    diagnostics: Vec<Diagnostic>,
}

impl Extractor<'_> {
    fn handle(&mut self, file: &ParsedFile, item: usize, shape: DeclarationShape<'_>) {
        let session = self.session;
        let config = session.config();
        let located = match shape {
            DeclarationShape::Function { name, function } => Ok(function_component(
                name,
                function,
                item,
                DeclarationKind::FunctionDeclaration,
            )),
            DeclarationShape::Variable { name, declarator } => {
                variable_component(file, name, declarator, item, config)
            }
            DeclarationShape::DefaultExport(default) => {
                match default_component(file, default, item, config) {
                    Ok(None) => {
                        self.diagnose(
                            file,
                            DiagnosticCode::UnsupportedDefaultExport,
                            "default export is not a component".to_string(),
                            item_span(file, item),
                        );
                        return;
                    }
                    other => other,
                }
            }
            DeclarationShape::ReExport(named) => {
                self.reexports(file, item, ExportNode::Named(named));
                return;
            }
            DeclarationShape::ReExportAll(all) => {
                self.reexports(file, item, ExportNode::All(all));
                return;
            }
        };

        match located {
            Ok(Some(located)) => {
                let component = self.assemble(file, located, None);
                self.components.push(component);
            }
            Ok(None) => {}
            Err(err) => self.skip(file, item, err),
        }
    }

    fn reexports(&mut self, file: &ParsedFile, item: usize, node: ExportNode<'_>) {
        let session = self.session;
        let config = session.config();
        let mut ctx = BarrelContext::new(file.path(), config.max_barrel_depth);
        let exports = resolve_export(node, file.path(), &mut ctx, session);

        for specifier in ctx.unresolved() {
            self.diagnose(
                file,
                DiagnosticCode::UnresolvedModule,
                format!("cannot resolve module `{specifier}`"),
                item_span(file, item),
            );
        }

        for export in exports {
            let target = Arc::clone(&export.node.file);
            let located = match &export.node.target {
                DeclarationTarget::Local(local) if target.index().value(local).is_none() => {
                    Err(ExtractError::MissingDeclaration {
                        name: local.to_string(),
                        file: target.path().to_owned(),
                    })
                }
                DeclarationTarget::Local(local) => local_component(&target, local, config),
                DeclarationTarget::DefaultItem(default_item) => {
                    default_item_component(&target, *default_item, config)
                }
            };
            match located {
                Ok(Some(located)) => {
                    let located = Located {
                        name: export.name.clone(),
                        kind: DeclarationKind::BarrelReexport,
                        ..located
                    };
                    let component = self.assemble(&target, located, Some(file.path()));
                    self.components.push(component);
                }
                Ok(None) => {
                    tracing::debug!(name = %export.name, file = %export.file_path, "re-export is not a component");
                }
                Err(err) => self.skip(file, item, err),
            }
        }
    }

    fn facts(&mut self, file: &ParsedFile) -> Arc<FileFacts> {
        let session = self.session;
        Arc::clone(
            self.facts
                .entry(file.path().to_owned())
                .or_insert_with(|| Arc::new(FileFacts::collect(file, session))),
        )
    }

    fn assemble(
        &mut self,
        file: &ParsedFile,
        located: Located<'_>,
        reexported_from: Option<&Utf8Path>,
    ) -> ComponentDescriptor {
        let session = self.session;
        let config = session.config();
        let facts = self.facts(file);

        let structural = structural_properties(file, &located.shape.function);
        let resolved = TypeEngine::new(session).component_properties(file, &located.shape);
        let mut properties = merge_properties(structural, &resolved);

        let own = scan_item(file, located.item, config);
        let mut styles = facts.scan.clone();
        styles.merge(&own);
        let TokenScan {
            mut variants,
            default_variants,
            ..
        } = styles;

        for prop in &properties {
            if VARIANT_AXES.contains(&prop.name.as_str())
                && !prop.options.is_empty()
                && !variants.contains_key(&prop.name)
            {
                let options = prop
                    .options
                    .iter()
                    .map(|option| (option.clone(), String::new()))
                    .collect();
                variants.insert(prop.name.clone(), options);
            }
        }
        for prop in &mut properties {
            if prop.default_value.is_some() {
                continue;
            }
            if let Some(value) = default_variants.get(&prop.name) {
                prop.default_value = Some(value.clone());
                prop.required = false;
            }
        }

        let mut tokens_used = own.usage;
        tokens_used.merge(&facts.style_tokens);
        for style in variants.values().flat_map(|options| options.values()) {
            scan_class_list(style, &mut tokens_used);
        }

        let doc = file
            .item(located.item)
            .and_then(|item| file.leading_doc(item.span()))
            .unwrap_or_default();

        let mut sub_components = located.sub_components;
        if let Some(assigned) = facts.sub_components.get(&located.declared_name) {
            for member in assigned {
                if !sub_components.contains(member) {
                    sub_components.push(member.clone());
                }
            }
        }

        ComponentDescriptor {
            category: category(file.path(), &located.name),
            description: doc.description,
            composition: Composition {
                slots: slots(&properties),
                sub_components,
            },
            properties,
            variants,
            tokens_used,
            examples: doc.examples,
            extensions: Extensions {
                origin_file: file.path().to_owned(),
                declared_name: located.declared_name,
                declaration_kind: located.kind,
                adaptor_id: config.adaptor_id.clone(),
                extracted_at: session.extracted_at().to_string(),
                reexported_from: reexported_from.map(Utf8Path::to_owned),
            },
            name: located.name,
        }
    }

    fn skip(&mut self, file: &ParsedFile, item: usize, err: ExtractError) {
        tracing::warn!(file = %file.path(), error = %err, "skipping declaration");
        let code = match err {
            ExtractError::WrapperDepthExceeded { .. } => DiagnosticCode::WrapperDepthExceeded,
            _ => DiagnosticCode::DeclarationSkipped,
        };
        self.diagnose(file, code, err.to_string(), item_span(file, item));
    }

    fn diagnose(&mut self, file: &ParsedFile, code: DiagnosticCode, message: String, span: Span) {
        let position = file.line_col(span.lo);
        self.diagnostics.push(
            Diagnostic::new(code, message, file.path()).at(position.line, position.column),
        );
    }
}

fn item_span(file: &ParsedFile, item: usize) -> Span {
    file.item(item).map(Spanned::span).unwrap_or_default()
}

fn slots(properties: &[PropertyDescriptor]) -> Vec<String> {
    properties
        .iter()
        .filter(|prop| prop.name == "children" || SLOT_TYPES.iter().any(|ty| prop.ty.contains(ty)))
        .map(|prop| prop.name.clone())
        .collect()
}

/// The nearest directory that says something about the component:
/// `src/components/forms/text-input.tsx` gives `forms`. The search stops
/// at the first generic directory (`src`, `components`, ...).
fn category(path: &Utf8Path, name: &str) -> String {
    let own = simplify(name);
    path.parent()
        .into_iter()
        .flat_map(|dir| dir.iter().rev())
        .map(str::to_ascii_lowercase)
        .take_while(|segment| !GENERIC_DIRS.contains(&segment.as_str()))
        .find(|segment| !matches!(segment.as_str(), "/" | "." | "..") && simplify(segment) != own)
        .unwrap_or_else(|| "general".to_string())
}

fn simplify(name: &str) -> String {
    name.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// The name given to an anonymous default export: the PascalCased file
/// stem, or the directory name for `index` files.
fn stem_component_name(path: &Utf8Path) -> String {
    let stem = path.file_stem().unwrap_or("component");
    let stem = if stem == "index" {
        path.parent().and_then(Utf8Path::file_name).unwrap_or(stem)
    } else {
        stem
    };
    stem.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::MemoryLoader;
    use pretty_assertions::assert_eq;

    fn extract(files: &[(&str, &str)], path: &str) -> FileExtraction {
        let mut loader = MemoryLoader::new();
        for (name, text) in files {
            loader.insert(*name, *text);
        }
        let source = files
            .iter()
            .find(|(name, _)| *name == path)
            .map(|(_, text)| *text)
            .unwrap();
        let session = ResolutionSession::new(ExtractorConfig::default(), Arc::new(loader))
            .with_extracted_at("2026-01-01T00:00:00Z");
        extract_components(Utf8Path::new(path), source, &session)
    }

    fn names(extraction: &FileExtraction) -> Vec<(&str, DeclarationKind)> {
        extraction
            .components
            .iter()
            .map(|c| (c.name.as_str(), c.declaration_kind()))
            .collect()
    }

    #[test]
    fn test_classifies_declaration_shapes() {
        let source = r#"
export function Card() { return <div />; }
function helper() { return <span />; }
function Plain() { return 1; }
export const Badge = ({ label }: { label: string }) => <span>{label}</span>;
export const Input = forwardRef<HTMLInputElement, InputProps>((props, ref) => <input ref={ref} />);
const Memo = memo(Card);
const MAX = 3;
"#;
        let out = extract(&[("src/ui/card.tsx", source)], "src/ui/card.tsx");
        assert_eq!(
            names(&out),
            vec![
                ("Card", DeclarationKind::FunctionDeclaration),
                ("Badge", DeclarationKind::Variable),
                ("Input", DeclarationKind::WrappedComponent),
                ("Memo", DeclarationKind::WrappedComponent),
            ]
        );
        assert!(out.diagnostics.is_empty());
    }

    #[test]
    fn test_single_letter_components_are_found() {
        let source = "export const X = ({ size }: { size: number }) => <svg width={size} />;\nexport const UI = 1;";
        let out = extract(&[("src/icons/x.tsx", source)], "src/icons/x.tsx");
        assert_eq!(names(&out), vec![("X", DeclarationKind::Variable)]);
        assert!(out.components[0].property("size").is_some());
    }

    #[test]
    fn test_merges_structural_and_resolved_props() {
        let source = r#"
interface ButtonProps {
  /** Visible text */
  label: string;
  size?: "sm" | "md" | "lg";
  onClick?: () => void;
}
/**
 * A clickable button.
 * @example
 * <Button label="Save" />
 */
export function Button({ label, size = "md", onClick }: ButtonProps) {
  return <button onClick={onClick}>{label}</button>;
}
"#;
        let out = extract(&[("src/button.tsx", source)], "src/button.tsx");
        let button = &out.components[0];
        assert_eq!(button.description, "A clickable button.");
        assert_eq!(button.examples, vec!["<Button label=\"Save\" />"]);

        let label = button.property("label").unwrap();
        assert_eq!(label.ty, "string");
        assert!(label.required);
        assert_eq!(label.description, "Visible text");

        let size = button.property("size").unwrap();
        assert!(!size.required);
        assert_eq!(size.default_value.as_deref(), Some("\"md\""));
        assert_eq!(size.options, vec!["sm", "md", "lg"]);
        assert_eq!(button.variants["size"].keys().collect::<Vec<_>>(), vec!["sm", "md", "lg"]);
        assert_eq!(button.category, "general");
    }

    #[test]
    fn test_anonymous_default_takes_file_stem() {
        let out = extract(
            &[("src/date-picker.tsx", "export default (props: { value: string }) => <input />;")],
            "src/date-picker.tsx",
        );
        assert_eq!(names(&out), vec![("DatePicker", DeclarationKind::DefaultExport)]);
        assert_eq!(out.components[0].extensions.declared_name, "default");
        assert!(out.components[0].property("value").is_some());
    }

    #[test]
    fn test_default_export_of_named_component_collapses() {
        let source = "export function Card() { return <div />; }\nexport default Card;";
        let out = extract(&[("src/card.tsx", source)], "src/card.tsx");
        assert_eq!(names(&out), vec![("Card", DeclarationKind::FunctionDeclaration)]);
    }

    #[test]
    fn test_unsupported_default_export_is_a_hint() {
        let out = extract(&[("src/config.ts", "export default { theme: 'dark' };")], "src/config.ts");
        assert!(out.components.is_empty());
        assert_eq!(out.diagnostics[0].code, DiagnosticCode::UnsupportedDefaultExport);
    }

    #[test]
    fn test_wrapper_depth_is_reported_and_skipped() {
        let source = r#"
const Deep = memo(observer(withTheme(forwardRef((props, ref) => <div />))));
export const Shallow = memo(() => <div />);
"#;
        let out = extract(&[("src/deep.tsx", source)], "src/deep.tsx");
        assert_eq!(names(&out), vec![("Shallow", DeclarationKind::WrappedComponent)]);
        assert_eq!(out.diagnostics.len(), 1);
        assert_eq!(out.diagnostics[0].code, DiagnosticCode::WrapperDepthExceeded);
        assert_eq!(out.diagnostics[0].position.map(|p| p.line), Some(2));
    }

    #[test]
    fn test_parse_failure_is_a_diagnostic() {
        let out = extract(&[("src/broken.tsx", "export const A = () => <div>;")], "src/broken.tsx");
        assert!(out.components.is_empty());
        assert_eq!(out.diagnostics[0].code, DiagnosticCode::ParseError);
        assert!(out.diagnostics[0].position.is_some());
    }

    #[test]
    fn test_collects_sub_components_and_slots() {
        let source = r#"
import type { ReactNode } from "react";
export function Card({ children, footer }: { children: ReactNode; footer?: ReactNode; title: string }) {
  return <div>{children}{footer}</div>;
}
export function CardHeader() { return <header />; }
Card.Header = CardHeader;
export const Tabs = Object.assign(({ value }: { value: string }) => <div />, { List: TabList, Panel });
"#;
        let out = extract(&[("src/card.tsx", source)], "src/card.tsx");
        let card = &out.components[0];
        assert_eq!(card.composition.slots, vec!["children", "footer"]);
        assert_eq!(card.composition.sub_components, vec!["Header"]);
        let tabs = out.components.iter().find(|c| c.name == "Tabs").unwrap();
        assert_eq!(tabs.composition.sub_components, vec!["List", "Panel"]);
    }

    #[test]
    fn test_variants_merge_file_and_component_definitions() {
        let source = r#"
const buttonVariants = cva("inline-flex rounded-md", {
  variants: { variant: { default: "bg-primary", ghost: "bg-transparent" } },
  defaultVariants: { variant: "default" },
});
export function Button({ variant }: { variant?: "default" | "ghost"; tone?: "info" | "danger" }) {
  const local = cva("", { variants: { variant: { ghost: "hover:bg-accent" } } });
  return <button className={buttonVariants({ variant })} />;
}
"#;
        let out = extract(&[("src/button.tsx", source)], "src/button.tsx");
        let button = &out.components[0];
        assert_eq!(button.variants["variant"]["default"], "bg-primary");
        assert_eq!(button.variants["variant"]["ghost"], "hover:bg-accent");
        assert_eq!(button.variants["tone"].keys().collect::<Vec<_>>(), vec!["info", "danger"]);
        assert_eq!(button.property("variant").unwrap().default_value.as_deref(), Some("\"default\""));
        assert!(button.tokens_used.colors.contains("bg-primary"));
        assert!(button.tokens_used.colors.contains("bg-accent"));
    }

    #[test]
    fn test_reads_sibling_style_sheets() {
        let out = extract(
            &[
                ("src/alert.tsx", "import './theme.css';\nexport const Alert = () => <div />;"),
                ("src/alert.module.css", ".root { color: var(--alert-fg); }"),
                ("src/theme.css", ":root { --radius: 4px; }"),
            ],
            "src/alert.tsx",
        );
        let tokens = &out.components[0].tokens_used;
        assert!(tokens.custom_properties.contains("--alert-fg"));
        assert!(tokens.custom_properties.contains("--radius"));
    }

    #[test]
    fn test_barrel_reexports_point_at_declarations() {
        let out = extract(
            &[
                ("src/index.ts", "export { Button as PrimaryButton } from './button';\nexport * from './missing';"),
                ("src/button.tsx", "export const Button = ({ label }: { label: string }) => <b>{label}</b>;"),
            ],
            "src/index.ts",
        );
        assert_eq!(names(&out), vec![("PrimaryButton", DeclarationKind::BarrelReexport)]);
        let button = &out.components[0];
        assert_eq!(button.extensions.origin_file, "src/button.tsx");
        assert_eq!(button.extensions.declared_name, "Button");
        assert_eq!(button.extensions.reexported_from.as_deref(), Some(Utf8Path::new("src/index.ts")));
        assert!(button.property("label").is_some());
        assert_eq!(out.diagnostics[0].code, DiagnosticCode::UnresolvedModule);
    }

    #[test]
    fn test_categories_skip_generic_directories() {
        assert_eq!(category(Utf8Path::new("src/components/forms/text-input.tsx"), "TextInput"), "forms");
        assert_eq!(category(Utf8Path::new("src/components/button/button.tsx"), "Button"), "general");
        assert_eq!(category(Utf8Path::new("button.tsx"), "Button"), "general");
        assert_eq!(category(Utf8Path::new("/work/src/ui/badge.tsx"), "Badge"), "ui");
    }

    #[test]
    fn test_stem_names_are_pascal_cased() {
        assert_eq!(stem_component_name(Utf8Path::new("src/date-picker.tsx")), "DatePicker");
        assert_eq!(stem_component_name(Utf8Path::new("src/nav_bar/index.tsx")), "NavBar");
    }
}
