//! Function shapes behind component declarations.
//!
//! Components are written as function declarations, arrow functions,
//! function expressions, and any of those passed through higher-order
//! wrappers (`forwardRef`, `memo`, `withTheme`). This module flattens those
//! shapes into a [`FunctionLike`] view.

use crate::config::ExtractorConfig;
use crate::error::ExtractError;
use swc_ecma_ast::{
    BlockStmt, BlockStmtOrExpr, CallExpr, Callee, Expr, Function, JSXElement, JSXFragment,
    MemberProp, Param, Pat, TsType, TsTypeAnn,
};
use swc_ecma_visit::{Visit, VisitWith};

#[derive(Debug, Clone, Copy)]
pub(crate) enum FunctionLikeParams<'a> {
    Arrow(&'a [Pat]),
    Fn(&'a [Param]),
}

impl<'a> FunctionLikeParams<'a> {
    fn first_pat(&self) -> Option<&'a Pat> {
        match self {
            FunctionLikeParams::Arrow(params) => params.first(),
            FunctionLikeParams::Fn(params) => params.first().map(|param| &param.pat),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum FunctionBody<'a> {
    Block(&'a BlockStmt),
    Expr(&'a Expr),
    Missing,
}

/// An arrow function, function expression or function declaration.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FunctionLike<'a> {
    params: FunctionLikeParams<'a>,
    return_type: Option<&'a TsTypeAnn>,
    body: FunctionBody<'a>,
}

impl<'a> FunctionLike<'a> {
    pub(crate) fn from_function(function: &'a Function) -> Self {
        FunctionLike {
            params: FunctionLikeParams::Fn(&function.params),
            return_type: function.return_type.as_deref(),
            body: function
                .body
                .as_ref()
                .map_or(FunctionBody::Missing, FunctionBody::Block),
        }
    }

    pub(crate) fn from_expr(expr: &'a Expr) -> Option<Self> {
        match expr {
            Expr::Arrow(arrow) => Some(FunctionLike {
                params: FunctionLikeParams::Arrow(&arrow.params),
                return_type: arrow.return_type.as_deref(),
                body: match arrow.body.as_ref() {
                    BlockStmtOrExpr::BlockStmt(block) => FunctionBody::Block(block),
                    BlockStmtOrExpr::Expr(expr) => FunctionBody::Expr(expr),
                },
            }),
            Expr::Fn(func) => Some(Self::from_function(&func.function)),
            Expr::Paren(paren) => Self::from_expr(&paren.expr),
            _ => None,
        }
    }

    /// The props parameter.
    pub(crate) fn first_pat(&self) -> Option<&'a Pat> {
        self.params.first_pat()
    }

    /// The explicit type annotation of the props parameter.
    pub(crate) fn first_param_type(&self) -> Option<&'a TsType> {
        pat_type_ann(self.first_pat()?)
    }

    /// Returns true if the function visibly produces markup: JSX, a
    /// `createElement` call, or an element return type.
    pub(crate) fn returns_markup(&self) -> bool {
        if let Some(return_type) = self.return_type {
            if let TsType::TsTypeRef(type_ref) = &*return_type.type_ann {
                let name = entity_name(&type_ref.type_name);
                if matches!(
                    name.rsplit('.').next(),
                    Some("Element" | "ReactElement" | "ReactNode")
                ) {
                    return true;
                }
            }
        }
        let mut finder = MarkupFinder::default();
        match self.body {
            FunctionBody::Block(block) => block.visit_with(&mut finder),
            FunctionBody::Expr(expr) => expr.visit_with(&mut finder),
            FunctionBody::Missing => {}
        }
        finder.found
    }
}

fn pat_type_ann(pat: &Pat) -> Option<&TsType> {
    let ann = match pat {
        Pat::Ident(binding) => binding.type_ann.as_deref(),
        Pat::Object(object) => object.type_ann.as_deref(),
        Pat::Array(array) => array.type_ann.as_deref(),
        Pat::Rest(rest) => rest.type_ann.as_deref(),
        Pat::Assign(assign) => return pat_type_ann(&assign.left),
        _ => None,
    }?;
    Some(&*ann.type_ann)
}

#[derive(Default)]
struct MarkupFinder {
    found: bool,
}

impl Visit for MarkupFinder {
    fn visit_jsx_element(&mut self, _: &JSXElement) {
        self.found = true;
    }

    fn visit_jsx_fragment(&mut self, _: &JSXFragment) {
        self.found = true;
    }

    fn visit_call_expr(&mut self, call: &CallExpr) {
        if self.found {
            return;
        }
        if let Some(name) = callee_name(&call.callee) {
            if matches!(name.rsplit('.').next(), Some("createElement" | "cloneElement")) {
                self.found = true;
                return;
            }
        }
        call.visit_children_with(self);
    }
}

/// What a chain of wrapper calls finally wraps.
#[derive(Debug, Clone, Copy)]
pub(crate) enum WrappedTarget<'a> {
    /// An inline function.
    Function(FunctionLike<'a>),
    /// A component declared elsewhere in the file: `memo(Button)`.
    Reference(&'a str),
}

/// A component expression with its wrapper calls peeled off.
#[derive(Debug, Clone)]
pub(crate) struct Unwrapped<'a> {
    pub(crate) target: WrappedTarget<'a>,
    /// Wrapper calls, outermost first.
    pub(crate) wrappers: Vec<&'a CallExpr>,
}

/// Peels higher-order wrapper calls off a component initializer.
///
/// Returns `Ok(None)` when the expression is not component-shaped, and an
/// error when more than `max_wrapper_depth` wrappers are nested.
pub(crate) fn unwrap_component_expr<'a>(
    name: &str,
    expr: &'a Expr,
    config: &ExtractorConfig,
) -> Result<Option<Unwrapped<'a>>, ExtractError> {
    let mut current = expr;
    let mut wrappers: Vec<&'a CallExpr> = Vec::new();
    loop {
        match current {
            Expr::Paren(paren) => current = &paren.expr,
            Expr::TsAs(as_expr) => current = &as_expr.expr,
            Expr::TsSatisfies(satisfies) => current = &satisfies.expr,
            Expr::Arrow(_) | Expr::Fn(_) => {
                return Ok(FunctionLike::from_expr(current).map(|function| Unwrapped {
                    target: WrappedTarget::Function(function),
                    wrappers,
                }));
            }
            Expr::Ident(ident) if !wrappers.is_empty() => {
                return Ok(Some(Unwrapped {
                    target: WrappedTarget::Reference(ident.sym.as_str()),
                    wrappers,
                }));
            }
            Expr::Call(call) => {
                let Some(first) = call.args.first() else {
                    return Ok(None);
                };
                if first.spread.is_some() {
                    return Ok(None);
                }
                let recognized = callee_name(&call.callee).is_some_and(|callee| {
                    callee == "Object.assign" || config.is_higher_order_wrapper(&callee)
                });
                let wraps_function = matches!(
                    strip_parens(&first.expr),
                    Expr::Arrow(_) | Expr::Fn(_)
                );
                if !recognized && !wraps_function {
                    return Ok(None);
                }
                if wrappers.len() >= config.max_wrapper_depth {
                    return Err(ExtractError::WrapperDepthExceeded {
                        name: name.to_string(),
                        limit: config.max_wrapper_depth,
                    });
                }
                wrappers.push(call);
                current = &first.expr;
            }
            _ => return Ok(None),
        }
    }
}

pub(crate) fn strip_parens(expr: &Expr) -> &Expr {
    match expr {
        Expr::Paren(paren) => strip_parens(&paren.expr),
        _ => expr,
    }
}

/// The dotted name of a call target: `forwardRef`, `React.memo`.
pub(crate) fn callee_name(callee: &Callee) -> Option<String> {
    let Callee::Expr(expr) = callee else {
        return None;
    };
    expr_name(expr)
}

pub(crate) fn expr_name(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Ident(ident) => Some(ident.sym.to_string()),
        Expr::Member(member) => {
            let MemberProp::Ident(prop) = &member.prop else {
                return None;
            };
            let object = expr_name(&member.obj)?;
            Some(format!("{object}.{}", prop.sym.as_str()))
        }
        _ => None,
    }
}

pub(crate) fn entity_name(name: &swc_ecma_ast::TsEntityName) -> String {
    match name {
        swc_ecma_ast::TsEntityName::Ident(ident) => ident.sym.to_string(),
        swc_ecma_ast::TsEntityName::TsQualifiedName(qualified) => {
            format!("{}.{}", entity_name(&qualified.left), qualified.right.sym.as_str())
        }
    }
}

/// PascalCase names (including single letters such as `X`) are component
/// candidates; `ALL_CAPS` and `SNAKE_CASE` constants are not.
pub(crate) fn is_component_name(name: &str) -> bool {
    if !name.chars().next().is_some_and(|c| c.is_ascii_uppercase()) || name.contains('_') {
        return false;
    }
    name.len() == 1 || name.chars().any(|c| c.is_ascii_lowercase())
}
