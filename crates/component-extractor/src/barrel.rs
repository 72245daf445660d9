//! Re-export ("barrel") resolution.
//!
//! `export { Button as PrimaryButton } from './button'` and
//! `export * from './card'` are followed, hop by hop, to the file that
//! declares each binding. A run-scoped [`BarrelContext`] stops cycles and
//! overly long chains; bindings headed to the same file are followed in one
//! visit.

use crate::session::{is_relative_specifier, ResolutionSession};
use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use smol_str::SmolStr;
use std::sync::Arc;
use swc_ecma_ast::{ExportAll, ExportSpecifier, ModuleExportName, NamedExport};
use tsx_parser::{ExportBinding, ImportedName, ParsedFile};

/// The request key of an `export *` visit.
const ALL_EXPORTS: &str = "*";

/// Traversal state of one barrel resolution.
///
/// Visits are recorded per file and requested binding, so a file reached
/// twice through different branches still serves the bindings it was not
/// asked for yet.
#[derive(Debug, Clone)]
pub struct BarrelContext {
    origin: Utf8PathBuf,
    visited: FxHashSet<(Utf8PathBuf, SmolStr)>,
    depth: usize,
    max_depth: usize,
    unresolved: Vec<String>,
}

impl BarrelContext {
    /// Creates a context rooted at `origin`, which counts as visited.
    pub fn new(origin: &Utf8Path, max_depth: usize) -> Self {
        Self {
            origin: crate::loader::normalize_path(origin),
            visited: FxHashSet::default(),
            depth: 0,
            max_depth,
            unresolved: Vec::new(),
        }
    }

    /// Relative specifiers that matched no file.
    pub fn unresolved(&self) -> &[String] {
        &self.unresolved
    }
}

/// A re-export statement to resolve.
#[derive(Debug, Clone, Copy)]
pub enum ExportNode<'a> {
    /// `export { a, b as c } from './x'`
    Named(&'a NamedExport),
    /// `export * from './x'`
    All(&'a ExportAll),
}

/// Where a re-exported binding is declared.
#[derive(Clone)]
pub struct DeclarationHandle {
    /// The declaring file.
    pub file: Arc<ParsedFile>,
    /// The declaration within it.
    pub target: DeclarationTarget,
}

impl std::fmt::Debug for DeclarationHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeclarationHandle")
            .field("file", &self.file.path())
            .field("target", &self.target)
            .finish()
    }
}

/// A declaration within a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclarationTarget {
    /// A named top-level value.
    Local(SmolStr),
    /// The module item holding an anonymous default export.
    DefaultItem(usize),
}

/// One binding a barrel re-exports, traced to its declaration.
#[derive(Debug, Clone)]
pub struct ExportDescriptor {
    /// The name the barrel exports.
    pub name: String,
    /// The name declared in the terminal file, when the chain renamed it.
    pub alias: Option<String>,
    /// The terminal file.
    pub file_path: Utf8PathBuf,
    /// The declaration.
    pub node: DeclarationHandle,
    /// True if the binding reaches its declaration without renaming.
    pub canonical: bool,
}

#[derive(Debug, Clone)]
struct Binding {
    /// The name to look up in the next file.
    requested: SmolStr,
    /// The name the origin barrel exports.
    exported_as: String,
}

enum Request {
    Names(Vec<Binding>),
    All,
}

/// Resolves one re-export statement of `current_file` to the declarations
/// it exposes.
///
/// Non-relative specifiers, missing files, the origin file and bindings
/// already requested from a file yield nothing; missing relative targets
/// are recorded in [`BarrelContext::unresolved`].
pub fn resolve_export(
    node: ExportNode<'_>,
    current_file: &Utf8Path,
    ctx: &mut BarrelContext,
    session: &ResolutionSession,
) -> Vec<ExportDescriptor> {
    let mut out = Vec::new();
    match node {
        ExportNode::Named(named) => {
            if named.type_only {
                return out;
            }
            let Some(src) = named.src.as_deref() else {
                return out;
            };
            let Some(specifier) = src.value.as_str() else {
                return out;
            };
            let bindings = named
                .specifiers
                .iter()
                .filter_map(|spec| match spec {
                    ExportSpecifier::Named(spec) if !spec.is_type_only => {
                        let orig = export_name(&spec.orig);
                        let exported_as = spec
                            .exported
                            .as_ref()
                            .map(|name| export_name(name).to_string())
                            .unwrap_or_else(|| orig.to_string());
                        Some(Binding {
                            requested: orig,
                            exported_as,
                        })
                    }
                    ExportSpecifier::Default(default) => Some(Binding {
                        requested: SmolStr::new("default"),
                        exported_as: default.exported.sym.to_string(),
                    }),
                    _ => None,
                })
                .collect();
            follow(current_file, specifier, Request::Names(bindings), ctx, session, &mut out);
        }
        ExportNode::All(all) => {
            if all.type_only {
                return out;
            }
            if let Some(specifier) = all.src.value.as_str() {
                follow(current_file, specifier, Request::All, ctx, session, &mut out);
            }
        }
    }
    out
}

fn follow(
    from: &Utf8Path,
    specifier: &str,
    request: Request,
    ctx: &mut BarrelContext,
    session: &ResolutionSession,
    out: &mut Vec<ExportDescriptor>,
) {
    if !is_relative_specifier(specifier) {
        return;
    }
    let Some(target_path) = session.resolve_module(from, specifier) else {
        ctx.unresolved.push(specifier.to_string());
        return;
    };
    if ctx.depth + 1 > ctx.max_depth || target_path == ctx.origin {
        return;
    }
    let requested = match request {
        Request::Names(bindings) => {
            let fresh: Vec<Binding> = bindings
                .into_iter()
                .filter(|binding| {
                    ctx.visited
                        .insert((target_path.clone(), binding.requested.clone()))
                })
                .collect();
            if fresh.is_empty() {
                return;
            }
            Some(fresh)
        }
        Request::All => {
            if !ctx.visited.insert((target_path.clone(), SmolStr::new(ALL_EXPORTS))) {
                return;
            }
            None
        }
    };
    let Some(target) = session.load(&target_path) else {
        return;
    };

    ctx.depth += 1;
    let index = target.index();
    let wildcard = requested.is_none();
    let bindings = match requested {
        Some(bindings) => bindings,
        None => index
            .exports()
            .filter(|(name, _)| name.as_str() != "default" && !index.is_type_export(name))
            .map(|(name, _)| Binding {
                requested: name.clone(),
                exported_as: name.to_string(),
            })
            .collect(),
    };

    let mut onward: IndexMap<String, Vec<Binding>> = IndexMap::new();
    for binding in bindings {
        match index.export(&binding.requested) {
            Some(ExportBinding::Local(local)) => {
                if index.value(local).is_some() {
                    out.push(descriptor(&target, &binding, DeclarationTarget::Local(local.clone())));
                } else if let Some(import) = index.import(local) {
                    let requested = match &import.imported {
                        ImportedName::Named(name) => name.clone(),
                        ImportedName::Default => SmolStr::new("default"),
                        ImportedName::Namespace => continue,
                    };
                    onward.entry(import.specifier.clone()).or_default().push(Binding {
                        requested,
                        exported_as: binding.exported_as,
                    });
                }
            }
            Some(ExportBinding::DefaultItem(item)) => {
                out.push(descriptor(&target, &binding, DeclarationTarget::DefaultItem(*item)));
            }
            Some(ExportBinding::ReExport {
                specifier, imported, ..
            }) => {
                onward.entry(specifier.clone()).or_default().push(Binding {
                    requested: imported.clone(),
                    exported_as: binding.exported_as,
                });
            }
            None => {
                if !wildcard {
                    for star in index.star_exports() {
                        onward.entry(star.clone()).or_default().push(binding.clone());
                    }
                }
            }
        }
    }

    for (specifier, bindings) in onward {
        follow(&target_path, &specifier, Request::Names(bindings), ctx, session, out);
    }
    if wildcard {
        for star in index.star_exports() {
            follow(&target_path, star, Request::All, ctx, session, out);
        }
    }
    ctx.depth -= 1;
}

fn descriptor(target: &Arc<ParsedFile>, binding: &Binding, decl: DeclarationTarget) -> ExportDescriptor {
    let declared = match &decl {
        DeclarationTarget::Local(local) => Some(local.to_string()),
        DeclarationTarget::DefaultItem(_) => None,
    };
    let canonical = declared.as_deref() == Some(binding.exported_as.as_str());
    ExportDescriptor {
        name: binding.exported_as.clone(),
        alias: if canonical { None } else { declared },
        file_path: target.path().to_owned(),
        node: DeclarationHandle {
            file: Arc::clone(target),
            target: decl,
        },
        canonical,
    }
}

fn export_name(name: &ModuleExportName) -> SmolStr {
    match name {
        ModuleExportName::Ident(ident) => SmolStr::new(ident.sym.as_str()),
        ModuleExportName::Str(value) => SmolStr::new(value.value.to_string_lossy()),
    }
}
