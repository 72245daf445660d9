//! Index of a module's top-level bindings.
//!
//! Records, for one parsed file:
//! - value declarations (`function`, `const/let/var`, `class`), exported or not
//! - type declarations (`interface`, `type`)
//! - imports, keyed by local name
//! - exports, keyed by exported name, including `export { … } from` re-exports
//! - wildcard `export * from` specifiers

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use swc_ecma_ast::{
    Decl, DefaultDecl, ExportSpecifier, Expr, ImportSpecifier, Module, ModuleDecl,
    ModuleExportName, ModuleItem, Pat, Stmt, Str,
};

/// Where a top-level value declaration lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueSite {
    /// Index into `module.body`.
    pub item: usize,
    /// The declaration flavor.
    pub kind: ValueKind,
    /// Whether the declaration itself carries `export`.
    pub exported: bool,
}

/// The flavor of a value declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// `function Name() {}`
    Function,
    /// One declarator of a `const/let/var` statement.
    Variable {
        /// Index into `VarDecl::decls`.
        declarator: usize,
    },
    /// `class Name {}`
    Class,
}

/// Where a top-level type declaration lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeSite {
    /// Index into `module.body`.
    pub item: usize,
    /// `true` for interfaces, `false` for type aliases.
    pub is_interface: bool,
}

/// The name a binding was imported under in its source module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportedName {
    /// `import { Name } from` / `import { Name as Local } from`
    Named(SmolStr),
    /// `import Local from`
    Default,
    /// `import * as Local from`
    Namespace,
}

/// An import binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportBinding {
    /// The module specifier, verbatim.
    pub specifier: String,
    /// What was imported.
    pub imported: ImportedName,
    /// Whether the import is type-only.
    pub type_only: bool,
}

/// What an exported name refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportBinding {
    /// A local binding (`export const X`, `export { a as X }`, `export default a`).
    Local(SmolStr),
    /// `export default <function or expression>`, stored by item index.
    DefaultItem(usize),
    /// `export { name as X } from './mod'`.
    ReExport {
        /// The module specifier, verbatim.
        specifier: String,
        /// The name in the source module (`default` for default re-exports).
        imported: SmolStr,
        /// Index of the export statement in `module.body`.
        item: usize,
    },
}

/// Index of a module's top-level bindings.
#[derive(Debug, Clone, Default)]
pub struct ModuleIndex {
    values: IndexMap<SmolStr, ValueSite>,
    types: FxHashMap<SmolStr, TypeSite>,
    imports: FxHashMap<SmolStr, ImportBinding>,
    exports: IndexMap<SmolStr, ExportBinding>,
    star_exports: Vec<String>,
}

impl ModuleIndex {
    /// Builds the index for a parsed module.
    pub fn build(module: &Module) -> Self {
        let mut index = Self::default();

        for (item_idx, item) in module.body.iter().enumerate() {
            match item {
                ModuleItem::Stmt(Stmt::Decl(decl)) => index.add_decl(item_idx, decl, false),
                ModuleItem::Stmt(_) => {}
                ModuleItem::ModuleDecl(module_decl) => index.add_module_decl(item_idx, module_decl),
            }
        }

        index
    }

    fn add_decl(&mut self, item: usize, decl: &Decl, exported: bool) {
        match decl {
            Decl::Fn(fn_decl) => {
                let name = SmolStr::new(fn_decl.ident.sym.as_str());
                self.insert_value(name, item, ValueKind::Function, exported);
            }
            Decl::Class(class_decl) => {
                let name = SmolStr::new(class_decl.ident.sym.as_str());
                self.insert_value(name, item, ValueKind::Class, exported);
            }
            Decl::Var(var_decl) => {
                for (declarator, decl) in var_decl.decls.iter().enumerate() {
                    // Destructuring declarations never name a component.
                    if let Pat::Ident(ident) = &decl.name {
                        let name = SmolStr::new(ident.id.sym.as_str());
                        self.insert_value(name, item, ValueKind::Variable { declarator }, exported);
                    }
                }
            }
            Decl::TsInterface(interface) => {
                self.types.insert(
                    SmolStr::new(interface.id.sym.as_str()),
                    TypeSite {
                        item,
                        is_interface: true,
                    },
                );
                if exported {
                    let name = SmolStr::new(interface.id.sym.as_str());
                    self.exports.insert(name.clone(), ExportBinding::Local(name));
                }
            }
            Decl::TsTypeAlias(alias) => {
                self.types.insert(
                    SmolStr::new(alias.id.sym.as_str()),
                    TypeSite {
                        item,
                        is_interface: false,
                    },
                );
                if exported {
                    let name = SmolStr::new(alias.id.sym.as_str());
                    self.exports.insert(name.clone(), ExportBinding::Local(name));
                }
            }
            _ => {}
        }
    }

    fn insert_value(&mut self, name: SmolStr, item: usize, kind: ValueKind, exported: bool) {
        if exported {
            self.exports
                .insert(name.clone(), ExportBinding::Local(name.clone()));
        }
        // Overload signatures and redeclarations: the first site wins.
        self.values.entry(name).or_insert(ValueSite {
            item,
            kind,
            exported,
        });
    }

    fn add_module_decl(&mut self, item: usize, module_decl: &ModuleDecl) {
        match module_decl {
            ModuleDecl::Import(import) => {
                let specifier = str_value(&import.src);
                for spec in &import.specifiers {
                    let (local, imported, type_only) = match spec {
                        ImportSpecifier::Named(named) => {
                            let imported = named
                                .imported
                                .as_ref()
                                .map(module_export_name)
                                .unwrap_or_else(|| SmolStr::new(named.local.sym.as_str()));
                            let imported = if imported == "default" {
                                ImportedName::Default
                            } else {
                                ImportedName::Named(imported)
                            };
                            (&named.local, imported, named.is_type_only)
                        }
                        ImportSpecifier::Default(default) => {
                            (&default.local, ImportedName::Default, false)
                        }
                        ImportSpecifier::Namespace(namespace) => {
                            (&namespace.local, ImportedName::Namespace, false)
                        }
                    };
                    self.imports.insert(
                        SmolStr::new(local.sym.as_str()),
                        ImportBinding {
                            specifier: specifier.clone(),
                            imported,
                            type_only: type_only || import.type_only,
                        },
                    );
                }
            }
            ModuleDecl::ExportDecl(export_decl) => self.add_decl(item, &export_decl.decl, true),
            ModuleDecl::ExportNamed(named) => {
                if named.type_only {
                    return;
                }
                let specifier = named.src.as_deref().map(str_value);
                for spec in &named.specifiers {
                    match spec {
                        ExportSpecifier::Named(named_spec) => {
                            if named_spec.is_type_only {
                                continue;
                            }
                            let orig = module_export_name(&named_spec.orig);
                            let exported = named_spec
                                .exported
                                .as_ref()
                                .map(module_export_name)
                                .unwrap_or_else(|| orig.clone());
                            let binding = match &specifier {
                                Some(specifier) => ExportBinding::ReExport {
                                    specifier: specifier.clone(),
                                    imported: orig,
                                    item,
                                },
                                None => ExportBinding::Local(orig),
                            };
                            self.exports.insert(exported, binding);
                        }
                        ExportSpecifier::Default(default_spec) => {
                            if let Some(specifier) = &specifier {
                                self.exports.insert(
                                    SmolStr::new(default_spec.exported.sym.as_str()),
                                    ExportBinding::ReExport {
                                        specifier: specifier.clone(),
                                        imported: SmolStr::new("default"),
                                        item,
                                    },
                                );
                            }
                        }
                        // `export * as ns from` exposes a namespace object, not a binding.
                        ExportSpecifier::Namespace(_) => {}
                    }
                }
            }
            ModuleDecl::ExportAll(export_all) => {
                if !export_all.type_only {
                    self.star_exports.push(str_value(&export_all.src));
                }
            }
            ModuleDecl::ExportDefaultDecl(default_decl) => match &default_decl.decl {
                DefaultDecl::Fn(fn_expr) => {
                    if let Some(ident) = &fn_expr.ident {
                        let name = SmolStr::new(ident.sym.as_str());
                        self.values.entry(name).or_insert(ValueSite {
                            item,
                            kind: ValueKind::Function,
                            exported: true,
                        });
                    }
                    self.exports
                        .insert(SmolStr::new("default"), ExportBinding::DefaultItem(item));
                }
                DefaultDecl::Class(_) => {
                    self.exports
                        .insert(SmolStr::new("default"), ExportBinding::DefaultItem(item));
                }
                DefaultDecl::TsInterfaceDecl(_) => {}
            },
            ModuleDecl::ExportDefaultExpr(default_expr) => {
                let binding = match &*default_expr.expr {
                    Expr::Ident(ident) => ExportBinding::Local(SmolStr::new(ident.sym.as_str())),
                    _ => ExportBinding::DefaultItem(item),
                };
                self.exports.insert(SmolStr::new("default"), binding);
            }
            _ => {}
        }
    }

    /// Looks up a top-level value declaration by local name.
    pub fn value(&self, name: &str) -> Option<ValueSite> {
        self.values.get(name).copied()
    }

    /// Iterates over value declarations in source order.
    pub fn values(&self) -> impl Iterator<Item = (&SmolStr, &ValueSite)> {
        self.values.iter()
    }

    /// Looks up a top-level type declaration by name.
    pub fn type_site(&self, name: &str) -> Option<TypeSite> {
        self.types.get(name).copied()
    }

    /// Looks up an import by local name.
    pub fn import(&self, local: &str) -> Option<&ImportBinding> {
        self.imports.get(local)
    }

    /// Looks up an export by exported name.
    pub fn export(&self, exported: &str) -> Option<&ExportBinding> {
        self.exports.get(exported)
    }

    /// Iterates over exports in source order.
    pub fn exports(&self) -> impl Iterator<Item = (&SmolStr, &ExportBinding)> {
        self.exports.iter()
    }

    /// Specifiers of `export * from` statements, in source order.
    pub fn star_exports(&self) -> &[String] {
        &self.star_exports
    }

    /// Returns true if `name` is exported as a type only (interface or alias).
    pub fn is_type_export(&self, name: &str) -> bool {
        match self.exports.get(name) {
            Some(ExportBinding::Local(local)) => {
                self.types.contains_key(local.as_str()) && !self.values.contains_key(local.as_str())
            }
            _ => false,
        }
    }
}

fn module_export_name(name: &ModuleExportName) -> SmolStr {
    match name {
        ModuleExportName::Ident(ident) => SmolStr::new(ident.sym.as_str()),
        ModuleExportName::Str(value) => SmolStr::new(value.value.to_string_lossy()),
    }
}

fn str_value(value: &Str) -> String {
    value.value.to_string_lossy().into_owned()
}
