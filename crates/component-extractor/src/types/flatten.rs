//! Flattening type nodes into property lists.

use super::members::is_nullish;
use super::{merge_by_name, TypeEngine, TypeHandle};
use crate::functions::{entity_name, expr_name};
use crate::session::{qualified, symbol_key, type_key, CacheTable, PropList};
use component_registry::{PropertyDescriptor, PropertySource};
use std::sync::Arc;
use swc_common::Spanned;
use swc_ecma_ast::{TsIntersectionType, TsType, TsUnionOrIntersectionType};
use tsx_parser::{ExportBinding, ImportedName, ParsedFile, TypeDecl};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UtilityType {
    Partial,
    Required,
    Readonly,
    NonNullable,
    Pick,
    Omit,
    PropsWithChildren,
}

impl UtilityType {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "Partial" => Self::Partial,
            "Required" => Self::Required,
            "Readonly" => Self::Readonly,
            "NonNullable" => Self::NonNullable,
            "Pick" => Self::Pick,
            "Omit" => Self::Omit,
            "PropsWithChildren" => Self::PropsWithChildren,
            _ => return None,
        })
    }
}

fn empty() -> PropList {
    Arc::from(Vec::new())
}

/// The normalized text of a reference written as `name<args>`.
fn reference_signature(file: &ParsedFile, name: &str, args: &[Box<TsType>]) -> String {
    if args.is_empty() {
        return name.to_string();
    }
    let args: Vec<String> = args
        .iter()
        .filter_map(|arg| file.signature(arg.span()))
        .collect();
    format!("{name}<{}>", args.join(", "))
}

impl TypeEngine<'_> {
    /// Flattens a type node into its properties.
    ///
    /// `depth` counts the named declarations (interfaces and aliases)
    /// entered on the way to `handle`. A declaration entered past the
    /// configured maximum resolves to nothing. Results are cached per depth,
    /// so a list cut short deep in one query is never served to a
    /// shallower one. Fast-skipped types count one skip per signature.
    pub fn resolve_type_properties(&self, handle: TypeHandle<'_>, depth: usize) -> PropList {
        let session = self.session;
        let config = session.config();
        if depth > config.max_type_depth {
            return empty();
        }
        session.record_query();

        let TypeHandle { file, ty } = handle;
        let Some(signature) = file.signature(ty.span()) else {
            return empty();
        };
        if let TsType::TsTypeRef(type_ref) = ty {
            let name = entity_name(&type_ref.type_name);
            if config.is_skipped_type(&name) {
                session.record_skip(qualified(file.path(), &signature));
                return empty();
            }
            if depth > config.framework_depth_threshold && config.is_framework_type(&name) {
                return empty();
            }
        }
        let key = type_key(depth, file.path(), &signature);
        if let Some(hit) = session.cached(CacheTable::Type, &key) {
            return hit;
        }

        let props = match ty {
            TsType::TsUnionOrIntersectionType(TsUnionOrIntersectionType::TsIntersectionType(
                intersection,
            )) => match session.cached(CacheTable::Intersection, &key) {
                Some(hit) => hit,
                None => {
                    let props = Arc::from(self.resolve_intersection(file, intersection, depth));
                    session.store(CacheTable::Intersection, key.clone(), props)
                }
            },
            _ => Arc::from(self.resolve_type(file, ty, depth)),
        };
        session.store(CacheTable::Type, key, props)
    }

    fn resolve_type(&self, file: &ParsedFile, ty: &TsType, depth: usize) -> Vec<PropertyDescriptor> {
        match ty {
            TsType::TsTypeLit(lit) => self.resolve_members(file, &lit.members, depth),
            TsType::TsTypeRef(type_ref) => {
                let name = entity_name(&type_ref.type_name);
                let args = type_ref
                    .type_params
                    .as_ref()
                    .map_or(&[][..], |params| &params.params[..]);
                self.resolve_named(file, &name, args, depth, 0)
            }
            TsType::TsParenthesizedType(paren) => self
                .resolve_type_properties(TypeHandle { file, ty: &paren.type_ann }, depth)
                .to_vec(),
            TsType::TsUnionOrIntersectionType(TsUnionOrIntersectionType::TsUnionType(union)) => {
                match union.types.iter().find(|member| !is_nullish(member)) {
                    Some(member) => self
                        .resolve_type_properties(TypeHandle { file, ty: member }, depth)
                        .to_vec(),
                    None => Vec::new(),
                }
            }
            TsType::TsUnionOrIntersectionType(TsUnionOrIntersectionType::TsIntersectionType(
                intersection,
            )) => self.resolve_intersection(file, intersection, depth),
            _ => Vec::new(),
        }
    }

    /// Later members override earlier members' same-named properties.
    fn resolve_intersection(
        &self,
        file: &ParsedFile,
        intersection: &TsIntersectionType,
        depth: usize,
    ) -> Vec<PropertyDescriptor> {
        let mut props = Vec::new();
        for member in &intersection.types {
            let resolved = self.resolve_type_properties(TypeHandle { file, ty: member }, depth);
            merge_by_name(&mut props, resolved.iter().cloned());
        }
        props
    }

    /// Resolves a type referenced by name from `file`: a local declaration,
    /// a utility type, an import, or a namespace import member.
    ///
    /// `hops` counts the imports and re-exports followed since the last
    /// declaration; past `maxBarrelDepth` the lookup gives up.
    fn resolve_named(
        &self,
        file: &ParsedFile,
        name: &str,
        args: &[Box<TsType>],
        depth: usize,
        hops: usize,
    ) -> Vec<PropertyDescriptor> {
        let config = self.session.config();
        if config.is_skipped_type(name) {
            self.session
                .record_skip(qualified(file.path(), &reference_signature(file, name, args)));
            return Vec::new();
        }

        if let Some((namespace, member)) = name.split_once('.') {
            if let Some(binding) = file.index().import(namespace) {
                if binding.imported == ImportedName::Namespace {
                    return self.resolve_imported(file, &binding.specifier, member, depth, hops + 1);
                }
            }
            return match (config.is_framework_type(name), UtilityType::from_name(member)) {
                (true, Some(utility)) => self.resolve_utility(file, utility, args, depth),
                _ => Vec::new(),
            };
        }

        if let Some(decl) = file.type_decl(name) {
            return self.resolve_declaration(file, name, decl, depth + 1);
        }
        if let Some(utility) = UtilityType::from_name(name) {
            return self.resolve_utility(file, utility, args, depth);
        }
        if let Some(binding) = file.index().import(name) {
            let imported = match &binding.imported {
                ImportedName::Named(imported) => imported.as_str(),
                ImportedName::Default => "default",
                ImportedName::Namespace => return Vec::new(),
            };
            return self.resolve_imported(file, &binding.specifier, imported, depth, hops + 1);
        }
        Vec::new()
    }

    /// Resolves `exported` from the module `specifier` imports. Bare
    /// specifiers (packages) resolve to nothing.
    fn resolve_imported(
        &self,
        file: &ParsedFile,
        specifier: &str,
        exported: &str,
        depth: usize,
        hops: usize,
    ) -> Vec<PropertyDescriptor> {
        if hops > self.session.config().max_barrel_depth {
            return Vec::new();
        }
        let Some(path) = self.session.resolve_module(file.path(), specifier) else {
            return Vec::new();
        };
        let Some(target) = self.session.load(&path) else {
            return Vec::new();
        };
        self.resolve_exported(&target, exported, depth, hops)
    }

    fn resolve_exported(
        &self,
        target: &ParsedFile,
        exported: &str,
        depth: usize,
        hops: usize,
    ) -> Vec<PropertyDescriptor> {
        match target.index().export(exported) {
            Some(ExportBinding::Local(local)) => self.resolve_named(target, local, &[], depth, hops),
            Some(ExportBinding::ReExport {
                specifier,
                imported,
                ..
            }) => self.resolve_imported(target, specifier, imported, depth, hops + 1),
            Some(ExportBinding::DefaultItem(_)) => Vec::new(),
            None if target.type_decl(exported).is_some() => {
                self.resolve_named(target, exported, &[], depth, hops)
            }
            None => target
                .index()
                .star_exports()
                .iter()
                .map(|specifier| self.resolve_imported(target, specifier, exported, depth, hops + 1))
                .find(|props| !props.is_empty())
                .unwrap_or_default(),
        }
    }

    /// Resolves an interface (with its `extends` clauses) or a type alias,
    /// through the symbol cache. `depth` already counts this declaration.
    fn resolve_declaration(
        &self,
        file: &ParsedFile,
        name: &str,
        decl: TypeDecl<'_>,
        depth: usize,
    ) -> Vec<PropertyDescriptor> {
        if depth > self.session.config().max_type_depth {
            return Vec::new();
        }
        let span = match decl {
            TypeDecl::Interface(interface) => interface.span,
            TypeDecl::Alias(alias) => alias.span,
        };
        let key = symbol_key(depth, name, file.path(), &file.signature(span).unwrap_or_default());
        if let Some(hit) = self.session.cached_symbol(&key) {
            return hit.to_vec();
        }

        let props = match decl {
            TypeDecl::Interface(interface) => {
                let mut props = Vec::new();
                for parent in &interface.extends {
                    let Some(parent_name) = expr_name(&parent.expr) else {
                        continue;
                    };
                    let args = parent
                        .type_args
                        .as_ref()
                        .map_or(&[][..], |params| &params.params[..]);
                    let inherited = self.resolve_named(file, &parent_name, args, depth, 0);
                    merge_by_name(&mut props, inherited);
                }
                let own = self.resolve_members(file, &interface.body.body, depth);
                merge_by_name(&mut props, own);
                props
            }
            TypeDecl::Alias(alias) => self
                .resolve_type_properties(TypeHandle { file, ty: &alias.type_ann }, depth)
                .to_vec(),
        };
        self.session.store_symbol(key, Arc::from(props)).to_vec()
    }

    fn resolve_utility(
        &self,
        file: &ParsedFile,
        utility: UtilityType,
        args: &[Box<TsType>],
        depth: usize,
    ) -> Vec<PropertyDescriptor> {
        let Some(inner) = args.first() else {
            return Vec::new();
        };
        let props = self.resolve_type_properties(TypeHandle { file, ty: inner }, depth);
        let keys = || {
            args.get(1)
                .map(|keys| self.literal_members(file, keys, depth))
                .unwrap_or_default()
        };
        match utility {
            UtilityType::Partial => props.iter().map(|p| p.clone().with_required(false)).collect(),
            UtilityType::Required => props.iter().map(|p| p.clone().with_required(true)).collect(),
            UtilityType::Readonly | UtilityType::NonNullable => props.to_vec(),
            UtilityType::Pick => {
                let keys = keys();
                props.iter().filter(|p| keys.contains(&p.name)).cloned().collect()
            }
            UtilityType::Omit => {
                let keys = keys();
                props.iter().filter(|p| !keys.contains(&p.name)).cloned().collect()
            }
            UtilityType::PropsWithChildren => {
                let mut props = props.to_vec();
                if !props.iter().any(|p| p.name == "children") {
                    props.push(
                        PropertyDescriptor::new("children", "ReactNode", PropertySource::ResolvedType)
                            .with_required(false),
                    );
                }
                props
            }
        }
    }
}
