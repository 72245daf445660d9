//! Property merging and component deduplication.

use camino::{Utf8Path, Utf8PathBuf};
use component_registry::{ComponentDescriptor, PropertyDescriptor};
use rustc_hash::{FxHashMap, FxHashSet};

/// Merges destructured properties with resolved-type properties.
///
/// Structural order comes first. A resolved counterpart supplies type,
/// requiredness, description, options and source; the structural default
/// fills a missing default and always makes the property optional.
/// Resolved-only properties are appended in their own order.
pub fn merge_properties(
    structural: Vec<PropertyDescriptor>,
    resolved: &[PropertyDescriptor],
) -> Vec<PropertyDescriptor> {
    let mut merged: Vec<PropertyDescriptor> = Vec::with_capacity(structural.len() + resolved.len());
    for prop in structural {
        if merged.iter().any(|existing| existing.name == prop.name) {
            continue;
        }
        let Some(typed) = resolved.iter().find(|typed| typed.name == prop.name) else {
            merged.push(prop);
            continue;
        };
        let mut out = typed.clone();
        if prop.default_value.is_some() {
            out.required = false;
            if out.default_value.is_none() {
                out.default_value = prop.default_value;
            }
        }
        merged.push(out);
    }
    for typed in resolved {
        if !merged.iter().any(|existing| existing.name == typed.name) {
            merged.push(typed.clone());
        }
    }
    merged
}

/// Collapses descriptors of the same component.
///
/// Two descriptors describe the same component when they share a name or a
/// declaration identity; groups are closed under both. Each group keeps one
/// descriptor, preferring directly declared over re-exported, then named
/// over default-inferred, then the first seen. Groups appear in the order
/// of their first member. Applying this twice changes nothing.
pub fn deduplicate_components(components: Vec<ComponentDescriptor>) -> Vec<ComponentDescriptor> {
    let mut groups = DisjointSet::new(components.len());
    {
        let mut by_name: FxHashMap<&str, usize> = FxHashMap::default();
        let mut by_identity: FxHashMap<(&Utf8Path, &str), usize> = FxHashMap::default();
        for (i, component) in components.iter().enumerate() {
            match by_name.get(component.name.as_str()) {
                Some(&first) => groups.union(first, i),
                None => {
                    by_name.insert(&component.name, i);
                }
            }
            match by_identity.get(&component.declaration_identity()) {
                Some(&first) => groups.union(first, i),
                None => {
                    by_identity.insert(component.declaration_identity(), i);
                }
            }
        }
    }

    let mut winners: FxHashMap<usize, usize> = FxHashMap::default();
    for (i, component) in components.iter().enumerate() {
        let root = groups.find(i);
        let best = winners.entry(root).or_insert(i);
        if rank(component) < rank(&components[*best]) {
            *best = i;
        }
    }

    let dropped = components.len() - winners.len();
    if dropped > 0 {
        tracing::debug!(dropped, "collapsed duplicate component descriptors");
    }
    let mut roots: Vec<usize> = winners.keys().copied().collect();
    roots.sort_unstable();
    let mut slots: Vec<Option<ComponentDescriptor>> = components.into_iter().map(Some).collect();
    roots
        .into_iter()
        .filter_map(|root| slots[winners[&root]].take())
        .collect()
}

/// Lower ranks win.
fn rank(component: &ComponentDescriptor) -> (bool, bool) {
    let kind = component.declaration_kind();
    (kind.is_barrel(), kind.is_default_export())
}

/// Drops re-exported descriptors whose declaration is already present.
///
/// Files are deduplicated on their own; across files only re-exports are
/// collapsed: against a direct declaration anywhere in the run, then
/// against each other. Same-named components in unrelated files survive.
pub fn collapse_reexports(components: Vec<ComponentDescriptor>) -> Vec<ComponentDescriptor> {
    let declared: FxHashSet<(Utf8PathBuf, String)> = components
        .iter()
        .filter(|component| !component.declaration_kind().is_barrel())
        .map(identity)
        .collect();

    let mut seen: FxHashSet<(Utf8PathBuf, String)> = FxHashSet::default();
    components
        .into_iter()
        .filter(|component| {
            if !component.declaration_kind().is_barrel() {
                return true;
            }
            let key = identity(component);
            !declared.contains(&key) && seen.insert(key)
        })
        .collect()
}

fn identity(component: &ComponentDescriptor) -> (Utf8PathBuf, String) {
    let (file, name) = component.declaration_identity();
    (file.to_owned(), name.to_string())
}

/// Union-find over descriptor indices; the root is the smallest index.
struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
        }
    }

    fn find(&mut self, mut i: usize) -> usize {
        while self.parent[i] != i {
            self.parent[i] = self.parent[self.parent[i]];
            i = self.parent[i];
        }
        i
    }

    fn union(&mut self, a: usize, b: usize) {
        let (a, b) = (self.find(a), self.find(b));
        if a != b {
            let (root, child) = if a < b { (a, b) } else { (b, a) };
            self.parent[child] = root;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use component_registry::{
        Composition, DeclarationKind, Extensions, PropertySource, TokenUsage,
    };
    use pretty_assertions::assert_eq;

    fn component(name: &str, file: &str, declared: &str, kind: DeclarationKind) -> ComponentDescriptor {
        ComponentDescriptor {
            name: name.to_string(),
            category: "general".to_string(),
            description: String::new(),
            properties: Vec::new(),
            variants: Default::default(),
            tokens_used: TokenUsage::new(),
            composition: Composition::default(),
            examples: Vec::new(),
            extensions: Extensions {
                origin_file: file.into(),
                declared_name: declared.to_string(),
                declaration_kind: kind,
                adaptor_id: "react-tsx".to_string(),
                extracted_at: "2026-01-01T00:00:00Z".to_string(),
                reexported_from: kind.is_barrel().then(|| "src/index.ts".into()),
            },
        }
    }

    fn names(components: &[ComponentDescriptor]) -> Vec<(&str, DeclarationKind)> {
        components
            .iter()
            .map(|c| (c.name.as_str(), c.declaration_kind()))
            .collect()
    }

    #[test]
    fn test_structural_defaults_make_resolved_props_optional() {
        let structural = vec![
            PropertyDescriptor::new("size", "string", PropertySource::Structural)
                .with_required(false)
                .with_default("\"md\""),
            PropertyDescriptor::new("label", "unknown", PropertySource::Structural),
        ];
        let resolved = vec![
            PropertyDescriptor::new("label", "string", PropertySource::ResolvedType)
                .with_description("Visible text"),
            PropertyDescriptor::new("size", "\"sm\" | \"md\"", PropertySource::ResolvedType)
                .with_options(vec!["sm".into(), "md".into()]),
            PropertyDescriptor::new("onClick", "() => void", PropertySource::ResolvedType)
                .with_required(false),
        ];

        let merged = merge_properties(structural, &resolved);
        let size = &merged[0];
        assert_eq!(size.name, "size");
        assert_eq!(size.ty, "\"sm\" | \"md\"");
        assert!(!size.required);
        assert_eq!(size.default_value.as_deref(), Some("\"md\""));
        assert_eq!(size.source, PropertySource::ResolvedType);
        assert_eq!(size.options, vec!["sm", "md"]);

        assert_eq!(merged[1].description, "Visible text");
        assert!(merged[1].required);
        assert_eq!(merged[2].name, "onClick");
        assert_eq!(merged.len(), 3);
    }

    #[test]
    fn test_resolved_default_is_kept() {
        let structural = vec![PropertyDescriptor::new("tone", "string", PropertySource::Structural)
            .with_required(false)
            .with_default("'info'")];
        let resolved = vec![PropertyDescriptor::new("tone", "string", PropertySource::ResolvedType)
            .with_default("'neutral'")];
        let merged = merge_properties(structural, &resolved);
        assert_eq!(merged[0].default_value.as_deref(), Some("'neutral'"));
        assert!(!merged[0].required);
    }

    #[test]
    fn test_structural_only_props_survive() {
        let structural = vec![PropertyDescriptor::new("as", "unknown", PropertySource::Structural)];
        let merged = merge_properties(structural, &[]);
        assert_eq!(merged[0].source, PropertySource::Structural);
    }

    #[test]
    fn test_canonical_declaration_beats_reexport() {
        let list = vec![
            component("PrimaryButton", "src/button.tsx", "Button", DeclarationKind::BarrelReexport),
            component("Button", "src/button.tsx", "Button", DeclarationKind::Variable),
        ];
        let out = deduplicate_components(list);
        assert_eq!(names(&out), vec![("Button", DeclarationKind::Variable)]);
    }

    #[test]
    fn test_named_beats_default_inferred() {
        let list = vec![
            component("Card", "src/card.tsx", "Card", DeclarationKind::DefaultExport),
            component("Card", "src/card.tsx", "Card", DeclarationKind::FunctionDeclaration),
            component("Badge", "src/card.tsx", "Badge", DeclarationKind::Variable),
        ];
        let out = deduplicate_components(list);
        assert_eq!(
            names(&out),
            vec![
                ("Card", DeclarationKind::FunctionDeclaration),
                ("Badge", DeclarationKind::Variable),
            ]
        );
    }

    #[test]
    fn test_groups_close_over_name_and_identity() {
        let list = vec![
            component("A", "src/a.tsx", "A", DeclarationKind::BarrelReexport),
            component("B", "src/a.tsx", "A", DeclarationKind::BarrelReexport),
            component("B", "src/b.tsx", "B", DeclarationKind::Variable),
        ];
        let once = deduplicate_components(list);
        assert_eq!(names(&once), vec![("B", DeclarationKind::Variable)]);
        let twice = deduplicate_components(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_output_follows_first_appearance() {
        let list = vec![
            component("Menu", "src/index.ts", "Menu", DeclarationKind::BarrelReexport),
            component("Item", "src/item.tsx", "Item", DeclarationKind::Variable),
            component("Menu", "src/menu.tsx", "Menu", DeclarationKind::Variable),
        ];
        let out = deduplicate_components(list);
        assert_eq!(
            names(&out),
            vec![
                ("Menu", DeclarationKind::Variable),
                ("Item", DeclarationKind::Variable),
            ]
        );
    }

    #[test]
    fn test_first_seen_wins_ties() {
        let mut first = component("Icon", "src/icon.tsx", "Icon", DeclarationKind::Variable);
        first.description = "first".into();
        let mut second = component("Icon", "src/icon.tsx", "Icon", DeclarationKind::Variable);
        second.description = "second".into();
        let out = deduplicate_components(vec![first, second]);
        assert_eq!(out[0].description, "first");
    }

    #[test]
    fn test_reexports_collapse_across_files() {
        let list = vec![
            component("Card", "src/a/card.tsx", "Card", DeclarationKind::FunctionDeclaration),
            component("Card", "src/b/card.tsx", "Card", DeclarationKind::FunctionDeclaration),
            component("PrimaryCard", "src/a/card.tsx", "Card", DeclarationKind::BarrelReexport),
            component("Tag", "src/tag.tsx", "Tag", DeclarationKind::BarrelReexport),
            component("Label", "src/tag.tsx", "Tag", DeclarationKind::BarrelReexport),
        ];
        let out = collapse_reexports(list);
        assert_eq!(
            names(&out),
            vec![
                ("Card", DeclarationKind::FunctionDeclaration),
                ("Card", DeclarationKind::FunctionDeclaration),
                ("Tag", DeclarationKind::BarrelReexport),
            ]
        );
    }
}
