//! End-to-end extraction over in-memory component libraries.

use camino::{Utf8Path, Utf8PathBuf};
use component_extractor::{
    deduplicate_components, extract_components, extract_registry, ExtractorConfig, MemoryLoader,
    ResolutionSession,
};
use component_registry::{DeclarationKind, DiagnosticCode, PropertySource};
use pretty_assertions::assert_eq;
use std::sync::Arc;

// ============================================================================
// TEST INFRASTRUCTURE
// ============================================================================

const EXTRACTED_AT: &str = "2026-01-01T00:00:00+00:00";

fn session(files: &[(&str, &str)]) -> ResolutionSession {
    let mut loader = MemoryLoader::new();
    for (path, text) in files {
        loader.insert(*path, *text);
    }
    ResolutionSession::new(ExtractorConfig::default(), Arc::new(loader))
        .with_extracted_at(EXTRACTED_AT)
}

fn paths(names: &[&str]) -> Vec<Utf8PathBuf> {
    names.iter().map(Utf8PathBuf::from).collect()
}

// ============================================================================
// PROPERTIES
// ============================================================================

#[test]
fn test_wrapper_alias_with_intersection() {
    let button = r#"
type Wrapper<P> = (props: P) => JSX.Element;

interface ButtonProps {
  /** Visible text */
  label: string;
  disabled?: boolean;
}

export const Button: Wrapper<ButtonProps & { icon?: string }> = ({ label, disabled = false, icon }) => (
  <button disabled={disabled}>{icon}{label}</button>
);
"#;
    let session = session(&[("src/button.tsx", button)]);
    let run = extract_registry(&paths(&["src/button.tsx"]), &session);
    let component = &run.components[0];

    let props: Vec<_> = component
        .properties
        .iter()
        .map(|p| (p.name.as_str(), p.ty.as_str(), p.required))
        .collect();
    assert_eq!(
        props,
        vec![
            ("label", "string", true),
            ("disabled", "boolean", false),
            ("icon", "string", false),
        ]
    );
    let disabled = component.property("disabled").unwrap();
    assert_eq!(disabled.default_value.as_deref(), Some("false"));
    assert_eq!(disabled.source, PropertySource::ResolvedType);
    assert_eq!(component.property("label").unwrap().description, "Visible text");
}

#[test]
fn test_imported_props_follow_reexports() {
    let session = session(&[
        ("src/types/index.ts", "export * from './field';"),
        (
            "src/types/field.ts",
            "export type Size = 'sm' | 'md';\nexport interface FieldProps { name: string; size?: Size }",
        ),
        (
            "src/forms/input.tsx",
            "import { FieldProps } from '../types';\nexport function Input(props: FieldProps & { placeholder?: string }) { return <input />; }",
        ),
    ]);
    let run = extract_registry(&paths(&["src/forms/input.tsx"]), &session);
    let input = &run.components[0];
    assert_eq!(input.category, "forms");
    assert_eq!(input.property("size").unwrap().options, vec!["sm", "md"]);
    assert_eq!(input.property("size").unwrap().ty, "'sm' | 'md'");
    assert!(input.property("placeholder").is_some());
}

#[test]
fn test_unresolvable_member_types_fall_back_to_unknown() {
    let session = session(&[(
        "src/field.tsx",
        "export function Field({ value }: { value; [key: string]: unknown }) { return <input />; }",
    )]);
    let run = extract_registry(&paths(&["src/field.tsx"]), &session);
    let value = run.components[0].property("value").unwrap();
    assert_eq!(value.ty, "unknown");
    assert_eq!(value.source, PropertySource::Fallback);
    assert_eq!(run.components[0].properties.len(), 1);
}

// ============================================================================
// CACHING
// ============================================================================

#[test]
fn test_shared_declarations_hit_the_symbol_cache() {
    let files = [
        ("src/types.ts", "export interface BaseProps { id: string; className?: string }"),
        (
            "src/button.tsx",
            "import { BaseProps } from './types';\nexport const Button = (props: BaseProps) => <button />;",
        ),
        (
            "src/link.tsx",
            "import { BaseProps } from './types';\nexport const Link = (props: BaseProps) => <a />;",
        ),
    ];
    let session = session(&files);
    for path in ["src/button.tsx", "src/link.tsx"] {
        let source = files.iter().find(|(name, _)| *name == path).unwrap().1;
        let extraction = extract_components(Utf8Path::new(path), source, &session);
        assert_eq!(extraction.components[0].properties.len(), 2);
    }
    let stats = session.stats();
    assert!(stats.symbol_hits >= 1);
    assert!(stats.hit_rate() > 0.0);
}

#[test]
fn test_framework_attribute_bags_are_skipped_once() {
    let source = r#"
import * as React from "react";
export const A = (props: React.ButtonHTMLAttributes<HTMLButtonElement>) => <button />;
export const B = (props: React.ButtonHTMLAttributes<HTMLButtonElement>) => <button />;
"#;
    let session = session(&[("src/buttons.tsx", source)]);
    let extraction = extract_components(Utf8Path::new("src/buttons.tsx"), source, &session);
    assert_eq!(extraction.components.len(), 2);
    assert!(extraction.components.iter().all(|c| c.properties.is_empty()));

    let stats = session.stats();
    assert_eq!(stats.skips, 1);
    assert_eq!(stats.type_hits, 1);
}

// ============================================================================
// BARRELS AND DEDUPLICATION
// ============================================================================

#[test]
fn test_renamed_reexport_collapses_into_declaration() {
    let session = session(&[
        ("src/index.ts", "export { Button as PrimaryButton } from './button';"),
        ("src/button.tsx", "export const Button = ({ label }: { label: string }) => <b>{label}</b>;"),
    ]);

    let barrel_only = extract_registry(&paths(&["src/index.ts"]), &session);
    let primary = &barrel_only.components[0];
    assert_eq!(primary.name, "PrimaryButton");
    assert_eq!(primary.declaration_kind(), DeclarationKind::BarrelReexport);
    assert_eq!(primary.extensions.origin_file, "src/button.tsx");

    let both = extract_registry(&paths(&["src/index.ts", "src/button.tsx"]), &session);
    let names: Vec<_> = both.components.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Button"]);
    assert_eq!(both.components[0].declaration_kind(), DeclarationKind::Variable);
}

#[test]
fn test_unrelated_same_named_components_survive() {
    let session = session(&[
        ("src/marketing/card.tsx", "export function Card() { return <article />; }"),
        ("src/dashboard/card.tsx", "export function Card() { return <section />; }"),
    ]);
    let run = extract_registry(
        &paths(&["src/marketing/card.tsx", "src/dashboard/card.tsx"]),
        &session,
    );
    let categories: Vec<_> = run.components.iter().map(|c| c.category.as_str()).collect();
    assert_eq!(categories, vec!["marketing", "dashboard"]);
}

#[test]
fn test_deduplication_is_idempotent() {
    let session = session(&[
        ("src/index.ts", "export * from './menu';\nexport { default as Menu } from './menu';"),
        (
            "src/menu.tsx",
            "export function MenuItem() { return <li />; }\nexport default function Menu() { return <ul />; }",
        ),
    ]);
    let run = extract_registry(&paths(&["src/index.ts", "src/menu.tsx"]), &session);
    let once = run.components.clone();
    let twice = deduplicate_components(once.clone());
    assert_eq!(once, twice);

    let names: Vec<_> = once.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["MenuItem", "Menu"]);
}

#[test]
fn test_barrel_cycles_terminate() {
    let session = session(&[
        ("src/a.ts", "export * from './b';"),
        ("src/b.ts", "export * from './a';\nexport { Chip } from './chip';"),
        ("src/chip.tsx", "export const Chip = () => <span />;"),
    ]);
    let run = extract_registry(&paths(&["src/a.ts"]), &session);
    let names: Vec<_> = run.components.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Chip"]);
}

// ============================================================================
// DIAGNOSTICS AND OUTPUT
// ============================================================================

#[test]
fn test_broken_files_do_not_stop_the_run() {
    let session = session(&[
        ("src/broken.tsx", "export const A = () => <div>"),
        ("src/ok.tsx", "export const Ok = () => <div />;"),
    ]);
    let run = extract_registry(&paths(&["src/broken.tsx", "src/ok.tsx"]), &session);
    assert_eq!(run.components.len(), 1);
    assert_eq!(run.diagnostics.len(), 1);
    assert_eq!(run.diagnostics[0].code, DiagnosticCode::ParseError);
    assert_eq!(run.diagnostics[0].file, "src/broken.tsx");
}

#[test]
fn test_serialized_registry() {
    let badge = r#"
/** Small status label. */
export const Badge = ({ tone = "info" }: { tone?: "info" | "warn" }) => (
  <span className="rounded-full px-2 text-xs" />
);
"#;
    let session = session(&[("src/ui/badge.tsx", badge)]);
    let run = extract_registry(&paths(&["src/ui/badge.tsx"]), &session);
    let json = run.registry(false).to_json().unwrap();
    insta::assert_snapshot!(json, @r###"
    {
      "components": [
        {
          "name": "Badge",
          "description": "Small status label.",
          "category": "ui",
          "props": {
            "tone": {
              "type": "\"info\" | \"warn\"",
              "description": "",
              "required": false,
              "source": "resolved-type",
              "default": "\"info\"",
              "options": [
                "info",
                "warn"
              ]
            }
          },
          "variants": {
            "tone": {
              "info": "",
              "warn": ""
            }
          },
          "tokensUsed": {
            "spacing": [
              "px-2"
            ],
            "typography": [
              "text-xs"
            ],
            "radii": [
              "rounded-full"
            ]
          },
          "composition": {
            "slots": [],
            "subComponents": []
          },
          "examples": [],
          "extensions": {
            "filePath": "src/ui/badge.tsx",
            "declarationKind": "variable",
            "adaptorId": "react-tsx",
            "extractedAt": "2026-01-01T00:00:00+00:00"
          }
        }
      ]
    }
    "###);
}
