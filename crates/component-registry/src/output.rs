//! Serialized registry format.
//!
//! This is the shape handed to downstream consumers. It flattens the
//! descriptor model: properties become an object keyed by name, and origin
//! metadata moves under `extensions`.

use crate::descriptor::{ComponentDescriptor, PropertyDescriptor, VariantMap};
use crate::diagnostic::{Diagnostic, Position};
use crate::tokens::TokenUsage;
use indexmap::IndexMap;
use serde::Serialize;

/// The registry document.
#[derive(Debug, Serialize)]
pub struct Registry {
    /// Every extracted component.
    pub components: Vec<RegistryComponent>,
    /// Diagnostics, present only when the caller asked for them.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<FormattedDiagnostic>,
}

impl Registry {
    /// Builds a registry from descriptors.
    pub fn new(components: &[ComponentDescriptor]) -> Self {
        Self {
            components: components.iter().map(RegistryComponent::from).collect(),
            diagnostics: Vec::new(),
        }
    }

    /// Attaches diagnostics.
    pub fn with_diagnostics(mut self, diagnostics: &[Diagnostic]) -> Self {
        self.diagnostics = diagnostics.iter().map(FormattedDiagnostic::from).collect();
        self
    }

    /// Serializes the registry as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// One component in the registry.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryComponent {
    /// The component name.
    pub name: String,
    /// Documentation.
    pub description: String,
    /// Grouping.
    pub category: String,
    /// Properties keyed by name.
    pub props: IndexMap<String, RegistryProp>,
    /// Variant axes.
    pub variants: VariantMap,
    /// Design tokens.
    pub tokens_used: TokenUsage,
    /// Slots and sub-components.
    pub composition: RegistryComposition,
    /// Usage examples.
    pub examples: Vec<String>,
    /// Origin metadata.
    pub extensions: RegistryExtensions,
}

/// One property in the registry.
#[derive(Debug, Serialize)]
pub struct RegistryProp {
    /// The property type.
    #[serde(rename = "type")]
    pub ty: String,
    /// Documentation.
    pub description: String,
    /// Whether the property is required.
    pub required: bool,
    /// Provenance.
    pub source: &'static str,
    /// Default value source text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    /// Literal union members.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

/// Composition block.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryComposition {
    /// Slot property names.
    pub slots: Vec<String>,
    /// Sub-component names.
    pub sub_components: Vec<String>,
}

/// Extensions block.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryExtensions {
    /// The declaring file.
    pub file_path: String,
    /// The declaration shape.
    pub declaration_kind: &'static str,
    /// The adaptor that produced the component.
    pub adaptor_id: String,
    /// When the run happened.
    pub extracted_at: String,
    /// The barrel file the component was reached through.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reexported_from: Option<String>,
}

impl From<&PropertyDescriptor> for RegistryProp {
    fn from(prop: &PropertyDescriptor) -> Self {
        Self {
            ty: prop.ty.clone(),
            description: prop.description.clone(),
            required: prop.required,
            source: prop.source.as_str(),
            default: prop.default_value.clone(),
            options: (!prop.options.is_empty()).then(|| prop.options.clone()),
        }
    }
}

impl From<&ComponentDescriptor> for RegistryComponent {
    fn from(component: &ComponentDescriptor) -> Self {
        Self {
            name: component.name.clone(),
            description: component.description.clone(),
            category: component.category.clone(),
            props: component
                .properties
                .iter()
                .map(|prop| (prop.name.clone(), RegistryProp::from(prop)))
                .collect(),
            variants: component.variants.clone(),
            tokens_used: component.tokens_used.clone(),
            composition: RegistryComposition {
                slots: component.composition.slots.clone(),
                sub_components: component.composition.sub_components.clone(),
            },
            examples: component.examples.clone(),
            extensions: RegistryExtensions {
                file_path: component.extensions.origin_file.to_string(),
                declaration_kind: component.extensions.declaration_kind.as_str(),
                adaptor_id: component.extensions.adaptor_id.clone(),
                extracted_at: component.extensions.extracted_at.clone(),
                reexported_from: component
                    .extensions
                    .reexported_from
                    .as_ref()
                    .map(ToString::to_string),
            },
        }
    }
}

/// A diagnostic in the registry document.
#[derive(Debug, Serialize)]
pub struct FormattedDiagnostic {
    /// The severity (`error`, `warning`, `hint`).
    #[serde(rename = "type")]
    pub severity: &'static str,
    /// The file path.
    pub filename: String,
    /// The position, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<Position>,
    /// The message.
    pub message: String,
    /// The diagnostic code.
    pub code: &'static str,
}

impl From<&Diagnostic> for FormattedDiagnostic {
    fn from(diag: &Diagnostic) -> Self {
        Self {
            severity: diag.severity.as_str(),
            filename: diag.file.to_string(),
            start: diag.position,
            message: diag.message.clone(),
            code: diag.code.as_str(),
        }
    }
}
