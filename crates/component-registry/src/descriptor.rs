//! Component and property descriptors.

use crate::tokens::TokenUsage;
use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Variant axes of a component: axis name to option name to style string.
pub type VariantMap = IndexMap<String, IndexMap<String, String>>;

/// Where a property's information came from.
///
/// Ordered by trust: when the merge step sees the same name from two
/// sources, resolved-type data wins over structural data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PropertySource {
    /// Read from the component's parameter destructuring pattern.
    Structural,
    /// Read from the component's declared property type.
    ResolvedType,
    /// The type could not be determined; recorded as `unknown`.
    Fallback,
}

impl PropertySource {
    /// Returns the source as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertySource::Structural => "structural",
            PropertySource::ResolvedType => "resolved-type",
            PropertySource::Fallback => "fallback",
        }
    }
}

/// A single component property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDescriptor {
    /// The property name.
    pub name: String,
    /// The property type as written (aliases of literal unions expanded).
    #[serde(rename = "type")]
    pub ty: String,
    /// Whether callers must pass the property.
    pub required: bool,
    /// Documentation taken from the leading comment.
    pub description: String,
    /// Default value source text, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    /// Provenance, used by the merge step.
    pub source: PropertySource,
    /// Members of a literal union type, in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl PropertyDescriptor {
    /// The type recorded when a property's type cannot be determined.
    pub const UNKNOWN_TYPE: &'static str = "unknown";

    /// Creates a required property with no description.
    pub fn new(name: impl Into<String>, ty: impl Into<String>, source: PropertySource) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            required: true,
            description: String::new(),
            default_value: None,
            source,
            options: Vec::new(),
        }
    }

    /// Creates an `unknown`-typed fallback property.
    pub fn unknown(name: impl Into<String>) -> Self {
        Self::new(name, Self::UNKNOWN_TYPE, PropertySource::Fallback)
    }

    /// Sets whether the property is required.
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the default value.
    pub fn with_default(mut self, default_value: impl Into<String>) -> Self {
        self.default_value = Some(default_value.into());
        self
    }

    /// Sets the literal options.
    pub fn with_options(mut self, options: Vec<String>) -> Self {
        self.options = options;
        self
    }

    /// Returns true if the type is the `unknown` fallback.
    pub fn is_unknown(&self) -> bool {
        self.ty == Self::UNKNOWN_TYPE
    }
}

/// The syntactic shape a component was declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeclarationKind {
    /// `function Button() {}`
    FunctionDeclaration,
    /// `const Button = () => …` / `const Button = function () {}`
    Variable,
    /// `const Button = forwardRef(…)` and other higher-order wrappers.
    WrappedComponent,
    /// Inferred from `export default …`.
    DefaultExport,
    /// Reached through `export { … } from` / `export * from`.
    BarrelReexport,
}

impl DeclarationKind {
    /// Returns the kind as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclarationKind::FunctionDeclaration => "function-declaration",
            DeclarationKind::Variable => "variable",
            DeclarationKind::WrappedComponent => "wrapped-component",
            DeclarationKind::DefaultExport => "default-export",
            DeclarationKind::BarrelReexport => "barrel-reexport",
        }
    }

    /// Returns true for descriptors reached through a re-export.
    pub fn is_barrel(&self) -> bool {
        matches!(self, DeclarationKind::BarrelReexport)
    }

    /// Returns true for descriptors inferred from a default export.
    pub fn is_default_export(&self) -> bool {
        matches!(self, DeclarationKind::DefaultExport)
    }
}

impl std::fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a component is composed from children.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Composition {
    /// Properties that accept rendered content (`children`, `ReactNode` props).
    pub slots: Vec<String>,
    /// Components attached as static members (`Card.Header = …`).
    pub sub_components: Vec<String>,
}

/// Origin metadata of a descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Extensions {
    /// The file holding the declaration.
    pub origin_file: Utf8PathBuf,
    /// The name the component is declared under in `origin_file`.
    pub declared_name: String,
    /// The declaration shape.
    pub declaration_kind: DeclarationKind,
    /// The adaptor that produced the descriptor.
    pub adaptor_id: String,
    /// RFC 3339 timestamp of the extraction run.
    pub extracted_at: String,
    /// The barrel file the component was reached through, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reexported_from: Option<Utf8PathBuf>,
}

/// The canonical record of one logical component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDescriptor {
    /// The component name as seen by consumers.
    pub name: String,
    /// Grouping derived from the file location.
    pub category: String,
    /// Documentation taken from the declaration's leading comment.
    pub description: String,
    /// Resolved and merged properties.
    pub properties: Vec<PropertyDescriptor>,
    /// Style variant axes.
    pub variants: VariantMap,
    /// Design tokens referenced by the declaration.
    pub tokens_used: TokenUsage,
    /// Slots and sub-components.
    pub composition: Composition,
    /// `@example` blocks from the documentation.
    pub examples: Vec<String>,
    /// Origin metadata.
    pub extensions: Extensions,
}

impl ComponentDescriptor {
    /// Looks up a property by name.
    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|prop| prop.name == name)
    }

    /// Returns the declaration this descriptor points at: the origin file and
    /// the name declared there. Descriptors with the same identity describe
    /// the same component, whatever name they are exported under.
    pub fn declaration_identity(&self) -> (&Utf8Path, &str) {
        (
            &self.extensions.origin_file,
            &self.extensions.declared_name,
        )
    }

    /// Returns the declaration shape.
    pub fn declaration_kind(&self) -> DeclarationKind {
        self.extensions.declaration_kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_property_is_fallback() {
        let prop = PropertyDescriptor::unknown("onChange");
        assert!(prop.is_unknown());
        assert_eq!(prop.source, PropertySource::Fallback);
        assert!(prop.required);
    }

    #[test]
    fn test_source_serializes_kebab_case() {
        let json = serde_json::to_string(&PropertySource::ResolvedType).unwrap();
        assert_eq!(json, "\"resolved-type\"");
        assert_eq!(PropertySource::ResolvedType.as_str(), "resolved-type");
    }

    #[test]
    fn test_declaration_kind_flags() {
        assert!(DeclarationKind::BarrelReexport.is_barrel());
        assert!(DeclarationKind::DefaultExport.is_default_export());
        assert!(!DeclarationKind::Variable.is_barrel());
        assert_eq!(
            DeclarationKind::WrappedComponent.to_string(),
            "wrapped-component"
        );
    }
}
