//! Extractor configuration.

use crate::error::ConfigError;
use camino::Utf8Path;
use serde::Deserialize;
use std::fs;

/// Tunables of one extraction run.
///
/// Every field has a default, so an empty JSON object is a valid config.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtractorConfig {
    /// Hops a re-export chain may take before it is abandoned.
    pub max_barrel_depth: usize,

    /// Nesting depth at which property type resolution stops.
    pub max_type_depth: usize,

    /// Depth past which framework-namespace types (`React.*`, `JSX.*`) are
    /// no longer expanded.
    pub framework_depth_threshold: usize,

    /// Nested higher-order wrapper calls allowed around one component.
    pub max_wrapper_depth: usize,

    /// Generic component types whose first type argument is the props type.
    pub component_wrapper_types: Vec<String>,

    /// Higher-order functions whose first argument is the wrapped component.
    pub higher_order_wrappers: Vec<String>,

    /// Type names that are never expanded. A leading or trailing `*` matches
    /// a suffix or prefix.
    pub skipped_type_patterns: Vec<String>,

    /// Namespaces treated as framework types.
    pub framework_namespaces: Vec<String>,

    /// Call names that define style variants (`cva`, `tv`).
    pub variant_factories: Vec<String>,

    /// Suffixes of style files read alongside a component file.
    pub style_file_suffixes: Vec<String>,

    /// Identifier written into every descriptor's extensions.
    pub adaptor_id: String,

    /// Keep hint-level diagnostics.
    pub verbose: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_barrel_depth: 10,
            max_type_depth: 10,
            framework_depth_threshold: 2,
            max_wrapper_depth: 3,
            component_wrapper_types: strings(&[
                "FC",
                "FunctionComponent",
                "VFC",
                "VoidFunctionComponent",
                "ComponentType",
            ]),
            higher_order_wrappers: strings(&["forwardRef", "memo", "observer"]),
            skipped_type_patterns: strings(&[
                "*HTMLAttributes",
                "*SVGAttributes",
                "SVGProps",
                "DOMAttributes",
                "AriaAttributes",
                "HTMLProps",
                "DetailedHTMLProps",
                "ComponentProps*",
            ]),
            framework_namespaces: strings(&["React", "JSX"]),
            variant_factories: strings(&["cva", "tv"]),
            style_file_suffixes: strings(&[".module.css", ".css"]),
            adaptor_id: "react-tsx".to_string(),
            verbose: false,
        }
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

impl ExtractorConfig {
    /// Loads configuration from a JSON file.
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Invalid {
            path: path.to_owned(),
            source,
        })
    }

    /// Loads configuration from a JSON file, falling back to defaults when
    /// the file is missing or invalid.
    pub fn load_or_default(path: &Utf8Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(%path, error = %err, "using default extractor config");
                Self::default()
            }
        }
    }

    /// Returns true if `name` (optionally namespace-qualified, e.g.
    /// `React.FC`) is a generic component type.
    pub fn is_component_wrapper_type(&self, name: &str) -> bool {
        let base = last_segment(name);
        self.component_wrapper_types.iter().any(|known| known == base)
    }

    /// Returns true if a call to `callee` wraps a component.
    ///
    /// `withXxx` higher-order components are always recognized.
    pub fn is_higher_order_wrapper(&self, callee: &str) -> bool {
        let base = last_segment(callee);
        if self.higher_order_wrappers.iter().any(|known| known == base) {
            return true;
        }
        base.strip_prefix("with")
            .and_then(|rest| rest.chars().next())
            .is_some_and(|c| c.is_ascii_uppercase())
    }

    /// Returns true if a type written as `type_text` must not be expanded.
    pub fn is_skipped_type(&self, type_text: &str) -> bool {
        let base = last_segment(type_head(type_text));
        if base.is_empty() {
            return false;
        }
        self.skipped_type_patterns
            .iter()
            .any(|pattern| matches_pattern(pattern, base))
    }

    /// Returns true if `type_text` names a type in a framework namespace.
    pub fn is_framework_type(&self, type_text: &str) -> bool {
        let head = type_head(type_text);
        let Some((namespace, _)) = head.split_once('.') else {
            return false;
        };
        self.framework_namespaces.iter().any(|ns| ns == namespace)
    }

    /// Returns true if `callee` defines style variants.
    pub fn is_variant_factory(&self, callee: &str) -> bool {
        let base = last_segment(callee);
        self.variant_factories.iter().any(|factory| factory == base)
    }
}

/// The referenced name of a type, without type arguments:
/// `React.FC<Props>` gives `React.FC`.
fn type_head(type_text: &str) -> &str {
    let text = type_text.trim();
    let end = text
        .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '$' || c == '.'))
        .unwrap_or(text.len());
    &text[..end]
}

fn last_segment(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

fn matches_pattern(pattern: &str, name: &str) -> bool {
    if let Some(suffix) = pattern.strip_prefix('*') {
        name.ends_with(suffix)
    } else if let Some(prefix) = pattern.strip_suffix('*') {
        name.starts_with(prefix)
    } else {
        pattern == name
    }
}
