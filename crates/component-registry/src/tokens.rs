//! Design-token usage maps.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The category a design token belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenCategory {
    /// Color utilities (`bg-primary`, `text-muted-foreground`, `border-input`).
    Color,
    /// Spacing utilities (`px-4`, `gap-2`, `space-y-1`).
    Spacing,
    /// Typography utilities (`text-sm`, `font-medium`, `leading-none`).
    Typography,
    /// Corner radius utilities (`rounded-md`).
    Radius,
    /// Elevation utilities (`shadow-sm`).
    Shadow,
    /// CSS custom properties (`--radius`, `var(--primary)`).
    CustomProperty,
}

/// Design tokens referenced by a component, grouped by category.
///
/// Sets are ordered so that serialized output is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenUsage {
    /// Color tokens.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub colors: BTreeSet<String>,
    /// Spacing tokens.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub spacing: BTreeSet<String>,
    /// Typography tokens.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub typography: BTreeSet<String>,
    /// Radius tokens.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub radii: BTreeSet<String>,
    /// Shadow tokens.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub shadows: BTreeSet<String>,
    /// CSS custom property names, including the leading `--`.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub custom_properties: BTreeSet<String>,
}

impl TokenUsage {
    /// Creates an empty usage map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one token.
    pub fn insert(&mut self, category: TokenCategory, token: impl Into<String>) {
        self.set_mut(category).insert(token.into());
    }

    /// Returns the tokens recorded for a category.
    pub fn get(&self, category: TokenCategory) -> &BTreeSet<String> {
        match category {
            TokenCategory::Color => &self.colors,
            TokenCategory::Spacing => &self.spacing,
            TokenCategory::Typography => &self.typography,
            TokenCategory::Radius => &self.radii,
            TokenCategory::Shadow => &self.shadows,
            TokenCategory::CustomProperty => &self.custom_properties,
        }
    }

    fn set_mut(&mut self, category: TokenCategory) -> &mut BTreeSet<String> {
        match category {
            TokenCategory::Color => &mut self.colors,
            TokenCategory::Spacing => &mut self.spacing,
            TokenCategory::Typography => &mut self.typography,
            TokenCategory::Radius => &mut self.radii,
            TokenCategory::Shadow => &mut self.shadows,
            TokenCategory::CustomProperty => &mut self.custom_properties,
        }
    }

    /// Adds every token of `other`.
    pub fn merge(&mut self, other: &TokenUsage) {
        self.colors.extend(other.colors.iter().cloned());
        self.spacing.extend(other.spacing.iter().cloned());
        self.typography.extend(other.typography.iter().cloned());
        self.radii.extend(other.radii.iter().cloned());
        self.shadows.extend(other.shadows.iter().cloned());
        self.custom_properties
            .extend(other.custom_properties.iter().cloned());
    }

    /// Returns true if no token was recorded.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
            && self.spacing.is_empty()
            && self.typography.is_empty()
            && self.radii.is_empty()
            && self.shadows.is_empty()
            && self.custom_properties.is_empty()
    }
}
