//! Component registry model for the extraction pipeline.
//!
//! This crate defines what the pipeline produces and what downstream
//! consumers read:
//! - [`ComponentDescriptor`] and [`PropertyDescriptor`], the registry entries
//! - [`TokenUsage`], design tokens grouped by category
//! - [`Diagnostic`], per-file problems that shrink the registry
//! - [`Registry`], the serialized document
//!
//! # Example
//!
//! ```
//! use component_registry::{PropertyDescriptor, PropertySource};
//!
//! let prop = PropertyDescriptor::new("label", "string", PropertySource::ResolvedType)
//!     .with_description("Visible text");
//! assert!(prop.required);
//! ```

mod descriptor;
mod diagnostic;
mod output;
mod tokens;

pub use descriptor::{
    ComponentDescriptor, Composition, DeclarationKind, Extensions, PropertyDescriptor,
    PropertySource, VariantMap,
};
pub use diagnostic::{Diagnostic, DiagnosticCode, Position, Severity};
pub use output::{
    FormattedDiagnostic, Registry, RegistryComponent, RegistryComposition, RegistryExtensions,
    RegistryProp,
};
pub use tokens::{TokenCategory, TokenUsage};
