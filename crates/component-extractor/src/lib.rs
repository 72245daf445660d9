//! Component registry extraction from TSX/TypeScript sources.
//!
//! The pipeline turns component files into [`ComponentDescriptor`]s:
//! - [`extract_components`] classifies one file's declarations and
//!   assembles a descriptor per component
//! - [`resolve_export`] follows re-export ("barrel") chains to the
//!   declaring file
//! - [`TypeEngine`] flattens props types into property lists, cached per
//!   [`ResolutionSession`]
//! - the token scanner reads utility classes, CSS custom properties and
//!   `cva`/`tv` variant definitions
//! - [`merge_properties`] and [`deduplicate_components`] combine the
//!   results
//!
//! [`extract_registry`] runs all of this over many files in parallel.
//!
//! # Example
//!
//! ```
//! use camino::Utf8PathBuf;
//! use component_extractor::{extract_registry, ExtractorConfig, MemoryLoader, ResolutionSession};
//! use std::sync::Arc;
//!
//! let loader = MemoryLoader::new().with_file(
//!     "src/button.tsx",
//!     "export function Button({ label }: { label: string }) { return <button>{label}</button>; }",
//! );
//! let session = ResolutionSession::new(ExtractorConfig::default(), Arc::new(loader));
//! let run = extract_registry(&[Utf8PathBuf::from("src/button.tsx")], &session);
//!
//! assert_eq!(run.components[0].name, "Button");
//! assert!(run.components[0].property("label").unwrap().required);
//! ```
//!
//! [`ComponentDescriptor`]: component_registry::ComponentDescriptor

mod adaptor;
mod barrel;
mod config;
mod error;
mod functions;
mod loader;
mod merge;
mod run;
mod session;
mod structural;
mod tokens;
mod types;

pub use adaptor::{extract_components, FileExtraction};
pub use barrel::{
    resolve_export, BarrelContext, DeclarationHandle, DeclarationTarget, ExportDescriptor,
    ExportNode,
};
pub use config::ExtractorConfig;
pub use error::{ConfigError, ExtractError};
pub use loader::{normalize_path, FsLoader, MemoryLoader, SourceLoader};
pub use merge::{collapse_reexports, deduplicate_components, merge_properties};
pub use run::{extract_registry, RegistryRun};
pub use session::{is_relative_specifier, CacheStats, PropList, ResolutionSession};
pub use tokens::{classify_token, scan_class_list, scan_css, scan_item, scan_module, TokenScan};
pub use types::{MemberResolution, TypeEngine, TypeHandle};
