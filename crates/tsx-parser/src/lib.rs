//! TSX/TypeScript parsing for component extraction.
//!
//! This crate wraps `swc_ecma_parser` and provides:
//! - [`parse`]: one file's text to a [`ParsedFile`]
//! - [`ModuleIndex`]: the file's top-level declarations, imports and exports
//! - text, signature, position and doc-comment lookups by swc span
//!
//! # Example
//!
//! ```
//! use camino::Utf8Path;
//! use tsx_parser::{parse, ValueDecl};
//!
//! let file = parse(
//!     Utf8Path::new("Button.tsx"),
//!     "export function Button() { return <button />; }",
//! )
//! .unwrap();
//! assert!(matches!(file.value_decl("Button"), Some(ValueDecl::Function(_))));
//! ```

mod comments;
mod error;
mod line_index;
mod module_index;
mod parsed;

pub use comments::{leading_doc, DocComment};
pub use error::{ParseError, ParseErrorKind};
pub use line_index::{LineCol, LineIndex};
pub use module_index::{
    ExportBinding, ImportBinding, ImportedName, ModuleIndex, TypeSite, ValueKind, ValueSite,
};
pub use parsed::{
    item_decl, normalize_whitespace, parse, ParsedFile, SourceKind, TypeDecl, ValueDecl,
};
