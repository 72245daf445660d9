//! Multi-file extraction runs.

use crate::adaptor::{extract_components, FileExtraction};
use crate::error::ExtractError;
use crate::merge::collapse_reexports;
use crate::session::{CacheStats, ResolutionSession};
use camino::Utf8PathBuf;
use component_registry::{ComponentDescriptor, Diagnostic, Registry, Severity};
use rayon::prelude::*;
use std::time::Instant;

/// The outcome of extracting a set of files.
#[derive(Debug, Clone, Default)]
pub struct RegistryRun {
    /// Components of every file, in input order.
    pub components: Vec<ComponentDescriptor>,
    /// Diagnostics of every file, in input order. Hints are kept only in
    /// verbose runs.
    pub diagnostics: Vec<Diagnostic>,
    /// Cache counters at the end of the run.
    pub stats: CacheStats,
}

impl RegistryRun {
    /// The serializable registry document.
    ///
    /// Diagnostics are attached only in verbose runs.
    pub fn registry(&self, verbose: bool) -> Registry {
        let registry = Registry::new(&self.components);
        if verbose {
            registry.with_diagnostics(&self.diagnostics)
        } else {
            registry
        }
    }

    /// Returns true if any file produced an error diagnostic.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diag| diag.severity == Severity::Error)
    }
}

/// Extracts every file in `files` in parallel.
///
/// Files are read through the session's loader. Each file is deduplicated
/// on its own; afterwards re-exports of declarations already present are
/// collapsed across files. A file that cannot be read or parsed contributes
/// only a diagnostic.
pub fn extract_registry(files: &[Utf8PathBuf], session: &ResolutionSession) -> RegistryRun {
    let start = Instant::now();
    let extractions: Vec<FileExtraction> = files
        .par_iter()
        .map(|path| match session.loader().read(path) {
            Ok(source) => extract_components(path, &source, session),
            Err(source) => FileExtraction::failed(
                path,
                &ExtractError::Read {
                    path: path.clone(),
                    source,
                },
            ),
        })
        .collect();

    let verbose = session.config().verbose;
    let mut components = Vec::new();
    let mut diagnostics = Vec::new();
    for extraction in extractions {
        components.extend(extraction.components);
        diagnostics.extend(
            extraction
                .diagnostics
                .into_iter()
                .filter(|diag| verbose || diag.severity > Severity::Hint),
        );
    }
    let components = collapse_reexports(components);

    let stats = session.stats();
    tracing::debug!(
        files = files.len(),
        components = components.len(),
        diagnostics = diagnostics.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        ?stats,
        hit_rate = stats.hit_rate(),
        "extraction run finished"
    );
    RegistryRun {
        components,
        diagnostics,
        stats,
    }
}
