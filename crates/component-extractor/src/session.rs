//! Shared state of one extraction run.
//!
//! A [`ResolutionSession`] owns everything that outlives a single file:
//! parsed files, the three resolution caches and their counters. It is
//! shared by reference across the worker threads of a run and dropped when
//! the run ends, so nothing leaks between runs.

use crate::config::ExtractorConfig;
use crate::error::ExtractError;
use crate::loader::{normalize_path, SourceLoader};
use camino::{Utf8Path, Utf8PathBuf};
use component_registry::PropertyDescriptor;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;
use smol_str::SmolStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tsx_parser::{parse, ParsedFile};

/// An immutable, shareable property list.
pub type PropList = Arc<[PropertyDescriptor]>;

/// Extensions tried, in order, when a specifier has none.
const MODULE_EXTENSIONS: [&str; 4] = ["tsx", "ts", "jsx", "js"];

/// Maximum length of the declaration text in a symbol cache key.
const SYMBOL_KEY_LEN: usize = 120;

/// Type and intersection cache key: the declaration depth of the query and
/// the file-qualified signature. A result cut short by the depth limit
/// differs between depths, so the depth is part of the key.
pub(crate) type CacheKey = (usize, String);

/// Symbol cache key: depth, declaration name and the file-qualified,
/// truncated declaration text.
pub(crate) type SymbolKey = (usize, SmolStr, String);

/// Resolution state shared by every file of a run.
pub struct ResolutionSession {
    config: ExtractorConfig,
    loader: Arc<dyn SourceLoader>,
    extracted_at: String,
    files: Mutex<FxHashMap<Utf8PathBuf, Option<Arc<ParsedFile>>>>,
    type_cache: Mutex<FxHashMap<CacheKey, PropList>>,
    symbol_cache: Mutex<FxHashMap<SymbolKey, PropList>>,
    intersection_cache: Mutex<FxHashMap<CacheKey, PropList>>,
    skipped: Mutex<FxHashSet<String>>,
    counters: Counters,
}

#[derive(Debug, Default)]
struct Counters {
    queries: AtomicUsize,
    type_hits: AtomicUsize,
    symbol_hits: AtomicUsize,
    intersection_hits: AtomicUsize,
    skips: AtomicUsize,
}

/// A snapshot of the resolution counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    /// Type resolution queries.
    pub queries: usize,
    /// Hits in the signature-keyed type cache.
    pub type_hits: usize,
    /// Hits in the declaration-keyed symbol cache.
    pub symbol_hits: usize,
    /// Hits in the intersection cache.
    pub intersection_hits: usize,
    /// Types left unexpanded by the fast-skip list.
    pub skips: usize,
}

impl CacheStats {
    /// Total cache hits.
    pub fn hits(&self) -> usize {
        self.type_hits + self.symbol_hits + self.intersection_hits
    }

    /// Hits per query, `0.0` when nothing was queried.
    pub fn hit_rate(&self) -> f64 {
        if self.queries == 0 {
            0.0
        } else {
            self.hits() as f64 / self.queries as f64
        }
    }
}

/// Which cache a lookup goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CacheTable {
    Type,
    Intersection,
}

impl ResolutionSession {
    /// Creates a session stamped with the current time.
    pub fn new(config: ExtractorConfig, loader: Arc<dyn SourceLoader>) -> Self {
        Self {
            config,
            loader,
            extracted_at: chrono::Utc::now().to_rfc3339(),
            files: Mutex::default(),
            type_cache: Mutex::default(),
            symbol_cache: Mutex::default(),
            intersection_cache: Mutex::default(),
            skipped: Mutex::default(),
            counters: Counters::default(),
        }
    }

    /// Overrides the run timestamp.
    pub fn with_extracted_at(mut self, extracted_at: impl Into<String>) -> Self {
        self.extracted_at = extracted_at.into();
        self
    }

    /// The run configuration.
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// The source loader.
    pub fn loader(&self) -> &dyn SourceLoader {
        self.loader.as_ref()
    }

    /// The RFC 3339 timestamp written into every descriptor.
    pub fn extracted_at(&self) -> &str {
        &self.extracted_at
    }

    /// Parses `source` as the file at `path` and caches it.
    ///
    /// If another thread already parsed the file, that copy is returned so
    /// every reader sees the same tree.
    pub fn parse_source(
        &self,
        path: &Utf8Path,
        source: &str,
    ) -> Result<Arc<ParsedFile>, ExtractError> {
        let path = normalize_path(path);
        if let Some(Some(file)) = locked(&self.files).get(&path) {
            return Ok(Arc::clone(file));
        }
        let parsed = parse(&path, source).map_err(|source| ExtractError::Parse {
            path: path.clone(),
            source,
        })?;
        let mut files = locked(&self.files);
        let slot = files.entry(path).or_insert(None);
        Ok(Arc::clone(slot.get_or_insert_with(|| Arc::new(parsed))))
    }

    /// Loads and parses a file through the loader.
    ///
    /// Unreadable and unparseable files are remembered and yield `None`.
    pub fn load(&self, path: &Utf8Path) -> Option<Arc<ParsedFile>> {
        let path = normalize_path(path);
        if let Some(cached) = locked(&self.files).get(&path) {
            return cached.clone();
        }
        let parsed = match self.loader.read(&path) {
            Ok(text) => match parse(&path, &text) {
                Ok(file) => Some(Arc::new(file)),
                Err(err) => {
                    tracing::debug!(%path, error = %err, "dependency failed to parse");
                    None
                }
            },
            Err(err) => {
                tracing::debug!(%path, error = %err, "dependency could not be read");
                None
            }
        };
        locked(&self.files).entry(path).or_insert(parsed).clone()
    }

    /// Resolves a relative module specifier against the importing file.
    ///
    /// Tries the path as written, then each source extension, then an
    /// `index` file in the directory. A `.js`/`.jsx` specifier also matches
    /// its TypeScript sibling. Bare specifiers resolve to `None`.
    pub fn resolve_module(&self, from: &Utf8Path, specifier: &str) -> Option<Utf8PathBuf> {
        if !is_relative_specifier(specifier) {
            return None;
        }
        let dir = from.parent().unwrap_or(Utf8Path::new(""));
        let base = normalize_path(&dir.join(specifier));
        let loader = self.loader();

        if base.extension().is_some_and(|ext| MODULE_EXTENSIONS.contains(&ext))
            && loader.exists(&base)
        {
            return Some(base);
        }
        for ext in MODULE_EXTENSIONS {
            let candidate = Utf8PathBuf::from(format!("{base}.{ext}"));
            if loader.exists(&candidate) {
                return Some(candidate);
            }
        }
        if let Some(ext @ ("js" | "jsx")) = base.extension() {
            let ts_ext = if ext == "js" { "ts" } else { "tsx" };
            for candidate in [base.with_extension(ts_ext), base.with_extension("tsx")] {
                if loader.exists(&candidate) {
                    return Some(candidate);
                }
            }
        }
        MODULE_EXTENSIONS
            .iter()
            .map(|ext| base.join(format!("index.{ext}")))
            .find(|candidate| loader.exists(candidate))
    }

    pub(crate) fn record_query(&self) {
        self.counters.queries.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a fast-skipped type by its file-qualified signature. The
    /// first query of a signature counts as a skip, repeats as type cache
    /// hits.
    pub(crate) fn record_skip(&self, signature: String) {
        if locked(&self.skipped).insert(signature) {
            self.counters.skips.fetch_add(1, Ordering::Relaxed);
        } else {
            self.counters.type_hits.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn cached(&self, table: CacheTable, key: &CacheKey) -> Option<PropList> {
        let (cache, counter) = match table {
            CacheTable::Type => (&self.type_cache, &self.counters.type_hits),
            CacheTable::Intersection => {
                (&self.intersection_cache, &self.counters.intersection_hits)
            }
        };
        let hit = locked(cache).get(key).cloned();
        if hit.is_some() {
            counter.fetch_add(1, Ordering::Relaxed);
        }
        hit
    }

    /// Stores a result; an existing entry wins so concurrent writers agree.
    pub(crate) fn store(&self, table: CacheTable, key: CacheKey, props: PropList) -> PropList {
        let cache = match table {
            CacheTable::Type => &self.type_cache,
            CacheTable::Intersection => &self.intersection_cache,
        };
        Arc::clone(locked(cache).entry(key).or_insert(props))
    }

    pub(crate) fn cached_symbol(&self, key: &SymbolKey) -> Option<PropList> {
        let hit = locked(&self.symbol_cache).get(key).cloned();
        if hit.is_some() {
            self.counters.symbol_hits.fetch_add(1, Ordering::Relaxed);
        }
        hit
    }

    pub(crate) fn store_symbol(&self, key: SymbolKey, props: PropList) -> PropList {
        Arc::clone(locked(&self.symbol_cache).entry(key).or_insert(props))
    }

    /// A snapshot of the counters.
    pub fn stats(&self) -> CacheStats {
        let c = &self.counters;
        CacheStats {
            queries: c.queries.load(Ordering::Relaxed),
            type_hits: c.type_hits.load(Ordering::Relaxed),
            symbol_hits: c.symbol_hits.load(Ordering::Relaxed),
            intersection_hits: c.intersection_hits.load(Ordering::Relaxed),
            skips: c.skips.load(Ordering::Relaxed),
        }
    }
}

impl std::fmt::Debug for ResolutionSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolutionSession")
            .field("config", &self.config)
            .field("extracted_at", &self.extracted_at)
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

/// Qualifies a type signature with the file it is written in.
pub(crate) fn qualified(file: &Utf8Path, signature: &str) -> String {
    format!("{file}::{signature}")
}

/// Builds the type cache key of a signature queried at `depth`.
pub(crate) fn type_key(depth: usize, file: &Utf8Path, signature: &str) -> CacheKey {
    (depth, qualified(file, signature))
}

/// Builds the symbol cache key of a named declaration entered at `depth`.
///
/// Only the declaration text is truncated; the file path stays whole.
pub(crate) fn symbol_key(depth: usize, name: &str, file: &Utf8Path, signature: &str) -> SymbolKey {
    let mut end = signature.len().min(SYMBOL_KEY_LEN);
    while !signature.is_char_boundary(end) {
        end -= 1;
    }
    (depth, SmolStr::new(name), qualified(file, &signature[..end]))
}

/// Returns true for `./x` and `../x` specifiers.
pub fn is_relative_specifier(specifier: &str) -> bool {
    specifier.starts_with("./") || specifier.starts_with("../") || specifier == "." || specifier == ".."
}

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::MemoryLoader;
    use pretty_assertions::assert_eq;

    fn session(loader: MemoryLoader) -> ResolutionSession {
        ResolutionSession::new(ExtractorConfig::default(), Arc::new(loader))
    }

    #[test]
    fn test_resolves_extensions_in_order() {
        let session = session(
            MemoryLoader::new()
                .with_file("src/button.ts", "")
                .with_file("src/button.tsx", "")
                .with_file("src/card/index.tsx", "")
                .with_file("src/legacy.ts", ""),
        );
        let from = Utf8Path::new("src/index.ts");
        assert_eq!(
            session.resolve_module(from, "./button"),
            Some(Utf8PathBuf::from("src/button.tsx"))
        );
        assert_eq!(
            session.resolve_module(from, "./card"),
            Some(Utf8PathBuf::from("src/card/index.tsx"))
        );
        assert_eq!(
            session.resolve_module(from, "./legacy.js"),
            Some(Utf8PathBuf::from("src/legacy.ts"))
        );
        assert_eq!(session.resolve_module(from, "./missing"), None);
        assert_eq!(session.resolve_module(from, "react"), None);
    }

    #[test]
    fn test_load_caches_failures() {
        let session = session(MemoryLoader::new().with_file("src/bad.tsx", "const = ;"));
        assert!(session.load(Utf8Path::new("src/bad.tsx")).is_none());
        assert!(session.load(Utf8Path::new("src/missing.tsx")).is_none());
        assert!(session.load(Utf8Path::new("src/bad.tsx")).is_none());
    }

    #[test]
    fn test_parse_source_shares_parsed_file() {
        let session = session(MemoryLoader::new());
        let path = Utf8Path::new("src/Badge.tsx");
        let first = session.parse_source(path, "export const Badge = 1;").unwrap();
        let second = session.load(path).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_counters_track_hits() {
        let session = session(MemoryLoader::new());
        let props: PropList = Arc::from(vec![PropertyDescriptor::unknown("a")]);
        let key = type_key(0, Utf8Path::new("a.ts"), "Props");
        session.record_query();
        assert!(session.cached(CacheTable::Type, &key).is_none());
        session.store(CacheTable::Type, key.clone(), props);
        session.record_query();
        assert!(session.cached(CacheTable::Type, &key).is_some());
        assert!(session.cached(CacheTable::Type, &type_key(1, Utf8Path::new("a.ts"), "Props")).is_none());

        let stats = session.stats();
        assert_eq!(stats.queries, 2);
        assert_eq!(stats.type_hits, 1);
        assert_eq!(stats.hit_rate(), 0.5);
    }

    #[test]
    fn test_symbol_keys_are_truncated() {
        let long = "x".repeat(400);
        let (depth, name, key) = symbol_key(2, "Props", Utf8Path::new("a.ts"), &long);
        assert_eq!(depth, 2);
        assert_eq!(name, "Props");
        assert_eq!(key.len(), "a.ts::".len() + SYMBOL_KEY_LEN);
    }

    #[test]
    fn test_skips_count_once_per_signature() {
        let session = session(MemoryLoader::new());
        session.record_skip(qualified(Utf8Path::new("a.ts"), "HTMLAttributes<HTMLDivElement>"));
        session.record_skip(qualified(Utf8Path::new("a.ts"), "HTMLAttributes<HTMLDivElement>"));
        session.record_skip(qualified(Utf8Path::new("a.ts"), "SVGProps<SVGSVGElement>"));

        let stats = session.stats();
        assert_eq!(stats.skips, 2);
        assert_eq!(stats.type_hits, 1);
    }

    #[test]
    fn test_empty_stats_have_zero_hit_rate() {
        assert_eq!(CacheStats::default().hit_rate(), 0.0);
    }
}
