//! Source loading.
//!
//! Extraction never touches the file system directly: barrel targets,
//! imported type declarations and style files are all read through a
//! [`SourceLoader`], so runs can be driven from memory in tests.

use camino::{Utf8Path, Utf8PathBuf};
use rustc_hash::FxHashMap;
use std::io;

/// Reads source files by path.
pub trait SourceLoader: Send + Sync {
    /// Reads a file's text.
    fn read(&self, path: &Utf8Path) -> io::Result<String>;

    /// Returns true if the file exists.
    fn exists(&self, path: &Utf8Path) -> bool;
}

/// Loads files from disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsLoader;

impl SourceLoader for FsLoader {
    fn read(&self, path: &Utf8Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn exists(&self, path: &Utf8Path) -> bool {
        path.is_file()
    }
}

/// Serves files from an in-memory map.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    files: FxHashMap<Utf8PathBuf, String>,
}

impl MemoryLoader {
    /// Creates an empty loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file.
    pub fn with_file(mut self, path: impl Into<Utf8PathBuf>, text: impl Into<String>) -> Self {
        self.insert(path, text);
        self
    }

    /// Adds or replaces a file.
    pub fn insert(&mut self, path: impl Into<Utf8PathBuf>, text: impl Into<String>) {
        self.files.insert(normalize_path(&path.into()), text.into());
    }
}

impl SourceLoader for MemoryLoader {
    fn read(&self, path: &Utf8Path) -> io::Result<String> {
        self.files
            .get(&normalize_path(path))
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("{path} not found")))
    }

    fn exists(&self, path: &Utf8Path) -> bool {
        self.files.contains_key(&normalize_path(path))
    }
}

/// Removes `.` and `..` components without touching the file system.
pub fn normalize_path(path: &Utf8Path) -> Utf8PathBuf {
    use camino::Utf8Component;

    let mut out = Utf8PathBuf::new();
    for component in path.components() {
        match component {
            Utf8Component::CurDir => {}
            Utf8Component::ParentDir => {
                let popped = matches!(
                    out.components().next_back(),
                    Some(Utf8Component::Normal(_))
                ) && out.pop();
                if !popped && !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalizes_relative_components() {
        assert_eq!(
            normalize_path(Utf8Path::new("src/components/../ui/./button.tsx")),
            Utf8PathBuf::from("src/ui/button.tsx")
        );
        assert_eq!(
            normalize_path(Utf8Path::new("../shared/a.ts")),
            Utf8PathBuf::from("../shared/a.ts")
        );
        assert_eq!(
            normalize_path(Utf8Path::new("/repo/src/../lib/a.ts")),
            Utf8PathBuf::from("/repo/lib/a.ts")
        );
    }

    #[test]
    fn test_memory_loader_matches_normalized_paths() {
        let loader = MemoryLoader::new().with_file("src/ui/button.tsx", "export {}");
        assert!(loader.exists(Utf8Path::new("src/components/../ui/button.tsx")));
        assert_eq!(
            loader.read(Utf8Path::new("./src/ui/button.tsx")).unwrap(),
            "export {}"
        );
        assert_eq!(
            loader.read(Utf8Path::new("src/missing.tsx")).unwrap_err().kind(),
            io::ErrorKind::NotFound
        );
    }

    #[test]
    fn test_fs_loader_reads_disk() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8Path::from_path(dir.path()).unwrap();
        let path = root.join("Badge.tsx");
        std::fs::write(&path, "export const Badge = () => null;").unwrap();

        assert!(FsLoader.exists(&path));
        assert!(!FsLoader.exists(&root.join("Missing.tsx")));
        assert!(FsLoader.read(&path).unwrap().contains("Badge"));
    }
}
