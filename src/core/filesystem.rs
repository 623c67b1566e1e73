//! Directory listing used by path completion.
//!
//! [`LocalFs`] reads the host filesystem. [`VirtualFs`] is an in-memory
//! directory map for hosts that expose a synthetic tree.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

/// Read-only directory listing.
pub trait FileSystem {
    /// Entry names directly inside `dir`, sorted.
    fn list_dir(&self, dir: &Path) -> io::Result<Vec<String>>;
}

/// The host filesystem.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalFs;

impl FileSystem for LocalFs {
    fn list_dir(&self, dir: &Path) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            names.push(entry?.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }
}

/// In-memory directory tree.
///
/// Directories are created implicitly by the files placed under them.
#[derive(Clone, Debug, Default)]
pub struct VirtualFs {
    dirs: BTreeMap<PathBuf, Vec<String>>,
}

impl VirtualFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the entry at `path`, creating its parent directories.
    pub fn with_entry(mut self, path: impl AsRef<Path>) -> Self {
        self.insert(path.as_ref());
        self
    }

    pub fn insert(&mut self, path: &Path) {
        let mut current = path;
        while let (Some(parent), Some(name)) = (current.parent(), current.file_name()) {
            let entries = self.dirs.entry(parent.to_path_buf()).or_default();
            let name = name.to_string_lossy().into_owned();
            if let Err(pos) = entries.binary_search(&name) {
                entries.insert(pos, name);
            }
            current = parent;
        }
    }
}

impl FileSystem for VirtualFs {
    fn list_dir(&self, dir: &Path) -> io::Result<Vec<String>> {
        self.dirs.get(dir).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such directory: {}", dir.display()),
            )
        })
    }
}
