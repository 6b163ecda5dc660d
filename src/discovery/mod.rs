//! Repository discovery
//!
//! Walks a root directory and collects every directory that directly
//! contains the repository marker (`.git` by default). Directories whose
//! name starts with `.` are pruned before descent, so nothing beneath them
//! is ever visited. Any traversal error aborts the whole enumeration.

use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::error::DiscoveryError;
use crate::work::WorkItem;

mod expand;

pub use expand::expand_path;

/// Finds repository directories under a root.
#[derive(Debug, Clone)]
pub struct RepoFinder {
    marker: String,
    follow_symlinks: bool,
}

impl RepoFinder {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            follow_symlinks: false,
        }
    }

    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Enumerate repositories under `root`, sorted by path with no duplicates.
    ///
    /// `root` should come from [`resolve_root`]; it is checked again here so
    /// the finder can be used on its own.
    pub fn find(&self, root: &Path) -> Result<Vec<WorkItem>, DiscoveryError> {
        check_root(root)?;

        let mut repos = BTreeSet::new();
        let walker = WalkDir::new(root)
            .follow_links(self.follow_symlinks)
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry.file_name()));

        for entry in walker {
            let entry = entry.map_err(|source| DiscoveryError::Traversal {
                path: source
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root.to_path_buf()),
                source,
            })?;

            if !self.qualifies(&entry)? {
                continue;
            }

            let path = if self.follow_symlinks {
                // Two links may lead to the same repository
                fs::canonicalize(entry.path()).map_err(|source| DiscoveryError::Root {
                    path: entry.path().to_path_buf(),
                    source,
                })?
            } else {
                entry.into_path()
            };

            tracing::trace!("found repository {}", path.display());
            repos.insert(path);
        }

        tracing::debug!("found {} repositories under {}", repos.len(), root.display());
        Ok(repos.into_iter().map(WorkItem::from).collect())
    }

    /// A directory qualifies when it is not hidden and holds the marker as a
    /// directory. Any error other than a missing marker is fatal.
    fn qualifies(&self, entry: &DirEntry) -> Result<bool, DiscoveryError> {
        // The root is walked even when hidden, but only listed when it is not
        if !entry.file_type().is_dir() || is_hidden(entry.file_name()) {
            return Ok(false);
        }

        let marker = entry.path().join(&self.marker);
        match fs::metadata(&marker) {
            Ok(meta) => Ok(meta.is_dir()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(DiscoveryError::Root {
                path: marker,
                source,
            }),
        }
    }
}

impl Default for RepoFinder {
    fn default() -> Self {
        Self::new(".git")
    }
}

/// Turn the operator-supplied root into an absolute, canonical directory.
///
/// `None` (or an empty string) means the home directory. `~` and
/// `$VAR`/`${VAR}` references are expanded first.
pub fn resolve_root(raw: Option<&str>) -> Result<PathBuf, DiscoveryError> {
    let root = match raw.map(str::trim).filter(|raw| !raw.is_empty()) {
        Some(raw) => PathBuf::from(expand_path(raw)),
        None => dirs::home_dir().ok_or(DiscoveryError::NoHomeDirectory)?,
    };

    let root = std::path::absolute(&root).map_err(|source| DiscoveryError::Root {
        path: root.clone(),
        source,
    })?;

    check_root(&root)?;

    fs::canonicalize(&root).map_err(|source| DiscoveryError::Root { path: root, source })
}

fn check_root(root: &Path) -> Result<(), DiscoveryError> {
    match fs::metadata(root) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(DiscoveryError::NotADirectory(root.to_path_buf())),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            Err(DiscoveryError::NotFound(root.to_path_buf()))
        }
        Err(source) => Err(DiscoveryError::Root {
            path: root.to_path_buf(),
            source,
        }),
    }
}

fn is_hidden(name: &OsStr) -> bool {
    // Byte-level so names that are not valid UTF-8 are still recognised
    let bytes = name.as_encoded_bytes();
    bytes.first() == Some(&b'.') && bytes != b"." && bytes != b".."
}
