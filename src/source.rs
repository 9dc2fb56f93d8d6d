//! Where the ticket export comes from.

use std::path::{Path, PathBuf};

use log::debug;
use walkdir::WalkDir;

use crate::error::{InsightsError, Result};
use crate::table::SUPPORTED_EXTENSIONS;

pub trait TicketSource {
    /// Path of the ticket file to analyze.
    fn locate(&self) -> Result<PathBuf>;
}

/// A file named by the caller.
#[derive(Debug, Clone)]
pub struct ExplicitPath(pub PathBuf);

impl TicketSource for ExplicitPath {
    fn locate(&self) -> Result<PathBuf> {
        if self.0.is_file() {
            Ok(self.0.clone())
        } else {
            Err(InsightsError::NoTicketFile {
                searched: self.0.display().to_string(),
            })
        }
    }
}

/// Looks for an export by file-name prefix below `root`.
///
/// Prefixes are tried in order; for the first one with matches the
/// lexicographically last file name wins, which for dated export names is
/// the newest one.
#[derive(Debug, Clone)]
pub struct DirectorySearch {
    pub root: PathBuf,
    pub prefixes: Vec<String>,
    pub max_depth: usize,
}

impl DirectorySearch {
    pub fn new(root: impl Into<PathBuf>, prefixes: Vec<String>, max_depth: usize) -> Self {
        DirectorySearch {
            root: root.into(),
            prefixes,
            max_depth,
        }
    }

    fn candidates(&self) -> Vec<PathBuf> {
        WalkDir::new(&self.root)
            .max_depth(self.max_depth)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|p| has_supported_extension(p))
            .collect()
    }
}

fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| SUPPORTED_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn file_name_lower(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

impl TicketSource for DirectorySearch {
    fn locate(&self) -> Result<PathBuf> {
        let candidates = self.candidates();
        debug!(
            "{} candidate files under {}",
            candidates.len(),
            self.root.display()
        );
        for prefix in &self.prefixes {
            let prefix = prefix.to_lowercase();
            let newest = candidates
                .iter()
                .filter(|p| file_name_lower(p).starts_with(&prefix))
                .max_by_key(|p| p.file_name().map(|n| n.to_os_string()));
            if let Some(found) = newest {
                return Ok(found.clone());
            }
        }
        Err(InsightsError::NoTicketFile {
            searched: format!(
                "{} (prefixes: {})",
                self.root.display(),
                self.prefixes.join(", ")
            ),
        })
    }
}
