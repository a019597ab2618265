//! File discovery for solver case directories
//!
//! Walks a case directory and keeps every file whose kind can be detected,
//! optionally narrowed by a glob pattern on the file name.

use crate::error::{Result, VfpError};
use crate::models::FileKind;
use glob::Pattern;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// A solver file found on disk
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveredFile {
    pub path: PathBuf,
    pub kind: FileKind,
}

impl DiscoveredFile {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

/// File discovery component for case directories
#[derive(Debug)]
pub struct FileDiscovery {
    case_path: PathBuf,
    pattern: Option<Pattern>,
    max_depth: usize,
}

impl FileDiscovery {
    pub fn new(case_path: PathBuf) -> Self {
        Self {
            case_path,
            pattern: None,
            max_depth: usize::MAX,
        }
    }

    /// Only keep files whose name matches a glob pattern such as `*M085*`
    pub fn with_pattern(mut self, pattern: &str) -> Result<Self> {
        let pattern = Pattern::new(pattern).map_err(|e| VfpError::Configuration {
            message: format!("invalid file pattern '{pattern}': {e}"),
        })?;
        self.pattern = Some(pattern);
        Ok(self)
    }

    /// Limit how deep below the case directory to look
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Discover solver files, sorted by path so runs are repeatable
    pub fn discover(&self) -> Result<Vec<DiscoveredFile>> {
        if !self.case_path.is_dir() {
            return Err(VfpError::DirectoryNotFound {
                path: self.case_path.clone(),
            });
        }

        debug!("Searching for solver files in: {}", self.case_path.display());

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.case_path)
            .max_depth(self.max_depth)
            .sort_by_file_name()
        {
            let entry = entry.map_err(std::io::Error::from)?;
            if !entry.file_type().is_file() || !self.name_matches(entry.path()) {
                continue;
            }
            match FileKind::from_path(entry.path()) {
                Some(kind) => files.push(DiscoveredFile {
                    path: entry.into_path(),
                    kind,
                }),
                None => debug!("Ignoring {}", entry.path().display()),
            }
        }

        debug!("Found {} solver files", files.len());
        Ok(files)
    }

    fn name_matches(&self, path: &Path) -> bool {
        let Some(pattern) = &self.pattern else {
            return true;
        };
        path.file_name()
            .is_some_and(|name| pattern.matches(&name.to_string_lossy()))
    }
}
