//! Merged view of one solver case directory

use crate::models::{FileKind, ParsedFile};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::warn;

/// Where a bundle's data came from
#[derive(Debug, Clone, Serialize)]
pub struct BundleMetadata {
    pub merged_at: DateTime<Utc>,

    /// File name each kind was read from
    pub source_files: BTreeMap<FileKind, String>,

    pub total_files: usize,
}

/// Every parsed file of a case, one per kind
#[derive(Debug, Clone, Serialize)]
pub struct CaseBundle {
    pub metadata: BundleMetadata,
    pub data: BTreeMap<FileKind, ParsedFile>,
}

impl Default for CaseBundle {
    fn default() -> Self {
        Self::new()
    }
}

impl CaseBundle {
    pub fn new() -> Self {
        Self {
            metadata: BundleMetadata {
                merged_at: Utc::now(),
                source_files: BTreeMap::new(),
                total_files: 0,
            },
            data: BTreeMap::new(),
        }
    }

    /// Add a parsed file. The first file of a kind wins; returns false when
    /// the file was skipped because its kind is already present.
    pub fn insert(&mut self, path: &Path, parsed: ParsedFile) -> bool {
        let kind = parsed.kind();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        if let Some(kept) = self.metadata.source_files.get(&kind) {
            warn!("Skipping {name}: {kind} data already read from {kept}");
            return false;
        }

        self.metadata.source_files.insert(kind, name);
        self.metadata.total_files += 1;
        self.data.insert(kind, parsed);
        true
    }

    pub fn get(&self, kind: FileKind) -> Option<&ParsedFile> {
        self.data.get(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Serialize with the metadata block first, pretty-printed
    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::WaveDrag;

    #[test]
    fn test_first_file_of_a_kind_wins() {
        let mut bundle = CaseBundle::new();
        let first = WaveDrag::parse(" Total wave drag for block is CDW(tot) = 0.001000\n");
        let second = WaveDrag::parse(" Total wave drag for block is CDW(tot) = 0.002000\n");

        assert!(bundle.insert(Path::new("run/wavedrgA"), ParsedFile::WaveDrag(first)));
        assert!(!bundle.insert(Path::new("run/wavedrgB"), ParsedFile::WaveDrag(second)));

        assert_eq!(bundle.metadata.total_files, 1);
        assert_eq!(
            bundle.metadata.source_files.get(&FileKind::WaveDrag).map(String::as_str),
            Some("wavedrgA")
        );
        match bundle.get(FileKind::WaveDrag) {
            Some(ParsedFile::WaveDrag(drag)) => {
                assert_eq!(drag.upper.as_ref().unwrap().text, "0.001000")
            }
            other => panic!("Expected wave drag data, got {other:?}"),
        }
    }

    #[test]
    fn test_bundle_json_is_keyed_by_kind() {
        let mut bundle = CaseBundle::new();
        bundle.insert(Path::new("w"), ParsedFile::WaveDrag(WaveDrag::default()));

        let json: serde_json::Value = serde_json::from_str(&bundle.to_json().unwrap()).unwrap();
        assert_eq!(json["metadata"]["total_files"], 1);
        assert_eq!(json["metadata"]["source_files"]["wavedrag"], "w");
        assert!(json["data"]["wavedrag"]["upper"].is_null());
        assert!(json["metadata"]["merged_at"].is_string());
    }
}
