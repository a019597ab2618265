//! Batch processing of solver case directories.
//!
//! Discovers the solver files of a case, parses them concurrently and merges
//! the results into a [`CaseBundle`], or tabulates one [`CaseSummary`] row
//! per angle of attack.

pub mod bundle;
pub mod discovery;

#[cfg(test)]
mod tests;

pub use bundle::{BundleMetadata, CaseBundle};
pub use discovery::{DiscoveredFile, FileDiscovery};

use crate::config::{LevelPolicy, VfpConfig};
use crate::error::{Result, VfpError};
use crate::models::{FileFailure, FileKind, ParsedFile, ProcessingStats};
use crate::report::summary::{CaseSummary, SUMMARY_LEVEL, aoa_from_file_name, summarize};
use crate::report::{WaveDrag, cp, forces, vis};
use crate::{flow, geo, map};

use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::task;
use tracing::{debug, error, info};

/// Parse one file with the codec for its kind
pub fn parse_path(path: &Path, kind: FileKind, config: &VfpConfig) -> Result<ParsedFile> {
    let parsed = match kind {
        FileKind::Geo => ParsedFile::Geo(geo::read(path)?),
        FileKind::Map => ParsedFile::Map(map::read(path)?),
        FileKind::Flow => ParsedFile::Flow(flow::read(path, &config.flow)?),
        FileKind::Forces => ParsedFile::Forces(forces::read(path, &config.reports)?),
        FileKind::Cp => ParsedFile::Cp(cp::read(path, &config.reports)?),
        FileKind::Vis => ParsedFile::Vis(vis::read(path, &config.reports)?),
        FileKind::WaveDrag => ParsedFile::WaveDrag(WaveDrag::read(path)?),
    };
    Ok(parsed)
}

/// Parse a file whose kind is detected from its name
pub fn parse_detected(path: &Path, config: &VfpConfig) -> Result<ParsedFile> {
    let kind = FileKind::from_path(path).ok_or_else(|| VfpError::UnknownFormat {
        path: path.to_path_buf(),
    })?;
    parse_path(path, kind, config)
}

/// Processor for one solver case directory
#[derive(Debug)]
pub struct CaseProcessor {
    case_dir: PathBuf,
    config: VfpConfig,
    pattern: Option<String>,
    show_progress: bool,
}

impl CaseProcessor {
    pub fn new(case_dir: PathBuf) -> Self {
        Self {
            case_dir,
            config: VfpConfig::default(),
            pattern: None,
            show_progress: false,
        }
    }

    /// Configure the processor
    pub fn with_config(mut self, config: VfpConfig) -> Self {
        self.config = config;
        self
    }

    /// Only process files whose name matches a glob pattern
    pub fn with_pattern(mut self, pattern: Option<String>) -> Self {
        self.pattern = pattern;
        self
    }

    /// Show a progress bar on stderr while parsing
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Parse every solver file of the case and merge them into one bundle
    pub async fn process(&self) -> Result<(CaseBundle, ProcessingStats)> {
        let start_time = Instant::now();
        let files = self.discover()?;
        info!(
            "Found {} solver files in {}",
            files.len(),
            self.case_dir.display()
        );

        let mut stats = ProcessingStats {
            files_discovered: files.len(),
            ..Default::default()
        };
        let mut bundle = CaseBundle::new();

        for (file, result) in self.parse_all(files, &self.config).await {
            match result {
                Ok(parsed) => {
                    stats.files_parsed += 1;
                    if !bundle.insert(&file.path, parsed) {
                        stats.files_skipped += 1;
                    }
                }
                Err(e) => record_failure(&mut stats, file.path, e),
            }
        }

        stats.processing_time_ms = start_time.elapsed().as_millis();
        Ok((bundle, stats))
    }

    /// One row per angle of attack, pairing each forces report with the
    /// wave drag file of the same angle
    pub async fn summarize(&self) -> Result<(Vec<CaseSummary>, ProcessingStats)> {
        let start_time = Instant::now();
        let files: Vec<DiscoveredFile> = self
            .discover()?
            .into_iter()
            .filter(|f| matches!(f.kind, FileKind::Forces | FileKind::WaveDrag))
            .collect();

        let mut stats = ProcessingStats {
            files_discovered: files.len(),
            ..Default::default()
        };

        let config = self
            .config
            .clone()
            .with_level_policy(LevelPolicy::Only(SUMMARY_LEVEL));

        // Keyed by angle in ten-thousandths so equal angles compare equal
        let mut cases: BTreeMap<Option<i64>, Vec<CaseSummary>> = BTreeMap::new();
        let mut wave_drags: BTreeMap<Option<i64>, (String, WaveDrag)> = BTreeMap::new();

        for (file, result) in self.parse_all(files, &config).await {
            let name = file.file_name();
            let aoa = aoa_from_file_name(&name);
            let key = aoa.map(|a| (a * 1e4).round() as i64);

            match result {
                Ok(ParsedFile::Forces(report)) => {
                    stats.files_parsed += 1;
                    let stem = file
                        .path
                        .file_stem()
                        .map(|s| s.to_string_lossy().to_string())
                        .unwrap_or(name);
                    cases.entry(key).or_default().push(CaseSummary {
                        name: stem,
                        aoa,
                        forces: summarize(&report),
                        wave_drag: None,
                    });
                }
                Ok(ParsedFile::WaveDrag(drag)) => {
                    stats.files_parsed += 1;
                    if wave_drags.contains_key(&key) {
                        stats.files_skipped += 1;
                        debug!("Second wave drag file for the same angle: {name}");
                    } else {
                        wave_drags.insert(key, (name, drag));
                    }
                }
                Ok(_) => {}
                Err(e) => record_failure(&mut stats, file.path, e),
            }
        }

        let mut rows = Vec::new();
        for (key, (name, drag)) in wave_drags {
            // Files without an angle in their name are never paired
            if key.is_some() && cases.contains_key(&key) {
                for entry in cases.get_mut(&key).into_iter().flatten() {
                    entry.wave_drag = Some(drag.clone());
                }
            } else {
                cases.entry(key).or_default().push(CaseSummary {
                    name,
                    aoa: key.map(|k| k as f64 / 1e4),
                    forces: None,
                    wave_drag: Some(drag),
                });
            }
        }
        for entries in cases.into_values() {
            rows.extend(entries);
        }
        // Unnamed angles sort first in the map; list them last
        rows.sort_by_key(|row| row.aoa.is_none());

        stats.processing_time_ms = start_time.elapsed().as_millis();
        Ok((rows, stats))
    }

    fn discover(&self) -> Result<Vec<DiscoveredFile>> {
        let mut discovery = FileDiscovery::new(self.case_dir.clone());
        if let Some(pattern) = &self.pattern {
            discovery = discovery.with_pattern(pattern)?;
        }
        discovery.discover()
    }

    /// Parse files concurrently; results come back in discovery order
    async fn parse_all(
        &self,
        files: Vec<DiscoveredFile>,
        config: &VfpConfig,
    ) -> Vec<(DiscoveredFile, Result<ParsedFile>)> {
        if files.is_empty() {
            return Vec::new();
        }

        let pb = self.progress_bar(files.len() as u64);
        let concurrent_limit = config.max_concurrent_files.clamp(1, files.len());
        debug!("Parsing {} files, {} at a time", files.len(), concurrent_limit);

        let mut results: Vec<(usize, DiscoveredFile, Result<ParsedFile>)> =
            stream::iter(files.into_iter().enumerate())
                .map(|(index, file)| {
                    let config = config.clone();
                    let pb = pb.clone();
                    async move {
                        pb.set_message(format!("Parsing: {}", file.file_name()));

                        let path = file.path.clone();
                        let kind = file.kind;
                        let result = task::spawn_blocking(move || parse_path(&path, kind, &config))
                            .await
                            .unwrap_or_else(|e| {
                                Err(VfpError::from(std::io::Error::other(e)).in_file(&file.path))
                            });

                        pb.inc(1);
                        (index, file, result)
                    }
                })
                .buffer_unordered(concurrent_limit)
                .collect()
                .await;

        pb.finish_and_clear();
        results.sort_by_key(|(index, _, _)| *index);
        results
            .into_iter()
            .map(|(_, file, result)| (file, result))
            .collect()
    }

    fn progress_bar(&self, len: u64) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(len);
        match ProgressStyle::default_bar().template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}",
        ) {
            Ok(style) => pb.set_style(style.progress_chars("#>-")),
            Err(e) => debug!("Falling back to the default progress style: {e}"),
        }
        pb
    }
}

fn record_failure(stats: &mut ProcessingStats, path: PathBuf, error: VfpError) {
    error!("Failed to parse {}: {:#}", path.display(), error);
    stats.files_failed += 1;
    stats.failures.push(FileFailure {
        path,
        reason: error.to_string(),
    });
}
