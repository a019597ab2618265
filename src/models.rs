//! Shared types for batch processing of solver case directories.
//!
//! Defines the kinds of files a VFP case produces, the parsed form of each,
//! and the statistics a batch run reports.

use crate::constants::{WAVEDRAG_PREFIX, extensions};
use crate::flow::FlowConditionFile;
use crate::geo::GeometryFile;
use crate::map::MapFile;
use crate::report::{CpReport, ForcesReport, VisReport, WaveDrag};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// File kinds a solver case directory holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Geo,
    Map,
    Flow,
    Forces,
    Cp,
    Vis,
    WaveDrag,
}

impl FileKind {
    pub const ALL: [FileKind; 7] = [
        FileKind::Geo,
        FileKind::Map,
        FileKind::Flow,
        FileKind::Forces,
        FileKind::Cp,
        FileKind::Vis,
        FileKind::WaveDrag,
    ];

    /// Detect the kind from the file name: the wave drag prefix first, then
    /// the extension (case-insensitive)
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_string_lossy().to_lowercase();
        if name.starts_with(WAVEDRAG_PREFIX) {
            return Some(FileKind::WaveDrag);
        }

        let ext = path.extension()?.to_string_lossy().to_lowercase();
        match ext.as_str() {
            extensions::GEO => Some(FileKind::Geo),
            extensions::MAP => Some(FileKind::Map),
            extensions::FLOW => Some(FileKind::Flow),
            extensions::FORCES => Some(FileKind::Forces),
            extensions::CP => Some(FileKind::Cp),
            extensions::VIS => Some(FileKind::Vis),
            _ => None,
        }
    }

    /// Name used on the command line and as the bundle key
    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Geo => "geo",
            FileKind::Map => "map",
            FileKind::Flow => "flow",
            FileKind::Forces => "forces",
            FileKind::Cp => "cp",
            FileKind::Vis => "vis",
            FileKind::WaveDrag => "wavedrag",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.to_lowercase();
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed solver file of any kind
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParsedFile {
    Geo(GeometryFile),
    Map(MapFile),
    Flow(FlowConditionFile),
    Forces(ForcesReport),
    Cp(CpReport),
    Vis(VisReport),
    WaveDrag(WaveDrag),
}

impl ParsedFile {
    pub fn kind(&self) -> FileKind {
        match self {
            ParsedFile::Geo(_) => FileKind::Geo,
            ParsedFile::Map(_) => FileKind::Map,
            ParsedFile::Flow(_) => FileKind::Flow,
            ParsedFile::Forces(_) => FileKind::Forces,
            ParsedFile::Cp(_) => FileKind::Cp,
            ParsedFile::Vis(_) => FileKind::Vis,
            ParsedFile::WaveDrag(_) => FileKind::WaveDrag,
        }
    }

    /// One-line description for terminal output
    pub fn describe(&self) -> String {
        match self {
            ParsedFile::Geo(g) => format!(
                "{} sections, span {:.4}, fuselage {}",
                g.section_count(),
                g.span(),
                if g.fuselage.is_some() { "yes" } else { "no" }
            ),
            ParsedFile::Map(m) => format!("{} parameters", m.entries.len()),
            ParsedFile::Flow(f) => format!(
                "{} levels, {} fuselage lines",
                f.level_count(),
                f.fuselage.len()
            ),
            ParsedFile::Forces(r) => format!("levels {:?}", r.level_numbers().collect::<Vec<_>>()),
            ParsedFile::Cp(r) => format!(
                "levels {:?}, {} sections",
                r.level_numbers().collect::<Vec<_>>(),
                r.levels.values().map(|l| l.sections.len()).sum::<usize>()
            ),
            ParsedFile::Vis(r) => format!(
                "levels {:?}, {} spans",
                r.level_numbers().collect::<Vec<_>>(),
                r.levels.values().map(|l| l.sections.len()).sum::<usize>()
            ),
            ParsedFile::WaveDrag(w) => match w.total {
                Some(total) => format!("CDW(tot) {total:.6}"),
                None => "incomplete wave drag blocks".to_string(),
            },
        }
    }
}

/// A file that failed to parse
#[derive(Debug, Clone, Serialize)]
pub struct FileFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Processing statistics
#[derive(Debug, Default, Serialize)]
pub struct ProcessingStats {
    pub files_discovered: usize,
    pub files_parsed: usize,
    pub files_failed: usize,

    /// Parsed but not merged, because a file of the same kind came first
    pub files_skipped: usize,

    pub failures: Vec<FileFailure>,
    pub processing_time_ms: u128,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_extension() {
        assert_eq!(FileKind::from_path(Path::new("CRM1wbs.GEO")), Some(FileKind::Geo));
        assert_eq!(FileKind::from_path(Path::new("CRM1wb.map")), Some(FileKind::Map));
        assert_eq!(
            FileKind::from_path(Path::new("case/M085Re5p0ma+0p0.dat")),
            Some(FileKind::Flow)
        );
        assert_eq!(
            FileKind::from_path(Path::new("CRM1wbsM085Re5ma0p0.forces")),
            Some(FileKind::Forces)
        );
        assert_eq!(FileKind::from_path(Path::new("a.Cp")), Some(FileKind::Cp));
        assert_eq!(FileKind::from_path(Path::new("a.vis")), Some(FileKind::Vis));
        assert_eq!(FileKind::from_path(Path::new("notes.txt")), None);
        assert_eq!(FileKind::from_path(Path::new("README")), None);
    }

    #[test]
    fn test_wavedrag_prefix_wins() {
        assert_eq!(
            FileKind::from_path(Path::new("wavedrgM085Re5p0ma+0p0")),
            Some(FileKind::WaveDrag)
        );
        assert_eq!(
            FileKind::from_path(Path::new("WAVEDRG.dat")),
            Some(FileKind::WaveDrag)
        );
    }

    #[test]
    fn test_kind_names_round_trip() {
        for kind in FileKind::ALL {
            assert_eq!(FileKind::from_name(kind.as_str()), Some(kind));
        }
        assert_eq!(FileKind::from_name("FORCES"), Some(FileKind::Forces));
        assert_eq!(FileKind::from_name("csv"), None);
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&FileKind::WaveDrag).unwrap(), "\"wavedrag\"");
    }
}
