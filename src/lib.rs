//! VFP Formats Library
//!
//! Readers and writers for the text files of the VFP viscous full-potential
//! wing solver.
//!
//! This library provides tools for:
//! - Reading, editing and writing wing geometry (GEO) files
//! - Reading flow condition (`.dat`) files and deriving angle-of-attack sweeps
//! - Parsing the multi-level forces, cp and vis reports into typed models
//! - Parsing map run header files
//! - Batch-parsing a case directory into one JSON bundle

pub mod cli;
pub mod config;
pub mod constants;
pub mod cursor;
pub mod error;
pub mod fields;
pub mod flow;
pub mod geo;
pub mod map;
pub mod models;
pub mod processor;
pub mod report;

// Re-export commonly used types
pub use config::{FlowLayout, GeoLayout, LevelPolicy, ReportConfig, SweepOptions, VfpConfig};
pub use error::{Result, VfpError};
pub use flow::{FlowConditionFile, FlowFileName, SweepMember, derive_sweep};
pub use geo::{GeometryFile, Section, denormalize};
pub use map::{MapFile, MapValue};
pub use models::{FileKind, ParsedFile, ProcessingStats};
pub use processor::{CaseBundle, CaseProcessor};
pub use report::{CpReport, ForcesReport, SolverReport, VisReport, WaveDrag};
