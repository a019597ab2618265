//! Flow condition (`.dat`) files: read, write and AoA sweeps.

pub mod filename;
pub mod model;
pub mod parser;
pub mod sweep;


pub use filename::FlowFileName;
pub use model::{FlowConditionFile, FlowEntry, LevelBlock};
pub use parser::{parse, serialize};
pub use sweep::{SweepMember, derive_sweep};

use crate::config::FlowLayout;
use crate::error::Result;
use std::path::Path;

/// Read and parse a flow condition file from disk
pub fn read(path: &Path, layout: &FlowLayout) -> Result<FlowConditionFile> {
    let text = std::fs::read_to_string(path)?;
    parse(&text, layout).map_err(|e| e.in_file(path))
}
