//! Wing geometry (GEO) files.
//!
//! The only format that is both read and written: a parsed geometry can be
//! edited (sections moved, chord, twist or dihedral changed) and written back
//! in the column layout the solver expects.

pub mod model;
pub mod normalize;
pub mod parser;
pub mod writer;


pub use model::{FuselageProfile, GeoHeader, GeometryFile, Point, RadiusPoint, Section};
pub use normalize::denormalize;
pub use parser::parse;
pub use writer::serialize;

use crate::error::Result;
use std::path::Path;

/// Read and parse a GEO file from disk
pub fn read(path: &Path) -> Result<GeometryFile> {
    let text = std::fs::read_to_string(path)?;
    parse(&text).map_err(|e| e.in_file(path))
}
