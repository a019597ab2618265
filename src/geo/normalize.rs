//! Chord-fraction to absolute coordinates

use super::model::{GeometryFile, Point};
use tracing::debug;

/// Convert a chord-fraction geometry to absolute coordinates.
///
/// The test is file-wide: only when every section's surfaces start at
/// (0, 0) are the points treated as fractions of chord, and then every
/// section is scaled (`x' = x·chord + le_x`, `z' = z·chord`). Otherwise the
/// geometry is returned unchanged, which makes the conversion idempotent for
/// any wing with a section whose leading edge is off the origin.
pub fn denormalize(mut geometry: GeometryFile) -> GeometryFile {
    if !geometry.is_normalized() {
        return geometry;
    }

    for section in &mut geometry.sections {
        let chord = section.chord();
        let le_x = section.le_x;
        let scale = |p: &mut Point| {
            p.x = p.x * chord + le_x;
            p.z *= chord;
        };
        section.upper_points.iter_mut().for_each(scale);
        section.lower_points.iter_mut().for_each(scale);
    }

    debug!(
        "Denormalized {} sections to absolute coordinates",
        geometry.sections.len()
    );
    geometry
}
