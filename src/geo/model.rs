//! In-memory wing geometry
//!
//! `GeometryFile` is the one model in this crate meant to be edited and
//! written back, so its fields are public and plain.

use crate::constants;
use serde::{Deserialize, Serialize};

/// One `(x, z)` surface coordinate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub z: f64,
}

impl Point {
    pub fn new(x: f64, z: f64) -> Self {
        Self { x, z }
    }

    pub fn is_origin(&self) -> bool {
        self.x == 0.0 && self.z == 0.0
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, z): (f64, f64)) -> Self {
        Self { x, z }
    }
}

/// Line 1 values other than the section count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoHeader {
    /// `NSECT1`
    pub nsect1: i32,

    /// `(ISEND, DSEND)` spanwise end conditions
    pub section_ends: [(i32, f64); constants::geo::SECTION_END_PAIRS],
}

impl Default for GeoHeader {
    fn default() -> Self {
        Self {
            nsect1: constants::geo::DEFAULT_NSECT1,
            section_ends: [constants::geo::DEFAULT_SECTION_END; constants::geo::SECTION_END_PAIRS],
        }
    }
}

/// One spanwise wing station
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// `YSECT`, spanwise position
    pub y_pos: f64,

    /// `G1SECT`, leading-edge x
    pub le_x: f64,

    /// `G2SECT`, trailing-edge x
    pub te_x: f64,

    /// `HSECT`, dihedral height
    pub dihedral_height: f64,

    /// `IMARK`: 0 when the lower surface is given, otherwise mirrored
    pub symmetry_marker: i32,

    /// `XTWSEC`, chordwise twist axis
    pub twist_pivot_x: f64,

    /// `TWIST`, degrees
    pub twist_deg: f64,

    pub upper_points: Vec<Point>,

    /// The declared `ML` lines, also for a mirrored section
    pub lower_points: Vec<Point>,
}

impl Section {
    pub fn chord(&self) -> f64 {
        self.te_x - self.le_x
    }

    /// `MU`
    pub fn mu(&self) -> usize {
        self.upper_points.len()
    }

    /// `ML`
    pub fn ml(&self) -> usize {
        self.lower_points.len()
    }

    pub fn is_mirrored(&self) -> bool {
        self.symmetry_marker != 0
    }

    /// Lower surface as a consumer should see it: the explicit points, or
    /// the upper surface reflected in z for a mirrored section. Lower points
    /// carried by a mirrored section are not used.
    pub fn lower_surface(&self) -> Vec<Point> {
        if self.is_mirrored() {
            self.upper_points
                .iter()
                .map(|p| Point::new(p.x, -p.z))
                .collect()
        } else {
            self.lower_points.clone()
        }
    }

    /// Both surfaces start at the origin, as chord-fraction sections do
    pub(crate) fn starts_at_origin(&self) -> bool {
        let upper = self.upper_points.first().is_some_and(Point::is_origin);
        let lower = self.is_mirrored() || self.lower_points.first().is_some_and(Point::is_origin);
        upper && lower
    }
}

/// One `(XRAD, RAD)` fuselage station
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadiusPoint {
    pub x: f64,
    pub radius: f64,
}

/// Axisymmetric body trailing the wing sections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuselageProfile {
    /// `(IREND, DREND)` end conditions
    pub ends: [(i32, f64); 2],

    pub points: Vec<RadiusPoint>,
}

impl FuselageProfile {
    pub fn new(points: Vec<RadiusPoint>) -> Self {
        Self {
            ends: constants::geo::DEFAULT_RADIUS_ENDS,
            points,
        }
    }
}

/// A complete GEO file
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GeometryFile {
    pub header: GeoHeader,
    pub sections: Vec<Section>,
    pub fuselage: Option<FuselageProfile>,
}

impl GeometryFile {
    /// `NSECT`
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Every section is in chord-fraction form (both surfaces start at
    /// (0, 0)). A file with no sections is not normalized.
    pub fn is_normalized(&self) -> bool {
        !self.sections.is_empty() && self.sections.iter().all(Section::starts_at_origin)
    }

    /// Wing span covered by the sections
    pub fn span(&self) -> f64 {
        let (min, max) = self
            .sections
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| {
                (lo.min(s.y_pos), hi.max(s.y_pos))
            });
        if self.sections.is_empty() { 0.0 } else { max - min }
    }
}
