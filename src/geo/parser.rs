//! GEO reader
//!
//! Line layout (Fortran edit descriptors in brackets):
//! ```text
//! NSECT NSECT1 (ISEND DSEND)x4        [2I5, 4(I5,F10.0)]
//! per section:
//!   YSECT G1SECT G2SECT HSECT         [4F10.0]
//!   IMARK MU ML XTWSEC TWIST          [3I5, 2F10.0]
//!   MU lines of X Z                   [2F10.0]
//!   ML lines of X Z (IMARK = 0 only)  [2F10.0]
//! NRAD (IREND DREND)x2                [I5, 2(I5,F10.0)]
//! NRAD lines of XRAD RAD              [2F10.0]
//! ```
//! Any structural shortfall fails the whole read: a writer downstream
//! depends on the counts being exact.

use super::model::{FuselageProfile, GeoHeader, GeometryFile, Point, RadiusPoint, Section};
use crate::constants::geo::{INT_WIDTH as I, REAL_WIDTH as F, SECTION_END_PAIRS};
use crate::cursor::LineCursor;
use crate::error::Result;
use crate::fields::{count_field, int_field, real_field, require_fields, split_fields};
use tracing::debug;

const HEADER_FIELDS: &[usize] = &[I, I, I, F, I, F, I, F, I, F];
const SCALAR_FIELDS: &[usize] = &[F, F, F, F];
const MARKER_FIELDS: &[usize] = &[I, I, I, F, F];
const POINT_FIELDS: &[usize] = &[F, F];
const RADIUS_HEADER_FIELDS: &[usize] = &[I, I, F, I, F];

/// Parse GEO text
pub fn parse(text: &str) -> Result<GeometryFile> {
    let lines: Vec<&str> = text.lines().collect();
    let mut cursor = LineCursor::new(&lines);

    let (nsect, header) = parse_header(&mut cursor)?;

    let mut sections = Vec::with_capacity(nsect);
    for index in 0..nsect {
        let section = parse_section(&mut cursor, index + 1)?;
        sections.push(section);
    }

    let fuselage = parse_fuselage(&mut cursor)?;

    debug!(
        "Parsed GEO: {} sections, fuselage: {}",
        sections.len(),
        fuselage
            .as_ref()
            .map_or(0, |f: &FuselageProfile| f.points.len())
    );

    Ok(GeometryFile {
        header,
        sections,
        fuselage,
    })
}

fn parse_header(cursor: &mut LineCursor) -> Result<(usize, GeoHeader)> {
    let line_number = cursor.line_number();
    let line = cursor.expect("section count line")?;
    let fields = require_fields(line, &HEADER_FIELDS[..1], line_number, "section count line")?;
    let nsect = count_field(fields[0], line_number)?;

    // Trailing header values are optional; when present they must be numeric.
    let mut header = GeoHeader::default();
    if let Some(token) = fields.get(1) {
        header.nsect1 = int_field(token, line_number)? as i32;
    }
    for pair in 0..SECTION_END_PAIRS {
        let (i_index, d_index) = (2 + 2 * pair, 3 + 2 * pair);
        if let (Some(i_token), Some(d_token)) = (fields.get(i_index), fields.get(d_index)) {
            header.section_ends[pair] = (
                int_field(i_token, line_number)? as i32,
                real_field(d_token, line_number)?,
            );
        }
    }

    Ok((nsect, header))
}

fn parse_section(cursor: &mut LineCursor, number: usize) -> Result<Section> {
    let line_number = cursor.line_number();
    let line = cursor.expect(&format!("scalar line of section {number}"))?;
    let fields = require_fields(line, SCALAR_FIELDS, line_number, "section scalar line")?;
    let y_pos = real_field(fields[0], line_number)?;
    let le_x = real_field(fields[1], line_number)?;
    let te_x = real_field(fields[2], line_number)?;
    let dihedral_height = real_field(fields[3], line_number)?;

    let line_number = cursor.line_number();
    let line = cursor.expect(&format!("marker line of section {number}"))?;
    let fields = require_fields(line, MARKER_FIELDS, line_number, "section marker line")?;
    let symmetry_marker = int_field(fields[0], line_number)? as i32;
    let mu = count_field(fields[1], line_number)?;
    let ml = count_field(fields[2], line_number)?;
    let twist_pivot_x = real_field(fields[3], line_number)?;
    let twist_deg = real_field(fields[4], line_number)?;

    let upper_points = parse_points(cursor, mu, &format!("upper surface of section {number}"))?;
    // ML lower lines follow whatever the marker says
    let lower_points = parse_points(cursor, ml, &format!("lower surface of section {number}"))?;

    Ok(Section {
        y_pos,
        le_x,
        te_x,
        dihedral_height,
        symmetry_marker,
        twist_pivot_x,
        twist_deg,
        upper_points,
        lower_points,
    })
}

fn parse_points(cursor: &mut LineCursor, count: usize, what: &str) -> Result<Vec<Point>> {
    let first_line = cursor.line_number();
    let lines = cursor.expect_n(count, what)?;
    lines
        .iter()
        .enumerate()
        .map(|(offset, line)| {
            let line_number = first_line + offset;
            let fields = require_fields(line, POINT_FIELDS, line_number, what)?;
            Ok(Point::new(
                real_field(fields[0], line_number)?,
                real_field(fields[1], line_number)?,
            ))
        })
        .collect()
}

/// Fuselage trailer. End of file or a zero count means no fuselage; the
/// blank lines of the empty trailer are never read.
fn parse_fuselage(cursor: &mut LineCursor) -> Result<Option<FuselageProfile>> {
    cursor.skip_blank();
    let line_number = cursor.line_number();
    let Some(line) = cursor.take() else {
        return Ok(None);
    };

    let fields = split_fields(line, RADIUS_HEADER_FIELDS);
    let nrad = match fields.first() {
        Some(token) => count_field(token, line_number)?,
        None => return Ok(None),
    };
    if nrad == 0 {
        return Ok(None);
    }

    let mut profile = FuselageProfile::new(Vec::with_capacity(nrad));
    for pair in 0..2 {
        if let (Some(i_token), Some(d_token)) = (fields.get(1 + 2 * pair), fields.get(2 + 2 * pair))
        {
            profile.ends[pair] = (
                int_field(i_token, line_number)? as i32,
                real_field(d_token, line_number)?,
            );
        }
    }

    profile.points = parse_points(cursor, nrad, "fuselage radius table")?
        .into_iter()
        .map(|p| RadiusPoint {
            x: p.x,
            radius: p.z,
        })
        .collect();

    Ok(Some(profile))
}
