//! GEO writer
//!
//! Every field is right-justified into its fixed column. A value too wide
//! for its column is an error: the solver reads by column, so a wide value
//! would silently shift every field after it.

use super::model::{GeometryFile, Point, Section};
use crate::config::GeoLayout;
use crate::constants;
use crate::error::{Result, VfpError};
use tracing::debug;

/// Serialize a geometry with the given column layout
pub fn serialize(geometry: &GeometryFile, layout: &GeoLayout) -> Result<String> {
    let writer = GeoWriter { layout };
    let mut out = String::new();

    writer.header_line(&mut out, geometry)?;
    for section in &geometry.sections {
        writer.section(&mut out, section)?;
    }
    writer.trailer(&mut out, geometry)?;

    debug!(
        "Serialized GEO: {} sections, {} bytes",
        geometry.sections.len(),
        out.len()
    );
    Ok(out)
}

struct GeoWriter<'a> {
    layout: &'a GeoLayout,
}

impl GeoWriter<'_> {
    fn real(&self, value: f64, precision: usize) -> Result<String> {
        fixed(format!("{value:.precision$}"), self.layout.real_width)
    }

    fn int(&self, value: i64, width: usize) -> Result<String> {
        fixed(value.to_string(), width)
    }

    fn header_line(&self, out: &mut String, geometry: &GeometryFile) -> Result<()> {
        // NSECT gets two leading blanks and a 3-wide field, as the solver's
        // own sample decks do.
        out.push_str("  ");
        out.push_str(&self.int(geometry.sections.len() as i64, 3)?);
        out.push_str(&self.int(geometry.header.nsect1.into(), self.layout.int_width)?);
        for (isend, dsend) in geometry.header.section_ends {
            out.push_str(&self.int(isend.into(), self.layout.int_width)?);
            out.push_str(&self.real(dsend, self.layout.header_precision)?);
        }
        out.push('\n');
        Ok(())
    }

    fn section(&self, out: &mut String, section: &Section) -> Result<()> {
        let precision = self.layout.coordinate_precision;

        for value in [
            section.y_pos,
            section.le_x,
            section.te_x,
            section.dihedral_height,
        ] {
            out.push_str(&self.real(value, precision)?);
        }
        out.push('\n');

        // Mirrored sections are written without a lower block
        let ml = if section.is_mirrored() { 0 } else { section.ml() };
        out.push_str("  ");
        out.push_str(&self.int(section.symmetry_marker.into(), 3)?);
        out.push_str(&self.int(section.mu() as i64, self.layout.int_width)?);
        out.push_str(&self.int(ml as i64, self.layout.int_width)?);
        out.push_str(&self.real(section.twist_pivot_x, precision)?);
        out.push_str(&self.real(section.twist_deg, precision)?);
        out.push('\n');

        self.points(out, &section.upper_points)?;
        if !section.is_mirrored() {
            self.points(out, &section.lower_points)?;
        }
        Ok(())
    }

    fn points(&self, out: &mut String, points: &[Point]) -> Result<()> {
        let precision = self.layout.coordinate_precision;
        for point in points {
            out.push_str(&self.real(point.x, precision)?);
            out.push_str(&self.real(point.z, precision)?);
            out.push('\n');
        }
        Ok(())
    }

    fn trailer(&self, out: &mut String, geometry: &GeometryFile) -> Result<()> {
        let Some(fuselage) = geometry.fuselage.as_ref().filter(|f| !f.points.is_empty()) else {
            for line in constants::geo::EMPTY_TRAILER {
                out.push_str(line);
                out.push('\n');
            }
            return Ok(());
        };

        let precision = self.layout.radius_precision;
        out.push_str(&self.int(fuselage.points.len() as i64, self.layout.int_width)?);
        for (irend, drend) in fuselage.ends {
            out.push_str(&self.int(irend.into(), self.layout.int_width)?);
            out.push_str(&self.real(drend, precision)?);
        }
        out.push('\n');

        for point in &fuselage.points {
            out.push_str(&self.real(point.x, precision)?);
            out.push_str(&self.real(point.radius, precision)?);
            out.push('\n');
        }
        Ok(())
    }
}

/// Right-justify `text` in `width` columns
fn fixed(text: String, width: usize) -> Result<String> {
    if text.len() > width {
        return Err(VfpError::FieldOverflow { value: text, width });
    }
    Ok(format!("{text:>width$}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::model::{FuselageProfile, GeoHeader, RadiusPoint};

    fn section(y: f64, marker: i32) -> Section {
        Section {
            y_pos: y,
            le_x: 0.25,
            te_x: 1.25,
            dihedral_height: 0.0,
            symmetry_marker: marker,
            twist_pivot_x: 0.5,
            twist_deg: -1.5,
            upper_points: vec![Point::new(0.25, 0.0), Point::new(1.25, 0.01)],
            lower_points: vec![Point::new(0.25, 0.0), Point::new(1.25, -0.01)],
        }
    }

    #[test]
    fn test_exact_column_layout() {
        let geometry = GeometryFile {
            header: GeoHeader::default(),
            sections: vec![section(0.0, 0)],
            fuselage: None,
        };
        let text = serialize(&geometry, &GeoLayout::default()).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "    1    2   -1   0.00000   -1   0.00000   -1   0.00000   -1   0.00000"
        );
        assert_eq!(lines[1], "  0.000000  0.250000  1.250000  0.000000");
        assert_eq!(lines[2], "    0    2    2  0.500000 -1.500000");
        assert_eq!(lines[3], "  0.250000  0.000000");
        assert_eq!(lines[6], "  1.250000 -0.010000");
        assert_eq!(&lines[7..], constants::geo::EMPTY_TRAILER);
    }

    #[test]
    fn test_mirrored_section_omits_lower_block() {
        let geometry = GeometryFile {
            sections: vec![section(3.0, 1)],
            ..GeometryFile::default()
        };
        let text = serialize(&geometry, &GeoLayout::default()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[2], "    1    2    0  0.500000 -1.500000");
        // header, scalar, marker, 2 upper, then the empty trailer
        assert_eq!(lines[5], "   0");

        let reread = crate::geo::parse(&text).unwrap();
        let tip = &reread.sections[0];
        assert!(tip.lower_points.is_empty());
        assert_eq!(tip.lower_surface()[1], Point::new(1.25, -0.01));
    }

    #[test]
    fn test_fuselage_trailer() {
        let geometry = GeometryFile {
            sections: vec![section(0.0, 0)],
            fuselage: Some(FuselageProfile::new(vec![
                RadiusPoint { x: 0.0, radius: 0.1 },
                RadiusPoint { x: 12.5, radius: 0.75 },
            ])),
            ..GeometryFile::default()
        };
        let text = serialize(&geometry, &GeoLayout::default()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[7], "    2    1    0.0000    2    0.0000");
        assert_eq!(lines[9], "   12.5000    0.7500");
        assert_eq!(lines.len(), 10);
    }

    #[test]
    fn test_overflowing_value_is_rejected() {
        let mut wide = section(0.0, 0);
        wide.y_pos = 1150.0;
        let geometry = GeometryFile {
            sections: vec![wide],
            ..GeometryFile::default()
        };
        match serialize(&geometry, &GeoLayout::default()) {
            Err(VfpError::FieldOverflow { value, width }) => {
                assert_eq!(value, "1150.000000");
                assert_eq!(width, 10);
            }
            other => panic!("expected overflow, got {other:?}"),
        }

        let narrow = GeoLayout {
            coordinate_precision: 4,
            ..GeoLayout::default()
        };
        assert!(serialize(&geometry, &narrow).is_ok());
    }
}
