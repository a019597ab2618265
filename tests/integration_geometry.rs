//! Integration tests for the GEO reader and writer on files on disk
//!
//! A geometry is read, edited the way the geometry editor edits it, written
//! back and read again.

use std::fs;
use tempfile::TempDir;
use vfp_formats::config::GeoLayout;
use vfp_formats::geo::{self, GeometryFile};
use vfp_formats::VfpError;

const NORMALIZED_WING: &[&str] = &[
    "    2    2   -1   0.00000   -1   0.00000   -1   0.00000   -1   0.00000",
    "  0.000000  2.000000  6.000000  0.000000",
    "    0    3    3  2.500000  1.000000",
    "  0.000000  0.000000",
    "  0.500000  0.060000",
    "  1.000000  0.000000",
    "  0.000000  0.000000",
    "  0.500000 -0.040000",
    "  1.000000  0.000000",
    "  8.000000  3.000000  5.000000  0.400000",
    "    0    2    2  3.500000 -1.500000",
    "  0.000000  0.000000",
    "  1.000000  0.000000",
    "  0.000000  0.000000",
    "  1.000000  0.000000",
    "   0",
    "",
    "",
    "",
    "",
    "     0    0       0.0    0       0.0",
];

fn write_wing(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("wing.GEO");
    fs::write(&path, NORMALIZED_WING.join("\n") + "\n").unwrap();
    path
}

fn assert_close(a: f64, b: f64, tolerance: f64) {
    assert!((a - b).abs() <= tolerance, "{a} != {b}");
}

#[test]
fn test_read_edit_write_cycle() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_wing(&temp_dir);
    let layout = GeoLayout::default();

    let mut geometry = geo::read(&path).unwrap();
    assert_eq!(geometry.section_count(), 2);
    assert!(geometry.fuselage.is_none());

    // sweep the tip back and twist it down
    let tip = &mut geometry.sections[1];
    tip.le_x += 0.25;
    tip.te_x += 0.25;
    tip.twist_deg = -2.123456;

    let out = temp_dir.path().join("wing_edited.GEO");
    fs::write(&out, geo::serialize(&geometry, &layout).unwrap()).unwrap();
    let reread = geo::read(&out).unwrap();

    assert_eq!(reread.section_count(), 2);
    let tol = layout.coordinate_tolerance();
    for (a, b) in geometry.sections.iter().zip(&reread.sections) {
        assert_close(a.le_x, b.le_x, tol);
        assert_close(a.chord(), b.chord(), 2.0 * tol);
        assert_close(a.twist_deg, b.twist_deg, tol);
        assert_eq!(a.mu(), b.mu());
        assert_eq!(a.ml(), b.ml());
    }
    assert!(reread.fuselage.is_none());
}

#[test]
fn test_denormalized_wing_is_physical() {
    let temp_dir = TempDir::new().unwrap();
    let geometry = geo::read(&write_wing(&temp_dir)).unwrap();
    assert!(geometry.is_normalized());

    let physical: GeometryFile = geo::denormalize(geometry);
    assert!(!physical.is_normalized());

    let root = &physical.sections[0];
    // chord 4, leading edge at x = 2
    assert_close(root.upper_points[1].x, 4.0, 1e-12);
    assert_close(root.upper_points[1].z, 0.24, 1e-12);
    assert_close(root.lower_points[2].x, 6.0, 1e-12);

    let tip = &physical.sections[1];
    assert_close(tip.upper_points[1].x, 5.0, 1e-12);
}

#[test]
fn test_truncated_file_reports_path_and_line() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("short.GEO");
    fs::write(&path, NORMALIZED_WING[..6].join("\n") + "\n").unwrap();

    let err = geo::read(&path).unwrap_err();
    assert!(matches!(err, VfpError::FileFailed { .. }));
    assert!(err.to_string().contains("short.GEO"));
    assert!(err.line().is_some());
}
