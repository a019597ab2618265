//! Multi-level report behaviour shared by the three parsers

use super::*;
use crate::config::{LevelPolicy, ReportConfig};

fn forces_level(number: u32, cl: f64, with_vortex: bool) -> String {
    let mut text = format!(
        " LEV= {number}  ITS= {}  MACH NO= 0.8500  ALPHA= 2.0000\n",
        100 * number
    );
    text.push_str("    J   YAVE   YAVE/YTIP   TWIST(deg)   CHORD   CL   CD   CM   GAM   NLEPOS\n");
    for j in 1..=number {
        text.push_str(&format!(
            "    {j}  0.{j}000  0.0200  3.0000  7.0000  {cl:.4}  0.0100 -0.1000  0.2000  1\n"
        ));
    }
    text.push_str(&format!(
        " CLTOT(VFP)= {cl:.4} CDTOT(VFP)= 0.0234 CMTOT(VFP)= -0.1012\n"
    ));
    if with_vortex {
        text.push_str(" CL(vortd)= 0.5000 CD(vortd)= 0.0120 DCD(vortd)= 0.0004\n");
    }
    text.push('\n');
    text
}

#[test]
fn test_forces_levels_out_of_order() {
    let text = [
        forces_level(3, 0.3000, true),
        forces_level(1, 0.1000, true),
        forces_level(2, 0.2000, true),
    ]
    .concat();
    let report = forces::parse(&text, &ReportConfig::default());

    assert_eq!(report.level_numbers().collect::<Vec<_>>(), vec![1, 2, 3]);
    for (number, cl) in [(1, 0.1), (2, 0.2), (3, 0.3)] {
        let level = report.level(number).unwrap();
        assert_eq!(level.header.number, number);
        assert_eq!(level.header.iterations, Some(100 * number));
        assert_eq!(level.stations.len(), number as usize);
        assert_eq!(level.vfp.as_ref().unwrap().cl, Some(cl));
    }
}

#[test]
fn test_missing_vortex_group_is_none() {
    let text = [forces_level(1, 0.1, false), forces_level(2, 0.2, true)].concat();
    let report = forces::parse(&text, &ReportConfig::default());
    assert!(report.level(1).unwrap().vortex.is_none());
    assert!(report.level(2).unwrap().vortex.is_some());
}

#[test]
fn test_single_level_policy() {
    let text = [forces_level(2, 0.2, true), forces_level(1, 0.1, true)].concat();
    let config = ReportConfig {
        levels: LevelPolicy::Only(1),
    };
    let report = forces::parse(&text, &config);
    assert_eq!(report.level_numbers().collect::<Vec<_>>(), vec![1]);
}

#[test]
fn test_no_level_marker_gives_empty_reports() {
    let text = "VFP run\n J= 1 YAVE= 0.1\n Span j-2 = 1\n";
    let config = ReportConfig::default();
    assert!(forces::parse(text, &config).is_empty());
    assert!(cp::parse(text, &config).is_empty());

    let vis = vis::parse(text, &config);
    assert!(vis.is_empty());
    assert_eq!(vis.title.as_deref(), Some("VFP run"));
}

#[test]
fn test_cp_separate_sheet_banners() {
    let mut text = String::from("CRM wing-body\n LEV= 1 ITS= 100\n J= 1 YAVE= 0.5000 CL= 0.4000\n");
    text.push_str("      X/C      Z/C       CP      P/H\n");
    for i in 0..4 {
        text.push_str(&format!(
            "  0.{i}000 0.0100 -0.5000 0.9 0.8 0.7 0.1 0.2 1.0 2.0 0.3 0.4\n"
        ));
    }
    text.push('\n');
    // Both tables print the full upper and lower groups; each banner's
    // surface owns its own group.
    for banner in [
        "UPPER SURFACE OF VORTEX SHEET",
        "LOWER SURFACE OF VORTEX SHEET",
    ] {
        text.push_str(&format!("   {banner}\n"));
        text.push_str("      X/C      Z/C       CP      P/H       M       Q\n");
        for i in 1..=5 {
            text.push_str(&format!(
                "  1.{i}000 0.0100 -0.2000 0.9500 0.8000 0.9000 -0.1000 0.9700 0.7500 0.8500\n"
            ));
        }
        text.push('\n');
    }
    text.push_str(" J= 2 YAVE= 1.5000\n");
    text.push_str("  0.0000 0.0100 -0.5000 0.9 0.8 0.7 0.1 0.2 1.0 2.0 0.3 0.4\n");

    let report = cp::parse(&text, &ReportConfig::default());
    let level = report.level(1).unwrap();
    assert_eq!(level.sections.len(), 2);

    let first = &level.sections[&1];
    assert_eq!(first.rows.len(), 4);
    assert_eq!(first.vortex_wake.upper.len(), 5);
    assert_eq!(first.vortex_wake.lower.len(), 5);
    assert!(first.vortex_wake.upper.iter().all(|row| row.cp == -0.2));
    assert!(first.vortex_wake.lower.iter().all(|row| row.cp == -0.1));
    assert!(first.vortex_wake.upper.iter().all(|row| row.p_h == 0.95));
    assert!(first.vortex_wake.lower.iter().all(|row| row.p_h == 0.97));
    assert_eq!(first.vortex_wake.lower[0].m, 0.75);
    assert_eq!(first.vortex_wake.lower[0].q, 0.85);
    assert_eq!(first.vortex_wake.lower[4].x_c, 1.5);

    let second = &level.sections[&2];
    assert_eq!(second.rows.len(), 1);
    assert!(second.vortex_wake.upper.is_empty());
}

#[test]
fn test_reports_serialize_absent_values_as_null() {
    let report = forces::parse(&forces_level(1, 0.1, false), &ReportConfig::default());
    let json = serde_json::to_value(&report).unwrap();
    let level = &json["levels"]["1"];
    assert!(level["vortex"].is_null());
    assert!(level["wing_area"].is_null());
    assert!(json["title"].is_null());
}
