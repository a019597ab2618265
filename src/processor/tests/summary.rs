//! Per-angle summary tests

use super::{forces_text, wave_drag_text, write};
use crate::processor::CaseProcessor;
use std::fs;
use tempfile::TempDir;

#[tokio::test]
async fn test_summary_pairs_forces_with_wave_drag() {
    let temp_dir = TempDir::new().unwrap();
    let case = temp_dir.path().join("sweep");
    fs::create_dir_all(&case).unwrap();

    write(&case, "CRM1wbsM085Re5p0ma-1p00.forces", &forces_text(0.3000));
    write(&case, "CRM1wbsM085Re5p0ma+1p00.forces", &forces_text(0.6000));
    write(&case, "wavedrgM085Re5p0ma+1p00", &wave_drag_text("0.001000", "0.000500"));
    write(&case, "wavedrgM085Re5p0ma+2p00", &wave_drag_text("0.002000", "0.001000"));
    write(&case, "CRM1wbs.GEO", "ignored by the summary");

    let (rows, stats) = CaseProcessor::new(case).summarize().await.unwrap();

    assert_eq!(stats.files_discovered, 4);
    assert_eq!(stats.files_failed, 0);

    let angles: Vec<Option<f64>> = rows.iter().map(|row| row.aoa).collect();
    assert_eq!(angles, vec![Some(-1.0), Some(1.0), Some(2.0)]);

    let below = &rows[0];
    assert_eq!(below.name, "CRM1wbsM085Re5p0ma-1p00");
    assert_eq!(below.forces.as_ref().unwrap().cd_tot_vfp, Some(0.0234));
    assert!(below.wave_drag.is_none());

    let paired = &rows[1];
    assert_eq!(paired.forces.as_ref().unwrap().cl, Some(0.6));
    assert_eq!(paired.forces.as_ref().unwrap().cdi, Some(0.012));
    let drag = paired.wave_drag.as_ref().unwrap();
    assert!((drag.total.unwrap() - 0.0015).abs() < 1e-12);

    let drag_only = &rows[2];
    assert_eq!(drag_only.name, "wavedrgM085Re5p0ma+2p00");
    assert!(drag_only.forces.is_none());
    assert!(drag_only.wave_drag.is_some());
}

#[tokio::test]
async fn test_summary_without_level_one() {
    let temp_dir = TempDir::new().unwrap();
    let case = temp_dir.path().to_path_buf();
    write(
        &case,
        "wingM085Re5ma0p0.forces",
        " LEV= 3 ITS= 10\n CLTOT(VFP)= 0.1000\n",
    );

    let (rows, _) = CaseProcessor::new(case).summarize().await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].aoa, Some(0.0));
    assert!(rows[0].forces.is_none());
}
