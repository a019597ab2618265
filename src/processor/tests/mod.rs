//! Batch processing tests on case directories built in a temporary directory

pub mod summary;

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const GEO: &[&str] = &[
    "    2    2   -1   0.00000   -1   0.00000   -1   0.00000   -1   0.00000",
    "  0.000000  0.000000  1.000000  0.000000",
    "    0    3    3  0.250000  2.000000",
    "  0.000000  0.000000",
    "  0.500000  0.060000",
    "  1.000000  0.000000",
    "  0.000000  0.000000",
    "  0.500000 -0.040000",
    "  1.000000  0.000000",
    "  5.000000  0.500000  1.200000  0.300000",
    "    1    2    2  0.250000 -1.500000",
    "  0.000000  0.000000",
    "  1.000000  0.000000",
    "  0.000000  0.000000",
    "  1.000000  0.000000",
    "    2    1  0.0000    2  0.0000",
    "    0.0000    0.1000",
    "   10.0000    0.1500",
];

pub const MAP: &str = "TITLE FOR VFP MAPPING RUN:\nCRM wing-body\n NMAP IOPT\n 2 A1\nLINE: FORMAT:\n";

pub fn flow_text(aoa: &str) -> String {
    let mut lines = vec!["M085Re5p0 wing-body".to_string(), "    0".to_string()];
    for number in 1..=2 {
        lines.push(format!("    2   0.8500 {aoa:>8}    1    0  {:>3}", 100 * number));
        lines.extend((1..15).map(|i| format!("  level {number} line {i}")));
    }
    lines.push("    0".to_string());
    lines.join("\n") + "\n"
}

pub fn forces_text(cl: f64) -> String {
    format!(
        "\
 LEV= 2 ITS= 50 MACH NO= 0.8500 ALPHA= 0.0000
 CLTOT(VFP)= 0.9000 CDTOT(VFP)= 0.0900 CMTOT(VFP)= -0.9000
 LEV= 1 ITS= 200 MACH NO= 0.8500 ALPHA= 0.0000
 CLTOT(VFP)= {cl:.4} CDTOT(VFP)= 0.0234 CMTOT(VFP)= -0.1012
 CLTOT(IBE)= {cl:.4} CDTOT(IBE)= 0.0230
 CL(vortd)= 0.5000 CD(vortd)= 0.0120 DCD(vortd)= 0.0004
"
    )
}

pub const CP: &str = "CRM wing-body\n LEV= 1 ITS= 200\n J= 1 YAVE= 0.5000 CL= 0.4000\n  0.0000 0.0100 -0.5000 0.9 0.8 0.7 0.1 0.2 1.0 2.0 0.3 0.4\n";

pub const VIS: &str = "VFP boundary layer output\n LEV= 1\n   MACH NUMBER      :   0.8500\n Span j-2 =  1   eta =  0.2500   Chord =  5.1000\n   I   x/c   Cp\n   1 0.01 -0.5 1.1 1.1 0.0001 0.0002 2.0 0.003 0.9 1.0 0.5 0.01 0.001\n";

pub fn wave_drag_text(upper: &str, lower: &str) -> String {
    format!(
        " Total wave drag for block is CDW(tot) = {upper}\n Total wave drag for block is CDW(tot) = {lower}\n"
    )
}

pub fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

/// A case directory holding one file of every kind, reports in `runs/`
pub fn create_case(temp_dir: &TempDir) -> PathBuf {
    let case = temp_dir.path().join("CRM1");
    let runs = case.join("runs");
    fs::create_dir_all(&runs).unwrap();

    write(&case, "CRM1wbs.GEO", &(GEO.join("\n") + "\n"));
    write(&case, "CRM1wb.map", MAP);
    write(&case, "M085Re5p0ma+0p00.dat", &flow_text("0.0000"));
    write(&case, "README.txt", "not a solver file");
    write(&runs, "CRM1wbsM085Re5p0ma+0p00.forces", &forces_text(0.5123));
    write(&runs, "CRM1wbsM085Re5p0ma+0p00.cp", CP);
    write(&runs, "CRM1wbsM085Re5p0ma+0p00.vis", VIS);
    write(
        &runs,
        "wavedrgM085Re5p0ma+0p00",
        &wave_drag_text("0.001230", "0.000450"),
    );
    case
}
