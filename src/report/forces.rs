//! Forces report (`.forces`)
//!
//! Per level: a spanwise loading table, three groups of integrated
//! coefficients, and an optional viscous drag sub-table.

use super::{LevelHeader, LevelSegment, SolverReport, collect_levels};
use crate::config::ReportConfig;
use crate::constants::forces::*;
use crate::error::Result;
use crate::fields::{LabeledValue, numeric_row};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

pub type ForcesReport = SolverReport<ForcesLevel>;

/// One row of the spanwise loading table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpanwiseRow {
    pub j: f64,
    pub yave: f64,
    pub yave_ytip: f64,
    pub twist_deg: f64,
    pub chord: f64,
    pub cl: f64,
    pub cd: f64,
    pub cm: f64,
    pub gam: f64,
    pub nlepos: f64,
}

impl SpanwiseRow {
    fn from_values(v: &[f64]) -> Self {
        Self {
            j: v[0],
            yave: v[1],
            yave_ytip: v[2],
            twist_deg: v[3],
            chord: v[4],
            cl: v[5],
            cd: v[6],
            cm: v[7],
            gam: v[8],
            nlepos: v[9],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VfpCoefficients {
    pub cl: Option<f64>,
    pub cd: Option<f64>,
    pub cm: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IbeCoefficients {
    pub cl: Option<f64>,
    pub cd: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VortexCoefficients {
    pub cl: Option<f64>,
    pub cd: Option<f64>,
    pub dcd: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViscousRow {
    pub j: f64,
    pub theta: f64,
    pub chord: f64,
    pub sweep_le: f64,
    pub sweep_te: f64,
    pub cdv: f64,
    pub cdvc_cbar: f64,
    pub cdvte: f64,
    pub cdvtec_cbar: f64,
}

impl ViscousRow {
    fn from_values(v: &[f64]) -> Self {
        Self {
            j: v[0],
            theta: v[1],
            chord: v[2],
            sweep_le: v[3],
            sweep_te: v[4],
            cdv: v[5],
            cdvc_cbar: v[6],
            cdvte: v[7],
            cdvtec_cbar: v[8],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViscousDragTable {
    /// The banner line
    pub header: String,

    /// Column names as printed
    pub columns: Vec<String>,

    pub rows: Vec<ViscousRow>,
    pub total: Option<f64>,
    pub total_te: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForcesLevel {
    pub header: LevelHeader,
    pub stations: Vec<SpanwiseRow>,
    pub vfp: Option<VfpCoefficients>,
    pub wing_area: Option<f64>,
    pub ibe: Option<IbeCoefficients>,
    pub vortex: Option<VortexCoefficients>,
    pub viscous_drag: Option<ViscousDragTable>,
}

struct ForcesLabels {
    vfp_cl: LabeledValue,
    vfp_cd: LabeledValue,
    vfp_cm: LabeledValue,
    wing_area: LabeledValue,
    ibe_cl: LabeledValue,
    ibe_cd: LabeledValue,
    vortex_cl: LabeledValue,
    vortex_cd: LabeledValue,
    vortex_dcd: LabeledValue,
    viscous_total: LabeledValue,
    viscous_total_te: LabeledValue,
}

static LABELS: LazyLock<ForcesLabels> = LazyLock::new(|| ForcesLabels {
    vfp_cl: LabeledValue::new(VFP_CL),
    vfp_cd: LabeledValue::new(VFP_CD),
    vfp_cm: LabeledValue::new(VFP_CM),
    wing_area: LabeledValue::new(WING_AREA),
    ibe_cl: LabeledValue::new(IBE_CL),
    ibe_cd: LabeledValue::new(IBE_CD),
    vortex_cl: LabeledValue::new(VORTEX_CL),
    vortex_cd: LabeledValue::new(VORTEX_CD),
    vortex_dcd: LabeledValue::new(VORTEX_DCD),
    viscous_total: LabeledValue::new(VISCOUS_TOTAL),
    viscous_total_te: LabeledValue::new(VISCOUS_TOTAL_TE),
});

pub fn parse(text: &str, config: &ReportConfig) -> ForcesReport {
    let lines: Vec<&str> = text.lines().collect();
    SolverReport {
        title: None,
        levels: collect_levels(&lines, config, "forces", parse_level),
    }
}

pub fn read(path: &Path, config: &ReportConfig) -> Result<ForcesReport> {
    let text = std::fs::read_to_string(path)?;
    Ok(parse(&text, config))
}

fn parse_level(segment: &LevelSegment) -> ForcesLevel {
    let body = segment.body;
    let labels = &*LABELS;

    let vfp = has_signature(body, VFP_SIGNATURE).then(|| VfpCoefficients {
        cl: first_value(body, &labels.vfp_cl),
        cd: first_value(body, &labels.vfp_cd),
        cm: first_value(body, &labels.vfp_cm),
    });
    let ibe = has_signature(body, IBE_SIGNATURE).then(|| IbeCoefficients {
        cl: first_value(body, &labels.ibe_cl),
        cd: first_value(body, &labels.ibe_cd),
    });
    let vortex = has_signature(body, VORTEX_SIGNATURE).then(|| VortexCoefficients {
        cl: first_value(body, &labels.vortex_cl),
        cd: first_value(body, &labels.vortex_cd),
        dcd: first_value(body, &labels.vortex_dcd),
    });

    ForcesLevel {
        header: segment.header.clone(),
        stations: spanwise_table(segment),
        wing_area: first_value(body, &labels.wing_area),
        vfp,
        ibe,
        vortex,
        viscous_drag: viscous_table(body, labels),
    }
}

fn has_signature(body: &[&str], signature: &str) -> bool {
    body.iter().any(|line| line.contains(signature))
}

fn first_value(lines: &[&str], label: &LabeledValue) -> Option<f64> {
    lines.iter().find_map(|line| label.find(line))
}

fn spanwise_table(segment: &LevelSegment) -> Vec<SpanwiseRow> {
    let body = segment.body;
    let Some(header) = body.iter().position(|line| line.contains(TABLE_HEADER)) else {
        return Vec::new();
    };

    let mut rows = Vec::new();
    for (i, line) in body.iter().enumerate().skip(header + 1) {
        if line.trim().is_empty() || line.contains(SUMMARY_TOKEN) {
            break;
        }
        match numeric_row(line, TABLE_COLUMNS.len()) {
            Some(values) => rows.push(SpanwiseRow::from_values(&values)),
            None => debug!(
                "Line {}: skipping non-numeric spanwise row",
                segment.offset + i + 1
            ),
        }
    }
    rows
}

fn viscous_table(body: &[&str], labels: &ForcesLabels) -> Option<ViscousDragTable> {
    let banner = body.iter().position(|line| line.contains(VISCOUS_BANNER))?;
    let after = &body[banner + 1..];

    let mut table = ViscousDragTable {
        header: body[banner].trim().to_string(),
        columns: Vec::new(),
        rows: Vec::new(),
        total: first_value(after, &labels.viscous_total),
        total_te: first_value(after, &labels.viscous_total_te),
    };

    if let Some(header) = after
        .iter()
        .position(|line| line.contains(VISCOUS_HEADER_TOKEN))
    {
        table.columns = after[header]
            .split_whitespace()
            .map(str::to_string)
            .collect();
        table.rows = after[header + 1..]
            .iter()
            .take_while(|line| !line.trim().is_empty() && !line.contains(VISCOUS_TOTAL))
            .filter_map(|line| numeric_row(line, VISCOUS_COLUMNS.len()))
            .map(|values| ViscousRow::from_values(&values))
            .collect();
    }
    Some(table)
}
