//! Per-case summaries built from parsed reports
//!
//! The post-processing tools tabulate one row per case: the level-1 forces
//! coefficients, the wave drag of the two wing surfaces and the angle of
//! attack encoded in the file name.

use super::forces::{ForcesLevel, ForcesReport};
use crate::constants::wavedrag::TOTAL_LABEL;
use crate::error::Result;
use crate::fields::LabeledValue;
use crate::flow::filename::decode_angle;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;
use tracing::warn;

/// Level read by [`summarize`]
pub const SUMMARY_LEVEL: u32 = 1;

static CASE_AOA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"M\d+Re\d+(?:p\d+)?ma([-+]?\d+p\d+)")
        .unwrap_or_else(|e| unreachable!("case name pattern rejected: {e}"))
});

static WAVE_DRAG_TOTAL: LazyLock<LabeledValue> = LazyLock::new(|| LabeledValue::new(TOTAL_LABEL));

/// Headline coefficients of one forces level
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForcesSummary {
    pub alpha: Option<f64>,
    pub mach: Option<f64>,

    /// Total viscous drag
    pub cdv: Option<f64>,

    /// Induced drag, `CD(vortd)`
    pub cdi: Option<f64>,

    /// Lift, `CLTOT(IBE)`
    pub cl: Option<f64>,

    pub cd_tot_vfp: Option<f64>,
    pub cd_tot_ibe: Option<f64>,
    pub cm_tot_vfp: Option<f64>,
}

impl ForcesSummary {
    pub fn from_level(level: &ForcesLevel) -> Self {
        Self {
            alpha: level.header.alpha,
            mach: level.header.mach,
            cdv: level.viscous_drag.as_ref().and_then(|v| v.total),
            cdi: level.vortex.as_ref().and_then(|v| v.cd),
            cl: level.ibe.as_ref().and_then(|c| c.cl),
            cd_tot_vfp: level.vfp.as_ref().and_then(|c| c.cd),
            cd_tot_ibe: level.ibe.as_ref().and_then(|c| c.cd),
            cm_tot_vfp: level.vfp.as_ref().and_then(|c| c.cm),
        }
    }
}

/// Summary of level 1, the level the legacy tabulation reads
pub fn summarize(report: &ForcesReport) -> Option<ForcesSummary> {
    let level = report.level(SUMMARY_LEVEL);
    if level.is_none() {
        let found: Vec<u32> = report.level_numbers().collect();
        warn!("No level {SUMMARY_LEVEL} in forces report; levels present: {found:?}");
    }
    level.map(ForcesSummary::from_level)
}

/// A drag value with the text it was printed as
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragValue {
    pub text: String,
    pub value: f64,
}

/// Wave drag of the upper and lower surface blocks
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WaveDrag {
    pub upper: Option<DragValue>,
    pub lower: Option<DragValue>,

    /// `upper + lower`, only when both were printed
    pub total: Option<f64>,
}

impl WaveDrag {
    /// The first two block totals are the upper and lower surface
    pub fn parse(text: &str) -> Self {
        let mut totals = text.lines().filter_map(|line| {
            WAVE_DRAG_TOTAL.find_str(line).and_then(|s| {
                s.parse().ok().map(|value| DragValue {
                    text: s.to_string(),
                    value,
                })
            })
        });
        let upper = totals.next();
        let lower = totals.next();
        let total = match (&upper, &lower) {
            (Some(u), Some(l)) => Some(u.value + l.value),
            _ => None,
        };
        Self {
            upper,
            lower,
            total,
        }
    }

    pub fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::parse(&text))
    }
}

/// Angle of attack encoded in a case file name (`...M085Re5p0ma-1p50...`),
/// rounded to four decimals
pub fn aoa_from_file_name(name: &str) -> Option<f64> {
    let caps = CASE_AOA.captures(name)?;
    let aoa = decode_angle(&caps[1])?;
    Some((aoa * 1e4).round() / 1e4)
}

/// One tabulated case
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaseSummary {
    pub name: String,
    pub aoa: Option<f64>,
    pub forces: Option<ForcesSummary>,
    pub wave_drag: Option<WaveDrag>,
}
