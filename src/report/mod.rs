//! Solver report parsers (forces, cp, vis) and summaries.
//!
//! The three reports are free text printed once per multigrid level. Every
//! level starts on a line carrying `LEV=`, and a level's content runs to the
//! next such line. Parsing is lenient: anything a report does not print
//! comes back as `None` or an empty table, never as a made-up zero.

pub mod cp;
pub mod forces;
pub mod summary;
pub mod vis;

#[cfg(test)]
mod tests;

pub use cp::{CpLevel, CpReport, CpRow, CpSection, StationCoefficients, VortexWake, WakeRow};
pub use forces::{
    ForcesLevel, ForcesReport, IbeCoefficients, SpanwiseRow, VfpCoefficients, ViscousDragTable,
    ViscousRow, VortexCoefficients,
};
pub use summary::{ForcesSummary, WaveDrag};
pub use vis::{BoundaryLayerRow, VisFlowConditions, VisLevel, VisReport, VisSection};

use crate::config::{LevelPolicy, ReportConfig};
use crate::constants::report::{ALPHA_LABEL, ITERATIONS_LABEL, LEVEL_MARKER, MACH_LABEL};
use crate::fields::{LabeledInt, LabeledValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::{debug, warn};

static LEVEL: LazyLock<LabeledInt> = LazyLock::new(|| LabeledInt::new("LEV"));
static ITERATIONS: LazyLock<LabeledInt> = LazyLock::new(|| LabeledInt::new(ITERATIONS_LABEL));
static MACH: LazyLock<LabeledValue> = LazyLock::new(|| LabeledValue::new(MACH_LABEL));
static ALPHA: LazyLock<LabeledValue> = LazyLock::new(|| LabeledValue::new(ALPHA_LABEL));

/// A parsed report: levels keyed by level number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverReport<L> {
    /// First non-empty line of the file (cp and vis reports only)
    pub title: Option<String>,
    pub levels: BTreeMap<u32, L>,
}

impl<L> SolverReport<L> {
    /// A report in which no level was found
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn level(&self, number: u32) -> Option<&L> {
        self.levels.get(&number)
    }

    pub fn level_numbers(&self) -> impl Iterator<Item = u32> + '_ {
        self.levels.keys().copied()
    }
}

/// Fields of a level header line. Each is looked up independently, so a
/// header that omits one still yields the others.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelHeader {
    pub number: u32,
    pub iterations: Option<u32>,
    pub mach: Option<f64>,
    pub alpha: Option<f64>,
    pub raw: String,
}

impl LevelHeader {
    /// `None` when the line has no usable `LEV=` number
    pub fn parse(line: &str) -> Option<Self> {
        let number = LEVEL.find(line).and_then(|n| u32::try_from(n).ok())?;
        Some(Self {
            number,
            iterations: ITERATIONS.find(line).and_then(|n| u32::try_from(n).ok()),
            mach: MACH.find(line),
            alpha: ALPHA.find(line),
            raw: line.trim().to_string(),
        })
    }
}

/// The lines of one level, after its header line
#[derive(Debug, Clone)]
pub(crate) struct LevelSegment<'a> {
    pub header: LevelHeader,
    pub body: &'a [&'a str],

    /// Zero-based index of the first body line in the file
    pub offset: usize,
}

pub(crate) fn is_level_line(line: &str) -> bool {
    line.contains(LEVEL_MARKER)
}

/// Cut a report into level segments. A `LEV=` line without a level number
/// still ends the previous segment but opens none.
pub(crate) fn segments<'a>(lines: &'a [&'a str]) -> Vec<LevelSegment<'a>> {
    let starts: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| is_level_line(line))
        .map(|(i, _)| i)
        .collect();

    let mut segments = Vec::with_capacity(starts.len());
    for (k, &start) in starts.iter().enumerate() {
        let end = starts.get(k + 1).copied().unwrap_or(lines.len());
        match LevelHeader::parse(lines[start]) {
            Some(header) => segments.push(LevelSegment {
                header,
                body: &lines[start + 1..end],
                offset: start + 1,
            }),
            None => debug!("Line {}: level marker without a level number", start + 1),
        }
    }
    segments
}

/// Parse every accepted level, keyed by number. The later of two levels
/// with the same number wins.
pub(crate) fn collect_levels<L>(
    lines: &[&str],
    config: &ReportConfig,
    kind: &str,
    parse_level: impl Fn(&LevelSegment) -> L,
) -> BTreeMap<u32, L> {
    let mut levels = BTreeMap::new();
    for segment in segments(lines) {
        let number = segment.header.number;
        if !config.levels.accepts(number) {
            continue;
        }
        if levels.insert(number, parse_level(&segment)).is_some() {
            warn!("{kind} report repeats level {number}; keeping the later one");
        }
    }

    if let LevelPolicy::Only(wanted) = config.levels {
        if levels.is_empty() {
            warn!("{kind} report has no level {wanted}");
        }
    }
    debug!("Parsed {} {} levels", levels.len(), kind);
    levels
}

/// First non-empty line, trimmed
pub(crate) fn title(lines: &[&str]) -> Option<String> {
    lines
        .iter()
        .map(|line| line.trim())
        .find(|line| !line.is_empty())
        .map(str::to_string)
}
