//! Boundary layer report (`.vis`)

use super::{LevelHeader, LevelSegment, SolverReport, collect_levels, title};
use crate::config::ReportConfig;
use crate::constants::vis::*;
use crate::cursor::LineCursor;
use crate::error::Result;
use crate::fields::{LabeledInt, LabeledValue, numeric_row, parse_real};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, warn};

pub type VisReport = SolverReport<VisLevel>;

/// Free-stream conditions printed under each level header
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisFlowConditions {
    pub mach: Option<f64>,
    pub incidence: Option<f64>,
    pub reynolds: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryLayerRow {
    pub i: f64,
    pub x_c: f64,
    pub cp: f64,
    pub u_inv: f64,
    pub u_vis: f64,
    pub theta_c: f64,
    pub dis_c: f64,
    pub h: f64,
    pub cf: f64,
    pub v_ue: f64,
    pub flow_angle: f64,
    pub beta: f64,
    pub vn: f64,
    pub dvn: f64,
}

impl BoundaryLayerRow {
    fn from_values(v: &[f64]) -> Self {
        Self {
            i: v[0],
            x_c: v[1],
            cp: v[2],
            u_inv: v[3],
            u_vis: v[4],
            theta_c: v[5],
            dis_c: v[6],
            h: v[7],
            cf: v[8],
            v_ue: v[9],
            flow_angle: v[10],
            beta: v[11],
            vn: v[12],
            dvn: v[13],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisSection {
    /// The `Span j-2` line as printed
    pub header: String,
    pub span_index: u32,
    pub eta: Option<f64>,
    pub chord: Option<f64>,
    pub rows: Vec<BoundaryLayerRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisLevel {
    pub header: LevelHeader,
    pub flow: VisFlowConditions,
    pub sections: BTreeMap<u32, VisSection>,
}

struct SectionLabels {
    span: LabeledInt,
    eta: LabeledValue,
    chord: LabeledValue,
}

static LABELS: LazyLock<SectionLabels> = LazyLock::new(|| SectionLabels {
    span: LabeledInt::new(SPAN_LABEL),
    eta: LabeledValue::new(ETA_LABEL),
    chord: LabeledValue::new(CHORD_LABEL),
});

pub fn parse(text: &str, config: &ReportConfig) -> VisReport {
    let lines: Vec<&str> = text.lines().collect();
    SolverReport {
        title: title(&lines),
        levels: collect_levels(&lines, config, "vis", parse_level),
    }
}

pub fn read(path: &Path, config: &ReportConfig) -> Result<VisReport> {
    let text = std::fs::read_to_string(path)?;
    Ok(parse(&text, config))
}

fn is_section_line(line: &str) -> bool {
    line.trim_start().starts_with(SECTION_MARKER)
}

/// Value after the colon of a `NAME : value` line
fn colon_value(lines: &[&str], name: &str) -> Option<f64> {
    lines
        .iter()
        .find(|line| line.contains(name))
        .and_then(|line| line.split_once(':'))
        .and_then(|(_, value)| parse_real(value))
}

fn parse_level(segment: &LevelSegment) -> VisLevel {
    // conditions are printed before the first section
    let preamble_end = segment
        .body
        .iter()
        .position(|line| is_section_line(line))
        .unwrap_or(segment.body.len());
    let preamble = &segment.body[..preamble_end];
    let flow = VisFlowConditions {
        mach: colon_value(preamble, MACH_LINE),
        incidence: colon_value(preamble, INCIDENCE_LINE),
        reynolds: colon_value(preamble, REYNOLDS_LINE),
    };

    let mut cursor = LineCursor::with_offset(segment.body, segment.offset);
    let mut sections = BTreeMap::new();
    while cursor.advance_until(is_section_line).is_some() {
        let line_number = cursor.line_number();
        let Some(section) = parse_section(&mut cursor) else {
            debug!("Line {line_number}: span line without a span index");
            continue;
        };
        let span = section.span_index;
        if sections.insert(span, section).is_some() {
            warn!("Line {line_number}: span {span} repeated; keeping the later one");
        }
    }

    VisLevel {
        header: segment.header.clone(),
        flow,
        sections,
    }
}

fn parse_section(cursor: &mut LineCursor) -> Option<VisSection> {
    let line = cursor.take()?;
    let labels = &*LABELS;
    let span_index = labels.span.find(line).and_then(|n| u32::try_from(n).ok())?;

    cursor.skip_blank();
    if cursor.peek().is_some_and(|l| {
        !is_section_line(l)
            && l.split_whitespace()
                .next()
                .is_some_and(|token| parse_real(token).is_none())
    }) {
        cursor.take();
    }

    let mut rows = Vec::new();
    while let Some(row) = cursor.peek() {
        if row.trim().is_empty() || is_section_line(row) {
            break;
        }
        match numeric_row(row, TABLE_COLUMNS.len()) {
            Some(values) => rows.push(BoundaryLayerRow::from_values(&values)),
            None => debug!("Line {}: skipping boundary layer row", cursor.line_number()),
        }
        cursor.take();
    }

    Some(VisSection {
        header: line.trim().to_string(),
        span_index,
        eta: labels.eta.find(line),
        chord: labels.chord.find(line),
        rows,
    })
}
