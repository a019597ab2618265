//! Pressure distribution report (`.cp`)
//!
//! Per level, one section per spanwise station (`J= n`): station
//! coefficients on the section line, the surface pressure table, then any
//! number of vortex sheet tables.

use super::{LevelHeader, LevelSegment, SolverReport, collect_levels, is_level_line, title};
use crate::config::ReportConfig;
use crate::constants::cp::*;
use crate::cursor::LineCursor;
use crate::error::Result;
use crate::fields::{LabeledInt, LabeledValue, numeric_row};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, warn};

pub type CpReport = SolverReport<CpLevel>;

/// Coefficients printed on a section line; any may be missing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StationCoefficients {
    pub yave: Option<f64>,
    pub cl: Option<f64>,
    pub cd: Option<f64>,
    pub cm: Option<f64>,
    pub chord: Option<f64>,
    pub twist: Option<f64>,
    pub gam: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpRow {
    pub x_c: f64,
    pub z_c: f64,
    pub cp: f64,
    pub p_h: f64,
    pub m: f64,
    pub q: f64,
    pub phi: f64,
    pub y_ytip: f64,
    pub xphys: f64,
    pub zphys: f64,
    pub vt: f64,
    pub valp: f64,
}

impl CpRow {
    fn from_values(v: &[f64]) -> Self {
        Self {
            x_c: v[0],
            z_c: v[1],
            cp: v[2],
            p_h: v[3],
            m: v[4],
            q: v[5],
            phi: v[6],
            y_ytip: v[7],
            xphys: v[8],
            zphys: v[9],
            vt: v[10],
            valp: v[11],
        }
    }
}

/// One point on a vortex sheet surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WakeRow {
    pub x_c: f64,
    pub z_c: f64,
    pub cp: f64,
    pub p_h: f64,
    pub m: f64,
    pub q: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VortexWake {
    pub upper: Vec<WakeRow>,
    pub lower: Vec<WakeRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpSection {
    /// The `J=` line as printed
    pub header: String,
    pub coefficients: StationCoefficients,
    pub rows: Vec<CpRow>,
    pub vortex_wake: VortexWake,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpLevel {
    pub header: LevelHeader,
    pub sections: BTreeMap<u32, CpSection>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Surface {
    Upper,
    Lower,
}

impl Surface {
    /// Column group of this surface in a full ten-column sheet row
    fn group(self) -> usize {
        match self {
            Surface::Upper => 0,
            Surface::Lower => 1,
        }
    }
}

struct StationLabels {
    station: LabeledInt,
    values: Vec<LabeledValue>,
}

static LABELS: LazyLock<StationLabels> = LazyLock::new(|| StationLabels {
    station: LabeledInt::new("J"),
    values: STATION_LABELS.iter().map(|label| LabeledValue::new(label)).collect(),
});

pub fn parse(text: &str, config: &ReportConfig) -> CpReport {
    let lines: Vec<&str> = text.lines().collect();
    SolverReport {
        title: title(&lines),
        levels: collect_levels(&lines, config, "cp", parse_level),
    }
}

pub fn read(path: &Path, config: &ReportConfig) -> Result<CpReport> {
    let text = std::fs::read_to_string(path)?;
    Ok(parse(&text, config))
}

fn is_section_line(line: &str) -> bool {
    line.trim_start().starts_with(SECTION_MARKER)
}

fn is_banner(line: &str) -> bool {
    line.contains(UPPER_SHEET_BANNER) || line.contains(LOWER_SHEET_BANNER)
}

/// A column-name line rather than data
fn is_column_header(line: &str) -> bool {
    line.split_whitespace()
        .next()
        .is_some_and(|token| token.parse::<f64>().is_err())
}

fn parse_level(segment: &LevelSegment) -> CpLevel {
    let mut cursor = LineCursor::with_offset(segment.body, segment.offset);
    let mut sections = BTreeMap::new();

    while cursor.advance_until(is_section_line).is_some() {
        let line_number = cursor.line_number();
        let Some((number, section)) = parse_section(&mut cursor) else {
            debug!("Line {line_number}: section line without a station number");
            continue;
        };
        if sections.insert(number, section).is_some() {
            warn!("Line {line_number}: station J={number} repeated; keeping the later one");
        }
    }

    CpLevel {
        header: segment.header.clone(),
        sections,
    }
}

/// Parse the section at the cursor. Consumes at least the section line.
fn parse_section(cursor: &mut LineCursor) -> Option<(u32, CpSection)> {
    let line = cursor.take()?;
    let labels = &*LABELS;
    let number = labels.station.find(line).and_then(|n| u32::try_from(n).ok())?;

    let values: Vec<Option<f64>> = labels.values.iter().map(|l| l.find(line)).collect();
    let coefficients = StationCoefficients {
        yave: values[0],
        cl: values[1],
        cd: values[2],
        cm: values[3],
        chord: values[4],
        twist: values[5],
        gam: values[6],
    };

    cursor.skip_blank();
    if cursor.peek().is_some_and(|l| !is_banner(l) && is_column_header(l)) {
        cursor.take();
    }

    let mut rows = Vec::new();
    while let Some(line) = cursor.peek() {
        if line.trim().is_empty() || is_banner(line) || is_section_line(line) {
            break;
        }
        match numeric_row(line, TABLE_COLUMNS.len()) {
            Some(values) => rows.push(CpRow::from_values(&values)),
            None => debug!("Line {}: skipping cp row", cursor.line_number()),
        }
        cursor.take();
    }

    let mut vortex_wake = VortexWake::default();
    loop {
        cursor.skip_blank();
        match cursor.peek() {
            Some(line) if is_banner(line) => {
                cursor.take();
                read_sheet(cursor, &sheet_groups(line), &mut vortex_wake);
            }
            _ => break,
        }
    }

    Some((
        number,
        CpSection {
            header: line.trim().to_string(),
            coefficients,
            rows,
            vortex_wake,
        },
    ))
}

/// `CP P/H M Q` group of each surface named on a banner line.
///
/// A banner naming both surfaces assigns groups in the order they are
/// named. A banner naming one surface reads that surface's own group: the
/// first for the upper sheet, the second for the lower.
fn sheet_groups(line: &str) -> Vec<(Surface, usize)> {
    let mut named: Vec<(usize, Surface)> = [
        (line.find(UPPER_SHEET_BANNER), Surface::Upper),
        (line.find(LOWER_SHEET_BANNER), Surface::Lower),
    ]
    .into_iter()
    .filter_map(|(pos, surface)| pos.map(|p| (p, surface)))
    .collect();
    named.sort_by_key(|(pos, _)| *pos);

    match named.as_slice() {
        [(_, surface)] => vec![(*surface, surface.group())],
        _ => named
            .into_iter()
            .enumerate()
            .map(|(group, (_, surface))| (surface, group))
            .collect(),
    }
}

/// Rows of one vortex sheet table: `X/C Z/C` then the `CP P/H M Q` groups
fn read_sheet(cursor: &mut LineCursor, groups: &[(Surface, usize)], wake: &mut VortexWake) {
    if cursor.peek().is_some_and(|l| !is_banner(l) && is_column_header(l)) {
        cursor.take();
    }

    let used = groups.iter().map(|(_, group)| group + 1).max().unwrap_or(0);
    let arity = (2 + 4 * used).min(WAKE_COLUMNS);
    while let Some(line) = cursor.peek() {
        if line.trim().is_empty() || is_banner(line) || is_section_line(line) || is_level_line(line)
        {
            break;
        }
        match numeric_row(line, arity) {
            Some(values) => {
                for &(surface, group) in groups {
                    let g = &values[2 + 4 * group..];
                    let row = WakeRow {
                        x_c: values[0],
                        z_c: values[1],
                        cp: g[0],
                        p_h: g[1],
                        m: g[2],
                        q: g[3],
                    };
                    match surface {
                        Surface::Upper => wake.upper.push(row),
                        Surface::Lower => wake.lower.push(row),
                    }
                }
            }
            None => debug!("Line {}: skipping vortex sheet row", cursor.line_number()),
        }
        cursor.take();
    }
}
