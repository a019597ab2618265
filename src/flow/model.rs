//! Flow condition (`.dat`) file model

use crate::config::FlowLayout;
use crate::fields::parse_real;
use serde::{Deserialize, Serialize};

/// One fixed-length level block. The first line carries the level token,
/// the Mach number and the angle of attack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelBlock {
    pub lines: Vec<String>,
}

impl LevelBlock {
    pub fn header(&self) -> &str {
        self.lines.first().map(String::as_str).unwrap_or_default()
    }

    /// Whitespace-delimited field of the header line
    pub fn field(&self, index: usize) -> Option<&str> {
        self.header().split_whitespace().nth(index)
    }

    pub fn mach(&self, layout: &FlowLayout) -> Option<f64> {
        self.field(layout.mach_field).and_then(parse_real)
    }

    pub fn aoa(&self, layout: &FlowLayout) -> Option<f64> {
        self.field(layout.aoa_field).and_then(parse_real)
    }

    /// Byte span of a header field, for in-place column edits
    pub(crate) fn field_span(&self, index: usize) -> Option<(usize, usize)> {
        field_spans(self.header()).nth(index)
    }
}

/// Byte spans of the whitespace-delimited fields of a line
fn field_spans(line: &str) -> impl Iterator<Item = (usize, usize)> + '_ {
    let mut rest = line.char_indices().peekable();
    std::iter::from_fn(move || {
        while rest.next_if(|(_, c)| c.is_whitespace()).is_some() {}
        let (start, _) = *rest.peek()?;
        let mut end = start;
        while let Some((i, c)) = rest.next_if(|(_, c)| !c.is_whitespace()) {
            end = i + c.len_utf8();
        }
        Some((start, end))
    })
}

/// A line of the file body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FlowEntry {
    Level(LevelBlock),
    /// Passed through unmodified, e.g. the trailing `0` terminator
    Filler(String),
}

/// A complete flow condition file
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FlowConditionFile {
    pub title: String,

    /// The fuselage count line exactly as read (`None` when line 2 is not
    /// an integer)
    pub count_line: Option<String>,

    /// Fuselage block, empty when the count is zero
    pub fuselage: Vec<String>,

    pub entries: Vec<FlowEntry>,
}

impl FlowConditionFile {
    pub fn levels(&self) -> impl Iterator<Item = &LevelBlock> {
        self.entries.iter().filter_map(|entry| match entry {
            FlowEntry::Level(block) => Some(block),
            FlowEntry::Filler(_) => None,
        })
    }

    pub fn level_count(&self) -> usize {
        self.levels().count()
    }

    pub(crate) fn levels_mut(&mut self) -> impl Iterator<Item = &mut LevelBlock> {
        self.entries.iter_mut().filter_map(|entry| match entry {
            FlowEntry::Level(block) => Some(block),
            FlowEntry::Filler(_) => None,
        })
    }
}
