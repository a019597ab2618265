//! Flow condition (`.dat`) reader and writer
//!
//! Line 1 is a title. Line 2 is either a fuselage count followed by that
//! many fuselage lines, or already part of the body. In the body every line
//! whose first token is the level token opens a level block of fixed length;
//! anything else is filler that is carried through untouched.

use super::model::{FlowConditionFile, FlowEntry, LevelBlock};
use crate::config::FlowLayout;
use crate::cursor::LineCursor;
use crate::error::{Result, VfpError};
use tracing::debug;

pub fn parse(text: &str, layout: &FlowLayout) -> Result<FlowConditionFile> {
    let lines: Vec<&str> = text.lines().collect();
    let mut cursor = LineCursor::new(&lines);

    let title = cursor.expect("title line")?.to_string();
    let mut file = FlowConditionFile {
        title,
        ..FlowConditionFile::default()
    };

    if let Some(count) = cursor.peek().and_then(|line| line.trim().parse::<i64>().ok()) {
        let line_number = cursor.line_number();
        file.count_line = cursor.take().map(str::to_string);
        let count = usize::try_from(count).map_err(|_| {
            VfpError::format(line_number, format!("negative fuselage line count {count}"))
        })?;
        file.fuselage = cursor
            .expect_n(count, "fuselage block")?
            .iter()
            .map(|line| line.to_string())
            .collect();
    }

    while let Some(line) = cursor.peek() {
        if starts_level(line, layout) {
            let block = cursor.expect_n(layout.block_lines, "level block")?;
            file.entries.push(FlowEntry::Level(LevelBlock {
                lines: block.iter().map(|line| line.to_string()).collect(),
            }));
        } else {
            cursor.take();
            file.entries.push(FlowEntry::Filler(line.to_string()));
        }
    }

    debug!(
        "Parsed flow file '{}': {} fuselage lines, {} levels, {} filler lines",
        file.title.trim(),
        file.fuselage.len(),
        file.level_count(),
        file.entries.len() - file.level_count()
    );
    Ok(file)
}

fn starts_level(line: &str, layout: &FlowLayout) -> bool {
    line.split_whitespace().next() == Some(layout.level_token.as_str())
}

/// Re-emit every line in its original order
pub fn serialize(file: &FlowConditionFile) -> String {
    let mut out = String::new();
    let mut push = |line: &str| {
        out.push_str(line);
        out.push('\n');
    };

    push(&file.title);
    if let Some(count_line) = &file.count_line {
        push(count_line);
    }
    file.fuselage.iter().for_each(|line| push(line));
    for entry in &file.entries {
        match entry {
            FlowEntry::Level(block) => block.lines.iter().for_each(|line| push(line)),
            FlowEntry::Filler(line) => push(line),
        }
    }
    out
}
