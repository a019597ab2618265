//! Angle-of-attack sweeps
//!
//! A sweep derives one flow file per angle from a base file. Away from zero
//! incidence each member keeps only the last (finest) level and can be
//! flagged to restart from a previous solution; the zero-incidence member is
//! a cold start and keeps every level.

use super::filename::FlowFileName;
use super::model::{FlowConditionFile, FlowEntry, LevelBlock};
use crate::config::{FlowLayout, SweepOptions};
use crate::constants::flow::{CONDITION_PRECISION, ZERO_AOA_TOLERANCE};
use crate::error::{Result, VfpError};
use serde::Serialize;
use tracing::{debug, warn};

/// One file of a sweep
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepMember {
    pub index: usize,
    pub aoa: f64,

    /// Every level was kept (zero incidence)
    pub full: bool,

    /// A level header matched the base conditions and was rewritten
    pub substituted: bool,

    /// The retained level was flagged as a continuation run
    pub continuation: bool,

    pub file: FlowConditionFile,
}

impl SweepMember {
    /// File name of this member, derived from the base case's name
    pub fn file_name(&self, base: &FlowFileName) -> String {
        base.with_aoa(self.aoa)
    }
}

/// Derive `count + 1` flow files at `base_aoa + i * step`.
pub fn derive_sweep(
    file: &FlowConditionFile,
    base_mach: f64,
    base_aoa: f64,
    step: f64,
    count: usize,
    options: &SweepOptions,
    layout: &FlowLayout,
) -> Result<Vec<SweepMember>> {
    if !(base_mach.is_finite() && base_aoa.is_finite() && step.is_finite()) {
        return Err(VfpError::Configuration {
            message: format!(
                "sweep needs finite conditions, got Mach {base_mach}, AoA {base_aoa}, step {step}"
            ),
        });
    }

    let matcher = ConditionMatch::new(base_mach, base_aoa);
    let mut members = Vec::with_capacity(count + 1);

    for index in 0..=count {
        let mut aoa = base_aoa + index as f64 * step;
        let full = aoa.abs() < ZERO_AOA_TOLERANCE;
        if full {
            aoa = 0.0;
        }

        let mut member = if full {
            file.clone()
        } else {
            keep_last_level(file)
        };

        let substituted = member
            .levels_mut()
            .find(|block| matcher.matches(block, layout))
            .map(|block| rewrite_aoa(block, aoa, layout))
            .is_some();
        if !substituted {
            warn!(
                "No level header at Mach {:.4}, AoA {:.4}; member {} left at its original angle",
                base_mach, base_aoa, index
            );
        }

        let continuation = options.mark_continuation
            && index > 0
            && !full
            && member
                .levels_mut()
                .last()
                .is_some_and(|block| mark_continuation(block, layout));

        debug!(
            "Sweep member {}: AoA {:.4}, {} levels, continuation {}",
            index,
            aoa,
            member.level_count(),
            continuation
        );
        members.push(SweepMember {
            index,
            aoa,
            full,
            substituted,
            continuation,
            file: member,
        });
    }

    Ok(members)
}

/// Title, count line, fuselage, filler before the first level, then the
/// last level and whatever follows it.
fn keep_last_level(file: &FlowConditionFile) -> FlowConditionFile {
    let is_level = |entry: &FlowEntry| matches!(entry, FlowEntry::Level(_));
    let (Some(first), Some(last)) = (
        file.entries.iter().position(is_level),
        file.entries.iter().rposition(is_level),
    ) else {
        return file.clone();
    };

    let entries = file.entries[..first]
        .iter()
        .chain(&file.entries[last..])
        .cloned()
        .collect();
    FlowConditionFile {
        title: file.title.clone(),
        count_line: file.count_line.clone(),
        fuselage: file.fuselage.clone(),
        entries,
    }
}

/// Compares header conditions the way they are printed, to four decimals
struct ConditionMatch {
    mach: String,
    aoa: String,
}

impl ConditionMatch {
    fn new(mach: f64, aoa: f64) -> Self {
        Self {
            mach: format_condition(mach),
            aoa: format_condition(aoa),
        }
    }

    fn matches(&self, block: &LevelBlock, layout: &FlowLayout) -> bool {
        block.mach(layout).map(format_condition).as_ref() == Some(&self.mach)
            && block.aoa(layout).map(format_condition).as_ref() == Some(&self.aoa)
    }
}

fn format_condition(value: f64) -> String {
    // -0.0000 and 0.0000 are the same condition
    let value = if value == 0.0 { 0.0 } else { value };
    let precision = CONDITION_PRECISION;
    let text = format!("{value:.precision$}");
    if text.trim_start_matches('-').bytes().all(|b| b == b'0' || b == b'.') {
        text.trim_start_matches('-').to_string()
    } else {
        text
    }
}

/// Replace the AoA field in place, right-justified into the columns of the
/// field and the blanks before it.
fn rewrite_aoa(block: &mut LevelBlock, aoa: f64, layout: &FlowLayout) {
    let (Some((_, prev_end)), Some((_, end))) = (
        block.field_span(layout.aoa_field.saturating_sub(1)),
        block.field_span(layout.aoa_field),
    ) else {
        return;
    };

    let value = format_condition(aoa);
    // keep at least one blank between fields
    let width = (end - prev_end).max(value.len() + 1);
    let header = &block.lines[0];
    let rewritten = format!("{}{value:>width$}{}", &header[..prev_end], &header[end..]);
    block.lines[0] = rewritten;
}

/// Flip the leading `0` of the restart field to `1`
fn mark_continuation(block: &mut LevelBlock, layout: &FlowLayout) -> bool {
    let Some((start, _)) = block.field_span(layout.restart_field) else {
        return false;
    };
    let header = &mut block.lines[0];
    if header.as_bytes()[start] != b'0' {
        return false;
    }
    header.replace_range(start..start + 1, "1");
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(header: &str) -> LevelBlock {
        LevelBlock {
            lines: vec![header.to_string()],
        }
    }

    #[test]
    fn test_rewrite_keeps_columns() {
        let layout = FlowLayout::default();
        let mut level = block("    2   0.8500  -1.0000    1    0");
        rewrite_aoa(&mut level, 0.5, &layout);
        assert_eq!(level.header(), "    2   0.8500   0.5000    1    0");
        rewrite_aoa(&mut level, -12.25, &layout);
        assert_eq!(level.header(), "    2   0.8500 -12.2500    1    0");
    }

    #[test]
    fn test_rewrite_widens_only_when_needed() {
        let layout = FlowLayout::default();
        let mut level = block("2 0.85 1.0 1 0");
        rewrite_aoa(&mut level, -1.5, &layout);
        assert_eq!(level.header(), "2 0.85 -1.5000 1 0");
    }

    #[test]
    fn test_condition_match_ignores_zero_sign() {
        let layout = FlowLayout::default();
        let matcher = ConditionMatch::new(0.85, 0.0);
        assert!(matcher.matches(&block("2 0.85000 -0.0000 1 0"), &layout));
        assert!(matcher.matches(&block("2 0.8500 0.00001 1 0"), &layout));
        assert!(!matcher.matches(&block("2 0.8400 0.0000 1 0"), &layout));
    }

    #[test]
    fn test_mark_continuation_only_flips_zero() {
        let layout = FlowLayout::default();
        let mut level = block("    2   0.8500   1.0000    1    0   50");
        assert!(mark_continuation(&mut level, &layout));
        assert_eq!(level.header(), "    2   0.8500   1.0000    1    1   50");
        assert!(!mark_continuation(&mut level, &layout));
    }

    #[test]
    fn test_non_finite_step_rejected() {
        let result = derive_sweep(
            &FlowConditionFile::default(),
            0.85,
            0.0,
            f64::NAN,
            2,
            &SweepOptions::default(),
            &FlowLayout::default(),
        );
        assert!(matches!(result, Err(VfpError::Configuration { .. })));
    }
}
