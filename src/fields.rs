//! Field extraction helpers shared by the format parsers
//!
//! Three techniques cover every format:
//! - labeled scalars (`LABEL = -0.1234`) found anywhere on a line,
//! - fixed-arity numeric rows (tables),
//! - Fortran-style fields that are normally whitespace separated but may
//!   touch when a value fills its whole column.

use crate::error::{Result, VfpError};
use regex::Regex;

/// Matcher for a `LABEL = value` scalar with a signed decimal value
#[derive(Debug, Clone)]
pub struct LabeledValue {
    label: String,
    regex: Regex,
}

impl LabeledValue {
    pub fn new(label: &str) -> Self {
        Self::with_value_pattern(label, r"(-?\d+\.\d+)")
    }

    fn with_value_pattern(label: &str, value: &str) -> Self {
        // Labels start with a letter, so a preceding letter or digit means the
        // label is the tail of a longer one ("DCD(vortd)" is not "CD(vortd)").
        let pattern = format!(r"(?:^|[^A-Za-z0-9_]){}\s*=\s*{}", regex::escape(label), value);
        // escaped literal plus a fixed value expression
        let regex = Regex::new(&pattern).unwrap_or_else(|e| {
            unreachable!("labeled value pattern for {label:?} rejected: {e}")
        });
        Self {
            label: label.to_string(),
            regex,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Value on this line, if the label is present with a decimal value
    pub fn find(&self, line: &str) -> Option<f64> {
        self.find_str(line).and_then(|s| s.parse().ok())
    }

    /// Value text as printed, preserving every decimal place
    pub fn find_str<'l>(&self, line: &'l str) -> Option<&'l str> {
        self.regex
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}

/// Matcher for a `LABEL = 12` integer scalar
#[derive(Debug, Clone)]
pub struct LabeledInt(LabeledValue);

impl LabeledInt {
    pub fn new(label: &str) -> Self {
        Self(LabeledValue::with_value_pattern(label, r"(-?\d+)"))
    }

    pub fn find(&self, line: &str) -> Option<i64> {
        self.0.find_str(line).and_then(|s| s.parse().ok())
    }
}

/// Parse a real the way the solver prints it, accepting Fortran `D` exponents
pub fn parse_real(token: &str) -> Option<f64> {
    let token = token.trim();
    if token.contains(['D', 'd']) {
        token.replace(['D', 'd'], "E").parse().ok()
    } else {
        token.parse().ok()
    }
}

/// First `arity` tokens of a table row as reals, or `None` if the row is
/// short or any of those tokens is not numeric
pub fn numeric_row(line: &str, arity: usize) -> Option<Vec<f64>> {
    let tokens: Vec<&str> = line.split_whitespace().take(arity).collect();
    if tokens.len() < arity {
        return None;
    }
    tokens.into_iter().map(parse_real).collect()
}

/// Split a line into at least `widths.len()` fields.
///
/// Whitespace separation is tried first. When fields touch (a value that
/// fills its whole column leaves no separating blank) the line is cut at the
/// fixed column widths instead.
pub fn split_fields<'l>(line: &'l str, widths: &[usize]) -> Vec<&'l str> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() >= widths.len() {
        return tokens;
    }

    let mut fields = Vec::with_capacity(widths.len());
    let mut start = 0;
    for width in widths {
        let end = (start + width).min(line.len());
        match line.get(start..end) {
            Some(field) if !field.trim().is_empty() => fields.push(field.trim()),
            _ => {}
        }
        start = end;
    }
    fields
}

/// Split a line into fields and require at least `widths.len()` of them
pub fn require_fields<'l>(
    line: &'l str,
    widths: &[usize],
    line_number: usize,
    what: &str,
) -> Result<Vec<&'l str>> {
    let fields = split_fields(line, widths);
    if fields.len() < widths.len() {
        return Err(VfpError::format(
            line_number,
            format!(
                "{what}: expected {} fields, found {}",
                widths.len(),
                fields.len()
            ),
        ));
    }
    Ok(fields)
}

/// Parse a required real field
pub fn real_field(token: &str, line_number: usize) -> Result<f64> {
    parse_real(token).ok_or_else(|| VfpError::numeric(line_number, token))
}

/// Parse a required integer field
pub fn int_field(token: &str, line_number: usize) -> Result<i64> {
    token
        .trim()
        .parse()
        .map_err(|_| VfpError::numeric(line_number, token))
}

/// Parse a required non-negative count field
pub fn count_field(token: &str, line_number: usize) -> Result<usize> {
    let value = int_field(token, line_number)?;
    usize::try_from(value).map_err(|_| {
        VfpError::format(line_number, format!("count must not be negative, found {value}"))
    })
}
