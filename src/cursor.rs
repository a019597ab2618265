//! Forward-only line reader shared by every format parser.
//!
//! The cursor owns the position; parsers only ask for the next line, the
//! next `n` lines, or to skip ahead to a line of interest. Line numbers are
//! 1-based and account for the cursor's offset when it reads a slice taken
//! from the middle of a file.

use crate::error::{Result, VfpError};

/// Cursor over borrowed lines
#[derive(Debug, Clone)]
pub struct LineCursor<'a> {
    lines: &'a [&'a str],
    pos: usize,
    offset: usize,
}

impl<'a> LineCursor<'a> {
    /// Cursor over a whole file
    pub fn new(lines: &'a [&'a str]) -> Self {
        Self::with_offset(lines, 0)
    }

    /// Cursor over a slice whose first line is line `offset + 1` of its file
    pub fn with_offset(lines: &'a [&'a str], offset: usize) -> Self {
        Self {
            lines,
            pos: 0,
            offset,
        }
    }

    /// Next line without consuming it
    pub fn peek(&self) -> Option<&'a str> {
        self.lines.get(self.pos).copied()
    }

    /// Consume and return the next line
    pub fn take(&mut self) -> Option<&'a str> {
        let line = self.peek()?;
        self.pos += 1;
        Some(line)
    }

    /// Consume exactly `n` lines, or nothing if fewer remain
    pub fn take_n(&mut self, n: usize) -> Option<&'a [&'a str]> {
        if self.remaining() < n {
            return None;
        }
        let taken = &self.lines[self.pos..self.pos + n];
        self.pos += n;
        Some(taken)
    }

    /// Lines not yet consumed
    pub fn remaining(&self) -> usize {
        self.lines.len() - self.pos
    }

    pub fn is_eof(&self) -> bool {
        self.pos >= self.lines.len()
    }

    /// 1-based file line number of the next line
    pub fn line_number(&self) -> usize {
        self.offset + self.pos + 1
    }

    /// Step back over the line just taken
    pub fn rewind_one(&mut self) {
        self.pos = self.pos.saturating_sub(1);
    }

    /// Skip blank (whitespace-only) lines
    pub fn skip_blank(&mut self) {
        while self.peek().is_some_and(|line| line.trim().is_empty()) {
            self.pos += 1;
        }
    }

    /// Advance to the first line matching `pred`, leaving it unconsumed
    pub fn advance_until(&mut self, pred: impl Fn(&str) -> bool) -> Option<&'a str> {
        while let Some(line) = self.peek() {
            if pred(line) {
                return Some(line);
            }
            self.pos += 1;
        }
        None
    }

    /// Take the next line or fail with a format error naming what was expected
    pub fn expect(&mut self, what: &str) -> Result<&'a str> {
        let line_number = self.line_number();
        self.take().ok_or_else(|| {
            VfpError::format(line_number, format!("unexpected end of file, expected {what}"))
        })
    }

    /// Take exactly `n` lines or fail with a format error
    pub fn expect_n(&mut self, n: usize, what: &str) -> Result<&'a [&'a str]> {
        let line_number = self.line_number();
        let remaining = self.remaining();
        self.take_n(n).ok_or_else(|| {
            VfpError::format(
                line_number,
                format!("{what}: {n} lines declared but only {remaining} remain"),
            )
        })
    }
}
