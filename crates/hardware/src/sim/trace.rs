//! Branch Trace Format.
//!
//! A trace is UTF-8 text with one resolved branch per line:
//!
//! ```text
//! # ip        target      outcome  kind   [core]
//! 0x401000    0x401200    T        call
//! 0x401204    0x401008    T        ret    0
//! 401010      0           N        cond   1
//! ```
//!
//! Addresses are hexadecimal with an optional `0x` prefix. The outcome is
//! `T`/`N` (`1`/`0` and `taken`/`not_taken` are also accepted). The kind is a
//! [`BranchKind`] mnemonic. The core id is decimal and defaults to 0; nothing
//! may follow it. Blank lines and lines starting with `#` are ignored.

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

use crate::common::error::TraceError;
use crate::core::units::bru::BranchKind;

/// One resolved branch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BranchRecord {
    /// Address of the branch instruction.
    pub ip: u64,
    /// Resolved target address.
    pub target: u64,
    /// Whether the branch was taken.
    pub taken: bool,
    /// Class of the branch.
    pub kind: BranchKind,
    /// Core that executed the branch.
    pub core: usize,
}

impl fmt::Display for BranchRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:#x} {:#x} {} {} {}",
            self.ip,
            self.target,
            if self.taken { 'T' } else { 'N' },
            self.kind,
            self.core
        )
    }
}

/// Parses a hexadecimal address column.
fn parse_address(text: &str, line: usize) -> Result<u64, TraceError> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    u64::from_str_radix(digits, 16).map_err(|_| TraceError::BadAddress {
        line,
        value: text.to_owned(),
    })
}

/// Parses an outcome column.
fn parse_outcome(text: &str, line: usize) -> Result<bool, TraceError> {
    match text.to_ascii_lowercase().as_str() {
        "t" | "1" | "taken" => Ok(true),
        "n" | "0" | "not_taken" | "nottaken" => Ok(false),
        _ => Err(TraceError::BadOutcome {
            line,
            value: text.to_owned(),
        }),
    }
}

/// Parses one trace line.
///
/// # Arguments
///
/// * `text` - The line, without its terminator.
/// * `line` - 1-based line number, used in error reports.
///
/// # Returns
///
/// `Ok(None)` for blank and comment lines.
///
/// # Errors
///
/// Returns a [`TraceError`] naming the line if a column is missing or malformed.
pub fn parse_line(text: &str, line: usize) -> Result<Option<BranchRecord>, TraceError> {
    let text = text.trim();
    if text.is_empty() || text.starts_with('#') {
        return Ok(None);
    }

    let mut fields = text.split_whitespace();
    let mut next = |field: &'static str| {
        fields
            .next()
            .ok_or(TraceError::MissingField { line, field })
    };

    let ip = parse_address(next("ip")?, line)?;
    let target = parse_address(next("target")?, line)?;
    let taken = parse_outcome(next("outcome")?, line)?;
    let kind_text = next("kind")?;
    let kind = BranchKind::from_name(kind_text).ok_or_else(|| TraceError::UnknownKind {
        line,
        value: kind_text.to_owned(),
    })?;
    let core = match fields.next() {
        Some(id) => id.parse().map_err(|_| TraceError::BadCore {
            line,
            value: id.to_owned(),
        })?,
        None => 0,
    };
    if let Some(extra) = fields.next() {
        return Err(TraceError::TrailingField {
            line,
            value: extra.to_owned(),
        });
    }

    Ok(Some(BranchRecord {
        ip,
        target,
        taken,
        kind,
        core,
    }))
}

/// Streaming trace parser over any buffered reader.
///
/// Yields one `Result` per branch record; comment and blank lines are skipped.
#[derive(Debug)]
pub struct TraceReader<R> {
    lines: Lines<R>,
    line: usize,
}

impl<R: BufRead> TraceReader<R> {
    /// Wraps a buffered reader.
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line: 0,
        }
    }

    /// Number of physical lines consumed so far.
    pub fn line(&self) -> usize {
        self.line
    }
}

impl TraceReader<BufReader<File>> {
    /// Opens a trace file.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::Io`] if the file cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TraceError> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = Result<BranchRecord, TraceError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let text = match self.lines.next()? {
                Ok(text) => text,
                Err(e) => return Some(Err(e.into())),
            };
            self.line += 1;
            match parse_line(&text, self.line) {
                Ok(Some(record)) => return Some(Ok(record)),
                Ok(None) => {}
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

/// Parses a complete in-memory trace.
///
/// # Errors
///
/// Returns the first [`TraceError`] encountered.
pub fn parse_str(text: &str) -> Result<Vec<BranchRecord>, TraceError> {
    TraceReader::new(text.as_bytes()).collect()
}
