use std::io::{BufRead, Lines};
use lazy_static::lazy_static;
use regex::Regex;
use crate::error::TraceError;

/// The kind of memory access
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Operation {
    Read,
    Write,
}

/// A single access of a trace
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TraceEvent {
    pub operation: Operation,
    pub address: u64,
}

lazy_static! {
    static ref TRACE_LINE: Regex =
        Regex::new(r"^\s*(?P<op>[RrWw])\s+(?:0[xX])?(?P<address>[0-9a-fA-F]{1,16})\s*$").unwrap();
}

/// Parses one line of a trace, `R` or `W` followed by a hexadecimal address
///
/// # Examples
///
/// ```
/// use cachelib::trace::{parse_line, Operation};
/// let event = parse_line("W 0x7fff5a8487c8").unwrap();
/// assert_eq!(event.operation, Operation::Write);
/// assert_eq!(event.address, 0x7fff5a8487c8);
/// assert_eq!(parse_line("r 40").unwrap().address, 0x40);
/// assert!(parse_line("X 40").is_none());
/// ```
pub fn parse_line(line: &str) -> Option<TraceEvent> {
    let captures = TRACE_LINE.captures(line)?;
    let operation = match &captures["op"] {
        "R" | "r" => Operation::Read,
        _ => Operation::Write,
    };
    // At most 16 digits, this can't overflow
    let address = u64::from_str_radix(&captures["address"], 16).ok()?;
    Some(TraceEvent { operation, address })
}

/// Reads trace events from text, one per line. Blank lines are skipped
///
/// Reads are sequential, so a memory mapped file advised for sequential access works well as the
/// source, see [`crate::io::get_reader`]
pub struct TraceReader<R: BufRead> {
    lines: Lines<R>,
    line_number: usize,
}

impl<R: BufRead> TraceReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_number: 0,
        }
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = Result<TraceEvent, TraceError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            self.line_number += 1;
            if line.trim().is_empty() {
                continue;
            }
            return Some(parse_line(&line).ok_or(TraceError::Malformed {
                line: self.line_number,
                content: line,
            }));
        }
    }
}
