//! Parsing of the engine's `-solve` report.
//!
//! A report is a two-line table header, one line per solved position, a
//! separator, a summary line with totals, a statistics line and a trailing
//! blank line.

pub mod columns;
mod line;
mod summary;

pub use line::{PASS, PositionRecord, parse_line};
pub use summary::{Totals, parse_summary};

use crate::error::ParseError;
use serde::Serialize;

const HEADER_LINES: usize = 2;
/// Separator, summary, statistics and the empty string after the final newline.
const TRAILER_LINES: usize = 4;
/// Offset of the summary line from the end.
const SUMMARY_FROM_END: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub total_nodes: u64,
    pub total_time: String,
    pub nodes_per_second: Option<u64>,
    pub records: Vec<PositionRecord>,
    #[serde(skip)]
    pub raw_text: String,
}

pub fn parse_report(text: &str) -> Result<ReportSummary, ParseError> {
    let lines: Vec<&str> = text
        .split('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .collect();
    if lines.len() < HEADER_LINES + TRAILER_LINES {
        return Err(ParseError::Truncated { found: lines.len() });
    }

    let body_end = lines.len() - TRAILER_LINES;
    let records = lines[HEADER_LINES..body_end]
        .iter()
        .enumerate()
        .map(|(i, l)| {
            parse_line(l).map_err(|e| ParseError::Line {
                index: HEADER_LINES + i,
                source: Box::new(e),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let totals = parse_summary(lines[lines.len() - SUMMARY_FROM_END])?;

    Ok(ReportSummary {
        total_nodes: totals.nodes,
        total_time: totals.time,
        nodes_per_second: totals.nodes_per_second,
        records,
        raw_text: text.to_string(),
    })
}

impl std::str::FromStr for ReportSummary {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_report(s)
    }
}
