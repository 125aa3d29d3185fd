use super::columns::{self, Column};
use crate::{error::ParseError, util::group_thousands};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Token the engine prints in place of a move when the side to move must pass.
pub const PASS: &str = "ps";

/// One solved position, as reported on one line of the engine's table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PositionRecord {
    /// 1-based, local to the report the line came from.
    pub sequence_index: u32,
    pub depth: u32,
    /// Present only for selective searches.
    pub selectivity: Option<u8>,
    pub score: i32,
    pub time: String,
    pub nodes: u64,
    pub nodes_per_second: Option<u64>,
    pub pv: Vec<String>,
    pub raw_text: String,
}

impl PositionRecord {
    /// Whether the search was exact to `depth` (no probabilistic cutoffs).
    pub fn is_exact(&self) -> bool {
        self.selectivity.is_none()
    }

    /// The first move of the principal variation, unless it is a pass.
    pub fn best_move(&self) -> Option<&str> {
        self.pv.first().map(String::as_str).filter(|m| *m != PASS)
    }

    pub fn pretty(&self) -> String {
        let selectivity = match self.selectivity {
            Some(s) => format!("{s}%"),
            None => "-".to_string(),
        };
        let rate = match self.nodes_per_second {
            Some(n) => format!("{} N/s", group_thousands(n)),
            None => "? N/s".to_string(),
        };
        [
            format!("index: {}", self.sequence_index),
            format!("depth: {}", self.depth),
            format!("selectivity: {selectivity}"),
            format!("score: {:+03}", self.score),
            format!("time: {}", self.time),
            format!("nodes: {}", group_thousands(self.nodes)),
            format!("nodes_per_second: {rate}"),
            format!("pv: {}", self.pv.join(" ")),
        ]
        .join("\n")
    }
}

impl fmt::Display for PositionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw_text)
    }
}

impl FromStr for PositionRecord {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_line(s)
    }
}

pub fn parse_line(line: &str) -> Result<PositionRecord, ParseError> {
    let (index, rest) = line
        .split_once('|')
        .ok_or_else(|| ParseError::field("index", line))?;
    let sequence_index = number(index.trim(), "index", line)?;

    let (depth, selectivity) = intensity(column(&columns::INTENSITY, rest, line)?, line)?;
    let score = number(column(&columns::SCORE, rest, line)?, "score", line)?;
    let time = column(&columns::TIME, rest, line)?.to_string();
    let nodes = number(column(&columns::NODES, rest, line)?, "nodes", line)?;

    let rate = column(&columns::NODES_PER_SECOND, rest, line)?;
    let nodes_per_second = if rate.is_empty() {
        None
    } else {
        Some(number(rate, columns::NODES_PER_SECOND.name, line)?)
    };

    let pv = column(&columns::PV, rest, line)?
        .split_whitespace()
        .map(str::to_string)
        .collect();

    Ok(PositionRecord {
        sequence_index,
        depth,
        selectivity,
        score,
        time,
        nodes,
        nodes_per_second,
        pv,
        raw_text: line.to_string(),
    })
}

fn column<'a>(col: &Column, rest: &'a str, line: &str) -> Result<&'a str, ParseError> {
    col.extract(rest)
        .ok_or_else(|| ParseError::field(col.name, line))
}

fn number<T: FromStr>(token: &str, field: &'static str, line: &str) -> Result<T, ParseError> {
    token.parse().map_err(|_| ParseError::field(field, line))
}

fn intensity(token: &str, line: &str) -> Result<(u32, Option<u8>), ParseError> {
    let Some((depth, selectivity)) = token.split_once('@') else {
        return Ok((number(token, "depth", line)?, None));
    };
    let depth = number(depth.trim(), "depth", line)?;
    let selectivity = selectivity.trim();
    let selectivity: u8 = number(
        selectivity.strip_suffix('%').unwrap_or(selectivity),
        "selectivity",
        line,
    )?;
    if selectivity > 100 {
        return Err(ParseError::field("selectivity", line));
    }
    Ok((depth, Some(selectivity)))
}
