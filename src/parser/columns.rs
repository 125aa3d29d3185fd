//! Fixed-column layout of an Edax solve report line.
//!
//! The engine pads its table with spaces, so field boundaries are byte
//! offsets rather than delimiters. Offsets are relative to the text that
//! follows the `|` after the position index:
//!
//! ```text
//!  # | depth|score|       time   |  nodes (N)  |   N/s    | principal variation
//!   7|   24   -08        0:00.234      63133975  269803312 b3 C1 b1 A3 b2 H3 a5
//!     ^0    ^7   ^13            ^28          ^42        ^53
//! ```
//!
//! Each column is followed by a single separator space that belongs to no
//! field.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Column {
    pub name: &'static str,
    pub start: usize,
    /// Exclusive end; `None` runs to the end of the line.
    pub end: Option<usize>,
}

/// `depth` or `depth@selectivity%`, right aligned in six characters.
pub const INTENSITY: Column = Column {
    name: "intensity",
    start: 0,
    end: Some(6),
};

/// Signed score with a forced sign and two digits (`+03`, `-08`).
pub const SCORE: Column = Column {
    name: "score",
    start: 7,
    end: Some(12),
};

/// Elapsed time as `H:MM.mmm`, kept verbatim.
pub const TIME: Column = Column {
    name: "time",
    start: 13,
    end: Some(27),
};

pub const NODES: Column = Column {
    name: "nodes",
    start: 28,
    end: Some(41),
};

/// Blank when the elapsed time is too short for the engine to report a rate.
pub const NODES_PER_SECOND: Column = Column {
    name: "nodes_per_second",
    start: 42,
    end: Some(52),
};

pub const PV: Column = Column {
    name: "pv",
    start: 53,
    end: None,
};

pub const COLUMNS: [Column; 6] = [INTENSITY, SCORE, TIME, NODES, NODES_PER_SECOND, PV];

impl Column {
    /// Trimmed contents of this column in `rest`.
    ///
    /// Short lines are clamped, so a missing trailing column reads as blank.
    /// Returns `None` only when an offset splits a multi-byte character.
    pub fn extract<'a>(&self, rest: &'a str) -> Option<&'a str> {
        let len = rest.len();
        let start = self.start.min(len);
        let end = self.end.unwrap_or(len).min(len);
        rest.get(start..end).map(str::trim)
    }
}
