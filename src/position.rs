use crate::error::{Error, Result};
use regex::Regex;
use std::sync::LazyLock;

/// 64 squares followed by the side to move, e.g.
/// `--XXXXX--OOOXX-O-OOOXXOX-OXOXOXXOXXXOXXX--XOXOXX-XXXOOO--OOOOO-- X`.
static BOARD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-XOxo.*]{64}\s+[XOxo]$").expect("valid board regex"));

/// Checks a position descriptor before it is written to the engine's input
/// file, where each position must occupy exactly one line.
pub fn validate(position: &str, strict: bool) -> Result<()> {
    if position.trim().is_empty() {
        return Err(invalid(position, "empty position"));
    }
    if position.contains(['\n', '\r']) {
        return Err(invalid(position, "position spans several lines"));
    }
    if strict && !BOARD.is_match(position.trim()) {
        return Err(invalid(position, "not a 64-square board followed by the side to move"));
    }
    Ok(())
}

pub fn validate_all(positions: &[String], strict: bool) -> Result<()> {
    positions.iter().try_for_each(|p| validate(p, strict))
}

fn invalid(position: &str, reason: &'static str) -> Error {
    Error::InvalidPosition {
        position: position.to_string(),
        reason,
    }
}
