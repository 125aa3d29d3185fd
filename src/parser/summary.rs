use crate::error::ParseError;

/// Totals from the summary line, e.g.
/// `fforum-1-19.obf: 2590469 nodes in  0:00.031 (83563516 nodes/s).`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Totals {
    pub nodes: u64,
    pub time: String,
    pub nodes_per_second: Option<u64>,
}

const NODES_TOKEN: usize = 1;
const TIME_TOKEN: usize = 4;

pub fn parse_summary(line: &str) -> Result<Totals, ParseError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();

    let nodes = tokens
        .get(NODES_TOKEN)
        .and_then(|t| t.parse().ok())
        .ok_or_else(|| summary_error("total_nodes", line))?;
    let time = tokens
        .get(TIME_TOKEN)
        .ok_or_else(|| summary_error("total_time", line))?
        .to_string();
    let nodes_per_second = rate(&tokens[TIME_TOKEN + 1..], line)?;

    Ok(Totals {
        nodes,
        time,
        nodes_per_second,
    })
}

/// The rate is printed as `(N nodes/s).`, but narrow values are padded
/// inside the parenthesis, which splits it into `(` and `N`.
fn rate(tokens: &[&str], line: &str) -> Result<Option<u64>, ParseError> {
    let value = match tokens {
        [] => return Ok(None),
        ["(", value, ..] => *value,
        [first, ..] => match first.strip_prefix('(') {
            Some(value) if !value.is_empty() => value,
            _ => return Err(summary_error("nodes_per_second", line)),
        },
    };
    value
        .parse()
        .map(Some)
        .map_err(|_| summary_error("nodes_per_second", line))
}

fn summary_error(field: &'static str, line: &str) -> ParseError {
    ParseError::Summary {
        field,
        raw: line.to_string(),
    }
}
