#![allow(dead_code)]

use edax_batch::{ExecutionError, Solver};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Condvar, Mutex};
use std::time::Duration;

pub const HEADER: &str = " # | depth|score|       time   |  nodes (N)  |   N/s    | principal variation\n\
---+------+-----+--------------+-------------+----------+---------------------\n";
pub const SEPARATOR: &str = "------+-----+--------------+-------------+----------+---------------------";
pub const STATS: &str = "1 positions; 0 erroneous move; 0 erroneous score; mean absolute score error = 0.000; mean absolute move error = 0.000";

/// A report line in the engine's column layout.
pub fn format_line(
    index: u32,
    intensity: &str,
    score: i32,
    time: &str,
    nodes: u64,
    nps: Option<u64>,
    pv: &str,
) -> String {
    let nps = nps.map(|n| n.to_string()).unwrap_or_default();
    format!(
        "{:>3}|{:>6} {:>5} {:>14} {:>13} {:>10} {}",
        index,
        intensity,
        format!("{:+03}", score),
        time,
        nodes,
        nps,
        pv
    )
}

pub fn wrap_report(body: &[String], summary: &str) -> String {
    let mut out = String::from(HEADER);
    for l in body {
        out.push_str(l);
        out.push('\n');
    }
    out.push_str(SEPARATOR);
    out.push('\n');
    out.push_str(summary);
    out.push('\n');
    out.push_str(STATS);
    out.push('\n');
    out
}

/// Stable pseudo-evaluation of a position descriptor.
pub fn seed(position: &str) -> u64 {
    position
        .bytes()
        .fold(17u64, |acc, b| acc.wrapping_mul(31).wrapping_add(u64::from(b)))
}

/// Deterministic stand-in for the engine: every position's line depends only
/// on the position itself.
#[derive(Default)]
pub struct FakeSolver {
    pub calls: AtomicUsize,
    pub in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    pub fail_on: Option<String>,
    pub drop_last_line: bool,
    /// Sleep longer for chunks whose first position sorts earlier, so later
    /// chunks finish first.
    pub reverse_delay: bool,
    pub delay: Duration,
    /// Hold each call until this many calls are in flight together.
    pub rendezvous: Option<usize>,
    pub rendezvous_missed: AtomicBool,
    pub arrived: Mutex<usize>,
    pub arrivals: Condvar,
}

impl FakeSolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(positions: &[String]) -> String {
        let body: Vec<String> = positions
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let s = seed(p);
                let score = (s % 65) as i32 - 32;
                let depth = 10 + (s % 10);
                let intensity = if s % 3 == 0 {
                    format!("{}@{}%", depth, 73 + s % 27)
                } else {
                    depth.to_string()
                };
                let nodes = 1_000 + s % 1_000_000;
                let nps = if s % 4 == 0 { None } else { Some(nodes * 10) };
                let files = ["a", "B", "c", "D", "e", "F", "g", "H"];
                let pv = format!(
                    "{}{} {}{}",
                    files[(s % 8) as usize],
                    1 + s % 8,
                    files[((s / 8) % 8) as usize],
                    1 + (s / 64) % 8
                );
                format_line(i as u32 + 1, &intensity, score, "0:00.010", nodes, nps, &pv)
            })
            .collect();
        wrap_report(&body, "fake.obf: 1000 nodes in  0:00.010 (100000 nodes/s).")
    }
}

impl Solver for FakeSolver {
    fn run(&self, positions: &[String]) -> Result<String, ExecutionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let mut delay = self.delay;
        if self.reverse_delay {
            let first: u64 = positions
                .first()
                .and_then(|p| p.trim_start_matches('p').parse().ok())
                .unwrap_or(0);
            delay += Duration::from_millis(100u64.saturating_sub(first * 4));
        }
        std::thread::sleep(delay);

        if let Some(n) = self.rendezvous {
            let mut arrived = self.arrived.lock().unwrap();
            *arrived += 1;
            self.arrivals.notify_all();
            let (_arrived, wait) = self
                .arrivals
                .wait_timeout_while(arrived, Duration::from_secs(5), |a| *a < n)
                .unwrap();
            if wait.timed_out() {
                self.rendezvous_missed.store(true, Ordering::SeqCst);
            }
        }

        let result = if let Some(bad) = &self.fail_on
            && positions.iter().any(|p| p == bad)
        {
            Err(ExecutionError::Exit {
                status: "exit status: 1".into(),
                stderr: format!("cannot solve {bad}"),
            })
        } else {
            let n = if self.drop_last_line {
                positions.len().saturating_sub(1)
            } else {
                positions.len()
            };
            Ok(Self::report(&positions[..n]))
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

pub fn positions(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("p{i}")).collect()
}
