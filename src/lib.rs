pub mod chunk_plan;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod parser;
pub mod pipeline;
pub mod position;
pub mod report;
pub mod util;

pub use engine::{EdaxSolver, Solver};
pub use error::{Error, ExecutionError, ParseError};
pub use parser::{PositionRecord, ReportSummary, parse_line, parse_report};
pub use pipeline::{BatchOrchestrator, solve_batch};
