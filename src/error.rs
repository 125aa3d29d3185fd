use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// A report or report line that does not match the engine's table layout.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid {field} field in line {raw:?}")]
    Field { field: &'static str, raw: String },

    #[error("report line {index}: {source}")]
    Line {
        index: usize,
        #[source]
        source: Box<ParseError>,
    },

    #[error("report has {found} lines; expected a 2-line header and a 4-line trailer")]
    Truncated { found: usize },

    #[error("invalid {field} in summary line {raw:?}")]
    Summary { field: &'static str, raw: String },
}

impl ParseError {
    pub(crate) fn field(field: &'static str, raw: &str) -> Self {
        ParseError::Field {
            field,
            raw: raw.to_string(),
        }
    }

    /// Name of the offending field, looking through line wrappers.
    pub fn field_name(&self) -> Option<&'static str> {
        match self {
            ParseError::Field { field, .. } | ParseError::Summary { field, .. } => Some(*field),
            ParseError::Line { source, .. } => source.field_name(),
            ParseError::Truncated { .. } => None,
        }
    }
}

/// The solver could not produce a report.
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("unsupported operating system: {0}")]
    UnsupportedPlatform(String),

    #[error("engine executable not found: {}", .0.display())]
    MissingExecutable(PathBuf),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("engine exited with {status}: {stderr}")]
    Exit { status: String, stderr: String },

    #[error("engine output is not valid UTF-8: {0}")]
    InvalidOutput(#[source] std::string::FromUtf8Error),

    #[error("engine exceeded timeout ({after:?}); stderr: {stderr}")]
    Timeout { after: Duration, stderr: String },
}

impl ExecutionError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        ExecutionError::Io {
            context: context.into(),
            source,
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),

    #[error("invalid position {position:?}: {reason}")]
    InvalidPosition { position: String, reason: &'static str },

    #[error("chunk {chunk} solved {expected} positions but the report has {found} records")]
    RecordCountMismatch {
        chunk: usize,
        expected: usize,
        found: usize,
    },

    #[error("building worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
