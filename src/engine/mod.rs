pub mod edax;

use crate::error::ExecutionError;

pub use edax::EdaxSolver;

/// Runs one engine invocation over a list of positions.
///
/// Implementations return the full captured report, whose body has one line
/// per position in input order. Calls block and may be slow; the
/// orchestrator runs several at once, hence `Send + Sync`.
pub trait Solver: Send + Sync {
    fn run(&self, positions: &[String]) -> Result<String, ExecutionError>;
}

impl<S: Solver + ?Sized> Solver for &S {
    fn run(&self, positions: &[String]) -> Result<String, ExecutionError> {
        (**self).run(positions)
    }
}

impl<S: Solver + ?Sized> Solver for std::sync::Arc<S> {
    fn run(&self, positions: &[String]) -> Result<String, ExecutionError> {
        (**self).run(positions)
    }
}
