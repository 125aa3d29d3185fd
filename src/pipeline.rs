use crate::{
    chunk_plan::{ChunkPlan, PositionRange},
    config::Config,
    engine::Solver,
    error::{Error, Result},
    parser::{PositionRecord, ReportSummary, parse_report},
    position,
    report::{BatchReport, ChunkReport},
};
use rayon::prelude::*;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Fans a batch of positions out over concurrent solver invocations and
/// merges the parsed records back into input order.
pub struct BatchOrchestrator<S: Solver> {
    solver: S,
    pool: rayon::ThreadPool,
    parallelism: usize,
    strict_positions: bool,
}

pub struct BatchOutput {
    pub records: Vec<PositionRecord>,
    pub report: BatchReport,
}

struct ChunkOutcome {
    summary: ReportSummary,
    wall_millis: u128,
}

impl<S: Solver> BatchOrchestrator<S> {
    pub fn new(cfg: &Config, solver: S) -> Result<Self> {
        let mut orch = Self::with_parallelism(solver, cfg.batch.effective_parallelism())?;
        orch.strict_positions = cfg.batch.strict_positions;
        Ok(orch)
    }

    pub fn with_parallelism(solver: S, parallelism: usize) -> Result<Self> {
        let parallelism = parallelism.max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(parallelism)
            .thread_name(|i| format!("edax-worker-{i}"))
            .build()?;
        Ok(Self {
            solver,
            pool,
            parallelism,
            strict_positions: false,
        })
    }

    pub fn parallelism(&self) -> usize {
        self.parallelism
    }

    pub fn solver(&self) -> &S {
        &self.solver
    }

    pub fn solve(&self, positions: &[String]) -> Result<Vec<PositionRecord>> {
        Ok(self.solve_detailed(positions)?.records)
    }

    pub fn solve_one(&self, position: &str) -> Result<Vec<PositionRecord>> {
        self.solve(&[position.to_string()])
    }

    /// One invocation over all positions, without partitioning.
    pub fn solve_report(&self, positions: &[String]) -> Result<ReportSummary> {
        position::validate_all(positions, self.strict_positions)?;
        let text = self.solver.run(positions)?;
        Ok(parse_report(&text)?)
    }

    pub fn solve_detailed(&self, positions: &[String]) -> Result<BatchOutput> {
        position::validate_all(positions, self.strict_positions)?;

        let plan = ChunkPlan::partition(positions.len(), self.parallelism);
        info!(
            "batch positions={} chunks={} parallelism={}",
            positions.len(),
            plan.len(),
            self.parallelism
        );
        debug!(?plan, "chunk plan");

        // Indexed collect: slot i always holds chunk i, whatever order the
        // invocations finish in.
        let outcomes: Vec<Result<ChunkOutcome>> = self.pool.install(|| {
            plan.chunks
                .par_iter()
                .enumerate()
                .map(|(i, range)| self.run_chunk(i, *range, &positions[range.as_range()]))
                .collect()
        });

        let mut records = Vec::with_capacity(positions.len());
        let mut chunk_reports = Vec::with_capacity(plan.len());
        for ((i, range), outcome) in plan.chunks.iter().enumerate().zip(outcomes) {
            let outcome = outcome.inspect_err(|err| {
                warn!("chunk {} (positions {}..{}) failed: {}", i, range.start, range.end, err);
            })?;
            let summary = outcome.summary;
            chunk_reports.push(ChunkReport {
                chunk_index: i,
                start: range.start,
                end: range.end,
                positions: range.len(),
                total_nodes: summary.total_nodes,
                total_time: summary.total_time,
                nodes_per_second: summary.nodes_per_second,
                wall_millis: outcome.wall_millis,
            });
            records.extend(summary.records);
        }

        Ok(BatchOutput {
            records,
            report: BatchReport { plan, chunk_reports },
        })
    }

    fn run_chunk(
        &self,
        index: usize,
        range: PositionRange,
        positions: &[String],
    ) -> Result<ChunkOutcome> {
        let started = Instant::now();
        debug!("chunk {} positions {}..{}", index, range.start, range.end);

        let text = self.solver.run(positions)?;
        let summary = parse_report(&text)?;
        if summary.records.len() != positions.len() {
            return Err(Error::RecordCountMismatch {
                chunk: index,
                expected: positions.len(),
                found: summary.records.len(),
            });
        }

        let wall_millis = started.elapsed().as_millis();
        info!(
            "chunk {} done positions={} nodes={} time={} wall_ms={}",
            index,
            positions.len(),
            summary.total_nodes,
            summary.total_time,
            wall_millis
        );
        Ok(ChunkOutcome {
            summary,
            wall_millis,
        })
    }
}

/// Solves `positions` with `parallelism` concurrent invocations of `solver`.
pub fn solve_batch<S: Solver>(
    solver: S,
    positions: &[String],
    parallelism: usize,
) -> Result<Vec<PositionRecord>> {
    BatchOrchestrator::with_parallelism(solver, parallelism)?.solve(positions)
}
