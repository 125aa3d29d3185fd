use crate::chunk_plan::ChunkPlan;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub plan: ChunkPlan,
    pub chunk_reports: Vec<ChunkReport>,
}

impl BatchReport {
    pub fn total_nodes(&self) -> u64 {
        self.chunk_reports.iter().map(|c| c.total_nodes).sum()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChunkReport {
    pub chunk_index: usize,
    pub start: usize,
    pub end: usize,
    pub positions: usize,
    pub total_nodes: u64,
    pub total_time: String,
    pub nodes_per_second: Option<u64>,
    pub wall_millis: u128,
}
