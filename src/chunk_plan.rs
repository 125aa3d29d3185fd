use serde::{Deserialize, Serialize};
use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkPlan {
    pub position_count: usize,
    pub parallelism: usize,
    pub chunks: Vec<PositionRange>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionRange {
    pub start: usize, // 0-based inclusive
    pub end: usize,   // 0-based exclusive
}

impl PositionRange {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn as_range(&self) -> Range<usize> {
        self.start..self.end
    }
}

impl ChunkPlan {
    /// Splits `position_count` requests into at most `parallelism` contiguous
    /// chunks whose sizes differ by at most one. Earlier chunks take the
    /// remainder. No chunk is empty, so fewer requests than workers yields
    /// one chunk per request.
    pub fn partition(position_count: usize, parallelism: usize) -> ChunkPlan {
        let parallelism = parallelism.max(1);
        let n = parallelism.min(position_count);

        let mut chunks = Vec::with_capacity(n);
        if n > 0 {
            let base = position_count / n;
            let extra = position_count % n;
            let mut start = 0usize;
            for i in 0..n {
                let len = base + usize::from(i < extra);
                chunks.push(PositionRange {
                    start,
                    end: start + len,
                });
                start += len;
            }
        }

        ChunkPlan {
            position_count,
            parallelism,
            chunks,
        }
    }

    pub fn single(position_count: usize) -> ChunkPlan {
        ChunkPlan::partition(position_count, 1)
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}
