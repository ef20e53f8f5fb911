use crate::consts::{DEFAULT_STRIDE_END, DEFAULT_STRIDE_START};
use crate::error::MountainError;
use crate::Result;

/// Ordered strides (in elements) the benchmark was run with.
///
/// The input file doesn't store them, so they have to be known up front. Every data row must
/// carry exactly one throughput value per stride.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrideSequence {
    values: Vec<u32>,
}

impl StrideSequence {
    /// Creates a sequence from explicit values, which must be non-empty and positive
    pub fn new(values: Vec<u32>) -> Result<Self> {
        if values.is_empty() {
            return Err(MountainError::InvalidStrides(
                "at least one stride is required".to_string(),
            ));
        }
        if values.contains(&0) {
            return Err(MountainError::InvalidStrides(
                "strides must be positive".to_string(),
            ));
        }
        Ok(Self { values })
    }

    /// Odd strides from `start` up to `end` (inclusive), e.g. `odd(1, 7)` gives 1, 3, 5, 7
    pub fn odd(start: u32, end: u32) -> Result<Self> {
        let first = if start % 2 == 0 { start + 1 } else { start };
        Self::new((first..=end).step_by(2).collect())
    }

    pub fn values(&self) -> &[u32] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Every other stride, starting with the first one. Used to thin out axis ticks.
    pub fn every_other(&self) -> Vec<u32> {
        self.values.iter().step_by(2).copied().collect()
    }
}

impl Default for StrideSequence {
    /// 1, 3, 5, ..., 31
    fn default() -> Self {
        Self {
            values: (DEFAULT_STRIDE_START..=DEFAULT_STRIDE_END).step_by(2).collect(),
        }
    }
}
