use std::fmt;

use crate::error::MountainError;
use crate::size::WorkingSetSize;
use crate::stride::StrideSequence;
use crate::Result;

/// Read throughput values (MB/s), one row per working set size and one column per stride
#[derive(Debug, Clone, PartialEq)]
pub struct ThroughputMatrix {
    values: Vec<f64>,
    columns: usize,
}

impl ThroughputMatrix {
    /// Builds the matrix from rows of equal length
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let columns = rows.first().map(Vec::len).ok_or(MountainError::NoData)?;
        let mut values = Vec::with_capacity(rows.len() * columns);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != columns {
                return Err(MountainError::RaggedRows {
                    row: i + 1,
                    expected: columns,
                    found: row.len(),
                });
            }
            values.extend(row);
        }
        Ok(Self { values, columns })
    }

    pub fn rows(&self) -> usize {
        self.values.len().checked_div(self.columns).unwrap_or(0)
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn row(&self, row: usize) -> Option<&[f64]> {
        let start = row.checked_mul(self.columns)?;
        self.values.get(start..start + self.columns)
    }

    pub fn get(&self, row: usize, column: usize) -> Option<f64> {
        if column >= self.columns {
            return None;
        }
        self.row(row).map(|r| r[column])
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        self.values.chunks(self.columns.max(1))
    }

    /// Lowest throughput, `0.0` for an empty matrix
    pub fn min(&self) -> f64 {
        self.values.iter().copied().reduce(f64::min).unwrap_or(0.0)
    }

    /// Highest throughput, `0.0` for an empty matrix
    pub fn max(&self) -> f64 {
        self.values.iter().copied().reduce(f64::max).unwrap_or(0.0)
    }
}

/// A fully parsed benchmark result
#[derive(Debug, Clone, PartialEq)]
pub struct Mountain {
    strides: StrideSequence,
    sizes: Vec<WorkingSetSize>,
    matrix: ThroughputMatrix,
}

impl Mountain {
    /// Ties strides, sizes and throughput values together.
    ///
    /// The matrix must have one row per size and one column per stride.
    pub fn new(
        strides: StrideSequence,
        sizes: Vec<WorkingSetSize>,
        matrix: ThroughputMatrix,
    ) -> Result<Self> {
        if sizes.is_empty() {
            return Err(MountainError::NoData);
        }
        if matrix.rows() != sizes.len() || matrix.columns() != strides.len() {
            return Err(MountainError::ShapeMismatch {
                rows: matrix.rows(),
                columns: matrix.columns(),
                sizes: sizes.len(),
                strides: strides.len(),
            });
        }
        Ok(Self {
            strides,
            sizes,
            matrix,
        })
    }

    pub fn strides(&self) -> &StrideSequence {
        &self.strides
    }

    pub fn sizes(&self) -> &[WorkingSetSize] {
        &self.sizes
    }

    pub fn matrix(&self) -> &ThroughputMatrix {
        &self.matrix
    }

    /// Outer product of strides and log2 sizes.
    ///
    /// `mesh()[row][column]` is the `(stride, log2(size))` coordinate of
    /// `matrix().get(row, column)`.
    pub fn mesh(&self) -> Vec<Vec<(f64, f64)>> {
        self.sizes
            .iter()
            .map(|size| {
                let y = size.log2();
                self.strides
                    .values()
                    .iter()
                    .map(|&stride| (f64::from(stride), y))
                    .collect()
            })
            .collect()
    }

    /// Every other stride, as axis positions
    pub fn stride_ticks(&self) -> Vec<f64> {
        self.strides
            .every_other()
            .into_iter()
            .map(f64::from)
            .collect()
    }

    /// Every other working set size, in file order
    pub fn size_ticks(&self) -> Vec<WorkingSetSize> {
        self.sizes.iter().step_by(2).copied().collect()
    }

    pub fn summary(&self) -> Summary {
        let peak = self
            .sizes
            .iter()
            .zip(self.matrix.iter_rows())
            .flat_map(|(size, row)| {
                self.strides
                    .values()
                    .iter()
                    .zip(row)
                    .map(move |(&stride, &value)| (*size, stride, value))
            })
            .reduce(|best, candidate| {
                if candidate.2 > best.2 {
                    candidate
                } else {
                    best
                }
            });

        Summary {
            rows: self.matrix.rows(),
            columns: self.matrix.columns(),
            min: self.matrix.min(),
            peak,
        }
    }
}

/// Short description of a [`Mountain`], printed by `--check`
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub rows: usize,
    pub columns: usize,
    pub min: f64,
    /// Size, stride and value of the highest throughput
    pub peak: Option<(WorkingSetSize, u32, f64)>,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} working set sizes x {} strides, min {:.1} MB/s",
            self.rows, self.columns, self.min
        )?;
        if let Some((size, stride, value)) = self.peak {
            write!(f, ", peak {value:.1} MB/s at {size} stride {stride}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mountain() -> Mountain {
        let strides = StrideSequence::new(vec![1, 3, 5]).unwrap();
        let sizes = ["1m", "64k", "2k"]
            .iter()
            .map(|t| t.parse().unwrap())
            .collect();
        let matrix = ThroughputMatrix::from_rows(vec![
            vec![900.0, 700.0, 500.0],
            vec![4000.0, 3500.0, 3000.0],
            vec![8000.0, 7900.0, 7800.0],
        ])
        .unwrap();
        Mountain::new(strides, sizes, matrix).unwrap()
    }

    #[test]
    fn test_matrix_shape_and_access() {
        let matrix = mountain().matrix().clone();
        assert_eq!(3, matrix.rows());
        assert_eq!(3, matrix.columns());
        assert_eq!(Some(3500.0), matrix.get(1, 1));
        assert_eq!(Some(&[8000.0, 7900.0, 7800.0][..]), matrix.row(2));
        assert_eq!(None, matrix.get(0, 3));
        assert_eq!(None, matrix.row(3));
        assert_eq!(500.0, matrix.min());
        assert_eq!(8000.0, matrix.max());
    }

    #[test]
    fn test_matrix_rejects_ragged_rows() {
        let result = ThroughputMatrix::from_rows(vec![vec![1.0, 2.0], vec![3.0]]);
        assert!(matches!(
            result,
            Err(MountainError::RaggedRows {
                row: 2,
                expected: 2,
                found: 1
            })
        ));
        assert!(matches!(
            ThroughputMatrix::from_rows(vec![vec![1.0], vec![2.0], vec![3.0, 4.0]]),
            Err(MountainError::RaggedRows { row: 3, .. })
        ));
        assert!(matches!(
            ThroughputMatrix::from_rows(vec![]),
            Err(MountainError::NoData)
        ));
    }

    #[test]
    fn test_mountain_rejects_mismatched_strides() {
        let strides = StrideSequence::new(vec![1, 3]).unwrap();
        let sizes = vec!["4k".parse().unwrap()];
        let matrix = ThroughputMatrix::from_rows(vec![vec![1.0, 2.0, 3.0]]).unwrap();
        assert!(matches!(
            Mountain::new(strides, sizes, matrix),
            Err(MountainError::ShapeMismatch {
                rows: 1,
                columns: 3,
                sizes: 1,
                strides: 2
            })
        ));
    }

    #[test]
    fn test_mesh_is_outer_product() {
        let mesh = mountain().mesh();
        assert_eq!(3, mesh.len());
        assert!(mesh.iter().all(|row| row.len() == 3));
        assert_eq!((1.0, 20.0), mesh[0][0]);
        assert_eq!((5.0, 20.0), mesh[0][2]);
        assert_eq!((3.0, 16.0), mesh[1][1]);
        assert_eq!((5.0, 11.0), mesh[2][2]);
    }

    #[test]
    fn test_ticks_are_down_sampled() {
        let mountain = mountain();
        assert_eq!(vec![1.0, 5.0], mountain.stride_ticks());
        let labels: Vec<String> = mountain.size_ticks().iter().map(|s| s.label()).collect();
        assert_eq!(vec!["1m", "2k"], labels);
    }

    #[test]
    fn test_summary() {
        let summary = mountain().summary();
        assert_eq!(3, summary.rows);
        assert_eq!(3, summary.columns);
        assert_eq!(500.0, summary.min);
        let (size, stride, value) = summary.peak.unwrap();
        assert_eq!("2k", size.label());
        assert_eq!(1, stride);
        assert_eq!(8000.0, value);
        assert_eq!(
            "3 working set sizes x 3 strides, min 500.0 MB/s, peak 8000.0 MB/s at 2k stride 1",
            summary.to_string()
        );
    }
}
