use ndarray::{Array2, Axis};

use crate::error::Error;

/// Validated sample × feature table of {0,1} values.
///
/// Rows are samples and columns are features; column indices are the
/// stable identity of a feature for the lifetime of a selection run.
/// Construction rejects empty, ragged, or non-binary input, so the
/// algorithm can read the table without re-checking it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryMatrix {
    data: Array2<u8>,
}

impl BinaryMatrix {
    /// Wrap a dense array after checking that it is non-empty and that
    /// every cell is 0 or 1.
    pub fn new(data: Array2<u8>) -> Result<Self, Error> {
        let (samples, features) = data.dim();
        if samples == 0 || features == 0 {
            return Err(Error::EmptyMatrix);
        }
        if let Some(((row, column), &value)) = data.indexed_iter().find(|(_, &v)| v > 1) {
            return Err(Error::NonBinaryValue { row, column, value });
        }
        Ok(Self { data })
    }

    /// Build from parsed rows, checking rectangularity against the first
    /// row before handing off to [`BinaryMatrix::new`].
    pub fn from_rows(rows: Vec<Vec<u8>>) -> Result<Self, Error> {
        if rows.is_empty() || rows[0].is_empty() {
            return Err(Error::EmptyMatrix);
        }
        let expected = rows[0].len();
        for (row, values) in rows.iter().enumerate() {
            if values.len() != expected {
                return Err(Error::RaggedRow {
                    row,
                    expected,
                    found: values.len(),
                });
            }
        }
        let mut data = Array2::<u8>::default((rows.len(), expected));
        data.axis_iter_mut(Axis(0))
            .enumerate()
            .for_each(|(idx1, mut row)| {
                row.iter_mut().enumerate().for_each(|(idx2, col)| {
                    *col = rows[idx1][idx2];
                });
            });
        Self::new(data)
    }

    /// Number of samples (rows).
    pub fn samples(&self) -> usize {
        self.data.nrows()
    }

    /// Number of features (columns).
    pub fn features(&self) -> usize {
        self.data.ncols()
    }

    /// Value of `sample` on `feature`.
    #[inline]
    pub fn value(&self, sample: usize, feature: usize) -> u8 {
        self.data[[sample, feature]]
    }

    /// Count of samples with value 1 on `feature`, over the whole table.
    pub fn ones_in_column(&self, feature: usize) -> usize {
        self.data
            .column(feature)
            .iter()
            .map(|&v| v as usize)
            .sum()
    }
}
