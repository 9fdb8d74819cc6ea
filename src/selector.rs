use log::debug;

use crate::algorithm::Selection;
use crate::error::Error;
use crate::matrix::BinaryMatrix;

/// Greedy partition-refinement selection of a discriminating feature set.
///
/// Starting from the most balanced column of the table, repeatedly splits
/// the blocks of still-indistinguishable samples on the unselected column
/// that balances them best, then appends one closing feature chosen by
/// whole-table popularity. The result is an ordered, duplicate-free list
/// of column indices; reading those columns together separates every pair
/// of samples that differs anywhere in the table.
///
///     use ndarray::arr2;
///     use discriset::{BinaryMatrix, GreedySelector};
///
///     let m = BinaryMatrix::new(arr2(&[[1, 0, 0], [1, 1, 0], [0, 0, 1], [0, 1, 1]])).unwrap();
///     let selected = GreedySelector::default().select(&m).unwrap();
///     assert_eq!(selected, vec![0, 1, 2]);
#[derive(Debug, Clone)]
pub struct GreedySelector {
    threads: usize,
}

impl Default for GreedySelector {
    fn default() -> Self {
        Self { threads: 4 }
    }
}

impl GreedySelector {
    /// Selector scoring candidate columns on `threads` worker threads.
    /// The thread count never changes the selected set, only how fast the
    /// candidate scoring runs.
    pub fn new(threads: usize) -> Self {
        Self { threads }
    }

    /// Run the selection over `matrix`, returning the selected column
    /// indices in selection order.
    pub fn select(&self, matrix: &BinaryMatrix) -> Result<Vec<usize>, Error> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .build()
            .unwrap();
        pool.install(|| Self::run(matrix))
    }

    fn run(matrix: &BinaryMatrix) -> Result<Vec<usize>, Error> {
        let mut selection = Selection::init(matrix);
        debug!(
            "seeded with column {} of {}",
            selection.selected()[0],
            matrix.features()
        );
        while selection.needs_refinement() {
            match selection.refine() {
                Some(column) => debug!(
                    "split on column {}, {} columns remain",
                    column,
                    selection.unselected_len()
                ),
                // every column consumed: whatever is still together is identical
                None => break,
            }
        }
        selection.close()
    }
}
