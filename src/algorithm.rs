use std::collections::BTreeSet;

use rayon::prelude::*;

use crate::error::Error;
use crate::matrix::BinaryMatrix;
use crate::partition::Partition;

/// Column whose 1-count sits closest to half the sample count.
///
/// Comparisons run on |2*ones - samples| so the half-count never needs
/// fractional arithmetic. Ties keep the lowest column index.
pub(crate) fn initial_column(matrix: &BinaryMatrix) -> usize {
    let samples = matrix.samples() as i64;
    (0..matrix.features())
        .into_par_iter()
        .map(|column| {
            let ones = matrix.ones_in_column(column) as i64;
            ((2 * ones - samples).unsigned_abs(), column)
        })
        .min()
        .map(|(_, column)| column)
        .expect("matrix holds at least one column")
}

/// One in-progress selection run over a borrowed matrix.
///
/// Drives the partition through its refinement states: `init` seeds it
/// from the most balanced column, `refine` applies one split-and-prune
/// step, and `close` consumes the run to append the closing feature and
/// yield the selected columns.
pub(crate) struct Selection<'a> {
    matrix: &'a BinaryMatrix,
    partition: Partition,
    selected: Vec<usize>,
    unselected: BTreeSet<usize>,
}

impl<'a> Selection<'a> {
    /// Seed the run from the most balanced column of the whole table.
    pub(crate) fn init(matrix: &'a BinaryMatrix) -> Self {
        let first = initial_column(matrix);
        let partition = Partition::seed(matrix, first);
        let mut unselected: BTreeSet<usize> = (0..matrix.features()).collect();
        unselected.remove(&first);
        Self {
            matrix,
            partition,
            selected: vec![first],
            unselected,
        }
    }

    /// Sum over blocks of |count0 - count1| on `column`. Lower means the
    /// column splits every block more evenly.
    fn balance(&self, column: usize) -> u64 {
        self.partition
            .blocks()
            .iter()
            .map(|block| {
                let ones: i64 = block
                    .iter()
                    .map(|&sample| self.matrix.value(sample, column) as i64)
                    .sum();
                let zeros = block.len() as i64 - ones;
                (zeros - ones).unsigned_abs()
            })
            .sum()
    }

    /// Unselected column with the lowest balance score, or None once
    /// every column has been consumed. The reduction runs over
    /// (score, column) pairs, so ties keep the lowest column index no
    /// matter how the work is scheduled.
    fn best_column(&self) -> Option<usize> {
        self.unselected
            .par_iter()
            .map(|&column| (self.balance(column), column))
            .min()
            .map(|(_, column)| column)
    }

    /// True while some block still holds indistinguishable samples.
    pub(crate) fn needs_refinement(&self) -> bool {
        self.partition.needs_refinement()
    }

    /// One refinement step: split on the best-scoring column, prune the
    /// resolved blocks, and mark the column selected. Returns the chosen
    /// column, or None once every column has been consumed.
    pub(crate) fn refine(&mut self) -> Option<usize> {
        let column = self.best_column()?;
        self.partition = self.partition.split(self.matrix, column).prune();
        self.selected.push(column);
        self.unselected.remove(&column);
        Some(column)
    }

    /// Resolve the final ambiguous block: among the anchor sample's
    /// value-1 columns not yet selected, append the one most common
    /// across the whole table; ties keep the lowest column index.
    ///
    /// An anchor row with no value-1 column at all is fatal. An anchor
    /// whose value-1 columns were all selected already (only reachable
    /// once every column has been consumed) leaves the set as is.
    pub(crate) fn close(mut self) -> Result<Vec<usize>, Error> {
        let anchor = self
            .partition
            .anchor()
            .expect("the first block survives pruning");
        if (0..self.matrix.features()).all(|column| self.matrix.value(anchor, column) == 0) {
            return Err(Error::NoClosingFeature { sample: anchor });
        }
        let mut best: Option<(usize, usize)> = None;
        for &column in &self.unselected {
            if self.matrix.value(anchor, column) == 0 {
                continue;
            }
            let popularity = self.matrix.ones_in_column(column);
            match best {
                Some((top, _)) if popularity <= top => {}
                _ => best = Some((popularity, column)),
            }
        }
        if let Some((_, closing)) = best {
            self.selected.push(closing);
        }
        Ok(self.selected)
    }

    pub(crate) fn selected(&self) -> &[usize] {
        &self.selected
    }

    pub(crate) fn unselected_len(&self) -> usize {
        self.unselected.len()
    }
}

#[cfg(test)]
mod test {
    use std::collections::BTreeSet;

    use ndarray::arr2;

    use crate::algorithm::{initial_column, Selection};
    use crate::error::Error;
    use crate::matrix::BinaryMatrix;
    use crate::partition::Partition;

    #[test]
    fn initial_column_prefers_balanced_counts() {
        // ones per column: 1, 3, 2 of 4 samples -> column 2 sits at half
        let m = BinaryMatrix::new(arr2(&[[0, 1, 1], [1, 1, 0], [0, 1, 1], [0, 0, 0]])).unwrap();
        assert_eq!(initial_column(&m), 2);
    }

    #[test]
    fn initial_column_tie_keeps_lowest_index() {
        // both columns hold exactly one 1 of two samples
        let m = BinaryMatrix::new(arr2(&[[1, 0], [0, 1]])).unwrap();
        assert_eq!(initial_column(&m), 0);
    }

    #[test]
    fn initial_column_handles_odd_sample_count() {
        // ones per column: 0, 1, 3 of 3 samples -> |2*ones - 3| = 3, 1, 3
        let m = BinaryMatrix::new(arr2(&[[0, 1, 1], [0, 0, 1], [0, 0, 1]])).unwrap();
        assert_eq!(initial_column(&m), 1);
    }

    #[test]
    fn init_seeds_partition_and_sets() {
        let m = BinaryMatrix::new(arr2(&[[1, 0, 0], [1, 1, 0], [0, 0, 1], [0, 1, 1]])).unwrap();
        let selection = Selection::init(&m);
        assert_eq!(selection.selected(), &[0]);
        assert_eq!(selection.unselected_len(), 2);
        assert!(selection.needs_refinement());
    }

    #[test]
    fn balance_counts_per_block() {
        let m = BinaryMatrix::new(arr2(&[[1, 0, 0], [1, 1, 0], [0, 0, 1], [0, 1, 1]])).unwrap();
        let selection = Selection::init(&m);
        // blocks [{2,3},{0,1}]: column 1 splits both evenly, column 2 neither
        assert_eq!(selection.balance(1), 0);
        assert_eq!(selection.balance(2), 4);
    }

    #[test]
    fn best_column_tie_keeps_lowest_index() {
        // columns 0 and 1 both split the lone block evenly
        let m = BinaryMatrix::new(arr2(&[[0, 0, 1], [1, 1, 1]])).unwrap();
        let selection = Selection {
            matrix: &m,
            partition: Partition::from_blocks(vec![vec![0, 1]]),
            selected: vec![2],
            unselected: BTreeSet::from([0, 1]),
        };
        assert_eq!(selection.best_column(), Some(0));
    }

    #[test]
    fn refine_shrinks_unselected_by_one() {
        let m = BinaryMatrix::new(arr2(&[[1, 0, 0], [1, 1, 0], [0, 0, 1], [0, 1, 1]])).unwrap();
        let mut selection = Selection::init(&m);
        let before = selection.unselected_len();
        let column = selection.refine().unwrap();
        assert_eq!(column, 1);
        assert_eq!(selection.unselected_len(), before - 1);
        assert_eq!(selection.selected(), &[0, 1]);
        assert!(!selection.needs_refinement());
    }

    #[test]
    fn refine_runs_dry_on_duplicate_rows() {
        let m = BinaryMatrix::new(arr2(&[[1, 0], [1, 0], [0, 1]])).unwrap();
        let mut selection = Selection::init(&m);
        while selection.needs_refinement() {
            if selection.refine().is_none() {
                break;
            }
        }
        // the duplicate pair can never be split, but the run terminates
        assert_eq!(selection.unselected_len(), 0);
        assert!(selection.needs_refinement());
    }

    #[test]
    fn close_prefers_popular_columns() {
        let m = BinaryMatrix::new(arr2(&[[1, 1, 0, 1], [0, 1, 0, 1], [0, 0, 0, 1]])).unwrap();
        let selection = Selection {
            matrix: &m,
            partition: Partition::from_blocks(vec![vec![0]]),
            selected: vec![0],
            unselected: BTreeSet::from([1, 2, 3]),
        };
        // anchor 0 offers columns 1 (popularity 2) and 3 (popularity 3)
        assert_eq!(selection.close().unwrap(), vec![0, 3]);
    }

    #[test]
    fn close_tie_keeps_lowest_index() {
        let m = BinaryMatrix::new(arr2(&[[1, 1, 0, 1], [0, 1, 0, 1], [0, 0, 0, 0]])).unwrap();
        let selection = Selection {
            matrix: &m,
            partition: Partition::from_blocks(vec![vec![0]]),
            selected: vec![0],
            unselected: BTreeSet::from([1, 2, 3]),
        };
        // columns 1 and 3 both hold two 1s
        assert_eq!(selection.close().unwrap(), vec![0, 1]);
    }

    #[test]
    fn close_rejects_all_zero_anchor() {
        let m = BinaryMatrix::new(arr2(&[[0, 0], [1, 1]])).unwrap();
        let selection = Selection {
            matrix: &m,
            partition: Partition::from_blocks(vec![vec![0], vec![1]]),
            selected: vec![0],
            unselected: BTreeSet::from([1]),
        };
        assert_eq!(selection.close(), Err(Error::NoClosingFeature { sample: 0 }));
    }

    #[test]
    fn close_without_candidates_leaves_set_as_is() {
        // anchor 0 carries 1s only on already-selected columns
        let m = BinaryMatrix::new(arr2(&[[1, 1], [0, 1]])).unwrap();
        let selection = Selection {
            matrix: &m,
            partition: Partition::from_blocks(vec![vec![0]]),
            selected: vec![0, 1],
            unselected: BTreeSet::new(),
        };
        assert_eq!(selection.close().unwrap(), vec![0, 1]);
    }
}
