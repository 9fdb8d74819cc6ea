use thiserror::Error;

/// Failures surfaced while validating an input table or running a
/// selection over it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The input table has no rows or no columns.
    #[error("input table is empty")]
    EmptyMatrix,
    /// A row's length differs from the table width.
    #[error("row {row} holds {found} values, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// A cell holds something other than 0 or 1.
    #[error("non-binary value {value} at row {row}, column {column}")]
    NonBinaryValue {
        row: usize,
        column: usize,
        value: u8,
    },
    /// The closing step's anchor sample has no value-1 column to draw a
    /// closing feature from.
    #[error("sample {sample} has no candidate closing feature")]
    NoClosingFeature { sample: usize },
    /// A selected index does not name a column of the table.
    #[error("feature index {index} is outside 0..{features}")]
    FeatureOutOfRange { index: usize, features: usize },
}
