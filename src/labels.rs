use crate::error::Error;

/// Map selected column indices back to feature names.
///
/// Each entry resolves independently so one bad index does not void the
/// rest; the presentation layer decides how to render the failure.
pub fn resolve_labels<'a>(names: &'a [String], indices: &[usize]) -> Vec<Result<&'a str, Error>> {
    indices
        .iter()
        .map(|&index| {
            names
                .get(index)
                .map(|name| name.as_str())
                .ok_or(Error::FeatureOutOfRange {
                    index,
                    features: names.len(),
                })
        })
        .collect()
}
