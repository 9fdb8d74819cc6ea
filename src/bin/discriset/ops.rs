use std::fs::File;
use std::io::{stdout, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::warn;

use discriset::{resolve_labels, BinaryMatrix};

/// Placeholder rendered for a selected index with no matching name.
const UNKNOWN_LABEL: &str = "UNKNOWN";

#[derive(Debug)]
pub(crate) struct FileParseError {
    pub message: String,
}

/// Reads in a file formatted as (comma separated):
///     name1,name2,name3
///     0,1,0
///     1,0,0
///
/// The header row names one feature per column; every following row is
/// one sample of 0/1 values, all rows the same length as the header
pub(crate) fn from_file(
    p: PathBuf,
    delimiter: &str,
) -> Result<(BinaryMatrix, Vec<String>), FileParseError> {
    let file = File::open(p).map_err(|e| FileParseError {
        message: format!("Unable to open file: {}", e),
    })?;
    let reader = BufReader::new(file);
    let mut lines = reader.lines().map(|l| {
        l.map_err(|e| FileParseError {
            message: format!("Unable to read file: {}", e),
        })
    });
    // Header row of feature names
    let header = match lines.next() {
        Some(line) => line?,
        None => {
            return Err(FileParseError {
                message: "Data file is empty".to_string(),
            })
        }
    };
    let features: Vec<String> = header
        .trim_end()
        .split(delimiter)
        .map(|name| name.to_string())
        .collect();
    // Rest are 0/1 sample rows
    let mut rows: Vec<Vec<u8>> = Vec::new();
    for (idx, line) in lines.enumerate() {
        let line = line?;
        let mut row: Vec<u8> = Vec::with_capacity(features.len());
        for cell in line.trim_end().split(delimiter) {
            match cell.trim().parse::<u8>() {
                Ok(value) => row.push(value),
                Err(_) => {
                    return Err(FileParseError {
                        message: format!("Error parsing file at line {}", idx + 2),
                    })
                }
            }
        }
        if row.len() != features.len() {
            return Err(FileParseError {
                message: format!(
                    "Line {} holds {} values but the header names {} features",
                    idx + 2,
                    row.len(),
                    features.len()
                ),
            });
        }
        rows.push(row);
    }
    let matrix = BinaryMatrix::from_rows(rows).map_err(|e| FileParseError {
        message: e.to_string(),
    })?;
    Ok((matrix, features))
}

/// Dataset label from the input file name, extension stripped.
pub(crate) fn dataset_label(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Resolve the selected indices to names, rendering out-of-range entries
/// with the placeholder label.
fn signature_names<'a>(features: &'a [String], selected: &[usize]) -> Vec<&'a str> {
    resolve_labels(features, selected)
        .into_iter()
        .map(|resolved| match resolved {
            Ok(name) => name,
            Err(e) => {
                warn!("{}", e);
                UNKNOWN_LABEL
            }
        })
        .collect()
}

pub(crate) fn display_results(
    matrix: &BinaryMatrix,
    selected: &[usize],
    features: &[String],
    label: &str,
    elapsed: Duration,
) {
    let mut writer = BufWriter::new(stdout());
    writer
        .write_all(format!("Dataset: {}\n", label).as_ref())
        .unwrap();
    writer
        .write_all(format!("Samples: {}\n", matrix.samples()).as_ref())
        .unwrap();
    writer
        .write_all(format!("Features: {}\n", matrix.features()).as_ref())
        .unwrap();
    writer
        .write_all(format!("Signature: {}\n", signature_names(features, selected).join(",")).as_ref())
        .unwrap();
    writer
        .write_all(format!("Time (seconds): {}\n", elapsed.as_secs_f64()).as_ref())
        .unwrap();
    writer
        .write_all(format!("Signature size: {}\n", selected.len()).as_ref())
        .unwrap();
    writer.flush().unwrap();
}

/// Write the selected feature names to `path`, one per line.
pub(crate) fn write_signature(
    path: &Path,
    features: &[String],
    selected: &[usize],
) -> Result<(), FileParseError> {
    let file = File::create(path).map_err(|e| FileParseError {
        message: format!("Unable to create output file: {}", e),
    })?;
    let mut writer = BufWriter::new(file);
    for name in signature_names(features, selected) {
        writeln!(writer, "{}", name).map_err(|e| FileParseError {
            message: format!("Unable to write output file: {}", e),
        })?;
    }
    writer.flush().map_err(|e| FileParseError {
        message: format!("Unable to write output file: {}", e),
    })
}
