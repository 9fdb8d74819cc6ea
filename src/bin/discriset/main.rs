#[macro_use]
extern crate clap;

use std::path::Path;
use std::process::exit;
use std::time::Instant;

use log::info;

use discriset::GreedySelector;

use crate::ops::{dataset_label, display_results, from_file, write_signature};

mod ops;

fn main() {
    env_logger::init();
    let matches = clap_app!(discriset =>
        (version: "0.1.0")
        (about: "Greedy discriminating feature-set selection for binary sample tables")
        (@arg INPUT: +required "Delimited input file: header row of feature names, then rows of 0/1 values")
        (@arg DELIMITER: -d --delimiter +takes_value "Field delimiter, default=,")
        (@arg THREADS: -t --threads +takes_value "Number of worker threads, default=4")
        (@arg OUTPUT: -o --output +takes_value "Write the selected feature names to this file, one per line")
    )
    .get_matches();

    let input_file = matches.value_of("INPUT").unwrap().to_string();
    if !Path::new(&input_file).exists() {
        eprintln!("Unable to locate input file {}", input_file);
        exit(1);
    }
    let delimiter = matches.value_of("DELIMITER").unwrap_or(",");
    let threads = matches
        .value_of("THREADS")
        .unwrap_or("4")
        .parse::<usize>()
        .unwrap_or_else(|_| {
            eprintln!("Unable to parse threads");
            exit(1);
        });
    if threads < 1 || delimiter.is_empty() {
        eprintln!("Improper parameter set!");
        exit(2);
    }

    println!("Processing file: {}", input_file);
    let (matrix, features) = match from_file(Path::new(&input_file).to_path_buf(), delimiter) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("{}", e.message);
            exit(1);
        }
    };
    info!(
        "loaded {} samples x {} features from {}",
        matrix.samples(),
        matrix.features(),
        input_file
    );

    let start = Instant::now();
    let selected = match GreedySelector::new(threads).select(&matrix) {
        Ok(selected) => selected,
        Err(e) => {
            eprintln!("{}", e);
            exit(1);
        }
    };
    let elapsed = start.elapsed();

    display_results(
        &matrix,
        &selected,
        &features,
        &dataset_label(Path::new(&input_file)),
        elapsed,
    );
    if let Some(output) = matches.value_of("OUTPUT") {
        if let Err(e) = write_signature(Path::new(output), &features, &selected) {
            eprintln!("{}", e.message);
            exit(1);
        }
    }
}
