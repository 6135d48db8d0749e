/////////////////////////////////////////////////////////////////////////////////////////////
//
// Defines shared helpers for loading training data from CSV files.
//
// Created on: 03 Aug 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! Turning recorded trajectory CSV files into (inputs, targets) matrices.
use csv::ReaderBuilder;
use faer::{Mat, MatRef};
use std::error::Error;
use std::fs::File;

/// Load a CSV file into separate input and target matrices.
///
/// The final `num_target_columns` columns are treated as the regression
/// targets; all preceding columns form the input coordinates. This is the
/// expected layout for recorded trajectory data (e.g. time or joint state
/// columns followed by the observed output columns).
///
/// # Arguments
/// * `file_path` - Path to the CSV file.
/// * `has_headers` - Whether the file has a single header row to skip.
/// * `num_target_columns` - How many trailing columns hold targets; at least 1.
///
/// # Returns
/// On success, returns `(inputs, targets)` where `inputs` has shape
/// `(n_rows, n_cols - num_target_columns)` and `targets` has shape
/// `(n_rows, num_target_columns)`.
pub fn csv_to_training_data(
    file_path: &str,
    has_headers: bool,
    num_target_columns: usize,
) -> Result<(Mat<f64>, Mat<f64>), Box<dyn Error>> {
    assert!(
        num_target_columns >= 1,
        "at least one target column is required"
    );

    let file = File::open(file_path)?;
    let mut reader = ReaderBuilder::new()
        .has_headers(has_headers)
        .from_reader(file);

    let mut input_data = Vec::new();
    let mut target_data = Vec::new();
    let mut num_rows = 0;
    let mut num_cols = 0;

    for result in reader.records() {
        let record = result?;
        if num_cols == 0 {
            num_cols = record.len();
            if num_cols <= num_target_columns {
                return Err(format!(
                    "CSV rows have {} columns but {} target columns were requested",
                    num_cols, num_target_columns
                )
                .into());
            }
        } else if record.len() != num_cols {
            return Err("Inconsistent number of columns in CSV".into());
        }

        for (i, value) in record.iter().enumerate() {
            let parsed_value: f64 = value.parse()?;
            if i < num_cols - num_target_columns {
                input_data.push(parsed_value);
            } else {
                target_data.push(parsed_value);
            }
        }

        num_rows += 1;
    }

    let num_input_cols = num_cols - num_target_columns;
    let inputs =
        MatRef::from_row_major_slice(input_data.as_slice(), num_rows, num_input_cols).to_owned();
    let targets =
        MatRef::from_row_major_slice(target_data.as_slice(), num_rows, num_target_columns)
            .to_owned();

    Ok((inputs, targets))
}
