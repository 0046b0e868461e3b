// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Plain-text products. There is no header row; every value is written with
//! 3 decimal places.

use std::path::Path;

use log::debug;
use ndarray::prelude::*;

use super::{remove_stale_file, CsvWriteError};

/// Format a value with 3 decimal places. Non-finite values are spelled "nan",
/// "inf" and "-inf".
pub fn format_value(v: f64) -> String {
    if v.is_nan() {
        "nan".to_string()
    } else if v.is_infinite() {
        if v.is_sign_positive() {
            "inf".to_string()
        } else {
            "-inf".to_string()
        }
    } else {
        format!("{v:.3}")
    }
}

/// Write spectra with the columns frequency \[MHz\] and average power. If
/// `calibrated` is given, the reference power and calibrated SNR columns
/// follow.
pub fn write_spectra_csv<'a>(
    file: &Path,
    frequency_mhz: ArrayView1<f64>,
    average: ArrayView1<'a, f64>,
    calibrated: Option<(ArrayView1<'a, f64>, ArrayView1<'a, f64>)>,
) -> Result<(), CsvWriteError> {
    let mut columns = vec![("average", average)];
    if let Some((reference, snr)) = calibrated {
        columns.push(("reference", reference));
        columns.push(("snr", snr));
    }
    write_columns(file, frequency_mhz, &columns)
}

/// Write a power time series with the columns time \[s\] and power.
pub fn write_power_csv(
    file: &Path,
    time: ArrayView1<f64>,
    power: ArrayView1<f64>,
) -> Result<(), CsvWriteError> {
    write_columns(file, time, &[("power", power)])
}

fn write_columns(
    file: &Path,
    first: ArrayView1<f64>,
    rest: &[(&'static str, ArrayView1<f64>)],
) -> Result<(), CsvWriteError> {
    let expected = first.len();
    for (column, values) in rest {
        if values.len() != expected {
            return Err(CsvWriteError::LengthMismatch {
                column,
                expected,
                got: values.len(),
            });
        }
    }

    remove_stale_file(file)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(file)?;
    let mut record = Vec::with_capacity(rest.len() + 1);
    for (i, &v) in first.iter().enumerate() {
        record.clear();
        record.push(format_value(v));
        record.extend(rest.iter().map(|(_, values)| format_value(values[i])));
        writer.write_record(&record)?;
    }
    writer.flush()?;

    debug!(
        "Wrote {expected} rows of {} columns to '{}'",
        rest.len() + 1,
        file.display()
    );
    Ok(())
}
