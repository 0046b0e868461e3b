// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Interference mitigation.

use ndarray::prelude::*;
use rayon::prelude::*;

/// Replace each value with the median of the `window` values starting at it.
/// The window is forward-looking and shrinks at the end of the series; it is
/// never centred or padded. A window of 0 leaves the series untouched.
pub fn median_filter(series: ArrayView1<f64>, window: usize) -> Array1<f64> {
    if window == 0 {
        return series.to_owned();
    }
    let values = series.to_vec();
    let n = values.len();
    let filtered: Vec<f64> = (0..n)
        .into_par_iter()
        .map(|i| median(&values[i..i.saturating_add(window).min(n)]))
        .collect();
    Array1::from(filtered)
}

/// NaN if any value is NaN. Even-length inputs give the mean of the middle
/// two values.
fn median(values: &[f64]) -> f64 {
    if values.is_empty() || values.iter().any(|v| v.is_nan()) {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}
