// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Distributions of power time series.

use ndarray::prelude::*;

use crate::constants::{MIN_HISTOGRAM_BINS, NUM_GAUSSIAN_FIT_POINTS, SAMPLES_PER_HISTOGRAM_BIN, TAU};

/// A Gaussian with the same mean and variance as a series, evaluated over
/// the range of the series.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianFit {
    pub mean: f64,

    /// Population variance.
    pub variance: f64,

    pub x: Array1<f64>,
    pub density: Array1<f64>,
}

/// Moment-match a Gaussian to a series. This is not a least-squares fit, so
/// outliers (e.g. interference spikes) pull it around. A series with no
/// variance gives non-finite densities.
pub fn gaussian_fit(series: ArrayView1<f64>) -> GaussianFit {
    let n = series.len() as f64;
    let mean = series.sum() / n;
    let variance = series.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let (min, max) = min_max(series);

    let x = Array1::linspace(min, max, NUM_GAUSSIAN_FIT_POINTS);
    let norm = (TAU * variance).sqrt();
    let density = x.mapv(|x| (-(x - mean).powi(2) / (2.0 * variance)).exp() / norm);
    GaussianFit {
        mean,
        variance,
        x,
        density,
    }
}

/// NaN is propagated.
fn min_max(series: ArrayView1<f64>) -> (f64, f64) {
    if series.is_empty() || series.iter().any(|v| v.is_nan()) {
        return (f64::NAN, f64::NAN);
    }
    series
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), &v| {
            (min.min(v), max.max(v))
        })
}

/// A histogram normalised to a probability density.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// Bin edges; one more than the number of bins.
    pub edges: Array1<f64>,
    pub density: Array1<f64>,
}

/// The number of histogram bins for a series of `len` samples.
pub fn num_histogram_bins(len: usize) -> usize {
    (len / SAMPLES_PER_HISTOGRAM_BIN).max(MIN_HISTOGRAM_BINS)
}

/// Bin the finite values of a series into `bins` equal-width bins spanning
/// their range. The last bin includes its upper edge. If all values are the
/// same, the range is widened by 0.5 either side. The integral of the density
/// over the range is 1 (or NaN if there are no finite values).
pub fn histogram_density(series: ArrayView1<f64>, bins: usize) -> Histogram {
    let bins = bins.max(1);
    let finite: Vec<f64> = series.iter().copied().filter(|v| v.is_finite()).collect();
    let (mut min, mut max) = if finite.is_empty() {
        (0.0, 1.0)
    } else {
        min_max(ArrayView1::from(&finite))
    };
    if min == max {
        min -= 0.5;
        max += 0.5;
    }

    let width = (max - min) / bins as f64;
    let mut counts = vec![0_usize; bins];
    for &v in &finite {
        let i = (((v - min) / width) as usize).min(bins - 1);
        counts[i] += 1;
    }

    let total = finite.len() as f64;
    Histogram {
        edges: Array1::linspace(min, max, bins + 1),
        density: counts
            .into_iter()
            .map(|c| c as f64 / (total * width))
            .collect(),
    }
}
