// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Collapsing a waterfall into spectra and time series.

use ndarray::prelude::*;
use serde::{Deserialize, Serialize};

/// `10 * log10(x)`.
#[inline]
pub fn decibel(x: f64) -> f64 {
    10.0 * x.log10()
}

/// How power values are presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PowerScale {
    #[default]
    Linear,
    Decibel,
}

impl PowerScale {
    pub fn from_db_flag(db: bool) -> PowerScale {
        if db {
            PowerScale::Decibel
        } else {
            PowerScale::Linear
        }
    }

    pub fn is_decibel(self) -> bool {
        matches!(self, PowerScale::Decibel)
    }

    /// Scale a spectrum or time series.
    pub fn apply(self, values: Array1<f64>) -> Array1<f64> {
        match self {
            PowerScale::Linear => values,
            PowerScale::Decibel => values.mapv_into(decibel),
        }
    }

    /// Scale a waterfall (e.g. for display).
    pub fn apply_waterfall(self, waterfall: ArrayView2<f32>) -> Array2<f64> {
        match self {
            PowerScale::Linear => waterfall.mapv(|v| v as f64),
            PowerScale::Decibel => waterfall.mapv(|v| decibel(v as f64)),
        }
    }
}

/// The mean power of each channel over all sub-integrations.
pub fn average_spectrum(waterfall: ArrayView2<f32>) -> Array1<f64> {
    let subs = waterfall.len_of(Axis(0)) as f64;
    waterfall.fold_axis(Axis(0), 0.0, |acc, &v| acc + v as f64) / subs
}

/// As [`average_spectrum`], but NaN samples don't contribute. A channel with
/// no valid samples is NaN.
pub fn average_spectrum_ignoring_nan(waterfall: ArrayView2<f32>) -> Array1<f64> {
    waterfall
        .axis_iter(Axis(1))
        .map(|channel| {
            let (sum, count) = channel
                .iter()
                .filter(|v| !v.is_nan())
                .fold((0.0, 0_usize), |(sum, count), &v| (sum + v as f64, count + 1));
            sum / count as f64
        })
        .collect()
}

/// The mean power over all channels of each sub-integration.
pub fn time_series(waterfall: ArrayView2<f32>) -> Array1<f64> {
    let channels = waterfall.len_of(Axis(1)) as f64;
    waterfall.fold_axis(Axis(1), 0.0, |acc, &v| acc + v as f64) / channels
}
