// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Signal-to-noise estimation of spectra.

use ndarray::prelude::*;

use super::SnrError;
use crate::constants::{MASK_LOWER_MARGIN_MHZ, MASK_UPPER_MARGIN_MHZ};

/// Channels excluded from noise and background estimation. `true` means
/// excluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask(Vec<bool>);

impl Mask {
    /// A mask that excludes nothing.
    pub fn none(channels: usize) -> Mask {
        Mask(vec![false; channels])
    }

    /// Exclude channels where a galactic HI line at `rest_frequency` \[Hz\]
    /// could be, i.e. channels strictly between `rest - 0.2 MHz` and `rest +
    /// 0.8 MHz`. If there's no rest frequency (or it's zero), nothing is
    /// excluded.
    pub fn from_rest_frequency(
        frequency_axis_mhz: ArrayView1<f64>,
        rest_frequency: Option<f64>,
    ) -> Mask {
        match rest_frequency {
            Some(f_rest) if f_rest != 0.0 => {
                let f_rest_mhz = f_rest * 1e-6;
                let lower = f_rest_mhz - MASK_LOWER_MARGIN_MHZ;
                let upper = f_rest_mhz + MASK_UPPER_MARGIN_MHZ;
                Mask(
                    frequency_axis_mhz
                        .iter()
                        .map(|&f| f > lower && f < upper)
                        .collect(),
                )
            }
            _ => Mask::none(frequency_axis_mhz.len()),
        }
    }

    pub fn from_vec(mask: Vec<bool>) -> Mask {
        Mask(mask)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }

    /// Channels beyond the end of the mask are not masked.
    pub fn is_masked(&self, channel: usize) -> bool {
        self.0.get(channel).copied().unwrap_or(false)
    }

    pub fn num_masked(&self) -> usize {
        self.0.iter().filter(|&&m| m).count()
    }

    /// The number of channel differences that contribute to the noise
    /// estimate. The first and last channels never do.
    pub fn num_noise_channels(&self) -> usize {
        if self.0.len() < 3 {
            return 0;
        }
        self.0[1..self.0.len() - 1].iter().filter(|&&m| !m).count()
    }
}

/// Estimate the noise of a spectrum from the differences of channels either
/// side of each unmasked interior channel. The population standard deviation
/// of the differences is divided by sqrt(2). NaN if no channel is usable.
pub fn noise_estimate(spectrum: ArrayView1<f64>, mask: &Mask) -> f64 {
    let n = spectrum.len();
    if n < 3 {
        return f64::NAN;
    }
    let diffs: Vec<f64> = (1..n - 1)
        .filter(|&i| !mask.is_masked(i))
        .map(|i| spectrum[i + 1] - spectrum[i - 1])
        .collect();
    if diffs.is_empty() {
        return f64::NAN;
    }
    let len = diffs.len() as f64;
    let mean = diffs.iter().sum::<f64>() / len;
    let var = diffs.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / len;
    var.sqrt() / std::f64::consts::SQRT_2
}

/// The mean of the unmasked channels, ignoring NaNs. NaN if nothing is left.
pub fn background(spectrum: ArrayView1<f64>, mask: &Mask) -> f64 {
    let (sum, count) = spectrum
        .iter()
        .enumerate()
        .filter(|&(i, v)| !mask.is_masked(i) && !v.is_nan())
        .fold((0.0, 0_usize), |(sum, count), (_, v)| (sum + v, count + 1));
    sum / count as f64
}

/// Normalise a spectrum by its noise after subtracting its background.
///
/// Without a mask, every channel is used to estimate the noise and
/// background; a real spectral line will then bias both estimates. The
/// estimator itself never fails on numbers: a flat spectrum has zero noise
/// and gives non-finite output, and a mask leaving no noise channels gives
/// NaN.
pub fn snr(spectrum: ArrayView1<f64>, mask: Option<&Mask>) -> Result<Array1<f64>, SnrError> {
    let default_mask;
    let mask = match mask {
        Some(m) => {
            if m.len() != spectrum.len() {
                return Err(SnrError::MaskLength {
                    spectrum: spectrum.len(),
                    mask: m.len(),
                });
            }
            m
        }
        None => {
            default_mask = Mask::none(spectrum.len());
            &default_mask
        }
    };

    let noise = noise_estimate(spectrum, mask);
    let background = background(spectrum, mask);
    Ok(spectrum.mapv(|v| (v - background) / noise))
}
