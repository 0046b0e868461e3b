// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Frequency, time and velocity axes.

use ndarray::prelude::*;

use crate::{constants::VEL_C_KM_S, observation::ObservationParameters};

/// The frequency \[MHz\] of each channel. The band starts at `frequency -
/// bandwidth / 2` and the upper edge is excluded.
pub fn frequency_axis_mhz(frequency: f64, bandwidth: f64, channels: usize) -> Array1<f64> {
    let start = frequency - bandwidth / 2.0;
    let step = bandwidth / channels as f64;
    Array1::from_shape_fn(channels, |i| (start + i as f64 * step) * 1e-6)
}

/// The time \[s\] of each sub-integration relative to the start of the capture.
pub fn time_axis(subs: usize, t_sample: f64) -> Array1<f64> {
    Array1::from_shape_fn(subs, |i| i as f64 * t_sample)
}

/// The Doppler velocities \[km/s\] corresponding to the lower and upper edges of
/// the band, relative to `rest_frequency` \[Hz\]. These are only suitable as
/// axis limits. `None` is returned if there's no usable rest frequency.
pub fn velocity_edges(frequency: f64, bandwidth: f64, rest_frequency: f64) -> Option<(f64, f64)> {
    if rest_frequency == 0.0 || !rest_frequency.is_finite() {
        return None;
    }
    let (f, bw, f_rest) = (frequency, bandwidth, rest_frequency);
    let left = -VEL_C_KM_S * (bw - 2.0 * f + 2.0 * f_rest) / (bw - 2.0 * f);
    let right = VEL_C_KM_S * (-bw - 2.0 * f + 2.0 * f_rest) / (bw + 2.0 * f);
    Some((left, right))
}

/// The Doppler velocity \[km/s\] of `frequency_mhz` relative to
/// `rest_frequency` \[Hz\]. Positive velocities are below the rest frequency.
pub fn velocity_km_s(frequency_mhz: f64, rest_frequency: f64) -> f64 {
    let f = frequency_mhz * 1e6;
    VEL_C_KM_S * (rest_frequency - f) / f
}

/// World-coordinate reference values for a waterfall image. Axis 1 is
/// frequency \[MHz\], axis 2 is relative time \[s\].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaterfallWcs {
    pub crpix1: usize,
    pub crval1: f64,
    pub cdelt1: f64,
    pub crpix2: usize,
    pub crval2: f64,
    pub cdelt2: f64,
}

impl WaterfallWcs {
    /// The reference pixels are the middle channel and middle sub-integration
    /// (rounded down).
    pub fn new(params: &ObservationParameters, subs: usize) -> WaterfallWcs {
        let crpix1 = params.channels / 2;
        let crpix2 = subs / 2;
        let step = params.bandwidth / params.channels as f64;
        WaterfallWcs {
            crpix1,
            crval1: (params.frequency - params.bandwidth / 2.0 + crpix1 as f64 * step) * 1e-6,
            cdelt1: params.bandwidth * 1e-6 / params.channels as f64,
            crpix2,
            crval2: crpix2 as f64 * params.t_sample,
            cdelt2: params.t_sample,
        }
    }
}
