// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The spectral reduction and calibration engine.
//!
//! Everything here is a pure function of its inputs: a waterfall goes in,
//! and new spectra, time series and fits come out. Nothing is modified in
//! place.

mod aggregate;
mod axes;
mod calibrate;
mod error;
mod fit;
mod rfi;
mod snr;

pub use aggregate::{
    average_spectrum, average_spectrum_ignoring_nan, decibel, time_series, PowerScale,
};
pub use axes::{frequency_axis_mhz, time_axis, velocity_edges, velocity_km_s, WaterfallWcs};
pub use calibrate::{calibrate, calibrate_ratio};
pub use error::{CalibrateError, SnrError};
pub use fit::{gaussian_fit, histogram_density, num_histogram_bins, GaussianFit, Histogram};
pub use rfi::median_filter;
pub use snr::{background, noise_estimate, snr, Mask};
