// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Useful constants.

All constants *must* be double precision. Reductions are done in double
precision; only the raw waterfall is kept in single precision.
 */

pub use std::f64::consts::{PI, TAU};

/// Speed of light in a vacuum \[km/s\].
pub const VEL_C_KM_S: f64 = 299_792.458;

/// The rest frequency of the neutral hydrogen hyperfine transition \[Hz\].
pub const HI_REST_FREQ_HZ: f64 = 1420.40575e6;

/// The Modified Julian Date of the Unix epoch (1970-01-01T00:00:00 UTC).
pub const MJD_UNIX_EPOCH: f64 = 40587.0;

/// The number of seconds in a (non-leap) day.
pub const SECONDS_PER_DAY: f64 = 86400.0;

/// Channels with frequencies greater than the rest frequency minus this
/// margin are masked from noise estimation \[MHz\]. Suits galactic HI.
pub const MASK_LOWER_MARGIN_MHZ: f64 = 0.2;

/// Channels with frequencies less than the rest frequency plus this margin
/// are masked from noise estimation \[MHz\]. Suits galactic HI.
pub const MASK_UPPER_MARGIN_MHZ: f64 = 0.8;

/// The number of points used to evaluate a fitted Gaussian.
pub const NUM_GAUSSIAN_FIT_POINTS: usize = 100;

/// Histograms of a power time series get one bin per this many samples...
pub const SAMPLES_PER_HISTOGRAM_BIN: usize = 50;

/// ... but never fewer bins than this.
pub const MIN_HISTOGRAM_BINS: usize = 10;

/// The extension given to observation header sidecar files.
pub const HEADER_EXTENSION: &str = "header";

/// The default name of a capture file.
pub const DEFAULT_OBS_FILE: &str = "observation.dat";

/// Default front-end RF gain \[dB\].
pub const DEFAULT_RF_GAIN: f64 = 10.0;

/// Default front-end IF gain \[dB\].
pub const DEFAULT_IF_GAIN: f64 = 20.0;

/// Default front-end baseband gain \[dB\].
pub const DEFAULT_BB_GAIN: f64 = 20.0;

/// Default observing duration \[s\].
pub const DEFAULT_DURATION: f64 = 60.0;

/// The program run to acquire a capture if no other is given.
pub const DEFAULT_ACQUISITION_PROGRAM: &str = "run_observation";
