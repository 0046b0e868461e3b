// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Observation parameters, and the metadata record persisted alongside a
//! capture file.

mod error;
#[cfg(test)]
mod tests;

pub use error::ObservationError;

use serde::{Deserialize, Serialize};

use crate::constants::*;

/// The parameters of a single radiometer observation.
///
/// Only `frequency`, `bandwidth`, `channels` and `t_sample` are needed to
/// reduce data; the rest are only meaningful to the acquisition front end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationParameters {
    /// Arguments handed to the SDR device driver.
    pub dev_args: String,

    /// RF gain \[dB\].
    pub rf_gain: f64,

    /// IF gain \[dB\].
    pub if_gain: f64,

    /// Baseband gain \[dB\].
    pub bb_gain: f64,

    /// The centre frequency \[Hz\].
    pub frequency: f64,

    /// The total bandwidth \[Hz\].
    pub bandwidth: f64,

    /// The number of frequency channels (the FFT size).
    pub channels: usize,

    /// The duration of a single sub-integration \[s\].
    pub t_sample: f64,

    /// The total observing duration \[s\].
    pub duration: f64,
}

impl Default for ObservationParameters {
    fn default() -> Self {
        Self {
            dev_args: String::new(),
            rf_gain: DEFAULT_RF_GAIN,
            if_gain: DEFAULT_IF_GAIN,
            bb_gain: DEFAULT_BB_GAIN,
            frequency: 0.0,
            bandwidth: 0.0,
            channels: 0,
            t_sample: 0.0,
            duration: DEFAULT_DURATION,
        }
    }
}

impl ObservationParameters {
    /// Parameters with default acquisition settings.
    pub fn new(frequency: f64, bandwidth: f64, channels: usize, t_sample: f64) -> Self {
        Self {
            frequency,
            bandwidth,
            channels,
            t_sample,
            ..Default::default()
        }
    }

    /// Check that the parameters used for reduction make sense together.
    pub fn validate(&self) -> Result<(), ObservationError> {
        if self.channels == 0 {
            return Err(ObservationError::ZeroChannels);
        }
        for (name, value) in [
            ("frequency", self.frequency),
            ("bandwidth", self.bandwidth),
            ("t_sample", self.t_sample),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ObservationError::NotPositive { name, value });
            }
        }
        self.bins().map(|_| ())
    }

    /// As [`ObservationParameters::validate`], but also check the
    /// acquisition-only fields.
    pub fn validate_acquisition(&self) -> Result<(), ObservationError> {
        self.validate()?;
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(ObservationError::NotPositive {
                name: "duration",
                value: self.duration,
            });
        }
        Ok(())
    }

    /// The number of FFT bins accumulated into each sample, i.e.
    /// `floor(t_sample * bandwidth / channels)`. Raw samples are divided by
    /// this number when they are loaded.
    pub fn bins(&self) -> Result<usize, ObservationError> {
        if self.channels == 0 {
            return Err(ObservationError::ZeroChannels);
        }
        let bins = (self.t_sample * self.bandwidth / self.channels as f64).floor();
        if !bins.is_finite() || bins < 1.0 {
            return Err(ObservationError::ZeroBins {
                t_sample: self.t_sample,
                bandwidth: self.bandwidth,
                channels: self.channels,
            });
        }
        Ok(bins as usize)
    }
}

/// Convert a Unix timestamp \[s\] into a Modified Julian Date \[days\].
pub fn unix_to_mjd(unix_seconds: f64) -> f64 {
    unix_seconds / SECONDS_PER_DAY + MJD_UNIX_EPOCH
}

/// Everything persisted in a header sidecar file: the observation parameters
/// and the epoch of the capture.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderRecord {
    /// The Modified Julian Date at the start of the capture. Not all headers
    /// carry it.
    pub mjd: Option<f64>,

    pub params: ObservationParameters,
}

impl HeaderRecord {
    /// Make a new record from a capture start time given as Unix seconds.
    pub fn from_unix_epoch(params: ObservationParameters, unix_seconds: f64) -> HeaderRecord {
        HeaderRecord {
            mjd: Some(unix_to_mjd(unix_seconds)),
            params,
        }
    }
}
