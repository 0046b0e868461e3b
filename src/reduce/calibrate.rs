// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Calibration against an off-source reference spectrum.

use ndarray::prelude::*;

use super::{snr, CalibrateError, Mask, PowerScale};

/// The ratio of the on-source spectrum to the reference. Decibel spectra are
/// converted back to linear power first, i.e. `10^((on - off) / 10)`.
pub fn calibrate_ratio(
    on: ArrayView1<f64>,
    off: ArrayView1<f64>,
    scale: PowerScale,
) -> Result<Array1<f64>, CalibrateError> {
    if on.len() != off.len() {
        return Err(CalibrateError::LengthMismatch {
            on: on.len(),
            off: off.len(),
        });
    }
    let ratio = match scale {
        PowerScale::Decibel => (&on - &off).mapv_into(|d| 10_f64.powf(d / 10.0)),
        PowerScale::Linear => &on / &off,
    };
    Ok(ratio)
}

/// Calibrate the on-source spectrum and normalise it by its noise with
/// [`snr`].
pub fn calibrate(
    on: ArrayView1<f64>,
    off: ArrayView1<f64>,
    scale: PowerScale,
    mask: Option<&Mask>,
) -> Result<Array1<f64>, CalibrateError> {
    let ratio = calibrate_ratio(on, off, scale)?;
    Ok(snr(ratio.view(), mask)?)
}
