// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ObservationError {
    #[error("The number of channels was 0; this is not permitted")]
    ZeroChannels,

    #[error("The observation parameter '{name}' must be a positive number, but it was {value}")]
    NotPositive { name: &'static str, value: f64 },

    #[error("t_sample ({t_sample} s) * bandwidth ({bandwidth} Hz) / channels ({channels}) is less than 1; there would be no FFT bins per sample")]
    ZeroBins {
        t_sample: f64,
        bandwidth: f64,
        channels: usize,
    },
}
