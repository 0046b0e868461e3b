// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnrError {
    #[error("The mask has {mask} channels, but the spectrum has {spectrum}")]
    MaskLength { spectrum: usize, mask: usize },
}

#[derive(Error, Debug)]
pub enum CalibrateError {
    #[error("The on-source spectrum has {on} channels, but the reference spectrum has {off}")]
    LengthMismatch { on: usize, off: usize },

    #[error(transparent)]
    Snr(#[from] SnrError),
}
