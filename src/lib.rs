// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Reduction of radiometer power spectra into calibrated, noise-normalised
spectral-line products.

A raw capture is a waterfall of averaged power spectra. It is reduced into an
average spectrum, a power time series and, given an off-source reference
capture, a calibrated signal-to-noise spectrum.
 */

pub mod acquire;
mod cli;
pub mod constants;
pub mod io;
pub mod observation;
pub mod params;
#[cfg(feature = "plotting")]
pub mod plot;
pub mod reduce;
mod unit_parsing;

// Re-exports.
pub use cli::{HiReduce, HiReduceError};
pub use observation::{HeaderRecord, ObservationParameters};
pub use params::{ObserveParams, ReduceParams, Reduction};
pub use reduce::{Mask, PowerScale};
