// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error type for all hi_reduce-related errors. This should be the *only*
//! error enum that is publicly visible.

use thiserror::Error;

use super::{common::ObservationArgsError, observe::ObserveArgsError};
use crate::{
    acquire::AcquireError,
    io::{
        read::{HeaderReadError, WaterfallReadError},
        write::{CsvWriteError, FitsWriteError, HeaderWriteError},
    },
    observation::ObservationError,
    params::ReduceError,
    reduce::{CalibrateError, SnrError},
    unit_parsing::UnitParseError,
};

/// The *only* publicly visible error from hi_reduce. Each kind tells the user
/// where to start looking.
#[derive(Error, Debug)]
pub enum HiReduceError {
    /// Malformed data or metadata, e.g. a capture that doesn't divide into
    /// whole spectra, or a header without a required key.
    #[error("{0}\n\nCheck that the capture, its header and the observation parameters belong together.")]
    Format(String),

    /// An invalid combination of parameters.
    #[error("{0}")]
    Config(String),

    /// An error from the acquisition front end.
    #[error("{0}\n\nThe radio front end is driven by an external program; try turning up verbosity (-v or -vv) to see how it was called.")]
    Acquisition(String),

    /// An error related to argument files.
    #[error("{0}")]
    ArgFile(String),

    /// A cfitsio error. Because these are usually quite spartan, some
    /// suggestions are provided here.
    #[error("cfitsio error: {0}\n\nIf you don't know what this means, try turning up verbosity (-v or -vv).")]
    Cfitsio(String),

    /// An error related to plotting.
    #[error("{0}")]
    Plot(String),

    /// A generic error that can't be clarified further, e.g. IO errors.
    #[error("{0}")]
    Generic(String),
}

// When changing the error propagation below, ensure `Self::from(e)` uses the
// correct `e`!

// Binary sub-command errors.

impl From<ObservationArgsError> for HiReduceError {
    fn from(e: ObservationArgsError) -> Self {
        match e {
            ObservationArgsError::UnitParse(e) => Self::from(e),
            ObservationArgsError::Missing(_) => Self::Config(e.to_string()),
        }
    }
}

impl From<ObserveArgsError> for HiReduceError {
    fn from(e: ObserveArgsError) -> Self {
        match e {
            ObserveArgsError::Observation(e) => Self::from(e),
            ObserveArgsError::UnitParse(e) => Self::from(e),
            ObserveArgsError::NegativeStart(_) => Self::Config(e.to_string()),
        }
    }
}

// Library code errors.

impl From<ObservationError> for HiReduceError {
    fn from(e: ObservationError) -> Self {
        Self::Config(e.to_string())
    }
}

impl From<UnitParseError> for HiReduceError {
    fn from(e: UnitParseError) -> Self {
        Self::Config(e.to_string())
    }
}

impl From<WaterfallReadError> for HiReduceError {
    fn from(e: WaterfallReadError) -> Self {
        match e {
            WaterfallReadError::DoesNotExist(_) | WaterfallReadError::IO(_) => {
                Self::Generic(e.to_string())
            }
            WaterfallReadError::ZeroChannels | WaterfallReadError::ZeroBins => {
                Self::Config(e.to_string())
            }
            WaterfallReadError::PartialSample { .. }
            | WaterfallReadError::Empty(_)
            | WaterfallReadError::NotDivisible { .. }
            | WaterfallReadError::Shape(_) => Self::Format(e.to_string()),
        }
    }
}

impl From<HeaderReadError> for HiReduceError {
    fn from(e: HeaderReadError) -> Self {
        match e {
            HeaderReadError::IO(_) => Self::Generic(e.to_string()),
            HeaderReadError::DoesNotExist(_)
            | HeaderReadError::NotKeyValue { .. }
            | HeaderReadError::MissingKey { .. }
            | HeaderReadError::NotNumeric { .. } => Self::Format(e.to_string()),
        }
    }
}

impl From<HeaderWriteError> for HiReduceError {
    fn from(e: HeaderWriteError) -> Self {
        Self::Generic(e.to_string())
    }
}

impl From<SnrError> for HiReduceError {
    fn from(e: SnrError) -> Self {
        Self::Format(e.to_string())
    }
}

impl From<CalibrateError> for HiReduceError {
    fn from(e: CalibrateError) -> Self {
        match e {
            CalibrateError::Snr(e) => Self::from(e),
            CalibrateError::LengthMismatch { .. } => Self::Format(e.to_string()),
        }
    }
}

impl From<FitsWriteError> for HiReduceError {
    fn from(e: FitsWriteError) -> Self {
        match e {
            FitsWriteError::EmptyWaterfall => Self::Format(e.to_string()),
            FitsWriteError::Fitsio(_) => Self::Cfitsio(e.to_string()),
            FitsWriteError::IO(_) => Self::Generic(e.to_string()),
        }
    }
}

impl From<CsvWriteError> for HiReduceError {
    fn from(e: CsvWriteError) -> Self {
        match e {
            CsvWriteError::LengthMismatch { .. } => Self::Format(e.to_string()),
            CsvWriteError::Csv(_) | CsvWriteError::IO(_) => Self::Generic(e.to_string()),
        }
    }
}

impl From<AcquireError> for HiReduceError {
    fn from(e: AcquireError) -> Self {
        match e {
            AcquireError::Observation(e) => Self::from(e),
            AcquireError::HeaderWrite(e) => Self::from(e),
            AcquireError::IO(_) => Self::Generic(e.to_string()),
            AcquireError::Spawn { .. }
            | AcquireError::Failed { .. }
            | AcquireError::NoOutput(_)
            | AcquireError::Clock(_) => Self::Acquisition(e.to_string()),
        }
    }
}

impl From<ReduceError> for HiReduceError {
    fn from(e: ReduceError) -> Self {
        match e {
            ReduceError::AllChannelsMasked { .. } => Self::Config(e.to_string()),
            ReduceError::NoPlottingFeature => Self::Plot(e.to_string()),
            ReduceError::Observation(e) => Self::from(e),
            ReduceError::WaterfallRead(e) => Self::from(e),
            ReduceError::HeaderRead(e) => Self::from(e),
            ReduceError::Calibrate(e) => Self::from(e),
            ReduceError::FitsWrite(e) => Self::from(e),
            ReduceError::CsvWrite(e) => Self::from(e),
            #[cfg(feature = "plotting")]
            ReduceError::Plot(e) => Self::from(e),
            ReduceError::IO(e) => Self::from(e),
        }
    }
}

#[cfg(feature = "plotting")]
impl From<crate::plot::PlotError> for HiReduceError {
    fn from(e: crate::plot::PlotError) -> Self {
        Self::Plot(e.to_string())
    }
}

impl From<std::io::Error> for HiReduceError {
    fn from(e: std::io::Error) -> Self {
        Self::Generic(e.to_string())
    }
}
