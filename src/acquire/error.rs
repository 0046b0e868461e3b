// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with acquiring captures.

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

use crate::{io::write::HeaderWriteError, observation::ObservationError};

#[derive(Error, Debug)]
pub enum AcquireError {
    #[error("Couldn't run the acquisition program '{program}': {source}")]
    Spawn {
        program: PathBuf,
        source: std::io::Error,
    },

    #[error("The acquisition program '{program}' failed ({status})")]
    Failed { program: PathBuf, status: ExitStatus },

    #[error("Acquisition finished, but no capture was written to '{0}'")]
    NoOutput(PathBuf),

    #[error("The system clock is set before the Unix epoch: {0}")]
    Clock(#[from] std::time::SystemTimeError),

    #[error(transparent)]
    Observation(#[from] ObservationError),

    #[error(transparent)]
    HeaderWrite(#[from] HeaderWriteError),

    #[error(transparent)]
    IO(#[from] std::io::Error),
}
