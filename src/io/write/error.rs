// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with writing out files.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HeaderWriteError {
    #[error(transparent)]
    IO(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum FitsWriteError {
    #[error("Cannot write an empty waterfall to a FITS file")]
    EmptyWaterfall,

    #[error(transparent)]
    Fitsio(#[from] fitsio::errors::Error),

    #[error(transparent)]
    IO(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum CsvWriteError {
    #[error("Column '{column}' has {got} values, but the first column has {expected}")]
    LengthMismatch {
        column: &'static str,
        expected: usize,
        got: usize,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    IO(#[from] std::io::Error),
}
