// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with reading captures and header files.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WaterfallReadError {
    #[error("Capture file '{0}' does not exist")]
    DoesNotExist(PathBuf),

    #[error("Cannot reshape a capture into 0 channels")]
    ZeroChannels,

    #[error("Cannot normalise a capture by 0 bins")]
    ZeroBins,

    #[error("Capture file '{file}' is {num_bytes} bytes long, which isn't a whole number of 32-bit floats")]
    PartialSample { file: PathBuf, num_bytes: u64 },

    #[error("Capture file '{0}' contains no samples")]
    Empty(PathBuf),

    #[error("Capture file '{file}' has {num_samples} samples, which can't be reshaped into rows of {channels} channels")]
    NotDivisible {
        file: PathBuf,
        num_samples: usize,
        channels: usize,
    },

    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),

    #[error(transparent)]
    IO(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum HeaderReadError {
    #[error("Header file '{0}' does not exist")]
    DoesNotExist(PathBuf),

    #[error("Line {line_num} of header file '{file}' is not a 'key=value' pair: '{line}'")]
    NotKeyValue {
        file: PathBuf,
        line_num: usize,
        line: String,
    },

    #[error("Header file '{file}' is missing the required key '{key}'")]
    MissingKey { file: PathBuf, key: &'static str },

    #[error("In header file '{file}', could not parse the value of '{key}' ('{value}') as a number")]
    NotNumeric {
        file: PathBuf,
        key: &'static str,
        value: String,
    },

    #[error(transparent)]
    IO(#[from] std::io::Error),
}
