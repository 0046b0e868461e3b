// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code to read raw captures into a waterfall.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use byteorder::{NativeEndian, ReadBytesExt};
use log::debug;
use ndarray::prelude::*;

use super::WaterfallReadError;

/// Read an entire capture file into a waterfall with shape `(subs,
/// channels)`. The file must contain nothing but native-endian 32-bit floats,
/// stored row-major. Every value is divided by `bins`.
pub fn read_waterfall<P: AsRef<Path>>(
    file: P,
    channels: usize,
    bins: usize,
) -> Result<Array2<f32>, WaterfallReadError> {
    let file = file.as_ref();
    if channels == 0 {
        return Err(WaterfallReadError::ZeroChannels);
    }
    if bins == 0 {
        return Err(WaterfallReadError::ZeroBins);
    }
    if !file.exists() {
        return Err(WaterfallReadError::DoesNotExist(file.to_path_buf()));
    }

    let num_bytes = std::fs::metadata(file)?.len();
    let float_size = std::mem::size_of::<f32>() as u64;
    if num_bytes % float_size != 0 {
        return Err(WaterfallReadError::PartialSample {
            file: file.to_path_buf(),
            num_bytes,
        });
    }
    let num_samples = (num_bytes / float_size) as usize;
    if num_samples == 0 {
        return Err(WaterfallReadError::Empty(file.to_path_buf()));
    }
    if num_samples % channels != 0 {
        return Err(WaterfallReadError::NotDivisible {
            file: file.to_path_buf(),
            num_samples,
            channels,
        });
    }
    let subs = num_samples / channels;
    debug!(
        "Reading {num_samples} samples ({subs} sub-integrations x {channels} channels) from '{}'",
        file.display()
    );

    let mut samples = vec![0.0; num_samples];
    let mut reader = BufReader::new(File::open(file)?);
    reader.read_f32_into::<NativeEndian>(&mut samples)?;

    let mut waterfall = Array2::from_shape_vec((subs, channels), samples)?;
    let bins = bins as f32;
    waterfall.mapv_inplace(|v| v / bins);
    Ok(waterfall)
}
