// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::Path;

use fitsio::{
    images::{ImageDescription, ImageType},
    FitsFile,
};
use log::debug;
use ndarray::prelude::*;

use super::{remove_stale_file, FitsWriteError};
use crate::reduce::WaterfallWcs;

/// Write a (linear) waterfall to the primary HDU of a new FITS file. The first
/// image axis is frequency \[MHz\], the second is relative time \[s\].
pub fn write_waterfall_fits(
    file: &Path,
    waterfall: ArrayView2<f32>,
    wcs: &WaterfallWcs,
    mjd: Option<f64>,
) -> Result<(), FitsWriteError> {
    let (subs, channels) = waterfall.dim();
    if subs == 0 || channels == 0 {
        return Err(FitsWriteError::EmptyWaterfall);
    }
    remove_stale_file(file)?;

    // fitsio wants the slowest-varying axis first.
    let dim = [subs, channels];
    let image_description = ImageDescription {
        data_type: ImageType::Float,
        dimensions: &dim,
    };
    let mut fptr = FitsFile::create(file)
        .with_custom_primary(&image_description)
        .open()?;
    let hdu = fptr.primary_hdu()?;

    hdu.write_key(&mut fptr, "CRPIX1", wcs.crpix1 as i64)?;
    hdu.write_key(&mut fptr, "CRVAL1", wcs.crval1)?;
    hdu.write_key(&mut fptr, "CDELT1", wcs.cdelt1)?;
    hdu.write_key(&mut fptr, "CTYPE1", "Frequency (MHz)")?;
    hdu.write_key(&mut fptr, "CRPIX2", wcs.crpix2 as i64)?;
    hdu.write_key(&mut fptr, "CRVAL2", wcs.crval2)?;
    hdu.write_key(&mut fptr, "CDELT2", wcs.cdelt2)?;
    hdu.write_key(&mut fptr, "CTYPE2", "Relative Time (s)")?;
    if let Some(mjd) = mjd {
        hdu.write_key(&mut fptr, "MJD-OBS", mjd)?;
    }

    let data: Vec<f32> = waterfall.iter().copied().collect();
    hdu.write_image(&mut fptr, &data)?;

    debug!(
        "Wrote {subs}x{channels} waterfall to '{}'",
        file.display()
    );
    Ok(())
}
