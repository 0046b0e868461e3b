// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code to write header sidecars and reduction products.

mod csv;
mod error;
mod fits;
mod header;

pub use self::csv::{format_value, write_power_csv, write_spectra_csv};
pub use error::{CsvWriteError, FitsWriteError, HeaderWriteError};
pub use fits::write_waterfall_fits;
pub use header::write_header;

use std::path::Path;

use log::debug;

/// Remove a file that is about to be written. A file that doesn't exist is
/// fine; any other problem (e.g. permissions) is not.
pub fn remove_stale_file(file: &Path) -> Result<(), std::io::Error> {
    match std::fs::remove_file(file) {
        Ok(()) => {
            debug!("Removed stale file '{}'", file.display());
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}
