// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::debug;

use super::{remove_stale_file, HeaderWriteError};
use crate::observation::HeaderRecord;

/// Write a header sidecar file, replacing any file already at `file`. The
/// `mjd` line is only written if the record has one.
pub fn write_header(file: &Path, record: &HeaderRecord) -> Result<(), HeaderWriteError> {
    remove_stale_file(file)?;
    let HeaderRecord { mjd, params } = record;

    let mut f = BufWriter::new(File::create(file)?);
    if let Some(mjd) = mjd {
        writeln!(f, "mjd={mjd}")?;
    }
    writeln!(f, "dev_args=\"{}\"", params.dev_args)?;
    writeln!(f, "rf_gain={}", params.rf_gain)?;
    writeln!(f, "if_gain={}", params.if_gain)?;
    writeln!(f, "bb_gain={}", params.bb_gain)?;
    writeln!(f, "frequency={}", params.frequency)?;
    writeln!(f, "bandwidth={}", params.bandwidth)?;
    writeln!(f, "channels={}", params.channels)?;
    writeln!(f, "t_sample={}", params.t_sample)?;
    writeln!(f, "duration={}", params.duration)?;
    f.flush()?;

    debug!("Wrote header '{}'", file.display());
    Ok(())
}
