// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Acquiring captures from a radio front end.
//!
//! The radio hardware is driven by something else entirely; all that's needed
//! here is something that, given observation parameters, synchronously writes
//! a raw capture to a file.

mod error;

pub use error::AcquireError;

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use hifitime::Epoch;
use log::{debug, info};

use crate::{
    io::{
        read::header_path,
        write::{remove_stale_file, write_header},
    },
    observation::{HeaderRecord, ObservationParameters},
};

/// Something that can run an observation and write its raw capture to a
/// file. It must not return until the capture is complete.
pub trait Acquire {
    fn acquire(&self, params: &ObservationParameters, output: &Path)
        -> Result<(), AcquireError>;
}

/// Acquire by running an external program, e.g. a GNU Radio flowgraph. The
/// program is given the arguments `--dev-args`, `--frequency`, `--bandwidth`,
/// `--rf-gain`, `--if-gain`, `--bb-gain`, `--channels`, `--t-sample`,
/// `--duration` and `--output`, each followed by its value. A non-zero exit
/// status is a failure.
#[derive(Debug, Clone)]
pub struct ExternalAcquisition {
    pub program: PathBuf,
}

impl ExternalAcquisition {
    pub fn new<P: Into<PathBuf>>(program: P) -> ExternalAcquisition {
        ExternalAcquisition {
            program: program.into(),
        }
    }

    pub(crate) fn args(params: &ObservationParameters, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![];
        let mut push = |flag: &str, value: String| {
            args.push(flag.into());
            args.push(value.into());
        };
        push("--dev-args", params.dev_args.clone());
        push("--frequency", params.frequency.to_string());
        push("--bandwidth", params.bandwidth.to_string());
        push("--rf-gain", params.rf_gain.to_string());
        push("--if-gain", params.if_gain.to_string());
        push("--bb-gain", params.bb_gain.to_string());
        push("--channels", params.channels.to_string());
        push("--t-sample", params.t_sample.to_string());
        push("--duration", params.duration.to_string());
        args.push("--output".into());
        args.push(output.as_os_str().to_owned());
        args
    }
}

impl Acquire for ExternalAcquisition {
    fn acquire(
        &self,
        params: &ObservationParameters,
        output: &Path,
    ) -> Result<(), AcquireError> {
        let mut command = Command::new(&self.program);
        command.args(Self::args(params, output));
        debug!("Running {command:?}");

        let status = command.status().map_err(|source| AcquireError::Spawn {
            program: self.program.clone(),
            source,
        })?;
        if !status.success() {
            return Err(AcquireError::Failed {
                program: self.program.clone(),
                status,
            });
        }
        if !output.exists() {
            return Err(AcquireError::NoOutput(output.to_path_buf()));
        }
        Ok(())
    }
}

/// Run an observation and write its header sidecar. After waiting `start_in`,
/// any existing capture at `output` is removed, the start time is noted and
/// the acquisition runs. The path to the header is returned.
pub fn observe<A: Acquire + ?Sized>(
    acquirer: &A,
    params: &ObservationParameters,
    output: &Path,
    start_in: Duration,
) -> Result<PathBuf, AcquireError> {
    params.validate_acquisition()?;

    if !start_in.is_zero() {
        info!(
            "The observation will begin in {} s",
            start_in.as_secs_f64()
        );
        std::thread::sleep(start_in);
    }

    remove_stale_file(output)?;

    let unix_seconds = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs_f64();
    info!(
        "Starting observation at {}",
        Epoch::from_unix_seconds(unix_seconds)
    );
    acquirer.acquire(params, output)?;
    info!(
        "Data acquisition complete; observation saved as '{}'",
        output.display()
    );

    let header = header_path(output);
    write_header(
        &header,
        &HeaderRecord::from_unix_epoch(params.clone(), unix_seconds),
    )?;
    info!("Wrote header to '{}'", header.display());
    Ok(header)
}
