// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Common arguments for command-line interfaces. Both the `observe` and
//! `reduce` subcommands need to know how an observation was set up, so the same
//! observation arguments are shared between them.

mod printers;

pub(super) use printers::InfoPrinter;
pub(crate) use printers::{display_warnings, Warn};

use clap::Parser;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use crate::{
    observation::ObservationParameters,
    unit_parsing::{parse_hz, parse_seconds, UnitParseError},
};

lazy_static::lazy_static! {
    pub(super) static ref ARG_FILE_TYPES_COMMA_SEPARATED: String = ArgFileTypes::iter().join(", ");

    pub(super) static ref ARG_FILE_HELP: String =
        format!("All arguments may be specified in a file. Any CLI arguments override arguments set in the file. Supported formats: {}", *ARG_FILE_TYPES_COMMA_SEPARATED);
}

#[derive(Debug, Display, EnumIter, EnumString)]
pub(super) enum ArgFileTypes {
    #[strum(serialize = "toml")]
    Toml,
    #[strum(serialize = "json")]
    Json,
}

macro_rules! unpack_arg_file {
    ($arg_file:expr) => ({
        use std::{fs::File, io::Read, str::FromStr};

        use crate::cli::common::{ArgFileTypes, ARG_FILE_TYPES_COMMA_SEPARATED};

        debug!("Attempting to parse argument file {}", $arg_file.display());

        let mut contents = String::new();
        let arg_file_type = $arg_file
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .and_then(|e| ArgFileTypes::from_str(&e).ok());

        match arg_file_type {
            Some(ArgFileTypes::Toml) => {
                debug!("Parsing toml file...");
                let mut fh = File::open(&$arg_file)?;
                fh.read_to_string(&mut contents)?;
                match toml::from_str(&contents) {
                    Ok(p) => p,
                    Err(err) => {
                        return Err(HiReduceError::ArgFile(format!(
                            "Couldn't decode toml structure from {:?}:\n{err}",
                            $arg_file
                        )))
                    }
                }
            }
            Some(ArgFileTypes::Json) => {
                debug!("Parsing json file...");
                let mut fh = File::open(&$arg_file)?;
                fh.read_to_string(&mut contents)?;
                match serde_json::from_str(&contents) {
                    Ok(p) => p,
                    Err(err) => {
                        return Err(HiReduceError::ArgFile(format!(
                            "Couldn't decode json structure from {:?}:\n{err}",
                            $arg_file
                        )))
                    }
                }
            }

            _ => {
                return Err(HiReduceError::ArgFile(format!(
                    "Argument file '{:?}' doesn't have a recognised file extension! Valid extensions are: {}", $arg_file, *ARG_FILE_TYPES_COMMA_SEPARATED)
                ))
            }
        }
    });
}

/// How the radiometer was set up. Frequencies and times may carry units
/// (e.g. "1420.4MHz", "100ms"); without units, they are Hz and seconds.
#[derive(Parser, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(super) struct ObservationArgs {
    /// The centre frequency [Hz].
    #[clap(short, long, help_heading = "OBSERVATION")]
    pub(super) frequency: Option<String>,

    /// The total bandwidth, i.e. the sample rate [Hz].
    #[clap(short, long, help_heading = "OBSERVATION")]
    pub(super) bandwidth: Option<String>,

    /// The number of frequency channels.
    #[clap(short, long, help_heading = "OBSERVATION")]
    pub(super) channels: Option<usize>,

    /// The duration of a single sub-integration [s].
    #[clap(short, long, help_heading = "OBSERVATION")]
    pub(super) t_sample: Option<String>,
}

impl ObservationArgs {
    pub(super) fn merge(self, other: Self) -> Self {
        Self {
            frequency: self.frequency.or(other.frequency),
            bandwidth: self.bandwidth.or(other.bandwidth),
            channels: self.channels.or(other.channels),
            t_sample: self.t_sample.or(other.t_sample),
        }
    }

    /// Parse the arguments into observation parameters. If nothing was given,
    /// `None` is returned; giving only some of the arguments is an error.
    pub(super) fn parse(self) -> Result<Option<ObservationParameters>, ObservationArgsError> {
        let Self {
            frequency,
            bandwidth,
            channels,
            t_sample,
        } = self;

        match (frequency, bandwidth, channels, t_sample) {
            (None, None, None, None) => Ok(None),
            (Some(frequency), Some(bandwidth), Some(channels), Some(t_sample)) => {
                Ok(Some(ObservationParameters::new(
                    parse_hz(&frequency)?,
                    parse_hz(&bandwidth)?,
                    channels,
                    parse_seconds(&t_sample)?,
                )))
            }
            (frequency, bandwidth, channels, t_sample) => {
                let missing = [
                    ("frequency", frequency.is_none()),
                    ("bandwidth", bandwidth.is_none()),
                    ("channels", channels.is_none()),
                    ("t_sample", t_sample.is_none()),
                ]
                .into_iter()
                .filter(|(_, missing)| *missing)
                .map(|(name, _)| name)
                .join(", ");
                Err(ObservationArgsError::Missing(missing))
            }
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub(super) enum ObservationArgsError {
    #[error("Some observation parameters were given, but these were missing: {0}")]
    Missing(String),

    #[error(transparent)]
    UnitParse(#[from] UnitParseError),
}
