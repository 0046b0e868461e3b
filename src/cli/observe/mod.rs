// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.


use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};

use super::common::{display_warnings, InfoPrinter, ObservationArgs, Warn, ARG_FILE_HELP};
use crate::{
    acquire::ExternalAcquisition,
    constants::{
        DEFAULT_ACQUISITION_PROGRAM, DEFAULT_BB_GAIN, DEFAULT_DURATION, DEFAULT_IF_GAIN,
        DEFAULT_OBS_FILE, DEFAULT_RF_GAIN,
    },
    observation::{ObservationError, ObservationParameters},
    params::ObserveParams,
    unit_parsing::{parse_seconds, UnitParseError},
    HiReduceError,
};

lazy_static::lazy_static! {
    static ref RF_GAIN_HELP: String = format!("The RF gain [dB]. Default: {DEFAULT_RF_GAIN}");

    static ref IF_GAIN_HELP: String = format!("The IF gain [dB]. Default: {DEFAULT_IF_GAIN}");

    static ref BB_GAIN_HELP: String = format!("The baseband gain [dB]. Default: {DEFAULT_BB_GAIN}");

    static ref DURATION_HELP: String =
        format!("The total observing duration. Units may be given (e.g. 5min), otherwise seconds. Default: {DEFAULT_DURATION}s");

    static ref OBS_FILE_HELP: String =
        format!("Where to write the raw capture. Its header is written alongside it. Default: {DEFAULT_OBS_FILE}");

    static ref PROGRAM_HELP: String =
        format!("The program that drives the radio front end. It is called with --dev-args, --frequency, --bandwidth, --rf-gain, --if-gain, --bb-gain, --channels, --t-sample, --duration and --output. Default: {DEFAULT_ACQUISITION_PROGRAM}");
}

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct ObserveArgs {
    #[clap(name = "ARGUMENTS_FILE", help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    pub(super) args_file: Option<PathBuf>,

    #[clap(flatten)]
    #[serde(rename = "observation")]
    #[serde(default)]
    pub(super) obs_args: ObservationArgs,

    /// Arguments handed to the SDR device driver, e.g. "airspy=0".
    #[clap(long, help_heading = "FRONT END")]
    pub(super) dev_args: Option<String>,

    #[clap(long, help = RF_GAIN_HELP.as_str(), help_heading = "FRONT END")]
    pub(super) rf_gain: Option<f64>,

    #[clap(long, help = IF_GAIN_HELP.as_str(), help_heading = "FRONT END")]
    pub(super) if_gain: Option<f64>,

    #[clap(long, help = BB_GAIN_HELP.as_str(), help_heading = "FRONT END")]
    pub(super) bb_gain: Option<f64>,

    #[clap(short, long, help = DURATION_HELP.as_str(), help_heading = "SCHEDULING")]
    pub(super) duration: Option<String>,

    /// Wait this long before starting the observation. Units may be given
    /// (e.g. 5min), otherwise seconds. Default: start immediately.
    #[clap(short = 's', long, help_heading = "SCHEDULING")]
    pub(super) start_in: Option<String>,

    #[clap(short = 'o', long, help = OBS_FILE_HELP.as_str(), help_heading = "OUTPUT FILES", parse(from_os_str))]
    pub(super) obs_file: Option<PathBuf>,

    #[clap(long, help = PROGRAM_HELP.as_str(), help_heading = "FRONT END", parse(from_os_str))]
    pub(super) acquisition_program: Option<PathBuf>,
}

impl ObserveArgs {
    /// Both command-line and file arguments overlap in terms of what is
    /// available; this function consolidates everything that was specified into
    /// a single struct. Where applicable, it will prefer CLI parameters over
    /// those in the file.
    pub(super) fn merge(self) -> Result<ObserveArgs, HiReduceError> {
        debug!("Merging command-line arguments with the argument file");

        let cli_args = self;

        if let Some(arg_file) = cli_args.args_file {
            let ObserveArgs {
                args_file: _,
                obs_args,
                dev_args,
                rf_gain,
                if_gain,
                bb_gain,
                duration,
                start_in,
                obs_file,
                acquisition_program,
            } = unpack_arg_file!(arg_file);

            Ok(ObserveArgs {
                args_file: None,
                obs_args: cli_args.obs_args.merge(obs_args),
                dev_args: cli_args.dev_args.or(dev_args),
                rf_gain: cli_args.rf_gain.or(rf_gain),
                if_gain: cli_args.if_gain.or(if_gain),
                bb_gain: cli_args.bb_gain.or(bb_gain),
                duration: cli_args.duration.or(duration),
                start_in: cli_args.start_in.or(start_in),
                obs_file: cli_args.obs_file.or(obs_file),
                acquisition_program: cli_args.acquisition_program.or(acquisition_program),
            })
        } else {
            Ok(cli_args)
        }
    }

    pub(super) fn parse(self) -> Result<ObserveParams, HiReduceError> {
        debug!("{:#?}", self);

        let Self {
            args_file: _,
            obs_args,
            dev_args,
            rf_gain,
            if_gain,
            bb_gain,
            duration,
            start_in,
            obs_file,
            acquisition_program,
        } = self;

        let obs_params = obs_args.parse()?.ok_or_else(|| {
            HiReduceError::Config(
                "An observation needs a frequency, bandwidth, number of channels and t_sample"
                    .to_string(),
            )
        })?;
        let obs_params = ObservationParameters {
            dev_args: dev_args.unwrap_or_default(),
            rf_gain: rf_gain.unwrap_or(DEFAULT_RF_GAIN),
            if_gain: if_gain.unwrap_or(DEFAULT_IF_GAIN),
            bb_gain: bb_gain.unwrap_or(DEFAULT_BB_GAIN),
            duration: match duration {
                Some(d) => parse_seconds(&d).map_err(ObserveArgsError::from)?,
                None => DEFAULT_DURATION,
            },
            ..obs_params
        };
        obs_params
            .validate_acquisition()
            .map_err(ObserveArgsError::from)?;

        let start_in = match start_in {
            Some(s) => {
                let seconds = parse_seconds(&s).map_err(ObserveArgsError::from)?;
                Duration::try_from_secs_f64(seconds)
                    .map_err(|_| ObserveArgsError::NegativeStart(s))?
            }
            None => Duration::ZERO,
        };

        let obs_file = obs_file.unwrap_or_else(|| PathBuf::from(DEFAULT_OBS_FILE));
        let program =
            acquisition_program.unwrap_or_else(|| PathBuf::from(DEFAULT_ACQUISITION_PROGRAM));
        if obs_params.dev_args.is_empty() {
            "No device arguments were given; the acquisition program will pick a device".warn();
        }

        let mut printer = InfoPrinter::new("Observation info".into());
        printer.push_block(vec![
            format!("Centre frequency: {} MHz", obs_params.frequency / 1e6).into(),
            format!("Bandwidth:        {} MHz", obs_params.bandwidth / 1e6).into(),
            format!("Channels:         {}", obs_params.channels).into(),
            format!(
                "t_sample:         {} s ({} FFT bins per sample)",
                obs_params.t_sample,
                obs_params.bins()?
            )
            .into(),
            format!("Duration:         {} s", obs_params.duration).into(),
        ]);
        printer.push_line(
            format!(
                "Gains (RF, IF, BB): {}, {}, {} dB",
                obs_params.rf_gain, obs_params.if_gain, obs_params.bb_gain
            )
            .into(),
        );
        printer.push_line(format!("Acquiring with {}", program.display()).into());
        printer.push_line(format!("Writing capture to {}", obs_file.display()).into());
        if !start_in.is_zero() {
            printer.push_line(format!("Starting in {} s", start_in.as_secs_f64()).into());
        }
        printer.display();

        display_warnings();

        Ok(ObserveParams {
            acquirer: ExternalAcquisition::new(program),
            obs_params,
            obs_file,
            start_in,
        })
    }

    pub(super) fn run(self, dry_run: bool) -> Result<(), HiReduceError> {
        debug!("Converting arguments into parameters");
        trace!("{:#?}", self);
        let params = self.parse()?;

        if dry_run {
            info!("Dry run -- exiting now.");
            return Ok(());
        }

        params.run()?;
        Ok(())
    }
}

#[derive(thiserror::Error, Debug)]
pub(super) enum ObserveArgsError {
    #[error("The start delay '{0}' is negative or not finite")]
    NegativeStart(String),

    #[error(transparent)]
    Observation(#[from] ObservationError),

    #[error(transparent)]
    UnitParse(#[from] UnitParseError),
}
