// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.


use std::path::PathBuf;

use clap::Parser;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};

use super::common::{display_warnings, InfoPrinter, ObservationArgs, Warn, ARG_FILE_HELP};
use crate::{
    constants::{DEFAULT_OBS_FILE, HI_REST_FREQ_HZ},
    params::{ReduceOutputs, ReduceParams},
    reduce::PowerScale,
    unit_parsing::parse_hz,
    HiReduceError,
};

lazy_static::lazy_static! {
    static ref OBS_FILE_HELP: String =
        format!("The raw capture to reduce. Unless the observation parameters are all given, they are read from the capture's header. Default: {DEFAULT_OBS_FILE}");

    static ref REST_FREQUENCY_HELP: String =
        format!("The rest frequency of the line being looked for. Channels near it are excluded from noise estimation, and the velocity axis is relative to it. Units may be given (e.g. 1420.40575MHz), otherwise Hz. Neutral hydrogen is {} MHz", HI_REST_FREQ_HZ / 1e6);
}

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct ReduceArgs {
    #[clap(name = "ARGUMENTS_FILE", help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    pub(super) args_file: Option<PathBuf>,

    #[clap(flatten)]
    #[serde(rename = "observation")]
    #[serde(default)]
    pub(super) obs_args: ObservationArgs,

    #[clap(short = 'o', long, help = OBS_FILE_HELP.as_str(), help_heading = "INPUT FILES", parse(from_os_str))]
    pub(super) obs_file: Option<PathBuf>,

    /// An off-source capture to calibrate against. It must have been taken
    /// with the same parameters.
    #[clap(short = 'C', long, help_heading = "INPUT FILES", parse(from_os_str))]
    pub(super) cal_file: Option<PathBuf>,

    /// Work with powers in decibels. Calibration then subtracts the reference
    /// instead of dividing by it.
    #[clap(long, help_heading = "REDUCTION")]
    #[serde(default)]
    pub(super) db: bool,

    /// The window of the sliding median applied to the calibrated spectrum, to
    /// suppress narrowband interference. Only used when calibrating. Default:
    /// no filtering.
    #[clap(short = 'n', long, help_heading = "REDUCTION")]
    pub(super) median_frequency: Option<usize>,

    /// The window of the sliding median applied to the power time series, to
    /// suppress impulsive interference. Default: no filtering.
    #[clap(short = 'm', long, help_heading = "REDUCTION")]
    pub(super) median_time: Option<usize>,

    #[clap(short = 'r', long, help = REST_FREQUENCY_HELP.as_str(), help_heading = "REDUCTION")]
    pub(super) rest_frequency: Option<String>,

    /// Write the waterfall to this FITS file.
    #[clap(short = 'W', long, help_heading = "OUTPUT FILES", parse(from_os_str))]
    pub(super) waterfall_fits: Option<PathBuf>,

    /// Write the frequencies and spectra to this CSV file.
    #[clap(short = 'S', long, help_heading = "OUTPUT FILES", parse(from_os_str))]
    pub(super) spectra_csv: Option<PathBuf>,

    /// Write the power time series to this CSV file.
    #[clap(short = 'P', long, help_heading = "OUTPUT FILES", parse(from_os_str))]
    pub(super) power_csv: Option<PathBuf>,

    /// Plot the reduction products to this PNG file. Only available if
    /// compiled with the "plotting" feature.
    #[clap(short = 'p', long, help_heading = "OUTPUT FILES", parse(from_os_str))]
    pub(super) plot_file: Option<PathBuf>,
}

impl ReduceArgs {
    /// Both command-line and file arguments overlap in terms of what is
    /// available; this function consolidates everything that was specified into
    /// a single struct. Where applicable, it will prefer CLI parameters over
    /// those in the file.
    ///
    /// This function should only ever merge arguments, and not try to make
    /// sense of them.
    pub(super) fn merge(self) -> Result<ReduceArgs, HiReduceError> {
        debug!("Merging command-line arguments with the argument file");

        let cli_args = self;

        if let Some(arg_file) = cli_args.args_file {
            // Read in the file arguments. Ensure all of the file args are
            // accounted for by pattern matching.
            let ReduceArgs {
                args_file: _,
                obs_args,
                obs_file,
                cal_file,
                db,
                median_frequency,
                median_time,
                rest_frequency,
                waterfall_fits,
                spectra_csv,
                power_csv,
                plot_file,
            } = unpack_arg_file!(arg_file);

            // Merge all the arguments, preferring the CLI args when available.
            Ok(ReduceArgs {
                args_file: None,
                obs_args: cli_args.obs_args.merge(obs_args),
                obs_file: cli_args.obs_file.or(obs_file),
                cal_file: cli_args.cal_file.or(cal_file),
                db: cli_args.db || db,
                median_frequency: cli_args.median_frequency.or(median_frequency),
                median_time: cli_args.median_time.or(median_time),
                rest_frequency: cli_args.rest_frequency.or(rest_frequency),
                waterfall_fits: cli_args.waterfall_fits.or(waterfall_fits),
                spectra_csv: cli_args.spectra_csv.or(spectra_csv),
                power_csv: cli_args.power_csv.or(power_csv),
                plot_file: cli_args.plot_file.or(plot_file),
            })
        } else {
            Ok(cli_args)
        }
    }

    pub(super) fn parse(self) -> Result<ReduceParams, HiReduceError> {
        debug!("{:#?}", self);

        let Self {
            args_file: _,
            obs_args,
            obs_file,
            cal_file,
            db,
            median_frequency,
            median_time,
            rest_frequency,
            waterfall_fits,
            spectra_csv,
            power_csv,
            plot_file,
        } = self;

        let obs_params = obs_args.parse()?;
        if let Some(obs_params) = &obs_params {
            obs_params.validate()?;
        }
        let obs_file = obs_file.unwrap_or_else(|| PathBuf::from(DEFAULT_OBS_FILE));
        let rest_frequency = rest_frequency.as_deref().map(parse_hz).transpose()?;
        let median_frequency = median_frequency.unwrap_or(0);
        let median_time = median_time.unwrap_or(0);
        let scale = PowerScale::from_db_flag(db);

        if plot_file.is_some() && !cfg!(feature = "plotting") {
            return Err(HiReduceError::Plot(
                "A plot was requested, but this build was not compiled with the \"plotting\" feature".to_string(),
            ));
        }

        let mut input_printer = InfoPrinter::new("Input info".into());
        input_printer.push_line(format!("Capture: {}", obs_file.display()).into());
        match &obs_params {
            Some(p) => input_printer.push_block(vec![
                "Observation parameters given explicitly".into(),
                format!(
                    "{} MHz centre, {} MHz bandwidth, {} channels, {} s samples",
                    p.frequency / 1e6,
                    p.bandwidth / 1e6,
                    p.channels,
                    p.t_sample
                )
                .into(),
            ]),
            None => input_printer.push_line("Observation parameters from the capture's header".into()),
        }
        match &cal_file {
            Some(f) => input_printer.push_line(format!("Calibrating against {}", f.display()).into()),
            None => input_printer.push_line("Not calibrating".into()),
        }
        input_printer.display();

        let mut reduce_printer = InfoPrinter::new("Reduction info".into());
        reduce_printer.push_line(
            match scale {
                PowerScale::Linear => "Linear power",
                PowerScale::Decibel => "Power in dB",
            }
            .into(),
        );
        match rest_frequency {
            Some(f) => reduce_printer
                .push_line(format!("Rest frequency: {} MHz", f / 1e6).into()),
            None => {
                if cal_file.is_some() {
                    "No rest frequency was given; no channels are excluded from the noise estimate"
                        .warn();
                }
            }
        }
        if median_frequency > 0 {
            if cal_file.is_some() {
                reduce_printer.push_line(
                    format!("Median filtering the calibrated spectrum over {median_frequency} channels").into(),
                );
            } else {
                format!("A median window of {median_frequency} channels was given, but there's no calibrated spectrum to filter").warn();
            }
        }
        if median_time > 0 {
            reduce_printer.push_line(
                format!("Median filtering the time series over {median_time} samples").into(),
            );
        }
        reduce_printer.display();

        let outputs = ReduceOutputs {
            waterfall_fits,
            spectra_csv,
            power_csv,
            plot_file,
        };
        let output_files: Vec<_> = [
            &outputs.waterfall_fits,
            &outputs.spectra_csv,
            &outputs.power_csv,
            &outputs.plot_file,
        ]
        .into_iter()
        .flatten()
        .collect();
        if output_files.is_empty() {
            "No output files were requested; only the summary will be reported".warn();
        } else {
            let mut output_printer = InfoPrinter::new("Output info".into());
            output_printer.push_block(
                output_files
                    .into_iter()
                    .map(|f| format!("Writing {}", f.display()).into())
                    .collect(),
            );
            output_printer.display();
        }

        display_warnings();

        Ok(ReduceParams {
            obs_file,
            obs_params,
            cal_file,
            median_frequency,
            median_time,
            rest_frequency,
            scale,
            outputs,
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

        let reduction = params.run()?;
        report(&reduction);
        Ok(())
    }
}

/// Log a summary of the reduction products.
fn report(reduction: &crate::params::Reduction) {
    let mut printer = InfoPrinter::new("Results".into());
    printer.push_line(
        format!(
            "{} sub-integrations of {} channels",
            reduction.subs(),
            reduction.channels()
        )
        .into(),
    );
    if let Some((v_low, v_high)) = reduction.velocity_edges {
        printer.push_line(format!("Velocity range: {v_low:.1} to {v_high:.1} km/s").into());
    }
    if let Some(calibration) = &reduction.calibration {
        let peak = calibration
            .snr
            .iter()
            .zip(reduction.frequency_mhz.iter())
            .filter(|(snr, _)| snr.is_finite())
            .max_by(|(a, _), (b, _)| a.total_cmp(b));
        match peak {
            Some((snr, freq)) => {
                printer.push_line(format!("Peak SNR {snr:.2} at {freq:.4} MHz").into())
            }
            None => printer.push_line("The calibrated spectrum has no finite SNR".into()),
        }
    }
    printer.push_line(
        format!(
            "Time series: mean {:.4}, std. dev. {:.4}",
            reduction.power_fit.mean,
            reduction.power_fit.variance.sqrt()
        )
        .into(),
    );
    printer.display();
}
