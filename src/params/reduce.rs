// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use ndarray::prelude::*;

use crate::{
    io::{
        read::{header_path, read_header, read_waterfall, HeaderReadError, WaterfallReadError},
        write::{
            write_power_csv, write_spectra_csv, write_waterfall_fits, CsvWriteError,
            FitsWriteError,
        },
    },
    observation::{HeaderRecord, ObservationError, ObservationParameters},
    reduce::{
        average_spectrum, average_spectrum_ignoring_nan, calibrate, frequency_axis_mhz,
        gaussian_fit, histogram_density, median_filter, num_histogram_bins, time_axis,
        time_series, velocity_edges, CalibrateError, GaussianFit, Histogram, Mask, PowerScale,
        WaterfallWcs,
    },
};

/// Everything needed to reduce a capture.
#[derive(Debug, Clone)]
pub struct ReduceParams {
    /// The raw capture.
    pub obs_file: PathBuf,

    /// If not given, the parameters are read from the capture's header
    /// sidecar.
    pub obs_params: Option<ObservationParameters>,

    /// An off-source capture to calibrate against.
    pub cal_file: Option<PathBuf>,

    /// The median window for the calibrated spectrum. 0 disables it. Only
    /// used when calibrating.
    pub median_frequency: usize,

    /// The median window for the power time series. 0 disables it.
    pub median_time: usize,

    /// The rest frequency of the spectral line being looked for \[Hz\]. Used
    /// to mask channels from noise estimation and for the velocity axis.
    pub rest_frequency: Option<f64>,

    pub scale: PowerScale,

    pub outputs: ReduceOutputs,
}

/// Where reduction products are written. Nothing is written for `None`.
#[derive(Debug, Clone, Default)]
pub struct ReduceOutputs {
    pub waterfall_fits: Option<PathBuf>,
    pub spectra_csv: Option<PathBuf>,
    pub power_csv: Option<PathBuf>,
    pub plot_file: Option<PathBuf>,
}

/// The products of calibrating against a reference capture.
#[derive(Debug, Clone)]
pub struct Calibration {
    /// The (NaN-ignoring) average spectrum of the reference, scaled like the
    /// on-source spectrum.
    pub ref_spectrum: Array1<f64>,

    /// The calibrated, noise-normalised spectrum.
    pub snr: Array1<f64>,

    /// `snr` after a frequency-domain median filter, if one was requested.
    pub snr_clean: Option<Array1<f64>>,
}

/// Everything derived from one capture.
#[derive(Debug, Clone)]
pub struct Reduction {
    pub params: ObservationParameters,

    /// Only known if the parameters came from a header.
    pub mjd: Option<f64>,

    pub scale: PowerScale,

    /// Linear, and normalised by the number of FFT bins per sample.
    pub waterfall: Array2<f32>,

    pub frequency_mhz: Array1<f64>,
    pub time: Array1<f64>,

    /// The velocities \[km/s\] of the band edges, if a rest frequency was
    /// given.
    pub velocity_edges: Option<(f64, f64)>,

    pub rest_frequency: Option<f64>,
    pub mask: Mask,

    pub avg_spectrum: Array1<f64>,
    pub calibration: Option<Calibration>,

    pub power: Array1<f64>,
    pub power_fit: GaussianFit,
    pub power_histogram: Histogram,

    /// The window used for `power_clean`.
    pub median_time: usize,
    pub power_clean: Option<Array1<f64>>,
    pub power_clean_fit: Option<GaussianFit>,
    pub power_clean_histogram: Option<Histogram>,

    /// The window used for the calibrated spectrum's median filter.
    pub median_frequency: usize,
}

impl Reduction {
    /// The number of sub-integrations.
    pub fn subs(&self) -> usize {
        self.waterfall.len_of(Axis(0))
    }

    pub fn channels(&self) -> usize {
        self.waterfall.len_of(Axis(1))
    }
}

impl ReduceParams {
    /// Run the reduction, without writing anything.
    pub fn reduce(&self) -> Result<Reduction, ReduceError> {
        let (params, mjd) = match &self.obs_params {
            Some(params) => (params.clone(), None),
            None => {
                let header = header_path(&self.obs_file);
                info!(
                    "No observation parameters given; reading them from '{}'",
                    header.display()
                );
                let HeaderRecord { mjd, params } = read_header(&header)?;
                (params, mjd)
            }
        };
        params.validate()?;
        let bins = params.bins()?;
        debug!("{params:#?}");

        let waterfall = read_waterfall(&self.obs_file, params.channels, bins)?;
        let (subs, channels) = waterfall.dim();
        info!(
            "Read {subs} sub-integrations of {channels} channels from '{}' ({bins} FFT bins per sample)",
            self.obs_file.display()
        );

        let scale = self.scale;
        let frequency_mhz = frequency_axis_mhz(params.frequency, params.bandwidth, channels);
        let time = time_axis(subs, params.t_sample);
        let velocity_edges = self
            .rest_frequency
            .and_then(|f_rest| velocity_edges(params.frequency, params.bandwidth, f_rest));
        let mask = Mask::from_rest_frequency(frequency_mhz.view(), self.rest_frequency);
        debug!("{} of {channels} channels are masked", mask.num_masked());

        let avg_spectrum = scale.apply(average_spectrum(waterfall.view()));
        let power = scale.apply(time_series(waterfall.view()));

        let calibration = match &self.cal_file {
            Some(cal_file) => {
                if mask.num_noise_channels() == 0 {
                    return Err(ReduceError::AllChannelsMasked { channels });
                }
                let reference = read_waterfall(cal_file, params.channels, bins)?;
                info!(
                    "Calibrating against {} sub-integrations from '{}'",
                    reference.len_of(Axis(0)),
                    cal_file.display()
                );
                let ref_spectrum = scale.apply(average_spectrum_ignoring_nan(reference.view()));
                let snr = calibrate(
                    avg_spectrum.view(),
                    ref_spectrum.view(),
                    scale,
                    Some(&mask),
                )?;
                let snr_clean = (self.median_frequency > 0)
                    .then(|| median_filter(snr.view(), self.median_frequency));
                Some(Calibration {
                    ref_spectrum,
                    snr,
                    snr_clean,
                })
            }
            None => {
                if self.median_frequency > 0 {
                    warn!("No calibration file was given, so the frequency-domain median filter is not applied");
                }
                None
            }
        };

        let power_clean =
            (self.median_time > 0).then(|| median_filter(power.view(), self.median_time));
        let num_bins = num_histogram_bins(subs);
        let power_fit = gaussian_fit(power.view());
        let power_histogram = histogram_density(power.view(), num_bins);
        let power_clean_fit = power_clean.as_ref().map(|p| gaussian_fit(p.view()));
        let power_clean_histogram = power_clean
            .as_ref()
            .map(|p| histogram_density(p.view(), num_bins));

        Ok(Reduction {
            params,
            mjd,
            scale,
            waterfall,
            frequency_mhz,
            time,
            velocity_edges,
            rest_frequency: self.rest_frequency,
            mask,
            avg_spectrum,
            calibration,
            power,
            power_fit,
            power_histogram,
            median_time: self.median_time,
            power_clean,
            power_clean_fit,
            power_clean_histogram,
            median_frequency: self.median_frequency,
        })
    }

    /// Run the reduction and write out all requested products. Existing
    /// output files are replaced.
    pub fn run(&self) -> Result<Reduction, ReduceError> {
        if self.outputs.plot_file.is_some() && !cfg!(feature = "plotting") {
            return Err(ReduceError::NoPlottingFeature);
        }

        let reduction = self.reduce()?;
        let ReduceOutputs {
            waterfall_fits,
            spectra_csv,
            power_csv,
            plot_file,
        } = &self.outputs;

        if let Some(file) = waterfall_fits {
            if reduction.mjd.is_none() {
                warn!("The observation MJD isn't known, so it won't be written to the FITS header");
            }
            let wcs = WaterfallWcs::new(&reduction.params, reduction.subs());
            write_waterfall_fits(file, reduction.waterfall.view(), &wcs, reduction.mjd)?;
            info!("Wrote waterfall to '{}'", file.display());
        }

        if let Some(file) = spectra_csv {
            write_spectra_csv(
                file,
                reduction.frequency_mhz.view(),
                reduction.avg_spectrum.view(),
                reduction
                    .calibration
                    .as_ref()
                    .map(|c| (c.ref_spectrum.view(), c.snr.view())),
            )?;
            info!("Wrote spectra to '{}'", file.display());
        }

        if let Some(file) = power_csv {
            write_power_csv(file, reduction.time.view(), reduction.power.view())?;
            info!("Wrote time series to '{}'", file.display());
        }

        if let Some(file) = plot_file {
            plot(&reduction, file)?;
        }

        Ok(reduction)
    }
}

#[cfg(feature = "plotting")]
fn plot(reduction: &Reduction, file: &Path) -> Result<(), ReduceError> {
    crate::plot::plot_reduction(reduction, file)?;
    info!("Wrote plot to '{}'", file.display());
    Ok(())
}

#[cfg(not(feature = "plotting"))]
fn plot(_: &Reduction, _: &Path) -> Result<(), ReduceError> {
    Err(ReduceError::NoPlottingFeature)
}

#[derive(thiserror::Error, Debug)]
pub enum ReduceError {
    #[error("All {channels} channels are masked, leaving nothing to estimate noise with; check the rest frequency")]
    AllChannelsMasked { channels: usize },

    #[error("A plot was requested, but this build was not compiled with the \"plotting\" feature")]
    NoPlottingFeature,

    #[error(transparent)]
    Observation(#[from] ObservationError),

    #[error(transparent)]
    WaterfallRead(#[from] WaterfallReadError),

    #[error(transparent)]
    HeaderRead(#[from] HeaderReadError),

    #[error(transparent)]
    Calibrate(#[from] CalibrateError),

    #[error(transparent)]
    FitsWrite(#[from] FitsWriteError),

    #[error(transparent)]
    CsvWrite(#[from] CsvWriteError),

    #[cfg(feature = "plotting")]
    #[error(transparent)]
    Plot(#[from] crate::plot::PlotError),

    #[error(transparent)]
    IO(#[from] std::io::Error),
}
