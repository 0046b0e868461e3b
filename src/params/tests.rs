// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::{Path, PathBuf};

use approx::assert_abs_diff_eq;
use byteorder::{NativeEndian, WriteBytesExt};
use ndarray::prelude::*;
use tempfile::{tempdir, TempDir};

use super::*;
use crate::{
    io::{read::HeaderReadError, write::write_header},
    observation::{HeaderRecord, ObservationParameters},
    reduce::PowerScale,
};

fn write_capture(file: &Path, waterfall: ArrayView2<f32>) {
    let mut f = std::fs::File::create(file).unwrap();
    for &v in waterfall.iter() {
        f.write_f32::<NativeEndian>(v).unwrap();
    }
}

/// Parameters giving exactly one FFT bin per sample.
fn one_bin_params(channels: usize) -> ObservationParameters {
    // 1.5e-4 * 2.56e6 / 256 = 1.5
    ObservationParameters::new(1420e6, 2.56e6, channels, 1.5e-4 * 256.0 / channels as f64)
}

/// A noisy-looking waterfall with a bump near 1420.4 MHz.
fn synthetic_waterfall(subs: usize, channels: usize) -> Array2<f32> {
    Array2::from_shape_fn((subs, channels), |(s, c)| {
        let line = if (150..160).contains(&c) { 5.0 } else { 0.0 };
        100.0 + line + ((s * 7 + c * 13) % 11) as f32 * 0.1
    })
}

fn default_params(dir: &TempDir, obs_params: Option<ObservationParameters>) -> ReduceParams {
    ReduceParams {
        obs_file: dir.path().join("observation.dat"),
        obs_params,
        cal_file: None,
        median_frequency: 0,
        median_time: 0,
        rest_frequency: None,
        scale: PowerScale::Linear,
        outputs: ReduceOutputs::default(),
    }
}

fn line_count(file: &PathBuf) -> usize {
    std::fs::read_to_string(file).unwrap().lines().count()
}

#[test]
fn test_flat_waterfall_reduces_without_error() {
    let dir = tempdir().unwrap();
    let obs_params = one_bin_params(256);
    assert_eq!(obs_params.bins().unwrap(), 1);
    let params = default_params(&dir, Some(obs_params));
    let v = 2.5;
    write_capture(&params.obs_file, Array2::from_elem((100, 256), v).view());

    let reduction = params.reduce().unwrap();
    assert_eq!(reduction.subs(), 100);
    assert_eq!(reduction.channels(), 256);
    assert_abs_diff_eq!(reduction.avg_spectrum, Array1::from_elem(256, v as f64));
    assert_abs_diff_eq!(reduction.power, Array1::from_elem(100, v as f64));
    assert!(reduction.calibration.is_none());
    assert!(reduction.mjd.is_none());

    // Calibrating against itself is flat too; the SNR isn't finite anywhere.
    let mut params = params;
    params.cal_file = Some(params.obs_file.clone());
    let reduction = params.reduce().unwrap();
    let calibration = reduction.calibration.unwrap();
    assert!(calibration.snr.iter().all(|v| !v.is_finite()));
}

#[test]
fn test_reduce_with_header() {
    let dir = tempdir().unwrap();
    let mut params = default_params(&dir, None);
    let obs_params = one_bin_params(256);
    let record = HeaderRecord::from_unix_epoch(obs_params.clone(), 1679400000.0);
    write_header(&dir.path().join("observation.header"), &record).unwrap();
    write_capture(&params.obs_file, synthetic_waterfall(20, 256).view());
    params.median_time = 3;

    let reduction = params.reduce().unwrap();
    assert_eq!(reduction.params, obs_params);
    assert_abs_diff_eq!(reduction.mjd.unwrap(), record.mjd.unwrap(), epsilon = 1e-9);
    assert_eq!(reduction.time.len(), 20);
    assert_abs_diff_eq!(reduction.time[1], obs_params.t_sample);
    let power_clean = reduction.power_clean.unwrap();
    assert_eq!(power_clean.len(), 20);
    assert_eq!(reduction.power_clean_fit.unwrap().x.len(), 100);
    assert_eq!(reduction.power_histogram.density.len(), 10);
}

#[test]
fn test_reduce_without_header_fails() {
    let dir = tempdir().unwrap();
    let params = default_params(&dir, None);
    write_capture(&params.obs_file, synthetic_waterfall(2, 256).view());

    let result = params.reduce();
    assert!(matches!(
        result,
        Err(ReduceError::HeaderRead(HeaderReadError::DoesNotExist(_)))
    ));
}

#[test]
fn test_reduce_bad_params() {
    let dir = tempdir().unwrap();
    let mut obs_params = one_bin_params(256);
    obs_params.t_sample = 1e-6;
    let params = default_params(&dir, Some(obs_params));
    write_capture(&params.obs_file, synthetic_waterfall(2, 256).view());
    assert!(matches!(params.reduce(), Err(ReduceError::Observation(_))));
}

#[test]
fn test_calibration_with_mask_and_median() {
    let dir = tempdir().unwrap();
    let mut params = default_params(&dir, Some(one_bin_params(256)));
    write_capture(&params.obs_file, synthetic_waterfall(10, 256).view());
    let cal_file = dir.path().join("reference.dat");
    write_capture(
        &cal_file,
        Array2::from_shape_fn((5, 256), |(s, c)| 100.0 + ((s + c) % 3) as f32).view(),
    );
    params.cal_file = Some(cal_file);
    params.rest_frequency = Some(1420.40575e6);
    params.median_frequency = 5;

    let reduction = params.reduce().unwrap();
    assert!(reduction.mask.num_masked() > 0);
    assert!(reduction.velocity_edges.is_some());
    let calibration = reduction.calibration.unwrap();
    assert_eq!(calibration.ref_spectrum.len(), 256);
    assert_eq!(calibration.snr.len(), 256);
    assert!(calibration.snr.iter().all(|v| v.is_finite()));
    let snr_clean = calibration.snr_clean.unwrap();
    assert_eq!(snr_clean.len(), 256);
    // The last value has a window of one.
    assert_abs_diff_eq!(snr_clean[255], calibration.snr[255]);
}

#[test]
fn test_all_channels_masked_is_an_error() {
    let dir = tempdir().unwrap();
    // The whole band lies within the masked region around 1420 MHz.
    let obs_params = ObservationParameters::new(1420e6, 1e5, 16, 1.0);
    let mut params = default_params(&dir, Some(obs_params));
    write_capture(&params.obs_file, synthetic_waterfall(4, 16).view());
    params.cal_file = Some(params.obs_file.clone());
    params.rest_frequency = Some(1420e6);

    let result = params.reduce();
    assert!(matches!(
        result,
        Err(ReduceError::AllChannelsMasked { channels: 16 })
    ));

    // Without calibration, there's no SNR to estimate.
    params.cal_file = None;
    assert!(params.reduce().is_ok());
}

#[test]
fn test_decibel_scale() {
    let dir = tempdir().unwrap();
    let mut params = default_params(&dir, Some(one_bin_params(256)));
    write_capture(&params.obs_file, Array2::from_elem((4, 256), 100.0).view());
    params.scale = PowerScale::Decibel;

    let reduction = params.reduce().unwrap();
    assert_abs_diff_eq!(reduction.avg_spectrum[0], 20.0, epsilon = 1e-9);
    assert_abs_diff_eq!(reduction.power[3], 20.0, epsilon = 1e-9);
    // The waterfall itself stays linear.
    assert_abs_diff_eq!(reduction.waterfall[(0, 0)], 100.0);
}

#[test]
fn test_run_writes_outputs() {
    let dir = tempdir().unwrap();
    let mut params = default_params(&dir, Some(one_bin_params(256)));
    write_capture(&params.obs_file, synthetic_waterfall(12, 256).view());
    let cal_file = dir.path().join("reference.dat");
    write_capture(&cal_file, Array2::from_elem((3, 256), 90.0).view());
    params.cal_file = Some(cal_file);
    params.rest_frequency = Some(1420.40575e6);
    params.outputs = ReduceOutputs {
        waterfall_fits: Some(dir.path().join("waterfall.fits")),
        spectra_csv: Some(dir.path().join("spectra.csv")),
        power_csv: Some(dir.path().join("power.csv")),
        plot_file: None,
    };
    // Stale outputs are replaced.
    std::fs::write(params.outputs.power_csv.as_ref().unwrap(), "stale\n").unwrap();

    params.run().unwrap();

    let outputs = &params.outputs;
    assert!(outputs.waterfall_fits.as_ref().unwrap().exists());
    let spectra = outputs.spectra_csv.as_ref().unwrap();
    assert_eq!(line_count(spectra), 256);
    let contents = std::fs::read_to_string(spectra).unwrap();
    assert!(contents.lines().all(|l| l.split(',').count() == 4));
    let power = outputs.power_csv.as_ref().unwrap();
    assert_eq!(line_count(power), 12);
    assert!(!std::fs::read_to_string(power).unwrap().contains("stale"));
}

#[test]
#[cfg(not(feature = "plotting"))]
fn test_plot_without_plotting_feature() {
    let dir = tempdir().unwrap();
    let mut params = default_params(&dir, Some(one_bin_params(256)));
    write_capture(&params.obs_file, synthetic_waterfall(2, 256).view());
    params.outputs.plot_file = Some(dir.path().join("plot.png"));

    assert!(matches!(params.run(), Err(ReduceError::NoPlottingFeature)));
}

/// A stand-in acquisition program that writes 64 zero bytes to the path given
/// after `--output`.
#[cfg(unix)]
fn fake_acquisition_program(dir: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let program = dir.join("fake_radio.sh");
    std::fs::write(
        &program,
        "#!/bin/sh\nwhile [ $# -gt 0 ]; do\n  if [ \"$1\" = --output ]; then out=\"$2\"; fi\n  shift\ndone\nhead -c 64 /dev/zero > \"$out\"\n",
    )
    .unwrap();
    std::fs::set_permissions(&program, std::fs::Permissions::from_mode(0o755)).unwrap();
    program
}

#[test]
#[cfg(unix)]
fn test_observe_then_reduce() {
    use std::time::Duration;

    use crate::acquire::ExternalAcquisition;

    let dir = tempdir().unwrap();
    let obs_file = dir.path().join("observation.dat");
    let observe = ObserveParams {
        acquirer: ExternalAcquisition::new(fake_acquisition_program(dir.path())),
        obs_params: ObservationParameters::new(1420e6, 2.4e6, 8, 1.0),
        obs_file: obs_file.clone(),
        start_in: Duration::ZERO,
    };
    let header = observe.run().unwrap();
    assert_eq!(header, dir.path().join("observation.header"));

    // The parameters come from the header.
    let reduction = default_params(&dir, None).reduce().unwrap();
    assert_eq!(reduction.params, observe.obs_params);
    assert!(reduction.mjd.is_some());
    assert_eq!(reduction.waterfall.dim(), (2, 8));
    assert!(reduction.avg_spectrum.iter().all(|&v| v == 0.0));
}
