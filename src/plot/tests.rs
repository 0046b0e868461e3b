// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use approx::assert_abs_diff_eq;
use byteorder::{NativeEndian, WriteBytesExt};
use tempfile::tempdir;

use super::*;
use crate::{observation::ObservationParameters, params::ReduceParams, reduce::PowerScale};

#[test]
fn test_finite_range() {
    let r = finite_range(&[1.0, f64::NAN, 3.0, f64::INFINITY]);
    assert_abs_diff_eq!(r.start, 0.9, epsilon = 1e-12);
    assert_abs_diff_eq!(r.end, 3.1, epsilon = 1e-12);

    let r = finite_range(&[2.0, 2.0]);
    assert_abs_diff_eq!(r.start, 1.9, epsilon = 1e-12);
    assert_abs_diff_eq!(r.end, 2.1, epsilon = 1e-12);

    let r = finite_range(&[0.0]);
    assert_abs_diff_eq!(r.start, -0.5, epsilon = 1e-12);
    assert_abs_diff_eq!(r.end, 0.5, epsilon = 1e-12);

    let r = finite_range(&[f64::NAN]);
    assert_eq!(r, 0.0..1.0);
    let empty: [f64; 0] = [];
    let r = finite_range(&empty);
    assert_eq!(r, 0.0..1.0);
}

#[test]
fn test_only_png_is_written() {
    let dir = tempdir().unwrap();
    let obs_file = dir.path().join("observation.dat");
    write_capture(&obs_file, |i| i as f32);

    let reduction = ReduceParams {
        obs_file,
        obs_params: Some(ObservationParameters::new(1420e6, 2.4e6, 16, 1.0)),
        cal_file: None,
        median_frequency: 0,
        median_time: 0,
        rest_frequency: None,
        scale: PowerScale::Linear,
        outputs: Default::default(),
    }
    .reduce()
    .unwrap();

    let file = dir.path().join("plot.jpg");
    let result = plot_reduction(&reduction, &file);
    assert!(matches!(result, Err(PlotError::NotPng(_))));
    assert!(!file.exists());
}

fn write_capture(file: &std::path::Path, value: impl Fn(usize) -> f32) {
    let mut f = std::fs::File::create(file).unwrap();
    for i in 0..64 {
        f.write_f32::<NativeEndian>(value(i)).unwrap();
    }
}

#[test]
fn test_plot_calibrated_reduction_with_velocity_axis() {
    let dir = tempdir().unwrap();
    let obs_file = dir.path().join("on.dat");
    let cal_file = dir.path().join("off.dat");
    write_capture(&obs_file, |i| 10.0 + ((i * 7) % 5) as f32);
    write_capture(&cal_file, |i| 5.0 + ((i * 3) % 4) as f32);

    let reduction = ReduceParams {
        obs_file,
        obs_params: Some(ObservationParameters::new(1420e6, 2.4e6, 16, 1.0)),
        cal_file: Some(cal_file),
        median_frequency: 3,
        median_time: 2,
        rest_frequency: Some(1420.40575e6),
        scale: PowerScale::Decibel,
        outputs: Default::default(),
    }
    .reduce()
    .unwrap();
    assert!(reduction.velocity_edges.is_some());

    let file = dir.path().join("plot.png");
    plot_reduction(&reduction, &file).unwrap();
    assert!(std::fs::metadata(&file).unwrap().len() > 0);
}
