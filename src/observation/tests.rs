// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use approx::assert_abs_diff_eq;
use hifitime::Epoch;

use super::*;

#[test]
fn test_bins() {
    let params = ObservationParameters::new(1420e6, 2.4e6, 2048, 0.1);
    // 0.1 * 2.4e6 / 2048 = 117.1875
    assert_eq!(params.bins().unwrap(), 117);

    let params = ObservationParameters::new(1420e6, 2.4e6, 2048, 1e-3);
    // 1e-3 * 2.4e6 / 2048 = 1.17...
    assert_eq!(params.bins().unwrap(), 1);
}

#[test]
fn test_zero_bins_is_an_error() {
    let params = ObservationParameters::new(1420e6, 2.4e6, 2048, 1e-4);
    let result = params.bins();
    assert!(matches!(result, Err(ObservationError::ZeroBins { .. })));
    assert!(params.validate().is_err());
}

#[test]
fn test_zero_channels_is_an_error() {
    let params = ObservationParameters::new(1420e6, 2.4e6, 0, 1.0);
    assert!(matches!(params.bins(), Err(ObservationError::ZeroChannels)));
    assert!(matches!(
        params.validate(),
        Err(ObservationError::ZeroChannels)
    ));
}

#[test]
fn test_validate() {
    let params = ObservationParameters::new(1420e6, 2.4e6, 2048, 0.1);
    assert!(params.validate().is_ok());
    assert!(params.validate_acquisition().is_ok());

    let mut bad = params.clone();
    bad.bandwidth = -2.4e6;
    match bad.validate() {
        Err(ObservationError::NotPositive { name, .. }) => assert_eq!(name, "bandwidth"),
        other => panic!("Unexpected result: {other:?}"),
    }

    let mut bad = params.clone();
    bad.t_sample = f64::NAN;
    assert!(bad.validate().is_err());

    // The duration only matters for acquisition.
    let mut bad = params;
    bad.duration = 0.0;
    assert!(bad.validate().is_ok());
    match bad.validate_acquisition() {
        Err(ObservationError::NotPositive { name, .. }) => assert_eq!(name, "duration"),
        other => panic!("Unexpected result: {other:?}"),
    }
}

#[test]
fn test_unix_to_mjd() {
    assert_abs_diff_eq!(unix_to_mjd(0.0), 40587.0);
    assert_abs_diff_eq!(unix_to_mjd(86400.0), 40588.0);
    assert_abs_diff_eq!(unix_to_mjd(43200.0), 40587.5);
}

#[test]
fn test_unix_to_mjd_agrees_with_hifitime() {
    // 2023-03-21T12:00:00 UTC
    let unix_seconds = 1679400000.0;
    let epoch = Epoch::from_unix_seconds(unix_seconds);
    assert_abs_diff_eq!(
        unix_to_mjd(unix_seconds),
        epoch.to_mjd_utc_days(),
        epsilon = 1e-6
    );
}

#[test]
fn test_header_record_from_unix_epoch() {
    let params = ObservationParameters::new(1420e6, 2.4e6, 2048, 0.1);
    let record = HeaderRecord::from_unix_epoch(params.clone(), 0.0);
    assert_eq!(record.params, params);
    assert_abs_diff_eq!(record.mjd.unwrap(), 40587.0);
}
