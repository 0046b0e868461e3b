// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use tempfile::tempdir;

use hi_reduce::{io::write::write_header, HeaderRecord, ObservationParameters};

use crate::{get_cmd_output, hi_reduce, read_lines, write_capture};

/// 0.1 s * 2.56 MHz / 256 channels = 1000 FFT bins per sample.
fn obs_params() -> ObservationParameters {
    ObservationParameters::new(1420e6, 2.56e6, 256, 0.1)
}

#[test]
fn test_reduce_with_explicit_params() {
    let dir = tempdir().unwrap();
    let obs = dir.path().join("on.dat");
    let spectra = dir.path().join("spectra.csv");
    let power = dir.path().join("power.csv");
    write_capture(&obs, 20, 256, 100.0);

    #[rustfmt::skip]
    let cmd = hi_reduce()
        .args([
            "reduce",
            "-o", &format!("{}", obs.display()),
            "-f", "1420MHz",
            "-b", "2.56MHz",
            "-c", "256",
            "-t", "0.1",
            "-m", "3",
            "-S", &format!("{}", spectra.display()),
            "-P", &format!("{}", power.display()),
        ])
        .ok();
    assert!(cmd.is_ok(), "reduce failed on simple test data: {}", get_cmd_output(cmd).1);

    let lines = read_lines(&spectra);
    assert_eq!(lines.len(), 256);
    assert!(lines.iter().all(|l| l.split(',').count() == 2));
    // The band starts at 1420 - 1.28 MHz.
    assert!(lines[0].starts_with("1418.720,"), "{}", lines[0]);

    let lines = read_lines(&power);
    assert_eq!(lines.len(), 20);
    assert!(lines[0].starts_with("0.000,"), "{}", lines[0]);
    assert!(lines[1].starts_with("0.100,"), "{}", lines[1]);
}

#[test]
fn test_reduce_with_header_and_calibration() {
    let dir = tempdir().unwrap();
    let obs = dir.path().join("on.dat");
    let off = dir.path().join("off.dat");
    let fits = dir.path().join("waterfall.fits");
    let spectra = dir.path().join("spectra.csv");
    write_capture(&obs, 10, 256, 100.0);
    write_capture(&off, 5, 256, 90.0);
    write_header(
        &dir.path().join("on.header"),
        &HeaderRecord::from_unix_epoch(obs_params(), 1.7e9),
    )
    .unwrap();

    #[rustfmt::skip]
    let cmd = hi_reduce()
        .args([
            "reduce",
            "-o", &format!("{}", obs.display()),
            "-C", &format!("{}", off.display()),
            "-r", "1420.40575MHz",
            "-n", "5",
            "--db",
            "-W", &format!("{}", fits.display()),
            "-S", &format!("{}", spectra.display()),
        ])
        .ok();
    assert!(cmd.is_ok(), "reduce failed with calibration: {}", get_cmd_output(cmd).1);
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("Peak SNR"), "{stdout}");
    assert!(stdout.contains("km/s"), "{stdout}");

    assert!(fits.exists());
    let lines = read_lines(&spectra);
    assert_eq!(lines.len(), 256);
    assert!(lines.iter().all(|l| l.split(',').count() == 4));
}

#[test]
fn test_reduce_without_header_fails() {
    let dir = tempdir().unwrap();
    let obs = dir.path().join("on.dat");
    write_capture(&obs, 2, 256, 100.0);

    let cmd = hi_reduce()
        .args(["reduce", "-o", &format!("{}", obs.display())])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.starts_with("Error:"), "{stderr}");
}

#[test]
fn test_reduce_with_partial_params_fails() {
    let cmd = hi_reduce()
        .args(["reduce", "-f", "1420MHz", "-c", "256"])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("bandwidth, t_sample"), "{stderr}");
}

#[test]
fn test_reduce_capture_of_the_wrong_size_fails() {
    let dir = tempdir().unwrap();
    let obs = dir.path().join("on.dat");
    // 255 channels' worth of samples can't be split into 256-channel spectra.
    write_capture(&obs, 1, 255, 100.0);

    #[rustfmt::skip]
    let cmd = hi_reduce()
        .args([
            "reduce",
            "-o", &format!("{}", obs.display()),
            "-f", "1420MHz",
            "-b", "2.56MHz",
            "-c", "256",
            "-t", "0.1",
        ])
        .ok();
    assert!(cmd.is_err());
}

#[test]
fn test_save_toml_then_reuse() {
    let dir = tempdir().unwrap();
    let obs = dir.path().join("on.dat");
    let power = dir.path().join("power.csv");
    let toml = dir.path().join("args.toml");
    write_capture(&obs, 4, 256, 100.0);

    #[rustfmt::skip]
    let cmd = hi_reduce()
        .args([
            "reduce",
            "--dry-run",
            "--save-toml", &format!("{}", toml.display()),
            "-o", &format!("{}", obs.display()),
            "-f", "1420MHz",
            "-b", "2.56MHz",
            "-c", "256",
            "-t", "0.1",
            "-P", &format!("{}", power.display()),
        ])
        .ok();
    assert!(cmd.is_ok(), "dry run failed: {}", get_cmd_output(cmd).1);
    // Nothing is written on a dry run.
    assert!(!power.exists());

    let contents = std::fs::read_to_string(&toml).unwrap();
    assert!(contents.contains("[observation]"), "{contents}");
    assert!(contents.contains("channels = 256"), "{contents}");

    // The saved arguments reproduce the run.
    let cmd = hi_reduce()
        .args(["reduce", &format!("{}", toml.display())])
        .ok();
    assert!(cmd.is_ok(), "reduce from toml failed: {}", get_cmd_output(cmd).1);
    assert_eq!(read_lines(&power).len(), 4);
}

#[test]
fn test_bad_arg_file_extension() {
    let dir = tempdir().unwrap();
    let args = dir.path().join("args.txt");
    std::fs::write(&args, "channels = 256\n").unwrap();

    let cmd = hi_reduce()
        .args(["reduce", &format!("{}", args.display())])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("recognised file extension"), "{stderr}");
}
