// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use tempfile::tempdir;

use hi_reduce::io::read::read_header;

use crate::{get_cmd_output, hi_reduce, read_lines};

/// A stand-in for the radio front end. It records its arguments and writes 4
/// spectra of 8 channels to the path following `--output`.
fn fake_radio(dir: &Path) -> PathBuf {
    let program = dir.join("fake_radio.sh");
    std::fs::write(
        &program,
        indoc::indoc! {r#"
            #!/bin/sh
            echo "$@" > "$(dirname "$0")/radio_args.txt"
            while [ $# -gt 0 ]; do
                if [ "$1" = --output ]; then out="$2"; fi
                shift
            done
            head -c 128 /dev/zero > "$out"
        "#},
    )
    .unwrap();
    std::fs::set_permissions(&program, std::fs::Permissions::from_mode(0o755)).unwrap();
    program
}

#[test]
fn test_observe_then_reduce() {
    let dir = tempdir().unwrap();
    let program = fake_radio(dir.path());
    let obs = dir.path().join("obs.dat");
    let power = dir.path().join("power.csv");

    #[rustfmt::skip]
    let cmd = hi_reduce()
        .args([
            "observe",
            "-f", "1420.4MHz",
            "-b", "2.4MHz",
            "-c", "8",
            "-t", "1",
            "-d", "10s",
            "--dev-args", "airspy=0",
            "--rf-gain", "14",
            "-o", &format!("{}", obs.display()),
            "--acquisition-program", &format!("{}", program.display()),
        ])
        .ok();
    assert!(cmd.is_ok(), "observe failed: {}", get_cmd_output(cmd).1);

    let radio_args = std::fs::read_to_string(dir.path().join("radio_args.txt")).unwrap();
    assert!(radio_args.contains("--dev-args airspy=0"), "{radio_args}");
    assert!(radio_args.contains("--rf-gain 14"), "{radio_args}");
    assert!(radio_args.contains("--channels 8"), "{radio_args}");
    assert!(radio_args.contains("--duration 10"), "{radio_args}");

    let record = read_header(dir.path().join("obs.header")).unwrap();
    assert_eq!(record.params.channels, 8);
    assert_eq!(record.params.dev_args, "airspy=0");
    assert!(record.mjd.is_some());

    // The header is all that's needed to reduce the capture.
    let cmd = hi_reduce()
        .args([
            "reduce",
            "-o",
            &format!("{}", obs.display()),
            "-P",
            &format!("{}", power.display()),
        ])
        .ok();
    assert!(cmd.is_ok(), "reduce failed: {}", get_cmd_output(cmd).1);
    assert_eq!(read_lines(&power).len(), 4);
}

#[test]
fn test_observe_with_missing_program_fails() {
    let dir = tempdir().unwrap();

    #[rustfmt::skip]
    let cmd = hi_reduce()
        .args([
            "observe",
            "-f", "1420.4MHz",
            "-b", "2.4MHz",
            "-c", "8",
            "-t", "1",
            "-o", &format!("{}", dir.path().join("obs.dat").display()),
            "--acquisition-program", &format!("{}", dir.path().join("no_radio").display()),
        ])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.starts_with("Error:"), "{stderr}");
    assert!(!dir.path().join("obs.header").exists());
}
