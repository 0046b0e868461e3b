// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Integration tests.
//!
//! Some help for laying out these tests was taken from:
//! https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html

#[cfg(unix)]
mod observe;
mod reduce;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::process::Output;
use std::str::from_utf8;

use assert_cmd::{output::OutputError, Command};
use byteorder::{NativeEndian, WriteBytesExt};

fn hi_reduce() -> Command {
    Command::cargo_bin("hi_reduce").unwrap()
}

fn get_cmd_output(result: Result<Output, OutputError>) -> (String, String) {
    let output = match result {
        Ok(o) => o,
        Err(o) => o.as_output().unwrap().clone(),
    };
    (
        from_utf8(&output.stdout).unwrap().to_string(),
        from_utf8(&output.stderr).unwrap().to_string(),
    )
}

/// Write a raw capture of `subs` spectra. Channels 100 to 109 carry a line.
fn write_capture(file: &Path, subs: usize, channels: usize, level: f32) {
    let mut f = BufWriter::new(File::create(file).unwrap());
    for s in 0..subs {
        for c in 0..channels {
            let line = if (100..110).contains(&c) { 10.0 } else { 0.0 };
            let ripple = ((s * 3 + c * 7) % 5) as f32;
            f.write_f32::<NativeEndian>(level + line + ripple).unwrap();
        }
    }
    f.flush().unwrap();
}

fn read_lines(file: &Path) -> Vec<String> {
    std::fs::read_to_string(file)
        .unwrap()
        .lines()
        .map(|l| l.to_string())
        .collect()
}
