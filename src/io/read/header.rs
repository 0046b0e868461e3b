// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code to read header sidecar files.
//!
//! A header is UTF-8 text with one `key=value` pair per line. Keys and values
//! are trimmed; blank lines are ignored. If a key is given more than once, the
//! last value wins.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use indexmap::IndexMap;
use log::{debug, trace};

use super::HeaderReadError;
use crate::{
    constants::HEADER_EXTENSION,
    observation::{HeaderRecord, ObservationParameters},
};

const KNOWN_KEYS: [&str; 10] = [
    "mjd",
    "dev_args",
    "rf_gain",
    "if_gain",
    "bb_gain",
    "frequency",
    "bandwidth",
    "channels",
    "t_sample",
    "duration",
];

/// Get the path of the header sidecar belonging to a capture file. This is the
/// capture file with its extension replaced (or added).
pub fn header_path<P: AsRef<Path>>(obs_file: P) -> PathBuf {
    obs_file.as_ref().with_extension(HEADER_EXTENSION)
}

/// Read a header sidecar file. `frequency`, `bandwidth`, `channels` and
/// `t_sample` must be present; all other fields fall back to their defaults.
pub fn read_header<P: AsRef<Path>>(file: P) -> Result<HeaderRecord, HeaderReadError> {
    let file = file.as_ref();
    if !file.exists() {
        return Err(HeaderReadError::DoesNotExist(file.to_path_buf()));
    }
    let contents = std::fs::read_to_string(file)?;
    let fields = parse_fields(file, &contents)?;
    let reader = FieldReader { file, fields };

    let defaults = ObservationParameters::default();
    let params = ObservationParameters {
        dev_args: reader
            .get_str("dev_args")
            .map(unquote)
            .map(|s| s.to_string())
            .unwrap_or(defaults.dev_args),
        rf_gain: reader.get_optional("rf_gain")?.unwrap_or(defaults.rf_gain),
        if_gain: reader.get_optional("if_gain")?.unwrap_or(defaults.if_gain),
        bb_gain: reader.get_optional("bb_gain")?.unwrap_or(defaults.bb_gain),
        frequency: reader.get_required("frequency")?,
        bandwidth: reader.get_required("bandwidth")?,
        channels: reader.get_channels()?,
        t_sample: reader.get_required("t_sample")?,
        duration: reader
            .get_optional("duration")?
            .unwrap_or(defaults.duration),
    };
    let mjd = reader.get_optional("mjd")?;

    Ok(HeaderRecord { mjd, params })
}

fn parse_fields<'a>(
    file: &Path,
    contents: &'a str,
) -> Result<IndexMap<&'a str, &'a str>, HeaderReadError> {
    let mut fields = IndexMap::new();
    for (i, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (key, value) = line
            .split_once('=')
            .ok_or_else(|| HeaderReadError::NotKeyValue {
                file: file.to_path_buf(),
                line_num: i + 1,
                line: line.to_string(),
            })?;
        let (key, value) = (key.trim(), value.trim());
        if !KNOWN_KEYS.contains(&key) {
            debug!("Ignoring unknown header key '{key}' in '{}'", file.display());
            continue;
        }
        trace!("Header: {key} = {value}");
        fields.insert(key, value);
    }
    Ok(fields)
}

/// Strip one layer of double quotes, if present.
fn unquote(s: &str) -> &str {
    s.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(s)
}

struct FieldReader<'a> {
    file: &'a Path,
    fields: IndexMap<&'a str, &'a str>,
}

impl<'a> FieldReader<'a> {
    fn get_str(&self, key: &str) -> Option<&'a str> {
        self.fields.get(key).copied()
    }

    fn parse<T: FromStr>(&self, key: &'static str, value: &str) -> Result<T, HeaderReadError> {
        value.parse().map_err(|_| HeaderReadError::NotNumeric {
            file: self.file.to_path_buf(),
            key,
            value: value.to_string(),
        })
    }

    fn get_optional(&self, key: &'static str) -> Result<Option<f64>, HeaderReadError> {
        self.get_str(key)
            .map(|value| self.parse(key, value))
            .transpose()
    }

    fn get_required(&self, key: &'static str) -> Result<f64, HeaderReadError> {
        self.get_optional(key)?
            .ok_or_else(|| HeaderReadError::MissingKey {
                file: self.file.to_path_buf(),
                key,
            })
    }

    /// Channels are usually written as an integer, but accept whole floats
    /// like "2048.0" too.
    fn get_channels(&self) -> Result<usize, HeaderReadError> {
        let key = "channels";
        let value = self.get_str(key).ok_or_else(|| HeaderReadError::MissingKey {
            file: self.file.to_path_buf(),
            key,
        })?;
        match value.parse::<usize>() {
            Ok(c) => Ok(c),
            Err(_) => {
                let f: f64 = self.parse(key, value)?;
                if f.is_finite() && f >= 0.0 && f.fract() == 0.0 {
                    Ok(f as usize)
                } else {
                    Err(HeaderReadError::NotNumeric {
                        file: self.file.to_path_buf(),
                        key,
                        value: value.to_string(),
                    })
                }
            }
        }
    }
}
