// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code to parse strings into plain numbers or some quantity with a unit.

mod error;

pub use error::UnitParseError;

use strum::IntoEnumIterator;
use strum_macros::{EnumIter, EnumString, IntoStaticStr};

#[derive(Debug, Clone, Copy, PartialEq, EnumIter, EnumString, IntoStaticStr)]
pub(crate) enum TimeFormat {
    /// Seconds
    S,

    /// Milliseconds
    Ms,

    /// Minutes
    Min,

    NoUnit,
}

impl TimeFormat {
    /// Convert a value in this unit to seconds. Values without a unit are
    /// assumed to be seconds.
    pub(crate) fn to_seconds(self, value: f64) -> f64 {
        match self {
            TimeFormat::S | TimeFormat::NoUnit => value,
            TimeFormat::Ms => value / 1e3,
            TimeFormat::Min => value * 60.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, EnumIter, EnumString, IntoStaticStr)]
#[allow(non_camel_case_types)]
pub(crate) enum FreqFormat {
    /// Hertz
    Hz,

    /// kiloHertz
    kHz,

    /// MegaHertz
    MHz,

    /// GigaHertz
    GHz,

    NoUnit,
}

impl FreqFormat {
    /// Convert a value in this unit to Hz. Values without a unit are assumed to
    /// be Hz.
    pub(crate) fn to_hz(self, value: f64) -> f64 {
        match self {
            FreqFormat::Hz | FreqFormat::NoUnit => value,
            FreqFormat::kHz => value * 1e3,
            FreqFormat::MHz => value * 1e6,
            FreqFormat::GHz => value * 1e9,
        }
    }
}

/// Split a string into a number and the unit following it, and find which of
/// the formats the unit is (case-insensitively). `Ok(None)` means that no
/// format matched.
fn parse_with_unit<F>(s: &str, no_unit: F) -> Result<Option<(f64, F)>, (&'static str, String)>
where
    F: IntoEnumIterator + Into<&'static str> + Copy + PartialEq,
{
    let s = s.trim();
    let prefix = s.trim_end_matches(char::is_alphabetic);
    let suffix = s[prefix.len()..].trim().to_uppercase();
    for format in F::iter().filter(|&f| f != no_unit) {
        let format_str: &'static str = format.into();
        if suffix == format_str.to_uppercase() {
            return match prefix.trim().parse() {
                Ok(number) => Ok(Some((number, format))),
                Err(_) => Err((format_str, s.to_string())),
            };
        }
    }
    Ok(None)
}

/// Parse a string that may have a unit of time attached to it.
pub(crate) fn parse_time(s: &str) -> Result<(f64, TimeFormat), UnitParseError> {
    // Try to parse a naked number.
    if let Ok(number) = s.trim().parse() {
        return Ok((number, TimeFormat::NoUnit));
    }

    match parse_with_unit(s, TimeFormat::NoUnit) {
        Ok(Some(pair)) => Ok(pair),
        Err((unit, input)) => Err(UnitParseError::GotTimeUnitButCantParse { input, unit }),
        Ok(None) => Err(UnitParseError::Unknown {
            input: s.to_string(),
            unit_type: "time",
        }),
    }
}

/// Parse a string that may have a unit of frequency attached to it.
pub(crate) fn parse_freq(s: &str) -> Result<(f64, FreqFormat), UnitParseError> {
    // Try to parse a naked number.
    if let Ok(number) = s.trim().parse() {
        return Ok((number, FreqFormat::NoUnit));
    }

    match parse_with_unit(s, FreqFormat::NoUnit) {
        Ok(Some(pair)) => Ok(pair),
        Err((unit, input)) => Err(UnitParseError::GotFreqUnitButCantParse { input, unit }),
        Ok(None) => Err(UnitParseError::Unknown {
            input: s.to_string(),
            unit_type: "frequency",
        }),
    }
}

/// Parse a time into seconds.
pub(crate) fn parse_seconds(s: &str) -> Result<f64, UnitParseError> {
    let (value, format) = parse_time(s)?;
    Ok(format.to_seconds(value))
}

/// Parse a frequency into Hz.
pub(crate) fn parse_hz(s: &str) -> Result<f64, UnitParseError> {
    let (value, format) = parse_freq(s)?;
    Ok(format.to_hz(value))
}
