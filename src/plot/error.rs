// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlotError {
    #[error("Plots can only be written as PNG, but '{0}' doesn't end in .png")]
    NotPng(PathBuf),

    #[error("While plotting the {panel}: {msg}")]
    Draw { panel: &'static str, msg: String },
}
