// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code to read raw radiometer captures and their header sidecars.

mod error;
mod header;
mod waterfall;

pub use error::{HeaderReadError, WaterfallReadError};
pub use header::{header_path, read_header};
pub use waterfall::read_waterfall;
