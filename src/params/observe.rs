// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;
use std::time::Duration;

use crate::{
    acquire::{observe, AcquireError, ExternalAcquisition},
    observation::ObservationParameters,
};

/// Everything needed to run an observation with an external acquisition
/// program.
#[derive(Debug, Clone)]
pub struct ObserveParams {
    pub acquirer: ExternalAcquisition,
    pub obs_params: ObservationParameters,

    /// Where the raw capture is written. The header sidecar is written next
    /// to it.
    pub obs_file: PathBuf,

    /// How long to wait before starting.
    pub start_in: Duration,
}

impl ObserveParams {
    /// Run the observation, returning the path to the header sidecar.
    pub fn run(&self) -> Result<PathBuf, AcquireError> {
        observe(&self.acquirer, &self.obs_params, &self.obs_file, self.start_in)
    }
}
