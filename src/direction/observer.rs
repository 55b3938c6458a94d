// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The observer's location and equatorial <-> horizontal conversions.

use hifitime::{Duration, Epoch};
use marlu::{precession::get_lmst, AzEl, RADec};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_DUT1_SECONDS, TAU};

/// Where the telescope is on the Earth. Both fields are in decimal degrees;
/// longitude is positive east.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReferencePosition {
    pub latitude: f64,
    pub longitude: f64,
}

impl ReferencePosition {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn latitude_rad(&self) -> f64 {
        self.latitude.to_radians()
    }

    pub fn longitude_rad(&self) -> f64 {
        self.longitude.to_radians()
    }

    /// The local mean sidereal time at this position \[radians\].
    pub fn lmst(&self, epoch: Epoch) -> f64 {
        get_lmst(
            self.longitude_rad(),
            epoch,
            Duration::from_seconds(DEFAULT_DUT1_SECONDS),
        )
    }

    /// Where is `radec` in the local sky at `epoch`?
    pub fn radec_to_azel(&self, radec: RADec, epoch: Epoch) -> AzEl {
        radec
            .to_hadec(self.lmst(epoch))
            .to_azel(self.latitude_rad())
    }

    /// Which equatorial coordinate is at `azel` in the local sky at `epoch`?
    /// The right ascension is wrapped into [0, 2π).
    pub fn azel_to_radec(&self, azel: AzEl, epoch: Epoch) -> RADec {
        let mut radec = azel
            .to_hadec(self.latitude_rad())
            .to_radec(self.lmst(epoch));
        radec.ra = radec.ra.rem_euclid(TAU);
        radec
    }
}

/// Convert a Julian date (UTC) into an [`Epoch`].
pub fn epoch_from_julian_date(julian_date: f64) -> Epoch {
    Epoch::from_jde_utc(julian_date)
}

/// Convert an [`Epoch`] into a Julian date (UTC).
pub fn julian_date_from_epoch(epoch: Epoch) -> f64 {
    epoch.to_jde_utc_days()
}
