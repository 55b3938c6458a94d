// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with alignment transforms.

use thiserror::Error;

use crate::database::DatabaseError;

#[derive(Error, Debug)]
pub enum AlignmentError {
    #[error("The alignment database has no sync points")]
    NoCalibrationData,

    #[error("No reference position (observer latitude and longitude) has been set")]
    MissingReferencePosition,

    #[error("The math plugin has not been initialised")]
    NotInitialised,

    #[error("The direction doesn't pass through any face of the sync point hull")]
    NoIntersection,

    #[error("Sync point {sync_point} has a telescope direction with no length")]
    ZeroTelescopeDirection { sync_point: usize },

    #[error("The telescope direction has no length")]
    ZeroDirection,

    #[error("Could not read the system clock: {0}")]
    Clock(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}
