// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Alignment transforms between the sky and a telescope mount.

"Actual" directions are where things really are in the local sky (derived
from RA/Dec, the observer's position and the time). "Apparent" directions
are the raw directions reported by the mount. A math plugin turns the sync
points in an [`AlignmentDatabase`] into transforms between the two.
 */

mod built_in;
mod error;
mod subsystem;
mod taki;

pub use built_in::BuiltInMathPlugin;
pub use error::AlignmentError;
pub use subsystem::AlignmentSubsystem;
pub use taki::{calculate_taki_matrices, TakiMatrices};

use hifitime::{Duration, Epoch};
use itertools::Itertools;
use marlu::RADec;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use crate::{database::AlignmentDatabase, direction::TelescopeDirectionVector};

lazy_static::lazy_static! {
    pub static ref MOUNT_ALIGNMENTS_COMMA_SEPARATED: String = ApproximateMountAlignment::iter().join(", ");

    pub static ref MATH_PLUGINS_COMMA_SEPARATED: String = MathPluginType::iter().join(", ");
}

/// A coarse guess at how the mount is set up. This is only used when there
/// are too few sync points to work it out.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ApproximateMountAlignment {
    /// An alt-az mount; the mount's pole is the zenith.
    #[strum(serialize = "zenith")]
    Zenith,

    /// An equatorial mount in the northern hemisphere.
    #[strum(serialize = "north_celestial_pole")]
    NorthCelestialPole,

    /// An equatorial mount in the southern hemisphere.
    #[strum(serialize = "south_celestial_pole")]
    SouthCelestialPole,
}

impl Default for ApproximateMountAlignment {
    fn default() -> Self {
        Self::Zenith
    }
}

impl ApproximateMountAlignment {
    /// Guess that an equatorial mount points at the visible celestial pole.
    pub fn from_latitude(latitude_deg: f64) -> Self {
        if latitude_deg >= 0.0 {
            Self::NorthCelestialPole
        } else {
            Self::SouthCelestialPole
        }
    }
}

/// All of the available math plugins.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum MathPluginType {
    /// TAKI transforms, with convex hulls once there are enough sync points.
    #[strum(serialize = "built_in")]
    BuiltIn,
}

impl Default for MathPluginType {
    fn default() -> Self {
        Self::BuiltIn
    }
}

impl MathPluginType {
    pub fn create(self, approximate_alignment: ApproximateMountAlignment) -> Box<dyn MathPlugin> {
        match self {
            MathPluginType::BuiltIn => Box::new(BuiltInMathPlugin::new(approximate_alignment)),
        }
    }
}

/// How a transform was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TransformRegime {
    /// No sync points; only the approximate mount alignment is used.
    #[strum(serialize = "uncalibrated")]
    Uncalibrated,

    #[strum(serialize = "one sync point")]
    OneSyncPoint,

    #[strum(serialize = "two sync points")]
    TwoSyncPoints,

    #[strum(serialize = "three sync points")]
    ThreeSyncPoints,

    /// One transform per face of a convex hull over the sync points.
    #[strum(serialize = "convex hull")]
    ConvexHull,
}

/// Something numerically degenerate that was recovered from.
#[derive(Debug, Clone, PartialEq)]
pub enum TransformWarning {
    /// The sync point directions didn't span 3D space, so an identity
    /// transform is used instead.
    SingularTransform {
        /// The sync point numbers (1-based) involved.
        sync_points: Vec<usize>,
    },
}

impl std::fmt::Display for TransformWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransformWarning::SingularTransform { sync_points } => write!(
                f,
                "Sync points {} are degenerate; using an identity transform for them",
                sync_points.iter().join(", ")
            ),
        }
    }
}

/// What happened during [`MathPlugin::initialise`].
#[derive(Debug, Clone, PartialEq)]
pub struct InitialiseReport {
    pub regime: TransformRegime,
    pub num_sync_points: usize,

    /// The number of hull faces (not touching the nadir) with a transform.
    /// Only set for [`TransformRegime::ConvexHull`].
    pub num_hull_faces: Option<usize>,

    pub warnings: Vec<TransformWarning>,
}

impl InitialiseReport {
    pub fn is_degenerate(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Something that turns sync points into sky <-> mount transforms.
pub trait MathPlugin {
    fn name(&self) -> &'static str;

    fn approximate_mount_alignment(&self) -> ApproximateMountAlignment;

    fn set_approximate_mount_alignment(&mut self, alignment: ApproximateMountAlignment);

    /// (Re)compute transforms from the current contents of `database`. The
    /// database is only borrowed for the duration of the call. If this fails,
    /// the plugin is left uninitialised.
    fn initialise(
        &mut self,
        database: &AlignmentDatabase,
    ) -> Result<InitialiseReport, AlignmentError>;

    /// Where should the mount point to see `radec` at `epoch`?
    fn celestial_to_telescope_at(
        &self,
        radec: RADec,
        epoch: Epoch,
    ) -> Result<TelescopeDirectionVector, AlignmentError>;

    /// What is the mount pointing at, at `epoch`?
    fn telescope_to_celestial_at(
        &self,
        direction: TelescopeDirectionVector,
        epoch: Epoch,
    ) -> Result<RADec, AlignmentError>;

    /// [`MathPlugin::celestial_to_telescope_at`], for a time `julian_offset`
    /// days from now.
    fn celestial_to_telescope(
        &self,
        radec: RADec,
        julian_offset: f64,
    ) -> Result<TelescopeDirectionVector, AlignmentError> {
        let epoch = now()? + Duration::from_days(julian_offset);
        self.celestial_to_telescope_at(radec, epoch)
    }

    /// [`MathPlugin::telescope_to_celestial_at`], now.
    fn telescope_to_celestial(
        &self,
        direction: TelescopeDirectionVector,
    ) -> Result<RADec, AlignmentError> {
        self.telescope_to_celestial_at(direction, now()?)
    }
}

fn now() -> Result<Epoch, AlignmentError> {
    Epoch::now().map_err(|e| AlignmentError::Clock(e.to_string()))
}
