// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Telescope mount alignment from sync points.

Each sync point pairs where something really was in the sky with where the
mount said it was pointing. From these, transforms between the local sky and
the mount's frame are derived with Toshimi Taki's matrix method; with four or
more sync points, a convex hull over them picks the three nearest sync points
for each direction.
 */

pub mod alignment;
mod cli;
pub mod constants;
pub mod database;
pub mod direction;
pub mod hull;
pub mod math;
pub mod params;

// Re-exports.
pub use alignment::{
    AlignmentError, AlignmentSubsystem, ApproximateMountAlignment, BuiltInMathPlugin,
    InitialiseReport, MathPlugin, MathPluginType, TransformRegime, TransformWarning,
};
pub use cli::{Skyalign, SkyalignError};
pub use database::{AlignmentDatabase, AlignmentDatabaseEntry, DatabaseError};
pub use direction::{ReferencePosition, TelescopeDirectionVector};
pub use hull::{ConvexHull, HullError};
pub use math::Matrix3;
