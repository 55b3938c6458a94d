// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Useful constants.

All constants *must* be double precision. Direction cosines are only ever
handled as `f64`; the convex hull uses integer coordinates, but those are
derived from (and mapped back to) double-precision values.
 */

pub use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// Direction cosines are multiplied by this factor (and rounded) before being
/// given to the convex hull. Orientation tests are then exact; see
/// [`crate::hull::ConvexHull::make_new_vertex`].
pub const HULL_SCALE_FACTOR: f64 = 1_000_000.0;

/// The vertex number reserved for the synthetic nadir vertex in both convex
/// hulls. Sync point `i` (zero indexed) has vertex number `i + 1`.
pub const NADIR_VERTEX_NUMBER: usize = 0;

/// LU pivots with a magnitude smaller than this are treated as zero, i.e. the
/// matrix is singular. The matrices being inverted are built from unit
/// vectors, so an absolute tolerance is appropriate.
pub const SINGULAR_PIVOT_TOLERANCE: f64 = 1e-12;

/// Vectors shorter than this cannot be normalised.
pub const MIN_NORMALISABLE_LENGTH: f64 = 1e-12;

/// Query directions are scaled by this factor before the ray/triangle test so
/// that the ray always passes through the hull's facets.
pub const RAY_SCALE_FACTOR: f64 = 2.0;

/// DUT1 used when calculating local sidereal time. Sync points only need to
/// be self-consistent, so UT1 - UTC is ignored.
pub const DEFAULT_DUT1_SECONDS: f64 = 0.0;

/// Hours to radians.
pub const HOURS_TO_RAD: f64 = TAU / 24.0;
