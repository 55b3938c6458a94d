// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Conversions between spherical coordinates and direction vectors.
//!
//! All angles are in radians. Nothing here validates angle ranges; azimuths
//! coming out of a direction vector are always in [0, 2π).

use marlu::{AzEl, HADec, RADec};

use super::TelescopeDirectionVector;
use crate::constants::TAU;

/// Which way the azimuthal angle increases when viewed from the +z axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AzimuthAngleDirection {
    Clockwise,
    AntiClockwise,
}

/// What the polar angle is measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolarAngleDirection {
    /// The polar angle is 0 at the +z axis (a co-latitude).
    FromPole,

    /// The polar angle is 0 in the xy plane (a latitude, e.g. altitude or
    /// declination).
    FromAzimuthalPlane,
}

/// Make a direction vector from a spherical coordinate.
pub fn direction_from_spherical(
    azimuth: f64,
    azimuth_direction: AzimuthAngleDirection,
    polar_angle: f64,
    polar_direction: PolarAngleDirection,
) -> TelescopeDirectionVector {
    let azimuth = match azimuth_direction {
        AzimuthAngleDirection::AntiClockwise => azimuth,
        AzimuthAngleDirection::Clockwise => -azimuth,
    };
    let (s_az, c_az) = azimuth.sin_cos();
    let (s_polar, c_polar) = polar_angle.sin_cos();
    match polar_direction {
        PolarAngleDirection::FromAzimuthalPlane => {
            TelescopeDirectionVector::new(c_polar * c_az, c_polar * s_az, s_polar)
        }
        PolarAngleDirection::FromPole => {
            TelescopeDirectionVector::new(s_polar * c_az, s_polar * s_az, c_polar)
        }
    }
}

/// Get the (azimuth, polar angle) of a direction vector. The vector is
/// expected to be normalised.
pub fn spherical_from_direction(
    direction: TelescopeDirectionVector,
    azimuth_direction: AzimuthAngleDirection,
    polar_direction: PolarAngleDirection,
) -> (f64, f64) {
    let azimuth = match azimuth_direction {
        AzimuthAngleDirection::AntiClockwise => direction.y.atan2(direction.x),
        AzimuthAngleDirection::Clockwise => (-direction.y).atan2(direction.x),
    };
    // Guard against |z| creeping above 1 through rounding.
    let z = direction.z.clamp(-1.0, 1.0);
    let polar_angle = match polar_direction {
        PolarAngleDirection::FromAzimuthalPlane => z.asin(),
        PolarAngleDirection::FromPole => z.acos(),
    };
    (azimuth.rem_euclid(TAU), polar_angle)
}

/// Horizontal coordinates to a direction vector. Azimuth is clockwise from
/// north (+x), altitude is measured from the horizon.
pub fn direction_from_azel(azel: AzEl) -> TelescopeDirectionVector {
    direction_from_spherical(
        azel.az,
        AzimuthAngleDirection::Clockwise,
        azel.el,
        PolarAngleDirection::FromAzimuthalPlane,
    )
}

pub fn azel_from_direction(direction: TelescopeDirectionVector) -> AzEl {
    let (az, el) = spherical_from_direction(
        direction,
        AzimuthAngleDirection::Clockwise,
        PolarAngleDirection::FromAzimuthalPlane,
    );
    AzEl { az, el }
}

/// Equatorial coordinates to a direction vector. Right ascension is clockwise
/// in the xy plane, declination is measured from that plane.
pub fn direction_from_radec(radec: RADec) -> TelescopeDirectionVector {
    direction_from_spherical(
        radec.ra,
        AzimuthAngleDirection::Clockwise,
        radec.dec,
        PolarAngleDirection::FromAzimuthalPlane,
    )
}

pub fn radec_from_direction(direction: TelescopeDirectionVector) -> RADec {
    let (ra, dec) = spherical_from_direction(
        direction,
        AzimuthAngleDirection::Clockwise,
        PolarAngleDirection::FromAzimuthalPlane,
    );
    RADec { ra, dec }
}

/// Local hour angle and declination to a direction vector. This is the
/// natural frame of an equatorial mount's encoders.
pub fn direction_from_hadec(hadec: HADec) -> TelescopeDirectionVector {
    direction_from_spherical(
        hadec.ha,
        AzimuthAngleDirection::Clockwise,
        hadec.dec,
        PolarAngleDirection::FromAzimuthalPlane,
    )
}

pub fn hadec_from_direction(direction: TelescopeDirectionVector) -> HADec {
    let (ha, dec) = spherical_from_direction(
        direction,
        AzimuthAngleDirection::Clockwise,
        PolarAngleDirection::FromAzimuthalPlane,
    );
    HADec { ha, dec }
}
