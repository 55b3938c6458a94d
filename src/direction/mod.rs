// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Telescope direction vectors, i.e. direction cosines on the unit sphere.

The frame is right handed. For horizontal coordinates, x points north, y
points west and z points at the zenith; equatorial and hour-angle frames use
the same axes with z at the celestial pole.
 */

mod observer;
mod spherical;

pub use observer::*;
pub use spherical::*;

use std::ops::{Add, BitXor, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

use crate::constants::MIN_NORMALISABLE_LENGTH;

/// A 3D direction. Nothing is normalised on construction; call
/// [`TelescopeDirectionVector::normalise`] when a unit vector is required.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TelescopeDirectionVector {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl TelescopeDirectionVector {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// The cross product `self × rhs`.
    pub fn cross(&self, rhs: &Self) -> Self {
        Self {
            x: self.y * rhs.z - self.z * rhs.y,
            y: self.z * rhs.x - self.x * rhs.z,
            z: self.x * rhs.y - self.y * rhs.x,
        }
    }

    /// The dot product `self · rhs`.
    pub fn dot(&self, rhs: &Self) -> f64 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    pub fn length(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Divide this vector by its magnitude.
    ///
    /// The vector must not be zero; the result is NaN if it is. Use
    /// [`TelescopeDirectionVector::try_normalised`] when that can't be
    /// guaranteed.
    pub fn normalise(&mut self) {
        let length = self.length();
        self.x /= length;
        self.y /= length;
        self.z /= length;
    }

    /// A normalised copy of this vector, or `None` if the vector is too short
    /// to have a meaningful direction.
    pub fn try_normalised(self) -> Option<Self> {
        let length = self.length();
        if length < MIN_NORMALISABLE_LENGTH || !length.is_finite() {
            None
        } else {
            Some(self * (1.0 / length))
        }
    }

    /// Rotate this vector about the y axis by `angle_deg` degrees. A positive
    /// angle rotates z towards x.
    pub fn rotate_around_y(&mut self, angle_deg: f64) {
        let (s, c) = angle_deg.to_radians().sin_cos();
        let x = self.x * c + self.z * s;
        let z = self.z * c - self.x * s;
        self.x = x;
        self.z = z;
    }

    /// Are all components finite?
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl From<[f64; 3]> for TelescopeDirectionVector {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<TelescopeDirectionVector> for [f64; 3] {
    fn from(v: TelescopeDirectionVector) -> Self {
        [v.x, v.y, v.z]
    }
}

impl Add for TelescopeDirectionVector {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
            z: self.z + rhs.z,
        }
    }
}

impl Sub for TelescopeDirectionVector {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z,
        }
    }
}

impl Neg for TelescopeDirectionVector {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}

/// Cross product.
impl Mul for TelescopeDirectionVector {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        self.cross(&rhs)
    }
}

impl Mul<f64> for TelescopeDirectionVector {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self {
            x: self.x * rhs,
            y: self.y * rhs,
            z: self.z * rhs,
        }
    }
}

/// Dot product.
impl BitXor for TelescopeDirectionVector {
    type Output = f64;

    fn bitxor(self, rhs: Self) -> f64 {
        self.dot(&rhs)
    }
}

impl approx::AbsDiffEq for TelescopeDirectionVector {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        f64::abs_diff_eq(&self.x, &other.x, epsilon)
            && f64::abs_diff_eq(&self.y, &other.y, epsilon)
            && f64::abs_diff_eq(&self.z, &other.z, epsilon)
    }
}
