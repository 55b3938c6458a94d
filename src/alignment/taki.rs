// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Transforms from three direction correspondences (Toshimi Taki's method).

use crate::{direction::TelescopeDirectionVector, math::Matrix3};

/// A transform and its inverse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TakiMatrices {
    pub actual_to_apparent: Matrix3,
    pub apparent_to_actual: Matrix3,
}

impl TakiMatrices {
    pub const IDENTITY: TakiMatrices = TakiMatrices {
        actual_to_apparent: Matrix3::IDENTITY,
        apparent_to_actual: Matrix3::IDENTITY,
    };
}

/// Find the matrix `T` with `T·actual[i] = apparent[i]` for each `i`, i.e.
/// `T = Mβ·Mα⁻¹` where the columns of `Mα` and `Mβ` are the actual and
/// apparent directions. `None` is returned if either set of directions
/// doesn't span 3D space.
pub fn calculate_taki_matrices(
    actual: [TelescopeDirectionVector; 3],
    apparent: [TelescopeDirectionVector; 3],
) -> Option<TakiMatrices> {
    let m_alpha = Matrix3::from_columns(actual[0], actual[1], actual[2]);
    let m_beta = Matrix3::from_columns(apparent[0], apparent[1], apparent[2]);

    let actual_to_apparent = m_beta * m_alpha.invert()?;
    let apparent_to_actual = actual_to_apparent.invert()?;
    Some(TakiMatrices {
        actual_to_apparent,
        apparent_to_actual,
    })
}
