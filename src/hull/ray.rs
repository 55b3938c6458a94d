// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::direction::TelescopeDirectionVector;

/// Does a ray from the origin along `ray` pass through the triangle
/// (`v1`, `v2`, `v3`)? This is the Möller–Trumbore test; triangles are hit
/// from either side, but rays parallel to the triangle's plane never hit.
pub fn ray_triangle_intersection(
    ray: &TelescopeDirectionVector,
    v1: &TelescopeDirectionVector,
    v2: &TelescopeDirectionVector,
    v3: &TelescopeDirectionVector,
) -> bool {
    let edge1 = *v2 - *v1;
    let edge2 = *v3 - *v1;

    let p = ray.cross(&edge2);
    let det = edge1.dot(&p);
    if det.abs() < f64::EPSILON {
        return false;
    }
    let inv_det = 1.0 / det;

    // The ray starts at the origin.
    let s = -*v1;
    let u = s.dot(&p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return false;
    }

    let q = s.cross(&edge1);
    let v = ray.dot(&q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return false;
    }

    let t = edge2.dot(&q) * inv_det;
    t > f64::EPSILON
}
