// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use approx::assert_abs_diff_eq;

use super::*;

fn test_matrix() -> Matrix3 {
    // Needs a row swap during decomposition.
    Matrix3([[0.0, 2.0, 1.0], [3.0, -1.0, 0.5], [1.0, 1.0, 4.0]])
}

#[test]
fn test_identity_is_its_own_inverse() {
    let inv = invert_3x3(&Matrix3::IDENTITY).unwrap();
    assert_abs_diff_eq!(inv, Matrix3::IDENTITY);
    assert_abs_diff_eq!(Matrix3::default().determinant(), 1.0);
}

#[test]
fn test_inverse_times_matrix_is_identity() {
    let m = test_matrix();
    let inv = invert_3x3(&m).unwrap();
    assert_abs_diff_eq!(m * inv, Matrix3::IDENTITY, epsilon = 1e-14);
    assert_abs_diff_eq!(inv * m, Matrix3::IDENTITY, epsilon = 1e-14);
}

#[test]
fn test_double_inversion() {
    let m = test_matrix();
    let result = invert_3x3(&invert_3x3(&m).unwrap()).unwrap();
    assert_abs_diff_eq!(result, m, epsilon = 1e-12);
}

#[test]
fn test_determinant() {
    // 0*(-4-0.5) - 2*(12-0.5) + 1*(3+1) = -23 + 4
    assert_abs_diff_eq!(test_matrix().determinant(), -19.0, epsilon = 1e-12);
}

#[test]
fn test_singular_matrices() {
    let zero_row = Matrix3([[1.0, 2.0, 3.0], [0.0, 0.0, 0.0], [4.0, 5.0, 6.0]]);
    assert!(invert_3x3(&zero_row).is_none());
    assert_abs_diff_eq!(zero_row.determinant(), 0.0);

    let zero_column = Matrix3([[1.0, 0.0, 3.0], [2.0, 0.0, 1.0], [4.0, 0.0, 6.0]]);
    assert!(invert_3x3(&zero_column).is_none());

    // Linearly dependent rows.
    let dependent = Matrix3([[1.0, 2.0, 3.0], [2.0, 4.0, 6.0], [0.0, 1.0, 1.0]]);
    assert!(invert_3x3(&dependent).is_none());

    let nan = Matrix3([[f64::NAN, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
    assert!(invert_3x3(&nan).is_none());
}

#[test]
fn test_matrix_vector_multiply() {
    let v = TelescopeDirectionVector::new(1.0, -2.0, 0.5);
    let result = test_matrix() * v;
    assert_abs_diff_eq!(result, TelescopeDirectionVector::new(-3.5, 5.25, 1.0));

    // Columns are what the basis vectors map to.
    let c0 = TelescopeDirectionVector::new(0.0, 1.0, 0.0);
    let c1 = TelescopeDirectionVector::new(-1.0, 0.0, 0.0);
    let c2 = TelescopeDirectionVector::new(0.0, 0.0, 1.0);
    let m = Matrix3::from_columns(c0, c1, c2);
    assert_abs_diff_eq!(m * TelescopeDirectionVector::new(1.0, 0.0, 0.0), c0);
    assert_abs_diff_eq!(m * TelescopeDirectionVector::new(0.0, 1.0, 0.0), c1);
}

#[test]
fn test_lu_solve() {
    let m = test_matrix();
    let b = [1.0, 2.0, 3.0];
    let x = m.lu_decompose().unwrap().solve(b);
    let result = m * TelescopeDirectionVector::from(x);
    assert_abs_diff_eq!(result, TelescopeDirectionVector::from(b), epsilon = 1e-12);
}
