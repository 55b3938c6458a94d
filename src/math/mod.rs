// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! 3x3 linear algebra for transform matrices.

#[cfg(test)]
mod tests;

use std::ops::Mul;

use crate::{constants::SINGULAR_PIVOT_TOLERANCE, direction::TelescopeDirectionVector};

/// A 3x3 matrix, stored row major.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Matrix3(pub [[f64; 3]; 3]);

impl Default for Matrix3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix3 {
    pub const IDENTITY: Matrix3 = Matrix3([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);

    /// Make a matrix whose columns are the supplied vectors.
    pub fn from_columns(
        c0: TelescopeDirectionVector,
        c1: TelescopeDirectionVector,
        c2: TelescopeDirectionVector,
    ) -> Self {
        Self([[c0.x, c1.x, c2.x], [c0.y, c1.y, c2.y], [c0.z, c1.z, c2.z]])
    }

    /// LU decompose this matrix with partial pivoting. `None` is returned if
    /// the matrix is singular.
    pub fn lu_decompose(&self) -> Option<LuDecomposition> {
        let mut lu = self.0;
        let mut permutation = [0, 1, 2];
        let mut sign = 1.0;

        for k in 0..3 {
            // Pick the row with the largest magnitude in this column.
            let mut pivot_row = k;
            for i in k + 1..3 {
                if lu[i][k].abs() > lu[pivot_row][k].abs() {
                    pivot_row = i;
                }
            }
            let pivot = lu[pivot_row][k].abs();
            if pivot.is_nan() || pivot < SINGULAR_PIVOT_TOLERANCE {
                return None;
            }
            if pivot_row != k {
                lu.swap(pivot_row, k);
                permutation.swap(pivot_row, k);
                sign = -sign;
            }

            for i in k + 1..3 {
                let factor = lu[i][k] / lu[k][k];
                lu[i][k] = factor;
                for j in k + 1..3 {
                    lu[i][j] -= factor * lu[k][j];
                }
            }
        }

        Some(LuDecomposition {
            lu,
            permutation,
            sign,
        })
    }

    /// The determinant, or 0 if the matrix is singular.
    pub fn determinant(&self) -> f64 {
        self.lu_decompose().map(|lu| lu.determinant()).unwrap_or(0.0)
    }

    /// The inverse of this matrix, or `None` if it is singular.
    pub fn invert(&self) -> Option<Matrix3> {
        self.lu_decompose().map(|lu| lu.inverse())
    }
}

/// The packed result of [`Matrix3::lu_decompose`]: `P·A = L·U`, with the unit
/// diagonal of `L` implied.
#[derive(Clone, Copy, Debug)]
pub struct LuDecomposition {
    lu: [[f64; 3]; 3],
    /// Row `i` of `P·A` is row `permutation[i]` of `A`.
    permutation: [usize; 3],
    sign: f64,
}

impl LuDecomposition {
    pub fn determinant(&self) -> f64 {
        self.sign * self.lu[0][0] * self.lu[1][1] * self.lu[2][2]
    }

    /// Solve `A·x = b`.
    pub fn solve(&self, b: [f64; 3]) -> [f64; 3] {
        let lu = &self.lu;
        // Forward substitution with the permuted right-hand side.
        let mut y = [0.0; 3];
        for i in 0..3 {
            let mut sum = b[self.permutation[i]];
            for j in 0..i {
                sum -= lu[i][j] * y[j];
            }
            y[i] = sum;
        }
        // Back substitution.
        let mut x = [0.0; 3];
        for i in (0..3).rev() {
            let mut sum = y[i];
            for j in i + 1..3 {
                sum -= lu[i][j] * x[j];
            }
            x[i] = sum / lu[i][i];
        }
        x
    }

    pub fn inverse(&self) -> Matrix3 {
        let mut inv = [[0.0; 3]; 3];
        for j in 0..3 {
            let mut e = [0.0; 3];
            e[j] = 1.0;
            let column = self.solve(e);
            for (i, value) in column.into_iter().enumerate() {
                inv[i][j] = value;
            }
        }
        Matrix3(inv)
    }
}

/// Invert a 3x3 matrix. `None` is returned if the matrix is singular; callers
/// decide what to fall back to.
pub fn invert_3x3(m: &Matrix3) -> Option<Matrix3> {
    m.invert()
}

/// `A·B`.
pub fn matrix_matrix_multiply(a: &Matrix3, b: &Matrix3) -> Matrix3 {
    let mut c = [[0.0; 3]; 3];
    for (i, row) in c.iter_mut().enumerate() {
        for (j, value) in row.iter_mut().enumerate() {
            *value = (0..3).map(|k| a.0[i][k] * b.0[k][j]).sum();
        }
    }
    Matrix3(c)
}

/// `A·v`.
pub fn matrix_vector_multiply(
    a: &Matrix3,
    v: &TelescopeDirectionVector,
) -> TelescopeDirectionVector {
    let m = &a.0;
    TelescopeDirectionVector::new(
        m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z,
        m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z,
        m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z,
    )
}

impl Mul for Matrix3 {
    type Output = Matrix3;

    fn mul(self, rhs: Matrix3) -> Matrix3 {
        matrix_matrix_multiply(&self, &rhs)
    }
}

impl Mul<TelescopeDirectionVector> for Matrix3 {
    type Output = TelescopeDirectionVector;

    fn mul(self, rhs: TelescopeDirectionVector) -> TelescopeDirectionVector {
        matrix_vector_multiply(&self, &rhs)
    }
}

impl approx::AbsDiffEq for Matrix3 {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.0
            .iter()
            .flatten()
            .zip(other.0.iter().flatten())
            .all(|(a, b)| f64::abs_diff_eq(a, b, epsilon))
    }
}
