//! Fixed-size 3×3 rotation matrix.
//!
//! Stored row-major, matching the layout orientation sensors deliver
//! (`m[row][col]`). Only the handful of operations the attitude pipeline needs
//! are provided: multiply, transpose, determinant and inverse.

use std::ops::Mul;

/// Determinants below this magnitude are treated as singular.
pub const SINGULAR_EPSILON: f64 = 1e-9;

/// A 3×3 matrix of `f64`, row-major.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat3 {
    m: [[f64; 3]; 3],
}

impl Mat3 {
    /// The identity matrix.
    pub const IDENTITY: Self = Self {
        m: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
    };

    /// Create a matrix from rows.
    pub const fn from_rows(rows: [[f64; 3]; 3]) -> Self {
        Self { m: rows }
    }

    /// Create a matrix from a flat row-major array of nine values.
    ///
    /// This is the layout produced by platform rotation-vector conversions.
    pub fn from_row_major(values: [f64; 9]) -> Self {
        Self {
            m: [
                [values[0], values[1], values[2]],
                [values[3], values[4], values[5]],
                [values[6], values[7], values[8]],
            ],
        }
    }

    /// Create a matrix whose columns are the given vectors.
    pub fn from_columns(c0: [f64; 3], c1: [f64; 3], c2: [f64; 3]) -> Self {
        Self {
            m: [
                [c0[0], c1[0], c2[0]],
                [c0[1], c1[1], c2[1]],
                [c0[2], c1[2], c2[2]],
            ],
        }
    }

    /// Build a rotation matrix from a rotation-vector reading.
    ///
    /// `xyz` are the vector components of the unit quaternion (axis × sin(θ/2)).
    /// When the scalar part is not supplied it is reconstructed from the unit
    /// norm, clamped at zero for slightly denormalised readings.
    pub fn from_rotation_vector(xyz: [f64; 3], w: Option<f64>) -> Self {
        let [q1, q2, q3] = xyz;
        let q0 = w.unwrap_or_else(|| (1.0 - q1 * q1 - q2 * q2 - q3 * q3).max(0.0).sqrt());

        let sq_q1 = 2.0 * q1 * q1;
        let sq_q2 = 2.0 * q2 * q2;
        let sq_q3 = 2.0 * q3 * q3;
        let q1_q2 = 2.0 * q1 * q2;
        let q3_q0 = 2.0 * q3 * q0;
        let q1_q3 = 2.0 * q1 * q3;
        let q2_q0 = 2.0 * q2 * q0;
        let q2_q3 = 2.0 * q2 * q3;
        let q1_q0 = 2.0 * q1 * q0;

        Self {
            m: [
                [1.0 - sq_q2 - sq_q3, q1_q2 - q3_q0, q1_q3 + q2_q0],
                [q1_q2 + q3_q0, 1.0 - sq_q1 - sq_q3, q2_q3 - q1_q0],
                [q1_q3 - q2_q0, q2_q3 + q1_q0, 1.0 - sq_q1 - sq_q2],
            ],
        }
    }

    /// Element at `(row, col)`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.m[row][col]
    }

    /// Row `row` as an array.
    #[inline]
    pub fn row(&self, row: usize) -> [f64; 3] {
        self.m[row]
    }

    pub fn transpose(&self) -> Self {
        let m = &self.m;
        Self {
            m: [
                [m[0][0], m[1][0], m[2][0]],
                [m[0][1], m[1][1], m[2][1]],
                [m[0][2], m[1][2], m[2][2]],
            ],
        }
    }

    pub fn determinant(&self) -> f64 {
        let m = &self.m;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// Inverse via the adjugate / determinant formula.
    ///
    /// Returns `None` when the matrix is singular (|det| below
    /// [`SINGULAR_EPSILON`]) or contains non-finite values.
    pub fn inverse(&self) -> Option<Self> {
        let det = self.determinant();
        if !det.is_finite() || det.abs() < SINGULAR_EPSILON {
            return None;
        }

        let m = &self.m;
        let inv_det = 1.0 / det;

        // Cofactors C[i][j]; the inverse is the transposed cofactor matrix / det.
        let c00 = m[1][1] * m[2][2] - m[1][2] * m[2][1];
        let c01 = -(m[1][0] * m[2][2] - m[1][2] * m[2][0]);
        let c02 = m[1][0] * m[2][1] - m[1][1] * m[2][0];
        let c10 = -(m[0][1] * m[2][2] - m[0][2] * m[2][1]);
        let c11 = m[0][0] * m[2][2] - m[0][2] * m[2][0];
        let c12 = -(m[0][0] * m[2][1] - m[0][1] * m[2][0]);
        let c20 = m[0][1] * m[1][2] - m[0][2] * m[1][1];
        let c21 = -(m[0][0] * m[1][2] - m[0][2] * m[1][0]);
        let c22 = m[0][0] * m[1][1] - m[0][1] * m[1][0];

        Some(Self {
            m: [
                [c00 * inv_det, c10 * inv_det, c20 * inv_det],
                [c01 * inv_det, c11 * inv_det, c21 * inv_det],
                [c02 * inv_det, c12 * inv_det, c22 * inv_det],
            ],
        })
    }

    pub fn is_finite(&self) -> bool {
        self.m.iter().flatten().all(|v| v.is_finite())
    }

    /// True if every element is within `tolerance` of `other`.
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        self.m
            .iter()
            .flatten()
            .zip(other.m.iter().flatten())
            .all(|(a, b)| (a - b).abs() <= tolerance)
    }
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Mat3 {
    type Output = Mat3;

    fn mul(self, rhs: Mat3) -> Mat3 {
        let mut out = [[0.0; 3]; 3];
        for (i, row) in out.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = (0..3).map(|k| self.m[i][k] * rhs.m[k][j]).sum();
            }
        }
        Mat3 { m: out }
    }
}
