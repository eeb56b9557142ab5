//! Plane-frame transforms for dimension layout
//!
//! All layout math runs in a 2D frame aligned to the dimension's plane
//! normal. `PlaneFrame` carries points world->plane before layout and lifts
//! the results back, preserving the original elevation.

use crate::types::{Vector2, Vector3};
use std::ops::Mul;

/// 3x3 matrix used for frame construction and normal handling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix3 {
    /// Matrix elements stored in row-major order
    pub m: [[f64; 3]; 3],
}

impl Matrix3 {
    /// Create identity matrix
    pub fn identity() -> Self {
        Self {
            m: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        }
    }

    /// Create zero matrix
    pub fn zero() -> Self {
        Self { m: [[0.0; 3]; 3] }
    }

    /// Create arbitrary axis matrix for plane to world conversion
    ///
    /// Implements the AutoCAD arbitrary axis algorithm: columns are the
    /// plane X direction, plane Y direction, and the normal.
    pub fn arbitrary_axis(normal: Vector3) -> Self {
        const ARBITRARY_AXIS_THRESHOLD: f64 = 1.0 / 64.0;

        let normal = normal.normalize();

        let ax = if normal.x.abs() < ARBITRARY_AXIS_THRESHOLD
            && normal.y.abs() < ARBITRARY_AXIS_THRESHOLD
        {
            Vector3::UNIT_Y
        } else {
            Vector3::UNIT_Z
        };

        let x_dir = ax.cross(&normal).normalize();
        let y_dir = normal.cross(&x_dir).normalize();

        Self {
            m: [
                [x_dir.x, y_dir.x, normal.x],
                [x_dir.y, y_dir.y, normal.y],
                [x_dir.z, y_dir.z, normal.z],
            ],
        }
    }

    /// Transpose the matrix
    pub fn transpose(&self) -> Self {
        Self {
            m: [
                [self.m[0][0], self.m[1][0], self.m[2][0]],
                [self.m[0][1], self.m[1][1], self.m[2][1]],
                [self.m[0][2], self.m[1][2], self.m[2][2]],
            ],
        }
    }

    /// Calculate determinant
    pub fn determinant(&self) -> f64 {
        self.m[0][0] * (self.m[1][1] * self.m[2][2] - self.m[1][2] * self.m[2][1])
            - self.m[0][1] * (self.m[1][0] * self.m[2][2] - self.m[1][2] * self.m[2][0])
            + self.m[0][2] * (self.m[1][0] * self.m[2][1] - self.m[1][1] * self.m[2][0])
    }

    /// Transform a Vector3
    pub fn transform_point(&self, v: Vector3) -> Vector3 {
        Vector3::new(
            self.m[0][0] * v.x + self.m[0][1] * v.y + self.m[0][2] * v.z,
            self.m[1][0] * v.x + self.m[1][1] * v.y + self.m[1][2] * v.z,
            self.m[2][0] * v.x + self.m[2][1] * v.y + self.m[2][2] * v.z,
        )
    }
}

impl Mul for Matrix3 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        let mut result = Self::zero();
        for i in 0..3 {
            for j in 0..3 {
                for k in 0..3 {
                    result.m[i][j] += self.m[i][k] * rhs.m[k][j];
                }
            }
        }
        result
    }
}

impl Mul<Vector3> for Matrix3 {
    type Output = Vector3;

    fn mul(self, v: Vector3) -> Self::Output {
        self.transform_point(v)
    }
}

impl Default for Matrix3 {
    fn default() -> Self {
        Self::identity()
    }
}

/// 2D layout frame for a dimension plane
///
/// `to_plane` projects a world point into the frame and zeroes the
/// out-of-plane coordinate; the elevation captured from the first projected
/// point is restored by `to_world`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneFrame {
    /// Plane to world rotation (columns: plane X, plane Y, normal)
    to_world: Matrix3,
    /// World to plane rotation
    to_plane: Matrix3,
    /// Out-of-plane coordinate preserved across the round trip
    pub elevation: f64,
}

impl PlaneFrame {
    /// Build a frame from a plane normal with zero elevation
    pub fn from_normal(normal: Vector3) -> Self {
        let to_world = Matrix3::arbitrary_axis(normal);
        PlaneFrame {
            to_world,
            // Orthonormal, so the inverse is the transpose
            to_plane: to_world.transpose(),
            elevation: 0.0,
        }
    }

    /// Build a frame from a plane normal, capturing the elevation of a
    /// reference world point
    pub fn from_normal_and_point(normal: Vector3, reference: Vector3) -> Self {
        let mut frame = Self::from_normal(normal);
        frame.elevation = frame.to_plane.transform_point(reference).z;
        frame
    }

    /// Project a world point into the plane, dropping the out-of-plane part
    pub fn to_plane(&self, world: Vector3) -> Vector2 {
        self.to_plane.transform_point(world).truncate()
    }

    /// Lift a plane point back to world space at the frame's elevation
    pub fn to_world(&self, plane: Vector2) -> Vector3 {
        self.to_world
            .transform_point(Vector3::new(plane.x, plane.y, self.elevation))
    }

    /// Rotate a plane direction into world space (no elevation)
    pub fn direction_to_world(&self, dir: Vector2) -> Vector3 {
        self.to_world
            .transform_point(Vector3::new(dir.x, dir.y, 0.0))
    }
}

/// Helper for 2D rotation (utility function)
pub fn rotate_point_2d(point: Vector2, center: Vector2, angle: f64) -> Vector2 {
    point.rotate_about(center, angle)
}

/// Helper to check if angle is effectively zero
pub fn is_zero_angle(angle: f64) -> bool {
    angle.abs() < 1e-10
}
