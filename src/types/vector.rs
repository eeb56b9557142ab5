//! Vector types for geometric operations

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// 2D vector used for all in-plane layout math
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

impl Vector2 {
    /// Create a new 2D vector
    pub const fn new(x: f64, y: f64) -> Self {
        Vector2 { x, y }
    }

    /// Zero vector
    pub const ZERO: Vector2 = Vector2::new(0.0, 0.0);

    /// Unit X vector
    pub const UNIT_X: Vector2 = Vector2::new(1.0, 0.0);

    /// Unit Y vector
    pub const UNIT_Y: Vector2 = Vector2::new(0.0, 1.0);

    /// Unit vector at the given angle from the X axis
    pub fn from_angle(angle: f64) -> Self {
        Vector2::new(angle.cos(), angle.sin())
    }

    /// Calculate the length (magnitude) of the vector
    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Calculate the squared length (avoids sqrt for performance)
    pub fn length_squared(&self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    /// Normalize the vector (make it unit length)
    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0 {
            Vector2::new(self.x / len, self.y / len)
        } else {
            *self
        }
    }

    /// Dot product
    pub fn dot(&self, other: &Vector2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Cross product (returns scalar for 2D)
    pub fn cross(&self, other: &Vector2) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Distance to another point
    pub fn distance(&self, other: &Vector2) -> f64 {
        (*self - *other).length()
    }

    /// Counter-clockwise perpendicular
    pub fn perp(&self) -> Vector2 {
        Vector2::new(-self.y, self.x)
    }

    /// Angle from the X axis in (-pi, pi]
    pub fn angle(&self) -> f64 {
        self.y.atan2(self.x)
    }

    /// Counter-clockwise angle from this vector to `other` in [0, 2*pi)
    pub fn angle_to(&self, other: &Vector2) -> f64 {
        let a = other.angle() - self.angle();
        if a < 0.0 {
            a + std::f64::consts::TAU
        } else {
            a
        }
    }

    /// Rotate counter-clockwise about the origin
    pub fn rotate(&self, angle: f64) -> Vector2 {
        let cos = angle.cos();
        let sin = angle.sin();
        Vector2::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    /// Rotate counter-clockwise about a center point
    pub fn rotate_about(&self, center: Vector2, angle: f64) -> Vector2 {
        center + (*self - center).rotate(angle)
    }

    /// Midpoint between two points
    pub fn midpoint(&self, other: &Vector2) -> Vector2 {
        Vector2::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }

    /// True when both vectors point along the same or opposite direction
    pub fn is_parallel_to(&self, other: &Vector2, tol: f64) -> bool {
        self.cross(other).abs() <= tol
    }
}

impl Default for Vector2 {
    fn default() -> Self {
        Vector2::ZERO
    }
}

impl Add for Vector2 {
    type Output = Vector2;
    fn add(self, other: Vector2) -> Vector2 {
        Vector2::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Vector2 {
    type Output = Vector2;
    fn sub(self, other: Vector2) -> Vector2 {
        Vector2::new(self.x - other.x, self.y - other.y)
    }
}

impl Mul<f64> for Vector2 {
    type Output = Vector2;
    fn mul(self, scalar: f64) -> Vector2 {
        Vector2::new(self.x * scalar, self.y * scalar)
    }
}

impl Div<f64> for Vector2 {
    type Output = Vector2;
    fn div(self, scalar: f64) -> Vector2 {
        Vector2::new(self.x / scalar, self.y / scalar)
    }
}

impl Neg for Vector2 {
    type Output = Vector2;
    fn neg(self) -> Vector2 {
        Vector2::new(-self.x, -self.y)
    }
}

impl fmt::Display for Vector2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// 3D vector used for world-space endpoints and plane normals
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    /// Create a new 3D vector
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Vector3 { x, y, z }
    }

    /// Zero vector
    pub const ZERO: Vector3 = Vector3::new(0.0, 0.0, 0.0);

    /// Unit X vector
    pub const UNIT_X: Vector3 = Vector3::new(1.0, 0.0, 0.0);

    /// Unit Y vector
    pub const UNIT_Y: Vector3 = Vector3::new(0.0, 1.0, 0.0);

    /// Unit Z vector
    pub const UNIT_Z: Vector3 = Vector3::new(0.0, 0.0, 1.0);

    /// Calculate the length (magnitude) of the vector
    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Calculate the squared length (avoids sqrt for performance)
    pub fn length_squared(&self) -> f64 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Normalize the vector (make it unit length)
    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0 {
            Vector3::new(self.x / len, self.y / len, self.z / len)
        } else {
            *self
        }
    }

    /// Dot product
    pub fn dot(&self, other: &Vector3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product
    pub fn cross(&self, other: &Vector3) -> Vector3 {
        Vector3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Distance to another point
    pub fn distance(&self, other: &Vector3) -> f64 {
        (*self - *other).length()
    }

    /// Drop the Z component
    pub fn truncate(&self) -> Vector2 {
        Vector2::new(self.x, self.y)
    }
}

impl Default for Vector3 {
    fn default() -> Self {
        Vector3::ZERO
    }
}

impl Add for Vector3 {
    type Output = Vector3;
    fn add(self, other: Vector3) -> Vector3 {
        Vector3::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl Sub for Vector3 {
    type Output = Vector3;
    fn sub(self, other: Vector3) -> Vector3 {
        Vector3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl Mul<f64> for Vector3 {
    type Output = Vector3;
    fn mul(self, scalar: f64) -> Vector3 {
        Vector3::new(self.x * scalar, self.y * scalar, self.z * scalar)
    }
}

impl Div<f64> for Vector3 {
    type Output = Vector3;
    fn div(self, scalar: f64) -> Vector3 {
        Vector3::new(self.x / scalar, self.y / scalar, self.z / scalar)
    }
}

impl Neg for Vector3 {
    type Output = Vector3;
    fn neg(self) -> Vector3 {
        Vector3::new(-self.x, -self.y, -self.z)
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_vector2_length() {
        let v = Vector2::new(3.0, 4.0);
        assert_eq!(v.length(), 5.0);
        assert_eq!(v.length_squared(), 25.0);
    }

    #[test]
    fn test_vector2_normalize() {
        let v = Vector2::new(3.0, 4.0);
        let n = v.normalize();
        assert!((n.length() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_vector2_perp() {
        let v = Vector2::UNIT_X;
        let p = v.perp();
        assert!((p.x - 0.0).abs() < 1e-10);
        assert!((p.y - 1.0).abs() < 1e-10);
        assert!((v.dot(&p)).abs() < 1e-10);
    }

    #[test]
    fn test_vector2_from_angle() {
        let v = Vector2::from_angle(FRAC_PI_2);
        assert!(v.x.abs() < 1e-10);
        assert!((v.y - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_vector2_angle_to() {
        let a = Vector2::UNIT_X;
        let b = Vector2::UNIT_Y;
        assert!((a.angle_to(&b) - FRAC_PI_2).abs() < 1e-10);
        // Going the other way wraps to 3/2 pi
        assert!((b.angle_to(&a) - 3.0 * FRAC_PI_2).abs() < 1e-10);
    }

    #[test]
    fn test_vector2_rotate_about() {
        let p = Vector2::new(2.0, 0.0);
        let r = p.rotate_about(Vector2::new(1.0, 0.0), PI);
        assert!((r.x - 0.0).abs() < 1e-10);
        assert!(r.y.abs() < 1e-10);
    }

    #[test]
    fn test_vector2_cross_sign() {
        let a = Vector2::UNIT_X;
        let b = Vector2::UNIT_Y;
        assert!(a.cross(&b) > 0.0);
        assert!(b.cross(&a) < 0.0);
    }

    #[test]
    fn test_vector3_cross() {
        let v1 = Vector3::UNIT_X;
        let v2 = Vector3::UNIT_Y;
        assert_eq!(v1.cross(&v2), Vector3::UNIT_Z);
    }

    #[test]
    fn test_vector3_truncate() {
        let v = Vector3::new(1.0, 2.0, 3.0);
        assert_eq!(v.truncate(), Vector2::new(1.0, 2.0));
    }

    #[test]
    fn test_vector3_operations() {
        let v1 = Vector3::new(1.0, 2.0, 3.0);
        let v2 = Vector3::new(4.0, 5.0, 6.0);
        assert_eq!(v1 + v2, Vector3::new(5.0, 7.0, 9.0));
        assert_eq!(-v1, Vector3::new(-1.0, -2.0, -3.0));
    }
}
