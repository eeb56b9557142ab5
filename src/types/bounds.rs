//! Axis-aligned extents

use crate::types::Vector2;

/// 2D axis-aligned bounding box
///
/// Used for text extents, which are always measured with the text direction
/// reset to the plane X axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox2D {
    /// Minimum corner
    pub min: Vector2,
    /// Maximum corner
    pub max: Vector2,
}

impl BoundingBox2D {
    /// Create a bounding box from two corners
    pub fn new(min: Vector2, max: Vector2) -> Self {
        BoundingBox2D { min, max }
    }

    /// Create a bounding box covering a set of points
    pub fn from_points(points: &[Vector2]) -> Option<Self> {
        let first = points.first()?;
        let mut bbox = BoundingBox2D::new(*first, *first);
        for p in &points[1..] {
            bbox.expand(*p);
        }
        Some(bbox)
    }

    /// Grow the box to include a point
    pub fn expand(&mut self, p: Vector2) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    /// Box width
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Box height
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Box center
    pub fn center(&self) -> Vector2 {
        self.min.midpoint(&self.max)
    }

    /// Check whether a point lies inside (inclusive)
    pub fn contains(&self, p: Vector2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

impl Default for BoundingBox2D {
    fn default() -> Self {
        BoundingBox2D::new(Vector2::ZERO, Vector2::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points() {
        let bbox = BoundingBox2D::from_points(&[
            Vector2::new(1.0, 5.0),
            Vector2::new(-2.0, 3.0),
            Vector2::new(4.0, -1.0),
        ])
        .unwrap();
        assert_eq!(bbox.min, Vector2::new(-2.0, -1.0));
        assert_eq!(bbox.max, Vector2::new(4.0, 5.0));
    }

    #[test]
    fn test_empty_points() {
        assert!(BoundingBox2D::from_points(&[]).is_none());
    }

    #[test]
    fn test_dimensions_and_center() {
        let bbox = BoundingBox2D::new(Vector2::new(0.0, 0.0), Vector2::new(4.0, 2.0));
        assert_eq!(bbox.width(), 4.0);
        assert_eq!(bbox.height(), 2.0);
        assert_eq!(bbox.center(), Vector2::new(2.0, 1.0));
    }

    #[test]
    fn test_contains() {
        let bbox = BoundingBox2D::new(Vector2::ZERO, Vector2::new(1.0, 1.0));
        assert!(bbox.contains(Vector2::new(0.5, 0.5)));
        assert!(!bbox.contains(Vector2::new(1.5, 0.5)));
    }
}
