//! Shared layout engine
//!
//! Family-independent pieces of the recompute pipeline: text measurement,
//! text/arrow fit negotiation, arrowhead construction, leaders and tails,
//! text-box splitting and the inspection frame, and the angular ray
//! normalization. Nothing in here depends on a specific dimension family.

use crate::style::DimStyle;
use crate::types::{BoundingBox2D, Vector2};

pub mod angular;
pub mod arrows;
pub mod fit;
pub mod frame;
pub mod leader;

/// Text-extent collaborator
///
/// Extents are measured with the reading direction reset to the plane X
/// axis; rotation never changes the reported box.
pub trait TextMeasurer {
    /// Axis-aligned extents of the rendered text at the given height,
    /// anchored at the origin
    fn extents(&self, content: &str, height: f64) -> BoundingBox2D;
}

/// Deterministic approximate measurer used when no renderer is attached
///
/// Width is glyph count times a fixed aspect ratio; newline-separated lines
/// stack vertically.
#[derive(Debug, Clone, Copy)]
pub struct ApproxTextMeasurer {
    /// Average glyph advance as a fraction of the text height
    pub aspect: f64,
}

impl Default for ApproxTextMeasurer {
    fn default() -> Self {
        ApproxTextMeasurer { aspect: 0.7 }
    }
}

impl TextMeasurer for ApproxTextMeasurer {
    fn extents(&self, content: &str, height: f64) -> BoundingBox2D {
        let mut lines = 0usize;
        let mut widest = 0usize;
        for line in content.split('\n') {
            lines += 1;
            widest = widest.max(line.chars().count());
        }
        let width = widest as f64 * height * self.aspect;
        BoundingBox2D::new(
            Vector2::ZERO,
            Vector2::new(width, height * lines.max(1) as f64),
        )
    }
}

/// Measured text with its chosen position and reading direction
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    /// Display content
    pub content: String,
    /// Center of the text box in plane coordinates
    pub position: Vector2,
    /// Unit reading direction in plane coordinates
    pub direction: Vector2,
    /// Box width along the reading direction
    pub width: f64,
    /// Box height across the reading direction
    pub height: f64,
}

impl TextBlock {
    /// Measure content and build a block at the origin, reading along X
    pub fn measure(
        content: impl Into<String>,
        style: &DimStyle,
        measurer: &dyn TextMeasurer,
    ) -> Self {
        let content = content.into();
        let extents = measurer.extents(&content, style.text_height());
        TextBlock {
            content,
            position: Vector2::ZERO,
            direction: Vector2::UNIT_X,
            width: extents.width(),
            height: extents.height(),
        }
    }

    /// Flip a direction so its text reads left-to-right
    pub fn readable_direction(dir: Vector2) -> Vector2 {
        if dir.x < -1e-9 || (dir.x.abs() <= 1e-9 && dir.y < 0.0) {
            -dir
        } else {
            dir
        }
    }

    /// Corners of the text box expanded by a margin, in plane coordinates
    pub fn corners(&self, margin: f64) -> [Vector2; 4] {
        let along = self.direction * (self.width * 0.5 + margin);
        let across = self.direction.perp() * (self.height * 0.5 + margin);
        [
            self.position - along - across,
            self.position + along - across,
            self.position + along + across,
            self.position - along + across,
        ]
    }
}
