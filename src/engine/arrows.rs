//! Arrowhead construction
//!
//! Arrowheads are expanded into line, arc and point primitives so the output
//! set stays within the four primitive classes. The tip sits exactly on the
//! dimension line end; `dir` points the way the arrow points.

use crate::primitives::{DimensionGraphics, GraphicsRole, PrimitiveFactory};
use crate::style::ArrowType;
use crate::types::Vector2;

/// Half-width of a closed arrowhead relative to its length
const HEAD_RATIO: f64 = 1.0 / 6.0;

/// Append the primitives of one arrowhead
pub fn build_arrowhead(
    factory: &PrimitiveFactory,
    out: &mut DimensionGraphics,
    tip: Vector2,
    dir: Vector2,
    arrow: ArrowType,
    size: f64,
) {
    let dir = if dir.length_squared() > 0.0 {
        dir.normalize()
    } else {
        Vector2::UNIT_X
    };
    let back = tip - dir * size;
    let half = dir.perp() * (size * HEAD_RATIO);

    match arrow {
        ArrowType::ClosedFilled | ArrowType::ClosedBlank => {
            out.push(factory.dim_line(tip, back + half), GraphicsRole::None);
            out.push(factory.dim_line(tip, back - half), GraphicsRole::None);
            out.push(factory.dim_line(back + half, back - half), GraphicsRole::None);
        }
        ArrowType::Open => {
            out.push(factory.dim_line(tip, back + half), GraphicsRole::None);
            out.push(factory.dim_line(tip, back - half), GraphicsRole::None);
        }
        ArrowType::RightAngle => {
            let wide = dir.perp() * (size * 0.5);
            out.push(factory.dim_line(tip, back + wide), GraphicsRole::None);
            out.push(factory.dim_line(tip, back - wide), GraphicsRole::None);
        }
        ArrowType::Dot | ArrowType::DotBlank => {
            out.push(factory.dim_circle(tip, size * 0.25), GraphicsRole::None);
        }
        ArrowType::DotSmall => {
            out.push(factory.point(tip), GraphicsRole::None);
        }
        ArrowType::Origin => {
            out.push(factory.dim_circle(tip, size * 0.5), GraphicsRole::None);
        }
        ArrowType::Oblique | ArrowType::ArchitecturalTick => {
            // Single stroke at 45 degrees through the tip
            let stroke = (dir + dir.perp()).normalize() * (size * 0.5);
            out.push(
                factory.dim_line(tip - stroke, tip + stroke),
                GraphicsRole::None,
            );
        }
        ArrowType::None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{DimensionDefinition, DimensionKind};
    use crate::style::DimStyle;
    use crate::types::{PlaneFrame, Vector3};

    fn factory() -> PrimitiveFactory {
        let def = DimensionDefinition::new(DimensionKind::Radial {
            center: Vector3::ZERO,
            chord_point: Vector3::UNIT_X,
            leader_length: 0.0,
        });
        PrimitiveFactory::new(
            PlaneFrame::from_normal(Vector3::UNIT_Z),
            &def,
            &DimStyle::standard(),
        )
    }

    #[test]
    fn test_closed_arrow_is_three_lines() {
        let f = factory();
        let mut out = DimensionGraphics::new();
        build_arrowhead(
            &f,
            &mut out,
            Vector2::ZERO,
            Vector2::UNIT_X,
            ArrowType::ClosedFilled,
            2.5,
        );
        assert_eq!(out.lines().count(), 3);
    }

    #[test]
    fn test_tick_is_single_stroke() {
        let f = factory();
        let mut out = DimensionGraphics::new();
        build_arrowhead(
            &f,
            &mut out,
            Vector2::ZERO,
            Vector2::UNIT_X,
            ArrowType::ArchitecturalTick,
            2.5,
        );
        assert_eq!(out.lines().count(), 1);
    }

    #[test]
    fn test_dot_is_circle() {
        let f = factory();
        let mut out = DimensionGraphics::new();
        build_arrowhead(
            &f,
            &mut out,
            Vector2::ZERO,
            Vector2::UNIT_X,
            ArrowType::Dot,
            2.0,
        );
        assert_eq!(out.arcs().count(), 1);
        let arc = out.arcs().next().unwrap();
        assert!((arc.radius - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_none_emits_nothing() {
        let f = factory();
        let mut out = DimensionGraphics::new();
        build_arrowhead(
            &f,
            &mut out,
            Vector2::ZERO,
            Vector2::UNIT_X,
            ArrowType::None,
            2.0,
        );
        assert!(out.is_empty());
    }

    #[test]
    fn test_arrow_tip_on_line_end() {
        let f = factory();
        let mut out = DimensionGraphics::new();
        build_arrowhead(
            &f,
            &mut out,
            Vector2::new(10.0, 5.0),
            Vector2::UNIT_X,
            ArrowType::Open,
            2.5,
        );
        // Both strokes of an open arrow start at the tip
        for line in out.lines() {
            assert!((line.start.x - 10.0).abs() < 1e-10);
            assert!((line.start.y - 5.0).abs() < 1e-10);
        }
    }
}
