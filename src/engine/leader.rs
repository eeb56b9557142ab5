//! Leaders and tail stubs
//!
//! A leader connects detached text back to the geometry it annotates; a
//! tail is the short stub extending a dimension line past an arrow into
//! open space so outside arrows and outside text have something to land on.

use super::TextBlock;
use crate::primitives::{DimensionGraphics, GraphicsRole, PrimitiveFactory};
use crate::types::Vector2;

/// Tail length in arrow sizes
const TAIL_FACTOR: f64 = 2.0;

/// Append a two-segment leader from an attachment point to the near edge of
/// a text block
///
/// The final segment lands horizontally (plane X) so the text hangs off a
/// short hook, matching the leader convention of detached dimension text.
pub fn text_leader(
    factory: &PrimitiveFactory,
    out: &mut DimensionGraphics,
    from: Vector2,
    text: &TextBlock,
    hook_length: f64,
) {
    let toward = text.position - from;
    // Hook approaches from the side of the text nearer the attachment
    let hook_dir = if toward.x >= 0.0 {
        Vector2::UNIT_X
    } else {
        -Vector2::UNIT_X
    };
    let landing = text.position - hook_dir * (text.width * 0.5 + hook_length);
    let hook_start = landing;
    let hook_end = text.position - hook_dir * (text.width * 0.5);
    if from.distance(&hook_start) > 1e-9 {
        out.push(factory.dim_line(from, hook_start), GraphicsRole::None);
    }
    out.push(factory.dim_line(hook_start, hook_end), GraphicsRole::None);
}

/// Append a tail stub from an arrow tip pointing away from the span
pub fn tail_stub(
    factory: &PrimitiveFactory,
    out: &mut DimensionGraphics,
    from: Vector2,
    outward: Vector2,
    arrow_size: f64,
) {
    let dir = if outward.length_squared() > 0.0 {
        outward.normalize()
    } else {
        Vector2::UNIT_X
    };
    out.push(
        factory.dim_line(from, from + dir * (arrow_size * TAIL_FACTOR)),
        GraphicsRole::DimensionLine,
    );
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

    fn text_at(position: Vector2) -> TextBlock {
        TextBlock {
            content: "10".into(),
            position,
            direction: Vector2::UNIT_X,
            width: 4.0,
            height: 2.5,
        }
    }

    #[test]
    fn test_leader_has_two_segments() {
        let f = factory();
        let mut out = DimensionGraphics::new();
        text_leader(
            &f,
            &mut out,
            Vector2::ZERO,
            &text_at(Vector2::new(20.0, 10.0)),
            2.5,
        );
        assert_eq!(out.lines().count(), 2);
    }

    #[test]
    fn test_leader_hook_is_horizontal() {
        let f = factory();
        let mut out = DimensionGraphics::new();
        text_leader(
            &f,
            &mut out,
            Vector2::ZERO,
            &text_at(Vector2::new(20.0, 10.0)),
            2.5,
        );
        let hook = out.lines().last().unwrap();
        assert!((hook.start.y - hook.end.y).abs() < 1e-10);
        // Hook ends at the near text edge
        assert!((hook.end.x - 18.0).abs() < 1e-10);
    }

    #[test]
    fn test_leader_approaches_from_left_of_leftward_text() {
        let f = factory();
        let mut out = DimensionGraphics::new();
        text_leader(
            &f,
            &mut out,
            Vector2::ZERO,
            &text_at(Vector2::new(-20.0, 5.0)),
            2.5,
        );
        let hook = out.lines().last().unwrap();
        assert!(hook.end.x > -20.0);
    }

    #[test]
    fn test_tail_stub_length() {
        let f = factory();
        let mut out = DimensionGraphics::new();
        tail_stub(&f, &mut out, Vector2::ZERO, Vector2::UNIT_X, 2.5);
        let line = out.lines().next().unwrap();
        assert!((line.end.x - 5.0).abs() < 1e-10);
    }
}
