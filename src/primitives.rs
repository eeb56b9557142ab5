//! Generated drawing primitives
//!
//! A recompute call produces an ordered, append-only sequence of primitives.
//! Each primitive may carry a role tag consumed later for hit-testing; the
//! sequence order is part of the contract and is exactly reproducible for
//! unchanged inputs.

use crate::definition::DimensionDefinition;
use crate::style::DimStyle;
use crate::types::{Color, Handle, LineWeight, PlaneFrame, Transparency, Vector2, Vector3};

/// Appearance attributes shared by generated primitives
#[derive(Debug, Clone, PartialEq)]
pub struct Appearance {
    /// Primitive color
    pub color: Color,
    /// Line weight
    pub line_weight: LineWeight,
    /// Linetype reference
    pub linetype: Handle,
    /// Linetype scale
    pub linetype_scale: f64,
    /// Transparency
    pub transparency: Transparency,
    /// Layer name
    pub layer: String,
}

impl Default for Appearance {
    fn default() -> Self {
        Appearance {
            color: Color::ByLayer,
            line_weight: LineWeight::ByLayer,
            linetype: Handle::NULL,
            linetype_scale: 1.0,
            transparency: Transparency::OPAQUE,
            layer: "0".to_string(),
        }
    }
}

/// Generated line segment
#[derive(Debug, Clone, PartialEq)]
pub struct LinePrimitive {
    pub start: Vector3,
    pub end: Vector3,
    pub appearance: Appearance,
}

/// Generated circular arc; a full circle uses a 2*pi sweep
#[derive(Debug, Clone, PartialEq)]
pub struct ArcPrimitive {
    pub center: Vector3,
    pub radius: f64,
    /// Start angle in the dimension plane, radians
    pub start_angle: f64,
    /// End angle in the dimension plane, radians; sweep is counter-clockwise
    pub end_angle: f64,
    pub normal: Vector3,
    pub appearance: Appearance,
}

/// Generated point marker
#[derive(Debug, Clone, PartialEq)]
pub struct PointPrimitive {
    pub location: Vector3,
    pub appearance: Appearance,
}

/// Generated annotation text block
#[derive(Debug, Clone, PartialEq)]
pub struct TextPrimitive {
    /// Display text after formatting and control-code rewrite
    pub content: String,
    /// Center of the text box
    pub position: Vector3,
    /// Reading direction
    pub direction: Vector3,
    /// Text height
    pub height: f64,
    /// Extra rotation applied on top of the direction
    pub rotation: f64,
    pub appearance: Appearance,
}

/// One generated primitive
#[derive(Debug, Clone, PartialEq)]
pub enum DimPrimitive {
    Line(LinePrimitive),
    Arc(ArcPrimitive),
    Point(PointPrimitive),
    Text(TextPrimitive),
}

/// Role tag consumed by hit-testing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GraphicsRole {
    /// No special role
    #[default]
    None,
    /// First extension line
    FirstExtension,
    /// Second extension line
    SecondExtension,
    /// Dimension line or arc
    DimensionLine,
}

/// Ordered, append-only output of a recompute call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DimensionGraphics {
    items: Vec<(DimPrimitive, GraphicsRole)>,
}

impl DimensionGraphics {
    /// Create an empty output set
    pub fn new() -> Self {
        DimensionGraphics { items: Vec::new() }
    }

    /// Append a primitive with a role tag
    pub fn push(&mut self, primitive: DimPrimitive, role: GraphicsRole) {
        self.items.push((primitive, role));
    }

    /// Number of primitives
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate primitives in generation order
    pub fn iter(&self) -> impl Iterator<Item = &(DimPrimitive, GraphicsRole)> {
        self.items.iter()
    }

    /// All line primitives in generation order
    pub fn lines(&self) -> impl Iterator<Item = &LinePrimitive> {
        self.items.iter().filter_map(|(p, _)| match p {
            DimPrimitive::Line(l) => Some(l),
            _ => None,
        })
    }

    /// All arc primitives in generation order
    pub fn arcs(&self) -> impl Iterator<Item = &ArcPrimitive> {
        self.items.iter().filter_map(|(p, _)| match p {
            DimPrimitive::Arc(a) => Some(a),
            _ => None,
        })
    }

    /// All text primitives in generation order
    pub fn texts(&self) -> impl Iterator<Item = &TextPrimitive> {
        self.items.iter().filter_map(|(p, _)| match p {
            DimPrimitive::Text(t) => Some(t),
            _ => None,
        })
    }

    /// Primitives carrying a given role
    pub fn with_role(&self, role: GraphicsRole) -> impl Iterator<Item = &DimPrimitive> {
        self.items
            .iter()
            .filter(move |(_, r)| *r == role)
            .map(|(p, _)| p)
    }
}

/// Per-call primitive factory
///
/// Resolves the appearance of every primitive class once from the style and
/// the definition, then stamps primitives in plane coordinates and lifts
/// them to world space through the call's plane frame.
#[derive(Debug, Clone)]
pub struct PrimitiveFactory {
    frame: PlaneFrame,
    normal: Vector3,
    dim_line: Appearance,
    ext_line1: Appearance,
    ext_line2: Appearance,
    text: Appearance,
    text_height: f64,
}

impl PrimitiveFactory {
    /// Resolve appearances from the style snapshot and the definition
    pub fn new(frame: PlaneFrame, def: &DimensionDefinition, style: &DimStyle) -> Self {
        let base = Appearance {
            color: def.color,
            line_weight: LineWeight::ByLayer,
            linetype: Handle::NULL,
            linetype_scale: def.linetype_scale,
            transparency: def.transparency,
            layer: def.layer.clone(),
        };
        Self::from_parts(frame, def.normal, base, style)
    }

    /// Resolve appearances from an entity-level base appearance
    pub fn from_parts(
        frame: PlaneFrame,
        normal: Vector3,
        base: Appearance,
        style: &DimStyle,
    ) -> Self {
        let resolve = |style_color: Color, weight: LineWeight, linetype: Handle| {
            let mut a = base.clone();
            if style_color != Color::ByBlock {
                a.color = style_color;
            }
            a.line_weight = weight;
            a.linetype = linetype;
            a
        };
        PrimitiveFactory {
            normal,
            dim_line: resolve(style.dimclrd, style.dimlwd, style.dimltype),
            ext_line1: resolve(style.dimclre, style.dimlwe, style.dimltex1),
            ext_line2: resolve(style.dimclre, style.dimlwe, style.dimltex2),
            text: resolve(style.dimclrt, LineWeight::ByLayer, Handle::NULL),
            text_height: style.text_height(),
            frame,
        }
    }

    /// The call's plane frame
    pub fn frame(&self) -> &PlaneFrame {
        &self.frame
    }

    /// Line stamped with the dimension-line appearance
    pub fn dim_line(&self, start: Vector2, end: Vector2) -> DimPrimitive {
        self.line_with(start, end, self.dim_line.clone())
    }

    /// Line stamped with the first extension-line appearance
    pub fn ext_line1(&self, start: Vector2, end: Vector2) -> DimPrimitive {
        self.line_with(start, end, self.ext_line1.clone())
    }

    /// Line stamped with the second extension-line appearance
    pub fn ext_line2(&self, start: Vector2, end: Vector2) -> DimPrimitive {
        self.line_with(start, end, self.ext_line2.clone())
    }

    fn line_with(&self, start: Vector2, end: Vector2, appearance: Appearance) -> DimPrimitive {
        DimPrimitive::Line(LinePrimitive {
            start: self.frame.to_world(start),
            end: self.frame.to_world(end),
            appearance,
        })
    }

    /// Arc stamped with the dimension-line appearance
    pub fn dim_arc(
        &self,
        center: Vector2,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
    ) -> DimPrimitive {
        DimPrimitive::Arc(ArcPrimitive {
            center: self.frame.to_world(center),
            radius,
            start_angle,
            end_angle,
            normal: self.normal,
            appearance: self.dim_line.clone(),
        })
    }

    /// Full circle stamped with the dimension-line appearance
    pub fn dim_circle(&self, center: Vector2, radius: f64) -> DimPrimitive {
        self.dim_arc(center, radius, 0.0, std::f64::consts::TAU)
    }

    /// Point marker stamped with the dimension-line appearance
    pub fn point(&self, location: Vector2) -> DimPrimitive {
        DimPrimitive::Point(PointPrimitive {
            location: self.frame.to_world(location),
            appearance: self.dim_line.clone(),
        })
    }

    /// Text block at a plane position with a plane reading direction
    pub fn text(&self, content: String, position: Vector2, direction: Vector2) -> DimPrimitive {
        DimPrimitive::Text(TextPrimitive {
            content,
            position: self.frame.to_world(position),
            direction: self.frame.direction_to_world(direction),
            height: self.text_height,
            rotation: 0.0,
            appearance: self.text.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{DimensionDefinition, DimensionKind};

    fn test_factory() -> PrimitiveFactory {
        let def = DimensionDefinition::new(DimensionKind::Aligned {
            first: Vector3::ZERO,
            second: Vector3::UNIT_X,
            line_point: Vector3::UNIT_Y,
            oblique: 0.0,
        });
        let style = DimStyle::standard();
        let frame = PlaneFrame::from_normal(Vector3::UNIT_Z);
        PrimitiveFactory::new(frame, &def, &style)
    }

    #[test]
    fn test_output_order_preserved() {
        let factory = test_factory();
        let mut out = DimensionGraphics::new();
        out.push(
            factory.dim_line(Vector2::ZERO, Vector2::UNIT_X),
            GraphicsRole::DimensionLine,
        );
        out.push(
            factory.ext_line1(Vector2::ZERO, Vector2::UNIT_Y),
            GraphicsRole::FirstExtension,
        );
        assert_eq!(out.len(), 2);
        let roles: Vec<_> = out.iter().map(|(_, r)| *r).collect();
        assert_eq!(
            roles,
            vec![GraphicsRole::DimensionLine, GraphicsRole::FirstExtension]
        );
    }

    #[test]
    fn test_factory_lifts_to_world() {
        let factory = test_factory();
        let line = factory.dim_line(Vector2::new(1.0, 2.0), Vector2::new(3.0, 4.0));
        match line {
            DimPrimitive::Line(l) => {
                assert_eq!(l.start, Vector3::new(1.0, 2.0, 0.0));
                assert_eq!(l.end, Vector3::new(3.0, 4.0, 0.0));
            }
            _ => panic!("expected line"),
        }
    }

    #[test]
    fn test_role_filter() {
        let factory = test_factory();
        let mut out = DimensionGraphics::new();
        out.push(
            factory.dim_line(Vector2::ZERO, Vector2::UNIT_X),
            GraphicsRole::DimensionLine,
        );
        out.push(factory.point(Vector2::ZERO), GraphicsRole::None);
        assert_eq!(out.with_role(GraphicsRole::DimensionLine).count(), 1);
        assert_eq!(out.lines().count(), 1);
    }
}
