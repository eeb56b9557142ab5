//! Angular family: two-line, three-point and arc-length dimensions
//!
//! All three reduce to a center, two bounding rays and an arc point. After
//! ray normalization the dimension arc spans the wedge containing the arc
//! point; extension lines connect the measured points to the arc, and the
//! arc splits around centered text, grows tail stubs past outside arrows,
//! and gains an extension arc when the text is dragged outside the span.

use super::{measure_annotation, CommonParams, Recompute};
use crate::definition::{ContextId, DimensionDefinition, DimensionKind, Measurement};
use crate::engine::angular::{normalize_rays, NormalizedRays};
use crate::engine::arrows::build_arrowhead;
use crate::engine::fit::{negotiate, FitInput};
use crate::engine::frame::inspection_frame;
use crate::engine::leader::text_leader;
use crate::engine::{TextBlock, TextMeasurer};
use crate::error::{DimError, Result};
use crate::format;
use crate::geom::{ccw_sweep, GEOM_TOL};
use crate::primitives::{DimensionGraphics, GraphicsRole, PrimitiveFactory};
use crate::style::{ArcSymbol, DimStyle, TextMovePolicy, TextVertical};
use crate::types::{PlaneFrame, Vector2, Vector3};

/// Arc symbol prefixed to arc-length measurements
const ARC_SIGN: &str = "\u{2312}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum AngularVariant {
    #[default]
    TwoLine,
    ThreePoint,
    ArcLength,
}

/// Recomputor for the angular dimension kinds
#[derive(Debug, Clone, Default)]
pub struct AngularRecomputor {
    common: CommonParams,
    variant: AngularVariant,
    line1: (Vector3, Vector3),
    line2: (Vector3, Vector3),
    vertex: Vector3,
    first: Vector3,
    second: Vector3,
    arc_point: Vector3,
    measurement: Option<Measurement>,
    corrected_arc_point: Option<Vector3>,
}

impl Recompute for AngularRecomputor {
    fn load_params(&mut self, def: &DimensionDefinition, ctx: Option<ContextId>) -> Result<()> {
        self.common = CommonParams::load(def, ctx)?;
        match CommonParams::kind_for(def, ctx) {
            DimensionKind::TwoLineAngular {
                line1,
                line2,
                arc_point,
            } => {
                self.variant = AngularVariant::TwoLine;
                self.line1 = *line1;
                self.line2 = *line2;
                self.arc_point = *arc_point;
            }
            DimensionKind::ThreePointAngular {
                vertex,
                first,
                second,
                arc_point,
            } => {
                self.variant = AngularVariant::ThreePoint;
                self.vertex = *vertex;
                self.first = *first;
                self.second = *second;
                self.arc_point = *arc_point;
            }
            DimensionKind::ArcLength {
                center,
                first,
                second,
                arc_point,
            } => {
                self.variant = AngularVariant::ArcLength;
                self.vertex = *center;
                self.first = *first;
                self.second = *second;
                self.arc_point = *arc_point;
            }
            other => {
                return Err(DimError::KindMismatch {
                    expected: "angular",
                    actual: other.name(),
                })
            }
        }
        self.measurement = None;
        self.corrected_arc_point = None;
        Ok(())
    }

    fn preprocess_points(&mut self, _style: &DimStyle) {}

    fn update_measurement(&mut self, style: &DimStyle) -> Measurement {
        let frame = PlaneFrame::from_normal(self.common.normal);
        let geometry = self.plane_geometry(&frame);
        let span = geometry.rays.span();
        let measurement = match self.variant {
            AngularVariant::TwoLine | AngularVariant::ThreePoint => Measurement::Angle(span),
            AngularVariant::ArcLength => {
                let r = geometry.measured1.distance(&geometry.center);
                Measurement::Length(r * span * style.dimlfac * self.common.measurement_scale)
            }
        };
        self.measurement = Some(measurement);
        measurement
    }

    fn format_measurement(&self, style: &DimStyle) -> String {
        match self.measurement {
            Some(Measurement::Angle(a)) => {
                format::compose_angular(a, style, self.common.text_override.as_deref())
            }
            Some(Measurement::Length(v)) => {
                let prefix = match style.dimarcsym {
                    ArcSymbol::Preceding | ArcSymbol::Above => Some(ARC_SIGN),
                    ArcSymbol::None => None,
                };
                format::compose_linear(v, style, self.common.text_override.as_deref(), prefix)
            }
            None => String::new(),
        }
    }

    fn build_graphics(
        &mut self,
        style: &mut DimStyle,
        measurer: &dyn TextMeasurer,
    ) -> DimensionGraphics {
        let frame = PlaneFrame::from_normal_and_point(self.common.normal, self.arc_point);
        let factory = self.common.factory(frame, style);
        let mut out = DimensionGraphics::new();

        let geometry = self.plane_geometry(&frame);
        let PlaneGeometry {
            center,
            rays,
            measured1,
            measured2,
        } = geometry;
        let span = rays.span();
        let start_angle = rays.dir1.angle();
        let end_angle = start_angle + span;

        // Arc radius: the arc point by default; a user-dragged text position
        // takes over when the dimension line follows the text.
        let user_pos = self.common.user_text_position.map(|q| frame.to_plane(q));
        let home_radius = frame.to_plane(self.arc_point).distance(&center);
        let mut radius = home_radius;
        if let Some(up) = user_pos {
            if style.dimtmove == TextMovePolicy::MoveLine {
                radius = up.distance(&center);
                self.corrected_arc_point =
                    Some(frame.to_world(center + rays.arc_dir * radius));
            }
        }
        if radius < GEOM_TOL {
            // Canonical fallback keeps the arc renderable
            radius = measured1.distance(&center).max(1.0);
        }

        if self.measurement.is_none() {
            self.update_measurement(style);
        }
        let content = self.format_measurement(style);
        let (mut text, inspection) = measure_annotation(content, &self.common, style, measurer);
        let gap = style.text_gap();
        let asz = style.arrow_size();

        let arc_span_length = radius * span;
        let mid_angle = start_angle + span * 0.5;
        let user_angle = user_pos.map(|q| (q - center).angle());
        let user_inside = user_angle
            .map(|a| ccw_sweep(start_angle, a) <= span)
            .unwrap_or(false);
        let fit = negotiate(&FitInput {
            span: arc_span_length,
            text_width: text.width,
            arrow_size: asz,
            gap,
            policy: style.dimatfit,
            force_text_inside: style.dimtix,
            suppress_outside_arrows: style.dimsoxd,
            force_inner_line: style.dimtofl,
            user_positioned: user_pos.is_some(),
            user_inside,
            text_move: style.dimtmove,
        });

        // Text placement along the arc
        let text_angle = match (user_pos, fit.text_inside) {
            (Some(up), _) => {
                text.position = up;
                (up - center).angle()
            }
            (None, true) => {
                let radial = Vector2::from_angle(mid_angle);
                let offset = match style.dimtad {
                    TextVertical::Centered => 0.0,
                    _ => gap + text.height * 0.5,
                };
                text.position = center + radial * (radius + offset);
                mid_angle
            }
            (None, false) => {
                let past = end_angle + (2.0 * asz + gap + text.width * 0.5) / radius;
                text.position = center + Vector2::from_angle(past) * radius;
                past
            }
        };
        text.direction =
            TextBlock::readable_direction(Vector2::from_angle(text_angle).perp());

        // Extension lines from the measured points to the arc
        let (ma, mb) = if rays.swapped() {
            (measured2, measured1)
        } else {
            (measured1, measured2)
        };
        let (role_a, role_b) = if rays.swapped() {
            (GraphicsRole::SecondExtension, GraphicsRole::FirstExtension)
        } else {
            (GraphicsRole::FirstExtension, GraphicsRole::SecondExtension)
        };
        if !style.dimse1 && role_a == GraphicsRole::FirstExtension
            || !style.dimse2 && role_a == GraphicsRole::SecondExtension
        {
            push_radial_extension(&factory, &mut out, center, rays.dir1, ma, radius, style, role_a);
        }
        if !style.dimse1 && role_b == GraphicsRole::FirstExtension
            || !style.dimse2 && role_b == GraphicsRole::SecondExtension
        {
            push_radial_extension(&factory, &mut out, center, rays.dir2, mb, radius, style, role_b);
        }

        // Dimension arc, split around text that sits on it
        let splits_arc = (text.position.distance(&center) - radius).abs()
            < text.height * 0.5 + gap - GEOM_TOL
            && ccw_sweep(start_angle, text_angle) <= span;
        let mut arcs: Vec<(f64, f64)> = Vec::new();
        if fit.draw_inner_line {
            if splits_arc {
                let half = (text.width * 0.5 + gap) / radius;
                if ccw_sweep(start_angle, text_angle) > half {
                    arcs.push((start_angle, text_angle - half));
                }
                if ccw_sweep(text_angle + half, end_angle) < span {
                    arcs.push((text_angle + half, end_angle));
                }
            } else {
                arcs.push((start_angle, end_angle));
            }
        }
        for (s, e) in &arcs {
            if ccw_sweep(*s, *e) > GEOM_TOL {
                out.push(factory.dim_arc(center, radius, *s, *e), GraphicsRole::DimensionLine);
            }
        }

        // Extension arc under text dragged past the span
        if let Some(ua) = user_angle {
            if ccw_sweep(start_angle, ua) > span {
                let from_end = ccw_sweep(end_angle, ua);
                let from_start = ccw_sweep(ua, start_angle);
                if from_end <= from_start {
                    out.push(
                        factory.dim_arc(center, radius, end_angle, end_angle + from_end),
                        GraphicsRole::DimensionLine,
                    );
                } else {
                    out.push(
                        factory.dim_arc(center, radius, ua, ua + from_start),
                        GraphicsRole::DimensionLine,
                    );
                }
            }
        }

        // Arrows at the arc ends, tangent to it
        let tip1 = center + Vector2::from_angle(start_angle) * radius;
        let tip2 = center + Vector2::from_angle(end_angle) * radius;
        let tangent1 = Vector2::from_angle(start_angle).perp();
        let tangent2 = Vector2::from_angle(end_angle).perp();
        let out1 = !fit.arrows_inside ^ self.common.flip_arrow1;
        let out2 = !fit.arrows_inside ^ self.common.flip_arrow2;
        if fit.arrows_drawn {
            let pointing1 = if out1 { tangent1 } else { -tangent1 };
            let pointing2 = if out2 { -tangent2 } else { tangent2 };
            build_arrowhead(&factory, &mut out, tip1, pointing1, style.first_arrow(), asz);
            build_arrowhead(&factory, &mut out, tip2, pointing2, style.second_arrow(), asz);
            // Tail arcs past outside arrows, capped for small radii
            let tail = ((2.0 * asz) / radius).min(std::f64::consts::FRAC_PI_2);
            if out1 {
                out.push(
                    factory.dim_arc(center, radius, start_angle - tail, start_angle),
                    GraphicsRole::DimensionLine,
                );
            }
            if out2 {
                out.push(
                    factory.dim_arc(center, radius, end_angle, end_angle + tail),
                    GraphicsRole::DimensionLine,
                );
            }
        }

        if fit.needs_leader {
            let from = if ccw_sweep(end_angle, text_angle) <= ccw_sweep(text_angle, start_angle) {
                tip2
            } else {
                tip1
            };
            text_leader(&factory, &mut out, from, &text, asz);
        }

        out.push(
            factory.text(text.content.clone(), text.position, text.direction),
            GraphicsRole::None,
        );
        if let Some(layout) = inspection {
            inspection_frame(&factory, &mut out, &text, gap, &layout.separators);
        }
        out
    }

    fn store_params(&self, def: &mut DimensionDefinition, ctx: Option<ContextId>) -> Result<()> {
        let Some(corrected) = self.corrected_arc_point else {
            return Ok(());
        };
        let kind = match ctx {
            Some(c) => {
                &mut def
                    .override_for_mut(c)
                    .ok_or(DimError::UnknownContext(c.0))?
                    .kind
            }
            None => &mut def.kind,
        };
        match kind {
            DimensionKind::TwoLineAngular { arc_point, .. }
            | DimensionKind::ThreePointAngular { arc_point, .. }
            | DimensionKind::ArcLength { arc_point, .. } => {
                *arc_point = corrected;
                Ok(())
            }
            other => Err(DimError::KindMismatch {
                expected: "angular",
                actual: other.name(),
            }),
        }
    }
}

/// Plane-space inputs shared by measurement and layout
struct PlaneGeometry {
    center: Vector2,
    rays: NormalizedRays,
    measured1: Vector2,
    measured2: Vector2,
}

impl AngularRecomputor {
    fn plane_geometry(&self, frame: &PlaneFrame) -> PlaneGeometry {
        let (center, ray1, ray2, measured1, measured2) = match self.variant {
            AngularVariant::TwoLine => {
                let a0 = frame.to_plane(self.line1.0);
                let a1 = frame.to_plane(self.line1.1);
                let b0 = frame.to_plane(self.line2.0);
                let b1 = frame.to_plane(self.line2.1);
                let center = crate::geom::line_line_intersection(a0, a1 - a0, b0, b1 - b0)
                    .unwrap_or_else(|| a0.midpoint(&b0));
                (center, a1 - a0, b1 - b0, a1, b1)
            }
            AngularVariant::ThreePoint | AngularVariant::ArcLength => {
                let v = frame.to_plane(self.vertex);
                let p1 = frame.to_plane(self.first);
                let p2 = frame.to_plane(self.second);
                (v, p1 - v, p2 - v, p1, p2)
            }
        };
        let arc_vec = frame.to_plane(self.arc_point) - center;
        PlaneGeometry {
            center,
            rays: normalize_rays(ray1, ray2, arc_vec),
            measured1,
            measured2,
        }
    }
}

/// Extension line from a measured point to the dimension arc along its ray
///
/// A measured point already sitting on the arc needs no extra segment; the
/// nearer candidate point stands in directly.
#[allow(clippy::too_many_arguments)]
fn push_radial_extension(
    factory: &PrimitiveFactory,
    out: &mut DimensionGraphics,
    center: Vector2,
    ray: Vector2,
    measured: Vector2,
    radius: f64,
    style: &DimStyle,
    role: GraphicsRole,
) {
    let d = measured.distance(&center);
    let exo = style.ext_offset();
    let exe = style.ext_extension();
    if (d - radius).abs() <= exo + GEOM_TOL {
        return;
    }
    let (t0, t1) = if d < radius {
        (d + exo, radius + exe)
    } else {
        (d - exo, radius - exe)
    };
    if (t1 - t0).abs() < GEOM_TOL || (d < radius) != (t1 > t0) {
        return;
    }
    let primitive = match role {
        GraphicsRole::FirstExtension => factory.ext_line1(center + ray * t0, center + ray * t1),
        _ => factory.ext_line2(center + ray * t0, center + ray * t1),
    };
    out.push(primitive, role);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ApproxTextMeasurer;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    fn three_point_def(angle: f64) -> DimensionDefinition {
        let arc_mid = Vector2::from_angle(angle * 0.5) * 15.0;
        DimensionDefinition::new(DimensionKind::ThreePointAngular {
            vertex: Vector3::ZERO,
            first: Vector3::new(20.0, 0.0, 0.0),
            second: Vector3::new(
                20.0 * angle.cos(),
                20.0 * angle.sin(),
                0.0,
            ),
            arc_point: Vector3::new(arc_mid.x, arc_mid.y, 0.0),
        })
    }

    fn build(def: &DimensionDefinition, style: &mut DimStyle) -> DimensionGraphics {
        let mut r = AngularRecomputor::default();
        r.load_params(def, None).unwrap();
        r.preprocess_points(style);
        r.update_measurement(style);
        r.build_graphics(style, &ApproxTextMeasurer::default())
    }

    #[test]
    fn test_three_point_measurement() {
        let mut def = three_point_def(FRAC_PI_2);
        let style = DimStyle::standard();
        let m = super::super::update_measurement(&mut def, &style).unwrap();
        assert!(matches!(m, Measurement::Angle(a) if (a - FRAC_PI_2).abs() < 1e-9));
    }

    #[test]
    fn test_two_line_measurement() {
        let mut def = DimensionDefinition::new(DimensionKind::TwoLineAngular {
            line1: (Vector3::ZERO, Vector3::new(20.0, 0.0, 0.0)),
            line2: (Vector3::ZERO, Vector3::new(0.0, 20.0, 0.0)),
            arc_point: Vector3::new(10.0, 10.0, 0.0),
        });
        let style = DimStyle::standard();
        let m = super::super::update_measurement(&mut def, &style).unwrap();
        assert!(matches!(m, Measurement::Angle(a) if (a - FRAC_PI_2).abs() < 1e-9));
    }

    #[test]
    fn test_arc_length_measurement() {
        let mut def = DimensionDefinition::new(DimensionKind::ArcLength {
            center: Vector3::ZERO,
            first: Vector3::new(10.0, 0.0, 0.0),
            second: Vector3::new(0.0, 10.0, 0.0),
            arc_point: Vector3::new(
                10.0 * FRAC_PI_4.cos(),
                10.0 * FRAC_PI_4.sin(),
                0.0,
            ),
        });
        let style = DimStyle::standard();
        let m = super::super::update_measurement(&mut def, &style).unwrap();
        let expected = 10.0 * FRAC_PI_2;
        assert!(matches!(m, Measurement::Length(v) if (v - expected).abs() < 1e-9));
    }

    #[test]
    fn test_dimension_arc_at_arc_point_radius() {
        let def = three_point_def(FRAC_PI_2);
        let mut style = DimStyle::standard();
        let out = build(&def, &mut style);
        let arc = out
            .with_role(GraphicsRole::DimensionLine)
            .find_map(|p| match p {
                crate::primitives::DimPrimitive::Arc(a) => Some(a),
                _ => None,
            })
            .expect("dimension arc present");
        assert!((arc.radius - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_reflex_rays_still_bounded() {
        // Rays listed so the forward angle is reflex; the drawn span stays
        // at or below a half turn
        let def = DimensionDefinition::new(DimensionKind::ThreePointAngular {
            vertex: Vector3::ZERO,
            first: Vector3::new(0.0, 20.0, 0.0),
            second: Vector3::new(20.0, 0.0, 0.0),
            arc_point: Vector3::new(10.0, 10.0, 0.0),
        });
        let mut style = DimStyle::standard();
        let out = build(&def, &mut style);
        for arc in out.arcs() {
            assert!(ccw_sweep(arc.start_angle, arc.end_angle) <= PI + 1e-9);
        }
    }

    #[test]
    fn test_extension_lines_reach_arc() {
        // Measured points at radius 20, arc at 15: extension lines run
        // inward and overshoot past the arc
        let def = three_point_def(FRAC_PI_2);
        let mut style = DimStyle::standard();
        let out = build(&def, &mut style);
        let ext: Vec<_> = out
            .with_role(GraphicsRole::FirstExtension)
            .chain(out.with_role(GraphicsRole::SecondExtension))
            .filter_map(|p| match p {
                crate::primitives::DimPrimitive::Line(l) => Some(l),
                _ => None,
            })
            .collect();
        assert_eq!(ext.len(), 2);
        for l in &ext {
            let d0 = l.start.truncate().length();
            let d1 = l.end.truncate().length();
            assert!((d0 - (20.0 - 0.625)).abs() < 1e-9);
            assert!((d1 - (15.0 - 1.25)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_measured_point_on_arc_needs_no_extension() {
        let def = DimensionDefinition::new(DimensionKind::ThreePointAngular {
            vertex: Vector3::ZERO,
            first: Vector3::new(15.0, 0.0, 0.0),
            second: Vector3::new(0.0, 15.0, 0.0),
            arc_point: Vector3::new(
                15.0 * FRAC_PI_4.cos(),
                15.0 * FRAC_PI_4.sin(),
                0.0,
            ),
        });
        let mut style = DimStyle::standard();
        let out = build(&def, &mut style);
        assert_eq!(out.with_role(GraphicsRole::FirstExtension).count(), 0);
        assert_eq!(out.with_role(GraphicsRole::SecondExtension).count(), 0);
    }

    #[test]
    fn test_centered_text_splits_arc() {
        let def = three_point_def(FRAC_PI_2);
        let mut style = DimStyle::standard();
        style.dimtad = TextVertical::Centered;
        let out = build(&def, &mut style);
        let dim_arcs = out
            .with_role(GraphicsRole::DimensionLine)
            .filter(|p| matches!(p, crate::primitives::DimPrimitive::Arc(_)))
            .count();
        assert_eq!(dim_arcs, 2);
    }

    #[test]
    fn test_degenerate_vertex_total() {
        let def = DimensionDefinition::new(DimensionKind::ThreePointAngular {
            vertex: Vector3::ZERO,
            first: Vector3::ZERO,
            second: Vector3::ZERO,
            arc_point: Vector3::ZERO,
        });
        let mut style = DimStyle::standard();
        let out = build(&def, &mut style);
        assert!(out.texts().count() == 1);
        assert!(out.arcs().count() >= 1);
    }

    #[test]
    fn test_user_text_outside_span_extends_arc() {
        let mut def = three_point_def(FRAC_PI_2);
        // Drag the text well past the second ray
        def.user_text_position = Some(Vector3::new(-10.0, 10.0, 0.0));
        let mut style = DimStyle::standard();
        style.dimtmove = crate::style::TextMovePolicy::FreeText;
        let out = build(&def, &mut style);
        let spans: Vec<f64> = out
            .with_role(GraphicsRole::DimensionLine)
            .filter_map(|p| match p {
                crate::primitives::DimPrimitive::Arc(a) => {
                    Some(ccw_sweep(a.start_angle, a.end_angle))
                }
                _ => None,
            })
            .collect();
        // Main arc plus the extension arc under the dragged text
        assert!(spans.len() >= 2);
    }

    #[test]
    fn test_radius_follows_dragged_text() {
        let mut def = three_point_def(FRAC_PI_2);
        def.user_text_position = Some(Vector3::new(
            25.0 * FRAC_PI_4.cos(),
            25.0 * FRAC_PI_4.sin(),
            0.0,
        ));
        let mut style = DimStyle::standard();
        let mut r = AngularRecomputor::default();
        r.load_params(&def, None).unwrap();
        r.update_measurement(&style);
        let out = r.build_graphics(&mut style, &ApproxTextMeasurer::default());
        let arc = out
            .with_role(GraphicsRole::DimensionLine)
            .find_map(|p| match p {
                crate::primitives::DimPrimitive::Arc(a) => Some(a),
                _ => None,
            })
            .unwrap();
        assert!((arc.radius - 25.0).abs() < 1e-9);
        // The corrected arc point is stored back into the definition
        r.store_params(&mut def, None).unwrap();
        match def.kind {
            DimensionKind::ThreePointAngular { arc_point, .. } => {
                assert!((arc_point.truncate().length() - 25.0).abs() < 1e-9);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_arc_length_symbol_prefix() {
        let def = DimensionDefinition::new(DimensionKind::ArcLength {
            center: Vector3::ZERO,
            first: Vector3::new(10.0, 0.0, 0.0),
            second: Vector3::new(0.0, 10.0, 0.0),
            arc_point: Vector3::new(
                10.0 * FRAC_PI_4.cos(),
                10.0 * FRAC_PI_4.sin(),
                0.0,
            ),
        });
        let mut style = DimStyle::standard();
        let out = build(&def, &mut style);
        let text = out.texts().next().unwrap();
        assert!(text.content.starts_with(ARC_SIGN));
    }
}
