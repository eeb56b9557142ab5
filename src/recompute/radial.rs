//! Radial family: radius, jogged large-radius and diameter dimensions
//!
//! A single ray from the center through the chord point carries the radius
//! dimension; the jogged variant foreshortens it from an override center
//! with a slanted jog; the diametric variant reuses the straight
//! dimension-line construction across the full diameter.

use super::{measure_annotation, CommonParams, Recompute};
use crate::definition::{ContextId, DimensionDefinition, DimensionKind, Measurement};
use crate::engine::arrows::build_arrowhead;
use crate::engine::fit::{negotiate, FitInput};
use crate::engine::frame::{inspection_frame, split_segment_around_text};
use crate::engine::leader::text_leader;
use crate::engine::{TextBlock, TextMeasurer};
use crate::error::{DimError, Result};
use crate::format;
use crate::geom::{line_line_intersection, project_onto_line, GEOM_TOL};
use crate::primitives::{DimensionGraphics, GraphicsRole, PrimitiveFactory};
use crate::style::{DimStyle, TextVertical};
use crate::types::{PlaneFrame, Vector2, Vector3};

/// Diameter sign used as the default diametric prefix
const DIAMETER_SIGN: &str = "\u{2300}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum RadialVariant {
    #[default]
    Radius,
    Jogged,
    Diameter,
}

/// Recomputor for the radial dimension kinds
#[derive(Debug, Clone, Default)]
pub struct RadialRecomputor {
    common: CommonParams,
    variant: RadialVariant,
    center: Vector3,
    chord: Vector3,
    far_chord: Vector3,
    override_center: Vector3,
    jog_point: Vector3,
    leader_length: f64,
    measurement: Option<Measurement>,
}

impl Recompute for RadialRecomputor {
    fn load_params(&mut self, def: &DimensionDefinition, ctx: Option<ContextId>) -> Result<()> {
        self.common = CommonParams::load(def, ctx)?;
        match CommonParams::kind_for(def, ctx) {
            DimensionKind::Radial {
                center,
                chord_point,
                leader_length,
            } => {
                self.variant = RadialVariant::Radius;
                self.center = *center;
                self.chord = *chord_point;
                self.leader_length = *leader_length;
            }
            DimensionKind::LargeRadial {
                center,
                override_center,
                chord_point,
                jog_point,
            } => {
                self.variant = RadialVariant::Jogged;
                self.center = *center;
                self.override_center = *override_center;
                self.chord = *chord_point;
                self.jog_point = *jog_point;
            }
            DimensionKind::Diametric {
                chord_point,
                far_chord_point,
                leader_length,
            } => {
                self.variant = RadialVariant::Diameter;
                self.chord = *chord_point;
                self.far_chord = *far_chord_point;
                self.leader_length = *leader_length;
            }
            other => {
                return Err(DimError::KindMismatch {
                    expected: "radial",
                    actual: other.name(),
                })
            }
        }
        self.measurement = None;
        Ok(())
    }

    fn preprocess_points(&mut self, _style: &DimStyle) {}

    fn update_measurement(&mut self, style: &DimStyle) -> Measurement {
        let frame = PlaneFrame::from_normal(self.common.normal);
        let scale = style.dimlfac * self.common.measurement_scale;
        let raw = match self.variant {
            RadialVariant::Radius | RadialVariant::Jogged => frame
                .to_plane(self.chord)
                .distance(&frame.to_plane(self.center)),
            RadialVariant::Diameter => frame
                .to_plane(self.chord)
                .distance(&frame.to_plane(self.far_chord)),
        };
        let measurement = Measurement::Length(raw * scale);
        self.measurement = Some(measurement);
        measurement
    }

    fn format_measurement(&self, style: &DimStyle) -> String {
        let value = self.measurement.map(|m| m.value()).unwrap_or(0.0);
        let prefix = match self.variant {
            RadialVariant::Radius | RadialVariant::Jogged => Some("R"),
            RadialVariant::Diameter => Some(DIAMETER_SIGN),
        };
        format::compose_linear(value, style, self.common.text_override.as_deref(), prefix)
    }

    fn build_graphics(
        &mut self,
        style: &mut DimStyle,
        measurer: &dyn TextMeasurer,
    ) -> DimensionGraphics {
        match self.variant {
            RadialVariant::Radius => self.build_radius(style, measurer),
            RadialVariant::Jogged => self.build_jogged(style, measurer),
            RadialVariant::Diameter => self.build_diameter(style, measurer),
        }
    }

    fn store_params(&self, _def: &mut DimensionDefinition, _ctx: Option<ContextId>) -> Result<()> {
        // Radial layout corrects no defining points
        Ok(())
    }
}

impl RadialRecomputor {
    fn build_radius(
        &mut self,
        style: &mut DimStyle,
        measurer: &dyn TextMeasurer,
    ) -> DimensionGraphics {
        let frame = PlaneFrame::from_normal_and_point(self.common.normal, self.chord);
        let factory = self.common.factory(frame, style);
        let mut out = DimensionGraphics::new();

        let c = frame.to_plane(self.center);
        let p = frame.to_plane(self.chord);
        let dir = unit_or(p - c, Vector2::UNIT_X);
        let radius = c.distance(&p);

        if self.measurement.is_none() {
            self.update_measurement(style);
        }
        let content = self.format_measurement(style);
        let (mut text, inspection) = measure_annotation(content, &self.common, style, measurer);

        let gap = style.text_gap();
        let asz = style.arrow_size();
        let user_pos = self.common.user_text_position.map(|q| frame.to_plane(q));
        let user_inside = user_pos
            .map(|q| (q - c).dot(&dir) < radius && (q - c).dot(&dir) > 0.0)
            .unwrap_or(false);
        let fit = negotiate(&FitInput {
            span: radius,
            // A single arrowhead consumes half the two-arrow allowance
            arrow_size: asz * 0.5,
            text_width: text.width,
            gap,
            policy: style.dimatfit,
            force_text_inside: style.dimtix,
            suppress_outside_arrows: style.dimsoxd,
            force_inner_line: style.dimtofl,
            user_positioned: user_pos.is_some(),
            user_inside,
            text_move: style.dimtmove,
        });

        text.direction = TextBlock::readable_direction(dir);
        let up_side = text.direction.perp();

        if fit.text_inside && user_pos.is_none() {
            let mid = c.midpoint(&p);
            text.position = match style.dimtad {
                TextVertical::Centered => mid,
                _ => mid + up_side * (gap + text.height * 0.5),
            };
            for (s, e) in split_segment_around_text(c, p, &text, gap) {
                out.push(factory.dim_line(s, e), GraphicsRole::DimensionLine);
            }
            build_arrowhead(&factory, &mut out, p, dir, style.first_arrow(), asz);
        } else {
            // Text hangs off a run past the chord point with a short hook
            let run = if self.leader_length > GEOM_TOL {
                self.leader_length
            } else {
                2.0 * asz
            };
            let elbow = p + dir * run;
            text.position = match user_pos {
                Some(q) => q,
                None => {
                    let hook_dir = if dir.x >= 0.0 {
                        Vector2::UNIT_X
                    } else {
                        -Vector2::UNIT_X
                    };
                    elbow + hook_dir * (asz + text.width * 0.5)
                        + Vector2::UNIT_Y * (gap + text.height * 0.5)
                }
            };
            if fit.draw_inner_line {
                for (s, e) in split_segment_around_text(c, p, &text, gap) {
                    out.push(factory.dim_line(s, e), GraphicsRole::DimensionLine);
                }
            }
            out.push(factory.dim_line(p, elbow), GraphicsRole::DimensionLine);
            text_leader(&factory, &mut out, elbow, &text, asz);
            build_arrowhead(&factory, &mut out, p, -dir, style.first_arrow(), asz);
        }

        center_mark(&factory, &mut out, c, radius, style.center_mark());
        out.push(
            factory.text(text.content.clone(), text.position, text.direction),
            GraphicsRole::None,
        );
        if let Some(layout) = inspection {
            inspection_frame(&factory, &mut out, &text, gap, &layout.separators);
        }
        out
    }

    fn build_jogged(
        &mut self,
        style: &mut DimStyle,
        measurer: &dyn TextMeasurer,
    ) -> DimensionGraphics {
        let frame = PlaneFrame::from_normal_and_point(self.common.normal, self.chord);
        let factory = self.common.factory(frame, style);
        let mut out = DimensionGraphics::new();

        let c = frame.to_plane(self.center);
        let oc = frame.to_plane(self.override_center);
        let p = frame.to_plane(self.chord);
        let j = frame.to_plane(self.jog_point);
        let dir = unit_or(p - c, Vector2::UNIT_X);

        // Jog: slant through the jog point between the radial line through
        // the true center and its parallel through the override center.
        let slant = dir.rotate(style.dimjogang);
        let qa = line_line_intersection(j, slant, oc, dir)
            .unwrap_or_else(|| project_onto_line(j, oc, dir));
        let qb = line_line_intersection(j, slant, c, dir)
            .unwrap_or_else(|| project_onto_line(j, c, dir));

        if self.measurement.is_none() {
            self.update_measurement(style);
        }
        let content = self.format_measurement(style);
        let (mut text, inspection) = measure_annotation(content, &self.common, style, measurer);
        let gap = style.text_gap();
        let asz = style.arrow_size();

        text.direction = TextBlock::readable_direction(dir);
        let up_side = text.direction.perp();
        let user_pos = self.common.user_text_position.map(|q| frame.to_plane(q));
        let mid = qb.midpoint(&p);
        text.position = match user_pos {
            Some(q) => q,
            None => match style.dimtad {
                TextVertical::Centered => mid,
                _ => mid + up_side * (gap + text.height * 0.5),
            },
        };

        if oc.distance(&qa) > GEOM_TOL {
            out.push(factory.dim_line(oc, qa), GraphicsRole::DimensionLine);
        }
        if qa.distance(&qb) > GEOM_TOL {
            out.push(factory.dim_line(qa, qb), GraphicsRole::DimensionLine);
        }
        for (s, e) in split_segment_around_text(qb, p, &text, gap) {
            out.push(factory.dim_line(s, e), GraphicsRole::DimensionLine);
        }
        build_arrowhead(&factory, &mut out, p, dir, style.first_arrow(), asz);

        out.push(
            factory.text(text.content.clone(), text.position, text.direction),
            GraphicsRole::None,
        );
        if let Some(layout) = inspection {
            inspection_frame(&factory, &mut out, &text, gap, &layout.separators);
        }
        out
    }

    fn build_diameter(
        &mut self,
        style: &mut DimStyle,
        measurer: &dyn TextMeasurer,
    ) -> DimensionGraphics {
        let frame = PlaneFrame::from_normal_and_point(self.common.normal, self.chord);
        let factory = self.common.factory(frame, style);
        let mut out = DimensionGraphics::new();

        let p1 = frame.to_plane(self.chord);
        let p2 = frame.to_plane(self.far_chord);
        let dir = unit_or(p2 - p1, Vector2::UNIT_X);
        let span = p1.distance(&p2);
        let c = p1.midpoint(&p2);

        if self.measurement.is_none() {
            self.update_measurement(style);
        }
        let content = self.format_measurement(style);
        let (mut text, inspection) = measure_annotation(content, &self.common, style, measurer);
        let gap = style.text_gap();
        let asz = style.arrow_size();
        let user_pos = self.common.user_text_position.map(|q| frame.to_plane(q));
        let user_inside = user_pos
            .map(|q| {
                let t = (q - p1).dot(&dir);
                t > 0.0 && t < span
            })
            .unwrap_or(false);
        let fit = negotiate(&FitInput {
            span,
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

        text.direction = TextBlock::readable_direction(dir);
        let up_side = text.direction.perp();
        text.position = match user_pos {
            Some(q) => q,
            None if fit.text_inside => match style.dimtad {
                TextVertical::Centered => c,
                _ => c + up_side * (gap + text.height * 0.5),
            },
            None => {
                let elbow = p2 + dir * (2.0 * asz);
                elbow + dir * (gap + text.width * 0.5)
                    + up_side * (gap + text.height * 0.5)
            }
        };

        if fit.text_inside || fit.draw_inner_line {
            for (s, e) in split_segment_around_text(p1, p2, &text, gap) {
                out.push(factory.dim_line(s, e), GraphicsRole::DimensionLine);
            }
        }
        if fit.arrows_drawn {
            if fit.arrows_inside {
                build_arrowhead(&factory, &mut out, p1, -dir, style.first_arrow(), asz);
                build_arrowhead(&factory, &mut out, p2, dir, style.second_arrow(), asz);
            } else {
                // Outside arrows point back at the circle, one per end
                build_arrowhead(&factory, &mut out, p1, dir, style.first_arrow(), asz);
                build_arrowhead(&factory, &mut out, p2, -dir, style.second_arrow(), asz);
                out.push(
                    factory.dim_line(p1, p1 - dir * (2.0 * asz)),
                    GraphicsRole::DimensionLine,
                );
                out.push(
                    factory.dim_line(p2, p2 + dir * (2.0 * asz)),
                    GraphicsRole::DimensionLine,
                );
            }
        }
        if !fit.arrows_inside {
            center_mark(&factory, &mut out, c, span * 0.5, style.center_mark());
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
}

fn unit_or(v: Vector2, fallback: Vector2) -> Vector2 {
    if v.length_squared() < GEOM_TOL * GEOM_TOL {
        fallback
    } else {
        v.normalize()
    }
}

/// Center mark for the measured curve: positive size draws a cross mark,
/// negative draws full center lines past the curve, zero draws nothing
fn center_mark(
    factory: &PrimitiveFactory,
    out: &mut DimensionGraphics,
    center: Vector2,
    radius: f64,
    size: f64,
) {
    if size.abs() < GEOM_TOL {
        return;
    }
    let reach = if size > 0.0 {
        size
    } else {
        radius + size.abs()
    };
    let dx = Vector2::UNIT_X * reach;
    let dy = Vector2::UNIT_Y * reach;
    out.push(factory.dim_line(center - dx, center + dx), GraphicsRole::None);
    out.push(factory.dim_line(center - dy, center + dy), GraphicsRole::None);
}
