//! Ordinate dimensions: single-axis offset leaders
//!
//! An ordinate dimension reads the X or Y datum of a feature point relative
//! to an origin and hangs the value off a dogleg leader ending at the
//! caller's leader endpoint.

use super::{measure_annotation, CommonParams, Recompute};
use crate::definition::{ContextId, DimensionDefinition, DimensionKind, Measurement};
use crate::engine::frame::inspection_frame;
use crate::engine::{TextBlock, TextMeasurer};
use crate::error::{DimError, Result};
use crate::format;
use crate::geom::GEOM_TOL;
use crate::primitives::{DimensionGraphics, GraphicsRole};
use crate::style::DimStyle;
use crate::types::{PlaneFrame, Vector2, Vector3};

/// Recomputor for ordinate dimensions
#[derive(Debug, Clone, Default)]
pub struct OrdinateRecomputor {
    common: CommonParams,
    origin: Vector3,
    feature: Vector3,
    leader_end: Vector3,
    use_x_datum: bool,
    measurement: Option<Measurement>,
}

impl Recompute for OrdinateRecomputor {
    fn load_params(&mut self, def: &DimensionDefinition, ctx: Option<ContextId>) -> Result<()> {
        self.common = CommonParams::load(def, ctx)?;
        match CommonParams::kind_for(def, ctx) {
            DimensionKind::Ordinate {
                origin,
                feature,
                leader_end,
                use_x_datum,
            } => {
                self.origin = *origin;
                self.feature = *feature;
                self.leader_end = *leader_end;
                self.use_x_datum = *use_x_datum;
            }
            other => {
                return Err(DimError::KindMismatch {
                    expected: "ordinate",
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
        let delta = frame.to_plane(self.feature) - frame.to_plane(self.origin);
        let raw = if self.use_x_datum { delta.x } else { delta.y };
        let measurement =
            Measurement::Length(raw.abs() * style.dimlfac * self.common.measurement_scale);
        self.measurement = Some(measurement);
        measurement
    }

    fn format_measurement(&self, style: &DimStyle) -> String {
        let value = self.measurement.map(|m| m.value()).unwrap_or(0.0);
        format::compose_linear(value, style, self.common.text_override.as_deref(), None)
    }

    fn build_graphics(
        &mut self,
        style: &mut DimStyle,
        measurer: &dyn TextMeasurer,
    ) -> DimensionGraphics {
        let frame = PlaneFrame::from_normal_and_point(self.common.normal, self.feature);
        let factory = self.common.factory(frame, style);
        let mut out = DimensionGraphics::new();

        let f = frame.to_plane(self.feature);
        let l = frame.to_plane(self.leader_end);

        // The leader runs along the datum axis being read: an X-datum
        // ordinate leads away along Y, a Y-datum ordinate along X.
        let axis = if self.use_x_datum {
            Vector2::UNIT_Y
        } else {
            Vector2::UNIT_X
        };
        let to_end = l - f;
        let axial = to_end.dot(&axis);
        let a = if axial >= 0.0 { axis } else { -axis };
        let axial = axial.abs();
        let lateral = to_end.dot(&a.perp());

        let gap = style.text_gap();
        let asz = style.arrow_size();
        let exo = style.ext_offset();
        let start = f + a * exo.min(axial);

        if self.measurement.is_none() {
            self.update_measurement(style);
        }
        let content = self.format_measurement(style);
        let (mut text, inspection) = measure_annotation(content, &self.common, style, measurer);

        if lateral.abs() < GEOM_TOL || axial < GEOM_TOL {
            // Straight leader
            out.push(factory.dim_line(start, l), GraphicsRole::DimensionLine);
        } else {
            // Dogleg: run out along the axis, step across, finish at the end.
            // The knee sits two arrow-lengths before the endpoint, clamped to
            // half the axial run so short leaders keep a visible dogleg.
            let knee = (axial - 2.0 * asz).max(axial * 0.5);
            let m1 = start + a * (knee - exo.min(axial)).max(0.0);
            let m2 = m1 + a.perp() * lateral;
            out.push(factory.dim_line(start, m1), GraphicsRole::DimensionLine);
            out.push(factory.dim_line(m1, m2), GraphicsRole::DimensionLine);
            out.push(factory.dim_line(m2, l), GraphicsRole::DimensionLine);
        }

        text.direction = TextBlock::readable_direction(a);
        text.position = l + a * (gap + text.width * 0.5);
        out.push(
            factory.text(text.content.clone(), text.position, text.direction),
            GraphicsRole::None,
        );
        if let Some(layout) = inspection {
            inspection_frame(&factory, &mut out, &text, gap, &layout.separators);
        }
        out
    }

    fn store_params(&self, _def: &mut DimensionDefinition, _ctx: Option<ContextId>) -> Result<()> {
        // Ordinate layout corrects no defining points
        Ok(())
    }
}
