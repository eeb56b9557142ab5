//! Per-family recompute drivers
//!
//! Every dimension family implements the same six-step lifecycle: load the
//! working parameters (from the defaults or a context override), run the
//! family's point preprocessing, compute the measurement, format it, build
//! the graphics, and store any corrected fields back where they were loaded
//! from. Families never share state; each call owns its working copy.

use crate::definition::{
    ContextId, DimensionDefinition, DimensionFamily, DimensionKind, Measurement,
};
use crate::engine::{ApproxTextMeasurer, TextBlock, TextMeasurer};
use crate::error::{DimError, Result};
use crate::primitives::{Appearance, DimensionGraphics, PrimitiveFactory};
use crate::style::DimStyle;
use crate::types::{Color, Transparency, Vector3};
use rayon::prelude::*;
use tracing::debug;

pub mod angular;
pub mod linear;
pub mod ordinate;
pub mod radial;

pub use angular::AngularRecomputor;
pub use linear::LinearRecomputor;
pub use ordinate::OrdinateRecomputor;
pub use radial::RadialRecomputor;

/// The recompute lifecycle shared by every dimension family
pub trait Recompute {
    /// Load working fields from the definition defaults or from a context
    /// override. Idempotent.
    fn load_params(&mut self, def: &DimensionDefinition, ctx: Option<ContextId>) -> Result<()>;

    /// Family-specific correction of auxiliary points so later invariants
    /// hold. A no-op for several kinds.
    fn preprocess_points(&mut self, style: &DimStyle);

    /// Compute the measurement from geometry only; callable without building
    /// graphics.
    fn update_measurement(&mut self, style: &DimStyle) -> Measurement;

    /// Convert the current measurement to display text.
    fn format_measurement(&self, style: &DimStyle) -> String;

    /// Run the layout algorithm and produce the ordered primitive set. May
    /// correct a small number of working fields.
    fn build_graphics(
        &mut self,
        style: &mut DimStyle,
        measurer: &dyn TextMeasurer,
    ) -> DimensionGraphics;

    /// Write corrected fields back to the defaults or the active override,
    /// never both unless the context is the default.
    fn store_params(&self, def: &mut DimensionDefinition, ctx: Option<ContextId>) -> Result<()>;
}

/// Working copy of the kind-independent definition fields
#[derive(Debug, Clone)]
pub(crate) struct CommonParams {
    pub normal: Vector3,
    pub text_override: Option<String>,
    pub user_text_position: Option<Vector3>,
    pub flip_arrow1: bool,
    pub flip_arrow2: bool,
    pub inspection: bool,
    pub inspection_label: Option<String>,
    pub inspection_rate: Option<String>,
    pub measurement_scale: f64,
    pub layer: String,
    pub color: Color,
    pub transparency: Transparency,
    pub linetype_scale: f64,
}

impl Default for CommonParams {
    fn default() -> Self {
        CommonParams {
            normal: Vector3::UNIT_Z,
            text_override: None,
            user_text_position: None,
            flip_arrow1: false,
            flip_arrow2: false,
            inspection: false,
            inspection_label: None,
            inspection_rate: None,
            measurement_scale: 1.0,
            layer: "0".to_string(),
            color: Color::ByLayer,
            transparency: Transparency::OPAQUE,
            linetype_scale: 1.0,
        }
    }
}

impl CommonParams {
    pub fn load(def: &DimensionDefinition, ctx: Option<ContextId>) -> Result<Self> {
        let mut params = CommonParams {
            normal: def.normal,
            text_override: def.text_override.clone(),
            user_text_position: def.user_text_position,
            flip_arrow1: def.flip_arrow1,
            flip_arrow2: def.flip_arrow2,
            inspection: def.inspection,
            inspection_label: def.inspection_label.clone(),
            inspection_rate: def.inspection_rate.clone(),
            measurement_scale: def.measurement_scale,
            layer: def.layer.clone(),
            color: def.color,
            transparency: def.transparency,
            linetype_scale: def.linetype_scale,
        };
        if let Some(ctx) = ctx {
            let ov = def
                .override_for(ctx)
                .ok_or(DimError::UnknownContext(ctx.0))?;
            params.user_text_position = ov.user_text_position;
            params.flip_arrow1 = ov.flip_arrow1;
            params.flip_arrow2 = ov.flip_arrow2;
        }
        Ok(params)
    }

    /// The defining geometry for this load: the override's when a context is
    /// active, the defaults otherwise
    pub fn kind_for<'a>(def: &'a DimensionDefinition, ctx: Option<ContextId>) -> &'a DimensionKind {
        match ctx.and_then(|c| def.override_for(c)) {
            Some(ov) => &ov.kind,
            None => &def.kind,
        }
    }

    /// Build the call's primitive factory from the loaded entity fields
    pub fn factory(&self, frame: crate::types::PlaneFrame, style: &DimStyle) -> PrimitiveFactory {
        let base = Appearance {
            color: self.color,
            line_weight: crate::types::LineWeight::ByLayer,
            linetype: crate::types::Handle::NULL,
            linetype_scale: self.linetype_scale,
            transparency: self.transparency,
            layer: self.layer.clone(),
        };
        PrimitiveFactory::from_parts(frame, self.normal, base, style)
    }

    /// Wrap plain measurement text into the inspection sections when the
    /// inspection frame is requested
    pub fn inspection_sections(&self) -> (Option<&str>, Option<&str>) {
        if self.inspection {
            (
                self.inspection_label.as_deref(),
                self.inspection_rate.as_deref(),
            )
        } else {
            (None, None)
        }
    }
}

/// Tagged dispatch over the family recomputors
#[derive(Debug, Clone)]
pub enum Recomputor {
    Linear(LinearRecomputor),
    Angular(AngularRecomputor),
    Radial(RadialRecomputor),
    Ordinate(OrdinateRecomputor),
}

impl Recomputor {
    /// Pick the recomputor for a definition's family
    pub fn for_definition(def: &DimensionDefinition) -> Self {
        match def.kind.family() {
            DimensionFamily::Linear => Recomputor::Linear(LinearRecomputor::default()),
            DimensionFamily::Angular => Recomputor::Angular(AngularRecomputor::default()),
            DimensionFamily::Radial => Recomputor::Radial(RadialRecomputor::default()),
            DimensionFamily::Ordinate => Recomputor::Ordinate(OrdinateRecomputor::default()),
        }
    }

    fn as_dyn(&mut self) -> &mut dyn Recompute {
        match self {
            Recomputor::Linear(r) => r,
            Recomputor::Angular(r) => r,
            Recomputor::Radial(r) => r,
            Recomputor::Ordinate(r) => r,
        }
    }
}

impl Recompute for Recomputor {
    fn load_params(&mut self, def: &DimensionDefinition, ctx: Option<ContextId>) -> Result<()> {
        self.as_dyn().load_params(def, ctx)
    }

    fn preprocess_points(&mut self, style: &DimStyle) {
        self.as_dyn().preprocess_points(style)
    }

    fn update_measurement(&mut self, style: &DimStyle) -> Measurement {
        self.as_dyn().update_measurement(style)
    }

    fn format_measurement(&self, style: &DimStyle) -> String {
        match self {
            Recomputor::Linear(r) => r.format_measurement(style),
            Recomputor::Angular(r) => r.format_measurement(style),
            Recomputor::Radial(r) => r.format_measurement(style),
            Recomputor::Ordinate(r) => r.format_measurement(style),
        }
    }

    fn build_graphics(
        &mut self,
        style: &mut DimStyle,
        measurer: &dyn TextMeasurer,
    ) -> DimensionGraphics {
        self.as_dyn().build_graphics(style, measurer)
    }

    fn store_params(&self, def: &mut DimensionDefinition, ctx: Option<ContextId>) -> Result<()> {
        match self {
            Recomputor::Linear(r) => r.store_params(def, ctx),
            Recomputor::Angular(r) => r.store_params(def, ctx),
            Recomputor::Radial(r) => r.store_params(def, ctx),
            Recomputor::Ordinate(r) => r.store_params(def, ctx),
        }
    }
}

/// Run the full lifecycle for one definition with the default text measurer
pub fn recompute(def: &mut DimensionDefinition, style: &mut DimStyle) -> Result<DimensionGraphics> {
    recompute_with(def, style, None, &ApproxTextMeasurer::default())
}

/// Run the full lifecycle with an explicit context and text measurer
pub fn recompute_with(
    def: &mut DimensionDefinition,
    style: &mut DimStyle,
    ctx: Option<ContextId>,
    measurer: &dyn TextMeasurer,
) -> Result<DimensionGraphics> {
    debug!(kind = def.kind.name(), "recompute start");
    let mut recomputor = Recomputor::for_definition(def);
    recomputor.load_params(def, ctx)?;
    recomputor.preprocess_points(style);
    let measurement = recomputor.update_measurement(style);
    let graphics = recomputor.build_graphics(style, measurer);
    recomputor.store_params(def, ctx)?;
    if ctx.is_none() {
        def.cache_measurement(measurement);
    }
    debug!(
        kind = def.kind.name(),
        primitives = graphics.len(),
        "recompute done"
    );
    Ok(graphics)
}

/// Compute just the measurement for a definition, caching it
pub fn update_measurement(def: &mut DimensionDefinition, style: &DimStyle) -> Result<Measurement> {
    let mut recomputor = Recomputor::for_definition(def);
    recomputor.load_params(def, None)?;
    recomputor.preprocess_points(style);
    let measurement = recomputor.update_measurement(style);
    def.cache_measurement(measurement);
    Ok(measurement)
}

/// Format the measurement text for a definition without building graphics
pub fn format_measurement(def: &DimensionDefinition, style: &DimStyle) -> Result<String> {
    let mut recomputor = Recomputor::for_definition(def);
    recomputor.load_params(def, None)?;
    recomputor.update_measurement(style);
    Ok(recomputor.format_measurement(style))
}

/// Recompute a batch of definitions in parallel
///
/// Each call owns its recomputor, a private style clone, and one definition,
/// so batch items never alias.
pub fn recompute_all(
    defs: &mut [DimensionDefinition],
    style: &DimStyle,
) -> Vec<Result<DimensionGraphics>> {
    defs.par_iter_mut()
        .map(|def| {
            let mut style = style.clone();
            recompute(def, &mut style)
        })
        .collect()
}

/// Compose the measurement text together with any inspection sections and
/// measure it into a text block
pub(crate) fn measure_annotation(
    content: String,
    common: &CommonParams,
    style: &DimStyle,
    measurer: &dyn TextMeasurer,
) -> (TextBlock, Option<crate::engine::frame::InspectionLayout>) {
    if common.inspection {
        let (label, rate) = common.inspection_sections();
        let layout =
            crate::engine::frame::inspection_layout(label, &content, rate, style, measurer);
        let block = TextBlock::measure(layout.content.clone(), style, measurer);
        (block, Some(layout))
    } else {
        (TextBlock::measure(content, style, measurer), None)
    }
}
