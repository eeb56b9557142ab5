//! Dimension defining geometry
//!
//! A `DimensionDefinition` is the per-entity input of a recompute call: the
//! defining points (whose meaning varies by kind), the plane normal, and the
//! per-entity annotation fields. A definition may also carry per-context
//! overrides of its working fields, so the same entity can render
//! differently in different contexts without disturbing the defaults.

use crate::types::{Color, Transparency, Vector3};
use indexmap::IndexMap;

/// Cached measurement scalar
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Measurement {
    /// A length, already scaled
    Length(f64),
    /// An angle in radians
    Angle(f64),
}

impl Measurement {
    /// The raw scalar
    pub fn value(&self) -> f64 {
        match self {
            Measurement::Length(v) | Measurement::Angle(v) => *v,
        }
    }
}

/// Dimension family, the unit of recompute dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimensionFamily {
    Linear,
    Angular,
    Radial,
    Ordinate,
}

/// Defining geometry per dimension kind
///
/// Point meaning follows the classic drawing conventions: linear kinds carry
/// the two measured points plus a point on the dimension line, angular kinds
/// carry bounding rays plus an arc point, radial kinds carry center and
/// chord points.
#[derive(Debug, Clone, PartialEq)]
pub enum DimensionKind {
    /// Distance between two points, dimension line parallel to them
    Aligned {
        first: Vector3,
        second: Vector3,
        line_point: Vector3,
        /// Extension-line skew angle; 0 keeps them perpendicular
        oblique: f64,
    },
    /// Distance projected onto a fixed direction
    Rotated {
        first: Vector3,
        second: Vector3,
        line_point: Vector3,
        /// Dimension line direction angle
        rotation: f64,
        oblique: f64,
    },
    /// Angle between two lines
    TwoLineAngular {
        line1: (Vector3, Vector3),
        line2: (Vector3, Vector3),
        arc_point: Vector3,
    },
    /// Angle at a vertex between two points
    ThreePointAngular {
        vertex: Vector3,
        first: Vector3,
        second: Vector3,
        arc_point: Vector3,
    },
    /// Length along an arc between two points on it
    ArcLength {
        center: Vector3,
        first: Vector3,
        second: Vector3,
        arc_point: Vector3,
    },
    /// Radius from center through a chord point
    Radial {
        center: Vector3,
        chord_point: Vector3,
        /// Dimension-line run past the chord point when text sits outside
        leader_length: f64,
    },
    /// Radius with a jogged, foreshortened dimension line
    LargeRadial {
        center: Vector3,
        /// Stand-in center the drawn line radiates from
        override_center: Vector3,
        chord_point: Vector3,
        /// Where the jog crosses between the construction lines
        jog_point: Vector3,
    },
    /// Diameter across two chord points
    Diametric {
        chord_point: Vector3,
        far_chord_point: Vector3,
        leader_length: f64,
    },
    /// Single-axis offset from a datum origin
    Ordinate {
        origin: Vector3,
        feature: Vector3,
        leader_end: Vector3,
        /// Measure the X datum when set, the Y datum otherwise
        use_x_datum: bool,
    },
}

impl DimensionKind {
    /// The recompute family handling this kind
    pub fn family(&self) -> DimensionFamily {
        match self {
            DimensionKind::Aligned { .. } | DimensionKind::Rotated { .. } => {
                DimensionFamily::Linear
            }
            DimensionKind::TwoLineAngular { .. }
            | DimensionKind::ThreePointAngular { .. }
            | DimensionKind::ArcLength { .. } => DimensionFamily::Angular,
            DimensionKind::Radial { .. }
            | DimensionKind::LargeRadial { .. }
            | DimensionKind::Diametric { .. } => DimensionFamily::Radial,
            DimensionKind::Ordinate { .. } => DimensionFamily::Ordinate,
        }
    }

    /// Stable kind name used in diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            DimensionKind::Aligned { .. } => "aligned",
            DimensionKind::Rotated { .. } => "rotated",
            DimensionKind::TwoLineAngular { .. } => "two-line angular",
            DimensionKind::ThreePointAngular { .. } => "three-point angular",
            DimensionKind::ArcLength { .. } => "arc length",
            DimensionKind::Radial { .. } => "radial",
            DimensionKind::LargeRadial { .. } => "large radial",
            DimensionKind::Diametric { .. } => "diametric",
            DimensionKind::Ordinate { .. } => "ordinate",
        }
    }
}

/// Identifier of a per-context override slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextId(pub u64);

/// Working fields a context may override
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionOverride {
    pub kind: DimensionKind,
    pub user_text_position: Option<Vector3>,
    pub text_rotation: f64,
    pub flip_arrow1: bool,
    pub flip_arrow2: bool,
    pub jog_position: Option<Vector3>,
    pub jog_height: f64,
}

/// Per-entity dimension definition
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionDefinition {
    /// Defining geometry
    pub kind: DimensionKind,
    /// Plane normal (extrusion direction)
    pub normal: Vector3,
    /// User text override; `<>` marks the measured value
    pub text_override: Option<String>,
    /// User-dragged text position; None keeps the default placement
    pub user_text_position: Option<Vector3>,
    /// Extra text rotation
    pub text_rotation: f64,
    /// Jog symbol location on a linear dimension line
    pub jog_position: Option<Vector3>,
    /// Jog symbol height; 0 disables the symbol
    pub jog_height: f64,
    /// Wrap the text in an inspection frame
    pub inspection: bool,
    /// Inspection label section
    pub inspection_label: Option<String>,
    /// Inspection rate section
    pub inspection_rate: Option<String>,
    /// Flip the first arrowhead to the outside
    pub flip_arrow1: bool,
    /// Flip the second arrowhead to the outside
    pub flip_arrow2: bool,
    /// Layer generated primitives land on
    pub layer: String,
    /// Entity color, used where the style delegates with ByBlock
    pub color: Color,
    /// Entity transparency
    pub transparency: Transparency,
    /// Linetype scale for generated primitives
    pub linetype_scale: f64,
    /// Extra measurement scale multiplied into length measurements
    pub measurement_scale: f64,

    measurement: Option<Measurement>,
    overrides: IndexMap<u64, DimensionOverride>,
}

impl DimensionDefinition {
    /// Create a definition with default annotation fields
    pub fn new(kind: DimensionKind) -> Self {
        DimensionDefinition {
            kind,
            normal: Vector3::UNIT_Z,
            text_override: None,
            user_text_position: None,
            text_rotation: 0.0,
            jog_position: None,
            jog_height: 0.0,
            inspection: false,
            inspection_label: None,
            inspection_rate: None,
            flip_arrow1: false,
            flip_arrow2: false,
            layer: "0".to_string(),
            color: Color::ByLayer,
            transparency: Transparency::OPAQUE,
            linetype_scale: 1.0,
            measurement_scale: 1.0,
            measurement: None,
            overrides: IndexMap::new(),
        }
    }

    /// Builder: set the plane normal
    pub fn with_normal(mut self, normal: Vector3) -> Self {
        self.normal = normal;
        self.measurement = None;
        self
    }

    /// Builder: set the user text override
    pub fn with_text_override(mut self, text: impl Into<String>) -> Self {
        self.text_override = Some(text.into());
        self
    }

    /// Builder: set a user-defined text position
    pub fn with_text_position(mut self, position: Vector3) -> Self {
        self.user_text_position = Some(position);
        self
    }

    /// Replace the defining geometry, invalidating the cached measurement
    pub fn set_kind(&mut self, kind: DimensionKind) {
        self.kind = kind;
        self.measurement = None;
    }

    /// Replace the plane normal, invalidating the cached measurement
    pub fn set_normal(&mut self, normal: Vector3) {
        self.normal = normal;
        self.measurement = None;
    }

    /// The cached measurement, if one has been computed
    pub fn measurement(&self) -> Option<Measurement> {
        self.measurement
    }

    /// Store a computed measurement
    pub(crate) fn cache_measurement(&mut self, measurement: Measurement) {
        self.measurement = Some(measurement);
    }

    /// Register an override context seeded from the current defaults
    pub fn add_override(&mut self, ctx: ContextId) {
        self.overrides.entry(ctx.0).or_insert(DimensionOverride {
            kind: self.kind.clone(),
            user_text_position: self.user_text_position,
            text_rotation: self.text_rotation,
            flip_arrow1: self.flip_arrow1,
            flip_arrow2: self.flip_arrow2,
            jog_position: self.jog_position,
            jog_height: self.jog_height,
        });
    }

    /// Look up an override context
    pub fn override_for(&self, ctx: ContextId) -> Option<&DimensionOverride> {
        self.overrides.get(&ctx.0)
    }

    /// Look up an override context mutably
    pub fn override_for_mut(&mut self, ctx: ContextId) -> Option<&mut DimensionOverride> {
        self.overrides.get_mut(&ctx.0)
    }

    /// Remove an override context
    pub fn remove_override(&mut self, ctx: ContextId) -> Option<DimensionOverride> {
        self.overrides.shift_remove(&ctx.0)
    }

    /// Registered override contexts in insertion order
    pub fn override_contexts(&self) -> impl Iterator<Item = ContextId> + '_ {
        self.overrides.keys().map(|k| ContextId(*k))
    }
}
