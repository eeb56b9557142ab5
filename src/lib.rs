//! # dimgfx
//!
//! A pure Rust engine for recomputing CAD dimension graphics.
//!
//! Given a dimension entity's defining points and a resolved dimension
//! style snapshot, the engine deterministically produces the 2D drawing
//! primitives (lines, arcs, points, formatted text) rendering that
//! dimension, reproducing the established drafting conventions for linear,
//! angular, radial and ordinate dimensions.
//!
//! ## Quick Start
//!
//! ```rust
//! use dimgfx::{recompute, DimensionDefinition, DimensionKind, DimStyle, Vector3};
//!
//! let mut def = DimensionDefinition::new(DimensionKind::Aligned {
//!     first: Vector3::new(0.0, 0.0, 0.0),
//!     second: Vector3::new(10.0, 0.0, 0.0),
//!     line_point: Vector3::new(5.0, 5.0, 0.0),
//!     oblique: 0.0,
//! });
//! let mut style = DimStyle::standard();
//!
//! let graphics = recompute(&mut def, &mut style)?;
//! assert!(graphics.len() > 0);
//! # Ok::<(), dimgfx::DimError>(())
//! ```
//!
//! ## Architecture
//!
//! - `DimensionDefinition` - per-entity defining geometry and annotation
//!   fields
//! - `DimStyle` - the resolved style snapshot (dimvars)
//! - `Recompute` - the six-step per-family recompute lifecycle
//! - `DimensionGraphics` - the ordered primitive output with role tags
//!
//! All layout math runs in the dimension's plane; results are lifted back
//! to world space preserving the original elevation. Degenerate geometry
//! never fails a recompute: every branch resolves to a deterministic
//! fallback so the output stays renderable.
//!
//! ## Concurrency
//!
//! A recompute call is synchronous and owns all of its working state, so
//! distinct entities recompute safely in parallel; `recompute_all` fans a
//! batch out with rayon.

#![allow(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod definition;
pub mod engine;
pub mod error;
pub mod format;
pub mod geom;
pub mod primitives;
pub mod recompute;
pub mod style;
pub mod types;

// Re-export commonly used types
pub use error::{DimError, Result};
pub use types::{
    BoundingBox2D, Color, Handle, LineWeight, Matrix3, PlaneFrame, Transparency, Vector2, Vector3,
};

// Re-export the definition model
pub use definition::{
    ContextId, DimensionDefinition, DimensionFamily, DimensionKind, DimensionOverride, Measurement,
};

// Re-export the style snapshot
pub use style::{
    AngularFormat, ArcSymbol, ArrowType, DimStyle, FitPolicy, TextJustification, TextMovePolicy,
    TextVertical, ZeroSuppression,
};

// Re-export primitives
pub use primitives::{
    ArcPrimitive, DimPrimitive, DimensionGraphics, GraphicsRole, LinePrimitive, PointPrimitive,
    PrimitiveFactory, TextPrimitive,
};

// Re-export the recompute entry points
pub use engine::{ApproxTextMeasurer, TextMeasurer};
pub use recompute::{
    format_measurement, recompute, recompute_all, recompute_with, update_measurement, Recompute,
    Recomputor,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
