//! Geometry and appearance value types

pub mod bounds;
pub mod color;
pub mod handle;
pub mod line_weight;
pub mod transform;
pub mod transparency;
pub mod vector;

pub use bounds::BoundingBox2D;
pub use color::Color;
pub use handle::Handle;
pub use line_weight::LineWeight;
pub use transform::{is_zero_angle, rotate_point_2d, Matrix3, PlaneFrame};
pub use transparency::Transparency;
pub use vector::{Vector2, Vector3};
