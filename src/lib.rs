//! Shape inference and row-major flattening for nested sequence data.
//!
//! Given an arbitrarily deeply nested, homogeneous sequence of sequences,
//! this crate derives the two artifacts a dense multi-dimensional array is
//! built from: a [`Shape`] giving the extent of each nesting level,
//! validated to be rectangular, and a flat row-major buffer of the leaf
//! elements.
//!
//! Two dispatch paths cover the two ways nesting can be known:
//!
//! - statically, through the [`Nested`] trait, where the type itself encodes
//!   the nesting (`Vec<Vec<f64>>` is two-dimensional with `f64` leaves) and
//!   [`infer_shape`] and [`flatten`] walk it with no runtime tagging;
//! - at runtime, through [`NestedValue`], a tagged tree for inputs whose
//!   depth is only known once the data is seen.
//!
//! [`Array`] pairs the two artifacts, running the shape check before the
//! flattened buffer is trusted.

mod array;
mod nested;
mod value;

/// Core types for representing rectangular shapes and their derivation
/// errors.
pub mod shape;

pub use array::Array;
pub use nested::Nested;
pub use nested::flatten;
pub use nested::infer_shape;
pub use shape::Shape;
pub use shape::ShapeError;
pub use value::NestedValue;
