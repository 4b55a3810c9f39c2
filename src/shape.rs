use std::fmt;

use itertools::Itertools;
use serde::Deserialize;
use serde::Serialize;

/// Errors raised while deriving a [`Shape`] from nested data or pairing one
/// with a flat buffer.
#[derive(Debug, thiserror::Error)]
pub enum ShapeError {
    #[error(
        "ragged nesting at depth {dim}: element {index} has length {found}, \
         but earlier elements at this depth have length {expected}"
    )]
    Ragged {
        dim: usize,
        index: usize,
        expected: usize,
        found: usize,
    },

    #[error("mixed nesting at depth {dim}: element {index} does not match the kind (leaf or sequence) of its peers")]
    MixedNesting { dim: usize, index: usize },

    #[error("buffer of length {len} does not fill shape {shape}: expected {expected} elements")]
    SizeMismatch {
        len: usize,
        expected: usize,
        shape: Shape,
    },
}

/// Per-dimension extents of a rectangular nested structure, outermost first.
///
/// The empty shape describes a scalar: zero dimensions, one element.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq, Hash)]
pub struct Shape {
    sizes: Vec<usize>,
}

impl Shape {
    pub fn new(sizes: Vec<usize>) -> Self {
        Self { sizes }
    }

    /// The extent of each dimension, outermost first.
    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    /// The number of dimensions.
    pub fn num_dim(&self) -> usize {
        self.sizes.len()
    }

    /// The number of elements a dense buffer of this shape holds: the
    /// product of the extents. Zero if any dimension is empty.
    pub fn num_elements(&self) -> usize {
        self.sizes.iter().product()
    }

    /// Contiguous row-major strides: the innermost dimension varies fastest.
    pub fn strides(&self) -> Vec<usize> {
        let mut strides = vec![1; self.sizes.len()];
        for dim in (0..self.sizes.len().saturating_sub(1)).rev() {
            strides[dim] = strides[dim + 1] * self.sizes[dim + 1];
        }
        strides
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.sizes.iter().join(", "))
    }
}
