use itertools::izip;
use serde::Deserialize;
use serde::Serialize;

use crate::Nested;
use crate::NestedValue;
use crate::Shape;
use crate::ShapeError;
use crate::flatten;
use crate::infer_shape;

/// A dense multi-dimensional array: a [`Shape`] paired with a row-major
/// buffer holding exactly `shape.num_elements()` elements.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Array<T> {
    shape: Shape,
    data: Vec<T>,
}

impl<T> Array<T> {
    /// Pair a shape with a row-major buffer, validating that the buffer
    /// holds exactly as many elements as the shape describes.
    pub fn new(shape: Shape, data: Vec<T>) -> Result<Self, ShapeError> {
        if data.len() != shape.num_elements() {
            return Err(ShapeError::SizeMismatch {
                len: data.len(),
                expected: shape.num_elements(),
                shape,
            });
        }
        Ok(Self { shape, data })
    }

    /// Build an array from statically nested data. The shape check runs
    /// first; a ragged value aborts construction before the flattened
    /// buffer is trusted.
    pub fn from_nested<N>(value: &N) -> Result<Self, ShapeError>
    where
        N: Nested<Leaf = T> + ?Sized,
    {
        let shape = infer_shape(value)?;
        Self::new(shape, flatten(value))
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// The elements in row-major order.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn into_parts(self) -> (Shape, Vec<T>) {
        (self.shape, self.data)
    }

    /// Row-major coordinate lookup. `None` if the number of coordinates
    /// does not match the rank or any coordinate is out of range.
    pub fn get(&self, coords: &[usize]) -> Option<&T> {
        if coords.len() != self.shape.num_dim() {
            return None;
        }
        let strides = self.shape.strides();
        let mut offset = 0;
        for (coord, size, stride) in izip!(coords, self.shape.sizes(), &strides) {
            if coord >= size {
                return None;
            }
            offset += coord * stride;
        }
        self.data.get(offset)
    }
}

impl<T: Clone> Array<T> {
    /// Build an array from a runtime-tagged value. As with
    /// [`Array::from_nested`], a ragged or mixed value aborts construction.
    pub fn from_value(value: &NestedValue<T>) -> Result<Self, ShapeError> {
        let shape = value.shape()?;
        Self::new(shape, value.flatten())
    }
}
