use serde::Deserialize;
use serde::Serialize;

use crate::Shape;
use crate::ShapeError;

/// A runtime-tagged nested value, for data whose nesting depth is only
/// known once it is seen (parsed literals, decoded payloads, and the like).
///
/// Statically nested containers can skip the tag entirely; see
/// [`crate::Nested`]. Values are conveniently built with the
/// [`nested!`](crate::nested) macro.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub enum NestedValue<T> {
    Leaf(T),
    Sequence(Vec<NestedValue<T>>),
}

/// Shape recorded so far, plus the depth at which leaves live so that
/// leaf/sequence mixing within one depth is rejected.
#[derive(Default)]
struct ShapeBuilder {
    sizes: Vec<usize>,
    leaf_depth: Option<usize>,
}

impl ShapeBuilder {
    fn visit_sequence(&mut self, dim: usize, index: usize, len: usize) -> Result<(), ShapeError> {
        if self.leaf_depth.is_some_and(|leaf_depth| dim >= leaf_depth) {
            return Err(ShapeError::MixedNesting { dim, index });
        }
        if self.sizes.len() == dim {
            self.sizes.push(len);
        } else if self.sizes[dim] != len {
            return Err(ShapeError::Ragged {
                dim,
                index,
                expected: self.sizes[dim],
                found: len,
            });
        }
        Ok(())
    }

    fn visit_leaf(&mut self, dim: usize, index: usize) -> Result<(), ShapeError> {
        match self.leaf_depth {
            None if self.sizes.len() == dim => {
                self.leaf_depth = Some(dim);
                Ok(())
            }
            Some(leaf_depth) if leaf_depth == dim => Ok(()),
            _ => Err(ShapeError::MixedNesting { dim, index }),
        }
    }
}

impl<T> NestedValue<T> {
    /// Whether this node is a sequence (traversal recurses into its
    /// elements) or a leaf.
    pub fn is_sequence(&self) -> bool {
        matches!(self, NestedValue::Sequence(_))
    }

    /// Derive the rectangular shape of this value, outermost dimension
    /// first.
    ///
    /// Same contract as [`crate::infer_shape`], with one addition the tag
    /// makes possible: all values at a given depth must share a variant, and
    /// a `Leaf` among `Sequence`s (or vice versa) fails with
    /// [`ShapeError::MixedNesting`].
    pub fn shape(&self) -> Result<Shape, ShapeError> {
        let mut builder = ShapeBuilder::default();
        self.walk_shape(0, 0, &mut builder)?;
        Ok(Shape::new(builder.sizes))
    }

    fn walk_shape(
        &self,
        dim: usize,
        index: usize,
        builder: &mut ShapeBuilder,
    ) -> Result<(), ShapeError> {
        match self {
            NestedValue::Leaf(_) => builder.visit_leaf(dim, index),
            NestedValue::Sequence(children) => {
                builder.visit_sequence(dim, index, children.len())?;
                for (child_index, child) in children.iter().enumerate() {
                    child.walk_shape(dim + 1, child_index, builder)?;
                }
                Ok(())
            }
        }
    }
}

impl<T: Clone> NestedValue<T> {
    /// Flatten this value into a buffer of its leaves, depth-first and
    /// left-to-right (row-major). Performs no raggedness validation; run
    /// [`NestedValue::shape`] first and only trust this buffer's layout if
    /// that succeeded.
    pub fn flatten(&self) -> Vec<T> {
        let mut buf = Vec::new();
        self.flatten_into(&mut buf);
        buf
    }

    fn flatten_into(&self, buf: &mut Vec<T>) {
        match self {
            NestedValue::Leaf(value) => buf.push(value.clone()),
            NestedValue::Sequence(children) => {
                for child in children {
                    child.flatten_into(buf);
                }
            }
        }
    }
}

/// Construct a [`NestedValue`] from a bracketed literal.
///
/// Each leaf inside brackets must be a single token tree; parenthesize
/// compound expressions such as negative literals.
///
/// ```
/// let v = ndnest::nested!([[1, 2], [3, 4]]);
/// assert_eq!(v.shape().unwrap().sizes(), &[2, 2]);
/// assert_eq!(v.flatten(), vec![1, 2, 3, 4]);
/// ```
#[macro_export]
macro_rules! nested {
    ([ $( $elem:tt ),* $(,)? ]) => {
        $crate::NestedValue::Sequence(vec![ $( $crate::nested!($elem) ),* ])
    };
    ($leaf:expr) => {
        $crate::NestedValue::Leaf($leaf)
    };
}
