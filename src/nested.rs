use crate::Shape;
use crate::ShapeError;

/// Classifies a type as a nested sequence or a leaf, and exposes the two
/// traversal steps shape inference and flattening need from it.
///
/// The impl set encodes the nesting statically: scalars are leaves, and
/// `[T]`, `Vec<T>`, and `[T; N]` are sequences of any other implementor.
/// `Vec<Vec<f64>>` is therefore a two-dimensional value with `Leaf = f64`,
/// with no runtime tagging. For data whose depth is only known at runtime,
/// use [`crate::NestedValue`] instead.
pub trait Nested {
    /// The element type found at the deepest dimension.
    type Leaf;

    /// Whether values of this type are sequences (traversal recurses into
    /// their elements) or leaves (traversal stops).
    const IS_SEQUENCE: bool;

    /// Record or validate this node's extent against the shape gathered so
    /// far. `dim` is this node's depth and `index` its position within its
    /// parent, carried for diagnostics.
    fn collect_shape(
        &self,
        dim: usize,
        index: usize,
        sizes: &mut Vec<usize>,
    ) -> Result<(), ShapeError>;

    /// Append this node's leaves to `buf` in row-major order.
    fn flatten_into(&self, buf: &mut Vec<Self::Leaf>);
}

macro_rules! impl_leaf {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Nested for $ty {
                type Leaf = $ty;
                const IS_SEQUENCE: bool = false;

                fn collect_shape(
                    &self,
                    _dim: usize,
                    _index: usize,
                    _sizes: &mut Vec<usize>,
                ) -> Result<(), ShapeError> {
                    Ok(())
                }

                fn flatten_into(&self, buf: &mut Vec<$ty>) {
                    buf.push(self.clone());
                }
            }
        )*
    };
}

impl_leaf!(
    bool, char, u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64, String,
);

impl<T: Nested> Nested for [T] {
    type Leaf = T::Leaf;
    const IS_SEQUENCE: bool = true;

    fn collect_shape(
        &self,
        dim: usize,
        index: usize,
        sizes: &mut Vec<usize>,
    ) -> Result<(), ShapeError> {
        if sizes.len() == dim {
            // First sequence reached at this depth; its length becomes the
            // extent every other sequence here must match.
            sizes.push(self.len());
        } else if sizes[dim] != self.len() {
            return Err(ShapeError::Ragged {
                dim,
                index,
                expected: sizes[dim],
                found: self.len(),
            });
        }
        if T::IS_SEQUENCE {
            for (child_index, child) in self.iter().enumerate() {
                child.collect_shape(dim + 1, child_index, sizes)?;
            }
        }
        Ok(())
    }

    fn flatten_into(&self, buf: &mut Vec<T::Leaf>) {
        for child in self {
            child.flatten_into(buf);
        }
    }
}

impl<T: Nested> Nested for Vec<T> {
    type Leaf = T::Leaf;
    const IS_SEQUENCE: bool = true;

    fn collect_shape(
        &self,
        dim: usize,
        index: usize,
        sizes: &mut Vec<usize>,
    ) -> Result<(), ShapeError> {
        self.as_slice().collect_shape(dim, index, sizes)
    }

    fn flatten_into(&self, buf: &mut Vec<T::Leaf>) {
        self.as_slice().flatten_into(buf)
    }
}

impl<T: Nested, const N: usize> Nested for [T; N] {
    type Leaf = T::Leaf;
    const IS_SEQUENCE: bool = true;

    fn collect_shape(
        &self,
        dim: usize,
        index: usize,
        sizes: &mut Vec<usize>,
    ) -> Result<(), ShapeError> {
        self.as_slice().collect_shape(dim, index, sizes)
    }

    fn flatten_into(&self, buf: &mut Vec<T::Leaf>) {
        self.as_slice().flatten_into(buf)
    }
}

/// Derive the rectangular shape of a nested value, outermost dimension
/// first.
///
/// Each depth's extent is recorded the first time the traversal reaches it;
/// every other sequence at that depth must match it, otherwise the value is
/// ragged and inference fails with [`ShapeError::Ragged`] naming the
/// offending element and both lengths. A zero-length sequence truncates the
/// shape at its own level; that is not an error. Called on a bare leaf,
/// yields the empty (scalar) shape.
///
/// Recursion depth equals nesting depth, so stack use is proportional to the
/// number of dimensions.
///
/// ```
/// let v = vec![vec![1, 2], vec![3, 4]];
/// assert_eq!(ndnest::infer_shape(&v).unwrap().sizes(), &[2, 2]);
///
/// let ragged = vec![vec![1, 2], vec![3]];
/// assert!(ndnest::infer_shape(&ragged).is_err());
/// ```
pub fn infer_shape<T: Nested + ?Sized>(value: &T) -> Result<Shape, ShapeError> {
    let mut sizes = Vec::new();
    value.collect_shape(0, 0, &mut sizes)?;
    Ok(Shape::new(sizes))
}

/// Flatten a nested value into a buffer of its leaves, depth-first and
/// left-to-right, so that the innermost dimension varies fastest
/// (row-major).
///
/// Performs no raggedness validation and is total over any input the trait
/// admits: a ragged value flattens to a buffer whose length does not match
/// the product of any shape. Run [`infer_shape`] first and only trust this
/// buffer's layout if that succeeded.
///
/// ```
/// let v = vec![vec![1, 2], vec![3, 4]];
/// assert_eq!(ndnest::flatten(&v), vec![1, 2, 3, 4]);
/// ```
pub fn flatten<T: Nested + ?Sized>(value: &T) -> Vec<T::Leaf> {
    let mut buf = Vec::new();
    value.flatten_into(&mut buf);
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat() {
        let v = vec![1, 2, 3];
        assert_eq!(infer_shape(&v).unwrap().sizes(), &[3]);
        assert_eq!(flatten(&v), vec![1, 2, 3]);
    }

    #[test]
    fn test_empty() {
        let v: Vec<i32> = Vec::new();
        assert_eq!(infer_shape(&v).unwrap().sizes(), &[0]);
        assert_eq!(flatten(&v), Vec::<i32>::new());
    }

    #[test]
    fn test_two_level() {
        let v = vec![vec![1, 2], vec![3, 4]];
        assert_eq!(infer_shape(&v).unwrap().sizes(), &[2, 2]);
        assert_eq!(flatten(&v), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_three_level() {
        let v = vec![vec![vec![1], vec![2]], vec![vec![3], vec![4]]];
        assert_eq!(infer_shape(&v).unwrap().sizes(), &[2, 2, 1]);
        assert_eq!(flatten(&v), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_scalar() {
        assert_eq!(infer_shape(&7).unwrap().num_dim(), 0);
        assert_eq!(flatten(&7), vec![7]);
    }

    #[test]
    fn test_fixed_size_arrays() {
        let v = [[1, 2, 3], [4, 5, 6]];
        assert_eq!(infer_shape(&v).unwrap().sizes(), &[2, 3]);
        assert_eq!(flatten(&v), vec![1, 2, 3, 4, 5, 6]);

        let v = vec![[1, 2], [3, 4]];
        assert_eq!(infer_shape(&v).unwrap().sizes(), &[2, 2]);
    }

    #[test]
    fn test_strings() {
        let v = vec![vec!["a".to_string()], vec!["b".to_string()]];
        assert_eq!(infer_shape(&v).unwrap().sizes(), &[2, 1]);
        assert_eq!(flatten(&v), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_ragged() {
        let v = vec![vec![1, 2], vec![3]];
        assert!(matches!(
            infer_shape(&v).unwrap_err(),
            ShapeError::Ragged {
                dim: 1,
                index: 1,
                expected: 2,
                found: 1
            }
        ));
        // Flattening is still total; only the length betrays the problem.
        assert_eq!(flatten(&v).len(), 3);
    }

    #[test]
    fn test_deep_ragged() {
        // Consistent at depth 1; the raggedness hides inside the second
        // branch, which the first-child chain never reaches.
        let v = vec![vec![vec![1, 2], vec![3, 4]], vec![vec![5, 6], vec![7]]];
        assert!(matches!(
            infer_shape(&v).unwrap_err(),
            ShapeError::Ragged {
                dim: 2,
                index: 1,
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn test_ragged_across_branches() {
        // Every sequence is internally consistent; the mismatch is between
        // cousins in different branches.
        let v = vec![vec![vec![1, 2]], vec![vec![3]]];
        assert!(matches!(
            infer_shape(&v).unwrap_err(),
            ShapeError::Ragged {
                dim: 2,
                index: 0,
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn test_empty_inner() {
        let v: Vec<Vec<i32>> = vec![Vec::new(), Vec::new()];
        assert_eq!(infer_shape(&v).unwrap().sizes(), &[2, 0]);
        assert_eq!(flatten(&v), Vec::<i32>::new());
    }

    #[test]
    fn test_empty_outer_truncates() {
        // The outer sequence is empty, so no deeper levels are inspected
        // even though the element type nests further.
        let v: Vec<Vec<Vec<i32>>> = Vec::new();
        assert_eq!(infer_shape(&v).unwrap().sizes(), &[0]);
    }

    #[test]
    fn test_empty_then_nonempty_is_ragged() {
        let v: Vec<Vec<i32>> = vec![Vec::new(), vec![1]];
        assert!(matches!(
            infer_shape(&v).unwrap_err(),
            ShapeError::Ragged {
                dim: 1,
                index: 1,
                expected: 0,
                found: 1
            }
        ));
    }

    #[test]
    fn test_shape_product_matches_flatten_len() {
        let v = vec![vec![vec![1u8, 2], vec![3, 4], vec![5, 6]]; 4];
        let shape = infer_shape(&v).unwrap();
        assert_eq!(shape.sizes(), &[4, 3, 2]);
        assert_eq!(shape.num_elements(), flatten(&v).len());
    }
}
