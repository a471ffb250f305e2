/// Maximum number of dimensions TensorRT supports for a tensor.
pub const MAX_DIMS: usize = 8;

/// Internal representation of the `Dims32` struct in TensorRT.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[allow(non_snake_case)]
pub(crate) struct Dims {
    pub nbDims: i32,
    pub d: [i32; MAX_DIMS],
}

impl Dims {
    /// Build [`Dims`] from a shape.
    ///
    /// Returns `None` when the shape has more than [`MAX_DIMS`] dimensions.
    pub fn from_slice(shape: &[i32]) -> Option<Self> {
        if shape.len() > MAX_DIMS {
            return None;
        }
        let mut d = [0; MAX_DIMS];
        d[..shape.len()].copy_from_slice(shape);
        Some(Dims {
            nbDims: shape.len() as i32,
            d,
        })
    }

    /// Dimensions as a vector. A value of `-1` marks a dynamic dimension.
    ///
    /// TensorRT uses `nbDims == -1` for invalid dimensions, which turns into an empty vector.
    pub fn to_vec(&self) -> Vec<i32> {
        let len = self.nbDims.clamp(0, MAX_DIMS as i32) as usize;
        self.d[..len].to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dims_from_slice() {
        let dims = Dims::from_slice(&[4, 3, 300, 300]).unwrap();
        assert_eq!(dims.nbDims, 4);
        assert_eq!(dims.to_vec(), vec![4, 3, 300, 300]);
    }

    #[test]
    fn test_dims_too_many() {
        assert!(Dims::from_slice(&[1; 9]).is_none());
    }

    #[test]
    fn test_dims_invalid_is_empty() {
        let dims = Dims {
            nbDims: -1,
            d: [0; MAX_DIMS],
        };
        assert!(dims.to_vec().is_empty());
    }
}
