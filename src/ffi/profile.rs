use std::sync::Arc;

use crate::error::Error;
use crate::ffi::dims::{Dims, MAX_DIMS};
use crate::ffi::logger::Logger;
use crate::ffi::utils::cpp;

type Result<T> = std::result::Result<T, Error>;

/// Shape ranges for the dynamic inputs of a network.
///
/// The profile is owned by the [`crate::Builder`] that created it and cannot outlive it.
///
/// [TensorRT documentation](https://docs.nvidia.com/deeplearning/tensorrt/api/c_api/classnvinfer1_1_1_i_optimization_profile.html)
pub struct OptimizationProfile<'builder> {
    internal: *mut std::ffi::c_void,
    logger: Arc<Logger>,
    _phantom: std::marker::PhantomData<&'builder ()>,
}

/// Selects which of the three shapes of a profile entry is set.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Selector {
    Min,
    Opt,
    Max,
}

impl<'builder> OptimizationProfile<'builder> {
    /// Wrap internal pointer as [`OptimizationProfile`].
    ///
    /// # Safety
    ///
    /// The pointer must point to a valid `IOptimizationProfile` object.
    pub(crate) fn wrap(internal: *mut std::ffi::c_void, logger: Arc<Logger>) -> Self {
        Self {
            internal,
            logger,
            _phantom: Default::default(),
        }
    }

    /// Set the minimum, optimal and maximum shape of an input tensor.
    ///
    /// [TensorRT documentation](https://docs.nvidia.com/deeplearning/tensorrt/api/c_api/classnvinfer1_1_1_i_optimization_profile.html)
    ///
    /// # Arguments
    ///
    /// * `input_name` - Name of the network input.
    /// * `min` - Smallest shape the engine accepts.
    /// * `opt` - Shape the engine is tuned for.
    /// * `max` - Largest shape the engine accepts.
    pub fn set_shape(
        &mut self,
        input_name: &str,
        min: &[i32],
        opt: &[i32],
        max: &[i32],
    ) -> Result<()> {
        let name = std::ffi::CString::new(input_name).map_err(|_| Error::TensorRt {
            message: format!("invalid tensor name `{input_name}`"),
        })?;
        self.set_dimensions(&name, Selector::Min, min)?;
        self.set_dimensions(&name, Selector::Opt, opt)?;
        self.set_dimensions(&name, Selector::Max, max)?;
        Ok(())
    }

    /// Get internal readonly pointer.
    #[inline]
    pub fn as_ptr(&self) -> *const std::ffi::c_void {
        let OptimizationProfile { internal, .. } = *self;
        internal
    }

    fn set_dimensions(
        &mut self,
        input_name: &std::ffi::CStr,
        selector: Selector,
        shape: &[i32],
    ) -> Result<()> {
        let dims = Dims::from_slice(shape).ok_or_else(|| Error::TensorRt {
            message: format!("shape {shape:?} has more than {MAX_DIMS} dimensions"),
        })?;
        let internal = self.internal;
        let name_ptr = input_name.as_ptr();
        let selector = match selector {
            Selector::Min => 0_i32,
            Selector::Opt => 1_i32,
            Selector::Max => 2_i32,
        };
        let success = cpp!(unsafe [
            internal as "void*",
            name_ptr as "const char*",
            selector as "std::int32_t",
            dims as "Dims32"
        ] -> bool as "bool" {
            return ((IOptimizationProfile*) internal)->setDimensions(
                name_ptr,
                static_cast<OptProfileSelector>(selector),
                dims
            );
        });
        if success {
            Ok(())
        } else {
            Err(self.logger.last_error())
        }
    }
}
