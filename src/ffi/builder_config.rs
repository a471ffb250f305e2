use std::sync::Arc;

use crate::ffi::logger::Logger;
use crate::ffi::profile::OptimizationProfile;
use crate::ffi::utils::cpp;

type Result<T> = std::result::Result<T, crate::error::Error>;

/// Holds properties for configuring a builder to produce an engine.
///
/// [TensorRT documentation](https://docs.nvidia.com/deeplearning/tensorrt/api/c_api/classnvinfer1_1_1_i_builder_config.html)
pub struct BuilderConfig {
    internal: *mut std::ffi::c_void,
    logger: Arc<Logger>,
}

/// Implements [`Send`] for [`BuilderConfig`].
///
/// # Safety
///
/// The TensorRT API is thread-safe with regards to all operations on [`BuilderConfig`].
unsafe impl Send for BuilderConfig {}

/// Implements [`Sync`] for [`BuilderConfig`].
///
/// # Safety
///
/// The TensorRT API is thread-safe with regards to all operations on [`BuilderConfig`].
unsafe impl Sync for BuilderConfig {}

impl BuilderConfig {
    /// Wrap internal pointer as [`BuilderConfig`].
    ///
    /// # Safety
    ///
    /// The pointer must point to a valid `IBuilderConfig` object.
    pub(crate) fn wrap(internal: *mut std::ffi::c_void, logger: Arc<Logger>) -> Self {
        Self { internal, logger }
    }

    /// Set the maximum workspace size.
    ///
    /// [TensorRT documentation](https://docs.nvidia.com/deeplearning/tensorrt/api/c_api/classnvinfer1_1_1_i_builder_config.html#a8209999988ab480c60c8a905dfd2654d)
    ///
    /// # Arguments
    ///
    /// * `size` - The maximum GPU scratch memory the builder may use for any single layer, in
    ///   bytes.
    pub fn with_max_workspace_size(mut self, size: usize) -> Self {
        let internal = self.as_mut_ptr();
        cpp!(unsafe [
            internal as "void*",
            size as "std::size_t"
        ] {
            ((IBuilderConfig*) internal)->setMemoryPoolLimit(MemoryPoolType::kWORKSPACE, size);
        });
        self
    }

    /// Get the workspace memory pool limit in bytes.
    ///
    /// [TensorRT documentation](https://docs.nvidia.com/deeplearning/tensorrt/api/c_api/classnvinfer1_1_1_i_builder_config.html)
    pub fn max_workspace_size(&self) -> usize {
        let internal = self.as_ptr();
        cpp!(unsafe [
            internal as "const void*"
        ] -> usize as "std::size_t" {
            return ((const IBuilderConfig*) internal)->getMemoryPoolLimit(MemoryPoolType::kWORKSPACE);
        })
    }

    /// Set the `kFP16` flag.
    ///
    /// [TensorRT documentation for `setFlag`](https://docs.nvidia.com/deeplearning/tensorrt/api/c_api/classnvinfer1_1_1_i_builder_config.html#ac9821504ae7a11769e48b0e62761837e)
    /// [TensorRT documentation for `kFP16`](https://docs.nvidia.com/deeplearning/tensorrt/api/c_api/namespacenvinfer1.html#abdc74c40fe7a0c3d05d2caeccfbc29c1a56e4ef5e47a48568bd24c4e0aaabcead)
    pub fn with_fp16(mut self) -> Self {
        let internal = self.as_mut_ptr();
        cpp!(unsafe [
            internal as "void*"
        ] {
            ((IBuilderConfig*) internal)->setFlag(BuilderFlag::kFP16);
        });
        self
    }

    /// Whether the `kFP16` flag is set.
    pub fn fp16(&self) -> bool {
        let internal = self.as_ptr();
        cpp!(unsafe [
            internal as "const void*"
        ] -> bool as "bool" {
            return ((const IBuilderConfig*) internal)->getFlag(BuilderFlag::kFP16);
        })
    }

    /// Add an optimization profile. Networks with dynamic inputs need at least one.
    ///
    /// [TensorRT documentation](https://docs.nvidia.com/deeplearning/tensorrt/api/c_api/classnvinfer1_1_1_i_builder_config.html)
    ///
    /// # Return value
    ///
    /// Index of the profile, or an error when TensorRT considers the profile invalid.
    pub fn add_optimization_profile(&mut self, profile: OptimizationProfile<'_>) -> Result<usize> {
        let internal = self.as_mut_ptr();
        let profile_internal = profile.as_ptr();
        let index = cpp!(unsafe [
            internal as "void*",
            profile_internal as "const void*"
        ] -> std::os::raw::c_int as "int" {
            return ((IBuilderConfig*) internal)->addOptimizationProfile(
                (const IOptimizationProfile*) profile_internal
            );
        });
        if index >= 0 {
            Ok(index as usize)
        } else {
            Err(self.logger.last_error())
        }
    }

    /// Number of optimization profiles added so far.
    pub fn num_optimization_profiles(&self) -> usize {
        let internal = self.as_ptr();
        let num = cpp!(unsafe [
            internal as "const void*"
        ] -> std::os::raw::c_int as "int" {
            return ((const IBuilderConfig*) internal)->getNbOptimizationProfiles();
        });
        num.max(0) as usize
    }

    /// Get internal readonly pointer.
    #[inline]
    pub fn as_ptr(&self) -> *const std::ffi::c_void {
        let BuilderConfig { internal, .. } = *self;
        internal
    }

    /// Get internal mutable pointer.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut std::ffi::c_void {
        let BuilderConfig { internal, .. } = *self;
        internal
    }
}

impl Drop for BuilderConfig {
    fn drop(&mut self) {
        let internal = self.as_mut_ptr();
        cpp!(unsafe [
            internal as "void*"
        ] {
            release((IBuilderConfig*) internal);
        });
    }
}
