use std::sync::Arc;

use crate::ffi::builder_config::BuilderConfig;
use crate::ffi::logger::Logger;
use crate::ffi::memory::HostBuffer;
use crate::ffi::network::NetworkDefinition;
use crate::ffi::profile::OptimizationProfile;
use crate::ffi::result;
use crate::ffi::utils::cpp;

type Result<T> = std::result::Result<T, crate::error::Error>;

/// Builds an engine from a network definition.
///
/// [TensorRT documentation](https://docs.nvidia.com/deeplearning/tensorrt/api/c_api/classnvinfer1_1_1_i_builder.html)
pub struct Builder {
    internal: *mut std::ffi::c_void,
    logger: Arc<Logger>,
}

/// Implements [`Send`] for [`Builder`].
///
/// # Safety
///
/// The TensorRT API is thread-safe with regards to all operations on [`Builder`].
unsafe impl Send for Builder {}

/// Implements [`Sync`] for [`Builder`].
///
/// # Safety
///
/// The TensorRT API is thread-safe with regards to all operations on [`Builder`].
unsafe impl Sync for Builder {}

impl Builder {
    /// Create a new [`Builder`].
    ///
    /// [TensorRT documentation](https://docs.nvidia.com/deeplearning/tensorrt/api/c_api/namespacenvinfer1_1_1anonymous__namespace_02_nv_infer_8h_03.html)
    ///
    /// # Arguments
    ///
    /// * `logger` - Logger that receives diagnostics of the builder and everything it creates.
    pub fn new(logger: &Arc<Logger>) -> Result<Self> {
        let logger_internal = logger.as_ptr();
        let internal = cpp!(unsafe [
            logger_internal as "const void*"
        ] -> *mut std::ffi::c_void as "void*" {
            return createInferBuilder(*((ForwardingLogger*) logger_internal));
        });
        result!(
            internal,
            Builder {
                internal,
                logger: logger.clone(),
            },
            logger
        )
    }

    /// Create a new optimization profile.
    ///
    /// The profile is owned by the builder. Fill in the shapes of all dynamic inputs, then hand it
    /// to [`BuilderConfig::add_optimization_profile`].
    ///
    /// [TensorRT documentation](https://docs.nvidia.com/deeplearning/tensorrt/api/c_api/classnvinfer1_1_1_i_builder.html#a68a8b59fbf86e42762b7087e6ffe6fb4)
    pub fn optimization_profile(&mut self) -> Result<OptimizationProfile<'_>> {
        let internal = self.as_mut_ptr();
        let optimization_profile_internal = cpp!(unsafe [
            internal as "void*"
        ] -> *mut std::ffi::c_void as "void*" {
            return ((IBuilder*) internal)->createOptimizationProfile();
        });
        result!(
            optimization_profile_internal,
            OptimizationProfile::wrap(optimization_profile_internal, self.logger.clone()),
            self.logger
        )
    }

    /// Create a builder configuration object.
    ///
    /// [TensorRT documentation](https://docs.nvidia.com/deeplearning/tensorrt/api/c_api/classnvinfer1_1_1_i_builder.html#a8fac4203e688430dff87483fc9db6bf2)
    ///
    /// # Return value
    ///
    /// A [`BuilderConfig`] that can later be passed to `build_serialized_network`.
    pub fn config(&mut self) -> Result<BuilderConfig> {
        let internal = self.as_mut_ptr();
        let config_internal = cpp!(unsafe [
            internal as "void*"
        ] -> *mut std::ffi::c_void as "void*" {
            return ((IBuilder*) internal)->createBuilderConfig();
        });
        result!(
            config_internal,
            BuilderConfig::wrap(config_internal, self.logger.clone()),
            self.logger
        )
    }

    /// Create an explicit-batch network definition object, the only kind the ONNX parser accepts.
    ///
    /// [TensorRT documentation](https://docs.nvidia.com/deeplearning/tensorrt/api/c_api/classnvinfer1_1_1_i_builder.html#a853122d044b70383b2c9ebe7fdf11e07)
    pub fn network_definition(&mut self) -> Result<NetworkDefinition> {
        let internal = self.as_mut_ptr();
        let network_internal = cpp!(unsafe [
            internal as "void*"
        ] -> *mut std::ffi::c_void as "void*" {
            const std::uint32_t flags =
                1U << static_cast<std::uint32_t>(NetworkDefinitionCreationFlag::kEXPLICIT_BATCH);
            return ((IBuilder*) internal)->createNetworkV2(flags);
        });
        result!(
            network_internal,
            NetworkDefinition::wrap(network_internal),
            self.logger
        )
    }

    /// Builds and serializes a network for the provided [`crate::NetworkDefinition`] and
    /// [`BuilderConfig`].
    ///
    /// This blocks for as long as TensorRT needs to optimize the network, which can be minutes for
    /// large models.
    ///
    /// [TensorRT documentation](https://docs.nvidia.com/deeplearning/tensorrt/api/c_api/classnvinfer1_1_1_i_builder.html#ab25ed4aec280df7d64e82930aa6b41c7)
    ///
    /// # Arguments
    ///
    /// * `network_definition` - Network definition.
    /// * `config` - Builder configuration.
    ///
    /// # Return value
    ///
    /// The serialized plan, or `None` if TensorRT did not produce one. The reason, if any, has been
    /// logged and is available through [`Logger::last_error_message`].
    pub fn build_serialized_network(
        &mut self,
        network_definition: &mut NetworkDefinition,
        config: BuilderConfig,
    ) -> Option<HostBuffer> {
        let internal = self.as_mut_ptr();
        let internal_network_definition = network_definition.as_mut_ptr();
        let internal_builder_config = config.as_ptr();
        let plan_internal = cpp!(unsafe [
            internal as "void*",
            internal_network_definition as "void*",
            internal_builder_config as "const void*"
        ] -> *mut std::ffi::c_void as "void*" {
            return ((IBuilder*) internal)->buildSerializedNetwork(
                *((INetworkDefinition*) internal_network_definition),
                *((IBuilderConfig*) internal_builder_config)
            );
        });
        if plan_internal.is_null() {
            None
        } else {
            Some(HostBuffer::wrap(plan_internal))
        }
    }

    /// Determine whether the platform has fast native FP16.
    ///
    /// [TensorRT documentation](https://docs.nvidia.com/deeplearning/tensorrt/api/c_api/classnvinfer1_1_1_i_builder.html#a6e42dd3ecb449ba54ffb823685a7ac47)
    pub fn platform_has_fast_fp16(&self) -> bool {
        let internal = self.as_ptr();
        cpp!(unsafe [
            internal as "const void*"
        ] -> bool as "bool" {
            return ((const IBuilder*) internal)->platformHasFastFp16();
        })
    }

    /// Get internal readonly pointer.
    #[inline]
    pub fn as_ptr(&self) -> *const std::ffi::c_void {
        let Builder { internal, .. } = *self;
        internal
    }

    /// Get internal mutable pointer.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut std::ffi::c_void {
        let Builder { internal, .. } = *self;
        internal
    }
}

impl Drop for Builder {
    fn drop(&mut self) {
        let internal = self.as_mut_ptr();
        cpp!(unsafe [
            internal as "void*"
        ] {
            release((IBuilder*) internal);
        });
    }
}
