use std::sync::Arc;

use crate::ffi::engine::Engine;
use crate::ffi::logger::Logger;
use crate::ffi::memory::HostBuffer;
use crate::ffi::result;
use crate::ffi::utils::cpp;

type Result<T> = std::result::Result<T, crate::error::Error>;

/// Allows a serialized engine to be deserialized.
///
/// [TensorRT documentation](https://docs.nvidia.com/deeplearning/tensorrt/api/c_api/classnvinfer1_1_1_i_runtime.html)
pub struct Runtime {
    internal: *mut std::ffi::c_void,
    logger: Arc<Logger>,
}

/// Implements [`Send`] for [`Runtime`].
///
/// # Safety
///
/// The TensorRT API is thread-safe with regards to all operations on [`Runtime`].
unsafe impl Send for Runtime {}

/// Implements [`Sync`] for [`Runtime`].
///
/// # Safety
///
/// The TensorRT API is thread-safe with regards to all operations on [`Runtime`].
unsafe impl Sync for Runtime {}

impl Runtime {
    /// Create a new [`Runtime`].
    ///
    /// # Arguments
    ///
    /// * `logger` - Logger that receives diagnostics of the runtime and its engines.
    pub fn new(logger: &Arc<Logger>) -> Result<Self> {
        let logger_internal = logger.as_ptr();
        let internal = cpp!(unsafe [
            logger_internal as "const void*"
        ] -> *mut std::ffi::c_void as "void*" {
            return createInferRuntime(*((ForwardingLogger*) logger_internal));
        });
        result!(
            internal,
            Runtime {
                internal,
                logger: logger.clone(),
            },
            logger
        )
    }

    /// Deserialize engine from a plan (a [`HostBuffer`]).
    ///
    /// The runtime is moved into the engine, because it must outlive it.
    ///
    /// [TensorRT documentation](https://docs.nvidia.com/deeplearning/tensorrt/api/c_api/classnvinfer1_1_1_i_runtime.html#ad0dc765e77cab99bfad901e47216a767)
    ///
    /// # Arguments
    ///
    /// * `plan` - Plan to deserialize from.
    pub fn deserialize_engine_from_plan(self, plan: &HostBuffer) -> Result<Engine> {
        self.deserialize_engine(plan.as_bytes())
    }

    /// Deserialize engine from a slice buffer.
    ///
    /// [TensorRT documentation](https://docs.nvidia.com/deeplearning/tensorrt/api/c_api/classnvinfer1_1_1_i_runtime.html#ad0dc765e77cab99bfad901e47216a767)
    ///
    /// # Arguments
    ///
    /// * `buffer` - Buffer slice to read from.
    pub fn deserialize_engine(mut self, buffer: &[u8]) -> Result<Engine> {
        let internal = self.as_mut_ptr();
        let buffer_ptr = buffer.as_ptr() as *const std::ffi::c_void;
        let buffer_size = buffer.len();
        // SAFETY: Since we have a reference to the slice for the duration of this call, we know
        // the pointer will be and remain valid until TensorRT returns.
        let internal_engine = cpp!(unsafe [
            internal as "void*",
            buffer_ptr as "const void*",
            buffer_size as "std::size_t"
        ] -> *mut std::ffi::c_void as "void*" {
            return ((IRuntime*) internal)->deserializeCudaEngine(buffer_ptr, buffer_size);
        });
        let logger = self.logger.clone();
        result!(internal_engine, Engine::wrap(internal_engine, self), logger)
    }

    /// Logger this runtime was created with.
    #[inline]
    pub fn logger(&self) -> &Arc<Logger> {
        &self.logger
    }

    /// Get internal readonly pointer.
    #[inline]
    pub fn as_ptr(&self) -> *const std::ffi::c_void {
        let Runtime { internal, .. } = *self;
        internal
    }

    /// Get internal mutable pointer.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut std::ffi::c_void {
        let Runtime { internal, .. } = *self;
        internal
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        let internal = self.as_mut_ptr();
        cpp!(unsafe [
            internal as "void*"
        ] {
            release((IRuntime*) internal);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::error::Error;
    use crate::tests::utils::*;

    #[test]
    fn test_deserialize_engine_from_plan() {
        let (logger, plan) = fixed_network_plan_with_logger!();
        let runtime = Runtime::new(&logger).unwrap();
        assert!(runtime.deserialize_engine_from_plan(&plan).is_ok());
    }

    #[test]
    fn test_deserialize_corrupt_engine() {
        let logger = test_logger!();
        let runtime = Runtime::new(&logger).unwrap();
        let result = runtime.deserialize_engine(&[0xde, 0xad, 0xbe, 0xef, 0x00, 0x01, 0x02, 0x03]);
        assert!(matches!(result, Err(Error::TensorRt { .. })));
    }
}
