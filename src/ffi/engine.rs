use crate::ffi::dims::Dims;
use crate::ffi::memory::HostBuffer;
use crate::ffi::result;
use crate::ffi::runtime::Runtime;
use crate::ffi::utils::cpp;

type Result<T> = std::result::Result<T, crate::error::Error>;

/// A compiled network, ready to be serialized or executed.
///
/// The engine keeps the [`Runtime`] that deserialized it alive.
///
/// [TensorRT documentation](https://docs.nvidia.com/deeplearning/tensorrt/api/c_api/classnvinfer1_1_1_i_cuda_engine.html)
pub struct Engine {
    internal: *mut std::ffi::c_void,
    runtime: Runtime,
}

/// Implements [`Send`] for [`Engine`].
///
/// # Safety
///
/// The TensorRT API is thread-safe with regards to all operations on [`Engine`].
unsafe impl Send for Engine {}

/// Implements [`Sync`] for [`Engine`].
///
/// # Safety
///
/// The TensorRT API is thread-safe with regards to all operations on [`Engine`].
unsafe impl Sync for Engine {}

impl Engine {
    #[inline]
    pub(crate) fn wrap(internal: *mut std::ffi::c_void, runtime: Runtime) -> Self {
        Engine { internal, runtime }
    }

    /// Serialize the engine.
    ///
    /// [TensorRT documentation](https://docs.nvidia.com/deeplearning/tensorrt/api/c_api/classnvinfer1_1_1_i_cuda_engine.html#ab42c2fde3292f557ed17aae6f332e571)
    ///
    /// # Return value
    ///
    /// A [`HostBuffer`] that contains the serialized engine.
    pub fn serialize(&self) -> Result<HostBuffer> {
        let internal = self.as_ptr();
        let internal_buffer = cpp!(unsafe [
            internal as "const void*"
        ] -> *mut std::ffi::c_void as "void*" {
            return (void*) ((const ICudaEngine*) internal)->serialize();
        });
        result!(
            internal_buffer,
            HostBuffer::wrap(internal_buffer),
            self.runtime.logger()
        )
    }

    /// Get the number of IO tensors.
    ///
    /// [TensorRT documentation](https://docs.nvidia.com/deeplearning/tensorrt/api/c_api/classnvinfer1_1_1_i_cuda_engine.html#af2018924cbea2fa84808040e60c58405)
    pub fn num_io_tensors(&self) -> usize {
        let internal = self.as_ptr();
        let num_io_tensors = cpp!(unsafe [
            internal as "const void*"
        ] -> std::os::raw::c_int as "int" {
            return ((const ICudaEngine*) internal)->getNbIOTensors();
        });
        num_io_tensors.max(0) as usize
    }

    /// Retrieve the name of an IO tensor.
    ///
    /// [TensorRT documentation](https://docs.nvidia.com/deeplearning/tensorrt/api/c_api/classnvinfer1_1_1_i_cuda_engine.html#a0b1e9e3f82724be40f0ab74742deaf92)
    ///
    /// # Arguments
    ///
    /// * `io_tensor_index` - IO tensor index.
    pub fn io_tensor_name(&self, io_tensor_index: usize) -> String {
        let internal = self.as_ptr();
        let io_tensor_index = io_tensor_index as std::os::raw::c_int;
        let io_tensor_name_ptr = cpp!(unsafe [
            internal as "const void*",
            io_tensor_index as "int"
        ] -> *const std::os::raw::c_char as "const char*" {
            return ((const ICudaEngine*) internal)->getIOTensorName(io_tensor_index);
        });
        if io_tensor_name_ptr.is_null() {
            return String::new();
        }

        // SAFETY: This is safe because:
        // * The pointer is valid because we just got it from TensorRT.
        // * The pointer isn't kept after this block (we copy the string instead).
        unsafe {
            std::ffi::CStr::from_ptr(io_tensor_name_ptr)
                .to_string_lossy()
                .to_string()
        }
    }

    /// Get the shape of a tensor. Dimensions that are only known at execution time are `-1`.
    ///
    /// [TensorRT documentation](https://docs.nvidia.com/deeplearning/tensorrt/api/c_api/classnvinfer1_1_1_i_cuda_engine.html#af96a2ee402ab47b7e0b7f0becb63d693)
    ///
    /// # Arguments
    ///
    /// * `tensor_name` - Tensor name.
    pub fn tensor_shape(&self, tensor_name: &str) -> Vec<i32> {
        let Ok(tensor_name_cstr) = std::ffi::CString::new(tensor_name) else {
            return Vec::new();
        };
        let internal = self.as_ptr();
        let tensor_name_ptr = tensor_name_cstr.as_ptr();
        let tensor_dimensions = cpp!(unsafe [
            internal as "const void*",
            tensor_name_ptr as "const char*"
        ] -> Dims as "Dims32" {
            return ((const ICudaEngine*) internal)->getTensorShape(tensor_name_ptr);
        });
        tensor_dimensions.to_vec()
    }

    /// Get the IO mode of a tensor.
    ///
    /// [TensorRT documentation](https://docs.nvidia.com/deeplearning/tensorrt/api/c_api/classnvinfer1_1_1_i_cuda_engine.html#ae236a14178df506070cd39a9ef3775e7)
    ///
    /// # Arguments
    ///
    /// * `tensor_name` - Tensor name.
    pub fn tensor_io_mode(&self, tensor_name: &str) -> TensorIoMode {
        let Ok(tensor_name_cstr) = std::ffi::CString::new(tensor_name) else {
            return TensorIoMode::None;
        };
        let internal = self.as_ptr();
        let tensor_name_ptr = tensor_name_cstr.as_ptr();
        let tensor_io_mode = cpp!(unsafe [
            internal as "const void*",
            tensor_name_ptr as "const char*"
        ] -> i32 as "std::int32_t" {
            return (std::int32_t) ((const ICudaEngine*) internal)->getTensorIOMode(tensor_name_ptr);
        });
        TensorIoMode::from_i32(tensor_io_mode)
    }

    /// Name, IO mode and shape of every IO tensor, in binding order.
    pub fn io_tensors(&self) -> Vec<(String, TensorIoMode, Vec<i32>)> {
        (0..self.num_io_tensors())
            .map(|index| {
                let name = self.io_tensor_name(index);
                let mode = self.tensor_io_mode(&name);
                let shape = self.tensor_shape(&name);
                (name, mode, shape)
            })
            .collect()
    }

    /// Get internal readonly pointer.
    #[inline]
    pub fn as_ptr(&self) -> *const std::ffi::c_void {
        let Engine { internal, .. } = *self;
        internal
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        let Engine { internal, .. } = *self;
        cpp!(unsafe [
            internal as "void*"
        ] {
            release((ICudaEngine*) internal);
        });
    }
}

/// Tensor IO mode.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TensorIoMode {
    None,
    Input,
    Output,
}

impl TensorIoMode {
    /// Create [`TensorIoMode`] from `value`.
    ///
    /// # Arguments
    ///
    /// * `value` - Integer representation of IO mode.
    fn from_i32(value: i32) -> Self {
        match value {
            1 => TensorIoMode::Input,
            2 => TensorIoMode::Output,
            _ => TensorIoMode::None,
        }
    }
}

impl std::fmt::Display for TensorIoMode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            TensorIoMode::None => write!(f, "none"),
            TensorIoMode::Input => write!(f, "input"),
            TensorIoMode::Output => write!(f, "output"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::tests::utils::*;

    #[test]
    fn test_engine_serialize() {
        let engine = fixed_engine!();
        let serialized_engine = engine.serialize().unwrap();
        let serialized_engine_bytes = serialized_engine.as_bytes();
        assert!(!serialized_engine_bytes.is_empty());
        assert_eq!(&serialized_engine_bytes[..4], b"ftrt");
    }

    #[test]
    fn test_engine_tensor_info() {
        let engine = fixed_engine!();
        assert_eq!(engine.num_io_tensors(), 2);
        assert_eq!(engine.io_tensor_name(0), "input");
        assert_eq!(engine.io_tensor_name(1), "output");
        assert_eq!(engine.tensor_io_mode("input"), TensorIoMode::Input);
        assert_eq!(engine.tensor_io_mode("output"), TensorIoMode::Output);
        assert_eq!(engine.tensor_shape("input"), &[1, 3, 32, 32]);
        assert_eq!(engine.tensor_shape("output"), &[1, 3, 32, 32]);
    }

    #[test]
    fn test_engine_unknown_tensor() {
        let engine = fixed_engine!();
        assert_eq!(engine.tensor_io_mode("missing"), TensorIoMode::None);
    }

    #[test]
    fn test_tensor_io_mode_from_i32() {
        assert_eq!(TensorIoMode::from_i32(0), TensorIoMode::None);
        assert_eq!(TensorIoMode::from_i32(1), TensorIoMode::Input);
        assert_eq!(TensorIoMode::from_i32(2), TensorIoMode::Output);
        assert_eq!(TensorIoMode::Output.to_string(), "output");
    }
}
