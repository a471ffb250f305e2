use crate::error::Error;
use crate::ffi::utils::cpp;

type Result<T> = std::result::Result<T, Error>;

/// TensorRT logging message severity.
///
/// Variants are ordered from most to least severe, which matches the integer values TensorRT uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// An internal error has occurred. Execution is unrecoverable.
    InternalError,
    /// An application error has occurred.
    Error,
    /// An application error has been discovered, but TensorRT has recovered or fallen back to a default.
    Warning,
    /// Informational messages with instructional information.
    Info,
    /// Verbose messages with debugging information.
    Verbose,
    /// A severity code was provided by TensorRT that was not recognized.
    Unknown,
}

impl Severity {
    /// Raw TensorRT severity value.
    pub fn as_i32(self) -> i32 {
        match self {
            Severity::InternalError => 0,
            Severity::Error => 1,
            Severity::Warning => 2,
            Severity::Info => 3,
            Severity::Verbose => 4,
            Severity::Unknown => i32::MAX,
        }
    }
}

impl From<i32> for Severity {
    /// Convert from raw log level integer to [`Severity`].
    fn from(value: i32) -> Self {
        match value {
            0 => Severity::InternalError,
            1 => Severity::Error,
            2 => Severity::Warning,
            3 => Severity::Info,
            4 => Severity::Verbose,
            _ => Severity::Unknown,
        }
    }
}

/// Logger that receives diagnostics from TensorRT objects and forwards them to `tracing`.
///
/// Every [`crate::Builder`], [`crate::Parser`] and [`crate::Runtime`] is created with a logger.
/// Wrap it in an [`std::sync::Arc`] and pass the same instance to all of them, so that errors
/// reported by any of those objects can be retrieved through [`Logger::last_error_message`].
///
/// [TensorRT documentation](https://docs.nvidia.com/deeplearning/tensorrt/api/c_api/classnvinfer1_1_1_i_logger.html)
pub struct Logger(*mut std::ffi::c_void);

/// Implements [`Send`] for [`Logger`].
///
/// # Safety
///
/// TensorRT requires loggers to be thread-safe. The last error is guarded by a mutex on the C++
/// side and the minimum severity never changes after construction.
unsafe impl Send for Logger {}

/// Implements [`Sync`] for [`Logger`].
///
/// # Safety
///
/// See the [`Send`] implementation.
unsafe impl Sync for Logger {}

impl Logger {
    /// Create a new [`Logger`].
    ///
    /// # Arguments
    ///
    /// * `min_severity` - Messages less severe than this are dropped before they reach `tracing`.
    pub fn new(min_severity: Severity) -> Result<Self> {
        let min_severity = min_severity.as_i32();
        let internal = cpp!(unsafe [
            min_severity as "std::int32_t"
        ] -> *mut std::ffi::c_void as "void*" {
            return new (std::nothrow) ForwardingLogger(min_severity);
        });
        if internal.is_null() {
            return Err(Error::TensorRt {
                message: "failed to allocate logger".to_string(),
            });
        }
        Ok(Logger(internal))
    }

    /// Get the last error message logged by TensorRT through this logger.
    ///
    /// Returns `"unknown error"` when nothing has been logged yet.
    pub fn last_error_message(&self) -> String {
        let internal = self.as_ptr();
        // SAFETY: This is safe because first, we copy the error out of the logger, which is
        // thread-safe, and then we take ownership of the string before destroying it on the C++
        // side.
        let error_boxed_ptr = cpp!(unsafe [
            internal as "const void*"
        ] -> *mut std::ffi::c_void as "void*" {
            const std::string lastError = ((ForwardingLogger*) internal)->getLastError();
            const char* lastErrorCstr = lastError.c_str();
            void* lastErrorPtr = rust!(ForwardingLogger_takeLastError [
                lastErrorCstr : *const std::os::raw::c_char as "const char*"
            ] -> *mut std::ffi::c_void as "void*" {
                let error_boxed = Box::new(
                    std::ffi::CStr::from_ptr(lastErrorCstr)
                        .to_string_lossy()
                        .into_owned()
                );
                Box::into_raw(error_boxed) as *mut std::ffi::c_void
            });
            return lastErrorPtr;
        });
        // SAFETY: This is safe because we boxed the error ourselves earlier and used
        // `Box::into_raw` to get this pointer.
        let error = *unsafe { Box::from_raw(error_boxed_ptr as *mut String) };
        if !error.is_empty() {
            error
        } else {
            "unknown error".to_string()
        }
    }

    /// Forget the last recorded error message.
    pub fn clear_last_error(&self) {
        let internal = self.as_ptr();
        cpp!(unsafe [
            internal as "const void*"
        ] {
            ((ForwardingLogger*) internal)->clearLastError();
        });
    }

    /// Create a TensorRT error from the last error recorded by this logger.
    #[inline]
    pub(crate) fn last_error(&self) -> Error {
        Error::TensorRt {
            message: self.last_error_message(),
        }
    }

    /// Get internal readonly pointer.
    #[inline]
    pub fn as_ptr(&self) -> *const std::ffi::c_void {
        let Logger(internal) = *self;
        internal
    }

    /// Get internal mutable pointer.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut std::ffi::c_void {
        let Logger(internal) = *self;
        internal
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        let internal = self.as_mut_ptr();
        cpp!(unsafe [
            internal as "void*"
        ] {
            release((ForwardingLogger*) internal);
        });
    }
}
