use crate::ffi::logger::Severity;
use crate::ffi::utils::cpp;

cpp! {{
    #ifndef TRT_BUILDER_FFI_LOGGER
    #define TRT_BUILDER_FFI_LOGGER

    // Every TensorRT object needs an `ILogger`. Each instance of this class is owned by one
    // `trt_builder::Logger` on the Rust side and handed to the builders, parsers and runtimes that
    // were created with it.
    class ForwardingLogger : public ILogger
    {
    public:
        explicit ForwardingLogger(std::int32_t minSeverity) : m_minSeverity(minSeverity) {}

        // Invoked by TensorRT for every log message.
        void log(Severity severity, const char* msg) noexcept override {
            // Errors are always recorded, regardless of the minimum severity, so that failed
            // calls can still be turned into a meaningful error message.
            if (severity == Severity::kERROR || severity == Severity::kINTERNAL_ERROR) {
                std::lock_guard<std::mutex> _lastErrorGuard(m_lastErrorMutex);
                m_lastError = std::string(msg);
            }
            std::int32_t severity_val = static_cast<std::int32_t>(severity);
            if (severity_val > m_minSeverity) {
                return;
            }
            rust!(ForwardingLogger_handleLogMessage [
                severity_val : i32 as "std::int32_t",
                msg : *const std::os::raw::c_char as "const char*"
            ] {
                handle_log_message_raw(severity_val, msg);
            });
        }

        const std::string getLastError() {
            std::lock_guard<std::mutex> _lastErrorGuard(m_lastErrorMutex);
            return m_lastError;
        }

        void clearLastError() {
            std::lock_guard<std::mutex> _lastErrorGuard(m_lastErrorMutex);
            m_lastError.clear();
        }
    private:
        const std::int32_t m_minSeverity;
        std::mutex m_lastErrorMutex {};
        std::string m_lastError = "";
    };

    #endif // TRT_BUILDER_FFI_LOGGER
}}

/// Raw handler for log messages.
///
/// This function redirects logging to `tracing` under the `tensorrt` target:
/// * `InternalError` and `Error` become `error`.
/// * `Warning` becomes `warn`.
/// * `Info` becomes `debug`.
/// * `Verbose` becomes `trace`.
///
/// # Safety
///
/// The caller must ensure that the message in `msg` is a valid pointer to a C string.
#[allow(dead_code)]
unsafe fn handle_log_message_raw(severity: i32, msg: *const std::os::raw::c_char) {
    let msg_c_str: &std::ffi::CStr = std::ffi::CStr::from_ptr(msg);
    let msg = msg_c_str.to_str().unwrap_or("");
    if msg.is_empty() {
        return;
    }
    match Severity::from(severity) {
        Severity::InternalError | Severity::Error => {
            tracing::error!(target: "tensorrt", "{msg}");
        }
        Severity::Warning => {
            tracing::warn!(target: "tensorrt", "{msg}");
        }
        Severity::Info => {
            tracing::debug!(target: "tensorrt", "{msg}");
        }
        Severity::Verbose => {
            tracing::trace!(target: "tensorrt", "{msg}");
        }
        Severity::Unknown => {}
    }
}
