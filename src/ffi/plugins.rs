use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::error::Error;
use crate::ffi::logger::Logger;
use crate::ffi::utils::cpp;

type Result<T> = std::result::Result<T, Error>;

/// Logger the plugin library was initialized with. TensorRT keeps a pointer to it for the rest of
/// the process, so it is never released.
static PLUGIN_LOGGER: OnceCell<Arc<Logger>> = OnceCell::new();

/// Register the standard TensorRT plugins (`libnvinfer_plugin`) with the plugin registry.
///
/// Only the first call does any work; later calls return immediately, even if they pass a
/// different logger.
///
/// [TensorRT documentation](https://docs.nvidia.com/deeplearning/tensorrt/api/c_api/_nv_infer_plugin_8h.html)
///
/// # Arguments
///
/// * `logger` - Logger for plugin diagnostics.
pub fn init_plugins(logger: &Arc<Logger>) -> Result<()> {
    PLUGIN_LOGGER
        .get_or_try_init(|| {
            let logger_internal = logger.as_ptr();
            let success = cpp!(unsafe [
                logger_internal as "const void*"
            ] -> bool as "bool" {
                return initLibNvInferPlugins((ForwardingLogger*) logger_internal, "");
            });
            if success {
                tracing::debug!("registered TensorRT plugins");
                Ok(logger.clone())
            } else {
                Err(logger.last_error())
            }
        })
        .map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::tests::utils::*;

    #[test]
    fn test_init_plugins_is_idempotent() {
        let logger = test_logger!();
        init_plugins(&logger).unwrap();
        init_plugins(&logger).unwrap();
        let other_logger = test_logger!();
        init_plugins(&other_logger).unwrap();
    }
}
