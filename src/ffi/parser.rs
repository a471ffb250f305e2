use std::sync::Arc;

use crate::error::Error;
use crate::ffi::logger::Logger;
use crate::ffi::network::NetworkDefinition;
use crate::ffi::result;
use crate::ffi::utils::cpp;

type Result<T> = std::result::Result<T, Error>;

/// For parsing an ONNX model into a TensorRT network definition ([`crate::NetworkDefinition`]).
///
/// [TensorRT documentation](https://docs.nvidia.com/deeplearning/tensorrt/api/c_api/classnvonnxparser_1_1_i_parser.html)
pub struct Parser {
    internal: *mut std::ffi::c_void,
    logger: Arc<Logger>,
}

/// Implements [`Send`] for [`Parser`].
///
/// # Safety
///
/// The parser is only reachable through the [`NetworkDefinition`] that owns it.
unsafe impl Send for Parser {}

/// Implements [`Sync`] for [`Parser`].
///
/// # Safety
///
/// The parser is only reachable through the [`NetworkDefinition`] that owns it.
unsafe impl Sync for Parser {}

impl Parser {
    /// Create new parser, parse ONNX file and return the populated [`crate::NetworkDefinition`].
    ///
    /// This function is CPU-intensive and blocks until the whole model has been parsed.
    ///
    /// [TensorRT documentation](https://docs.nvidia.com/deeplearning/tensorrt/api/c_api/classnvonnxparser_1_1_i_parser.html#a973ac2ed682f18c4c6258ed93fc8efa3)
    ///
    /// # Arguments
    ///
    /// * `network_definition` - Network definition to populate.
    /// * `path` - Path to ONNX file to parse.
    /// * `logger` - Logger that receives parser diagnostics.
    ///
    /// # Return value
    ///
    /// Parsed network definition, or [`Error::Parse`] with the errors reported by the parser.
    pub fn parse_network_definition_from_file(
        mut network_definition: NetworkDefinition,
        path: &impl AsRef<std::path::Path>,
        logger: &Arc<Logger>,
    ) -> Result<NetworkDefinition> {
        // SAFETY: The call to `Parser::new` is unsafe because we must ensure that the new parser
        // outlives `network_definition`. We manually make sure of that here by putting the parser
        // inside `NetworkDefinition` and such it will only be destroyed when `network_definition`
        // is.
        unsafe {
            let mut parser = Self::new(&mut network_definition, logger)?;
            let parsed = parser.parse_from_file(path);
            // Hand the parser over even when parsing failed, so that the network is still released
            // before the parser.
            network_definition._parser = Some(parser);
            parsed?;
        }
        Ok(network_definition)
    }

    /// Parse ONNX file.
    ///
    /// [TensorRT documentation](https://docs.nvidia.com/deeplearning/tensorrt/api/c_api/classnvonnxparser_1_1_i_parser.html#a973ac2ed682f18c4c6258ed93fc8efa3)
    ///
    /// # Arguments
    ///
    /// * `path` - Path to file to parse.
    pub fn parse_from_file(&mut self, path: &impl AsRef<std::path::Path>) -> Result<()> {
        let path = path.as_ref();
        let parse_error = |message: String| Error::Parse {
            path: path.to_path_buf(),
            message,
        };
        if !path.is_file() {
            return Err(parse_error("file does not exist".to_string()));
        }
        let path_str = path
            .to_str()
            .ok_or_else(|| parse_error("path is not valid UTF-8".to_string()))?;
        let path_ffi = std::ffi::CString::new(path_str)
            .map_err(|_| parse_error("path contains a nul byte".to_string()))?;
        let path_ptr = path_ffi.as_ptr();
        let internal = self.as_mut_ptr();
        let ret = cpp!(unsafe [
            internal as "void*",
            path_ptr as "const char*"
        ] -> bool as "bool" {
            return ((IParser*) internal)->parseFromFile(
                path_ptr,
                // Set to `VERBOSE` and let the logger decide which messages are passed on.
                static_cast<int>(ILogger::Severity::kVERBOSE)
            );
        });
        if ret {
            Ok(())
        } else {
            let errors = self.errors();
            let message = if errors.is_empty() {
                self.logger.last_error_message()
            } else {
                errors.join("; ")
            };
            Err(parse_error(message))
        }
    }

    /// Descriptions of all errors recorded by the parser so far.
    ///
    /// [TensorRT documentation](https://docs.nvidia.com/deeplearning/tensorrt/api/c_api/classnvonnxparser_1_1_i_parser.html)
    pub fn errors(&self) -> Vec<String> {
        let internal = self.as_ptr();
        let num_errors = cpp!(unsafe [
            internal as "const void*"
        ] -> std::os::raw::c_int as "int" {
            return ((const IParser*) internal)->getNbErrors();
        });
        (0..num_errors)
            .map(|index| {
                let description = cpp!(unsafe [
                    internal as "const void*",
                    index as "int"
                ] -> *const std::os::raw::c_char as "const char*" {
                    const IParserError* error = ((const IParser*) internal)->getError(index);
                    return error != nullptr ? error->desc() : nullptr;
                });
                if description.is_null() {
                    return String::new();
                }
                // SAFETY: The description is owned by the parser, which outlives this call, and
                // it is copied right away.
                unsafe {
                    std::ffi::CStr::from_ptr(description)
                        .to_string_lossy()
                        .to_string()
                }
            })
            .filter(|description| !description.is_empty())
            .collect()
    }

    /// Create new parser.
    ///
    /// # Arguments
    ///
    /// * `network_definition` - Network definition to attach to parser.
    /// * `logger` - Logger for parser diagnostics.
    ///
    /// # Safety
    ///
    /// Caller must ensure that the [`Parser`] outlives the given [`NetworkDefinition`].
    unsafe fn new(network_definition: &mut NetworkDefinition, logger: &Arc<Logger>) -> Result<Self> {
        let network_definition_internal = network_definition.as_mut_ptr();
        let logger_internal = logger.as_ptr();
        let internal = cpp!(unsafe [
            network_definition_internal as "void*",
            logger_internal as "const void*"
        ] -> *mut std::ffi::c_void as "void*" {
            return createParser(
                *((INetworkDefinition*) network_definition_internal),
                *((ForwardingLogger*) logger_internal)
            );
        });
        result!(
            internal,
            Parser {
                internal,
                logger: logger.clone(),
            },
            logger
        )
    }

    /// Get internal readonly pointer.
    #[inline]
    pub fn as_ptr(&self) -> *const std::ffi::c_void {
        let Parser { internal, .. } = *self;
        internal
    }

    /// Get internal mutable pointer.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut std::ffi::c_void {
        let Parser { internal, .. } = *self;
        internal
    }
}

impl Drop for Parser {
    fn drop(&mut self) {
        let internal = self.as_mut_ptr();
        cpp!(unsafe [
            internal as "void*"
        ] {
            release((IParser*) internal);
        });
    }
}
