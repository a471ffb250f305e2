// The order of these includes is important due to the nature of how the `cpp` crate works. We want
// the C++ includes, helpers and the logger class to be emitted first or the wrappers below will not
// compile.
#[rustfmt::skip]
mod pre {
    mod includes;
    mod helpers;
    mod logger;
}

mod utils;

pub mod builder;
pub mod builder_config;
pub mod dims;
pub mod engine;
pub mod logger;
pub mod memory;
pub mod network;
pub mod parser;
pub mod plugins;
pub mod profile;
pub mod runtime;
pub mod version;

/// Convenience macro for turning a TensorRT object pointer into a `std::result::Result`.
///
/// TensorRT signals failure by returning a null pointer and logging the reason. The error message
/// is taken from the [`crate::Logger`] that was handed to the object that failed.
///
/// # Usage
///
/// There are two possible uses of the macro:
///
/// (1) Shorthand to return `Ok(something)` or the most recent error of `logger`:
///
/// ```ignore
/// result!(ptr, return_value, logger);
/// ```
///
/// (2) Shorthand to return `Ok(())` or the most recent error of `logger`:
///
/// ```ignore
/// result!(ptr, logger)
/// ```
macro_rules! result {
    ($ptr:expr, $ok:expr, $logger:expr) => {
        if !$ptr.is_null() {
            Ok($ok)
        } else {
            Err($logger.last_error())
        }
    };
    ($ptr:expr, $logger:expr) => {
        result!($ptr, (), $logger)
    };
}

use result;
