#![recursion_limit = "256"]

pub mod config;
pub mod convert;
pub mod error;
pub mod ffi;

#[cfg(test)]
mod tests;

pub use config::{BuildConfig, Precision};
pub use convert::{build_engine, load_engine, save_engine};
pub use error::Error;
pub use ffi::builder::Builder;
pub use ffi::builder_config::BuilderConfig;
pub use ffi::engine::{Engine, TensorIoMode};
pub use ffi::logger::{Logger, Severity};
pub use ffi::memory::HostBuffer;
pub use ffi::network::{NetworkDefinition, Tensor};
pub use ffi::parser::Parser;
pub use ffi::profile::OptimizationProfile;
pub use ffi::runtime::Runtime;
pub use ffi::version::{library_version, Version};
