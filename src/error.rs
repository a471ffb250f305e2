use crate::ffi::version::Version;

/// An error that occurred while building, saving or loading an engine.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// TensorRT error described by error message.
    #[error("{message}")]
    TensorRt { message: String },
    /// The ONNX parser rejected the model.
    #[error("failed to parse model `{}`: {message}", path.display())]
    Parse {
        path: std::path::PathBuf,
        message: String,
    },
    /// The network does not have exactly one input tensor.
    #[error("model has {0} input tensors, expected exactly one")]
    InputCount(usize),
    /// The network input shape cannot be reconciled with the requested shape.
    #[error("input tensor `{name}` has shape {declared:?}, expected {expected:?}")]
    InputMismatch {
        name: String,
        declared: Vec<i32>,
        expected: Vec<i32>,
    },
    /// The network does not mark any output tensor.
    #[error("model does not declare any output tensors")]
    NoOutputs,
    /// Precision selector other than 16 or 32.
    #[error("unsupported precision `{0}` (expected 32 or 16)")]
    InvalidPrecision(String),
    /// Build configuration has a value outside of its valid range.
    #[error("invalid build configuration: {0}")]
    InvalidConfig(&'static str),
    /// The TensorRT library loaded at runtime is too old.
    #[error("TensorRT {found} is not supported (requires {required} or a newer 8.x release)")]
    UnsupportedVersion { found: Version, required: Version },
    /// Reading or writing an engine file failed.
    #[error("I/O error on `{}`: {source}", path.display())]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Wrap an I/O error together with the path it happened on.
    pub(crate) fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}
