use crate::error::Error;

/// Number of color channels the engine input is expected to have.
pub const INPUT_CHANNELS: i32 = 3;

/// Numeric precision used for computation in the compiled engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Precision {
    /// 32-bit floating point.
    #[default]
    Float32,
    /// 16-bit floating point. TensorRT may still fall back to 32 bits for individual layers.
    Float16,
}

impl Precision {
    /// Width of the floating point type in bits.
    pub fn bits(self) -> u32 {
        match self {
            Precision::Float32 => 32,
            Precision::Float16 => 16,
        }
    }
}

impl TryFrom<u32> for Precision {
    type Error = Error;

    fn try_from(bits: u32) -> Result<Self, Self::Error> {
        match bits {
            32 => Ok(Precision::Float32),
            16 => Ok(Precision::Float16),
            other => Err(Error::InvalidPrecision(other.to_string())),
        }
    }
}

impl std::str::FromStr for Precision {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .map_err(|_| Error::InvalidPrecision(s.to_string()))
            .and_then(Precision::try_from)
    }
}

impl std::fmt::Display for Precision {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.bits())
    }
}

/// Options the TensorRT builder is configured with.
///
/// # Example
///
/// ```
/// use trt_builder::{BuildConfig, Precision};
///
/// let config = BuildConfig::default()
///     .with_precision(Precision::Float16)
///     .with_batch_size(4)
///     .with_input_size(512, 512);
/// assert_eq!(config.input_shape(), [4, 3, 512, 512]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    pub precision: Precision,
    /// Maximum batch size the engine accepts.
    pub batch_size: u32,
    /// Scratch memory limit for the builder, in megabytes.
    pub workspace_mb: u64,
    /// Input width in pixels.
    pub width: u32,
    /// Input height in pixels.
    pub height: u32,
}

impl Default for BuildConfig {
    fn default() -> Self {
        BuildConfig {
            precision: Precision::Float32,
            batch_size: 1,
            workspace_mb: 1024,
            width: 300,
            height: 300,
        }
    }
}

impl BuildConfig {
    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_batch_size(mut self, batch_size: u32) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_workspace_mb(mut self, workspace_mb: u64) -> Self {
        self.workspace_mb = workspace_mb;
        self
    }

    pub fn with_input_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Check that every field is within range before any TensorRT object is created.
    pub fn validate(&self) -> Result<(), Error> {
        if self.batch_size == 0 {
            return Err(Error::InvalidConfig("batch size must be at least 1"));
        }
        if self.workspace_mb == 0 {
            return Err(Error::InvalidConfig("workspace size must be at least 1 MB"));
        }
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidConfig("model width and height must be at least 1"));
        }
        let fits = |value: u32| i32::try_from(value).is_ok();
        if !fits(self.batch_size) || !fits(self.width) || !fits(self.height) {
            return Err(Error::InvalidConfig("dimension does not fit in a TensorRT shape"));
        }
        Ok(())
    }

    /// Workspace limit in bytes.
    pub fn workspace_bytes(&self) -> usize {
        let bytes = self.workspace_mb.saturating_mul(1 << 20);
        usize::try_from(bytes).unwrap_or(usize::MAX)
    }

    /// Expected input shape `[batch, channels, width, height]`.
    ///
    /// The width is the first spatial axis and the height the second, which is the order models
    /// for this tool are exported with.
    ///
    /// Only meaningful after [`BuildConfig::validate`] succeeded.
    pub fn input_shape(&self) -> [i32; 4] {
        [
            self.batch_size as i32,
            INPUT_CHANNELS,
            self.width as i32,
            self.height as i32,
        ]
    }
}
