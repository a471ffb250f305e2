use crate::ffi::utils::cpp;

/// Oldest TensorRT release whose API this crate is written against.
pub const MIN_SUPPORTED_VERSION: Version = Version::new(8, 5, 0);

/// A TensorRT release version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Version {
            major,
            minor,
            patch,
        }
    }

    /// Decode the integer returned by `getInferLibVersion`.
    ///
    /// TensorRT 8 and older encode the version as `major * 1000 + minor * 100 + patch`. TensorRT 10
    /// switched to `major * 10000 + minor * 100 + patch`.
    pub fn from_encoded(encoded: u32) -> Self {
        let major = if encoded >= 10_000 {
            encoded / 10_000
        } else {
            encoded / 1_000
        };
        let rest = if encoded >= 10_000 {
            encoded % 10_000
        } else {
            encoded % 1_000
        };
        Version::new(major, rest / 100, rest % 100)
    }

    /// Whether this crate can drive this TensorRT release.
    ///
    /// The wrappers use the TensorRT 8 API, which was reworked in later major releases.
    pub fn is_supported(&self) -> bool {
        self.major == MIN_SUPPORTED_VERSION.major && *self >= MIN_SUPPORTED_VERSION
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Version of the TensorRT library loaded at runtime.
///
/// This can differ from the headers the crate was compiled against when the shared library is
/// swapped out underneath the binary.
///
/// [TensorRT documentation](https://docs.nvidia.com/deeplearning/tensorrt/api/c_api/_nv_infer_runtime_8h.html)
pub fn library_version() -> Version {
    let encoded = cpp!(unsafe [] -> i32 as "std::int32_t" {
        return getInferLibVersion();
    });
    Version::from_encoded(encoded.max(0) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_tensorrt_8_version() {
        assert_eq!(Version::from_encoded(8601), Version::new(8, 6, 1));
        assert_eq!(Version::from_encoded(8205), Version::new(8, 2, 5));
        assert_eq!(Version::from_encoded(7103), Version::new(7, 1, 3));
    }

    #[test]
    fn test_decode_tensorrt_10_version() {
        assert_eq!(Version::from_encoded(100_001), Version::new(10, 0, 1));
        assert_eq!(Version::from_encoded(100_300), Version::new(10, 3, 0));
    }

    #[test]
    fn test_supported_versions() {
        assert!(!Version::new(7, 2, 3).is_supported());
        assert!(!Version::new(8, 4, 3).is_supported());
        assert!(Version::new(8, 5, 0).is_supported());
        assert!(Version::new(8, 6, 1).is_supported());
    }

    #[test]
    fn test_newer_major_versions_unsupported() {
        assert!(!Version::new(9, 0, 0).is_supported());
        assert!(!Version::from_encoded(100_300).is_supported());
    }

    #[test]
    fn test_display() {
        assert_eq!(Version::new(8, 6, 1).to_string(), "8.6.1");
    }

    #[test]
    fn test_library_version_is_supported() {
        assert!(library_version().is_supported());
    }
}
