//! Error types for every stage of a render

use std::fmt;
use std::path::PathBuf;

/// Main error type for all render operations
#[derive(Debug)]
pub enum SweaterError {
    /// Requested texture kind has no catalog entry
    ConfigNotFound {
        /// The texture kind or label that was looked up
        kind: String,
    },

    /// Source asset could not be parsed
    Decode {
        /// Human-readable reference to the asset (path or embedded asset name)
        asset: String,
        /// Underlying image decoding error
        source: image::ImageError,
    },

    /// Target dimensions or render scale are unusable
    Scale {
        /// Requested target width
        width: u32,
        /// Requested target height
        height: u32,
        /// Why the request was rejected
        reason: String,
    },

    /// Scaled source exceeds the pixel budget
    ///
    /// Rendering cost grows with width × height × tile area, so large sources
    /// are rejected before any per-pixel work.
    PixelBudgetExceeded {
        /// Maximum number of source pixels allowed
        limit: u64,
        /// Pixel count of the request
        actual: u64,
    },

    /// Encoding the final artifact failed
    Encode {
        /// Output format being produced
        format: &'static str,
        /// Description of the failure
        reason: String,
    },

    /// Render parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl SweaterError {
    /// Whether the error is an expected limit the end user should simply be told about
    pub const fn is_user_facing(&self) -> bool {
        matches!(self, Self::PixelBudgetExceeded { .. })
    }
}

impl fmt::Display for SweaterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigNotFound { kind } => {
                write!(f, "No texture configuration found for '{kind}'")
            }
            Self::Decode { asset, source } => {
                write!(f, "Failed to decode image '{asset}': {source}")
            }
            Self::Scale {
                width,
                height,
                reason,
            } => {
                write!(f, "Cannot scale to {width}x{height}: {reason}")
            }
            Self::PixelBudgetExceeded { limit, actual } => {
                write!(
                    f,
                    "Image has {actual} pixels but at most {limit} are allowed; choose a smaller size"
                )
            }
            Self::Encode { format, reason } => {
                write!(f, "Failed to encode {format} output: {reason}")
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for SweaterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Decode { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for render results
pub type Result<T> = std::result::Result<T, SweaterError>;

impl From<image::ImageError> for SweaterError {
    fn from(err: image::ImageError) -> Self {
        Self::Decode {
            asset: "<unknown>".to_string(),
            source: err,
        }
    }
}

impl From<std::io::Error> for SweaterError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> SweaterError {
    SweaterError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create an encoding error
pub fn encode_error(format: &'static str, reason: &impl ToString) -> SweaterError {
    SweaterError::Encode {
        format,
        reason: reason.to_string(),
    }
}
