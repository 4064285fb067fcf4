use std::fmt;

#[derive(Debug)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (threshold out of range, empty prefix, etc.).
    ConfigValidation(String),
    /// A model-token pattern failed to compile or has no capture group.
    InvalidPattern { pattern: String, reason: String },
    /// Input file could not be parsed as the requested format.
    DataFormat { format: String, message: String },
    /// IO error (file read, etc.).
    Io(String),
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::InvalidPattern { pattern, reason } => {
                write!(f, "invalid model pattern '{pattern}': {reason}")
            }
            Self::DataFormat { format, message } => {
                write!(f, "cannot parse {format} input: {message}")
            }
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}

impl ReconError {
    pub(crate) fn data_format(format: impl fmt::Display, message: impl Into<String>) -> Self {
        Self::DataFormat {
            format: format.to_string(),
            message: message.into(),
        }
    }
}
