use thiserror::Error;

/// Errors raised while building names or decoding wire-format record data
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DnsError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Buffer too small: need {need} bytes, have {have} bytes")]
    BufferTooSmall { need: usize, have: usize },

    #[error("Invalid label length: {0}")]
    InvalidLabelLength(usize),

    #[error("DNS name too long")]
    NameTooLong,

    #[error("Compressed name in uncompressed record data")]
    CompressedName,
}

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid validity period: {0}")]
    InvalidValidityPeriod(String),

    #[error("Invalid TTL: {0}")]
    InvalidTtl(String),

    #[error("Invalid seed length: {0}")]
    InvalidSeedLength(String),

    #[error("Invalid DS digest type: {0}")]
    InvalidDigestType(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DnsError>;
