use thiserror::Error;

/// Zone catalog errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ZoneError {
    /// Record template could not be parsed
    #[error("Invalid record: {0}")]
    InvalidRecord(String),
    /// Invalid domain name
    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),
    /// Record type not usable in a canned zone
    #[error("Invalid resource record type: {0}")]
    InvalidRRType(String),
    /// Catalog index outside the served zones
    #[error("Zone index out of range: {0}")]
    IndexOutOfRange(usize),
}

pub type Result<T> = std::result::Result<T, ZoneError>;
