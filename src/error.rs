use thiserror::Error;

use crate::dns::ParseError;
use crate::zone::ZoneError;

#[derive(Error, Debug)]
pub enum DnsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid DNS packet: {0}")]
    Parse(#[from] ParseError),

    #[error("Zone error: {0}")]
    Zone(#[from] ZoneError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, DnsError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid bind address: {0}")]
    InvalidBindAddress(String),

    #[error("Invalid TCP backlog: {0}")]
    InvalidBacklog(String),

    #[error("Invalid max concurrent queries: {0}")]
    InvalidConcurrency(String),

    #[error("Invalid timeout: {0}")]
    InvalidTimeout(String),

    #[error("Configuration file error: {0}")]
    File(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),
}
