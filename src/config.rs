use crate::error::ConfigError;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DnsConfig {
    /// Address for both the UDP socket and the TCP listener
    pub bind_addr: SocketAddr,

    /// Pending-connection backlog for the TCP listener
    pub tcp_backlog: u32,

    /// Max number of queries handled concurrently across both transports
    pub max_concurrent_queries: usize,

    /// Idle TCP connections are closed after this many seconds
    pub tcp_idle_timeout_secs: u64,

    /// Default tracing filter, used when RUST_LOG is unset
    pub log_level: String,
}

impl Default for DnsConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 5053)),
            tcp_backlog: 10,
            max_concurrent_queries: 10000,
            tcp_idle_timeout_secs: 10,
            log_level: "info".to_string(),
        }
    }
}

impl DnsConfig {
    pub fn tcp_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.tcp_idle_timeout_secs)
    }

    /// Load a TOML file; keys not present keep their defaults
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::File(format!("{}: {}", path.display(), e)))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Apply `AS112_*` overrides. `lookup` is the environment accessor, so
    /// tests can supply values without touching the process environment.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind_addr) = lookup("AS112_BIND_ADDR") {
            self.bind_addr = bind_addr
                .parse()
                .map_err(|_| ConfigError::InvalidBindAddress(bind_addr))?;
        }

        if let Some(backlog) = lookup("AS112_TCP_BACKLOG") {
            self.tcp_backlog = backlog
                .parse::<u32>()
                .map_err(|_| ConfigError::InvalidBacklog(backlog))?;
        }

        if let Some(max_concurrent) = lookup("AS112_MAX_CONCURRENT_QUERIES") {
            self.max_concurrent_queries = max_concurrent
                .parse::<usize>()
                .map_err(|_| ConfigError::InvalidConcurrency(max_concurrent))?;
        }

        if let Some(timeout) = lookup("AS112_TCP_IDLE_TIMEOUT") {
            self.tcp_idle_timeout_secs = timeout
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidTimeout(timeout))?;
        }

        if let Some(log_level) = lookup("AS112_LOG_LEVEL") {
            if !log_level.is_empty() {
                self.log_level = log_level;
            }
        }

        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tcp_backlog == 0 {
            return Err(ConfigError::InvalidBacklog(
                "TCP backlog must be greater than 0".to_string(),
            ));
        }

        if self.max_concurrent_queries == 0 {
            return Err(ConfigError::InvalidConcurrency(
                "Max concurrent queries must be greater than 0".to_string(),
            ));
        }

        if self.tcp_idle_timeout_secs == 0 || self.tcp_idle_timeout_secs > 300 {
            return Err(ConfigError::InvalidTimeout(
                "TCP idle timeout must be between 1 and 300 seconds".to_string(),
            ));
        }

        Ok(())
    }
}
