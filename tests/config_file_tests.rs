use as112d::config::DnsConfig;
use as112d::error::ConfigError;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_load_config_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
bind_addr = "0.0.0.0:53"
tcp_backlog = 128
max_concurrent_queries = 500
tcp_idle_timeout_secs = 30
log_level = "debug"
"#
    )
    .unwrap();

    let config = DnsConfig::from_file(file.path()).unwrap();
    assert_eq!(config.bind_addr, "0.0.0.0:53".parse().unwrap());
    assert_eq!(config.tcp_backlog, 128);
    assert_eq!(config.max_concurrent_queries, 500);
    assert_eq!(config.tcp_idle_timeout_secs, 30);
    assert_eq!(config.log_level, "debug");
    assert!(config.validate().is_ok());
}

#[test]
fn test_empty_file_gives_defaults() {
    let file = NamedTempFile::new().unwrap();
    let config = DnsConfig::from_file(file.path()).unwrap();
    assert_eq!(config, DnsConfig::default());
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");
    assert!(matches!(
        DnsConfig::from_file(&path),
        Err(ConfigError::File(_))
    ));
}

#[test]
fn test_malformed_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "tcp_backlog = \"lots\"").unwrap();
    assert!(matches!(
        DnsConfig::from_file(file.path()),
        Err(ConfigError::ParseError(_))
    ));
}

#[test]
fn test_env_layer_over_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "tcp_backlog = 20\nlog_level = \"warn\"").unwrap();

    let mut config = DnsConfig::from_file(file.path()).unwrap();
    config
        .apply_env(|key| match key {
            "AS112_TCP_BACKLOG" => Some("40".to_string()),
            _ => None,
        })
        .unwrap();

    assert_eq!(config.tcp_backlog, 40);
    assert_eq!(config.log_level, "warn");
}
