//! Value parsers for CLI arguments that go beyond what clap checks itself.

use std::fs;
use std::path::PathBuf;

/// Upper bound for `token --hours`: thirty days
const MAX_TOKEN_HOURS: i64 = 24 * 30;

/// Validate port number is within valid range (1-65535)
pub fn validate_port(port_str: &str) -> Result<u16, String> {
    let port: u16 = port_str.parse().map_err(|_| {
        format!(
            "Port must be a valid number between 1 and 65535, got: '{}'",
            port_str
        )
    })?;

    if port == 0 {
        return Err("Port must be between 1 and 65535. Port 0 is not allowed.".to_string());
    }

    Ok(port)
}

/// Validate that a file path exists, is a file, and is readable
pub fn validate_config_file_path(path_str: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(path_str);

    if !path.exists() {
        return Err(format!("Configuration file does not exist: '{}'", path_str));
    }

    if !path.is_file() {
        return Err(format!("Configuration path is not a file: '{}'", path_str));
    }

    fs::File::open(&path)
        .map(|_| path)
        .map_err(|e| format!("Cannot read configuration file '{}': {}", path_str, e))
}

/// Basic host validation: non-empty, no spaces, at most 253 characters,
/// and dotted-decimal values must be valid IPv4.
pub fn validate_host_address(host_str: &str) -> Result<String, String> {
    let host = host_str.trim();

    if host.is_empty() {
        return Err("Host address cannot be empty".to_string());
    }

    if host.contains(' ') {
        return Err("Host address cannot contain spaces".to_string());
    }

    if host.len() > 253 {
        return Err("Host address is too long (maximum 253 characters)".to_string());
    }

    if host.chars().all(|c| c.is_ascii_digit() || c == '.')
        && host.parse::<std::net::Ipv4Addr>().is_err()
    {
        return Err(format!("Invalid IPv4 address format: '{}'", host_str));
    }

    Ok(host.to_string())
}

/// Token lifetime in hours, between 1 and 720
pub fn validate_token_hours(hours_str: &str) -> Result<i64, String> {
    let hours: i64 = hours_str
        .parse()
        .map_err(|_| format!("Hours must be a positive number, got: '{}'", hours_str))?;

    if !(1..=MAX_TOKEN_HOURS).contains(&hours) {
        return Err(format!(
            "Hours must be between 1 and {}, got: {}",
            MAX_TOKEN_HOURS, hours
        ));
    }

    Ok(hours)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_validation() {
        for port_str in ["1", "80", "3000", "65535"] {
            assert!(validate_port(port_str).is_ok(), "Port {} should be valid", port_str);
        }
        for port_str in ["0", "65536", "abc", "-1", ""] {
            assert!(validate_port(port_str).is_err(), "Port {} should be invalid", port_str);
        }
    }

    #[test]
    fn test_host_validation_valid_hosts() {
        let valid_hosts = [
            "localhost",
            "127.0.0.1",
            "0.0.0.0",
            "10.0.0.1",
            "courses.internal",
        ];

        for host in valid_hosts {
            assert!(validate_host_address(host).is_ok(), "Host {} should be valid", host);
        }
    }

    #[test]
    fn test_host_validation_invalid_hosts() {
        let too_long = "x".repeat(300);
        let invalid_hosts = ["", "   ", "host with spaces", "999.999.999.999", too_long.as_str()];

        for host in invalid_hosts {
            assert!(validate_host_address(host).is_err(), "Host '{}' should be invalid", host);
        }
    }

    #[test]
    fn test_config_file_path() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(validate_config_file_path(file.path().to_str().unwrap()).is_ok());

        let dir = tempfile::tempdir().unwrap();
        assert!(validate_config_file_path(dir.path().to_str().unwrap()).is_err());
        assert!(validate_config_file_path("/definitely/not/here.toml").is_err());
    }

    #[test]
    fn test_token_hours() {
        assert_eq!(validate_token_hours("8"), Ok(8));
        assert!(validate_token_hours("0").is_err());
        assert!(validate_token_hours("721").is_err());
        assert!(validate_token_hours("soon").is_err());
    }
}
