//! Configuration module for the ordini service.
//!
//! This module provides structures and utilities for managing service
//! configuration. It supports loading configuration from TOML files,
//! resolving `${VAR}` environment variable references, and validating that
//! all required values are properly set.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Extract just the message without the huge input dump
		ConfigError::Parse(err.message().to_string())
	}
}

/// Main configuration structure for the ordini service.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Configuration for the HTTP server.
	#[serde(default)]
	pub server: ServerConfig,
	/// Configuration for the storage backend.
	pub storage: StorageConfig,
}

/// Configuration for the HTTP server.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
	/// Host address to bind the server to.
	#[serde(default = "default_host")]
	pub host: String,
	/// Port to bind the server to.
	#[serde(default = "default_port")]
	pub port: u16,
	/// Directory of storefront pages served on non-API paths.
	/// When absent, static page delivery is disabled.
	#[serde(default)]
	pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
	fn default() -> Self {
		Self {
			host: default_host(),
			port: default_port(),
			static_dir: None,
		}
	}
}

/// Returns the default server host.
fn default_host() -> String {
	"127.0.0.1".to_string()
}

/// Returns the default server port.
fn default_port() -> u16 {
	5000
}

/// Configuration for the storage backend.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
	/// Which implementation to use as primary.
	pub primary: String,
	/// Map of storage implementation names to their configurations.
	/// Each implementation has its own format stored as raw TOML values.
	#[serde(default)]
	pub implementations: HashMap<String, toml::Value>,
}

/// Resolves environment variables in a string.
///
/// Replaces `${VAR_NAME}` with the value of the environment variable
/// VAR_NAME. Supports default values with `${VAR_NAME:-default_value}`.
fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;

	let mut result = input.to_string();
	let mut replacements = Vec::new();

	for cap in re.captures_iter(input) {
		let full_match = cap.get(0).ok_or_else(|| {
			ConfigError::Parse("Malformed environment variable reference".into())
		})?;
		let var_name = &cap[1];
		let default_value = cap.get(2).map(|m| m.as_str());

		let value = match std::env::var(var_name) {
			Ok(v) => v,
			Err(_) => match default_value {
				Some(default) => default.to_string(),
				None => {
					return Err(ConfigError::Validation(format!(
						"Environment variable '{}' not found",
						var_name
					)))
				},
			},
		};

		replacements.push((full_match.start(), full_match.end(), value));
	}

	// Apply replacements in reverse order to maintain positions
	for (start, end, value) in replacements.iter().rev() {
		result.replace_range(start..end, value);
	}

	Ok(result)
}

impl Config {
	/// Loads configuration from a TOML file.
	pub fn from_file(path: &str) -> Result<Self, ConfigError> {
		let content = std::fs::read_to_string(path)?;
		resolve_env_vars(&content)?.parse()
	}

	/// Loads configuration from a TOML file without blocking the runtime.
	pub async fn from_file_async(path: &str) -> Result<Self, ConfigError> {
		let content = tokio::fs::read_to_string(path).await?;
		resolve_env_vars(&content)?.parse()
	}

	/// Validates the configuration to ensure all required fields are set.
	fn validate(&self) -> Result<(), ConfigError> {
		if self.storage.primary.is_empty() {
			return Err(ConfigError::Validation(
				"Storage primary implementation cannot be empty".into(),
			));
		}
		if self.storage.implementations.is_empty() {
			return Err(ConfigError::Validation(
				"At least one storage implementation must be configured".into(),
			));
		}
		if !self
			.storage
			.implementations
			.contains_key(&self.storage.primary)
		{
			return Err(ConfigError::Validation(format!(
				"Primary storage '{}' not found in implementations",
				self.storage.primary
			)));
		}
		if self.server.host.is_empty() {
			return Err(ConfigError::Validation(
				"Server host cannot be empty".into(),
			));
		}
		Ok(())
	}
}

impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let config: Config = toml::from_str(s)?;
		config.validate()?;
		Ok(config)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use tempfile::tempdir;

	const MINIMAL: &str = r#"
[storage]
primary = "file"

[storage.implementations.file]
path = "./data"
"#;

	#[test]
	fn test_minimal_config_uses_server_defaults() {
		let config: Config = MINIMAL.parse().unwrap();
		assert_eq!(config.server.host, "127.0.0.1");
		assert_eq!(config.server.port, 5000);
		assert!(config.server.static_dir.is_none());
		assert_eq!(config.storage.primary, "file");
	}

	#[test]
	fn test_explicit_server_section() {
		let content = format!(
			r#"
[server]
host = "0.0.0.0"
port = 8080
static_dir = "./static"
{}"#,
			MINIMAL
		);
		let config: Config = content.parse().unwrap();
		assert_eq!(config.server.host, "0.0.0.0");
		assert_eq!(config.server.port, 8080);
		assert_eq!(config.server.static_dir, Some(PathBuf::from("./static")));
	}

	#[test]
	fn test_unknown_primary_is_rejected() {
		let content = r#"
[storage]
primary = "redis"

[storage.implementations.file]
"#;
		let result = content.parse::<Config>();
		assert!(matches!(result, Err(ConfigError::Validation(_))));
	}

	#[test]
	fn test_missing_storage_section_is_parse_error() {
		let result = "[server]\nport = 1".parse::<Config>();
		assert!(matches!(result, Err(ConfigError::Parse(_))));
	}

	#[test]
	fn test_env_var_resolution_with_default() {
		let content = r#"
[server]
host = "${ORDINI_TEST_UNSET_HOST:-0.0.0.0}"

[storage]
primary = "memory"

[storage.implementations.memory]
"#;
		let resolved = resolve_env_vars(content).unwrap();
		let config: Config = resolved.parse().unwrap();
		assert_eq!(config.server.host, "0.0.0.0");
	}

	#[test]
	fn test_unset_env_var_without_default_fails() {
		let result = resolve_env_vars("host = \"${ORDINI_TEST_DEFINITELY_UNSET}\"");
		assert!(matches!(result, Err(ConfigError::Validation(_))));
	}

	#[tokio::test]
	async fn test_from_file_async() {
		let dir = tempdir().unwrap();
		let path = dir.path().join("config.toml");
		std::fs::write(&path, MINIMAL).unwrap();

		let config = Config::from_file_async(path.to_str().unwrap())
			.await
			.unwrap();
		assert_eq!(config.storage.primary, "file");
	}

	#[test]
	fn test_from_file_missing_is_io_error() {
		let result = Config::from_file("/definitely/not/here.toml");
		assert!(matches!(result, Err(ConfigError::Io(_))));
	}
}
