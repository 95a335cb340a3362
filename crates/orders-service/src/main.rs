//! Main entry point for the ordini order service.
//!
//! This binary wires the durable order store to its HTTP surface: it parses
//! command-line arguments, initializes logging, loads configuration, builds
//! the configured storage backend and serves the API (plus the storefront
//! pages when a static directory is configured) until interrupted.

use clap::Parser;
use orders_config::Config;
use orders_core::OrderStore;
use orders_storage::implementations::{file, memory};
use orders_storage::{StorageFactory, StorageService};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

mod server;

/// Command-line arguments for the order service.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	// Initialize tracing with env filter
	use tracing_subscriber::{fmt, EnvFilter};

	let default_directive = args.log_level.to_string();
	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

	fmt()
		.with_env_filter(env_filter)
		.with_thread_ids(true)
		.with_target(true)
		.init();

	let config_path = args
		.config
		.to_str()
		.ok_or("configuration path is not valid UTF-8")?;
	let config = Config::from_file_async(config_path).await?;
	tracing::info!(
		"Loaded configuration [storage: {}]",
		config.storage.primary
	);

	let storage = build_storage(&config)?;
	let store = Arc::new(OrderStore::new(storage));

	server::start_server(config.server, store).await?;

	tracing::info!("Stopped order service");
	Ok(())
}

/// Builds the configured storage backend through its factory function.
fn build_storage(config: &Config) -> Result<StorageService, Box<dyn std::error::Error>> {
	let factories: HashMap<&str, StorageFactory> = HashMap::from([
		("file", file::create_storage as StorageFactory),
		("memory", memory::create_storage as StorageFactory),
	]);

	let factory = factories.get(config.storage.primary.as_str()).ok_or_else(|| {
		format!(
			"unknown storage backend '{}' (available: file, memory)",
			config.storage.primary
		)
	})?;

	// Validation guarantees the section exists; an empty table keeps the
	// factory defaults if it ever does not.
	let section = config
		.storage
		.implementations
		.get(&config.storage.primary)
		.cloned()
		.unwrap_or_else(|| toml::Value::Table(toml::map::Map::new()));

	let backend = factory(&section)?;
	Ok(StorageService::new(backend))
}

#[cfg(test)]
mod tests {
	use super::*;
	use orders_config::{ServerConfig, StorageConfig};

	fn config_with_primary(primary: &str) -> Config {
		let mut implementations = HashMap::new();
		implementations.insert(
			"memory".to_string(),
			toml::Value::Table(toml::map::Map::new()),
		);
		Config {
			server: ServerConfig::default(),
			storage: StorageConfig {
				primary: primary.to_string(),
				implementations,
			},
		}
	}

	#[test]
	fn test_build_storage_memory() {
		let config = config_with_primary("memory");
		assert!(build_storage(&config).is_ok());
	}

	#[test]
	fn test_build_storage_unknown_backend() {
		let config = config_with_primary("redis");
		assert!(build_storage(&config).is_err());
	}

	#[test]
	fn test_args_default_values() {
		let args = Args {
			config: PathBuf::from("config.toml"),
			log_level: "info".to_string(),
		};

		assert_eq!(args.config, PathBuf::from("config.toml"));
		assert_eq!(args.log_level, "info");
	}
}
