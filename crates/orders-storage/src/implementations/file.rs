//! File-based storage backend.
//!
//! Stores each document as a JSON file on the filesystem, providing simple
//! persistence without external dependencies. Writes go to a temporary file
//! first and are renamed over the target, so a document is replaced in a
//! single atomic step and readers never observe a half-written file.

use crate::{StorageError, StorageInterface};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;

/// File-based storage implementation.
pub struct FileStorage {
	/// Base directory path for storing document files.
	base_path: PathBuf,
}

impl FileStorage {
	/// Creates a new FileStorage instance rooted at the specified base path.
	pub fn new(base_path: PathBuf) -> Self {
		Self { base_path }
	}

	/// Converts a storage key to a filesystem-safe file path.
	///
	/// Sanitizes the key by replacing problematic characters and appending a
	/// .json extension.
	fn get_file_path(&self, key: &str) -> PathBuf {
		let safe_key = key.replace(['/', ':'], "_");
		self.base_path.join(format!("{}.json", safe_key))
	}
}

#[async_trait]
impl StorageInterface for FileStorage {
	async fn get_bytes(&self, key: &str) -> Result<Vec<u8>, StorageError> {
		let path = self.get_file_path(key);

		match fs::read(&path).await {
			Ok(data) => Ok(data),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StorageError::NotFound),
			Err(e) => Err(StorageError::Backend(e.to_string())),
		}
	}

	async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
		let path = self.get_file_path(key);

		// Create parent directory if it doesn't exist
		if let Some(parent) = path.parent() {
			fs::create_dir_all(parent)
				.await
				.map_err(|e| StorageError::Backend(e.to_string()))?;
		}

		// Write atomically by writing to temp file then renaming
		let temp_path = path.with_extension("tmp");
		fs::write(&temp_path, value)
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))?;

		fs::rename(&temp_path, &path)
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))?;

		Ok(())
	}

	async fn delete(&self, key: &str) -> Result<(), StorageError> {
		let path = self.get_file_path(key);

		match fs::remove_file(&path).await {
			Ok(_) => Ok(()),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
			Err(e) => Err(StorageError::Backend(e.to_string())),
		}
	}

	async fn exists(&self, key: &str) -> Result<bool, StorageError> {
		let path = self.get_file_path(key);
		Ok(path.exists())
	}
}

/// Factory function to create a file storage backend from configuration.
///
/// Configuration parameters:
/// - `path`: Base directory for document files (default: "./data")
pub fn create_storage(config: &toml::Value) -> Result<Box<dyn StorageInterface>, StorageError> {
	let path = config
		.get("path")
		.and_then(|v| v.as_str())
		.unwrap_or("./data")
		.to_string();

	Ok(Box::new(FileStorage::new(PathBuf::from(path))))
}

#[cfg(test)]
mod tests {
	use super::*;
	use tempfile::tempdir;

	#[tokio::test]
	async fn test_write_and_read_back() {
		let dir = tempdir().unwrap();
		let storage = FileStorage::new(dir.path().to_path_buf());

		storage
			.set_bytes("orders", b"[]".to_vec())
			.await
			.unwrap();

		let data = storage.get_bytes("orders").await.unwrap();
		assert_eq!(data, b"[]");
	}

	#[tokio::test]
	async fn test_missing_key_is_not_found() {
		let dir = tempdir().unwrap();
		let storage = FileStorage::new(dir.path().to_path_buf());

		let result = storage.get_bytes("orders").await;
		assert!(matches!(result, Err(StorageError::NotFound)));
	}

	#[tokio::test]
	async fn test_creates_missing_base_directory() {
		let dir = tempdir().unwrap();
		let nested = dir.path().join("data").join("store");
		let storage = FileStorage::new(nested.clone());

		storage.set_bytes("orders", b"[]".to_vec()).await.unwrap();
		assert!(nested.join("orders.json").exists());
	}

	#[tokio::test]
	async fn test_overwrite_replaces_document() {
		let dir = tempdir().unwrap();
		let storage = FileStorage::new(dir.path().to_path_buf());

		storage.set_bytes("orders", b"[1]".to_vec()).await.unwrap();
		storage.set_bytes("orders", b"[2]".to_vec()).await.unwrap();

		let data = storage.get_bytes("orders").await.unwrap();
		assert_eq!(data, b"[2]");
	}

	#[tokio::test]
	async fn test_no_temp_file_left_behind() {
		let dir = tempdir().unwrap();
		let storage = FileStorage::new(dir.path().to_path_buf());

		storage.set_bytes("orders", b"[]".to_vec()).await.unwrap();
		assert!(!dir.path().join("orders.tmp").exists());
	}

	#[tokio::test]
	async fn test_key_is_sanitized() {
		let dir = tempdir().unwrap();
		let storage = FileStorage::new(dir.path().to_path_buf());

		storage
			.set_bytes("orders:2026", b"[]".to_vec())
			.await
			.unwrap();
		assert!(dir.path().join("orders_2026.json").exists());
	}

	#[tokio::test]
	async fn test_delete_is_idempotent() {
		let dir = tempdir().unwrap();
		let storage = FileStorage::new(dir.path().to_path_buf());

		storage.set_bytes("orders", b"[]".to_vec()).await.unwrap();
		storage.delete("orders").await.unwrap();
		assert!(!storage.exists("orders").await.unwrap());

		// Deleting again must not fail
		storage.delete("orders").await.unwrap();
	}

	#[test]
	fn test_factory_defaults_path() {
		let config: toml::Value = "".parse().unwrap();
		assert!(create_storage(&config).is_ok());
	}
}
