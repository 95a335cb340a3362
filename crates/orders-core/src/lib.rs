//! The order record store.
//!
//! This module owns the full collection of orders and its durable
//! representation: it assigns identifiers, appends and deletes records, and
//! answers aggregate queries. Every call performs a fresh load of the durable
//! document, so the store always reflects the latest persisted state, even
//! across process restarts.
//!
//! Mutations (create/delete) run their load-modify-save cycle under a single
//! async mutex, which closes the read-modify-write race two concurrent
//! writers would otherwise hit. Reads take no lock: the storage layer
//! replaces the document atomically, so a concurrent reader observes either
//! the pre- or the post-mutation state, never a torn file.

use chrono::Local;
use orders_storage::{StorageError, StorageService};
use orders_types::{current_timestamp, Order, OrderFields, OrderStats};
use rust_decimal::Decimal;
use thiserror::Error;
use tokio::sync::Mutex;

/// Storage key of the durable order document.
const ORDERS_KEY: &str = "orders";

/// Errors that can occur during store operations.
///
/// Load failures never surface here: loads degrade to an empty collection.
/// Only a failed durable save reaches the caller, so it can report that the
/// mutation did not persist.
#[derive(Debug, Error)]
pub enum StoreError {
	/// The durable save of the mutated collection did not complete.
	#[error("storage error: {0}")]
	Storage(#[from] StorageError),
}

/// The component owning the order collection and its durable representation.
pub struct OrderStore {
	/// Typed access to the durable document.
	storage: StorageService,
	/// Serializes all mutating load-modify-save cycles.
	write_lock: Mutex<()>,
}

impl OrderStore {
	/// Creates a store over the given storage service.
	///
	/// The durable document is materialized lazily: a store over an empty
	/// backend behaves as an empty collection until the first create.
	pub fn new(storage: StorageService) -> Self {
		Self {
			storage,
			write_lock: Mutex::new(()),
		}
	}

	/// Creates a new order from the submitted fields.
	///
	/// Assigns `max(existing ids) + 1`, captures the current instant, appends
	/// the record and durably saves the whole collection. Returns the created
	/// order, or an error if the save did not persist.
	pub async fn create(&self, fields: OrderFields) -> Result<Order, StoreError> {
		let _guard = self.write_lock.lock().await;

		let mut orders = self.load_all().await;
		let order = Order {
			id: next_id(&orders),
			fields,
			timestamp: current_timestamp(),
		};
		orders.push(order.clone());
		self.save_all(&orders).await?;

		tracing::info!(id = order.id, "order created");
		Ok(order)
	}

	/// Returns the full collection in insertion order.
	///
	/// A missing or unreadable durable document yields an empty vector.
	pub async fn list(&self) -> Vec<Order> {
		self.load_all().await
	}

	/// Deletes the order with the given id.
	///
	/// Returns `Ok(true)` if a record was removed and the shrunk collection
	/// was durably saved, `Ok(false)` if no record matched (nothing is
	/// written in that case). Survivors keep their identifiers.
	pub async fn delete(&self, id: u64) -> Result<bool, StoreError> {
		let _guard = self.write_lock.lock().await;

		let orders = self.load_all().await;
		let before = orders.len();
		let remaining: Vec<Order> = orders.into_iter().filter(|o| o.id != id).collect();

		if remaining.len() == before {
			return Ok(false);
		}

		self.save_all(&remaining).await?;
		tracing::info!(id, "order deleted");
		Ok(true)
	}

	/// Computes aggregate statistics over the full collection.
	///
	/// Records with a non-numeric price contribute zero revenue; records with
	/// an unparsable timestamp are excluded from the today count only.
	pub async fn stats(&self) -> OrderStats {
		let orders = self.load_all().await;
		let today = Local::now().date_naive();

		let total_revenue: Decimal = orders.iter().filter_map(Order::price).sum();
		let today_orders = orders
			.iter()
			.filter_map(Order::created_at)
			.filter(|created| created.date() == today)
			.count() as u64;

		OrderStats {
			total_orders: orders.len() as u64,
			total_revenue,
			today_orders,
		}
	}

	/// Loads the full collection, degrading to empty on any failure.
	async fn load_all(&self) -> Vec<Order> {
		match self.storage.retrieve(ORDERS_KEY).await {
			Ok(orders) => orders,
			Err(StorageError::NotFound) => Vec::new(),
			Err(e) => {
				tracing::warn!("failed to load order document, treating as empty: {}", e);
				Vec::new()
			}
		}
	}

	/// Durably saves the full collection.
	async fn save_all(&self, orders: &[Order]) -> Result<(), StoreError> {
		self.storage.store(ORDERS_KEY, &orders).await?;
		Ok(())
	}
}

/// Next identifier for the given collection.
///
/// One past the highest id currently present (1 for an empty collection).
/// This deviates from the size-based `count + 1` scheme of earlier versions,
/// which could hand out an id still held by a surviving record once a
/// deletion was followed by a create. For deletion-free histories the
/// assigned ids are identical.
fn next_id(orders: &[Order]) -> u64 {
	orders.iter().map(|o| o.id).max().unwrap_or(0) + 1
}
