//! Request/response envelopes for the HTTP API.
//!
//! Every endpoint answers HTTP 200 with a `success` flag; failures carry a
//! human-readable message instead of an error status code. Optional members
//! are omitted from the serialized body when absent.

use crate::order::{Order, OrderStats};
use serde::{Deserialize, Serialize};

/// Envelope for `POST /api/orders`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderResponse {
	pub success: bool,
	pub message: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub order_id: Option<u64>,
}

impl CreateOrderResponse {
	pub fn saved(order_id: u64, message: impl Into<String>) -> Self {
		Self {
			success: true,
			message: message.into(),
			order_id: Some(order_id),
		}
	}

	pub fn failed(message: impl Into<String>) -> Self {
		Self {
			success: false,
			message: message.into(),
			order_id: None,
		}
	}
}

/// Envelope for `GET /api/orders`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListOrdersResponse {
	pub success: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub orders: Option<Vec<Order>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub message: Option<String>,
}

impl ListOrdersResponse {
	pub fn with_orders(orders: Vec<Order>) -> Self {
		Self {
			success: true,
			orders: Some(orders),
			message: None,
		}
	}
}

/// Envelope for `DELETE /api/orders/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteOrderResponse {
	pub success: bool,
	pub message: String,
}

impl DeleteOrderResponse {
	pub fn new(success: bool, message: impl Into<String>) -> Self {
		Self {
			success,
			message: message.into(),
		}
	}
}

/// Envelope for `GET /api/stats`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
	pub success: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub stats: Option<OrderStats>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub message: Option<String>,
}

impl StatsResponse {
	pub fn with_stats(stats: OrderStats) -> Self {
		Self {
			success: true,
			stats: Some(stats),
			message: None,
		}
	}
}
