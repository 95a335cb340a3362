//! Order record types for the ordini service.
//!
//! An order is one persisted customer submission: the form attributes as
//! submitted (verbatim, no coercion), plus the identifier and creation
//! timestamp assigned by the store.

use chrono::{DateTime, Local, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Timestamp layout written at creation time.
///
/// Local time without an offset, microsecond precision, which is also the
/// layout found in documents produced by earlier versions of the system.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// The named string attributes of an order submission.
///
/// Every attribute is optional and stored exactly as submitted; a missing
/// attribute defaults to the empty string. Unknown attributes in a payload
/// are ignored. No format validation is performed on any of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderFields {
	pub nome: String,
	pub cognome: String,
	pub email: String,
	pub telefono: String,
	pub indirizzo: String,
	pub citta: String,
	pub codice_postale: String,
	pub paese: String,
	pub numero_carta: String,
	pub intestatario: String,
	pub scadenza: String,
	pub cvv: String,
	pub product: String,
	pub size: String,
	pub price: String,
}

/// One persisted order record.
///
/// The submission attributes are flattened next to `id` and `timestamp`, so
/// the serialized form is a single flat JSON object per order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
	/// Identifier assigned by the store, unique within the collection.
	pub id: u64,
	#[serde(flatten)]
	pub fields: OrderFields,
	/// ISO-8601 creation instant, immutable after creation.
	pub timestamp: String,
}

impl Order {
	/// The `price` attribute parsed as an exact decimal.
	///
	/// Returns `None` for a missing or non-numeric price; aggregation treats
	/// such records as contributing zero revenue.
	pub fn price(&self) -> Option<Decimal> {
		self.fields.price.trim().parse().ok()
	}

	/// The creation instant parsed back from the stored timestamp.
	///
	/// Accepts the local-time layout written by [`current_timestamp`] as well
	/// as RFC 3339 with an offset. Returns `None` for anything unparsable.
	pub fn created_at(&self) -> Option<NaiveDateTime> {
		self.timestamp
			.parse::<NaiveDateTime>()
			.ok()
			.or_else(|| {
				DateTime::parse_from_rfc3339(&self.timestamp)
					.ok()
					.map(|dt| dt.naive_local())
			})
	}
}

/// Captures the current local instant in the stored timestamp layout.
pub fn current_timestamp() -> String {
	Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Aggregate statistics over the full order collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderStats {
	/// Count of all currently stored orders.
	pub total_orders: u64,
	/// Sum of all parsable `price` attributes, serialized as a JSON number.
	#[serde(with = "rust_decimal::serde::float")]
	pub total_revenue: Decimal,
	/// Count of orders created on the current local calendar date.
	pub today_orders: u64,
}
