//! Common types module for the ordini order service.
//!
//! This module defines the core data types and structures shared by the
//! store, storage and HTTP layers. It provides a centralized location for
//! shared types to ensure consistency across all service components.

/// API types for HTTP endpoints and request/response envelopes.
pub mod api;
/// Order record types and aggregation helpers.
pub mod order;

// Re-export all types for convenient access
pub use api::*;
pub use order::*;
