//! HTTP server for the ordini order API.
//!
//! Exposes the four store operations under `/api` and, when configured,
//! serves the storefront pages on every other path. Mirroring the behavior
//! of earlier versions of the system, every API endpoint answers HTTP 200
//! with a `success` flag instead of mapping store outcomes onto status
//! codes.

use axum::{
	body::Bytes,
	extract::{Path, State},
	response::Json,
	routing::{delete, get, post},
	Router,
};
use orders_config::ServerConfig;
use orders_core::OrderStore;
use orders_types::{
	CreateOrderResponse, DeleteOrderResponse, ListOrdersResponse, OrderFields, StatsResponse,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

/// Shared application state for the API server.
#[derive(Clone)]
pub struct AppState {
	/// Reference to the order store for processing requests.
	pub store: Arc<OrderStore>,
}

/// Starts the HTTP server for the API.
pub async fn start_server(
	config: ServerConfig,
	store: Arc<OrderStore>,
) -> Result<(), Box<dyn std::error::Error>> {
	let app = build_router(AppState { store }, config.static_dir.as_deref());

	let bind_address = format!("{}:{}", config.host, config.port);
	let listener = TcpListener::bind(&bind_address).await?;

	tracing::info!("ordini API server starting on {}", bind_address);

	axum::serve(listener, app).await?;

	Ok(())
}

/// Builds the router with the /api routes, CORS, request tracing and the
/// optional static page fallback.
fn build_router(state: AppState, static_dir: Option<&std::path::Path>) -> Router {
	let api = Router::new()
		.route("/orders", post(handle_create_order).get(handle_list_orders))
		.route("/orders/{id}", delete(handle_delete_order))
		.route("/stats", get(handle_stats));

	let mut app = Router::new().nest("/api", api);

	if let Some(dir) = static_dir {
		app = app.fallback_service(ServeDir::new(dir));
	}

	app.layer(
		ServiceBuilder::new()
			.layer(TraceLayer::new_for_http())
			.layer(CorsLayer::permissive()),
	)
	.with_state(state)
}

/// Handles POST /api/orders requests.
///
/// Accepts any JSON object, keeps the known submission attributes verbatim
/// and defaults the missing ones to empty strings. No field validation is
/// performed. The body is read raw rather than through the Json extractor so
/// a malformed payload still gets the 200 `{success:false}` envelope instead
/// of an extractor rejection.
async fn handle_create_order(
	State(state): State<AppState>,
	body: Bytes,
) -> Json<CreateOrderResponse> {
	let fields = match serde_json::from_slice::<OrderFields>(&body) {
		Ok(fields) => fields,
		Err(_) => return Json(CreateOrderResponse::failed("No data received")),
	};

	match state.store.create(fields).await {
		Ok(order) => Json(CreateOrderResponse::saved(
			order.id,
			"Ordine salvato con successo",
		)),
		Err(e) => {
			tracing::warn!("Order creation failed: {}", e);
			Json(CreateOrderResponse::failed("Errore nel salvataggio"))
		},
	}
}

/// Handles GET /api/orders requests.
async fn handle_list_orders(State(state): State<AppState>) -> Json<ListOrdersResponse> {
	Json(ListOrdersResponse::with_orders(state.store.list().await))
}

/// Handles DELETE /api/orders/{id} requests.
async fn handle_delete_order(
	Path(id): Path<u64>,
	State(state): State<AppState>,
) -> Json<DeleteOrderResponse> {
	match state.store.delete(id).await {
		Ok(true) => Json(DeleteOrderResponse::new(
			true,
			"Ordine eliminato con successo",
		)),
		Ok(false) => Json(DeleteOrderResponse::new(false, "Ordine non trovato")),
		Err(e) => {
			tracing::warn!("Order deletion failed: {}", e);
			Json(DeleteOrderResponse::new(false, "Errore nell'eliminazione"))
		},
	}
}

/// Handles GET /api/stats requests.
async fn handle_stats(State(state): State<AppState>) -> Json<StatsResponse> {
	Json(StatsResponse::with_stats(state.store.stats().await))
}
