use axum::{
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use crate::storage::{SqliteStore, StoreConfig};
use crate::ui::Icons;

pub mod routes;

/// Server state. Each request opens its own connection from `store_config`.
pub struct AppState {
    pub store_config: StoreConfig,
}

impl AppState {
    pub fn new(store_config: StoreConfig) -> Self {
        Self { store_config }
    }

    pub fn open_store(&self) -> crate::Result<SqliteStore> {
        SqliteStore::open(&self.store_config)
    }
}

/// Build the JSON API router
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/stats", get(routes::get_stats))
        .route("/api/reports/cash-flow", get(routes::get_cash_flow))
        .route("/api/reports/project-types", get(routes::get_project_types))
        .route(
            "/api/{collection}",
            get(routes::list_records)
                .post(routes::create_record)
                .delete(routes::clear_records),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start_server(port: u16, store_config: StoreConfig) -> anyhow::Result<()> {
    // Fail fast on an unusable database before binding the port
    SqliteStore::open(&store_config)?;

    let state = Arc::new(AppState::new(store_config));
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Starting server on {}", addr);
    println!("{} Server running at http://{}", Icons::GLOBE, addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
