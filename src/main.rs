use axum::{
    routing::{get, post},
    Router,
};
use necessity_reconcile::{api, create_pool, AppConfig, PgLedgerStore, ReconcileService};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .init();

    let config = AppConfig::load()?;
    info!("Starting server with config: {:?}", config);

    let pool = create_pool(&config.database.url).await?;
    info!("Database pool created");

    let store = PgLedgerStore::new(
        pool,
        config.reconcile.chunk_size,
        Duration::from_secs(config.reconcile.write_timeout_secs),
    );
    let service = Arc::new(
        ReconcileService::new(store).with_export_dir(config.reconcile.export_dir.clone()),
    );

    let app = Router::new()
        .route("/health", get(api::health_check))
        .route("/api/reconcile", post(api::reconcile_batch))
        .route("/api/reconcile/preview", post(api::reconcile_preview))
        .route("/api/compare", post(api::compare))
        .with_state(service)
        .layer(ServiceBuilder::new());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  POST /api/reconcile          - reconcile and persist");
    info!("  POST /api/reconcile/preview  - update set only");
    info!("  POST /api/compare            - item ok / buy / return report");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
