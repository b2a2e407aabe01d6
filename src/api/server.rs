//! HTTP server implementation

use std::sync::Arc;

use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::Any;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::handlers::AppState;
use crate::api::routes;
use crate::config::AppConfig;
use crate::config::BackendKind;
use crate::database::Database;
use crate::knowledge::KnowledgeBase;
use crate::llm::GatewayClient;
use crate::rag::RagService;
use crate::Result;

/// Start the API server
pub async fn serve_api(
    config: &AppConfig,
    host: String,
    port: u16,
    enable_cors: bool,
) -> Result<()> {
    info!("🚀 Starting HajjRAG API server...");

    // Initialize services
    let rag = match config.retrieval.backend {
        BackendKind::Datastore => {
            let database = Database::from_config(config).await?;
            database.init_schema().await?;
            if database.count_knowledge().await? == 0 {
                let corpus = KnowledgeBase::builtin()?;
                let seeded = database.seed_knowledge(corpus.items()).await?;
                info!("🌱 Seeded knowledge table with {} builtin items", seeded);
            }
            RagService::datastore(database, config)
        }
        BackendKind::Local => RagService::from_config(config).await?,
    };
    let gateway = GatewayClient::from_config(config)?;

    let state = AppState {
        rag: Arc::new(rag),
        gateway: Arc::new(gateway),
    };

    let app = build_router(state, enable_cors);

    // Start server
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("🌐 API server listening on http://{}", addr);
    info!("");
    info!("Available endpoints:");
    info!("  GET  /api/health    - Health check");
    info!("  GET  /api/knowledge - List knowledge base");
    info!("  POST /api/search    - Search knowledge base");
    info!("  POST /api/chat      - Streaming chat with knowledge enrichment");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Assemble the application router with middleware layers.
///
/// Split out of [`serve_api`] so tests can drive the router without
/// binding a socket.
pub fn build_router(state: AppState, enable_cors: bool) -> Router {
    let mut app = Router::new()
        .nest("/api", routes::api_routes(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new());

    if enable_cors {
        info!("✅ CORS enabled");
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    app
}
