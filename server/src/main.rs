use std::sync::Arc;

use lu_server::config::ServerConfig;
use lu_server::responder::KnowledgeBaseResponder;
use lu_server::{routes, services, state};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = ServerConfig::from_env();
    let bind_addr = config.bind_addr();
    let state = state::AppState::new(config, Arc::new(KnowledgeBaseResponder::new()));

    // Spawn background expiry task.
    let _expiry = services::session::spawn_expiry_task(state.clone());

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .expect("failed to bind");

    tracing::info!(%bind_addr, "lu-server listening");
    axum::serve(listener, app).await.expect("server failed");
}
