use std::net::SocketAddr;

use sea_orm::Database;
use tracing::info;

use scoreqr_core::apikey;
use scoreqr_core::config::Config;
use scoreqr_core::tracing::init_tracing;
use scoreqr_server::config::ServerConfig;
use scoreqr_server::router::build_router;
use scoreqr_server::state::AppState;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = ServerConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let state = AppState {
        db,
        expected_api_key: apikey::derive(&config.secret_key, &config.api_key_salt),
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("verification server listening on {addr}");
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("server error");
}
