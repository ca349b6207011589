mod config;
mod routes;
mod services;
mod state;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = config::GameConfig::from_env();
    let state = state::AppState::new(config);

    // Spawn the autopilot round driver unless the deployment is purely
    // client-driven.
    if config.autopilot {
        let _driver = services::round::spawn_round_task(state.clone());
    } else {
        tracing::info!("autopilot disabled; mode transitions are client-driven");
    }

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .expect("failed to bind");

    tracing::info!(port = config.port, "redlight server listening");
    axum::serve(listener, app).await.expect("server failed");
}
