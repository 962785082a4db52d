#[tokio::main]
async fn main() {
    use devdeck::core::config::Config;
    use devdeck::core::server::{app_router, build_auth_service};

    // Load .env file (if exists)
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load server config from environment variables
    let config = Config::from_env();

    // Log config status (without revealing secrets)
    tracing::info!(
        "Config loaded: jwt_secret={}, token_lifetime={}m",
        config.has_jwt_secret(),
        config.jwt_expiration_minutes
    );
    if !config.has_jwt_secret() {
        tracing::warn!("JWT_SECRET not set, signing tokens with the development secret");
    }

    let auth_service = build_auth_service(&config).expect("failed to seed development users");
    let app = app_router(auth_service);

    let addr = config.bind_addr();
    tracing::info!("Mock server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app.into_make_service())
        .await
        .unwrap();
}
