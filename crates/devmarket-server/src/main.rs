use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::{middleware::Logger, web, App, HttpServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use devmarket_server::{
    bootstrap, config::ServerConfig, db::Database, metrics::register_metrics,
    middleware::AccessGate, routes, state::AppState,
};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = ServerConfig::from_env().expect("Failed to load configuration");
    let port = config.port;
    let allowed_origins = config.allowed_origins.clone();
    let rate_limit_rpm = config.rate_limit_rpm;
    let public_dir = config.public_dir.clone();

    tracing::info!("Starting devmarket-server on port {}", port);

    // Initialize database
    let db = Database::new(&config.db_path).expect("Failed to initialize database");
    tracing::info!("Database initialized at: {}", config.db_path);

    // Ensure the bootstrap superadmin credential exists
    bootstrap::ensure_superadmin(&db, &config).expect("Failed to bootstrap superadmin");

    // Register Prometheus metrics
    register_metrics();

    // Create shared state
    let state = AppState::new(config, db);
    let session_keys = state.session_keys.clone();
    let state_data = web::Data::new(state);

    // Configure rate limiter
    let governor_conf = GovernorConfigBuilder::default()
        .requests_per_minute(rate_limit_rpm as u64)
        .finish()
        .expect("Failed to create rate limiter config");

    if let Some(ref dir) = public_dir {
        tracing::info!("Serving static files from: {}", dir);
    }

    // Start HTTP server
    HttpServer::new(move || {
        let cors = devmarket_server::cors::build_cors(&allowed_origins);

        let mut app = App::new()
            .app_data(state_data.clone())
            .app_data(web::PayloadConfig::new(1024 * 1024)) // 1MB body limit
            .wrap(AccessGate::new(session_keys.clone()))
            .wrap(Logger::default())
            .wrap(cors)
            .wrap(Governor::new(&governor_conf))
            .configure(routes::health::configure)
            .configure(routes::gateways::configure)
            .configure(routes::pages::configure)
            .configure(routes::donations::configure)
            .configure(routes::contact::configure)
            .configure(routes::ads::configure)
            .configure(routes::admin::configure);

        // Serve static files last (catch-all) if configured
        if let Some(ref dir) = public_dir {
            app = app.service(actix_files::Files::new("/", dir).index_file("index.html"));
        }

        app
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
