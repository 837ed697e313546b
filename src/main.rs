use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use flight_booking_backend::{config::Config, email::Mailer, routes, store, AppState};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flight_booking_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env();
    tracing::info!(
        env = ?config.app_env,
        "Starting server at {}",
        config.server_addr()
    );

    // Build the store for this process
    let store = store::connect(&config);
    tracing::info!(
        seeded = config.seed_data,
        "In-memory store ready"
    );

    let mailer = Mailer::from_config(&config).expect("Failed to configure email transport");

    let state = AppState {
        store,
        mailer,
        config: config.clone(),
    };

    // Create router with middleware
    let app = routes::create_app(state);

    // Start server with socket address for rate limiting
    let addr: SocketAddr = config.server_addr().parse().expect("Invalid address");
    let listener = TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Failed to start server");
}
