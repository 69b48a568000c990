//! Galeria Storefront - Gallery, quote cart and admin API.
//!
//! This binary serves the storefront on port 3000.
//!
//! # Architecture
//!
//! - Axum web framework, JSON API consumed by the site's front end
//! - Product catalog held in memory, mirrored to a JSON file
//! - One quote cart per visitor, keyed from the session and mirrored to a
//!   slot file under the data directory
//! - Checkout hands the cart off to WhatsApp; there is no payment flow

#![cfg_attr(not(test), forbid(unsafe_code))]

use galeria_storefront::catalog::ProductCatalog;
use galeria_storefront::config::StorefrontConfig;
use galeria_storefront::routes;
use galeria_storefront::state::AppState;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            traces_sample_rate: config.sentry_traces_sample_rate,
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

/// Install the log subscriber: console output plus the Sentry bridge, so cart
/// and catalog warnings reach Sentry as events and routine activity as
/// breadcrumbs.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "galeria_storefront=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let config = StorefrontConfig::from_env().expect("Failed to load configuration");

    // The Sentry client has to exist before the bridge layer is installed
    let _sentry_guard = init_sentry(&config);
    init_tracing();

    let catalog = ProductCatalog::open(&config.catalog_file)
        .await
        .expect("Failed to load catalog");
    tracing::info!(
        catalog = %config.catalog_file.display(),
        data_dir = %config.data_dir.display(),
        cart_idle_secs = config.cart_idle.as_secs(),
        recipient = %config.checkout.recipient,
        "Gallery ready"
    );

    let addr = config.socket_addr();
    let app = routes::app(AppState::new(config, catalog))
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");
    tracing::info!("storefront listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Resolve on Ctrl+C or SIGTERM. In-flight requests finish; carts are already
/// on disk.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutting down storefront");
}
