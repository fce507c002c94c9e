//! # planboard: Subscription-gated project management
//!
//! `planboard` is the backend of a small project-management product. Users register, buy a
//! plan, and create projects and tasks. The plan decides how many projects a user may own:
//! the free tier allows a few, a paid plan more.
//!
//! ## Overview
//!
//! The interesting part is the subscription lifecycle and the quota it drives. A user holds at
//! most one active subscription. Purchasing a plan goes through a payment provider (a mock
//! provider that confirms instantly) and then writes the subscription and its invoice
//! atomically. When a user creates a project, their active plan's quota is compared with the
//! projects they already own; without a plan they fall back to the configured free quota.
//! Cancelling a subscription never deletes projects, it only lowers the quota for new ones.
//!
//! ## Architecture
//!
//! The application is built on [Axum](https://github.com/tokio-rs/axum) for the HTTP layer.
//! Persistence goes through the [`db::store::Store`] trait, backed by PostgreSQL in
//! production or by an in-memory store when no database is configured.
//!
//! ### Request Flow
//!
//! A request under `/api/*` is authenticated by the
//! [`CurrentUser`](auth::current_user::CurrentUser) extractor (a bearer JWT), handled by a
//! function in [`api::handlers`], which calls into [`services`] for the business rules.
//! Services talk to the store and the payment provider. Errors travel back as
//! [`errors::Error`] and are rendered as `{ "error": ... }` in the caller's language by the
//! [`i18n::localize_errors`] middleware.
//!
//! ### Core Components
//!
//! - [`api`]: Routes, request validation and the JSON contract
//! - [`auth`]: Password hashing, JWT sessions and the current-user extractor
//! - [`services`]: Plans, subscriptions, quota-enforced projects, tasks and expiry
//! - [`db`]: The store abstraction, its PostgreSQL repositories and the in-memory store
//! - [`i18n`]: English and Spanish messages
//!
//! **Background services** run alongside the HTTP server. With a fixed subscription term
//! configured, a sweeper periodically moves subscriptions past their end date to `expired`.
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use planboard::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = planboard::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     planboard::telemetry::init_telemetry(config.enable_otel_export)?;
//!
//!     let app = Application::new(config).await?;
//!     app.serve(async {
//!         let _ = tokio::signal::ctrl_c().await;
//!     })
//!     .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Database Setup
//!
//! Migrations (including the seeded `free` and `pro` plans) run automatically on startup:
//!
//! ```no_run
//! # use sqlx::PgPool;
//! # async fn example(pool: PgPool) -> Result<(), sqlx::migrate::MigrateError> {
//! planboard::migrator().run(&pool).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! See the [`config`] module for configuration options.
pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod i18n;
mod openapi;
pub mod payment_providers;
pub mod services;
pub mod telemetry;
pub mod types;

#[cfg(test)]
pub mod test_utils;

use std::{sync::Arc, time::Duration};

use axum::{
    Json, Router,
    http::{self, HeaderValue},
    middleware::from_fn,
    routing::{delete, get, post},
};
use bon::Builder;
pub use config::Config;
use sqlx::{PgPool, postgres::PgPoolOptions};
use tokio::{net::TcpListener, task::JoinHandle};
use tokio_util::sync::{CancellationToken, DropGuard};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, debug, info, instrument, warn};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::{
    config::{CorsOrigin, PoolSettings},
    db::store::{InMemoryStore, PostgresStore, Store},
    openapi::ApiDoc,
    payment_providers::PaymentProvider,
};

/// Application state shared across all request handlers.
///
/// - `store`: Persistence, PostgreSQL or in-memory
/// - `config`: Application configuration loaded from environment/files
/// - `payments`: The payment provider selected by `payment` in the config
///
/// # Example
///
/// ```ignore
/// let state = AppState::builder()
///     .store(Arc::new(InMemoryStore::new()))
///     .payments(Arc::from(payment_providers::create_provider(&config.payment)))
///     .config(config)
///     .build();
/// ```
#[derive(Clone, Builder)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Config,
    pub payments: Arc<dyn PaymentProvider>,
}

/// Get the planboard database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Connect to PostgreSQL with the configured pool settings and run migrations.
async fn setup_database(database_url: &str, settings: &PoolSettings) -> anyhow::Result<PgPool> {
    let secs = |s: u64| (s > 0).then(|| Duration::from_secs(s));

    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs))
        .idle_timeout(secs(settings.idle_timeout_secs))
        .max_lifetime(secs(settings.max_lifetime_secs))
        .connect(database_url)
        .await?;

    migrator().run(&pool).await?;
    Ok(pool)
}

/// Create CORS layer from configuration
fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let cors_config = &config.auth.cors;

    // tower-http refuses `*` inside an origin list
    let allow_origin = if cors_config.allowed_origins.iter().any(|o| matches!(o, CorsOrigin::Wildcard)) {
        AllowOrigin::any()
    } else {
        let mut origins = Vec::new();
        for origin in &cors_config.allowed_origins {
            if let CorsOrigin::Url(url) = origin {
                // Url always renders with a trailing slash; browsers send origins without one
                origins.push(url.as_str().trim_end_matches('/').parse::<HeaderValue>()?);
            }
        }
        AllowOrigin::list(origins)
    };

    let mut cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([http::Method::GET, http::Method::POST, http::Method::PATCH, http::Method::DELETE])
        .allow_headers([http::header::AUTHORIZATION, http::header::CONTENT_TYPE, http::header::ACCEPT_LANGUAGE])
        .allow_credentials(cors_config.allow_credentials);

    if let Some(max_age) = cors_config.max_age {
        cors = cors.max_age(Duration::from_secs(max_age));
    }

    Ok(cors)
}

/// Routes under `/api`
fn api_routes() -> Router<AppState> {
    use api::handlers::{auth, plans, projects, subscriptions, tasks};

    Router::new()
        // Authentication
        .route("/auth/register", post(auth::register))
        .route("/auth/signup", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/signin", post(auth::login))
        // Plan catalog
        .route("/plans", get(plans::list_plans))
        // Subscriptions
        .route("/subscriptions", post(subscriptions::create_subscription))
        .route(
            "/subscriptions/current",
            get(subscriptions::get_current_subscription).delete(subscriptions::cancel_current_subscription),
        )
        .route("/subscriptions/{id}", delete(subscriptions::cancel_subscription))
        // Projects
        .route("/projects", get(projects::list_projects).post(projects::create_project))
        .route("/projects/{id}", delete(projects::delete_project))
        // Tasks
        .route("/tasks", get(tasks::list_tasks).post(tasks::create_task))
        .route(
            "/tasks/{id}",
            get(tasks::get_task).patch(tasks::update_task).delete(tasks::delete_task),
        )
}

/// Build the main application router with all endpoints and middleware.
///
/// - `/api/*`: the JSON API
/// - `/healthz`: liveness
/// - `/docs` and `/api-docs/openapi.json`: API documentation
///
/// Error bodies are localized, requests are traced, and CORS follows `auth.cors`.
#[instrument(skip_all)]
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    let cors_layer = create_cors_layer(&state.config)?;

    let router = Router::new()
        .route("/healthz", get(|| async { "OK" }))
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .nest("/api", api_routes().with_state(state))
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
        .layer(from_fn(i18n::localize_errors))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer);

    Ok(router)
}

/// Container for background services and their lifecycle management.
///
/// The only background task is the subscription expiry sweeper, and it only runs when
/// `subscriptions.term` is configured.
///
/// # Graceful Shutdown
///
/// [`shutdown`](BackgroundServices::shutdown) stops every task and waits for it. When dropped,
/// the `drop_guard` cancels the shutdown token, signaling all tasks to stop.
pub struct BackgroundServices {
    background_tasks: Vec<JoinHandle<()>>,
    shutdown_token: CancellationToken,
    // Pub so that we can disarm it if we want to
    pub drop_guard: Option<DropGuard>,
}

impl BackgroundServices {
    /// Gracefully shutdown all background tasks
    pub async fn shutdown(self) {
        self.shutdown_token.cancel();

        for handle in self.background_tasks {
            let _ = handle.await;
        }
    }

    /// Number of running background tasks
    pub fn len(&self) -> usize {
        self.background_tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.background_tasks.is_empty()
    }
}

fn setup_background_services(store: Arc<dyn Store>, config: &Config, shutdown_token: CancellationToken) -> BackgroundServices {
    let drop_guard = shutdown_token.clone().drop_guard();
    let mut background_tasks = Vec::new();

    if config.subscriptions.term.is_some() {
        let interval = config.subscriptions.expiry_sweep_interval;
        let handle = tokio::spawn(services::expiry::run_expiry_sweeper(store, interval, shutdown_token.clone()));
        background_tasks.push(handle);
    } else {
        debug!("No subscription term configured, expiry sweeper disabled");
    }

    BackgroundServices {
        background_tasks,
        shutdown_token,
        drop_guard: Some(drop_guard),
    }
}

/// The assembled application: router, storage and background services.
///
/// 1. **Create**: [`Application::new`] connects to the database (or falls back to the
///    in-memory store), runs migrations and starts background services
/// 2. **Serve**: [`Application::serve`] binds to a TCP port and starts handling requests
/// 3. **Shutdown**: When the shutdown signal resolves, stops background services, closes the
///    pool and flushes telemetry
pub struct Application {
    router: Router,
    config: Config,
    pool: Option<PgPool>,
    bg_services: BackgroundServices,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        debug!("Starting planboard with configuration: {:#?}", config);

        let pool = match config.database_url() {
            Some(url) => {
                info!("Using PostgreSQL database");
                Some(setup_database(url, &config.database.pool).await?)
            }
            None => {
                warn!("No database configured; using the in-memory store. Data will be lost on shutdown");
                None
            }
        };

        Self::new_with_pool(config, pool)
    }

    /// Create an application on an existing (already migrated) pool, or on the in-memory
    /// store when `pool` is `None`
    pub fn new_with_pool(config: Config, pool: Option<PgPool>) -> anyhow::Result<Self> {
        let store: Arc<dyn Store> = match &pool {
            Some(pool) => Arc::new(PostgresStore::new(pool.clone())),
            None => Arc::new(InMemoryStore::new()),
        };

        let shutdown_token = CancellationToken::new();
        let bg_services = setup_background_services(store.clone(), &config, shutdown_token);

        let app_state = AppState::builder()
            .store(store)
            .payments(Arc::from(payment_providers::create_provider(&config.payment)))
            .config(config.clone())
            .build();

        let router = build_router(app_state)?;

        Ok(Self {
            router,
            config,
            pool,
            bg_services,
        })
    }

    /// Convert application into a test server (for tests)
    #[cfg(test)]
    pub fn into_test_server(self) -> (axum_test::TestServer, BackgroundServices) {
        let server = axum_test::TestServer::new(self.router).expect("Failed to create test server");
        (server, self.bg_services)
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "Planboard listening on http://{}, available at http://localhost:{}",
            bind_addr, self.config.port
        );

        axum::serve(listener, self.router).with_graceful_shutdown(shutdown).await?;

        // Shutdown background services and wait for tasks to complete
        self.bg_services.shutdown().await;

        if let Some(pool) = self.pool {
            info!("Closing database connections...");
            pool.close().await;
        }

        info!("Shutting down telemetry...");
        telemetry::shutdown_telemetry();

        Ok(())
    }
}
