/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use overview_api::{app::{build_router, AppState}, config::Config};
/// use overview_shared::{db::pool::create_pool, store::postgres::PgDocumentStore};
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(config.database.clone()).await?;
/// let state = AppState::new(Arc::new(PgDocumentStore::new(pool)), config);
/// let app = build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, error::ApiError, routes};
use axum::{
    extract::{DefaultBodyLimit, Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post, put},
    Router,
};
use overview_shared::{auth::middleware::session_gate, store::DocumentStore};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned per request by Axum's `State` extractor; both fields are `Arc`s.
#[derive(Clone)]
pub struct AppState {
    /// Document store
    pub store: Arc<dyn DocumentStore>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(store: Arc<dyn DocumentStore>, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    /// Secret used to sign and verify sessions
    pub fn session_secret(&self) -> &str {
        self.config.session.secret.expose()
    }

    /// Whether cookies are marked `Secure`
    pub fn secure_cookies(&self) -> bool {
        self.config.api.production
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// ```text
/// /
/// ├── GET /health
/// ├── /api/
/// │   ├── POST   /auth/login
/// │   ├── POST   /auth/logout
/// │   ├── GET    /snapshot
/// │   ├── POST   /snapshot?mode=replace|merge   (body up to SNAPSHOT_MAX_BYTES)
/// │   ├── GET    /:collection
/// │   ├── POST   /:collection
/// │   ├── PUT    /:collection/:id
/// │   └── DELETE /:collection/:id
/// └── *          static front-end (when STATIC_DIR is set)
/// ```
///
/// # Middleware Stack
///
/// Outermost first: CORS, request tracing, then the session gate, which
/// wraps every route including the static fallback.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/auth/login", post(routes::auth::login))
        .route("/auth/logout", post(routes::auth::logout))
        .route(
            "/snapshot",
            get(routes::snapshot::export_snapshot)
                .post(routes::snapshot::import_snapshot)
                .layer(DefaultBodyLimit::max(state.config.api.snapshot_max_bytes)),
        )
        .route(
            "/:collection",
            get(routes::collections::list_documents).post(routes::collections::create_document),
        )
        .route(
            "/:collection/:id",
            put(routes::collections::update_document)
                .delete(routes::collections::delete_document),
        )
        .fallback(api_not_found);

    let router = Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api", api_routes);

    let router = match &state.config.api.static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router.fallback(page_not_found),
    };

    let cors = if state.config.api.cors_origins.iter().any(|o| o == "*") {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    router
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            session_gate_layer,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

async fn session_gate_layer(State(state): State<AppState>, req: Request, next: Next) -> Response {
    session_gate(state.session_secret(), req, next).await
}

async fn api_not_found() -> ApiError {
    ApiError::NotFound("No such endpoint".to_string())
}

async fn page_not_found() -> ApiError {
    ApiError::NotFound("Page not found".to_string())
}
