use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post, put},
    Router,
};
use domain::services::{ContentGateway, ImageAttachment, ImageDetacher, ObjectStorage};
use persistence::repositories::ContentRepository;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    login_rate_limit, metrics_handler, metrics_middleware, require_admin_session,
    security_headers_middleware, trace_id, RateLimiterState,
};
use crate::routes::{admin, auth, content, draft, health, uploaded_files};
use crate::services::{build_storage, AdminAuth, CleanupQueue, ContentService, DraftStore};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    /// Login attempt limiter (None when disabled)
    pub rate_limiter: Option<Arc<RateLimiterState>>,
    pub auth: Arc<AdminAuth>,
    pub content: Arc<ContentService>,
    pub drafts: Arc<DraftStore>,
    pub images: Arc<ImageAttachment>,
    pub storage: Arc<dyn ObjectStorage>,
}

impl AppState {
    /// Wires the Postgres gateway and the configured storage adapter.
    pub fn new(config: Config, pool: PgPool) -> anyhow::Result<Self> {
        let gateway = Arc::new(ContentRepository::new(pool.clone()));
        let storage = build_storage(&config.storage)?;
        Self::with_services(config, pool, gateway, storage)
    }

    /// Builds state around explicit gateway and storage implementations.
    ///
    /// Starts the image cleanup worker, so this must run inside a Tokio
    /// runtime.
    pub fn with_services(
        config: Config,
        pool: PgPool,
        gateway: Arc<dyn ContentGateway>,
        storage: Arc<dyn ObjectStorage>,
    ) -> anyhow::Result<Self> {
        let auth = AdminAuth::from_config(&config.auth)?;

        let rate_limiter = (config.security.login_rate_limit_per_minute > 0).then(|| {
            Arc::new(RateLimiterState::new(
                config.security.login_rate_limit_per_minute,
            ))
        });

        let (cleanup, _worker) = CleanupQueue::start(storage.clone());
        let detacher = ImageDetacher::new(
            Arc::new(cleanup),
            config.storage.bundled_asset_prefix.clone(),
        );
        let images = ImageAttachment::new(
            storage.clone(),
            detacher,
            config.storage.max_upload_bytes,
        );

        let content = ContentService::new(
            gateway,
            Duration::from_secs(config.cache.public_ttl_secs),
        );

        Ok(Self {
            pool,
            config: Arc::new(config),
            rate_limiter,
            auth: Arc::new(auth),
            content: Arc::new(content),
            drafts: Arc::new(DraftStore::new()),
            images: Arc::new(images),
            storage,
        })
    }
}

pub fn create_app(config: Config, pool: PgPool) -> anyhow::Result<Router> {
    Ok(router(AppState::new(config, pool)?))
}

pub fn router(state: AppState) -> Router {
    let config = state.config.clone();

    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Public reads and probes
    let mut public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler))
        .route("/api/v1/content", get(content::get_content))
        .route("/api/v1/content/menu", get(content::get_menu))
        .route("/api/v1/content/staff", get(content::get_staff))
        .route("/api/v1/content/gallery", get(content::get_gallery))
        .route("/api/v1/content/faq", get(content::get_faq))
        .route("/api/v1/content/site-info", get(content::get_site_info));

    // Local uploads are served by this process
    let base = config.storage.public_base_url.trim_end_matches('/');
    if config.storage.provider == "local" && base.starts_with('/') && base.len() > 1 {
        public_routes = public_routes.route(
            &format!("{}/*key", base),
            get(uploaded_files::serve_upload),
        );
    }

    let login_routes = Router::new()
        .route("/api/v1/admin/login", post(auth::login))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            login_rate_limit,
        ));

    // Admin JSON routes
    let admin_routes = Router::new()
        .route("/api/v1/admin/logout", post(auth::logout))
        .route("/api/v1/admin/session", get(auth::current_session))
        .route(
            "/api/v1/admin/draft",
            get(draft::get_draft).delete(draft::discard_draft),
        )
        .route("/api/v1/admin/draft/sections", put(draft::replace_section))
        .route("/api/v1/admin/draft/edits", post(draft::apply_edit))
        .route("/api/v1/admin/draft/commit", post(draft::commit))
        .route("/api/v1/admin/content", post(admin::save_content))
        .route("/api/v1/admin/images/delete", post(admin::delete_image))
        .layer(DefaultBodyLimit::max(config.server.max_body_size))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_admin_session,
        ));

    // Admin raw image bodies
    let upload_routes = Router::new()
        .route("/api/v1/admin/draft/images", post(draft::upload_image))
        .route("/api/v1/admin/uploads", post(admin::upload))
        .layer(DefaultBodyLimit::max(config.storage.max_upload_bytes))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_admin_session,
        ));

    Router::new()
        .merge(public_routes)
        .merge(login_routes)
        .merge(admin_routes)
        .merge(upload_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            security_headers_middleware,
        ))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
