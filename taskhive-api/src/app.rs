/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use taskhive_api::{app::AppState, config::Config};
/// use taskhive_shared::blob::HttpBlobStore;
/// use sqlx::PgPool;
/// use std::sync::Arc;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let blob = Arc::new(HttpBlobStore::new(
///     config.blob.base_url.clone(),
///     config.blob.api_key.clone(),
/// ));
/// let state = AppState::new(pool, blob, config);
/// let app = taskhive_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{delete, get, patch, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use taskhive_shared::auth::{jwt, Principal};
use taskhive_shared::blob::BlobStore;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Blob store collaborator for document bytes
    pub blob: Arc<dyn BlobStore>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, blob: Arc<dyn BlobStore>, config: Config) -> Self {
        Self {
            db,
            blob,
            config: Arc::new(config),
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                               # Health check (public)
/// └── /v1/                                  # API v1 (authenticated)
///     ├── /projects                         # Project CRUD
///     │   ├── /:id/members                  # Membership management
///     │   ├── /:id/leave                    # Leave project
///     │   ├── /:id/tasks                    # Task CRUD
///     │   ├── /:id/notes                    # Note CRUD
///     │   └── /:id/documents                # Document upload/list/delete
///     ├── /tasks/:task_id/subtasks          # SubTask CRUD
///     ├── /notifications                    # List / mark read
///     └── /users                            # Profile + admin deletion
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Authentication (everything under /v1)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let project_routes = Router::new()
        .route("/", post(routes::projects::create_project))
        .route("/", get(routes::projects::list_projects))
        .route("/:id", get(routes::projects::get_project))
        .route("/:id", patch(routes::projects::update_project))
        .route("/:id", delete(routes::projects::delete_project))
        .route("/:id/members", get(routes::members::list_members))
        .route("/:id/members", post(routes::members::add_member))
        .route(
            "/:id/members/:user_id",
            patch(routes::members::update_member_role),
        )
        .route(
            "/:id/members/:user_id",
            delete(routes::members::remove_member),
        )
        .route("/:id/leave", post(routes::members::leave_project))
        .route("/:id/tasks", post(routes::tasks::create_task))
        .route("/:id/tasks", get(routes::tasks::list_tasks))
        .route("/:id/tasks/:task_id", patch(routes::tasks::update_task))
        .route("/:id/tasks/:task_id", delete(routes::tasks::delete_task))
        .route("/:id/notes", post(routes::notes::create_note))
        .route("/:id/notes", get(routes::notes::list_notes))
        .route("/:id/notes/:note_id", delete(routes::notes::delete_note))
        .route("/:id/documents", post(routes::documents::upload_document))
        .route("/:id/documents", get(routes::documents::list_documents))
        .route(
            "/:id/documents/:document_id",
            delete(routes::documents::delete_document),
        );

    let subtask_routes = Router::new()
        .route(
            "/:task_id/subtasks",
            post(routes::subtasks::create_subtask),
        )
        .route("/:task_id/subtasks", get(routes::subtasks::list_subtasks))
        .route(
            "/:task_id/subtasks/:subtask_id",
            patch(routes::subtasks::update_subtask),
        )
        .route(
            "/:task_id/subtasks/:subtask_id",
            delete(routes::subtasks::delete_subtask),
        );

    let notification_routes = Router::new()
        .route("/", get(routes::notifications::list_notifications))
        .route("/:id/read", post(routes::notifications::mark_read));

    let user_routes = Router::new()
        .route("/me", get(routes::users::get_profile))
        .route("/me", patch(routes::users::update_profile))
        .route("/:id", delete(routes::users::delete_user));

    // Everything under /v1 requires a valid bearer token
    let v1_routes = Router::new()
        .nest("/projects", project_routes)
        .nest("/tasks", subtask_routes)
        .nest("/notifications", notification_routes)
        .nest("/users", user_routes)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        // Production mode: configure allowed origins
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
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// JWT authentication middleware layer
///
/// Extracts and validates the bearer token from the Authorization header,
/// then injects the resolved `Principal` into request extensions. The core
/// never sees an unauthenticated request.
async fn jwt_auth_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, crate::error::ApiError> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            crate::error::ApiError::Unauthorized("Missing authorization header".to_string())
        })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        crate::error::ApiError::BadRequest("Expected Bearer token".to_string())
    })?;

    let claims = jwt::validate_token(token, state.jwt_secret())?;

    let principal = if claims.is_super_admin {
        Principal::SuperAdmin {
            user_id: claims.sub,
        }
    } else {
        Principal::User {
            user_id: claims.sub,
        }
    };

    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}
