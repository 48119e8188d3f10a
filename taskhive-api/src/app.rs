/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use taskhive_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = taskhive_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    http::{header, Method},
    middleware::from_fn,
    routing::{delete, get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use taskhive_shared::auth::middleware::{
    create_auth_middleware, create_tenant_scope_middleware, require_min_role, require_org_role,
    require_team_leader,
};
use taskhive_shared::models::{membership::OrgRole, user::Role};
use tower_http::{
    cors::{Any, CorsLayer},
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

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
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
/// ├── /health                          # Health check (public)
/// ├── /v1/
/// │   ├── /auth/                       # Authentication (public)
/// │   │   ├── POST /register
/// │   │   ├── POST /login
/// │   │   └── POST /refresh
/// │   ├── /me                          # Own profile (authenticated)
/// │   ├── /tasks/                      # Tasks (authenticated, org via header)
/// │   ├── /orgs/                       # Organizations and teams
/// │   └── /users/                      # User administration (Admin+)
/// ```
///
/// # Middleware Stack
///
/// Authenticated routers stack three layers; the last `.layer()` call runs
/// first, so the order below gives: authentication → tenant scope → guard.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let auth_layer = from_fn(create_auth_middleware(
        state.db.clone(),
        state.config.jwt.secret.clone(),
    ));
    let tenant_layer = from_fn(create_tenant_scope_middleware(state.db.clone()));

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Auth routes (public, no auth required)
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/refresh", post(routes::auth::refresh));

    // Task routes; organization context comes from the X-Organization-Id
    // header, personal tasks when absent
    let task_routes = Router::new()
        .route("/", post(routes::tasks::create_task).get(routes::tasks::list_tasks))
        .route(
            "/:task_id",
            get(routes::tasks::get_task)
                .put(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        )
        .route("/:task_id/assign", post(routes::tasks::assign_task))
        .layer(tenant_layer.clone())
        .layer(auth_layer.clone());

    // Organization routes; the org_id path parameter feeds the tenant scope
    // resolver, and org-role guards are attached per method since read and
    // write on the same path need different minimums
    let org_routes = Router::new()
        .route("/", post(routes::organizations::create_organization))
        .route(
            "/:org_id",
            get(routes::organizations::get_organization)
                .layer(from_fn(require_org_role(OrgRole::Member))),
        )
        .route(
            "/:org_id/members",
            get(routes::organizations::list_members)
                .layer(from_fn(require_org_role(OrgRole::Member)))
                .merge(
                    post(routes::organizations::add_member)
                        .layer(from_fn(require_org_role(OrgRole::Manager))),
                ),
        )
        .route(
            "/:org_id/members/:user_id",
            put(routes::organizations::update_member_role)
                .delete(routes::organizations::remove_member)
                .layer(from_fn(require_org_role(OrgRole::Manager))),
        )
        .route(
            "/:org_id/teams",
            get(routes::teams::list_teams)
                .layer(from_fn(require_org_role(OrgRole::Member)))
                .merge(
                    post(routes::teams::create_team)
                        .layer(from_fn(require_org_role(OrgRole::Manager))),
                ),
        )
        .layer(tenant_layer.clone())
        .layer(auth_layer.clone());

    // Team membership; mutations sit behind the team-leader guard, listing is
    // open to the team's organization (checked in the handler)
    let team_routes = Router::new()
        .route(
            "/:team_id/members",
            get(routes::teams::list_team_members).merge(
                post(routes::teams::add_team_member)
                    .layer(from_fn(require_team_leader(state.db.clone()))),
            ),
        )
        .route(
            "/:team_id/members/:user_id",
            delete(routes::teams::remove_team_member)
                .layer(from_fn(require_team_leader(state.db.clone()))),
        )
        .layer(auth_layer.clone());

    // User administration (global Admin and above)
    let user_admin_routes = Router::new()
        .route("/", get(routes::users::list_users))
        .route("/:user_id/role", put(routes::users::update_user_role))
        .route("/:user_id/active", put(routes::users::set_user_active))
        .layer(from_fn(require_min_role(Role::Admin)))
        .layer(auth_layer.clone());

    let v1_routes = Router::new()
        .route(
            "/me",
            get(routes::users::get_me)
                .put(routes::users::update_me)
                .layer(auth_layer.clone()),
        )
        .nest("/auth", auth_routes)
        .nest("/tasks", task_routes)
        .nest("/orgs", org_routes)
        .nest("/teams", team_routes)
        .nest("/users", user_admin_routes);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

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
