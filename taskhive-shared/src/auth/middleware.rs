/// Authentication and authorization middleware for axum
///
/// Three layers of request plumbing live here:
///
/// 1. **Authentication** ([`create_auth_middleware`]): validates the Bearer
///    token and loads the actor from the database into a [`CurrentUser`]
///    request extension. The actor is looked up fresh on every request, so
///    role changes and deactivations apply immediately.
/// 2. **Tenant scope resolution** ([`create_tenant_scope_middleware`]):
///    derives the organization context for the request and verifies the actor
///    belongs to it, inserting a [`TenantScope`] extension on success.
/// 3. **Guards** ([`require_role`], [`require_min_role`], [`require_org_role`],
///    [`require_team_leader`]): short-circuiting checks applied per route.
///
/// # Layer Ordering
///
/// With axum, the last `.layer()` added runs first. Routers therefore add the
/// guard first, then tenant scope, then authentication:
///
/// ```text
/// router
///     .layer(from_fn(require_org_role(OrgRole::Manager)))
///     .layer(from_fn(create_tenant_scope_middleware(pool.clone())))
///     .layer(from_fn(create_auth_middleware(pool, secret)))
/// ```

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use axum::{
    extract::{FromRequestParts, Path, Request},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use super::jwt::{validate_access_token, JwtError};
use crate::models::membership::{Membership, OrgRole};
use crate::models::team::TeamMembership;
use crate::models::user::{Role, User};

/// Header carrying the requested organization context
///
/// Takes precedence over the `org_id` path parameter when both are present.
pub const ORG_HEADER: &str = "X-Organization-Id";

/// Authenticated actor, inserted into request extensions
///
/// A snapshot of the user row loaded during authentication. Downstream
/// handlers read it with `Extension<CurrentUser>`.
#[derive(Debug, Clone, Serialize)]
pub struct CurrentUser {
    /// User ID
    pub id: Uuid,

    /// User email
    pub email: String,

    /// Global platform role
    pub role: Role,

    /// Whether the account is active
    pub is_active: bool,
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            role: user.role,
            is_active: user.is_active,
        }
    }
}

/// Resolved organization context, inserted into request extensions
///
/// Present only when the tenant scope resolver found both an actor and an
/// organization candidate and confirmed the membership. Handlers that demand
/// it use the org-role guard or check for the extension themselves.
#[derive(Debug, Clone, Serialize)]
pub struct TenantScope {
    /// The organization this request operates within
    pub organization_id: Uuid,

    /// The actor's role inside that organization
    pub role: OrgRole,
}

/// Error type for authentication and authorization middleware
#[derive(Debug)]
pub enum AuthError {
    /// No usable credentials on the request (401)
    Unauthenticated(&'static str),

    /// Credentials were presented but failed validation (401)
    InvalidToken(String),

    /// Actor is known but not allowed (403)
    Forbidden(&'static str),

    /// Malformed identifier in the request (400)
    InvalidFormat(String),

    /// Database lookup failed (500)
    Database(sqlx::Error),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::Unauthenticated(msg) => (StatusCode::UNAUTHORIZED, msg).into_response(),
            AuthError::InvalidToken(msg) => (StatusCode::UNAUTHORIZED, msg).into_response(),
            AuthError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg).into_response(),
            AuthError::InvalidFormat(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            AuthError::Database(e) => {
                tracing::error!("Database error in auth middleware: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

type MiddlewareFuture = Pin<Box<dyn Future<Output = Result<Response, AuthError>> + Send>>;

async fn auth_middleware(
    pool: PgPool,
    secret: String,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::Unauthenticated("Access token required"))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?;

    let claims = validate_access_token(token, &secret).map_err(|e| match e {
        JwtError::Expired => AuthError::InvalidToken("Token has expired".to_string()),
        other => AuthError::InvalidToken(format!("Invalid token: {}", other)),
    })?;

    let user = User::find_by_id(&pool, claims.sub)
        .await
        .map_err(AuthError::Database)?
        .ok_or(AuthError::Unauthenticated("Authentication required"))?;

    if !user.is_active {
        return Err(AuthError::Forbidden("Account is deactivated"));
    }

    tracing::debug!(user_id = %user.id, role = user.role.as_str(), "Authenticated request");

    req.extensions_mut().insert(CurrentUser::from(&user));
    Ok(next.run(req).await)
}

/// Creates authentication middleware bound to a pool and JWT secret
///
/// Requests without an Authorization header are rejected with 401
/// "Access token required". Deactivated accounts are rejected with 403 even
/// when their token is still valid.
pub fn create_auth_middleware(
    pool: PgPool,
    secret: impl Into<String>,
) -> impl Fn(Request, Next) -> MiddlewareFuture + Clone {
    let secret = secret.into();
    move |req, next| {
        let pool = pool.clone();
        let secret = secret.clone();
        Box::pin(auth_middleware(pool, secret, req, next))
    }
}

async fn tenant_scope_middleware(
    pool: PgPool,
    req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let header_candidate = req
        .headers()
        .get(ORG_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    // Path params aren't available on the Request directly; split the request
    // apart to run the extractor, then reassemble it.
    let (mut parts, body) = req.into_parts();
    let path_candidate = match Path::<HashMap<String, String>>::from_request_parts(&mut parts, &())
        .await
    {
        Ok(Path(params)) => params.get("org_id").cloned(),
        Err(_) => None,
    };
    let mut req = Request::from_parts(parts, body);

    // Header wins over the path parameter when both are present.
    let Some(candidate) = header_candidate.or(path_candidate) else {
        // No organization context requested; personal-scope request.
        return Ok(next.run(req).await);
    };

    // No actor means nothing to scope; route-level guards decide whether
    // that's acceptable.
    let Some(user) = req.extensions().get::<CurrentUser>().cloned() else {
        return Ok(next.run(req).await);
    };

    let organization_id = Uuid::parse_str(&candidate)
        .map_err(|_| AuthError::InvalidFormat("Invalid organization identifier".to_string()))?;

    let membership = Membership::find(&pool, organization_id, user.id)
        .await
        .map_err(AuthError::Database)?
        .ok_or(AuthError::Forbidden(
            "You are not a member of this organization",
        ))?;

    tracing::debug!(
        user_id = %user.id,
        organization_id = %organization_id,
        org_role = membership.role.as_str(),
        "Resolved tenant scope"
    );

    req.extensions_mut().insert(TenantScope {
        organization_id,
        role: membership.role,
    });
    Ok(next.run(req).await)
}

/// Creates tenant scope resolution middleware
///
/// Resolution order:
///
/// 1. Take the organization candidate from the `X-Organization-Id` header,
///    falling back to the `org_id` path parameter.
/// 2. No candidate → pass through without a [`TenantScope`].
/// 3. No authenticated actor → pass through; mixed public/private routers
///    rely on guards to reject where it matters.
/// 4. Candidate not a UUID → 400.
/// 5. Actor not a member of the organization → 403 "You are not a member of
///    this organization". Otherwise insert the [`TenantScope`].
pub fn create_tenant_scope_middleware(
    pool: PgPool,
) -> impl Fn(Request, Next) -> MiddlewareFuture + Clone {
    move |req, next| {
        let pool = pool.clone();
        Box::pin(tenant_scope_middleware(pool, req, next))
    }
}

async fn role_guard(allowed: Vec<Role>, req: Request, next: Next) -> Result<Response, AuthError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or(AuthError::Unauthenticated("Authentication required"))?;

    if !allowed.contains(&user.role) {
        return Err(AuthError::Forbidden("Insufficient permissions"));
    }

    Ok(next.run(req).await)
}

/// Creates a guard that requires one of an explicit set of global roles
///
/// Exact-match check; no hierarchy shortcut. Use [`require_min_role`] for
/// "this rank or above".
pub fn require_role(allowed: Vec<Role>) -> impl Fn(Request, Next) -> MiddlewareFuture + Clone {
    move |req, next| {
        let allowed = allowed.clone();
        Box::pin(role_guard(allowed, req, next))
    }
}

async fn min_role_guard(min: Role, req: Request, next: Next) -> Result<Response, AuthError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or(AuthError::Unauthenticated("Authentication required"))?;

    if !user.role.is_at_least(min) {
        return Err(AuthError::Forbidden("Insufficient permissions"));
    }

    Ok(next.run(req).await)
}

/// Creates a guard that requires a minimum global role rank
pub fn require_min_role(min: Role) -> impl Fn(Request, Next) -> MiddlewareFuture + Clone {
    move |req, next| Box::pin(min_role_guard(min, req, next))
}

async fn org_role_guard(min: OrgRole, req: Request, next: Next) -> Result<Response, AuthError> {
    let scope = req
        .extensions()
        .get::<TenantScope>()
        .ok_or(AuthError::Forbidden("Organization context required"))?;

    if !scope.role.is_at_least(min) {
        return Err(AuthError::Forbidden("Insufficient organization permissions"));
    }

    Ok(next.run(req).await)
}

/// Creates a guard that requires a minimum organization role
///
/// Depends on the tenant scope resolver having run first; without a resolved
/// [`TenantScope`] the request is rejected with 403 "Organization context
/// required".
pub fn require_org_role(min: OrgRole) -> impl Fn(Request, Next) -> MiddlewareFuture + Clone {
    move |req, next| Box::pin(org_role_guard(min, req, next))
}

async fn team_leader_guard(pool: PgPool, req: Request, next: Next) -> Result<Response, AuthError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .cloned()
        .ok_or(AuthError::Unauthenticated("Authentication required"))?;

    let (mut parts, body) = req.into_parts();
    let team_id_raw = match Path::<HashMap<String, String>>::from_request_parts(&mut parts, &())
        .await
    {
        Ok(Path(params)) => params.get("team_id").cloned(),
        Err(_) => None,
    };
    let req = Request::from_parts(parts, body);

    let team_id_raw = team_id_raw
        .ok_or_else(|| AuthError::InvalidFormat("Missing team identifier".to_string()))?;
    let team_id = Uuid::parse_str(&team_id_raw)
        .map_err(|_| AuthError::InvalidFormat("Invalid team identifier".to_string()))?;

    let is_leader = TeamMembership::is_leader(&pool, team_id, user.id)
        .await
        .map_err(AuthError::Database)?;

    if !is_leader {
        return Err(AuthError::Forbidden(
            "Only team leaders can perform this action",
        ));
    }

    Ok(next.run(req).await)
}

/// Creates a guard that requires leadership of the team in the path
///
/// Reads the `team_id` path parameter and checks the actor holds the Leader
/// role in that team. Non-members and plain members both get the same 403.
pub fn require_team_leader(pool: PgPool) -> impl Fn(Request, Next) -> MiddlewareFuture + Clone {
    move |req, next| {
        let pool = pool.clone();
        Box::pin(team_leader_guard(pool, req, next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use chrono::Utc;

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_unauthenticated_maps_to_401() {
        let response = AuthError::Unauthenticated("Access token required").into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_text(response).await, "Access token required");
    }

    #[tokio::test]
    async fn test_forbidden_maps_to_403() {
        let response =
            AuthError::Forbidden("You are not a member of this organization").into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            body_text(response).await,
            "You are not a member of this organization"
        );
    }

    #[tokio::test]
    async fn test_invalid_format_maps_to_400() {
        let response =
            AuthError::InvalidFormat("Invalid organization identifier".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(response).await, "Invalid organization identifier");
    }

    #[tokio::test]
    async fn test_database_error_hides_details() {
        let response = AuthError::Database(sqlx::Error::PoolClosed).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_text(response).await, "Internal server error");
    }

    #[test]
    fn test_current_user_from_user_row() {
        let user = User {
            id: Uuid::new_v4(),
            email: "lead@example.com".to_string(),
            password_hash: "hash".to_string(),
            name: Some("Lead".to_string()),
            role: Role::TeamLead,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            last_login_at: None,
        };

        let current = CurrentUser::from(&user);
        assert_eq!(current.id, user.id);
        assert_eq!(current.email, user.email);
        assert_eq!(current.role, Role::TeamLead);
        assert!(current.is_active);
    }
}
