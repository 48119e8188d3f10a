/// Authentication and authorization for TaskHive
///
/// # Modules
///
/// - `jwt`: Token creation and validation (HS256, access/refresh pair)
/// - `password`: Argon2id password hashing and verification
/// - `middleware`: axum middleware for authentication, tenant scope
///   resolution, and route guards
/// - `authorization`: fine-grained permission evaluator over actor, action,
///   and resource
///
/// # Request Flow
///
/// ```text
/// Authorization: Bearer <token>
///         │
///         ▼
/// auth middleware ──── validates token, loads user ───► CurrentUser
///         │
///         ▼
/// tenant scope resolver ── header/path org candidate ──► TenantScope
///         │
///         ▼
/// route guards ── role / org-role / team-leader checks
///         │
///         ▼
/// handler ── can_perform_action(actor, action, resource)
/// ```

pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod password;
