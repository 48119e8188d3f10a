/// Database models for TaskHive
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: User accounts and the global role hierarchy
/// - `organization`: Tenants for multi-organization isolation
/// - `membership`: User-organization relationships with org-scoped roles
/// - `team`: Teams nested in organizations, with team-scoped roles
/// - `task`: Tasks with ownership fields used for permission checks
///
/// # Example
///
/// ```no_run
/// use taskhive_shared::models::user::{User, CreateUser, Role};
///
/// # async fn example(pool: sqlx::PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let user = User::create(&pool, CreateUser {
///     email: "user@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     name: None,
///     role: Role::User,
/// }).await?;
/// # Ok(())
/// # }
/// ```

pub mod membership;
pub mod organization;
pub mod task;
pub mod team;
pub mod user;
