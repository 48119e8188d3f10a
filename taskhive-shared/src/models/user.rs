/// User model and database operations
///
/// This module provides the User model and CRUD operations for managing user
/// accounts, plus the global role hierarchy used for platform-wide permission
/// checks. Users can belong to multiple organizations via the Membership model;
/// the global role is independent of any organization-scoped role.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE user_role AS ENUM (
///     'user', 'team_lead', 'manager', 'admin', 'super_admin'
/// );
///
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     email CITEXT NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     name VARCHAR(255),
///     role user_role NOT NULL DEFAULT 'user',
///     is_active BOOLEAN NOT NULL DEFAULT TRUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     last_login_at TIMESTAMPTZ
/// );
/// ```
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
///     name: Some("Jane Doe".to_string()),
///     role: Role::User,
/// }).await?;
///
/// assert!(user.role.is_at_least(Role::User));
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Global (platform-wide) user roles
///
/// A single scalar rank per user. This hierarchy is totally ordered and is
/// completely independent of the organization-scoped role hierarchy
/// ([`crate::models::membership::OrgRole`]) — the two must never be compared
/// against each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Regular user, can create and manage own tasks
    User,

    /// Can assign tasks within teams
    TeamLead,

    /// Can read and update any task, and manage resources
    Manager,

    /// Full access to all resources
    Admin,

    /// Unconditional access to everything
    SuperAdmin,
}

impl Role {
    /// Converts role to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::TeamLead => "team_lead",
            Role::Manager => "manager",
            Role::Admin => "admin",
            Role::SuperAdmin => "super_admin",
        }
    }

    /// Returns numeric rank for hierarchy comparison
    ///
    /// Hierarchy: User(1) < TeamLead(2) < Manager(3) < Admin(4) < SuperAdmin(5)
    pub fn rank(&self) -> u8 {
        match self {
            Role::User => 1,
            Role::TeamLead => 2,
            Role::Manager => 3,
            Role::Admin => 4,
            Role::SuperAdmin => 5,
        }
    }

    /// Checks if this role meets or exceeds the required role
    ///
    /// Defined as `rank(self) >= rank(required)`. This is the only ordering
    /// operation the hierarchy supports — no partial orders, no role
    /// combinations.
    pub fn is_at_least(&self, required: Role) -> bool {
        self.rank() >= required.rank()
    }
}

/// User model representing a user account
///
/// Accounts are never physically deleted; closure flips `is_active` instead.
/// Passwords are stored as Argon2id hashes, never in plaintext.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Email address (case-insensitive via CITEXT), unique across all users
    pub email: String,

    /// Argon2id password hash
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Optional display name
    pub name: Option<String>,

    /// Global role within the platform
    pub role: Role,

    /// Whether the account is active; inactive accounts cannot authenticate
    pub is_active: bool,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,

    /// When the user last logged in
    pub last_login_at: Option<DateTime<Utc>>,
}

/// Input for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Email address (must be unique)
    pub email: String,

    /// Argon2id password hash (NOT the plaintext password!)
    pub password_hash: String,

    /// Optional display name
    pub name: Option<String>,

    /// Global role (defaults to User)
    #[serde(default = "default_role")]
    pub role: Role,
}

fn default_role() -> Role {
    Role::User
}

impl User {
    /// Creates a new user in the database
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Email already exists (unique constraint violation)
    /// - Database connection fails
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, name, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, password_hash, name, role, is_active,
                      created_at, updated_at, last_login_at
            "#,
        )
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.name)
        .bind(data.role)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, name, role, is_active,
                   created_at, updated_at, last_login_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by email address
    ///
    /// Lookup is case-insensitive (CITEXT column type).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, name, role, is_active,
                   created_at, updated_at, last_login_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Updates a user's global role
    ///
    /// # Returns
    ///
    /// The updated user if found, None otherwise
    pub async fn update_role(
        pool: &PgPool,
        id: Uuid,
        role: Role,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET role = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, email, password_hash, name, role, is_active,
                      created_at, updated_at, last_login_at
            "#,
        )
        .bind(id)
        .bind(role)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Updates a user's display name
    pub async fn update_name(
        pool: &PgPool,
        id: Uuid,
        name: Option<String>,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, email, password_hash, name, role, is_active,
                      created_at, updated_at, last_login_at
            "#,
        )
        .bind(id)
        .bind(name)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Activates or deactivates an account
    ///
    /// Deactivation is the soft-delete path; user rows are never removed.
    pub async fn set_active(
        pool: &PgPool,
        id: Uuid,
        is_active: bool,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET is_active = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, email, password_hash, name, role, is_active,
                      created_at, updated_at, last_login_at
            "#,
        )
        .bind(id)
        .bind(is_active)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Records a successful login
    pub async fn touch_last_login(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Lists users with pagination, newest first
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Self>, sqlx::Error> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, name, role, is_active,
                   created_at, updated_at, last_login_at
            FROM users
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_as_str() {
        assert_eq!(Role::User.as_str(), "user");
        assert_eq!(Role::TeamLead.as_str(), "team_lead");
        assert_eq!(Role::Manager.as_str(), "manager");
        assert_eq!(Role::Admin.as_str(), "admin");
        assert_eq!(Role::SuperAdmin.as_str(), "super_admin");
    }

    #[test]
    fn test_role_ranks_are_totally_ordered() {
        assert!(Role::User.rank() < Role::TeamLead.rank());
        assert!(Role::TeamLead.rank() < Role::Manager.rank());
        assert!(Role::Manager.rank() < Role::Admin.rank());
        assert!(Role::Admin.rank() < Role::SuperAdmin.rank());
    }

    #[test]
    fn test_is_at_least_matches_rank_comparison() {
        let roles = [
            Role::User,
            Role::TeamLead,
            Role::Manager,
            Role::Admin,
            Role::SuperAdmin,
        ];

        for r1 in roles {
            for r2 in roles {
                assert_eq!(r1.is_at_least(r2), r1.rank() >= r2.rank());
            }
        }
    }

    #[test]
    fn test_is_at_least_extremes() {
        assert!(Role::SuperAdmin.is_at_least(Role::User));
        assert!(!Role::User.is_at_least(Role::SuperAdmin));

        // A role always satisfies itself
        assert!(Role::Manager.is_at_least(Role::Manager));
    }

    #[test]
    fn test_create_user_default_role() {
        assert_eq!(default_role(), Role::User);
    }

    // Integration tests for database operations require a live PostgreSQL
    // instance and live with the API integration tests.
}
