/// Membership model and database operations
///
/// This module provides the Membership model for user-organization
/// relationships, plus the organization-scoped role hierarchy. It implements a
/// many-to-many relationship between users and organizations.
///
/// The organization role of a membership is completely independent of the
/// member's global [`crate::models::user::Role`]: a global `User` can be an
/// organization `SuperAdmin` and vice versa. The two hierarchies are never
/// merged or compared against each other.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE org_role AS ENUM ('member', 'manager', 'super_admin');
///
/// CREATE TABLE memberships (
///     organization_id UUID NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     role org_role NOT NULL DEFAULT 'member',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     PRIMARY KEY (organization_id, user_id)
/// );
/// ```
///
/// The composite primary key enforces the invariant of at most one membership
/// per (user, organization) pair.
///
/// # Example
///
/// ```no_run
/// use taskhive_shared::models::membership::{Membership, CreateMembership, OrgRole};
/// use uuid::Uuid;
///
/// # async fn example(pool: sqlx::PgPool, organization_id: Uuid, user_id: Uuid) -> Result<(), sqlx::Error> {
/// let membership = Membership::create(&pool, CreateMembership {
///     organization_id,
///     user_id,
///     role: OrgRole::Manager,
/// }).await?;
///
/// assert!(membership.role.is_at_least(OrgRole::Member));
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Organization-scoped roles
///
/// Hierarchy: Member(1) < Manager(2) < SuperAdmin(3). Independent of the
/// global role hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "org_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OrgRole {
    /// Regular organization member
    Member,

    /// Can manage members and teams
    Manager,

    /// Full control over the organization
    SuperAdmin,
}

impl OrgRole {
    /// Converts role to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            OrgRole::Member => "member",
            OrgRole::Manager => "manager",
            OrgRole::SuperAdmin => "super_admin",
        }
    }

    /// Returns numeric rank for hierarchy comparison
    pub fn rank(&self) -> u8 {
        match self {
            OrgRole::Member => 1,
            OrgRole::Manager => 2,
            OrgRole::SuperAdmin => 3,
        }
    }

    /// Checks if this role meets or exceeds the required organization role
    pub fn is_at_least(&self, required: OrgRole) -> bool {
        self.rank() >= required.rank()
    }
}

/// Membership model representing a user-organization relationship with role
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Membership {
    /// Organization ID
    pub organization_id: Uuid,

    /// User ID
    pub user_id: Uuid,

    /// Role within the organization
    pub role: OrgRole,

    /// When the membership was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new membership
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMembership {
    /// Organization ID
    pub organization_id: Uuid,

    /// User ID
    pub user_id: Uuid,

    /// Role to assign (defaults to Member)
    #[serde(default = "default_role")]
    pub role: OrgRole,
}

fn default_role() -> OrgRole {
    OrgRole::Member
}

impl Membership {
    /// Creates a new membership (adds user to organization)
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Membership already exists (unique constraint violation)
    /// - Organization or user doesn't exist (foreign key violation)
    /// - Database connection fails
    pub async fn create(pool: &PgPool, data: CreateMembership) -> Result<Self, sqlx::Error> {
        let membership = sqlx::query_as::<_, Membership>(
            r#"
            INSERT INTO memberships (organization_id, user_id, role)
            VALUES ($1, $2, $3)
            RETURNING organization_id, user_id, role, created_at
            "#,
        )
        .bind(data.organization_id)
        .bind(data.user_id)
        .bind(data.role)
        .fetch_one(pool)
        .await?;

        Ok(membership)
    }

    /// Finds a specific membership by organization and user
    ///
    /// This is the lookup the tenant scope resolver performs once per
    /// request. It is a point read with no side effects.
    pub async fn find(
        pool: &PgPool,
        organization_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let membership = sqlx::query_as::<_, Membership>(
            r#"
            SELECT organization_id, user_id, role, created_at
            FROM memberships
            WHERE organization_id = $1 AND user_id = $2
            "#,
        )
        .bind(organization_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(membership)
    }

    /// Checks if a user has access to an organization (any role)
    pub async fn has_access(
        pool: &PgPool,
        organization_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM memberships
                WHERE organization_id = $1 AND user_id = $2
            )
            "#,
        )
        .bind(organization_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }

    /// Gets a user's role in an organization
    pub async fn get_role(
        pool: &PgPool,
        organization_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<OrgRole>, sqlx::Error> {
        let role: Option<OrgRole> = sqlx::query_scalar(
            r#"
            SELECT role FROM memberships
            WHERE organization_id = $1 AND user_id = $2
            "#,
        )
        .bind(organization_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(role)
    }

    /// Updates a user's role in an organization
    ///
    /// # Returns
    ///
    /// The updated membership if found, None if the membership doesn't exist
    pub async fn update_role(
        pool: &PgPool,
        organization_id: Uuid,
        user_id: Uuid,
        role: OrgRole,
    ) -> Result<Option<Self>, sqlx::Error> {
        let membership = sqlx::query_as::<_, Membership>(
            r#"
            UPDATE memberships
            SET role = $3
            WHERE organization_id = $1 AND user_id = $2
            RETURNING organization_id, user_id, role, created_at
            "#,
        )
        .bind(organization_id)
        .bind(user_id)
        .bind(role)
        .fetch_optional(pool)
        .await?;

        Ok(membership)
    }

    /// Deletes a membership (removes user from organization)
    pub async fn delete(
        pool: &PgPool,
        organization_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM memberships WHERE organization_id = $1 AND user_id = $2")
                .bind(organization_id)
                .bind(user_id)
                .execute(pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists all members of an organization
    pub async fn list_by_organization(
        pool: &PgPool,
        organization_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let memberships = sqlx::query_as::<_, Membership>(
            r#"
            SELECT organization_id, user_id, role, created_at
            FROM memberships
            WHERE organization_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(organization_id)
        .fetch_all(pool)
        .await?;

        Ok(memberships)
    }

    /// Lists all organizations a user belongs to
    pub async fn list_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let memberships = sqlx::query_as::<_, Membership>(
            r#"
            SELECT organization_id, user_id, role, created_at
            FROM memberships
            WHERE user_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(memberships)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_org_role_as_str() {
        assert_eq!(OrgRole::Member.as_str(), "member");
        assert_eq!(OrgRole::Manager.as_str(), "manager");
        assert_eq!(OrgRole::SuperAdmin.as_str(), "super_admin");
    }

    #[test]
    fn test_org_role_hierarchy() {
        assert!(OrgRole::Manager.is_at_least(OrgRole::Member));
        assert!(!OrgRole::Member.is_at_least(OrgRole::Manager));
        assert!(OrgRole::SuperAdmin.is_at_least(OrgRole::Member));
        assert!(OrgRole::SuperAdmin.is_at_least(OrgRole::Manager));
        assert!(!OrgRole::Manager.is_at_least(OrgRole::SuperAdmin));
    }

    #[test]
    fn test_org_role_satisfies_itself() {
        for role in [OrgRole::Member, OrgRole::Manager, OrgRole::SuperAdmin] {
            assert!(role.is_at_least(role));
        }
    }

    #[test]
    fn test_create_membership_default_role() {
        assert_eq!(default_role(), OrgRole::Member);
    }
}
