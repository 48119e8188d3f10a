/// Organization model and database operations
///
/// Organizations are the tenant boundary of TaskHive. Every team, membership,
/// and tenant-scoped task lives inside exactly one organization. Any
/// authenticated user may create an organization and becomes its first
/// membership holder.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE organizations (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     slug VARCHAR(100) NOT NULL UNIQUE,
///     plan VARCHAR(50) NOT NULL DEFAULT 'free',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT organizations_plan_check CHECK (
///         plan IN ('free', 'starter', 'business', 'enterprise')
///     )
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Billing plan types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrganizationPlan {
    /// Free tier
    Free,

    /// Entry-level paid plan
    Starter,

    /// Standard paid plan
    Business,

    /// Custom enterprise plan
    Enterprise,
}

impl OrganizationPlan {
    /// Converts plan to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            OrganizationPlan::Free => "free",
            OrganizationPlan::Starter => "starter",
            OrganizationPlan::Business => "business",
            OrganizationPlan::Enterprise => "enterprise",
        }
    }
}

/// Organization model representing a tenant
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Organization {
    /// Unique organization ID
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// URL-safe unique identifier
    pub slug: String,

    /// Billing plan
    pub plan: OrganizationPlan,

    /// When the organization was created
    pub created_at: DateTime<Utc>,

    /// When the organization was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new organization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrganization {
    /// Display name
    pub name: String,

    /// URL-safe unique identifier
    pub slug: String,

    /// Billing plan (defaults to Free)
    #[serde(default = "default_plan")]
    pub plan: OrganizationPlan,
}

fn default_plan() -> OrganizationPlan {
    OrganizationPlan::Free
}

impl Organization {
    /// Creates a new organization
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Slug already exists (unique constraint violation)
    /// - Database connection fails
    pub async fn create(pool: &PgPool, data: CreateOrganization) -> Result<Self, sqlx::Error> {
        let organization = sqlx::query_as::<_, Organization>(
            r#"
            INSERT INTO organizations (name, slug, plan)
            VALUES ($1, $2, $3)
            RETURNING id, name, slug, plan, created_at, updated_at
            "#,
        )
        .bind(data.name)
        .bind(data.slug)
        .bind(data.plan)
        .fetch_one(pool)
        .await?;

        Ok(organization)
    }

    /// Finds an organization by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let organization = sqlx::query_as::<_, Organization>(
            r#"
            SELECT id, name, slug, plan, created_at, updated_at
            FROM organizations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(organization)
    }

    /// Finds an organization by slug
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Self>, sqlx::Error> {
        let organization = sqlx::query_as::<_, Organization>(
            r#"
            SELECT id, name, slug, plan, created_at, updated_at
            FROM organizations
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(pool)
        .await?;

        Ok(organization)
    }

    /// Updates the billing plan
    pub async fn update_plan(
        pool: &PgPool,
        id: Uuid,
        plan: OrganizationPlan,
    ) -> Result<Option<Self>, sqlx::Error> {
        let organization = sqlx::query_as::<_, Organization>(
            r#"
            UPDATE organizations
            SET plan = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, slug, plan, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(plan)
        .fetch_optional(pool)
        .await?;

        Ok(organization)
    }

    /// Deletes an organization
    ///
    /// Cascades to memberships, teams, and tenant-scoped tasks.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM organizations WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_as_str() {
        assert_eq!(OrganizationPlan::Free.as_str(), "free");
        assert_eq!(OrganizationPlan::Starter.as_str(), "starter");
        assert_eq!(OrganizationPlan::Business.as_str(), "business");
        assert_eq!(OrganizationPlan::Enterprise.as_str(), "enterprise");
    }

    #[test]
    fn test_default_plan() {
        assert_eq!(default_plan(), OrganizationPlan::Free);
    }
}
