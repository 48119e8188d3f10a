/// Task model and database operations
///
/// Tasks are the core entity of TaskHive. Every task records who created it
/// and, optionally, who it is assigned to; these two ownership fields are the
/// basis for resource-level permission checks in
/// [`crate::auth::authorization`].
///
/// A task either belongs to an organization (tenant mode) or to no
/// organization at all (individual mode, matching the tenant scope resolver's
/// pass-through behavior).
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('todo', 'in_progress', 'done', 'archived');
/// CREATE TYPE task_priority AS ENUM ('low', 'medium', 'high', 'urgent');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     organization_id UUID REFERENCES organizations(id) ON DELETE CASCADE,
///     creator_id UUID NOT NULL REFERENCES users(id),
///     assigned_to UUID REFERENCES users(id) ON DELETE SET NULL,
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     status task_status NOT NULL DEFAULT 'todo',
///     priority task_priority NOT NULL DEFAULT 'medium',
///     due_date TIMESTAMPTZ,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskhive_shared::models::task::{Task, CreateTask, TaskPriority};
/// use uuid::Uuid;
///
/// # async fn example(pool: sqlx::PgPool, creator_id: Uuid) -> Result<(), sqlx::Error> {
/// let task = Task::create(&pool, CreateTask {
///     organization_id: None,
///     creator_id,
///     assigned_to: None,
///     title: "Write launch notes".to_string(),
///     description: None,
///     priority: TaskPriority::High,
///     due_date: None,
/// }).await?;
///
/// Task::assign(&pool, task.id, Some(creator_id)).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Task workflow status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started
    Todo,

    /// Being worked on
    InProgress,

    /// Completed
    Done,

    /// Hidden from active views
    Archived,
}

impl TaskStatus {
    /// Converts status to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
            TaskStatus::Archived => "archived",
        }
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    /// Low priority
    Low,

    /// Default priority
    Medium,

    /// High priority
    High,

    /// Needs immediate attention
    Urgent,
}

impl TaskPriority {
    /// Converts priority to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
            TaskPriority::Urgent => "urgent",
        }
    }
}

/// Task model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Organization this task belongs to (None in individual mode)
    pub organization_id: Option<Uuid>,

    /// User who created the task
    pub creator_id: Uuid,

    /// User the task is assigned to, if any
    pub assigned_to: Option<Uuid>,

    /// Short title
    pub title: String,

    /// Optional longer description
    pub description: Option<String>,

    /// Workflow status
    pub status: TaskStatus,

    /// Priority
    pub priority: TaskPriority,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    /// Organization ID (None for individual-mode tasks)
    pub organization_id: Option<Uuid>,

    /// User creating the task
    pub creator_id: Uuid,

    /// Optional initial assignee
    pub assigned_to: Option<Uuid>,

    /// Short title
    pub title: String,

    /// Optional longer description
    pub description: Option<String>,

    /// Priority (defaults to Medium)
    #[serde(default = "default_priority")]
    pub priority: TaskPriority,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,
}

fn default_priority() -> TaskPriority {
    TaskPriority::Medium
}

impl Task {
    /// Creates a new task in todo status
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (organization_id, creator_id, assigned_to, title,
                               description, priority, due_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, organization_id, creator_id, assigned_to, title, description,
                      status, priority, due_date, created_at, updated_at
            "#,
        )
        .bind(data.organization_id)
        .bind(data.creator_id)
        .bind(data.assigned_to)
        .bind(data.title)
        .bind(data.description)
        .bind(data.priority)
        .bind(data.due_date)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, organization_id, creator_id, assigned_to, title, description,
                   status, priority, due_date, created_at, updated_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID with tenant isolation
    ///
    /// Preferred for organization-scoped endpoints so one tenant can never
    /// address another tenant's tasks.
    pub async fn find_by_id_and_organization(
        pool: &PgPool,
        id: Uuid,
        organization_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, organization_id, creator_id, assigned_to, title, description,
                   status, priority, due_date, created_at, updated_at
            FROM tasks
            WHERE id = $1 AND organization_id = $2
            "#,
        )
        .bind(id)
        .bind(organization_id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Updates a task's status and/or priority
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        status: Option<TaskStatus>,
        priority: Option<TaskPriority>,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET status = COALESCE($2, status),
                priority = COALESCE($3, priority),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, organization_id, creator_id, assigned_to, title, description,
                      status, priority, due_date, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(priority)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Assigns (or unassigns with None) a task
    pub async fn assign(
        pool: &PgPool,
        id: Uuid,
        assigned_to: Option<Uuid>,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET assigned_to = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, organization_id, creator_id, assigned_to, title, description,
                      status, priority, due_date, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(assigned_to)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Deletes a task
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists tasks for an organization with pagination
    pub async fn list_by_organization(
        pool: &PgPool,
        organization_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, organization_id, creator_id, assigned_to, title, description,
                   status, priority, due_date, created_at, updated_at
            FROM tasks
            WHERE organization_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(organization_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Lists individual-mode tasks created by a user
    pub async fn list_by_creator(
        pool: &PgPool,
        creator_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, organization_id, creator_id, assigned_to, title, description,
                   status, priority, due_date, created_at, updated_at
            FROM tasks
            WHERE creator_id = $1 AND organization_id IS NULL
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(creator_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Lists tasks assigned to a user
    pub async fn list_by_assignee(
        pool: &PgPool,
        assigned_to: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, organization_id, creator_id, assigned_to, title, description,
                   status, priority, due_date, created_at, updated_at
            FROM tasks
            WHERE assigned_to = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(assigned_to)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_status_as_str() {
        assert_eq!(TaskStatus::Todo.as_str(), "todo");
        assert_eq!(TaskStatus::InProgress.as_str(), "in_progress");
        assert_eq!(TaskStatus::Done.as_str(), "done");
        assert_eq!(TaskStatus::Archived.as_str(), "archived");
    }

    #[test]
    fn test_task_priority_as_str() {
        assert_eq!(TaskPriority::Low.as_str(), "low");
        assert_eq!(TaskPriority::Medium.as_str(), "medium");
        assert_eq!(TaskPriority::High.as_str(), "high");
        assert_eq!(TaskPriority::Urgent.as_str(), "urgent");
    }

    #[test]
    fn test_default_priority() {
        assert_eq!(default_priority(), TaskPriority::Medium);
    }
}
