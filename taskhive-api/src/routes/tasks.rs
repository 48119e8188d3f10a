/// Task endpoints
///
/// Tasks live either inside an organization (tenant scope resolved from the
/// `X-Organization-Id` header) or in the actor's personal scope when no
/// organization context is present. Every mutation runs through the
/// permission evaluator with the loaded task as the resource.
///
/// # Endpoints
///
/// - `POST   /v1/tasks` - Create task
/// - `GET    /v1/tasks` - List tasks in scope
/// - `GET    /v1/tasks/:task_id` - Get task
/// - `PUT    /v1/tasks/:task_id` - Update status/priority
/// - `POST   /v1/tasks/:task_id/assign` - Assign or unassign
/// - `DELETE /v1/tasks/:task_id` - Delete task

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use taskhive_shared::{
    auth::{
        authorization::{require_action, Action, Resource},
        middleware::{CurrentUser, TenantScope},
    },
    models::task::{CreateTask, Task, TaskPriority, TaskStatus},
};
use uuid::Uuid;
use validator::Validate;

/// Create task request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Short title
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    /// Optional longer description
    #[validate(length(max = 4000, message = "Description must be at most 4000 characters"))]
    pub description: Option<String>,

    /// Optional initial assignee
    pub assigned_to: Option<Uuid>,

    /// Priority (defaults to medium)
    pub priority: Option<TaskPriority>,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,
}

/// Update task request; absent fields are left unchanged
#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    /// New workflow status
    pub status: Option<TaskStatus>,

    /// New priority
    pub priority: Option<TaskPriority>,
}

/// Assign task request
#[derive(Debug, Deserialize)]
pub struct AssignTaskRequest {
    /// New assignee; null unassigns
    pub assigned_to: Option<Uuid>,
}

/// Task list pagination
#[derive(Debug, Deserialize)]
pub struct ListTasksQuery {
    /// Page size (default 50, max 200)
    pub limit: Option<i64>,

    /// Offset into the listing
    pub offset: Option<i64>,
}

/// Loads a task within the request's scope
///
/// Inside an organization scope only that organization's tasks are visible.
/// Without a scope only personal (organization-less) tasks are visible. Both
/// misses surface as 404, so cross-tenant probing can't distinguish "exists
/// elsewhere" from "doesn't exist".
async fn load_task(
    state: &AppState,
    scope: Option<&TenantScope>,
    task_id: Uuid,
) -> ApiResult<Task> {
    let task = match scope {
        Some(scope) => {
            Task::find_by_id_and_organization(&state.db, task_id, scope.organization_id).await?
        }
        None => Task::find_by_id(&state.db, task_id)
            .await?
            .filter(|t| t.organization_id.is_none()),
    };

    task.ok_or_else(|| ApiError::NotFound("Task not found".to_string()))
}

/// Creates a task in the current scope
pub async fn create_task(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
    scope: Option<Extension<TenantScope>>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    req.validate()?;

    require_action(&actor, Action::Create, None)?;

    let task = Task::create(
        &state.db,
        CreateTask {
            organization_id: scope.map(|Extension(s)| s.organization_id),
            creator_id: actor.id,
            assigned_to: req.assigned_to,
            title: req.title,
            description: req.description,
            priority: req.priority.unwrap_or(TaskPriority::Medium),
            due_date: req.due_date,
        },
    )
    .await?;

    tracing::info!(task_id = %task.id, creator_id = %actor.id, "Created task");

    Ok((StatusCode::CREATED, Json(task)))
}

/// Lists tasks in the current scope
///
/// With an organization scope: all of that organization's tasks. Without one:
/// the actor's personal tasks.
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
    scope: Option<Extension<TenantScope>>,
    Query(query): Query<ListTasksQuery>,
) -> ApiResult<Json<Vec<Task>>> {
    let limit = query.limit.unwrap_or(50).clamp(1, 200);
    let offset = query.offset.unwrap_or(0).max(0);

    let tasks = match scope {
        Some(Extension(scope)) => {
            Task::list_by_organization(&state.db, scope.organization_id, limit, offset).await?
        }
        None => Task::list_by_creator(&state.db, actor.id, limit, offset).await?,
    };

    Ok(Json(tasks))
}

/// Gets a single task
pub async fn get_task(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
    scope: Option<Extension<TenantScope>>,
    Path(task_id): Path<Uuid>,
) -> ApiResult<Json<Task>> {
    let task = load_task(&state, scope.as_deref(), task_id).await?;

    require_action(&actor, Action::Read, Some(&Resource::from(&task)))?;

    Ok(Json(task))
}

/// Updates a task's status and/or priority
pub async fn update_task(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
    scope: Option<Extension<TenantScope>>,
    Path(task_id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    let task = load_task(&state, scope.as_deref(), task_id).await?;

    require_action(&actor, Action::Update, Some(&Resource::from(&task)))?;

    let updated = Task::update(&state.db, task.id, req.status, req.priority)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(updated))
}

/// Assigns or unassigns a task
pub async fn assign_task(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
    scope: Option<Extension<TenantScope>>,
    Path(task_id): Path<Uuid>,
    Json(req): Json<AssignTaskRequest>,
) -> ApiResult<Json<Task>> {
    let task = load_task(&state, scope.as_deref(), task_id).await?;

    require_action(&actor, Action::Assign, Some(&Resource::from(&task)))?;

    let updated = Task::assign(&state.db, task.id, req.assigned_to)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    tracing::info!(
        task_id = %updated.id,
        assigned_to = ?updated.assigned_to,
        "Reassigned task"
    );

    Ok(Json(updated))
}

/// Deletes a task
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
    scope: Option<Extension<TenantScope>>,
    Path(task_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let task = load_task(&state, scope.as_deref(), task_id).await?;

    require_action(&actor, Action::Delete, Some(&Resource::from(&task)))?;

    Task::delete(&state.db, task.id).await?;

    tracing::info!(task_id = %task.id, actor_id = %actor.id, "Deleted task");

    Ok(StatusCode::NO_CONTENT)
}
