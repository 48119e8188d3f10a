/// Team endpoints
///
/// Teams belong to an organization. Creation and listing run under the
/// organization scope (`org_id` in the path); membership mutations run under
/// the team-leader guard (`team_id` in the path).
///
/// # Endpoints
///
/// - `POST   /v1/orgs/:org_id/teams` - Create team (org manager+)
/// - `GET    /v1/orgs/:org_id/teams` - List teams
/// - `GET    /v1/teams/:team_id/members` - List team members
/// - `POST   /v1/teams/:team_id/members` - Add member (team leader)
/// - `DELETE /v1/teams/:team_id/members/:user_id` - Remove member (team leader)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use taskhive_shared::{
    auth::middleware::{CurrentUser, TenantScope},
    models::{
        membership::Membership,
        team::{CreateTeam, Team, TeamMembership, TeamRole},
    },
};
use uuid::Uuid;
use validator::Validate;

/// Create team request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTeamRequest {
    /// Display name
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
}

/// Add team member request
#[derive(Debug, Deserialize)]
pub struct AddTeamMemberRequest {
    /// User to add
    pub user_id: Uuid,

    /// Team role (defaults to member)
    pub role: Option<TeamRole>,
}

/// Creates a team in the scoped organization
///
/// The creating user becomes the team's first leader so the team is never
/// leaderless.
pub async fn create_team(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
    Extension(scope): Extension<TenantScope>,
    Json(req): Json<CreateTeamRequest>,
) -> ApiResult<(StatusCode, Json<Team>)> {
    req.validate()?;

    let team = Team::create(
        &state.db,
        CreateTeam {
            organization_id: scope.organization_id,
            name: req.name,
        },
    )
    .await?;

    TeamMembership::create(&state.db, team.id, actor.id, TeamRole::Leader).await?;

    tracing::info!(
        team_id = %team.id,
        organization_id = %scope.organization_id,
        "Created team"
    );

    Ok((StatusCode::CREATED, Json(team)))
}

/// Lists the scoped organization's teams
pub async fn list_teams(
    State(state): State<AppState>,
    Extension(scope): Extension<TenantScope>,
) -> ApiResult<Json<Vec<Team>>> {
    let teams = Team::list_by_organization(&state.db, scope.organization_id).await?;
    Ok(Json(teams))
}

/// Lists a team's members
///
/// Visible to any member of the team's organization.
pub async fn list_team_members(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
    Path(team_id): Path<Uuid>,
) -> ApiResult<Json<Vec<TeamMembership>>> {
    let team = Team::find_by_id(&state.db, team_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Team not found".to_string()))?;

    let is_org_member = Membership::has_access(&state.db, team.organization_id, actor.id).await?;
    if !is_org_member {
        return Err(ApiError::Forbidden(
            "You are not a member of this organization".to_string(),
        ));
    }

    let members = TeamMembership::list_by_team(&state.db, team_id).await?;
    Ok(Json(members))
}

/// Adds a user to a team
///
/// The new member must already belong to the team's organization.
pub async fn add_team_member(
    State(state): State<AppState>,
    Path(team_id): Path<Uuid>,
    Json(req): Json<AddTeamMemberRequest>,
) -> ApiResult<(StatusCode, Json<TeamMembership>)> {
    let team = Team::find_by_id(&state.db, team_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Team not found".to_string()))?;

    let in_org = Membership::has_access(&state.db, team.organization_id, req.user_id).await?;
    if !in_org {
        return Err(ApiError::BadRequest(
            "User is not a member of the team's organization".to_string(),
        ));
    }

    let membership = TeamMembership::create(
        &state.db,
        team_id,
        req.user_id,
        req.role.unwrap_or(TeamRole::Member),
    )
    .await?;

    tracing::info!(
        team_id = %team_id,
        user_id = %req.user_id,
        role = membership.role.as_str(),
        "Added team member"
    );

    Ok((StatusCode::CREATED, Json(membership)))
}

/// Removes a user from a team
pub async fn remove_team_member(
    State(state): State<AppState>,
    Path((team_id, user_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    let removed = TeamMembership::delete(&state.db, team_id, user_id).await?;
    if !removed {
        return Err(ApiError::NotFound("Team membership not found".to_string()));
    }

    tracing::info!(team_id = %team_id, user_id = %user_id, "Removed team member");

    Ok(StatusCode::NO_CONTENT)
}
