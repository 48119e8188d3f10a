/// Authorization helpers and permission checks
///
/// This module implements the fine-grained permission evaluator for TaskHive.
/// It is a pure function over in-memory values: no lookups, no caching, no
/// shared state between invocations. Handlers call it after loading the
/// resource they are about to act on.
///
/// # Permission Model
///
/// Three independent authorization dimensions exist in TaskHive:
///
/// 1. **Global roles** ([`Role`]): platform-wide rank, evaluated here
/// 2. **Organization roles** ([`crate::models::membership::OrgRole`]):
///    enforced by the tenant scope resolver and org-role guard
/// 3. **Team roles** ([`crate::models::team::TeamRole`]): enforced by the
///    team-leader guard
///
/// This evaluator combines the global rank with resource ownership
/// (creator/assignee) to answer a single question: may this actor perform
/// this action on this resource?
///
/// # Example
///
/// ```
/// use taskhive_shared::auth::authorization::{can_perform_action, Action, Resource};
/// use taskhive_shared::auth::middleware::CurrentUser;
/// use taskhive_shared::models::user::Role;
/// use uuid::Uuid;
///
/// let actor = CurrentUser {
///     id: Uuid::new_v4(),
///     email: "user@example.com".to_string(),
///     role: Role::User,
///     is_active: true,
/// };
///
/// // Anyone may create
/// assert!(can_perform_action(&actor, Action::Create, None));
///
/// // A plain user may not delete someone else's task
/// let task = Resource::Task { creator_id: Uuid::new_v4(), assigned_to: None };
/// assert!(!can_perform_action(&actor, Action::Delete, Some(&task)));
/// ```

use uuid::Uuid;

use super::middleware::CurrentUser;
use crate::models::task::Task;
use crate::models::user::Role;

/// Actions a permission check can be asked about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Create a new resource
    Create,

    /// Read an existing resource
    Read,

    /// Modify an existing resource
    Update,

    /// Remove an existing resource
    Delete,

    /// Change a task's assignee
    Assign,

    /// Administrative management of a resource collection
    Manage,
}

impl Action {
    /// Converts action to string for display and logging
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Read => "read",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Assign => "assign",
            Action::Manage => "manage",
        }
    }
}

/// Resource a permission check applies to
///
/// The variant tag is set where the resource is constructed; the evaluator
/// never infers the resource kind from field shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    /// A task, carrying its ownership fields
    Task {
        /// User who created the task
        creator_id: Uuid,

        /// User the task is assigned to, if any
        assigned_to: Option<Uuid>,
    },

    /// A user profile
    User {
        /// The profile owner's user ID
        id: Uuid,
    },
}

impl From<&Task> for Resource {
    fn from(task: &Task) -> Self {
        Resource::Task {
            creator_id: task.creator_id,
            assigned_to: task.assigned_to,
        }
    }
}

impl Resource {
    /// Builds a User resource for a profile
    pub fn user_profile(id: Uuid) -> Self {
        Resource::User { id }
    }
}

/// Error type for authorization checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// Actor doesn't have permission for the action
    #[error("Not authorized to {action} this resource", action = .action.as_str())]
    NotAuthorized {
        /// The denied action
        action: Action,
    },
}

/// Decides whether an actor may perform an action on a resource
///
/// Pure function; the decision policy is evaluated in a fixed order and the
/// first matching rule wins:
///
/// 1. Global `SuperAdmin` → always allowed.
/// 2. Global `Admin` → always allowed. There is no carve-out protecting
///    super-admin-owned User resources from admins; known policy gap,
///    preserved deliberately.
/// 3. `Create` → allowed for every authenticated actor.
/// 4. `Read` on a Task → creator, assignee, or rank ≥ Manager; `Read` on
///    anything else → allowed unconditionally.
/// 5. `Update` on a Task → creator, assignee, or rank ≥ Manager; on a User →
///    own profile only.
/// 6. `Delete` on a Task → creator or rank ≥ Admin; on anything else →
///    rank ≥ Admin only.
/// 7. `Assign` on a Task → creator or rank ≥ TeamLead; otherwise denied.
/// 8. `Manage` → rank ≥ Manager regardless of resource.
/// 9. Anything else → denied.
pub fn can_perform_action(actor: &CurrentUser, action: Action, resource: Option<&Resource>) -> bool {
    if actor.role == Role::SuperAdmin {
        return true;
    }

    // Known gap: no protection for super-admin-owned resources here.
    if actor.role == Role::Admin {
        return true;
    }

    match (action, resource) {
        (Action::Create, _) => actor.role.is_at_least(Role::User),

        (Action::Read, Some(Resource::Task { creator_id, assigned_to })) => {
            *creator_id == actor.id
                || *assigned_to == Some(actor.id)
                || actor.role.is_at_least(Role::Manager)
        }
        (Action::Read, _) => true,

        (Action::Update, Some(Resource::Task { creator_id, assigned_to })) => {
            *creator_id == actor.id
                || *assigned_to == Some(actor.id)
                || actor.role.is_at_least(Role::Manager)
        }
        (Action::Update, Some(Resource::User { id })) => *id == actor.id,
        (Action::Update, None) => false,

        (Action::Delete, Some(Resource::Task { creator_id, .. })) => {
            *creator_id == actor.id || actor.role.is_at_least(Role::Admin)
        }
        (Action::Delete, _) => actor.role.is_at_least(Role::Admin),

        (Action::Assign, Some(Resource::Task { creator_id, .. })) => {
            *creator_id == actor.id || actor.role.is_at_least(Role::TeamLead)
        }
        (Action::Assign, _) => false,

        (Action::Manage, _) => actor.role.is_at_least(Role::Manager),
    }
}

/// Result-returning wrapper around [`can_perform_action`]
///
/// Convenient for handlers that want to `?` a denial straight into a 403.
pub fn require_action(
    actor: &CurrentUser,
    action: Action,
    resource: Option<&Resource>,
) -> Result<(), AuthzError> {
    if can_perform_action(actor, action, resource) {
        Ok(())
    } else {
        Err(AuthzError::NotAuthorized { action })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(role: Role) -> CurrentUser {
        CurrentUser {
            id: Uuid::new_v4(),
            email: format!("{}@example.com", role.as_str()),
            role,
            is_active: true,
        }
    }

    fn task_of(creator_id: Uuid) -> Resource {
        Resource::Task {
            creator_id,
            assigned_to: None,
        }
    }

    const ALL_ACTIONS: [Action; 6] = [
        Action::Create,
        Action::Read,
        Action::Update,
        Action::Delete,
        Action::Assign,
        Action::Manage,
    ];

    #[test]
    fn test_super_admin_allowed_everything() {
        let actor = actor(Role::SuperAdmin);
        let task = task_of(Uuid::new_v4());
        let profile = Resource::user_profile(Uuid::new_v4());

        for action in ALL_ACTIONS {
            assert!(can_perform_action(&actor, action, None));
            assert!(can_perform_action(&actor, action, Some(&task)));
            assert!(can_perform_action(&actor, action, Some(&profile)));
        }
    }

    #[test]
    fn test_admin_allowed_everything_including_other_profiles() {
        let actor = actor(Role::Admin);
        let task = task_of(Uuid::new_v4());
        // Another user's profile; admins are not blocked even if that user
        // is a super admin (documented gap).
        let profile = Resource::user_profile(Uuid::new_v4());

        for action in ALL_ACTIONS {
            assert!(can_perform_action(&actor, action, Some(&task)));
            assert!(can_perform_action(&actor, action, Some(&profile)));
        }
    }

    #[test]
    fn test_create_allowed_for_every_role() {
        for role in [Role::User, Role::TeamLead, Role::Manager] {
            assert!(can_perform_action(&actor(role), Action::Create, None));
        }
    }

    #[test]
    fn test_read_task_owner_assignee_manager() {
        let user = actor(Role::User);

        // Own task
        assert!(can_perform_action(&user, Action::Read, Some(&task_of(user.id))));

        // Assigned task
        let assigned = Resource::Task {
            creator_id: Uuid::new_v4(),
            assigned_to: Some(user.id),
        };
        assert!(can_perform_action(&user, Action::Read, Some(&assigned)));

        // Unrelated task
        let other = task_of(Uuid::new_v4());
        assert!(!can_perform_action(&user, Action::Read, Some(&other)));
        assert!(can_perform_action(&actor(Role::Manager), Action::Read, Some(&other)));
    }

    #[test]
    fn test_read_non_task_always_allowed() {
        let user = actor(Role::User);
        let profile = Resource::user_profile(Uuid::new_v4());

        assert!(can_perform_action(&user, Action::Read, Some(&profile)));
        assert!(can_perform_action(&user, Action::Read, None));
    }

    #[test]
    fn test_update_task_ownership() {
        let creator = actor(Role::User);
        let stranger = actor(Role::User);
        let task = task_of(creator.id);

        assert!(can_perform_action(&creator, Action::Update, Some(&task)));
        assert!(!can_perform_action(&stranger, Action::Update, Some(&task)));
    }

    #[test]
    fn test_update_user_own_profile_only() {
        let user = actor(Role::User);

        let own = Resource::user_profile(user.id);
        assert!(can_perform_action(&user, Action::Update, Some(&own)));

        let other = Resource::user_profile(Uuid::new_v4());
        assert!(!can_perform_action(&user, Action::Update, Some(&other)));

        // Managers get no profile override below Admin
        assert!(!can_perform_action(&actor(Role::Manager), Action::Update, Some(&other)));
    }

    #[test]
    fn test_update_absent_resource_denied() {
        assert!(!can_perform_action(&actor(Role::Manager), Action::Update, None));
    }

    #[test]
    fn test_delete_task_creator_or_admin() {
        let creator = actor(Role::User);
        let task = task_of(creator.id);

        assert!(can_perform_action(&creator, Action::Delete, Some(&task)));

        let other = task_of(Uuid::new_v4());
        assert!(!can_perform_action(&creator, Action::Delete, Some(&other)));
        assert!(!can_perform_action(&actor(Role::Manager), Action::Delete, Some(&other)));
    }

    #[test]
    fn test_delete_non_task_requires_admin() {
        let profile = Resource::user_profile(Uuid::new_v4());

        assert!(!can_perform_action(&actor(Role::Manager), Action::Delete, Some(&profile)));
        assert!(!can_perform_action(&actor(Role::Manager), Action::Delete, None));
        assert!(can_perform_action(&actor(Role::Admin), Action::Delete, Some(&profile)));
    }

    #[test]
    fn test_assign_task_creator_or_team_lead() {
        let creator = actor(Role::User);
        let task = task_of(creator.id);

        assert!(can_perform_action(&creator, Action::Assign, Some(&task)));

        let other = task_of(Uuid::new_v4());
        assert!(!can_perform_action(&creator, Action::Assign, Some(&other)));
        assert!(can_perform_action(&actor(Role::TeamLead), Action::Assign, Some(&other)));
    }

    #[test]
    fn test_assign_non_task_denied() {
        let profile = Resource::user_profile(Uuid::new_v4());

        assert!(!can_perform_action(&actor(Role::TeamLead), Action::Assign, Some(&profile)));
        assert!(!can_perform_action(&actor(Role::TeamLead), Action::Assign, None));
    }

    #[test]
    fn test_manage_requires_manager() {
        assert!(!can_perform_action(&actor(Role::User), Action::Manage, None));
        assert!(!can_perform_action(&actor(Role::TeamLead), Action::Manage, None));
        assert!(can_perform_action(&actor(Role::Manager), Action::Manage, None));

        let task = task_of(Uuid::new_v4());
        assert!(can_perform_action(&actor(Role::Manager), Action::Manage, Some(&task)));
    }

    #[test]
    fn test_require_action_maps_to_error() {
        let user = actor(Role::User);
        let other = task_of(Uuid::new_v4());

        assert!(require_action(&user, Action::Read, Some(&task_of(user.id))).is_ok());

        let err = require_action(&user, Action::Delete, Some(&other)).unwrap_err();
        assert!(err.to_string().contains("delete"));
    }

    #[test]
    fn test_resource_from_task_carries_ownership() {
        use crate::models::task::{TaskPriority, TaskStatus};
        use chrono::Utc;

        let creator_id = Uuid::new_v4();
        let assignee = Uuid::new_v4();
        let task = Task {
            id: Uuid::new_v4(),
            organization_id: None,
            creator_id,
            assigned_to: Some(assignee),
            title: "t".to_string(),
            description: None,
            status: TaskStatus::Todo,
            priority: TaskPriority::Medium,
            due_date: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert_eq!(
            Resource::from(&task),
            Resource::Task {
                creator_id,
                assigned_to: Some(assignee),
            }
        );
    }

    #[test]
    fn test_action_as_str() {
        assert_eq!(Action::Create.as_str(), "create");
        assert_eq!(Action::Manage.as_str(), "manage");
    }
}
