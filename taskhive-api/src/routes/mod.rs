/// API route handlers
///
/// # Modules
///
/// - `health`: Health check endpoint
/// - `auth`: Registration, login, token refresh
/// - `tasks`: Task CRUD and assignment
/// - `organizations`: Organization and membership management
/// - `teams`: Team and team membership management
/// - `users`: Own profile and user administration

pub mod auth;
pub mod health;
pub mod organizations;
pub mod tasks;
pub mod teams;
pub mod users;
