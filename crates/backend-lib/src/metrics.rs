// ==============
// crates/backend-lib/src/metrics.rs

//! Central place for metric keys
pub const AUTH_SIGNUP: &str = "auth.signup";
pub const AUTH_SIGNUP_CONFLICT: &str = "auth.signup.conflict";
pub const AUTH_LOGIN: &str = "auth.login";
pub const AUTH_LOGIN_FAILED: &str = "auth.login.failed";
/// Labelled with `reason`
pub const AUTH_REJECTED: &str = "auth.rejected";
pub const TASK_CREATED: &str = "task.created";
pub const TASK_UPDATED: &str = "task.updated";
pub const TASK_DELETED: &str = "task.deleted";
