//! User records as seen by the notification engine.
//!
//! User storage belongs to the surrounding application; this service only
//! reads users to resolve notification recipients.

use serde::{Deserialize, Serialize};

/// Well-known role names. Roles are free-form strings, so custom roles are
/// possible; these are the ones the notification matrix targets.
pub const ROLE_ADMIN: &str = "Admin";
pub const ROLE_MANAGER: &str = "Manager";
pub const ROLE_TECHNICIAN: &str = "Technician";
pub const ROLE_USER: &str = "User";

/// A user record read from the external user store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    pub role: String,
    #[serde(default)]
    pub is_super: bool,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
}

impl UserRecord {
    /// Display name: trimmed "first last" joined by a single space, falling
    /// back to the username when both name parts are empty.
    pub fn display_name(&self) -> String {
        let name = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let name = name.trim();
        if name.is_empty() {
            self.username.clone()
        } else {
            name.to_string()
        }
    }

    /// Whether the user counts as an administrator for notification
    /// targeting: the literal Admin role or the super flag.
    pub fn is_admin_like(&self) -> bool {
        self.role == ROLE_ADMIN || self.is_super
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(username: &str, first: &str, last: &str) -> UserRecord {
        UserRecord {
            id: 1,
            username: username.to_string(),
            role: ROLE_USER.to_string(),
            is_super: false,
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: String::new(),
        }
    }

    #[test]
    fn display_name_joins_trimmed_parts() {
        assert_eq!(user("jane", " Jane ", " Doe ").display_name(), "Jane Doe");
    }

    #[test]
    fn display_name_handles_single_part() {
        assert_eq!(user("jane", "", "Doe").display_name(), "Doe");
        assert_eq!(user("jane", "Jane", "").display_name(), "Jane");
    }

    #[test]
    fn display_name_falls_back_to_username() {
        assert_eq!(user("jane", "", "").display_name(), "jane");
        assert_eq!(user("jane", "  ", " ").display_name(), "jane");
    }

    #[test]
    fn super_flag_is_admin_like_regardless_of_role() {
        let mut u = user("ops", "Op", "Person");
        assert!(!u.is_admin_like());
        u.is_super = true;
        assert!(u.is_admin_like());
        u.is_super = false;
        u.role = ROLE_ADMIN.to_string();
        assert!(u.is_admin_like());
    }
}
