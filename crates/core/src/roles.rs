//! Well-known role name constants.
//!
//! These must match the values accepted by the `users.role` CHECK constraint
//! in the initial migration.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_ORGANIZER: &str = "organizer";
pub const ROLE_STUDENT: &str = "student";

/// Every role a user row may carry, in descending privilege order.
pub const ALL_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_ORGANIZER, ROLE_STUDENT];

/// Check whether a string names a known role.
pub fn is_valid_role(role: &str) -> bool {
    ALL_ROLES.contains(&role)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_roles_are_valid() {
        assert!(is_valid_role("admin"));
        assert!(is_valid_role("organizer"));
        assert!(is_valid_role("student"));
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert!(!is_valid_role("superuser"));
        assert!(!is_valid_role(""));
        assert!(!is_valid_role("Admin"));
    }
}
