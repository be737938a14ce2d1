//! Built-in user roster.
//!
//! Provides the fixed demo roster of the weekly work-plan tracker. The users
//! are defined in `users.toml` and embedded in the binary at compile time,
//! so seeded rows always reference the same profile ids.

use serde::Deserialize;
use uuid::Uuid;

/// Roster name used when no user is configured anywhere.
pub const DEFAULT_USER: &str = "ken";

/// A single user profile from the embedded roster.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Profile {
    /// Fixed profile id (`a00000NN-...` scheme).
    pub id: Uuid,
    /// Short display name (e.g. `Ken`). Plans carry this as `user_name`.
    pub name: String,
    /// Company e-mail address.
    pub email: String,
    /// Whether the user reviews other people's plans.
    pub is_manager: bool,
    /// Whether the user can administer the tracker.
    pub is_admin: bool,
}

/// Container for deserializing the embedded TOML file.
#[derive(Debug, Deserialize)]
struct UserRoster {
    users: Vec<Profile>,
}

/// The embedded roster TOML.
static USERS_TOML: &str = include_str!("users.toml");

/// Load all profiles from the embedded roster.
///
/// # Panics
///
/// Panics if the embedded TOML is malformed. This is a compile-time invariant
/// -- if the binary was built, the TOML is valid.
pub fn load_roster() -> Vec<Profile> {
    let roster: UserRoster = toml::from_str(USERS_TOML).expect("embedded users.toml is invalid");
    roster.users
}

/// Look up a profile by display name, ignoring ASCII case.
pub fn find_user(name: &str) -> Option<Profile> {
    load_roster()
        .into_iter()
        .find(|p| p.name.eq_ignore_ascii_case(name))
}

/// Return all roster names in definition order, for error messages and help
/// text.
pub fn user_names() -> Vec<String> {
    load_roster().into_iter().map(|p| p.name).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_roster_returns_ten_profiles() {
        let roster = load_roster();
        assert_eq!(roster.len(), 10, "embedded roster should hold 10 users");
    }

    #[test]
    fn profile_ids_are_unique() {
        let roster = load_roster();
        let mut ids: Vec<Uuid> = roster.iter().map(|p| p.id).collect();
        let original_len = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), original_len, "profile ids must be unique");
    }

    #[test]
    fn find_user_ignores_case() {
        let ken = find_user("KEN").expect("ken is in the roster");
        assert_eq!(ken.name, "Ken");
        assert_eq!(
            ken.id,
            "a0000009-0000-0000-0000-000000000009"
                .parse::<Uuid>()
                .unwrap()
        );
    }

    #[test]
    fn find_unknown_user_returns_none() {
        assert!(find_user("nobody").is_none());
    }

    #[test]
    fn default_user_is_in_roster() {
        let user = find_user(DEFAULT_USER).expect("default user must resolve");
        assert!(user.is_manager);
        assert!(user.is_admin);
    }

    #[test]
    fn manager_and_admin_flags_match_roster() {
        let roster = load_roster();
        let managers: Vec<&str> = roster
            .iter()
            .filter(|p| p.is_manager)
            .map(|p| p.name.as_str())
            .collect();
        let admins: Vec<&str> = roster
            .iter()
            .filter(|p| p.is_admin)
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(managers, ["Jenny", "Brian", "Ken", "Tzong"]);
        assert_eq!(admins, ["Pei", "Ken"]);
    }

    #[test]
    fn all_emails_share_the_company_domain() {
        for profile in &load_roster() {
            assert!(
                profile.email.ends_with("@bridgecom.com.tw"),
                "unexpected email {:?}",
                profile.email
            );
        }
    }

    #[test]
    fn roster_preserves_definition_order() {
        let names = user_names();
        assert_eq!(names.first().map(String::as_str), Some("Pei"));
        assert_eq!(names.last().map(String::as_str), Some("Tzong"));
    }
}
