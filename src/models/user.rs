use serde::{Deserialize, Serialize};

/// The acting user, as handed to the engine by the identity collaborator
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub user_id: i64,
    /// Unique account name
    pub username: String,
    /// Display name chosen by the user (preferred for display)
    pub global_name: Option<String>,
}

impl User {
    pub fn new(user_id: i64, username: impl Into<String>) -> Self {
        Self {
            user_id,
            username: username.into(),
            global_name: None,
        }
    }

    /// Get the best display name for this user
    /// Priority: global_name > username
    pub fn display_name(&self) -> &str {
        self.global_name.as_deref().unwrap_or(&self.username)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_prefers_global_name() {
        let mut user = User::new(7, "ada");
        assert_eq!(user.display_name(), "ada");

        user.global_name = Some("Ada L.".to_string());
        assert_eq!(user.display_name(), "Ada L.");
    }
}
