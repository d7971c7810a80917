use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// User record as issued by the backend. The schema is owned by the backend;
/// only `id` is interpreted here, everything else is carried through untouched
/// and handed back to templates and the `/me` snapshot as-is.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserProfile {
    pub fn display_name(&self) -> String {
        if let Some(name) = &self.username {
            return name.clone();
        }
        self.email
            .as_deref()
            .and_then(|e| e.split('@').next())
            .unwrap_or("User")
            .to_string()
    }
}

/// Current authentication state, kept as a single session record so that all
/// mutation funnels through the session coordinator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionState {
    pub user: Option<UserProfile>,
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub user_id: i64,
    #[serde(default)]
    pub loading: bool,
}

impl SessionState {
    pub fn authenticated(&self) -> bool {
        self.user.is_some()
    }
}

/// Token-exchange response from `POST /auth/local` and `POST /firebase/auth`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub jwt: String,
    pub user: UserProfile,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_roundtrips_unknown_fields() {
        let raw = serde_json::json!({
            "id": 7,
            "username": "jane",
            "email": "jane@example.com",
            "confirmed": true,
            "provider": "firebase"
        });

        let profile: UserProfile = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(profile.id, 7);
        assert_eq!(profile.extra.get("confirmed"), Some(&Value::Bool(true)));

        let back = serde_json::to_value(&profile).unwrap();
        assert_eq!(back, raw);
    }

    #[test]
    fn display_name_falls_back_to_email_prefix() {
        let profile: UserProfile =
            serde_json::from_value(serde_json::json!({ "id": 1, "email": "jane@example.com" }))
                .unwrap();
        assert_eq!(profile.display_name(), "jane");
    }

    #[test]
    fn default_state_is_signed_out() {
        let state = SessionState::default();
        assert!(!state.authenticated());
        assert!(state.token.is_empty());
        assert!(!state.loading);
    }
}
