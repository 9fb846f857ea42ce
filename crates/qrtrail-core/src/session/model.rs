//! Session domain model.

use serde::{Deserialize, Serialize};

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub email: String,
    #[serde(rename = "name")]
    pub display_name: String,
}

/// Process-wide authentication state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Anonymous,
    Authenticated { identity: Identity, token: String },
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Authenticated { identity, .. } => Some(identity),
            Self::Anonymous => None,
        }
    }

    pub fn token(&self) -> Option<&str> {
        match self {
            Self::Authenticated { token, .. } => Some(token),
            Self::Anonymous => None,
        }
    }

    /// `Authorization` header value for a server-backed deployment.
    pub fn bearer_header(&self) -> Option<String> {
        self.token().map(|t| format!("Bearer {}", t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_by_default() {
        let state = SessionState::default();
        assert!(!state.is_authenticated());
        assert!(state.identity().is_none());
        assert!(state.bearer_header().is_none());
    }

    #[test]
    fn test_authenticated_accessors() {
        let state = SessionState::Authenticated {
            identity: Identity {
                id: "1".to_string(),
                email: "a@b.com".to_string(),
                display_name: "a".to_string(),
            },
            token: "t.o.k".to_string(),
        };
        assert!(state.is_authenticated());
        assert_eq!(state.identity().map(|i| i.email.as_str()), Some("a@b.com"));
        assert_eq!(state.bearer_header().as_deref(), Some("Bearer t.o.k"));
    }
}
