use std::collections::HashMap;

use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory session registry mapping opaque bearer tokens to principals.
/// Lifecycle is scoped to the service process; restarting the service
/// invalidates all sessions.
#[derive(Default)]
pub struct Sessions {
    tokens: RwLock<HashMap<String, String>>,
}

impl Sessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh unguessable token for the principal.
    pub async fn issue(&self, principal: &str) -> String {
        let token = Uuid::new_v4().simple().to_string();
        self.tokens
            .write()
            .await
            .insert(token.clone(), principal.to_string());
        token
    }

    /// Resolve a token to exactly one principal, or nothing. Malformed,
    /// unknown and expired tokens are indistinguishable to the caller.
    pub async fn resolve(&self, token: &str) -> Option<String> {
        self.tokens.read().await.get(token).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_issue_and_resolve() {
        let sessions = Sessions::new();
        let token = sessions.issue("alice").await;
        assert_eq!(sessions.resolve(&token).await.as_deref(), Some("alice"));
    }

    #[tokio::test]
    async fn test_unknown_token_resolves_to_nothing() {
        let sessions = Sessions::new();
        assert_eq!(sessions.resolve("not-a-token").await, None);
        assert_eq!(sessions.resolve("").await, None);
    }

    #[tokio::test]
    async fn test_tokens_are_unique_per_login() {
        let sessions = Sessions::new();
        let first = sessions.issue("alice").await;
        let second = sessions.issue("alice").await;
        assert_ne!(first, second);
        assert_eq!(sessions.resolve(&first).await.as_deref(), Some("alice"));
        assert_eq!(sessions.resolve(&second).await.as_deref(), Some("alice"));
    }
}
