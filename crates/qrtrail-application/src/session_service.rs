//! Session use cases: restore, login, register, logout.

use std::sync::Arc;
use tokio::sync::RwLock;

use qrtrail_core::clock::Clock;
use qrtrail_core::config::SessionSettings;
use qrtrail_core::session::{
    CredentialVerifier, Identity, SessionState, TokenClaims, TokenRepository, decode_token,
    encode_token,
};
use qrtrail_core::{QrError, Result};

/// Owns the process-wide session state.
///
/// State transitions:
/// - `Anonymous -> Authenticated`: [`login`](Self::login), [`register`](Self::register),
///   or [`restore`](Self::restore) with a live persisted token
/// - `Authenticated -> Anonymous`: [`logout`](Self::logout)
pub struct SessionService {
    tokens: Arc<dyn TokenRepository>,
    verifier: Arc<dyn CredentialVerifier>,
    clock: Arc<dyn Clock>,
    settings: SessionSettings,
    state: RwLock<SessionState>,
}

impl SessionService {
    /// Creates an anonymous service. Call [`restore`](Self::restore) once at
    /// startup to pick up a persisted token.
    pub fn new(
        tokens: Arc<dyn TokenRepository>,
        verifier: Arc<dyn CredentialVerifier>,
        clock: Arc<dyn Clock>,
        settings: SessionSettings,
    ) -> Self {
        Self {
            tokens,
            verifier,
            clock,
            settings,
            state: RwLock::new(SessionState::Anonymous),
        }
    }

    /// Reads the persisted token and adopts it if it decodes and has not
    /// expired. Anything else is purged from storage.
    pub async fn restore(&self) -> Result<SessionState> {
        let Some(token) = self.tokens.load().await? else {
            return Ok(self.set_state(SessionState::Anonymous).await);
        };

        let claims = match decode_token(&token) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::warn!("[SessionService] Discarding unreadable token: {}", e);
                self.tokens.clear().await?;
                return Ok(self.set_state(SessionState::Anonymous).await);
            }
        };

        if !claims.is_live_at(self.clock.now()) {
            tracing::warn!("[SessionService] Discarding expired token for {}", claims.sub);
            self.tokens.clear().await?;
            return Ok(self.set_state(SessionState::Anonymous).await);
        }

        tracing::info!("[SessionService] Restored session for {}", claims.sub);
        Ok(self
            .set_state(SessionState::Authenticated {
                identity: claims.identity(),
                token,
            })
            .await)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Identity> {
        require_field("email", email)?;
        require_field("password", password)?;

        let identity = self.verifier.verify(email, password).await?;
        self.establish(identity).await
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<Identity> {
        require_field("name", name)?;
        require_field("email", email)?;
        require_field("password", password)?;

        let identity = self.verifier.register(name, email, password).await?;
        self.establish(identity).await
    }

    /// Clears the persisted token and returns to anonymous, whatever the
    /// current state.
    pub async fn logout(&self) -> Result<()> {
        self.tokens.clear().await?;
        self.set_state(SessionState::Anonymous).await;
        tracing::info!("[SessionService] Logged out");
        Ok(())
    }

    pub async fn current(&self) -> SessionState {
        self.state.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.is_authenticated()
    }

    async fn establish(&self, identity: Identity) -> Result<Identity> {
        let claims = TokenClaims::new(&identity, self.clock.now(), self.settings.token_ttl());
        let token = encode_token(&claims)?;
        self.tokens.store(&token).await?;

        tracing::info!("[SessionService] Signed in {}", identity.id);
        self.set_state(SessionState::Authenticated {
            identity: identity.clone(),
            token,
        })
        .await;
        Ok(identity)
    }

    async fn set_state(&self, state: SessionState) -> SessionState {
        let mut guard = self.state.write().await;
        *guard = state.clone();
        state
    }
}

fn require_field(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(QrError::validation(format!("{} is required", field)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use qrtrail_core::clock::ManualClock;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryTokens {
        token: Mutex<Option<String>>,
    }

    #[async_trait]
    impl TokenRepository for MemoryTokens {
        async fn load(&self) -> Result<Option<String>> {
            Ok(self.token.lock().unwrap().clone())
        }

        async fn store(&self, token: &str) -> Result<()> {
            *self.token.lock().unwrap() = Some(token.to_string());
            Ok(())
        }

        async fn clear(&self) -> Result<()> {
            *self.token.lock().unwrap() = None;
            Ok(())
        }
    }

    /// Accepts any password except "wrong".
    struct StubVerifier;

    #[async_trait]
    impl CredentialVerifier for StubVerifier {
        async fn verify(&self, email: &str, password: &str) -> Result<Identity> {
            if password == "wrong" {
                return Err(QrError::authentication("Invalid email or password"));
            }
            Ok(Identity {
                id: format!("id-{}", email),
                email: email.to_string(),
                display_name: email.split('@').next().unwrap_or_default().to_string(),
            })
        }

        async fn register(&self, name: &str, email: &str, _password: &str) -> Result<Identity> {
            Ok(Identity {
                id: format!("id-{}", email),
                email: email.to_string(),
                display_name: name.to_string(),
            })
        }
    }

    fn setup() -> (SessionService, Arc<MemoryTokens>, Arc<ManualClock>) {
        let tokens = Arc::new(MemoryTokens::default());
        let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()));
        let service = SessionService::new(
            tokens.clone(),
            Arc::new(StubVerifier),
            clock.clone(),
            SessionSettings { token_ttl_hours: 1 },
        );
        (service, tokens, clock)
    }

    #[tokio::test]
    async fn test_login_then_logout() {
        let (service, tokens, _) = setup();

        let identity = service.login("a@b.com", "x").await.unwrap();
        assert_eq!(identity.email, "a@b.com");

        let state = service.current().await;
        assert_eq!(state.identity().map(|i| i.email.as_str()), Some("a@b.com"));
        assert!(tokens.load().await.unwrap().is_some());

        service.logout().await.unwrap();
        assert_eq!(service.current().await, SessionState::Anonymous);
        assert!(tokens.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rejected_login_stays_anonymous() {
        let (service, tokens, _) = setup();
        let err = service.login("a@b.com", "wrong").await.unwrap_err();
        assert!(err.is_authentication());
        assert!(!service.is_authenticated().await);
        assert!(tokens.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_empty_fields_rejected_before_verifier() {
        let (service, _, _) = setup();
        assert!(service.login("", "x").await.unwrap_err().is_validation());
        assert!(service.register("", "a@b.com", "x").await.unwrap_err().is_validation());
    }

    #[tokio::test]
    async fn test_register_uses_given_name() {
        let (service, _, _) = setup();
        let identity = service.register("Ada", "ada@b.com", "x").await.unwrap();
        assert_eq!(identity.display_name, "Ada");
        assert!(service.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_restore_live_token() {
        let (service, tokens, clock) = setup();
        service.login("a@b.com", "x").await.unwrap();

        let restarted = SessionService::new(
            tokens.clone(),
            Arc::new(StubVerifier),
            clock.clone(),
            SessionSettings { token_ttl_hours: 1 },
        );
        clock.advance(chrono::Duration::minutes(59));

        let state = restarted.restore().await.unwrap();
        assert_eq!(state.identity().map(|i| i.email.as_str()), Some("a@b.com"));
    }

    #[tokio::test]
    async fn test_restore_purges_expired_token() {
        let (service, tokens, clock) = setup();
        service.login("a@b.com", "x").await.unwrap();

        // exp == now is already expired
        clock.advance(chrono::Duration::hours(1));
        let state = service.restore().await.unwrap();

        assert_eq!(state, SessionState::Anonymous);
        assert!(tokens.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_restore_purges_garbage_token() {
        let (service, tokens, _) = setup();
        tokens.store("mock_jwt_token_123").await.unwrap();

        let state = service.restore().await.unwrap();
        assert_eq!(state, SessionState::Anonymous);
        assert!(tokens.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_restore_without_token() {
        let (service, _, _) = setup();
        assert_eq!(service.restore().await.unwrap(), SessionState::Anonymous);
    }
}
