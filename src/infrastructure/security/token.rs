// src/infrastructure/security/token.rs
use crate::application::{
    dto::{TokenClaims, TokenSubject},
    error::{ApplicationError, ApplicationResult, AuthError},
    ports::{security::TokenCodec, time::Clock},
};
use crate::domain::user::TokenKind;
use async_trait::async_trait;
use biscuit_auth::{
    Biscuit, KeyPair, PrivateKey, PublicKey,
    builder::{Algorithm, AuthorizerBuilder, Term},
};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, SystemTime},
};
use uuid::Uuid;

const AUTHORITY_CODE: &str = r#"
    user({uname});
    client({cid});
    token_kind({kind});
    token_id({jti});
    issued_at({issued});
    expires_at({exp});
    check if time($now), $now >= {issued};
    check if time($now), $now <= {exp};
"#;

const AUTHORIZER_CODE: &str = r#"
    time({now});
    allow if true;
"#;

/// Ed25519-signed Biscuit tokens. Time checks are evaluated against the
/// injected clock, not the host clock.
#[derive(Clone)]
pub struct BiscuitTokenCodec {
    root: Arc<KeyPair>,
    public: PublicKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl BiscuitTokenCodec {
    pub fn new(
        private_key_hex: &str,
        access_ttl: Duration,
        refresh_ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> ApplicationResult<Self> {
        let private = PrivateKey::from_bytes_hex(private_key_hex, Algorithm::Ed25519)
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;
        let keypair = KeyPair::from(&private);
        let public = keypair.public();

        Ok(Self {
            root: Arc::new(keypair),
            public,
            access_ttl,
            refresh_ttl,
            clock,
        })
    }

    fn ttl_for(&self, kind: TokenKind) -> Duration {
        match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        }
    }
}

fn authority_params(
    subject: &TokenSubject,
    kind: TokenKind,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
) -> HashMap<String, Term> {
    let mut params: HashMap<String, Term> = HashMap::new();
    params.insert("uname".to_string(), subject.username.as_str().into());
    params.insert("cid".to_string(), subject.client_id.as_str().into());
    params.insert("kind".to_string(), kind.as_str().into());
    params.insert("jti".to_string(), Uuid::new_v4().to_string().into());
    params.insert("issued".to_string(), SystemTime::from(issued_at).into());
    params.insert("exp".to_string(), SystemTime::from(expires_at).into());
    params
}

fn build_and_serialize_biscuit(
    params: HashMap<String, Term>,
    root: &KeyPair,
) -> Result<String, ApplicationError> {
    let builder = Biscuit::builder()
        .code_with_params(AUTHORITY_CODE, params, HashMap::new())
        .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;

    let token = builder
        .build(root)
        .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;

    token
        .to_base64()
        .map_err(|err| ApplicationError::infrastructure(err.to_string()))
}

fn invalid_token<E: std::fmt::Display>(err: E) -> ApplicationError {
    tracing::debug!(error = %err, "token rejected");
    ApplicationError::from(AuthError::InvalidToken)
}

#[async_trait]
impl TokenCodec for BiscuitTokenCodec {
    async fn issue(&self, subject: &TokenSubject, kind: TokenKind) -> ApplicationResult<String> {
        let issued_at = self.clock.now();
        let ttl = ChronoDuration::from_std(self.ttl_for(kind))
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;
        let expires_at = issued_at
            .checked_add_signed(ttl)
            .ok_or_else(|| ApplicationError::infrastructure("token expiration overflow"))?;

        let params = authority_params(subject, kind, issued_at, expires_at);
        build_and_serialize_biscuit(params, self.root.as_ref())
    }

    async fn verify(&self, token: &str) -> ApplicationResult<TokenClaims> {
        let biscuit = Biscuit::from_base64(token, self.public).map_err(invalid_token)?;

        let mut params: HashMap<String, Term> = HashMap::new();
        params.insert("now".to_string(), SystemTime::from(self.clock.now()).into());

        let mut authorizer = AuthorizerBuilder::new()
            .code_with_params(AUTHORIZER_CODE, params, HashMap::new())
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?
            .build(&biscuit)
            .map_err(invalid_token)?;

        authorizer.authorize().map_err(invalid_token)?;

        let (facts, _, _, _) = authorizer.dump();
        crate::infrastructure::security::claims::parse_claims(facts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::{ClientId, Username};
    use std::sync::Mutex;

    const TEST_KEY: &str = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";
    const OTHER_KEY: &str = "fedcba9876543210fedcba9876543210fedcba9876543210fedcba9876543210";

    struct SteppingClock(Mutex<DateTime<Utc>>);

    impl SteppingClock {
        fn advance(&self, by: ChronoDuration) {
            let mut guard = self.0.lock().unwrap();
            *guard += by;
        }
    }

    impl Clock for SteppingClock {
        fn now(&self) -> DateTime<Utc> {
            *self.0.lock().unwrap()
        }
    }

    fn codec_with(key: &str, clock: Arc<SteppingClock>) -> BiscuitTokenCodec {
        BiscuitTokenCodec::new(
            key,
            Duration::from_secs(60 * 60),
            Duration::from_secs(60 * 60 * 24 * 30),
            clock,
        )
        .unwrap()
    }

    fn subject() -> TokenSubject {
        TokenSubject::new(Username::new("alice").unwrap(), ClientId::new("c1").unwrap())
    }

    fn clock() -> Arc<SteppingClock> {
        Arc::new(SteppingClock(Mutex::new(Utc::now())))
    }

    #[tokio::test]
    async fn issued_tokens_carry_subject_and_kind() {
        let codec = codec_with(TEST_KEY, clock());

        let access = codec.issue_access_token(&subject()).await.unwrap();
        let refresh = codec.issue_refresh_token(&subject()).await.unwrap();

        let access_claims = codec.verify(&access).await.unwrap();
        assert_eq!(access_claims.username.as_str(), "alice");
        assert_eq!(access_claims.client_id.as_str(), "c1");
        assert_eq!(access_claims.kind, TokenKind::Access);

        let refresh_claims = codec.verify(&refresh).await.unwrap();
        assert_eq!(refresh_claims.kind, TokenKind::Refresh);
        assert!(refresh_claims.expires_at > access_claims.expires_at);
    }

    #[tokio::test]
    async fn tokens_for_the_same_subject_are_distinct() {
        let codec = codec_with(TEST_KEY, clock());
        let first = codec.issue_access_token(&subject()).await.unwrap();
        let second = codec.issue_access_token(&subject()).await.unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn expired_access_token_is_rejected() {
        let clock = clock();
        let codec = codec_with(TEST_KEY, Arc::clone(&clock));
        let token = codec.issue_access_token(&subject()).await.unwrap();

        clock.advance(ChronoDuration::hours(2));

        let err = codec.verify(&token).await.unwrap_err();
        assert_eq!(err.auth_kind(), Some(AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn refresh_token_outlives_access_token() {
        let clock = clock();
        let codec = codec_with(TEST_KEY, Arc::clone(&clock));
        let refresh = codec.issue_refresh_token(&subject()).await.unwrap();

        clock.advance(ChronoDuration::days(1));
        assert!(codec.verify(&refresh).await.is_ok());

        clock.advance(ChronoDuration::days(30));
        assert!(codec.verify(&refresh).await.is_err());
    }

    #[tokio::test]
    async fn token_signed_by_another_key_is_rejected() {
        let clock = clock();
        let foreign = codec_with(OTHER_KEY, Arc::clone(&clock));
        let codec = codec_with(TEST_KEY, clock);

        let token = foreign.issue_access_token(&subject()).await.unwrap();
        let err = codec.verify(&token).await.unwrap_err();
        assert_eq!(err.auth_kind(), Some(AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn garbage_is_rejected() {
        let codec = codec_with(TEST_KEY, clock());
        for token in ["", "not-a-token", "accessToken"] {
            let err = codec.verify(token).await.unwrap_err();
            assert_eq!(err.auth_kind(), Some(AuthError::InvalidToken));
        }
    }
}
