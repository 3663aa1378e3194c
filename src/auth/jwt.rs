use std::time::Duration;

use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;

use crate::auth::claims::{Claims, TokenKind};
use crate::config::JwtConfig;
use crate::state::AppState;

/// Holds JWT signing and verification keys with config data.
#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub issuer: String,
    pub audience: String,
    pub session_ttl: Duration,
    pub reset_ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        let JwtConfig {
            secret,
            issuer,
            audience,
            session_ttl_minutes,
            reset_ttl_minutes,
        } = state.config.jwt.clone();
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
            audience,
            session_ttl: Duration::from_secs((session_ttl_minutes as u64) * 60),
            reset_ttl: Duration::from_secs((reset_ttl_minutes as u64) * 60),
        }
    }
}

impl JwtKeys {
    fn sign_with_kind(&self, email: &str, kind: TokenKind) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let ttl = match kind {
            TokenKind::Session => self.session_ttl,
            TokenKind::Reset => self.reset_ttl,
        };
        let exp = now + TimeDuration::seconds(ttl.as_secs() as i64);
        let claims = Claims {
            sub: email.to_string(),
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            kind,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(email = %email, kind = ?kind, "jwt signed");
        Ok(token)
    }

    pub fn sign_session(&self, email: &str) -> anyhow::Result<String> {
        self.sign_with_kind(email, TokenKind::Session)
    }

    pub fn sign_reset(&self, email: &str) -> anyhow::Result<String> {
        self.sign_with_kind(email, TokenKind::Reset)
    }

    /// Checks signature, expiry, issuer and audience.
    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        debug!(email = %data.claims.sub, kind = ?data.claims.kind, "jwt verified");
        Ok(data.claims)
    }

    pub fn verify_reset(&self, token: &str) -> anyhow::Result<Claims> {
        let claims = self.verify(token)?;
        if claims.kind != TokenKind::Reset {
            anyhow::bail!("not a reset token");
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_keys() -> JwtKeys {
        let state = AppState::fake();
        JwtKeys::from_ref(&state)
    }

    #[test]
    fn sign_and_verify_session_token() {
        let keys = make_keys();
        let token = keys.sign_session("a@example.com").expect("sign session");
        let claims = keys.verify(&token).expect("verify token");
        assert_eq!(claims.sub, "a@example.com");
        assert_eq!(claims.iss, "test-issuer");
        assert_eq!(claims.aud, "test-aud");
        assert_eq!(claims.kind, TokenKind::Session);
    }

    #[test]
    fn sign_and_verify_reset_token() {
        let keys = make_keys();
        let token = keys.sign_reset("a@example.com").expect("sign reset");
        let claims = keys.verify_reset(&token).expect("verify reset");
        assert_eq!(claims.sub, "a@example.com");
        assert_eq!(claims.kind, TokenKind::Reset);
    }

    #[test]
    fn verify_reset_rejects_session_token() {
        let keys = make_keys();
        let token = keys.sign_session("a@example.com").expect("sign session");
        let err = keys.verify_reset(&token).unwrap_err();
        assert!(err.to_string().contains("not a reset token"));
    }

    #[test]
    fn verify_rejects_wrong_secret() {
        let keys = make_keys();
        let forged = encode(
            &Header::default(),
            &Claims {
                sub: "a@example.com".into(),
                iat: OffsetDateTime::now_utc().unix_timestamp() as usize,
                exp: (OffsetDateTime::now_utc() + TimeDuration::minutes(5)).unix_timestamp()
                    as usize,
                iss: "test-issuer".into(),
                aud: "test-aud".into(),
                kind: TokenKind::Session,
            },
            &EncodingKey::from_secret(b"other-secret"),
        )
        .expect("encode");
        assert!(keys.verify(&forged).is_err());
    }

    #[test]
    fn verify_rejects_expired_token() {
        let keys = make_keys();
        // Two minutes past expiry beats the default 60s leeway.
        let now = OffsetDateTime::now_utc();
        let expired = encode(
            &Header::default(),
            &Claims {
                sub: "a@example.com".into(),
                iat: (now - TimeDuration::minutes(12)).unix_timestamp() as usize,
                exp: (now - TimeDuration::minutes(2)).unix_timestamp() as usize,
                iss: "test-issuer".into(),
                aud: "test-aud".into(),
                kind: TokenKind::Reset,
            },
            &EncodingKey::from_secret(b"test"),
        )
        .expect("encode");
        assert!(keys.verify_reset(&expired).is_err());
    }
}
