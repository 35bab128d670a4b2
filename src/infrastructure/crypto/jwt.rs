use anyhow::Context;
use base64::Engine as _;
use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::domain::users::{Role, User};

const MIN_KEY_BYTES: usize = 32;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn user_id(&self) -> Option<i32> {
        self.sub.parse().ok()
    }

    pub fn role(&self) -> Option<Role> {
        self.role.parse().ok()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// HMAC signing material for access tokens.
#[derive(Clone)]
pub struct JwtKeys {
    algorithm: Algorithm,
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl JwtKeys {
    /// `secret` is standard base64. The HMAC variant follows the key size:
    /// 64+ bytes sign with HS512, 48+ with HS384, anything else with HS256.
    pub fn from_base64_secret(secret: &str, ttl_secs: i64) -> anyhow::Result<Self> {
        let raw = base64::engine::general_purpose::STANDARD
            .decode(secret.trim())
            .context("JWT_SECRET_KEY is not valid base64")?;
        Self::from_bytes(&raw, ttl_secs)
    }

    pub fn from_bytes(raw: &[u8], ttl_secs: i64) -> anyhow::Result<Self> {
        if raw.len() < MIN_KEY_BYTES {
            anyhow::bail!(
                "JWT secret is {} bits; at least {} bits are required",
                raw.len() * 8,
                MIN_KEY_BYTES * 8
            );
        }
        let algorithm = match raw.len() {
            n if n >= 64 => Algorithm::HS512,
            n if n >= 48 => Algorithm::HS384,
            _ => Algorithm::HS256,
        };
        Ok(Self {
            algorithm,
            encoding: EncodingKey::from_secret(raw),
            decoding: DecodingKey::from_secret(raw),
            ttl: Duration::try_seconds(ttl_secs.max(1))
                .context("token lifetime is out of range")?,
        })
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn issue(&self, user: &User) -> anyhow::Result<IssuedToken> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(self.ttl)
            .context("token expiry overflows the calendar")?;
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            role: user.role.as_str().to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        let token = self.encode(&claims)?;
        Ok(IssuedToken { token, expires_at })
    }

    fn encode(&self, claims: &Claims) -> anyhow::Result<String> {
        jsonwebtoken::encode(&Header::new(self.algorithm), claims, &self.encoding)
            .context("failed to sign token")
    }

    /// Verifies signature, algorithm and expiry (no leeway).
    pub fn decode(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation).map(|data| data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(len: usize) -> JwtKeys {
        JwtKeys::from_bytes(&vec![7u8; len], 3600).unwrap()
    }

    fn waiter() -> User {
        User {
            id: 42,
            first_name: "Pedro".into(),
            middle_name: None,
            last_name: "Paramo".into(),
            email: "pedro.p@restaurante.com".into(),
            password_hash: String::new(),
            role: Role::Waiter,
            created_at: None,
        }
    }

    #[test]
    fn algorithm_follows_key_size() {
        assert_eq!(keys(32).algorithm(), Algorithm::HS256);
        assert_eq!(keys(47).algorithm(), Algorithm::HS256);
        assert_eq!(keys(48).algorithm(), Algorithm::HS384);
        assert_eq!(keys(64).algorithm(), Algorithm::HS512);
    }

    #[test]
    fn short_or_garbled_secrets_are_rejected() {
        assert!(JwtKeys::from_bytes(&[1u8; 31], 60).is_err());
        assert!(JwtKeys::from_base64_secret("%%% not base64 %%%", 60).is_err());
        let short = base64::engine::general_purpose::STANDARD.encode([1u8; 16]);
        assert!(JwtKeys::from_base64_secret(&short, 60).is_err());
    }

    #[test]
    fn unrepresentable_lifetimes_fail_instead_of_panicking() {
        assert!(JwtKeys::from_bytes(&[7u8; 32], i64::MAX).is_err());
        let keys = JwtKeys::from_bytes(&[7u8; 32], 10_000_000_000_000).unwrap();
        assert!(keys.issue(&waiter()).is_err());
    }

    #[test]
    fn issued_token_carries_user_claims() {
        let keys = keys(64);
        let issued = keys.issue(&waiter()).unwrap();
        let claims = keys.decode(&issued.token).unwrap();
        assert_eq!(claims.user_id(), Some(42));
        assert_eq!(claims.role(), Some(Role::Waiter));
        assert_eq!(claims.email, "pedro.p@restaurante.com");
        assert_eq!(claims.expires_at().unwrap().timestamp(), issued.expires_at.timestamp());
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = keys(32);
        let now = Utc::now().timestamp();
        let token = keys
            .encode(&Claims {
                sub: "1".into(),
                email: "admin@system.com".into(),
                role: "ADMIN".into(),
                iat: now - 120,
                exp: now - 10,
            })
            .unwrap();
        assert!(keys.decode(&token).is_err());
    }

    #[test]
    fn token_from_another_key_is_rejected() {
        let ours = keys(32);
        let theirs = JwtKeys::from_bytes(&[9u8; 32], 3600).unwrap();
        let token = theirs.issue(&waiter()).unwrap().token;
        assert!(ours.decode(&token).is_err());
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let keys = keys(32);
        let token = keys.issue(&waiter()).unwrap().token;
        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        let forged = Claims {
            sub: "1".into(),
            email: "pedro.p@restaurante.com".into(),
            role: "ADMIN".into(),
            iat: Utc::now().timestamp(),
            exp: Utc::now().timestamp() + 3600,
        };
        parts[1] = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .encode(serde_json::to_vec(&forged).unwrap());
        assert!(keys.decode(&parts.join(".")).is_err());
    }
}
