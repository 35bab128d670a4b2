use crate::application::access::Principal;
use crate::application::error::{AppError, AppResult};
use crate::application::ports::token_blacklist_repository::TokenBlacklistRepository;
use crate::infrastructure::crypto::{self, jwt::JwtKeys};

pub const INVALID_TOKEN: &str = "The provided token is invalid or has expired.";
pub const UNREADABLE_CLAIMS: &str = "Invalid token: could not extract user details.";

/// Turns a bearer token into a `Principal`: signature and expiry must check
/// out and the token must not have been revoked by a logout.
pub struct Authenticate<'a, B: TokenBlacklistRepository + ?Sized> {
    pub keys: &'a JwtKeys,
    pub blacklist: &'a B,
}

impl<'a, B: TokenBlacklistRepository + ?Sized> Authenticate<'a, B> {
    pub async fn execute(&self, token: &str) -> AppResult<Principal> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AppError::unauthorized(INVALID_TOKEN));
        }
        let claims = self.keys.decode(token).map_err(|e| {
            tracing::debug!(error = %e, "token_rejected");
            AppError::unauthorized(INVALID_TOKEN)
        })?;
        if self
            .blacklist
            .is_revoked(&crypto::token_fingerprint(token))
            .await?
        {
            tracing::debug!(sub = %claims.sub, "revoked_token_used");
            return Err(AppError::unauthorized(INVALID_TOKEN));
        }
        match (claims.user_id(), claims.role()) {
            (Some(user_id), Some(role)) => Ok(Principal { user_id, role }),
            _ => Err(AppError::unauthorized(UNREADABLE_CLAIMS)),
        }
    }
}
