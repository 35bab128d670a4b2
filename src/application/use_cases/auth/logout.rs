use crate::application::error::AppResult;
use crate::application::ports::token_blacklist_repository::TokenBlacklistRepository;
use crate::infrastructure::crypto::{self, jwt::JwtKeys};

pub struct Logout<'a, B: TokenBlacklistRepository + ?Sized> {
    pub keys: &'a JwtKeys,
    pub blacklist: &'a B,
}

impl<'a, B: TokenBlacklistRepository + ?Sized> Logout<'a, B> {
    /// Revokes `token` until its own expiry. Tokens that no longer verify are
    /// already unusable and are left alone.
    pub async fn execute(&self, token: &str) -> AppResult<()> {
        let token = token.trim();
        let Ok(claims) = self.keys.decode(token) else {
            tracing::debug!("logout_with_unverifiable_token");
            return Ok(());
        };
        let Some(expires_at) = claims.expires_at() else {
            return Ok(());
        };
        self.blacklist
            .revoke(&crypto::token_fingerprint(token), expires_at)
            .await?;
        tracing::info!(sub = %claims.sub, "token_revoked");
        Ok(())
    }
}
