use base64::Engine;
use serde::Deserialize;

use super::types::CreateSessionResponse;
use crate::error::{Error, Result};

/// Authenticated session for one account. Held only in memory and passed
/// explicitly to every harvester and mutator.
#[derive(Clone)]
pub struct Session {
    pub did: String,
    pub handle: String,
    access_jwt: String,
    refresh_jwt: String,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("did", &self.did)
            .field("handle", &self.handle)
            .finish_non_exhaustive()
    }
}

#[derive(Deserialize)]
struct JwtClaims {
    exp: Option<i64>,
}

impl Session {
    pub fn new(did: String, handle: String, access_jwt: String, refresh_jwt: String) -> Self {
        Self {
            did,
            handle,
            access_jwt,
            refresh_jwt,
        }
    }

    pub fn access_jwt(&self) -> &str {
        &self.access_jwt
    }

    pub fn refresh_jwt(&self) -> &str {
        &self.refresh_jwt
    }

    /// Expiry (unix seconds) of the access token, read from its `exp` claim.
    pub fn access_expires_at(&self) -> Option<i64> {
        jwt_expiry(&self.access_jwt)
    }

    /// True when the access token expires within `margin_secs` of `now`.
    /// Tokens without a readable `exp` claim are treated as fresh.
    pub fn needs_refresh(&self, now: i64, margin_secs: i64) -> bool {
        self.access_expires_at()
            .is_some_and(|exp| exp - now <= margin_secs)
    }
}

impl From<CreateSessionResponse> for Session {
    fn from(resp: CreateSessionResponse) -> Self {
        Session::new(resp.did, resp.handle, resp.access_jwt, resp.refresh_jwt)
    }
}

fn jwt_expiry(token: &str) -> Option<i64> {
    let payload = token.split('.').nth(1)?;
    let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .ok()?;
    serde_json::from_slice::<JwtClaims>(&bytes).ok()?.exp
}

/// Normalize a user-entered handle: trim, drop `@`, lowercase.
pub fn normalize_handle(raw: &str) -> String {
    raw.trim().replace('@', "").to_lowercase()
}

/// Validate login input before any network call.
pub fn validate_credentials(handle: &str, password: &str) -> Result<(String, String)> {
    let handle = normalize_handle(handle);
    let password = password.trim().to_string();
    if handle.is_empty() || password.is_empty() {
        return Err(Error::InvalidInput(
            "Please provide a handle and password.".to_string(),
        ));
    }
    Ok((handle, password))
}
