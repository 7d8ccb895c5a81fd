//! Reversible session token encoding.
//!
//! A token is the base64url (unpadded) encoding of the JSON session payload
//! `{"sub", "role", "iat", "exp"}`. Anyone can decode or forge one: this is a
//! development placeholder, not a trust boundary. A signing implementation
//! of [`SessionValidator`] replaces it when that matters.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, TimeDelta, Utc};
use portico_rbac::Role;

use crate::{AuthError, Session, SessionValidator};

/// Default session lifetime (24 hours).
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Encodes and decodes session tokens.
#[derive(Debug, Clone)]
pub struct TokenCodec {
    ttl: TimeDelta,
}

impl Default for TokenCodec {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_TTL)
    }
}

impl TokenCodec {
    /// Create a codec issuing sessions that live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl: TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX),
        }
    }

    /// Session lifetime in whole seconds.
    pub fn ttl_secs(&self) -> u64 {
        u64::try_from(self.ttl.num_seconds()).unwrap_or(0)
    }

    /// Create a session for `subject` starting now and encode it.
    pub fn issue(&self, subject: &str, role: Role) -> Result<(String, Session), AuthError> {
        self.issue_at(subject, role, Utc::now())
    }

    /// Create a session for `subject` starting at `now` and encode it.
    pub fn issue_at(
        &self,
        subject: &str,
        role: Role,
        now: DateTime<Utc>,
    ) -> Result<(String, Session), AuthError> {
        let session = Session {
            subject: subject.to_string(),
            role,
            issued_at: now,
            expires_at: now.checked_add_signed(self.ttl).unwrap_or(DateTime::<Utc>::MAX_UTC),
        };
        let token = Self::encode(&session)?;
        log::debug!("Issued session for '{subject}' as {role}");
        Ok((token, session))
    }

    /// Encode a session into an opaque token.
    pub fn encode(session: &Session) -> Result<String, AuthError> {
        let json = serde_json::to_vec(session).map_err(|e| AuthError::Encoding(e.to_string()))?;
        Ok(URL_SAFE_NO_PAD.encode(json))
    }

    /// Decode a token, rejecting it if it has expired.
    pub fn decode(&self, token: &str) -> Result<Session, AuthError> {
        self.decode_at(token, Utc::now())
    }

    /// Decode a token as of `now`.
    pub fn decode_at(&self, token: &str, now: DateTime<Utc>) -> Result<Session, AuthError> {
        let session = Self::inspect(token)?;
        if session.is_expired_at(now) {
            return Err(AuthError::Expired);
        }
        Ok(session)
    }

    /// Decode a token without checking expiry.
    pub fn inspect(token: &str) -> Result<Session, AuthError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(token.trim())
            .map_err(|e| AuthError::InvalidFormat(format!("not base64url: {e}")))?;
        let session: Session = serde_json::from_slice(&bytes)
            .map_err(|e| AuthError::InvalidFormat(format!("bad payload: {e}")))?;
        if session.issued_at > session.expires_at {
            return Err(AuthError::InvalidFormat(
                "issued after expiry".to_string(),
            ));
        }
        Ok(session)
    }
}

impl SessionValidator for TokenCodec {
    fn validate(
        &self,
        token: &str,
    ) -> Pin<Box<dyn Future<Output = Result<Session, AuthError>> + Send + '_>> {
        Box::pin(std::future::ready(self.decode(token)))
    }
}
