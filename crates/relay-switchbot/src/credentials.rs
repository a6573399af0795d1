//! Credentials and per-request authentication envelopes.

use std::fmt;

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use relay_core::current_unix_timestamp_ms;
use reqwest::header::HeaderValue;
use sha2::Sha256;
use thiserror::Error;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Enumerates reasons `SwitchBotCredentials` construction is rejected.
pub enum CredentialsError {
    #[error("missing switchbot token")]
    MissingToken,
    #[error("missing switchbot secret")]
    MissingSecret,
    #[error("switchbot token contains characters that are not valid in an HTTP header")]
    InvalidToken,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Enumerates signing failures.
pub enum SigningError {
    #[error("failed to initialize hmac signer")]
    InvalidKey,
}

/// Account token and shared secret, held read-only for the process lifetime.
#[derive(Clone, PartialEq, Eq)]
pub struct SwitchBotCredentials {
    token: String,
    secret: String,
}

impl SwitchBotCredentials {
    pub fn new(
        token: impl Into<String>,
        secret: impl Into<String>,
    ) -> Result<Self, CredentialsError> {
        let token = token.into().trim().to_string();
        let secret = secret.into().trim().to_string();
        if token.is_empty() {
            return Err(CredentialsError::MissingToken);
        }
        if secret.is_empty() {
            return Err(CredentialsError::MissingSecret);
        }
        if HeaderValue::from_str(&token).is_err() {
            return Err(CredentialsError::InvalidToken);
        }
        Ok(Self { token, secret })
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for SwitchBotCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwitchBotCredentials")
            .field("token", &"<redacted>")
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// The `t` / `nonce` / `sign` triple authenticating exactly one request.
///
/// Envelopes are built immediately before a request and dropped after it; the
/// remote API rejects stale timestamps and replayed nonces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthEnvelope {
    pub timestamp_ms: String,
    pub nonce: String,
    pub signature: String,
}

impl AuthEnvelope {
    /// Builds a new envelope from the current clock and a random v4 UUID nonce.
    pub fn generate(credentials: &SwitchBotCredentials) -> Result<Self, SigningError> {
        let timestamp_ms = current_unix_timestamp_ms().to_string();
        let nonce = Uuid::new_v4().to_string();
        Self::from_parts(credentials, timestamp_ms, nonce)
    }

    pub fn from_parts(
        credentials: &SwitchBotCredentials,
        timestamp_ms: String,
        nonce: String,
    ) -> Result<Self, SigningError> {
        let signature = sign_payload(credentials, &timestamp_ms, &nonce)?;
        Ok(Self {
            timestamp_ms,
            nonce,
            signature,
        })
    }
}

/// Computes `base64(HMAC-SHA256(secret, token ∥ timestamp ∥ nonce))`.
pub fn sign_payload(
    credentials: &SwitchBotCredentials,
    timestamp_ms: &str,
    nonce: &str,
) -> Result<String, SigningError> {
    let mut mac = HmacSha256::new_from_slice(credentials.secret.as_bytes())
        .map_err(|_| SigningError::InvalidKey)?;
    mac.update(credentials.token.as_bytes());
    mac.update(timestamp_ms.as_bytes());
    mac.update(nonce.as_bytes());
    Ok(BASE64_STANDARD.encode(mac.finalize().into_bytes()))
}
