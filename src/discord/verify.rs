//! Ed25519 request signature verification.
//!
//! Discord signs every webhook request. The signature (hex) is sent in
//! `X-Signature-Ed25519` and covers the `X-Signature-Timestamp` header value
//! followed by the raw body.

use axum::http::HeaderMap;
use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use log::{debug, warn};

pub const SIGNATURE_HEADER: &str = "x-signature-ed25519";
pub const TIMESTAMP_HEADER: &str = "x-signature-timestamp";

/// Errors raised while loading the application public key.
#[derive(Debug, thiserror::Error)]
pub enum VerifierError {
    #[error("public key is not valid hex: {0}")]
    Hex(#[from] hex::FromHexError),
    #[error("public key must be 32 bytes long, got {0}")]
    Length(usize),
    #[error("invalid Ed25519 public key: {0}")]
    Key(#[from] ed25519_dalek::SignatureError),
}

/// Decides whether an inbound request really comes from Discord.
#[derive(Debug, Clone)]
pub struct RequestVerifier {
    /// Application public key
    public_key: VerifyingKey,
    /// Accept every request, for local testing only
    skip_validation: bool,
}

impl RequestVerifier {
    /// Create a new [RequestVerifier].
    pub fn new(public_key: VerifyingKey, skip_validation: bool) -> Self {
        RequestVerifier {
            public_key,
            skip_validation,
        }
    }

    /// Create a new [RequestVerifier] from the hex encoded application public key.
    ///
    /// # Errors
    ///
    /// Fails if the key is not hex, not 32 bytes long, or not a valid Ed25519 point.
    pub fn from_hex(public_key: &str, skip_validation: bool) -> Result<Self, VerifierError> {
        let bytes = hex::decode(public_key.trim())?;
        let bytes: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| VerifierError::Length(bytes.len()))?;

        Ok(Self::new(VerifyingKey::from_bytes(&bytes)?, skip_validation))
    }

    /// Whether signature validation is bypassed.
    pub fn skips_validation(&self) -> bool {
        self.skip_validation
    }

    /// Returns `true` if the request is allowed to reach the interaction handler.
    ///
    /// Any missing header, malformed signature or failed verification yields `false`.
    pub fn is_authorized(&self, headers: &HeaderMap, body: &[u8]) -> bool {
        if self.skip_validation {
            debug!("skipping request validation");
            return true;
        }

        debug!("validating request");

        match self.verify(headers, body) {
            Some(()) => true,
            None => {
                warn!("rejecting request with an invalid signature");
                false
            }
        }
    }

    fn verify(&self, headers: &HeaderMap, body: &[u8]) -> Option<()> {
        let signature = headers.get(SIGNATURE_HEADER)?.to_str().ok()?;
        let timestamp = headers.get(TIMESTAMP_HEADER)?.as_bytes();

        let signature: [u8; 64] = hex::decode(signature).ok()?.try_into().ok()?;
        let signature = Signature::from_bytes(&signature);

        let message = [timestamp, body].concat();

        self.public_key.verify(&message, &signature).ok()
    }
}
