//! Bearer-token claim decoding.
//!
//! The console decodes the payload segment of a JWT-shaped token without
//! verifying the signature — signature verification is the gateway's job,
//! and the console trusts it exactly the way a browser client does. All the
//! session layer needs from the token is identity and expiry.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use atrium_core::{Error, Result};

/// Identity claims carried in the gateway-issued bearer token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: Uuid,
    pub email: String,
    pub role: String,
    /// Home tenant of the user, when the gateway scopes the token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<Uuid>,
    /// Expiry, seconds since epoch.
    pub exp: i64,
    /// Issued-at, seconds since epoch.
    pub iat: i64,
}

impl Claims {
    /// Decode claims from the payload segment of a `header.payload.signature`
    /// token. The signature segment is ignored.
    pub fn decode(token: &str) -> Result<Self> {
        let mut segments = token.split('.');
        let payload = match (segments.next(), segments.next()) {
            (Some(_header), Some(payload)) if !payload.is_empty() => payload,
            _ => {
                return Err(Error::Unauthorized(
                    "malformed token: expected header.payload.signature".to_string(),
                ))
            }
        };

        let bytes = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|e| Error::Unauthorized(format!("malformed token payload: {}", e)))?;

        serde_json::from_slice(&bytes)
            .map_err(|e| Error::Unauthorized(format!("malformed token claims: {}", e)))
    }

    /// True when the token's expiry has passed.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Encode these claims as an unsigned `header.payload.` token.
    ///
    /// Used by the mock backend and the demo binary to fabricate tokens;
    /// the real gateway issues signed ones with the same payload shape.
    pub fn to_unsigned_token(&self) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(self).unwrap_or_default());
        format!("{}.{}.", header, payload)
    }
}
