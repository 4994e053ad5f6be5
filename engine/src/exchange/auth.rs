//! Upbit request authentication (HS256 JWT)

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use serde::Serialize;
use sha2::{Digest, Sha256, Sha512};
use uuid::Uuid;

use crate::error::ExchangeError;

type HmacSha256 = Hmac<Sha256>;

/// API key pair for private endpoints
#[derive(Clone)]
pub struct ApiCredentials {
    access_key: String,
    secret_key: String,
}

impl ApiCredentials {
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
        }
    }

    pub fn access_key(&self) -> &str {
        &self.access_key
    }
}

impl std::fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"[REDACTED]")
            .finish()
    }
}

#[derive(Serialize)]
struct Claims<'a> {
    access_key: &'a str,
    nonce: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    query_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    query_hash_alg: Option<&'static str>,
}

/// Signs Upbit JWTs
pub struct RequestSigner<'a> {
    credentials: &'a ApiCredentials,
}

impl<'a> RequestSigner<'a> {
    pub fn new(credentials: &'a ApiCredentials) -> Self {
        Self { credentials }
    }

    /// `Authorization` header value for a request.
    ///
    /// `query` is the unencoded `key=value&...` form of the request
    /// parameters; requests without parameters pass `None`.
    pub fn authorization(&self, query: Option<&str>) -> Result<String, ExchangeError> {
        let claims = Claims {
            access_key: self.credentials.access_key(),
            nonce: Uuid::new_v4().to_string(),
            query_hash: query.map(query_hash),
            query_hash_alg: query.map(|_| "SHA512"),
        };
        Ok(format!("Bearer {}", self.token(&claims)?))
    }

    fn token(&self, claims: &Claims<'_>) -> Result<String, ExchangeError> {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = serde_json::to_vec(claims)
            .map_err(|e| ExchangeError::Auth(format!("claims encoding: {}", e)))?;
        let signing_input = format!("{}.{}", header, URL_SAFE_NO_PAD.encode(payload));

        let mut mac = HmacSha256::new_from_slice(self.credentials.secret_key.as_bytes())
            .map_err(|e| ExchangeError::Auth(e.to_string()))?;
        mac.update(signing_input.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        Ok(format!("{}.{}", signing_input, signature))
    }
}

/// Hex SHA-512 of a query string
pub fn query_hash(query: &str) -> String {
    hex::encode(Sha512::digest(query.as_bytes()))
}

/// Join parameters as an unencoded query string, preserving order
pub fn query_string(params: &[(&str, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}
