// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Short-lived bearer assertions for the Coinbase Developer Platform (CDP).
//!
//! Each assertion is a JWT bound to a single request (`uri` claim of the
//! form `"POST api.developer.coinbase.com/onramp/v1/token"`), valid for
//! [`ASSERTION_TTL_SECS`] seconds and carrying a random `nonce` header.
//!
//! ## Key formats
//!
//! - PEM EC P-256 private keys, SEC1 (`EC PRIVATE KEY`) or PKCS#8
//!   (`PRIVATE KEY`), signed with ES256. Literal `\n` escapes are accepted so
//!   that keys can be pasted into a single environment variable.
//! - Base64 Ed25519 keys (32-byte seed, or 64-byte seed followed by the
//!   public key), signed with EdDSA.

use base64ct::{Base64, Base64UrlUnpadded, Encoding};
use ed25519_dalek::Signer;
use jsonwebtoken::{Algorithm, EncodingKey};
use p256::pkcs8::{DecodePrivateKey, EncodePrivateKey};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::CdpCredentials;

pub const ASSERTION_TTL_SECS: i64 = 120;
const ISSUER: &str = "cdp";

#[derive(Debug, thiserror::Error)]
pub enum AssertionError {
    #[error("key secret is neither a PEM EC key nor a base64 Ed25519 key")]
    UnsupportedKey,

    #[error("invalid EC private key: {0}")]
    InvalidEcKey(String),

    #[error("invalid Ed25519 private key: {0}")]
    InvalidEd25519Key(String),

    #[error("signing failed: {0}")]
    Signing(String),

    #[error("failed to encode assertion: {0}")]
    Encoding(String),
}

#[derive(Serialize)]
struct AssertionHeader<'a> {
    alg: &'a str,
    kid: &'a str,
    typ: &'a str,
    nonce: String,
}

/// Claims carried by every assertion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssertionClaims {
    pub sub: String,
    pub iss: String,
    pub nbf: i64,
    pub exp: i64,
    pub uri: String,
}

enum SigningKey {
    Es256(EncodingKey),
    Ed25519(ed25519_dalek::SigningKey),
}

/// Signs request-scoped assertions with one CDP API key.
pub struct AssertionSigner {
    key_name: String,
    key: SigningKey,
}

impl AssertionSigner {
    pub fn from_credentials(credentials: &CdpCredentials) -> Result<Self, AssertionError> {
        Ok(Self {
            key_name: credentials.key_name.clone(),
            key: parse_signing_key(&credentials.key_secret)?,
        })
    }

    /// JOSE `alg` value used for this key.
    pub fn algorithm(&self) -> &'static str {
        match self.key {
            SigningKey::Es256(_) => "ES256",
            SigningKey::Ed25519(_) => "EdDSA",
        }
    }

    /// Signs an assertion for `method host path`, valid from `issued_at`
    /// (Unix seconds) for [`ASSERTION_TTL_SECS`].
    pub fn sign(
        &self,
        method: &str,
        host: &str,
        path: &str,
        issued_at: i64,
    ) -> Result<String, AssertionError> {
        let header = AssertionHeader {
            alg: self.algorithm(),
            kid: &self.key_name,
            typ: "JWT",
            nonce: Uuid::new_v4().simple().to_string(),
        };
        let claims = AssertionClaims {
            sub: self.key_name.clone(),
            iss: ISSUER.to_string(),
            nbf: issued_at,
            exp: issued_at + ASSERTION_TTL_SECS,
            uri: request_uri(method, host, path),
        };

        let header_json =
            serde_json::to_vec(&header).map_err(|e| AssertionError::Encoding(e.to_string()))?;
        let claims_json =
            serde_json::to_vec(&claims).map_err(|e| AssertionError::Encoding(e.to_string()))?;
        let message = format!(
            "{}.{}",
            Base64UrlUnpadded::encode_string(&header_json),
            Base64UrlUnpadded::encode_string(&claims_json)
        );

        let signature = match &self.key {
            SigningKey::Es256(key) => {
                jsonwebtoken::crypto::sign(message.as_bytes(), key, Algorithm::ES256)
                    .map_err(|e| AssertionError::Signing(e.to_string()))?
            }
            SigningKey::Ed25519(key) => {
                Base64UrlUnpadded::encode_string(&key.sign(message.as_bytes()).to_bytes())
            }
        };

        Ok(format!("{message}.{signature}"))
    }
}

pub fn request_uri(method: &str, host: &str, path: &str) -> String {
    format!("{method} {host}{path}")
}

fn parse_signing_key(secret: &str) -> Result<SigningKey, AssertionError> {
    let secret = secret.trim();

    if secret.contains("-----BEGIN") {
        return parse_ec_key(&secret.replace("\\n", "\n")).map(SigningKey::Es256);
    }

    let bytes = Base64::decode_vec(secret).map_err(|_| AssertionError::UnsupportedKey)?;
    let seed: [u8; 32] = match bytes.len() {
        32 | 64 => bytes[..32]
            .try_into()
            .map_err(|_| AssertionError::InvalidEd25519Key("seed slice".to_string()))?,
        other => {
            return Err(AssertionError::InvalidEd25519Key(format!(
                "expected 32 or 64 bytes, got {other}"
            )))
        }
    };
    Ok(SigningKey::Ed25519(ed25519_dalek::SigningKey::from_bytes(&seed)))
}

/// Parses a P-256 PEM key, SEC1 or PKCS#8, into a PKCS#8 signing key.
fn parse_ec_key(pem_text: &str) -> Result<EncodingKey, AssertionError> {
    let block = pem::parse(pem_text.as_bytes())
        .map_err(|e| AssertionError::InvalidEcKey(e.to_string()))?;
    let secret_key = match block.tag() {
        "EC PRIVATE KEY" => p256::SecretKey::from_sec1_der(block.contents())
            .map_err(|e| AssertionError::InvalidEcKey(e.to_string()))?,
        "PRIVATE KEY" => p256::SecretKey::from_pkcs8_der(block.contents())
            .map_err(|e| AssertionError::InvalidEcKey(e.to_string()))?,
        other => {
            return Err(AssertionError::InvalidEcKey(format!(
                "unsupported PEM block `{other}`"
            )))
        }
    };
    let pkcs8 = secret_key
        .to_pkcs8_der()
        .map_err(|e| AssertionError::InvalidEcKey(e.to_string()))?;
    Ok(EncodingKey::from_ec_der(pkcs8.as_bytes()))
}
