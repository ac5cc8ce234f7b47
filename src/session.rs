//! Signed, expiring session credentials.
//!
//! The credential is an HS256 JWT. Whatever claims the caller passes in are
//! carried verbatim; the codec only owns the `exp` claim, which it sets to
//! issue time plus [`SESSION_TTL_HOURS`].

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use serde_json::{Map, Value};

use crate::{Res, error::Error};

pub const SESSION_TTL_HOURS: i64 = 24;

/// Claim carrying the provider's opaque user identifier.
pub const SUBJECT_CLAIM: &str = "sub";
pub const EXPIRY_CLAIM: &str = "exp";

pub type Claims = Map<String, Value>;

#[derive(Clone)]
pub struct SessionCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl SessionCodec {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against an explicit clock in `verify_at`.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.validate_aud = false;
        validation.required_spec_claims = HashSet::from([EXPIRY_CLAIM.to_string()]);

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn issue(&self, claims: &Claims) -> Res<String> {
        self.issue_at(claims, Utc::now())
    }

    /// Signs `claims` as if issued at `now`. Any `exp` in `claims` is replaced.
    pub fn issue_at(&self, claims: &Claims, now: DateTime<Utc>) -> Res<String> {
        let mut to_encode = claims.clone();
        let expires_at = now + Duration::hours(SESSION_TTL_HOURS);
        to_encode.insert(EXPIRY_CLAIM.into(), Value::from(expires_at.timestamp()));

        Ok(jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &to_encode,
            &self.encoding,
        )?)
    }

    pub fn issue_for_subject(&self, subject_id: &str) -> Res<String> {
        let mut claims = Claims::new();
        claims.insert(SUBJECT_CLAIM.into(), Value::from(subject_id));
        self.issue(&claims)
    }

    pub fn verify(&self, token: &str) -> Res<Claims> {
        self.verify_at(token, Utc::now())
    }

    /// Verifies signature and structure, then expiry against `now`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidCredential`] for a bad signature, a malformed token,
    ///   or a missing/non-numeric `exp`
    /// - [`Error::ExpiredCredential`] once `now` has reached `exp`
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Res<Claims> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|e| {
                match e.kind() {
                    ErrorKind::InvalidSignature => {
                        tracing::debug!("Session token signature mismatch")
                    }
                    kind => tracing::debug!(?kind, "Malformed session token"),
                }
                Error::InvalidCredential
            })?;

        let expires_at = data
            .claims
            .get(EXPIRY_CLAIM)
            .and_then(Value::as_i64)
            .ok_or(Error::InvalidCredential)?;

        if now.timestamp() >= expires_at {
            return Err(Error::ExpiredCredential);
        }

        Ok(data.claims)
    }
}
