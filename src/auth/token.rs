//! Session token issuance and verification.
//!
//! Tokens are self-contained HMAC-signed claims; nothing is stored server
//! side, so a token stays valid until its expiry and cannot be revoked
//! earlier.

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default session token lifetime in seconds
pub const TOKEN_LIFETIME: i64 = 3600; // 1 hour

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,
    #[error("token signature is invalid")]
    SignatureInvalid,
    #[error("token has expired")]
    Expired,
}

/// Signs and verifies session tokens with a process-wide secret.
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: i64,
}

impl TokenSigner {
    #[must_use]
    pub fn new(secret: &[u8], ttl: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    /// Mint a signed token for a user id.
    ///
    /// # Errors
    ///
    /// Returns an error if the claims cannot be signed
    pub fn issue(&self, user_id: i64) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now().timestamp();

        let claims = Claims {
            sub: user_id.to_string(),
            iat: now,
            exp: now + self.ttl,
        };

        encode(&Header::default(), &claims, &self.encoding)
    }

    /// Check signature and expiry, returning the embedded user id.
    ///
    /// # Errors
    ///
    /// Returns `Malformed`, `SignatureInvalid` or `Expired`
    pub fn verify(&self, token: &str) -> Result<i64, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())
            .map_err(|err| match err.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::SignatureInvalid,
                _ => TokenError::Malformed,
            })?;

        data.claims
            .sub
            .parse::<i64>()
            .map_err(|_| TokenError::Malformed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    fn signer() -> TokenSigner {
        TokenSigner::new(b"test-secret", TOKEN_LIFETIME)
    }

    #[test]
    fn issue_and_verify_round_trip() -> Result<()> {
        let token = signer().issue(42)?;

        assert!(!token.is_empty());
        assert_eq!(signer().verify(&token), Ok(42));

        Ok(())
    }

    #[test]
    fn verify_rejects_expired_token() -> Result<()> {
        // negative lifetime puts the expiry well past the validation leeway
        let expired = TokenSigner::new(b"test-secret", -300);
        let token = expired.issue(42)?;

        assert_eq!(expired.verify(&token), Err(TokenError::Expired));

        Ok(())
    }

    #[test]
    fn verify_rejects_tampered_signature() -> Result<()> {
        let token = signer().issue(42)?;

        // flip the last signature character
        let tail = if token.ends_with('A') { 'B' } else { 'A' };
        let mut tampered = token[..token.len() - 1].to_string();
        tampered.push(tail);

        assert_eq!(
            signer().verify(&tampered),
            Err(TokenError::SignatureInvalid)
        );

        Ok(())
    }

    #[test]
    fn verify_rejects_wrong_secret() -> Result<()> {
        let token = signer().issue(42)?;
        let other = TokenSigner::new(b"other-secret", TOKEN_LIFETIME);

        assert_eq!(other.verify(&token), Err(TokenError::SignatureInvalid));

        Ok(())
    }

    #[test]
    fn verify_rejects_garbage() {
        assert_eq!(signer().verify("not-a-token"), Err(TokenError::Malformed));
        assert_eq!(signer().verify(""), Err(TokenError::Malformed));
    }

    #[test]
    fn verify_rejects_non_numeric_subject() -> Result<()> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "alice".to_string(),
            iat: now,
            exp: now + TOKEN_LIFETIME,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )?;

        assert_eq!(signer().verify(&token), Err(TokenError::Malformed));

        Ok(())
    }
}
