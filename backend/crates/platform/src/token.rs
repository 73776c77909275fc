//! Signed Access Tokens
//!
//! Compact JWS (HS256) carrying a subject, issue/expiry timestamps and a
//! caller-defined claim set. Verification pins the algorithm, so a token
//! whose header names anything other than HS256 (including `none`) is
//! rejected before its signature is even considered.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenError {
    /// Signature valid but `exp` has passed
    #[error("Token has expired")]
    Expired,

    /// Bad encoding, bad signature, wrong algorithm or missing claims
    #[error("Token is malformed or has an invalid signature")]
    Malformed,

    /// Signing failed
    #[error("Token encoding failed: {0}")]
    Encoding(String),
}

/// Claims of a successfully verified token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken<C> {
    pub subject: String,
    pub issued_at: i64,
    pub expires_at: i64,
    pub claims: C,
}

#[derive(Serialize)]
struct OutboundClaims<'a, C> {
    sub: &'a str,
    iat: i64,
    exp: i64,
    #[serde(flatten)]
    claims: &'a C,
}

#[derive(Deserialize)]
struct InboundClaims<C> {
    sub: String,
    iat: i64,
    exp: i64,
    #[serde(flatten)]
    claims: C,
}

/// HS256 token issuer and verifier sharing one symmetric secret
#[derive(Clone)]
pub struct TokenIssuer {
    inner: Arc<IssuerInner>,
}

struct IssuerInner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "sub", "iat"]);

        Self {
            inner: Arc::new(IssuerInner {
                encoding_key: EncodingKey::from_secret(secret),
                decoding_key: DecodingKey::from_secret(secret),
                validation,
                ttl,
            }),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.inner.ttl
    }

    /// Sign a token for `subject` valid for the configured TTL from now
    pub fn issue<C: Serialize>(&self, subject: &str, claims: &C) -> Result<String, TokenError> {
        self.issue_at(subject, claims, Utc::now())
    }

    /// Sign a token as if it had been issued at `issued_at`
    pub fn issue_at<C: Serialize>(
        &self,
        subject: &str,
        claims: &C,
        issued_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let iat = issued_at.timestamp();
        let ttl_secs = i64::try_from(self.inner.ttl.as_secs()).unwrap_or(i64::MAX);
        let exp = iat.saturating_add(ttl_secs);

        encode(
            &Header::new(Algorithm::HS256),
            &OutboundClaims {
                sub: subject,
                iat,
                exp,
                claims,
            },
            &self.inner.encoding_key,
        )
        .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    /// Verify signature, algorithm and expiry, then decode the claims
    pub fn verify<C: DeserializeOwned>(&self, token: &str) -> Result<VerifiedToken<C>, TokenError> {
        let data = decode::<InboundClaims<C>>(
            token,
            &self.inner.decoding_key,
            &self.inner.validation,
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Malformed,
        })?;

        Ok(VerifiedToken {
            subject: data.claims.sub,
            issued_at: data.claims.iat,
            expires_at: data.claims.exp,
            claims: data.claims.claims,
        })
    }
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("algorithm", &"HS256")
            .field("ttl", &self.inner.ttl)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::to_base64_url;

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    struct TestClaims {
        name: String,
        role: String,
    }

    fn claims() -> TestClaims {
        TestClaims {
            name: "Alice".to_string(),
            role: "CUSTOMER".to_string(),
        }
    }

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(b"0123456789abcdef0123456789abcdef", Duration::from_secs(900))
    }

    #[test]
    fn test_issue_then_verify() {
        let issuer = issuer();
        let token = issuer.issue("user-1", &claims()).unwrap();

        let verified = issuer.verify::<TestClaims>(&token).unwrap();
        assert_eq!(verified.subject, "user-1");
        assert_eq!(verified.claims, claims());
        assert_eq!(verified.expires_at - verified.issued_at, 900);
    }

    #[test]
    fn test_token_is_three_part_compact_form() {
        let token = issuer().issue("user-1", &claims()).unwrap();
        assert_eq!(token.split('.').count(), 3);
    }

    #[test]
    fn test_expired_token() {
        let issuer = issuer();
        let long_ago = Utc::now() - chrono::Duration::hours(1);
        let token = issuer.issue_at("user-1", &claims(), long_ago).unwrap();

        assert!(matches!(
            issuer.verify::<TestClaims>(&token),
            Err(TokenError::Expired)
        ));
    }

    #[test]
    fn test_wrong_key_is_malformed() {
        let token = issuer().issue("user-1", &claims()).unwrap();
        let other = TokenIssuer::new(b"another-secret-another-secret!!!", Duration::from_secs(900));

        assert!(matches!(
            other.verify::<TestClaims>(&token),
            Err(TokenError::Malformed)
        ));
    }

    #[test]
    fn test_tampered_payload_is_malformed() {
        let issuer = issuer();
        let token = issuer.issue("user-1", &claims()).unwrap();
        let parts: Vec<&str> = token.split('.').collect();
        let forged_payload = to_base64_url(
            format!(
                r#"{{"sub":"user-1","iat":{},"exp":{},"name":"Alice","role":"ADMIN"}}"#,
                Utc::now().timestamp(),
                Utc::now().timestamp() + 900
            )
            .as_bytes(),
        );
        let forged = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);

        assert!(matches!(
            issuer.verify::<TestClaims>(&forged),
            Err(TokenError::Malformed)
        ));
    }

    #[test]
    fn test_unsigned_token_is_rejected() {
        let header = to_base64_url(br#"{"alg":"none","typ":"JWT"}"#);
        let payload = to_base64_url(
            format!(
                r#"{{"sub":"user-1","iat":{},"exp":{},"name":"Alice","role":"ADMIN"}}"#,
                Utc::now().timestamp(),
                Utc::now().timestamp() + 900
            )
            .as_bytes(),
        );
        let token = format!("{header}.{payload}.");

        assert!(matches!(
            issuer().verify::<TestClaims>(&token),
            Err(TokenError::Malformed)
        ));
    }

    #[test]
    fn test_other_algorithm_is_rejected() {
        let secret = b"0123456789abcdef0123456789abcdef";
        let now = Utc::now().timestamp();
        let token = encode(
            &Header::new(Algorithm::HS512),
            &OutboundClaims {
                sub: "user-1",
                iat: now,
                exp: now + 900,
                claims: &claims(),
            },
            &EncodingKey::from_secret(secret),
        )
        .unwrap();

        assert!(matches!(
            issuer().verify::<TestClaims>(&token),
            Err(TokenError::Malformed)
        ));
    }

    #[test]
    fn test_garbage_is_malformed() {
        for garbage in ["", "abc", "a.b.c", "....."] {
            assert!(matches!(
                issuer().verify::<TestClaims>(garbage),
                Err(TokenError::Malformed)
            ));
        }
    }

    #[test]
    fn test_missing_custom_claims_is_malformed() {
        #[derive(Serialize)]
        struct Empty {}

        let issuer = issuer();
        let token = issuer.issue("user-1", &Empty {}).unwrap();
        assert!(matches!(
            issuer.verify::<TestClaims>(&token),
            Err(TokenError::Malformed)
        ));
    }
}
