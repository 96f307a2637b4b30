//! Bearer token issuance and verification.
//!
//! Tokens are HMAC-signed JWTs carrying the account id as `sub` plus
//! `iat`/`exp` in Unix seconds. Expiry is checked here rather than by
//! `jsonwebtoken` so the boundary is exact and the clock is injectable.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use common::JwtConfig;
use domain::{DomainError, DomainResult, TokenError, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub sub: String,
    #[serde(default)]
    pub iat: i64,
    #[serde(default)]
    pub exp: i64,
}

/// Token response returned after successful authentication
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    /// JWT access token
    pub access_token: String,
    /// Token type (always "Bearer")
    pub token_type: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
}

/// Signs and verifies account bearer tokens with a shared secret.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    lifetime_hours: i64,
}

impl TokenService {
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(config.secret_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret_bytes()),
            validation,
            lifetime_hours: config.expiration_hours(),
        }
    }

    /// Token lifetime in seconds.
    pub fn expires_in(&self) -> i64 {
        self.lifetime_hours.saturating_mul(SECONDS_PER_HOUR)
    }

    /// Issue a token for the account, valid from now.
    pub fn issue(&self, account_id: Uuid) -> DomainResult<String> {
        self.issue_at(account_id, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    pub fn issue_at(&self, account_id: Uuid, now: DateTime<Utc>) -> DomainResult<String> {
        let expires_at = Duration::try_hours(self.lifetime_hours)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| {
                DomainError::internal(format!(
                    "token lifetime of {} hours is out of range",
                    self.lifetime_hours
                ))
            })?;
        let claims = Claims {
            sub: account_id.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| DomainError::internal(format!("token signing failed: {}", e)))
    }

    /// Build the login response for a freshly issued token.
    pub fn response(&self, access_token: String) -> TokenResponse {
        TokenResponse {
            access_token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: self.expires_in(),
        }
    }

    /// Verify a token against the current time and return its account id.
    pub fn verify(&self, token: &str) -> Result<Uuid, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a token as if the current time were `now`.
    ///
    /// A token is expired once `now` is strictly past its `exp` claim.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Uuid, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| classify(e.kind()))?;
        let claims = data.claims;

        if now.timestamp() > claims.exp {
            return Err(TokenError::Expired);
        }

        Uuid::parse_str(&claims.sub).map_err(|_| TokenError::PayloadInvalid)
    }
}

fn classify(kind: &ErrorKind) -> TokenError {
    match kind {
        ErrorKind::InvalidAlgorithm | ErrorKind::MissingAlgorithm | ErrorKind::InvalidAlgorithmName => {
            TokenError::UnexpectedAlgorithm
        }
        ErrorKind::InvalidSignature => TokenError::InvalidSignature,
        ErrorKind::ExpiredSignature => TokenError::Expired,
        ErrorKind::MissingRequiredClaim(_)
        | ErrorKind::InvalidSubject
        | ErrorKind::ImmatureSignature
        | ErrorKind::InvalidIssuer
        | ErrorKind::InvalidAudience => TokenError::PayloadInvalid,
        _ => TokenError::Malformed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-for-testing-only-32chars";
    const OTHER_SECRET: &str = "another-secret-key-for-testing-32chars!";

    /// `{"alg":"RS256","typ":"JWT"}`
    const RS256_HEADER: &str = "eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCJ9";

    fn service(secret: &str) -> TokenService {
        TokenService::new(&JwtConfig::new(secret, 72).unwrap())
    }

    fn sign(claims: &impl Serialize, algorithm: Algorithm) -> String {
        encode(
            &Header::new(algorithm),
            claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_issue_then_verify_returns_account() {
        let tokens = service(SECRET);
        let id = Uuid::new_v4();
        let token = tokens.issue(id).unwrap();
        assert_eq!(tokens.verify(&token), Ok(id));
    }

    #[test]
    fn test_expiry_boundary_is_exclusive() {
        let tokens = service(SECRET);
        let id = Uuid::new_v4();
        let issued = Utc::now();
        let token = tokens.issue_at(id, issued).unwrap();
        let exp = issued + Duration::hours(72);

        assert_eq!(tokens.verify_at(&token, exp - Duration::seconds(1)), Ok(id));
        assert_eq!(tokens.verify_at(&token, exp), Ok(id));
        assert_eq!(
            tokens.verify_at(&token, exp + Duration::seconds(1)),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_wrong_secret_is_invalid_signature() {
        let token = service(OTHER_SECRET).issue(Uuid::new_v4()).unwrap();
        assert_eq!(service(SECRET).verify(&token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_tampered_signature_is_rejected() {
        let tokens = service(SECRET);
        let token = tokens.issue(Uuid::new_v4()).unwrap();
        let (message, signature) = token.rsplit_once('.').unwrap();
        let replacement = if signature.starts_with('A') { "B" } else { "A" };
        let tampered = format!("{}.{}{}", message, replacement, &signature[1..]);

        assert_eq!(tokens.verify(&tampered), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_other_hmac_variants_are_accepted() {
        let tokens = service(SECRET);
        let id = Uuid::new_v4();
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: id.to_string(),
            iat: now,
            exp: now + 60,
        };

        assert_eq!(tokens.verify(&sign(&claims, Algorithm::HS512)), Ok(id));
    }

    #[test]
    fn test_non_hmac_algorithm_is_rejected() {
        let tokens = service(SECRET);
        let token = tokens.issue(Uuid::new_v4()).unwrap();
        let (_, rest) = token.split_once('.').unwrap();
        let forged = format!("{}.{}", RS256_HEADER, rest);

        assert_eq!(tokens.verify(&forged), Err(TokenError::UnexpectedAlgorithm));
    }

    #[test]
    fn test_garbage_is_malformed() {
        let tokens = service(SECRET);
        assert_eq!(tokens.verify("not-a-token"), Err(TokenError::Malformed));
        assert_eq!(tokens.verify(""), Err(TokenError::Malformed));
    }

    #[test]
    fn test_non_uuid_subject_is_payload_invalid() {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "alice".to_string(),
            iat: now,
            exp: now + 60,
        };
        assert_eq!(
            service(SECRET).verify(&sign(&claims, Algorithm::HS256)),
            Err(TokenError::PayloadInvalid)
        );
    }

    #[test]
    fn test_missing_subject_is_payload_invalid() {
        #[derive(Serialize)]
        struct NoSubject {
            exp: i64,
        }

        let token = sign(
            &NoSubject {
                exp: Utc::now().timestamp() + 60,
            },
            Algorithm::HS256,
        );
        assert_eq!(service(SECRET).verify(&token), Err(TokenError::PayloadInvalid));
    }

    #[test]
    fn test_response_describes_lifetime() {
        let tokens = service(SECRET);
        let response = tokens.response("abc".to_string());
        assert_eq!(response.token_type, "Bearer");
        assert_eq!(response.expires_in, 72 * 3600);
    }

    #[test]
    fn test_out_of_range_lifetime_fails_without_panicking() {
        let tokens = TokenService {
            lifetime_hours: i64::MAX / 2,
            ..service(SECRET)
        };

        assert!(matches!(
            tokens.issue(Uuid::new_v4()),
            Err(DomainError::Internal(_))
        ));
        assert_eq!(tokens.expires_in(), i64::MAX);
    }

    #[test]
    fn test_longest_configured_lifetime_issues() {
        let config = JwtConfig::new(SECRET, domain::MAX_JWT_EXPIRATION_HOURS).unwrap();
        let tokens = TokenService::new(&config);
        let id = Uuid::new_v4();
        let token = tokens.issue(id).unwrap();

        assert_eq!(tokens.verify(&token), Ok(id));
        assert_eq!(
            tokens.expires_in(),
            domain::MAX_JWT_EXPIRATION_HOURS * SECONDS_PER_HOUR
        );
    }
}
