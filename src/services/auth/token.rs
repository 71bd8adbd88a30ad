use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;

// Errors returned by access-token verification + claim checks.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("jwt verification failed: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("missing or empty subject claim")]
    MissingSubject,
}

// A user id claim as issued: string, or a bare JSON number from older issuers.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum SubjectClaim {
    Text(String),
    Number(serde_json::Number),
}

impl SubjectClaim {
    fn into_text(self) -> String {
        match self {
            SubjectClaim::Text(text) => text,
            SubjectClaim::Number(number) => number.to_string(),
        }
    }
}

// Payload as decoded; `exp` is required (jsonwebtoken rejects tokens without it).
#[derive(Debug, Clone, Deserialize)]
struct RawClaims {
    #[serde(default)]
    sub: Option<SubjectClaim>,
    #[serde(default)]
    id: Option<SubjectClaim>,
    exp: u64,
}

/// Verified access token claims.
///
/// NOTE:
/// - `sub` is the user id. Older issuers put it in `id` instead; when both are
///   present `sub` wins.
/// - Numeric ids are accepted and carried as their decimal text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    pub sub: String,
    pub exp: u64,
}

impl Claims {
    pub fn expires_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        i64::try_from(self.exp)
            .ok()
            .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0))
    }
}

/// HS256 access-token verifier over a shared secret.
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("TokenVerifier")
            .field("validation", &self.validation)
            .finish()
    }
}

impl TokenVerifier {
    pub fn new(secret: &str, leeway_seconds: u64) -> Self {
        let decoding_key = DecodingKey::from_secret(secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = leeway_seconds;
        validation.validate_aud = false;

        Self {
            decoding_key,
            validation,
        }
    }

    /// Verify signature + expiry, then check the subject is usable.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let data = jsonwebtoken::decode::<RawClaims>(token, &self.decoding_key, &self.validation)?;
        let RawClaims { sub, id, exp } = data.claims;

        let sub = sub
            .or(id)
            .map(SubjectClaim::into_text)
            .filter(|sub| !sub.trim().is_empty())
            .ok_or(TokenError::MissingSubject)?;

        Ok(Claims { sub, exp })
    }
}
