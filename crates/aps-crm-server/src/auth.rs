//! JWT Authentication (Bearer Token)
//!
//! HS256 access tokens, Argon2 password hashing and the request guards
//! that protect the API.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use aps_crm::{DomainError, User, UserRole};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::Response,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::ApiError;
use crate::AppState;

/// Access token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User email
    pub sub: String,
    pub uid: String,
    pub role: String,
    pub iat: usize,
    pub exp: usize,
}

/// Authenticated caller, inserted into request extensions by [`require_jwt`]
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub role: UserRole,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_ttl: Duration,
}

impl JwtManager {
    pub fn new(secret: &[u8], access_ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            access_ttl,
        }
    }

    pub fn issue(&self, user: &User) -> Result<String, DomainError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| DomainError::ExternalService("System clock is before UNIX_EPOCH".into()))?;
        let exp = now + self.access_ttl;
        let claims = Claims {
            sub: user.email.clone(),
            uid: user.id.to_string(),
            role: user.role.to_string(),
            iat: now.as_secs() as usize,
            exp: exp.as_secs() as usize,
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| DomainError::ExternalService(format!("Failed to sign token: {e}")))
    }

    pub fn validate(&self, token: &str) -> Result<Claims, ApiError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| match err.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    ApiError::Unauthorized("Token expired".into())
                }
                _ => ApiError::Unauthorized("Invalid token".into()),
            })
    }

    /// Access token lifetime in milliseconds
    pub fn expires_in_ms(&self) -> u64 {
        self.access_ttl.as_millis() as u64
    }
}

pub fn decode_secret_key(raw: &str) -> anyhow::Result<Vec<u8>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        anyhow::bail!("JWT secret cannot be empty");
    }
    // A plain ASCII secret may also be valid base64; keep the raw bytes when decoding shrinks it
    let decoded = match BASE64.decode(trimmed) {
        Ok(bytes) if bytes.len() >= 32 => bytes,
        _ if trimmed.len() >= 32 => trimmed.as_bytes().to_vec(),
        Ok(bytes) => bytes,
        Err(_) => {
            anyhow::bail!("JWT secret must be base64 encoded or a 32-byte ASCII string")
        }
    };

    if decoded.len() < 32 {
        anyhow::bail!("JWT secret must be at least 32 bytes");
    }

    Ok(decoded)
}

pub fn hash_password(password: &str) -> Result<String, DomainError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| DomainError::ExternalService(format!("Failed to hash password: {e}")))
}

/// False for a wrong password and for an unparsable hash
pub fn verify_password(candidate: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(candidate.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// 256-bit random token, hex encoded
pub fn random_token() -> String {
    let bytes: [u8; 32] = rand::thread_rng().gen();
    hex::encode(bytes)
}

/// Six-digit one-time code
pub fn random_otp() -> String {
    format!("{:06}", rand::thread_rng().gen_range(0..1_000_000))
}

pub fn sha256_hex(value: &str) -> String {
    hex::encode(Sha256::digest(value.as_bytes()))
}

fn bearer_token(request: &Request<Body>) -> Option<&str> {
    let header = request.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let mut parts = header.splitn(2, ' ');
    let (Some(scheme), Some(token)) = (parts.next(), parts.next()) else {
        return None;
    };
    if !scheme.eq_ignore_ascii_case("Bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Authentication middleware
/// Validates the Bearer token and loads the account it names
pub async fn require_jwt(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(&request).ok_or_else(|| {
        tracing::warn!("Missing or malformed Authorization header");
        ApiError::Unauthorized("Missing bearer token".into())
    })?;

    let claims = state.jwt.validate(token)?;
    let user = state
        .user_service
        .find_by_email(&claims.sub)
        .await?
        .ok_or_else(|| {
            tracing::warn!("Token for unknown account {}", claims.sub);
            ApiError::Unauthorized("Account no longer exists".into())
        })?;

    request.extensions_mut().insert(AuthUser {
        id: user.id,
        email: user.email,
        role: user.role,
    });
    Ok(next.run(request).await)
}

/// Admin guard; must run after [`require_jwt`]
pub async fn require_admin(request: Request<Body>, next: Next) -> Result<Response, ApiError> {
    match request.extensions().get::<AuthUser>() {
        Some(user) if user.is_admin() => Ok(next.run(request).await),
        Some(user) => {
            tracing::warn!("Admin route refused for {}", user.email);
            Err(ApiError::Forbidden("Administrator role required".into()))
        }
        None => Err(ApiError::Unauthorized("Missing bearer token".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret() -> Vec<u8> {
        b"0123456789abcdef0123456789abcdef".to_vec()
    }

    fn user() -> User {
        User::new(
            "Ana".into(),
            "Pop".into(),
            "ana@aps.ro".into(),
            String::new(),
            None,
        )
    }

    #[test]
    fn test_issue_and_validate() {
        let jwt = JwtManager::new(&secret(), Duration::from_secs(60));
        let u = user();
        let token = jwt.issue(&u).unwrap();
        let claims = jwt.validate(&token).unwrap();
        assert_eq!(claims.sub, "ana@aps.ro");
        assert_eq!(claims.uid, u.id.to_string());
        assert_eq!(claims.role, "USER");
        assert_eq!(jwt.expires_in_ms(), 60_000);
    }

    #[test]
    fn test_token_from_other_secret_is_rejected() {
        let issuer = JwtManager::new(&secret(), Duration::from_secs(60));
        let other = JwtManager::new(b"ffffffffffffffffffffffffffffffff", Duration::from_secs(60));
        let token = issuer.issue(&user()).unwrap();
        assert!(matches!(other.validate(&token), Err(ApiError::Unauthorized(_))));
        assert!(issuer.validate("not-a-jwt").is_err());
    }

    #[test]
    fn test_password_hash_round_trip() {
        let hash = hash_password("parola-sigura").unwrap();
        assert!(verify_password("parola-sigura", &hash));
        assert!(!verify_password("alta-parola", &hash));
        assert!(!verify_password("parola-sigura", "not a hash"));
    }

    #[test]
    fn test_random_values() {
        let otp = random_otp();
        assert_eq!(otp.len(), 6);
        assert!(otp.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(random_token().len(), 64);
        assert_ne!(random_token(), random_token());
        assert_eq!(sha256_hex("abc").len(), 64);
    }

    #[test]
    fn test_decode_secret_key() {
        assert!(decode_secret_key("").is_err());
        assert_eq!(
            decode_secret_key("0123456789abcdef0123456789abcdef").unwrap().len(),
            32
        );
        assert!(decode_secret_key("short").is_err());
    }

    #[test]
    fn test_hashes_fit_user_columns() {
        let schema = include_str!("../migrations/20250101000001_users.sql");
        assert!(schema.contains("password_hash VARCHAR(255)"));
        assert!(schema.contains("otp_hash VARCHAR(255)"));
        assert!(hash_password(&random_otp()).unwrap().len() <= 255);
    }

    #[test]
    fn test_decode_secret_key_prefers_base64_when_long_enough() {
        let raw = [7u8; 48];
        let encoded = BASE64.encode(raw);
        assert_eq!(decode_secret_key(&encoded).unwrap(), raw.to_vec());
        // base64 alphabet only, decodes to 24 bytes, kept as ASCII
        let ascii = "0123456789abcdef0123456789abcdef";
        assert_eq!(decode_secret_key(ascii).unwrap(), ascii.as_bytes().to_vec());
        assert!(decode_secret_key("c2hvcnQ=").is_err());
    }

    #[test]
    fn test_bearer_token_parsing() {
        let request = Request::builder()
            .header(AUTHORIZATION, "bearer  abc.def ")
            .body(Body::empty())
            .unwrap();
        assert_eq!(bearer_token(&request), Some("abc.def"));

        let basic = Request::builder()
            .header(AUTHORIZATION, "Basic abc")
            .body(Body::empty())
            .unwrap();
        assert_eq!(bearer_token(&basic), None);
    }
}
