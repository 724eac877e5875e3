use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use bson::oid::ObjectId;
use std::sync::OnceLock;

use regex::Regex;

use crate::middleware::auth::Claims;

const TOKEN_LIFETIME_HOURS: i64 = 24;
const MIN_PASSWORD_LENGTH: usize = 8;

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
    })
}

pub fn is_valid_email(email: &str) -> bool {
    email_pattern().is_match(email.trim())
}

pub fn is_valid_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LENGTH
}

pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

pub fn generate_token(
    email: &str,
    user_id: ObjectId,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();

    let claims = Claims {
        sub: email.to_string(),
        iat: now.timestamp() as usize,
        exp: (now + Duration::hours(TOKEN_LIFETIME_HOURS)).timestamp() as usize,
        user_id: user_id.to_hex(),
    };

    let header = Header::new(Algorithm::HS256);
    encode(&header, &claims, &EncodingKey::from_secret(secret.as_bytes()))
}

pub fn decode_token(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.set_required_spec_claims(&["exp", "iat", "sub", "user_id"]);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("ann@example.com"));
        assert!(is_valid_email(" ann.b+trips@mail.co.uk "));
        assert!(!is_valid_email("ann@example"));
        assert!(!is_valid_email("ann example.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_token_round_trip() {
        let user_id = ObjectId::new();
        let token = generate_token("ann@example.com", user_id, "secret").unwrap();
        let claims = decode_token(&token, "secret").unwrap();
        assert_eq!(claims.sub, "ann@example.com");
        assert_eq!(claims.user_id, user_id.to_hex());
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_token_rejected_with_other_secret() {
        let token = generate_token("ann@example.com", ObjectId::new(), "secret").unwrap();
        assert!(decode_token(&token, "another").is_err());
    }

    #[test]
    fn test_password_hash_verifies() {
        let hash = hash_password("correct horse").unwrap();
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("wrong horse", &hash));
        assert!(!is_valid_password("short"));
    }
}
