use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use models::user_profile::{EMAIL_MAX, UID_MAX};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::ServiceError;

/// Claims carried by identity-provider tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default)]
    pub email: String,
    pub exp: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

/// Authenticated caller as seen by the services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub uid: String,
    pub email: String,
}

impl Identity {
    pub fn new(uid: impl Into<String>, email: impl Into<String>) -> Self {
        Self { uid: uid.into(), email: email.into() }
    }
}

/// HS256 verifier for identity-provider tokens.
#[derive(Clone)]
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &str, issuer: Option<&str>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_aud = false;
        if let Some(iss) = issuer {
            validation.set_issuer(&[iss]);
        }
        Self { key: DecodingKey::from_secret(secret.as_bytes()), validation }
    }

    /// Decode and check a token.
    ///
    /// # Examples
    /// ```
    /// use jsonwebtoken::{encode, EncodingKey, Header};
    /// use service::auth::{Claims, TokenVerifier};
    /// let exp = (chrono::Utc::now() + chrono::Duration::minutes(5)).timestamp() as usize;
    /// let claims = Claims { sub: "uid-1".into(), email: "hire@test.com".into(), exp, iss: None };
    /// let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(b"s3cret")).unwrap();
    /// let identity = TokenVerifier::new("s3cret", None).verify(&token).unwrap();
    /// assert_eq!(identity.uid, "uid-1");
    /// ```
    pub fn verify(&self, token: &str) -> Result<Identity, ServiceError> {
        let data = decode::<Claims>(token, &self.key, &self.validation).map_err(|e| {
            debug!(error = %e, "token rejected");
            match e.kind() {
                ErrorKind::ExpiredSignature => ServiceError::Unauthorized("token expired".into()),
                ErrorKind::InvalidIssuer => ServiceError::Unauthorized("unexpected issuer".into()),
                _ => ServiceError::Unauthorized("invalid token".into()),
            }
        })?;
        let claims = data.claims;
        if claims.sub.trim().is_empty() {
            return Err(ServiceError::Unauthorized("token has no subject".into()));
        }
        if claims.sub.chars().count() > UID_MAX {
            return Err(ServiceError::Unauthorized(format!("token subject longer than {UID_MAX} characters")));
        }
        if claims.email.chars().count() > EMAIL_MAX {
            return Err(ServiceError::Unauthorized(format!("token email longer than {EMAIL_MAX} characters")));
        }
        Ok(Identity { uid: claims.sub, email: claims.email })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn mint(secret: &str, sub: &str, offset_secs: i64, iss: Option<&str>) -> String {
        mint_with_email(secret, sub, "work@test.com", offset_secs, iss)
    }

    fn mint_with_email(secret: &str, sub: &str, email: &str, offset_secs: i64, iss: Option<&str>) -> String {
        let exp = (chrono::Utc::now().timestamp() + offset_secs) as usize;
        let claims = Claims { sub: sub.into(), email: email.into(), exp, iss: iss.map(str::to_string) };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    #[test]
    fn accepts_valid_token() {
        let v = TokenVerifier::new("secret", None);
        let id = v.verify(&mint("secret", "provider-1", 600, None)).unwrap();
        assert_eq!(id, Identity::new("provider-1", "work@test.com"));
    }

    #[test]
    fn rejects_expired_token() {
        let v = TokenVerifier::new("secret", None);
        let err = v.verify(&mint("secret", "u", -3600, None)).unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(msg) if msg.contains("expired")));
    }

    #[test]
    fn rejects_wrong_signature_and_garbage() {
        let v = TokenVerifier::new("secret", None);
        assert!(matches!(v.verify(&mint("other", "u", 600, None)), Err(ServiceError::Unauthorized(_))));
        assert!(matches!(v.verify("not-a-jwt"), Err(ServiceError::Unauthorized(_))));
    }

    #[test]
    fn enforces_issuer_when_configured() {
        let v = TokenVerifier::new("secret", Some("https://id.example"));
        assert!(v.verify(&mint("secret", "u", 600, Some("https://id.example"))).is_ok());
        assert!(v.verify(&mint("secret", "u", 600, Some("https://evil.example"))).is_err());
        assert!(v.verify(&mint("secret", "u", 600, None)).is_err());
    }

    #[test]
    fn rejects_blank_subject() {
        let v = TokenVerifier::new("secret", None);
        assert!(v.verify(&mint("secret", "  ", 600, None)).is_err());
    }

    #[test]
    fn rejects_claims_wider_than_profile_columns() {
        let v = TokenVerifier::new("secret", None);
        assert!(v.verify(&mint("secret", &"u".repeat(UID_MAX), 600, None)).is_ok());
        let err = v.verify(&mint("secret", &"u".repeat(UID_MAX + 1), 600, None)).unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(msg) if msg.contains("subject")));
        let email = format!("{}@test.com", "e".repeat(EMAIL_MAX));
        let err = v.verify(&mint_with_email("secret", "u", &email, 600, None)).unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(msg) if msg.contains("email")));
    }
}
