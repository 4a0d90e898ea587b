//! JWT signing and verification.
//!
//! keymint signs tokens with RS256. Verification pins the RSA family: a
//! token whose header claims a symmetric or `none` algorithm is rejected
//! before any signature check, which closes the classic
//! algorithm-substitution forgery.
//!
//! Because refresh tokens carry `exp == 0` ("no embedded expiry"), the
//! library's expiry validation is disabled and expiry is checked manually
//! for nonzero `exp`.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::rngs::OsRng;
use rsa::RsaPrivateKey;
use rsa::pkcs8::{EncodePrivateKey, EncodePublicKey, LineEnding};
use time::OffsetDateTime;

use crate::token::claims::TokenClaims;

/// Errors that can occur during JWT operations.
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to encode a token.
    #[error("Failed to encode token: {message}")]
    EncodingError {
        /// Description of the encoding error.
        message: String,
    },

    /// The token is malformed or uses an unsupported algorithm.
    #[error("Failed to decode token: {message}")]
    DecodingError {
        /// Description of the decoding error.
        message: String,
    },

    /// The token has expired.
    #[error("Token expired")]
    Expired,

    /// The token signature is invalid.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Invalid key format or data.
    #[error("Invalid key: {message}")]
    InvalidKey {
        /// Description of why the key is invalid.
        message: String,
    },

    /// Failed to generate a cryptographic key.
    #[error("Key generation error: {message}")]
    KeyGenerationError {
        /// Description of the key generation error.
        message: String,
    },
}

impl JwtError {
    /// Creates a new `EncodingError`.
    #[must_use]
    pub fn encoding_error(message: impl Into<String>) -> Self {
        Self::EncodingError {
            message: message.into(),
        }
    }

    /// Creates a new `DecodingError`.
    #[must_use]
    pub fn decoding_error(message: impl Into<String>) -> Self {
        Self::DecodingError {
            message: message.into(),
        }
    }

    /// Creates a new `InvalidKey` error.
    #[must_use]
    pub fn invalid_key(message: impl Into<String>) -> Self {
        Self::InvalidKey {
            message: message.into(),
        }
    }

    /// Creates a new `KeyGenerationError`.
    #[must_use]
    pub fn key_generation_error(message: impl Into<String>) -> Self {
        Self::KeyGenerationError {
            message: message.into(),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for JwtError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::InvalidSignature => Self::InvalidSignature,
            ErrorKind::InvalidRsaKey(_) | ErrorKind::InvalidKeyFormat => {
                Self::invalid_key(err.to_string())
            }
            _ => Self::decoding_error(err.to_string()),
        }
    }
}

/// An RSA key pair used to sign and verify tokens.
///
/// Loaded once at startup and shared read-only for the process lifetime;
/// there is no rotation mechanism.
pub struct SigningKeyPair {
    /// Key ID, set in the token header.
    pub kid: String,

    /// Encoding key (private key) for signing.
    encoding_key: EncodingKey,

    /// Decoding key (public key) for verification.
    decoding_key: DecodingKey,
}

impl SigningKeyPair {
    /// Loads a key pair from PEM strings.
    ///
    /// # Errors
    /// Returns an error if either PEM is unparsable.
    pub fn from_pem(private_pem: &str, public_pem: &str) -> Result<Self, JwtError> {
        let encoding_key = EncodingKey::from_rsa_pem(private_pem.as_bytes())
            .map_err(|e| JwtError::invalid_key(e.to_string()))?;
        let decoding_key = DecodingKey::from_rsa_pem(public_pem.as_bytes())
            .map_err(|e| JwtError::invalid_key(e.to_string()))?;

        Ok(Self {
            kid: uuid::Uuid::new_v4().to_string(),
            encoding_key,
            decoding_key,
        })
    }

    /// Generates a fresh 2048-bit RSA key pair as PKCS#8 PEM strings.
    ///
    /// Returns `(private_pem, public_pem)`. Used by tests and by the server's
    /// key bootstrap path; `jsonwebtoken` itself cannot generate keys.
    ///
    /// # Errors
    /// Returns an error if key generation or PEM encoding fails.
    pub fn generate_pem() -> Result<(String, String), JwtError> {
        let private_key = RsaPrivateKey::new(&mut OsRng, 2048)
            .map_err(|e| JwtError::key_generation_error(e.to_string()))?;

        let private_pem = private_key
            .to_pkcs8_pem(LineEnding::LF)
            .map_err(|e| JwtError::key_generation_error(e.to_string()))?
            .to_string();

        let public_pem = private_key
            .to_public_key()
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| JwtError::key_generation_error(e.to_string()))?;

        Ok((private_pem, public_pem))
    }

    /// Generates a throwaway key pair, ready to sign with.
    ///
    /// # Errors
    /// Returns an error if key generation fails.
    pub fn generate() -> Result<Self, JwtError> {
        let (private_pem, public_pem) = Self::generate_pem()?;
        Self::from_pem(&private_pem, &public_pem)
    }
}

/// Service for issuing and verifying signed tokens.
///
/// Pure function of (keys, input, clock): no side effects, safe to share
/// across tasks behind an `Arc`.
pub struct JwtService {
    signing_key: SigningKeyPair,
}

impl JwtService {
    /// Creates a new JWT service over the given key pair.
    #[must_use]
    pub fn new(signing_key: SigningKeyPair) -> Self {
        Self { signing_key }
    }

    /// Signs a claim set into a token string.
    ///
    /// # Errors
    /// Returns an error if serialization or signing fails.
    pub fn issue(&self, claims: &TokenClaims) -> Result<String, JwtError> {
        let mut header = Header::new(Algorithm::RS256);
        header.kid = Some(self.signing_key.kid.clone());

        encode(&header, claims, &self.signing_key.encoding_key)
            .map_err(|e| JwtError::encoding_error(e.to_string()))
    }

    /// Verifies a token string and returns its claims.
    ///
    /// Checks, in order: the header algorithm is RS256 (anything else,
    /// including `HS*` and `none`, fails decoding), the signature verifies
    /// against the public key, the claim set deserializes, and the embedded
    /// expiry (if nonzero) has not passed.
    ///
    /// # Errors
    /// Fails with `DecodingError` for malformed or wrong-algorithm tokens,
    /// `InvalidSignature` for signature mismatches, and `Expired` for
    /// past-expiry tokens.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, JwtError> {
        let mut validation = Validation::new(Algorithm::RS256);
        // exp == 0 is a legal "no expiry" sentinel; checked manually below.
        validation.validate_exp = false;
        validation.validate_aud = false;

        let data = decode::<TokenClaims>(token, &self.signing_key.decoding_key, &validation)
            .map_err(JwtError::from)?;

        if data.claims.is_expired(OffsetDateTime::now_utc()) {
            return Err(JwtError::Expired);
        }

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::claims::TokenKind;
    use std::time::Duration;

    fn service() -> JwtService {
        JwtService::new(SigningKeyPair::generate().unwrap())
    }

    #[test]
    fn test_issue_verify_round_trip() {
        let service = service();
        let claims = TokenClaims::new(42, TokenKind::Access, Duration::from_secs(300));

        let token = service.issue(&claims).unwrap();
        assert!(!token.is_empty());

        let verified = service.verify(&token).unwrap();
        assert_eq!(verified.sub, 42);
        assert_eq!(verified.kind, TokenKind::Access);
    }

    #[test]
    fn test_refresh_token_with_zero_exp_verifies() {
        let service = service();
        let claims = TokenClaims::new(7, TokenKind::Refresh, Duration::ZERO);

        let token = service.issue(&claims).unwrap();
        let verified = service.verify(&token).unwrap();
        assert_eq!(verified.exp, 0);
        assert_eq!(verified.kind, TokenKind::Refresh);
    }

    #[test]
    fn test_expired_access_token_rejected() {
        let service = service();
        let mut claims = TokenClaims::new(1, TokenKind::Access, Duration::from_secs(60));
        claims.exp = claims.iat - 3600;

        let token = service.issue(&claims).unwrap();
        let result = service.verify(&token);
        assert!(matches!(result.unwrap_err(), JwtError::Expired));
    }

    #[test]
    fn test_wrong_key_rejected() {
        let signer = service();
        let verifier = service();

        let claims = TokenClaims::new(1, TokenKind::Access, Duration::from_secs(60));
        let token = signer.issue(&claims).unwrap();

        let result = verifier.verify(&token);
        assert!(matches!(result.unwrap_err(), JwtError::InvalidSignature));
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let service = service();
        let claims = TokenClaims::new(1, TokenKind::Access, Duration::from_secs(60));
        let token = service.issue(&claims).unwrap();

        // Flip a byte in the payload segment.
        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        assert_eq!(parts.len(), 3);
        let mut payload = parts[1].clone().into_bytes();
        payload[0] = if payload[0] == b'A' { b'B' } else { b'A' };
        parts[1] = String::from_utf8(payload).unwrap();
        let tampered = parts.join(".");

        assert!(service.verify(&tampered).is_err());
    }

    #[test]
    fn test_tampered_signature_rejected() {
        let service = service();
        let claims = TokenClaims::new(1, TokenKind::Access, Duration::from_secs(60));
        let token = service.issue(&claims).unwrap();

        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        let mut sig = parts[2].clone().into_bytes();
        let last = sig.len() - 1;
        sig[last] = if sig[last] == b'A' { b'B' } else { b'A' };
        parts[2] = String::from_utf8(sig).unwrap();
        let tampered = parts.join(".");

        assert!(service.verify(&tampered).is_err());
    }

    #[test]
    fn test_symmetric_algorithm_substitution_rejected() {
        // Sign the same claim shape with HS256; a verifier pinned to RS256
        // must reject it without consulting the signature.
        let service = service();
        let claims = TokenClaims::new(1, TokenKind::Access, Duration::from_secs(60));

        let forged = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"attacker-controlled"),
        )
        .unwrap();

        let result = service.verify(&forged);
        assert!(matches!(result.unwrap_err(), JwtError::DecodingError { .. }));
    }

    #[test]
    fn test_none_algorithm_rejected() {
        // Hand-rolled unsigned token: header {"alg":"none"}, empty signature.
        use base64::Engine;
        use base64::engine::general_purpose::URL_SAFE_NO_PAD;

        let service = service();
        let claims = TokenClaims::new(1, TokenKind::Access, Duration::from_secs(60));
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims).unwrap());
        let forged = format!("{header}.{payload}.");

        assert!(service.verify(&forged).is_err());
    }

    #[test]
    fn test_garbage_token_rejected() {
        let service = service();
        assert!(service.verify("").is_err());
        assert!(service.verify("not-a-jwt").is_err());
        assert!(service.verify("a.b.c").is_err());
    }
}
