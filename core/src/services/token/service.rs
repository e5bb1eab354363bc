//! Main token service implementation

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;

use crate::domain::entities::token::{Claims, TokenPair, TokenPayload, TokenType};
use crate::errors::{DomainError, TokenError};

use super::config::TokenServiceConfig;

const REQUIRED_CLAIMS: [&str; 6] = ["exp", "nbf", "iat", "sub", "iss", "aud"];

/// Signing and verification keys for one token type
struct KeyPair {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl KeyPair {
    fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

/// Service for issuing, verifying and rotating JWT session tokens
///
/// Holds only immutable configuration and pre-built keys, so it is
/// `Send + Sync` and shared behind an `Arc`. No operation touches storage.
pub struct TokenService {
    config: TokenServiceConfig,
    access_keys: KeyPair,
    refresh_keys: KeyPair,
    validation: Validation,
    /// Signature-less decoding for `remaining_seconds`
    unverified: Validation,
}

impl TokenService {
    /// Creates a new token service instance
    ///
    /// # Returns
    ///
    /// `DomainError::Configuration` when a secret is empty or both secrets
    /// are the same.
    pub fn new(config: TokenServiceConfig) -> Result<Self, DomainError> {
        if config.access_secret.is_empty() || config.refresh_secret.is_empty() {
            return Err(DomainError::Configuration {
                message: "access and refresh token secrets must be set".to_string(),
            });
        }
        if config.access_secret == config.refresh_secret {
            return Err(DomainError::Configuration {
                message: "access and refresh token secrets must differ".to_string(),
            });
        }

        let mut validation = Validation::new(config.algorithm);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_audience(&[config.audience.as_str()]);
        validation.set_required_spec_claims(&REQUIRED_CLAIMS);

        let mut unverified = Validation::new(config.algorithm);
        unverified.insecure_disable_signature_validation();
        unverified.validate_exp = false;
        unverified.validate_aud = false;
        unverified.required_spec_claims.clear();

        Ok(Self {
            access_keys: KeyPair::from_secret(&config.access_secret),
            refresh_keys: KeyPair::from_secret(&config.refresh_secret),
            config,
            validation,
            unverified,
        })
    }

    /// Default access token lifetime
    pub fn access_ttl(&self) -> Duration {
        self.config.access_token_ttl
    }

    /// Default refresh token lifetime
    pub fn refresh_ttl(&self) -> Duration {
        self.config.refresh_token_ttl
    }

    /// Issues a signed access token
    ///
    /// A negative `ttl_override` produces a token that is already expired.
    pub fn issue_access_token(
        &self,
        payload: &TokenPayload,
        ttl_override: Option<Duration>,
    ) -> Result<String, TokenError> {
        let claims = self.build_claims(payload, TokenType::Access, ttl_override)?;
        self.encode_claims(&claims)
    }

    /// Issues a signed refresh token
    pub fn issue_refresh_token(
        &self,
        payload: &TokenPayload,
        ttl_override: Option<Duration>,
    ) -> Result<String, TokenError> {
        let claims = self.build_claims(payload, TokenType::Refresh, ttl_override)?;
        self.encode_claims(&claims)
    }

    /// Issues an access token and a refresh token for the same identity
    pub fn issue_token_pair(&self, payload: &TokenPayload) -> Result<TokenPair, TokenError> {
        let access_claims = self.build_claims(payload, TokenType::Access, None)?;
        let access_token = self.encode_claims(&access_claims)?;
        let refresh_token = self.issue_refresh_token(payload, None)?;

        let expires_in = (access_claims.exp - Utc::now().timestamp()).max(0);

        Ok(TokenPair {
            access_token,
            refresh_token,
            expires_in,
        })
    }

    /// Verifies an access token and returns its claims
    pub fn verify_access_token(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify(token, TokenType::Access)
    }

    /// Verifies a refresh token and returns its claims
    pub fn verify_refresh_token(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify(token, TokenType::Refresh)
    }

    /// Exchanges a valid refresh token for a fresh pair
    ///
    /// Subject, role and username are copied from the presented token. The
    /// old refresh token stays valid until its own expiry.
    pub fn rotate_token_pair(&self, refresh_token: &str) -> Result<TokenPair, TokenError> {
        let claims = self.verify_refresh_token(refresh_token)?;
        let payload = claims.payload()?;
        self.issue_token_pair(&payload)
    }

    /// Seconds until `token` expires, read without verifying the signature
    ///
    /// Returns `None` for expired or unparsable input. Only for display and
    /// cookie metadata, never for authorization.
    pub fn remaining_seconds(&self, token: &str) -> Option<i64> {
        let data =
            decode::<Claims>(token.trim(), &DecodingKey::from_secret(&[]), &self.unverified).ok()?;
        let remaining = data.claims.exp - Utc::now().timestamp();
        (remaining > 0).then_some(remaining)
    }

    fn keys(&self, token_type: TokenType) -> &KeyPair {
        match token_type {
            TokenType::Access => &self.access_keys,
            TokenType::Refresh => &self.refresh_keys,
        }
    }

    fn build_claims(
        &self,
        payload: &TokenPayload,
        token_type: TokenType,
        ttl_override: Option<Duration>,
    ) -> Result<Claims, TokenError> {
        if payload.subject == 0 {
            debug!(%token_type, "refusing to issue token without subject");
            return Err(TokenError::PayloadInvalid);
        }

        let ttl = ttl_override.unwrap_or(match token_type {
            TokenType::Access => self.config.access_token_ttl,
            TokenType::Refresh => self.config.refresh_token_ttl,
        });

        Claims::new(
            payload,
            token_type,
            ttl,
            &self.config.issuer,
            &self.config.audience,
        )
        .map_err(|e| {
            debug!(%token_type, ttl_seconds = ttl.num_seconds(), "token expiry out of range");
            e
        })
    }

    /// Signs `claims` with the key matching their type tag
    pub(crate) fn encode_claims(&self, claims: &Claims) -> Result<String, TokenError> {
        self.encode_with(claims, claims.token_type)
    }

    /// Signs `claims` with the key of `key_type`, whatever their tag says
    pub(crate) fn encode_with(
        &self,
        claims: &Claims,
        key_type: TokenType,
    ) -> Result<String, TokenError> {
        encode(
            &Header::new(self.config.algorithm),
            claims,
            &self.keys(key_type).encoding,
        )
        .map_err(|e| {
            debug!(error = %e, "failed to sign token");
            TokenError::TokenGenerationFailed
        })
    }

    fn verify(&self, token: &str, expected: TokenType) -> Result<Claims, TokenError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(TokenError::TokenMissing);
        }

        let keys = self.keys(expected);
        let claims = match decode::<Claims>(token, &keys.decoding, &self.validation) {
            Ok(data) => data.claims,
            Err(e) if matches!(e.kind(), ErrorKind::ExpiredSignature) => {
                // Signature already checked; decode again to read the expiry
                let mut validation = self.validation.clone();
                validation.validate_exp = false;
                let claims = decode::<Claims>(token, &keys.decoding, &validation)
                    .map_err(|e| self.map_decode_error(e, expected))?
                    .claims;
                self.check_claims(&claims, expected)?;

                debug!(token_type = %expected, exp = claims.exp, "token expired");
                return Err(TokenError::TokenExpired {
                    expired_at: claims.expires_at(),
                });
            }
            Err(e) => return Err(self.map_decode_error(e, expected)),
        };

        self.check_claims(&claims, expected)?;

        // The decoder accepts `exp == now`; a token is dead from its exp second on
        if claims.is_expired() {
            debug!(token_type = %expected, exp = claims.exp, "token expired");
            return Err(TokenError::TokenExpired {
                expired_at: claims.expires_at(),
            });
        }

        Ok(claims)
    }

    fn check_claims(&self, claims: &Claims, expected: TokenType) -> Result<(), TokenError> {
        if claims.token_type != expected {
            debug!(expected = %expected, actual = %claims.token_type, "token type mismatch");
            return Err(TokenError::TokenInvalid);
        }
        claims.user_id()?;
        Ok(())
    }

    fn map_decode_error(&self, error: jsonwebtoken::errors::Error, expected: TokenType) -> TokenError {
        debug!(token_type = %expected, error = %error, "token verification failed");
        match error.kind() {
            ErrorKind::ImmatureSignature => TokenError::TokenNotYetValid,
            _ => TokenError::TokenInvalid,
        }
    }
}
