//! Maps domain errors onto HTTP responses
//!
//! Every failure leaves the API as an `ErrorResponse` body with a stable
//! error code. Server-side failures are logged in full and answered with a
//! generic message.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use bl_core::errors::{AuthError, DomainError, TokenError, ValidationError};
use bl_shared::{error_codes, ErrorResponse};
use tracing::{debug, error};

/// Domain error carried through actix's error machinery
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub DomainError);

impl From<TokenError> for ApiError {
    fn from(error: TokenError) -> Self {
        ApiError(error.into())
    }
}

impl From<AuthError> for ApiError {
    fn from(error: AuthError) -> Self {
        ApiError(error.into())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        status_and_body(&self.0).0
    }

    fn error_response(&self) -> HttpResponse {
        let (status, body) = status_and_body(&self.0);
        HttpResponse::build(status).json(body)
    }
}

/// Handle domain errors and convert them to appropriate HTTP responses
pub fn handle_domain_error(error: DomainError) -> HttpResponse {
    let (status, body) = status_and_body(&error);
    HttpResponse::build(status).json(body)
}

/// Builds the 400 response for failed request validation
pub fn handle_validation_errors(errors: validator::ValidationErrors) -> HttpResponse {
    debug!(?errors, "request validation failed");

    let mut response = ErrorResponse::new(error_codes::VALIDATION_ERROR, "Invalid request data");
    for (field, field_errors) in errors.field_errors() {
        let messages: Vec<String> = field_errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })
            .collect();
        response = response.add_detail(field, messages);
    }

    HttpResponse::BadRequest().json(response)
}

fn status_and_body(error: &DomainError) -> (StatusCode, ErrorResponse) {
    let (status, body) = match error {
        DomainError::Token(token_error) => token_status(token_error),
        DomainError::Auth(auth_error) => auth_status(auth_error),
        DomainError::Validation(ValidationError::InvalidField { field, message }) => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new(error_codes::VALIDATION_ERROR, "Invalid request data")
                .add_detail(field.clone(), vec![message.clone()]),
        ),
        DomainError::Validation(other) => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new(error_codes::VALIDATION_ERROR, other.to_string()),
        ),
        DomainError::Configuration { .. }
        | DomainError::Database { .. }
        | DomainError::Internal { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::new(error_codes::INTERNAL_ERROR, "An internal error occurred"),
        ),
    };

    if status.is_server_error() {
        error!(error = %error, "request failed");
    } else {
        debug!(error = %error, status = status.as_u16(), "request rejected");
    }

    (status, body)
}

fn token_status(error: &TokenError) -> (StatusCode, ErrorResponse) {
    match error {
        TokenError::PayloadInvalid => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new(error_codes::PAYLOAD_INVALID, "Token payload is invalid"),
        ),
        TokenError::TokenMissing => (
            StatusCode::UNAUTHORIZED,
            ErrorResponse::new(error_codes::TOKEN_MISSING, "Authentication token is missing"),
        ),
        TokenError::TokenInvalid => (
            StatusCode::UNAUTHORIZED,
            ErrorResponse::new(error_codes::TOKEN_INVALID, "Authentication token is invalid"),
        ),
        TokenError::TokenExpired { expired_at } => (
            StatusCode::UNAUTHORIZED,
            ErrorResponse::new(error_codes::TOKEN_EXPIRED, "Authentication token has expired")
                .add_detail("expiredAt", expired_at.to_rfc3339()),
        ),
        TokenError::TokenNotYetValid => (
            StatusCode::UNAUTHORIZED,
            ErrorResponse::new(
                error_codes::TOKEN_NOT_YET_VALID,
                "Authentication token is not yet valid",
            ),
        ),
        TokenError::TokenGenerationFailed => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::new(error_codes::INTERNAL_ERROR, "An internal error occurred"),
        ),
    }
}

fn auth_status(error: &AuthError) -> (StatusCode, ErrorResponse) {
    match error {
        AuthError::InvalidCredentials => (
            StatusCode::UNAUTHORIZED,
            ErrorResponse::new(error_codes::INVALID_CREDENTIALS, "Invalid username or password"),
        ),
        AuthError::UserAlreadyExists => (
            StatusCode::CONFLICT,
            ErrorResponse::new(error_codes::USER_ALREADY_EXISTS, "Username is already taken"),
        ),
        AuthError::UserNotFound => (
            StatusCode::NOT_FOUND,
            ErrorResponse::new(error_codes::USER_NOT_FOUND, "User not found"),
        ),
        AuthError::AuthenticationRequired => (
            StatusCode::UNAUTHORIZED,
            ErrorResponse::new(error_codes::AUTHENTICATION_REQUIRED, "Authentication required"),
        ),
        AuthError::InsufficientPermissions => (
            StatusCode::FORBIDDEN,
            ErrorResponse::new(
                error_codes::INSUFFICIENT_PERMISSIONS,
                "You do not have permission to access this resource",
            ),
        ),
    }
}
