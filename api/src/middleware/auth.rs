//! JWT authentication middleware for protecting API endpoints.
//!
//! The middleware extracts the access token from the Authorization header,
//! verifies it with the shared `TokenService` from app data, and injects an
//! `AuthContext` into the request. Failures short-circuit with the mapped
//! error response.

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    web, Error, FromRequest, HttpMessage, HttpRequest, ResponseError,
};
use bl_core::{
    domain::entities::token::{Claims, Role},
    errors::{AuthError, DomainError, TokenError, ValidationError},
    services::token::TokenService,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
};

use crate::handlers::error::ApiError;

/// Authenticated identity injected into requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    /// User ID from the `sub` claim
    pub user_id: u64,
    /// Authorization tier from the token
    pub role: Role,
    /// Username, when the token carries one
    pub username: Option<String>,
}

impl AuthContext {
    /// Creates a new authentication context from verified claims
    pub fn from_claims(claims: Claims) -> Result<Self, TokenError> {
        Ok(Self {
            user_id: claims.user_id()?,
            role: claims.role,
            username: claims.username,
        })
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Fails with `InsufficientPermissions` unless the caller holds `required`
pub fn require_role(auth: &AuthContext, required: Role) -> Result<(), DomainError> {
    if auth.role >= required {
        Ok(())
    } else {
        Err(AuthError::InsufficientPermissions.into())
    }
}

/// Lets a user act on their own account, and admins on any account
pub fn require_self_or_admin(auth: &AuthContext, target_id: u64) -> Result<(), DomainError> {
    if target_id == 0 {
        return Err(ValidationError::field("userId", "must be a positive integer").into());
    }
    if auth.user_id == target_id || auth.is_admin() {
        Ok(())
    } else {
        Err(AuthError::InsufficientPermissions.into())
    }
}

/// JWT authentication middleware factory
#[derive(Debug, Clone, Copy, Default)]
pub struct JwtAuth;

impl JwtAuth {
    /// Creates a new JWT authentication middleware
    pub fn new() -> Self {
        Self
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
        }))
    }
}

/// JWT authentication middleware service
pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    actix_web::dev::forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let auth_context = match authenticate(&req) {
                Ok(context) => context,
                Err(error) => {
                    let response = ApiError(error).error_response();
                    return Ok(req.into_response(response).map_into_right_body());
                }
            };

            req.extensions_mut().insert(auth_context);

            service
                .call(req)
                .await
                .map(ServiceResponse::map_into_left_body)
        })
    }
}

fn authenticate(req: &ServiceRequest) -> Result<AuthContext, DomainError> {
    let token = extract_bearer_token(req)?;

    let token_service = req
        .app_data::<web::Data<TokenService>>()
        .ok_or_else(|| DomainError::Configuration {
            message: "TokenService is not registered as app data".to_string(),
        })?;

    let claims = token_service.verify_access_token(&token)?;
    Ok(AuthContext::from_claims(claims)?)
}

/// Extracts the Bearer token from the Authorization header
///
/// A missing header is `TokenMissing`; any other scheme or an unreadable
/// header is `TokenInvalid`.
pub fn extract_bearer_token(req: &ServiceRequest) -> Result<String, TokenError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or(TokenError::TokenMissing)?;
    let value = header.to_str().map_err(|_| TokenError::TokenInvalid)?;

    match value.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("Bearer") => {
            let token = token.trim();
            if token.is_empty() {
                Err(TokenError::TokenMissing)
            } else {
                Ok(token.to_string())
            }
        }
        _ => Err(TokenError::TokenInvalid),
    }
}

/// Extractor for required authentication
impl FromRequest for AuthContext {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| AuthError::AuthenticationRequired.into());

        ready(result)
    }
}
