//! Unit tests for token service

use std::sync::Arc;
use std::thread;

use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;

use crate::domain::entities::token::{Claims, Role, TokenPayload, TokenType};
use crate::errors::{DomainError, TokenError};
use crate::services::token::{TokenService, TokenServiceConfig};

const ACCESS_SECRET: &str = "test-access-secret";
const REFRESH_SECRET: &str = "test-refresh-secret";

fn create_test_service() -> TokenService {
    TokenService::new(TokenServiceConfig::new(ACCESS_SECRET, REFRESH_SECRET)).unwrap()
}

fn payload() -> TokenPayload {
    TokenPayload::new(42, Role::Admin).with_username("alice")
}

fn claims_for(token_type: TokenType, ttl: Duration) -> Claims {
    Claims::new(&payload(), token_type, ttl, "blog-server", "blog-client").unwrap()
}

#[test]
fn test_new_rejects_empty_secrets() {
    let result = TokenService::new(TokenServiceConfig::new("", REFRESH_SECRET));
    assert!(matches!(result, Err(DomainError::Configuration { .. })));

    let result = TokenService::new(TokenServiceConfig::new(ACCESS_SECRET, ""));
    assert!(matches!(result, Err(DomainError::Configuration { .. })));
}

#[test]
fn test_new_rejects_shared_secret() {
    let result = TokenService::new(TokenServiceConfig::new("same", "same"));
    assert!(matches!(result, Err(DomainError::Configuration { .. })));
}

#[test]
fn test_access_token_round_trip() {
    let service = create_test_service();
    let token = service.issue_access_token(&payload(), None).unwrap();

    let claims = service.verify_access_token(&token).unwrap();
    assert_eq!(claims.user_id(), Ok(42));
    assert_eq!(claims.role, Role::Admin);
    assert_eq!(claims.username.as_deref(), Some("alice"));
    assert_eq!(claims.token_type, TokenType::Access);
    assert_eq!(claims.iss, "blog-server");
    assert_eq!(claims.aud, "blog-client");
    assert_eq!(claims.exp - claims.iat, 3600);
}

#[test]
fn test_refresh_token_round_trip() {
    let service = create_test_service();
    let token = service.issue_refresh_token(&payload(), None).unwrap();

    let claims = service.verify_refresh_token(&token).unwrap();
    assert_eq!(claims.payload().unwrap(), payload());
    assert_eq!(claims.token_type, TokenType::Refresh);
    assert_eq!(claims.exp - claims.iat, 7 * 86400);
}

#[test]
fn test_ttl_override() {
    let service = create_test_service();
    let token = service
        .issue_access_token(&payload(), Some(Duration::minutes(5)))
        .unwrap();

    let claims = service.verify_access_token(&token).unwrap();
    assert_eq!(claims.exp - claims.iat, 300);
}

#[test]
fn test_access_token_rejected_on_refresh_path() {
    let service = create_test_service();
    let pair = service.issue_token_pair(&payload()).unwrap();

    assert_eq!(
        service.verify_refresh_token(&pair.access_token),
        Err(TokenError::TokenInvalid)
    );
    assert_eq!(
        service.verify_access_token(&pair.refresh_token),
        Err(TokenError::TokenInvalid)
    );
}

#[test]
fn test_type_tag_checked_after_signature() {
    let service = create_test_service();

    // Access-tagged claims signed with the refresh secret
    let claims = claims_for(TokenType::Access, Duration::hours(1));
    let token = service.encode_with(&claims, TokenType::Refresh).unwrap();
    assert_eq!(service.verify_refresh_token(&token), Err(TokenError::TokenInvalid));

    let claims = claims_for(TokenType::Refresh, Duration::hours(1));
    let token = service.encode_with(&claims, TokenType::Access).unwrap();
    assert_eq!(service.verify_access_token(&token), Err(TokenError::TokenInvalid));
}

#[test]
fn test_negative_ttl_is_expired() {
    let service = create_test_service();
    let token = service
        .issue_access_token(&payload(), Some(Duration::seconds(-1)))
        .unwrap();

    match service.verify_access_token(&token) {
        Err(TokenError::TokenExpired { expired_at }) => {
            let now = Utc::now();
            assert!(expired_at < now);
            assert!(expired_at > now - Duration::seconds(5));
        }
        other => panic!("expected TokenExpired, got {:?}", other),
    }
}

#[test]
fn test_zero_ttl_is_expired() {
    let service = create_test_service();
    let token = service
        .issue_access_token(&payload(), Some(Duration::zero()))
        .unwrap();

    assert!(matches!(
        service.verify_access_token(&token),
        Err(TokenError::TokenExpired { .. })
    ));

    let refresh = service
        .issue_refresh_token(&payload(), Some(Duration::zero()))
        .unwrap();
    assert!(matches!(
        service.rotate_token_pair(&refresh),
        Err(TokenError::TokenExpired { .. })
    ));
}

#[test]
fn test_token_expiring_this_second_is_expired() {
    let service = create_test_service();
    let mut claims = claims_for(TokenType::Access, Duration::hours(1));
    claims.exp = Utc::now().timestamp();
    claims.nbf = claims.exp - 60;
    let token = service.encode_claims(&claims).unwrap();

    assert_eq!(
        service.verify_access_token(&token),
        Err(TokenError::TokenExpired {
            expired_at: claims.expires_at()
        })
    );
}

#[test]
fn test_overflowing_ttl_override_is_an_error() {
    let service = create_test_service();

    assert_eq!(
        service.issue_access_token(&payload(), Some(Duration::days(1_000_000_000))),
        Err(TokenError::TokenGenerationFailed)
    );
    assert_eq!(
        service.issue_refresh_token(&payload(), Some(Duration::days(-1_000_000_000))),
        Err(TokenError::TokenGenerationFailed)
    );
}

#[test]
fn test_overflowing_default_ttl_is_an_error() {
    let service = TokenService::new(
        TokenServiceConfig::new(ACCESS_SECRET, REFRESH_SECRET)
            .with_ttls(Duration::seconds(10_000_000_000_000), Duration::days(7)),
    )
    .unwrap();

    assert_eq!(
        service.issue_token_pair(&payload()),
        Err(TokenError::TokenGenerationFailed)
    );
}

#[test]
fn test_expired_error_carries_encoded_expiry() {
    let service = create_test_service();
    let claims = claims_for(TokenType::Refresh, Duration::seconds(-60));
    let token = service.encode_claims(&claims).unwrap();

    assert_eq!(
        service.verify_refresh_token(&token),
        Err(TokenError::TokenExpired {
            expired_at: claims.expires_at()
        })
    );
}

#[test]
fn test_expired_token_with_wrong_type_is_invalid() {
    let service = create_test_service();
    let claims = claims_for(TokenType::Access, Duration::seconds(-60));
    let token = service.encode_with(&claims, TokenType::Refresh).unwrap();

    assert_eq!(service.verify_refresh_token(&token), Err(TokenError::TokenInvalid));
}

#[test]
fn test_future_nbf_is_not_yet_valid() {
    let service = create_test_service();
    let mut claims = claims_for(TokenType::Access, Duration::hours(2));
    claims.nbf = Utc::now().timestamp() + 3600;
    let token = service.encode_claims(&claims).unwrap();

    assert_eq!(
        service.verify_access_token(&token),
        Err(TokenError::TokenNotYetValid)
    );
}

#[test]
fn test_pair_expires_in_bounded_by_access_ttl() {
    let service = create_test_service();
    let pair = service.issue_token_pair(&payload()).unwrap();

    assert!(pair.expires_in > 0);
    assert!(pair.expires_in <= service.access_ttl().num_seconds());
    assert!(service.verify_access_token(&pair.access_token).is_ok());
    assert!(service.verify_refresh_token(&pair.refresh_token).is_ok());
}

#[test]
fn test_repeated_rotation() {
    let service = create_test_service();
    let mut pair = service.issue_token_pair(&payload()).unwrap();

    for _ in 0..5 {
        let next = service.rotate_token_pair(&pair.refresh_token).unwrap();
        assert_ne!(next.refresh_token, pair.refresh_token);

        let claims = service.verify_access_token(&next.access_token).unwrap();
        assert_eq!(claims.payload().unwrap(), payload());
        pair = next;
    }
}

#[test]
fn test_rotation_with_access_token_fails() {
    let service = create_test_service();
    let pair = service.issue_token_pair(&payload()).unwrap();

    assert_eq!(
        service.rotate_token_pair(&pair.access_token),
        Err(TokenError::TokenInvalid)
    );
}

#[test]
fn test_rotation_propagates_expiry() {
    let service = create_test_service();
    let token = service
        .issue_refresh_token(&payload(), Some(Duration::seconds(-5)))
        .unwrap();

    assert!(matches!(
        service.rotate_token_pair(&token),
        Err(TokenError::TokenExpired { .. })
    ));
}

#[test]
fn test_tampered_signature_is_invalid() {
    let service = create_test_service();
    let token = service.issue_access_token(&payload(), None).unwrap();
    let signature_start = token.rfind('.').unwrap() + 1;

    for index in signature_start..token.len() {
        let mut bytes = token.clone().into_bytes();
        bytes[index] = if bytes[index] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(bytes).unwrap();

        assert_eq!(
            service.verify_access_token(&tampered),
            Err(TokenError::TokenInvalid),
            "flipping signature char {} was accepted",
            index
        );
    }
}

#[test]
fn test_wrong_secret_is_invalid() {
    let service = create_test_service();
    let other = TokenService::new(TokenServiceConfig::new("other-access", "other-refresh")).unwrap();
    let token = other.issue_access_token(&payload(), None).unwrap();

    assert_eq!(service.verify_access_token(&token), Err(TokenError::TokenInvalid));
}

#[test]
fn test_wrong_issuer_is_invalid() {
    let service = create_test_service();
    let other = TokenService::new(
        TokenServiceConfig::new(ACCESS_SECRET, REFRESH_SECRET).with_claims("someone-else", "blog-client"),
    )
    .unwrap();
    let token = other.issue_access_token(&payload(), None).unwrap();

    assert_eq!(service.verify_access_token(&token), Err(TokenError::TokenInvalid));
}

#[test]
fn test_wrong_audience_is_invalid() {
    let service = create_test_service();
    let other = TokenService::new(
        TokenServiceConfig::new(ACCESS_SECRET, REFRESH_SECRET).with_claims("blog-server", "mobile-app"),
    )
    .unwrap();
    let token = other.issue_refresh_token(&payload(), None).unwrap();

    assert_eq!(service.verify_refresh_token(&token), Err(TokenError::TokenInvalid));
}

#[test]
fn test_unknown_role_is_invalid() {
    let service = create_test_service();
    let now = Utc::now().timestamp();
    let raw = json!({
        "sub": "42",
        "role": 7,
        "type": "access",
        "iat": now,
        "nbf": now,
        "exp": now + 600,
        "iss": "blog-server",
        "aud": "blog-client",
        "jti": "x",
    });
    let token = encode(
        &Header::default(),
        &raw,
        &EncodingKey::from_secret(ACCESS_SECRET.as_bytes()),
    )
    .unwrap();

    assert_eq!(service.verify_access_token(&token), Err(TokenError::TokenInvalid));
}

#[test]
fn test_malformed_input() {
    let service = create_test_service();

    assert_eq!(service.verify_access_token("not-a-jwt"), Err(TokenError::TokenInvalid));
    assert_eq!(service.verify_access_token("a.b.c"), Err(TokenError::TokenInvalid));
}

#[test]
fn test_empty_input_is_missing() {
    let service = create_test_service();

    assert_eq!(service.verify_access_token(""), Err(TokenError::TokenMissing));
    assert_eq!(service.verify_refresh_token("   "), Err(TokenError::TokenMissing));
}

#[test]
fn test_zero_subject_is_payload_invalid() {
    let service = create_test_service();
    let payload = TokenPayload::new(0, Role::User);

    assert_eq!(
        service.issue_access_token(&payload, None),
        Err(TokenError::PayloadInvalid)
    );
    assert_eq!(
        service.issue_refresh_token(&payload, None),
        Err(TokenError::PayloadInvalid)
    );
    assert_eq!(service.issue_token_pair(&payload), Err(TokenError::PayloadInvalid));
}

#[test]
fn test_remaining_seconds() {
    let service = create_test_service();
    let token = service
        .issue_access_token(&payload(), Some(Duration::minutes(10)))
        .unwrap();

    let remaining = service.remaining_seconds(&token).unwrap();
    assert!(remaining > 590 && remaining <= 600);

    let expired = service
        .issue_access_token(&payload(), Some(Duration::seconds(-30)))
        .unwrap();
    assert_eq!(service.remaining_seconds(&expired), None);
    assert_eq!(service.remaining_seconds("garbage"), None);
}

#[test]
fn test_remaining_seconds_ignores_signature_and_audience() {
    let service = create_test_service();
    let other = TokenService::new(
        TokenServiceConfig::new("other-access", "other-refresh")
            .with_claims("elsewhere", "someone-else"),
    )
    .unwrap();

    let foreign = other
        .issue_refresh_token(&payload(), Some(Duration::minutes(5)))
        .unwrap();
    for _ in 0..3 {
        let remaining = service.remaining_seconds(&foreign).unwrap();
        assert!(remaining > 290 && remaining <= 300);
    }

    let now = service
        .issue_access_token(&payload(), Some(Duration::zero()))
        .unwrap();
    assert_eq!(service.remaining_seconds(&now), None);
}

#[test]
fn test_service_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<TokenService>();
}

#[test]
fn test_concurrent_use_from_threads() {
    let service = Arc::new(create_test_service());

    let handles: Vec<_> = (1..=8u64)
        .map(|id| {
            let service = Arc::clone(&service);
            thread::spawn(move || {
                for _ in 0..20 {
                    let payload = TokenPayload::new(id, Role::User);
                    let pair = service.issue_token_pair(&payload).unwrap();
                    let claims = service.verify_access_token(&pair.access_token).unwrap();
                    assert_eq!(claims.user_id(), Ok(id));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}
