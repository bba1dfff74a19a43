use std::sync::Arc;

use chrono::{Duration, Utc};
use dashmap::DashMap;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "admin_session";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionClaims {
    pub sub: String,
    pub sid: String,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies signed admin session tokens.
///
/// Tokens are stateless; logout records the session id here until the token
/// would have expired anyway.
#[derive(Clone)]
pub struct SessionManager {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
    revoked: Arc<DashMap<String, i64>>,
}

impl SessionManager {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
            revoked: Arc::new(DashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, username: &str) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: username.to_string(),
            sid: Uuid::new_v4().simple().to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
    }

    /// Claims of a valid, unexpired, unrevoked token.
    pub fn verify(&self, token: &str) -> Option<SessionClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        match decode::<SessionClaims>(token, &self.decoding, &validation) {
            Ok(data) if self.revoked.contains_key(&data.claims.sid) => {
                debug!("Rejected revoked session {}", data.claims.sid);
                None
            }
            Ok(data) => Some(data.claims),
            Err(e) => {
                debug!("Rejected session token: {}", e);
                None
            }
        }
    }

    /// Revokes the session carried by `token`. Unknown or invalid tokens are ignored.
    pub fn revoke(&self, token: &str) {
        if let Some(claims) = self.verify(token) {
            self.revoked.insert(claims.sid, claims.exp);
        }
        self.cleanup_expired();
    }

    /// Drops revocation entries whose tokens have expired on their own.
    pub fn cleanup_expired(&self) {
        let now = Utc::now().timestamp();
        let before = self.revoked.len();
        self.revoked.retain(|_, exp| *exp > now);
        let removed = before.saturating_sub(self.revoked.len());
        if removed > 0 {
            info!("Purged {} expired session revocations", removed);
        }
    }

    pub fn revoked_count(&self) -> usize {
        self.revoked.len()
    }
}

/// Value of the named cookie in a `Cookie` request header.
pub fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

pub fn session_cookie(token: &str, max_age: Duration, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Strict; Max-Age={}",
        SESSION_COOKIE,
        token,
        max_age.num_seconds()
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

pub fn cleared_session_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Strict; Max-Age=0", SESSION_COOKIE)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-at-least-16";

    #[test]
    fn test_issue_then_verify() {
        let sessions = SessionManager::new(SECRET, Duration::hours(1));
        let token = sessions.issue("admin").unwrap();
        let claims = sessions.verify(&token).unwrap();
        assert_eq!(claims.sub, "admin");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_expired_token_rejected() {
        let sessions = SessionManager::new(SECRET, Duration::hours(-1));
        let token = sessions.issue("admin").unwrap();
        assert!(sessions.verify(&token).is_none());
    }

    #[test]
    fn test_token_from_other_secret_rejected() {
        let ours = SessionManager::new(SECRET, Duration::hours(1));
        let theirs = SessionManager::new("another-secret-value", Duration::hours(1));
        let token = theirs.issue("admin").unwrap();
        assert!(ours.verify(&token).is_none());
        assert!(ours.verify("not-a-token").is_none());
    }

    #[test]
    fn test_revoked_token_rejected() {
        let sessions = SessionManager::new(SECRET, Duration::hours(1));
        let token = sessions.issue("admin").unwrap();
        let other = sessions.issue("admin").unwrap();
        sessions.revoke(&token);
        assert!(sessions.verify(&token).is_none());
        assert!(sessions.verify(&other).is_some());
        assert_eq!(sessions.revoked_count(), 1);
    }

    #[test]
    fn test_cookie_parsing() {
        let header = "theme=dark; admin_session=abc.def.ghi; lang=ar";
        assert_eq!(cookie_value(header, SESSION_COOKIE), Some("abc.def.ghi"));
        assert_eq!(cookie_value(header, "missing"), None);
        assert_eq!(cookie_value("", SESSION_COOKIE), None);
    }

    #[test]
    fn test_cookie_attributes() {
        let cookie = session_cookie("tok", Duration::hours(2), true);
        assert!(cookie.starts_with("admin_session=tok;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=7200"));
        assert!(cookie.ends_with("; Secure"));
        assert!(cleared_session_cookie().contains("Max-Age=0"));
    }
}
