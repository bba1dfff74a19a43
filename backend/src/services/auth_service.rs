use tracing::{info, warn};

use crate::config::AdminConfig;
use crate::services::session_store::{SessionClaims, SessionManager};

/// Where a request to the admin panel stands.
#[derive(Debug, Clone, PartialEq)]
pub enum GateDecision {
    /// Capability key missing or wrong.
    Blocked,
    /// Key accepted but no admin session yet.
    ShowLogin,
    Granted(SessionClaims),
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoginRejection {
    BadKey,
    BadCredentials,
    Session(String),
}

/// Two-step admin gate: capability key first, then username/password.
#[derive(Clone)]
pub struct AccessGate {
    admin: AdminConfig,
    sessions: SessionManager,
}

impl AccessGate {
    pub fn new(admin: AdminConfig, sessions: SessionManager) -> Self {
        Self { admin, sessions }
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    pub fn key_matches(&self, supplied: Option<&str>) -> bool {
        supplied.is_some_and(|key| constant_time_eq(key.as_bytes(), self.admin.access_key.as_bytes()))
    }

    pub fn evaluate(&self, key: Option<&str>, session_token: Option<&str>) -> GateDecision {
        if !self.key_matches(key) {
            return GateDecision::Blocked;
        }
        match session_token.and_then(|token| self.sessions.verify(token)) {
            Some(claims) => GateDecision::Granted(claims),
            None => GateDecision::ShowLogin,
        }
    }

    /// Checks key and credentials; on success returns a fresh session token.
    pub fn login(
        &self,
        key: Option<&str>,
        username: &str,
        password: &str,
    ) -> Result<String, LoginRejection> {
        if !self.key_matches(key) {
            return Err(LoginRejection::BadKey);
        }
        // Both comparisons always run.
        let user_ok = constant_time_eq(username.as_bytes(), self.admin.username.as_bytes());
        let pass_ok = constant_time_eq(password.as_bytes(), self.admin.password.as_bytes());
        if !(user_ok & pass_ok) {
            warn!("Admin login failed");
            return Err(LoginRejection::BadCredentials);
        }
        let token = self
            .sessions
            .issue(&self.admin.username)
            .map_err(|e| LoginRejection::Session(e.to_string()))?;
        info!("Admin {} logged in", self.admin.username);
        Ok(token)
    }

    /// Session check for mutating admin operations.
    pub fn authorize(&self, session_token: Option<&str>) -> Option<SessionClaims> {
        session_token.and_then(|token| self.sessions.verify(token))
    }

    pub fn logout(&self, session_token: Option<&str>) {
        if let Some(token) = session_token {
            self.sessions.revoke(token);
        }
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn gate() -> AccessGate {
        AccessGate::new(
            AdminConfig {
                username: "admin".into(),
                password: "s3cret".into(),
                access_key: "K-2026".into(),
            },
            SessionManager::new("gate-test-secret-value", Duration::hours(1)),
        )
    }

    #[test]
    fn test_wrong_key_is_blocked_even_with_valid_session() {
        let gate = gate();
        let token = gate.login(Some("K-2026"), "admin", "s3cret").unwrap();
        assert_eq!(gate.evaluate(Some("K-2025"), Some(&token)), GateDecision::Blocked);
        assert_eq!(gate.evaluate(None, Some(&token)), GateDecision::Blocked);
    }

    #[test]
    fn test_right_key_without_session_shows_login() {
        let gate = gate();
        assert_eq!(gate.evaluate(Some("K-2026"), None), GateDecision::ShowLogin);
        assert_eq!(gate.evaluate(Some("K-2026"), Some("garbage")), GateDecision::ShowLogin);
    }

    #[test]
    fn test_right_key_and_session_grants_panel() {
        let gate = gate();
        let token = gate.login(Some("K-2026"), "admin", "s3cret").unwrap();
        assert!(matches!(
            gate.evaluate(Some("K-2026"), Some(&token)),
            GateDecision::Granted(claims) if claims.sub == "admin"
        ));
    }

    #[test]
    fn test_login_requires_key_before_credentials() {
        let gate = gate();
        assert_eq!(
            gate.login(Some("nope"), "admin", "s3cret"),
            Err(LoginRejection::BadKey)
        );
        assert_eq!(gate.login(None, "admin", "s3cret"), Err(LoginRejection::BadKey));
    }

    #[test]
    fn test_login_rejects_either_wrong_field_identically() {
        let gate = gate();
        assert_eq!(
            gate.login(Some("K-2026"), "admin", "wrong"),
            Err(LoginRejection::BadCredentials)
        );
        assert_eq!(
            gate.login(Some("K-2026"), "root", "s3cret"),
            Err(LoginRejection::BadCredentials)
        );
        assert_eq!(
            gate.login(Some("K-2026"), "Admin", "s3cret"),
            Err(LoginRejection::BadCredentials)
        );
    }

    #[test]
    fn test_logout_revokes_session() {
        let gate = gate();
        let token = gate.login(Some("K-2026"), "admin", "s3cret").unwrap();
        assert!(gate.authorize(Some(&token)).is_some());
        gate.logout(Some(&token));
        assert!(gate.authorize(Some(&token)).is_none());
        assert_eq!(gate.evaluate(Some("K-2026"), Some(&token)), GateDecision::ShowLogin);
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"abcd"));
        assert!(constant_time_eq(b"", b""));
    }
}
