//! Admin authentication: password login, session tokens and the trusted
//! development bypass.

use std::collections::HashMap;
use std::sync::Mutex as StdMutex;

use chrono::Utc;
use shared::jwt::{IssuedSession, JwtError, SessionTokens};
use shared::password::{verify_password, PasswordError};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::AuthConfig;

/// Principal name of the single site administrator.
pub const ADMIN_PRINCIPAL: &str = "admin";

/// Principal injected when `auth.skip_auth` is enabled.
pub const DEVELOPER_PRINCIPAL: &str = "developer";

/// Session id shared by every request in development mode.
pub const DEVELOPER_SESSION_ID: &str = "developer";

/// Errors that can occur during admin authentication.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Session has expired")]
    SessionExpired,

    #[error("Invalid session")]
    InvalidSession,

    #[error("Token error: {0}")]
    Token(#[from] JwtError),

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),
}

/// The authenticated identity attached to admin requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSession {
    pub principal: String,
    pub session_id: String,
    /// Unix timestamp after which the token is no longer accepted
    pub expires_at: i64,
}

/// Verifies admin credentials and session tokens.
pub struct AdminAuth {
    tokens: Option<SessionTokens>,
    password_hash: String,
    skip_auth: bool,
    /// Logged-out session ids with their expiry timestamps
    revoked: StdMutex<HashMap<String, i64>>,
}

impl AdminAuth {
    pub fn from_config(config: &AuthConfig) -> Result<Self, AuthError> {
        let tokens = if config.session_secret.is_empty() && config.skip_auth {
            None
        } else {
            Some(SessionTokens::new(
                &config.session_secret,
                config.session_ttl_secs,
                config.leeway_secs,
            )?)
        };

        if config.skip_auth {
            warn!("Admin authentication is disabled; every admin request runs as the developer");
        }

        Ok(Self {
            tokens,
            password_hash: config.admin_password_hash.clone(),
            skip_auth: config.skip_auth,
            revoked: StdMutex::new(HashMap::new()),
        })
    }

    pub fn skip_auth(&self) -> bool {
        self.skip_auth
    }

    /// Checks the admin password and issues a session token.
    pub fn login(&self, password: &str) -> Result<IssuedSession, AuthError> {
        let tokens = self.tokens.as_ref().ok_or(AuthError::InvalidCredentials)?;
        if self.password_hash.is_empty() || !verify_password(password, &self.password_hash)? {
            warn!("Rejected admin login attempt");
            return Err(AuthError::InvalidCredentials);
        }

        let session = tokens.issue(ADMIN_PRINCIPAL)?;
        info!(session_id = %session.session_id, "Admin logged in");
        Ok(session)
    }

    /// Resolves the session behind a bearer token. In development mode the
    /// developer session is returned regardless of the token.
    pub fn authenticate(&self, token: Option<&str>) -> Result<AdminSession, AuthError> {
        if self.skip_auth {
            return Ok(AdminSession {
                principal: DEVELOPER_PRINCIPAL.to_string(),
                session_id: DEVELOPER_SESSION_ID.to_string(),
                expires_at: i64::MAX,
            });
        }

        let token = token.ok_or(AuthError::InvalidSession)?;
        let tokens = self.tokens.as_ref().ok_or(AuthError::InvalidSession)?;
        let claims = tokens.validate(token).map_err(|e| match e {
            JwtError::TokenExpired => AuthError::SessionExpired,
            _ => AuthError::InvalidSession,
        })?;

        if self.is_revoked(&claims.jti) {
            return Err(AuthError::InvalidSession);
        }

        Ok(AdminSession {
            principal: claims.sub,
            session_id: claims.jti,
            expires_at: claims.exp,
        })
    }

    /// Ends a session. Its token is refused from now on.
    pub fn logout(&self, session: &AdminSession) {
        if self.skip_auth {
            return;
        }
        if let Ok(mut revoked) = self.revoked.lock() {
            let now = Utc::now().timestamp();
            revoked.retain(|_, exp| *exp > now);
            revoked.insert(session.session_id.clone(), session.expires_at);
        }
        info!(session_id = %session.session_id, "Admin logged out");
    }

    fn is_revoked(&self, session_id: &str) -> bool {
        self.revoked
            .lock()
            .map(|revoked| revoked.contains_key(session_id))
            .unwrap_or(false)
    }
}
