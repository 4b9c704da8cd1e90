//! # Session Authentication
//!
//! Operator login, signed session tokens and password hashing.
//!
//! ## Token Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  login(login, password)                                                 │
//! │       │                                                                 │
//! │       ├── operators.get_credentials(login)   NotFound if unknown        │
//! │       ├── argon2 verify                      Unauthorized if wrong      │
//! │       ▼                                                                 │
//! │  SessionManager::issue(operator)                                       │
//! │       │   HS256 { sub, name, login, iat, exp, v: 1, jti }              │
//! │       ▼                                                                 │
//! │  cookie / bearer header ──► authenticate(token)                        │
//! │                                 ├── verify signature, exp, version     │
//! │                                 └── re-resolve operator by id          │
//! │                                         │                               │
//! │                                         ▼                               │
//! │                              Some(Operator) / None                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The engine only ever receives an [`Operator`] produced here. There is no
//! path from a request body to an acting operator.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use sabor_core::validation::validate_required_text;
use sabor_core::{Operator, ValidationError};
use sabor_db::Database;

/// Claim layout version. Tokens with any other `v` are rejected.
pub const SESSION_TOKEN_VERSION: u32 = 1;

/// Default session lifetime: 8 hours.
pub const DEFAULT_SESSION_LIFETIME_SECS: i64 = 8 * 60 * 60;

// =============================================================================
// Session Tokens
// =============================================================================

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Operator id.
    pub sub: String,
    pub name: String,
    pub login: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
    pub v: u32,
    pub jti: String,
}

/// A freshly issued token and its expiry.
#[derive(Debug, Clone)]
pub struct SessionToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues and verifies HS256 session tokens.
pub struct SessionManager {
    encoding: EncodingKey,
    decoding: DecodingKey,
    lifetime_secs: i64,
}

impl SessionManager {
    /// Creates a manager. An empty secret is refused rather than signing
    /// with a guessable key.
    pub fn new(secret: &str, lifetime_secs: i64) -> EngineResult<Self> {
        if secret.trim().is_empty() {
            return Err(EngineError::invalid_input(
                "Session signing secret must not be empty",
            ));
        }
        if lifetime_secs <= 0 {
            return Err(EngineError::invalid_input(
                "Session lifetime must be positive",
            ));
        }

        Ok(SessionManager {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            lifetime_secs,
        })
    }

    pub fn lifetime_secs(&self) -> i64 {
        self.lifetime_secs
    }

    /// Signs a token for the operator.
    pub fn issue(&self, operator: &Operator) -> EngineResult<SessionToken> {
        self.issue_at(operator, Utc::now())
    }

    fn issue_at(&self, operator: &Operator, now: DateTime<Utc>) -> EngineResult<SessionToken> {
        let expires_at = now + Duration::seconds(self.lifetime_secs);

        let claims = Claims {
            sub: operator.id.to_string(),
            name: operator.name.clone(),
            login: operator.login.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            v: SESSION_TOKEN_VERSION,
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| EngineError::unavailable("session token", e))?;

        Ok(SessionToken { token, expires_at })
    }

    /// Verifies signature, expiry and claim version.
    ///
    /// Returns `None` for anything that is not a valid, current token.
    pub fn verify(&self, token: &str) -> Option<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        match decode::<Claims>(token, &self.decoding, &validation) {
            Ok(data) if data.claims.v == SESSION_TOKEN_VERSION => Some(data.claims),
            Ok(data) => {
                debug!(version = data.claims.v, "Rejected session token version");
                None
            }
            Err(e) => {
                debug!(error = %e, "Rejected session token");
                None
            }
        }
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header value.
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

// =============================================================================
// Passwords
// =============================================================================

/// Hashes a password into an Argon2id PHC string.
pub fn hash_password(password: &str) -> EngineResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| EngineError::unavailable("password hashing", e))
}

/// Checks a password against a stored PHC string. A malformed hash never
/// verifies.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

// Argon2 is deliberately slow; keep it off the async workers.
async fn hash_password_blocking(password: String) -> EngineResult<String> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| EngineError::unavailable("password hashing task", e))?
}

async fn verify_password_blocking(password: String, hash: String) -> EngineResult<bool> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| EngineError::unavailable("password verification task", e))
}

fn require_password(password: &str) -> EngineResult<()> {
    if password.is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        }
        .into());
    }
    Ok(())
}

// =============================================================================
// Auth Service
// =============================================================================

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub operator: Operator,
    pub session: SessionToken,
}

/// Operator authentication against the operators table.
pub struct AuthService {
    db: Database,
    sessions: SessionManager,
}

impl AuthService {
    pub fn new(db: Database, sessions: SessionManager) -> Self {
        AuthService { db, sessions }
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// Checks credentials and issues a session token.
    ///
    /// ## Errors
    /// - `InvalidInput` - blank login or password
    /// - `NotFound` - unknown login
    /// - `Unauthorized` - wrong password
    pub async fn login(&self, login: &str, password: &str) -> EngineResult<LoginOutcome> {
        let login = validate_required_text("login", login)?;
        require_password(password)?;

        let credentials = self
            .db
            .operators()
            .get_credentials(&login)
            .await?
            .ok_or_else(|| {
                warn!(login = %login, "Login for unknown operator");
                EngineError::not_found("Operator", &login)
            })?;

        let valid =
            verify_password_blocking(password.to_string(), credentials.password_hash.clone())
                .await?;
        if !valid {
            warn!(login = %login, "Login with wrong password");
            return Err(EngineError::unauthorized("Invalid credentials"));
        }

        let operator = credentials.operator();
        let session = self.sessions.issue(&operator)?;

        info!(operator_id = operator.id, login = %operator.login, "Operator logged in");
        Ok(LoginOutcome { operator, session })
    }

    /// Resolves the operator behind a token, or `None` when the token is
    /// invalid or the operator no longer exists.
    pub async fn authenticate(&self, token: &str) -> EngineResult<Option<Operator>> {
        let Some(claims) = self.sessions.verify(token) else {
            return Ok(None);
        };

        let Ok(operator_id) = claims.sub.parse::<i64>() else {
            debug!(sub = %claims.sub, "Session token with non-numeric subject");
            return Ok(None);
        };

        Ok(self.db.operators().get_by_id(operator_id).await?)
    }

    /// Creates an operator with a hashed password.
    ///
    /// ## Errors
    /// - `InvalidInput` - blank name, login or password
    /// - `DuplicateKey` - login already taken
    pub async fn register_operator(
        &self,
        name: &str,
        login: &str,
        password: &str,
    ) -> EngineResult<Operator> {
        let name = validate_required_text("name", name)?;
        let login = validate_required_text("login", login)?;
        require_password(password)?;

        let hash = hash_password_blocking(password.to_string()).await?;
        let operator = self.db.operators().insert(&name, &login, &hash).await?;

        info!(operator_id = operator.id, login = %operator.login, "Operator registered");
        Ok(operator)
    }

    /// Creates the operator, or resets name and password of an existing login.
    pub async fn upsert_operator(
        &self,
        name: &str,
        login: &str,
        password: &str,
    ) -> EngineResult<Operator> {
        let name = validate_required_text("name", name)?;
        let login = validate_required_text("login", login)?;
        require_password(password)?;

        let hash = hash_password_blocking(password.to_string()).await?;
        let existing = self.db.operators().get_credentials(&login).await?;

        let operator = match existing {
            Some(_) => {
                self.db
                    .operators()
                    .update_credentials(&login, &name, &hash)
                    .await?
            }
            None => self.db.operators().insert(&name, &login, &hash).await?,
        };

        info!(operator_id = operator.id, login = %operator.login, "Operator provisioned");
        Ok(operator)
    }
}
