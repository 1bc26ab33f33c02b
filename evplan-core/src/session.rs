//! Session holder: who is logged in.
//!
//! The identity is an email string. It is absent before login and cleared on
//! logout; every change is reported as an [`IdentityChange`] so the caller can
//! feed it to [`crate::view_model::EventViewModel::on_identity_changed`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::backend::Backend;
use crate::error::{EvPlanError, EvPlanResult};
use crate::protocol::Credentials;

const SESSION_FILE: &str = "session.toml";

const SIGNUP_OK: &str = "Signup successful! Please login.";
const LOGIN_OK: &str = "Login successful!";
const AUTH_FAILED: &str = "Authentication failed";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityChange {
    Unchanged,
    SignedIn(String),
    SignedOut,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    identity: Option<String>,
}

impl Session {
    pub fn new(identity: Option<String>) -> Self {
        Session { identity }
    }

    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.identity.is_some()
    }

    /// Require a logged-in identity.
    pub fn require(&self) -> EvPlanResult<&str> {
        self.identity().ok_or(EvPlanError::NotLoggedIn)
    }

    pub fn set_identity(&mut self, email: &str) -> IdentityChange {
        if self.identity() == Some(email) {
            return IdentityChange::Unchanged;
        }
        self.identity = Some(email.to_string());
        IdentityChange::SignedIn(email.to_string())
    }

    pub fn logout(&mut self) -> IdentityChange {
        match self.identity.take() {
            Some(_) => IdentityChange::SignedOut,
            None => IdentityChange::Unchanged,
        }
    }

    /// Create an account. Does not log in.
    pub async fn signup<B: Backend + ?Sized>(
        backend: &B,
        credentials: &Credentials,
    ) -> EvPlanResult<String> {
        let ack = backend
            .signup(credentials)
            .await
            .map_err(|e| e.or_fallback(AUTH_FAILED))?;
        Ok(ack.message_or(SIGNUP_OK))
    }

    /// Log in; on success the credentials' email becomes the identity.
    pub async fn login<B: Backend + ?Sized>(
        &mut self,
        backend: &B,
        credentials: &Credentials,
    ) -> EvPlanResult<(String, IdentityChange)> {
        let ack = backend
            .login(credentials)
            .await
            .map_err(|e| e.or_fallback(AUTH_FAILED))?;

        let change = self.set_identity(&credentials.email);
        tracing::info!(identity = %credentials.email, "logged in");
        Ok((ack.message_or(LOGIN_OK), change))
    }
}

/// Persists the session between CLI invocations.
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SessionStore { path: path.into() }
    }

    /// Store under the platform data directory.
    pub fn default_location() -> EvPlanResult<Self> {
        let dir = dirs::data_dir()
            .ok_or_else(|| EvPlanError::Config("Could not determine data directory".into()))?
            .join("evplan");
        Ok(Self::new(dir.join(SESSION_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file is an anonymous session.
    pub fn load(&self) -> EvPlanResult<Session> {
        if !self.path.exists() {
            return Ok(Session::default());
        }
        let content = std::fs::read_to_string(&self.path)?;
        toml::from_str(&content).map_err(|e| EvPlanError::Serialization(e.to_string()))
    }

    pub fn save(&self, session: &Session) -> EvPlanResult<()> {
        if !session.is_logged_in() {
            return self.clear();
        }

        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }

        let content =
            toml::to_string(session).map_err(|e| EvPlanError::Serialization(e.to_string()))?;
        let temp = self.path.with_extension("toml.tmp");

        std::fs::write(&temp, content)?;
        std::fs::rename(&temp, &self.path)?;
        Ok(())
    }

    pub fn clear(&self) -> EvPlanResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
