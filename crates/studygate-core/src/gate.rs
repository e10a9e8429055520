//! Session gate: login, TTL expiry, logout and page gating

use std::sync::Arc;
use std::time::Duration;
use studygate_api::{GateDecision, SessionMarker, SessionStatus};
use studygate_config::SessionSettings;
use studygate_host_api::PageLocation;
use studygate_store::{KEY_AUTHENTICATED, KEY_LOGIN_TIME, KEY_USERNAME, Store, StoreResult};
use studygate_util::{Clock, Username, format_remaining};
use tracing::{debug, info, warn};

use crate::{CredentialVerifier, login_url};

/// Value of the authenticated flag while logged in
const AUTHENTICATED: &str = "true";

/// Login state held in the store, checked against the clock.
///
/// `check` never mutates; `expire` and `logout` are the only ways the
/// marker is cleared.
pub struct SessionGate {
    store: Arc<dyn Store>,
    clock: Arc<dyn Clock>,
    verifier: Arc<dyn CredentialVerifier>,
    ttl: Duration,
    login_path: String,
}

impl SessionGate {
    pub fn new(
        store: Arc<dyn Store>,
        clock: Arc<dyn Clock>,
        verifier: Arc<dyn CredentialVerifier>,
        settings: &SessionSettings,
    ) -> Self {
        Self {
            store,
            clock,
            verifier,
            ttl: settings.ttl,
            login_path: settings.login_path.clone(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// Verify credentials and, on success, write a fresh marker.
    ///
    /// A rejected attempt leaves the store untouched.
    pub fn login(&self, username: &str, password: &str) -> StoreResult<bool> {
        if !self.verifier.verify(username, password) {
            info!(username, "Login rejected");
            return Ok(false);
        }

        let login_time = self.clock.now_millis();
        self.store.set_item(KEY_AUTHENTICATED, AUTHENTICATED)?;
        self.store.set_item(KEY_LOGIN_TIME, &login_time.to_string())?;
        self.store.set_item(KEY_USERNAME, username)?;

        info!(username, login_time, "Login accepted");
        Ok(true)
    }

    /// Whether the store claims an authenticated session, regardless of age
    pub fn is_marked_authenticated(&self) -> StoreResult<bool> {
        Ok(self.store.get_item(KEY_AUTHENTICATED)?.as_deref() == Some(AUTHENTICATED))
    }

    /// The stored marker, if complete and well formed
    pub fn marker(&self) -> StoreResult<Option<SessionMarker>> {
        if !self.is_marked_authenticated()? {
            return Ok(None);
        }

        let Some(raw_time) = self.store.get_item(KEY_LOGIN_TIME)? else {
            debug!("Authenticated flag without login time");
            return Ok(None);
        };

        let login_time = match raw_time.trim().parse::<i64>() {
            Ok(t) => t,
            Err(_) => {
                warn!(value = %raw_time, "Unparsable login time, treating session as missing");
                return Ok(None);
            }
        };

        let Some(username) = self.store.get_item(KEY_USERNAME)? else {
            debug!("Authenticated flag without username");
            return Ok(None);
        };

        Ok(Some(SessionMarker {
            authenticated: true,
            login_time,
            username: Username::new(username),
        }))
    }

    /// Read-only validity check
    pub fn check(&self) -> StoreResult<SessionStatus> {
        let Some(marker) = self.marker()? else {
            return Ok(SessionStatus::Missing);
        };

        let age = marker.age(self.clock.now_millis());
        if age > self.ttl {
            return Ok(SessionStatus::Expired {
                username: marker.username,
            });
        }

        Ok(SessionStatus::Valid {
            username: marker.username,
            remaining: self.ttl - age,
        })
    }

    /// Clear the marker. Returns the user whose session was dropped, if any.
    pub fn expire(&self) -> StoreResult<Option<Username>> {
        let username = self.store.get_item(KEY_USERNAME)?.map(Username::new);
        self.clear_marker()?;
        info!(username = ?username, "Session expired");
        Ok(username)
    }

    /// Check validity, clearing an expired or malformed marker on the way
    pub fn is_valid(&self) -> StoreResult<bool> {
        match self.check()? {
            SessionStatus::Valid { .. } => Ok(true),
            SessionStatus::Expired { .. } => {
                self.expire()?;
                Ok(false)
            }
            SessionStatus::Missing => {
                if self.is_marked_authenticated()? {
                    // Flag set but the rest of the marker is unusable
                    self.clear_marker()?;
                }
                Ok(false)
            }
        }
    }

    /// Clear the marker on request
    pub fn logout(&self) -> StoreResult<Option<Username>> {
        let username = self.store.get_item(KEY_USERNAME)?.map(Username::new);
        self.clear_marker()?;
        info!(username = ?username, "Logged out");
        Ok(username)
    }

    /// User of a currently valid session
    pub fn current_user(&self) -> StoreResult<Option<Username>> {
        if !self.is_valid()? {
            return Ok(None);
        }
        Ok(self.store.get_item(KEY_USERNAME)?.map(Username::new))
    }

    /// Time left in the current session; zero when not logged in
    pub fn remaining(&self) -> StoreResult<Duration> {
        match self.check()? {
            SessionStatus::Valid { remaining, .. } => Ok(remaining),
            _ => Ok(Duration::ZERO),
        }
    }

    /// Human-readable time left, e.g. `23h 59m remaining`
    pub fn format_remaining(&self) -> StoreResult<String> {
        Ok(format_remaining(self.remaining()?))
    }

    /// Gate a protected page load
    pub fn require_valid(&self, location: &PageLocation) -> StoreResult<GateDecision> {
        if self.is_valid()?
            && let Some(username) = self.store.get_item(KEY_USERNAME)?
        {
            return Ok(GateDecision::Allowed {
                username: Username::new(username),
            });
        }

        let url = login_url(&self.login_path, location);
        debug!(page = %location, url = %url, "Redirecting to login");
        Ok(GateDecision::Redirect { url })
    }

    fn clear_marker(&self) -> StoreResult<()> {
        self.store.remove_item(KEY_AUTHENTICATED)?;
        self.store.remove_item(KEY_LOGIN_TIME)?;
        self.store.remove_item(KEY_USERNAME)?;
        Ok(())
    }
}
