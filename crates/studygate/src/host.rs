//! Terminal stand-in for the hosting page

use std::sync::Mutex;
use studygate_host_api::{HostError, HostResult, PageHost, PageLocation};
use tracing::info;

/// Tracks navigations in memory and prints notifications
pub struct TerminalHost {
    location: Mutex<PageLocation>,
}

impl TerminalHost {
    pub fn new(location: PageLocation) -> Self {
        Self {
            location: Mutex::new(location),
        }
    }
}

impl PageHost for TerminalHost {
    fn location(&self) -> PageLocation {
        self.location
            .lock()
            .map(|l| l.clone())
            .unwrap_or_else(|e| e.into_inner().clone())
    }

    fn navigate(&self, url: &str) -> HostResult<()> {
        let mut location = self
            .location
            .lock()
            .map_err(|_| HostError::NavigationFailed("page state poisoned".into()))?;
        *location = PageLocation::parse(url);

        info!(url, "Navigating");
        Ok(())
    }

    fn notify(&self, message: &str) {
        println!("! {}", message);
    }
}
