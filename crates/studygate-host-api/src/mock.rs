//! Mock page host for testing

use std::sync::{Arc, Mutex};

use crate::{HostError, HostResult, PageHost, PageLocation};

/// Mock page that records everything the core asks of it
pub struct MockPage {
    location: Mutex<PageLocation>,
    navigations: Mutex<Vec<String>>,
    notifications: Mutex<Vec<String>>,
    initializer_runs: Mutex<usize>,

    /// Whether the page defines an initializer hook
    pub has_initializer: Arc<Mutex<bool>>,

    /// Configure navigation to fail
    pub fail_navigate: Arc<Mutex<bool>>,
}

impl MockPage {
    pub fn new(location: PageLocation) -> Self {
        Self {
            location: Mutex::new(location),
            navigations: Mutex::new(Vec::new()),
            notifications: Mutex::new(Vec::new()),
            initializer_runs: Mutex::new(0),
            has_initializer: Arc::new(Mutex::new(false)),
            fail_navigate: Arc::new(Mutex::new(false)),
        }
    }

    pub fn at(target: &str) -> Self {
        Self::new(PageLocation::parse(target))
    }

    pub fn with_initializer(self) -> Self {
        *self.has_initializer.lock().unwrap() = true;
        self
    }

    /// URLs navigated to, oldest first
    pub fn navigations(&self) -> Vec<String> {
        self.navigations.lock().unwrap().clone()
    }

    /// Messages shown to the user, oldest first
    pub fn notifications(&self) -> Vec<String> {
        self.notifications.lock().unwrap().clone()
    }

    pub fn initializer_runs(&self) -> usize {
        *self.initializer_runs.lock().unwrap()
    }

    /// Move the page somewhere else without going through `navigate`
    pub fn set_location(&self, location: PageLocation) {
        *self.location.lock().unwrap() = location;
    }
}

impl Default for MockPage {
    fn default() -> Self {
        Self::at("/index.html")
    }
}

impl PageHost for MockPage {
    fn location(&self) -> PageLocation {
        self.location.lock().unwrap().clone()
    }

    fn navigate(&self, url: &str) -> HostResult<()> {
        if *self.fail_navigate.lock().unwrap() {
            return Err(HostError::NavigationFailed("Mock navigation failure".into()));
        }
        self.navigations.lock().unwrap().push(url.to_string());
        Ok(())
    }

    fn notify(&self, message: &str) {
        self.notifications.lock().unwrap().push(message.to_string());
    }

    fn run_page_initializer(&self) -> bool {
        if *self.has_initializer.lock().unwrap() {
            *self.initializer_runs.lock().unwrap() += 1;
            true
        } else {
            false
        }
    }
}
