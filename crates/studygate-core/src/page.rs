//! Page runtime: the lifetime of one protected page
//!
//! Load runs the gate, then starts tracking and the page's own initializer.
//! While open, activity signals pause and resume the interval, a refresh
//! tick produces display snapshots and an expiry tick logs the user out
//! once the session runs past its TTL. Unload stops the interval.

use std::sync::Arc;
use studygate_api::{GateDecision, PageSignal, SessionStatus, TrackerState, TrackerStatus};
use studygate_host_api::PageHost;
use studygate_util::Result;
use tracing::{debug, info};

use crate::{
    ActivityMonitor, ActivityOutcome, CoreEvent, SessionGate, TimeTracker, login_url,
    redirect_target,
};

/// Shown when the expiry tick finds the session gone
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please log in again.";

pub struct PageSession {
    gate: SessionGate,
    tracker: TimeTracker,
    host: Arc<dyn PageHost>,
    monitor: ActivityMonitor,
}

impl PageSession {
    /// Attach to a page. The activity monitor starts from the persisted
    /// tracker state so a paused interval resumes on the first return signal.
    pub fn new(gate: SessionGate, tracker: TimeTracker, host: Arc<dyn PageHost>) -> Result<Self> {
        let monitor = ActivityMonitor::seeded(tracker.state()?);
        Ok(Self {
            gate,
            tracker,
            host,
            monitor,
        })
    }

    pub fn gate(&self) -> &SessionGate {
        &self.gate
    }

    pub fn tracker(&self) -> &TimeTracker {
        &self.tracker
    }

    /// Login form submit. On success the user is sent to the page named in
    /// the login location's `redirect` parameter, if there is one.
    pub fn login(&mut self, username: &str, password: &str) -> Result<Vec<CoreEvent>> {
        if !self.gate.login(username, password)? {
            return Ok(vec![CoreEvent::LoginRejected {
                username: username.to_string(),
            }]);
        }

        let mut events = vec![CoreEvent::LoggedIn {
            username: username.into(),
        }];
        if let Some(target) = redirect_target(&self.host.location()) {
            self.host.navigate(&target)?;
            events.push(CoreEvent::Redirected { url: target });
        }
        Ok(events)
    }

    /// Gate the page, then start tracking and run the page initializer
    pub fn load(&mut self) -> Result<Vec<CoreEvent>> {
        let location = self.host.location();
        let mut events = Vec::new();

        match self.gate.require_valid(&location)? {
            GateDecision::Redirect { url } => {
                self.host.navigate(&url)?;
                events.push(CoreEvent::Redirected { url });
            }
            GateDecision::Allowed { username } => {
                debug!(page = %location, username = %username, "Page allowed");

                if let Some(active) = self.tracker.start(Some(username))? {
                    events.push(CoreEvent::IntervalStarted {
                        date: active.date,
                        username: active.username,
                    });
                }
                self.monitor = ActivityMonitor::seeded(self.tracker.state()?);

                if self.host.run_page_initializer() {
                    events.push(CoreEvent::PageInitialized);
                }
            }
        }

        Ok(events)
    }

    /// Feed a visibility or focus signal
    pub fn signal(&mut self, signal: PageSignal) -> Result<Option<CoreEvent>> {
        let Some(activity) = self.monitor.observe(signal) else {
            debug!(%signal, "Redundant page signal dropped");
            return Ok(None);
        };

        let event = match self.tracker.apply_activity(activity)? {
            ActivityOutcome::Paused => Some(CoreEvent::IntervalPaused),
            ActivityOutcome::Resumed { paused_for } => {
                Some(CoreEvent::IntervalResumed { paused_for })
            }
            ActivityOutcome::Unchanged => None,
        };
        Ok(event)
    }

    /// Start/stop button
    pub fn toggle(&mut self) -> Result<Option<CoreEvent>> {
        if self.tracker.state()? == TrackerState::Idle {
            let Some(active) = self.tracker.start(self.gate.current_user()?)? else {
                return Ok(None);
            };
            self.monitor = ActivityMonitor::new();
            return Ok(Some(CoreEvent::IntervalStarted {
                date: active.date,
                username: active.username,
            }));
        }
        self.unload()
    }

    /// The page is going away; stop whatever is in progress
    pub fn unload(&mut self) -> Result<Option<CoreEvent>> {
        Ok(self.tracker.stop()?.map(CoreEvent::IntervalStopped))
    }

    /// Display snapshot, produced on every refresh tick
    pub fn refresh(&self) -> Result<TrackerStatus> {
        Ok(self.tracker.status()?)
    }

    /// Periodic check while the page is open. An expired session stops
    /// tracking, tells the user and sends them to the login page.
    pub fn check_expiry(&mut self) -> Result<Vec<CoreEvent>> {
        let SessionStatus::Expired { username } = self.gate.check()? else {
            return Ok(Vec::new());
        };

        let mut events = Vec::new();
        if let Some(stopped) = self.unload()? {
            events.push(stopped);
        }

        self.gate.expire()?;
        events.push(CoreEvent::SessionExpired { username });

        self.host.notify(SESSION_EXPIRED_MESSAGE);
        let url = login_url(self.gate.login_path(), &self.host.location());
        self.host.navigate(&url)?;
        events.push(CoreEvent::Redirected { url });

        info!("Expired session closed");
        Ok(events)
    }

    /// Logout button: stop tracking, drop the session, go to login
    pub fn logout(&mut self) -> Result<Vec<CoreEvent>> {
        let mut events = Vec::new();
        if let Some(stopped) = self.unload()? {
            events.push(stopped);
        }

        let username = self.gate.logout()?;
        events.push(CoreEvent::LoggedOut { username });

        let url = self.gate.login_path().to_string();
        self.host.navigate(&url)?;
        events.push(CoreEvent::Redirected { url });

        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StaticCredentials;
    use studygate_config::{SessionSettings, TrackerSettings};
    use studygate_host_api::MockPage;
    use studygate_store::{KEY_ACTIVE_INTERVAL, MemoryStore, Store};
    use studygate_util::ManualClock;
    use std::time::Duration;

    struct Fixture {
        store: Arc<MemoryStore>,
        clock: Arc<ManualClock>,
        page: Arc<MockPage>,
    }

    impl Fixture {
        fn new(page: MockPage) -> Self {
            Self {
                store: Arc::new(MemoryStore::new()),
                clock: Arc::new(ManualClock::at(2025, 1, 6, 9, 0, 0)),
                page: Arc::new(page),
            }
        }

        fn gate(&self) -> SessionGate {
            SessionGate::new(
                self.store.clone(),
                self.clock.clone(),
                Arc::new(StaticCredentials::new([("ann", "Orbit!1")])),
                &SessionSettings::default(),
            )
        }

        fn session(&self) -> PageSession {
            let tracker = TimeTracker::new(
                self.store.clone(),
                self.clock.clone(),
                TrackerSettings::default(),
            );
            PageSession::new(self.gate(), tracker, self.page.clone()).unwrap()
        }
    }

    #[test]
    fn load_without_session_redirects() {
        let fx = Fixture::new(MockPage::at("/guides/planets.html").with_initializer());
        let mut session = fx.session();

        let events = session.load().unwrap();

        let url = "login.html?redirect=%2Fguides%2Fplanets.html".to_string();
        assert_eq!(events, vec![CoreEvent::Redirected { url: url.clone() }]);
        assert_eq!(fx.page.navigations(), vec![url]);
        assert_eq!(fx.page.initializer_runs(), 0);
        assert_eq!(session.tracker().state().unwrap(), TrackerState::Idle);
    }

    #[test]
    fn login_follows_redirect_parameter() {
        let fx = Fixture::new(MockPage::at("login.html?redirect=%2Fguides%2Fmoon.html"));
        let mut session = fx.session();

        assert_eq!(
            session.login("ann", "nope").unwrap(),
            vec![CoreEvent::LoginRejected {
                username: "ann".into()
            }]
        );
        assert!(fx.page.navigations().is_empty());

        let events = session.login("ann", "Orbit!1").unwrap();
        assert_eq!(
            events,
            vec![
                CoreEvent::LoggedIn {
                    username: "ann".into()
                },
                CoreEvent::Redirected {
                    url: "/guides/moon.html".into()
                },
            ]
        );
        assert_eq!(fx.page.navigations(), vec!["/guides/moon.html".to_string()]);
    }

    #[test]
    fn load_with_session_starts_tracking_and_initializer() {
        let fx = Fixture::new(MockPage::default().with_initializer());
        fx.gate().login("ann", "Orbit!1").unwrap();
        let mut session = fx.session();

        let events = session.load().unwrap();

        assert_eq!(events.len(), 2);
        assert!(matches!(
            &events[0],
            CoreEvent::IntervalStarted { username: Some(u), .. } if u.as_str() == "ann"
        ));
        assert_eq!(events[1], CoreEvent::PageInitialized);
        assert!(fx.page.navigations().is_empty());
        assert_eq!(fx.page.initializer_runs(), 1);
    }

    #[test]
    fn reload_keeps_running_interval() {
        let fx = Fixture::new(MockPage::default());
        fx.gate().login("ann", "Orbit!1").unwrap();

        fx.session().load().unwrap();
        fx.clock.advance_minutes(10);
        let events = fx.session().load().unwrap();

        assert!(events.is_empty());
        assert_eq!(
            fx.session().tracker().elapsed().unwrap(),
            Some(Duration::from_secs(600))
        );
    }

    #[test]
    fn hidden_and_blur_pause_once() {
        let fx = Fixture::new(MockPage::default());
        fx.gate().login("ann", "Orbit!1").unwrap();
        let mut session = fx.session();
        session.load().unwrap();

        fx.clock.advance_minutes(10);
        assert_eq!(
            session.signal(PageSignal::VisibilityHidden).unwrap(),
            Some(CoreEvent::IntervalPaused)
        );
        assert_eq!(session.signal(PageSignal::FocusLost).unwrap(), None);

        fx.clock.advance_minutes(3);
        assert_eq!(
            session.signal(PageSignal::FocusGained).unwrap(),
            Some(CoreEvent::IntervalResumed {
                paused_for: Duration::from_secs(180)
            })
        );
        assert_eq!(session.signal(PageSignal::VisibilityVisible).unwrap(), None);

        fx.clock.advance_minutes(5);
        match session.unload().unwrap() {
            Some(CoreEvent::IntervalStopped(outcome)) => {
                assert_eq!(outcome.duration_minutes, 15);
                assert!(outcome.recorded);
            }
            other => panic!("expected stop, got {other:?}"),
        }
    }

    #[test]
    fn fresh_page_resumes_paused_interval() {
        let fx = Fixture::new(MockPage::default());
        fx.gate().login("ann", "Orbit!1").unwrap();

        let mut first = fx.session();
        first.load().unwrap();
        first.signal(PageSignal::VisibilityHidden).unwrap();

        let mut second = fx.session();
        assert!(matches!(
            second.signal(PageSignal::VisibilityVisible).unwrap(),
            Some(CoreEvent::IntervalResumed { .. })
        ));
    }

    #[test]
    fn unload_twice_is_harmless() {
        let fx = Fixture::new(MockPage::default());
        fx.gate().login("ann", "Orbit!1").unwrap();
        let mut session = fx.session();
        session.load().unwrap();

        assert!(session.unload().unwrap().is_some());
        assert_eq!(session.unload().unwrap(), None);
        assert!(!fx.store.contains(KEY_ACTIVE_INTERVAL).unwrap());
    }

    #[test]
    fn expiry_tick_logs_out_and_records() {
        let fx = Fixture::new(MockPage::at("/guides/moon.html"));
        fx.gate().login("ann", "Orbit!1").unwrap();
        let mut session = fx.session();
        session.load().unwrap();

        fx.clock.advance(Duration::from_secs(3600));
        assert!(session.check_expiry().unwrap().is_empty());

        fx.clock.advance(Duration::from_secs(23 * 3600 + 1));
        let events = session.check_expiry().unwrap();

        assert_eq!(events.len(), 3);
        assert!(matches!(&events[0], CoreEvent::IntervalStopped(o) if o.recorded));
        assert_eq!(
            events[1],
            CoreEvent::SessionExpired {
                username: "ann".into()
            }
        );
        assert_eq!(
            fx.page.notifications(),
            vec![SESSION_EXPIRED_MESSAGE.to_string()]
        );
        assert_eq!(
            fx.page.navigations(),
            vec!["login.html?redirect=%2Fguides%2Fmoon.html".to_string()]
        );
        assert!(!session.gate().is_marked_authenticated().unwrap());
    }

    #[test]
    fn logout_stops_tracking_then_navigates() {
        let fx = Fixture::new(MockPage::default());
        fx.gate().login("ann", "Orbit!1").unwrap();
        let mut session = fx.session();
        session.load().unwrap();
        fx.clock.advance_minutes(2);

        let events = session.logout().unwrap();

        assert!(matches!(&events[0], CoreEvent::IntervalStopped(o) if !o.recorded));
        assert_eq!(
            events[1],
            CoreEvent::LoggedOut {
                username: Some("ann".into())
            }
        );
        assert_eq!(fx.page.navigations(), vec!["login.html".to_string()]);
        assert_eq!(session.tracker().state().unwrap(), TrackerState::Idle);
    }

    #[test]
    fn toggle_starts_and_stops() {
        let fx = Fixture::new(MockPage::default());
        fx.gate().login("ann", "Orbit!1").unwrap();
        let mut session = fx.session();

        assert!(matches!(
            session.toggle().unwrap(),
            Some(CoreEvent::IntervalStarted { .. })
        ));
        fx.clock.advance_minutes(6);
        assert!(matches!(
            session.toggle().unwrap(),
            Some(CoreEvent::IntervalStopped(o)) if o.duration_minutes == 6
        ));
        assert_eq!(session.refresh().unwrap().today_minutes, 6);
    }

    #[test]
    fn navigation_failure_surfaces() {
        let fx = Fixture::new(MockPage::default());
        *fx.page.fail_navigate.lock().unwrap() = true;
        let mut session = fx.session();

        assert!(session.load().is_err());
    }
}
