use std::time::Duration;

use tracing::Level;

use crate::{
    dom::ObserverOptions,
    error::{Error, Result},
};

/// Delays between visual state changes. These are presentation tuning, the only ordering that
/// matters is that press feedback ends before any confirmation state does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timings {
    /// How long a pressed button stays scaled down.
    pub press_feedback: Duration,

    /// Subscribe button: in-progress state, then confirmed state.
    pub subscribe_pending: Duration,
    pub subscribe_confirmed: Duration,

    /// Consultation button: in-progress state, then confirmed state.
    pub schedule_pending: Duration,
    pub schedule_confirmed: Duration,

    /// How long an inline form error stays up.
    pub form_error: Duration,

    /// Minimum time between two header scroll checks.
    pub scroll_sample: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            press_feedback: Duration::from_millis(150),
            subscribe_pending: Duration::from_millis(1000),
            subscribe_confirmed: Duration::from_millis(2000),
            schedule_pending: Duration::from_millis(1000),
            schedule_confirmed: Duration::from_millis(3000),
            form_error: Duration::from_millis(3000),
            scroll_sample: Duration::from_millis(100),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Most verbose level forwarded to the browser console.
    pub log_level: Level,

    pub timings: Timings,

    /// Scroll offset, in pixels, past which the header is styled as scrolled.
    pub header_scroll_threshold: f64,

    /// Viewport options for the scroll-reveal observer.
    pub reveal: ObserverOptions,

    /// Page assumed when the location path ends in `/`.
    pub default_page: String,

    /// Where the hero button navigates when the current page has nothing to scroll to.
    pub fallback_page: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: Level::INFO,
            timings: Timings::default(),
            header_scroll_threshold: 100.0,
            reveal: ObserverOptions::default(),
            default_page: "index.html".to_string(),
            fallback_page: "about.html".to_string(),
        }
    }
}

impl Config {
    /// Check the orderings the controllers rely on.
    pub fn validate(&self) -> Result<()> {
        let timings = &self.timings;

        let shortest_dwell = [
            timings.subscribe_pending,
            timings.subscribe_confirmed,
            timings.schedule_pending,
            timings.schedule_confirmed,
        ]
        .into_iter()
        .min()
        .unwrap_or_default();

        if timings.press_feedback >= shortest_dwell {
            return Err(Error::Config(format!(
                "press feedback ({:?}) must be shorter than every confirmation dwell ({:?})",
                timings.press_feedback, shortest_dwell
            )));
        }

        if !(0.0..=1.0).contains(&self.reveal.threshold) {
            return Err(Error::Config(format!(
                "reveal threshold {} is outside 0..=1",
                self.reveal.threshold
            )));
        }

        Ok(())
    }
}
