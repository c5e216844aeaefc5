//! The short-lived 'done' mark shown after reset, copy and download

use std::time::{Duration, Instant};

/// Remembers the last acknowledged action until it expires.  Acknowledgements only affect what
/// is drawn on the screen.
#[derive(Debug, Clone)]
pub struct Acknowledgement {
    duration: Duration,
    shown: Option<(String, Instant)>,
}

impl Acknowledgement {
    /// Creates an acknowledgement which stays visible for `duration`
    pub fn new(duration: Duration) -> Self {
        Acknowledgement {
            duration,
            shown: None,
        }
    }

    /// Marks `what` as done at time `now`, replacing any previous acknowledgement
    pub fn trigger(&mut self, what: impl Into<String>, now: Instant) {
        self.shown = Some((what.into(), now));
    }

    /// The acknowledged action, if it hasn't expired by `now`
    pub fn current(&self, now: Instant) -> Option<&str> {
        match &self.shown {
            Some((what, at)) if now.saturating_duration_since(*at) < self.duration => {
                Some(what.as_str())
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Acknowledgement;

    use std::time::{Duration, Instant};

    #[test]
    fn expires() {
        let start = Instant::now();
        let mut ack = Acknowledgement::new(Duration::from_secs(2));
        assert_eq!(ack.current(start), None);

        ack.trigger("copy", start);
        assert_eq!(ack.current(start), Some("copy"));
        assert_eq!(ack.current(start + Duration::from_millis(1999)), Some("copy"));
        assert_eq!(ack.current(start + Duration::from_secs(2)), None);
    }

    #[test]
    fn retrigger_restarts_the_clock() {
        let start = Instant::now();
        let mut ack = Acknowledgement::new(Duration::from_secs(2));
        ack.trigger("reset", start);
        ack.trigger("download", start + Duration::from_secs(1));
        assert_eq!(
            ack.current(start + Duration::from_millis(2500)),
            Some("download")
        );
    }
}
