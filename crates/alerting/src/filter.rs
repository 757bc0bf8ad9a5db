//! Repeated-alert filter
//!
//! Decides from an event's occurrence count and the check's timing settings
//! whether this occurrence should produce an alert. The decision is a pure
//! function of the event; occurrence counts are persisted upstream.

use crate::event::{Event, RealertPolicy};
use std::fmt;
use tracing::debug;

/// Why an occurrence was not alerted on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuppressReason {
    /// Failing for less than `alert_after` seconds
    BelowAlertAfter { failing_for: i64, alert_after: i64 },
    /// Failed attempt count is not on the re-alert cadence
    OffCadence { realert_every: i64, attempts: i64 },
}

impl fmt::Display for SuppressReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuppressReason::BelowAlertAfter {
                failing_for,
                alert_after,
            } => write!(
                f,
                "Only failing for {}, less than {}. Not performing any action yet.",
                failing_for, alert_after
            ),
            SuppressReason::OffCadence {
                realert_every,
                attempts,
            } => write!(
                f,
                "only handling every {} occurrences, and we are at {}",
                realert_every, attempts
            ),
        }
    }
}

/// Outcome of the repeated-alert filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Proceed,
    Suppress(SuppressReason),
}

impl Decision {
    pub fn is_proceed(&self) -> bool {
        matches!(self, Decision::Proceed)
    }

    /// Suppression reason, if suppressed
    pub fn reason(&self) -> Option<&SuppressReason> {
        match self {
            Decision::Proceed => None,
            Decision::Suppress(reason) => Some(reason),
        }
    }
}

fn is_power_of_two(n: i64) -> bool {
    n > 0 && n & (n - 1) == 0
}

/// Decide whether this occurrence of a failing check should alert
pub fn decide(event: &Event) -> Decision {
    let interval = event.effective_interval();
    let alert_after = event.alert_after();

    // The configured interval, not the keepalive override, measures how long
    // the check has been failing.
    let failing_for = event
        .occurrences
        .saturating_mul(event.check.interval.unwrap_or(0));

    if failing_for < alert_after {
        let reason = SuppressReason::BelowAlertAfter {
            failing_for,
            alert_after,
        };
        debug!(check = %event.check.name, "Alert suppressed: {}", reason);
        return Decision::Suppress(reason);
    }

    // Passive checks and repeat notifications skip cadence gating.
    if interval <= 0 || !event.is_create() {
        debug!(check = %event.check.name, "Alert proceeding: passive or non-create event");
        return Decision::Proceed;
    }

    let initial_failing_occurrences = alert_after / interval;
    let attempts = event
        .occurrences
        .saturating_sub(initial_failing_occurrences);

    let realert_every = match event.realert_policy() {
        RealertPolicy::Every(n) => n,
        RealertPolicy::ExponentialBackoff if is_power_of_two(attempts) => attempts,
        // One past the attempt count can never divide it evenly.
        RealertPolicy::ExponentialBackoff => attempts.saturating_add(1),
    };

    // The first attempt past the alert_after threshold always alerts.
    if attempts == 1 {
        debug!(check = %event.check.name, "Alert proceeding: first failed attempt");
        return Decision::Proceed;
    }

    // A zero cadence has no boundaries to land on.
    let on_cadence = attempts == 0 || attempts.checked_rem(realert_every) == Some(0);
    if on_cadence {
        debug!(
            check = %event.check.name,
            attempts, realert_every, "Alert proceeding: on re-alert cadence"
        );
        Decision::Proceed
    } else {
        let reason = SuppressReason::OffCadence {
            realert_every,
            attempts,
        };
        debug!(check = %event.check.name, "Alert suppressed: {}", reason);
        Decision::Suppress(reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Action, KEEPALIVE_CHECK};

    fn active_event(
        occurrences: i64,
        interval: i64,
        alert_after: i64,
        realert_every: i64,
    ) -> Event {
        let mut event = Event::default();
        event.check.name = "disk".to_string();
        event.check.interval = Some(interval);
        event.check.alert_after = Some(alert_after);
        event.check.realert_every = Some(realert_every);
        event.occurrences = occurrences;
        event.action = Some(Action::Create);
        event
    }

    fn proceeding(events: impl Iterator<Item = Event>) -> Vec<i64> {
        events
            .filter(|e| decide(e).is_proceed())
            .map(|e| e.occurrences)
            .collect()
    }

    #[test]
    fn test_below_alert_after_suppresses() {
        let event = active_event(2, 60, 300, 1);
        let decision = decide(&event);
        assert_eq!(
            decision,
            Decision::Suppress(SuppressReason::BelowAlertAfter {
                failing_for: 120,
                alert_after: 300,
            })
        );
        assert_eq!(
            decision.reason().unwrap().to_string(),
            "Only failing for 120, less than 300. Not performing any action yet."
        );
    }

    #[test]
    fn test_fixed_cadence() {
        let events = (1..=6).map(|n| active_event(n, 60, 0, 3));
        assert_eq!(proceeding(events), vec![1, 3, 6]);
    }

    #[test]
    fn test_fixed_cadence_reason() {
        let decision = decide(&active_event(4, 60, 0, 3));
        assert_eq!(
            decision.reason().unwrap().to_string(),
            "only handling every 3 occurrences, and we are at 4"
        );
    }

    #[test]
    fn test_attempts_offset_by_alert_after() {
        // alert_after / interval = 3 initial occurrences before attempts count
        let events = (1..=10).map(|n| active_event(n, 60, 180, 2));
        assert_eq!(proceeding(events), vec![3, 4, 5, 7, 9]);
    }

    #[test]
    fn test_exponential_backoff() {
        let events = (1..=17).map(|n| active_event(n, 60, 0, -1));
        assert_eq!(proceeding(events), vec![1, 2, 4, 8, 16]);
    }

    #[test]
    fn test_exponential_backoff_zero_attempts_proceeds() {
        assert!(decide(&active_event(0, 60, 0, -1)).is_proceed());
    }

    #[test]
    fn test_exponential_backoff_negative_attempts() {
        // Keepalive gating divides alert_after by 20s: attempts = occurrences - 30
        let mut event = active_event(29, 300, 600, -1);
        event.check.name = KEEPALIVE_CHECK.to_string();
        assert!(!decide(&event).is_proceed());

        let mut event = active_event(28, 300, 600, -1);
        event.check.name = KEEPALIVE_CHECK.to_string();
        assert!(decide(&event).is_proceed());
    }

    #[test]
    fn test_zero_realert_every_does_not_panic() {
        assert!(decide(&active_event(1, 60, 0, 0)).is_proceed());
        assert!(!decide(&active_event(5, 60, 0, 0)).is_proceed());
    }

    #[test]
    fn test_passive_check_always_proceeds() {
        let mut event = active_event(7, 0, 0, 3);
        event.check.interval = None;
        assert!(decide(&event).is_proceed());
    }

    #[test]
    fn test_non_create_action_skips_cadence() {
        let mut event = active_event(4, 60, 0, 3);
        event.action = Some(Action::Resolve);
        assert!(decide(&event).is_proceed());
        event.action = None;
        assert!(decide(&event).is_proceed());
    }

    #[test]
    fn test_keepalive_uses_fixed_interval_for_cadence() {
        // failing_for = 12 * 300 = 3600, attempts = 12 - 600 / 20 = -18
        let mut event = active_event(12, 300, 600, 2);
        event.check.name = KEEPALIVE_CHECK.to_string();
        assert!(decide(&event).is_proceed());

        // attempts = 13 - 30 = -17; with the configured 300s it would be 11
        let mut event = active_event(13, 300, 600, 2);
        event.check.name = KEEPALIVE_CHECK.to_string();
        assert!(!decide(&event).is_proceed());
    }

    #[test]
    fn test_keepalive_without_interval_never_passes_alert_after() {
        let mut event = active_event(100, 0, 60, 1);
        event.check.name = KEEPALIVE_CHECK.to_string();
        event.check.interval = None;
        assert!(matches!(
            decide(&event),
            Decision::Suppress(SuppressReason::BelowAlertAfter { failing_for: 0, .. })
        ));
    }

    #[test]
    fn test_power_of_two() {
        assert!(is_power_of_two(1));
        assert!(is_power_of_two(1024));
        assert!(!is_power_of_two(0));
        assert!(!is_power_of_two(-4));
        assert!(!is_power_of_two(6));
    }
}
