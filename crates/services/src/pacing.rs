use std::time::Duration;

const ADVANCE_DELAY_ENV: &str = "TUTOR_ADVANCE_DELAY_MS";
const HINT_DELAY_ENV: &str = "TUTOR_HINT_DELAY_MS";

/// Presentation delays between a verdict and its follow-up transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    /// Delay between accepting an answer and moving to the next lesson.
    pub advance_delay: Duration,
    /// Delay between rejecting an answer and revealing the solution.
    pub hint_delay: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            advance_delay: Duration::from_millis(1_000),
            hint_delay: Duration::from_millis(500),
        }
    }
}

impl Pacing {
    /// No delays at all; transitions fire on the next `settle`.
    #[must_use]
    pub fn immediate() -> Self {
        Self {
            advance_delay: Duration::ZERO,
            hint_delay: Duration::ZERO,
        }
    }

    /// Defaults overridden by `TUTOR_ADVANCE_DELAY_MS` / `TUTOR_HINT_DELAY_MS`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let millis = |key: &str, fallback: Duration| {
            lookup(key)
                .and_then(|raw| raw.trim().parse::<u64>().ok())
                .map_or(fallback, Duration::from_millis)
        };
        Self {
            advance_delay: millis(ADVANCE_DELAY_ENV, defaults.advance_delay),
            hint_delay: millis(HINT_DELAY_ENV, defaults.hint_delay),
        }
    }
}
