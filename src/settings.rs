use std::env;
use std::time::Duration;

use log::warn;

#[derive(Clone, Debug)]
pub struct Settings {
    /// Quiet period after the last change notification before a reload fires.
    pub debounce_window: Duration,
    /// Upper bound on how long a pending reload may be pushed back by new
    /// notifications. Guarantees liveness under notification storms.
    pub max_refresh_delay: Duration,
    /// How long a typing indicator stays up without renewal.
    pub typing_expiry: Duration,
    /// Largest unread count rendered as-is; anything above shows as "N+".
    pub unread_display_cap: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debounce_window: Duration::from_millis(250),
            max_refresh_delay: Duration::from_secs(2),
            typing_expiry: Duration::from_millis(2500),
            unread_display_cap: 99,
        }
    }
}

impl Settings {
    pub fn env() -> Self {
        let defaults = Self::default();
        Self {
            debounce_window: env_millis("SYNC_DEBOUNCE_MS", defaults.debounce_window),
            max_refresh_delay: env_millis("SYNC_MAX_REFRESH_DELAY_MS", defaults.max_refresh_delay),
            typing_expiry: env_millis("SYNC_TYPING_EXPIRY_MS", defaults.typing_expiry),
            unread_display_cap: env_number("SYNC_UNREAD_DISPLAY_CAP", defaults.unread_display_cap),
        }
    }
}

fn env_millis(key: &str, fallback: Duration) -> Duration {
    match env::var(key) {
        Ok(raw) => match raw.parse::<u64>() {
            Ok(ms) => Duration::from_millis(ms),
            Err(_) => {
                warn!("{key} is not a valid millis value, using default");
                fallback
            }
        },
        Err(_) => fallback,
    }
}

fn env_number(key: &str, fallback: u32) -> u32 {
    match env::var(key) {
        Ok(raw) => match raw.parse::<u32>() {
            Ok(n) => n,
            Err(_) => {
                warn!("{key} is not a valid number, using default");
                fallback
            }
        },
        Err(_) => fallback,
    }
}
