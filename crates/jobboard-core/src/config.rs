#![forbid(unsafe_code)]

//! Board timing and default settings.
//!
//! # Defaults
//!
//! | Setting | Default | Range | Description |
//! |---------|---------|-------|-------------|
//! | `search_debounce` | 300ms | 0-2000ms | Quiet period before a search-as-you-type pass |
//! | `alert_auto_hide` | 5000ms | 500-60000ms | Delay before a page alert starts fading |
//! | `alert_fade` | 500ms | 0-5000ms | Fade duration before removal |
//! | `notification_lifetime` | 5000ms | 500-60000ms | How long a notification stays |
//! | `default_theme` | light | light/dark | Theme when nothing is stored |
//! | `global_search_min_len` | 3 | 1-32 | Shortest term the global search runs for |
//! | `submit_fallback` | 10000ms | 1000-120000ms | How long a submit button stays in its processing state |
//!
//! # Environment Variables
//!
//! Native hosts can override the defaults:
//!
//! | Variable | Type |
//! |----------|------|
//! | `JOBBOARD_SEARCH_DEBOUNCE_MS` | u64 |
//! | `JOBBOARD_ALERT_AUTO_HIDE_MS` | u64 |
//! | `JOBBOARD_ALERT_FADE_MS` | u64 |
//! | `JOBBOARD_NOTIFICATION_MS` | u64 |
//! | `JOBBOARD_DEFAULT_THEME` | `light` / `dark` |
//! | `JOBBOARD_GLOBAL_SEARCH_MIN_LEN` | usize |
//! | `JOBBOARD_SUBMIT_FALLBACK_MS` | u64 |
//!
//! The browser host passes the same settings as a JSON object instead (see
//! [`BoardConfig::from_json`]).

use core::time::Duration;

use serde::Deserialize;

use crate::error::Result;
use crate::theme::Theme;

pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 300;
pub const MAX_SEARCH_DEBOUNCE_MS: u64 = 2_000;

pub const DEFAULT_ALERT_AUTO_HIDE_MS: u64 = 5_000;
pub const MIN_ALERT_AUTO_HIDE_MS: u64 = 500;
pub const MAX_ALERT_AUTO_HIDE_MS: u64 = 60_000;

pub const DEFAULT_ALERT_FADE_MS: u64 = 500;
pub const MAX_ALERT_FADE_MS: u64 = 5_000;

pub const DEFAULT_NOTIFICATION_MS: u64 = 5_000;
pub const MIN_NOTIFICATION_MS: u64 = 500;
pub const MAX_NOTIFICATION_MS: u64 = 60_000;

pub const DEFAULT_GLOBAL_SEARCH_MIN_LEN: usize = 3;
pub const MIN_GLOBAL_SEARCH_MIN_LEN: usize = 1;
pub const MAX_GLOBAL_SEARCH_MIN_LEN: usize = 32;

pub const DEFAULT_SUBMIT_FALLBACK_MS: u64 = 10_000;
pub const MIN_SUBMIT_FALLBACK_MS: u64 = 1_000;
pub const MAX_SUBMIT_FALLBACK_MS: u64 = 120_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    pub search_debounce: Duration,
    pub alert_auto_hide: Duration,
    pub alert_fade: Duration,
    pub notification_lifetime: Duration,
    pub default_theme: Theme,
    pub global_search_min_len: usize,
    pub submit_fallback: Duration,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            search_debounce: Duration::from_millis(DEFAULT_SEARCH_DEBOUNCE_MS),
            alert_auto_hide: Duration::from_millis(DEFAULT_ALERT_AUTO_HIDE_MS),
            alert_fade: Duration::from_millis(DEFAULT_ALERT_FADE_MS),
            notification_lifetime: Duration::from_millis(DEFAULT_NOTIFICATION_MS),
            default_theme: Theme::Light,
            global_search_min_len: DEFAULT_GLOBAL_SEARCH_MIN_LEN,
            submit_fallback: Duration::from_millis(DEFAULT_SUBMIT_FALLBACK_MS),
        }
    }
}

/// Wire form accepted from the browser host. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct BoardConfigJson {
    search_debounce_ms: Option<u64>,
    alert_auto_hide_ms: Option<u64>,
    alert_fade_ms: Option<u64>,
    notification_ms: Option<u64>,
    default_theme: Option<String>,
    global_search_min_len: Option<usize>,
    submit_fallback_ms: Option<u64>,
}

impl BoardConfig {
    #[must_use]
    pub fn with_search_debounce(mut self, delay: Duration) -> Self {
        self.search_debounce = delay;
        self
    }

    #[must_use]
    pub fn with_alert_auto_hide(mut self, delay: Duration) -> Self {
        self.alert_auto_hide = delay;
        self
    }

    #[must_use]
    pub fn with_alert_fade(mut self, fade: Duration) -> Self {
        self.alert_fade = fade;
        self
    }

    #[must_use]
    pub fn with_notification_lifetime(mut self, lifetime: Duration) -> Self {
        self.notification_lifetime = lifetime;
        self
    }

    #[must_use]
    pub fn with_default_theme(mut self, theme: Theme) -> Self {
        self.default_theme = theme;
        self
    }

    #[must_use]
    pub fn with_global_search_min_len(mut self, len: usize) -> Self {
        self.global_search_min_len = len;
        self
    }

    #[must_use]
    pub fn with_submit_fallback(mut self, fallback: Duration) -> Self {
        self.submit_fallback = fallback;
        self
    }

    /// Load overrides from `JOBBOARD_*` environment variables.
    ///
    /// Unparseable values are ignored; the result is [`validated`](Self::validated).
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let millis = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u64>().ok());

        if let Some(ms) = millis("JOBBOARD_SEARCH_DEBOUNCE_MS") {
            config.search_debounce = Duration::from_millis(ms);
        }
        if let Some(ms) = millis("JOBBOARD_ALERT_AUTO_HIDE_MS") {
            config.alert_auto_hide = Duration::from_millis(ms);
        }
        if let Some(ms) = millis("JOBBOARD_ALERT_FADE_MS") {
            config.alert_fade = Duration::from_millis(ms);
        }
        if let Some(ms) = millis("JOBBOARD_NOTIFICATION_MS") {
            config.notification_lifetime = Duration::from_millis(ms);
        }
        if let Some(theme) = lookup("JOBBOARD_DEFAULT_THEME").and_then(|v| v.parse().ok()) {
            config.default_theme = theme;
        }
        if let Some(len) =
            lookup("JOBBOARD_GLOBAL_SEARCH_MIN_LEN").and_then(|v| v.trim().parse().ok())
        {
            config.global_search_min_len = len;
        }
        if let Some(ms) = millis("JOBBOARD_SUBMIT_FALLBACK_MS") {
            config.submit_fallback = Duration::from_millis(ms);
        }

        config.validated()
    }

    /// Parse host-supplied JSON such as `{"search_debounce_ms":150}`.
    ///
    /// Unknown keys and unknown theme names are errors; numeric values are
    /// clamped.
    pub fn from_json(json: &str) -> Result<Self> {
        let wire: BoardConfigJson = serde_json::from_str(json)?;
        let mut config = Self::default();
        if let Some(ms) = wire.search_debounce_ms {
            config.search_debounce = Duration::from_millis(ms);
        }
        if let Some(ms) = wire.alert_auto_hide_ms {
            config.alert_auto_hide = Duration::from_millis(ms);
        }
        if let Some(ms) = wire.alert_fade_ms {
            config.alert_fade = Duration::from_millis(ms);
        }
        if let Some(ms) = wire.notification_ms {
            config.notification_lifetime = Duration::from_millis(ms);
        }
        if let Some(theme) = wire.default_theme {
            config.default_theme = theme.parse()?;
        }
        if let Some(len) = wire.global_search_min_len {
            config.global_search_min_len = len;
        }
        if let Some(ms) = wire.submit_fallback_ms {
            config.submit_fallback = Duration::from_millis(ms);
        }
        Ok(config.validated())
    }

    /// Clamp every value into its documented range.
    #[must_use]
    pub fn validated(mut self) -> Self {
        fn clamp_ms(value: Duration, min: u64, max: u64) -> Duration {
            let ms = u64::try_from(value.as_millis()).unwrap_or(u64::MAX);
            Duration::from_millis(ms.clamp(min, max))
        }

        self.search_debounce = clamp_ms(self.search_debounce, 0, MAX_SEARCH_DEBOUNCE_MS);
        self.alert_auto_hide = clamp_ms(
            self.alert_auto_hide,
            MIN_ALERT_AUTO_HIDE_MS,
            MAX_ALERT_AUTO_HIDE_MS,
        );
        self.alert_fade = clamp_ms(self.alert_fade, 0, MAX_ALERT_FADE_MS);
        self.notification_lifetime = clamp_ms(
            self.notification_lifetime,
            MIN_NOTIFICATION_MS,
            MAX_NOTIFICATION_MS,
        );
        self.global_search_min_len = self
            .global_search_min_len
            .clamp(MIN_GLOBAL_SEARCH_MIN_LEN, MAX_GLOBAL_SEARCH_MIN_LEN);
        self.submit_fallback = clamp_ms(
            self.submit_fallback,
            MIN_SUBMIT_FALLBACK_MS,
            MAX_SUBMIT_FALLBACK_MS,
        );
        self
    }
}
