#![forbid(unsafe_code)]

//! Timed removal of page alerts and transient notifications.
//!
//! Two kinds of entries share one queue:
//!
//! - **Page alerts** are rendered server-side with the page. Any alert that
//!   is not `Danger` starts fading after the auto-hide delay and is removed
//!   once the fade finishes. Danger alerts stay until dismissed.
//! - **Notifications** are pushed at runtime (copy confirmations, status
//!   updates) and removed after their lifetime, whatever their level.
//!
//! Timing is driven by [`AlertQueue::tick`] with host-supplied `now`, the same
//! way the search debounce is.

use core::fmt;
use core::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::BoardConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlertId(u64);

impl AlertId {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for AlertId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "alert-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    #[default]
    Info,
    Success,
    Warning,
    Danger,
}

impl AlertLevel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }

    /// Page alerts at this level hide themselves.
    #[must_use]
    pub const fn auto_hides(self) -> bool {
        !matches!(self, Self::Danger)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertKind {
    Page,
    Notification,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub id: AlertId,
    pub kind: AlertKind,
    pub level: AlertLevel,
    pub message: String,
}

impl Alert {
    /// Class list for rendering.
    #[must_use]
    pub fn css_class(&self) -> String {
        match self.kind {
            AlertKind::Page => format!("alert alert-{}", self.level.as_str()),
            AlertKind::Notification => format!(
                "alert alert-{} alert-dismissible fade show position-fixed",
                self.level.as_str()
            ),
        }
    }
}

/// What the presenter should do with an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertAction {
    /// Start the opacity transition.
    Fade(AlertId),
    /// Remove from the page.
    Remove(AlertId),
}

impl AlertAction {
    #[must_use]
    pub const fn id(self) -> AlertId {
        match self {
            Self::Fade(id) | Self::Remove(id) => id,
        }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    alert: Alert,
    fade_at: Option<Duration>,
    remove_at: Option<Duration>,
    fading: bool,
}

/// Queue of alerts waiting to fade or be removed.
#[derive(Debug, Clone)]
pub struct AlertQueue {
    entries: Vec<Entry>,
    next_id: u64,
    auto_hide: Duration,
    fade: Duration,
    notification_lifetime: Duration,
}

impl Default for AlertQueue {
    fn default() -> Self {
        Self::from_config(&BoardConfig::default())
    }
}

impl AlertQueue {
    #[must_use]
    pub fn from_config(config: &BoardConfig) -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
            auto_hide: config.alert_auto_hide,
            fade: config.alert_fade,
            notification_lifetime: config.notification_lifetime,
        }
    }

    fn next_id(&mut self) -> AlertId {
        let id = AlertId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Track an alert that was rendered with the page.
    pub fn register_page_alert(
        &mut self,
        now: Duration,
        level: AlertLevel,
        message: impl Into<String>,
    ) -> AlertId {
        let id = self.next_id();
        let (fade_at, remove_at) = if level.auto_hides() {
            let fade_at = now.saturating_add(self.auto_hide);
            (Some(fade_at), Some(fade_at.saturating_add(self.fade)))
        } else {
            (None, None)
        };
        self.entries.push(Entry {
            alert: Alert {
                id,
                kind: AlertKind::Page,
                level,
                message: message.into(),
            },
            fade_at,
            remove_at,
            fading: false,
        });
        id
    }

    /// Show a transient notification.
    pub fn notify(
        &mut self,
        now: Duration,
        message: impl Into<String>,
        level: AlertLevel,
    ) -> AlertId {
        let id = self.next_id();
        self.entries.push(Entry {
            alert: Alert {
                id,
                kind: AlertKind::Notification,
                level,
                message: message.into(),
            },
            fade_at: None,
            remove_at: Some(now.saturating_add(self.notification_lifetime)),
            fading: false,
        });
        id
    }

    /// Remove an alert right away. Returns `false` for unknown ids.
    pub fn dismiss(&mut self, id: AlertId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.alert.id != id);
        self.entries.len() != before
    }

    /// Collect every fade and removal due at `now`, in deadline order.
    pub fn tick(&mut self, now: Duration) -> Vec<AlertAction> {
        let mut due: Vec<(Duration, AlertAction)> = Vec::new();
        for entry in &mut self.entries {
            if !entry.fading
                && let Some(fade_at) = entry.fade_at
                && now >= fade_at
            {
                entry.fading = true;
                due.push((fade_at, AlertAction::Fade(entry.alert.id)));
            }
            if let Some(remove_at) = entry.remove_at
                && now >= remove_at
            {
                due.push((remove_at, AlertAction::Remove(entry.alert.id)));
            }
        }
        if due.is_empty() {
            return Vec::new();
        }

        self.entries
            .retain(|entry| entry.remove_at.is_none_or(|remove_at| now < remove_at));
        // Stable sort keeps a fade ahead of its removal on equal deadlines.
        due.sort_by_key(|(at, action)| (*at, action.id()));
        for (_, action) in &due {
            debug!(message = "alert.expire", action = ?action);
        }
        due.into_iter().map(|(_, action)| action).collect()
    }

    /// Alerts still on the page, in insertion order.
    pub fn active(&self) -> impl Iterator<Item = &Alert> {
        self.entries.iter().map(|entry| &entry.alert)
    }

    #[must_use]
    pub fn get(&self, id: AlertId) -> Option<&Alert> {
        self.active().find(|alert| alert.id == id)
    }

    #[must_use]
    pub fn is_fading(&self, id: AlertId) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.alert.id == id && entry.fading)
    }

    /// Earliest pending fade or removal.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.entries
            .iter()
            .flat_map(|entry| {
                let fade = if entry.fading { None } else { entry.fade_at };
                fade.into_iter().chain(entry.remove_at)
            })
            .min()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
