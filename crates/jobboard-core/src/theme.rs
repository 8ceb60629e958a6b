#![forbid(unsafe_code)]

//! Light/dark theme state.
//!
//! The page used to keep the theme in an ambient persisted key and poke the
//! document from wherever it was toggled. Here the persisted value sits behind
//! [`ThemeStore`], and [`ThemeController`] owns the current theme plus a
//! single presentation subscriber that is told about every change.
//!
//! # Invariants
//!
//! 1. The store is written whenever the theme changes.
//! 2. The subscriber runs exactly once per change, after the store write.
//! 3. Setting the current theme again is a no-op (no write, no notify).

use core::fmt;
use core::str::FromStr;
use std::cell::Cell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::BoardError;

/// Key the browser host persists the theme under.
pub const THEME_STORAGE_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Attribute value, as written to `data-bs-theme`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    #[must_use]
    pub const fn is_dark(self) -> bool {
        matches!(self, Self::Dark)
    }

    /// Glyph for the toggle button: a moon offers dark mode, a sun offers light.
    #[must_use]
    pub const fn toggle_icon(self) -> &'static str {
        match self {
            Self::Light => "\u{1F319}",
            Self::Dark => "\u{2600}\u{FE0F}",
        }
    }

    /// Tooltip for the toggle button.
    #[must_use]
    pub fn toggle_hint(self) -> String {
        format!("Switch to {} mode", self.toggled())
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("light") {
            Ok(Self::Light)
        } else if trimmed.eq_ignore_ascii_case("dark") {
            Ok(Self::Dark)
        } else {
            Err(BoardError::InvalidTheme {
                value: s.to_string(),
            })
        }
    }
}

/// Persisted theme preference.
pub trait ThemeStore {
    /// The stored theme, or `None` if nothing valid is stored.
    fn get(&self) -> Option<Theme>;

    fn set(&mut self, theme: Theme);
}

/// In-memory store.
///
/// Clones share the same slot, so a test can keep a handle and inspect what
/// the controller wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryThemeStore {
    slot: Rc<Cell<Option<Theme>>>,
    writes: Rc<Cell<u64>>,
}

impl MemoryThemeStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_theme(theme: Theme) -> Self {
        let store = Self::default();
        store.slot.set(Some(theme));
        store
    }

    /// Number of `set` calls seen.
    #[must_use]
    pub fn writes(&self) -> u64 {
        self.writes.get()
    }
}

impl ThemeStore for MemoryThemeStore {
    fn get(&self) -> Option<Theme> {
        self.slot.get()
    }

    fn set(&mut self, theme: Theme) {
        self.slot.set(Some(theme));
        self.writes.set(self.writes.get() + 1);
    }
}

type Subscriber = Box<dyn FnMut(Theme)>;

/// Current theme plus the store it persists to and one presentation hook.
pub struct ThemeController<S> {
    store: S,
    current: Theme,
    fallback: Theme,
    subscriber: Option<Subscriber>,
    version: u64,
}

impl<S: fmt::Debug> fmt::Debug for ThemeController<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeController")
            .field("store", &self.store)
            .field("current", &self.current)
            .field("fallback", &self.fallback)
            .field("has_subscriber", &self.subscriber.is_some())
            .field("version", &self.version)
            .finish()
    }
}

impl<S: ThemeStore> ThemeController<S> {
    /// `fallback` is used when the store holds nothing.
    #[must_use]
    pub fn new(store: S, fallback: Theme) -> Self {
        Self {
            store,
            current: fallback,
            fallback,
            subscriber: None,
            version: 0,
        }
    }

    /// Install the presentation subscriber, replacing any previous one.
    pub fn subscribe(&mut self, subscriber: impl FnMut(Theme) + 'static) {
        self.subscriber = Some(Box::new(subscriber));
    }

    /// Load the stored theme and present it.
    ///
    /// Always notifies once so the page matches the stored preference, even
    /// when it equals the fallback.
    pub fn init(&mut self) -> Theme {
        self.current = self.store.get().unwrap_or(self.fallback);
        info!(message = "theme.init", theme = %self.current);
        self.notify();
        self.current
    }

    #[must_use]
    pub fn current(&self) -> Theme {
        self.current
    }

    /// Number of changes since construction.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Flip between light and dark. Returns the new theme.
    pub fn toggle(&mut self) -> Theme {
        let next = self.current.toggled();
        self.set(next);
        next
    }

    /// Switch to `theme`. Returns `false` if it was already current.
    pub fn set(&mut self, theme: Theme) -> bool {
        if theme == self.current {
            return false;
        }
        let from = self.current;
        self.current = theme;
        self.version += 1;
        self.store.set(theme);
        info!(message = "theme.change", from = %from, to = %theme);
        self.notify();
        true
    }

    fn notify(&mut self) {
        let theme = self.current;
        if let Some(subscriber) = self.subscriber.as_mut() {
            subscriber(theme);
        }
    }
}
