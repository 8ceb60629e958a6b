#![forbid(unsafe_code)]

//! Core logic for the job board page.
//!
//! # Role
//! `jobboard-core` holds everything the page does that is worth testing
//! without a browser: the job list filter, the search debounce, theme state,
//! and alert timing. The page itself is reached only through the
//! [`view::JobBoardView`] and [`theme::ThemeStore`] traits, so the same code
//! runs against the DOM (`jobboard-web`) or against in-memory fakes.
//!
//! # This crate provides
//! - [`filter::JobListFilter`] and [`filter::FilterPass`]: the filter pass.
//! - [`coalescer::CoalescingScheduler`]: trailing-edge debounce on host time.
//! - [`theme::ThemeController`]: theme toggling with one presentation hook.
//! - [`alerts::AlertQueue`]: auto-hiding alerts and notifications.
//! - [`board::JobBoard`]: the controller tying the above to a view.
//!
//! # Time
//! Nothing here reads a wall clock to decide when work is due. Hosts pass a
//! monotonic `now` into every timed call (see [`clock`]).

pub mod actions;
pub mod alerts;
pub mod board;
pub mod clock;
pub mod coalescer;
pub mod config;
pub mod error;
pub mod filter;
#[cfg(feature = "tracing-fmt")]
pub mod logging;
pub mod record;
pub mod theme;
pub mod view;

pub use actions::{
    ApplicationStatus, GlobalSearchGate, ShareRequest, SubmitGuard, format_date, share_request,
};
pub use alerts::{Alert, AlertAction, AlertId, AlertKind, AlertLevel, AlertQueue};
pub use board::{JobBoard, TickOutput};
pub use clock::{Clock, ManualClock};
pub use coalescer::CoalescingScheduler;
pub use config::BoardConfig;
pub use error::{BoardError, Result};
pub use filter::{FilterPass, JobListFilter, count_label};
pub use record::{FilterCriteria, JobRecord};
pub use theme::{MemoryThemeStore, Theme, ThemeController, ThemeStore};
pub use view::{FilterControl, JobBoardView, MemoryView};
