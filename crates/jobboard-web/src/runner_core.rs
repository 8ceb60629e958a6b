#![forbid(unsafe_code)]

//! Platform-independent runner core wrapping [`JobBoard`].
//!
//! This module contains the logic shared between the wasm-bindgen exports
//! and native hosts. No JS/WASM types here.
//!
//! The host forwards page events as encoded JSON
//! ([`push_encoded_input`](RunnerCore::push_encoded_input)), drives time with
//! [`advance_time_ms`](RunnerCore::advance_time_ms) or
//! [`set_time_ms`](RunnerCore::set_time_ms), and calls
//! [`step`](RunnerCore::step) to fire whatever came due. Output is drained
//! with the `take_*` methods.

use core::time::Duration;

use jobboard_core::clock::duration_from_ms;
use jobboard_core::{
    Alert, AlertAction, AlertId, AlertLevel, BoardConfig, Clock, FilterControl, FilterCriteria,
    JobBoard, JobBoardView, JobRecord, ManualClock, MemoryThemeStore, MemoryView, ShareRequest,
    Theme, ThemeStore,
};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::input::{BoardInput, parse_encoded_input};

/// Host-facing summary of one [`RunnerCore::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepResult {
    /// Inputs accepted since the previous step.
    pub events_processed: u32,
    /// A filter pass ran since the previous step.
    pub filtered: bool,
    /// Visible records after the latest pass, if any pass has run.
    pub visible_count: Option<usize>,
    /// Work is still scheduled; the host should keep stepping.
    pub pending: bool,
}

/// A page alert present at load time.
#[derive(Debug, Clone, Deserialize)]
struct PageAlert {
    #[serde(default)]
    level: AlertLevel,
    message: String,
}

/// A JS number as a posting id: finite, whole and within `u64`.
#[must_use]
pub fn job_id_from_js(value: f64) -> Option<u64> {
    // `u64::MAX as f64` rounds up to 2^64, which is already out of range.
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 || value >= u64::MAX as f64 {
        return None;
    }
    Some(value as u64)
}

pub struct RunnerCore<V, S> {
    board: JobBoard<V, S>,
    clock: ManualClock,
    initialized: bool,
    events_since_step: u32,
    passes_at_step: u64,
    passes_taken: u64,
    logs: Vec<String>,
    alert_actions: Vec<AlertAction>,
    new_alerts: Vec<AlertId>,
    global_searches: Vec<String>,
    released_forms: Vec<String>,
}

impl RunnerCore<MemoryView, MemoryThemeStore> {
    /// Headless runner over an in-memory page.
    #[must_use]
    pub fn new(config: BoardConfig) -> Self {
        Self::with_parts(MemoryView::default(), MemoryThemeStore::new(), config)
    }

    /// Replace the page's records with a JSON array of job records.
    ///
    /// Returns `false` and logs the error if the JSON is malformed.
    pub fn load_records_json(&mut self, json: &str) -> bool {
        match JobRecord::list_from_json(json) {
            Ok(records) => {
                self.logs.push(format!("records_loaded: {}", records.len()));
                self.board.view().set_records(records);
                true
            }
            Err(err) => {
                self.reject("records_rejected", &err);
                false
            }
        }
    }

    /// Overwrite all three controls from `{"query":..,"location":..,"type":..}`.
    ///
    /// No pass runs; the next input event or [`filter_now`](Self::filter_now)
    /// picks the values up.
    pub fn set_controls_json(&mut self, json: &str) -> bool {
        match serde_json::from_str::<FilterCriteria>(json) {
            Ok(criteria) => {
                self.board.view().set_criteria(criteria);
                true
            }
            Err(err) => {
                self.reject("controls_rejected", &err);
                false
            }
        }
    }
}

impl<V, S> RunnerCore<V, S>
where
    V: JobBoardView + Clone + 'static,
    S: ThemeStore,
{
    #[must_use]
    pub fn with_parts(view: V, store: S, config: BoardConfig) -> Self {
        Self {
            board: JobBoard::new(view, store, config),
            clock: ManualClock::new(),
            initialized: false,
            events_since_step: 0,
            passes_at_step: 0,
            passes_taken: 0,
            logs: Vec::new(),
            alert_actions: Vec::new(),
            new_alerts: Vec::new(),
            global_searches: Vec::new(),
            released_forms: Vec::new(),
        }
    }

    /// Apply the stored theme and start timing the page's alerts.
    ///
    /// Only the first call has any effect.
    pub fn init(&mut self, page_alerts: &[(AlertLevel, &str)]) -> Vec<AlertId> {
        if self.initialized {
            return Vec::new();
        }
        self.initialized = true;
        let ids = self.board.init(self.clock.now_mono(), page_alerts);
        self.logs.push(format!(
            "init: theme={} page_alerts={}",
            self.board.theme(),
            ids.len()
        ));
        ids
    }

    /// [`init`](Self::init) with page alerts given as
    /// `[{"level":"success","message":".."}]`.
    pub fn init_json(&mut self, page_alerts_json: &str) -> Option<Vec<AlertId>> {
        match serde_json::from_str::<Vec<PageAlert>>(page_alerts_json) {
            Ok(alerts) => {
                let alerts: Vec<(AlertLevel, &str)> = alerts
                    .iter()
                    .map(|alert| (alert.level, alert.message.as_str()))
                    .collect();
                Some(self.init(&alerts))
            }
            Err(err) => {
                self.reject("page_alerts_rejected", &err);
                None
            }
        }
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    #[must_use]
    pub fn board(&self) -> &JobBoard<V, S> {
        &self.board
    }

    #[must_use]
    pub fn now(&self) -> Duration {
        self.clock.now_mono()
    }

    /// Advance the clock by `dt_ms` milliseconds.
    ///
    /// Non-finite and negative values are ignored.
    pub fn advance_time_ms(&mut self, dt_ms: f64) {
        if let Some(dt) = duration_from_ms(dt_ms) {
            self.clock.advance(dt);
        }
    }

    /// Move the clock to an absolute millisecond timestamp such as
    /// `performance.now()`. Earlier timestamps are ignored.
    pub fn set_time_ms(&mut self, ts_ms: f64) {
        if let Some(ts) = duration_from_ms(ts_ms) {
            self.clock.set(ts);
        }
    }

    /// Parse and apply one encoded page event.
    ///
    /// Returns `true` if the event was accepted, `false` if it was malformed
    /// or of an unknown kind.
    pub fn push_encoded_input(&mut self, json: &str) -> bool {
        match parse_encoded_input(json) {
            Ok(input) => {
                self.apply(input);
                true
            }
            Err(err) => {
                self.reject("input_rejected", &err);
                false
            }
        }
    }

    /// Apply a decoded page event at the current time.
    pub fn apply(&mut self, input: BoardInput) {
        let now = self.clock.now_mono();
        self.events_since_step = self.events_since_step.saturating_add(1);
        match input {
            BoardInput::Search(value) => {
                self.board.view().write_control(FilterControl::Search, &value);
                self.board.search_input(now);
            }
            BoardInput::Location(value) => {
                self.board.view().write_control(FilterControl::Location, &value);
                self.board.location_changed();
            }
            BoardInput::Type(value) => {
                self.board.view().write_control(FilterControl::Type, &value);
                self.board.type_changed();
            }
            BoardInput::ThemeToggle => {
                let theme = self.board.toggle_theme();
                self.logs.push(format!("theme: {theme}"));
            }
            BoardInput::SetTheme(theme) => {
                if self.board.set_theme(theme) {
                    self.logs.push(format!("theme: {theme}"));
                }
            }
            BoardInput::GlobalSearch(term) => self.board.global_search_input(now, term),
            BoardInput::DismissAlert(id) => {
                if self.board.dismiss_alert(id) {
                    self.alert_actions.push(AlertAction::Remove(id));
                }
            }
            BoardInput::Copied => {
                let id = self.board.copied_to_clipboard(now);
                self.new_alerts.push(id);
            }
            BoardInput::ApplicationStatus(raw) => {
                let (status, id) = self.board.application_status_changed(now, &raw);
                self.logs
                    .push(format!("application_status: {}", status.label()));
                self.new_alerts.push(id);
            }
            BoardInput::FormSubmit(form) => {
                if self.board.form_submitted(now, form.as_str()) {
                    self.logs.push(format!("form_submit: {form}"));
                }
            }
        }
    }

    /// Run a filter pass now, outside any input event.
    pub fn filter_now(&mut self) -> usize {
        self.board.filter_now().visible_count()
    }

    /// Fire everything due at the current time.
    pub fn step(&mut self) -> StepResult {
        if !self.initialized {
            self.init(&[]);
        }
        let out = self.board.tick(self.clock.now_mono());
        if let Some(pass) = &out.pass {
            self.logs.push(format!(
                "filter_pass: visible={} total={}",
                pass.visible_count(),
                pass.total()
            ));
        }
        if let Some(term) = out.global_search {
            debug!(message = "runner.global_search", term = %term);
            self.global_searches.push(term);
        }
        self.alert_actions.extend(out.alerts);
        self.released_forms.extend(out.released_forms);

        let passes = self.board.passes();
        let result = StepResult {
            events_processed: core::mem::take(&mut self.events_since_step),
            filtered: passes != self.passes_at_step,
            visible_count: self.board.last_pass().map(|pass| pass.visible_count()),
            pending: self.board.next_deadline().is_some(),
        };
        self.passes_at_step = passes;
        result
    }

    /// Milliseconds until the next scheduled deadline, if any.
    #[must_use]
    pub fn next_deadline_ms(&self) -> Option<f64> {
        self.board.next_deadline().map(|deadline| {
            deadline
                .saturating_sub(self.clock.now_mono())
                .as_secs_f64()
                * 1000.0
        })
    }

    /// Visibility from the latest pass, once per pass.
    pub fn take_visibility(&mut self) -> Option<Vec<bool>> {
        let passes = self.board.passes();
        if passes == self.passes_taken {
            return None;
        }
        self.passes_taken = passes;
        self.board.last_pass().map(|pass| pass.visibility().to_vec())
    }

    /// `"N jobs found"` from the latest pass.
    #[must_use]
    pub fn count_label(&self) -> Option<String> {
        self.board.last_pass().map(|pass| pass.count_label())
    }

    #[must_use]
    pub fn theme(&self) -> Theme {
        self.board.theme()
    }

    /// Share payload for a posting.
    #[must_use]
    pub fn share(&self, origin: &str, job_id: u64, title: &str) -> ShareRequest {
        self.board.share(origin, job_id, title)
    }

    pub fn take_logs(&mut self) -> Vec<String> {
        std::mem::take(&mut self.logs)
    }

    pub fn take_alert_actions(&mut self) -> Vec<AlertAction> {
        std::mem::take(&mut self.alert_actions)
    }

    /// Notifications created since the last call that are still active.
    pub fn take_new_alerts(&mut self) -> Vec<Alert> {
        let alerts = self.board.alerts();
        self.new_alerts
            .drain(..)
            .filter_map(|id| alerts.get(id).cloned())
            .collect()
    }

    /// Settled global search terms, oldest first.
    pub fn take_global_searches(&mut self) -> Vec<String> {
        std::mem::take(&mut self.global_searches)
    }

    /// Forms whose submit button should be restored.
    pub fn take_released_forms(&mut self) -> Vec<String> {
        std::mem::take(&mut self.released_forms)
    }

    fn reject(&mut self, what: &str, err: &dyn core::fmt::Display) {
        warn!(message = "runner.rejected", what, error = %err);
        self.logs.push(format!("{what}: {err}"));
    }
}
