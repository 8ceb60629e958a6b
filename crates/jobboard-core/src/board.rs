#![forbid(unsafe_code)]

//! The board controller.
//!
//! [`JobBoard`] routes page events to the filter, the search debounce, the
//! theme controller, and the alert queue. It owns no page data: every filter
//! pass starts by reading criteria and records fresh from the injected view.
//!
//! # Event flow
//!
//! ```text
//! search_input(now) ──► debounce ──┐
//!                                  ├─► tick(now) ──► filter pass ──► view
//! location_changed() ──────────────┤
//! type_changed() ──────────────────┘ (immediate)
//! ```
//!
//! Passes never overlap: each runs to completion inside the call that
//! triggered it.

use core::time::Duration;

use tracing::info;

use crate::actions::{
    ApplicationStatus, GlobalSearchGate, ShareRequest, SubmitGuard, share_request,
};
use crate::alerts::{AlertAction, AlertId, AlertLevel, AlertQueue};
use crate::coalescer::CoalescingScheduler;
use crate::config::BoardConfig;
use crate::filter::{FilterPass, JobListFilter};
use crate::theme::{Theme, ThemeController, ThemeStore};
use crate::view::JobBoardView;

/// Everything that came due during one [`JobBoard::tick`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickOutput {
    /// The debounced filter pass, if one fired.
    pub pass: Option<FilterPass>,
    /// Settled global search term, if one fired.
    pub global_search: Option<String>,
    pub alerts: Vec<AlertAction>,
    /// Forms whose submit button should leave its processing state.
    pub released_forms: Vec<String>,
}

impl TickOutput {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pass.is_none()
            && self.global_search.is_none()
            && self.alerts.is_empty()
            && self.released_forms.is_empty()
    }
}

pub struct JobBoard<V, S> {
    view: V,
    config: BoardConfig,
    search: CoalescingScheduler<()>,
    global_search: GlobalSearchGate,
    theme: ThemeController<S>,
    alerts: AlertQueue,
    submits: SubmitGuard,
    last_pass: Option<FilterPass>,
    passes: u64,
}

impl<V, S: ThemeStore> core::fmt::Debug for JobBoard<V, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("JobBoard")
            .field("config", &self.config)
            .field("theme", &self.theme.current())
            .field("passes", &self.passes)
            .field("alerts", &self.alerts.len())
            .finish_non_exhaustive()
    }
}

impl<V, S> JobBoard<V, S>
where
    V: JobBoardView + Clone + 'static,
    S: ThemeStore,
{
    /// Wire a board to `view`, persisting the theme through `store`.
    ///
    /// The view becomes the theme controller's presentation subscriber.
    #[must_use]
    pub fn new(view: V, store: S, config: BoardConfig) -> Self {
        let config = config.validated();
        let mut theme = ThemeController::new(store, config.default_theme);
        let presenter = view.clone();
        theme.subscribe(move |theme| presenter.apply_theme(theme));
        Self {
            search: CoalescingScheduler::new(config.search_debounce),
            global_search: GlobalSearchGate::new(
                config.search_debounce,
                config.global_search_min_len,
            ),
            alerts: AlertQueue::from_config(&config),
            submits: SubmitGuard::new(config.submit_fallback),
            view,
            config,
            theme,
            last_pass: None,
            passes: 0,
        }
    }

    /// Page load: apply the stored theme and start timing the page's alerts.
    pub fn init(&mut self, now: Duration, page_alerts: &[(AlertLevel, &str)]) -> Vec<AlertId> {
        let theme = self.theme.init();
        let ids: Vec<AlertId> = page_alerts
            .iter()
            .map(|(level, message)| self.alerts.register_page_alert(now, *level, *message))
            .collect();
        info!(
            message = "board.init",
            theme = %theme,
            page_alerts = ids.len()
        );
        ids
    }

    #[must_use]
    pub fn view(&self) -> &V {
        &self.view
    }

    #[must_use]
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Result of the most recent pass.
    #[must_use]
    pub fn last_pass(&self) -> Option<&FilterPass> {
        self.last_pass.as_ref()
    }

    /// Passes run since construction.
    #[must_use]
    pub fn passes(&self) -> u64 {
        self.passes
    }

    #[must_use]
    pub fn theme(&self) -> Theme {
        self.theme.current()
    }

    #[must_use]
    pub fn theme_store(&self) -> &S {
        self.theme.store()
    }

    #[must_use]
    pub fn alerts(&self) -> &AlertQueue {
        &self.alerts
    }

    /// The search box changed. The pass runs once typing pauses.
    pub fn search_input(&mut self, now: Duration) {
        self.search.request(now, ());
    }

    /// The location control changed. Runs a pass immediately.
    pub fn location_changed(&mut self) -> &FilterPass {
        self.filter_now()
    }

    /// The type control changed. Runs a pass immediately.
    pub fn type_changed(&mut self) -> &FilterPass {
        self.filter_now()
    }

    /// Run a filter pass against the view's current state.
    pub fn filter_now(&mut self) -> &FilterPass {
        let criteria = self.view.read_criteria();
        let records = self.view.read_records();
        let pass = JobListFilter::apply(&records, &criteria);

        self.view.set_visibility(pass.visibility());
        self.view.set_count_label(&pass.count_label());
        self.passes += 1;

        self.last_pass.insert(pass)
    }

    /// Earliest time a call to [`tick`](Self::tick) would produce output.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        [
            self.search.deadline(),
            self.global_search.deadline(),
            self.alerts.next_deadline(),
            self.submits.deadline(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    /// Fire whatever is due at `now`.
    pub fn tick(&mut self, now: Duration) -> TickOutput {
        let pass = self
            .search
            .poll(now)
            .map(|()| self.filter_now().clone());
        TickOutput {
            pass,
            global_search: self.global_search.poll(now),
            alerts: self.alerts.tick(now),
            released_forms: self.submits.poll(now),
        }
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme.toggle()
    }

    pub fn set_theme(&mut self, theme: Theme) -> bool {
        self.theme.set(theme)
    }

    /// The site-wide search box changed.
    pub fn global_search_input(&mut self, now: Duration, term: impl Into<String>) {
        self.global_search.input(now, term);
    }

    pub fn notify(
        &mut self,
        now: Duration,
        message: impl Into<String>,
        level: AlertLevel,
    ) -> AlertId {
        self.alerts.notify(now, message, level)
    }

    pub fn dismiss_alert(&mut self, id: AlertId) -> bool {
        self.alerts.dismiss(id)
    }

    /// Confirm a completed clipboard write.
    pub fn copied_to_clipboard(&mut self, now: Duration) -> AlertId {
        self.notify(now, "Copied to clipboard!", AlertLevel::Success)
    }

    /// Record an application status change and announce it.
    pub fn application_status_changed(
        &mut self,
        now: Duration,
        status: &str,
    ) -> (ApplicationStatus, AlertId) {
        let status = ApplicationStatus::parse(status);
        let id = self.notify(now, status.update_message(), AlertLevel::Success);
        (status, id)
    }

    /// A valid form was submitted; its button shows progress until the page
    /// navigates or the fallback delay passes. Returns `false` if the form is
    /// already held.
    pub fn form_submitted(&mut self, now: Duration, form: impl Into<String>) -> bool {
        self.submits.submit(now, form)
    }

    /// Share payload for a posting.
    #[must_use]
    pub fn share(&self, origin: &str, job_id: u64, title: &str) -> ShareRequest {
        share_request(origin, job_id, title)
    }
}
