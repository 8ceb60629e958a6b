#![forbid(unsafe_code)]

//! Small page actions: share links, application status labels, posting
//! dates, the debounced global search box, and held submit buttons.

use core::fmt;
use core::time::Duration;

use serde::Serialize;
use tracing::debug;

use crate::coalescer::CoalescingScheduler;

/// Payload for the platform share sheet, or the URL to copy when sharing is
/// unavailable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareRequest {
    pub title: String,
    pub text: String,
    pub url: String,
}

/// Build the share payload for a posting.
///
/// `origin` is the page origin (`https://jobs.example.com`); a trailing slash
/// is tolerated.
#[must_use]
pub fn share_request(origin: &str, job_id: u64, title: &str) -> ShareRequest {
    let origin = origin.trim_end_matches('/');
    ShareRequest {
        title: title.to_string(),
        text: format!("Check out this job opportunity: {title}"),
        url: format!("{origin}/jobs/{job_id}/"),
    }
}

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

fn days_in_month(year: u32, month: u32) -> u32 {
    match month {
        2 if year % 4 == 0 && (year % 100 != 0 || year % 400 == 0) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Render an ISO date (`2024-03-05`, optionally followed by a time) as
/// `Mar 5, 2024`.
///
/// The calendar date is taken as written; no time zone shift is applied.
/// Returns `None` for anything that is not a real date.
#[must_use]
pub fn format_date(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let date = raw.get(..10)?;
    if raw.len() > 10 && !matches!(raw.as_bytes()[10], b'T' | b' ') {
        return None;
    }
    let mut parts = date.split('-');
    let (year, month, day) = (parts.next()?, parts.next()?, parts.next()?);
    if year.len() != 4 || month.len() != 2 || day.len() != 2 {
        return None;
    }
    let digits = |s: &str| {
        if s.bytes().all(|b| b.is_ascii_digit()) {
            s.parse::<u32>().ok()
        } else {
            None
        }
    };
    let (year, month, day) = (digits(year)?, digits(month)?, digits(day)?);
    if !(1..=12).contains(&month) || day == 0 || day > days_in_month(year, month) {
        return None;
    }
    Some(format!("{} {day}, {year}", MONTHS[month as usize - 1]))
}

/// Status of a job application as shown to the company.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ApplicationStatus {
    Pending,
    Reviewed,
    Accepted,
    Rejected,
    Other(String),
}

impl ApplicationStatus {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" => Self::Pending,
            "reviewed" => Self::Reviewed,
            "accepted" => Self::Accepted,
            "rejected" => Self::Rejected,
            _ => Self::Other(raw.trim().to_string()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Reviewed => "reviewed",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Other(raw) => raw,
        }
    }

    /// Display label: the status with its first character uppercased.
    #[must_use]
    pub fn label(&self) -> String {
        let raw = self.as_str();
        let mut chars = raw.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    #[must_use]
    pub fn css_class(&self) -> String {
        format!("application-status status-{}", self.as_str())
    }

    /// Notification text shown after the change.
    #[must_use]
    pub fn update_message(&self) -> String {
        format!("Application status updated to {}", self.as_str())
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Debounced site-wide search box.
///
/// Terms are coalesced like the job search; once the quiet period passes the
/// latest term is released only if it is at least `min_len` long. Length is
/// counted in UTF-16 code units, as the browser reports it, without trimming.
#[derive(Debug, Clone)]
pub struct GlobalSearchGate {
    scheduler: CoalescingScheduler<String>,
    min_len: usize,
}

impl GlobalSearchGate {
    #[must_use]
    pub fn new(delay: Duration, min_len: usize) -> Self {
        Self {
            scheduler: CoalescingScheduler::new(delay),
            min_len,
        }
    }

    pub fn input(&mut self, now: Duration, term: impl Into<String>) {
        self.scheduler.request(now, term.into());
    }

    /// Release the settled term, if it is long enough.
    pub fn poll(&mut self, now: Duration) -> Option<String> {
        let term = self.scheduler.poll(now)?;
        let len = term.encode_utf16().count();
        if len < self.min_len {
            debug!(message = "global_search.skip", len);
            return None;
        }
        Some(term)
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.scheduler.has_pending()
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Duration> {
        self.scheduler.deadline()
    }
}

/// Submit buttons held in their processing state.
///
/// A submitted form normally navigates away. If the page is still here once
/// the fallback delay passes, the form is released so its button can be
/// restored. A form is held at most once at a time.
#[derive(Debug, Clone)]
pub struct SubmitGuard {
    fallback: Duration,
    held: Vec<(String, Duration)>,
}

impl SubmitGuard {
    #[must_use]
    pub fn new(fallback: Duration) -> Self {
        Self {
            fallback,
            held: Vec::new(),
        }
    }

    /// Hold `form` until `now + fallback`. Returns `false` if it is already held.
    pub fn submit(&mut self, now: Duration, form: impl Into<String>) -> bool {
        let form = form.into();
        if self.is_held(&form) {
            return false;
        }
        debug!(message = "submit.hold", form = %form);
        self.held.push((form, now.saturating_add(self.fallback)));
        true
    }

    /// Release `form` early. Returns `false` if it was not held.
    pub fn release(&mut self, form: &str) -> bool {
        let before = self.held.len();
        self.held.retain(|(held, _)| held != form);
        self.held.len() != before
    }

    /// Release every form whose fallback has passed, in submission order.
    pub fn poll(&mut self, now: Duration) -> Vec<String> {
        let mut released = Vec::new();
        self.held.retain(|(form, deadline)| {
            if *deadline <= now {
                released.push(form.clone());
                false
            } else {
                true
            }
        });
        released
    }

    #[must_use]
    pub fn is_held(&self, form: &str) -> bool {
        self.held.iter().any(|(held, _)| held == form)
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Duration> {
        self.held.iter().map(|(_, deadline)| *deadline).min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn share_request_builds_job_url() {
        assert_eq!(
            share_request("https://jobs.example.com/", 42, "Rust Developer"),
            ShareRequest {
                title: "Rust Developer".to_string(),
                text: "Check out this job opportunity: Rust Developer".to_string(),
                url: "https://jobs.example.com/jobs/42/".to_string(),
            }
        );
    }

    #[test]
    fn status_label_capitalizes_first_letter() {
        assert_eq!(ApplicationStatus::parse("pending").label(), "Pending");
        assert_eq!(ApplicationStatus::parse(" ACCEPTED ").label(), "Accepted");
        assert_eq!(ApplicationStatus::parse("on hold").label(), "On hold");
        assert_eq!(ApplicationStatus::parse("").label(), "");
    }

    #[test]
    fn status_css_class_and_message() {
        let status = ApplicationStatus::parse("rejected");
        assert_eq!(status.css_class(), "application-status status-rejected");
        assert_eq!(
            status.update_message(),
            "Application status updated to rejected"
        );
    }

    #[test]
    fn global_search_skips_short_terms() {
        let mut gate = GlobalSearchGate::new(Duration::from_millis(300), 3);
        gate.input(Duration::ZERO, "ru");
        assert_eq!(gate.poll(Duration::from_millis(300)), None);
        assert!(!gate.has_pending());

        gate.input(Duration::from_millis(400), "rus");
        assert_eq!(
            gate.poll(Duration::from_millis(700)).as_deref(),
            Some("rus")
        );
    }

    #[test]
    fn global_search_counts_raw_length() {
        let mut gate = GlobalSearchGate::new(Duration::from_millis(300), 3);
        gate.input(Duration::ZERO, " go");
        assert_eq!(gate.poll(Duration::from_millis(300)).as_deref(), Some(" go"));

        gate.input(Duration::from_millis(400), "\u{1F600}");
        assert_eq!(gate.poll(Duration::from_millis(700)), None);
    }

    #[test]
    fn global_search_uses_latest_term() {
        let mut gate = GlobalSearchGate::new(Duration::from_millis(300), 3);
        gate.input(Duration::ZERO, "backend");
        gate.input(Duration::from_millis(100), "ba");
        assert_eq!(gate.poll(Duration::from_millis(400)), None);
    }

    #[test]
    fn format_date_uses_short_month() {
        assert_eq!(format_date("2024-03-05").as_deref(), Some("Mar 5, 2024"));
        assert_eq!(
            format_date("2023-12-31T23:59:00Z").as_deref(),
            Some("Dec 31, 2023")
        );
        assert_eq!(format_date("2024-02-29 08:00").as_deref(), Some("Feb 29, 2024"));
    }

    #[test]
    fn format_date_rejects_impossible_dates() {
        assert_eq!(format_date("2023-02-29"), None);
        assert_eq!(format_date("1900-02-29"), None);
        assert_eq!(format_date("2024-13-01"), None);
        assert_eq!(format_date("2024-04-31"), None);
        assert_eq!(format_date("2024-4-1"), None);
        assert_eq!(format_date("2024-03-05x"), None);
        assert_eq!(format_date("+024-03-05"), None);
        assert_eq!(format_date(""), None);
    }

    #[test]
    fn submit_guard_releases_after_fallback() {
        let mut guard = SubmitGuard::new(Duration::from_secs(10));
        assert!(guard.submit(Duration::ZERO, "apply"));
        assert!(!guard.submit(Duration::from_secs(1), "apply"));
        assert!(guard.submit(Duration::from_secs(2), "post-job"));
        assert_eq!(guard.deadline(), Some(Duration::from_secs(10)));

        assert!(guard.poll(Duration::from_millis(9_999)).is_empty());
        assert_eq!(guard.poll(Duration::from_secs(10)), vec!["apply"]);
        assert!(!guard.is_held("apply"));
        assert_eq!(guard.deadline(), Some(Duration::from_secs(12)));
    }

    #[test]
    fn submit_guard_release_clears_early() {
        let mut guard = SubmitGuard::new(Duration::from_secs(10));
        guard.submit(Duration::ZERO, "apply");
        assert!(guard.release("apply"));
        assert!(!guard.release("apply"));
        assert_eq!(guard.deadline(), None);
        assert!(guard.poll(Duration::from_secs(60)).is_empty());
    }
}
