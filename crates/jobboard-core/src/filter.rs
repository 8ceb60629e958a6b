#![forbid(unsafe_code)]

//! The job list filter pass.
//!
//! A pass takes the rendered records and the current [`FilterCriteria`] and
//! decides, per record:
//!
//! ```text
//! matches_search   = query in title || query in description || query in location
//! matches_location = location empty || location in record.location
//! matches_type     = type empty     || type in record.type
//! visible          = matches_search && matches_location && matches_type
//! ```
//!
//! Every comparison is a case-insensitive substring test, and an empty needle
//! is a substring of everything. Criteria are matched as typed: whitespace is
//! part of the needle.
//!
//! # Invariants
//!
//! 1. A record's visibility depends only on the criteria and that record's
//!    own fields. Prior visibility and neighbouring records are ignored, so
//!    recomputing with the same criteria is idempotent.
//! 2. Order is preserved: `visibility[i]` belongs to `records[i]`.
//! 3. The visible count is counted from the computed visibility, never
//!    re-read from the view.

use tracing::{debug, info_span};
use web_time::Instant;

use crate::record::{FilterCriteria, JobRecord};

/// Case-insensitive substring test against an already-lowercased needle.
pub(crate) fn contains_ignore_case(haystack: &str, needle_lower: &str) -> bool {
    if needle_lower.is_empty() {
        return true;
    }
    if haystack.is_ascii() && needle_lower.is_ascii() {
        let haystack = haystack.as_bytes();
        let needle = needle_lower.as_bytes();
        if needle.len() > haystack.len() {
            return false;
        }
        return haystack
            .windows(needle.len())
            .any(|window| window.iter().zip(needle).all(|(h, n)| h.to_ascii_lowercase() == *n));
    }
    haystack.to_lowercase().contains(needle_lower)
}

/// Criteria lowered once per pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Needles {
    query: String,
    location: String,
    job_type: String,
}

impl Needles {
    pub(crate) fn new(criteria: &FilterCriteria) -> Self {
        Self {
            query: criteria.query.to_lowercase(),
            location: criteria.location.to_lowercase(),
            job_type: criteria.job_type.to_lowercase(),
        }
    }

    pub(crate) fn matches(&self, record: &JobRecord) -> bool {
        let matches_search = contains_ignore_case(&record.title, &self.query)
            || contains_ignore_case(&record.description, &self.query)
            || contains_ignore_case(&record.location, &self.query);
        let matches_location =
            self.location.is_empty() || contains_ignore_case(&record.location, &self.location);
        let matches_type =
            self.job_type.is_empty() || contains_ignore_case(&record.job_type, &self.job_type);
        matches_search && matches_location && matches_type
    }
}

/// Result of one filter pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPass {
    visibility: Vec<bool>,
    visible: usize,
}

impl FilterPass {
    fn from_visibility(visibility: Vec<bool>) -> Self {
        let visible = visibility.iter().filter(|v| **v).count();
        Self {
            visibility,
            visible,
        }
    }

    /// Number of records the pass looked at.
    #[must_use]
    pub fn total(&self) -> usize {
        self.visibility.len()
    }

    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.visible
    }

    #[must_use]
    pub fn hidden_count(&self) -> usize {
        self.total() - self.visible
    }

    /// Visibility of the record at `index`; `None` past the end.
    #[must_use]
    pub fn is_visible(&self, index: usize) -> Option<bool> {
        self.visibility.get(index).copied()
    }

    #[must_use]
    pub fn visibility(&self) -> &[bool] {
        &self.visibility
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.visibility.iter().copied()
    }

    /// Pair each record with its computed visibility, in page order.
    pub fn zip<'a>(
        &'a self,
        records: &'a [JobRecord],
    ) -> impl Iterator<Item = (&'a JobRecord, bool)> + 'a {
        records.iter().zip(self.iter())
    }

    /// Text for the count display.
    #[must_use]
    pub fn count_label(&self) -> String {
        count_label(self.visible)
    }
}

/// `"{count} jobs found"`.
#[must_use]
pub fn count_label(count: usize) -> String {
    format!("{count} jobs found")
}

/// Stateless filter over a list of job records.
#[derive(Debug, Clone, Copy, Default)]
pub struct JobListFilter;

impl JobListFilter {
    /// Compute visibility for every record.
    #[must_use]
    pub fn apply(records: &[JobRecord], criteria: &FilterCriteria) -> FilterPass {
        let needles = Needles::new(criteria);
        let started = Instant::now();
        let span = info_span!(
            "job_filter.pass",
            total = records.len() as u64,
            query_active = !needles.query.is_empty(),
            visible = tracing::field::Empty,
            duration_us = tracing::field::Empty
        );
        let _entered = span.enter();

        let pass = FilterPass::from_visibility(
            records.iter().map(|record| needles.matches(record)).collect(),
        );

        span.record("visible", pass.visible_count() as u64);
        span.record("duration_us", started.elapsed().as_micros() as u64);
        debug!(
            message = "job_filter.done",
            total = pass.total(),
            visible = pass.visible_count(),
            location_active = !needles.location.is_empty(),
            type_active = !needles.job_type.is_empty()
        );
        pass
    }

    /// Compute visibility and write it into each record's `visible` field.
    ///
    /// Returns the visible count.
    pub fn apply_in_place(records: &mut [JobRecord], criteria: &FilterCriteria) -> usize {
        let pass = Self::apply(records, criteria);
        for (record, visible) in records.iter_mut().zip(pass.iter()) {
            record.visible = visible;
        }
        pass.visible_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};
    use tracing::Subscriber;
    use tracing_subscriber::Layer;
    use tracing_subscriber::layer::{Context, SubscriberExt};

    fn sample() -> Vec<JobRecord> {
        vec![
            JobRecord::new("Data Analyst", "Remote", "Full-time"),
            JobRecord::new("DevOps Engineer", "NYC", "Contract"),
        ]
    }

    #[test]
    fn empty_criteria_show_everything() {
        let pass = JobListFilter::apply(&sample(), &FilterCriteria::new());
        assert_eq!(pass.visibility(), &[true, true]);
        assert_eq!(pass.visible_count(), 2);
    }

    #[test]
    fn query_matches_title_only_record() {
        let pass = JobListFilter::apply(&sample(), &FilterCriteria::new().query("engineer"));
        assert_eq!(pass.visibility(), &[false, true]);
        assert_eq!(pass.visible_count(), 1);
        assert_eq!(pass.count_label(), "1 jobs found");
    }

    #[test]
    fn query_also_searches_description_and_location() {
        let records = vec![
            JobRecord::new("Analyst", "Remote", "Full-time")
                .with_description("Work with Kubernetes clusters"),
            JobRecord::new("Engineer", "Kuala Lumpur", "Contract"),
            JobRecord::new("Designer", "Paris", "Part-time"),
        ];
        let pass = JobListFilter::apply(&records, &FilterCriteria::new().query("ku"));
        assert_eq!(pass.visibility(), &[true, true, false]);
    }

    #[test]
    fn location_filter_is_substring_and_case_insensitive() {
        let records = vec![
            JobRecord::new("Backend Engineer", "San Francisco, CA", "Full-time"),
            JobRecord::new("Backend Engineer", "Austin, TX", "Full-time"),
        ];
        let pass =
            JobListFilter::apply(&records, &FilterCriteria::new().location("francisco"));
        assert_eq!(pass.visibility(), &[true, false]);
    }

    #[test]
    fn type_filter_narrows_results() {
        let pass = JobListFilter::apply(&sample(), &FilterCriteria::new().job_type("CONTRACT"));
        assert_eq!(pass.visibility(), &[false, true]);
    }

    #[test]
    fn all_criteria_must_hold() {
        let pass = JobListFilter::apply(
            &sample(),
            &FilterCriteria::new()
                .query("engineer")
                .location("nyc")
                .job_type("full"),
        );
        assert_eq!(pass.visible_count(), 0);
        assert_eq!(pass.count_label(), "0 jobs found");
    }

    #[test]
    fn blank_record_fields_match_only_empty_needles() {
        let records = vec![JobRecord::default()];
        assert_eq!(
            JobListFilter::apply(&records, &FilterCriteria::new()).visible_count(),
            1
        );
        assert_eq!(
            JobListFilter::apply(&records, &FilterCriteria::new().query("x")).visible_count(),
            0
        );
    }

    #[test]
    fn non_ascii_text_matches_case_insensitively() {
        let records = vec![JobRecord::new("Ingénieur Logiciel", "Zürich", "CDI")];
        let pass = JobListFilter::apply(
            &records,
            &FilterCriteria::new().query("INGÉNIEUR").location("ZÜRICH"),
        );
        assert_eq!(pass.visibility(), &[true]);
    }

    #[test]
    fn whitespace_in_criteria_is_matched_literally() {
        let pass = JobListFilter::apply(&sample(), &FilterCriteria::new().query("engineer "));
        assert_eq!(pass.visibility(), &[false, false]);

        let pass = JobListFilter::apply(&sample(), &FilterCriteria::new().location("  "));
        assert_eq!(pass.visibility(), &[false, false]);

        let pass = JobListFilter::apply(&sample(), &FilterCriteria::new().query("devops "));
        assert_eq!(pass.visibility(), &[false, true]);
    }

    #[test]
    fn apply_ignores_previous_visibility() {
        let mut records = sample();
        records[0].visible = false;
        records[1].visible = false;
        let pass = JobListFilter::apply(&records, &FilterCriteria::new());
        assert_eq!(pass.visibility(), &[true, true]);
    }

    #[test]
    fn apply_in_place_writes_visibility_and_returns_count() {
        let mut records = sample();
        let visible = JobListFilter::apply_in_place(&mut records, &FilterCriteria::new().query("data"));
        assert_eq!(visible, 1);
        assert!(records[0].visible);
        assert!(!records[1].visible);
    }

    #[test]
    fn zip_pairs_records_in_order() {
        let records = sample();
        let pass = JobListFilter::apply(&records, &FilterCriteria::new().query("devops"));
        let titles: Vec<(&str, bool)> = pass
            .zip(&records)
            .map(|(record, visible)| (record.title.as_str(), visible))
            .collect();
        assert_eq!(
            titles,
            vec![("Data Analyst", false), ("DevOps Engineer", true)]
        );
    }

    #[test]
    fn is_visible_out_of_range_is_none() {
        let pass = JobListFilter::apply(&sample(), &FilterCriteria::new());
        assert_eq!(pass.is_visible(1), Some(true));
        assert_eq!(pass.is_visible(2), None);
        assert_eq!(pass.hidden_count(), 0);
    }

    #[test]
    fn contains_ignore_case_handles_needle_longer_than_haystack() {
        assert!(!contains_ignore_case("nyc", "new york"));
        assert!(contains_ignore_case("anything", ""));
        assert!(contains_ignore_case("Remote (EU)", "(eu)"));
    }

    #[derive(Debug, Default)]
    struct PassTraceState {
        pass_seen: bool,
        has_total_field: bool,
        has_visible_field: bool,
        has_query_active_field: bool,
    }

    struct PassTraceCapture {
        state: Arc<Mutex<PassTraceState>>,
    }

    impl<S> Layer<S> for PassTraceCapture
    where
        S: Subscriber + for<'lookup> tracing_subscriber::registry::LookupSpan<'lookup>,
    {
        fn on_new_span(
            &self,
            attrs: &tracing::span::Attributes<'_>,
            _id: &tracing::Id,
            _ctx: Context<'_, S>,
        ) {
            if attrs.metadata().name() != "job_filter.pass" {
                return;
            }
            let fields = attrs.metadata().fields();
            let mut state = self.state.lock().expect("pass trace state lock");
            state.pass_seen = true;
            state.has_total_field |= fields.field("total").is_some();
            state.has_visible_field |= fields.field("visible").is_some();
            state.has_query_active_field |= fields.field("query_active").is_some();
        }
    }

    #[test]
    fn filter_pass_emits_span_with_counts() {
        let trace_state = Arc::new(Mutex::new(PassTraceState::default()));
        let subscriber = tracing_subscriber::registry().with(PassTraceCapture {
            state: Arc::clone(&trace_state),
        });
        let _guard = tracing::subscriber::set_default(subscriber);
        tracing::callsite::rebuild_interest_cache();

        let _ = JobListFilter::apply(&sample(), &FilterCriteria::new().query("engineer"));

        let snapshot = trace_state.lock().expect("pass trace state lock");
        assert!(snapshot.pass_seen, "expected job_filter.pass span");
        assert!(snapshot.has_total_field, "job_filter.pass missing total");
        assert!(snapshot.has_visible_field, "job_filter.pass missing visible");
        assert!(
            snapshot.has_query_active_field,
            "job_filter.pass missing query_active"
        );
    }
}
