#![forbid(unsafe_code)]

//! WASM runner for the job board page.
//!
//! This crate provides `JobBoardRunner`, a `wasm-bindgen`-exported struct
//! that wraps [`runner_core::RunnerCore`] over the live document and exposes
//! it to JavaScript for host-driven execution. The runner core and the input
//! parser carry no JS types and also serve native hosts.

pub mod input;
pub mod runner_core;

#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use dom::{DomView, LocalStorageThemeStore};
#[cfg(target_arch = "wasm32")]
pub use wasm::JobBoardRunner;

pub use input::{BoardInput, parse_encoded_input};
pub use runner_core::{RunnerCore, StepResult, job_id_from_js};

#[cfg(test)]
mod tests {
    use crate::runner_core::{RunnerCore, StepResult, job_id_from_js};
    use jobboard_core::{
        AlertAction, AlertLevel, BoardConfig, MemoryThemeStore, MemoryView, Theme, ThemeStore,
    };
    use pretty_assertions::assert_eq;

    const LISTING: &str = r#"[
        {"id": 1, "title": "Data Analyst", "location": "Remote", "type": "Full-time"},
        {"id": 2, "title": "DevOps Engineer", "location": "NYC", "type": "Contract",
         "description": "Kubernetes and Terraform"},
        {"id": 3, "title": "Backend Engineer", "location": "San Francisco, CA",
         "type": "Full-time", "description": null}
    ]"#;

    fn runner() -> RunnerCore<MemoryView, MemoryThemeStore> {
        let mut core = RunnerCore::new(BoardConfig::default());
        assert!(core.load_records_json(LISTING));
        core.init(&[]);
        core.take_logs();
        core
    }

    #[test]
    fn search_burst_filters_once_after_debounce() {
        let mut core = runner();
        for value in ["e", "en", "eng", "engineer"] {
            assert!(core.push_encoded_input(&format!(r#"{{"kind":"search","value":"{value}"}}"#)));
            core.advance_time_ms(50.0);
        }
        let step = core.step();
        assert_eq!(
            step,
            StepResult {
                events_processed: 4,
                filtered: false,
                visible_count: None,
                pending: true,
            }
        );
        assert_eq!(core.take_visibility(), None);

        core.advance_time_ms(300.0);
        let step = core.step();
        assert!(step.filtered);
        assert_eq!(step.visible_count, Some(2));
        assert!(!step.pending);
        assert_eq!(core.take_visibility(), Some(vec![false, true, true]));
        assert_eq!(core.take_visibility(), None);
        assert_eq!(core.count_label().as_deref(), Some("2 jobs found"));
        assert_eq!(core.take_logs(), vec!["filter_pass: visible=2 total=3"]);
    }

    #[test]
    fn select_inputs_filter_immediately() {
        let mut core = runner();
        assert!(core.push_encoded_input(r#"{"kind":"location","value":"FRANCISCO"}"#));
        assert_eq!(core.take_visibility(), Some(vec![false, false, true]));

        assert!(core.push_encoded_input(r#"{"kind":"location","value":""}"#));
        assert!(core.push_encoded_input(r#"{"kind":"type","value":"full"}"#));
        assert_eq!(core.take_visibility(), Some(vec![true, false, true]));
        assert_eq!(core.count_label().as_deref(), Some("2 jobs found"));
    }

    #[test]
    fn controls_json_sets_all_criteria() {
        let mut core = runner();
        assert!(core.set_controls_json(r#"{"query":"engineer","type":"contract"}"#));
        assert_eq!(core.filter_now(), 1);
        assert_eq!(core.board().view().visible_titles(), vec!["DevOps Engineer"]);
    }

    #[test]
    fn malformed_input_is_rejected_and_logged() {
        let mut core = runner();
        assert!(!core.push_encoded_input(r#"{"kind":"scroll"}"#));
        assert!(!core.push_encoded_input("not json"));
        assert!(!core.load_records_json(r#"{"title":"not an array"}"#));
        let logs = core.take_logs();
        assert_eq!(logs.len(), 3);
        assert_eq!(logs[0], "input_rejected: unknown input kind: scroll");
        assert!(logs[1].starts_with("input_rejected: JSON error:"));
        assert!(logs[2].starts_with("records_rejected: JSON error:"));
        assert_eq!(core.step().events_processed, 0);
    }

    #[test]
    fn theme_toggle_persists_and_reports() {
        let store = MemoryThemeStore::new();
        let view = MemoryView::default();
        let mut core = RunnerCore::with_parts(view.clone(), store.clone(), BoardConfig::default());
        core.step();
        assert_eq!(view.theme(), Some(Theme::Light));

        assert!(core.push_encoded_input(r#"{"kind":"theme_toggle"}"#));
        assert_eq!(core.theme(), Theme::Dark);
        assert_eq!(store.get(), Some(Theme::Dark));
        assert_eq!(view.theme(), Some(Theme::Dark));

        assert!(core.push_encoded_input(r#"{"kind":"theme","theme":"dark"}"#));
        assert_eq!(store.writes(), 1);
        assert_eq!(
            core.take_logs(),
            vec!["init: theme=light page_alerts=0", "theme: dark"]
        );
    }

    #[test]
    fn page_alerts_fade_then_remove() {
        let mut core = RunnerCore::new(BoardConfig::default());
        let ids = core
            .init_json(
                r#"[{"level":"success","message":"Saved"},{"level":"danger","message":"Denied"}]"#,
            )
            .expect("page alerts should parse");
        assert_eq!(ids.len(), 2);

        core.set_time_ms(5_000.0);
        core.step();
        assert_eq!(core.take_alert_actions(), vec![AlertAction::Fade(ids[0])]);
        assert_eq!(core.next_deadline_ms(), Some(500.0));

        core.advance_time_ms(500.0);
        core.step();
        assert_eq!(core.take_alert_actions(), vec![AlertAction::Remove(ids[0])]);
        assert_eq!(core.next_deadline_ms(), None);
    }

    #[test]
    fn notifications_are_reported_then_expire() {
        let mut core = runner();
        assert!(core.push_encoded_input(r#"{"kind":"copied"}"#));
        assert!(core.push_encoded_input(r#"{"kind":"application_status","value":"reviewed"}"#));

        let alerts = core.take_new_alerts();
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].message, "Copied to clipboard!");
        assert_eq!(alerts[0].level, AlertLevel::Success);
        assert_eq!(alerts[1].message, "Application status updated to reviewed");
        assert!(core.take_new_alerts().is_empty());

        assert!(core.push_encoded_input(&format!(
            r#"{{"kind":"dismiss_alert","id":{}}}"#,
            alerts[0].id.get()
        )));
        assert_eq!(core.take_alert_actions(), vec![AlertAction::Remove(alerts[0].id)]);

        core.advance_time_ms(5_000.0);
        core.step();
        assert_eq!(core.take_alert_actions(), vec![AlertAction::Remove(alerts[1].id)]);
    }

    #[test]
    fn global_search_needs_three_characters() {
        let mut core = runner();
        assert!(core.push_encoded_input(r#"{"kind":"global_search","value":"qa"}"#));
        core.advance_time_ms(300.0);
        core.step();
        assert!(core.take_global_searches().is_empty());

        assert!(core.push_encoded_input(r#"{"kind":"global_search","value":"rust"}"#));
        core.advance_time_ms(300.0);
        core.step();
        assert_eq!(core.take_global_searches(), vec!["rust"]);
    }

    #[test]
    fn submitted_form_is_released_after_fallback() {
        let mut core = runner();
        assert!(core.push_encoded_input(r#"{"kind":"form_submit","form":"apply"}"#));
        assert!(core.push_encoded_input(r#"{"kind":"form_submit","form":"apply"}"#));
        assert_eq!(core.take_logs(), vec!["form_submit: apply"]);

        core.advance_time_ms(9_999.0);
        assert!(core.step().pending);
        assert!(core.take_released_forms().is_empty());

        core.advance_time_ms(1.0);
        assert!(!core.step().pending);
        assert_eq!(core.take_released_forms(), vec!["apply"]);
    }

    #[test]
    fn clock_ignores_invalid_host_time() {
        let mut core = runner();
        core.set_time_ms(1_000.0);
        core.advance_time_ms(f64::NAN);
        core.advance_time_ms(-5.0);
        core.set_time_ms(10.0);
        assert_eq!(core.now().as_millis(), 1_000);
    }

    #[test]
    fn share_builds_job_link() {
        let core = runner();
        let share = core.share("https://jobs.example.com", 3, "Backend Engineer");
        assert_eq!(share.url, "https://jobs.example.com/jobs/3/");
        assert_eq!(share.text, "Check out this job opportunity: Backend Engineer");
    }

    #[test]
    fn share_ids_must_be_whole_numbers() {
        assert_eq!(job_id_from_js(3.0), Some(3));
        assert_eq!(job_id_from_js(0.0), Some(0));
        assert_eq!(job_id_from_js(3.7), None);
        assert_eq!(job_id_from_js(-1.0), None);
        assert_eq!(job_id_from_js(f64::NAN), None);
        assert_eq!(job_id_from_js(f64::INFINITY), None);
        assert_eq!(job_id_from_js(1e20), None);
    }
}
