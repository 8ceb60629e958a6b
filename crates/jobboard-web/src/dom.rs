#![forbid(unsafe_code)]

//! `web-sys` bindings for the board's collaborators.
//!
//! [`DomView`] reads the filter controls and job cards straight from the
//! document on every pass and writes `style.display` and the count label
//! back. [`LocalStorageThemeStore`] persists the theme under the `"theme"`
//! key. Only compiled on `wasm32` targets.

use jobboard_core::theme::THEME_STORAGE_KEY;
use jobboard_core::{FilterCriteria, JobBoardView, JobRecord, Theme, ThemeStore};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlInputElement, HtmlSelectElement, Storage};

const SEARCH_INPUT_ID: &str = "jobSearch";
const LOCATION_FILTER_ID: &str = "locationFilter";
const TYPE_FILTER_ID: &str = "typeFilter";
const COUNT_LABEL_ID: &str = "jobCount";
const JOB_CARD_SELECTOR: &str = ".job-card";
const THEME_TOGGLE_SELECTOR: &str = ".theme-toggle";
const THEME_ATTRIBUTE: &str = "data-bs-theme";

fn child_text(card: &Element, selector: &str) -> String {
    card.query_selector(selector)
        .ok()
        .flatten()
        .and_then(|el| el.text_content())
        .unwrap_or_default()
}

fn show_card(card: &Element, visible: bool) {
    let Some(card) = card.dyn_ref::<HtmlElement>() else {
        return;
    };
    let display = if visible { "block" } else { "none" };
    let _ = card.style().set_property("display", display);
}

/// The live job listing page.
#[derive(Debug, Clone)]
pub struct DomView {
    document: Document,
}

impl DomView {
    #[must_use]
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    #[must_use]
    pub fn from_window() -> Option<Self> {
        web_sys::window()?.document().map(Self::new)
    }

    /// Value of an `<input>` or `<select>` by id; absent controls read as empty.
    fn control_value(&self, id: &str) -> String {
        let Some(el) = self.document.get_element_by_id(id) else {
            return String::new();
        };
        if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
            return input.value();
        }
        if let Some(select) = el.dyn_ref::<HtmlSelectElement>() {
            return select.value();
        }
        String::new()
    }

    fn cards(&self) -> Vec<Element> {
        let Ok(list) = self.document.query_selector_all(JOB_CARD_SELECTOR) else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }
}

impl JobBoardView for DomView {
    fn read_criteria(&self) -> FilterCriteria {
        FilterCriteria::new()
            .query(self.control_value(SEARCH_INPUT_ID))
            .location(self.control_value(LOCATION_FILTER_ID))
            .job_type(self.control_value(TYPE_FILTER_ID))
    }

    fn read_records(&self) -> Vec<JobRecord> {
        self.cards()
            .iter()
            .map(|card| {
                let record = JobRecord::new(
                    child_text(card, ".job-title"),
                    child_text(card, ".job-location"),
                    child_text(card, ".job-type-badge"),
                )
                .with_description(child_text(card, ".job-description"));
                match card
                    .get_attribute("data-job-id")
                    .and_then(|id| id.trim().parse().ok())
                {
                    Some(id) => record.with_id(id),
                    None => record,
                }
            })
            .collect()
    }

    fn set_visible(&self, index: usize, visible: bool) {
        if let Some(card) = self.cards().get(index) {
            show_card(card, visible);
        }
    }

    fn set_visibility(&self, visibility: &[bool]) {
        for (card, visible) in self.cards().iter().zip(visibility) {
            show_card(card, *visible);
        }
    }

    fn set_count_label(&self, label: &str) {
        if let Some(el) = self.document.get_element_by_id(COUNT_LABEL_ID) {
            el.set_text_content(Some(label));
        }
    }

    fn apply_theme(&self, theme: Theme) {
        if let Some(root) = self.document.document_element() {
            let _ = root.set_attribute(THEME_ATTRIBUTE, theme.as_str());
        }
        if let Ok(Some(toggle)) = self.document.query_selector(THEME_TOGGLE_SELECTOR) {
            toggle.set_inner_html(theme.toggle_icon());
            if let Some(toggle) = toggle.dyn_ref::<HtmlElement>() {
                toggle.set_title(&theme.toggle_hint());
            }
        }
    }
}

/// Theme preference in `window.localStorage`.
///
/// Storage can be unavailable (private browsing, sandboxed frames); the store
/// then reads nothing and drops writes.
#[derive(Debug, Clone, Default)]
pub struct LocalStorageThemeStore {
    storage: Option<Storage>,
}

impl LocalStorageThemeStore {
    #[must_use]
    pub fn new(storage: Option<Storage>) -> Self {
        Self { storage }
    }

    #[must_use]
    pub fn from_window() -> Self {
        let storage = web_sys::window().and_then(|window| window.local_storage().ok().flatten());
        Self::new(storage)
    }
}

impl ThemeStore for LocalStorageThemeStore {
    fn get(&self) -> Option<Theme> {
        self.storage
            .as_ref()?
            .get_item(THEME_STORAGE_KEY)
            .ok()
            .flatten()
            .and_then(|value| value.parse().ok())
    }

    fn set(&mut self, theme: Theme) {
        if let Some(storage) = &self.storage {
            let _ = storage.set_item(THEME_STORAGE_KEY, theme.as_str());
        }
    }
}
