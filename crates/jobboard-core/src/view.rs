#![forbid(unsafe_code)]

//! The page as seen by the board.
//!
//! [`JobBoardView`] is the collaborator boundary: the board reads filter
//! controls and rendered records through it at the start of every pass and
//! writes visibility, the count label, and the theme back. The browser host
//! implements it over the DOM; [`MemoryView`] implements it over plain data
//! for native hosts and tests.
//!
//! All methods take `&self`. Views are cheap handles onto shared page state,
//! which lets the board hand a clone to the theme subscriber.

use std::cell::RefCell;
use std::rc::Rc;

use crate::record::{FilterCriteria, JobRecord};
use crate::theme::Theme;

/// Page controls the host can write on the board's behalf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterControl {
    Search,
    Location,
    Type,
}

pub trait JobBoardView {
    /// Current control values. Absent controls read as empty.
    fn read_criteria(&self) -> FilterCriteria;

    /// Rendered records in page order.
    fn read_records(&self) -> Vec<JobRecord>;

    /// Show or hide the record at `index`.
    fn set_visible(&self, index: usize, visible: bool);

    /// Write a whole pass, `visibility[i]` for record `i`.
    ///
    /// Views that pay per lookup should override this to resolve their
    /// records once.
    fn set_visibility(&self, visibility: &[bool]) {
        for (index, visible) in visibility.iter().enumerate() {
            self.set_visible(index, *visible);
        }
    }

    fn set_count_label(&self, label: &str);

    fn apply_theme(&self, _theme: Theme) {}

    /// Overwrite a control's value. Views backed by live inputs may ignore it.
    fn write_control(&self, _control: FilterControl, _value: &str) {}
}

#[derive(Debug, Default)]
struct MemoryViewState {
    records: Vec<JobRecord>,
    criteria: FilterCriteria,
    count_label: Option<String>,
    theme: Option<Theme>,
    visibility_writes: u64,
}

/// In-memory page.
///
/// Clones share state, like a DOM handle would.
#[derive(Debug, Clone, Default)]
pub struct MemoryView {
    state: Rc<RefCell<MemoryViewState>>,
}

impl MemoryView {
    #[must_use]
    pub fn new(records: Vec<JobRecord>) -> Self {
        let view = Self::default();
        view.state.borrow_mut().records = records;
        view
    }

    pub fn set_records(&self, records: Vec<JobRecord>) {
        self.state.borrow_mut().records = records;
    }

    pub fn set_criteria(&self, criteria: FilterCriteria) {
        self.state.borrow_mut().criteria = criteria;
    }

    pub fn set_query(&self, query: impl Into<String>) {
        self.state.borrow_mut().criteria.query = query.into();
    }

    pub fn set_location(&self, location: impl Into<String>) {
        self.state.borrow_mut().criteria.location = location.into();
    }

    pub fn set_type(&self, job_type: impl Into<String>) {
        self.state.borrow_mut().criteria.job_type = job_type.into();
    }

    #[must_use]
    pub fn records(&self) -> Vec<JobRecord> {
        self.state.borrow().records.clone()
    }

    #[must_use]
    pub fn visibility(&self) -> Vec<bool> {
        self.state.borrow().records.iter().map(|r| r.visible).collect()
    }

    /// Titles of the records currently shown.
    #[must_use]
    pub fn visible_titles(&self) -> Vec<String> {
        self.state
            .borrow()
            .records
            .iter()
            .filter(|r| r.visible)
            .map(|r| r.title.clone())
            .collect()
    }

    #[must_use]
    pub fn count_label(&self) -> Option<String> {
        self.state.borrow().count_label.clone()
    }

    #[must_use]
    pub fn theme(&self) -> Option<Theme> {
        self.state.borrow().theme
    }

    #[must_use]
    pub fn visibility_writes(&self) -> u64 {
        self.state.borrow().visibility_writes
    }
}

impl JobBoardView for MemoryView {
    fn read_criteria(&self) -> FilterCriteria {
        self.state.borrow().criteria.clone()
    }

    fn read_records(&self) -> Vec<JobRecord> {
        self.records()
    }

    fn set_visible(&self, index: usize, visible: bool) {
        let mut state = self.state.borrow_mut();
        if let Some(record) = state.records.get_mut(index) {
            record.visible = visible;
            state.visibility_writes += 1;
        }
    }

    fn set_count_label(&self, label: &str) {
        self.state.borrow_mut().count_label = Some(label.to_string());
    }

    fn apply_theme(&self, theme: Theme) {
        self.state.borrow_mut().theme = Some(theme);
    }

    fn write_control(&self, control: FilterControl, value: &str) {
        match control {
            FilterControl::Search => self.set_query(value),
            FilterControl::Location => self.set_location(value),
            FilterControl::Type => self.set_type(value),
        }
    }
}
