#![forbid(unsafe_code)]

//! Job records and the criteria a filter pass matches them against.
//!
//! Both types deserialize leniently: a missing or `null` text field becomes
//! the empty string, so a half-rendered job card never fails a pass.

use serde::{Deserialize, Deserializer, Serialize};

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

const fn visible_by_default() -> bool {
    true
}

/// One job entry as rendered on the page.
///
/// Records are held in page order. A filter pass only toggles `visible`; it
/// never reorders or drops entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    /// Posting id, when the card carries one (used for share links).
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub location: String,
    #[serde(rename = "type", alias = "job_type", default, deserialize_with = "null_as_empty")]
    pub job_type: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    /// Derived by the last filter pass. Freshly rendered cards are visible.
    #[serde(default = "visible_by_default")]
    pub visible: bool,
}

impl Default for JobRecord {
    fn default() -> Self {
        Self {
            id: None,
            title: String::new(),
            location: String::new(),
            job_type: String::new(),
            description: String::new(),
            visible: true,
        }
    }
}

impl JobRecord {
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        location: impl Into<String>,
        job_type: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            location: location.into(),
            job_type: job_type.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    /// Parse a JSON array of records.
    pub fn list_from_json(json: &str) -> crate::Result<Vec<Self>> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Active filter inputs, rebuilt from the page controls on every pass.
///
/// All three fields are case-insensitive substring matches. Only an empty
/// control matches everything; whitespace is matched like any other text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub query: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub location: String,
    #[serde(rename = "type", alias = "job_type", default, deserialize_with = "null_as_empty")]
    pub job_type: String,
}

impl FilterCriteria {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    #[must_use]
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    #[must_use]
    pub fn job_type(mut self, job_type: impl Into<String>) -> Self {
        self.job_type = job_type.into();
        self
    }

    /// True when no control narrows the list.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.query.is_empty() && self.location.is_empty() && self.job_type.is_empty()
    }

    /// Whether `record` passes these criteria.
    ///
    /// Lowercases the criteria on every call. A full pass should go through
    /// [`crate::filter::JobListFilter::apply`], which lowercases them once.
    #[must_use]
    pub fn matches(&self, record: &JobRecord) -> bool {
        crate::filter::Needles::new(self).matches(record)
    }
}
