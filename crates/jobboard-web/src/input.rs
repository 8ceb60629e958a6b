#![forbid(unsafe_code)]

//! JSON input parser for page events forwarded by the browser host.
//!
//! The host serializes every DOM event it cares about into a small JSON
//! object keyed by `kind`:
//!
//! | `kind` | Fields | Page event |
//! |--------|--------|------------|
//! | `search` | `value` | `input` on `#jobSearch` |
//! | `location` | `value` | `change` on `#locationFilter` |
//! | `type` | `value` | `change` on `#typeFilter` |
//! | `theme_toggle` | | click on `.theme-toggle` |
//! | `theme` | `theme` | explicit theme choice |
//! | `global_search` | `value` | `input` on `#globalSearch` |
//! | `dismiss_alert` | `id` | close button on an alert |
//! | `copied` | | clipboard write finished |
//! | `application_status` | `value` | status `<select>` changed |
//! | `form_submit` | `form` | a valid form was submitted |
//!
//! The parser has no DOM dependency, so it is exercised natively.

use jobboard_core::{AlertId, BoardError, Result, Theme};
use serde::Deserialize;

/// A decoded page event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardInput {
    Search(String),
    Location(String),
    Type(String),
    ThemeToggle,
    SetTheme(Theme),
    GlobalSearch(String),
    DismissAlert(AlertId),
    Copied,
    ApplicationStatus(String),
    FormSubmit(String),
}

#[derive(Debug, Deserialize)]
struct RawInput {
    kind: String,
    #[serde(default)]
    value: Option<String>,
    #[serde(default)]
    theme: Option<String>,
    #[serde(default)]
    id: Option<AlertId>,
    #[serde(default)]
    form: Option<String>,
}

fn required<T>(field: Option<T>, kind: &str, name: &'static str) -> Result<T> {
    field.ok_or_else(|| BoardError::missing_field(kind, name))
}

/// Parse one encoded page event.
///
/// Malformed JSON, unknown kinds, and missing fields are errors.
pub fn parse_encoded_input(json: &str) -> Result<BoardInput> {
    let RawInput {
        kind,
        value,
        theme,
        id,
        form,
    } = serde_json::from_str(json)?;

    let input = match kind.as_str() {
        "search" => BoardInput::Search(required(value, &kind, "value")?),
        "location" => BoardInput::Location(required(value, &kind, "value")?),
        "type" => BoardInput::Type(required(value, &kind, "value")?),
        "theme_toggle" => BoardInput::ThemeToggle,
        "theme" => BoardInput::SetTheme(required(theme, &kind, "theme")?.parse()?),
        "global_search" => BoardInput::GlobalSearch(required(value, &kind, "value")?),
        "dismiss_alert" => BoardInput::DismissAlert(required(id, &kind, "id")?),
        "copied" => BoardInput::Copied,
        "application_status" => BoardInput::ApplicationStatus(required(value, &kind, "value")?),
        "form_submit" => BoardInput::FormSubmit(required(form, &kind, "form")?),
        other => return Err(BoardError::unknown_input(other)),
    };
    Ok(input)
}
