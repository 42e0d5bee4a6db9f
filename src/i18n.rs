//! Text resolution for screen copy
//!
//! Screens never hard-code user facing words. They resolve keys through a
//! [`Translate`] implementation handed to them by the caller, which keeps the
//! wording swappable (see [`Catalog::from_json_file`]).

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;

/// Catalog keys used across the console
pub mod keys {
    pub const ACCEPTED: &str = "accepted";
    pub const BLUE: &str = "blue";
    pub const BLUE_TICK_ACCEPT_DESCRIPTION: &str = "blueTickAcceptDescription";
    pub const CANCEL: &str = "cancel";
    pub const CANCELED: &str = "canceled";
    pub const CANCELED_BLUE_TICK_DESCRIPTION: &str = "canceledBlueTickDescription";
    pub const COMPANY: &str = "company";
    pub const COMPANY_APPLIED: &str = "companyApplied";
    pub const CONFIRM: &str = "confirm";
    pub const CONFIRM_ALL_CONDITIONS: &str = "confirmAllConditions";
    pub const DATE: &str = "date";
    pub const DESCRIPTION: &str = "description";
    pub const DETAIL: &str = "detail";
    pub const EMPTY: &str = "empty";
    pub const EMPTY_LIST: &str = "emptyList";
    pub const ENTER: &str = "enter";
    pub const HISTORY: &str = "history";
    pub const IS_LEADER: &str = "isLeader";
    pub const IS_STORE: &str = "isStore";
    pub const LIST: &str = "list";
    pub const NAME: &str = "name";
    pub const NO: &str = "no";
    pub const NOT: &str = "not";
    pub const PENDING: &str = "pending";
    pub const PLEASE: &str = "please";
    pub const REASONS: &str = "reasons";
    pub const REJECT: &str = "reject";
    pub const REJECTED: &str = "rejected";
    pub const REQUEST: &str = "request";
    pub const REQUESTED: &str = "requested";
    pub const STATUS: &str = "status";
    pub const SUBMIT: &str = "submit";
    pub const THIS_COMPANY_HAS_BLUE_TICK: &str = "thisCompanyHasBlueTick";
    pub const TICK: &str = "tick";
    pub const TICKET: &str = "ticket";
    pub const REJECT_MODAL_BODY: &str = "rejectBlueTickModalBody";
    pub const REJECT_MODAL_INPUT: &str = "rejectBlueTickModalInput";
    pub const CANCEL_MODAL_BODY: &str = "cancelBlueTickModalBody";
    pub const CANCEL_MODAL_INPUT: &str = "cancelBlueTickModalInput";
}

/// Built-in English wording
const ENGLISH: &[(&str, &str)] = &[
    (keys::ACCEPTED, "Accepted"),
    (keys::BLUE, "Blue"),
    (
        keys::BLUE_TICK_ACCEPT_DESCRIPTION,
        "By confirming, the company will be shown with a blue tick to all users",
    ),
    (keys::CANCEL, "Cancel"),
    (keys::CANCELED, "Canceled"),
    (
        keys::CANCELED_BLUE_TICK_DESCRIPTION,
        "Blue tick of this company has been canceled",
    ),
    (keys::COMPANY, "Company"),
    (keys::COMPANY_APPLIED, "Company applied"),
    (keys::CONFIRM, "Confirm"),
    (keys::CONFIRM_ALL_CONDITIONS, "Confirm all conditions"),
    (keys::DATE, "Date"),
    (keys::DESCRIPTION, "Description"),
    (keys::DETAIL, "Detail"),
    (keys::EMPTY, "Empty"),
    (keys::EMPTY_LIST, "Empty List"),
    (keys::ENTER, "Enter"),
    (keys::HISTORY, "History"),
    (keys::IS_LEADER, "Is Leader"),
    (keys::IS_STORE, "Is Store"),
    (keys::LIST, "List"),
    (keys::NAME, "Name"),
    (keys::NO, "No"),
    (keys::NOT, "Not"),
    (keys::PENDING, "Pending"),
    (keys::PLEASE, "Please"),
    (keys::REASONS, "Reasons"),
    (keys::REJECT, "Reject"),
    (keys::REJECTED, "Rejected"),
    (keys::REQUEST, "Request"),
    (keys::REQUESTED, "Requested"),
    (keys::STATUS, "Status"),
    (keys::SUBMIT, "Submit"),
    (keys::THIS_COMPANY_HAS_BLUE_TICK, "This company has blue tick"),
    (keys::TICK, "Tick"),
    (keys::TICKET, "Ticket"),
    (
        keys::REJECT_MODAL_BODY,
        "Please Enter the reasons for the Reject Blue Tick so that the company will be informed through the notification",
    ),
    (keys::REJECT_MODAL_INPUT, "Reasons for Reject Blue Tick"),
    (
        keys::CANCEL_MODAL_BODY,
        "Please Enter the reasons for the Cancel Blue Tick so that the company will be informed through the notification",
    ),
    (keys::CANCEL_MODAL_INPUT, "Reasons for Cancel Blue Tick"),
];

/// Resolves catalog keys to display text
pub trait Translate: Send + Sync {
    /// Text for a single key; unknown keys resolve to themselves
    fn text(&self, key: &str) -> String;

    /// Resolve every key and join the words with spaces
    fn phrase(&self, keys: &[&str]) -> String {
        keys.iter()
            .map(|key| self.text(key))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// In-memory key/text catalog
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: HashMap<String, String>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::english()
    }
}

impl Catalog {
    pub fn english() -> Self {
        Self {
            entries: ENGLISH
                .iter()
                .map(|(key, text)| (key.to_string(), text.to_string()))
                .collect(),
        }
    }

    /// English defaults overridden by a JSON object of `key -> text`
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read locale file: {}", path.display()))?;
        let overrides: HashMap<String, String> = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid locale file: {}", path.display()))?;

        let mut catalog = Self::english();
        catalog.entries.extend(overrides);
        Ok(catalog)
    }
}

impl Translate for Catalog {
    fn text(&self, key: &str) -> String {
        self.entries
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_phrase_joins_resolved_words() {
        let catalog = Catalog::english();
        assert_eq!(
            catalog.phrase(&[keys::CANCEL, keys::BLUE, keys::TICK]),
            "Cancel Blue Tick"
        );
        assert_eq!(catalog.text("missingKey"), "missingKey");
    }

    #[test]
    fn test_json_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "reject": "Ablehnen", "custom": "Eigen" }}"#).unwrap();

        let catalog = Catalog::from_json_file(file.path()).unwrap();
        assert_eq!(catalog.text(keys::REJECT), "Ablehnen");
        assert_eq!(catalog.text("custom"), "Eigen");
        assert_eq!(catalog.text(keys::CONFIRM), "Confirm");
    }

    #[test]
    fn test_invalid_locale_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(Catalog::from_json_file(file.path()).is_err());
    }
}
