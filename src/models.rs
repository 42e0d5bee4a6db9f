//! Domain records shared by the listing and blue tick screens

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Placeholder shown wherever a value is missing
pub const EMPTY_DESCRIPTION: &str = "-";

/// Rows-per-page choices offered by the company table
pub const ROWS_PER_PAGE_OPTIONS: [u32; 4] = [50, 60, 70, 80];

/// Remote identifier of a company
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompanyId(pub i64);

impl fmt::Display for CompanyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Verification state of a company's blue tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlueTickStatus {
    Accepted,
    Rejected,
    Canceled,
    NotRequested,
    InProgress,
}

impl BlueTickStatus {
    pub const ALL: [BlueTickStatus; 5] = [
        BlueTickStatus::Accepted,
        BlueTickStatus::Rejected,
        BlueTickStatus::Canceled,
        BlueTickStatus::NotRequested,
        BlueTickStatus::InProgress,
    ];

    /// Value sent over the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            BlueTickStatus::Accepted => "ACCEPTED",
            BlueTickStatus::Rejected => "REJECTED",
            BlueTickStatus::Canceled => "CANCELED",
            BlueTickStatus::NotRequested => "NOT_REQUESTED",
            BlueTickStatus::InProgress => "IN_PROGRESS",
        }
    }

    /// Human readable name used in history rows and badges
    pub fn label(&self) -> &'static str {
        match self {
            BlueTickStatus::Accepted => "Accepted",
            BlueTickStatus::Rejected => "Rejected",
            BlueTickStatus::Canceled => "Canceled",
            BlueTickStatus::NotRequested => "Not Requested",
            BlueTickStatus::InProgress => "In Progress",
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            BlueTickStatus::Accepted => 0,
            BlueTickStatus::Rejected => 1,
            BlueTickStatus::Canceled => 2,
            BlueTickStatus::NotRequested => 3,
            BlueTickStatus::InProgress => 4,
        }
    }
}

impl fmt::Display for BlueTickStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for BlueTickStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "accepted" => Ok(BlueTickStatus::Accepted),
            "rejected" => Ok(BlueTickStatus::Rejected),
            "canceled" | "cancelled" => Ok(BlueTickStatus::Canceled),
            "not-requested" => Ok(BlueTickStatus::NotRequested),
            "in-progress" | "pending" => Ok(BlueTickStatus::InProgress),
            other => Err(format!("Unknown blue tick status: {}", other)),
        }
    }
}

/// One row of the company list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: CompanyId,
    pub company_name: String,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(rename = "verifiedForRehber", default)]
    pub verified_for_leader: bool,
    #[serde(default)]
    pub verified_for_store: bool,
    #[serde(default)]
    pub blue_mark: Option<BlueTickRecord>,
}

impl Company {
    /// Current blue tick status, `NotRequested` when the company has no record
    pub fn blue_tick_status(&self) -> BlueTickStatus {
        self.blue_mark
            .as_ref()
            .map(|record| record.status)
            .unwrap_or(BlueTickStatus::NotRequested)
    }
}

/// Verification record embedded in a company
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlueTickRecord {
    pub status: BlueTickStatus,
    #[serde(default)]
    pub logs: Vec<HistoryLogEntry>,
}

/// Single entry of the request history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryLogEntry {
    pub id: i64,
    pub status: BlueTickStatus,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl HistoryLogEntry {
    /// Last update time, falling back to creation time
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.updated_at.or(self.created_at)
    }

    pub fn display_date(&self) -> String {
        self.timestamp()
            .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| EMPTY_DESCRIPTION.to_string())
    }

    pub fn display_description(&self) -> &str {
        match self.description.as_deref() {
            Some(text) if !text.trim().is_empty() => text,
            _ => EMPTY_DESCRIPTION,
        }
    }
}

/// Verification record of one company as returned by the detail query
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlueTickDetails {
    #[serde(default)]
    pub blue_mark: Option<BlueTickRecord>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
}

impl BlueTickDetails {
    pub fn status(&self) -> BlueTickStatus {
        self.blue_mark
            .as_ref()
            .map(|record| record.status)
            .unwrap_or(BlueTickStatus::NotRequested)
    }

    pub fn logs(&self) -> &[HistoryLogEntry] {
        self.blue_mark
            .as_ref()
            .map(|record| record.logs.as_slice())
            .unwrap_or(&[])
    }
}

/// Server-side filter applied to the company list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompanyFilter {
    Status(BlueTickStatus),
    Leader,
    Store,
}

impl CompanyFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompanyFilter::Status(status) => status.as_str(),
            CompanyFilter::Leader => "isLeader",
            CompanyFilter::Store => "isStore",
        }
    }
}

impl FromStr for CompanyFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "leader" | "isleader" => Ok(CompanyFilter::Leader),
            "store" | "isstore" => Ok(CompanyFilter::Store),
            other => other
                .parse::<BlueTickStatus>()
                .map(CompanyFilter::Status)
                .map_err(|_| format!("Unknown company filter: {}", s)),
        }
    }
}

/// Parameters of a company list fetch
#[derive(Debug, Clone, PartialEq)]
pub struct CompanyListQuery {
    pub search: Option<String>,
    /// 1-based page number
    pub page: u32,
    pub size: u32,
    pub filter: Option<CompanyFilter>,
}

impl Default for CompanyListQuery {
    fn default() -> Self {
        Self {
            search: None,
            page: 1,
            size: ROWS_PER_PAGE_OPTIONS[0],
            filter: None,
        }
    }
}

/// One page of companies plus the total number of matches
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CompanyPage {
    #[serde(default)]
    pub data: Vec<Company>,
    #[serde(default)]
    pub count: u64,
}

/// Status change submitted for a company
#[derive(Debug, Clone, PartialEq)]
pub struct BlueTickAction {
    pub company_id: CompanyId,
    pub status: BlueTickStatus,
    pub description: String,
}
