//! Events delivered to the TUI loop by background tasks

use crate::api::ApiError;
use crate::listing::FetchTicket;
use crate::models::{BlueTickDetails, CompanyPage};
use crate::workflow::{RefreshTicket, SubmitTicket};

/// Completion of a remote call started by a screen
#[derive(Debug)]
pub enum AppEvent {
    /// Company list fetch finished
    CompaniesLoaded {
        ticket: FetchTicket,
        result: Result<CompanyPage, ApiError>,
    },
    /// Blue tick record fetch finished
    BlueTickLoaded {
        ticket: RefreshTicket,
        result: Result<BlueTickDetails, ApiError>,
    },
    /// Status change mutation finished
    BlueTickSubmitted {
        ticket: SubmitTicket,
        result: Result<(), ApiError>,
    },
}
