//! Screen implementations for the console TUI

pub mod blue_tick;
pub mod companies;

pub use blue_tick::BlueTickScreen;
pub use companies::CompaniesScreen;

use crate::listing::FetchTicket;
use crate::models::CompanyListQuery;
use crate::workflow::{RefreshTicket, SubmitTicket, WorkflowTarget};

/// Actions returned from screen event handling
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenAction {
    /// Fetch a company page in the background
    FetchCompanies(FetchTicket, CompanyListQuery),
    /// Open the workflow screen
    OpenBlueTick(WorkflowTarget),
    /// Fetch a blue tick record in the background
    FetchBlueTick(RefreshTicket),
    /// Send a status change in the background
    SubmitBlueTick(SubmitTicket),
    /// Go back to the listing
    NavigateBack,
    /// Set status message
    SetStatus(String),
    /// Set success message
    SetSuccess(String),
    /// Set error message
    SetError(String),
    /// Several actions in order
    Batch(Vec<ScreenAction>),
    /// No action taken
    None,
}
