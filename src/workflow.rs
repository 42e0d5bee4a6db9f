//! Blue tick workflow state for a single company
//!
//! The screen shows the company's current status, the actions the
//! presentation table allows for it, and a modal that collects the reason for
//! a rejection or cancellation before the status change is submitted.
//! Like the listing, remote calls are split into `begin_*` / `finish_*` (or
//! `apply_*`) halves joined by tickets, and late results are ignored.

use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::api::{ApiError, CompanyApi};
use crate::i18n::{keys, Translate};
use crate::listing::LoadState;
use crate::models::{BlueTickAction, BlueTickDetails, BlueTickStatus, CompanyId, HistoryLogEntry};
use crate::presentation::{self, ModalCopy, StatusPresentation};

/// Route segment that opens an empty request
pub const NEW_ROUTE_SEGMENT: &str = "new";

#[derive(Error, Debug, PartialEq)]
#[error("Invalid blue tick route segment: '{0}'")]
pub struct RouteError(pub String);

#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("{field}: {message}")]
    Validation { field: &'static str, message: String },

    #[error("A status change is already being submitted")]
    SubmissionInFlight,

    #[error("No action is open")]
    NoOpenAction,

    #[error("{from} blue tick cannot be changed to {to}")]
    ActionUnavailable {
        from: BlueTickStatus,
        to: BlueTickStatus,
    },

    #[error("{0} blue tick offers no such action")]
    NoActionOffered(BlueTickStatus),

    #[error("A new request has no company to update")]
    NoTarget,

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Which request the workflow screen works on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowTarget {
    New,
    Existing(CompanyId),
}

impl WorkflowTarget {
    pub fn company_id(&self) -> Option<CompanyId> {
        match self {
            WorkflowTarget::New => None,
            WorkflowTarget::Existing(id) => Some(*id),
        }
    }
}

impl FromStr for WorkflowTarget {
    type Err = RouteError;

    fn from_str(segment: &str) -> Result<Self, Self::Err> {
        let segment = segment.trim();
        if segment.eq_ignore_ascii_case(NEW_ROUTE_SEGMENT) {
            return Ok(WorkflowTarget::New);
        }
        match segment.parse::<i64>() {
            Ok(id) if id > 0 => Ok(WorkflowTarget::Existing(CompanyId(id))),
            _ => Err(RouteError(segment.to_string())),
        }
    }
}

/// Open confirmation modal
#[derive(Debug, Clone, PartialEq)]
pub struct ActionModal {
    /// Status submitted on confirmation
    pub target: BlueTickStatus,
    pub reason: String,
    /// Field-level validation message
    pub reason_error: Option<String>,
    /// Message of the last failed submission
    pub submit_error: Option<String>,
    pub loading: bool,
}

impl ActionModal {
    fn new(target: BlueTickStatus) -> Self {
        Self {
            target,
            reason: String::new(),
            reason_error: None,
            submit_error: None,
            loading: false,
        }
    }

    /// Copy of the reason form, `None` for the accept preview
    pub fn reason_copy(&self) -> Option<&'static ModalCopy> {
        presentation::reason_modal(self.target)
    }

    pub fn requires_reason(&self) -> bool {
        self.reason_copy().is_some()
    }
}

/// Receipt for an in-flight record fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTicket {
    generation: u64,
    pub company_id: CompanyId,
}

/// Receipt for an in-flight status change
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitTicket {
    generation: u64,
    pub action: BlueTickAction,
}

/// Result of applying a submission response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Status changed locally; the record should be fetched again
    Applied(BlueTickStatus),
    /// The screen moved on before the response arrived
    Stale,
}

/// Local state of the blue tick screen
#[derive(Debug)]
pub struct BlueTickWorkflow {
    target: WorkflowTarget,
    load_state: LoadState,
    details: BlueTickDetails,
    current_status: BlueTickStatus,
    modal: Option<ActionModal>,
    in_flight: bool,
    load_generation: u64,
    submit_generation: u64,
}

impl BlueTickWorkflow {
    pub fn new(target: WorkflowTarget) -> Self {
        let load_state = match target {
            WorkflowTarget::New => LoadState::Ready,
            WorkflowTarget::Existing(_) => LoadState::Loading,
        };

        Self {
            target,
            load_state,
            details: BlueTickDetails::default(),
            current_status: BlueTickStatus::NotRequested,
            modal: None,
            in_flight: false,
            load_generation: 0,
            submit_generation: 0,
        }
    }

    pub fn target(&self) -> WorkflowTarget {
        self.target
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn details(&self) -> &BlueTickDetails {
        &self.details
    }

    pub fn history(&self) -> &[HistoryLogEntry] {
        self.details.logs()
    }

    pub fn current_status(&self) -> BlueTickStatus {
        self.current_status
    }

    pub fn presentation(&self) -> &'static StatusPresentation {
        presentation::for_status(self.current_status)
    }

    pub fn modal(&self) -> Option<&ActionModal> {
        self.modal.as_ref()
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight
    }

    /// Start fetching the record; `None` for a new request
    pub fn begin_refresh(&mut self) -> Option<RefreshTicket> {
        let company_id = self.target.company_id()?;
        if self.load_state != LoadState::Ready {
            self.load_state = LoadState::Loading;
        }
        self.load_generation += 1;
        debug!("Blue tick fetch #{} for company {}", self.load_generation, company_id);
        Some(RefreshTicket {
            generation: self.load_generation,
            company_id,
        })
    }

    /// Apply a record fetch; returns `false` when the ticket is stale
    pub fn apply_refresh(
        &mut self,
        ticket: RefreshTicket,
        result: Result<BlueTickDetails, ApiError>,
    ) -> bool {
        if ticket.generation != self.load_generation {
            debug!("Dropping stale blue tick fetch #{}", ticket.generation);
            return false;
        }

        match result {
            Ok(details) => {
                self.current_status = details.status();
                self.details = details;
                self.load_state = LoadState::Ready;
            }
            Err(e) => {
                warn!("Blue tick fetch for company {} failed: {}", ticket.company_id, e);
                self.load_state = LoadState::Failed(e.to_string());
            }
        }
        true
    }

    /// Open the accept preview for the current status
    pub fn open_confirm(&mut self) -> Result<(), WorkflowError> {
        let action = self.presentation().confirm.filter(|_| self.presentation().confirm_visible());
        self.open(action.map(|a| a.target))
    }

    /// Open the reject or cancel form for the current status
    pub fn open_reject(&mut self) -> Result<(), WorkflowError> {
        let action = self.presentation().reject.filter(|_| self.presentation().reject_visible());
        self.open(action.map(|a| a.target))
    }

    fn open(&mut self, target: Option<BlueTickStatus>) -> Result<(), WorkflowError> {
        if self.in_flight {
            return Err(WorkflowError::SubmissionInFlight);
        }
        let target = target.ok_or(WorkflowError::NoActionOffered(self.current_status))?;
        self.modal = Some(ActionModal::new(target));
        Ok(())
    }

    pub fn set_reason(&mut self, reason: &str) {
        if let Some(modal) = self.modal.as_mut() {
            modal.reason = reason.to_string();
            modal.reason_error = None;
        }
    }

    /// Close the modal; refused while its submission is pending
    pub fn close_modal(&mut self) -> bool {
        if self.in_flight {
            return false;
        }
        self.modal = None;
        true
    }

    /// Validate the open modal and lock it for submission
    pub fn begin_submit(&mut self, t: &dyn Translate) -> Result<SubmitTicket, WorkflowError> {
        if self.in_flight {
            return Err(WorkflowError::SubmissionInFlight);
        }
        let company_id = self.target.company_id().ok_or(WorkflowError::NoTarget)?;
        let current_status = self.current_status;
        let modal = self.modal.as_mut().ok_or(WorkflowError::NoOpenAction)?;

        if !presentation::allows_transition(current_status, modal.target) {
            return Err(WorkflowError::ActionUnavailable {
                from: current_status,
                to: modal.target,
            });
        }

        let description = if modal.requires_reason() {
            let reason = modal.reason.trim();
            if reason.is_empty() {
                let message = t.phrase(&[keys::PLEASE, keys::ENTER, keys::REASONS]);
                modal.reason_error = Some(message.clone());
                return Err(WorkflowError::Validation {
                    field: "reason",
                    message,
                });
            }
            reason.to_string()
        } else {
            String::new()
        };

        modal.loading = true;
        modal.submit_error = None;
        self.in_flight = true;
        self.submit_generation += 1;

        Ok(SubmitTicket {
            generation: self.submit_generation,
            action: BlueTickAction {
                company_id,
                status: modal.target,
                description,
            },
        })
    }

    /// Apply the mutation response of a submission
    pub fn finish_submit(
        &mut self,
        ticket: SubmitTicket,
        result: Result<(), ApiError>,
    ) -> Result<SubmitOutcome, WorkflowError> {
        if ticket.generation != self.submit_generation || !self.in_flight {
            debug!("Dropping stale blue tick submission #{}", ticket.generation);
            return Ok(SubmitOutcome::Stale);
        }
        self.in_flight = false;

        match result {
            Ok(()) => {
                info!(
                    "Blue tick of company {} changed to {}",
                    ticket.action.company_id, ticket.action.status
                );
                self.current_status = ticket.action.status;
                self.modal = None;
                Ok(SubmitOutcome::Applied(ticket.action.status))
            }
            Err(e) => {
                warn!("Blue tick submission failed: {}", e);
                if let Some(modal) = self.modal.as_mut() {
                    modal.loading = false;
                    modal.submit_error = Some(e.to_string());
                }
                Err(WorkflowError::Api(e))
            }
        }
    }

    /// Forget every in-flight call, e.g. when the screen is left
    pub fn invalidate(&mut self) {
        self.load_generation += 1;
        self.submit_generation += 1;
        self.in_flight = false;
        if let Some(modal) = self.modal.as_mut() {
            modal.loading = false;
        }
    }

    /// Fetch the record and apply it
    pub async fn refresh(&mut self, api: &dyn CompanyApi) {
        if let Some(ticket) = self.begin_refresh() {
            let result = api.get_blue_tick(ticket.company_id).await;
            self.apply_refresh(ticket, result);
        }
    }

    /// Submit the open modal, then re-fetch the record once on success
    pub async fn submit(
        &mut self,
        api: &dyn CompanyApi,
        t: &dyn Translate,
    ) -> Result<BlueTickStatus, WorkflowError> {
        let ticket = self.begin_submit(t)?;
        let result = api.submit_blue_tick_action(&ticket.action).await;
        match self.finish_submit(ticket, result)? {
            SubmitOutcome::Applied(status) => {
                self.refresh(api).await;
                Ok(status)
            }
            SubmitOutcome::Stale => Ok(self.current_status),
        }
    }
}
