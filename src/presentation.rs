//! Status presentation table
//!
//! Maps every [`BlueTickStatus`] to what the workflow screen shows and which
//! transitions it offers. The table is a `static`, indexed by the status enum,
//! so lookups never rebuild it. Text is stored as catalog key phrases and
//! resolved by the caller through [`Translate`].

use crate::i18n::{keys, Translate};
use crate::models::BlueTickStatus;

/// A phrase is a list of catalog keys joined with spaces when resolved
pub type Phrase = &'static [&'static str];

/// Visual variant of a status indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Active,
    Danger,
    Muted,
    Warning,
}

/// Icon, colours and label of a status badge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusBadge {
    pub icon: &'static str,
    pub background_class: &'static str,
    pub text_class: &'static str,
    pub tone: Tone,
    pub label: Phrase,
}

/// Button offered by the workflow screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionButton {
    pub label: Phrase,
    /// Status submitted when the action is confirmed
    pub target: BlueTickStatus,
    pub class_name: &'static str,
}

/// Copy of the modal that asks for a reason
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModalCopy {
    pub header: Phrase,
    pub body: Phrase,
    pub input_label: Phrase,
    pub submit_label: Phrase,
}

/// Everything the workflow screen derives from a status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusPresentation {
    pub status: BlueTickStatus,
    pub indicator: StatusBadge,
    /// Headline lines; empty hides the action area
    pub title: &'static [Phrase],
    pub modal: Option<ModalCopy>,
    pub confirm: Option<ActionButton>,
    pub reject: Option<ActionButton>,
}

impl StatusPresentation {
    pub fn has_title(&self) -> bool {
        !self.title.is_empty()
    }

    pub fn confirm_visible(&self) -> bool {
        self.has_title() && self.confirm.is_some()
    }

    pub fn reject_visible(&self) -> bool {
        self.has_title() && self.reject.is_some()
    }

    /// Resolved headline lines
    pub fn title_lines(&self, t: &dyn Translate) -> Vec<String> {
        self.title.iter().map(|phrase| t.phrase(phrase)).collect()
    }
}

const ACCEPTED_BADGE: StatusBadge = StatusBadge {
    icon: "FiCheck",
    background_class: "shadow-bg-active",
    text_class: "shadow-text-active",
    tone: Tone::Active,
    label: &[keys::ACCEPTED],
};

const REJECTED_BADGE: StatusBadge = StatusBadge {
    icon: "FiXOctagon",
    background_class: "shadow-bg-danger",
    text_class: "shadow-text-danger",
    tone: Tone::Danger,
    label: &[keys::REJECTED],
};

const CANCELED_BADGE: StatusBadge = StatusBadge {
    icon: "FiX",
    background_class: "shadow-bg-danger",
    text_class: "shadow-text-danger",
    tone: Tone::Danger,
    label: &[keys::CANCELED],
};

const NOT_REQUESTED_BADGE: StatusBadge = StatusBadge {
    icon: "FiMinus",
    background_class: "shadow-bg-notActive",
    text_class: "shadow-text-notActive",
    tone: Tone::Muted,
    label: &[keys::NOT, keys::REQUESTED],
};

const IN_PROGRESS_BADGE: StatusBadge = StatusBadge {
    icon: "FiLoader",
    background_class: "shadow-bg-warning",
    text_class: "shadow-text-warning",
    tone: Tone::Warning,
    label: &[keys::PENDING],
};

const BADGES: [StatusBadge; 5] = [
    ACCEPTED_BADGE,
    REJECTED_BADGE,
    CANCELED_BADGE,
    NOT_REQUESTED_BADGE,
    IN_PROGRESS_BADGE,
];

const REJECT_MODAL: ModalCopy = ModalCopy {
    header: &[keys::REJECT, keys::BLUE, keys::TICK],
    body: &[keys::REJECT_MODAL_BODY],
    input_label: &[keys::REJECT_MODAL_INPUT],
    submit_label: &[keys::REJECT],
};

const CANCEL_MODAL: ModalCopy = ModalCopy {
    header: &[keys::CANCEL, keys::BLUE, keys::TICK],
    body: &[keys::CANCEL_MODAL_BODY],
    input_label: &[keys::CANCEL_MODAL_INPUT],
    submit_label: &[keys::SUBMIT],
};

static TABLE: [StatusPresentation; 5] = [
    StatusPresentation {
        status: BlueTickStatus::Accepted,
        indicator: ACCEPTED_BADGE,
        title: &[&[keys::THIS_COMPANY_HAS_BLUE_TICK]],
        modal: None,
        confirm: None,
        reject: Some(ActionButton {
            label: &[keys::CANCEL, keys::BLUE, keys::TICK],
            target: BlueTickStatus::Canceled,
            class_name: "flex-grow-1",
        }),
    },
    StatusPresentation {
        status: BlueTickStatus::Rejected,
        indicator: REJECTED_BADGE,
        title: &[],
        modal: Some(REJECT_MODAL),
        confirm: None,
        reject: None,
    },
    StatusPresentation {
        status: BlueTickStatus::Canceled,
        indicator: CANCELED_BADGE,
        title: &[&[keys::CANCELED_BLUE_TICK_DESCRIPTION]],
        modal: Some(CANCEL_MODAL),
        confirm: None,
        reject: None,
    },
    StatusPresentation {
        status: BlueTickStatus::NotRequested,
        indicator: NOT_REQUESTED_BADGE,
        title: &[],
        modal: None,
        confirm: None,
        reject: None,
    },
    StatusPresentation {
        status: BlueTickStatus::InProgress,
        indicator: IN_PROGRESS_BADGE,
        title: &[
            &[keys::COMPANY_APPLIED, "."],
            &[keys::CONFIRM_ALL_CONDITIONS, "?"],
        ],
        modal: Some(REJECT_MODAL),
        confirm: Some(ActionButton {
            label: &[keys::CONFIRM],
            target: BlueTickStatus::Accepted,
            class_name: "shadow-bg-success",
        }),
        reject: Some(ActionButton {
            label: &[keys::REJECT],
            target: BlueTickStatus::Rejected,
            class_name: "shadow-bg-danger",
        }),
    },
];

/// Presentation entry of a status
pub fn for_status(status: BlueTickStatus) -> &'static StatusPresentation {
    &TABLE[status.index()]
}

/// Badge used by the company table
pub fn badge(status: BlueTickStatus) -> &'static StatusBadge {
    &BADGES[status.index()]
}

/// Modal copy for a reason-bearing transition into `target`
///
/// Only rejection and cancellation carry a reason; confirming into
/// `Accepted` uses the preview modal instead and yields `None`.
pub fn reason_modal(target: BlueTickStatus) -> Option<&'static ModalCopy> {
    match target {
        BlueTickStatus::Rejected | BlueTickStatus::Canceled => for_status(target).modal.as_ref(),
        _ => None,
    }
}

/// Whether moving from `from` to `to` is offered by this console
pub fn allows_transition(from: BlueTickStatus, to: BlueTickStatus) -> bool {
    let entry = for_status(from);
    [entry.confirm, entry.reject]
        .iter()
        .flatten()
        .any(|action| action.target == to)
}
