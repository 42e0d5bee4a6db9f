//! Admin console for company blue tick verification
//!
//! The library holds the domain model, the GraphQL backend client, the two
//! headless screen controllers ([`listing`] and [`workflow`]) and the
//! terminal UI that drives them.

pub mod api;
pub mod cli;
pub mod config;
pub mod console_tui;
pub mod i18n;
pub mod listing;
pub mod models;
pub mod presentation;
pub mod workflow;
