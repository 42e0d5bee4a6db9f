//! Remote data access for the console
//!
//! Screens talk to the backend only through [`CompanyApi`], which is handed
//! to them explicitly. [`GraphqlClient`] is the HTTP implementation used by
//! the binaries.

pub mod client;
pub mod errors;
pub mod types;

#[cfg(test)]
pub(crate) mod fake;

pub use client::GraphqlClient;
pub use errors::ApiError;

use async_trait::async_trait;

use crate::models::{BlueTickAction, BlueTickDetails, CompanyId, CompanyListQuery, CompanyPage};

/// Typed contract of the company backend
#[async_trait]
pub trait CompanyApi: Send + Sync {
    /// Fetch one page of companies
    async fn list_companies(&self, query: &CompanyListQuery) -> Result<CompanyPage, ApiError>;

    /// Fetch the blue tick record of one company
    async fn get_blue_tick(&self, company_id: CompanyId) -> Result<BlueTickDetails, ApiError>;

    /// Submit a blue tick status change
    async fn submit_blue_tick_action(&self, action: &BlueTickAction) -> Result<(), ApiError>;
}
