//! Recording in-memory backend used by unit tests

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use super::{ApiError, CompanyApi};
use crate::models::{
    BlueTickAction, BlueTickDetails, BlueTickRecord, BlueTickStatus, Company, CompanyId,
    CompanyListQuery, CompanyPage,
};

#[derive(Default)]
pub(crate) struct FakeApi {
    pub list_calls: Mutex<Vec<CompanyListQuery>>,
    pub detail_calls: Mutex<Vec<CompanyId>>,
    pub actions: Mutex<Vec<BlueTickAction>>,
    list_responses: Mutex<VecDeque<Result<CompanyPage, ApiError>>>,
    details: Mutex<BlueTickDetails>,
    detail_failures: Mutex<VecDeque<ApiError>>,
    action_failures: Mutex<VecDeque<ApiError>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_details(status: BlueTickStatus) -> Self {
        let fake = Self::new();
        *fake.details.lock().unwrap() = BlueTickDetails {
            blue_mark: Some(BlueTickRecord {
                status,
                logs: Vec::new(),
            }),
            logo_url: None,
            company_name: Some("Acme".to_string()),
        };
        fake
    }

    pub fn push_page(&self, page: CompanyPage) {
        self.list_responses.lock().unwrap().push_back(Ok(page));
    }

    pub fn push_list_error(&self, error: ApiError) {
        self.list_responses.lock().unwrap().push_back(Err(error));
    }

    pub fn fail_next_detail(&self, error: ApiError) {
        self.detail_failures.lock().unwrap().push_back(error);
    }

    pub fn fail_next_action(&self, error: ApiError) {
        self.action_failures.lock().unwrap().push_back(error);
    }

    pub fn list_call_count(&self) -> usize {
        self.list_calls.lock().unwrap().len()
    }

    pub fn detail_call_count(&self) -> usize {
        self.detail_calls.lock().unwrap().len()
    }

    pub fn action_count(&self) -> usize {
        self.actions.lock().unwrap().len()
    }
}

/// Page of `count` companies named `Company N`
pub(crate) fn page_of(count: usize, total: u64) -> CompanyPage {
    CompanyPage {
        data: (0..count)
            .map(|i| Company {
                id: CompanyId(i as i64 + 1),
                company_name: format!("Company {}", i + 1),
                logo_url: None,
                verified_for_leader: i % 2 == 0,
                verified_for_store: false,
                blue_mark: None,
            })
            .collect(),
        count: total,
    }
}

#[async_trait]
impl CompanyApi for FakeApi {
    async fn list_companies(&self, query: &CompanyListQuery) -> Result<CompanyPage, ApiError> {
        self.list_calls.lock().unwrap().push(query.clone());
        self.list_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(CompanyPage::default()))
    }

    async fn get_blue_tick(&self, company_id: CompanyId) -> Result<BlueTickDetails, ApiError> {
        self.detail_calls.lock().unwrap().push(company_id);
        if let Some(error) = self.detail_failures.lock().unwrap().pop_front() {
            return Err(error);
        }
        Ok(self.details.lock().unwrap().clone())
    }

    async fn submit_blue_tick_action(&self, action: &BlueTickAction) -> Result<(), ApiError> {
        if let Some(error) = self.action_failures.lock().unwrap().pop_front() {
            return Err(error);
        }
        self.actions.lock().unwrap().push(action.clone());
        // The backend appends a history entry and moves the record along
        let mut details = self.details.lock().unwrap();
        let record = details.blue_mark.get_or_insert(BlueTickRecord {
            status: BlueTickStatus::NotRequested,
            logs: Vec::new(),
        });
        record.status = action.status;
        record.logs.push(crate::models::HistoryLogEntry {
            id: record.logs.len() as i64 + 1,
            status: action.status,
            description: Some(action.description.clone()).filter(|d| !d.is_empty()),
            created_at: None,
            updated_at: None,
        });
        Ok(())
    }
}
