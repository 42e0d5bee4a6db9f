//! GraphQL payloads exchanged with the company backend

use serde::{Deserialize, Serialize};

use crate::models::{BlueTickAction, BlueTickDetails, CompanyFilter, CompanyListQuery, CompanyPage};

pub const COMPANY_LIST_QUERY: &str = r#"
query GetCompanyList($searchQuery: String, $page: Int, $size: Int, $blueTickStatus: String, $isLeader: Boolean, $isStore: Boolean) {
  getCompanyList(searchQuery: $searchQuery, page: $page, size: $size, blueTickStatus: $blueTickStatus, isLeader: $isLeader, isStore: $isStore) {
    listResponse {
      count
      data {
        id
        companyName
        logoUrl
        verifiedForRehber
        verifiedForStore
        blueMark { status }
      }
    }
  }
}"#;

pub const BLUE_TICK_QUERY: &str = r#"
query GetCompanyBlueTick($id: Int!) {
  getCompanyBlueTick(id: $id) {
    companyName
    logoUrl
    blueMark {
      status
      logs { id status description createdAt updatedAt }
    }
  }
}"#;

pub const BLUE_TICK_ACTION_MUTATION: &str = r#"
mutation BlueTickAction($id: Int!, $status: String!, $description: String) {
  blueTickAction(id: $id, status: $status, description: $description)
}"#;

/// Body of every GraphQL request
#[derive(Debug, Serialize)]
pub struct GraphqlRequest<'a, V> {
    pub query: &'a str,
    pub variables: V,
}

/// Standard GraphQL response envelope
#[derive(Debug, Deserialize)]
pub struct GraphqlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphqlErrorMessage>,
}

#[derive(Debug, Deserialize)]
pub struct GraphqlErrorMessage {
    pub message: String,
}

/// Variables of `getCompanyList`
#[derive(Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyListVariables {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_query: Option<String>,
    pub page: u32,
    pub size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blue_tick_status: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_leader: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_store: Option<bool>,
}

impl From<&CompanyListQuery> for CompanyListVariables {
    fn from(query: &CompanyListQuery) -> Self {
        let mut variables = CompanyListVariables {
            search_query: query.search.clone().filter(|text| !text.is_empty()),
            page: query.page,
            size: query.size,
            ..Default::default()
        };

        match query.filter {
            Some(CompanyFilter::Status(status)) => variables.blue_tick_status = Some(status.as_str()),
            Some(CompanyFilter::Leader) => variables.is_leader = Some(true),
            Some(CompanyFilter::Store) => variables.is_store = Some(true),
            None => {}
        }

        variables
    }
}

/// Variables of `getCompanyBlueTick`
#[derive(Debug, Serialize)]
pub struct BlueTickVariables {
    pub id: i64,
}

/// Variables of the `blueTickAction` mutation
#[derive(Debug, PartialEq, Serialize)]
pub struct BlueTickActionVariables<'a> {
    pub id: i64,
    pub status: &'static str,
    pub description: &'a str,
}

impl<'a> From<&'a BlueTickAction> for BlueTickActionVariables<'a> {
    fn from(action: &'a BlueTickAction) -> Self {
        Self {
            id: action.company_id.0,
            status: action.status.as_str(),
            description: &action.description,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyListData {
    pub get_company_list: Option<CompanyListEnvelope>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyListEnvelope {
    pub list_response: Option<CompanyPage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlueTickData {
    pub get_company_blue_tick: Option<BlueTickDetails>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlueTickActionData {
    #[serde(default)]
    pub blue_tick_action: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BlueTickStatus, CompanyId};

    #[test]
    fn test_list_variables_carry_filter() {
        let query = CompanyListQuery {
            search: Some(String::new()),
            page: 3,
            size: 60,
            filter: Some(CompanyFilter::Status(BlueTickStatus::InProgress)),
        };

        let json = serde_json::to_value(CompanyListVariables::from(&query)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "page": 3, "size": 60, "blueTickStatus": "IN_PROGRESS" })
        );

        let leaders = CompanyListQuery {
            filter: Some(CompanyFilter::Leader),
            search: Some("acme".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(CompanyListVariables::from(&leaders)).unwrap();
        assert_eq!(json["isLeader"], true);
        assert_eq!(json["searchQuery"], "acme");
        assert!(json.get("blueTickStatus").is_none());
    }

    #[test]
    fn test_action_variables() {
        let action = BlueTickAction {
            company_id: CompanyId(7),
            status: BlueTickStatus::Rejected,
            description: "incomplete documents".to_string(),
        };
        let json = serde_json::to_value(BlueTickActionVariables::from(&action)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "id": 7, "status": "REJECTED", "description": "incomplete documents" })
        );
    }

    #[test]
    fn test_blue_tick_response_deserialization() {
        let body = r#"{
            "data": {
                "getCompanyBlueTick": {
                    "companyName": "Acme",
                    "logoUrl": "https://cdn.example.com/acme.png",
                    "blueMark": {
                        "status": "ACCEPTED",
                        "logs": [
                            { "id": 1, "status": "IN_PROGRESS", "description": null, "createdAt": "2024-01-02T08:00:00Z", "updatedAt": null },
                            { "id": 2, "status": "ACCEPTED", "description": "ok", "createdAt": "2024-01-03T08:00:00Z", "updatedAt": "2024-01-04T09:30:00Z" }
                        ]
                    }
                }
            }
        }"#;

        let parsed: GraphqlResponse<BlueTickData> = serde_json::from_str(body).unwrap();
        let details = parsed.data.unwrap().get_company_blue_tick.unwrap();
        assert_eq!(details.status(), BlueTickStatus::Accepted);
        assert_eq!(details.logs().len(), 2);
        assert_eq!(details.logs()[1].display_date(), "2024-01-04 09:30");
        assert!(parsed.errors.is_empty());
    }
}
