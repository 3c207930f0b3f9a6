//! Response envelopes shared by every `/api` endpoint.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Response<T> {
    pub data: Option<T>,
    pub succeeded: bool,
    pub errors: Option<Vec<String>>,
    pub message: String,
}

impl<T> Response<T> {
    pub fn new(data: T) -> Self {
        Self {
            data: Some(data),
            succeeded: true,
            errors: None,
            message: String::new(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            data: None,
            succeeded: false,
            errors: Some(vec![message.clone()]),
            message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PagedResponse<T> {
    pub data: T,
    pub page_number: i64,
    pub page_size: i64,
    /// Number of records across all pages.
    pub total_records: i64,
    pub succeeded: bool,
    pub errors: Option<Vec<String>>,
    pub message: String,
}

impl<T> PagedResponse<T> {
    pub fn new(data: T, page_number: i64, page_size: i64, total_records: i64) -> Self {
        Self {
            data,
            page_number,
            page_size,
            total_records,
            succeeded: true,
            errors: None,
            message: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct TokenResponse {
    pub token: String,
}
