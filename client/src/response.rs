use crate::record::Record;
use serde::{Deserialize, Serialize};

/// One page of a paginated list endpoint.
///
/// Wire shape:
/// ```json
/// { "docs": [ { "_id": "..." } ], "page": 2, "limit": 10, "totalPages": 7 }
/// ```
/// A missing `docs` is an empty page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default)]
    pub docs: Vec<T>,
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default)]
    pub limit: u32,
    #[serde(default = "first_page")]
    pub total_pages: u32,
}

fn first_page() -> u32 {
    1
}

/// Error body every endpoint uses for non-2xx answers.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    pub fn into_message(self) -> Option<String> {
        self.message
            .or(self.error)
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
    }
}

/// Per-user listings come back either as a bare array or as a page.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Listing {
    Plain(Vec<Record>),
    Paged(Page<Record>),
}

impl Listing {
    pub fn into_records(self) -> Vec<Record> {
        match self {
            Listing::Plain(items) => items,
            Listing::Paged(page) => page.docs,
        }
    }
}

/// Acknowledgement bodies: `{ "message": "..." }` plus whatever else the server adds.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(flatten)]
    pub rest: serde_json::Map<String, serde_json::Value>,
}
