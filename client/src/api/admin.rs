use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::client::{ApiClient, Auth};
use crate::error::ApiError;

/// Dashboard counters. Keys the server adds later are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    #[serde(default)]
    pub total_users: u64,
    #[serde(default)]
    pub total_tickets: u64,
    #[serde(default)]
    pub total_visa_applications: u64,
    #[serde(default)]
    pub total_predictions: u64,
    #[serde(default)]
    pub total_revenue: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ApiClient {
    pub async fn admin_stats(&self) -> Result<AdminStats, ApiError> {
        let url = self.endpoints().admin_stats();
        self.get_json(&url, &[], Auth::Bearer).await
    }
}
