use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::client::{ApiClient, Auth};
use crate::error::ApiError;
use crate::record::Record;
use crate::response::Listing;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeemRequest {
    pub code: String,
    pub user_id: String,
}

/// Answer to a successful redemption: the server message, the ticket and
/// whatever reward details the server attaches.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RedeemOutcome {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub ticket: Option<Record>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ApiClient {
    pub async fn redeem_ticket(&self, request: &RedeemRequest) -> Result<RedeemOutcome, ApiError> {
        let url = self.endpoints().redeem_ticket();
        self.post_json(&url, request, Auth::Optional).await
    }

    pub async fn user_tickets(&self, user_id: &str) -> Result<Vec<Record>, ApiError> {
        let url = self.endpoints().user_tickets(user_id);
        let listing: Listing = self.get_json(&url, &[], Auth::Bearer).await?;
        Ok(listing.into_records())
    }
}
