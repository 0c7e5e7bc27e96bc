use serde::{Deserialize, Serialize};

use crate::client::{ApiClient, Auth};
use crate::error::ApiError;
use crate::record::Record;
use crate::response::Ack;

/// Body of `POST /visa-applications/apply-visa`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisaApplicationRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub date_of_birth: String,
    pub nationality: String,
    pub passport_number: String,
    pub passport_expiry_date: String,
    pub passport_place_of_issue: String,
    pub destination_country: String,
    pub travel_purpose: String,
    pub arrival_date: String,
    pub departure_date: String,
    pub accommodation_address: String,
    #[serde(default)]
    pub additional_notes: String,
}

impl ApiClient {
    pub async fn apply_visa(&self, request: &VisaApplicationRequest) -> Result<Ack, ApiError> {
        let url = self.endpoints().apply_visa();
        self.post_json(&url, request, Auth::Optional).await
    }

    pub async fn visa_application(&self, id: &str) -> Result<Record, ApiError> {
        let url = self.endpoints().visa_application(id);
        let value: serde_json::Value = self.get_json(&url, &[], Auth::Bearer).await?;
        unwrap_single(value, "application")
    }
}

/// Single-item answers come either bare or wrapped as `{ "<key>": {...} }`.
pub(crate) fn unwrap_single(value: serde_json::Value, key: &str) -> Result<Record, ApiError> {
    let inner = match value {
        serde_json::Value::Object(mut map) if map.get(key).is_some_and(|v| v.is_object()) => {
            map.remove(key).unwrap_or_default()
        }
        other => other,
    };
    Record::from_value(inner).ok_or_else(|| ApiError::Decode("expected a JSON object".to_string()))
}
