use chrono::{DateTime, Utc};
use reqwest::multipart::Form;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;

use crate::client::{ApiClient, Auth, Query};
use crate::error::ApiError;
use crate::multipart::optional_file;
use crate::record::Record;
use crate::response::{Ack, Listing, Page};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub user_id: String,
    pub hotel_name: String,
    pub location: String,
    pub check_in_date: DateTime<Utc>,
    pub check_out_date: DateTime<Utc>,
    pub guests: u32,
    pub rooms: u32,
    pub total_price: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookingResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub booking: Record,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Card,
    Crypto,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub user_id: String,
    pub amount: f64,
    pub currency: String,
    pub payment_method: PaymentMethod,
    #[serde(rename = "type")]
    pub kind: String,
    pub related_entity_id: String,
    pub email: String,
}

/// Answer to `POST /hotels/pay`. Card payments carry `authorization_url`,
/// crypto payments `invoiceUrl`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentInit {
    #[serde(default)]
    pub authorization_url: Option<String>,
    #[serde(default, rename = "invoiceUrl")]
    pub invoice_url: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerifyRequest<'a> {
    pub reference: &'a str,
}

/// Admin create/update form of a hotel.
#[derive(Debug, Clone, Default)]
pub struct HotelForm {
    pub name: String,
    pub location: String,
    pub price: String,
    pub description: String,
    /// Comma-separated, as typed.
    pub amenities: String,
    pub featured: bool,
    pub image: Option<PathBuf>,
}

impl HotelForm {
    async fn into_form(self) -> Result<Form, ApiError> {
        let form = Form::new()
            .text("name", self.name)
            .text("location", self.location)
            .text("price", self.price)
            .text("description", self.description)
            .text("amenities", self.amenities)
            .text("featured", self.featured.to_string());
        optional_file(form, "image", self.image.as_deref()).await
    }
}

impl ApiClient {
    pub async fn hotels(&self, query: &Query) -> Result<Page<Record>, ApiError> {
        let url = self.endpoints().hotels();
        self.get_json(&url, query, Auth::Optional).await
    }

    pub async fn book_hotel(&self, request: &BookingRequest) -> Result<BookingResponse, ApiError> {
        let url = self.endpoints().book_hotel();
        self.post_json(&url, request, Auth::Optional).await
    }

    pub async fn pay(&self, request: &PaymentRequest) -> Result<PaymentInit, ApiError> {
        let url = self.endpoints().pay();
        self.post_json(&url, request, Auth::Optional).await
    }

    pub async fn verify_transaction(&self, reference: &str) -> Result<Ack, ApiError> {
        let url = self.endpoints().verify_transaction();
        self.post_json(&url, &VerifyRequest { reference }, Auth::Optional)
            .await
    }

    pub async fn user_bookings(&self, user_id: &str) -> Result<Vec<Record>, ApiError> {
        let url = self.endpoints().user_bookings(user_id);
        let listing: Listing = self.get_json(&url, &[], Auth::Bearer).await?;
        Ok(listing.into_records())
    }

    pub async fn create_hotel(&self, form: HotelForm) -> Result<Value, ApiError> {
        let url = self.endpoints().hotels();
        self.post_multipart(&url, form.into_form().await?, Auth::Bearer)
            .await
    }

    pub async fn update_hotel(&self, id: &str, form: HotelForm) -> Result<Value, ApiError> {
        let url = self.endpoints().hotel(id);
        self.put_multipart(&url, form.into_form().await?, Auth::Bearer)
            .await
    }
}
