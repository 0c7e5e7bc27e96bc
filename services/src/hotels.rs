//! Hotel browsing, booking and payment initiation.

use chrono::{Duration, Utc};
use client::{
    Page, Record,
    api::hotels::{BookingRequest, PaymentMethod, PaymentRequest},
};
use serde_json::Value;
use util::notify::NotificationCenter;

use crate::error::FlowError;
use crate::session::SessionManager;

const LOGIN_REQUIRED: &str = "Please login to book a hotel";
const BOOKING_FAILED: &str = "Booking failed";
const PAYMENT_FAILED: &str = "Payment initialization failed";

/// A booking waiting for payment.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingPayment {
    pub booking_id: String,
    pub amount: f64,
    pub hotel_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    /// Continue at the processor (card checkout or crypto invoice).
    Redirect(String),
    /// Accepted without a redirect.
    Initiated,
}

#[derive(Clone)]
pub struct HotelService {
    session: SessionManager,
    notifications: NotificationCenter,
}

/// Reads a price that may arrive as a number or a numeric string.
fn price_of(hotel: &Record) -> Option<f64> {
    match hotel.get("price")? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

impl HotelService {
    pub fn new(session: SessionManager, notifications: NotificationCenter) -> Self {
        Self {
            session,
            notifications,
        }
    }

    pub async fn browse(&self, page: u32, limit: u32, search: &str) -> Result<Page<Record>, FlowError> {
        let query = [
            ("page".to_string(), page.max(1).to_string()),
            ("limit".to_string(), limit.max(1).to_string()),
            ("search".to_string(), search.trim().to_string()),
        ];
        match self.session.api().hotels(&query).await {
            Ok(page) => Ok(page),
            Err(e) => {
                tracing::warn!(error = %e, "hotel listing failed");
                let err = FlowError::from_api(&e, "Failed to load hotels");
                self.notifications.error_with("Failed to load hotels", err.message()).await;
                Err(err)
            }
        }
    }

    /// Books one room for one guest, checking in now and out a day later.
    pub async fn book(&self, hotel: &Record) -> Result<PendingPayment, FlowError> {
        let Some(user) = self.session.session() else {
            return self.reject(FlowError::NotAuthenticated(LOGIN_REQUIRED.to_string())).await;
        };
        let name = hotel.get_str("name").unwrap_or_default().to_string();
        let Some(price) = price_of(hotel) else {
            return self
                .reject(FlowError::Validation(format!("{name} has no valid price")))
                .await;
        };

        let check_in = Utc::now();
        let request = BookingRequest {
            user_id: user.id,
            hotel_name: name.clone(),
            location: hotel.get_str("location").unwrap_or_default().to_string(),
            check_in_date: check_in,
            check_out_date: check_in + Duration::days(1),
            guests: 1,
            rooms: 1,
            total_price: price,
        };

        let response = match self.session.api().book_hotel(&request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(hotel = %name, error = %e, "booking failed");
                return self.reject(FlowError::from_api(&e, BOOKING_FAILED)).await;
            }
        };
        let Some(booking_id) = response.booking.id() else {
            return self.reject(FlowError::Rejected(BOOKING_FAILED.to_string())).await;
        };

        tracing::info!(hotel = %name, %booking_id, "booking created");
        self.notifications
            .success(format!("Booking request sent for {name}!"))
            .await;
        Ok(PendingPayment {
            booking_id,
            amount: price,
            hotel_name: name,
        })
    }

    pub async fn pay(&self, pending: &PendingPayment, method: PaymentMethod) -> Result<PaymentOutcome, FlowError> {
        let Some(user) = self.session.session() else {
            return self.reject(FlowError::NotAuthenticated(LOGIN_REQUIRED.to_string())).await;
        };

        let request = PaymentRequest {
            user_id: user.id,
            amount: pending.amount,
            currency: "USD".to_string(),
            payment_method: method,
            kind: "hotel_booking".to_string(),
            related_entity_id: pending.booking_id.clone(),
            email: user.email,
        };

        let init = match self.session.api().pay(&request).await {
            Ok(init) => init,
            Err(e) => {
                tracing::warn!(booking_id = %pending.booking_id, error = %e, "payment init failed");
                return self.reject(FlowError::from_api(&e, PAYMENT_FAILED)).await;
            }
        };

        let redirect = match method {
            PaymentMethod::Card => init.authorization_url,
            PaymentMethod::Crypto => init.invoice_url,
        };
        match redirect.filter(|u| !u.is_empty()) {
            Some(url) => Ok(PaymentOutcome::Redirect(url)),
            None => {
                self.notifications.success("Payment initiated!").await;
                Ok(PaymentOutcome::Initiated)
            }
        }
    }

    pub async fn my_bookings(&self) -> Result<Vec<Record>, FlowError> {
        let Some(user) = self.session.session() else {
            return Err(FlowError::NotAuthenticated(LOGIN_REQUIRED.to_string()));
        };
        self.session
            .api()
            .user_bookings(&user.id)
            .await
            .map_err(|e| FlowError::from_api(&e, "Failed to load bookings"))
    }

    async fn reject<T>(&self, err: FlowError) -> Result<T, FlowError> {
        self.notifications.error(err.message()).await;
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn price_accepts_number_or_numeric_string() {
        let a: Record = serde_json::from_value(json!({"price": 120})).unwrap();
        let b: Record = serde_json::from_value(json!({"price": " 99.5 "})).unwrap();
        let c: Record = serde_json::from_value(json!({"price": "free"})).unwrap();
        assert_eq!(price_of(&a), Some(120.0));
        assert_eq!(price_of(&b), Some(99.5));
        assert_eq!(price_of(&c), None);
    }
}
