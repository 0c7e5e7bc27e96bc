//! Visa application form and submission.

use chrono::NaiveDate;
use client::{Record, api::visa::VisaApplicationRequest};
use common::format_validation_errors;
use util::notify::NotificationCenter;
use validator::Validate;

use crate::error::FlowError;
use crate::session::SessionManager;

pub const REQUIRED_FIELDS: &str = "Please fill in all required fields.";
pub const SUBMITTED: &str = "Visa application submitted successfully! Check your email for confirmation.";
const SUBMIT_FAILED: &str = "Failed to submit application. Please try again.";

#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct VisaForm {
    pub first_name: String,
    pub last_name: String,
    #[validate(email(message = "Please enter a valid email address."))]
    pub email: String,
    pub phone: String,
    pub date_of_birth: String,
    pub nationality: String,
    pub passport_number: String,
    pub passport_expiry: String,
    pub place_of_issue: String,
    pub destination: String,
    pub travel_purpose: String,
    pub arrival_date: String,
    pub departure_date: String,
    pub accommodation_address: String,
    pub additional_notes: String,
}

impl VisaForm {
    fn required(&self) -> [&str; 14] {
        [
            self.first_name.as_str(),
            self.last_name.as_str(),
            self.email.as_str(),
            self.phone.as_str(),
            self.date_of_birth.as_str(),
            self.nationality.as_str(),
            self.passport_number.as_str(),
            self.passport_expiry.as_str(),
            self.place_of_issue.as_str(),
            self.destination.as_str(),
            self.travel_purpose.as_str(),
            self.arrival_date.as_str(),
            self.departure_date.as_str(),
            self.accommodation_address.as_str(),
        ]
    }

    /// Blocks submission with the first problem found.
    pub fn check(&self) -> Result<(), String> {
        if self.required().iter().any(|v| v.trim().is_empty()) {
            return Err(REQUIRED_FIELDS.to_string());
        }
        if let Err(errors) = self.validate() {
            return Err(format_validation_errors(&errors));
        }

        let parse = |s: &str| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok();
        if let (Some(arrival), Some(departure)) = (parse(&self.arrival_date), parse(&self.departure_date)) {
            if departure < arrival {
                return Err("Departure date cannot be before arrival date.".to_string());
            }
        }
        Ok(())
    }

    pub fn to_request(&self) -> VisaApplicationRequest {
        VisaApplicationRequest {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone_number: self.phone.trim().to_string(),
            date_of_birth: self.date_of_birth.trim().to_string(),
            nationality: self.nationality.trim().to_string(),
            passport_number: self.passport_number.trim().to_string(),
            passport_expiry_date: self.passport_expiry.trim().to_string(),
            passport_place_of_issue: self.place_of_issue.trim().to_string(),
            destination_country: self.destination.trim().to_string(),
            travel_purpose: self.travel_purpose.trim().to_string(),
            arrival_date: self.arrival_date.trim().to_string(),
            departure_date: self.departure_date.trim().to_string(),
            accommodation_address: self.accommodation_address.trim().to_string(),
            additional_notes: self.additional_notes.trim().to_string(),
        }
    }
}

#[derive(Clone)]
pub struct VisaService {
    session: SessionManager,
    notifications: NotificationCenter,
}

impl VisaService {
    pub fn new(session: SessionManager, notifications: NotificationCenter) -> Self {
        Self {
            session,
            notifications,
        }
    }

    pub async fn submit(&self, form: &VisaForm) -> Result<(), FlowError> {
        if let Err(message) = form.check() {
            self.notifications.error(message.clone()).await;
            return Err(FlowError::Validation(message));
        }

        match self.session.api().apply_visa(&form.to_request()).await {
            Ok(_) => {
                tracing::info!(destination = %form.destination, "visa application submitted");
                self.notifications.success(SUBMITTED).await;
                Ok(())
            }
            Err(e) => {
                let err = FlowError::from_api(&e, SUBMIT_FAILED);
                tracing::warn!(error = %e, "visa application failed");
                self.notifications.error_with(SUBMIT_FAILED, err.message()).await;
                Err(err)
            }
        }
    }

    pub async fn application(&self, id: &str) -> Result<Record, FlowError> {
        self.session.api().visa_application(id).await.map_err(|e| {
            tracing::warn!(%id, error = %e, "visa application lookup failed");
            FlowError::from_api(&e, "Failed to load visa application")
        })
    }
}
