//! Ticket redemption flow.

use client::{Record, api::tickets::RedeemRequest};
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::sync::Mutex;
use util::notify::NotificationCenter;

use crate::error::FlowError;
use crate::session::SessionManager;

pub const EMPTY_CODE: &str = "Please enter a ticket code";
pub const LOGIN_REQUIRED: &str = "You must be logged in to redeem a ticket.";
const REDEEM_FAILED: &str = "Failed to redeem ticket";

/// What the user sees after a successful redemption.
#[derive(Debug, Clone, PartialEq)]
pub struct RewardSummary {
    pub code: String,
    pub message: Option<String>,
    pub ticket: Option<Record>,
    pub details: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RedeemState {
    /// The code entry form, with the last error shown inline.
    Entry { error: Option<String> },
    Submitting,
    Redeemed(RewardSummary),
}

#[derive(Clone)]
pub struct TicketRedemption {
    session: SessionManager,
    notifications: NotificationCenter,
    state: Arc<Mutex<RedeemState>>,
}

/// Trims and upper-cases a typed code.
pub fn normalize_code(raw: &str) -> String {
    raw.trim().to_uppercase()
}

impl TicketRedemption {
    pub fn new(session: SessionManager, notifications: NotificationCenter) -> Self {
        Self {
            session,
            notifications,
            state: Arc::new(Mutex::new(RedeemState::Entry { error: None })),
        }
    }

    pub async fn state(&self) -> RedeemState {
        self.state.lock().await.clone()
    }

    /// Back to an empty entry form.
    pub async fn reset(&self) {
        *self.state.lock().await = RedeemState::Entry { error: None };
    }

    pub async fn redeem(&self, raw_code: &str) -> Result<RewardSummary, FlowError> {
        let code = normalize_code(raw_code);
        if code.is_empty() {
            return self.fail(FlowError::Validation(EMPTY_CODE.to_string()), false).await;
        }
        let Some(user) = self.session.session() else {
            return self
                .fail(FlowError::NotAuthenticated(LOGIN_REQUIRED.to_string()), true)
                .await;
        };

        *self.state.lock().await = RedeemState::Submitting;
        let request = RedeemRequest {
            code: code.clone(),
            user_id: user.id,
        };

        match self.session.api().redeem_ticket(&request).await {
            Ok(outcome) => {
                let summary = RewardSummary {
                    code,
                    message: outcome.message,
                    ticket: outcome.ticket,
                    details: outcome.extra,
                };
                tracing::info!(code = %summary.code, "ticket redeemed");
                *self.state.lock().await = RedeemState::Redeemed(summary.clone());
                self.notifications
                    .success("Congratulations! Your ticket has been redeemed!")
                    .await;
                Ok(summary)
            }
            Err(e) => {
                tracing::warn!(code = %request.code, error = %e, "ticket redemption failed");
                self.fail(FlowError::from_api(&e, REDEEM_FAILED), true).await
            }
        }
    }

    /// Tickets owned by the logged-in user.
    pub async fn my_tickets(&self) -> Result<Vec<Record>, FlowError> {
        let Some(user) = self.session.session() else {
            return Err(FlowError::NotAuthenticated(LOGIN_REQUIRED.to_string()));
        };
        match self.session.api().user_tickets(&user.id).await {
            Ok(tickets) => Ok(tickets),
            Err(e) => {
                let err = FlowError::from_api(&e, "Failed to load tickets");
                self.notifications
                    .error_with("Failed to load tickets", err.message())
                    .await;
                Err(err)
            }
        }
    }

    async fn fail(&self, err: FlowError, toast: bool) -> Result<RewardSummary, FlowError> {
        *self.state.lock().await = RedeemState::Entry {
            error: Some(err.message().to_string()),
        };
        if toast {
            self.notifications.error(err.message()).await;
        }
        Err(err)
    }
}
