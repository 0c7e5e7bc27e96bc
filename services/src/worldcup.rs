//! World Cup matches and predictions for the logged-in user.

use client::{
    Page, Record,
    api::worldcup::{PredictionChoice, PredictionRequest},
};
use serde_json::Value;
use util::notify::NotificationCenter;

use crate::error::FlowError;
use crate::session::SessionManager;

const LOGIN_REQUIRED: &str = "Please login to place a prediction";
const PREDICTION_FAILED: &str = "Failed to place prediction";

#[derive(Clone)]
pub struct WorldCupService {
    session: SessionManager,
    notifications: NotificationCenter,
}

impl WorldCupService {
    pub fn new(session: SessionManager, notifications: NotificationCenter) -> Self {
        Self {
            session,
            notifications,
        }
    }

    pub async fn matches(&self, page: u32, limit: u32) -> Result<Page<Record>, FlowError> {
        let query = [
            ("page".to_string(), page.max(1).to_string()),
            ("limit".to_string(), limit.max(1).to_string()),
        ];
        match self.session.api().matches(&query).await {
            Ok(page) => Ok(page),
            Err(e) => {
                let err = FlowError::from_api(&e, "Failed to load matches");
                self.notifications
                    .error_with("Failed to load matches", err.message())
                    .await;
                Err(err)
            }
        }
    }

    /// Stakes `stake` Doker tokens on `choice` for `match_id`.
    pub async fn predict(
        &self,
        match_id: &str,
        choice: PredictionChoice,
        stake: f64,
    ) -> Result<Value, FlowError> {
        if match_id.trim().is_empty() {
            return self.reject(FlowError::Validation("Please select a match".to_string())).await;
        }
        if !stake.is_finite() || stake <= 0.0 {
            return self
                .reject(FlowError::Validation("Stake must be greater than zero".to_string()))
                .await;
        }
        let Some(user) = self.session.session() else {
            return self
                .reject(FlowError::NotAuthenticated(LOGIN_REQUIRED.to_string()))
                .await;
        };

        let request = PredictionRequest {
            user_id: user.id,
            match_id: match_id.to_string(),
            prediction: choice,
            stake,
        };
        match self.session.api().predict(&request).await {
            Ok(body) => {
                tracing::info!(match_id, ?choice, stake, "prediction placed");
                self.notifications.success("Prediction placed successfully!").await;
                Ok(body)
            }
            Err(e) => {
                tracing::warn!(match_id, error = %e, "prediction failed");
                let err = FlowError::from_api(&e, PREDICTION_FAILED);
                self.notifications.error_with(PREDICTION_FAILED, err.message()).await;
                Err(err)
            }
        }
    }

    pub async fn my_predictions(&self) -> Result<Vec<Record>, FlowError> {
        let Some(user) = self.session.session() else {
            return Err(FlowError::NotAuthenticated(LOGIN_REQUIRED.to_string()));
        };
        self.session
            .api()
            .user_predictions(&user.id)
            .await
            .map_err(|e| FlowError::from_api(&e, "Failed to load predictions"))
    }

    async fn reject(&self, err: FlowError) -> Result<Value, FlowError> {
        self.notifications.error(err.message()).await;
        Err(err)
    }
}
