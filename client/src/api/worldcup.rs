use reqwest::multipart::Form;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

use crate::client::{ApiClient, Auth, Query};
use crate::error::ApiError;
use crate::multipart::optional_file;
use crate::record::Record;
use crate::response::{Listing, Page};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PredictionChoice {
    #[serde(rename = "teamA")]
    TeamA,
    #[serde(rename = "draw")]
    Draw,
    #[serde(rename = "teamB")]
    TeamB,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionRequest {
    pub user_id: String,
    pub match_id: String,
    pub prediction: PredictionChoice,
    /// Doker tokens.
    pub stake: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Odds {
    pub team_a_win: f64,
    pub team_b_win: f64,
    pub draw: f64,
}

/// Admin create/update form of a match. Images are local file paths.
#[derive(Debug, Clone, Default)]
pub struct MatchForm {
    pub team_a: String,
    pub team_b: String,
    pub date: String,
    pub venue: String,
    pub status: String,
    /// `None` or `"pending"` leaves the winner unset.
    pub winner: Option<String>,
    pub odds: Option<Odds>,
    pub team_a_image: Option<PathBuf>,
    pub team_b_image: Option<PathBuf>,
}

impl MatchForm {
    async fn into_form(self) -> Result<Form, ApiError> {
        let mut form = Form::new()
            .text("teamA", self.team_a)
            .text("teamB", self.team_b)
            .text("date", self.date)
            .text("venue", self.venue)
            .text("status", self.status);

        if let Some(winner) = self.winner.filter(|w| !w.is_empty() && w != "pending") {
            form = form.text("winner", winner);
        }
        if let Some(odds) = self.odds {
            form = form.text("odds", serde_json::to_string(&odds)?);
        }

        let form = optional_file(form, "teamAImage", self.team_a_image.as_deref()).await?;
        optional_file(form, "teamBImage", self.team_b_image.as_deref()).await
    }
}

impl ApiClient {
    pub async fn matches(&self, query: &Query) -> Result<Page<Record>, ApiError> {
        let url = self.endpoints().matches();
        self.get_json(&url, query, Auth::Optional).await
    }

    pub async fn predict(&self, request: &PredictionRequest) -> Result<Value, ApiError> {
        let url = self.endpoints().predictions();
        self.post_json(&url, request, Auth::Bearer).await
    }

    pub async fn user_predictions(&self, user_id: &str) -> Result<Vec<Record>, ApiError> {
        let url = self.endpoints().user_predictions(user_id);
        let listing: Listing = self.get_json(&url, &[], Auth::Bearer).await?;
        Ok(listing.into_records())
    }

    pub async fn create_match(&self, form: MatchForm) -> Result<Value, ApiError> {
        let url = self.endpoints().matches();
        self.post_multipart(&url, form.into_form().await?, Auth::Bearer)
            .await
    }

    pub async fn update_match(&self, id: &str, form: MatchForm) -> Result<Value, ApiError> {
        let url = self.endpoints().match_item(id);
        self.put_multipart(&url, form.into_form().await?, Auth::Bearer)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prediction_choices_use_wire_names() {
        let body = serde_json::to_value(PredictionRequest {
            user_id: "u1".into(),
            match_id: "m1".into(),
            prediction: PredictionChoice::TeamB,
            stake: 25.0,
        })
        .unwrap();
        assert_eq!(body["prediction"], "teamB");
        assert_eq!(body["matchId"], "m1");
        assert_eq!(body["stake"], 25.0);
    }

    #[test]
    fn odds_serialize_as_camel_case_json() {
        let text = serde_json::to_string(&Odds {
            team_a_win: 1.5,
            team_b_win: 2.5,
            draw: 3.0,
        })
        .unwrap();
        assert_eq!(text, r#"{"teamAWin":1.5,"teamBWin":2.5,"draw":3.0}"#);
    }
}
