use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::client::{ApiClient, Auth};
use crate::error::ApiError;
use crate::record::{Record, deserialize_id};
use crate::response::Ack;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
    Receptionist,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
            Role::Receptionist => "receptionist",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            "receptionist" => Ok(Role::Receptionist),
            other => Err(format!("unknown role {other:?}")),
        }
    }
}

/// Unknown or missing roles are treated as plain users.
fn lenient_role<'de, D>(deserializer: D) -> Result<Role, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|r| r.parse().ok()).unwrap_or_default())
}

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub role: Role,
}

/// The `user` object of a login/register answer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    #[serde(alias = "_id", deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, deserialize_with = "lenient_role")]
    pub role: Role,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub user: AuthUser,
    #[serde(default)]
    pub token: Option<String>,
}

impl ApiClient {
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let url = self.endpoints().login();
        self.post_json(&url, &LoginRequest { email, password }, Auth::None)
            .await
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        let url = self.endpoints().register();
        self.post_json(&url, request, Auth::None).await
    }

    /// Invalidates the stored token server-side.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let url = self.endpoints().logout();
        let _: Ack = self.post_json(&url, &serde_json::json!({}), Auth::Bearer).await?;
        Ok(())
    }

    pub async fn get_user(&self, id: &str) -> Result<Record, ApiError> {
        let url = self.endpoints().user(id);
        self.get_json(&url, &[], Auth::Bearer).await
    }
}
