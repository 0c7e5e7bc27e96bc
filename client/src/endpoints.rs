//! URL table of the Vividstream API.
//!
//! Every path the client calls is built here from the configured base URL;
//! identifiers are percent-encoded as single path segments.

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use url::Url;

use crate::error::ApiError;

/// Characters escaped in a path segment (RFC 3986 `pchar` complement).
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: String,
}

impl Endpoints {
    /// Fails when `base` is not an absolute http(s) URL.
    pub fn new(base: &str) -> Result<Self, ApiError> {
        let trimmed = base.trim().trim_end_matches('/');
        let parsed = Url::parse(trimmed)
            .map_err(|e| ApiError::InvalidRequest(format!("invalid API base URL {trimmed:?}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::InvalidRequest(format!(
                "API base URL must be http or https, got {:?}",
                parsed.scheme()
            )));
        }
        Ok(Self {
            base: trimmed.to_string(),
        })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Joins a path that starts with `/` onto the base.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    // --- users ---

    pub fn login(&self) -> String {
        self.url("/users/login-user")
    }

    pub fn register(&self) -> String {
        self.url("/users/register-user")
    }

    pub fn logout(&self) -> String {
        self.url("/users/logout")
    }

    pub fn user(&self, id: &str) -> String {
        self.url(&format!("/users/{}", segment(id)))
    }

    // --- tickets ---

    pub fn redeem_ticket(&self) -> String {
        self.url("/tickets/redeem")
    }

    pub fn user_tickets(&self, user_id: &str) -> String {
        self.url(&format!("/tickets/user/{}", segment(user_id)))
    }

    // --- visa applications ---

    pub fn apply_visa(&self) -> String {
        self.url("/visa-applications/apply-visa")
    }

    pub fn visa_application(&self, id: &str) -> String {
        self.url(&format!("/visa-applications/get-visa-application/{}", segment(id)))
    }

    // --- world cup ---

    pub fn matches(&self) -> String {
        self.url("/worldcup/matches")
    }

    pub fn match_item(&self, id: &str) -> String {
        self.url(&format!("/worldcup/matches/{}", segment(id)))
    }

    pub fn predictions(&self) -> String {
        self.url("/worldcup/predictions")
    }

    pub fn user_predictions(&self, user_id: &str) -> String {
        self.url(&format!("/worldcup/predictions/{}", segment(user_id)))
    }

    // --- hotels ---

    pub fn hotels(&self) -> String {
        self.url("/hotels")
    }

    pub fn hotel(&self, id: &str) -> String {
        self.url(&format!("/hotels/{}", segment(id)))
    }

    pub fn book_hotel(&self) -> String {
        self.url("/hotels/book")
    }

    pub fn user_bookings(&self, user_id: &str) -> String {
        self.url(&format!("/hotels/user/{}", segment(user_id)))
    }

    pub fn pay(&self) -> String {
        self.url("/hotels/pay")
    }

    pub fn verify_transaction(&self) -> String {
        self.url("/hotels/transactions/verify")
    }

    // --- admin ---

    pub fn admin_stats(&self) -> String {
        self.url("/admin/stats")
    }
}

/// Percent-encodes one path segment.
pub fn segment(raw: &str) -> String {
    utf8_percent_encode(raw, SEGMENT).to_string()
}
