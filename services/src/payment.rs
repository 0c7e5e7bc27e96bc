//! Verification of a payment after the processor redirects back.

use url::Url;
use util::notify::NotificationCenter;

use crate::session::SessionManager;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationStatus {
    Verifying,
    Success,
    Failed,
}

/// The processor reference from a redirect location, `reference` first, then `trxref`.
///
/// Accepts an absolute URL, a path with a query, or a bare query string.
pub fn reference_from_location(location: &str) -> Option<String> {
    let location = location.trim();
    let parsed = Url::parse(location).or_else(|_| {
        let base = Url::parse("http://localhost/")?;
        if location.starts_with('/') || location.starts_with('?') {
            base.join(location)
        } else {
            base.join(&format!("?{location}"))
        }
    });
    let url = parsed.ok()?;

    let find = |key: &str| {
        url.query_pairs()
            .find(|(k, v)| k == key && !v.trim().is_empty())
            .map(|(_, v)| v.trim().to_string())
    };
    find("reference").or_else(|| find("trxref"))
}

#[derive(Clone)]
pub struct PaymentVerifier {
    session: SessionManager,
    notifications: NotificationCenter,
}

impl PaymentVerifier {
    pub fn new(session: SessionManager, notifications: NotificationCenter) -> Self {
        Self {
            session,
            notifications,
        }
    }

    /// Verifies the payment named by the redirect location.
    ///
    /// A location without a reference fails without a request.
    pub async fn verify_location(&self, location: &str) -> VerificationStatus {
        match reference_from_location(location) {
            Some(reference) => self.verify(&reference).await,
            None => {
                tracing::warn!(%location, "payment redirect carries no reference");
                VerificationStatus::Failed
            }
        }
    }

    pub async fn verify(&self, reference: &str) -> VerificationStatus {
        match self.session.api().verify_transaction(reference).await {
            Ok(_) => {
                tracing::info!(%reference, "payment verified");
                self.notifications.success("Payment verified successfully!").await;
                VerificationStatus::Success
            }
            Err(e) => {
                tracing::warn!(%reference, error = %e, "payment verification failed");
                self.notifications
                    .error("Payment verification failed. Please contact support.")
                    .await;
                VerificationStatus::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_wins_over_trxref() {
        assert_eq!(
            reference_from_location("https://app.test/payment/verify?trxref=T1&reference=R1").as_deref(),
            Some("R1")
        );
    }

    #[test]
    fn trxref_is_the_fallback() {
        assert_eq!(
            reference_from_location("/payment/verify?trxref=T1").as_deref(),
            Some("T1")
        );
        assert_eq!(reference_from_location("trxref=T2").as_deref(), Some("T2"));
        assert_eq!(
            reference_from_location("?reference=&trxref=T3").as_deref(),
            Some("T3")
        );
    }

    #[test]
    fn missing_reference_is_none() {
        assert!(reference_from_location("/payment/verify").is_none());
        assert!(reference_from_location("").is_none());
    }
}
