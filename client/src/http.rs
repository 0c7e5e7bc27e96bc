use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Builds the shared HTTP client with a whole-request timeout.
pub fn build_http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(timeout)
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
}

fn counts_as_alive(code: StatusCode) -> bool {
    code.is_success() || code.is_redirection() || code == StatusCode::NOT_MODIFIED
}

/// Whether the API answers at all, for the online indicator.
///
/// HEAD first; servers that refuse HEAD (405/501) or drop it get a GET.
/// Any non-2xx/3xx answer other than those counts as down.
pub async fn is_url_alive(client: &Client, url: &str) -> bool {
    match client.head(url).send().await {
        Ok(resp) => {
            let code = resp.status();
            if counts_as_alive(code) {
                return true;
            }
            if code != StatusCode::METHOD_NOT_ALLOWED && code != StatusCode::NOT_IMPLEMENTED {
                tracing::debug!(%url, status = code.as_u16(), "reachability check answered");
                return false;
            }
        }
        Err(e) => tracing::debug!(%url, error = %e, "HEAD check failed, retrying with GET"),
    }

    match client.get(url).send().await {
        Ok(resp) => counts_as_alive(resp.status()),
        Err(e) => {
            tracing::debug!(%url, error = %e, "reachability check failed");
            false
        }
    }
}
