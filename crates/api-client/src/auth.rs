use crate::error::ApiError;
use reqwest::Client;
use tokio::sync::Mutex;

/// Caches the Yahoo "crumb" token that the fundamentals endpoint requires.
///
/// The crumb is bound to a session cookie, so the handshake first visits the
/// cookie URL (the client's cookie jar keeps the result) and then asks the query
/// API for a crumb. The mutex is held across the handshake so concurrent
/// requests share a single one.
#[derive(Debug, Default)]
pub(crate) struct CrumbStore {
    crumb: Mutex<Option<String>>,
}

impl CrumbStore {
    pub(crate) async fn get(
        &self,
        client: &Client,
        cookie_url: &str,
        base_url: &str,
    ) -> Result<String, ApiError> {
        let mut cached = self.crumb.lock().await;
        if let Some(crumb) = cached.as_ref() {
            return Ok(crumb.clone());
        }

        tracing::debug!(cookie_url, "Starting Yahoo session handshake");
        // Only the Set-Cookie header matters; the status is usually 404.
        client.get(cookie_url).send().await?;

        let response = client
            .get(format!("{}/v1/test/getcrumb", base_url))
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ApiError::Unauthorized(format!(
                "crumb request answered HTTP {}",
                status.as_u16()
            )));
        }

        let crumb = parse_crumb(&body)?;
        *cached = Some(crumb.clone());
        Ok(crumb)
    }

    /// Forgets the cached crumb so the next request performs a fresh handshake.
    pub(crate) async fn invalidate(&self) {
        *self.crumb.lock().await = None;
    }
}

fn parse_crumb(body: &str) -> Result<String, ApiError> {
    let crumb = body.trim();
    if crumb.is_empty()
        || crumb.len() > 100
        || crumb.contains(char::is_whitespace)
        || crumb.contains('<')
    {
        return Err(ApiError::Unauthorized(
            "provider did not return a usable crumb".to_string(),
        ));
    }
    Ok(crumb.to_string())
}
