//! HTTP client for the document store holding one profile snapshot per user.

use crate::error::{Error, Result};
use crate::investor::ProfileSnapshot;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Response, StatusCode, Url};
use std::time::Duration;

const API_KEY_HEADER: &str = "X-API-Key";

pub struct ProfileStore {
    client: Client,
    base_url: Url,
}

impl ProfileStore {
    pub fn new(base_url: &str, api_key: Option<&str>, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = api_key {
            let mut value = HeaderValue::from_str(key).map_err(|_| Error::InvalidApiKey)?;
            value.set_sensitive(true);
            headers.insert(API_KEY_HEADER, value);
        }

        let base_url = Url::parse(base_url)
            .ok()
            .filter(|u| !u.cannot_be_a_base())
            .ok_or_else(|| Error::InvalidStoreUrl(base_url.to_string()))?;

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(ProfileStore { client, base_url })
    }

    /// `{base}/profiles/{user_id}` with the id kept as one percent-encoded segment.
    fn profile_url(&self, user_id: &str) -> Result<Url> {
        if user_id.is_empty() || user_id == "." || user_id == ".." {
            return Err(Error::InvalidUserId(user_id.to_string()));
        }
        let mut url = self.base_url.clone();
        url.set_query(None);
        url.set_fragment(None);
        url.path_segments_mut()
            .map_err(|_| Error::InvalidStoreUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push("profiles")
            .push(user_id);
        Ok(url)
    }

    async fn check(resp: Response) -> Result<Response> {
        let status = resp.status();
        if status.is_success() {
            Ok(resp)
        } else {
            let body = resp.text().await.unwrap_or_default();
            tracing::error!(%status, body = %body, "profile store request failed");
            Err(Error::Store { status: status.as_u16(), body })
        }
    }

    /// Create or replace the user's snapshot.
    pub async fn save_profile(&self, user_id: &str, snapshot: &ProfileSnapshot) -> Result<()> {
        let resp = self
            .client
            .put(self.profile_url(user_id)?)
            .json(snapshot)
            .send()
            .await?;
        Self::check(resp).await?;
        tracing::info!(user_id, score = snapshot.score, "profile saved");
        Ok(())
    }

    pub async fn fetch_profile(&self, user_id: &str) -> Result<Option<ProfileSnapshot>> {
        let resp = self.client.get(self.profile_url(user_id)?).send().await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let text = Self::check(resp).await?.text().await?;
        Ok(Some(serde_json::from_str(&text)?))
    }

    /// Returns whether a profile existed.
    pub async fn delete_profile(&self, user_id: &str) -> Result<bool> {
        let resp = self.client.delete(self.profile_url(user_id)?).send().await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        Self::check(resp).await?;
        Ok(true)
    }
}
