use anyhow::{anyhow, Result};
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Method,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

use shared_config::AppConfig;

/// Thin client for the document store's REST surface. Collections live under
/// `/rest/v1/{collection}` and rows are plain JSON documents. There are no
/// transactions and no optimistic-concurrency tokens; every operation is an
/// independent read or write.
pub struct StoreClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl StoreClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.store_url.clone(),
            api_key: config.store_api_key.clone(),
        }
    }

    fn get_headers(&self, representation: bool) -> HeaderMap {
        let mut headers = HeaderMap::new();

        headers.insert("apikey", HeaderValue::from_str(&self.api_key).unwrap());
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key)).unwrap(),
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if representation {
            headers.insert("Prefer", HeaderValue::from_static("return=representation"));
        }

        headers
    }

    pub async fn request<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        representation: bool,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making request to {}", url);

        let mut req = self
            .client
            .request(method, &url)
            .headers(self.get_headers(representation));

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            error!("Store error ({}): {}", status, error_text);

            return Err(match status.as_u16() {
                401 | 403 => anyhow!("Authentication error: {}", error_text),
                404 => anyhow!("Resource not found: {}", error_text),
                _ => anyhow!("Store error ({}): {}", status, error_text),
            });
        }

        let data = response.json::<T>().await?;
        Ok(data)
    }

    /// Select rows from a collection. `filter` is a raw query string such as
    /// `email=eq.jane@example.com`. Rows come back in the order the store
    /// returns them; no ordering is requested.
    pub async fn select<T>(&self, collection: &str, filter: &str) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let path = if filter.is_empty() {
            format!("/rest/v1/{}", collection)
        } else {
            format!("/rest/v1/{}?{}", collection, filter)
        };

        self.request(Method::GET, &path, None, false).await
    }

    /// Insert one row and return the stored representation.
    pub async fn insert<T>(&self, collection: &str, row: Value) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let path = format!("/rest/v1/{}", collection);

        let mut result: Vec<T> = self
            .request(Method::POST, &path, Some(row), true)
            .await?;

        if result.is_empty() {
            return Err(anyhow!("Insert into {} returned no rows", collection));
        }

        Ok(result.remove(0))
    }

    /// Patch all rows matching `filter` and return the stored representations.
    pub async fn update<T>(&self, collection: &str, filter: &str, patch: Value) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let path = format!("/rest/v1/{}?{}", collection, filter);

        self.request(Method::PATCH, &path, Some(patch), true).await
    }
}
