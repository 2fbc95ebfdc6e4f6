use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde_json::Value;

use crate::config::BackendConfig;
use crate::error::AppError;

/// Client for the hosted backend's REST interface.
///
/// The backend is treated as an opaque store of named collections: rows are
/// created with `POST {base}/rest/v1/{collection}` and read back with `GET`
/// on the same path.
#[derive(Clone)]
pub struct BackendClient {
    base_url: String,
    api_key: Option<String>,
    http: Client,
}

impl BackendClient {
    pub fn new(base_url: String, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            http: Client::new(),
        }
    }

    pub fn from_config(config: &BackendConfig) -> Self {
        Self::new(config.url.clone(), config.api_key.clone())
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, collection)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.header("apikey", key).bearer_auth(key),
            None => request,
        }
    }

    /// Insert a row and return the stored representation.
    pub async fn insert_row<T: Serialize + ?Sized>(
        &self,
        collection: &str,
        row: &T,
    ) -> Result<Value, AppError> {
        let request = self
            .http
            .post(self.collection_url(collection))
            .header("Prefer", "return=representation")
            .json(row);

        let stored = self.send(self.authorize(request)).await?;

        // The backend answers with an array holding the inserted row.
        Ok(match stored {
            Value::Array(mut rows) if !rows.is_empty() => rows.swap_remove(0),
            other => other,
        })
    }

    /// Fetch every row of a collection.
    pub async fn list_rows(&self, collection: &str) -> Result<Vec<Value>, AppError> {
        let request = self.http.get(self.collection_url(collection));

        match self.send(self.authorize(request)).await? {
            Value::Array(rows) => Ok(rows),
            other => Err(AppError::Parse(format!(
                "expected an array of rows from backend, got {}",
                other
            ))),
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Value, AppError> {
        let response = request
            .send()
            .await
            .map_err(|err| AppError::Network(err.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::Network(format!(
                "Backend returned HTTP {}",
                response.status()
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|err| AppError::Parse(err.to_string()))
    }
}
