use std::time::Duration;

use async_trait::async_trait;
use debrief_history::{
    enrich::FileLookup,
    error::HistoryError,
    fetch::ChunkResult,
    model::FileMetadata,
};
use reqwest::{header, Client};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::AppError;

const TIMEOUT_SECS: u64 = 30;

fn build_client(token: Option<&str>) -> Result<Client, AppError> {
    let mut headers = header::HeaderMap::new();
    if let Some(token) = token {
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {}", token))?,
        );
    }

    Ok(Client::builder()
        .default_headers(headers)
        .timeout(Duration::from_secs(TIMEOUT_SECS))
        .build()?)
}

pub struct HttpFileLookup {
    base_url: String,
    client: Client,
}

impl HttpFileLookup {
    pub fn new(base_url: &str, token: Option<&str>) -> Result<Self, AppError> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            client: build_client(token)?,
        })
    }
}

#[async_trait]
impl FileLookup for HttpFileLookup {
    async fn get_files(&self, id_in: &str) -> Result<ChunkResult<FileMetadata>, HistoryError> {
        let url = format!("{}/files/", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("id__in", id_in)])
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|error| HistoryError::LookupFailed(error.to_string()))?;

        response
            .json::<ChunkResult<FileMetadata>>()
            .await
            .map_err(|error| HistoryError::LookupFailed(error.to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct ActionResponse {
    #[serde(default)]
    result: Option<Value>,
}

impl ActionResponse {
    fn is_ok(&self) -> bool {
        match &self.result {
            Some(Value::Array(items)) => items.iter().all(|item| item.as_str() == Some("OK")),
            _ => false,
        }
    }
}

pub struct ActionClient {
    action_id: String,
    client: Client,
    endpoint: String,
}

impl ActionClient {
    pub fn new(endpoint: &str, action_id: &str, token: Option<&str>) -> Result<Self, AppError> {
        Ok(Self {
            action_id: action_id.to_owned(),
            client: build_client(token)?,
            endpoint: endpoint.to_owned(),
        })
    }

    pub async fn execute(&self, event_data: &Value) -> Result<(), AppError> {
        let body = json!({
            "actionId": self.action_id,
            "eventData": event_data
        });

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let response: ActionResponse = response.json().await?;
        if response.is_ok() {
            Ok(())
        } else {
            tracing::error!("action endpoint answered with {:?}", response.result);
            Err(AppError::SubmissionRejected)
        }
    }
}
