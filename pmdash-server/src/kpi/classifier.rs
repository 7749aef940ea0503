//! KPI classifier gateway
//!
//! Sends a [`KpiSnapshot`] to the external classification service and
//! validates the label it returns. The service is a black box: this module
//! only knows its request and response shapes.

use crate::kpi::snapshot::KpiSnapshot;
use async_trait::async_trait;
use pmdash_common::config::ClassifierConfig;
use pmdash_common::db::KpiClass;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

const USER_AGENT: &str = concat!("pmdash/", env!("CARGO_PKG_VERSION"));

/// Classifier errors
#[derive(Debug, Error)]
pub enum ClassificationError {
    /// Could not reach the service
    #[error("Classifier unreachable: {0}")]
    Unreachable(String),

    /// No answer within the allowed time
    #[error("Classifier timed out after {0:?}")]
    Timeout(Duration),

    /// Service answered with a non-success status
    #[error("Classifier API error {0}: {1}")]
    Api(u16, String),

    /// Response body was not a recognised shape
    #[error("Malformed classifier response: {0}")]
    MalformedResponse(String),

    /// Response carried a label outside Low/Medium/High
    #[error("Invalid classifier label: {0:?}")]
    InvalidLabel(String),
}

/// Anything that can turn a snapshot into a KPI class
#[async_trait]
pub trait KpiClassifier: Send + Sync {
    async fn classify(&self, snapshot: &KpiSnapshot) -> Result<KpiClass, ClassificationError>;
}

/// HTTP client for the classification service
pub struct HttpClassifier {
    http_client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpClassifier {
    pub fn new(config: &ClassifierConfig) -> Result<Self, ClassificationError> {
        let timeout = Duration::from_millis(config.timeout_ms);
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| ClassificationError::Unreachable(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint: config.endpoint.clone(),
            timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn map_transport_error(&self, err: reqwest::Error) -> ClassificationError {
        if err.is_timeout() {
            ClassificationError::Timeout(self.timeout)
        } else {
            ClassificationError::Unreachable(err.to_string())
        }
    }
}

#[async_trait]
impl KpiClassifier for HttpClassifier {
    async fn classify(&self, snapshot: &KpiSnapshot) -> Result<KpiClass, ClassificationError> {
        tracing::debug!(endpoint = %self.endpoint, "Requesting KPI classification");

        let response = self
            .http_client
            .post(&self.endpoint)
            .json(snapshot)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ClassificationError::Api(status.as_u16(), error_text));
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let kpi_class = parse_response(&body)?;

        tracing::debug!(kpi_class = %kpi_class, "Classifier returned label");

        Ok(kpi_class)
    }
}

/// Decode a classifier response body.
///
/// Accepts `{"kpi_class": "<label>"}` or a bare JSON string.
pub fn parse_response(body: &str) -> Result<KpiClass, ClassificationError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| ClassificationError::MalformedResponse(e.to_string()))?;

    let label = match &value {
        Value::String(label) => label.as_str(),
        Value::Object(map) => match map.get("kpi_class") {
            Some(Value::String(label)) => label.as_str(),
            Some(other) => return Err(ClassificationError::InvalidLabel(other.to_string())),
            None => {
                return Err(ClassificationError::MalformedResponse(
                    "missing kpi_class field".to_string(),
                ))
            }
        },
        other => {
            return Err(ClassificationError::MalformedResponse(format!(
                "unexpected response: {}",
                other
            )))
        }
    };

    KpiClass::parse_label(label).ok_or_else(|| ClassificationError::InvalidLabel(label.to_string()))
}
