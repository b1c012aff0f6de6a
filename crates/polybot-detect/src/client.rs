// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Async HTTP client for the object-detection service.
//
// Sends `POST {base_url}/predict?imgName=<name>` and decodes the prediction
// summary. Every failure is translated into a `PolybotError`:
//   - request timeout          -> DetectionTimeout
//   - 404                      -> DetectionNotFound
//   - other status / transport -> Detection

use std::time::Duration;

use polybot_core::DetectionConfig;
use polybot_core::error::{PolybotError, Result};
use reqwest::StatusCode;
use tracing::{debug, error, info, instrument};

use crate::summary::PredictionSummary;

/// Client bound to one detection service.
///
/// Cheap to clone; clones share the underlying connection pool. All methods
/// are async and require a Tokio runtime.
#[derive(Debug, Clone)]
pub struct DetectionClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl DetectionClient {
    /// Create a client for `base_url` (without the `/predict` path).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PolybotError::Detection(format!("building HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
            timeout,
        })
    }

    /// Create a client from configuration.
    pub fn from_config(config: &DetectionConfig) -> Result<Self> {
        Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Ask the service to run detection on an image it can fetch by name.
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    pub async fn predict(&self, img_name: &str) -> Result<PredictionSummary> {
        let url = format!("{}/predict", self.base_url);
        info!("requesting prediction");

        let response = self
            .http
            .post(&url)
            .query(&[("imgName", img_name)])
            .send()
            .await
            .map_err(|e| self.translate_transport(e))?;

        let status = response.status();
        debug!(%status, "prediction response received");

        if status == StatusCode::NOT_FOUND {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    debug!(error = %e, "could not read 404 body");
                    String::new()
                }
            };
            return Err(PolybotError::DetectionNotFound(if body.is_empty() {
                img_name.to_owned()
            } else {
                body
            }));
        }
        if !status.is_success() {
            error!(%status, "prediction request failed");
            return Err(PolybotError::Detection(format!("prediction returned status {status}")));
        }

        let summary: PredictionSummary = response
            .json()
            .await
            .map_err(|e| self.translate_transport(e))?;
        info!(
            prediction_id = %summary.prediction_id,
            objects = summary.labels.len(),
            "prediction complete"
        );
        Ok(summary)
    }

    fn translate_transport(&self, err: reqwest::Error) -> PolybotError {
        if err.is_timeout() {
            error!(
                timeout_ms = self.timeout.as_millis() as u64,
                "prediction timed out"
            );
            PolybotError::DetectionTimeout(format!("no answer within {:?}", self.timeout))
        } else if err.is_decode() {
            PolybotError::Detection(format!("malformed prediction summary: {err}"))
        } else {
            PolybotError::Detection(err.to_string())
        }
    }
}
