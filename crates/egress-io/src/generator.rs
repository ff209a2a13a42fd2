//! HTTP client for the upstream floorplan generator service.
//!
//! The external image-to-image service turns a raw sketch into the
//! combined color-coded floorplan this pipeline consumes. Triggering it
//! is a synchronous POST with the input image's absolute path; the
//! response body is not otherwise consumed — a success status means the
//! combined image file exists when the call returns.
//!
//! The request carries a bounded timeout and is retried exactly once
//! before the conversion run is declared failed. There is no
//! fire-and-forget path.

use std::path::Path;
use std::time::Duration;

use serde::Serialize;
use tracing::{info, warn};

/// Errors from the generator service boundary.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The input image path could not be resolved to an absolute path.
    #[error("failed to resolve input path {path}: {source}")]
    Path {
        /// The offending path.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The request failed on both the initial attempt and the retry.
    #[error("generator request to {url} failed: {source}")]
    Request {
        /// The endpoint that was called.
        url: String,
        /// The transport error from the final attempt.
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a non-success status.
    #[error("generator at {url} returned status {status}")]
    Status {
        /// The endpoint that was called.
        url: String,
        /// The response status code.
        status: reqwest::StatusCode,
    },
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    file_path: &'a str,
}

/// Blocking client for the generator service endpoint.
#[derive(Debug, Clone)]
pub struct GeneratorClient {
    endpoint: String,
    http: reqwest::blocking::Client,
}

impl GeneratorClient {
    /// Client for `endpoint` with a per-request `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::Client`] when the underlying HTTP
    /// client cannot be built.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, GeneratorError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(GeneratorError::Client)?;
        Ok(Self {
            endpoint: endpoint.into(),
            http,
        })
    }

    /// Ask the service to generate the combined floorplan for
    /// `image_path`.
    ///
    /// The path is resolved to an absolute path first — the service
    /// runs in its own working directory and interprets the path
    /// literally. One retry on failure, then the error is terminal.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::Path`] when the input path cannot be
    /// resolved, and [`GeneratorError::Request`] or
    /// [`GeneratorError::Status`] when both attempts fail.
    pub fn run(&self, image_path: &Path) -> Result<(), GeneratorError> {
        let absolute = std::fs::canonicalize(image_path).map_err(|source| GeneratorError::Path {
            path: image_path.display().to_string(),
            source,
        })?;
        let body = GenerateRequest {
            file_path: &absolute.to_string_lossy(),
        };

        info!(url = %self.endpoint, path = %absolute.display(), "triggering floorplan generation");
        match self.post(&body) {
            Ok(()) => Ok(()),
            Err(first) => {
                warn!(error = %first, "generator request failed, retrying once");
                self.post(&body)
            }
        }
    }

    fn post(&self, body: &GenerateRequest<'_>) -> Result<(), GeneratorError> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(body)
            .send()
            .map_err(|source| GeneratorError::Request {
                url: self.endpoint.clone(),
                source,
            })?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(GeneratorError::Status {
                url: self.endpoint.clone(),
                status,
            })
        }
    }
}
