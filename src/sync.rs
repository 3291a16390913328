//! API Sync Module
//!
//! Handles HTTP communication with the fleet backend.

use std::time::Duration;

use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::Config;
use crate::models::{ProfileSnapshot, Vehicle, VehicleDraft};

/// API client for the fleet backend
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        Self::new(&config.api_base_url, config.request_timeout)
    }

    /// Fetch the user's profile and fleet.
    ///
    /// Without a token the request goes out unauthenticated and the
    /// backend is expected to answer with [`ApiError::Unauthorized`].
    pub async fn fetch_profile(&self, token: Option<&str>) -> Result<ProfileSnapshot, ApiError> {
        let url = format!("{}/protected/", self.base_url);

        debug!("Fetching profile from: {}", url);

        let response = with_bearer(self.client.get(&url), token)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let snapshot = check_status(response)
            .await?
            .json::<ProfileSnapshot>()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))?;

        info!("Profile loaded with {} vehicle(s)", snapshot.fleet.len());
        Ok(snapshot)
    }

    /// Submit a draft for creation.
    ///
    /// The draft is forwarded as-is; validation and id assignment belong
    /// to the backend. A 2xx answer with `success: false` is returned as
    /// [`CreateVehicleOutcome::Rejected`], never as an error.
    pub async fn create_vehicle(
        &self,
        token: Option<&str>,
        draft: &VehicleDraft,
    ) -> Result<CreateVehicleOutcome, ApiError> {
        let url = format!("{}/protected/add-vehicle", self.base_url);

        debug!("Creating vehicle at: {}", url);

        let response = with_bearer(self.client.post(&url), token)
            .json(draft)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let data = check_status(response)
            .await?
            .json::<CreateVehicleResponse>()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))?;

        if !data.success {
            let reason = data.error.unwrap_or_else(|| "Vehicle rejected".into());
            info!("Vehicle creation rejected: {}", reason);
            return Ok(CreateVehicleOutcome::Rejected(reason));
        }

        let vehicle = data
            .vehicle
            .ok_or_else(|| ApiError::Parse("success response without vehicle".into()))?;

        info!("Vehicle created: {}", vehicle.id);
        Ok(CreateVehicleOutcome::Created(vehicle))
    }
}

fn with_bearer(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) => request.header("Authorization", format!("Bearer {}", token)),
        None => request,
    }
}

async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .json::<ErrorResponse>()
        .await
        .map(|body| body.error)
        .unwrap_or_else(|_| format!("Status: {}", status));

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ApiError::Unauthorized(message)),
        _ => Err(ApiError::Server {
            status: status.as_u16(),
            message,
        }),
    }
}

// Request/Response types

#[derive(Debug, Deserialize)]
struct CreateVehicleResponse {
    #[serde(default)]
    success: bool,
    vehicle: Option<Vehicle>,
    error: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
}

/// Result of a create request that reached the backend
#[derive(Debug, Clone, PartialEq)]
pub enum CreateVehicleOutcome {
    Created(Vehicle),
    /// Backend answered but refused the draft
    Rejected(String),
}

/// Coarse failure categories reported to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NetworkFailure,
    Unauthorized,
    ServerFailure,
}

/// API errors
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Network(_) => ErrorKind::NetworkFailure,
            ApiError::Unauthorized(_) => ErrorKind::Unauthorized,
            ApiError::Server { .. } | ApiError::Parse(_) => ErrorKind::ServerFailure,
        }
    }
}
