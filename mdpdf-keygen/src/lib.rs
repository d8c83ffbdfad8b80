//! Shared types and HTTP API for the MDPDF key issuer.

use std::{path::Path, sync::Arc};
use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use mdpdf_license::{KeyGenerator, KeyScheme, KeyValidator, LicenseResult};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

/// Key issuing state shared by all requests.
///
/// Each request builds its own generator over the thread-local RNG, so no
/// lock is held while keys are generated.
#[derive(Debug, Clone)]
pub struct KeyService {
    validator: KeyValidator,
}

impl KeyService {
    /// Creates a service for `scheme`.
    pub fn new(scheme: KeyScheme) -> LicenseResult<Self> {
        Ok(Self {
            validator: KeyValidator::new(scheme)?,
        })
    }

    /// Returns the active scheme.
    pub fn scheme(&self) -> &KeyScheme {
        self.validator.scheme()
    }

    fn issue(&self) -> LicenseResult<String> {
        let mut generator = KeyGenerator::with_scheme(self.scheme().clone())?;
        Ok(generator.generate()?.into_string())
    }
}

/// Loads the key scheme from `path`, or the production scheme when absent.
pub fn load_scheme(path: Option<&Path>) -> Result<KeyScheme> {
    match path {
        Some(path) => KeyScheme::load(path)
            .with_context(|| format!("failed to load key scheme from {}", path.display())),
        None => Ok(KeyScheme::mdpdf()),
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct IssueResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ValidateRequest {
    pub key: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ValidateResponse {
    pub valid: bool,
    pub reason: Option<String>,
}

async fn issue_handler(State(service): State<Arc<KeyService>>) -> Response {
    match service.issue() {
        Ok(key) => {
            info!("License key issued");
            Json(IssueResponse {
                success: true,
                key: Some(key),
                error: None,
            })
            .into_response()
        }
        Err(e) => {
            error!(error = %e, "License key issuing failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(IssueResponse {
                    success: false,
                    key: None,
                    error: Some(e.to_string()),
                }),
            )
                .into_response()
        }
    }
}

async fn validate_handler(
    State(service): State<Arc<KeyService>>,
    Json(request): Json<ValidateRequest>,
) -> Json<ValidateResponse> {
    let reason = service.validator.check(&request.key).err().map(|e| e.to_string());
    Json(ValidateResponse {
        valid: reason.is_none(),
        reason,
    })
}

async fn scheme_handler(State(service): State<Arc<KeyService>>) -> Json<KeyScheme> {
    Json(service.scheme().clone())
}

/// Build the HTTP API router with the given key service.
pub fn build_router(service: Arc<KeyService>) -> Router {
    Router::new()
        .route("/api/v1/keys", post(issue_handler))
        .route("/api/v1/keys/validate", post(validate_handler))
        .route("/api/v1/scheme", get(scheme_handler))
        .with_state(service)
}
