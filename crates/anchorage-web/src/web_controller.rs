//! Polymorphic request handling for web-triggered controllers.

use anchorage_core::ProviderError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{error, info_span, warn, Instrument};

/// Content type applied to responses that do not set their own.
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

// ============================================================================
// Request and response types
// ============================================================================

/// Inputs of one web invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// Platform-assigned invocation identifier, carried into telemetry.
    pub invocation_id: String,

    /// HTTP method of the triggering request.
    pub method: String,

    /// Request headers (lowercase names).
    pub headers: HashMap<String, String>,

    /// Parsed JSON body, when present.
    pub body: Option<Value>,
}

impl RequestContext {
    /// Create a context with no headers and no body.
    pub fn new(invocation_id: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            invocation_id: invocation_id.into(),
            method: method.into(),
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Attach a JSON body.
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Outcome of one web invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControllerResponse {
    /// HTTP status code.
    pub status: u16,

    /// Response headers (lowercase names).
    pub headers: HashMap<String, String>,

    /// JSON body, when present.
    pub body: Option<Value>,
}

impl ControllerResponse {
    /// A `200 OK` response with a JSON body.
    pub fn ok(body: Value) -> Self {
        Self {
            status: 200,
            headers: HashMap::new(),
            body: Some(body),
        }
    }

    /// A `204 No Content` response.
    pub fn no_content() -> Self {
        Self {
            status: 204,
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Set a response header, replacing any existing value.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Default the content type to JSON and forbid content-type sniffing.
    ///
    /// A content type set by the handler is left untouched.
    fn ensure_content_type(&mut self) {
        if !self.headers.contains_key("content-type") {
            self.headers
                .insert("content-type".to_string(), JSON_CONTENT_TYPE.to_string());
            self.headers
                .insert("x-content-type-options".to_string(), "nosniff".to_string());
        }
    }
}

// ============================================================================
// ControllerError
// ============================================================================

/// Errors surfaced by web controllers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ControllerError {
    /// The request failed the controller's validation.
    #[error("Request validation failed for API '{api_name}'")]
    InvalidRequest { api_name: String },

    /// The handler itself failed.
    #[error("Request handling failed: {message}")]
    Handler { message: String },

    /// A resource provider the handler depends on failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

// ============================================================================
// WebController
// ============================================================================

/// Dispatch seam for web request handlers.
///
/// Concrete controllers implement validation and handling; [`invoke`]
/// (provided) runs the flow: open a request span carrying the API name,
/// version, and invocation ID; skip handling when validation fails; default
/// the response content type; log and propagate handler errors.
///
/// [`invoke`]: WebController::invoke
#[async_trait]
pub trait WebController: Send + Sync {
    /// Name of the API this controller serves.
    fn api_name(&self) -> &str;

    /// Version of the API this controller serves.
    fn api_version(&self) -> &str;

    /// Check whether the request is well-formed for this controller.
    async fn validate_request(&self, context: &RequestContext) -> bool;

    /// Handle a validated request.
    async fn handle_request(
        &self,
        context: &RequestContext,
    ) -> Result<ControllerResponse, ControllerError>;

    /// Run the full invocation flow for one request.
    async fn invoke(
        &self,
        context: &RequestContext,
    ) -> Result<ControllerResponse, ControllerError> {
        let span = info_span!(
            "web_request",
            api_name = self.api_name(),
            api_version = self.api_version(),
            invocation_id = %context.invocation_id,
        );

        async {
            if !self.validate_request(context).await {
                warn!("request failed validation");
                return Err(ControllerError::InvalidRequest {
                    api_name: self.api_name().to_string(),
                });
            }

            match self.handle_request(context).await {
                Ok(mut response) => {
                    response.ensure_content_type();
                    Ok(response)
                }
                Err(e) => {
                    error!(error = %e, "encountered an error while processing web request");
                    Err(e)
                }
            }
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "web_controller_tests.rs"]
mod tests;
