//! Tests for the web controller dispatch flow.

use super::*;
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};

struct EchoController {
    accept: bool,
    fail: bool,
    handled: AtomicBool,
    response: ControllerResponse,
}

impl EchoController {
    fn new(accept: bool) -> Self {
        Self {
            accept,
            fail: false,
            handled: AtomicBool::new(false),
            response: ControllerResponse::ok(json!({"echo": true})),
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(true)
        }
    }

    fn with_response(response: ControllerResponse) -> Self {
        Self {
            response,
            ..Self::new(true)
        }
    }
}

#[async_trait]
impl WebController for EchoController {
    fn api_name(&self) -> &str {
        "echo"
    }

    fn api_version(&self) -> &str {
        "1.0"
    }

    async fn validate_request(&self, _context: &RequestContext) -> bool {
        self.accept
    }

    async fn handle_request(
        &self,
        _context: &RequestContext,
    ) -> Result<ControllerResponse, ControllerError> {
        self.handled.store(true, Ordering::SeqCst);
        if self.fail {
            return Err(ControllerError::Handler {
                message: "downstream unavailable".to_string(),
            });
        }
        Ok(self.response.clone())
    }
}

fn request() -> RequestContext {
    RequestContext::new("inv-1", "POST").with_body(json!({"input": 1}))
}

#[tokio::test]
async fn test_invoke_defaults_json_content_type() {
    let controller = EchoController::new(true);

    let response = controller.invoke(&request()).await.unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(
        response.headers.get("content-type").map(String::as_str),
        Some(JSON_CONTENT_TYPE)
    );
    assert_eq!(
        response
            .headers
            .get("x-content-type-options")
            .map(String::as_str),
        Some("nosniff")
    );
    assert_eq!(response.body, Some(json!({"echo": true})));
}

#[tokio::test]
async fn test_invoke_keeps_explicit_content_type() {
    let controller = EchoController::with_response(
        ControllerResponse::ok(json!("csv")).with_header("content-type", "text/csv"),
    );

    let response = controller.invoke(&request()).await.unwrap();

    assert_eq!(
        response.headers.get("content-type").map(String::as_str),
        Some("text/csv")
    );
    // The sniffing guard is only added together with the defaulted type.
    assert!(!response.headers.contains_key("x-content-type-options"));
}

#[tokio::test]
async fn test_invalid_request_skips_handler() {
    let controller = EchoController::new(false);

    let error = controller.invoke(&request()).await.unwrap_err();

    assert_eq!(
        error,
        ControllerError::InvalidRequest {
            api_name: "echo".to_string()
        }
    );
    assert!(!controller.handled.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_handler_error_propagates() {
    let controller = EchoController::failing();

    let error = controller.invoke(&request()).await.unwrap_err();

    assert_eq!(
        error,
        ControllerError::Handler {
            message: "downstream unavailable".to_string()
        }
    );
    assert!(controller.handled.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_provider_error_converts() {
    let provider_error = anchorage_core::ProviderError::MissingConfiguration {
        variable: "KEY_VAULT_URL".to_string(),
    };
    let error: ControllerError = provider_error.clone().into();
    assert_eq!(error, ControllerError::Provider(provider_error));
}

#[test]
fn test_no_content_response() {
    let response = ControllerResponse::no_content();
    assert_eq!(response.status, 204);
    assert!(response.body.is_none());
}
