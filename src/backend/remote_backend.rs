use crate::constant::GENERIC_ERROR_MESSAGE;
use reqwest::blocking::Client;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RemoteError {
    /// Non-2xx answer, message already normalized
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Request failed: {0}")]
    Network(String),

    #[error("Failed to parse response: {0}")]
    Decode(String),

    /// Rejected locally, nothing was sent
    #[error("{0}")]
    Validation(String),
}

impl RemoteError {
    pub fn status(&self) -> Option<u16> {
        match self {
            RemoteError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Status and undecoded body of a finished request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Seam between action logic and the wire
pub trait Transport: Send + Sync {
    fn send(&self, method: Method, path: &str, body: Option<&Value>)
    -> Result<RawResponse, RemoteError>;
}

pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build HTTP client, using defaults: {}", e);
                Client::new()
            });

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

impl Transport for HttpTransport {
    fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<RawResponse, RemoteError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("{:?} {}", method, url);

        let mut request = self.client.request(method.into(), &url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .map_err(|e| RemoteError::Network(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        Ok(RawResponse { status, body })
    }
}

/// Pull a human message out of an error body.
///
/// Looked up in order: `detail.detail` when `detail` is a structured error
/// carrying `error_type`, `detail` itself when it is a string, then the
/// generic fallback. A top-level `error_type` beside an object `detail` has
/// no usable text and also gets the fallback.
pub fn normalize_error_message(body: &Value) -> String {
    match body.get("detail") {
        Some(Value::Object(inner)) if inner.contains_key("error_type") => {
            match inner.get("detail") {
                Some(Value::String(message)) if !message.is_empty() => message.clone(),
                Some(Value::String(_)) | Some(Value::Null) | None => {
                    GENERIC_ERROR_MESSAGE.to_string()
                }
                Some(other) => other.to_string(),
            }
        }
        Some(Value::String(message)) if !message.is_empty() => message.clone(),
        _ => GENERIC_ERROR_MESSAGE.to_string(),
    }
}

/// Decode a raw response: the JSON body on success, a normalized error otherwise
pub fn handle_api_response(response: RawResponse) -> Result<Value, RemoteError> {
    let parsed = if response.body.trim().is_empty() {
        Ok(Value::Null)
    } else {
        serde_json::from_str::<Value>(&response.body)
    };

    if response.is_success() {
        return parsed.map_err(|e| RemoteError::Decode(e.to_string()));
    }

    let message = match parsed {
        Ok(body) => normalize_error_message(&body),
        Err(_) => format!("HTTP error! Status: {}", response.status),
    };

    Err(RemoteError::Api {
        status: response.status,
        message,
    })
}

#[derive(Clone)]
pub struct RemoteClient {
    transport: Arc<dyn Transport>,
}

impl RemoteClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub fn http(base_url: impl Into<String>) -> Self {
        Self::new(Arc::new(HttpTransport::new(base_url)))
    }

    pub fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, RemoteError> {
        let response = self.transport.send(method, path, body)?;
        handle_api_response(response)
    }

    pub fn get(&self, path: &str) -> Result<Value, RemoteError> {
        self.request(Method::Get, path, None)
    }

    pub fn post(&self, path: &str, body: &Value) -> Result<Value, RemoteError> {
        self.request(Method::Post, path, Some(body))
    }

    pub fn delete(&self, path: &str) -> Result<Value, RemoteError> {
        self.request(Method::Delete, path, None)
    }
}

/// Busy/disabled state of the control that started an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionButton {
    idle_label: String,
    busy_label: String,
    busy: bool,
}

impl ActionButton {
    pub fn new(idle_label: impl Into<String>, busy_label: impl Into<String>) -> Self {
        Self {
            idle_label: idle_label.into(),
            busy_label: busy_label.into(),
            busy: false,
        }
    }

    /// Returns false if a request is already in flight
    pub fn begin(&mut self) -> bool {
        if self.busy {
            return false;
        }
        self.busy = true;
        true
    }

    /// Restore the original label; called on success and failure alike
    pub fn finish(&mut self) {
        self.busy = false;
    }

    pub fn label(&self) -> &str {
        if self.busy {
            &self.busy_label
        } else {
            &self.idle_label
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.busy
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays canned responses and records what was sent
    #[derive(Default)]
    pub(crate) struct MockTransport {
        pub responses: Mutex<VecDeque<Result<RawResponse, RemoteError>>>,
        pub sent: Mutex<Vec<(Method, String, Option<Value>)>>,
    }

    impl MockTransport {
        pub fn with(responses: Vec<Result<RawResponse, RemoteError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                sent: Mutex::new(Vec::new()),
            })
        }

        pub fn sent(&self) -> Vec<(Method, String, Option<Value>)> {
            self.sent.lock().unwrap().clone()
        }
    }

    impl Transport for MockTransport {
        fn send(
            &self,
            method: Method,
            path: &str,
            body: Option<&Value>,
        ) -> Result<RawResponse, RemoteError> {
            self.sent
                .lock()
                .unwrap()
                .push((method, path.to_string(), body.cloned()));
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(RawResponse::new(404, "")))
        }
    }

    #[test]
    fn nested_detail_wins() {
        let body = json!({"detail": {"error_type": "conflict", "detail": "Username already exists"}});
        assert_eq!(normalize_error_message(&body), "Username already exists");
    }

    #[test]
    fn string_detail_is_used_directly() {
        let body = json!({"detail": "Team not found"});
        assert_eq!(normalize_error_message(&body), "Team not found");
    }

    #[test]
    fn unrecognized_shapes_fall_back_to_generic() {
        assert_eq!(
            normalize_error_message(&json!({"error_type": "conflict"})),
            GENERIC_ERROR_MESSAGE
        );
        assert_eq!(normalize_error_message(&json!({})), GENERIC_ERROR_MESSAGE);
        assert_eq!(
            normalize_error_message(&json!({"detail": {"error_type": "x"}})),
            GENERIC_ERROR_MESSAGE
        );
        assert_eq!(
            normalize_error_message(&json!({"error_type": "conflict", "detail": {"field": "name"}})),
            GENERIC_ERROR_MESSAGE
        );
        assert_eq!(
            normalize_error_message(&json!({"detail": {"detail": "no type tag"}})),
            GENERIC_ERROR_MESSAGE
        );
    }

    #[test]
    fn success_body_is_returned() {
        let value = handle_api_response(RawResponse::new(201, r#"{"id": 3}"#)).unwrap();
        assert_eq!(value["id"], 3);
        assert_eq!(
            handle_api_response(RawResponse::new(204, "")).unwrap(),
            Value::Null
        );
    }

    #[test]
    fn non_json_error_reports_status() {
        let err = handle_api_response(RawResponse::new(502, "<html>bad gateway</html>")).unwrap_err();
        assert_eq!(err.status(), Some(502));
        assert_eq!(err.to_string(), "HTTP error! Status: 502");
    }

    #[test]
    fn client_routes_through_transport() {
        let transport = MockTransport::with(vec![Ok(RawResponse::new(
            400,
            r#"{"detail": "Bad input"}"#,
        ))]);
        let client = RemoteClient::new(transport.clone());
        let err = client.post("/api/things", &json!({"a": 1})).unwrap_err();
        assert_eq!(
            err,
            RemoteError::Api {
                status: 400,
                message: "Bad input".to_string()
            }
        );
        let sent = transport.sent();
        assert_eq!(sent[0].0, Method::Post);
        assert_eq!(sent[0].1, "/api/things");
    }

    #[test]
    fn button_blocks_double_submit() {
        let mut button = ActionButton::new("Send Invitation", "Sending...");
        assert!(button.begin());
        assert!(!button.begin());
        assert_eq!(button.label(), "Sending...");
        assert!(button.is_disabled());
        button.finish();
        assert_eq!(button.label(), "Send Invitation");
        assert!(!button.is_disabled());
    }
}
