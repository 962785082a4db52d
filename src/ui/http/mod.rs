//! HTTP gateway: the single choke point for outbound API calls
//!
//! Every request gets a JSON content type and, unless `skip_auth` is set, the
//! persisted bearer token. Failures are normalized into [`ApiError`] and
//! surfaced to the user exactly once, unless the call is `silent`. A 401 ends
//! the session only if it still holds the token that was sent. No retries
//! happen here.

pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

use crate::core::models::ErrorBody;
use crate::ui::auth_utils::TokenSource;
use crate::ui::config::ClientConfig;
use crate::ui::navigation::Navigator;
use crate::ui::notifications::Notifier;
use crate::ui::router::routes::LOGIN_PATH;

pub use transport::{ApiRequest, ApiResponse, HttpTransport, Method, TransportError};

/// Shown when an authenticated request comes back 401
pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired, please log in again";

/// Fallback for non-success responses without a readable message
pub const REQUEST_FAILED_MESSAGE: &str = "Request failed";

/// Shown when no response arrived at all
pub const NETWORK_FAILED_MESSAGE: &str = "Network request failed";

/// Normalized gateway failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// 401: the session (or login attempt) was rejected
    #[error("{message}")]
    Unauthorized { message: String },

    /// Any other non-2xx status
    #[error("{message}")]
    Http { status: u16, message: String },

    /// No response was received
    #[error("Network request failed: {0}")]
    Network(String),

    /// A success response whose body could not be decoded
    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }

    /// HTTP status, when a response was received
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { .. } => Some(401),
            ApiError::Http { status, .. } => Some(*status),
            ApiError::Network(_) | ApiError::Decode(_) => None,
        }
    }
}

/// Decoded success body
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(serde_json::Value),
    Text(String),
}

impl ResponseBody {
    /// Decode into a typed value; a text body decodes as a JSON string
    pub fn into_typed<T: DeserializeOwned>(self) -> Result<T, serde_json::Error> {
        match self {
            ResponseBody::Json(value) => serde_json::from_value(value),
            ResponseBody::Text(text) => serde_json::from_value(serde_json::Value::String(text)),
        }
    }
}

/// Per-call options
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    /// Do not attach the bearer token
    pub skip_auth: bool,
    /// Fail without notifying or navigating
    pub silent: bool,
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            headers: Vec::new(),
            body: None,
            skip_auth: false,
            silent: false,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn skip_auth(mut self) -> Self {
        self.skip_auth = true;
        self
    }

    pub fn silent(mut self) -> Self {
        self.silent = true;
        self
    }
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::new(Method::Get)
    }
}

/// Callback run whenever a 401 tears the session down
pub type UnauthorizedHook = Arc<dyn Fn() + Send + Sync>;

/// Authenticated JSON client
pub struct HttpGateway<T> {
    config: ClientConfig,
    transport: T,
    tokens: Arc<dyn TokenSource>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    on_unauthorized: Option<UnauthorizedHook>,
}

impl<T: HttpTransport> HttpGateway<T> {
    pub fn new(
        config: ClientConfig,
        transport: T,
        tokens: Arc<dyn TokenSource>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            config,
            transport,
            tokens,
            notifier,
            navigator,
            on_unauthorized: None,
        }
    }

    /// Register a callback for 401 responses, run after the token is cleared
    pub fn on_unauthorized(mut self, hook: UnauthorizedHook) -> Self {
        self.on_unauthorized = Some(hook);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build the outbound request; also returns the bearer token it carries
    fn build_request(&self, endpoint: &str, options: RequestOptions) -> (ApiRequest, Option<String>) {
        let mut headers = options.headers;

        if !headers
            .iter()
            .any(|(k, _)| k.eq_ignore_ascii_case("content-type"))
        {
            headers.push(("Content-Type".to_string(), "application/json".to_string()));
        }

        let attached = if options.skip_auth {
            None
        } else {
            self.tokens.load()
        };
        if let Some(token) = &attached {
            headers.retain(|(k, _)| !k.eq_ignore_ascii_case("authorization"));
            headers.push(("Authorization".to_string(), format!("Bearer {}", token)));
        }

        let request = ApiRequest {
            method: options.method,
            url: self.config.url(endpoint),
            headers,
            body: options.body,
        };
        (request, attached)
    }

    /// Send a request and apply the response policy
    pub async fn request(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<ResponseBody, ApiError> {
        let silent = options.silent;
        let (request, attached) = self.build_request(endpoint, options);
        let method = request.method;

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                leptos::logging::warn!("{} {} failed: {}", method, endpoint, e);
                if !silent {
                    self.notifier.error(NETWORK_FAILED_MESSAGE);
                }
                return Err(ApiError::Network(e.0));
            }
        };

        if response.status == 401 {
            return Err(self.handle_unauthorized(&response, attached, silent));
        }

        if !response.is_success() {
            let message = error_message(&response).unwrap_or_else(|| REQUEST_FAILED_MESSAGE.into());
            if !silent {
                self.notifier.error(&message);
            }
            return Err(ApiError::Http {
                status: response.status,
                message,
            });
        }

        if response.is_json() {
            serde_json::from_str(&response.body)
                .map(ResponseBody::Json)
                .map_err(|e| self.decode_failure(e, silent))
        } else {
            Ok(ResponseBody::Text(response.body))
        }
    }

    fn handle_unauthorized(
        &self,
        response: &ApiResponse,
        attached: Option<String>,
        silent: bool,
    ) -> ApiError {
        let message = error_message(response).unwrap_or_else(|| SESSION_EXPIRED_MESSAGE.into());

        let Some(sent) = attached else {
            // No credential went out, so this is a rejected login rather than an expiry
            if !silent {
                self.notifier.error(&message);
            }
            return ApiError::Unauthorized { message };
        };

        // A session replaced while the request was in flight is not the one rejected
        if self.tokens.load().as_deref() != Some(sent.as_str()) {
            leptos::logging::log!("Ignoring 401 for a superseded session");
            return ApiError::Unauthorized { message };
        }

        self.tokens.clear();
        if let Some(hook) = &self.on_unauthorized {
            hook();
        }

        if !silent {
            self.notifier.error(SESSION_EXPIRED_MESSAGE);
            self.navigator.navigate(LOGIN_PATH);
        }
        ApiError::Unauthorized { message }
    }

    fn decode_failure(&self, err: serde_json::Error, silent: bool) -> ApiError {
        let error = ApiError::Decode(err.to_string());
        if !silent {
            self.notifier.error(&error.to_string());
        }
        error
    }

    /// Send a request and decode the success body into `R`
    pub async fn request_typed<R: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<R, ApiError> {
        let silent = options.silent;
        self.request(endpoint, options)
            .await?
            .into_typed()
            .map_err(|e| self.decode_failure(e, silent))
    }

    pub async fn get<R: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<R, ApiError> {
        let options = RequestOptions {
            method: Method::Get,
            ..options
        };
        self.request_typed(endpoint, options).await
    }

    pub async fn post<B: Serialize, R: DeserializeOwned>(
        &self,
        endpoint: &str,
        data: Option<&B>,
        options: RequestOptions,
    ) -> Result<R, ApiError> {
        let options = self.with_json_body(Method::Post, data, options)?;
        self.request_typed(endpoint, options).await
    }

    pub async fn put<B: Serialize, R: DeserializeOwned>(
        &self,
        endpoint: &str,
        data: Option<&B>,
        options: RequestOptions,
    ) -> Result<R, ApiError> {
        let options = self.with_json_body(Method::Put, data, options)?;
        self.request_typed(endpoint, options).await
    }

    pub async fn delete<R: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<R, ApiError> {
        let options = RequestOptions {
            method: Method::Delete,
            ..options
        };
        self.request_typed(endpoint, options).await
    }

    fn with_json_body<B: Serialize>(
        &self,
        method: Method,
        data: Option<&B>,
        options: RequestOptions,
    ) -> Result<RequestOptions, ApiError> {
        let body = data
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(RequestOptions {
            method,
            body,
            ..options
        })
    }
}

/// Structured `message` field of an error body, if there is one
fn error_message(response: &ApiResponse) -> Option<String> {
    serde_json::from_str::<ErrorBody>(&response.body)
        .ok()
        .map(|body| body.message)
        .filter(|message| !message.is_empty())
}
