//! HTTP client for the expense backend
//!
//! Every request carries the stored bearer token. Responses settle into an
//! [`Outcome`]:
//! - 2xx with a body decodes to `Data`
//! - 204 or `Content-Length: 0` is `NoContent`
//! - 401 outside the login call clears the token and is `LoginRequired`
//! - anything else becomes [`ApiError::Http`] with the backend's message

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use reqwest::header::CONTENT_LENGTH;
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use spendboard_config::ApiConfig;

use crate::error::{ApiError, ApiResult, GENERIC_ERROR_MESSAGE};
use crate::session::SessionStore;

/// A 401 from this endpoint means bad credentials, not an expired session
pub const LOGIN_ENDPOINT: &str = "/auth/login";

/// Settled result of a request that did not fail
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Data(T),
    NoContent,
    /// The session was rejected and its token cleared
    LoginRequired,
}

impl<T> Outcome<T> {
    pub fn is_login_required(&self) -> bool {
        matches!(self, Outcome::LoginRequired)
    }

    /// The payload, if there was one
    pub fn into_data(self) -> Option<T> {
        match self {
            Outcome::Data(data) => Some(data),
            _ => None,
        }
    }
}

/// Pick the most useful message out of an error body.
///
/// A JSON object yields its `message`, then its `error` field. Other JSON
/// yields the generic message. Non-JSON text is returned as-is.
pub fn extract_error_message(body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        return GENERIC_ERROR_MESSAGE.to_string();
    }

    match serde_json::from_str::<Value>(body) {
        Ok(value) => ["message", "error"]
            .iter()
            .filter_map(|field| value.get(field).and_then(Value::as_str))
            .find(|message| !message.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string()),
        Err(_) => body.to_string(),
    }
}

pub struct ApiClient {
    client: Client,
    config: ApiConfig,
    session: Arc<dyn SessionStore>,
}

impl ApiClient {
    pub fn new(config: ApiConfig, session: Arc<dyn SessionStore>) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| ApiError::Configuration {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            config,
            session,
        })
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> ApiResult<Outcome<T>> {
        self.request::<(), T>(Method::GET, endpoint, None).await
    }

    pub async fn post<B, T>(&self, endpoint: &str, body: &B) -> ApiResult<Outcome<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(Method::POST, endpoint, Some(body)).await
    }

    pub async fn put<B, T>(&self, endpoint: &str, body: &B) -> ApiResult<Outcome<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(Method::PUT, endpoint, Some(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, endpoint: &str) -> ApiResult<Outcome<T>> {
        self.request::<(), T>(Method::DELETE, endpoint, None).await
    }

    /// Send one request and settle its response
    pub async fn request<B, T>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
    ) -> ApiResult<Outcome<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.config.endpoint_url(endpoint);
        debug!("{} {}", method, url);

        let mut request = self.client.request(method.clone(), &url);
        if let Some(token) = self.session.token() {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        self.settle(response, &method, endpoint).await
    }

    async fn settle<T: DeserializeOwned>(
        &self,
        response: Response,
        method: &Method,
        endpoint: &str,
    ) -> ApiResult<Outcome<T>> {
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED && !endpoint.starts_with(LOGIN_ENDPOINT) {
            warn!("{} {} rejected the session, clearing token", method, endpoint);
            if let Err(e) = self.session.clear_token() {
                warn!("failed to clear token: {}", e);
            }
            return Ok(Outcome::LoginRequired);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = extract_error_message(&body);
            warn!("{} {} failed with {}: {}", method, endpoint, status, message);
            return Err(ApiError::Http {
                status: status.as_u16(),
                message,
            });
        }

        if status == StatusCode::NO_CONTENT || has_zero_length(&response) {
            info!("{} {} returned no content", method, endpoint);
            return Ok(Outcome::NoContent);
        }

        let body = response.text().await?;
        let data = serde_json::from_str(&body).map_err(|e| ApiError::Decode {
            message: format!("{} {}: {}", method, endpoint, e),
        })?;
        info!("{} {} succeeded", method, endpoint);
        Ok(Outcome::Data(data))
    }
}

fn has_zero_length(response: &Response) -> bool {
    response
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.trim() == "0")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{MemorySessionStore, Session};
    use axum::http::{HeaderMap, StatusCode as AxumStatus};
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::json;

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/api", addr)
    }

    fn signed_in_store() -> Arc<MemorySessionStore> {
        Arc::new(MemorySessionStore::new(Session {
            token: Some("tok-123".to_string()),
            user_id: Some(1),
            user_name: Some("Asha".to_string()),
            theme: None,
        }))
    }

    fn client(base_url: String, store: Arc<MemorySessionStore>) -> ApiClient {
        let config = ApiConfig {
            base_url,
            timeout_seconds: 5,
        };
        ApiClient::new(config, store).unwrap()
    }

    #[test]
    fn test_extract_error_message() {
        assert_eq!(extract_error_message(r#"{"message":"Invalid email"}"#), "Invalid email");
        assert_eq!(
            extract_error_message(r#"{"error":"Budget limit must be a positive number"}"#),
            "Budget limit must be a positive number"
        );
        assert_eq!(
            extract_error_message(r#"{"error":"Bad Request","message":"Invalid email"}"#),
            "Invalid email"
        );
        assert_eq!(extract_error_message("Server exploded"), "Server exploded");
        assert_eq!(extract_error_message(""), GENERIC_ERROR_MESSAGE);
        assert_eq!(extract_error_message(r#"{"status":500}"#), GENERIC_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn test_bearer_token_is_sent() {
        let app = Router::new().route(
            "/api/echo",
            get(|headers: HeaderMap| async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("")
                    .to_string();
                Json(json!({ "auth": auth }))
            }),
        );
        let base = serve(app).await;
        let api = client(base, signed_in_store());

        let outcome: Outcome<Value> = api.get("/echo").await.unwrap();
        assert_eq!(outcome, Outcome::Data(json!({ "auth": "Bearer tok-123" })));
    }

    #[tokio::test]
    async fn test_no_token_sends_no_header() {
        let app = Router::new().route(
            "/api/echo",
            get(|headers: HeaderMap| async move {
                Json(json!({ "present": headers.contains_key("authorization") }))
            }),
        );
        let base = serve(app).await;
        let api = client(base, Arc::new(MemorySessionStore::default()));

        let outcome: Outcome<Value> = api.get("/echo").await.unwrap();
        assert_eq!(outcome, Outcome::Data(json!({ "present": false })));
    }

    #[tokio::test]
    async fn test_error_message_extraction_over_http() {
        let app = Router::new()
            .route(
                "/api/json-error",
                get(|| async {
                    (
                        AxumStatus::BAD_REQUEST,
                        Json(json!({ "message": "Invalid email" })),
                    )
                }),
            )
            .route(
                "/api/text-error",
                get(|| async { (AxumStatus::INTERNAL_SERVER_ERROR, "Server exploded") }),
            )
            .route(
                "/api/empty-error",
                get(|| async { AxumStatus::INTERNAL_SERVER_ERROR }),
            );
        let base = serve(app).await;
        let api = client(base, signed_in_store());

        let err = api.get::<Value>("/json-error").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid email");
        assert_eq!(err.status(), Some(400));

        let err = api.get::<Value>("/text-error").await.unwrap_err();
        assert_eq!(err.to_string(), "Server exploded");
        assert_eq!(err.status(), Some(500));

        let err = api.get::<Value>("/empty-error").await.unwrap_err();
        assert_eq!(err.to_string(), GENERIC_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn test_empty_success_is_no_content() {
        let app = Router::new()
            .route("/api/deleted", get(|| async { AxumStatus::NO_CONTENT }))
            .route("/api/empty", get(|| async { AxumStatus::OK }));
        let base = serve(app).await;
        let api = client(base, signed_in_store());

        let outcome: Outcome<Value> = api.get("/deleted").await.unwrap();
        assert_eq!(outcome, Outcome::NoContent);

        let outcome: Outcome<Value> = api.get("/empty").await.unwrap();
        assert_eq!(outcome, Outcome::NoContent);
    }

    #[tokio::test]
    async fn test_unauthorized_clears_token() {
        let app = Router::new().route(
            "/api/expenses/user/1",
            get(|| async { AxumStatus::UNAUTHORIZED }),
        );
        let base = serve(app).await;
        let store = signed_in_store();
        let api = client(base, store.clone());

        let outcome: Outcome<Value> = api.get("/expenses/user/1").await.unwrap();
        assert!(outcome.is_login_required());

        let session = store.load();
        assert_eq!(session.token, None);
        assert_eq!(session.user_id, Some(1));
    }

    #[tokio::test]
    async fn test_login_unauthorized_is_an_error() {
        let app = Router::new().route(
            "/api/auth/login",
            post(|| async {
                (
                    AxumStatus::UNAUTHORIZED,
                    Json(json!({ "message": "Invalid email or password" })),
                )
            }),
        );
        let base = serve(app).await;
        let store = signed_in_store();
        let api = client(base, store.clone());

        let err = api
            .post::<_, Value>(LOGIN_ENDPOINT, &json!({ "email": "a@b.c", "password": "x" }))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid email or password");
        assert_eq!(err.status(), Some(401));
        assert_eq!(store.token().as_deref(), Some("tok-123"));
    }

    #[tokio::test]
    async fn test_undecodable_body_is_decode_error() {
        let app = Router::new().route("/api/garbage", get(|| async { "not json" }));
        let base = serve(app).await;
        let api = client(base, signed_in_store());

        let err = api.get::<Vec<i64>>("/garbage").await.unwrap_err();
        assert!(matches!(err, ApiError::Decode { .. }));
    }
}
