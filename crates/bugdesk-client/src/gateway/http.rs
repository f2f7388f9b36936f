//! HTTP implementation of [`RemoteDataGateway`].

use super::RemoteDataGateway;
use crate::error::GatewayError;
use async_trait::async_trait;
use bugdesk_core::{
    ApiConfig, Assignee, Comment, NewComment, NewReport, NewUser, Principal, Report, ReportStatus,
};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Talks JSON to the bug-tracker API over HTTP.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct LoginBody<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PushTokenBody<'a> {
    user_id: &'a str,
    token: &'a str,
}

#[derive(Serialize)]
struct StatusBody {
    status: ReportStatus,
}

/// Empty strings clear the assignment on the server.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AssignBody<'a> {
    assigned_to_id: &'a str,
    assigned_to_name: &'a str,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, client }
    }

    pub fn from_config(config: &ApiConfig) -> Self {
        Self::new(config.base_url())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join path segments, percent-encoding each one.
    fn url(&self, segments: &[&str]) -> String {
        let mut url = self.base_url.clone();
        for segment in segments {
            url.push('/');
            url.push_str(&urlencoding::encode(segment));
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let url = self.url(segments);
        tracing::debug!(%method, %url, "API request");
        self.client.request(method, url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, GatewayError> {
        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = error_message(response).await;
        tracing::debug!(status = status.as_u16(), %message, "API request failed");
        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GatewayError::Auth(message),
            StatusCode::NOT_FOUND => GatewayError::NotFound(message),
            StatusCode::CONFLICT => GatewayError::Conflict(message),
            other => GatewayError::Server {
                status: other.as_u16(),
                message,
            },
        })
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, GatewayError> {
        self.send(request)
            .await?
            .json::<T>()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))
    }
}

/// Pull a readable message out of an error body.
///
/// The API answers `{"message": ...}` or `{"error": ...}`; anything else is
/// passed through as text.
async fn error_message(response: Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(&body)
        && let Some(message) = ["message", "error"]
            .iter()
            .find_map(|key| value.get(*key).and_then(|v| v.as_str()))
    {
        return message.to_string();
    }

    if body.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        body.trim().to_string()
    }
}

#[async_trait]
impl RemoteDataGateway for HttpGateway {
    async fn login(&self, username: &str, password: &str) -> Result<Principal, GatewayError> {
        let request = self
            .request(Method::POST, &["auth", "login"])
            .json(&LoginBody { username, password });
        // A rejected login body means bad credentials, not a server fault.
        self.send_json(request).await.map_err(|e| match e {
            GatewayError::Server { status: 400, message } => GatewayError::Auth(message),
            other => other,
        })
    }

    async fn register_push_token(&self, user_id: &str, token: &str) -> Result<(), GatewayError> {
        let request = self
            .request(Method::POST, &["users", "fcm-token"])
            .json(&PushTokenBody { user_id, token });
        self.send(request).await.map(|_| ())
    }

    async fn list_users(&self) -> Result<Vec<Principal>, GatewayError> {
        self.send_json(self.request(Method::GET, &["users"])).await
    }

    async fn create_user(&self, user: &NewUser) -> Result<Principal, GatewayError> {
        let request = self.request(Method::POST, &["users"]).json(user);
        self.send_json(request).await
    }

    async fn reset_password(&self, user_id: &str) -> Result<(), GatewayError> {
        let request = self.request(Method::POST, &["users", user_id, "reset-password"]);
        self.send(request).await.map(|_| ())
    }

    async fn list_reports(&self) -> Result<Vec<Report>, GatewayError> {
        self.send_json(self.request(Method::GET, &["reports"])).await
    }

    async fn get_report(&self, id: &str) -> Result<Report, GatewayError> {
        self.send_json(self.request(Method::GET, &["reports", id])).await
    }

    async fn create_report(&self, report: &NewReport) -> Result<Report, GatewayError> {
        let request = self.request(Method::POST, &["reports"]).json(report);
        self.send_json(request).await
    }

    async fn update_status(&self, id: &str, status: ReportStatus) -> Result<Report, GatewayError> {
        let request = self
            .request(Method::PUT, &["reports", id, "status"])
            .json(&StatusBody { status });
        self.send_json(request).await
    }

    async fn assign(&self, id: &str, assignee: Option<&Assignee>) -> Result<Report, GatewayError> {
        let body = match assignee {
            Some(assignee) => AssignBody {
                assigned_to_id: &assignee.id,
                assigned_to_name: &assignee.name,
            },
            None => AssignBody {
                assigned_to_id: "",
                assigned_to_name: "",
            },
        };
        let request = self
            .request(Method::PUT, &["reports", id, "assign"])
            .json(&body);
        self.send_json(request).await
    }

    async fn add_comment(
        &self,
        report_id: &str,
        comment: &NewComment,
    ) -> Result<Comment, GatewayError> {
        let request = self
            .request(Method::POST, &["reports", report_id, "comments"])
            .json(comment);
        self.send_json(request).await
    }
}
