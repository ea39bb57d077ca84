//! RFC 7807 problem documents.

use axum::{
    http::{HeaderValue, StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use log::error;
use serde::{Deserialize, Serialize};

/// Prefix of every problem type URI emitted by the bot.
pub const ERROR_TYPE_PREFIX: &str = "urn:ffxiv-status:error:";

const PROBLEM_CONTENT_TYPE: &str = "application/problem+json";
const UNKNOWN_TYPE: &str = "unknown";

/// Problem document written back on request errors.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    /// URI identifying the problem type.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// HTTP status code, also used as the response status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
}

impl ErrorResponse {
    /// Create a problem document of type `<prefix><name>`.
    pub fn new(status: StatusCode, name: &str, title: &str) -> Self {
        ErrorResponse {
            kind: format!("{}{}", ERROR_TYPE_PREFIX, name),
            title: Some(title.to_owned()),
            status: Some(status.as_u16()),
            detail: None,
            instance: None,
        }
    }

    /// Set the human readable explanation.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Problem raised when no handler matches the invoked command.
    pub fn unknown_command(name: &str) -> Self {
        ErrorResponse::new(StatusCode::BAD_REQUEST, "unknown-command", "Unknown command")
            .with_detail(format!("The command '{}' is not handled by this bot.", name))
    }

    /// Fix a document that cannot be written as is.
    ///
    /// A missing status or one outside `400..=599` becomes `500`, and an empty
    /// type becomes `unknown`.
    fn normalized(mut self) -> Self {
        match self.status {
            Some(status) if (400..=599).contains(&status) => {}
            status => {
                error!("invalid problem status {:?}, using 500", status);
                self.status = Some(StatusCode::INTERNAL_SERVER_ERROR.as_u16());
            }
        }

        if self.kind.is_empty() {
            error!("problem without type, using '{}'", UNKNOWN_TYPE);
            self.kind = UNKNOWN_TYPE.to_owned();
        }

        self
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let problem = self.normalized();

        let status = problem
            .status
            .and_then(|status| StatusCode::from_u16(status).ok())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let body = match serde_json::to_vec(&problem) {
            Ok(body) => body,
            Err(e) => {
                error!("cannot serialize problem document: {}", e);
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
        };

        let mut response = (status, body).into_response();
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static(PROBLEM_CONTENT_TYPE));
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn read_problem(response: Response) -> ErrorResponse {
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[test]
    fn test_unknown_command() {
        let problem = ErrorResponse::unknown_command("weather");

        assert_eq!(problem.kind, "urn:ffxiv-status:error:unknown-command");
        assert_eq!(problem.title.as_deref(), Some("Unknown command"));
        assert_eq!(problem.status, Some(400));
        assert!(problem.detail.unwrap().contains("weather"));
    }

    #[tokio::test]
    async fn test_into_response() {
        let response = ErrorResponse::unknown_command("weather").into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            "application/problem+json"
        );

        let problem = read_problem(response).await;
        assert_eq!(problem.kind, "urn:ffxiv-status:error:unknown-command");
        assert!(problem.instance.is_none());
    }

    #[tokio::test]
    async fn test_invalid_status_is_normalized() {
        let problem = ErrorResponse {
            kind: String::new(),
            title: None,
            status: Some(200),
            detail: None,
            instance: None,
        };

        let response = problem.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let problem = read_problem(response).await;
        assert_eq!(problem.status, Some(500));
        assert_eq!(problem.kind, "unknown");
    }

    #[tokio::test]
    async fn test_missing_status_is_normalized() {
        let mut problem = ErrorResponse::new(StatusCode::CONFLICT, "conflict", "Conflict");
        problem.status = None;

        let response = problem.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_valid_status_is_kept() {
        let response =
            ErrorResponse::new(StatusCode::SERVICE_UNAVAILABLE, "upstream", "Upstream down")
                .into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
