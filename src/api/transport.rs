use std::error::Error as StdError;
use std::fmt;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;

use crate::api::{ChatCompletion, ChatRequest};
use crate::utils::url::chat_completions_url;

const FALLBACK_ERROR: &str = "API connection failed";

/// Why a chat request produced no assistant reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// The request never got a response (DNS, TLS, connection reset, ...).
    Transport(String),

    /// The endpoint answered with a non-2xx status.
    Status { status: u16, message: String },

    /// A 2xx response whose body was not a usable completion.
    Malformed(String),
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::Transport(message) => write!(f, "{message}"),
            RequestError::Status { message, .. } => write!(f, "{message}"),
            RequestError::Malformed(detail) => write!(f, "Malformed response: {detail}"),
        }
    }
}

impl StdError for RequestError {}

/// Something that can turn one chat request into the assistant's reply text.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn complete(&self, request: &ChatRequest) -> Result<String, RequestError>;
}

/// Sends chat requests to `{base}/v1/chat/completions` with bearer auth.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpTransport {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key,
        }
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn complete(&self, request: &ChatRequest) -> Result<String, RequestError> {
        let chat_url = chat_completions_url(&self.base_url);
        debug!(
            url = %chat_url,
            model = %request.model,
            messages = request.messages.len(),
            "sending chat request"
        );

        let mut http_request = self
            .client
            .post(chat_url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(api_key) = &self.api_key {
            http_request = http_request.bearer_auth(api_key);
        }

        let response = http_request
            .json(request)
            .send()
            .await
            .map_err(|err| RequestError::Transport(err.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| RequestError::Transport(err.to_string()))?;
        debug!(status = status.as_u16(), bytes = body.len(), "chat response received");

        parse_completion(status.as_u16(), status.is_success(), &body)
    }
}

/// Interprets a finished HTTP exchange as either reply text or a request error.
pub fn parse_completion(status: u16, success: bool, body: &str) -> Result<String, RequestError> {
    if !success {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|value| extract_error_summary(&value))
            .filter(|summary| !summary.is_empty())
            .unwrap_or_else(|| FALLBACK_ERROR.to_string());
        return Err(RequestError::Status { status, message });
    }

    let completion: ChatCompletion =
        serde_json::from_str(body).map_err(|err| RequestError::Malformed(err.to_string()))?;
    completion
        .primary_content()
        .map(str::to_string)
        .ok_or_else(|| RequestError::Malformed("response contained no choices".to_string()))
}

fn extract_error_summary(value: &serde_json::Value) -> Option<String> {
    let summary = value
        .pointer("/error/message")
        .and_then(|v| v.as_str())
        .map(str::to_owned)
        .or_else(|| {
            value.get("error").and_then(|v| match v {
                serde_json::Value::String(s) => Some(s.to_string()),
                _ => None,
            })
        })
        .or_else(|| {
            value
                .get("message")
                .and_then(|v| v.as_str().map(str::to_owned))
        });

    summary.map(|text| text.split_whitespace().collect::<Vec<_>>().join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::{ContentPart, Message};
    use crate::utils::test_utils::{serve_once, test_client};

    fn sample_request() -> ChatRequest {
        ChatRequest {
            model: "gpt-5-mini".to_string(),
            messages: vec![
                Message::system("Be brief."),
                Message::user_parts(vec![ContentPart::text("Hello")]),
            ],
            max_tokens: 4096,
        }
    }

    #[test]
    fn error_body_message_is_used_for_failures() {
        let err = parse_completion(401, false, r#"{"error":{"message":"bad key"}}"#)
            .expect_err("401 is a failure");
        assert_eq!(
            err,
            RequestError::Status {
                status: 401,
                message: "bad key".to_string()
            }
        );
        assert_eq!(err.to_string(), "bad key");
    }

    #[test]
    fn error_summary_variants() {
        let string_error = parse_completion(500, false, r#"{"error":"upstream  timed\nout"}"#)
            .expect_err("failure");
        assert_eq!(string_error.to_string(), "upstream timed out");

        let top_level = parse_completion(429, false, r#"{"message":"slow down"}"#)
            .expect_err("failure");
        assert_eq!(top_level.to_string(), "slow down");

        let html = parse_completion(502, false, "<html>Bad Gateway</html>").expect_err("failure");
        assert_eq!(html.to_string(), "API connection failed");
    }

    #[test]
    fn successful_body_yields_first_choice() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"Hi!"}},{"message":{"content":"ignored"}}]}"#;
        assert_eq!(parse_completion(200, true, body).as_deref(), Ok("Hi!"));
    }

    #[test]
    fn malformed_success_bodies_are_errors() {
        assert!(matches!(
            parse_completion(200, true, "not json"),
            Err(RequestError::Malformed(_))
        ));
        assert!(matches!(
            parse_completion(200, true, r#"{"choices":[]}"#),
            Err(RequestError::Malformed(_))
        ));
    }

    #[tokio::test]
    async fn http_transport_posts_json_with_bearer_auth() {
        let (base_url, server) = serve_once(
            "200 OK",
            r#"{"choices":[{"message":{"content":"Hello back"}}]}"#,
        )
        .await;
        let transport = HttpTransport::new(test_client(), base_url, Some("sk-test".to_string()));

        let reply = transport
            .complete(&sample_request())
            .await
            .expect("request succeeds");
        assert_eq!(reply, "Hello back");

        let captured = server.await.expect("server task").expect("server ok");
        assert_eq!(captured.request_line, "POST /v1/chat/completions HTTP/1.1");
        assert_eq!(captured.header("authorization"), Some("Bearer sk-test"));
        assert_eq!(captured.header("content-type"), Some("application/json"));

        let body = captured.json();
        assert_eq!(body["model"], "gpt-5-mini");
        assert_eq!(body["max_tokens"], 4096);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"][0]["text"], "Hello");
    }

    #[tokio::test]
    async fn http_transport_surfaces_status_errors() {
        let (base_url, server) =
            serve_once("401 Unauthorized", r#"{"error":{"message":"bad key"}}"#).await;
        let transport = HttpTransport::new(test_client(), format!("{base_url}/v1/"), None);

        let err = transport
            .complete(&sample_request())
            .await
            .expect_err("401 should fail");
        assert_eq!(err.to_string(), "bad key");

        let captured = server.await.expect("server task").expect("server ok");
        assert_eq!(captured.request_line, "POST /v1/chat/completions HTTP/1.1");
        assert_eq!(captured.header("authorization"), None);
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("addr");
        drop(listener);

        let transport = HttpTransport::new(test_client(), format!("http://{addr}"), None);
        let err = transport
            .complete(&sample_request())
            .await
            .expect_err("closed port should fail");
        assert!(matches!(err, RequestError::Transport(_)));
    }
}
