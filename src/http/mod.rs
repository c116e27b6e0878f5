//! HTTP plumbing for the harness
//!
//! The wire itself sits behind the [`Transport`] trait so the resolver and
//! scenarios can be driven against an in-memory backend. Every response is
//! folded into a [`CallOutcome`] by the [`Invoker`].

#[cfg(any(test, feature = "test-support"))]
pub mod fake;
mod invoker;
mod transport;

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeTransport;
pub use invoker::Invoker;
pub use transport::ReqwestTransport;

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::common::{Error, Result};

/// HTTP verbs the harness issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    Post,
    Put,
    Delete,
}

impl Verb {
    /// Whether a request body is sent for this verb
    pub fn carries_body(self) -> bool {
        matches!(self, Verb::Post | Verb::Put)
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verb::Get => write!(f, "GET"),
            Verb::Post => write!(f, "POST"),
            Verb::Put => write!(f, "PUT"),
            Verb::Delete => write!(f, "DELETE"),
        }
    }
}

impl FromStr for Verb {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Verb::Get),
            "POST" => Ok(Verb::Post),
            "PUT" => Ok(Verb::Put),
            "DELETE" => Ok(Verb::Delete),
            _ => Err(Error::Transport(format!("HTTP method '{}' is not supported", s))),
        }
    }
}

/// A fully resolved request handed to a [`Transport`]
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub verb: Verb,
    pub url: String,
    pub bearer: Option<String>,
    pub body: Option<Value>,
    pub query: Vec<(String, String)>,
}

/// Status and undecoded body of a response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub text: String,
}

/// Sends requests over some wire
///
/// Implementations return `Err` only when no HTTP response was received
/// (connection refused, DNS, timeout). Any status code is an `Ok`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<RawResponse>;
}

/// Response body, parsed as JSON when possible
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

impl ResponseBody {
    /// Parse a body, keeping the raw text if it is not JSON
    pub fn parse(text: &str) -> Self {
        match serde_json::from_str(text) {
            Ok(value) => ResponseBody::Json(value),
            Err(_) => ResponseBody::Text(text.to_string()),
        }
    }

    pub fn json(&self) -> Option<&Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            ResponseBody::Text(_) => None,
        }
    }
}

impl fmt::Display for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseBody::Json(value) => match serde_json::to_string_pretty(value) {
                Ok(pretty) => write!(f, "{}", pretty),
                Err(_) => write!(f, "{}", value),
            },
            ResponseBody::Text(text) => write!(f, "{}", text),
        }
    }
}

/// Outcome of a single endpoint call
#[derive(Debug, Clone, PartialEq)]
pub enum CallOutcome {
    /// No response was received, or the request could not be issued
    TransportFailure(String),
    /// The backend answered with a non-2xx status
    BusinessFailure { status: u16, body: ResponseBody },
    /// The backend answered with a 2xx status
    Success { status: u16, body: ResponseBody },
}

impl CallOutcome {
    /// Classify a received response by status
    pub fn from_response(status: u16, body: ResponseBody) -> Self {
        if (200..300).contains(&status) {
            CallOutcome::Success { status, body }
        } else {
            CallOutcome::BusinessFailure { status, body }
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            CallOutcome::TransportFailure(_) => None,
            CallOutcome::BusinessFailure { status, .. } | CallOutcome::Success { status, .. } => {
                Some(*status)
            }
        }
    }

    pub fn body(&self) -> Option<&ResponseBody> {
        match self {
            CallOutcome::TransportFailure(_) => None,
            CallOutcome::BusinessFailure { body, .. } | CallOutcome::Success { body, .. } => {
                Some(body)
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, CallOutcome::Success { .. })
    }

    /// JSON body of a successful call with exactly this status
    pub fn success_json(&self, expected: u16) -> Option<&Value> {
        match self {
            CallOutcome::Success { status, body } if *status == expected => body.json(),
            _ => None,
        }
    }

    /// One-line description suitable for a diagnostic
    pub fn describe(&self) -> String {
        match self {
            CallOutcome::TransportFailure(reason) => format!("endpoint unreachable: {}", reason),
            CallOutcome::BusinessFailure { status, body } => {
                let message = body
                    .json()
                    .and_then(|v| v.get("message"))
                    .and_then(Value::as_str)
                    .map(str::to_string);
                match message {
                    Some(message) => format!("status {}: {}", status, message),
                    None => format!("status {}", status),
                }
            }
            CallOutcome::Success { status, .. } => format!("status {}", status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_verbs() {
        assert_eq!("get".parse::<Verb>().unwrap(), Verb::Get);
        assert_eq!("PUT".parse::<Verb>().unwrap(), Verb::Put);
        assert_eq!("Delete".parse::<Verb>().unwrap(), Verb::Delete);
        assert!("PATCH".parse::<Verb>().is_err());
    }

    #[test]
    fn test_body_falls_back_to_text() {
        assert_eq!(ResponseBody::parse("{\"a\":1}"), ResponseBody::Json(json!({"a": 1})));
        assert_eq!(
            ResponseBody::parse("<html>oops</html>"),
            ResponseBody::Text("<html>oops</html>".to_string())
        );
        assert_eq!(ResponseBody::parse(""), ResponseBody::Text(String::new()));
    }

    #[test]
    fn test_outcome_classification() {
        let ok = CallOutcome::from_response(201, ResponseBody::Json(json!({})));
        assert!(ok.is_success());
        assert!(ok.success_json(201).is_some());
        assert!(ok.success_json(200).is_none());

        let denied = CallOutcome::from_response(
            400,
            ResponseBody::Json(json!({"message": "Mesa já reservada"})),
        );
        assert!(!denied.is_success());
        assert_eq!(denied.status(), Some(400));
        assert_eq!(denied.describe(), "status 400: Mesa já reservada");

        let down = CallOutcome::TransportFailure("connection refused".to_string());
        assert_eq!(down.status(), None);
        assert!(down.body().is_none());
    }
}
