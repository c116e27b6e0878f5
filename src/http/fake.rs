//! In-memory transport for exercising the harness without a backend
//!
//! Routes are keyed by verb and endpoint path (the URL with
//! [`FakeTransport::BASE_URL`] stripped and any query removed). Queued
//! responses are served in order; the last one repeats. Unrouted requests get
//! a 404 with a JSON error body.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use crate::common::{Error, Result};

use super::{HttpRequest, RawResponse, Transport, Verb};

#[derive(Debug, Clone)]
enum Reply {
    Respond(RawResponse),
    Fail(String),
}

/// Scripted, recording [`Transport`]
#[derive(Default)]
pub struct FakeTransport {
    routes: Mutex<HashMap<(Verb, String), VecDeque<Reply>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl FakeTransport {
    /// Base URL an [`Invoker`](super::Invoker) should use with this transport
    pub const BASE_URL: &'static str = "http://fake.test/api";

    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a JSON response
    pub fn respond(&self, verb: Verb, path: &str, status: u16, body: Value) -> &Self {
        self.push(
            verb,
            path,
            Reply::Respond(RawResponse {
                status,
                text: body.to_string(),
            }),
        )
    }

    /// Queue a plain-text response
    pub fn respond_text(&self, verb: Verb, path: &str, status: u16, text: &str) -> &Self {
        self.push(
            verb,
            path,
            Reply::Respond(RawResponse {
                status,
                text: text.to_string(),
            }),
        )
    }

    /// Queue a transport failure
    pub fn fail(&self, verb: Verb, path: &str, reason: &str) -> &Self {
        self.push(verb, path, Reply::Fail(reason.to_string()))
    }

    /// Every request received so far, in order
    pub fn requests(&self) -> Vec<HttpRequest> {
        lock(&self.requests).clone()
    }

    /// Requests received for one verb and path
    pub fn requests_to(&self, verb: Verb, path: &str) -> Vec<HttpRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.verb == verb && endpoint_path(&r.url) == path)
            .collect()
    }

    /// `(verb, path)` of every request, in order
    pub fn calls(&self) -> Vec<(Verb, String)> {
        self.requests()
            .iter()
            .map(|r| (r.verb, endpoint_path(&r.url).to_string()))
            .collect()
    }

    fn push(&self, verb: Verb, path: &str, reply: Reply) -> &Self {
        lock(&self.routes)
            .entry((verb, path.to_string()))
            .or_default()
            .push_back(reply);
        self
    }

    fn next_reply(&self, verb: Verb, path: &str) -> Option<Reply> {
        let mut routes = lock(&self.routes);
        let queue = routes.get_mut(&(verb, path.to_string()))?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, request: HttpRequest) -> Result<RawResponse> {
        let path = endpoint_path(&request.url).to_string();
        let verb = request.verb;
        lock(&self.requests).push(request);

        match self.next_reply(verb, &path) {
            Some(Reply::Respond(raw)) => Ok(raw),
            Some(Reply::Fail(reason)) => Err(Error::Transport(reason)),
            None => Ok(RawResponse {
                status: 404,
                text: json!({ "message": format!("No route for {} {}", verb, path) }).to_string(),
            }),
        }
    }
}

fn endpoint_path(url: &str) -> &str {
    let path = url.strip_prefix(FakeTransport::BASE_URL).unwrap_or(url);
    path.split('?').next().unwrap_or(path)
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(verb: Verb, path: &str) -> HttpRequest {
        HttpRequest {
            verb,
            url: format!("{}{}", FakeTransport::BASE_URL, path),
            bearer: None,
            body: None,
            query: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_queued_replies_then_last_repeats() {
        let fake = FakeTransport::new();
        fake.respond(Verb::Get, "/orders", 500, json!({}))
            .respond(Verb::Get, "/orders", 200, json!([]));

        let first = fake.send(request(Verb::Get, "/orders")).await.unwrap();
        let second = fake.send(request(Verb::Get, "/orders")).await.unwrap();
        let third = fake.send(request(Verb::Get, "/orders")).await.unwrap();
        assert_eq!(first.status, 500);
        assert_eq!(second.status, 200);
        assert_eq!(third.status, 200);
    }

    #[tokio::test]
    async fn test_unrouted_is_404() {
        let fake = FakeTransport::new();
        let raw = fake.send(request(Verb::Post, "/nowhere")).await.unwrap();
        assert_eq!(raw.status, 404);
        assert_eq!(fake.calls(), vec![(Verb::Post, "/nowhere".to_string())]);
    }
}
