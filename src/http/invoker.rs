//! Call-and-report primitive used by every part of the harness

use colored::Colorize;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::common::join_url;
use crate::session::Session;

use super::{CallOutcome, HttpRequest, ResponseBody, Transport, Verb};

/// Issues calls against the backend and narrates every response
///
/// Owns the [`Session`], so the bearer token obtained at login is attached to
/// every call made after it.
pub struct Invoker {
    transport: Arc<dyn Transport>,
    base_url: String,
    session: Session,
}

impl Invoker {
    pub fn new(transport: Arc<dyn Transport>, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
            session: Session::default(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Full URL for an endpoint path
    pub fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    /// Issue a call and report it
    ///
    /// `body` is only sent for POST and PUT. Transport errors are reported
    /// and returned as [`CallOutcome::TransportFailure`].
    pub async fn call(
        &self,
        verb: Verb,
        path: &str,
        body: Option<&Value>,
        query: &[(&str, &str)],
    ) -> CallOutcome {
        let url = self.url(path);
        let request = HttpRequest {
            verb,
            url: url.clone(),
            bearer: self.session.bearer().map(str::to_string),
            body: if verb.carries_body() {
                body.cloned()
            } else {
                None
            },
            query: query
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        };

        tracing::debug!(%verb, %url, authenticated = request.bearer.is_some(), "Sending request");

        match self.transport.send(request).await {
            Ok(raw) => {
                let body = ResponseBody::parse(&raw.text);
                report_response(verb, &url, raw.status, &body);
                CallOutcome::from_response(raw.status, body)
            }
            Err(e) => {
                println!("{} Error calling {} {}: {}\n", "✗".red(), verb, url, e);
                tracing::warn!(%verb, %url, error = %e, "Transport failure");
                CallOutcome::TransportFailure(e.to_string())
            }
        }
    }

    /// Issue a call with a textual verb
    ///
    /// An unsupported verb is reported and yields a transport failure without
    /// sending anything.
    pub async fn call_str(
        &self,
        verb: &str,
        path: &str,
        body: Option<&Value>,
        query: &[(&str, &str)],
    ) -> CallOutcome {
        match verb.parse::<Verb>() {
            Ok(verb) => self.call(verb, path, body, query).await,
            Err(e) => {
                println!("{} {}\n", "✗".red(), e);
                tracing::warn!(verb, path, "Unsupported HTTP method");
                CallOutcome::TransportFailure(e.to_string())
            }
        }
    }

    pub async fn get(&self, path: &str) -> CallOutcome {
        self.call(Verb::Get, path, None, &[]).await
    }

    pub async fn post<T: Serialize + ?Sized>(&self, path: &str, payload: &T) -> CallOutcome {
        self.send_typed(Verb::Post, path, payload).await
    }

    pub async fn put<T: Serialize + ?Sized>(&self, path: &str, payload: &T) -> CallOutcome {
        self.send_typed(Verb::Put, path, payload).await
    }

    /// POST with no body at all
    pub async fn post_empty(&self, path: &str) -> CallOutcome {
        self.call(Verb::Post, path, None, &[]).await
    }

    async fn send_typed<T: Serialize + ?Sized>(
        &self,
        verb: Verb,
        path: &str,
        payload: &T,
    ) -> CallOutcome {
        match serde_json::to_value(payload) {
            Ok(body) => self.call(verb, path, Some(&body), &[]).await,
            Err(e) => {
                tracing::error!(%verb, path, error = %e, "Failed to serialize request body");
                CallOutcome::TransportFailure(format!("Failed to serialize request body: {}", e))
            }
        }
    }
}

fn report_response(verb: Verb, url: &str, status: u16, body: &ResponseBody) {
    let status_text = if (200..300).contains(&status) {
        status.to_string().green()
    } else {
        status.to_string().red()
    };

    println!("{} {} {}", "→".cyan(), verb.to_string().bold(), url);
    println!("  Status Code: {}", status_text);
    match body {
        ResponseBody::Json(_) => println!("  Response: {}\n", body),
        ResponseBody::Text(_) => println!("  Response (text): {}\n", body),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::FakeTransport;
    use serde_json::json;

    fn invoker(fake: &Arc<FakeTransport>) -> Invoker {
        Invoker::new(fake.clone(), FakeTransport::BASE_URL)
    }

    #[tokio::test]
    async fn test_unauthenticated_call_has_no_bearer() {
        let fake = Arc::new(FakeTransport::new());
        fake.respond(Verb::Get, "/customers", 200, json!([]));

        let outcome = invoker(&fake).get("/customers").await;
        assert!(outcome.is_success());

        let requests = fake.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url, "http://fake.test/api/customers");
        assert!(requests[0].bearer.is_none());
    }

    #[tokio::test]
    async fn test_bearer_attached_once_session_holds_token() {
        let fake = Arc::new(FakeTransport::new());
        fake.respond(Verb::Get, "/tables", 200, json!([]));

        let mut invoker = invoker(&fake);
        invoker.session_mut().set_token("tok".to_string());
        invoker.get("/tables").await;

        assert_eq!(fake.requests()[0].bearer.as_deref(), Some("tok"));
    }

    #[tokio::test]
    async fn test_body_dropped_for_get_and_delete() {
        let fake = Arc::new(FakeTransport::new());
        let body = json!({"x": 1});
        let invoker = invoker(&fake);

        invoker.call(Verb::Get, "/a", Some(&body), &[("page", "2")]).await;
        invoker.call(Verb::Delete, "/a", Some(&body), &[]).await;
        invoker.call(Verb::Put, "/a", Some(&body), &[]).await;

        let requests = fake.requests();
        assert!(requests[0].body.is_none());
        assert_eq!(requests[0].query, vec![("page".to_string(), "2".to_string())]);
        assert!(requests[1].body.is_none());
        assert_eq!(requests[2].body, Some(body));
    }

    #[tokio::test]
    async fn test_transport_failure_is_contained() {
        let fake = Arc::new(FakeTransport::new());
        fake.fail(Verb::Get, "/orders", "connection refused");

        let outcome = invoker(&fake).get("/orders").await;
        assert!(matches!(outcome, CallOutcome::TransportFailure(_)));
    }

    #[tokio::test]
    async fn test_non_json_body_kept_as_text() {
        let fake = Arc::new(FakeTransport::new());
        fake.respond_text(Verb::Get, "/report", 502, "Bad Gateway");

        let outcome = invoker(&fake).get("/report").await;
        assert_eq!(
            outcome,
            CallOutcome::BusinessFailure {
                status: 502,
                body: ResponseBody::Text("Bad Gateway".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn test_unsupported_verb_sends_nothing() {
        let fake = Arc::new(FakeTransport::new());

        let outcome = invoker(&fake).call_str("PATCH", "/tables", None, &[]).await;
        assert!(matches!(outcome, CallOutcome::TransportFailure(_)));
        assert!(fake.requests().is_empty());
    }
}
