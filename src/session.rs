//! Bearer-token session
//!
//! A session starts unauthenticated and moves to authenticated exactly once,
//! on a successful login. There is no renewal; an expired token shows up as
//! 401s on later calls.

use colored::Colorize;
use serde::Serialize;
use serde_json::Value;

use crate::http::{CallOutcome, Invoker};

/// Login endpoint
pub const LOGIN_PATH: &str = "/auth/login";

/// Login credentials, fixed for the whole run
#[derive(Debug, Clone, Serialize)]
pub struct Credential {
    pub email: String,
    #[serde(rename = "senha")]
    pub secret: String,
}

impl Credential {
    pub fn new(email: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            secret: secret.into(),
        }
    }
}

/// Holder of the bearer token
#[derive(Debug, Default, Clone)]
pub struct Session {
    token: Option<String>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn bearer(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub(crate) fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }
}

/// Log in and store the token on the invoker's session
///
/// Returns false on a non-200 status, a 200 without a `token` string, or a
/// transport failure; the session is left unauthenticated in each case. The
/// caller must not continue the run on false.
pub async fn authenticate(invoker: &mut Invoker, credential: &Credential) -> bool {
    println!("{} {}", "Login:".cyan().bold(), credential.email);

    let outcome = invoker.post(LOGIN_PATH, credential).await;
    match extract_token(&outcome) {
        Ok(token) => {
            invoker.session_mut().set_token(token);
            println!("  {} Login succeeded, token obtained\n", "✓".green());
            tracing::info!(email = %credential.email, "Authenticated");
            true
        }
        Err(reason) => {
            println!("  {} Login failed: {}\n", "✗".red(), reason);
            tracing::error!(email = %credential.email, %reason, "Authentication failed");
            false
        }
    }
}

fn extract_token(outcome: &CallOutcome) -> std::result::Result<String, String> {
    match outcome {
        CallOutcome::Success { status: 200, body } => body
            .json()
            .and_then(|v| v.get("token"))
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .ok_or_else(|| "token not found in response".to_string()),
        other => Err(other.describe()),
    }
}
