//! Common utilities shared by every part of the harness

pub mod config;
pub mod error;
pub mod logging;
pub mod paths;

pub use error::{Error, Result};

/// Join a base URL and an endpoint path with exactly one slash between them
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    if path.is_empty() {
        base.to_string()
    } else if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("http://h/api", "/tables"), "http://h/api/tables");
        assert_eq!(join_url("http://h/api/", "/tables"), "http://h/api/tables");
        assert_eq!(join_url("http://h/api", "tables"), "http://h/api/tables");
        assert_eq!(join_url("http://h/api/", ""), "http://h/api");
    }
}
