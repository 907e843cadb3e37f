//! Small text and time helpers shared by config, auth and the gateway.

use url::Url;

const ERROR_SNIPPET_CHARS: usize = 180;

/// Trimmed text, or `None` when missing or blank.
pub fn trimmed_non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// An absolute `http`/`https` URL with a host.
pub fn is_web_url(value: &str) -> bool {
    Url::parse(value.trim())
        .is_ok_and(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
}

/// Single-line, length-capped excerpt of a response body for error messages.
pub fn error_snippet(body: &str) -> String {
    body.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(ERROR_SNIPPET_CHARS)
        .collect()
}

pub fn now_unix_seconds() -> i64 {
    chrono::Utc::now().timestamp()
}

/// `1`, `true`, `yes` and `on` in any case.
pub fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
