//! Share codes and share links.

use rand::distr::Alphanumeric;
use rand::RngExt;
use url::Url;

/// Query parameter carrying a share code in an entry URL.
pub const SHARE_QUERY_PARAM: &str = "share";

const SHARE_CODE_LEN: usize = 6;

/// Generate a share code of six characters from `[0-9A-Z]`.
///
/// Codes are not checked against existing ones; with 36^6 possibilities a
/// collision between a single user's lists is negligible.
#[must_use]
pub fn generate_share_code() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .map(char::from)
        .filter(|c| !c.is_ascii_lowercase())
        .take(SHARE_CODE_LEN)
        .collect()
}

/// Build the link handed out for a shared list: `<origin>?share=<code>`.
///
/// Without an origin the relative form `?share=<code>` is returned.
#[must_use]
pub fn share_url(origin: Option<&str>, code: &str) -> String {
    let origin = origin.map_or("", |origin| origin.trim().trim_end_matches('/'));
    format!("{origin}?{SHARE_QUERY_PARAM}={code}")
}

/// Extract a share code from user input.
///
/// Accepts a full entry URL carrying `?share=<code>`, a relative
/// `?share=<code>` fragment, or a bare code. Returns `None` for empty input
/// or a URL without the parameter.
#[must_use]
pub fn parse_share_param(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(url) = Url::parse(input) {
        return url
            .query_pairs()
            .find(|(key, _)| key == SHARE_QUERY_PARAM)
            .map(|(_, value)| value.trim().to_string())
            .filter(|code| !code.is_empty());
    }

    if let Some(query) = input.strip_prefix('?') {
        return url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == SHARE_QUERY_PARAM)
            .map(|(_, value)| value.trim().to_string())
            .filter(|code| !code.is_empty());
    }

    if input.chars().all(char::is_alphanumeric) {
        Some(input.to_string())
    } else {
        None
    }
}
