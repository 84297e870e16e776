//! URL helpers for building endpoint addresses from a user-supplied base URL.
//!
//! Users paste base URLs in many shapes (`https://host`, `https://host/`,
//! `https://host/v1/`), so every endpoint is derived through these helpers.

/// Normalize a base URL by removing trailing slashes
///
/// # Examples
///
/// ```
/// use alokahub::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("https://api.example.com/v1"), "https://api.example.com/v1");
/// assert_eq!(normalize_base_url("https://api.example.com/v1///"), "https://api.example.com/v1");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

/// Join a base URL and an endpoint path without doubling slashes
///
/// ```
/// use alokahub::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("https://api.example.com/v1/", "/chat/completions"),
///     "https://api.example.com/v1/chat/completions"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let normalized_base = normalize_base_url(base_url);
    let endpoint = endpoint.trim_start_matches('/');
    format!("{}/{}", normalized_base, endpoint)
}

/// Base URL with a single `/v1` suffix, added when the user left it off.
pub fn versioned_base_url(base_url: &str) -> String {
    let normalized = normalize_base_url(base_url);
    if normalized.ends_with("/v1") {
        normalized
    } else {
        format!("{normalized}/v1")
    }
}

/// Base URL with any `/v1` suffix removed, for account endpoints that live at the root.
pub fn account_base_url(base_url: &str) -> String {
    let normalized = normalize_base_url(base_url);
    normalize_base_url(normalized.strip_suffix("/v1").unwrap_or(&normalized))
}

pub fn chat_completions_url(base_url: &str) -> String {
    construct_api_url(&versioned_base_url(base_url), "chat/completions")
}

pub fn key_info_url(base_url: &str) -> String {
    construct_api_url(&account_base_url(base_url), "key/info")
}
