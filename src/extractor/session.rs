use regex::Regex;
use tracing::{debug, warn};

/// Last known build label, used when the page stops embedding `cfb2h`.
/// Going stale here degrades the RPC strategy's hit rate until bumped.
pub const DEFAULT_BUILD_LABEL: &str = "boq_bloggeruiserver_20260218.01_p0";

/// Per-request session state scraped from the provider page. Never
/// persisted or shared between requests.
#[derive(Debug, Clone)]
pub struct SessionContext {
    /// Semicolon-joined `name=value` pairs, server order preserved.
    pub cookies: String,
    pub build_label: String,
    /// XSRF token for batchexecute. Missing is a valid degraded state.
    pub at_token: Option<String>,
}

pub fn build(html: &str, set_cookie: &[String]) -> SessionContext {
    let cookies = flatten_cookies(set_cookie);
    let build_label = extract_build_label(html);
    let at_token = extract_at_token(html);

    if at_token.is_none() {
        warn!("No anti-forgery token found in page; RPC calls will go out without 'at'");
    }
    debug!(
        "Session context: {} cookie pair(s), bl={}",
        if cookies.is_empty() { 0 } else { cookies.split("; ").count() },
        build_label
    );

    SessionContext {
        cookies,
        build_label,
        at_token,
    }
}

/// Takes the `name=value` prefix of each set-cookie entry and joins them
/// the way a browser would send them back.
pub fn flatten_cookies(set_cookie: &[String]) -> String {
    set_cookie
        .iter()
        .filter_map(|c| c.split(';').next())
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .collect::<Vec<_>>()
        .join("; ")
}

pub fn extract_build_label(html: &str) -> String {
    let re = Regex::new(r#""cfb2h"\s*:\s*"([^"]+)""#).unwrap();
    re.captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| DEFAULT_BUILD_LABEL.to_string())
}

/// Tries each known at-token location in order, first hit wins.
pub fn extract_at_token(html: &str) -> Option<String> {
    at_from_global_data(html)
        .or_else(|| at_from_value_list(html))
        .or_else(|| at_from_nonce(html))
}

/// Method (a): the `SNlM0e` key in the page's WIZ global-data blob.
pub fn at_from_global_data(html: &str) -> Option<String> {
    let re = Regex::new(r#""SNlM0e"\s*:\s*"([^"]+)""#).unwrap();
    re.captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Method (b): the single-quoted `'X','Y','DEFAULT'` value-list triplet,
/// where the second value is the token.
pub fn at_from_value_list(html: &str) -> Option<String> {
    let re = Regex::new(r"'[^']*','([^']+)','DEFAULT'").unwrap();
    re.captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Method (c): find a script `nonce` attribute, then take the quoted list
/// entry immediately following a quoted occurrence of that same nonce.
pub fn at_from_nonce(html: &str) -> Option<String> {
    let nonce_re = Regex::new(r#"nonce="([^"]+)""#).unwrap();
    let nonce = nonce_re.captures(html)?.get(1)?.as_str();

    let after_re = Regex::new(&format!(
        r#""{}"\s*,\s*"([^"]+)""#,
        regex::escape(nonce)
    ))
    .ok()?;
    after_re
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}
