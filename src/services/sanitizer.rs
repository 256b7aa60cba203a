//! Text and URL sanitizing for imported bookmark data.
//!
//! Both functions are total: bad input yields an empty string, never an error.

use url::Url;

/// Trims and HTML-escapes `& < > " /`. Absent input becomes `""`.
///
/// Not idempotent: escaping already-escaped text escapes it again, so raw
/// text must go through here exactly once.
pub fn sanitize_text<'a>(input: impl Into<Option<&'a str>>) -> String {
    let Some(raw) = input.into() else {
        return String::new();
    };
    let trimmed = raw.trim();
    let mut out = String::with_capacity(trimmed.len());
    for ch in trimmed.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '/' => out.push_str("&#x2F;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Returns the trimmed URL if it is an absolute `http`/`https` URL, else `""`.
///
/// The URL must parse and name a host right after `scheme://`. Raw
/// whitespace, control characters, quotes, angle brackets and backticks are
/// refused even where the URL parser would percent-encode them. The scheme
/// comparison ignores case and the input is returned as written.
pub fn sanitize_url<'a>(input: impl Into<Option<&'a str>>) -> String {
    let Some(raw) = input.into() else {
        return String::new();
    };
    let trimmed = raw.trim();
    if is_allowed_url(trimmed) {
        trimmed.to_string()
    } else {
        String::new()
    }
}

fn is_allowed_url(raw: &str) -> bool {
    let Ok(url) = Url::parse(raw) else {
        return false;
    };
    if !matches!(url.scheme(), "http" | "https") {
        return false;
    }
    if url.host_str().map_or(true, str::is_empty) {
        return false;
    }

    // The parser accepts `https:host` and `https:///host`; require a literal authority.
    let authority = raw
        .split_once(':')
        .and_then(|(_, rest)| rest.strip_prefix("//"));
    if !matches!(authority.and_then(|a| a.chars().next()), Some(c) if c != '/' && c != '\\') {
        return false;
    }

    !raw
        .chars()
        .any(|c| c.is_whitespace() || c.is_control() || matches!(c, '<' | '>' | '"' | '`'))
}
