//! Best-effort extraction of one named cookie from raw `Set-Cookie` text.
//!
//! # Design
//! The raw header is semi-structured: `name=value` pairs and attributes
//! separated by `;`. The default `Substring` mode reproduces the historical
//! parse exactly — first case-sensitive occurrence of the name anywhere in
//! the text, value starts `len(name)+1` bytes later, value ends at the next
//! `;` or at end of text. That parse can false-match a name that is a
//! substring of another cookie's name (`id` inside `userid=5`); callers that
//! cannot tolerate this select `Exact`, which only matches whole
//! `name=value` tokens.

/// How cookie names are located in the raw `Set-Cookie` text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CookieMatch {
    /// First raw substring occurrence of the name; may false-match inside a
    /// longer cookie name.
    #[default]
    Substring,
    /// Whole-token `name=value` matching only.
    Exact,
}

/// Extract the value of `name` from raw `Set-Cookie` text, or `None` if no
/// cookie with that name is present.
pub fn extract(raw: &str, name: &str, mode: CookieMatch) -> Option<String> {
    match mode {
        CookieMatch::Substring => extract_substring(raw, name),
        CookieMatch::Exact => extract_exact(raw, name),
    }
}

fn extract_substring(raw: &str, name: &str) -> Option<String> {
    let at = raw.find(name)?;
    // The byte after the matched name is assumed to be the `=` separator.
    let start = at + name.len() + 1;
    let rest = raw.get(start..).unwrap_or("");
    let value = match rest.find(';') {
        Some(end) => &rest[..end],
        None => rest,
    };
    log::debug!("parsed cookie {name}={value}");
    Some(value.to_string())
}

fn extract_exact(raw: &str, name: &str) -> Option<String> {
    for pair in raw.split(';') {
        let pair = pair.trim_start();
        if let Some((key, value)) = pair.split_once('=') {
            if key == name {
                log::debug!("parsed cookie {name}={value}");
                return Some(value.to_string());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAW: &str = "a=1; sess=abc123; path=/";

    #[test]
    fn finds_cookie_in_the_middle() {
        assert_eq!(extract(RAW, "sess", CookieMatch::Substring).as_deref(), Some("abc123"));
    }

    #[test]
    fn finds_first_cookie() {
        assert_eq!(extract(RAW, "a", CookieMatch::Substring).as_deref(), Some("1"));
    }

    #[test]
    fn missing_cookie_is_none() {
        assert_eq!(extract(RAW, "missing", CookieMatch::Substring), None);
    }

    #[test]
    fn value_runs_to_end_without_semicolon() {
        assert_eq!(
            extract("sess=abc123", "sess", CookieMatch::Substring).as_deref(),
            Some("abc123")
        );
    }

    #[test]
    fn empty_value() {
        assert_eq!(extract("sess=; a=1", "sess", CookieMatch::Substring).as_deref(), Some(""));
    }

    #[test]
    fn name_at_end_of_text_yields_empty_value() {
        assert_eq!(extract("a=1; sess", "sess", CookieMatch::Substring).as_deref(), Some(""));
    }

    #[test]
    fn substring_mode_false_matches_inside_longer_name() {
        // Known weak-parse behavior: "id" matches inside "userid".
        assert_eq!(extract("userid=5", "id", CookieMatch::Substring).as_deref(), Some("5"));
    }

    #[test]
    fn exact_mode_rejects_substring_of_longer_name() {
        assert_eq!(extract("userid=5", "id", CookieMatch::Exact), None);
    }

    #[test]
    fn exact_mode_finds_whole_token() {
        assert_eq!(
            extract("userid=5; id=9", "id", CookieMatch::Exact).as_deref(),
            Some("9")
        );
    }

    #[test]
    fn matching_is_case_sensitive() {
        assert_eq!(extract(RAW, "SESS", CookieMatch::Substring), None);
        assert_eq!(extract(RAW, "SESS", CookieMatch::Exact), None);
    }
}
