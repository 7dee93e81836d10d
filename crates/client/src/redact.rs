//! Token redaction for request trace logs.
//!
//! Request URLs and JSON bodies are logged at debug level. Credentials that
//! travel in either are replaced with [`REDACTED`] before they reach a log
//! sink.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

/// Marker written in place of a secret value.
pub const REDACTED: &str = "*REDACTED*";

static TOKEN_IN_JSON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""token"\s*:\s*"(?:[^"\\]|\\.)*""#).expect("valid token regex")
});

/// Replaces the value of every `"token"` key in a JSON document.
///
/// Whitespace (line breaks included) between the key, the colon and the value
/// is tolerated. The document does not need to be valid JSON.
pub fn redact_token_in_json(src: &str) -> Cow<'_, str> {
    TOKEN_IN_JSON.replace_all(src, format!(r#""token":"{REDACTED}""#).as_str())
}

/// Replaces the value of every `token` query parameter in a URL.
///
/// Parameter names are matched case-insensitively after percent-decoding.
/// Everything else in the URL is percent-decoded for readability; the order of
/// the parameters is kept.
pub fn redact_token_in_url(url: &str) -> String {
    let (before_fragment, fragment) = match url.split_once('#') {
        Some((head, fragment)) => (head, Some(fragment)),
        None => (url, None),
    };
    let (base, query) = match before_fragment.split_once('?') {
        Some((base, query)) => (base, Some(query)),
        None => (before_fragment, None),
    };

    let mut out = decode(base);
    if let Some(query) = query {
        out.push('?');
        let pairs: Vec<String> = query
            .split('&')
            .map(|pair| match pair.split_once('=') {
                Some((key, value)) => {
                    let key = decode_form(key);
                    if key.eq_ignore_ascii_case("token") {
                        format!("{key}={REDACTED}")
                    } else {
                        format!("{key}={}", decode_form(value))
                    }
                }
                None => decode_form(pair),
            })
            .collect();
        out.push_str(&pairs.join("&"));
    }
    if let Some(fragment) = fragment {
        out.push('#');
        out.push_str(&decode(fragment));
    }
    out
}

fn decode(value: &str) -> String {
    match urlencoding::decode(value) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => value.to_string(),
    }
}

fn decode_form(value: &str) -> String {
    decode(&value.replace('+', " "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_token_in_compact_json() {
        let body = r#"{"userName":"alice","token":"abc123"}"#;
        assert_eq!(
            redact_token_in_json(body),
            r#"{"userName":"alice","token":"*REDACTED*"}"#
        );
    }

    #[test]
    fn redacts_token_across_line_breaks() {
        let body = "{\n  \"token\"\n  :\n  \"abc 123\",\n  \"tokenId\": 4\n}";
        let redacted = redact_token_in_json(body);
        assert!(!redacted.contains("abc 123"));
        assert!(redacted.contains(r#""token":"*REDACTED*""#));
        assert!(redacted.contains(r#""tokenId": 4"#));
    }

    #[test]
    fn redacts_tokens_with_symbols_and_escapes() {
        let body = r#"[{"token":"ghp_x-Y.z/9=="},{"token":"a\"b"}]"#;
        let redacted = redact_token_in_json(body);
        assert!(!redacted.contains("ghp_"));
        assert!(!redacted.contains(r#"a\"b"#));
        assert_eq!(redacted.matches(REDACTED).count(), 2);
    }

    #[test]
    fn leaves_json_without_token_untouched() {
        let body = r#"{"name":"wharf"}"#;
        assert!(matches!(redact_token_in_json(body), Cow::Borrowed(_)));
    }

    #[test]
    fn redacts_token_query_parameter() {
        assert_eq!(
            redact_token_in_url("http://wharf.local/api/token?userName=alice&token=abc123"),
            "http://wharf.local/api/token?userName=alice&token=*REDACTED*"
        );
    }

    #[test]
    fn redacts_capitalised_token_parameter() {
        let redacted = redact_token_in_url("https://wharf.local/api?Token=abc%20123&limit=5");
        assert_eq!(redacted, "https://wharf.local/api?Token=*REDACTED*&limit=5");
    }

    #[test]
    fn decodes_remaining_url_for_readability() {
        assert_eq!(
            redact_token_in_url("http://wharf.local/api/project?nameMatch=my+project%2Fx"),
            "http://wharf.local/api/project?nameMatch=my project/x"
        );
    }

    #[test]
    fn url_without_query_is_only_decoded() {
        assert_eq!(
            redact_token_in_url("http://wharf.local/api/build/1%2F2"),
            "http://wharf.local/api/build/1/2"
        );
        assert_eq!(redact_token_in_url(""), "");
    }
}
