use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Characters left literal when encoding a query component: RFC 3986
/// unreserved characters plus `/`.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/');

/// Wraps a user-provided value as an exact-match phrase.
///
/// Inside a quoted phrase only `\` and `"` can change query semantics, so those
/// are the only characters escaped.
pub(crate) fn quote_phrase(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        if matches!(ch, '\\' | '"') {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('"');
    out
}

/// Percent-encodes a value for use inside a URL query string.
pub(crate) fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, QUERY_COMPONENT).to_string()
}

#[cfg(test)]
mod tests {
    use super::{encode_component, quote_phrase};

    #[test]
    fn quote_phrase_escapes_quotes_and_backslashes() {
        assert_eq!(quote_phrase("aspirin"), r#""aspirin""#);
        assert_eq!(quote_phrase(r#"a "b"\c"#), r#""a \"b\"\\c""#);
    }

    #[test]
    fn quote_phrase_leaves_other_syntax_alone() {
        assert_eq!(quote_phrase("co-trimoxazole (oral)"), r#""co-trimoxazole (oral)""#);
    }

    #[test]
    fn encode_component_matches_form_safe_set() {
        assert_eq!(encode_component("ibuprofen medicine"), "ibuprofen%20medicine");
        assert_eq!(encode_component(r#""aspirin""#), "%22aspirin%22");
        assert_eq!(encode_component("a/b-c_d.e~f"), "a/b-c_d.e~f");
        assert_eq!(encode_component("a+b&c"), "a%2Bb%26c");
    }

    #[test]
    fn encode_component_encodes_utf8_bytes() {
        assert_eq!(encode_component("é"), "%C3%A9");
    }
}
