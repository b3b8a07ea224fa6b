//! Query-string canonicalization.
//!
//! Raw query strings arrive with arbitrary parameter order and mixed
//! percent-encoding. Canonicalizing (decode, re-encode, sort by key)
//! makes two equivalent query strings compare equal, which matters for
//! caching and request identity.

use std::collections::BTreeMap;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Everything except RFC 3986 unreserved characters gets percent-encoded.
const QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-decode one key or value.
#[inline]
fn decode(s: &str) -> String {
    if s.contains('%') {
        percent_decode_str(s).decode_utf8_lossy().into_owned()
    } else {
        s.to_string()
    }
}

/// Percent-encode one key or value.
#[inline]
fn encode(s: &str) -> String {
    utf8_percent_encode(s, QUERY_ENCODE_SET).to_string()
}

/// Canonicalize a raw query string.
///
/// Splits on `&`, splits each pair on the first `=`, round-trips each
/// half through decode-then-encode, and collects into a map keyed by the
/// re-encoded key. The last occurrence of a duplicate key wins. The
/// canonical string joins `key=value` pairs in ascending key order.
///
/// A pair with no `=` yields an empty value for its key. Empty segments
/// and empty keys are skipped. An empty input yields an empty string and
/// an empty map. Normalization is idempotent.
pub fn normalize(raw: &str) -> (String, BTreeMap<String, String>) {
    let mut parameters = BTreeMap::new();

    for pair in raw.split('&') {
        if pair.is_empty() {
            continue;
        }
        let (key, value) = match pair.split_once('=') {
            Some((key, value)) => (key, value),
            None => (pair, ""),
        };
        if key.is_empty() {
            continue;
        }
        parameters.insert(encode(&decode(key)), encode(&decode(value)));
    }

    let mut query = String::with_capacity(raw.len());
    for (key, value) in &parameters {
        if !query.is_empty() {
            query.push('&');
        }
        query.push_str(key);
        query.push('=');
        query.push_str(value);
    }

    (query, parameters)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorts_by_key() {
        let (query, parameters) = normalize("type=animal&name=narwhal");
        assert_eq!(query, "name=narwhal&type=animal");
        assert_eq!(parameters.get("name").map(String::as_str), Some("narwhal"));
        assert_eq!(parameters.get("type").map(String::as_str), Some("animal"));
    }

    #[test]
    fn test_empty_input() {
        let (query, parameters) = normalize("");
        assert_eq!(query, "");
        assert!(parameters.is_empty());
    }

    #[test]
    fn test_idempotent() {
        for raw in [
            "type=animal&name=narwhal",
            "a=%2Fpath%2F&b=sp%20ace",
            "z=1&y=2&x=3",
        ] {
            let (once, _) = normalize(raw);
            let (twice, _) = normalize(&once);
            assert_eq!(once, twice, "normalize not idempotent for {:?}", raw);
        }
    }

    #[test]
    fn test_reencodes_reserved_characters() {
        let (query, _) = normalize("path=%2Fover%2Fthere");
        assert_eq!(query, "path=%2Fover%2Fthere");

        // decoded input is re-encoded to the same canonical form
        let (query, _) = normalize("path=/over/there");
        assert_eq!(query, "path=%2Fover%2Fthere");
    }

    #[test]
    fn test_last_duplicate_key_wins() {
        let (query, parameters) = normalize("a=1&a=2");
        assert_eq!(query, "a=2");
        assert_eq!(parameters.len(), 1);
    }

    #[test]
    fn test_pair_without_value() {
        let (query, parameters) = normalize("flag&name=x");
        assert_eq!(query, "flag=&name=x");
        assert_eq!(parameters.get("flag").map(String::as_str), Some(""));
    }

    #[test]
    fn test_skips_empty_segments() {
        let (query, _) = normalize("a=1&&b=2&");
        assert_eq!(query, "a=1&b=2");

        let (query, parameters) = normalize("=orphan");
        assert_eq!(query, "");
        assert!(parameters.is_empty());
    }

    #[test]
    fn test_unreserved_characters_survive() {
        let (query, _) = normalize("k-1_2.3~=v-1_2.3~");
        assert_eq!(query, "k-1_2.3~=v-1_2.3~");
    }
}
