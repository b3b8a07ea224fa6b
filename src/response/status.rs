//! Status-reason table.
//!
//! Fixed mapping from numeric status code to its `"CODE Reason-Phrase"`
//! string per RFC 2616/7231, reproduced verbatim for wire compatibility.

/// Look up the reason entry for a status code.
pub fn reason(code: u16) -> Option<&'static str> {
    let entry = match code {
        100 => "100 Continue",
        101 => "101 Switching Protocols",
        102 => "102 Processing",
        200 => "200 OK",
        201 => "201 Created",
        202 => "202 Accepted",
        203 => "203 Non-Authoritative Information",
        204 => "204 No Content",
        205 => "205 Reset Content",
        206 => "206 Partial Content",
        207 => "207 Multi-Status",
        300 => "300 Multiple Choices",
        301 => "301 Moved Permanently",
        302 => "302 Found",
        303 => "303 See Other",
        304 => "304 Not Modified",
        305 => "305 Use Proxy",
        307 => "307 Temporary Redirect",
        308 => "308 Permanent Redirect",
        400 => "400 Bad Request",
        401 => "401 Unauthorized",
        402 => "402 Payment Required",
        403 => "403 Forbidden",
        404 => "404 Not Found",
        405 => "405 Method Not Allowed",
        406 => "406 Not Acceptable",
        407 => "407 Proxy Authentication Required",
        408 => "408 Request Timeout",
        409 => "409 Conflict",
        410 => "410 Gone",
        411 => "411 Length Required",
        412 => "412 Precondition Failed",
        413 => "413 Request Entity Too Large",
        414 => "414 Request-URI Too Long",
        415 => "415 Unsupported Media Type",
        416 => "416 Requested Range Not Satisfiable",
        417 => "417 Expectation Failed",
        418 => "418 I'm a teapot",
        421 => "421 Misdirected Request",
        422 => "422 Unprocessable Entity",
        423 => "423 Locked",
        424 => "424 Failed Dependency",
        426 => "426 Upgrade Required",
        428 => "428 Precondition Required",
        429 => "429 Too Many Requests",
        431 => "431 Request Header Fields Too Large",
        500 => "500 Internal Server Error",
        501 => "501 Not Implemented",
        502 => "502 Bad Gateway",
        503 => "503 Service Unavailable",
        504 => "504 Gateway Timeout",
        505 => "505 HTTP Version Not Supported",
        506 => "506 Variant Also Negotiates",
        507 => "507 Insufficient Storage",
        508 => "508 Loop Detected",
        510 => "510 Not Extended",
        511 => "511 Network Authentication Required",
        _ => return None,
    };
    Some(entry)
}

/// Whether a status code is in the table.
#[inline]
pub fn is_known(code: u16) -> bool {
    reason(code).is_some()
}

/// Whether a status code forbids a response body.
///
/// Informational responses and {201, 204, 304} carry no body regardless
/// of supplied content.
#[inline]
pub fn suppresses_body(code: u16) -> bool {
    (100..200).contains(&code) || matches!(code, 201 | 204 | 304)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_entries() {
        assert_eq!(reason(200), Some("200 OK"));
        assert_eq!(reason(301), Some("301 Moved Permanently"));
        assert_eq!(reason(404), Some("404 Not Found"));
        assert_eq!(reason(511), Some("511 Network Authentication Required"));
        assert_eq!(reason(299), None);
        assert_eq!(reason(600), None);
    }

    #[test]
    fn test_is_known() {
        assert!(is_known(100));
        assert!(!is_known(306));
    }

    #[test]
    fn test_body_suppression_set() {
        assert!(suppresses_body(100));
        assert!(suppresses_body(199));
        assert!(suppresses_body(201));
        assert!(suppresses_body(204));
        assert!(suppresses_body(304));

        assert!(!suppresses_body(200));
        assert!(!suppresses_body(301));
        assert!(!suppresses_body(404));
    }
}
