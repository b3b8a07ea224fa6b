//! End-to-end response resolution and emission.

use std::time::{Duration, UNIX_EPOCH};

use http_env::config::ResponseConfig;
use http_env::response::HeaderList;
use http_env::{Emitter, Response};

fn overrides(pairs: &[(&str, &str)]) -> HeaderList {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn resolve(pairs: &[(&str, &str)], body: Option<&str>) -> Response {
    Response::resolve_at(
        overrides(pairs),
        body.map(str::to_string),
        &ResponseConfig::default(),
        UNIX_EPOCH + Duration::from_secs(784111777),
    )
}

#[test]
fn redirect_fixture() {
    let response = resolve(
        &[("Location", "http://example.com"), ("Status", "301")],
        Some("redirecting"),
    );

    assert_eq!(response.header("Location"), Some("http://example.com"));
    assert_eq!(
        response.header("Status"),
        Some("HTTP/1.0 301 Moved Permanently")
    );
    // 301 is not a no-body status, the body passes through
    assert_eq!(response.body(), "redirecting");
}

#[test]
fn no_content_suppresses_any_body() {
    let response = resolve(&[("Status", "204")], Some("should vanish"));
    assert_eq!(response.body(), "");
    assert_eq!(response.header("Status"), Some("HTTP/1.0 204 No Content"));
}

#[test]
fn uncachable_by_default() {
    let response = resolve(&[], None);
    assert_eq!(
        response.header("Cache-Control"),
        Some("no-cache, no-store, max-age=0, must-revalidate")
    );
    assert_eq!(response.header("Pragma"), Some("no-cache"));
}

#[test]
fn recognized_keys_never_appear_twice() {
    let response = resolve(
        &[
            ("Status", "200"),
            ("Version", "1.1"),
            ("Content-Type", "application/json"),
            ("Charset", "UTF-8"),
            ("Last-Modified", "Mon, 01 Jan 1990 00:00:00 GMT"),
            ("Language", "fr-FR"),
            ("Cachable", "1"),
            ("X-Custom", "kept"),
        ],
        Some("{}"),
    );

    let mut names: Vec<&str> = response.headers().iter().map(|(n, _)| n.as_str()).collect();
    let total = names.len();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), total, "duplicate header names resolved");
    assert_eq!(response.header("X-Custom"), Some("kept"));
    assert_eq!(response.header("Language"), Some("fr-FR"));
}

#[test]
fn emitted_wire_format() {
    let response = resolve(
        &[("Status", "404"), ("Content-Type", "text/plain")],
        Some("Not Found"),
    );

    let mut emitter = Emitter::new(Vec::new());
    emitter.send(&response).unwrap();
    let wire = String::from_utf8(emitter.into_inner()).unwrap();

    let (head, body) = wire.split_once("\r\n\r\n").expect("header/body separator");
    let lines: Vec<&str> = head.split("\r\n").collect();
    assert_eq!(lines[0], "Status: HTTP/1.0 404 Not Found");
    assert!(lines.contains(&"Content-Type: text/plain; charset=UTF-8"));
    assert!(lines.contains(&"Content-Length: 9"));
    assert_eq!(body, "Not Found");
}

#[test]
fn emitter_guards_header_resend() {
    let response = resolve(&[], Some("payload"));
    let mut emitter = Emitter::new(Vec::new());
    emitter.send(&response).unwrap();
    emitter.send(&response).unwrap();
    let wire = String::from_utf8(emitter.into_inner()).unwrap();

    assert_eq!(wire.matches("Status:").count(), 1);
    assert_eq!(wire.matches("payload").count(), 2);
}

#[test]
fn timezone_offset_shifts_dates() {
    let config = ResponseConfig {
        timezone: "+02:00".parse().unwrap(),
        ..ResponseConfig::default()
    };
    let response = Response::resolve_at(
        Vec::new(),
        None,
        &config,
        UNIX_EPOCH + Duration::from_secs(784111777),
    );
    assert_eq!(
        response.header("Date"),
        Some("Sun, 06 Nov 1994 10:49:37 GMT")
    );
    assert_eq!(response.header("Date"), response.header("Expires"));
}
