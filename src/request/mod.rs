//! Immutable HTTP request value assembled from the server environment.

pub mod query;
pub mod url;

use std::collections::BTreeMap;

use http::Method;
use tracing::warn;

use crate::env::{keys, EnvSnapshot};
use crate::error::Result;

const INDEX_SUFFIX: &str = "index.php";

/// HTTP request value object.
///
/// Constructed once from an environment snapshot, immutable thereafter.
/// All intermediate state lives in private resolver functions; there are
/// no setters.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    scheme: &'static str,
    secure: bool,
    user: String,
    password: String,
    userinfo: String,
    host: String,
    port: String,
    authority: String,
    base_url: String,
    path: String,
    query: String,
    parameters: BTreeMap<String, String>,
    content_type: String,
    url: String,
}

impl Request {
    /// Assemble a request from an environment snapshot.
    ///
    /// Resolution order is a contract: authority needs the scheme for
    /// default-port suppression, base_url needs both, path trimming
    /// needs the query, and url needs everything before it.
    ///
    /// Fails only on a malformed host. Every other missing or unexpected
    /// field degrades to a documented default.
    pub fn from_env(env: &EnvSnapshot) -> Result<Self> {
        let secure = url::resolve_secure(env);
        let scheme = url::scheme_for(secure);

        let (host, candidate_port) = url::resolve_host(env);
        url::validate_host(&host)?;
        let port = url::resolve_port(env, secure, candidate_port);

        let user = env.get_or_empty(keys::PHP_AUTH_USER).to_string();
        let password = env.get_or_empty(keys::PHP_AUTH_PW).to_string();
        let userinfo = if user.is_empty() {
            String::new()
        } else {
            format!("{}:{}", user, password)
        };

        let authority = url::compose_authority(&user, &password, &host, &port);
        let base_url = format!("{}{}", scheme, authority);

        let (query, parameters) = query::normalize(env.get_or_empty(keys::QUERY_STRING));
        let path = resolve_path(env);

        let url = if query.is_empty() {
            format!("{}{}", base_url, path)
        } else {
            format!("{}{}?{}", base_url, path, query)
        };

        Ok(Self {
            method: resolve_method(env),
            scheme,
            secure,
            user,
            password,
            userinfo,
            host,
            port,
            authority,
            base_url,
            path,
            query,
            parameters,
            content_type: resolve_content_type(env),
            url,
        })
    }

    /// Get the HTTP method.
    #[inline]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Get the scheme prefix, `"http://"` or `"https://"`.
    #[inline]
    pub fn scheme(&self) -> &str {
        self.scheme
    }

    /// Whether the request arrived over a secure channel.
    #[inline]
    pub fn is_secure(&self) -> bool {
        self.secure
    }

    /// Get the auth user, empty when absent.
    #[inline]
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Get the auth password, empty when absent.
    #[inline]
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Get `user:password`, empty unless the user is non-empty.
    #[inline]
    pub fn userinfo(&self) -> &str {
        &self.userinfo
    }

    /// Get the validated host, empty when the environment carried none.
    #[inline]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Get the port, empty when absent or equal to the scheme default.
    #[inline]
    pub fn port(&self) -> &str {
        &self.port
    }

    /// Get `[userinfo@]host[:port]`.
    #[inline]
    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// Get `scheme + authority`.
    #[inline]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the normalized path. Empty, or `/`-rooted with no trailing
    /// slash, query suffix or trailing `index.php`.
    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Get the canonical query string, parameters sorted by key.
    #[inline]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Get the canonical parameter map, keys sorted ascending.
    #[inline]
    pub fn parameters(&self) -> &BTreeMap<String, String> {
        &self.parameters
    }

    /// Look up a single canonical parameter.
    #[inline]
    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).map(String::as_str)
    }

    /// Get the negotiated content type: the first token of the Accept
    /// header, lowercased.
    #[inline]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Get the full URL: `base_url + path [+ "?" + query]`.
    #[inline]
    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Normalize the request method, defaulting to GET.
///
/// The supplied value is uppercased and matched against the supported
/// set; anything else silently falls back to GET.
fn resolve_method(env: &EnvSnapshot) -> Method {
    let raw = env.get_or_empty(keys::REQUEST_METHOD).to_ascii_uppercase();
    match raw.as_str() {
        "GET" => Method::GET,
        "HEAD" => Method::HEAD,
        "POST" => Method::POST,
        "PUT" => Method::PUT,
        "DELETE" => Method::DELETE,
        "OPTIONS" => Method::OPTIONS,
        "PATCH" => Method::PATCH,
        other => {
            if !other.is_empty() {
                warn!(method = other, "unsupported request method, using GET");
            }
            Method::GET
        }
    }
}

/// First token of the Accept header, lowercased.
fn resolve_content_type(env: &EnvSnapshot) -> String {
    env.get_or_empty(keys::HTTP_ACCEPT)
        .split([';', ','])
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}

/// Derive the normalized path from the raw request URI.
///
/// Prefers the direct request-URI field, else reconstructs it from the
/// original path-info field plus the query string. The result is
/// sanitized, stripped of its `?` suffix, slash-trimmed, and loses a
/// trailing `index.php`; a non-empty path is re-rooted with a single
/// leading `/` so URL composition stays well-formed.
fn resolve_path(env: &EnvSnapshot) -> String {
    let raw = match env.get(keys::REQUEST_URI) {
        Some(uri) if !uri.is_empty() => uri.to_string(),
        _ => {
            let orig = env.get_or_empty(keys::ORIG_PATH_INFO);
            let query = env.get_or_empty(keys::QUERY_STRING);
            if query.is_empty() {
                orig.to_string()
            } else {
                format!("{}?{}", orig, query)
            }
        }
    };

    let sanitized = url::sanitize_url(&raw);
    let without_query = match sanitized.find('?') {
        Some(pos) => &sanitized[..pos],
        None => sanitized.as_str(),
    };

    let mut trimmed = without_query.trim_matches('/');
    if let Some(stripped) = trimmed.strip_suffix(INDEX_SUFFIX) {
        trimmed = stripped.trim_end_matches('/');
    }

    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> EnvSnapshot {
        EnvSnapshot::from_pairs(pairs.iter().copied())
    }

    #[test]
    fn test_method_normalization() {
        let req = Request::from_env(&env(&[(keys::REQUEST_METHOD, "post")])).unwrap();
        assert_eq!(req.method(), Method::POST);

        // outside the supported set falls back to GET
        let req = Request::from_env(&env(&[(keys::REQUEST_METHOD, "BREW")])).unwrap();
        assert_eq!(req.method(), Method::GET);

        let req = Request::from_env(&env(&[])).unwrap();
        assert_eq!(req.method(), Method::GET);
    }

    #[test]
    fn test_scheme_and_secure() {
        let req = Request::from_env(&env(&[(keys::HTTPS, "on")])).unwrap();
        assert_eq!(req.scheme(), "https://");
        assert!(req.is_secure());

        let req = Request::from_env(&env(&[])).unwrap();
        assert_eq!(req.scheme(), "http://");
        assert!(!req.is_secure());
    }

    #[test]
    fn test_malformed_host_is_fatal() {
        let err = Request::from_env(&env(&[(keys::HTTP_HOST, "exa mple.com")]));
        assert!(matches!(err, Err(crate::Error::MalformedHost(_))));
    }

    #[test]
    fn test_userinfo_requires_user() {
        let req = Request::from_env(&env(&[(keys::PHP_AUTH_PW, "secret")])).unwrap();
        assert_eq!(req.userinfo(), "");
        assert_eq!(req.password(), "secret");

        let req = Request::from_env(&env(&[
            (keys::PHP_AUTH_USER, "alice"),
            (keys::PHP_AUTH_PW, "secret"),
        ]))
        .unwrap();
        assert_eq!(req.userinfo(), "alice:secret");
    }

    #[test]
    fn test_content_type_first_accept_token() {
        let req = Request::from_env(&env(&[(
            keys::HTTP_ACCEPT,
            "text/HTML,application/xml;q=0.9",
        )]))
        .unwrap();
        assert_eq!(req.content_type(), "text/html");

        let req = Request::from_env(&env(&[(keys::HTTP_ACCEPT, "application/json; q=1")]))
            .unwrap();
        assert_eq!(req.content_type(), "application/json");
    }

    #[test]
    fn test_path_trimming() {
        let req = Request::from_env(&env(&[(keys::REQUEST_URI, "/over/there/")])).unwrap();
        assert_eq!(req.path(), "/over/there");

        let req =
            Request::from_env(&env(&[(keys::REQUEST_URI, "/over/there/index.php?x=1")])).unwrap();
        assert_eq!(req.path(), "/over/there");

        let req = Request::from_env(&env(&[(keys::REQUEST_URI, "/index.php")])).unwrap();
        assert_eq!(req.path(), "");

        let req = Request::from_env(&env(&[(keys::REQUEST_URI, "/")])).unwrap();
        assert_eq!(req.path(), "");
    }

    #[test]
    fn test_path_from_orig_path_info() {
        let req = Request::from_env(&env(&[
            (keys::ORIG_PATH_INFO, "/legacy/page"),
            (keys::QUERY_STRING, "b=2&a=1"),
        ]))
        .unwrap();
        assert_eq!(req.path(), "/legacy/page");
        assert_eq!(req.query(), "a=1&b=2");
    }

    #[test]
    fn test_url_identity() {
        let cases: &[&[(&str, &str)]] = &[
            &[
                (keys::REQUEST_URI, "/over/there?type=animal"),
                (keys::HTTP_HOST, "example.com"),
                (keys::QUERY_STRING, "type=animal"),
            ],
            &[(keys::HTTP_HOST, "example.com:9000")],
            &[],
        ];
        for pairs in cases {
            let req = Request::from_env(&env(pairs)).unwrap();
            let expected = if req.query().is_empty() {
                format!("{}{}", req.base_url(), req.path())
            } else {
                format!("{}{}?{}", req.base_url(), req.path(), req.query())
            };
            assert_eq!(req.url(), expected);
        }
    }
}
