//! Server environment snapshot.
//!
//! A request is constructed from a snapshot of the web server's
//! environment fields (`REQUEST_METHOD`, `HTTP_HOST`, `QUERY_STRING` and
//! friends). The snapshot is populated once by the caller and only read
//! afterwards; resolution logic receives it as an explicit argument
//! instead of touching any process-wide state.

/// Well-known environment field names.
pub mod keys {
    // Request info
    pub const REQUEST_METHOD: &str = "REQUEST_METHOD";
    pub const REQUEST_URI: &str = "REQUEST_URI";
    pub const ORIG_PATH_INFO: &str = "ORIG_PATH_INFO";
    pub const QUERY_STRING: &str = "QUERY_STRING";

    // Server info
    pub const SERVER_NAME: &str = "SERVER_NAME";
    pub const SERVER_ADDR: &str = "SERVER_ADDR";
    pub const SERVER_PORT: &str = "SERVER_PORT";

    // TLS info
    pub const HTTPS: &str = "HTTPS";

    // HTTP headers
    pub const HTTP_HOST: &str = "HTTP_HOST";
    pub const HTTP_ACCEPT: &str = "HTTP_ACCEPT";
    pub const HTTP_X_FORWARDED_PROTO: &str = "HTTP_X_FORWARDED_PROTO";

    // Auth credentials
    pub const PHP_AUTH_USER: &str = "PHP_AUTH_USER";
    pub const PHP_AUTH_PW: &str = "PHP_AUTH_PW";
}

/// Immutable snapshot of the server environment.
///
/// Stored as a flat key-value list: snapshots are small (a few dozen
/// fields) and built once per request, so a linear scan beats a map.
#[derive(Debug, Clone, Default)]
pub struct EnvSnapshot {
    vars: Vec<(String, String)>,
}

impl EnvSnapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot from name-value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Look up a field by exact name. First match wins.
    #[inline]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Look up a field, defaulting to the empty string when absent.
    #[inline]
    pub fn get_or_empty(&self, name: &str) -> &str {
        self.get(name).unwrap_or("")
    }

    /// Number of fields in the snapshot.
    #[inline]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Whether the snapshot carries no fields.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Iterate over all fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

impl<B> From<&http::Request<B>> for EnvSnapshot {
    /// Derive a snapshot from an `http` crate request, the way a CGI-style
    /// front end would populate the environment for the script behind it.
    fn from(req: &http::Request<B>) -> Self {
        let uri = req.uri();
        let secure = uri.scheme_str() == Some("https");

        let mut vars: Vec<(String, String)> = Vec::with_capacity(12);
        vars.push((keys::REQUEST_METHOD.into(), req.method().as_str().into()));
        vars.push((
            keys::REQUEST_URI.into(),
            uri.path_and_query()
                .map(|pq| pq.as_str().to_string())
                .unwrap_or_else(|| uri.path().to_string()),
        ));
        vars.push((
            keys::QUERY_STRING.into(),
            uri.query().unwrap_or("").to_string(),
        ));

        if let Some(host) = req
            .headers()
            .get(http::header::HOST)
            .and_then(|v| v.to_str().ok())
        {
            vars.push((keys::HTTP_HOST.into(), host.to_string()));
        }
        if let Some(host) = uri.host() {
            vars.push((keys::SERVER_NAME.into(), host.to_string()));
        }
        let server_port = match uri.port_u16() {
            Some(port) => port.to_string(),
            None if secure => "443".to_string(),
            None => "80".to_string(),
        };
        vars.push((keys::SERVER_PORT.into(), server_port));

        if secure {
            vars.push((keys::HTTPS.into(), "on".into()));
        }
        if let Some(accept) = req
            .headers()
            .get(http::header::ACCEPT)
            .and_then(|v| v.to_str().ok())
        {
            vars.push((keys::HTTP_ACCEPT.into(), accept.to_string()));
        }
        if let Some(proto) = req
            .headers()
            .get("x-forwarded-proto")
            .and_then(|v| v.to_str().ok())
        {
            vars.push((keys::HTTP_X_FORWARDED_PROTO.into(), proto.to_string()));
        }

        Self { vars }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_and_defaults() {
        let env = EnvSnapshot::from_pairs([
            (keys::REQUEST_METHOD, "GET"),
            (keys::HTTP_HOST, "example.com"),
        ]);

        assert_eq!(env.get(keys::REQUEST_METHOD), Some("GET"));
        assert_eq!(env.get(keys::SERVER_PORT), None);
        assert_eq!(env.get_or_empty(keys::SERVER_PORT), "");
        assert_eq!(env.len(), 2);
        assert!(!env.is_empty());
    }

    #[test]
    fn test_first_match_wins() {
        let env = EnvSnapshot::from_pairs([
            (keys::SERVER_PORT, "8080"),
            (keys::SERVER_PORT, "9090"),
        ]);
        assert_eq!(env.get(keys::SERVER_PORT), Some("8080"));
    }

    #[test]
    fn test_from_http_request() {
        let req = http::Request::builder()
            .method("POST")
            .uri("https://example.com:8443/api?x=1")
            .header("host", "example.com:8443")
            .header("accept", "application/json")
            .body(())
            .unwrap();

        let env = EnvSnapshot::from(&req);
        assert_eq!(env.get(keys::REQUEST_METHOD), Some("POST"));
        assert_eq!(env.get(keys::REQUEST_URI), Some("/api?x=1"));
        assert_eq!(env.get(keys::QUERY_STRING), Some("x=1"));
        assert_eq!(env.get(keys::HTTP_HOST), Some("example.com:8443"));
        assert_eq!(env.get(keys::SERVER_PORT), Some("8443"));
        assert_eq!(env.get(keys::HTTPS), Some("on"));
        assert_eq!(env.get(keys::HTTP_ACCEPT), Some("application/json"));
    }

    #[test]
    fn test_from_http_request_defaults_port_by_scheme() {
        let req = http::Request::builder()
            .uri("http://example.com/")
            .body(())
            .unwrap();
        let env = EnvSnapshot::from(&req);
        assert_eq!(env.get(keys::SERVER_PORT), Some("80"));
        assert_eq!(env.get(keys::HTTPS), None);
    }
}
