//! URL component extraction from the server environment.
//!
//! Derives scheme, userinfo, host, port and authority. Every resolver
//! takes the environment snapshot as an explicit argument. Only host
//! validation is fatal; all other resolutions degrade to empty-string
//! defaults so a partially populated environment still yields a usable
//! request.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::env::{keys, EnvSnapshot};
use crate::error::{Error, Result};

pub const HTTP_SCHEME: &str = "http://";
pub const HTTPS_SCHEME: &str = "https://";

const HTTP_DEFAULT_PORT: &str = "80";
const HTTPS_DEFAULT_PORT: &str = "443";

/// Host grammar: alphanumerics, hyphen, colon, underscore, dot, plus an
/// optional leading bracket for IPv6-style literals.
static HOST_GRAMMAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[?(?:[a-zA-Z0-9\-:\]_]+\.?)+$").expect("host grammar regex"));

/// Characters preserved by [`sanitize_url`]. Mirrors the conservative
/// URL allow-list of the original filter: RFC 3986 characters plus the
/// handful of sub-delimiters seen in real request URIs.
const URL_ALLOWED: &str = "$-_.+!*'(),{}|\\^~[]`<>#%\";/?:@&=";

/// Resolve the secure flag from three independent signals.
///
/// All three are evaluated; any one upgrades the request to secure.
pub(crate) fn resolve_secure(env: &EnvSnapshot) -> bool {
    let mut secure = false;

    if let Some(flag) = env.get(keys::HTTPS) {
        let flag = flag.to_ascii_lowercase();
        if flag == "on" || flag == "1" {
            secure = true;
        }
    }
    if let Some(proto) = env.get(keys::HTTP_X_FORWARDED_PROTO) {
        if proto.to_ascii_lowercase() == "https" {
            secure = true;
        }
    }
    if env.get(keys::SERVER_PORT) == Some(HTTPS_DEFAULT_PORT) {
        secure = true;
    }

    secure
}

/// Scheme prefix for the secure flag.
#[inline]
pub(crate) fn scheme_for(secure: bool) -> &'static str {
    if secure {
        HTTPS_SCHEME
    } else {
        HTTP_SCHEME
    }
}

/// Resolve the host, plus a candidate port when the host header carried
/// one.
///
/// An explicit host header wins and is split on the first `:`. Otherwise
/// the server name and server address fields are tried in order, first
/// non-empty wins, defaulting to the empty string.
pub(crate) fn resolve_host(env: &EnvSnapshot) -> (String, Option<String>) {
    if let Some(header) = env.get(keys::HTTP_HOST) {
        if !header.is_empty() {
            return match header.split_once(':') {
                Some((host, port)) => (host.to_string(), Some(port.to_string())),
                None => (header.to_string(), None),
            };
        }
    }

    for key in [keys::SERVER_NAME, keys::SERVER_ADDR] {
        if let Some(value) = env.get(key) {
            if !value.is_empty() {
                return (value.to_string(), None);
            }
        }
    }

    debug!("no host in environment, defaulting to empty");
    (String::new(), None)
}

/// Validate a resolved host against the host grammar.
///
/// An empty host means an unpopulated environment and passes; request
/// construction stays permissive everywhere except a host that is
/// present and malformed.
pub(crate) fn validate_host(host: &str) -> Result<()> {
    if host.is_empty() || HOST_GRAMMAR.is_match(host) {
        Ok(())
    } else {
        Err(Error::MalformedHost(host.to_string()))
    }
}

/// Resolve the port, suppressing the scheme's default.
///
/// A candidate captured during host resolution wins over the server port
/// field. A port equal to the scheme's conventional default (80 for
/// http, 443 for https) canonicalizes to the empty string.
pub(crate) fn resolve_port(env: &EnvSnapshot, secure: bool, candidate: Option<String>) -> String {
    let port = match candidate {
        Some(port) => port,
        None => env.get_or_empty(keys::SERVER_PORT).to_string(),
    };

    let default = if secure {
        HTTPS_DEFAULT_PORT
    } else {
        HTTP_DEFAULT_PORT
    };
    if port == default {
        String::new()
    } else {
        port
    }
}

/// Compose `[user[:password]@]host[:port]`.
///
/// The userinfo part is included only when the user is non-empty; the
/// port only when it survived default-port suppression.
pub(crate) fn compose_authority(user: &str, password: &str, host: &str, port: &str) -> String {
    let mut authority = String::with_capacity(host.len() + port.len() + user.len() + 2);
    if !user.is_empty() {
        authority.push_str(user);
        authority.push(':');
        authority.push_str(password);
        authority.push('@');
    }
    authority.push_str(host);
    if !port.is_empty() {
        authority.push(':');
        authority.push_str(port);
    }
    authority
}

/// Strip control and non-URL characters from a raw URI or redirect
/// target.
pub fn sanitize_url(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || URL_ALLOWED.contains(*c))
        .collect()
}
