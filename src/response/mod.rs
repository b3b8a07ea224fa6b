//! HTTP response resolution and emission.
//!
//! A response is produced by running a caller-supplied override-header
//! map plus a raw body through a fixed sequence of resolution steps.
//! Each step consumes its recognized keys from the override map and
//! deposits finalized headers in order; keys no step recognizes pass
//! through verbatim at the end.

pub mod emitter;
pub mod status;

use std::time::SystemTime;

use bytes::Bytes;
use tracing::{debug, warn};

use crate::config::ResponseConfig;
use crate::error::Error;
use crate::request::url::sanitize_url;

pub use emitter::Emitter;

/// Ordered header list. Deposit order is wire order.
pub type HeaderList = Vec<(String, String)>;

const DEFAULT_STATUS: u16 = 200;
const REDIRECT_STATUS: u16 = 301;

/// Recognized override-map keys, consumed by the resolution steps.
mod override_keys {
    pub const LOCATION: &str = "Location";
    pub const STATUS: &str = "Status";
    pub const VERSION: &str = "Version";
    pub const CONTENT_TYPE: &str = "Content-Type";
    pub const CHARSET: &str = "Charset";
    pub const LAST_MODIFIED: &str = "Last-Modified";
    pub const LANGUAGE: &str = "Language";
    pub const CACHABLE: &str = "Cachable";
}

/// Finalized HTTP response.
///
/// Built exactly once by [`Response::resolve`]; the header list is in
/// resolution-pipeline order and the body already reflects no-body
/// status suppression. Emitted exactly once via an [`Emitter`].
#[derive(Debug)]
pub struct Response {
    status: u16,
    version: String,
    headers: HeaderList,
    body: String,
}

impl Response {
    /// Run the header-resolution pipeline over an override map and raw
    /// body, stamping date headers from the current wall clock.
    pub fn resolve(
        overrides: HeaderList,
        body: Option<String>,
        config: &ResponseConfig,
    ) -> Self {
        Self::resolve_at(overrides, body, config, SystemTime::now())
    }

    /// Pipeline entry point with an explicit clock, for deterministic
    /// date headers in tests.
    pub fn resolve_at(
        mut overrides: HeaderList,
        body: Option<String>,
        config: &ResponseConfig,
        now: SystemTime,
    ) -> Self {
        let mut headers: HeaderList = Vec::with_capacity(overrides.len() + 8);
        let http_now = config.timezone.format_rfc1123(now);

        // 1. redirect detection
        let location = take(&mut overrides, override_keys::LOCATION)
            .map(|target| sanitize_url(&target));
        let is_redirect = location.is_some();

        // 2. status resolution
        let mut status = take(&mut overrides, override_keys::STATUS)
            .and_then(|s| s.trim().parse::<u16>().ok())
            .unwrap_or(DEFAULT_STATUS);

        // 3. version resolution, gated off for redirects. A Version
        // override on a redirect stays in the map and passes through in
        // step 12.
        let mut version = config.version.clone();
        if !is_redirect {
            if let Some(v) = take(&mut overrides, override_keys::VERSION) {
                version = v;
            }
        }

        // 4. apply redirect: a redirect must carry a 3xx code
        if let Some(target) = &location {
            if !(300..=399).contains(&status) {
                debug!(status, "redirect status outside 3xx, forcing 301");
                status = REDIRECT_STATUS;
            }
            set(&mut headers, override_keys::LOCATION, html_escape(target));
        }

        // 5. status header from the reason table
        let reason = match status::reason(status) {
            Some(reason) => reason,
            None => {
                warn!(status, "unknown status code, resetting to 200");
                status = DEFAULT_STATUS;
                status::reason(DEFAULT_STATUS).expect("default status is known")
            }
        };
        set(
            &mut headers,
            override_keys::STATUS,
            format!("HTTP/{} {}", version, reason),
        );

        // 6. body suppression
        let body = if status::suppresses_body(status) {
            String::new()
        } else {
            body.unwrap_or_default()
        };

        // 7. content type with charset
        let content_type = take(&mut overrides, override_keys::CONTENT_TYPE)
            .unwrap_or_else(|| config.content_type.clone());
        let charset = take(&mut overrides, override_keys::CHARSET)
            .unwrap_or_else(|| config.charset.clone());
        set(
            &mut headers,
            override_keys::CONTENT_TYPE,
            format!("{}; charset={}", content_type, charset),
        );

        // 8. last-modified and date, skipped for redirects
        if !is_redirect {
            let last_modified = take(&mut overrides, override_keys::LAST_MODIFIED)
                .unwrap_or_else(|| http_now.clone());
            set(&mut headers, override_keys::LAST_MODIFIED, last_modified);
            set(&mut headers, "Date", http_now.clone());
        }

        // 9. language
        let language = take(&mut overrides, override_keys::LANGUAGE)
            .unwrap_or_else(|| config.language.clone());
        set(&mut headers, override_keys::LANGUAGE, language);

        // 10. cache policy
        let cachable = take(&mut overrides, override_keys::CACHABLE);
        if cachable.as_deref().map(str::trim) == Some("1") {
            set(
                &mut headers,
                "Cache-Control",
                format!("max-age={}, public", config.cache_max_age),
            );
        } else {
            set(
                &mut headers,
                "Cache-Control",
                "no-cache, no-store, max-age=0, must-revalidate".to_string(),
            );
            set(&mut headers, "Pragma", "no-cache".to_string());
            if !is_redirect {
                set(&mut headers, "Expires", http_now);
            }
        }

        // 11. defensive double-removal of step 8-10 keys
        for key in [
            override_keys::LAST_MODIFIED,
            override_keys::LANGUAGE,
            override_keys::CACHABLE,
        ] {
            take(&mut overrides, key);
        }

        // 12. remaining overrides pass through verbatim
        for (name, value) in overrides {
            set(&mut headers, &name, value);
        }

        Self {
            status,
            version,
            headers,
            body,
        }
    }

    /// Get the resolved status code.
    #[inline]
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Get the HTTP version used in the status header.
    #[inline]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Get the finalized headers in deposit order.
    #[inline]
    pub fn headers(&self) -> &HeaderList {
        &self.headers
    }

    /// Get a header value by exact name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Get the final body.
    #[inline]
    pub fn body(&self) -> &str {
        &self.body
    }
}

impl TryFrom<&Response> for http::Response<Bytes> {
    type Error = Error;

    /// Bridge into `http` crate types. The `Status` pseudo-header is
    /// carried as the real status code; multi-line values become
    /// repeated headers.
    fn try_from(res: &Response) -> Result<Self, Error> {
        let status =
            http::StatusCode::from_u16(res.status).unwrap_or(http::StatusCode::OK);
        let mut builder = http::Response::builder().status(status);

        if let Some(headers) = builder.headers_mut() {
            for (name, value) in &res.headers {
                if name == override_keys::STATUS {
                    continue;
                }
                let header_name = http::header::HeaderName::try_from(name.as_str())
                    .map_err(|_| Error::InvalidHeader(name.clone()))?;
                for line in value.split('\n') {
                    let header_value =
                        http::header::HeaderValue::try_from(line.trim_end_matches('\r'))
                            .map_err(|_| Error::InvalidHeader(name.clone()))?;
                    headers.append(header_name.clone(), header_value);
                }
            }
        }

        builder
            .body(Bytes::from(res.body.clone()))
            .map_err(Error::Http)
    }
}

/// Remove every pair named `key` from the override map, returning the
/// first value.
fn take(overrides: &mut HeaderList, key: &str) -> Option<String> {
    let mut found = None;
    let mut i = 0;
    while i < overrides.len() {
        if overrides[i].0 == key {
            let (_, value) = overrides.remove(i);
            if found.is_none() {
                found = Some(value);
            }
        } else {
            i += 1;
        }
    }
    found
}

/// Set a header, overwriting an existing name in place. Last set wins;
/// a fresh name appends in deposit order.
pub(crate) fn set(headers: &mut HeaderList, name: &str, value: String) {
    match headers.iter_mut().find(|(n, _)| n == name) {
        Some(entry) => entry.1 = value,
        None => headers.push((name.to_string(), value)),
    }
}

/// Escape a redirect target for the Location header.
fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            c => out.push(c),
        }
    }
    out
}
