//! Response pipeline configuration.

use std::str::FromStr;
use std::time::{Duration, SystemTime};

use super::parse::{env_or, env_parse};
use super::ConfigError;

/// Defaults applied by the response header pipeline.
#[derive(Clone, Debug)]
pub struct ResponseConfig {
    /// Timezone applied to date-header computation.
    pub timezone: Timezone,
    /// Charset appended to the Content-Type header.
    pub charset: String,
    /// Default Language header value.
    pub language: String,
    /// Default Content-Type when no override is supplied.
    pub content_type: String,
    /// Default HTTP version for the status header.
    pub version: String,
    /// max-age for cachable responses, in seconds.
    pub cache_max_age: u64,
}

impl Default for ResponseConfig {
    fn default() -> Self {
        Self {
            timezone: Timezone::UTC,
            charset: "UTF-8".to_string(),
            language: "en-GB".to_string(),
            content_type: "text/html".to_string(),
            version: "1.0".to_string(),
            cache_max_age: 3600,
        }
    }
}

impl ResponseConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            timezone: env_parse("RESPONSE_TIMEZONE", Timezone::UTC)?,
            charset: env_or("RESPONSE_CHARSET", &defaults.charset),
            language: env_or("RESPONSE_LANGUAGE", &defaults.language),
            content_type: env_or("RESPONSE_CONTENT_TYPE", &defaults.content_type),
            version: env_or("RESPONSE_VERSION", &defaults.version),
            cache_max_age: env_parse("RESPONSE_CACHE_MAX_AGE", defaults.cache_max_age)?,
        })
    }
}

/// Fixed-offset timezone for date-header computation.
///
/// Accepts `UTC`, `GMT`, or a `±HH:MM`/`±HHMM` offset. The offset
/// shifts the wall clock before RFC-1123 formatting; the rendered
/// suffix is always `GMT`, matching the header format.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timezone {
    offset_secs: i64,
}

impl Timezone {
    pub const UTC: Timezone = Timezone { offset_secs: 0 };

    /// Offset from UTC in seconds.
    #[inline]
    pub fn offset_secs(&self) -> i64 {
        self.offset_secs
    }

    /// Format an instant as an RFC-1123 date string, shifted by the
    /// configured offset.
    pub fn format_rfc1123(&self, t: SystemTime) -> String {
        let shifted = if self.offset_secs >= 0 {
            t + Duration::from_secs(self.offset_secs as u64)
        } else {
            t - Duration::from_secs(self.offset_secs.unsigned_abs())
        };
        httpdate::fmt_http_date(shifted)
    }
}

impl Default for Timezone {
    fn default() -> Self {
        Self::UTC
    }
}

impl FromStr for Timezone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("utc") || s.eq_ignore_ascii_case("gmt") {
            return Ok(Self::UTC);
        }

        let (sign, rest) = match s.as_bytes()[0] {
            b'+' => (1i64, &s[1..]),
            b'-' => (-1i64, &s[1..]),
            _ => return Err(format!("unknown timezone: {}", s)),
        };

        let digits: String = rest.chars().filter(|c| *c != ':').collect();
        if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(format!("expected ±HH:MM or ±HHMM offset, got: {}", s));
        }

        let hours: i64 = digits[..2].parse().map_err(|_| "bad hours".to_string())?;
        let minutes: i64 = digits[2..].parse().map_err(|_| "bad minutes".to_string())?;
        if hours > 14 || minutes > 59 {
            return Err(format!("offset out of range: {}", s));
        }

        Ok(Self {
            offset_secs: sign * (hours * 3600 + minutes * 60),
        })
    }
}
