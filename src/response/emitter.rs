//! Wire emission: headers first, body second.
//!
//! The two transmission effects are irreversible and strictly ordered.
//! Headers go out at most once per emitter; a second send skips them
//! silently, matching the permissive semantics of platforms that forbid
//! re-sending flushed headers.

use std::io::Write;

use tracing::debug;

use crate::error::Result;

use super::{set, HeaderList, Response};

/// Sequences header and body transmission over a transport.
pub struct Emitter<W: Write> {
    transport: W,
    headers_sent: bool,
}

impl<W: Write> Emitter<W> {
    /// Wrap a transport.
    pub fn new(transport: W) -> Self {
        Self {
            transport,
            headers_sent: false,
        }
    }

    /// Whether headers have already been transmitted.
    #[inline]
    pub fn headers_sent(&self) -> bool {
        self.headers_sent
    }

    /// Transmit a finalized response.
    ///
    /// A non-empty body contributes a Content-Length header before the
    /// headers are formatted. A header value containing embedded
    /// newlines becomes repeated same-name lines. The body is written
    /// only when non-blank after trimming.
    pub fn send(&mut self, response: &Response) -> Result<()> {
        if self.headers_sent {
            debug!("headers already sent, skipping");
        } else {
            let mut headers: HeaderList = response.headers().clone();
            if !response.body().is_empty() {
                set(
                    &mut headers,
                    "Content-Length",
                    response.body().len().to_string(),
                );
            }

            for (name, value) in &headers {
                for line in value.split('\n') {
                    write!(
                        self.transport,
                        "{}: {}\r\n",
                        name,
                        line.trim_end_matches('\r')
                    )?;
                }
            }
            self.transport.write_all(b"\r\n")?;
            self.headers_sent = true;
        }

        if !response.body().trim().is_empty() {
            self.transport.write_all(response.body().as_bytes())?;
        }
        self.transport.flush()?;
        Ok(())
    }

    /// Unwrap the transport.
    pub fn into_inner(self) -> W {
        self.transport
    }
}
