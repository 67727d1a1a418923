//! HTTP/1.1 request rendering.
//!
//! Wraps a rendered JSON payload in a minimal one-shot POST request:
//!
//! ```text
//! POST /dados HTTP/1.1\r\n
//! Host: example.local\r\n
//! Content-Type: application/json\r\n
//! Content-Length: <exact body bytes>\r\n
//! Connection: close\r\n
//! \r\n
//! <json body>
//! ```
//!
//! One request per TCP connection; the `Connection: close` header makes the
//! peer tear the connection down after responding.

use heapless::Vec;

use crate::fmt::write_u32;
use crate::json::{render_json, RenderError, MAX_JSON_LEN};
use crate::types::SensorSnapshot;

/// Maximum size of a fully rendered request (headers + body).
pub const MAX_REQUEST_LEN: usize = 1024;

/// Where a request is sent: resolved host, TCP port and URL path.
///
/// The builder renders `host` and `path`; `port` is used by the connect
/// stage. Fixed at build time in the firmware, injectable in tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Target<'a> {
    pub host: &'a str,
    pub port: u16,
    pub path: &'a str,
}

/// A single fully rendered HTTP request, owned as one bounded byte buffer.
///
/// Created by [`build_request`], then moved into the connection state
/// machine, which drops it exactly once when the attempt reaches a point
/// where the bytes can no longer be needed.
#[derive(Debug, Default)]
pub struct OutboundRequest {
    buf: Vec<u8, MAX_REQUEST_LEN>,
}

impl OutboundRequest {
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    #[inline]
    fn put(&mut self, bytes: &[u8]) -> Result<(), RenderError> {
        self.buf
            .extend_from_slice(bytes)
            .map_err(|_| RenderError::Overflow)
    }
}

/// Render `snapshot` as a complete POST request for `target`.
///
/// The `Content-Length` header always equals the exact byte count of the
/// body that follows it.
///
/// # Errors
///
/// Returns [`RenderError::Overflow`] if the rendered request would exceed
/// [`MAX_REQUEST_LEN`] (an oversized host or path; not an expected operating
/// condition).
pub fn build_request(
    snapshot: &SensorSnapshot,
    target: &Target<'_>,
) -> Result<OutboundRequest, RenderError> {
    let mut json = [0u8; MAX_JSON_LEN];
    let json_len = render_json(snapshot, &mut json)?;

    let mut content_length = [0u8; 10];
    let digits = write_u32(&mut content_length, json_len as u32);

    let mut request = OutboundRequest::default();
    request.put(b"POST ")?;
    request.put(target.path.as_bytes())?;
    request.put(b" HTTP/1.1\r\nHost: ")?;
    request.put(target.host.as_bytes())?;
    request.put(b"\r\nContent-Type: application/json\r\nContent-Length: ")?;
    request.put(&content_length[..digits])?;
    request.put(b"\r\nConnection: close\r\n\r\n")?;
    request.put(&json[..json_len])?;
    Ok(request)
}
