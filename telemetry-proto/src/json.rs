//! JSON payload rendering for a sensor snapshot.
//!
//! The payload is a single flat object with a nested `joystick` group:
//!
//! ```text
//! {"botao1":"solto","botao2":"pressionado","temperatura":27.35,
//!  "joystick":{"x":1800,"y":3000,"direcao":"Northeast"}}
//! ```
//!
//! Key order is fixed and the rendering is byte-exact: the HTTP builder
//! derives `Content-Length` from the rendered length, so every byte counts.
//!
//! A failed temperature read renders as the bare sentinel `Erro de leitura`
//! in the numeric slot. The ingest endpoint consumes the payload with that
//! sentinel in place, so it is kept verbatim.

use crate::fmt::{write_f32_2dp, write_u32, MAX_F32_2DP_SIZE};
use crate::types::{SensorSnapshot, TempReading};

/// Maximum size of a rendered JSON body. Generous: the worst-case snapshot
/// renders in well under half of this.
pub const MAX_JSON_LEN: usize = 512;

/// Error type for payload rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RenderError {
    /// The output buffer is too small to hold the rendered payload.
    BufferTooSmall,
    /// The rendered request would exceed the fixed request capacity.
    Overflow,
}

impl core::fmt::Display for RenderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::BufferTooSmall => write!(f, "buffer too small"),
            Self::Overflow => write!(f, "request exceeds capacity"),
        }
    }
}

/// Helper for sequential writes into a pre-sized buffer.
struct JsonBuf<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> JsonBuf<'a> {
    #[inline]
    fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    #[inline]
    fn put(&mut self, bytes: &[u8]) {
        self.buf[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
        self.pos += bytes.len();
    }

    #[inline]
    fn put_u32(&mut self, value: u32) {
        self.pos += write_u32(&mut self.buf[self.pos..], value);
    }

    /// Quoted JSON string. All labels written here are plain ASCII without
    /// quotes or backslashes, so no escaping pass is needed.
    #[inline]
    fn put_str(&mut self, s: &str) {
        self.put(b"\"");
        self.put(s.as_bytes());
        self.put(b"\"");
    }
}

/// Render the snapshot into `buf`, returning the number of bytes written.
///
/// # Errors
///
/// Returns [`RenderError::BufferTooSmall`] if `buf` is shorter than
/// [`MAX_JSON_LEN`].
pub fn render_json(snapshot: &SensorSnapshot, buf: &mut [u8]) -> Result<usize, RenderError> {
    if buf.len() < MAX_JSON_LEN {
        return Err(RenderError::BufferTooSmall);
    }

    let mut jb = JsonBuf::new(buf);

    jb.put(b"{\"botao1\":");
    jb.put_str(snapshot.button1.label());
    jb.put(b",\"botao2\":");
    jb.put_str(snapshot.button2.label());
    jb.put(b",\"temperatura\":");
    match snapshot.temperature {
        TempReading::Celsius(value) => {
            let mut tmp = [0u8; MAX_F32_2DP_SIZE];
            let len = write_f32_2dp(&mut tmp, value);
            jb.put(&tmp[..len]);
        }
        // Bare sentinel, unquoted: matches the deployed wire format.
        TempReading::ReadError => jb.put(b"Erro de leitura"),
    }
    jb.put(b",\"joystick\":{\"x\":");
    jb.put_u32(u32::from(snapshot.joystick_x));
    jb.put(b",\"y\":");
    jb.put_u32(u32::from(snapshot.joystick_y));
    jb.put(b",\"direcao\":");
    jb.put_str(snapshot.direction.label());
    jb.put(b"}}");

    Ok(jb.pos)
}
