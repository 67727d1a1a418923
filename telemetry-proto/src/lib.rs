//! Wire types and rendering for the sensor telemetry poster.
//!
//! This crate provides everything needed to turn a sampled sensor snapshot
//! into the bytes that go on the wire:
//!
//! - **Types**: Core data structures for representing sampled sensors
//!   - [`ButtonState`] - Pressed/Released with the ingest wire labels
//!   - [`TempReading`] - Celsius value or a failed-read sentinel
//!   - [`Direction`] - Joystick direction label with threshold mapping
//!   - [`SensorSnapshot`] - Latest reading of every sensor
//!
//! - **Payload rendering**: [`render_json`] produces the exact JSON body the
//!   ingest endpoint expects, byte for byte.
//!
//! - **Request rendering**: [`build_request`] wraps the payload in a minimal
//!   one-shot HTTP/1.1 POST ([`OutboundRequest`]) for a [`Target`], with
//!   `Content-Length` always equal to the exact body byte count.
//!
//! # Payload format
//!
//! ```text
//! {"botao1":"pressionado","botao2":"solto","temperatura":27.35,
//!  "joystick":{"x":1800,"y":3000,"direcao":"Northeast"}}
//! ```
//!
//! Buttons carry the labels `"pressionado"`/`"solto"`; a failed temperature
//! read renders as the bare sentinel `Erro de leitura` in the numeric slot
//! (kept verbatim for the deployed ingest endpoint).
//!
//! # Example
//!
//! ```
//! use telemetry_proto::{build_request, SensorSnapshot, Target};
//!
//! let target = Target { host: "sensors.local", port: 8000, path: "/dados" };
//! let request = build_request(&SensorSnapshot::empty(), &target).unwrap();
//! assert!(request.as_bytes().starts_with(b"POST /dados HTTP/1.1\r\n"));
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Enable defmt formatting (for embedded logging)
//!
//! # No-std Support
//!
//! This crate is `#![no_std]` by default and uses no heap allocations; the
//! request buffer is a bounded `heapless` vector.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

mod fmt;
pub mod http;
pub mod json;
pub mod types;

// Re-export types at crate root for convenience
pub use http::{build_request, OutboundRequest, Target, MAX_REQUEST_LEN};
pub use json::{render_json, RenderError, MAX_JSON_LEN};
pub use types::{ButtonState, Direction, SensorSnapshot, TempReading, AXIS_HIGH, AXIS_LOW};
