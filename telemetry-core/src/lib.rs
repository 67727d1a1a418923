//! Platform-agnostic core of the sensor telemetry poster.
//!
//! This crate provides the sampling and transmission logic without any
//! platform-specific dependencies. It can be used both in embedded `no_std`
//! environments and on host for testing.
//!
//! # Overview
//!
//! The crate is organized into several modules:
//!
//! - [`sensors`]: Sensor seam ([`Sensors`]) and the on-chip temperature
//!   calibration ([`temperature_from_adc`])
//! - [`store`]: Latest-snapshot sample store ([`SampleStore`])
//! - [`connection`]: Explicit state machine for one outbound send attempt
//!   ([`Connection`], [`Event`], [`Action`])
//! - [`transport`]: Network seam ([`Transport`]) and the generic driver
//!   that runs one cycle to completion ([`run_send_cycle`])
//!
//! # Send cycle
//!
//! Each periodic trigger renders the current snapshot into one owned HTTP
//! request and drives a fresh connection through
//!
//! ```text
//! Idle -> Resolving -> Connecting -> Sending -> AwaitingClose -> Closed
//! ```
//!
//! with the request buffer released exactly once on every path through the
//! machine. Failures end the attempt; the next trigger starts over. At most
//! one attempt is in flight per [`Connection`]; an overlapping trigger is
//! rejected with [`SendError::Busy`].
//!
//! # Example
//!
//! ```rust,ignore
//! use telemetry_core::{build_request, run_send_cycle, Connection, SampleStore, Target};
//!
//! let target = Target { host: "sensors.local", port: 8000, path: "/dados" };
//! let request = build_request(store.snapshot(), &target)?;
//! let reason = run_send_cycle(&mut conn, &mut transport, &target, request).await?;
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Enable defmt formatting (for embedded logging)
//!
//! # No-std Support
//!
//! This crate is `#![no_std]` by default and uses no heap allocations,
//! making it suitable for embedded systems with limited resources.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

pub mod connection;
pub mod sensors;
pub mod store;
pub mod transport;

// Re-export main types at crate root
pub use connection::{
    Action, CloseReason, Connection, ErrorKind, Event, SendError, StageError, State,
};
pub use sensors::{temperature_from_adc, Sensors};
pub use store::SampleStore;
pub use transport::{run_send_cycle, Transport};

// Re-export the wire layer so consumers only need this crate
pub use telemetry_proto::{
    build_request, render_json, ButtonState, Direction, OutboundRequest, RenderError,
    SensorSnapshot, Target, TempReading, MAX_JSON_LEN, MAX_REQUEST_LEN,
};
