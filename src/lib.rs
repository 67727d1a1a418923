//! Sensor-to-HTTP telemetry poster for the Raspberry Pi Pico W.
//!
//! This crate provides the embedded implementation of a telemetry poster
//! that samples the board's physical inputs and relays each snapshot to a
//! remote HTTP endpoint as a JSON POST over a raw TCP connection.
//!
//! # Overview
//!
//! The firmware runs on a Raspberry Pi Pico W (RP2040 + CYW43439) and:
//! 1. Samples two buttons, the joystick axes and the on-chip temperature
//!    sensor once per second
//! 2. Renders the latest snapshot as a JSON POST request every three seconds
//! 3. Drives one outbound TCP connection per post through resolve, connect,
//!    send and close
//!
//! # Hardware Configuration
//!
//! | Function     | GPIO | Description                          |
//! |--------------|------|--------------------------------------|
//! | Button 1     | 5    | Digital input, pull-up (active low)  |
//! | Button 2     | 6    | Digital input, pull-up (active low)  |
//! | Joystick X   | 27   | ADC channel 1                        |
//! | Joystick Y   | 26   | ADC channel 0                        |
//! | Temperature  | -    | On-chip sensor, ADC channel 4        |
//! | Wi-Fi        | 23/24/25/29 | CYW43439 over PIO SPI         |
//!
//! # Architecture
//!
//! The firmware uses the Embassy async runtime with four concurrent tasks:
//!
//! - **CYW43 Task**: Services the Wi-Fi chip
//! - **Net Task**: Runs the TCP/IP stack
//! - **Sampler Task**: Reads the sensors and signals the latest snapshot
//! - **Poster Task**: Periodically builds a request from the latest
//!   snapshot and runs one send cycle to completion
//!
//! Communication between sampler and poster uses Embassy's
//! [`Signal`](embassy_sync::signal::Signal) with "latest value wins"
//! semantics: the poster always transmits the most recent sample and never
//! queues history. Send cycles run back to back, never overlapped.
//!
//! # Wi-Fi chip firmware
//!
//! The CYW43439 firmware and CLM blobs are not checked in; see
//! `cyw43-firmware/README.md` for where to fetch them before building.
//!
//! # Modules
//!
//! - [`config`]: Build-time configuration (credentials, target, cadence)
//! - [`sensors`]: Board sensor access ([`BoardSensors`](sensors::BoardSensors))
//! - [`net`]: Network transport over embassy-net
//!   ([`StackTransport`](net::StackTransport))
//!
//! # Features
//!
//! - **`dev-panic`** (default): Use `panic-probe` for development (prints panic info via RTT)
//! - **`prod-panic`**: Use `panic-reset` for production (silent reset)
//!
//! # Re-exports
//!
//! This crate re-exports all public items from [`telemetry_core`] for
//! convenience, so consumers only need to depend on this crate.

#![no_std]

// Ensure mutually exclusive panic handler features
#[cfg(all(feature = "dev-panic", feature = "prod-panic"))]
compile_error!("Cannot enable both `dev-panic` and `prod-panic` features - they define conflicting panic handlers");

// Re-export core types for convenience
pub use telemetry_core::{
    build_request, render_json, run_send_cycle, Action, ButtonState, CloseReason, Connection,
    Direction, ErrorKind, Event, OutboundRequest, RenderError, SampleStore, SendError,
    SensorSnapshot, Sensors, StageError, State, Target, TempReading, Transport,
};

pub mod config;
pub mod net;
pub mod sensors;

pub use net::StackTransport;
pub use sensors::BoardSensors;
