//! Transport trait and the generic send-cycle driver.
//!
//! [`Transport`] abstracts the non-blocking network stack: hostname
//! resolution, connect, copy-semantics write, receive, and teardown, each as
//! an async operation whose completion feeds the connection state machine.
//! [`run_send_cycle`] is the driver loop that turns machine [`Action`]s into
//! transport calls and transport completions back into [`Event`]s, so the
//! whole exchange can run against a mock on the host.

use core::future::Future;
use core::net::Ipv4Addr;

use telemetry_proto::{OutboundRequest, Target};

use crate::connection::{Action, CloseReason, Connection, Event, SendError, StageError};

/// Async trait for the network stack a send cycle runs on.
///
/// Implementations bound each operation with their own stage deadline and
/// report an expiry as [`StageError::TimedOut`].
///
/// # `no_std` Compatibility
///
/// All implementations must be `#![no_std]` compatible with no heap
/// allocation.
pub trait Transport {
    /// Resolve `host` to an IPv4 address.
    fn resolve(&mut self, host: &str) -> impl Future<Output = Result<Ipv4Addr, StageError>>;

    /// Allocate the endpoint and connect to `addr:port`.
    fn connect(
        &mut self,
        addr: Ipv4Addr,
        port: u16,
    ) -> impl Future<Output = Result<(), StageError>>;

    /// Write all of `data` and flush it toward the peer.
    ///
    /// The transport takes its own copy of the bytes; the caller may drop
    /// the original as soon as this returns.
    fn write(&mut self, data: &[u8]) -> impl Future<Output = Result<(), StageError>>;

    /// Wait for response data. Returns the number of bytes received, with
    /// `Ok(0)` signalling that the peer closed the connection. Consuming
    /// the data acknowledges it to the stack's flow control; logging the
    /// response is the implementation's concern.
    fn recv(&mut self) -> impl Future<Output = Result<usize, StageError>>;

    /// Close the endpoint gracefully.
    fn close(&mut self) -> impl Future<Output = ()>;

    /// Tear the endpoint down abruptly.
    fn abort(&mut self);
}

/// Run one complete send cycle to its terminal state.
///
/// Takes ownership of the rendered request, hands it to the machine, and
/// executes actions until the attempt closes. Stage failures terminate the
/// attempt; nothing is retried here - the next periodic trigger simply
/// starts a fresh cycle.
///
/// # Errors
///
/// Returns [`SendError::Busy`] if `conn` still has a non-terminal attempt.
pub async fn run_send_cycle<T: Transport>(
    conn: &mut Connection,
    transport: &mut T,
    target: &Target<'_>,
    request: OutboundRequest,
) -> Result<CloseReason, SendError> {
    let mut action = conn.begin(request)?;
    loop {
        action = match action {
            Action::Resolve => {
                let result = transport.resolve(target.host).await;
                conn.dispatch(Event::Resolved(result))
            }
            Action::Connect(addr) => {
                let result = transport.connect(addr, target.port).await;
                conn.dispatch(Event::Connected(result))
            }
            Action::Write => {
                let result = transport.write(conn.request_bytes()).await;
                conn.dispatch(Event::WriteFinished(result))
            }
            Action::Recv => match transport.recv().await {
                Ok(0) => conn.dispatch(Event::PeerClosed),
                Ok(n) => conn.dispatch(Event::Received(n)),
                Err(cause) => conn.dispatch(Event::TransportFailed(cause)),
            },
            Action::Close => {
                transport.close().await;
                Action::None
            }
            Action::Abort => {
                transport.abort();
                Action::None
            }
            // `None` outside a terminal state means the exchange stalled;
            // fold it into the transport-error path rather than spinning.
            Action::None => match conn.close_reason() {
                Some(reason) => return Ok(reason),
                None => conn.dispatch(Event::TransportFailed(StageError::Failed)),
            },
        };
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::connection::ErrorKind;
    use core::pin::Pin;
    use core::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};
    use std::vec;
    use std::vec::Vec;
    use telemetry_proto::{build_request, SensorSnapshot, TempReading};

    const TARGET: Target<'static> = Target {
        host: "sensors.local",
        port: 8000,
        path: "/dados",
    };

    const ADDR: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 7);

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Resolve,
        Connect(Ipv4Addr, u16),
        Write(usize),
        Recv,
        Close,
        Abort,
    }

    /// Scripted transport that records every call.
    struct MockTransport {
        resolve_result: Result<Ipv4Addr, StageError>,
        connect_result: Result<(), StageError>,
        write_result: Result<(), StageError>,
        recv_results: Vec<Result<usize, StageError>>,
        calls: Vec<Call>,
    }

    impl MockTransport {
        fn happy() -> Self {
            Self {
                resolve_result: Ok(ADDR),
                connect_result: Ok(()),
                write_result: Ok(()),
                recv_results: vec![Ok(42), Ok(0)],
                calls: Vec::new(),
            }
        }
    }

    impl Transport for MockTransport {
        async fn resolve(&mut self, _host: &str) -> Result<Ipv4Addr, StageError> {
            self.calls.push(Call::Resolve);
            self.resolve_result
        }

        async fn connect(&mut self, addr: Ipv4Addr, port: u16) -> Result<(), StageError> {
            self.calls.push(Call::Connect(addr, port));
            self.connect_result
        }

        async fn write(&mut self, data: &[u8]) -> Result<(), StageError> {
            self.calls.push(Call::Write(data.len()));
            self.write_result
        }

        async fn recv(&mut self) -> Result<usize, StageError> {
            self.calls.push(Call::Recv);
            if self.recv_results.is_empty() {
                Ok(0)
            } else {
                self.recv_results.remove(0)
            }
        }

        async fn close(&mut self) {
            self.calls.push(Call::Close);
        }

        fn abort(&mut self) {
            self.calls.push(Call::Abort);
        }
    }

    // Helper to run a future to completion (simple blocking executor)
    fn block_on<F: Future>(mut f: F) -> F::Output {
        fn noop_raw_waker() -> RawWaker {
            fn noop(_: *const ()) {}
            fn clone(_: *const ()) -> RawWaker {
                noop_raw_waker()
            }
            static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, noop, noop, noop);
            RawWaker::new(core::ptr::null(), &VTABLE)
        }

        let waker = unsafe { Waker::from_raw(noop_raw_waker()) };
        let mut cx = Context::from_waker(&waker);

        // SAFETY: We don't move f after pinning
        let mut f = unsafe { Pin::new_unchecked(&mut f) };

        loop {
            match f.as_mut().poll(&mut cx) {
                Poll::Ready(result) => return result,
                Poll::Pending => {
                    panic!("Mock future returned Pending unexpectedly");
                }
            }
        }
    }

    fn request() -> OutboundRequest {
        build_request(&SensorSnapshot::empty(), &TARGET).unwrap()
    }

    fn run(conn: &mut Connection, transport: &mut MockTransport) -> CloseReason {
        block_on(run_send_cycle(conn, transport, &TARGET, request())).unwrap()
    }

    #[test]
    fn test_full_cycle_success() {
        let mut conn = Connection::new();
        let mut transport = MockTransport::happy();
        let request_len = request().len();

        let reason = run(&mut conn, &mut transport);

        assert_eq!(reason, CloseReason::Success);
        assert_eq!(
            transport.calls,
            vec![
                Call::Resolve,
                Call::Connect(ADDR, 8000),
                Call::Write(request_len),
                Call::Recv,
                Call::Recv,
                Call::Close,
            ]
        );
        assert!(conn.is_terminal());
        assert!(!conn.request_pending());
    }

    #[test]
    fn test_resolve_failure_never_touches_the_endpoint() {
        let mut conn = Connection::new();
        let mut transport = MockTransport {
            resolve_result: Err(StageError::Failed),
            ..MockTransport::happy()
        };

        let reason = run(&mut conn, &mut transport);

        assert_eq!(reason, CloseReason::Error(ErrorKind::Resolve));
        assert_eq!(transport.calls, vec![Call::Resolve]);
        assert!(!conn.request_pending());
    }

    #[test]
    fn test_connect_failure_aborts() {
        let mut conn = Connection::new();
        let mut transport = MockTransport {
            connect_result: Err(StageError::Failed),
            ..MockTransport::happy()
        };

        let reason = run(&mut conn, &mut transport);

        assert_eq!(reason, CloseReason::Error(ErrorKind::Connect));
        assert_eq!(
            transport.calls,
            vec![Call::Resolve, Call::Connect(ADDR, 8000), Call::Abort]
        );
        assert!(!conn.request_pending());
    }

    #[test]
    fn test_write_failure_aborts() {
        let mut conn = Connection::new();
        let mut transport = MockTransport {
            write_result: Err(StageError::Failed),
            ..MockTransport::happy()
        };

        let reason = run(&mut conn, &mut transport);

        assert_eq!(reason, CloseReason::Error(ErrorKind::Write));
        assert_eq!(*transport.calls.last().unwrap(), Call::Abort);
        assert!(!conn.request_pending());
    }

    #[test]
    fn test_receive_error_aborts_as_transport_failure() {
        let mut conn = Connection::new();
        let mut transport = MockTransport {
            recv_results: vec![Err(StageError::Failed)],
            ..MockTransport::happy()
        };

        let reason = run(&mut conn, &mut transport);

        assert_eq!(reason, CloseReason::Error(ErrorKind::Transport));
        assert_eq!(*transport.calls.last().unwrap(), Call::Abort);
        assert!(!conn.request_pending());
    }

    #[test]
    fn test_stage_timeout_surfaces_as_timeout() {
        let mut conn = Connection::new();
        let mut transport = MockTransport {
            connect_result: Err(StageError::TimedOut),
            ..MockTransport::happy()
        };

        let reason = run(&mut conn, &mut transport);
        assert_eq!(reason, CloseReason::Error(ErrorKind::Timeout));
    }

    #[test]
    fn test_busy_machine_rejects_a_second_cycle() {
        let mut conn = Connection::new();
        conn.begin(request()).unwrap();

        let mut transport = MockTransport::happy();
        let result = block_on(run_send_cycle(&mut conn, &mut transport, &TARGET, request()));

        assert_eq!(result, Err(SendError::Busy));
        assert!(transport.calls.is_empty());
    }

    #[test]
    fn test_machine_reusable_across_cycles() {
        let mut conn = Connection::new();

        let mut transport = MockTransport {
            resolve_result: Err(StageError::Failed),
            ..MockTransport::happy()
        };
        assert_eq!(
            run(&mut conn, &mut transport),
            CloseReason::Error(ErrorKind::Resolve)
        );

        let mut transport = MockTransport::happy();
        assert_eq!(run(&mut conn, &mut transport), CloseReason::Success);
    }

    #[test]
    fn test_temperature_read_error_still_posts() {
        // A failed sensor read is payload content, not a network failure.
        let snapshot = SensorSnapshot {
            temperature: TempReading::ReadError,
            ..SensorSnapshot::empty()
        };
        let request = build_request(&snapshot, &TARGET).unwrap();

        let mut conn = Connection::new();
        let mut transport = MockTransport::happy();
        let reason =
            block_on(run_send_cycle(&mut conn, &mut transport, &TARGET, request)).unwrap();

        assert_eq!(reason, CloseReason::Success);
    }
}
