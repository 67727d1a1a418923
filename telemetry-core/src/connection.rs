//! Connection state machine for one outbound send attempt.
//!
//! One attempt walks `Idle -> Resolving -> Connecting -> Sending ->
//! AwaitingClose -> Closed`, advanced by [`Connection::dispatch`] with the
//! completion [`Event`]s the transport reports. Each dispatch returns the
//! next [`Action`] the transport should perform, so the machine itself never
//! touches the network and can be driven step by step in tests.
//!
//! The machine owns the [`OutboundRequest`] for the duration of the attempt.
//! The buffer is dropped exactly once: as soon as the write is accepted (the
//! transport keeps its own copy of the bytes) or on whichever terminal
//! transition comes first, including the asynchronous transport-error path.
//!
//! At most one attempt is in flight per machine; [`Connection::begin`] while
//! a prior attempt is still non-terminal is rejected with
//! [`SendError::Busy`].

use core::net::Ipv4Addr;

use telemetry_proto::OutboundRequest;

/// How a single transport stage ended, when it did not succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StageError {
    /// The stage failed outright (refused, unreachable, reset, ...).
    Failed,
    /// The stage exceeded its deadline.
    TimedOut,
}

/// Which part of the exchange terminated the attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorKind {
    /// Hostname resolution failed.
    Resolve,
    /// The TCP connect was refused or failed.
    Connect,
    /// The request write was not accepted.
    Write,
    /// The transport reported an asynchronous failure after connect.
    Transport,
    /// A stage exceeded its deadline.
    Timeout,
}

/// Terminal outcome of a send attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CloseReason {
    /// The request went out and the peer closed the exchange.
    Success,
    /// The attempt was aborted at some stage.
    Error(ErrorKind),
}

/// Lifecycle state of the outbound connection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// No attempt started yet.
    #[default]
    Idle,
    /// Hostname resolution is in flight.
    Resolving,
    /// Endpoint allocated; connect and the initial write are in flight.
    Connecting,
    /// The request was handed to the transport; acks may trickle in.
    Sending,
    /// Everything sent; waiting for the peer to respond and close.
    AwaitingClose,
    /// Terminal. No further event touches the attempt's resources.
    Closed(CloseReason),
}

/// Error returned when a send attempt cannot start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SendError {
    /// A previous attempt has not reached a terminal state yet.
    Busy,
}

/// Completion delivered by the transport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// Hostname resolution finished.
    Resolved(Result<Ipv4Addr, StageError>),
    /// The connect attempt finished.
    Connected(Result<(), StageError>),
    /// The non-blocking write of the whole request was (not) accepted.
    /// On success the transport holds its own copy of the bytes.
    WriteFinished(Result<(), StageError>),
    /// The peer acknowledged `n` more bytes. Informational.
    Sent(usize),
    /// `n` bytes of response data arrived (already logged and acknowledged
    /// to the transport's flow control by the caller).
    Received(usize),
    /// The peer closed the connection.
    PeerClosed,
    /// Asynchronous transport failure; may arrive in any active state.
    TransportFailed(StageError),
}

/// Next operation the transport should perform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Resolve the configured host.
    Resolve,
    /// Allocate an endpoint and connect to `addr` on the configured port.
    Connect(Ipv4Addr),
    /// Write the whole request (copy semantics) and flush.
    Write,
    /// Wait for response data or peer close.
    Recv,
    /// Close the endpoint gracefully.
    Close,
    /// Tear the endpoint down abruptly.
    Abort,
    /// Nothing to do.
    None,
}

/// One outbound send attempt: state, the owned request, and the endpoint
/// bookkeeping needed to pick between graceful close and abort.
#[derive(Debug, Default)]
pub struct Connection {
    state: State,
    request: Option<OutboundRequest>,
    request_len: usize,
    acked: usize,
    connected: bool,
    endpoint_open: bool,
}

impl Connection {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: State::Idle,
            request: None,
            request_len: 0,
            acked: 0,
            connected: false,
            endpoint_open: false,
        }
    }

    /// Start a new attempt, taking ownership of the rendered request.
    ///
    /// The machine moves to `Resolving` and the returned action asks the
    /// transport to resolve the target host.
    ///
    /// # Errors
    ///
    /// Returns [`SendError::Busy`] if a previous attempt is still in flight;
    /// the offered request is dropped, never queued.
    pub fn begin(&mut self, request: OutboundRequest) -> Result<Action, SendError> {
        if !matches!(self.state, State::Idle | State::Closed(_)) {
            return Err(SendError::Busy);
        }
        self.request_len = request.len();
        self.request = Some(request);
        self.acked = 0;
        self.connected = false;
        self.endpoint_open = false;
        self.state = State::Resolving;
        Ok(Action::Resolve)
    }

    /// Advance the machine with a transport completion.
    ///
    /// Events that do not apply to the current state (stale callbacks after
    /// a terminal transition, acks before a write) are ignored.
    pub fn dispatch(&mut self, event: Event) -> Action {
        match (self.state, event) {
            (State::Resolving, Event::Resolved(Ok(addr))) => {
                // The transport allocates the endpoint to execute this.
                self.endpoint_open = true;
                self.state = State::Connecting;
                Action::Connect(addr)
            }
            (State::Resolving, Event::Resolved(Err(cause))) => {
                self.fail(ErrorKind::Resolve, cause)
            }

            (State::Connecting, Event::Connected(Ok(()))) => {
                self.connected = true;
                Action::Write
            }
            (State::Connecting, Event::Connected(Err(cause))) => {
                self.fail(ErrorKind::Connect, cause)
            }
            (State::Connecting, Event::WriteFinished(Ok(()))) => {
                // The transport holds its own copy of the bytes now.
                self.release_request();
                self.state = State::Sending;
                Action::Recv
            }
            (State::Connecting, Event::WriteFinished(Err(cause))) => {
                self.fail(ErrorKind::Write, cause)
            }

            (State::Sending, Event::Sent(n)) => {
                self.acked = self.acked.saturating_add(n);
                if self.acked >= self.request_len {
                    self.state = State::AwaitingClose;
                }
                Action::Recv
            }
            (State::Sending, Event::Received(_)) => {
                // The peer is answering, so the request made it across.
                self.state = State::AwaitingClose;
                Action::Recv
            }
            (State::AwaitingClose, Event::Sent(_) | Event::Received(_)) => Action::Recv,

            (
                State::Connecting | State::Sending | State::AwaitingClose,
                Event::PeerClosed,
            ) => {
                self.release_request();
                self.connected = false;
                self.endpoint_open = false;
                self.state = State::Closed(CloseReason::Success);
                Action::Close
            }

            (
                State::Resolving | State::Connecting | State::Sending | State::AwaitingClose,
                Event::TransportFailed(cause),
            ) => self.fail(ErrorKind::Transport, cause),

            _ => Action::None,
        }
    }

    /// Current lifecycle state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> State {
        self.state
    }

    /// The terminal outcome, once the attempt has one.
    #[inline]
    #[must_use]
    pub fn close_reason(&self) -> Option<CloseReason> {
        match self.state {
            State::Closed(reason) => Some(reason),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self.state, State::Closed(_))
    }

    /// Bytes of the owned request, empty once released.
    #[inline]
    #[must_use]
    pub fn request_bytes(&self) -> &[u8] {
        self.request.as_ref().map_or(&[], OutboundRequest::as_bytes)
    }

    /// Whether the machine still owns the request buffer.
    #[inline]
    #[must_use]
    pub fn request_pending(&self) -> bool {
        self.request.is_some()
    }

    #[inline]
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Terminal error transition shared by every failing stage.
    ///
    /// Releases the owned request on all paths, the asynchronous
    /// transport-error one included.
    fn fail(&mut self, kind: ErrorKind, cause: StageError) -> Action {
        self.release_request();
        self.connected = false;
        let kind = match cause {
            StageError::TimedOut => ErrorKind::Timeout,
            StageError::Failed => kind,
        };
        self.state = State::Closed(CloseReason::Error(kind));
        if self.endpoint_open {
            self.endpoint_open = false;
            Action::Abort
        } else {
            Action::None
        }
    }

    /// Drop the owned request. Taking the `Option` makes a second release a
    /// no-op, so the buffer cannot be freed twice.
    fn release_request(&mut self) {
        self.request = None;
    }
}
