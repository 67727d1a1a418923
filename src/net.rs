//! Network transport over embassy-net.
//!
//! [`StackTransport`] implements the [`Transport`] seam on top of the Pico
//! W's TCP/IP stack: DNS resolution through the stack's resolver, one
//! `TcpSocket` per send cycle, and a fixed deadline on every stage. One
//! instance drives exactly one cycle; the poster creates a fresh one per
//! post with stack-local socket buffers.

use core::net::Ipv4Addr;

use defmt::{info, warn};
use embassy_net::dns::DnsQueryType;
use embassy_net::tcp::TcpSocket;
use embassy_net::{IpAddress, IpEndpoint, Stack};
use embassy_time::with_timeout;
use embedded_io_async::Write;
use telemetry_core::{StageError, Transport};

use crate::config::STAGE_TIMEOUT;

/// Largest response chunk read (and logged) in one receive step.
const RESPONSE_CHUNK: usize = 512;

/// One-shot TCP transport over an [`embassy_net::Stack`].
pub struct StackTransport<'a> {
    stack: Stack<'a>,
    rx_buffer: Option<&'a mut [u8]>,
    tx_buffer: Option<&'a mut [u8]>,
    socket: Option<TcpSocket<'a>>,
}

impl<'a> StackTransport<'a> {
    /// Create a transport for one send cycle.
    ///
    /// `rx_buffer`/`tx_buffer` back the socket created at the connect
    /// stage; they must outlive the cycle.
    #[must_use]
    pub fn new(stack: Stack<'a>, rx_buffer: &'a mut [u8], tx_buffer: &'a mut [u8]) -> Self {
        Self {
            stack,
            rx_buffer: Some(rx_buffer),
            tx_buffer: Some(tx_buffer),
            socket: None,
        }
    }
}

impl Transport for StackTransport<'_> {
    async fn resolve(&mut self, host: &str) -> Result<Ipv4Addr, StageError> {
        let answers = match with_timeout(STAGE_TIMEOUT, self.stack.dns_query(host, DnsQueryType::A))
            .await
        {
            Ok(Ok(answers)) => answers,
            Ok(Err(err)) => {
                warn!("dns lookup for {=str} failed: {:?}", host, err);
                return Err(StageError::Failed);
            }
            Err(_) => return Err(StageError::TimedOut),
        };
        match answers.first() {
            Some(IpAddress::Ipv4(addr)) => Ok(*addr),
            _ => {
                warn!("dns lookup for {=str} returned no A record", host);
                Err(StageError::Failed)
            }
        }
    }

    async fn connect(&mut self, addr: Ipv4Addr, port: u16) -> Result<(), StageError> {
        let (rx, tx) = match (self.rx_buffer.take(), self.tx_buffer.take()) {
            (Some(rx), Some(tx)) => (rx, tx),
            // The endpoint is allocated at most once per cycle.
            _ => return Err(StageError::Failed),
        };
        let mut socket = TcpSocket::new(self.stack, rx, tx);
        let endpoint = IpEndpoint::new(IpAddress::Ipv4(addr), port);
        match with_timeout(STAGE_TIMEOUT, socket.connect(endpoint)).await {
            Ok(Ok(())) => {
                self.socket = Some(socket);
                Ok(())
            }
            Ok(Err(err)) => {
                warn!("connect to {} failed: {:?}", endpoint, err);
                Err(StageError::Failed)
            }
            Err(_) => Err(StageError::TimedOut),
        }
    }

    async fn write(&mut self, data: &[u8]) -> Result<(), StageError> {
        let Some(socket) = self.socket.as_mut() else {
            return Err(StageError::Failed);
        };
        // The socket buffers the bytes, so the caller's copy is free to go
        // once this returns.
        let exchange = async {
            socket.write_all(data).await?;
            socket.flush().await
        };
        match with_timeout(STAGE_TIMEOUT, exchange).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => {
                warn!("write failed: {:?}", err);
                Err(StageError::Failed)
            }
            Err(_) => Err(StageError::TimedOut),
        }
    }

    async fn recv(&mut self) -> Result<usize, StageError> {
        let Some(socket) = self.socket.as_mut() else {
            return Err(StageError::Failed);
        };
        let mut buf = [0u8; RESPONSE_CHUNK];
        match with_timeout(STAGE_TIMEOUT, socket.read(&mut buf)).await {
            Ok(Ok(0)) => Ok(0),
            Ok(Ok(n)) => {
                info!("response: {=[u8]:a}", &buf[..n]);
                Ok(n)
            }
            Ok(Err(err)) => {
                warn!("receive failed: {:?}", err);
                Err(StageError::Failed)
            }
            Err(_) => Err(StageError::TimedOut),
        }
    }

    async fn close(&mut self) {
        if let Some(socket) = self.socket.as_mut() {
            socket.close();
            // Push the FIN out before the socket is dropped.
            let _ = with_timeout(STAGE_TIMEOUT, socket.flush()).await;
        }
        self.socket = None;
    }

    fn abort(&mut self) {
        if let Some(socket) = self.socket.as_mut() {
            socket.abort();
        }
        self.socket = None;
    }
}
