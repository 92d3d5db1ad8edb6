use std::io::{self, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use crate::error::{Error, Result};
use crate::protocol::DEFAULT_PORT;

/// Opens transport streams to one device.
pub trait Connector {
    type Stream: Read + Write;

    fn connect(&mut self) -> Result<Self::Stream>;

    /// Human readable peer address, used in errors and logs.
    fn address(&self) -> &str;
}

/// Plain TCP, blocking, with the same timeout on connect, read and write.
pub struct TcpConnector {
    host: String,
    port: u16,
    timeout: Duration,
    address: String,
}

impl TcpConnector {
    pub fn new(host: &str, timeout: Duration) -> TcpConnector {
        return TcpConnector::with_port(host, DEFAULT_PORT, timeout);
    }

    /// The controllers always listen on 5577, other ports are only useful
    /// for talking to a stand-in on the local machine.
    pub fn with_port(host: &str, port: u16, timeout: Duration) -> TcpConnector {
        return TcpConnector {
            host: host.to_string(),
            port,
            timeout,
            address: format!("{}:{}", host, port),
        };
    }

    fn connect_any(&self) -> io::Result<TcpStream> {
        let mut last_err = None;
        for addr in (self.host.as_str(), self.port).to_socket_addrs()? {
            match TcpStream::connect_timeout(&addr, self.timeout) {
                Ok(stream) => return Ok(stream),
                Err(e) => last_err = Some(e),
            }
        }
        return Err(last_err.unwrap_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "host resolved to no addresses")
        }));
    }
}

impl Connector for TcpConnector {
    type Stream = TcpStream;

    fn connect(&mut self) -> Result<TcpStream> {
        let stream = self
            .connect_any()
            .map_err(|e| Error::connect(&self.address, e))?;
        // A stream that fails configuration is dropped, and thereby closed, here.
        stream
            .set_read_timeout(Some(self.timeout))
            .and_then(|_| stream.set_write_timeout(Some(self.timeout)))
            .and_then(|_| stream.set_nodelay(true))
            .map_err(|e| Error::connect(&self.address, e))?;
        return Ok(stream);
    }

    fn address(&self) -> &str {
        &self.address
    }
}

pub(crate) fn is_stale(idle: Duration, stale_after: Duration) -> bool {
    idle >= stale_after
}

/// The single session a client holds to its device.
///
/// The stream is either open or absent. Every path that needs a fresh
/// session, whether because the last one was closed or because it sat idle
/// for too long, goes through `reopen`.
pub struct Connection<C: Connector> {
    connector: C,
    stream: Option<C::Stream>,
    last_activity: Instant,
    stale_after: Duration,
}

impl<C: Connector> Connection<C> {
    /// Connects right away; on failure nothing stays open.
    pub fn open(mut connector: C, stale_after: Duration) -> Result<Connection<C>> {
        let stream = connector.connect()?;
        debug!("connected to {}", connector.address());
        return Ok(Connection {
            connector,
            stream: Some(stream),
            last_activity: Instant::now(),
            stale_after,
        });
    }

    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    pub fn address(&self) -> &str {
        self.connector.address()
    }

    /// Time since the session was opened or last carried data.
    pub fn idle_time(&self) -> Duration {
        self.last_activity.elapsed()
    }

    pub fn is_stale(&self) -> bool {
        is_stale(self.idle_time(), self.stale_after)
    }

    pub fn reopen(&mut self) -> Result<()> {
        self.close();
        let stream = self.connector.connect()?;
        debug!("reconnected to {}", self.connector.address());
        self.stream = Some(stream);
        self.last_activity = Instant::now();
        return Ok(());
    }

    pub fn close(&mut self) {
        if self.stream.take().is_some() {
            debug!("closed connection to {}", self.connector.address());
        }
    }

    fn ensure_fresh(&mut self) -> Result<()> {
        if self.stream.is_none() {
            return self.reopen();
        }
        if self.is_stale() {
            info!(
                "connection to {} idle for {:?}, reconnecting",
                self.connector.address(),
                self.idle_time()
            );
            return self.reopen();
        }
        return Ok(());
    }

    /// Writes the whole frame, reopening the session first if needed.
    /// Any failure leaves the connection closed.
    pub fn send(&mut self, frame: &[u8]) -> Result<()> {
        self.ensure_fresh()?;
        debug!("sending {:02x?} to {}", frame, self.connector.address());
        let result = match self.stream.as_mut() {
            Some(stream) => stream.write_all(frame).and_then(|_| stream.flush()),
            None => Err(io::Error::from(io::ErrorKind::NotConnected)),
        };
        return self.settle("send", result);
    }

    /// Reads once into `buf` from the current session. A peer that closed
    /// the session counts as a failure.
    pub fn receive(&mut self, buf: &mut [u8]) -> Result<usize> {
        let result = match self.stream.as_mut() {
            Some(stream) => stream.read(buf).and_then(|n| match n {
                0 => Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "device closed the connection",
                )),
                n => Ok(n),
            }),
            None => Err(io::Error::from(io::ErrorKind::NotConnected)),
        };
        return self.settle("receive", result);
    }

    fn settle<T>(&mut self, op: &'static str, result: io::Result<T>) -> Result<T> {
        match result {
            Ok(value) => {
                self.last_activity = Instant::now();
                Ok(value)
            }
            Err(e) => {
                warn!("{} to {} failed, closing connection: {}", op, self.connector.address(), e);
                self.close();
                Err(Error::transmission(op, e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staleness_threshold_is_inclusive() {
        let threshold = Duration::from_secs(290);
        assert!(!is_stale(Duration::from_secs(289), threshold));
        assert!(!is_stale(Duration::from_millis(289_999), threshold));
        assert!(is_stale(Duration::from_secs(290), threshold));
        assert!(is_stale(Duration::from_secs(301), threshold));
    }

    #[test]
    fn tcp_connector_uses_the_controller_port() {
        let connector = TcpConnector::new("192.168.1.40", Duration::from_secs(3));
        assert_eq!(connector.address(), "192.168.1.40:5577");
    }
}
