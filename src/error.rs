use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures reported by the client.
///
/// Out-of-range channel, preset or speed values are never reported here,
/// they are clamped before framing.
#[derive(Error, Debug)]
pub enum Error {
    /// The TCP session could not be established, either on construction
    /// or while reopening a closed or stale connection.
    #[error("could not connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },

    /// Sending or receiving failed on a connection that was open.
    #[error("{op} failed: {source}")]
    Transmission {
        op: &'static str,
        #[source]
        source: io::Error,
    },

    /// A connect, send or receive ran into the configured timeout.
    #[error("{op} timed out")]
    Timeout { op: &'static str },
}

impl Error {
    pub(crate) fn connect(addr: &str, source: io::Error) -> Error {
        if is_timeout(&source) {
            return Error::Timeout { op: "connect" };
        }
        return Error::Connect {
            addr: addr.to_string(),
            source,
        };
    }

    pub(crate) fn transmission(op: &'static str, source: io::Error) -> Error {
        if is_timeout(&source) {
            return Error::Timeout { op };
        }
        return Error::Transmission { op, source };
    }

    pub fn is_connect(&self) -> bool {
        matches!(self, Error::Connect { .. })
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout { .. })
    }
}

// Socket timeouts come back as `WouldBlock` on unix and `TimedOut` on windows.
fn is_timeout(err: &io::Error) -> bool {
    matches!(err.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeouts_are_reported_separately() {
        let err = Error::transmission("send", io::Error::from(io::ErrorKind::WouldBlock));
        assert!(err.is_timeout());
        assert_eq!(err.to_string(), "send timed out");

        let err = Error::connect("10.0.0.2:5577", io::Error::from(io::ErrorKind::TimedOut));
        assert!(matches!(err, Error::Timeout { op: "connect" }));
    }

    #[test]
    fn connect_error_names_the_address() {
        let err = Error::connect(
            "10.0.0.2:5577",
            io::Error::from(io::ErrorKind::ConnectionRefused),
        );
        assert!(err.is_connect());
        assert!(err.to_string().starts_with("could not connect to 10.0.0.2:5577"));
    }

    #[test]
    fn broken_pipe_is_a_transmission_error() {
        let err = Error::transmission("send", io::Error::from(io::ErrorKind::BrokenPipe));
        assert!(matches!(err, Error::Transmission { op: "send", .. }));
    }
}
