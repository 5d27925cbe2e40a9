//! Plain or TLS-wrapped client streams

use crate::config::Settings;
use crate::error::{ConfigError, ConnectionError};
use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream};
use std::time::Duration;

#[cfg(feature = "tls")]
use super::tls::{TlsAcceptor, TlsStream};

/// How long a closing connection waits for the peer to finish sending
const LINGER_TIMEOUT: Duration = Duration::from_millis(200);

/// Most bytes discarded while lingering
const LINGER_DRAIN_LIMIT: usize = 64 * 1024;

/// One accepted client stream, after any TLS handshake
pub enum Transport {
    Plain(TcpStream),
    #[cfg(feature = "tls")]
    Tls(Box<TlsStream>),
}

impl Transport {
    /// Flush, send FIN (after a close_notify for TLS) and linger briefly
    ///
    /// Closing a socket with unread input makes the kernel answer with a
    /// reset, which can destroy the response before the peer reads it, so
    /// leftover bytes past the first frame are drained first.
    pub fn close(mut self) -> io::Result<()> {
        let sock = match &mut self {
            Transport::Plain(stream) => {
                stream.flush()?;
                stream
            }
            #[cfg(feature = "tls")]
            Transport::Tls(tls) => {
                tls.conn.send_close_notify();
                tls.flush()?;
                &mut tls.sock
            }
        };

        sock.shutdown(Shutdown::Write)?;
        sock.set_read_timeout(Some(LINGER_TIMEOUT))?;

        let mut scratch = [0u8; 4096];
        let mut drained = 0;
        while drained < LINGER_DRAIN_LIMIT {
            match sock.read(&mut scratch) {
                Ok(0) | Err(_) => break,
                Ok(n) => drained += n,
            }
        }
        Ok(())
    }
}

impl Read for Transport {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Transport::Plain(stream) => stream.read(buf),
            #[cfg(feature = "tls")]
            Transport::Tls(tls) => tls.read(buf),
        }
    }
}

impl Write for Transport {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Transport::Plain(stream) => stream.write(buf),
            #[cfg(feature = "tls")]
            Transport::Tls(tls) => tls.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Transport::Plain(stream) => stream.flush(),
            #[cfg(feature = "tls")]
            Transport::Tls(tls) => tls.flush(),
        }
    }
}

/// Wraps freshly accepted sockets according to the TLS setting
#[derive(Clone, Default)]
pub struct Acceptor {
    #[cfg(feature = "tls")]
    tls: Option<TlsAcceptor>,
}

impl Acceptor {
    /// Accept plain TCP only
    pub fn plain() -> Self {
        Self::default()
    }

    /// Build from settings, loading TLS material when enabled
    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        if !settings.tls_enabled {
            return Ok(Self::plain());
        }

        #[cfg(feature = "tls")]
        {
            let tls = TlsAcceptor::from_pem_files(&settings.cert_path, &settings.key_path)?;
            Ok(Self { tls: Some(tls) })
        }

        #[cfg(not(feature = "tls"))]
        {
            Err(ConfigError::Invalid(
                "TLS enabled but exactline was built without the `tls` feature".to_string(),
            ))
        }
    }

    pub fn is_tls(&self) -> bool {
        #[cfg(feature = "tls")]
        {
            self.tls.is_some()
        }
        #[cfg(not(feature = "tls"))]
        {
            false
        }
    }

    /// Turn an accepted socket into a [`Transport`], handshaking if needed
    pub fn wrap(&self, stream: TcpStream) -> Result<Transport, ConnectionError> {
        #[cfg(feature = "tls")]
        if let Some(tls) = &self.tls {
            return Ok(Transport::Tls(Box::new(tls.accept(stream)?)));
        }

        Ok(Transport::Plain(stream))
    }
}
