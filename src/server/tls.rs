//! rustls server context built from PEM files

use crate::error::{ConfigError, ConnectionError};
use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use rustls::{ServerConfig, ServerConnection, StreamOwned};
use std::fs::File;
use std::io::BufReader;
use std::net::TcpStream;
use std::path::Path;
use std::sync::Arc;

/// A TLS stream over an accepted TCP connection
pub type TlsStream = StreamOwned<ServerConnection, TcpStream>;

/// Shared server-side TLS context; cheap to clone
#[derive(Clone)]
pub struct TlsAcceptor {
    config: Arc<ServerConfig>,
}

impl TlsAcceptor {
    /// Load a certificate chain and private key from PEM files
    pub fn from_pem_files(cert_path: &Path, key_path: &Path) -> Result<Self, ConfigError> {
        let certs = load_certs(cert_path)?;
        let key = load_key(key_path)?;

        let provider = Arc::new(rustls::crypto::ring::default_provider());
        let config = ServerConfig::builder_with_provider(provider)
            .with_safe_default_protocol_versions()
            .map_err(|e| ConfigError::Tls(e.to_string()))?
            .with_no_client_auth()
            .with_single_cert(certs, key)
            .map_err(|e| ConfigError::Tls(format!("invalid certificate or key: {}", e)))?;

        Ok(Self {
            config: Arc::new(config),
        })
    }

    /// Run the server handshake on `stream`, blocking only the caller
    pub fn accept(&self, stream: TcpStream) -> Result<TlsStream, ConnectionError> {
        let conn = ServerConnection::new(Arc::clone(&self.config))
            .map_err(|e| ConnectionError::Handshake(e.to_string()))?;

        let mut tls = StreamOwned::new(conn, stream);
        while tls.conn.is_handshaking() {
            tls.conn
                .complete_io(&mut tls.sock)
                .map_err(|e| ConnectionError::Handshake(e.to_string()))?;
        }

        Ok(tls)
    }
}

fn open_pem(path: &Path) -> Result<BufReader<File>, ConfigError> {
    match File::open(path) {
        Ok(file) => Ok(BufReader::new(file)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(ConfigError::MissingTlsMaterial(path.to_path_buf()))
        }
        Err(source) => Err(ConfigError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn load_certs(path: &Path) -> Result<Vec<CertificateDer<'static>>, ConfigError> {
    let mut reader = open_pem(path)?;
    let certs = rustls_pemfile::certs(&mut reader)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    if certs.is_empty() {
        return Err(ConfigError::Tls(format!(
            "no certificates found in {}",
            path.display()
        )));
    }
    Ok(certs)
}

fn load_key(path: &Path) -> Result<PrivateKeyDer<'static>, ConfigError> {
    let mut reader = open_pem(path)?;
    rustls_pemfile::private_key(&mut reader)
        .map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?
        .ok_or_else(|| ConfigError::Tls(format!("no private key found in {}", path.display())))
}
