use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: Server,
    pub database: Database,
    pub cors: Cors,
    pub logging: Logging,
}

/// Where the HTTP server listens.
#[derive(Debug, Clone, Deserialize)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

/// Location of the SQLite file backing the catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct Database {
    /// Created on first run if it does not exist.
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Cors {
    /// The single origin allowed to call the API from a browser.
    pub allowed_origin: String,
}

/// Rolling file log output. Console logging is always on.
#[derive(Debug, Clone, Deserialize)]
pub struct Logging {
    pub directory: PathBuf,
    pub file_prefix: String,
}

impl Server {
    /// Resolves `host:port` into a bindable address.
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}
