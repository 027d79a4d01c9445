use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{Cors, Database, Logging, Server, Settings};

/// The optional file that overrides the built-in defaults.
pub const CONFIG_FILE: &str = "library.toml";

/// Loads the application configuration.
///
/// Built-in defaults are used unless a `library.toml` file is present in the
/// working directory, in which case any keys it sets take precedence.
pub fn load_config() -> Result<Settings, ConfigError> {
    load(config::File::with_name(CONFIG_FILE).required(false))
}

/// Loads the configuration from a specific TOML file on top of the defaults.
/// Unlike `load_config`, the file must exist.
pub fn load_config_from(path: &Path) -> Result<Settings, ConfigError> {
    load(config::File::from(path).required(true))
}

fn load<S>(source: S) -> Result<Settings, ConfigError>
where
    S: config::Source + Send + Sync + 'static,
{
    let builder = config::Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 3000)?
        .set_default("database.path", "./books.db")?
        .set_default("cors.allowed_origin", "http://localhost:5173")?
        .set_default("logging.directory", "app_logs")?
        .set_default("logging.file_prefix", "library.log")?
        .add_source(source)
        .build()?;

    // Attempt to deserialize the entire configuration into our `Settings` struct
    let settings = builder.try_deserialize::<Settings>()?;
    validate(&settings)?;

    Ok(settings)
}

fn validate(settings: &Settings) -> Result<(), ConfigError> {
    if settings.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port must be non-zero".to_string(),
        ));
    }
    if settings.server.socket_addr().is_err() {
        return Err(ConfigError::ValidationError(format!(
            "server.host '{}' is not a valid IP address",
            settings.server.host
        )));
    }
    // Sent verbatim as a header value, so only visible ASCII is allowed.
    let origin = settings.cors.allowed_origin.as_str();
    if origin.is_empty() || origin == "*" || !origin.bytes().all(|b| b.is_ascii_graphic()) {
        return Err(ConfigError::ValidationError(format!(
            "cors.allowed_origin '{}' must be a single origin",
            settings.cors.allowed_origin
        )));
    }
    Ok(())
}
