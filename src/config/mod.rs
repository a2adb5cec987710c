// Configuration module entry point
// Layered settings (defaults, optional TOML file, environment) and shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

pub use state::AppState;
pub use types::{Config, PathsConfig};

/// Config file looked up in the working directory (extension optional)
pub const DEFAULT_CONFIG_FILE: &str = "slideshow";

impl Config {
    /// Load configuration from the default file, the environment and `PORT`
    pub fn load() -> Result<Self, config::ConfigError> {
        let port = std::env::var("PORT").ok();
        Self::load_with(DEFAULT_CONFIG_FILE, port.as_deref())
    }

    /// Load configuration from the given file path with an explicit `PORT` value.
    ///
    /// An unset or empty `PORT` leaves `server.port` to the lower layers.
    pub fn load_with(config_path: &str, port_env: Option<&str>) -> Result<Self, config::ConfigError> {
        let port = parse_port_override(port_env)?;

        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("SLIDESHOW")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("paths.static_dir", "./static")?
            .set_default("paths.images_dir", "./images")?
            .set_default("paths.slides_file", "slides.json")?
            .set_default("logging.access_log", false)?
            .set_default("logging.access_log_format", "combined")?
            .set_override_option("server.port", port.map(i64::from))?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

fn parse_port_override(value: Option<&str>) -> Result<Option<u16>, config::ConfigError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse::<u16>()
            .map(Some)
            .map_err(|e| config::ConfigError::Message(format!("invalid PORT value '{raw}': {e}"))),
    }
}
