// Configuration module entry point
// Loads the immutable startup configuration and builds the shared state

mod state;
mod types;

use std::net::SocketAddr;

use crate::cli::Cli;

// Re-export public types
pub use state::AppState;
pub use types::Config;

/// 64 KiB
pub const DEFAULT_MAX_FORM_SIZE: u64 = 64 * 1024;
pub const DEFAULT_PORT: u16 = 8222;
pub const DEFAULT_STORAGE_PATH: &str = "/tmp";

impl Config {
    /// Load configuration: defaults, then optional file, then `FILESTORE_*`
    /// environment variables, then command-line flags.
    pub fn load(cli: &Cli) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", DEFAULT_PORT)?
            .set_default("storage.path", DEFAULT_STORAGE_PATH)?
            .set_default("storage.max_form_size", DEFAULT_MAX_FORM_SIZE)?
            .set_default("logging.debug", false)?
            .set_default("logging.access_log", false)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "rust_filestore")?;

        if let Some(path) = cli.config.as_deref() {
            builder = builder.add_source(config::File::with_name(path).required(true));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix("FILESTORE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("server.host", cli.host.clone())?
            .set_override_option("server.port", cli.port)?
            .set_override_option("storage.path", cli.path.clone())?
            .set_override_option("storage.max_form_size", cli.max)?
            .set_override_option("logging.debug", cli.debug.then_some(true))?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        let host = if self.server.host.contains(':') {
            format!("[{}]", self.server.host)
        } else {
            self.server.host.clone()
        };
        format!("{host}:{}", self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_defaults() {
        let cfg = Config::load(&Cli::parse_from(["rust_filestore"])).unwrap();
        assert_eq!(cfg.server.port, DEFAULT_PORT);
        assert_eq!(cfg.storage.path, DEFAULT_STORAGE_PATH);
        assert_eq!(cfg.storage.max_form_size, 65536);
        assert!(!cfg.logging.debug);
        assert_eq!(cfg.logging.access_log_format, "combined");
        assert!(cfg.performance.max_connections.is_none());
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::parse_from([
            "rust_filestore",
            "--port",
            "9100",
            "--max",
            "10",
            "--path",
            "/var/tmp",
            "--debug",
        ]);
        let cfg = Config::load(&cli).unwrap();
        assert_eq!(cfg.server.port, 9100);
        assert_eq!(cfg.storage.max_form_size, 10);
        assert_eq!(cfg.storage.path, "/var/tmp");
        assert!(cfg.logging.debug);
    }

    #[test]
    fn test_config_file_source() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("filestore.toml");
        std::fs::write(
            &file,
            "[storage]\nmax_form_size = 128\n\n[logging]\naccess_log = true\n",
        )
        .unwrap();

        let cli = Cli {
            config: Some(file.to_string_lossy().into_owned()),
            port: Some(9200),
            ..Cli::default()
        };
        let cfg = Config::load(&cli).unwrap();
        assert_eq!(cfg.storage.max_form_size, 128);
        assert!(cfg.logging.access_log);
        assert_eq!(cfg.server.port, 9200);
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let cli = Cli {
            config: Some("/nonexistent/filestore".to_string()),
            ..Cli::default()
        };
        assert!(Config::load(&cli).is_err());
    }

    #[test]
    fn test_socket_addr() {
        let mut cfg = Config::load(&Cli::parse_from(["rust_filestore"])).unwrap();
        assert_eq!(cfg.get_socket_addr().unwrap().port(), DEFAULT_PORT);

        cfg.server.host = "::1".to_string();
        assert!(cfg.get_socket_addr().unwrap().is_ipv6());

        cfg.server.host = "not an address".to_string();
        assert!(cfg.get_socket_addr().is_err());
    }
}
