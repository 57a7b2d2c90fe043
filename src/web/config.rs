// Server configuration from command line flags and environment variables

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use clap::Parser;
use log::LevelFilter;

pub const DEFAULT_PORT: u16 = 5000;

/// Artifact file name, looked up next to the executable unless overridden.
pub const MODEL_FILE_NAME: &str = "livestock_random_forest.json";

#[derive(Debug, Parser)]
#[command(name = "livestock_predict_web", version, about = "Livestock feed prediction web server")]
pub struct Cli {
    /// Port to listen on (all interfaces)
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Model artifact path
    #[arg(long, env = "MODEL_PATH")]
    pub model_path: Option<PathBuf>,

    /// Load the model on the first prediction instead of at startup
    #[arg(long, env = "LAZY_LOAD", value_parser = clap::builder::BoolishValueParser::new())]
    pub lazy_load: bool,

    /// Directory for timestamped log files; console only when unset
    #[arg(long, env = "LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: LevelFilter,
}

/// When the model artifact is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadStrategy {
    /// Before the server accepts connections.
    #[default]
    Eager,
    /// On the first prediction request.
    Lazy,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub model_path: PathBuf,
    pub load_strategy: LoadStrategy,
    pub log_dir: Option<PathBuf>,
    pub log_level: LevelFilter,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            model_path: default_model_path(),
            load_strategy: LoadStrategy::Eager,
            log_dir: None,
            log_level: LevelFilter::Info,
        }
    }
}

impl From<Cli> for ServerConfig {
    fn from(cli: Cli) -> Self {
        Self {
            port: cli.port,
            model_path: cli.model_path.unwrap_or_else(default_model_path),
            load_strategy: if cli.lazy_load {
                LoadStrategy::Lazy
            } else {
                LoadStrategy::Eager
            },
            log_dir: cli.log_dir,
            log_level: cli.log_level,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

/// `MODEL_FILE_NAME` inside the directory holding the running executable.
pub fn default_model_path() -> PathBuf {
    let dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."));
    dir.join(MODEL_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["livestock_predict_web"]).unwrap();
        let config = ServerConfig::from(cli);
        // PORT may be set in the environment running the tests
        if std::env::var_os("PORT").is_none() {
            assert_eq!(config.port, 5000);
        }
        assert!(config.model_path.ends_with(MODEL_FILE_NAME));
    }

    #[test]
    fn test_flags_override() {
        let cli = Cli::try_parse_from([
            "livestock_predict_web",
            "--port",
            "8081",
            "--model-path",
            "/tmp/model.json",
            "--lazy-load",
            "--log-level",
            "debug",
        ])
        .unwrap();
        let config = ServerConfig::from(cli);
        assert_eq!(config.port, 8081);
        assert_eq!(config.model_path, PathBuf::from("/tmp/model.json"));
        assert_eq!(config.load_strategy, LoadStrategy::Lazy);
        assert_eq!(config.log_level, LevelFilter::Debug);
    }

    #[test]
    fn test_bind_addr_uses_all_interfaces() {
        let config = ServerConfig {
            port: 6000,
            ..ServerConfig::default()
        };
        assert_eq!(config.bind_addr().to_string(), "0.0.0.0:6000");
    }

    #[test]
    fn test_lazy_load_env_accepts_boolish_values() {
        // Only this test touches LAZY_LOAD
        for (value, expected) in [
            ("1", LoadStrategy::Lazy),
            ("yes", LoadStrategy::Lazy),
            ("on", LoadStrategy::Lazy),
            ("true", LoadStrategy::Lazy),
            ("0", LoadStrategy::Eager),
            ("no", LoadStrategy::Eager),
            ("false", LoadStrategy::Eager),
        ] {
            std::env::set_var("LAZY_LOAD", value);
            let cli = Cli::try_parse_from(["livestock_predict_web"]);
            std::env::remove_var("LAZY_LOAD");
            let config = ServerConfig::from(cli.unwrap());
            assert_eq!(config.load_strategy, expected, "LAZY_LOAD={value}");
        }
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        assert!(Cli::try_parse_from(["livestock_predict_web", "--port", "not-a-port"]).is_err());
    }
}
