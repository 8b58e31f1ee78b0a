use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

/// Runtime configuration, loadable from a TOML file. Missing fields fall
/// back to the defaults.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,

    /// Budget for one event's full trip through the pipeline, in
    /// milliseconds.
    pub pipeline_timeout_ms: u64,

    /// Sources that must all arrive before the default joiner composes.
    /// Empty means every event composes immediately.
    pub join_sources: Vec<String>,

    pub store: StoreConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".parse().unwrap(),
            pipeline_timeout_ms: 30_000,
            join_sources: Vec::new(),
            store: StoreConfig::Memory,
        }
    }
}

impl ServerConfig {
    pub fn from_toml_file(path: &Path) -> ServerResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|error| ServerError::Config(error.to_string()))
    }

    pub fn pipeline_timeout(&self) -> Duration {
        Duration::from_millis(self.pipeline_timeout_ms)
    }
}

/// Which event store backs the default pipeline.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoreConfig {
    /// Process-local store; state is lost on restart.
    Memory,
    /// Compressed, content-addressed blobs under a local directory.
    Blob { root: PathBuf },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = ServerConfig::default();
        assert_eq!(
            config.bind_addr,
            "127.0.0.1:8080".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(config.pipeline_timeout(), Duration::from_secs(30));
        assert!(config.join_sources.is_empty());
        assert!(matches!(config.store, StoreConfig::Memory));
    }

    #[test]
    fn partial_toml_keeps_defaults_for_the_rest() {
        let config: ServerConfig = toml::from_str(r#"bind_addr = "0.0.0.0:9000""#).unwrap();
        assert_eq!(
            config.bind_addr,
            "0.0.0.0:9000".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(config.pipeline_timeout_ms, 30_000);
        assert!(matches!(config.store, StoreConfig::Memory));
    }

    #[test]
    fn full_toml_parses() {
        let raw = r#"
            bind_addr = "0.0.0.0:9000"
            pipeline_timeout_ms = 250
            join_sources = ["payment", "fraud"]

            [store]
            kind = "blob"
            root = "/var/lib/conflux"
        "#;
        let config: ServerConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.pipeline_timeout(), Duration::from_millis(250));
        assert_eq!(config.join_sources, vec!["payment", "fraud"]);
        assert!(
            matches!(config.store, StoreConfig::Blob { root } if root == PathBuf::from("/var/lib/conflux"))
        );
    }

    #[test]
    fn missing_config_file_is_an_io_error() {
        let error = ServerConfig::from_toml_file(Path::new("/nonexistent/conflux.toml"))
            .unwrap_err();
        assert!(matches!(error, ServerError::Io(_)));
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conflux.toml");
        std::fs::write(&path, "bind_addr = 12").unwrap();
        let error = ServerConfig::from_toml_file(&path).unwrap_err();
        assert!(matches!(error, ServerError::Config(_)));
    }
}
