//! Listener settings, from defaults, a properties file and command-line
//! overrides.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_MAX_CLIENTS: usize = 10;
pub const DEFAULT_RECORDS_PATH: &str = "data/records.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Reported at startup; the accept loop does not enforce it.
    pub max_clients: usize,
    pub records_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            max_clients: DEFAULT_MAX_CLIENTS,
            records_path: PathBuf::from(DEFAULT_RECORDS_PATH),
        }
    }
}

impl ServerConfig {
    /// Parse a properties document with the keys `server.host` (optional),
    /// `server.port` and `max.clients`.
    pub fn from_properties(text: &str) -> anyhow::Result<Self> {
        let mut config = Self::default();
        let mut port = None;
        let mut max_clients = None;
        for (lineno, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }
            let Some((key, value)) = line.split_once(|c: char| c == '=' || c == ':') else {
                bail!("line {}: expected key=value, got {:?}", lineno + 1, line);
            };
            let (key, value) = (key.trim(), value.trim());
            match key {
                "server.host" => config.host = value.to_string(),
                "server.port" => {
                    port = Some(
                        value
                            .parse::<u16>()
                            .with_context(|| format!("invalid server.port {:?}", value))?,
                    )
                }
                "max.clients" => {
                    max_clients = Some(
                        value
                            .parse::<usize>()
                            .with_context(|| format!("invalid max.clients {:?}", value))?,
                    )
                }
                _ => {}
            }
        }
        config.port = port.context("server.port is missing")?;
        config.max_clients = max_clients.context("max.clients is missing")?;
        Ok(config)
    }

    pub fn load_properties(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_properties(&text).with_context(|| format!("in {}", path.display()))
    }

    /// `host:port` for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
