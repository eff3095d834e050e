use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Deserialize;

use crate::error::{GeoError, Result};

pub const DEFAULT_LISTEN: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8888;

#[derive(Parser, Debug, Default)]
#[command(name = "ip-geo")]
#[command(version = "0.1.0")]
#[command(about = "HTTP service resolving IP addresses to GEO and ASN data", long_about = None)]
pub struct Args {
    /// Address to listen on (default: 0.0.0.0)
    #[arg(short = 'l', long, env = "GEO_LISTEN")]
    pub listen: Option<String>,

    /// Port to listen on (default: 8888)
    #[arg(short = 'p', long, env = "GEO_PORT")]
    pub port: Option<u16>,

    /// Directory holding GeoLite2-ASN.mmdb and GeoLite2-City.mmdb (default: .)
    #[arg(short = 'm', long, env = "GEO_MMDB_DIR")]
    pub mmdb: Option<PathBuf>,

    /// Number of HTTP workers (defaults to the number of CPUs)
    #[arg(short = 'w', long, env = "GEO_WORKERS")]
    pub workers: Option<usize>,

    /// Verbose output
    #[arg(short = 'v', long, env = "GEO_VERBOSE")]
    pub verbose: bool,

    /// TOML config file; command line and environment values take precedence
    #[arg(short = 'c', long, env = "GEO_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Contents of the optional TOML config file
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub listen: Option<String>,
    pub port: Option<u16>,
    pub mmdb: Option<PathBuf>,
    pub workers: Option<usize>,
    pub verbose: Option<bool>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            GeoError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Ok(toml::from_str(&content)?)
    }
}

/// Resolved settings
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub listen: String,
    pub port: u16,
    pub mmdb_dir: PathBuf,
    pub workers: Option<usize>,
    pub verbose: bool,
}

impl Args {
    pub fn merge_with_config(self) -> Result<Config> {
        let file = match &self.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        self.merge(file)
    }

    fn merge(self, file: FileConfig) -> Result<Config> {
        let workers = self.workers.or(file.workers);
        if workers == Some(0) {
            return Err(GeoError::Config("workers must be at least 1".to_string()));
        }

        Ok(Config {
            listen: self
                .listen
                .or(file.listen)
                .unwrap_or_else(|| DEFAULT_LISTEN.to_string()),
            port: self.port.or(file.port).unwrap_or(DEFAULT_PORT),
            mmdb_dir: self
                .mmdb
                .or(file.mmdb)
                .unwrap_or_else(|| PathBuf::from(".")),
            workers,
            verbose: self.verbose || file.verbose.unwrap_or(false),
        })
    }
}
