//! Configuration module

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use diagnosis_core::{DataPaths, TrainingConfig};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind address
    pub host: IpAddr,

    /// Server port
    pub port: u16,

    /// Directory holding Training.csv and Testing.csv
    pub data_dir: PathBuf,

    /// Directory holding the description/precaution/severity tables
    pub master_data_dir: PathBuf,

    /// Origin allowed by CORS (the web frontend)
    pub cors_origin: String,

    /// Share of training rows held out for validation
    pub test_fraction: f64,

    /// Seed for the validation split
    pub split_seed: u64,

    /// Optional depth limit for the decision tree
    pub max_depth: Option<usize>,

    /// Environment (development, production)
    pub environment: String,

    /// Log output format (pretty, json)
    pub log_format: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            host: env::var("HOST")
                .ok()
                .and_then(|h| h.parse().ok())
                .unwrap_or(defaults.host),

            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),

            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),

            master_data_dir: env::var("MASTER_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.master_data_dir),

            cors_origin: env::var("CORS_ORIGIN")
                .unwrap_or(defaults.cors_origin),

            test_fraction: env::var("TEST_FRACTION")
                .ok()
                .and_then(|f| f.parse().ok())
                .unwrap_or(defaults.test_fraction),

            split_seed: env::var("SPLIT_SEED")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.split_seed),

            max_depth: env::var("MAX_DEPTH")
                .ok()
                .and_then(|d| d.parse().ok())
                .or(defaults.max_depth),

            environment: env::var("ENVIRONMENT")
                .unwrap_or(defaults.environment),

            log_format: env::var("LOG_FORMAT")
                .unwrap_or(defaults.log_format),
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn json_logs(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }

    pub fn data_paths(&self) -> DataPaths {
        DataPaths::new(&self.data_dir, &self.master_data_dir)
    }

    pub fn training_config(&self) -> TrainingConfig {
        TrainingConfig {
            test_fraction: self.test_fraction,
            seed: self.split_seed,
            max_depth: self.max_depth,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let training = TrainingConfig::default();
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 5000,
            data_dir: PathBuf::from("Data"),
            master_data_dir: PathBuf::from("MasterData"),
            cors_origin: "http://localhost:3000".to_string(),
            test_fraction: training.test_fraction,
            split_seed: training.seed,
            max_depth: training.max_depth,
            environment: "development".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}
