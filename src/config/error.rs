use config::ConfigError as _ConfigError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("MNEMONIC is missing")]
    MissingMnemonic,

    #[error("unknown chain: {name:?}")]
    UnknownChain { name: String },

    #[error("invalid {field} url: {url:?}")]
    InvalidUrl { field: &'static str, url: String },

    #[error("invalid coin: {coin:?}")]
    InvalidCoin { coin: String },

    #[error("gas adjustment must be positive, got {value}")]
    GasAdjustment { value: f64 },

    #[error("contract not configured: {name:?}")]
    UnknownContract { name: String },

    #[error("reading {path:?}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Config(#[from] _ConfigError),
}
