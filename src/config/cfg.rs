use config::{Config as _Config, File, FileFormat};
use cosmos_sdk_proto::cosmos::base::v1beta1::Coin as ProtoCoin;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use super::error::ConfigError;
use super::key::SigningKey;
use super::network::{Chain, ChainCfg, EndpointOverrides, Network, DEFAULT_GAS_ADJUSTMENT};

/// Environment variables that override file and default settings.
pub const ENV_VARS: [(&str, &str); 3] = [
    ("NETWORK", "network"),
    ("MNEMONIC", "mnemonic"),
    ("CHAIN", "chain"),
];

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    pub chain: Chain,
    pub network: Network,
    // usually supplied through the MNEMONIC env var, never commit it to a config file
    #[serde(default, skip_serializing)]
    pub mnemonic: Option<String>,
    pub gas_adjustment: f64,
    pub tx_timeout_secs: u64,
    pub tx_poll_interval_ms: u64,
    #[serde(default)]
    pub endpoints: EndpointOverrides,
    #[serde(default, skip_deserializing)]
    pub contracts: BTreeMap<String, ContractCfg>,
}

/// Everything needed to upload and instantiate one contract.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ContractCfg {
    pub wasm_path: PathBuf,
    pub label: String,
    #[serde(default)]
    pub admin: AdminCfg,
    /// instantiate msg, passed through to the contract untouched
    #[serde(default = "empty_object")]
    pub init_msg: Value,
    #[serde(default)]
    pub funds: Vec<Coin>,
}

fn empty_object() -> Value {
    Value::Object(Default::default())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AdminCfg {
    /// the deploying address becomes the contract admin
    #[default]
    Sender,
    /// contract is not migratable
    None,
    Address(String),
}

impl From<String> for AdminCfg {
    fn from(s: String) -> Self {
        match s.trim() {
            "sender" | "" => AdminCfg::Sender,
            "none" => AdminCfg::None,
            addr => AdminCfg::Address(addr.to_string()),
        }
    }
}

impl From<AdminCfg> for String {
    fn from(a: AdminCfg) -> String {
        match a {
            AdminCfg::Sender => "sender".to_string(),
            AdminCfg::None => "none".to_string(),
            AdminCfg::Address(addr) => addr,
        }
    }
}

impl AdminCfg {
    /// Resolves the admin address for a tx sent by `sender`.
    pub fn resolve(&self, sender: &str) -> Option<String> {
        match self {
            AdminCfg::Sender => Some(sender.to_string()),
            AdminCfg::None => None,
            AdminCfg::Address(addr) => Some(addr.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Coin {
    pub denom: String,
    pub amount: u128,
}

impl FromStr for Coin {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split = s
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| ConfigError::InvalidCoin { coin: s.to_string() })?;
        let (amount, denom) = s.split_at(split);

        if amount.is_empty() || denom.is_empty() {
            return Err(ConfigError::InvalidCoin { coin: s.to_string() });
        }

        Ok(Coin {
            denom: denom.to_string(),
            amount: amount
                .parse()
                .map_err(|_| ConfigError::InvalidCoin { coin: s.to_string() })?,
        })
    }
}

impl TryFrom<String> for Coin {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Coin> for String {
    fn from(c: Coin) -> String {
        c.to_string()
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

impl From<Coin> for ProtoCoin {
    fn from(c: Coin) -> ProtoCoin {
        ProtoCoin {
            denom: c.denom,
            amount: c.amount.to_string(),
        }
    }
}

fn read_file(path: &str) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: PathBuf::from(path),
        source,
    })
}

/// Parses a comma separated list like `1000inj,5peggy0xdead`.
pub fn parse_coins(s: &str) -> Result<Vec<Coin>, ConfigError> {
    s.split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::parse)
        .collect()
}

impl Config {
    /// Loads the optional yaml `file` and overlays the process environment.
    pub fn load(file: Option<&str>) -> Result<Config, ConfigError> {
        let env: HashMap<String, String> = ENV_VARS
            .iter()
            .filter_map(|(var, _)| std::env::var(var).ok().map(|v| (var.to_string(), v)))
            .collect();

        let yaml = match file {
            Some(f) => read_file(f)?,
            None => String::new(),
        };

        Self::from_yaml_str(&yaml, &env)
    }

    pub fn from_yaml(file: &str) -> Result<Config, ConfigError> {
        Self::from_yaml_str(&read_file(file)?, &HashMap::new())
    }

    pub fn from_yaml_str(yaml: &str, env: &HashMap<String, String>) -> Result<Config, ConfigError> {
        let mut doc: serde_yaml::Value = if yaml.trim().is_empty() {
            serde_yaml::Value::Null
        } else {
            serde_yaml::from_str(yaml)?
        };

        // contracts are read verbatim: init_msg keys keep their case and integers stay integers
        let contracts = match doc
            .as_mapping_mut()
            .and_then(|m| m.remove("contracts"))
            .filter(|c| !c.is_null())
        {
            Some(c) => serde_yaml::from_value(c)?,
            None => BTreeMap::new(),
        };

        let settings = if doc.is_null() {
            String::new()
        } else {
            serde_yaml::to_string(&doc)?
        };

        let mut cfg = Self::build(
            _Config::builder().add_source(File::from_str(&settings, FileFormat::Yaml)),
            env,
        )?;
        cfg.contracts = contracts;

        Ok(cfg)
    }

    fn build(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
        env: &HashMap<String, String>,
    ) -> Result<Config, ConfigError> {
        let mut builder = builder;
        for (var, key) in ENV_VARS {
            builder = builder.set_override_option(key, env.get(var).cloned())?;
        }

        let settings = builder
            .set_default("chain", Chain::default().to_string())?
            .set_default("network", Network::default().to_string())?
            .set_default("gas_adjustment", DEFAULT_GAS_ADJUSTMENT)?
            .set_default("tx_timeout_secs", 60)?
            .set_default("tx_poll_interval_ms", 1000)?
            .build()?;

        let cfg = settings.try_deserialize::<Config>()?;
        if cfg.gas_adjustment.is_nan() || cfg.gas_adjustment <= 0.0 {
            return Err(ConfigError::GasAdjustment {
                value: cfg.gas_adjustment,
            });
        }

        Ok(cfg)
    }

    /// Returns the configured mnemonic, failing when it is absent or blank.
    pub fn mnemonic(&self) -> Result<&str, ConfigError> {
        self.mnemonic
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .ok_or(ConfigError::MissingMnemonic)
    }

    pub fn signing_key(&self) -> Result<SigningKey, ConfigError> {
        Ok(SigningKey::from_mnemonic("deployer", self.mnemonic()?))
    }

    /// Resolves the chain preset for the selected network with any endpoint overrides applied.
    pub fn chain_cfg(&self) -> Result<ChainCfg, ConfigError> {
        let mut cfg = ChainCfg::preset(self.chain, self.network).with_overrides(&self.endpoints)?;
        cfg.gas_adjustment = self.gas_adjustment;
        Ok(cfg)
    }

    pub fn contract(&self, name: &str) -> Result<&ContractCfg, ConfigError> {
        self.contracts
            .get(name)
            .ok_or_else(|| ConfigError::UnknownContract { name: name.into() })
    }

    pub fn tx_timeout(&self) -> Duration {
        Duration::from_secs(self.tx_timeout_secs)
    }

    pub fn tx_poll_interval(&self) -> Duration {
        Duration::from_millis(self.tx_poll_interval_ms)
    }
}
