use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::ConfigError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Network {
    Mainnet,
    #[default]
    Testnet,
}

// Only an explicit "mainnet" selects mainnet, everything else falls back to testnet.
impl From<&str> for Network {
    fn from(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("mainnet") {
            Network::Mainnet
        } else {
            Network::Testnet
        }
    }
}

impl From<String> for Network {
    fn from(s: String) -> Self {
        Network::from(s.as_str())
    }
}

impl From<Network> for String {
    fn from(n: Network) -> String {
        n.to_string()
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Mainnet => write!(f, "mainnet"),
            Network::Testnet => write!(f, "testnet"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Chain {
    #[default]
    Injective,
    Oraichain,
}

impl FromStr for Chain {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "injective" | "inj" => Ok(Chain::Injective),
            "oraichain" | "orai" => Ok(Chain::Oraichain),
            _ => Err(ConfigError::UnknownChain { name: s.to_string() }),
        }
    }
}

impl TryFrom<String> for Chain {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Chain> for String {
    fn from(c: Chain) -> String {
        c.to_string()
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Chain::Injective => write!(f, "injective"),
            Chain::Oraichain => write!(f, "oraichain"),
        }
    }
}

/// How addresses are derived from the public key and how sign docs are hashed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyScheme {
    /// secp256k1 with sha256 sign docs and ripemd160(sha256(pubkey)) addresses
    Cosmos,
    /// secp256k1 with keccak256 sign docs and ethereum style addresses
    Ethermint,
}

/// Event type and attribute key that carry a value we need out of a tx record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventKey {
    pub event_type: String,
    pub attribute: String,
}

impl EventKey {
    pub fn new(event_type: &str, attribute: &str) -> Self {
        Self {
            event_type: event_type.to_string(),
            attribute: attribute.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkEndpoints {
    pub grpc: String,
    pub lcd: String,
    /// block explorer api, when the chain has one we can query txs from
    pub explorer: Option<String>,
}

/// Optional per field replacements for the preset endpoints.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointOverrides {
    pub grpc: Option<String>,
    pub lcd: Option<String>,
    pub explorer: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChainCfg {
    pub chain: Chain,
    pub network: Network,
    pub chain_id: String,
    pub prefix: String,
    pub denom: String,
    pub decimals: u32,
    pub coin_type: u32,
    pub key_scheme: KeyScheme,
    pub gas_prices: f64,
    pub gas_adjustment: f64,
    pub endpoints: NetworkEndpoints,
    pub code_stored_event: EventKey,
    pub instantiated_event: EventKey,
}

pub const DEFAULT_GAS_ADJUSTMENT: f64 = 1.3;

const INJECTIVE_GAS_PRICE: f64 = 500_000_000.0;
const ORAICHAIN_GAS_PRICE: f64 = 0.0025;

impl ChainCfg {
    /// Returns the built in description of `chain` on `network`.
    pub fn preset(chain: Chain, network: Network) -> ChainCfg {
        match chain {
            Chain::Injective => {
                let (chain_id, host_prefix) = match network {
                    Network::Mainnet => ("injective-1", ""),
                    Network::Testnet => ("injective-888", "testnet."),
                };

                ChainCfg {
                    chain,
                    network,
                    chain_id: chain_id.to_string(),
                    prefix: "inj".to_string(),
                    denom: "inj".to_string(),
                    decimals: 18,
                    coin_type: 60,
                    key_scheme: KeyScheme::Ethermint,
                    gas_prices: INJECTIVE_GAS_PRICE,
                    gas_adjustment: DEFAULT_GAS_ADJUSTMENT,
                    endpoints: NetworkEndpoints {
                        grpc: format!("https://{host_prefix}sentry.chain.grpc.injective.network:443"),
                        lcd: format!("https://{host_prefix}sentry.lcd.injective.network:443"),
                        explorer: Some(format!(
                            "https://{host_prefix}sentry.exchange.grpc-web.injective.network/api/explorer/v1"
                        )),
                    },
                    code_stored_event: EventKey::new("cosmwasm.wasm.v1.EventCodeStored", "code_id"),
                    instantiated_event: EventKey::new(
                        "cosmwasm.wasm.v1.EventContractInstantiated",
                        "contract_address",
                    ),
                }
            }
            Chain::Oraichain => {
                let (chain_id, grpc, lcd) = match network {
                    Network::Mainnet => ("Oraichain", "https://grpc.orai.io", "https://lcd.orai.io"),
                    Network::Testnet => (
                        "Oraichain-testnet",
                        "https://testnet-grpc.orai.io",
                        "https://testnet-lcd.orai.io",
                    ),
                };

                ChainCfg {
                    chain,
                    network,
                    chain_id: chain_id.to_string(),
                    prefix: "orai".to_string(),
                    denom: "orai".to_string(),
                    decimals: 6,
                    coin_type: 118,
                    key_scheme: KeyScheme::Cosmos,
                    gas_prices: ORAICHAIN_GAS_PRICE,
                    gas_adjustment: DEFAULT_GAS_ADJUSTMENT,
                    endpoints: NetworkEndpoints {
                        grpc: grpc.to_string(),
                        lcd: lcd.to_string(),
                        explorer: None,
                    },
                    code_stored_event: EventKey::new("store_code", "code_id"),
                    instantiated_event: EventKey::new("instantiate", "_contract_address"),
                }
            }
        }
    }

    /// Applies configured endpoint replacements, validating every url.
    pub fn with_overrides(mut self, overrides: &EndpointOverrides) -> Result<ChainCfg, ConfigError> {
        if let Some(grpc) = &overrides.grpc {
            self.endpoints.grpc = grpc.clone();
        }
        if let Some(lcd) = &overrides.lcd {
            self.endpoints.lcd = lcd.clone();
        }
        if let Some(explorer) = &overrides.explorer {
            self.endpoints.explorer = Some(explorer.clone());
        }

        self.endpoints.grpc = parse_url("grpc", &self.endpoints.grpc)?;
        self.endpoints.lcd = parse_url("lcd", &self.endpoints.lcd)?;
        self.endpoints.explorer = self
            .endpoints
            .explorer
            .as_deref()
            .map(|u| parse_url("explorer", u))
            .transpose()?;

        Ok(self)
    }
}

// Attempt to parse the configured url to ensure that it is valid.
// If url is missing the scheme then default to https.
pub(crate) fn parse_url(field: &'static str, url: &str) -> Result<String, ConfigError> {
    let url = url.trim();
    let with_scheme = if url.contains("://") {
        url.to_string()
    } else {
        format!("https://{url}")
    };

    let parsed = Url::parse(&with_scheme).map_err(|_| ConfigError::InvalidUrl {
        field,
        url: url.to_string(),
    })?;

    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(ConfigError::InvalidUrl {
            field,
            url: url.to_string(),
        });
    }

    Ok(with_scheme.trim_end_matches('/').to_string())
}
