use async_trait::async_trait;
use log::debug;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tokio::time::{self, timeout as _timeout};

use super::chain_res::{Attribute, Event, TxLog, TxRecord, TxStatus};
use super::error::ClientError;
use crate::config::network::ChainCfg;

/// Finds the committed record of a broadcast tx.
#[async_trait]
pub trait TxLookup: Send + Sync {
    /// Returns `None` while the tx is not indexed yet.
    async fn tx_record(&self, tx_hash: &str) -> Result<Option<TxRecord>, ClientError>;
}

/// Polls `lookup` every `interval` until the tx record shows up or `timeout` elapses.
pub async fn wait_for_tx<L: TxLookup + ?Sized>(
    lookup: &L,
    tx_hash: &str,
    timeout: Duration,
    interval: Duration,
) -> Result<TxRecord, ClientError> {
    let poll = async {
        loop {
            if let Some(record) = lookup.tx_record(tx_hash).await? {
                return Ok::<TxRecord, ClientError>(record);
            }
            time::sleep(interval).await;
        }
    };

    _timeout(timeout, poll)
        .await
        .map_err(|_| ClientError::TxTimeout {
            tx_hash: tx_hash.to_string(),
        })?
}

/// Lookup backend chosen from the chain's endpoints:
/// the block explorer api when there is one, otherwise the LCD tx endpoint.
#[derive(Clone, Debug)]
pub enum ChainTxLookup {
    Explorer(ExplorerLookup),
    Lcd(LcdLookup),
}

impl ChainTxLookup {
    pub fn new(cfg: &ChainCfg) -> Self {
        match &cfg.endpoints.explorer {
            Some(explorer) => ChainTxLookup::Explorer(ExplorerLookup::new(explorer)),
            None => ChainTxLookup::Lcd(LcdLookup::new(&cfg.endpoints.lcd)),
        }
    }
}

#[async_trait]
impl TxLookup for ChainTxLookup {
    async fn tx_record(&self, tx_hash: &str) -> Result<Option<TxRecord>, ClientError> {
        match self {
            ChainTxLookup::Explorer(l) => l.tx_record(tx_hash).await,
            ChainTxLookup::Lcd(l) => l.tx_record(tx_hash).await,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ExplorerLookup {
    http: reqwest::Client,
    base_url: String,
}

impl ExplorerLookup {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl TxLookup for ExplorerLookup {
    async fn tx_record(&self, tx_hash: &str) -> Result<Option<TxRecord>, ClientError> {
        let url = format!("{}/txs/{}", self.base_url, tx_hash);
        let res: Option<ExplorerTxResponse> = get_json(&self.http, &url).await?;
        Ok(res.and_then(ExplorerTxResponse::into_record))
    }
}

#[derive(Clone, Debug)]
pub struct LcdLookup {
    http: reqwest::Client,
    base_url: String,
}

impl LcdLookup {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl TxLookup for LcdLookup {
    async fn tx_record(&self, tx_hash: &str) -> Result<Option<TxRecord>, ClientError> {
        let url = format!("{}/cosmos/tx/v1beta1/txs/{}", self.base_url, tx_hash);
        let res: Option<LcdTxResponse> = get_json(&self.http, &url).await?;
        Ok(res.map(LcdTxResponse::into_record))
    }
}

// 404 means the tx has not been indexed yet
async fn get_json<T: DeserializeOwned>(
    http: &reqwest::Client,
    url: &str,
) -> Result<Option<T>, ClientError> {
    let res = http
        .get(url)
        .header(CONTENT_TYPE, "application/json")
        .send()
        .await?;

    if res.status() == StatusCode::NOT_FOUND {
        debug!("{url} not found yet");
        return Ok(None);
    }
    if !res.status().is_success() {
        return Err(ClientError::HttpStatus {
            status: res.status().as_u16(),
            url: url.to_string(),
        });
    }

    Ok(Some(res.json::<T>().await?))
}

#[derive(Debug, Deserialize)]
struct ExplorerTxResponse {
    #[serde(default)]
    s: Option<String>,
    #[serde(default)]
    data: Option<ExplorerTx>,
}

#[derive(Debug, Deserialize)]
struct ExplorerTx {
    hash: String,
    #[serde(default)]
    code: u32,
    #[serde(default)]
    error_log: String,
    #[serde(default)]
    logs: Vec<RawLog>,
}

impl ExplorerTxResponse {
    fn into_record(self) -> Option<TxRecord> {
        let api_ok = self.s.as_deref().map_or(true, |s| s == "ok");
        let tx = self.data?;

        let status = if api_ok && tx.code == 0 {
            TxStatus::Ok
        } else {
            TxStatus::Error
        };

        Some(TxRecord {
            hash: tx.hash,
            status,
            code: tx.code,
            raw_log: tx.error_log,
            logs: tx.logs.into_iter().map(RawLog::into_log).collect(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct LcdTxResponse {
    tx_response: LcdTx,
}

#[derive(Debug, Deserialize)]
struct LcdTx {
    txhash: String,
    #[serde(default)]
    code: u32,
    #[serde(default)]
    raw_log: String,
    #[serde(default)]
    logs: Vec<RawLog>,
    #[serde(default)]
    events: Vec<RawEvent>,
}

impl LcdTxResponse {
    fn into_record(self) -> TxRecord {
        let tx = self.tx_response;

        // sdk 0.50+ no longer fills `logs`, the tx events are only reported at the top level
        let logs = if tx.logs.is_empty() && !tx.events.is_empty() {
            vec![TxLog {
                events: tx.events.into_iter().map(RawEvent::into_event).collect(),
            }]
        } else {
            tx.logs.into_iter().map(RawLog::into_log).collect()
        };

        TxRecord {
            hash: tx.txhash,
            status: if tx.code == 0 {
                TxStatus::Ok
            } else {
                TxStatus::Error
            },
            code: tx.code,
            raw_log: tx.raw_log,
            logs,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawLog {
    #[serde(default)]
    events: Vec<RawEvent>,
}

impl RawLog {
    fn into_log(self) -> TxLog {
        TxLog {
            events: self.events.into_iter().map(RawEvent::into_event).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawEvent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    attributes: RawAttributes,
}

impl RawEvent {
    fn into_event(self) -> Event {
        let attributes = match self.attributes {
            RawAttributes::List(list) => list
                .into_iter()
                .map(|a| Attribute {
                    key: a.key,
                    value: a.value.unwrap_or_default(),
                })
                .collect(),
            RawAttributes::Map(map) => map
                .into_iter()
                .map(|(key, value)| Attribute { key, value })
                .collect(),
        };

        Event {
            kind: self.kind,
            attributes,
        }
    }
}

// explorers report attributes either as key/value pairs or as a flat object
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawAttributes {
    List(Vec<RawAttribute>),
    Map(BTreeMap<String, String>),
}

impl Default for RawAttributes {
    fn default() -> Self {
        RawAttributes::List(vec![])
    }
}

#[derive(Debug, Deserialize)]
struct RawAttribute {
    key: String,
    #[serde(default)]
    value: Option<String>,
}
