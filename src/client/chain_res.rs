use serde::{Deserialize, Serialize};

/// Acknowledgement returned right after a broadcast.
/// The tx is not committed yet, look up its [TxRecord] for the outcome.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    pub tx_hash: String,
    pub gas_limit: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    Ok,
    Error,
}

/// Confirmed outcome of a tx, as reported by an explorer or an LCD node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxRecord {
    pub hash: String,
    pub status: TxStatus,
    pub code: u32,
    pub raw_log: String,
    pub logs: Vec<TxLog>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxLog {
    pub events: Vec<Event>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub kind: String,
    pub attributes: Vec<Attribute>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub key: String,
    pub value: String,
}

impl TxRecord {
    pub fn is_ok(&self) -> bool {
        self.status == TxStatus::Ok
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct StoreCodeResponse {
    pub code_id: u64,
    pub tx_hash: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct InstantiateResponse {
    pub address: String,
    pub tx_hash: String,
}

#[derive(Clone, Debug)]
pub struct ExecResponse {
    pub tx_hash: String,
    pub record: TxRecord,
}
