use thiserror::Error;

use crate::client::chain_res::TxStatus;
use crate::client::error::ClientError;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ExtractError {
    #[error("tx {tx_hash} did not succeed (status {status:?}, code {code})")]
    TxFailed {
        tx_hash: String,
        status: TxStatus,
        code: u32,
    },

    #[error("tx {tx_hash} has no logs")]
    NoLogs { tx_hash: String },

    #[error("event {event_type:?} not found in tx {tx_hash}")]
    EventNotFound { tx_hash: String, event_type: String },

    #[error("attribute {key:?} not found in event {event_type:?} of tx {tx_hash}")]
    AttributeNotFound {
        tx_hash: String,
        event_type: String,
        key: String,
    },

    #[error("invalid code id: {value:?}")]
    InvalidCodeId { value: String },
}

#[derive(Error, Debug)]
pub enum DeployError {
    #[error("error reading wasm file {path:?}")]
    WasmFileRead {
        path: String,
        source: std::io::Error,
    },

    #[error("serde json serialization error")]
    JsonSerialize { source: serde_json::Error },

    #[error("error storing contract code")]
    Store { source: ClientError },

    #[error("could not retrieve code id")]
    CodeId { source: ExtractError },

    // the uploaded code stays on chain, nothing is rolled back
    #[error("error instantiating code id {code_id}")]
    Instantiate { code_id: u64, source: ClientError },

    #[error("could not retrieve contract address for code id {code_id}")]
    ContractAddress { code_id: u64, source: ExtractError },

    #[error("error writing deploy report")]
    Report { source: std::io::Error },
}

impl DeployError {
    pub fn json(e: serde_json::Error) -> DeployError {
        DeployError::JsonSerialize { source: e }
    }

    pub fn report(e: std::io::Error) -> DeployError {
        DeployError::Report { source: e }
    }

    /// Code id that is left on chain by a failed deploy, if any.
    pub fn stranded_code_id(&self) -> Option<u64> {
        match self {
            DeployError::Instantiate { code_id, .. }
            | DeployError::ContractAddress { code_id, .. } => Some(*code_id),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("serde json serialization error")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    ClientError(#[from] ClientError),

    #[error("execute tx {tx_hash} failed with code {code}: {log}")]
    TxFailed {
        tx_hash: String,
        code: u32,
        log: String,
    },
}
