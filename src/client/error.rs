use cosmrs::ErrorReport;
use prost::DecodeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("invalid mnemonic")]
    Mnemonic,

    #[error("invalid derivation path")]
    DerivationPath,

    #[error("invalid account ID")]
    AccountId { source: ErrorReport },

    #[error("account not found on chain: {address:?}")]
    AccountNotFound { address: String },

    #[error("unsupported account type: {type_url:?}")]
    AccountType { type_url: String },

    #[error("invalid endpoint: {url:?}")]
    Endpoint { url: String },

    #[error("proto decoding error")]
    ProtoDecoding { source: DecodeError },

    #[error("simulation did not return gas info")]
    MissingGasInfo,

    #[error("broadcast did not return a tx response")]
    MissingTxResponse,

    #[error("tx {tx_hash} rejected with code {code}: {log}")]
    TxRejected {
        tx_hash: String,
        code: u32,
        log: String,
    },

    #[error("timed out waiting for tx {tx_hash}")]
    TxTimeout { tx_hash: String },

    #[error("unexpected http status {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("invalid coin amount: {amount:?}")]
    InvalidAmount { amount: String },

    #[error("json error")]
    Json(#[from] serde_json::Error),

    #[error("gRPC transport error")]
    Transport(#[from] tonic::transport::Error),

    #[error("gRPC error: {0}")]
    Grpc(#[from] tonic::Status),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl ClientError {
    pub fn account_id(e: ErrorReport) -> ClientError {
        ClientError::AccountId { source: e }
    }

    pub fn proto_decoding(e: DecodeError) -> ClientError {
        ClientError::ProtoDecoding { source: e }
    }
}
