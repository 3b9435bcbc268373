use async_trait::async_trait;
use cosmos_sdk_proto::cosmos::base::v1beta1::Coin as ProtoCoin;
use cosmos_sdk_proto::cosmwasm::wasm::v1::query_client::QueryClient;
use cosmos_sdk_proto::cosmwasm::wasm::v1::{
    MsgExecuteContract, MsgInstantiateContract, MsgStoreCode, QuerySmartContractStateRequest,
};
use cosmrs::Any;
use log::debug;
use prost::Message;
use tonic::transport::Channel;

use super::chain_res::TxReceipt;
use super::cosmos::{balance, channel, send_tx};
use super::error::ClientError;
use super::signer::Signer;
use crate::config::cfg::Coin;
use crate::config::key::SigningKey;
use crate::config::network::ChainCfg;

const MSG_STORE_CODE: &str = "/cosmwasm.wasm.v1.MsgStoreCode";
const MSG_INSTANTIATE_CONTRACT: &str = "/cosmwasm.wasm.v1.MsgInstantiateContract";
const MSG_EXECUTE_CONTRACT: &str = "/cosmwasm.wasm.v1.MsgExecuteContract";

/// The chain operations the deploy and contract flows depend on.
#[async_trait]
pub trait WasmChain: Send + Sync {
    /// Address of the signing account.
    fn sender(&self) -> String;

    async fn store(&self, wasm: Vec<u8>) -> Result<TxReceipt, ClientError>;

    async fn instantiate(
        &self,
        code_id: u64,
        msg: Vec<u8>,
        label: &str,
        admin: Option<String>,
        funds: Vec<Coin>,
    ) -> Result<TxReceipt, ClientError>;

    async fn execute(
        &self,
        contract: &str,
        msg: Vec<u8>,
        funds: Vec<Coin>,
    ) -> Result<TxReceipt, ClientError>;

    /// Smart query, returns the contract's json response.
    async fn query(&self, contract: &str, msg: Vec<u8>) -> Result<Vec<u8>, ClientError>;
}

#[derive(Clone)]
pub struct CosmWasmClient {
    // shared by account lookups, simulation, broadcast and smart queries
    channel: Channel,
    signer: Signer,
    cfg: ChainCfg,
}

impl CosmWasmClient {
    pub fn new(cfg: ChainCfg, key: &SigningKey) -> Result<Self, ClientError> {
        Ok(Self {
            channel: channel(&cfg.endpoints.grpc)?,
            signer: Signer::new(key, &cfg)?,
            cfg,
        })
    }

    pub fn cfg(&self) -> &ChainCfg {
        &self.cfg
    }

    /// Signer balance in the fee denom base units.
    pub async fn balance(&self) -> Result<u128, ClientError> {
        balance(&self.channel, &self.signer.address(), &self.cfg.denom).await
    }

    async fn send(&self, msg: Any) -> Result<TxReceipt, ClientError> {
        send_tx(&self.channel, msg, &self.signer, &self.cfg).await
    }
}

#[async_trait]
impl WasmChain for CosmWasmClient {
    fn sender(&self) -> String {
        self.signer.address()
    }

    async fn store(&self, wasm: Vec<u8>) -> Result<TxReceipt, ClientError> {
        let msg = MsgStoreCode {
            sender: self.signer.address(),
            wasm_byte_code: wasm,
            instantiate_permission: None,
        };

        self.send(to_any(MSG_STORE_CODE, &msg)).await
    }

    async fn instantiate(
        &self,
        code_id: u64,
        msg: Vec<u8>,
        label: &str,
        admin: Option<String>,
        funds: Vec<Coin>,
    ) -> Result<TxReceipt, ClientError> {
        let msg = MsgInstantiateContract {
            sender: self.signer.address(),
            admin: admin.unwrap_or_default(),
            code_id,
            label: label.to_string(),
            msg,
            funds: proto_funds(funds),
        };

        self.send(to_any(MSG_INSTANTIATE_CONTRACT, &msg)).await
    }

    async fn execute(
        &self,
        contract: &str,
        msg: Vec<u8>,
        funds: Vec<Coin>,
    ) -> Result<TxReceipt, ClientError> {
        let msg = MsgExecuteContract {
            sender: self.signer.address(),
            contract: contract.to_string(),
            msg,
            funds: proto_funds(funds),
        };

        self.send(to_any(MSG_EXECUTE_CONTRACT, &msg)).await
    }

    async fn query(&self, contract: &str, msg: Vec<u8>) -> Result<Vec<u8>, ClientError> {
        debug!("smart query {contract}");

        let res = QueryClient::new(self.channel.clone())
            .smart_contract_state(smart_query(contract, msg))
            .await?
            .into_inner();

        // raw json bytes as returned by the contract
        Ok(res.data)
    }
}

// query_data is the json msg itself, not base64 of it
fn smart_query(contract: &str, msg: Vec<u8>) -> QuerySmartContractStateRequest {
    QuerySmartContractStateRequest {
        address: contract.to_string(),
        query_data: msg,
    }
}

fn to_any<M: Message>(type_url: &str, msg: &M) -> Any {
    Any {
        type_url: type_url.to_string(),
        value: msg.encode_to_vec(),
    }
}

// the sdk rejects unsorted coin lists
fn proto_funds(mut funds: Vec<Coin>) -> Vec<ProtoCoin> {
    funds.sort_by(|a, b| a.denom.cmp(&b.denom));
    funds.into_iter().map(Into::into).collect()
}
