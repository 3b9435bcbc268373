use log::info;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use super::error::ContractError;
use crate::client::chain_res::ExecResponse;
use crate::client::cosmwasm::WasmChain;
use crate::client::tx_lookup::{wait_for_tx, TxLookup};
use crate::config::cfg::Coin;

/// Talks to already deployed contracts.
///
/// Queries never sign anything. Executes are signed by the chain client's
/// key and only return once the tx record shows up.
pub struct ContractSdk<C, L> {
    chain: C,
    lookup: L,
    tx_timeout: Duration,
    poll_interval: Duration,
}

impl<C: WasmChain, L: TxLookup> ContractSdk<C, L> {
    pub fn new(chain: C, lookup: L, tx_timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            chain,
            lookup,
            tx_timeout,
            poll_interval,
        }
    }

    pub fn chain(&self) -> &C {
        &self.chain
    }

    /// Smart query against `address`, decoding the contract's json answer into `R`.
    pub async fn query<Q, R>(&self, address: &str, msg: &Q) -> Result<R, ContractError>
    where
        Q: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let payload = serde_json::to_vec(msg)?;
        let data = self.chain.query(address, payload).await?;
        Ok(serde_json::from_slice(&data)?)
    }

    /// Executes `msg` on `address` with optional attached `funds`.
    ///
    /// # Errors
    /// * `ContractError::TxFailed` when the tx was committed but did not succeed.
    pub async fn execute<M>(
        &self,
        address: &str,
        msg: &M,
        funds: Vec<Coin>,
    ) -> Result<ExecResponse, ContractError>
    where
        M: Serialize + ?Sized,
    {
        let payload = serde_json::to_vec(msg)?;
        let receipt = self.chain.execute(address, payload, funds).await?;

        let record = wait_for_tx(
            &self.lookup,
            &receipt.tx_hash,
            self.tx_timeout,
            self.poll_interval,
        )
        .await?;

        if !record.is_ok() {
            return Err(ContractError::TxFailed {
                tx_hash: record.hash,
                code: record.code,
                log: record.raw_log,
            });
        }

        info!("Executed {address} in tx {}", receipt.tx_hash);

        Ok(ExecResponse {
            tx_hash: receipt.tx_hash,
            record,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::chain_res::{TxLog, TxReceipt, TxRecord, TxStatus};
    use crate::client::error::ClientError;
    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use serde::{Deserialize, Serialize};
    use serde_json::{json, Value};
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeChain {
        queries: Mutex<Vec<(String, Value)>>,
        executes: Mutex<Vec<(String, Value, Vec<Coin>)>>,
        answer: Vec<u8>,
    }

    #[async_trait]
    impl WasmChain for FakeChain {
        fn sender(&self) -> String {
            "orai1sender".to_string()
        }

        async fn store(&self, _wasm: Vec<u8>) -> Result<TxReceipt, ClientError> {
            unimplemented!()
        }

        async fn instantiate(
            &self,
            _code_id: u64,
            _msg: Vec<u8>,
            _label: &str,
            _admin: Option<String>,
            _funds: Vec<Coin>,
        ) -> Result<TxReceipt, ClientError> {
            unimplemented!()
        }

        async fn execute(
            &self,
            contract: &str,
            msg: Vec<u8>,
            funds: Vec<Coin>,
        ) -> Result<TxReceipt, ClientError> {
            self.executes.lock().unwrap().push((
                contract.to_string(),
                serde_json::from_slice(&msg).unwrap(),
                funds,
            ));
            Ok(TxReceipt {
                tx_hash: "EXEC".to_string(),
                gas_limit: 200_000,
            })
        }

        async fn query(&self, contract: &str, msg: Vec<u8>) -> Result<Vec<u8>, ClientError> {
            self.queries
                .lock()
                .unwrap()
                .push((contract.to_string(), serde_json::from_slice(&msg).unwrap()));
            Ok(self.answer.clone())
        }
    }

    struct FixedLookup(TxRecord);

    #[async_trait]
    impl TxLookup for FixedLookup {
        async fn tx_record(&self, _tx_hash: &str) -> Result<Option<TxRecord>, ClientError> {
            Ok(Some(self.0.clone()))
        }
    }

    fn exec_record(status: TxStatus, code: u32) -> TxRecord {
        TxRecord {
            hash: "EXEC".to_string(),
            status,
            code,
            raw_log: if code == 0 {
                String::new()
            } else {
                "out of gas".to_string()
            },
            logs: vec![TxLog::default()],
        }
    }

    fn sdk(chain: FakeChain, record: TxRecord) -> ContractSdk<FakeChain, FixedLookup> {
        ContractSdk::new(
            chain,
            FixedLookup(record),
            Duration::from_millis(50),
            Duration::from_millis(1),
        )
    }

    #[derive(Deserialize, Debug, PartialEq)]
    struct TierInfo {
        usd_deposits: Vec<String>,
    }

    #[tokio::test]
    async fn query_decodes_response() {
        let chain = FakeChain {
            answer: br#"{"usd_deposits":["250","750"]}"#.to_vec(),
            ..Default::default()
        };
        let sdk = sdk(chain, exec_record(TxStatus::Ok, 0));

        let res: TierInfo = sdk
            .query("orai1tier", &json!({"config": {}}))
            .await
            .unwrap();

        assert_eq!(
            res,
            TierInfo {
                usd_deposits: vec!["250".to_string(), "750".to_string()]
            }
        );
        assert_eq!(
            sdk.chain().queries.lock().unwrap()[0],
            ("orai1tier".to_string(), json!({"config": {}}))
        );
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    #[serde(rename_all = "snake_case")]
    enum QueryMsg {
        UserInfo { address: String, tier: u64 },
    }

    #[tokio::test]
    async fn query_msg_reaches_contract_intact() {
        let chain = FakeChain {
            answer: br#"{"usd_deposits":[]}"#.to_vec(),
            ..Default::default()
        };
        let sdk = sdk(chain, exec_record(TxStatus::Ok, 0));
        let msg = QueryMsg::UserInfo {
            address: "orai1user".to_string(),
            tier: u64::MAX,
        };

        let _: TierInfo = sdk.query("orai1ido", &msg).await.unwrap();

        let (contract, sent) = sdk.chain().queries.lock().unwrap().remove(0);
        assert_eq!(contract, "orai1ido");
        assert_eq!(
            sent,
            json!({"user_info": {"address": "orai1user", "tier": u64::MAX}})
        );
        assert_eq!(serde_json::from_value::<QueryMsg>(sent).unwrap(), msg);
    }

    #[tokio::test]
    async fn query_with_unexpected_shape() {
        let chain = FakeChain {
            answer: br#"{"owner":"orai1"}"#.to_vec(),
            ..Default::default()
        };
        let sdk = sdk(chain, exec_record(TxStatus::Ok, 0));

        let res = sdk
            .query::<_, TierInfo>("orai1tier", &json!({"config": {}}))
            .await;

        assert_matches!(res, Err(ContractError::Json(_)));
    }

    #[tokio::test]
    async fn execute_waits_for_record() {
        let sdk = sdk(FakeChain::default(), exec_record(TxStatus::Ok, 0));
        let funds = vec!["10orai".parse().unwrap()];

        let res = sdk
            .execute("orai1ido", &json!({"deposit": {}}), funds.clone())
            .await
            .unwrap();

        assert_eq!(res.tx_hash, "EXEC");
        assert!(res.record.is_ok());
        assert_eq!(
            sdk.chain().executes.lock().unwrap()[0],
            ("orai1ido".to_string(), json!({"deposit": {}}), funds)
        );
    }

    #[tokio::test]
    async fn failed_execute_is_an_error() {
        let sdk = sdk(FakeChain::default(), exec_record(TxStatus::Error, 11));

        let err = sdk
            .execute("orai1ido", &json!({"deposit": {}}), vec![])
            .await
            .unwrap_err();

        assert_matches!(
            err,
            ContractError::TxFailed { code: 11, log, .. } if log == "out of gas"
        );
    }
}
