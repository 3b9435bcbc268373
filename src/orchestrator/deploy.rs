use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::error::DeployError;
use super::events::{extract, parse_code_id};
use crate::client::chain_res::{InstantiateResponse, StoreCodeResponse};
use crate::client::cosmwasm::WasmChain;
use crate::client::tx_lookup::{wait_for_tx, TxLookup};
use crate::config::cfg::{Config, ContractCfg};
use crate::config::network::{ChainCfg, EventKey, Network};

/// Knobs for waiting on and reading tx records.
#[derive(Clone, Debug, PartialEq)]
pub struct DeployOpts {
    pub tx_timeout: Duration,
    pub poll_interval: Duration,
    pub code_stored_event: EventKey,
    pub instantiated_event: EventKey,
}

impl DeployOpts {
    pub fn new(cfg: &Config, chain: &ChainCfg) -> Self {
        Self {
            tx_timeout: cfg.tx_timeout(),
            poll_interval: cfg.tx_poll_interval(),
            code_stored_event: chain.code_stored_event.clone(),
            instantiated_event: chain.instantiated_event.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployReport {
    pub contract: String,
    pub code_id: u64,
    pub address: String,
    pub store_tx: String,
    pub instantiate_tx: String,
}

/// Every contract deployed in one run, written out as `<chain_id>_deployment.json`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeploySummary {
    pub chain_id: String,
    pub network: Network,
    pub deployer: String,
    pub contracts: Vec<DeployReport>,
}

impl DeploySummary {
    pub fn write_to_json(&self, dir: &Path) -> Result<PathBuf, DeployError> {
        let path = dir.join(format!("{}_deployment.json", self.chain_id));
        let json = serde_json::to_string_pretty(self).map_err(DeployError::json)?;
        fs::write(&path, json).map_err(DeployError::report)?;
        Ok(path)
    }
}

/// Uploads and instantiates contracts, one tx at a time.
pub struct Deployer<C, L> {
    chain: C,
    lookup: L,
    opts: DeployOpts,
}

impl<C: WasmChain, L: TxLookup> Deployer<C, L> {
    pub fn new(chain: C, lookup: L, opts: DeployOpts) -> Self {
        Self {
            chain,
            lookup,
            opts,
        }
    }

    pub fn chain(&self) -> &C {
        &self.chain
    }

    /// Stores `wasm` and reads the assigned code id back from the committed tx.
    pub async fn store(&self, wasm: Vec<u8>) -> Result<StoreCodeResponse, DeployError> {
        let receipt = self
            .chain
            .store(wasm)
            .await
            .map_err(|e| DeployError::Store { source: e })?;

        info!("Getting transaction info........");
        let record = wait_for_tx(
            &self.lookup,
            &receipt.tx_hash,
            self.opts.tx_timeout,
            self.opts.poll_interval,
        )
        .await
        .map_err(|e| DeployError::Store { source: e })?;

        let code_id = extract(&record, &self.opts.code_stored_event)
            .and_then(|v| parse_code_id(&v))
            .map_err(|e| DeployError::CodeId { source: e })?;

        Ok(StoreCodeResponse {
            code_id,
            tx_hash: receipt.tx_hash,
        })
    }

    /// Instantiates `code_id` with the contract's init msg and reads back its address.
    pub async fn instantiate(
        &self,
        code_id: u64,
        contract: &ContractCfg,
    ) -> Result<InstantiateResponse, DeployError> {
        let payload = serde_json::to_vec(&contract.init_msg).map_err(DeployError::json)?;
        let admin = contract.admin.resolve(&self.chain.sender());

        let receipt = self
            .chain
            .instantiate(
                code_id,
                payload,
                &contract.label,
                admin,
                contract.funds.clone(),
            )
            .await
            .map_err(|e| DeployError::Instantiate { code_id, source: e })?;

        info!("Getting instantiate contract transaction info........");
        let record = wait_for_tx(
            &self.lookup,
            &receipt.tx_hash,
            self.opts.tx_timeout,
            self.opts.poll_interval,
        )
        .await
        .map_err(|e| DeployError::Instantiate { code_id, source: e })?;

        let address = extract(&record, &self.opts.instantiated_event)
            .map_err(|e| DeployError::ContractAddress { code_id, source: e })?;

        Ok(InstantiateResponse {
            address,
            tx_hash: receipt.tx_hash,
        })
    }

    /// Uploads the wasm binary of `contract`, then instantiates it.
    ///
    /// Nothing is rolled back: when instantiation fails the uploaded code
    /// stays on chain and its id is carried by the returned error.
    pub async fn deploy(
        &self,
        name: &str,
        contract: &ContractCfg,
    ) -> Result<DeployReport, DeployError> {
        info!("Storing {:?}", contract.wasm_path);
        let wasm = fs::read(&contract.wasm_path).map_err(|e| DeployError::WasmFileRead {
            path: contract.wasm_path.display().to_string(),
            source: e,
        })?;

        let stored = self.store(wasm).await?;
        info!("Code ID: {}", stored.code_id);

        let res = self.instantiate(stored.code_id, contract).await;
        let instantiated = match res {
            Ok(r) => r,
            Err(e) => {
                warn!(
                    "{name}: code id {} was stored but could not be instantiated",
                    stored.code_id
                );
                return Err(e);
            }
        };
        info!("Contract Address: {}", instantiated.address);

        Ok(DeployReport {
            contract: name.to_string(),
            code_id: stored.code_id,
            address: instantiated.address,
            store_tx: stored.tx_hash,
            instantiate_tx: instantiated.tx_hash,
        })
    }

    /// Deploys each contract in order, stopping at the first failure.
    pub async fn deploy_all<'a, I>(&self, contracts: I) -> Result<Vec<DeployReport>, DeployError>
    where
        I: IntoIterator<Item = (&'a String, &'a ContractCfg)>,
    {
        let mut reports = vec![];
        for (name, contract) in contracts {
            reports.push(self.deploy(name, contract).await?);
        }
        Ok(reports)
    }
}
