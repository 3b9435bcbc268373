//! Cosmwasm smart contract deployment tool for Injective and Oraichain
//!
//! Upload, instantiate, execute, and query [Cosmwasm] smart contracts with a
//! key derived from a mnemonic. Every upload is simulated first, its fee is
//! derived from the simulated gas times the gas adjustment, and the code id and
//! contract address are read back from the committed tx record's events.
//!
//! [cosmwasm]: https://github.com/CosmWasm/cosmwasm
//!
//! # Quick Start
//!
//! ```no_run
//! use cosm_deploy::client::cosmwasm::CosmWasmClient;
//! use cosm_deploy::client::tx_lookup::ChainTxLookup;
//! use cosm_deploy::config::cfg::Config;
//! use cosm_deploy::orchestrator::deploy::{DeployOpts, Deployer};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! // NETWORK, MNEMONIC and CHAIN come from the environment
//! let cfg = Config::load(Some("deploy.yaml"))?;
//! let chain = cfg.chain_cfg()?;
//!
//! let client = CosmWasmClient::new(chain.clone(), &cfg.signing_key()?)?;
//! let deployer = Deployer::new(client, ChainTxLookup::new(&chain), DeployOpts::new(&cfg, &chain));
//!
//! let report = deployer.deploy("tier", cfg.contract("tier")?).await?;
//! println!("Code ID: {}", report.code_id);
//! println!("Contract Address: {}", report.address);
//! # Ok(())
//! # }
//! ```

pub mod client;

pub mod config;

pub mod orchestrator;

pub mod util;
