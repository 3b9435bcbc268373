use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::Path;

use cosm_deploy::client::cosmwasm::{CosmWasmClient, WasmChain};
use cosm_deploy::client::tx_lookup::ChainTxLookup;
use cosm_deploy::config::cfg::{parse_coins, Config, ContractCfg};
use cosm_deploy::orchestrator::contract::ContractSdk;
use cosm_deploy::orchestrator::deploy::{DeployOpts, DeploySummary, Deployer};
use cosm_deploy::util::amount::format_amount;

/// Upload, instantiate, execute and query Cosmwasm contracts on Injective and Oraichain.
///
/// NETWORK, MNEMONIC and CHAIN are read from the environment (or `.env`).
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Yaml file with endpoint overrides and the contracts to deploy
    #[clap(short, long, env = "DEPLOY_CONFIG")]
    config: Option<String>,

    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Store and instantiate contracts, all configured ones when none are named
    Deploy {
        contracts: Vec<String>,

        /// Write `<chain_id>_deployment.json` to the current directory
        #[clap(long)]
        report: bool,
    },

    /// Smart query a deployed contract
    Query { address: String, msg: String },

    /// Execute a message on a deployed contract
    Execute {
        address: String,
        msg: String,

        /// Comma separated coins, e.g. `1000inj,5peggy0xabc`
        #[clap(long)]
        funds: Option<String>,
    },

    /// Print the signer address and its balance
    Balance,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let args = Args::parse();
    let cfg = Config::load(args.config.as_deref()).context("loading config")?;

    // no network round trip happens before the key is known to be there
    let key = cfg.signing_key()?;
    let chain_cfg = cfg.chain_cfg()?;
    let client = CosmWasmClient::new(chain_cfg.clone(), &key)?;
    let lookup = ChainTxLookup::new(&chain_cfg);

    match args.command.unwrap_or(Command::Deploy {
        contracts: vec![],
        report: false,
    }) {
        Command::Deploy { contracts, report } => {
            print_balance(&client).await?;

            let selected = select_contracts(&cfg, &contracts)?;
            let deployer = Deployer::new(client, lookup, DeployOpts::new(&cfg, &chain_cfg));

            let reports = deployer.deploy_all(selected).await?;
            for r in &reports {
                println!("{}", r.contract);
                println!("Code ID: {}", r.code_id);
                println!("Contract Address: {}", r.address);
            }

            if report {
                let summary = DeploySummary {
                    chain_id: chain_cfg.chain_id.clone(),
                    network: chain_cfg.network,
                    deployer: deployer.chain().sender(),
                    contracts: reports,
                };
                let path = summary.write_to_json(Path::new("."))?;
                println!("Report: {}", path.display());
            }
        }

        Command::Query { address, msg } => {
            let msg: Value = serde_json::from_str(&msg).context("query msg is not json")?;
            let sdk = ContractSdk::new(client, lookup, cfg.tx_timeout(), cfg.tx_poll_interval());

            let res: Value = sdk.query(&address, &msg).await?;
            println!("{}", serde_json::to_string_pretty(&res)?);
        }

        Command::Execute {
            address,
            msg,
            funds,
        } => {
            let msg: Value = serde_json::from_str(&msg).context("execute msg is not json")?;
            let funds = parse_coins(funds.as_deref().unwrap_or_default())?;
            let sdk = ContractSdk::new(client, lookup, cfg.tx_timeout(), cfg.tx_poll_interval());

            let res = sdk.execute(&address, &msg, funds).await?;
            println!("Tx Hash: {}", res.tx_hash);
        }

        Command::Balance => print_balance(&client).await?,
    }

    Ok(())
}

async fn print_balance(client: &CosmWasmClient) -> Result<()> {
    let cfg = client.cfg();
    println!("Address: {}", client.sender());

    let balance = client.balance().await?;
    println!(
        "Balance: {} {}",
        format_amount(balance, cfg.decimals),
        cfg.denom
    );
    Ok(())
}

fn select_contracts<'a>(
    cfg: &'a Config,
    names: &'a [String],
) -> Result<Vec<(&'a String, &'a ContractCfg)>> {
    if names.is_empty() {
        return Ok(cfg.contracts.iter().collect());
    }

    names
        .iter()
        .map(|name| Ok((name, cfg.contract(name)?)))
        .collect()
}
