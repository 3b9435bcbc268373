use cosmos_sdk_proto::cosmos::auth::v1beta1::query_client::QueryClient as AuthQueryClient;
use cosmos_sdk_proto::cosmos::auth::v1beta1::{BaseAccount, QueryAccountRequest};
use cosmos_sdk_proto::cosmos::bank::v1beta1::query_client::QueryClient as BankQueryClient;
use cosmos_sdk_proto::cosmos::bank::v1beta1::QueryBalanceRequest;
use cosmos_sdk_proto::cosmos::base::v1beta1::Coin;
use cosmos_sdk_proto::cosmos::tx::signing::v1beta1::SignMode;
use cosmos_sdk_proto::cosmos::tx::v1beta1::service_client::ServiceClient;
use cosmos_sdk_proto::cosmos::tx::v1beta1::{
    mode_info, AuthInfo, BroadcastMode, BroadcastTxRequest, Fee, ModeInfo, SignDoc, SignerInfo,
    SimulateRequest, TxBody, TxRaw,
};
use cosmrs::Any;
use log::{debug, info};
use prost::Message;
use tonic::transport::{Channel, ClientTlsConfig, Endpoint};

use super::chain_res::TxReceipt;
use super::error::ClientError;
use super::gas::{fee_amount, gas_limit};
use super::signer::Signer;
use crate::config::network::ChainCfg;

const BASE_ACCOUNT_TYPE: &str = "/cosmos.auth.v1beta1.BaseAccount";
const ETH_ACCOUNT_SUFFIX: &str = ".EthAccount";

/// Injective wraps the sdk base account in its own account type.
#[derive(Clone, PartialEq, Message)]
struct EthAccount {
    #[prost(message, optional, tag = "1")]
    base_account: Option<BaseAccount>,
    #[prost(bytes = "vec", tag = "2")]
    code_hash: Vec<u8>,
}

/// Builds a lazily connected gRPC channel, using TLS for `https` endpoints.
pub fn channel(url: &str) -> Result<Channel, ClientError> {
    let mut endpoint = Endpoint::from_shared(url.to_string()).map_err(|_| ClientError::Endpoint {
        url: url.to_string(),
    })?;

    if url.starts_with("https://") {
        endpoint = endpoint.tls_config(ClientTlsConfig::new())?;
    }

    Ok(endpoint.connect_lazy())
}

/// Simulates `msg`, then signs and broadcasts it with the adjusted gas limit.
/// Returns as soon as the node accepted the tx into its mempool.
pub async fn send_tx(
    channel: &Channel,
    msg: Any,
    signer: &Signer,
    cfg: &ChainCfg,
) -> Result<TxReceipt, ClientError> {
    let account = account(channel, &signer.address()).await?;

    let body_bytes = TxBody {
        messages: vec![msg],
        ..Default::default()
    }
    .encode_to_vec();

    info!("Simulating transaction........");
    let fee = simulate_gas_fee(channel, &body_bytes, &account, signer, cfg).await?;
    let gas_limit = fee.gas_limit;
    debug!("fee: {:?}", fee);

    // NOTE: sequence is read fresh for every tx, concurrent sends with the same key will collide
    let tx_bytes = sign_tx(body_bytes, &account, fee, signer, &cfg.chain_id);

    info!("Broadcasting transaction........");
    let res = ServiceClient::new(channel.clone())
        .broadcast_tx(BroadcastTxRequest {
            tx_bytes,
            mode: BroadcastMode::Sync as i32,
        })
        .await?
        .into_inner()
        .tx_response
        .ok_or(ClientError::MissingTxResponse)?;

    if res.code != 0 {
        return Err(ClientError::TxRejected {
            tx_hash: res.txhash,
            code: res.code,
            log: res.raw_log,
        });
    }

    debug!("broadcast tx {}", res.txhash);

    Ok(TxReceipt {
        tx_hash: res.txhash,
        gas_limit,
    })
}

pub async fn account(channel: &Channel, address: &str) -> Result<BaseAccount, ClientError> {
    let res = AuthQueryClient::new(channel.clone())
        .account(QueryAccountRequest {
            address: address.to_string(),
        })
        .await?
        .into_inner()
        .account
        .ok_or_else(|| ClientError::AccountNotFound {
            address: address.to_string(),
        })?;

    decode_account(&res)
}

fn decode_account(account: &Any) -> Result<BaseAccount, ClientError> {
    if account.type_url == BASE_ACCOUNT_TYPE {
        return BaseAccount::decode(account.value.as_slice()).map_err(ClientError::proto_decoding);
    }

    if account.type_url.ends_with(ETH_ACCOUNT_SUFFIX) {
        let eth = EthAccount::decode(account.value.as_slice())
            .map_err(ClientError::proto_decoding)?;
        return eth.base_account.ok_or_else(|| ClientError::AccountType {
            type_url: account.type_url.clone(),
        });
    }

    Err(ClientError::AccountType {
        type_url: account.type_url.clone(),
    })
}

/// Balance of `address` in `denom` base units, zero when the account holds none.
///
/// An amount the node returns that is not an integer is a `ClientError::InvalidAmount`.
pub async fn balance(channel: &Channel, address: &str, denom: &str) -> Result<u128, ClientError> {
    let coin = BankQueryClient::new(channel.clone())
        .balance(QueryBalanceRequest {
            address: address.to_string(),
            denom: denom.to_string(),
        })
        .await?
        .into_inner()
        .balance;

    coin_amount(coin)
}

fn coin_amount(coin: Option<Coin>) -> Result<u128, ClientError> {
    match coin {
        Some(c) => c
            .amount
            .parse()
            .map_err(|_| ClientError::InvalidAmount { amount: c.amount }),
        None => Ok(0),
    }
}

async fn simulate_gas_fee(
    channel: &Channel,
    body_bytes: &[u8],
    account: &BaseAccount,
    signer: &Signer,
    cfg: &ChainCfg,
) -> Result<Fee, ClientError> {
    let zero_fee = Fee {
        amount: vec![Coin {
            denom: cfg.denom.clone(),
            amount: "0".to_string(),
        }],
        gas_limit: 0,
        ..Default::default()
    };

    let tx_bytes = sign_tx(body_bytes.to_vec(), account, zero_fee, signer, &cfg.chain_id);

    let gas_info = ServiceClient::new(channel.clone())
        .simulate(SimulateRequest {
            tx_bytes,
            ..Default::default()
        })
        .await?
        .into_inner()
        .gas_info
        .ok_or(ClientError::MissingGasInfo)?;

    let gas_limit = gas_limit(gas_info.gas_used, cfg.gas_adjustment);
    let amount = fee_amount(gas_limit, cfg.gas_prices);

    debug!(
        "simulated gas used {}, gas limit {}",
        gas_info.gas_used, gas_limit
    );

    Ok(Fee {
        amount: vec![Coin {
            denom: cfg.denom.clone(),
            amount: amount.to_string(),
        }],
        gas_limit,
        ..Default::default()
    })
}

fn sign_tx(
    body_bytes: Vec<u8>,
    account: &BaseAccount,
    fee: Fee,
    signer: &Signer,
    chain_id: &str,
) -> Vec<u8> {
    let auth_info_bytes = AuthInfo {
        signer_infos: vec![SignerInfo {
            public_key: Some(signer.public_key_any()),
            mode_info: Some(ModeInfo {
                sum: Some(mode_info::Sum::Single(mode_info::Single {
                    mode: SignMode::Direct as i32,
                })),
            }),
            sequence: account.sequence,
        }],
        fee: Some(fee),
        ..Default::default()
    }
    .encode_to_vec();

    let sign_doc = SignDoc {
        body_bytes: body_bytes.clone(),
        auth_info_bytes: auth_info_bytes.clone(),
        chain_id: chain_id.to_string(),
        account_number: account.account_number,
    };

    let signature = signer.sign(&sign_doc.encode_to_vec());

    TxRaw {
        body_bytes,
        auth_info_bytes,
        signatures: vec![signature],
    }
    .encode_to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::key::SigningKey;
    use crate::config::network::{Chain, Network};
    use assert_matches::assert_matches;

    fn base_account() -> BaseAccount {
        BaseAccount {
            address: "inj1test".to_string(),
            pub_key: None,
            account_number: 7,
            sequence: 3,
        }
    }

    #[test]
    fn decodes_base_account() {
        let any = Any {
            type_url: BASE_ACCOUNT_TYPE.to_string(),
            value: base_account().encode_to_vec(),
        };
        assert_eq!(decode_account(&any).unwrap(), base_account());
    }

    #[test]
    fn decodes_injective_eth_account() {
        let any = Any {
            type_url: "/injective.types.v1beta1.EthAccount".to_string(),
            value: EthAccount {
                base_account: Some(base_account()),
                code_hash: vec![1, 2, 3],
            }
            .encode_to_vec(),
        };
        assert_eq!(decode_account(&any).unwrap(), base_account());
    }

    #[test]
    fn rejects_unknown_account_type() {
        let any = Any {
            type_url: "/cosmos.vesting.v1beta1.DelayedVestingAccount".to_string(),
            value: vec![],
        };
        assert_matches!(decode_account(&any), Err(ClientError::AccountType { .. }));
    }

    #[test]
    fn signed_tx_carries_fee_and_sequence() {
        let cfg = ChainCfg::preset(Chain::Oraichain, Network::Testnet);
        let signer = Signer::new(
            &SigningKey::from_mnemonic(
                "deployer",
                "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about",
            ),
            &cfg,
        )
        .unwrap();

        let body = TxBody::default().encode_to_vec();
        let fee = Fee {
            gas_limit: 1300,
            ..Default::default()
        };
        let tx_bytes = sign_tx(body.clone(), &base_account(), fee, &signer, &cfg.chain_id);
        let raw = TxRaw::decode(tx_bytes.as_slice()).unwrap();

        assert_eq!(raw.body_bytes, body);
        assert_eq!(raw.signatures.len(), 1);
        assert_eq!(raw.signatures[0].len(), 64);

        let auth = AuthInfo::decode(raw.auth_info_bytes.as_slice()).unwrap();
        assert_eq!(auth.fee.unwrap().gas_limit, 1300);
        assert_eq!(auth.signer_infos[0].sequence, 3);
    }

    #[test]
    fn balance_amounts() {
        let coin = |amount: &str| Coin {
            denom: "orai".to_string(),
            amount: amount.to_string(),
        };

        assert_eq!(coin_amount(None).unwrap(), 0);
        assert_eq!(
            coin_amount(Some(coin("25000000000000000000"))).unwrap(),
            25_000_000_000_000_000_000
        );
        assert_matches!(
            coin_amount(Some(coin("12.5"))),
            Err(ClientError::InvalidAmount { amount }) if amount == "12.5"
        );
        assert_matches!(
            coin_amount(Some(coin(""))),
            Err(ClientError::InvalidAmount { .. })
        );
    }

    #[test]
    fn channel_rejects_garbage_url() {
        assert_matches!(channel("not a url"), Err(ClientError::Endpoint { .. }));
    }
}
