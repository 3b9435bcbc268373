pub mod chain_res;

pub mod cosmos;

pub mod cosmwasm;

pub mod error;

pub mod gas;

pub mod signer;

pub mod tx_lookup;
