use std::fmt;

use crate::client::error::ClientError;

#[derive(Clone)]
pub struct SigningKey {
    /// human readable key name
    pub name: String,
    /// private key associated with `name`
    pub key: Key,
}

#[derive(Clone)]
pub enum Key {
    /// Mnemonic allows you to pass the private key mnemonic words
    /// to cosm-deploy for configuring a transaction signing key.
    Mnemonic(String),
}

// Never print the secret.
impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl SigningKey {
    pub fn from_mnemonic<S: Into<String>>(name: S, phrase: S) -> Self {
        Self {
            name: name.into(),
            key: Key::Mnemonic(phrase.into()),
        }
    }

    /// Derives the secp256k1 key at the first account of `coin_type`.
    pub fn derive(&self, coin_type: u32) -> Result<k256::ecdsa::SigningKey, ClientError> {
        match &self.key {
            Key::Mnemonic(phrase) => {
                // 12, 15, 18, 21 and 24 word phrases are all valid
                let seed = bip39::Mnemonic::parse_in_normalized(
                    bip39::Language::English,
                    phrase.trim(),
                )
                .map_err(|_| ClientError::Mnemonic)?
                .to_seed("");

                let path: bip32::DerivationPath = derivation_path(coin_type)
                    .parse()
                    .map_err(|_| ClientError::DerivationPath)?;

                let xprv = bip32::XPrv::derive_from_path(seed, &path)
                    .map_err(|_| ClientError::DerivationPath)?;

                Ok(xprv.private_key().clone())
            }
        }
    }
}

// https://github.com/confio/cosmos-hd-key-derivation-spec#the-cosmos-hub-path
pub fn derivation_path(coin_type: u32) -> String {
    format!("m/44'/{coin_type}'/0'/0/0")
}
