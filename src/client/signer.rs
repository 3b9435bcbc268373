use cosmos_sdk_proto::cosmos::crypto::secp256k1::PubKey;
use cosmrs::{AccountId, Any};
use k256::ecdsa::signature::{DigestSigner, Signer as _};
use k256::ecdsa::Signature;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use prost::Message;
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};
use sha3::Keccak256;

use super::error::ClientError;
use crate::config::key::SigningKey;
use crate::config::network::{ChainCfg, KeyScheme};

const COSMOS_PUBKEY_TYPE: &str = "/cosmos.crypto.secp256k1.PubKey";
const ETHERMINT_PUBKEY_TYPE: &str = "/injective.crypto.v1beta1.ethsecp256k1.PubKey";

/// Derived signing identity, bound to one chain's address and signature scheme.
#[derive(Clone)]
pub struct Signer {
    key: k256::ecdsa::SigningKey,
    scheme: KeyScheme,
    account_id: AccountId,
}

impl Signer {
    pub fn new(key: &SigningKey, cfg: &ChainCfg) -> Result<Self, ClientError> {
        let key = key.derive(cfg.coin_type)?;
        let address_bytes = address_bytes(&key, cfg.key_scheme);
        let account_id =
            AccountId::new(&cfg.prefix, &address_bytes).map_err(ClientError::account_id)?;

        Ok(Self {
            key,
            scheme: cfg.key_scheme,
            account_id,
        })
    }

    pub fn account_id(&self) -> &AccountId {
        &self.account_id
    }

    pub fn address(&self) -> String {
        self.account_id.to_string()
    }

    /// Compressed sec1 public key.
    pub fn public_key(&self) -> Vec<u8> {
        self.key
            .verifying_key()
            .to_encoded_point(true)
            .as_bytes()
            .to_vec()
    }

    pub fn public_key_any(&self) -> Any {
        let type_url = match self.scheme {
            KeyScheme::Cosmos => COSMOS_PUBKEY_TYPE,
            KeyScheme::Ethermint => ETHERMINT_PUBKEY_TYPE,
        };

        Any {
            type_url: type_url.to_string(),
            value: PubKey {
                key: self.public_key(),
            }
            .encode_to_vec(),
        }
    }

    /// Signs `sign_doc` bytes, returning the 64 byte `r || s` signature.
    pub fn sign(&self, sign_doc: &[u8]) -> Vec<u8> {
        let sig: Signature = match self.scheme {
            KeyScheme::Cosmos => self.key.sign(sign_doc),
            KeyScheme::Ethermint => self.key.sign_digest(Keccak256::new_with_prefix(sign_doc)),
        };

        sig.to_bytes().to_vec()
    }
}

fn address_bytes(key: &k256::ecdsa::SigningKey, scheme: KeyScheme) -> Vec<u8> {
    let verifying_key = key.verifying_key();
    match scheme {
        KeyScheme::Cosmos => {
            let sha = Sha256::digest(verifying_key.to_encoded_point(true).as_bytes());
            Ripemd160::digest(sha).to_vec()
        }
        KeyScheme::Ethermint => {
            let uncompressed = verifying_key.to_encoded_point(false);
            let hash = Keccak256::digest(&uncompressed.as_bytes()[1..]);
            hash[12..].to_vec()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::network::{Chain, Network};
    use k256::ecdsa::signature::{DigestVerifier, Verifier};

    const PHRASE: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    fn signer(chain: Chain) -> Signer {
        Signer::new(
            &SigningKey::from_mnemonic("deployer", PHRASE),
            &ChainCfg::preset(chain, Network::Testnet),
        )
        .unwrap()
    }

    #[test]
    fn addresses_use_chain_prefix() {
        let inj = signer(Chain::Injective);
        assert!(inj.address().starts_with("inj1"));
        assert_eq!(inj.account_id().to_bytes().len(), 20);

        let orai = signer(Chain::Oraichain);
        assert!(orai.address().starts_with("orai1"));
        assert_eq!(orai.account_id().to_bytes().len(), 20);
    }

    #[test]
    fn derivation_is_deterministic() {
        assert_eq!(signer(Chain::Injective).address(), signer(Chain::Injective).address());
        assert_eq!(signer(Chain::Oraichain).address(), signer(Chain::Oraichain).address());
    }

    #[test]
    fn pubkey_type_follows_scheme() {
        let inj = signer(Chain::Injective).public_key_any();
        assert_eq!(inj.type_url, ETHERMINT_PUBKEY_TYPE);
        let decoded = PubKey::decode(inj.value.as_slice()).unwrap();
        assert_eq!(decoded.key.len(), 33);

        let orai = signer(Chain::Oraichain).public_key_any();
        assert_eq!(orai.type_url, COSMOS_PUBKEY_TYPE);
    }

    #[test]
    fn cosmos_signature_verifies_over_sha256() {
        let s = signer(Chain::Oraichain);
        let doc = b"sign doc bytes";
        let sig = Signature::from_slice(&s.sign(doc)).unwrap();

        assert!(s.key.verifying_key().verify(doc, &sig).is_ok());
        assert!(sig.normalize_s().is_none());
    }

    #[test]
    fn ethermint_signature_verifies_over_keccak() {
        let s = signer(Chain::Injective);
        let doc = b"sign doc bytes";
        let sig = Signature::from_slice(&s.sign(doc)).unwrap();

        assert!(s
            .key
            .verifying_key()
            .verify_digest(Keccak256::new_with_prefix(doc), &sig)
            .is_ok());
        assert!(s.key.verifying_key().verify(doc, &sig).is_err());
    }
}
