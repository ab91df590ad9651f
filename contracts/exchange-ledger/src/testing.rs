// Test host with Ethereum-style account addresses and real secp256k1 signers.

use std::marker::PhantomData;

use cosmwasm_std::testing::{mock_env, MockApi, MockQuerier, MockStorage};
use cosmwasm_std::{
    Addr, Api, CanonicalAddr, HexBinary, OwnedDeps, RecoverPubkeyError, StdError, StdResult,
    Uint256, VerificationError,
};
use bech32::{ToBase32, Variant};
use k256::ecdsa::SigningKey;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use ledger_orders::{Order, SignedOrder};

use crate::auth::SignerIds;

/// `MockApi` whose human addresses are `0x` + 40 hex digits over 20-byte canonical addresses.
#[derive(Default)]
pub struct EvmMockApi {
    inner: MockApi,
}

impl Api for EvmMockApi {
    fn addr_validate(&self, human: &str) -> StdResult<Addr> {
        let normalized = self.addr_humanize(&self.addr_canonicalize(human)?)?;
        if normalized.as_str() != human {
            return Err(StdError::generic_err("Invalid input: address not normalized"));
        }
        Ok(normalized)
    }

    fn addr_canonicalize(&self, human: &str) -> StdResult<CanonicalAddr> {
        let digits = human
            .strip_prefix("0x")
            .ok_or_else(|| StdError::generic_err("Invalid input: missing 0x prefix"))?;
        let bytes = hex::decode(digits).map_err(|e| StdError::generic_err(e.to_string()))?;
        if bytes.len() != 20 {
            return Err(StdError::generic_err("Invalid input: address must be 20 bytes"));
        }
        Ok(CanonicalAddr::from(bytes))
    }

    fn addr_humanize(&self, canonical: &CanonicalAddr) -> StdResult<Addr> {
        if canonical.as_slice().len() != 20 {
            return Err(StdError::generic_err("Invalid input: address must be 20 bytes"));
        }
        Ok(Addr::unchecked(format!("0x{}", hex::encode(canonical.as_slice()))))
    }

    fn secp256k1_verify(
        &self,
        message_hash: &[u8],
        signature: &[u8],
        public_key: &[u8],
    ) -> Result<bool, VerificationError> {
        self.inner.secp256k1_verify(message_hash, signature, public_key)
    }

    fn secp256k1_recover_pubkey(
        &self,
        message_hash: &[u8],
        signature: &[u8],
        recovery_param: u8,
    ) -> Result<Vec<u8>, RecoverPubkeyError> {
        self.inner
            .secp256k1_recover_pubkey(message_hash, signature, recovery_param)
    }

    fn ed25519_verify(
        &self,
        message: &[u8],
        signature: &[u8],
        public_key: &[u8],
    ) -> Result<bool, VerificationError> {
        self.inner.ed25519_verify(message, signature, public_key)
    }

    fn ed25519_batch_verify(
        &self,
        messages: &[&[u8]],
        signatures: &[&[u8]],
        public_keys: &[&[u8]],
    ) -> Result<bool, VerificationError> {
        self.inner
            .ed25519_batch_verify(messages, signatures, public_keys)
    }

    fn debug(&self, message: &str) {
        self.inner.debug(message)
    }
}

pub type TestDeps = OwnedDeps<MockStorage, EvmMockApi, MockQuerier>;

pub fn mock_dependencies() -> TestDeps {
    OwnedDeps {
        storage: MockStorage::default(),
        api: EvmMockApi::default(),
        querier: MockQuerier::new(&[]),
        custom_query_type: PhantomData,
    }
}

pub struct Signer {
    key: SigningKey,
}

impl Signer {
    pub fn new(seed: u8) -> Self {
        Signer {
            key: SigningKey::from_slice(&[seed; 32]).unwrap(),
        }
    }

    pub fn ids(&self) -> SignerIds {
        let pubkey = self.key.verifying_key().to_encoded_point(false);
        SignerIds::from_pubkey(pubkey.as_bytes()).unwrap()
    }

    /// Ethereum-style address, as understood by [`EvmMockApi`].
    pub fn addr(&self) -> Addr {
        Addr::unchecked(format!("0x{}", hex::encode(self.ids().eth)))
    }

    /// Cosmos SDK account address under the stock `MockApi` prefix.
    pub fn cosmos_addr(&self) -> Addr {
        Addr::unchecked(bech32_addr("cosmwasm", &self.ids().cosmos))
    }

    pub fn sign(&self, order: Order) -> SignedOrder {
        let (signature, recovery_id) = self.key.sign_prehash_recoverable(&order.hash()).unwrap();
        let bytes = signature.to_bytes();
        SignedOrder {
            order,
            v: recovery_id.to_byte() + 27,
            r: HexBinary::from(&bytes[..32]),
            s: HexBinary::from(&bytes[32..]),
        }
    }
}

pub fn bech32_addr(prefix: &str, account: &[u8]) -> String {
    bech32::encode(prefix, account.to_base32(), Variant::Bech32).unwrap()
}

/// 100 uatom offered for 50 ubtc, valid for 1000s past `mock_env()`.
pub fn order_for(maker: &Signer) -> Order {
    Order {
        token_get: "ubtc".to_string(),
        amount_get: Uint256::from(50u128),
        token_give: "uatom".to_string(),
        amount_give: Uint256::from(100u128),
        expires: mock_env().block.time.seconds() + 1000,
        nonce: 1,
        maker: maker.addr(),
    }
}
