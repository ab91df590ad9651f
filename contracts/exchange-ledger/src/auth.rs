use bech32::FromBase32;
use cosmwasm_std::{Addr, Api};
use ledger_orders::{keccak256, OrderHash, SignedOrder};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

use crate::error::ContractError;

/// 20-byte account ids a recovered secp256k1 key can stand for.
#[derive(Debug, PartialEq, Eq)]
pub struct SignerIds {
    /// Cosmos SDK `ripemd160(sha256(compressed key))`
    pub cosmos: [u8; 20],
    /// Ethereum-style `keccak256(uncompressed key)[12..]`, used by ethsecp256k1 chains
    pub eth: [u8; 20],
}

impl SignerIds {
    /// Takes the 65-byte uncompressed key returned by the host recovery call.
    pub fn from_pubkey(pubkey: &[u8]) -> Option<Self> {
        if pubkey.len() != 65 || pubkey[0] != 0x04 {
            return None;
        }

        let mut compressed = [0u8; 33];
        compressed[0] = 0x02 | (pubkey[64] & 1);
        compressed[1..].copy_from_slice(&pubkey[1..33]);
        let cosmos: [u8; 20] = Ripemd160::digest(Sha256::digest(compressed)).into();

        let mut eth = [0u8; 20];
        eth.copy_from_slice(&keccak256(&pubkey[1..])[12..]);

        Some(SignerIds { cosmos, eth })
    }

    pub fn matches(&self, account: &[u8]) -> bool {
        account == self.cosmos.as_slice() || account == self.eth.as_slice()
    }
}

/// Raw account bytes behind a maker address. Bech32 makers are decoded directly,
/// anything else goes through the host's canonical form.
fn maker_account(api: &dyn Api, maker: &str) -> Option<Vec<u8>> {
    if let Ok((_, data, _)) = bech32::decode(maker) {
        return Vec::<u8>::from_base32(&data).ok();
    }
    api.addr_canonicalize(maker)
        .ok()
        .map(|canonical| canonical.as_slice().to_vec())
}

/// Recovers the signer of `hash` and binds it to `order.maker`.
///
/// Returns the maker address as normalized by the host, which is the key of the
/// maker's escrowed balances.
pub fn authenticate(
    api: &dyn Api,
    signed_order: &SignedOrder,
    hash: &OrderHash,
) -> Result<Addr, ContractError> {
    let (signature, recovery_param) = signed_order
        .signature()
        .ok_or(ContractError::SignatureInvalid {})?;
    let pubkey = api
        .secp256k1_recover_pubkey(hash, &signature, recovery_param)
        .map_err(|_| ContractError::SignatureInvalid {})?;
    let signer = SignerIds::from_pubkey(&pubkey).ok_or(ContractError::SignatureInvalid {})?;

    let maker = signed_order.order.maker.as_str();
    match maker_account(api, maker) {
        Some(account) if signer.matches(&account) => {}
        _ => return Err(ContractError::SignatureInvalid {}),
    }
    Ok(api.addr_humanize(&api.addr_canonicalize(maker)?)?)
}
