// Signed limit orders shared by the exchange ledger contract and off-chain signers

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, HexBinary, Uint256};
use sha3::{Digest, Keccak256};
use thiserror::Error;

/// Keccak-256 of an order's canonical encoding. Key of the fill state.
pub type OrderHash = [u8; 32];

#[derive(Error, Debug, PartialEq, Eq)]
pub enum OrderError {
    #[error("order format error: tokenGive == tokenGet")]
    SameToken,

    #[error("order format error: amountGet <= 0")]
    ZeroAmountGet,

    #[error("order format error: amountGive <= 0")]
    ZeroAmountGive,

    #[error("order format error: invalid token {0}")]
    InvalidToken(String),

    #[error("order error: order expired")]
    Expired,
}

#[cw_serde]
pub struct Order {
    /// Token the maker wants to receive
    pub token_get: String,
    /// Total amount of `token_get` the order can absorb
    pub amount_get: Uint256,
    /// Token the maker pays out
    pub token_give: String,
    /// Amount of `token_give` paid for the whole `amount_get`
    pub amount_give: Uint256,
    /// Unix seconds; the order is dead at and after this instant
    pub expires: u64,
    /// Distinguishes orders with identical terms
    pub nonce: u64,
    /// Signer and owner of the escrowed `token_give`
    pub maker: Addr,
}

impl Order {
    /// Byte-exact encoding signed by makers. Field order and quoting are fixed.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        format!(
            r#"{{"amountGet":"{}","amountGive":"{}","expires":"{}","nonce":{},"tokenGet":"{}","tokenGive":"{}","maker":"{}"}}"#,
            self.amount_get,
            self.amount_give,
            self.expires,
            self.nonce,
            self.token_get,
            self.token_give,
            self.maker,
        )
        .into_bytes()
    }

    pub fn hash(&self) -> OrderHash {
        Keccak256::digest(self.canonical_bytes()).into()
    }

    /// Field invariants that do not depend on time.
    pub fn check_format(&self) -> Result<(), OrderError> {
        if self.token_give == self.token_get {
            return Err(OrderError::SameToken);
        }
        if self.amount_get.is_zero() {
            return Err(OrderError::ZeroAmountGet);
        }
        if self.amount_give.is_zero() {
            return Err(OrderError::ZeroAmountGive);
        }
        for token in [&self.token_get, &self.token_give] {
            if !is_valid_denom(token) {
                return Err(OrderError::InvalidToken(token.clone()));
            }
        }
        Ok(())
    }

    pub fn is_expired(&self, now: u64) -> bool {
        self.expires <= now
    }

    pub fn validate(&self, now: u64) -> Result<(), OrderError> {
        self.check_format()?;
        if self.is_expired(now) {
            return Err(OrderError::Expired);
        }
        Ok(())
    }
}

#[cw_serde]
pub struct SignedOrder {
    pub order: Order,
    /// Recovery id, either 0/1 or 27/28
    pub v: u8,
    pub r: HexBinary,
    pub s: HexBinary,
}

impl SignedOrder {
    /// `r || s` and the normalized recovery id, or `None` when malformed.
    pub fn signature(&self) -> Option<([u8; 64], u8)> {
        if self.r.len() != 32 || self.s.len() != 32 {
            return None;
        }
        let recovery_param = match self.v {
            0 | 1 => self.v,
            27 | 28 => self.v - 27,
            _ => return None,
        };
        let mut sig = [0u8; 64];
        sig[..32].copy_from_slice(self.r.as_slice());
        sig[32..].copy_from_slice(self.s.as_slice());
        Some((sig, recovery_param))
    }
}

/// Bank denom grammar: `[a-zA-Z][a-zA-Z0-9/:._-]{2,127}`.
pub fn is_valid_denom(denom: &str) -> bool {
    let bytes = denom.as_bytes();
    if bytes.len() < 3 || bytes.len() > 128 {
        return false;
    }
    bytes[0].is_ascii_alphabetic()
        && bytes[1..]
            .iter()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'/' | b':' | b'.' | b'_' | b'-'))
}

/// Keccak-256, exposed for signer-address derivation.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}
