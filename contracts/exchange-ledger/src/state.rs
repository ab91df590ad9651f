use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, StdResult, Storage, Uint256};
use cw_storage_plus::Map;

#[cw_serde]
#[derive(Default)]
pub struct OrderState {
    /// Set once by the maker, never cleared
    pub is_cancel: bool,
    /// Cumulative `amount_get` already settled
    pub filled_amount: Uint256,
}

impl OrderState {
    pub fn is_finished(&self, amount_get: Uint256) -> bool {
        self.filled_amount >= amount_get
    }
}

/// Escrowed balance keyed by (user, token)
pub const DEPOSITS: Map<(&Addr, &str), Uint256> = Map::new("dps");

/// Fill state keyed by order hash
pub const ORDER_STATES: Map<&[u8], OrderState> = Map::new("st");

pub fn deposit_amount(storage: &dyn Storage, user: &Addr, token: &str) -> StdResult<Uint256> {
    Ok(DEPOSITS.may_load(storage, (user, token))?.unwrap_or_default())
}

pub fn set_deposit_amount(
    storage: &mut dyn Storage,
    user: &Addr,
    token: &str,
    amount: Uint256,
) -> StdResult<()> {
    DEPOSITS.save(storage, (user, token), &amount)
}

pub fn order_state(storage: &dyn Storage, hash: &[u8]) -> StdResult<OrderState> {
    Ok(ORDER_STATES.may_load(storage, hash)?.unwrap_or_default())
}

pub fn set_order_state(storage: &mut dyn Storage, hash: &[u8], state: &OrderState) -> StdResult<()> {
    ORDER_STATES.save(storage, hash, state)
}
