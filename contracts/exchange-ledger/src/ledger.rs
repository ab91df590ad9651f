use cosmwasm_std::{Addr, Storage, Uint256, Uint512};
use ledger_orders::Order;

use crate::error::ContractError;
use crate::state::{deposit_amount, set_deposit_amount};

/// `a * b / c` with floor division and a 512-bit intermediate product.
pub fn mul_div_floor(a: Uint256, b: Uint256, c: Uint256) -> Result<Uint256, ContractError> {
    let quotient = Uint512::from(a)
        .checked_mul(Uint512::from(b))?
        .checked_div(Uint512::from(c))?;
    Ok(Uint256::try_from(quotient)?)
}

/// Like [`mul_div_floor`] but clamps at `Uint256::MAX`, for capacities that only feed a `min`.
fn mul_div_floor_saturating(a: Uint256, b: Uint256, c: Uint256) -> Result<Uint256, ContractError> {
    match mul_div_floor(a, b, c) {
        Err(ContractError::ConversionOverflow(_)) => Ok(Uint256::MAX),
        other => other,
    }
}

/// Amount of `token_give` owed for `deal` units of `token_get`.
pub fn give_for_deal(order: &Order, deal: Uint256) -> Result<Uint256, ContractError> {
    mul_div_floor(order.amount_give, deal, order.amount_get)
}

/// Largest fill of `token_get` the taker, the order and the maker can all honour.
pub fn compute_deal(
    order: &Order,
    filled_amount: Uint256,
    taker_get_balance: Uint256,
    maker_give_balance: Uint256,
    requested: Uint256,
) -> Result<Uint256, ContractError> {
    let taker_capacity = requested.min(taker_get_balance);
    let remaining = order.amount_get.checked_sub(filled_amount)?;
    let maker_capacity =
        mul_div_floor_saturating(maker_give_balance, order.amount_get, order.amount_give)?;
    Ok(taker_capacity.min(remaining).min(maker_capacity))
}

pub fn credit(
    storage: &mut dyn Storage,
    user: &Addr,
    token: &str,
    amount: Uint256,
) -> Result<Uint256, ContractError> {
    let balance = deposit_amount(storage, user, token)?.checked_add(amount)?;
    set_deposit_amount(storage, user, token, balance)?;
    Ok(balance)
}

pub fn debit(
    storage: &mut dyn Storage,
    user: &Addr,
    token: &str,
    amount: Uint256,
) -> Result<Uint256, ContractError> {
    let balance = deposit_amount(storage, user, token)?
        .checked_sub(amount)
        .map_err(|_| ContractError::InsufficientBalance {})?;
    set_deposit_amount(storage, user, token, balance)?;
    Ok(balance)
}

/// Four-way settlement of one fill. Every leg re-reads storage so a self-trade nets out.
pub fn exchange(
    storage: &mut dyn Storage,
    maker: &Addr,
    taker: &Addr,
    order: &Order,
    deal: Uint256,
) -> Result<(), ContractError> {
    let give = give_for_deal(order, deal)?;

    credit(storage, taker, &order.token_give, give)?;
    debit(storage, taker, &order.token_get, deal)?;
    credit(storage, maker, &order.token_get, deal)?;
    debit(storage, maker, &order.token_give, give)?;
    Ok(())
}
