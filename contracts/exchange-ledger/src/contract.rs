use std::fmt;

use cosmwasm_std::{
    entry_point, to_json_binary, Addr, BankMsg, Binary, Coin, Deps, DepsMut, Env, HexBinary,
    MessageInfo, Response, Uint128, Uint256,
};
use cw2::set_contract_version;
use ledger_orders::{Order, OrderHash, SignedOrder};

use crate::auth::authenticate;
use crate::error::ContractError;
use crate::ledger::{compute_deal, credit, exchange};
use crate::msg::{
    AmountResponse, ExecuteMsg, InstantiateMsg, OrderHashResponse, OrderStateResponse, QueryMsg,
    TestTradeResponse,
};
use crate::state::{deposit_amount, order_state, set_deposit_amount, set_order_state, OrderState};

const CONTRACT_NAME: &str = "crates.io:exchange-ledger";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    _msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    Ok(Response::new().add_attribute("method", "instantiate"))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::PostOrder { signed_order } => {
            execute_post_order(deps, env, info, signed_order)
        }
        ExecuteMsg::Trade {
            signed_order,
            amount,
        } => execute_trade(deps, env, info, signed_order, amount),
        ExecuteMsg::CancelOrder { signed_order } => {
            execute_cancel_order(deps, env, info, signed_order)
        }
        ExecuteMsg::Deposit {} => execute_deposit(deps, info),
        ExecuteMsg::Withdraw { token, amount } => execute_withdraw(deps, info, token, amount),
        ExecuteMsg::TestTrade { order, amount } => {
            execute_test_trade(deps.as_ref(), env, info, order, amount)
        }
    }
}

fn nonpayable(info: &MessageInfo) -> Result<(), ContractError> {
    if !info.funds.is_empty() {
        return Err(ContractError::NonPayable {});
    }
    Ok(())
}

/// Format, expiry and signature checks shared by every order entry point.
/// Returns the order hash and the normalized maker address.
fn check_signed_order(
    deps: Deps,
    env: &Env,
    signed_order: &SignedOrder,
) -> Result<(OrderHash, Addr), ContractError> {
    signed_order.order.validate(env.block.time.seconds())?;
    let hash = signed_order.order.hash();
    let maker = authenticate(deps.api, signed_order, &hash)?;
    Ok((hash, maker))
}

fn ensure_open(state: &OrderState, order: &Order) -> Result<(), ContractError> {
    if state.is_finished(order.amount_get) {
        return Err(ContractError::OrderFinished {});
    }
    if state.is_cancel {
        return Err(ContractError::OrderCancelled {});
    }
    Ok(())
}

pub fn execute_post_order(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    signed_order: SignedOrder,
) -> Result<Response, ContractError> {
    nonpayable(&info)?;
    let (hash, maker) = check_signed_order(deps.as_ref(), &env, &signed_order)?;
    let state = order_state(deps.storage, &hash)?;
    ensure_open(&state, &signed_order.order)?;

    let order = &signed_order.order;
    Ok(Response::new()
        .set_data(to_json_binary(&signed_order)?)
        .add_attribute("method", "post_order")
        .add_attribute("hash", hex::encode(hash))
        .add_attribute("maker", maker.as_str())
        .add_attribute("token_get", order.token_get.as_str())
        .add_attribute("amount_get", order.amount_get.to_string())
        .add_attribute("token_give", order.token_give.as_str())
        .add_attribute("amount_give", order.amount_give.to_string())
        .add_attribute("expires", order.expires.to_string())
        .add_attribute("nonce", order.nonce.to_string())
        .add_attribute("v", signed_order.v.to_string())
        .add_attribute("r", signed_order.r.to_hex())
        .add_attribute("s", signed_order.s.to_hex()))
}

pub fn execute_trade(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    signed_order: SignedOrder,
    amount: Uint256,
) -> Result<Response, ContractError> {
    nonpayable(&info)?;
    let (hash, maker) = check_signed_order(deps.as_ref(), &env, &signed_order)?;
    let order = &signed_order.order;

    let mut state = order_state(deps.storage, &hash)?;
    ensure_open(&state, order)?;

    let taker = info.sender;
    let deal = compute_deal(
        order,
        state.filled_amount,
        deposit_amount(deps.storage, &taker, &order.token_get)?,
        deposit_amount(deps.storage, &maker, &order.token_give)?,
        amount,
    )?;
    if deal.is_zero() {
        return Err(ContractError::NoLiquidity {});
    }

    let filled = state.filled_amount.checked_add(deal)?;
    if filled > order.amount_get {
        return Err(ContractError::OrderFinished {});
    }

    exchange(deps.storage, &maker, &taker, order, deal)?;

    state.filled_amount = filled;
    set_order_state(deps.storage, &hash, &state)?;

    Ok(Response::new()
        .add_attribute("method", "trade")
        .add_attribute("filled", state.filled_amount.to_string())
        .add_attribute("deal", deal.to_string())
        .add_attribute("taker", taker)
        .add_attribute("hash", hex::encode(hash)))
}

pub fn execute_cancel_order(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    signed_order: SignedOrder,
) -> Result<Response, ContractError> {
    nonpayable(&info)?;
    let (hash, maker) = check_signed_order(deps.as_ref(), &env, &signed_order)?;

    // a leaked signature must not let third parties cancel
    if info.sender != maker {
        return Err(ContractError::Unauthorized {});
    }

    let mut state = order_state(deps.storage, &hash)?;
    state.is_cancel = true;
    set_order_state(deps.storage, &hash, &state)?;

    Ok(Response::new()
        .add_attribute("method", "cancel_order")
        .add_attribute("hash", hex::encode(hash)))
}

pub fn execute_deposit(deps: DepsMut, info: MessageInfo) -> Result<Response, ContractError> {
    let mut credited = 0;
    let mut res = Response::new()
        .add_attribute("method", "deposit")
        .add_attribute("user", info.sender.as_str());
    for coin in &info.funds {
        if coin.amount.is_zero() {
            continue;
        }
        credit(deps.storage, &info.sender, &coin.denom, Uint256::from(coin.amount))?;
        credited += 1;
        res = res
            .add_attribute("token", coin.denom.as_str())
            .add_attribute("amount", coin.amount.to_string());
    }
    if credited == 0 {
        return Err(ContractError::EmptyDeposit {});
    }
    Ok(res)
}

pub fn execute_withdraw(
    deps: DepsMut,
    info: MessageInfo,
    token: String,
    amount: Uint256,
) -> Result<Response, ContractError> {
    nonpayable(&info)?;

    let balance = deposit_amount(deps.storage, &info.sender, &token)?;
    if amount.is_zero() || amount > balance {
        return Err(ContractError::InsufficientBalance {});
    }
    let payout = Uint128::try_from(amount)?;

    // ledger first, the bank send runs after this message returns
    set_deposit_amount(deps.storage, &info.sender, &token, balance.checked_sub(amount)?)?;

    Ok(Response::new()
        .add_message(BankMsg::Send {
            to_address: info.sender.to_string(),
            amount: vec![Coin {
                denom: token.clone(),
                amount: payout,
            }],
        })
        .add_attribute("method", "withdraw")
        .add_attribute("user", info.sender)
        .add_attribute("token", token)
        .add_attribute("amount", amount.to_string()))
}

pub fn execute_test_trade(
    deps: Deps,
    env: Env,
    info: MessageInfo,
    order: Order,
    amount: Uint256,
) -> Result<Response, ContractError> {
    nonpayable(&info)?;
    let check = check_trade(deps, &env, &order, &info.sender, amount)?;

    Ok(Response::new()
        .set_data(to_json_binary(&check.to_response())?)
        .add_attribute("method", "test_trade")
        .add_attribute("result", check.to_string()))
}

/// Outcome of a dry-run fill.
#[derive(Debug, PartialEq, Eq)]
pub enum TradeCheck {
    FormatError,
    Expired,
    Cancelled,
    ZeroDeal,
    Executable(Uint256),
}

impl TradeCheck {
    fn to_response(&self) -> TestTradeResponse {
        let deal = match self {
            TradeCheck::Executable(deal) => *deal,
            _ => Uint256::zero(),
        };
        TestTradeResponse {
            success: matches!(self, TradeCheck::Executable(_)),
            result: self.to_string(),
            deal,
        }
    }
}

impl fmt::Display for TradeCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeCheck::FormatError => f.write_str("fail: order format error"),
            TradeCheck::Expired => f.write_str("fail: order is expired"),
            TradeCheck::Cancelled => f.write_str("fail: order is canceled"),
            TradeCheck::ZeroDeal => f.write_str("fail: deal amount is zero"),
            TradeCheck::Executable(_) => f.write_str("success: this transaction can be executed"),
        }
    }
}

/// Runs the feasibility part of `trade` without signature checks or writes.
pub fn check_trade(
    deps: Deps,
    env: &Env,
    order: &Order,
    taker: &Addr,
    amount: Uint256,
) -> Result<TradeCheck, ContractError> {
    if order.check_format().is_err() {
        return Ok(TradeCheck::FormatError);
    }
    if order.is_expired(env.block.time.seconds()) {
        return Ok(TradeCheck::Expired);
    }
    let state = order_state(deps.storage, &order.hash())?;
    if state.is_cancel {
        return Ok(TradeCheck::Cancelled);
    }

    // balances live under the host-normalized maker address
    let maker = deps
        .api
        .addr_canonicalize(order.maker.as_str())
        .and_then(|canonical| deps.api.addr_humanize(&canonical))
        .unwrap_or_else(|_| order.maker.clone());

    let deal = compute_deal(
        order,
        state.filled_amount,
        deposit_amount(deps.storage, taker, &order.token_get)?,
        deposit_amount(deps.storage, &maker, &order.token_give)?,
        amount,
    )?;
    if deal.is_zero() {
        return Ok(TradeCheck::ZeroDeal);
    }
    Ok(TradeCheck::Executable(deal))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> Result<Binary, ContractError> {
    match msg {
        QueryMsg::AvailableVolume { order } => {
            Ok(to_json_binary(&query_available_volume(deps, env, order)?)?)
        }
        QueryMsg::UsedVolumeByHash { hash } => {
            Ok(to_json_binary(&query_used_volume_by_hash(deps, hash)?)?)
        }
        QueryMsg::DepositAmount { user, token } => {
            Ok(to_json_binary(&query_deposit_amount(deps, user, token)?)?)
        }
        QueryMsg::TestTakerTrade {
            order,
            taker,
            amount,
        } => Ok(to_json_binary(&query_test_taker_trade(
            deps, env, order, taker, amount,
        )?)?),
        QueryMsg::OrderHash { order } => Ok(to_json_binary(&OrderHashResponse {
            hash: HexBinary::from(order.hash().to_vec()),
        })?),
        QueryMsg::OrderState { hash } => Ok(to_json_binary(&query_order_state(deps, hash)?)?),
    }
}

fn query_available_volume(
    deps: Deps,
    env: Env,
    order: Order,
) -> Result<AmountResponse, ContractError> {
    order.check_format()?;

    let state = order_state(deps.storage, &order.hash())?;
    if state.is_cancel || order.is_expired(env.block.time.seconds()) {
        return Ok(AmountResponse {
            amount: Uint256::zero(),
        });
    }
    Ok(AmountResponse {
        amount: order.amount_get.checked_sub(state.filled_amount)?,
    })
}

fn query_used_volume_by_hash(deps: Deps, hash: HexBinary) -> Result<AmountResponse, ContractError> {
    let state = order_state(deps.storage, hash.as_slice())?;
    Ok(AmountResponse {
        amount: state.filled_amount,
    })
}

fn query_deposit_amount(
    deps: Deps,
    user: String,
    token: String,
) -> Result<AmountResponse, ContractError> {
    let user_addr = deps.api.addr_validate(&user)?;
    Ok(AmountResponse {
        amount: deposit_amount(deps.storage, &user_addr, &token)?,
    })
}

fn query_test_taker_trade(
    deps: Deps,
    env: Env,
    order: Order,
    taker: String,
    amount: Uint256,
) -> Result<TestTradeResponse, ContractError> {
    let taker_addr = deps.api.addr_validate(&taker)?;
    let check = check_trade(deps, &env, &order, &taker_addr, amount)?;
    Ok(check.to_response())
}

fn query_order_state(deps: Deps, hash: HexBinary) -> Result<OrderStateResponse, ContractError> {
    let state = order_state(deps.storage, hash.as_slice())?;
    Ok(OrderStateResponse {
        is_cancel: state.is_cancel,
        filled_amount: state.filled_amount,
    })
}
