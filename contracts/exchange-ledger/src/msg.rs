use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{HexBinary, Uint256};
use ledger_orders::{Order, SignedOrder};

#[cw_serde]
pub struct InstantiateMsg {}

#[cw_serde]
pub enum ExecuteMsg {
    /// Announce a signed order on the event log
    PostOrder { signed_order: SignedOrder },
    /// Fill up to `amount` of the order's `token_get` from the sender's escrow
    Trade {
        signed_order: SignedOrder,
        amount: Uint256,
    },
    /// Permanently disable an order (maker only)
    CancelOrder { signed_order: SignedOrder },
    /// Credit the attached funds to the sender's escrow
    Deposit {},
    /// Release escrowed funds back to the sender
    Withdraw { token: String, amount: Uint256 },
    /// Dry-run a fill with the sender as taker; the verdict is returned as data
    TestTrade { order: Order, amount: Uint256 },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    /// Unfilled `token_get` of an order, 0 once cancelled or expired
    #[returns(AmountResponse)]
    AvailableVolume { order: Order },

    /// Filled `token_get` recorded for an order hash
    #[returns(AmountResponse)]
    UsedVolumeByHash { hash: HexBinary },

    /// Escrowed balance of a token
    #[returns(AmountResponse)]
    DepositAmount { user: String, token: String },

    /// Dry-run a fill for the given taker
    #[returns(TestTradeResponse)]
    TestTakerTrade {
        order: Order,
        taker: String,
        amount: Uint256,
    },

    /// Canonical hash of an order
    #[returns(OrderHashResponse)]
    OrderHash { order: Order },

    /// Fill state recorded for an order hash
    #[returns(OrderStateResponse)]
    OrderState { hash: HexBinary },
}

// Response types

#[cw_serde]
pub struct AmountResponse {
    pub amount: Uint256,
}

#[cw_serde]
pub struct TestTradeResponse {
    pub success: bool,
    pub result: String,
    pub deal: Uint256,
}

#[cw_serde]
pub struct OrderHashResponse {
    pub hash: HexBinary,
}

#[cw_serde]
pub struct OrderStateResponse {
    pub is_cancel: bool,
    pub filled_amount: Uint256,
}
