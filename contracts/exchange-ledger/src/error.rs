use cosmwasm_std::{ConversionOverflowError, DivideByZeroError, OverflowError, StdError};
use ledger_orders::OrderError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Overflow(#[from] OverflowError),

    #[error("{0}")]
    DivideByZero(#[from] DivideByZeroError),

    #[error("{0}")]
    ConversionOverflow(#[from] ConversionOverflowError),

    #[error("{0}")]
    InvalidOrder(#[from] OrderError),

    #[error("order is already finished")]
    OrderFinished {},

    #[error("Order is canceled")]
    OrderCancelled {},

    #[error("Order sign error")]
    SignatureInvalid {},

    #[error("deal amount is less than or equal to zero")]
    NoLiquidity {},

    #[error("Insufficient balance")]
    InsufficientBalance {},

    #[error("Unauthorized")]
    Unauthorized {},

    #[error("This message does not accept funds")]
    NonPayable {},

    #[error("Deposit requires attached funds")]
    EmptyDeposit {},
}
