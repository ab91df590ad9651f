pub mod auth;
pub mod contract;
mod error;
pub mod ledger;
pub mod msg;
pub mod state;

#[cfg(test)]
mod testing;

pub use crate::error::ContractError;
