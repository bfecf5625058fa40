use cosmwasm_std::{Coin, StdError};
use thiserror::Error;

use crate::roles::Role;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Max supply of {max_supply} reached")]
    SupplyExhausted { max_supply: u64 },

    #[error("Wrong payment: mint costs exactly {expected}")]
    WrongPayment { expected: Coin },

    #[error("{address} already holds the {role} role")]
    AlreadyGranted { role: Role, address: String },

    #[error("{address} does not hold the {role} role")]
    NotGranted { role: Role, address: String },

    #[error("Nothing to withdraw")]
    NothingToWithdraw,
}

impl From<cw721_base::ContractError> for ContractError {
    fn from(err: cw721_base::ContractError) -> Self {
        ContractError::Std(StdError::generic_err(err.to_string()))
    }
}
