use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Binary, Coin, Empty, Uint128};

use crate::roles::Role;

pub type Extension = cw721_base::Extension;
pub type Cw721ExecuteMsg = cw721_base::ExecuteMsg<Extension, Empty>;

#[cw_serde]
pub struct InstantiateMsg {
    pub name: String,
    pub symbol: String,
    /// Hard cap on the number of tokens ever minted
    pub max_supply: u64,
    /// Exact funds every mint must carry
    pub unit_price: Coin,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Mint the next token id to `recipient`. With `msg` set, the recipient
    /// contract is called with a cw721 `ReceiveNft` once the token exists.
    Mint {
        recipient: String,
        msg: Option<Binary>,
    },
    GrantMinter {
        address: String,
    },
    RevokeMinter {
        address: String,
    },
    /// Drop one of the sender's own roles
    RenounceRole {
        role: Role,
    },
    /// Send collected mint payments out (admin only). Defaults: sender, whole balance
    Withdraw {
        to: Option<String>,
        amount: Option<Uint128>,
    },
    /// Standard cw721 execution (TransferNft / SendNft / Approve / Burn ...)
    Cw721(Cw721ExecuteMsg),
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(TotalSupplyResponse)]
    TotalSupply {},

    #[returns(ConfigResponse)]
    Config {},

    #[returns(HasRoleResponse)]
    HasRole { role: Role, address: String },

    #[returns(SupportsInterfaceResponse)]
    SupportsInterface { interface_id: String },

    #[returns(cw721::OwnerOfResponse)]
    OwnerOf { token_id: String },
}

#[cw_serde]
pub struct TotalSupplyResponse {
    pub total_supply: u64,
}

#[cw_serde]
pub struct ConfigResponse {
    pub max_supply: u64,
    pub unit_price: Coin,
    pub next_id: u64,
}

#[cw_serde]
pub struct HasRoleResponse {
    pub has_role: bool,
}

#[cw_serde]
pub struct SupportsInterfaceResponse {
    pub supported: bool,
}
