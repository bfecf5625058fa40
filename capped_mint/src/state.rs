use cosmwasm_schema::cw_serde;
use cosmwasm_std::Coin;
use cw_storage_plus::Item;

use crate::roles::Roles;

#[cw_serde]
pub struct Config {
    // 0 means nothing can ever be minted
    pub max_supply: u64,
    // exact amount a mint must carry; zero amount means no funds at all
    pub unit_price: Coin,
}

pub const CONFIG: Item<Config> = Item::new("config");

// id handed to the next successful mint, starts at 1
pub const NEXT_ID: Item<u64> = Item::new("next_id");

pub const ROLES: Roles = Roles::new("roles");
