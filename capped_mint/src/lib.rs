#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;

use cosmwasm_std::{
    coin, to_json_binary, Addr, BankMsg, Binary, Coin, CosmosMsg, Deps, DepsMut, Empty, Env,
    MessageInfo, Response, StdResult, Uint128,
};
use cw2::set_contract_version;
use cw721::Cw721ReceiveMsg;
use cw721_base::Cw721Contract;

use crate::error::ContractError;
use crate::msg::{
    ConfigResponse, Cw721ExecuteMsg, ExecuteMsg, Extension, HasRoleResponse, InstantiateMsg,
    QueryMsg, SupportsInterfaceResponse, TotalSupplyResponse,
};
use crate::roles::{ensure_role, Role, RoleRegistry};
use crate::state::{Config, CONFIG, NEXT_ID, ROLES};

pub mod error;
pub mod msg;
pub mod roles;
pub mod state;

const CONTRACT_NAME: &str = "crates.io:capped_mint";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Interface id of `SupportsInterface` itself.
pub const INTERFACE_ID: &str = "supports-interface";
const CW721_INTERFACES: &[&str] = &["cw721", "cw721-metadata"];

// -------------------- cw721 helper --------------------
fn cw<'a>() -> Cw721Contract<'a, Extension, Empty, Empty, Empty> {
    Cw721Contract::default()
}

// -------------------- instantiate --------------------
#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    mut deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    // cw721-base lives in the same contract; only this contract may mint through it
    let cw_msg = cw721_base::InstantiateMsg {
        name: msg.name.clone(),
        symbol: msg.symbol.clone(),
        minter: env.contract.address.to_string(),
    };
    cw().instantiate(deps.branch(), env, info.clone(), cw_msg)?;

    let cfg = Config {
        max_supply: msg.max_supply,
        unit_price: msg.unit_price,
    };
    CONFIG.save(deps.storage, &cfg)?;
    NEXT_ID.save(deps.storage, &1)?;

    ROLES.grant_role(deps.storage, Role::Admin, &info.sender)?;
    ROLES.grant_role(deps.storage, Role::Minter, &info.sender)?;

    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("name", msg.name)
        .add_attribute("symbol", msg.symbol)
        .add_attribute("max_supply", cfg.max_supply.to_string())
        .add_attribute("unit_price", cfg.unit_price.to_string())
        .add_attribute("admin", info.sender))
}

// -------------------- helpers --------------------

/// Funds must be exactly `price`: same denom, same amount, nothing else attached.
fn ensure_exact_payment(price: &Coin, funds: &[Coin]) -> Result<(), ContractError> {
    let paid = funds
        .iter()
        .filter(|c| c.denom == price.denom)
        .fold(Uint128::zero(), |acc, c| acc + c.amount);
    let foreign = funds.iter().any(|c| c.denom != price.denom);

    if foreign || paid != price.amount {
        return Err(ContractError::WrongPayment {
            expected: price.clone(),
        });
    }
    Ok(())
}

pub fn supports_interface(interface_id: &str) -> bool {
    interface_id == INTERFACE_ID
        || CW721_INTERFACES.contains(&interface_id)
        || interface_id == roles::INTERFACE_ID
}

// -------------------- execute --------------------
#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::Mint { recipient, msg } => execute_mint(deps, env, info, recipient, msg),
        ExecuteMsg::GrantMinter { address } => execute_grant_minter(deps, info, address),
        ExecuteMsg::RevokeMinter { address } => execute_revoke_minter(deps, info, address),
        ExecuteMsg::RenounceRole { role } => execute_renounce_role(deps, info, role),
        ExecuteMsg::Withdraw { to, amount } => execute_withdraw(deps, env, info, to, amount),
        ExecuteMsg::Cw721(cw_msg) => execute_cw721(deps, env, info, cw_msg),
    }
}

// -------------------- mint --------------------
fn execute_mint(
    mut deps: DepsMut,
    env: Env,
    info: MessageInfo,
    recipient: String,
    msg: Option<Binary>,
) -> Result<Response, ContractError> {
    // order matters: role, then supply, then payment
    ensure_role(&ROLES, deps.storage, Role::Minter, &info.sender)?;

    let cfg = CONFIG.load(deps.storage)?;
    let id = NEXT_ID.load(deps.storage)?;
    if id - 1 >= cfg.max_supply {
        return Err(ContractError::SupplyExhausted {
            max_supply: cfg.max_supply,
        });
    }

    ensure_exact_payment(&cfg.unit_price, &info.funds)?;

    let owner = deps.api.addr_validate(&recipient)?;

    // counter is committed before the token exists and before any outgoing message,
    // so a re-entrant Mint from the receive hook sees the next id
    NEXT_ID.save(deps.storage, &(id + 1))?;

    let token_id = id.to_string();
    let mint_msg = Cw721ExecuteMsg::Mint {
        token_id: token_id.clone(),
        owner: owner.to_string(),
        token_uri: None,
        extension: None,
    };
    let self_info = MessageInfo {
        sender: env.contract.address.clone(),
        funds: vec![], // payment stays with the controller
    };
    cw().execute(deps.branch(), env, self_info, mint_msg)?;

    let mut resp = Response::new()
        .set_data(to_json_binary(&id)?)
        .add_attribute("action", "mint")
        .add_attribute("token_id", token_id.clone())
        .add_attribute("owner", owner.clone())
        .add_attribute("minter", info.sender.clone())
        .add_attribute("total_supply", id.to_string());

    if let Some(hook_msg) = msg {
        let receive = Cw721ReceiveMsg {
            sender: info.sender.to_string(),
            token_id,
            msg: hook_msg,
        };
        let hook: CosmosMsg = receive.into_cosmos_msg(owner.to_string())?;
        resp = resp.add_message(hook);
    }

    Ok(resp)
}

// -------------------- role management --------------------
fn execute_grant_minter(
    deps: DepsMut,
    info: MessageInfo,
    address: String,
) -> Result<Response, ContractError> {
    ensure_role(&ROLES, deps.storage, Role::Minter.admin_role(), &info.sender)?;
    let account = deps.api.addr_validate(&address)?;
    roles::grant(&ROLES, deps.storage, Role::Minter, &account)?;

    Ok(role_response("grant_role", Role::Minter, &account, &info.sender))
}

fn execute_revoke_minter(
    deps: DepsMut,
    info: MessageInfo,
    address: String,
) -> Result<Response, ContractError> {
    ensure_role(&ROLES, deps.storage, Role::Minter.admin_role(), &info.sender)?;
    let account = deps.api.addr_validate(&address)?;
    roles::revoke(&ROLES, deps.storage, Role::Minter, &account)?;

    Ok(role_response("revoke_role", Role::Minter, &account, &info.sender))
}

fn execute_renounce_role(
    deps: DepsMut,
    info: MessageInfo,
    role: Role,
) -> Result<Response, ContractError> {
    roles::revoke(&ROLES, deps.storage, role, &info.sender)?;

    Ok(role_response("renounce_role", role, &info.sender, &info.sender))
}

fn role_response(action: &str, role: Role, account: &Addr, sender: &Addr) -> Response {
    Response::new()
        .add_attribute("action", action)
        .add_attribute("role", role.as_str())
        .add_attribute("account", account)
        .add_attribute("sender", sender)
}

// -------------------- admin executes --------------------
fn execute_withdraw(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    to: Option<String>,
    amount: Option<Uint128>,
) -> Result<Response, ContractError> {
    ensure_role(&ROLES, deps.storage, Role::Admin, &info.sender)?;
    let cfg = CONFIG.load(deps.storage)?;

    let to_addr = match to {
        Some(s) => deps.api.addr_validate(&s)?,
        None => info.sender.clone(),
    };
    let denom = cfg.unit_price.denom;
    let amount = match amount {
        Some(a) => a,
        None => {
            deps.querier
                .query_balance(env.contract.address.to_string(), denom.clone())?
                .amount
        }
    };
    if amount.is_zero() {
        return Err(ContractError::NothingToWithdraw);
    }

    let bank_msg = BankMsg::Send {
        to_address: to_addr.to_string(),
        amount: vec![coin(amount.u128(), &denom)],
    };

    Ok(Response::new()
        .add_message(bank_msg)
        .add_attribute("action", "withdraw")
        .add_attribute("to", to_addr)
        .add_attribute("amount", coin(amount.u128(), denom).to_string()))
}

// -------------------- cw721 passthrough --------------------
fn execute_cw721(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    cw_msg: Cw721ExecuteMsg,
) -> Result<Response, ContractError> {
    // new tokens only come out of execute_mint; the collection's minter never changes
    if let Cw721ExecuteMsg::Mint { .. } | Cw721ExecuteMsg::UpdateOwnership(_) = &cw_msg {
        return Err(ContractError::Unauthorized);
    }
    cw().execute(deps, env, info, cw_msg)
        .map_err(ContractError::from)
}

// -------------------- query --------------------
#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::TotalSupply {} => to_json_binary(&query_total_supply(deps)?),
        QueryMsg::Config {} => to_json_binary(&query_config(deps)?),
        QueryMsg::HasRole { role, address } => {
            let addr = deps.api.addr_validate(&address)?;
            to_json_binary(&HasRoleResponse {
                has_role: ROLES.has_role(deps.storage, role, &addr),
            })
        }
        QueryMsg::SupportsInterface { interface_id } => {
            to_json_binary(&SupportsInterfaceResponse {
                supported: supports_interface(&interface_id),
            })
        }
        QueryMsg::OwnerOf { token_id } => cw().query(
            deps,
            env,
            cw721_base::QueryMsg::OwnerOf {
                token_id,
                include_expired: None,
            },
        ),
    }
}

fn query_total_supply(deps: Deps) -> StdResult<TotalSupplyResponse> {
    let next_id = NEXT_ID.load(deps.storage)?;
    Ok(TotalSupplyResponse {
        total_supply: next_id - 1,
    })
}

fn query_config(deps: Deps) -> StdResult<ConfigResponse> {
    let cfg = CONFIG.load(deps.storage)?;
    Ok(ConfigResponse {
        max_supply: cfg.max_supply,
        unit_price: cfg.unit_price,
        next_id: NEXT_ID.load(deps.storage)?,
    })
}
