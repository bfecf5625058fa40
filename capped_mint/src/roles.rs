//! Capability store used by the mint controller.
//!
//! The controller only needs to ask whether an address holds a role and to
//! add or remove that single membership. Everything goes through
//! [`RoleRegistry`] so the storage layout can change without touching the
//! contract logic.

use std::fmt;

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Empty, StdResult, Storage};
use cw_storage_plus::Map;

use crate::error::ContractError;

/// Interface id answered by `SupportsInterface`.
pub const INTERFACE_ID: &str = "access-control";

#[cw_serde]
#[derive(Copy, Eq)]
pub enum Role {
    /// May grant and revoke the minter role.
    Admin,
    /// May call `Mint`.
    Minter,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Minter => "minter",
        }
    }

    /// Role whose holders manage membership of `self`.
    pub fn admin_role(&self) -> Role {
        Role::Admin
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub trait RoleRegistry {
    fn has_role(&self, store: &dyn Storage, role: Role, who: &Addr) -> bool;
    fn grant_role(&self, store: &mut dyn Storage, role: Role, who: &Addr) -> StdResult<()>;
    fn revoke_role(&self, store: &mut dyn Storage, role: Role, who: &Addr);
}

/// Role memberships stored as `(role, address) -> Empty` rows.
pub struct Roles<'a> {
    namespace: &'a str,
}

impl<'a> Roles<'a> {
    pub const fn new(namespace: &'a str) -> Self {
        Roles { namespace }
    }

    fn members<'k>(&self) -> Map<'k, (&'k str, &'k Addr), Empty>
    where
        'a: 'k,
    {
        Map::new(self.namespace)
    }
}

impl<'a> RoleRegistry for Roles<'a> {
    fn has_role(&self, store: &dyn Storage, role: Role, who: &Addr) -> bool {
        self.members().has(store, (role.as_str(), who))
    }

    fn grant_role(&self, store: &mut dyn Storage, role: Role, who: &Addr) -> StdResult<()> {
        self.members().save(store, (role.as_str(), who), &Empty {})
    }

    fn revoke_role(&self, store: &mut dyn Storage, role: Role, who: &Addr) {
        self.members().remove(store, (role.as_str(), who))
    }
}

pub fn ensure_role(
    registry: &impl RoleRegistry,
    store: &dyn Storage,
    role: Role,
    who: &Addr,
) -> Result<(), ContractError> {
    if !registry.has_role(store, role, who) {
        return Err(ContractError::Unauthorized);
    }
    Ok(())
}

/// Fails if `account` already holds `role`. Callers check the admin role first.
pub fn grant(
    registry: &impl RoleRegistry,
    store: &mut dyn Storage,
    role: Role,
    account: &Addr,
) -> Result<(), ContractError> {
    if registry.has_role(store, role, account) {
        return Err(ContractError::AlreadyGranted {
            role,
            address: account.to_string(),
        });
    }
    registry.grant_role(store, role, account)?;
    Ok(())
}

pub fn revoke(
    registry: &impl RoleRegistry,
    store: &mut dyn Storage,
    role: Role,
    account: &Addr,
) -> Result<(), ContractError> {
    if !registry.has_role(store, role, account) {
        return Err(ContractError::NotGranted {
            role,
            address: account.to_string(),
        });
    }
    registry.revoke_role(store, role, account);
    Ok(())
}
