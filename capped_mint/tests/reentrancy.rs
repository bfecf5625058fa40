use cosmwasm_schema::cw_serde;
use cosmwasm_std::{
    coin, coins, from_json, to_json_binary, Addr, Binary, Coin, Deps, DepsMut, Empty, Env,
    MessageInfo, Response, StdResult, Uint128, WasmMsg,
};
use cw721::{Cw721ReceiveMsg, OwnerOfResponse};
use cw_multi_test::{App, AppResponse, Contract, ContractWrapper, Executor};

use capped_mint::error::ContractError;
use capped_mint::msg::{ExecuteMsg, InstantiateMsg, QueryMsg, TotalSupplyResponse};

const ADMIN: &str = "creator";
const DENOM: &str = "ujuno";
const PRICE: u128 = 10;

/// Recipient contract that mints again from inside its `ReceiveNft` handler.
mod receiver {
    use super::*;

    #[cw_serde]
    pub enum ExecuteMsg {
        ReceiveNft(Cw721ReceiveMsg),
    }

    #[cw_serde]
    pub struct ReMint {
        pub recipient: String,
        pub payment: Coin,
    }

    pub fn instantiate(_: DepsMut, _: Env, _: MessageInfo, _: Empty) -> StdResult<Response> {
        Ok(Response::new())
    }

    pub fn execute(_: DepsMut, _: Env, info: MessageInfo, msg: ExecuteMsg) -> StdResult<Response> {
        let ExecuteMsg::ReceiveNft(receive) = msg;
        let re_mint: ReMint = from_json(&receive.msg)?;

        // info.sender is the controller that just minted to us
        let mint = WasmMsg::Execute {
            contract_addr: info.sender.to_string(),
            msg: to_json_binary(&capped_mint::msg::ExecuteMsg::Mint {
                recipient: re_mint.recipient,
                msg: None,
            })?,
            funds: vec![re_mint.payment],
        };
        Ok(Response::new()
            .add_message(mint)
            .add_attribute("received", receive.token_id))
    }

    pub fn query(_: Deps, _: Env, _: Empty) -> StdResult<Binary> {
        to_json_binary(&Empty {})
    }
}

fn controller_contract() -> Box<dyn Contract<Empty>> {
    Box::new(ContractWrapper::new(
        capped_mint::execute,
        capped_mint::instantiate,
        capped_mint::query,
    ))
}

fn receiver_contract() -> Box<dyn Contract<Empty>> {
    Box::new(ContractWrapper::new(
        receiver::execute,
        receiver::instantiate,
        receiver::query,
    ))
}

struct Suite {
    app: App,
    controller: Addr,
    receiver: Addr,
}

impl Suite {
    fn new(max_supply: u64) -> Self {
        let mut app = App::new(|router, _, storage| {
            router
                .bank
                .init_balance(storage, &Addr::unchecked(ADMIN), coins(100, DENOM))
                .unwrap();
        });
        let controller_id = app.store_code(controller_contract());
        let receiver_id = app.store_code(receiver_contract());

        let controller = app
            .instantiate_contract(
                controller_id,
                Addr::unchecked(ADMIN),
                &InstantiateMsg {
                    name: "Capped".to_string(),
                    symbol: "CAP".to_string(),
                    max_supply,
                    unit_price: coin(PRICE, DENOM),
                },
                &[],
                "capped-mint",
                None,
            )
            .unwrap();
        let receiver = app
            .instantiate_contract(
                receiver_id,
                Addr::unchecked(ADMIN),
                &Empty {},
                &[],
                "receiver",
                None,
            )
            .unwrap();
        app.send_tokens(Addr::unchecked(ADMIN), receiver.clone(), &coins(PRICE, DENOM))
            .unwrap();

        Suite {
            app,
            controller,
            receiver,
        }
    }

    fn grant_minter(&mut self, address: &Addr) {
        self.app
            .execute_contract(
                Addr::unchecked(ADMIN),
                self.controller.clone(),
                &ExecuteMsg::GrantMinter {
                    address: address.to_string(),
                },
                &[],
            )
            .unwrap();
    }

    /// Admin mints to the receiver, which mints one more token to `then_to`.
    fn mint_with_re_mint(&mut self, then_to: &str) -> anyhow::Result<AppResponse> {
        let hook = to_json_binary(&receiver::ReMint {
            recipient: then_to.to_string(),
            payment: coin(PRICE, DENOM),
        })
        .unwrap();
        self.app.execute_contract(
            Addr::unchecked(ADMIN),
            self.controller.clone(),
            &ExecuteMsg::Mint {
                recipient: self.receiver.to_string(),
                msg: Some(hook),
            },
            &coins(PRICE, DENOM),
        )
    }

    fn total_supply(&self) -> u64 {
        let resp: TotalSupplyResponse = self
            .app
            .wrap()
            .query_wasm_smart(&self.controller, &QueryMsg::TotalSupply {})
            .unwrap();
        resp.total_supply
    }

    fn owner_of(&self, token_id: &str) -> StdResult<String> {
        let resp: OwnerOfResponse = self.app.wrap().query_wasm_smart(
            &self.controller,
            &QueryMsg::OwnerOf {
                token_id: token_id.to_string(),
            },
        )?;
        Ok(resp.owner)
    }

    fn balance(&self, address: &Addr) -> Uint128 {
        self.app.wrap().query_balance(address, DENOM).unwrap().amount
    }
}

fn minted_ids(resp: &AppResponse) -> Vec<String> {
    resp.events
        .iter()
        .filter(|e| e.ty == "wasm")
        .filter(|e| e.attributes.iter().any(|a| a.key == "action" && a.value == "mint"))
        .flat_map(|e| e.attributes.iter().filter(|a| a.key == "token_id"))
        .map(|a| a.value.clone())
        .collect()
}

#[test]
fn re_entrant_mint_gets_next_id() {
    let mut suite = Suite::new(3);
    let receiver = suite.receiver.clone();
    suite.grant_minter(&receiver);

    let resp = suite.mint_with_re_mint("bob").unwrap();

    assert_eq!(minted_ids(&resp), vec!["1".to_string(), "2".to_string()]);
    assert_eq!(suite.total_supply(), 2);
    assert_eq!(suite.owner_of("1").unwrap(), receiver.to_string());
    assert_eq!(suite.owner_of("2").unwrap(), "bob");

    let controller = suite.controller.clone();
    assert_eq!(suite.balance(&controller), Uint128::new(2 * PRICE));
    assert_eq!(suite.balance(&receiver), Uint128::zero());
}

#[test]
fn re_entrant_mint_past_cap_rolls_back_outer_mint() {
    let mut suite = Suite::new(1);
    let receiver = suite.receiver.clone();
    suite.grant_minter(&receiver);

    let err = suite.mint_with_re_mint("bob").unwrap_err();
    assert_eq!(
        err.root_cause().to_string(),
        ContractError::SupplyExhausted { max_supply: 1 }.to_string()
    );

    assert_eq!(suite.total_supply(), 0);
    assert!(suite.owner_of("1").is_err());
    assert_eq!(suite.balance(&Addr::unchecked(ADMIN)), Uint128::new(100 - PRICE));
    assert_eq!(suite.balance(&receiver), Uint128::new(PRICE));
}

#[test]
fn re_entrant_mint_by_non_minter_rolls_back() {
    let mut suite = Suite::new(5);
    let receiver = suite.receiver.clone();

    let err = suite.mint_with_re_mint("bob").unwrap_err();
    assert_eq!(
        err.root_cause().to_string(),
        ContractError::Unauthorized.to_string()
    );

    assert_eq!(suite.total_supply(), 0);
    assert!(suite.owner_of("1").is_err());
    assert_eq!(suite.balance(&receiver), Uint128::new(PRICE));

    // the next successful mint still gets id 1
    let resp = suite
        .app
        .execute_contract(
            Addr::unchecked(ADMIN),
            suite.controller.clone(),
            &ExecuteMsg::Mint {
                recipient: "alice".to_string(),
                msg: None,
            },
            &coins(PRICE, DENOM),
        )
        .unwrap();
    assert_eq!(minted_ids(&resp), vec!["1".to_string()]);
}

#[test]
fn payments_accumulate_and_withdraw() {
    let mut suite = Suite::new(5);
    for recipient in ["alice", "bob"] {
        suite
            .app
            .execute_contract(
                Addr::unchecked(ADMIN),
                suite.controller.clone(),
                &ExecuteMsg::Mint {
                    recipient: recipient.to_string(),
                    msg: None,
                },
                &coins(PRICE, DENOM),
            )
            .unwrap();
    }
    let controller = suite.controller.clone();
    assert_eq!(suite.balance(&controller), Uint128::new(2 * PRICE));

    suite
        .app
        .execute_contract(
            Addr::unchecked(ADMIN),
            controller.clone(),
            &ExecuteMsg::Withdraw {
                to: Some("treasury".to_string()),
                amount: None,
            },
            &[],
        )
        .unwrap();

    assert_eq!(suite.balance(&controller), Uint128::zero());
    assert_eq!(
        suite.balance(&Addr::unchecked("treasury")),
        Uint128::new(2 * PRICE)
    );
}
