//! Outcomes of simulated liquidity operations.

use super::{
    eth::{Address, TokenAmount, U256},
    operation::{ExitKind, JoinKind},
    pool::{PoolId, PoolState},
};

/// The simulated outcome of a join.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct JoinQuery {
    pub pool: PoolState,
    pub kind: JoinKind,
    /// One amount per token a user can deposit into the pool, in vault order.
    /// Tokens that are not deposited have a zero amount.
    pub amounts_in: Vec<TokenAmount>,
    pub bpt_out: TokenAmount,
    /// Position of the deposited token in `amounts_in` for single token
    /// joins.
    pub token_in_index: Option<usize>,
    /// The swaps performing the join for pools joined through the vault's
    /// batch swaps.
    pub route: Option<BatchRoute>,
}

impl JoinQuery {
    pub fn amount_in(&self, token: Address) -> Option<&TokenAmount> {
        self.amounts_in
            .iter()
            .find(|amount| amount.token().address() == token)
    }
}

/// The simulated outcome of an exit.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExitQuery {
    pub pool: PoolState,
    pub kind: ExitKind,
    pub bpt_in: TokenAmount,
    /// One amount per token a user can withdraw from the pool, in vault
    /// order. Tokens that are not withdrawn have a zero amount.
    pub amounts_out: Vec<TokenAmount>,
    pub token_out_index: Option<usize>,
    pub route: Option<BatchRoute>,
}

impl ExitQuery {
    pub fn amount_out(&self, token: Address) -> Option<&TokenAmount> {
        self.amounts_out
            .iter()
            .find(|amount| amount.token().address() == token)
    }
}

/// A sequence of `GIVEN_IN` swaps executed in a single vault batch swap.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BatchRoute {
    pub swaps: Vec<SwapStep>,
    /// Every token touched by the swaps. Steps refer to tokens by their
    /// position in this list.
    pub assets: Vec<Address>,
}

impl BatchRoute {
    pub fn asset_index(&self, token: Address) -> Option<usize> {
        self.assets.iter().position(|asset| *asset == token)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SwapStep {
    pub pool_id: PoolId,
    pub asset_in: usize,
    pub asset_out: usize,
    /// The exact amount in. Zero continues with the full output of the
    /// previous step.
    pub amount: U256,
}
