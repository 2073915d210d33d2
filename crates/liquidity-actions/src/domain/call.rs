//! Transactions ready to be signed and submitted.

use super::eth::{Address, Bytes, TokenAmount, U256};

/// A join transaction and the limits encoded into it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct JoinCall {
    pub to: Address,
    pub call: Bytes,
    /// Native asset to attach to the transaction.
    pub value: U256,
    pub min_bpt_out: TokenAmount,
    pub max_amounts_in: Vec<TokenAmount>,
}

/// An exit transaction and the limits encoded into it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExitCall {
    pub to: Address,
    pub call: Bytes,
    pub value: U256,
    pub max_bpt_in: TokenAmount,
    pub min_amounts_out: Vec<TokenAmount>,
}

/// A pool initialization transaction.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitCall {
    pub to: Address,
    pub call: Bytes,
    pub value: U256,
}
