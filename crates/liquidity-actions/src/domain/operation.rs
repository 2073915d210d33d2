//! The liquidity operations a caller can request.

use {
    super::{
        eth::{Address, ChainId, U256},
        slippage::Slippage,
    },
    number::serialization::HexOrDecimalU256,
    serde::{Deserialize, Serialize},
    serde_with::serde_as,
    strum::{Display, EnumIter},
};

/// A raw amount of a token as provided by the caller.
#[serde_as]
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct InputAmount {
    pub address: Address,
    pub decimals: u8,
    #[serde_as(as = "HexOrDecimalU256")]
    pub raw_amount: U256,
}

impl InputAmount {
    pub fn new(address: Address, decimals: u8, raw_amount: U256) -> Self {
        Self {
            address,
            decimals,
            raw_amount,
        }
    }
}

#[derive(Clone, Copy, Debug, Display, EnumIter, Eq, Hash, PartialEq)]
pub enum JoinKind {
    /// Deposit every pool token in proportion to the pool's balances.
    Proportional,
    /// Deposit exact amounts of any subset of the pool tokens.
    Unbalanced,
    /// Deposit an exact amount of a single token.
    SingleToken,
    /// Deposit a single token to receive an exact amount of BPT.
    SingleTokenExactOut,
}

#[derive(Clone, Copy, Debug, Display, EnumIter, Eq, Hash, PartialEq)]
pub enum ExitKind {
    /// Burn an exact amount of BPT for every pool token in proportion to the
    /// pool's balances.
    Proportional,
    /// Withdraw exact amounts of any subset of the pool tokens.
    Unbalanced,
    /// Burn an exact amount of BPT for a single token.
    SingleToken,
}

/// A request to add liquidity to a pool.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all_fields = "camelCase", deny_unknown_fields)]
pub enum JoinInput {
    /// `reference_amount` is either one of the pool tokens, in which case
    /// every other token is deposited in proportion to it, or the exact amount
    /// of BPT to mint.
    Proportional {
        chain_id: ChainId,
        reference_amount: InputAmount,
    },
    Unbalanced {
        chain_id: ChainId,
        amounts_in: Vec<InputAmount>,
    },
    SingleToken {
        chain_id: ChainId,
        amount_in: InputAmount,
    },
    SingleTokenExactOut {
        chain_id: ChainId,
        bpt_out: InputAmount,
        token_in: Address,
    },
}

impl JoinInput {
    pub fn kind(&self) -> JoinKind {
        match self {
            Self::Proportional { .. } => JoinKind::Proportional,
            Self::Unbalanced { .. } => JoinKind::Unbalanced,
            Self::SingleToken { .. } => JoinKind::SingleToken,
            Self::SingleTokenExactOut { .. } => JoinKind::SingleTokenExactOut,
        }
    }

    pub fn chain_id(&self) -> ChainId {
        match self {
            Self::Proportional { chain_id, .. }
            | Self::Unbalanced { chain_id, .. }
            | Self::SingleToken { chain_id, .. }
            | Self::SingleTokenExactOut { chain_id, .. } => *chain_id,
        }
    }
}

/// A request to remove liquidity from a pool.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all_fields = "camelCase", deny_unknown_fields)]
pub enum ExitInput {
    Proportional {
        chain_id: ChainId,
        bpt_in: InputAmount,
    },
    Unbalanced {
        chain_id: ChainId,
        amounts_out: Vec<InputAmount>,
    },
    SingleToken {
        chain_id: ChainId,
        bpt_in: InputAmount,
        token_out: Address,
    },
}

impl ExitInput {
    pub fn kind(&self) -> ExitKind {
        match self {
            Self::Proportional { .. } => ExitKind::Proportional,
            Self::Unbalanced { .. } => ExitKind::Unbalanced,
            Self::SingleToken { .. } => ExitKind::SingleToken,
        }
    }

    pub fn chain_id(&self) -> ChainId {
        match self {
            Self::Proportional { chain_id, .. }
            | Self::Unbalanced { chain_id, .. }
            | Self::SingleToken { chain_id, .. } => *chain_id,
        }
    }
}

/// A request to seed a newly created pool with its first liquidity.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct InitInput {
    pub chain_id: ChainId,
    pub amounts_in: Vec<InputAmount>,
}

/// Who sends and receives the funds of an operation and how much the outcome
/// may deviate from the queried amounts.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BuildParams {
    pub slippage: Slippage,
    pub sender: Address,
    pub recipient: Address,
    /// Use the chain's native asset instead of its wrapped version. Native
    /// value is attached to joins and native funds are sent out by exits.
    pub wrapped_native_as_native: bool,
}

impl BuildParams {
    pub fn new(slippage: Slippage, sender: Address, recipient: Address) -> Self {
        Self {
            slippage,
            sender,
            recipient,
            wrapped_native_as_native: false,
        }
    }

    pub fn with_native_asset(self) -> Self {
        Self {
            wrapped_native_as_native: true,
            ..self
        }
    }
}

/// Parameters for initializing a pool. Initialization has nothing to query,
/// so there is no slippage to apply.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct InitParams {
    pub sender: Address,
    pub recipient: Address,
    pub wrapped_native_as_native: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_tagged_inputs() {
        let input: JoinInput = serde_json::from_str(
            r#"{
                "kind": "SingleToken",
                "chainId": 1,
                "amountIn": {
                    "address": "0xba100000625a3754423978a60c9317c58a424e3d",
                    "decimals": 18,
                    "rawAmount": "1000000000000000000"
                }
            }"#,
        )
        .unwrap();
        assert_eq!(input.kind(), JoinKind::SingleToken);
        assert_eq!(input.chain_id(), 1);

        let exit: ExitInput = serde_json::from_str(
            r#"{
                "kind": "Proportional",
                "chainId": 137,
                "bptIn": {
                    "address": "0x97469e6236bd467cd147065f77752b00efadce8a",
                    "decimals": 18,
                    "rawAmount": "0xde0b6b3a7640000"
                }
            }"#,
        )
        .unwrap();
        assert_eq!(exit.kind(), ExitKind::Proportional);
        assert_eq!(exit.chain_id(), 137);
    }

    #[test]
    fn rejects_fields_of_other_kinds() {
        let result = serde_json::from_str::<ExitInput>(
            r#"{
                "kind": "Proportional",
                "chainId": 1,
                "bptIn": {
                    "address": "0x97469e6236bd467cd147065f77752b00efadce8a",
                    "decimals": 18,
                    "rawAmount": "1"
                },
                "tokenOut": "0xba100000625a3754423978a60c9317c58a424e3d"
            }"#,
        );
        assert!(result.is_err());
    }
}
