//! Token ordering as registered by the Balancer vault.
//!
//! The vault requires pools to register their tokens sorted by address and
//! every request addresses tokens by their position in that list. Composable
//! and linear pools additionally register their own BPT, which then takes its
//! place in the address order like any other token.

use {
    super::{
        eth::Token,
        pool::{PoolToken, PoolType},
    },
    itertools::Itertools,
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TokenOrdering {
    /// Tokens sorted by address, the BPT is not registered.
    Ascending,
    /// Tokens and the pool's own BPT sorted by address.
    AscendingWithBpt,
}

impl TokenOrdering {
    /// The ordering the vault uses for pools of the given type. Pool types
    /// without built-in support are assumed not to hold their own BPT.
    pub fn for_pool_type(pool_type: &PoolType) -> Self {
        match pool_type {
            PoolType::ComposableStable | PoolType::Linear | PoolType::Boosted => {
                Self::AscendingWithBpt
            }
            PoolType::Weighted
            | PoolType::Gyro2
            | PoolType::Gyro3
            | PoolType::GyroE
            | PoolType::Other(_) => Self::Ascending,
        }
    }
}

/// Puts tokens into the vault's order and renumbers their indices. With
/// [`TokenOrdering::AscendingWithBpt`] the BPT is added if it is missing.
///
/// Sorting already sorted tokens returns them unchanged.
pub fn sort_tokens(tokens: &[PoolToken], ordering: TokenOrdering, bpt: &Token) -> Vec<PoolToken> {
    let has_bpt = tokens.iter().any(|t| t.token == *bpt);
    let missing_bpt = (ordering == TokenOrdering::AscendingWithBpt && !has_bpt).then(|| PoolToken {
        token: bpt.clone(),
        index: 0,
        nested: None,
    });

    tokens
        .iter()
        .cloned()
        .chain(missing_bpt)
        .sorted_by_key(|t| t.token.address())
        .enumerate()
        .map(|(index, token)| PoolToken { index, ..token })
        .collect()
}
