use {
    crate::{
        domain::{
            eth::{Address, ChainId, U256},
            operation::{ExitKind, JoinKind},
            pool::PoolType,
        },
        infra::simulator::SimulationError,
    },
    thiserror::Error,
};

#[derive(Debug, Error)]
pub enum Error {
    #[error("unsupported pool type: {0}")]
    UnsupportedPoolType(PoolType),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Simulation(#[from] SimulationError),
    #[error(transparent)]
    Build(#[from] BuildError),
}

/// The request can never succeed for the given pool. Raised before any
/// simulation is attempted.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ValidationError {
    #[error("{pool_type} pools do not support {kind} joins")]
    JoinKindNotSupported { pool_type: PoolType, kind: JoinKind },
    #[error("{pool_type} pools do not support {kind} exits")]
    ExitKindNotSupported { pool_type: PoolType, kind: ExitKind },
    #[error("{pool_type} pools cannot be initialized")]
    InitNotSupported { pool_type: PoolType },
    #[error("no contract addresses are known for chain {0}")]
    UnsupportedChain(ChainId),
    #[error("expected {expected} amounts but got {actual}")]
    AmountsLength { expected: usize, actual: usize },
    #[error("token {0} is not part of the pool")]
    UnknownToken(Address),
    #[error("token {0} is listed more than once")]
    DuplicateToken(Address),
    #[error("token {token} has {expected} decimals but {actual} were given")]
    DecimalsMismatch {
        token: Address,
        expected: u8,
        actual: u8,
    },
    #[error("token {token} has {decimals} decimals, at most 18 are supported")]
    UnsupportedDecimals { token: Address, decimals: u8 },
    #[error("the pool token {0} cannot be deposited or withdrawn directly")]
    BptAsToken(Address),
    #[error("expected an amount of the pool token {expected} but got {actual}")]
    ExpectedBpt { expected: Address, actual: Address },
    #[error("amount of token {0} must not be zero")]
    ZeroAmount(Address),
    #[error("at least one amount must not be zero")]
    AllAmountsZero,
    #[error("invalid pool state: {0}")]
    InvalidPoolState(String),
}

/// Turning queried amounts into a call failed.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum BuildError {
    #[error("applying slippage to {amount} overflows")]
    SlippageOverflow { amount: U256 },
    #[error("applying slippage to {amount} yields a negative bound")]
    NegativeBound { amount: U256 },
    #[error("arithmetic error computing {0}")]
    Arithmetic(&'static str),
    #[error("query result cannot be used to build a call: {0}")]
    MalformedQuery(&'static str),
    #[error("wrapped native token {0} is not part of the pool")]
    NativeAssetNotInPool(Address),
    #[error("no wrapped native token is known for chain {0}")]
    UnknownNativeAsset(ChainId),
}
