pub mod call;
pub mod eth;
pub mod operation;
pub mod pool;
pub mod query;
pub mod slippage;
pub mod sorting;

pub use {
    call::{ExitCall, InitCall, JoinCall},
    operation::{
        BuildParams,
        ExitInput,
        ExitKind,
        InitInput,
        InitParams,
        InputAmount,
        JoinInput,
        JoinKind,
    },
    pool::{PoolId, PoolState, PoolStateInput, PoolType},
    query::{BatchRoute, ExitQuery, JoinQuery, SwapStep},
    slippage::Slippage,
};
