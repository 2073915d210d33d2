//! Pool family specific encoding of liquidity operations.
//!
//! Every pool family implements [`Handler`]. Handlers query the outcome of an
//! operation through a [`Simulator`] and turn queried amounts into calls
//! without any further network access.

use {
    crate::{
        domain::{
            BuildParams,
            ExitCall,
            ExitInput,
            ExitQuery,
            InitCall,
            InitInput,
            InitParams,
            JoinCall,
            JoinInput,
            JoinQuery,
            PoolState,
        },
        error::{Error, ValidationError},
        infra::{contracts::Contracts, simulator::Simulator},
        validator::Capabilities,
    },
};

mod common;
pub mod composable_stable;
pub mod gyro;
pub mod nested;
pub mod registry;
pub mod weighted;

pub use registry::Registry;

/// What a handler needs to simulate operations on a chain.
#[derive(Clone, Copy)]
pub struct Context<'a> {
    pub simulator: &'a dyn Simulator,
    pub contracts: &'a Contracts,
}

/// Operations default to being unsupported so that handlers only implement
/// what their capabilities declare.
#[async_trait::async_trait]
pub trait Handler: Send + Sync {
    fn capabilities(&self) -> Capabilities;

    async fn query_join(
        &self,
        input: &JoinInput,
        pool: &PoolState,
        _ctx: &Context<'_>,
    ) -> Result<JoinQuery, Error> {
        Err(ValidationError::JoinKindNotSupported {
            pool_type: pool.pool_type().clone(),
            kind: input.kind(),
        }
        .into())
    }

    fn build_join_call(
        &self,
        query: &JoinQuery,
        _params: &BuildParams,
        _contracts: &Contracts,
    ) -> Result<JoinCall, Error> {
        Err(ValidationError::JoinKindNotSupported {
            pool_type: query.pool.pool_type().clone(),
            kind: query.kind,
        }
        .into())
    }

    async fn query_exit(
        &self,
        input: &ExitInput,
        pool: &PoolState,
        _ctx: &Context<'_>,
    ) -> Result<ExitQuery, Error> {
        Err(ValidationError::ExitKindNotSupported {
            pool_type: pool.pool_type().clone(),
            kind: input.kind(),
        }
        .into())
    }

    fn build_exit_call(
        &self,
        query: &ExitQuery,
        _params: &BuildParams,
        _contracts: &Contracts,
    ) -> Result<ExitCall, Error> {
        Err(ValidationError::ExitKindNotSupported {
            pool_type: query.pool.pool_type().clone(),
            kind: query.kind,
        }
        .into())
    }

    fn build_init_call(
        &self,
        _input: &InitInput,
        pool: &PoolState,
        _params: &InitParams,
        _contracts: &Contracts,
    ) -> Result<InitCall, Error> {
        Err(ValidationError::InitNotSupported {
            pool_type: pool.pool_type().clone(),
        }
        .into())
    }
}
