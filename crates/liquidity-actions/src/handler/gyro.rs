use {
    super::{
        Context,
        Handler,
        common::{Supply, UserDataKinds, VaultPool},
    },
    crate::{
        domain::{
            BuildParams,
            ExitCall,
            ExitInput,
            ExitKind,
            ExitQuery,
            JoinCall,
            JoinInput,
            JoinKind,
            JoinQuery,
            PoolState,
            sorting::TokenOrdering,
        },
        error::Error,
        infra::contracts::Contracts,
        validator::{Capabilities, InputTokens},
    },
};

/// Gyroscope concentrated liquidity pools only implement proportional joins
/// and exits.
const POOL: VaultPool = VaultPool {
    kinds: UserDataKinds {
        init: None,
        exact_tokens_in_for_bpt_out: None,
        token_in_for_exact_bpt_out: None,
        all_tokens_in_for_exact_bpt_out: Some(3),
        exact_bpt_in_for_one_token_out: None,
        exact_bpt_in_for_tokens_out: Some(1),
        bpt_in_for_exact_tokens_out: None,
    },
    supply: Supply::Total,
};

/// 2-CLP, 3-CLP and E-CLP pools.
#[derive(Clone, Copy, Debug, Default)]
pub struct Gyro;

#[async_trait::async_trait]
impl Handler for Gyro {
    fn capabilities(&self) -> Capabilities {
        Capabilities {
            join: &[JoinKind::Proportional],
            exit: &[ExitKind::Proportional],
            init: false,
            ordering: TokenOrdering::Ascending,
            tokens: InputTokens::PoolTokens,
        }
    }

    async fn query_join(
        &self,
        input: &JoinInput,
        pool: &PoolState,
        ctx: &Context<'_>,
    ) -> Result<JoinQuery, Error> {
        POOL.query_join(input, pool, ctx).await
    }

    fn build_join_call(
        &self,
        query: &JoinQuery,
        params: &BuildParams,
        contracts: &Contracts,
    ) -> Result<JoinCall, Error> {
        POOL.build_join_call(query, params, contracts)
    }

    async fn query_exit(
        &self,
        input: &ExitInput,
        pool: &PoolState,
        ctx: &Context<'_>,
    ) -> Result<ExitQuery, Error> {
        POOL.query_exit(input, pool, ctx).await
    }

    fn build_exit_call(
        &self,
        query: &ExitQuery,
        params: &BuildParams,
        contracts: &Contracts,
    ) -> Result<ExitCall, Error> {
        POOL.build_exit_call(query, params, contracts)
    }
}
