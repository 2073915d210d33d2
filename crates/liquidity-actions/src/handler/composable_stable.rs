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

/// Composable stable pools register their own BPT as a pool token. User data
/// refers to tokens by their index with the BPT skipped, while the vault
/// request lists every registered token.
const POOL: VaultPool = VaultPool {
    kinds: UserDataKinds {
        init: None,
        exact_tokens_in_for_bpt_out: Some(1),
        token_in_for_exact_bpt_out: Some(2),
        all_tokens_in_for_exact_bpt_out: Some(3),
        exact_bpt_in_for_one_token_out: Some(0),
        bpt_in_for_exact_tokens_out: Some(1),
        exact_bpt_in_for_tokens_out: Some(2),
    },
    supply: Supply::Actual,
};

#[derive(Clone, Copy, Debug, Default)]
pub struct ComposableStable;

#[async_trait::async_trait]
impl Handler for ComposableStable {
    fn capabilities(&self) -> Capabilities {
        Capabilities {
            join: &[
                JoinKind::Proportional,
                JoinKind::Unbalanced,
                JoinKind::SingleToken,
                JoinKind::SingleTokenExactOut,
            ],
            exit: &[
                ExitKind::Proportional,
                ExitKind::Unbalanced,
                ExitKind::SingleToken,
            ],
            init: false,
            ordering: TokenOrdering::AscendingWithBpt,
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
