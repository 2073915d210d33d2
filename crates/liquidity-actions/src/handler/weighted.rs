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
            InitCall,
            InitInput,
            InitParams,
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

const POOL: VaultPool = VaultPool {
    kinds: UserDataKinds {
        init: Some(0),
        exact_tokens_in_for_bpt_out: Some(1),
        token_in_for_exact_bpt_out: Some(2),
        all_tokens_in_for_exact_bpt_out: Some(3),
        exact_bpt_in_for_one_token_out: Some(0),
        exact_bpt_in_for_tokens_out: Some(1),
        bpt_in_for_exact_tokens_out: Some(2),
    },
    supply: Supply::Total,
};

/// Weighted pools, including two token and managed variants.
#[derive(Clone, Copy, Debug, Default)]
pub struct Weighted;

#[async_trait::async_trait]
impl Handler for Weighted {
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
            init: true,
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

    fn build_init_call(
        &self,
        input: &InitInput,
        pool: &PoolState,
        params: &InitParams,
        contracts: &Contracts,
    ) -> Result<InitCall, Error> {
        POOL.build_init_call(input, pool, params, contracts)
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            domain::{
                InputAmount,
                PoolType,
                Slippage,
                eth::{Address, TokenAmount, U256},
            },
            error::BuildError,
            handler::common::tests::pool,
            infra::simulator::MockSimulator,
        },
        alloy::sol_types::{SolCall, SolValue},
        contracts::{BalancerV2BasePool, BalancerV2Helpers, BalancerV2Vault},
        number::units::EthUnit,
    };

    fn contracts() -> Contracts {
        Contracts {
            vault: Address::repeat_byte(0xaa),
            helpers: Address::repeat_byte(0xbb),
            wrapped_native: Some(Address::repeat_byte(0x10)),
        }
    }

    fn params() -> BuildParams {
        BuildParams::new(
            Slippage::from_basis_points(100).unwrap(),
            Address::repeat_byte(0x01),
            Address::repeat_byte(0x02),
        )
    }

    #[tokio::test]
    async fn single_token_join() {
        let pool = pool(PoolType::Weighted, 0x77, TokenOrdering::Ascending);
        let mut simulator = MockSimulator::new();
        simulator
            .expect_simulate()
            .times(1)
            .returning(|to, call| {
                assert_eq!(to, Address::repeat_byte(0xbb));
                let query = BalancerV2Helpers::queryJoinCall::abi_decode(&call).unwrap();
                let (code, amounts, min_bpt_out) =
                    <(U256, Vec<U256>, U256)>::abi_decode_params(&query.request.userData)
                        .unwrap();
                assert_eq!(code, U256::from(1));
                assert_eq!(amounts, vec![U256::ZERO, U256::from(1_000_000)]);
                assert_eq!(min_bpt_out, U256::ZERO);
                Ok(BalancerV2Helpers::queryJoinCall::abi_encode_returns(
                    &BalancerV2Helpers::queryJoinReturn {
                        bptOut: 2u64.eth(),
                        amountsIn: amounts,
                    },
                )
                .into())
            });

        let contracts = contracts();
        let ctx = Context {
            simulator: &simulator,
            contracts: &contracts,
        };
        let input = JoinInput::SingleToken {
            chain_id: 1,
            amount_in: InputAmount::new(Address::repeat_byte(0x20), 6, U256::from(1_000_000)),
        };
        let query = Weighted.query_join(&input, &pool, &ctx).await.unwrap();
        assert_eq!(query.bpt_out.amount(), 2u64.eth());
        assert_eq!(query.token_in_index, Some(1));

        let call = Weighted
            .build_join_call(&query, &params(), &contracts)
            .unwrap();
        assert_eq!(call.to, contracts.vault);
        assert_eq!(call.value, U256::ZERO);
        assert_eq!(
            call.min_bpt_out.amount(),
            U256::from(1_980_000_000_000_000_000_u128)
        );

        let join = BalancerV2Vault::joinPoolCall::abi_decode(&call.call).unwrap();
        assert_eq!(join.poolId, pool.id().0);
        assert_eq!(join.sender, Address::repeat_byte(0x01));
        assert_eq!(join.recipient, Address::repeat_byte(0x02));
        assert_eq!(join.request.assets, pool.token_addresses());
        assert_eq!(
            join.request.maxAmountsIn,
            vec![U256::ZERO, U256::from(1_000_000)]
        );
        let (code, amounts, min_bpt_out) =
            <(U256, Vec<U256>, U256)>::abi_decode_params(&join.request.userData).unwrap();
        assert_eq!(code, U256::from(1));
        assert_eq!(amounts, vec![U256::ZERO, U256::from(1_000_000)]);
        assert_eq!(min_bpt_out, call.min_bpt_out.amount());
    }

    #[tokio::test]
    async fn single_token_join_for_exact_bpt_out() {
        let pool = pool(PoolType::Weighted, 0x77, TokenOrdering::Ascending);
        let mut simulator = MockSimulator::new();
        simulator.expect_simulate().times(1).returning(|_, call| {
            let query = BalancerV2Helpers::queryJoinCall::abi_decode(&call).unwrap();
            let (code, bpt_out, index) =
                <(U256, U256, U256)>::abi_decode_params(&query.request.userData).unwrap();
            assert_eq!(code, U256::from(2));
            assert_eq!(bpt_out, U256::from(1_000));
            assert_eq!(index, U256::from(1));
            assert_eq!(query.request.maxAmountsIn, vec![U256::MAX; 2]);
            Ok(BalancerV2Helpers::queryJoinCall::abi_encode_returns(
                &BalancerV2Helpers::queryJoinReturn {
                    bptOut: bpt_out,
                    amountsIn: vec![U256::ZERO, U256::from(999)],
                },
            )
            .into())
        });

        let contracts = contracts();
        let ctx = Context {
            simulator: &simulator,
            contracts: &contracts,
        };
        let input = JoinInput::SingleTokenExactOut {
            chain_id: 1,
            bpt_out: InputAmount::new(pool.address(), 18, U256::from(1_000)),
            token_in: Address::repeat_byte(0x20),
        };
        let query = Weighted.query_join(&input, &pool, &ctx).await.unwrap();
        assert_eq!(query.token_in_index, Some(1));

        let call = Weighted
            .build_join_call(&query, &params(), &contracts)
            .unwrap();
        // The BPT amount is exact, the deposit gets a ceiling.
        assert_eq!(call.min_bpt_out.amount(), U256::from(1_000));
        assert_eq!(
            call.max_amounts_in
                .iter()
                .map(|amount| amount.amount())
                .collect::<Vec<_>>(),
            vec![U256::ZERO, U256::from(1_009)]
        );
        let join = BalancerV2Vault::joinPoolCall::abi_decode(&call.call).unwrap();
        assert_eq!(
            join.request.maxAmountsIn,
            vec![U256::ZERO, U256::from(1_009)]
        );
        let (code, bpt_out, index) =
            <(U256, U256, U256)>::abi_decode_params(&join.request.userData).unwrap();
        assert_eq!(code, U256::from(2));
        assert_eq!(bpt_out, U256::from(1_000));
        assert_eq!(index, U256::from(1));
    }

    #[test]
    fn stored_queries_must_list_every_pool_token() {
        let pool = pool(PoolType::Weighted, 0x77, TokenOrdering::Ascending);
        let tokens = pool
            .tokens_without_bpt()
            .map(|token| token.token.clone())
            .collect::<Vec<_>>();
        let amount = |index: usize| TokenAmount::from_raw(tokens[index].clone(), U256::from(1));

        let join = JoinQuery {
            pool: pool.clone(),
            kind: JoinKind::Proportional,
            amounts_in: vec![amount(1)],
            bpt_out: TokenAmount::from_raw(pool.bpt(), U256::from(1)),
            token_in_index: None,
            route: None,
        };
        // The wrapped native token is the missing one.
        for params in [params(), params().with_native_asset()] {
            assert!(matches!(
                Weighted.build_join_call(&join, &params, &contracts()),
                Err(Error::Build(BuildError::MalformedQuery(_)))
            ));
        }

        let exit = ExitQuery {
            pool: pool.clone(),
            kind: ExitKind::Proportional,
            bpt_in: TokenAmount::from_raw(pool.bpt(), U256::from(1)),
            amounts_out: vec![amount(1), amount(0)],
            token_out_index: None,
            route: None,
        };
        assert!(matches!(
            Weighted.build_exit_call(&exit, &params(), &contracts()),
            Err(Error::Build(BuildError::MalformedQuery(_)))
        ));

        let exit = ExitQuery {
            amounts_out: vec![amount(0), amount(1)],
            ..exit
        };
        assert!(
            Weighted
                .build_exit_call(&exit, &params(), &contracts())
                .is_ok()
        );
    }

    #[tokio::test]
    async fn proportional_join_from_a_token_amount() {
        let pool = pool(PoolType::Weighted, 0x77, TokenOrdering::Ascending);
        let pool_address = pool.address();
        let tokens = pool.token_addresses();
        let mut simulator = MockSimulator::new();
        simulator.expect_simulate().times(3).returning(move |to, call| {
            let selector = &call[..4];
            let result = if selector == BalancerV2Vault::getPoolTokensCall::SELECTOR {
                BalancerV2Vault::getPoolTokensCall::abi_encode_returns(
                    &BalancerV2Vault::getPoolTokensReturn {
                        tokens: tokens.clone(),
                        balances: vec![100u64.eth(), U256::from(400_000_000)],
                        lastChangeBlock: U256::from(1),
                    },
                )
            } else if selector == BalancerV2BasePool::totalSupplyCall::SELECTOR {
                assert_eq!(to, pool_address);
                1_000u64.eth().abi_encode()
            } else {
                let query = BalancerV2Helpers::queryJoinCall::abi_decode(&call).unwrap();
                let (code, bpt_out) =
                    <(U256, U256)>::abi_decode_params(&query.request.userData).unwrap();
                assert_eq!(code, U256::from(3));
                // 10 of 100 tokens is a tenth of the supply.
                assert_eq!(bpt_out, 100u64.eth());
                BalancerV2Helpers::queryJoinCall::abi_encode_returns(
                    &BalancerV2Helpers::queryJoinReturn {
                        bptOut: bpt_out,
                        amountsIn: vec![10u64.eth(), U256::from(40_000_000)],
                    },
                )
            };
            Ok(result.into())
        });

        let contracts = contracts();
        let ctx = Context {
            simulator: &simulator,
            contracts: &contracts,
        };
        let input = JoinInput::Proportional {
            chain_id: 1,
            reference_amount: InputAmount::new(Address::repeat_byte(0x10), 18, 10u64.eth()),
        };
        let query = Weighted.query_join(&input, &pool, &ctx).await.unwrap();

        let call = Weighted
            .build_join_call(&query, &params().with_native_asset(), &contracts)
            .unwrap();
        assert_eq!(call.min_bpt_out.amount(), 100u64.eth());
        assert_eq!(
            call.max_amounts_in
                .iter()
                .map(|amount| amount.amount())
                .collect::<Vec<_>>(),
            vec![U256::from(10_100_000_000_000_000_000_u128), U256::from(40_400_000)]
        );
        // The wrapped native token is paid with native value.
        assert_eq!(call.value, U256::from(10_100_000_000_000_000_000_u128));
        let join = BalancerV2Vault::joinPoolCall::abi_decode(&call.call).unwrap();
        assert_eq!(join.request.assets[0], Address::ZERO);
    }

    #[tokio::test]
    async fn unbalanced_exit_bounds_bpt_in() {
        let pool = pool(PoolType::Weighted, 0x77, TokenOrdering::Ascending);
        let mut simulator = MockSimulator::new();
        simulator.expect_simulate().times(1).returning(|_, call| {
            let query = BalancerV2Helpers::queryExitCall::abi_decode(&call).unwrap();
            let (code, amounts, max_bpt_in) =
                <(U256, Vec<U256>, U256)>::abi_decode_params(&query.request.userData).unwrap();
            assert_eq!(code, U256::from(2));
            assert_eq!(max_bpt_in, U256::MAX);
            assert_eq!(query.request.minAmountsOut, amounts);
            Ok(BalancerV2Helpers::queryExitCall::abi_encode_returns(
                &BalancerV2Helpers::queryExitReturn {
                    bptIn: U256::from(1_000),
                    amountsOut: amounts,
                },
            )
            .into())
        });

        let contracts = contracts();
        let ctx = Context {
            simulator: &simulator,
            contracts: &contracts,
        };
        let input = ExitInput::Unbalanced {
            chain_id: 1,
            amounts_out: vec![
                InputAmount::new(Address::repeat_byte(0x20), 6, U256::from(5)),
                InputAmount::new(Address::repeat_byte(0x10), 18, U256::from(7)),
            ],
        };
        let query = Weighted.query_exit(&input, &pool, &ctx).await.unwrap();
        assert_eq!(
            query
                .amounts_out
                .iter()
                .map(|amount| amount.amount())
                .collect::<Vec<_>>(),
            vec![U256::from(7), U256::from(5)]
        );

        let call = Weighted
            .build_exit_call(&query, &params(), &contracts)
            .unwrap();
        assert_eq!(call.max_bpt_in.amount(), U256::from(1_010));
        let exit = BalancerV2Vault::exitPoolCall::abi_decode(&call.call).unwrap();
        assert_eq!(
            exit.request.minAmountsOut,
            vec![U256::from(7), U256::from(5)]
        );
        let (_, _, max_bpt_in) =
            <(U256, Vec<U256>, U256)>::abi_decode_params(&exit.request.userData).unwrap();
        assert_eq!(max_bpt_in, U256::from(1_010));
    }

    #[test]
    fn init() {
        let pool = pool(PoolType::Weighted, 0x77, TokenOrdering::Ascending);
        let input = InitInput {
            chain_id: 1,
            amounts_in: vec![
                InputAmount::new(Address::repeat_byte(0x20), 6, U256::from(4_000_000)),
                InputAmount::new(Address::repeat_byte(0x10), 18, 1u64.eth()),
            ],
        };
        let params = InitParams {
            sender: Address::repeat_byte(0x01),
            recipient: Address::repeat_byte(0x01),
            wrapped_native_as_native: false,
        };

        let call = Weighted
            .build_init_call(&input, &pool, &params, &contracts())
            .unwrap();
        let join = BalancerV2Vault::joinPoolCall::abi_decode(&call.call).unwrap();
        assert_eq!(
            join.request.maxAmountsIn,
            vec![1u64.eth(), U256::from(4_000_000)]
        );
        let (code, amounts) =
            <(U256, Vec<U256>)>::abi_decode_params(&join.request.userData).unwrap();
        assert_eq!(code, U256::ZERO);
        assert_eq!(amounts, join.request.maxAmountsIn);
        assert_eq!(call.value, U256::ZERO);
    }
}
