//! Entry point for callers. Requests move through
//! `prepare → query → build_call`, each step consuming the previous one.

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
            PoolStateInput,
            eth::{Address, ChainId},
        },
        error::{Error, ValidationError},
        handler::{Context, Handler, Registry},
        infra::{config::Config, contracts::Contracts, simulator::Simulator},
        validator,
    },
    std::sync::Arc,
    tracing::instrument,
};

/// Encodes liquidity operations for the pool types of a registry.
#[derive(Clone)]
pub struct Actions {
    registry: Registry,
    simulator: Arc<dyn Simulator>,
    config: Config,
}

impl Actions {
    pub fn new(registry: Registry, simulator: Arc<dyn Simulator>, config: Config) -> Self {
        Self {
            registry,
            simulator,
            config,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The contracts of a chain, with configured overrides applied.
    pub fn contracts(&self, chain_id: ChainId) -> Result<Contracts, ValidationError> {
        Contracts::new(chain_id, self.config.addresses(chain_id))
    }

    /// Build parameters using the configured default slippage.
    pub fn default_params(&self, sender: Address, recipient: Address) -> BuildParams {
        BuildParams::new(self.config.default_slippage, sender, recipient)
    }

    /// Validates a join without touching the chain.
    pub fn prepare_join(
        &self,
        input: JoinInput,
        pool: &PoolStateInput,
    ) -> Result<PreparedJoin, Error> {
        let handler = self.registry.resolve(&pool.pool_type)?;
        let capabilities = handler.capabilities();
        capabilities.ensure_join(&pool.pool_type, input.kind())?;
        let state = PoolState::new(pool, input.chain_id(), capabilities.ordering)?;
        validator::validate_join(&capabilities, &input, &state)?;
        let contracts = self.contracts(input.chain_id())?;
        Ok(PreparedJoin {
            handler,
            simulator: self.simulator.clone(),
            contracts,
            input,
            pool: state,
        })
    }

    /// Validates an exit without touching the chain.
    pub fn prepare_exit(
        &self,
        input: ExitInput,
        pool: &PoolStateInput,
    ) -> Result<PreparedExit, Error> {
        let handler = self.registry.resolve(&pool.pool_type)?;
        let capabilities = handler.capabilities();
        capabilities.ensure_exit(&pool.pool_type, input.kind())?;
        let state = PoolState::new(pool, input.chain_id(), capabilities.ordering)?;
        validator::validate_exit(&capabilities, &input, &state)?;
        let contracts = self.contracts(input.chain_id())?;
        Ok(PreparedExit {
            handler,
            simulator: self.simulator.clone(),
            contracts,
            input,
            pool: state,
        })
    }

    pub async fn query_join(
        &self,
        input: JoinInput,
        pool: &PoolStateInput,
    ) -> Result<QueriedJoin, Error> {
        self.prepare_join(input, pool)?.query().await
    }

    pub async fn query_exit(
        &self,
        input: ExitInput,
        pool: &PoolStateInput,
    ) -> Result<QueriedExit, Error> {
        self.prepare_exit(input, pool)?.query().await
    }

    /// Builds a join from a previously queried result.
    pub fn build_join_call(
        &self,
        query: &JoinQuery,
        params: &BuildParams,
    ) -> Result<JoinCall, Error> {
        let handler = self.registry.resolve(query.pool.pool_type())?;
        let contracts = self.contracts(query.pool.chain_id())?;
        handler.build_join_call(query, params, &contracts)
    }

    /// Builds an exit from a previously queried result.
    pub fn build_exit_call(
        &self,
        query: &ExitQuery,
        params: &BuildParams,
    ) -> Result<ExitCall, Error> {
        let handler = self.registry.resolve(query.pool.pool_type())?;
        let contracts = self.contracts(query.pool.chain_id())?;
        handler.build_exit_call(query, params, &contracts)
    }

    /// Initializes a pool with exactly the given amounts. Nothing is
    /// simulated.
    #[instrument(skip_all, fields(pool = %pool.id, chain = input.chain_id))]
    pub fn build_init_call(
        &self,
        input: &InitInput,
        pool: &PoolStateInput,
        params: &InitParams,
    ) -> Result<InitCall, Error> {
        let handler = self.registry.resolve(&pool.pool_type)?;
        let capabilities = handler.capabilities();
        capabilities.ensure_init(&pool.pool_type)?;
        let state = PoolState::new(pool, input.chain_id, capabilities.ordering)?;
        validator::validate_init(&capabilities, input, &state)?;
        let contracts = self.contracts(input.chain_id)?;
        let call = handler.build_init_call(input, &state, params, &contracts)?;
        tracing::debug!(to = %call.to, value = %call.value, "built init call");
        Ok(call)
    }
}

impl std::fmt::Debug for Actions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Actions")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// A validated join ready to be simulated.
pub struct PreparedJoin {
    handler: Arc<dyn Handler>,
    simulator: Arc<dyn Simulator>,
    contracts: Contracts,
    input: JoinInput,
    pool: PoolState,
}

impl PreparedJoin {
    pub fn pool(&self) -> &PoolState {
        &self.pool
    }

    #[instrument(skip_all, fields(pool = %self.pool.id(), kind = %self.input.kind()))]
    pub async fn query(self) -> Result<QueriedJoin, Error> {
        let ctx = Context {
            simulator: self.simulator.as_ref(),
            contracts: &self.contracts,
        };
        let query = self
            .handler
            .query_join(&self.input, &self.pool, &ctx)
            .await
            .inspect_err(|err| tracing::warn!(?err, "join query failed"))?;
        tracing::debug!(bpt_out = %query.bpt_out.amount(), "queried join");
        Ok(QueriedJoin {
            handler: self.handler,
            contracts: self.contracts,
            query,
        })
    }
}

/// A simulated join.
pub struct QueriedJoin {
    handler: Arc<dyn Handler>,
    contracts: Contracts,
    query: JoinQuery,
}

impl QueriedJoin {
    pub fn result(&self) -> &JoinQuery {
        &self.query
    }

    pub fn into_result(self) -> JoinQuery {
        self.query
    }

    pub fn build_call(self, params: &BuildParams) -> Result<JoinCall, Error> {
        self.handler
            .build_join_call(&self.query, params, &self.contracts)
    }
}

/// A validated exit ready to be simulated.
pub struct PreparedExit {
    handler: Arc<dyn Handler>,
    simulator: Arc<dyn Simulator>,
    contracts: Contracts,
    input: ExitInput,
    pool: PoolState,
}

impl PreparedExit {
    pub fn pool(&self) -> &PoolState {
        &self.pool
    }

    #[instrument(skip_all, fields(pool = %self.pool.id(), kind = %self.input.kind()))]
    pub async fn query(self) -> Result<QueriedExit, Error> {
        let ctx = Context {
            simulator: self.simulator.as_ref(),
            contracts: &self.contracts,
        };
        let query = self
            .handler
            .query_exit(&self.input, &self.pool, &ctx)
            .await
            .inspect_err(|err| tracing::warn!(?err, "exit query failed"))?;
        tracing::debug!(bpt_in = %query.bpt_in.amount(), "queried exit");
        Ok(QueriedExit {
            handler: self.handler,
            contracts: self.contracts,
            query,
        })
    }
}

/// A simulated exit.
pub struct QueriedExit {
    handler: Arc<dyn Handler>,
    contracts: Contracts,
    query: ExitQuery,
}

impl QueriedExit {
    pub fn result(&self) -> &ExitQuery {
        &self.query
    }

    pub fn into_result(self) -> ExitQuery {
        self.query
    }

    pub fn build_call(self, params: &BuildParams) -> Result<ExitCall, Error> {
        self.handler
            .build_exit_call(&self.query, params, &self.contracts)
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            domain::{
                InputAmount,
                JoinKind,
                PoolId,
                PoolType,
                eth::U256,
                pool::PoolTokenInput,
            },
            infra::simulator::MockSimulator,
        },
        alloy::primitives::B256,
    };

    fn pool(pool_type: PoolType) -> PoolStateInput {
        let mut id = B256::repeat_byte(0x77);
        id.0[20..].fill(0);
        let id = PoolId(id);
        PoolStateInput {
            id,
            address: id.address(),
            pool_type,
            tokens: vec![
                PoolTokenInput {
                    address: testlib::tokens::WETH,
                    decimals: 18,
                    index: None,
                    symbol: Some("WETH".to_string()),
                    nested: None,
                },
                PoolTokenInput {
                    address: testlib::tokens::USDC,
                    decimals: 6,
                    index: None,
                    symbol: Some("USDC".to_string()),
                    nested: None,
                },
            ],
        }
    }

    fn actions(simulator: MockSimulator) -> Actions {
        Actions::new(Registry::default(), Arc::new(simulator), Config::default())
    }

    #[test]
    fn unsupported_pool_types_fail_first() {
        let actions = actions(MockSimulator::new());
        // The amount is invalid as well.
        let input = JoinInput::SingleToken {
            chain_id: 1,
            amount_in: InputAmount::new(Address::repeat_byte(0x99), 3, U256::ZERO),
        };
        let result = actions.prepare_join(input, &pool(PoolType::Other("FX".to_string())));
        assert!(matches!(result, Err(Error::UnsupportedPoolType(_))));
    }

    #[test]
    fn unknown_chains_are_rejected() {
        let actions = actions(MockSimulator::new());
        let input = JoinInput::SingleToken {
            chain_id: 1337,
            amount_in: InputAmount::new(testlib::tokens::USDC, 6, U256::from(1)),
        };
        let result = actions.prepare_join(input, &pool(PoolType::Weighted));
        assert!(matches!(
            result,
            Err(Error::Validation(ValidationError::UnsupportedChain(1337)))
        ));
    }

    #[tokio::test]
    async fn invalid_requests_are_never_simulated() {
        let actions = actions(MockSimulator::new());
        let input = JoinInput::Unbalanced {
            chain_id: 1,
            amounts_in: vec![InputAmount::new(testlib::tokens::USDC, 6, U256::from(1))],
        };
        let result = actions.query_join(input, &pool(PoolType::Weighted)).await;
        assert!(matches!(
            result,
            Err(Error::Validation(ValidationError::AmountsLength {
                expected: 2,
                actual: 1
            }))
        ));
    }

    #[tokio::test]
    async fn simulation_failures_are_propagated() {
        let mut simulator = MockSimulator::new();
        simulator.expect_simulate().times(1).returning(|to, call| {
            Err(crate::infra::simulator::SimulationError::Reverted {
                to,
                call,
                data: Default::default(),
            })
        });
        let actions = actions(simulator);
        let input = JoinInput::SingleToken {
            chain_id: 1,
            amount_in: InputAmount::new(testlib::tokens::USDC, 6, U256::from(1)),
        };
        let prepared = actions.prepare_join(input, &pool(PoolType::Weighted)).unwrap();
        assert_eq!(prepared.pool().tokens().len(), 2);
        let result = prepared.query().await;
        assert!(matches!(
            result,
            Err(Error::Simulation(
                crate::infra::simulator::SimulationError::Reverted { .. }
            ))
        ));
    }

    #[test]
    fn default_params_use_the_configured_slippage() {
        let actions = actions(MockSimulator::new());
        let params = actions.default_params(Address::repeat_byte(1), Address::repeat_byte(2));
        assert_eq!(params.slippage, Config::default().default_slippage);
        assert!(!params.wrapped_native_as_native);
        assert!(
            actions
                .registry()
                .resolve(&PoolType::Weighted)
                .unwrap()
                .capabilities()
                .supports_join(JoinKind::SingleTokenExactOut)
        );
    }
}
