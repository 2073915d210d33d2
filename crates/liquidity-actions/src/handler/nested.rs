//! Linear and boosted pools are joined and exited by swapping through the
//! vault. A boosted pool's tokens are the BPTs of linear pools, so reaching a
//! main token takes two hops: main token to linear BPT to boosted BPT. Hops
//! after the first swap the full output of the previous hop.

use {
    super::{Context, Handler, common},
    crate::{
        domain::{
            BatchRoute,
            BuildParams,
            ExitCall,
            ExitInput,
            ExitKind,
            ExitQuery,
            JoinCall,
            JoinInput,
            JoinKind,
            JoinQuery,
            PoolId,
            PoolState,
            SwapStep,
            eth::{Address, I256, Token, TokenAmount, U256},
            slippage::Bound,
            sorting::TokenOrdering,
        },
        error::{BuildError, Error, ValidationError},
        infra::{
            contracts::Contracts,
            simulator::{self, SimulationError},
        },
        validator::{Capabilities, InputTokens},
    },
    alloy::sol_types::SolCall,
    contracts::BalancerV2Vault,
    std::sync::LazyLock,
};

/// An impossibly distant future timestamp. Note that we use `0x80000...00`
/// as the value so that it is mostly 0's to save small amounts of gas on
/// calldata.
static NEVER: LazyLock<U256> = LazyLock::new(|| U256::from(1) << 255);

/// `SwapKind.GIVEN_IN`
const GIVEN_IN: u8 = 0;

#[derive(Clone, Copy, Debug)]
pub struct Nested {
    capabilities: Capabilities,
}

impl Nested {
    /// Linear pools swap their main or wrapped token directly for BPT.
    pub fn linear() -> Self {
        Self {
            capabilities: Capabilities {
                join: &[JoinKind::SingleToken],
                exit: &[ExitKind::SingleToken],
                init: false,
                ordering: TokenOrdering::AscendingWithBpt,
                tokens: InputTokens::PoolTokens,
            },
        }
    }

    /// Boosted pools are entered and left through the main tokens of their
    /// linear pools.
    pub fn boosted() -> Self {
        Self {
            capabilities: Capabilities {
                join: &[JoinKind::Unbalanced, JoinKind::SingleToken],
                exit: &[ExitKind::SingleToken],
                init: false,
                ordering: TokenOrdering::AscendingWithBpt,
                tokens: InputTokens::LeafTokens,
            },
        }
    }

    /// The tokens deposited or withdrawn, in vault order.
    fn leaf_tokens(&self, pool: &PoolState) -> Vec<Token> {
        self.capabilities.input_tokens(pool)
    }

    fn leaf_addresses(&self, pool: &PoolState) -> Vec<Address> {
        self.leaf_tokens(pool).iter().map(Token::address).collect()
    }
}

#[async_trait::async_trait]
impl Handler for Nested {
    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    async fn query_join(
        &self,
        input: &JoinInput,
        pool: &PoolState,
        ctx: &Context<'_>,
    ) -> Result<JoinQuery, Error> {
        self.capabilities
            .ensure_join(pool.pool_type(), input.kind())?;
        let leaves = self.leaf_tokens(pool);
        let (deposits, token_in_index) = match input {
            JoinInput::SingleToken { amount_in, .. } => {
                let index = leaf_index(&leaves, amount_in.address)?;
                (vec![(amount_in.address, amount_in.raw_amount)], Some(index))
            }
            JoinInput::Unbalanced { amounts_in, .. } => (
                amounts_in
                    .iter()
                    .map(|amount| (amount.address, amount.raw_amount))
                    .collect(),
                None,
            ),
            _ => {
                return Err(ValidationError::JoinKindNotSupported {
                    pool_type: pool.pool_type().clone(),
                    kind: input.kind(),
                }
                .into());
            }
        };

        let mut route = RouteBuilder::default();
        for (token, amount) in deposits.into_iter().filter(|(_, amount)| !amount.is_zero()) {
            route.push(&join_path(pool, token)?, amount);
        }
        route.asset(pool.address());
        let route = route.build();

        let deltas = query_batch_swap(&route, ctx).await?;
        let unexpected = |message| {
            SimulationError::unexpected(ctx.contracts.vault, &query_call(&route), message)
        };
        let bpt_out = route
            .asset_index(pool.address())
            .and_then(|index| received(&deltas[index]))
            .ok_or_else(|| unexpected("the join does not mint pool tokens"))?;
        let amounts_in = leaves
            .into_iter()
            .map(|token| {
                let amount = match route.asset_index(token.address()) {
                    Some(index) => {
                        paid(&deltas[index]).ok_or_else(|| unexpected("a deposit is paid out"))?
                    }
                    None => U256::ZERO,
                };
                Ok(TokenAmount::from_raw(token, amount))
            })
            .collect::<Result<Vec<_>, SimulationError>>()?;

        Ok(JoinQuery {
            pool: pool.clone(),
            kind: input.kind(),
            amounts_in,
            bpt_out: TokenAmount::from_raw(pool.bpt(), bpt_out),
            token_in_index,
            route: Some(route),
        })
    }

    fn build_join_call(
        &self,
        query: &JoinQuery,
        params: &BuildParams,
        contracts: &Contracts,
    ) -> Result<JoinCall, Error> {
        self.capabilities
            .ensure_join(query.pool.pool_type(), query.kind)?;
        let route = query
            .route
            .as_ref()
            .ok_or(BuildError::MalformedQuery("join without swaps"))?;
        common::ensure_amounts(&query.amounts_in, self.leaf_addresses(&query.pool))?;
        let min_bpt_out = params
            .slippage
            .apply_to(query.bpt_out.amount(), Bound::Min)?;

        let mut limits = vec![I256::ZERO; route.assets.len()];
        for amount in query.amounts_in.iter().filter(|amount| !amount.is_zero()) {
            let index = route
                .asset_index(amount.token().address())
                .ok_or(BuildError::MalformedQuery("deposit outside of the swaps"))?;
            limits[index] = signed(amount.amount())?;
        }
        let bpt_index = route
            .asset_index(query.pool.address())
            .ok_or(BuildError::MalformedQuery("swaps do not mint pool tokens"))?;
        limits[bpt_index] = negated(min_bpt_out)?;

        let mut assets = route.assets.clone();
        let native = common::use_native_asset(
            &mut assets,
            contracts,
            query.pool.chain_id(),
            params.wrapped_native_as_native,
        )?;
        let value = match native {
            Some(index) => limits[index].into_raw(),
            None => U256::ZERO,
        };

        Ok(JoinCall {
            to: contracts.vault,
            call: batch_swap_call(route, assets, limits, params).into(),
            value,
            min_bpt_out: query.bpt_out.with_amount(min_bpt_out),
            max_amounts_in: query.amounts_in.clone(),
        })
    }

    async fn query_exit(
        &self,
        input: &ExitInput,
        pool: &PoolState,
        ctx: &Context<'_>,
    ) -> Result<ExitQuery, Error> {
        self.capabilities
            .ensure_exit(pool.pool_type(), input.kind())?;
        let ExitInput::SingleToken {
            bpt_in, token_out, ..
        } = input
        else {
            return Err(ValidationError::ExitKindNotSupported {
                pool_type: pool.pool_type().clone(),
                kind: input.kind(),
            }
            .into());
        };
        let leaves = self.leaf_tokens(pool);
        let token_out_index = leaf_index(&leaves, *token_out)?;

        let mut route = RouteBuilder::default();
        route.push(&exit_path(pool, *token_out)?, bpt_in.raw_amount);
        let route = route.build();

        let deltas = query_batch_swap(&route, ctx).await?;
        let unexpected = |message| {
            SimulationError::unexpected(ctx.contracts.vault, &query_call(&route), message)
        };
        let bpt_in = route
            .asset_index(pool.address())
            .and_then(|index| paid(&deltas[index]))
            .ok_or_else(|| unexpected("the exit does not burn pool tokens"))?;
        let amount_out = route
            .asset_index(*token_out)
            .and_then(|index| received(&deltas[index]))
            .ok_or_else(|| unexpected("the exit does not pay out"))?;
        let amounts_out = leaves
            .into_iter()
            .enumerate()
            .map(|(index, token)| {
                let amount = if index == token_out_index {
                    amount_out
                } else {
                    U256::ZERO
                };
                TokenAmount::from_raw(token, amount)
            })
            .collect();

        Ok(ExitQuery {
            pool: pool.clone(),
            kind: input.kind(),
            bpt_in: TokenAmount::from_raw(pool.bpt(), bpt_in),
            amounts_out,
            token_out_index: Some(token_out_index),
            route: Some(route),
        })
    }

    fn build_exit_call(
        &self,
        query: &ExitQuery,
        params: &BuildParams,
        contracts: &Contracts,
    ) -> Result<ExitCall, Error> {
        self.capabilities
            .ensure_exit(query.pool.pool_type(), query.kind)?;
        let route = query
            .route
            .as_ref()
            .ok_or(BuildError::MalformedQuery("exit without swaps"))?;
        common::ensure_amounts(&query.amounts_out, self.leaf_addresses(&query.pool))?;
        let min_amounts_out = common::widen(
            &query
                .amounts_out
                .iter()
                .map(TokenAmount::amount)
                .collect::<Vec<_>>(),
            params.slippage,
            Bound::Min,
        )?;

        let mut limits = vec![I256::ZERO; route.assets.len()];
        let bpt_index = route
            .asset_index(query.pool.address())
            .ok_or(BuildError::MalformedQuery("swaps do not burn pool tokens"))?;
        limits[bpt_index] = signed(query.bpt_in.amount())?;
        for (amount, min) in query.amounts_out.iter().zip(&min_amounts_out) {
            if amount.is_zero() {
                continue;
            }
            let index = route
                .asset_index(amount.token().address())
                .ok_or(BuildError::MalformedQuery("withdrawal outside of the swaps"))?;
            limits[index] = negated(*min)?;
        }

        let mut assets = route.assets.clone();
        common::use_native_asset(
            &mut assets,
            contracts,
            query.pool.chain_id(),
            params.wrapped_native_as_native,
        )?;

        Ok(ExitCall {
            to: contracts.vault,
            call: batch_swap_call(route, assets, limits, params).into(),
            value: U256::ZERO,
            max_bpt_in: query.bpt_in.clone(),
            min_amounts_out: query
                .amounts_out
                .iter()
                .zip(min_amounts_out)
                .map(|(amount, min)| amount.with_amount(min))
                .collect(),
        })
    }
}

/// A single swap of a path.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Hop {
    pool: PoolId,
    token_in: Address,
    token_out: Address,
}

/// Hops from a leaf token into the pool's BPT.
fn join_path(pool: &PoolState, token: Address) -> Result<Vec<Hop>, ValidationError> {
    for pool_token in pool.tokens_without_bpt() {
        let address = pool_token.token.address();
        let direct = Hop {
            pool: pool.id(),
            token_in: address,
            token_out: pool.address(),
        };
        if address == token {
            return Ok(vec![direct]);
        }
        if let Some(nested) = pool_token
            .nested
            .as_ref()
            .filter(|nested| nested.main_token.address() == token)
        {
            let into_linear = Hop {
                pool: nested.id,
                token_in: token,
                token_out: address,
            };
            return Ok(vec![into_linear, direct]);
        }
    }
    Err(ValidationError::UnknownToken(token))
}

/// Hops from the pool's BPT out to a leaf token.
fn exit_path(pool: &PoolState, token: Address) -> Result<Vec<Hop>, ValidationError> {
    Ok(join_path(pool, token)?
        .into_iter()
        .rev()
        .map(|hop| Hop {
            token_in: hop.token_out,
            token_out: hop.token_in,
            ..hop
        })
        .collect())
}

fn leaf_index(leaves: &[Token], token: Address) -> Result<usize, ValidationError> {
    leaves
        .iter()
        .position(|leaf| leaf.address() == token)
        .ok_or(ValidationError::UnknownToken(token))
}

#[derive(Default)]
struct RouteBuilder {
    swaps: Vec<SwapStep>,
    assets: Vec<Address>,
}

impl RouteBuilder {
    fn asset(&mut self, token: Address) -> usize {
        match self.assets.iter().position(|asset| *asset == token) {
            Some(index) => index,
            None => {
                self.assets.push(token);
                self.assets.len() - 1
            }
        }
    }

    /// Appends the hops of a path. Only the first hop has an explicit amount.
    fn push(&mut self, path: &[Hop], amount: U256) {
        for (i, hop) in path.iter().enumerate() {
            let step = SwapStep {
                pool_id: hop.pool,
                asset_in: self.asset(hop.token_in),
                asset_out: self.asset(hop.token_out),
                amount: if i == 0 { amount } else { U256::ZERO },
            };
            self.swaps.push(step);
        }
    }

    fn build(self) -> BatchRoute {
        BatchRoute {
            swaps: self.swaps,
            assets: self.assets,
        }
    }
}

fn swaps(route: &BatchRoute) -> Vec<BalancerV2Vault::BatchSwapStep> {
    route
        .swaps
        .iter()
        .map(|step| BalancerV2Vault::BatchSwapStep {
            poolId: step.pool_id.0,
            assetInIndex: U256::from(step.asset_in),
            assetOutIndex: U256::from(step.asset_out),
            amount: step.amount,
            userData: Default::default(),
        })
        .collect()
}

fn query_call(route: &BatchRoute) -> BalancerV2Vault::queryBatchSwapCall {
    BalancerV2Vault::queryBatchSwapCall {
        kind: GIVEN_IN,
        swaps: swaps(route),
        assets: route.assets.clone(),
        funds: BalancerV2Vault::FundManagement {
            sender: Address::ZERO,
            fromInternalBalance: false,
            recipient: Address::ZERO,
            toInternalBalance: false,
        },
    }
}

async fn query_batch_swap(route: &BatchRoute, ctx: &Context<'_>) -> Result<Vec<I256>, Error> {
    let call = query_call(route);
    let deltas = simulator::call(ctx.simulator, ctx.contracts.vault, &call).await?;
    if deltas.len() != route.assets.len() {
        return Err(SimulationError::unexpected(
            ctx.contracts.vault,
            &call,
            format!(
                "expected {} asset deltas but got {}",
                route.assets.len(),
                deltas.len()
            ),
        )
        .into());
    }
    Ok(deltas)
}

fn batch_swap_call(
    route: &BatchRoute,
    assets: Vec<Address>,
    limits: Vec<I256>,
    params: &BuildParams,
) -> Vec<u8> {
    BalancerV2Vault::batchSwapCall {
        kind: GIVEN_IN,
        swaps: swaps(route),
        assets,
        funds: BalancerV2Vault::FundManagement {
            sender: params.sender,
            fromInternalBalance: false,
            recipient: params.recipient,
            toInternalBalance: false,
        },
        limits,
        deadline: *NEVER,
    }
    .abi_encode()
}

/// Positive deltas are paid into the vault.
fn paid(delta: &I256) -> Option<U256> {
    delta.is_positive().then(|| delta.unsigned_abs())
}

/// Negative deltas are paid out by the vault.
fn received(delta: &I256) -> Option<U256> {
    delta.is_negative().then(|| delta.unsigned_abs())
}

fn signed(amount: U256) -> Result<I256, BuildError> {
    I256::try_from(amount).map_err(|_| BuildError::Arithmetic("batch swap limit"))
}

fn negated(amount: U256) -> Result<I256, BuildError> {
    signed(amount)?
        .checked_neg()
        .ok_or(BuildError::Arithmetic("batch swap limit"))
}
