//! Joins and exits through the vault's `joinPool` and `exitPool`, shared by
//! the pool families that describe their operations with user data.

use {
    super::Context,
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
            InputAmount,
            JoinCall,
            JoinInput,
            JoinKind,
            JoinQuery,
            PoolState,
            eth::{Address, Bytes, ChainId, TokenAmount, U256},
            slippage::{Bound, Slippage},
        },
        error::{BuildError, Error, ValidationError},
        infra::{
            contracts::Contracts,
            simulator::{self, SimulationError, Simulator},
        },
    },
    alloy::sol_types::{SolCall, SolValue},
    contracts::{BalancerV2BasePool, BalancerV2Helpers, BalancerV2Vault},
    number::U256Ext,
};

/// User data kind codes of a pool family. Kinds the family does not
/// implement are `None`.
#[derive(Clone, Copy, Debug)]
pub struct UserDataKinds {
    pub init: Option<u8>,
    pub exact_tokens_in_for_bpt_out: Option<u8>,
    pub token_in_for_exact_bpt_out: Option<u8>,
    pub all_tokens_in_for_exact_bpt_out: Option<u8>,
    pub exact_bpt_in_for_one_token_out: Option<u8>,
    pub exact_bpt_in_for_tokens_out: Option<u8>,
    pub bpt_in_for_exact_tokens_out: Option<u8>,
}

/// How a pool reports the BPT supply that balances are proportional to.
#[derive(Clone, Copy, Debug)]
pub enum Supply {
    /// `totalSupply()`.
    Total,
    /// `getActualSupply()`, for pools that pre-mint BPT or accrue protocol
    /// fees as unminted BPT.
    Actual,
}

impl Supply {
    async fn query(self, simulator: &dyn Simulator, pool: Address) -> Result<U256, SimulationError> {
        match self {
            Self::Total => {
                simulator::call(simulator, pool, &BalancerV2BasePool::totalSupplyCall {}).await
            }
            Self::Actual => {
                simulator::call(simulator, pool, &BalancerV2BasePool::getActualSupplyCall {})
                    .await
            }
        }
    }
}

/// A pool family joined and exited with vault user data.
#[derive(Clone, Copy, Debug)]
pub struct VaultPool {
    pub kinds: UserDataKinds,
    pub supply: Supply,
}

impl VaultPool {
    pub async fn query_join(
        &self,
        input: &JoinInput,
        pool: &PoolState,
        ctx: &Context<'_>,
    ) -> Result<JoinQuery, Error> {
        let code = self.join_code(pool, input.kind())?;
        let count = pool.tokens_without_bpt().count();
        let (user_data, max_amounts_in, token_in_index) = match input {
            JoinInput::Proportional {
                reference_amount, ..
            } => {
                let bpt_out = if pool.is_bpt(reference_amount.address) {
                    reference_amount.raw_amount
                } else {
                    self.proportional_bpt(pool, reference_amount, ctx).await?
                };
                (
                    user_data::exact_bpt(code, bpt_out),
                    vec![U256::MAX; count],
                    None,
                )
            }
            JoinInput::Unbalanced { amounts_in, .. } => {
                let amounts = ordered_amounts(pool, amounts_in);
                (
                    user_data::exact_tokens_in(code, amounts.clone(), U256::ZERO),
                    amounts,
                    None,
                )
            }
            JoinInput::SingleToken { amount_in, .. } => {
                let index = token_index(pool, amount_in.address)?;
                let mut amounts = vec![U256::ZERO; count];
                amounts[index] = amount_in.raw_amount;
                (
                    user_data::exact_tokens_in(code, amounts.clone(), U256::ZERO),
                    amounts,
                    Some(index),
                )
            }
            JoinInput::SingleTokenExactOut {
                bpt_out, token_in, ..
            } => {
                let index = token_index(pool, *token_in)?;
                (
                    user_data::token_in_for_exact_bpt_out(code, bpt_out.raw_amount, index),
                    vec![U256::MAX; count],
                    Some(index),
                )
            }
        };

        let query = BalancerV2Helpers::queryJoinCall {
            poolId: pool.id().0,
            sender: Address::ZERO,
            recipient: Address::ZERO,
            request: BalancerV2Vault::JoinPoolRequest {
                assets: pool.token_addresses(),
                maxAmountsIn: with_bpt_slot(pool, &max_amounts_in),
                userData: user_data,
                fromInternalBalance: false,
            }
            .into(),
        };
        let result = simulator::call(ctx.simulator, ctx.contracts.helpers, &query).await?;
        let amounts_in = without_bpt_slot(pool, result.amountsIn).ok_or_else(|| {
            SimulationError::unexpected(
                ctx.contracts.helpers,
                &query,
                "join amounts do not match the pool tokens",
            )
        })?;

        Ok(JoinQuery {
            pool: pool.clone(),
            kind: input.kind(),
            amounts_in: token_amounts(pool, amounts_in),
            bpt_out: TokenAmount::from_raw(pool.bpt(), result.bptOut),
            token_in_index,
            route: None,
        })
    }

    pub fn build_join_call(
        &self,
        query: &JoinQuery,
        params: &BuildParams,
        contracts: &Contracts,
    ) -> Result<JoinCall, Error> {
        let pool = &query.pool;
        let code = self.join_code(pool, query.kind)?;
        ensure_amounts(&query.amounts_in, pool_token_addresses(pool))?;
        let amounts = query
            .amounts_in
            .iter()
            .map(TokenAmount::amount)
            .collect::<Vec<_>>();
        let bpt_out = query.bpt_out.amount();

        let (user_data, max_amounts_in, min_bpt_out) = match query.kind {
            JoinKind::Unbalanced | JoinKind::SingleToken => {
                let min_bpt_out = params.slippage.apply_to(bpt_out, Bound::Min)?;
                (
                    user_data::exact_tokens_in(code, amounts.clone(), min_bpt_out),
                    amounts,
                    min_bpt_out,
                )
            }
            JoinKind::Proportional => (
                user_data::exact_bpt(code, bpt_out),
                widen(&amounts, params.slippage, Bound::Max)?,
                bpt_out,
            ),
            JoinKind::SingleTokenExactOut => {
                let index = query
                    .token_in_index
                    .ok_or(BuildError::MalformedQuery("single token join without a token"))?;
                (
                    user_data::token_in_for_exact_bpt_out(code, bpt_out, index),
                    widen(&amounts, params.slippage, Bound::Max)?,
                    bpt_out,
                )
            }
        };

        let max_amounts_in_with_bpt = with_bpt_slot(pool, &max_amounts_in);
        let mut assets = pool.token_addresses();
        let native = use_native_asset(
            &mut assets,
            contracts,
            pool.chain_id(),
            params.wrapped_native_as_native,
        )?;
        let value = native
            .map(|index| max_amounts_in_with_bpt[index])
            .unwrap_or_default();

        let call = BalancerV2Vault::joinPoolCall {
            poolId: pool.id().0,
            sender: params.sender,
            recipient: params.recipient,
            request: BalancerV2Vault::JoinPoolRequest {
                assets,
                maxAmountsIn: max_amounts_in_with_bpt,
                userData: user_data,
                fromInternalBalance: false,
            },
        };

        Ok(JoinCall {
            to: contracts.vault,
            call: call.abi_encode().into(),
            value,
            min_bpt_out: query.bpt_out.with_amount(min_bpt_out),
            max_amounts_in: query
                .amounts_in
                .iter()
                .zip(max_amounts_in)
                .map(|(amount, max)| amount.with_amount(max))
                .collect(),
        })
    }

    pub async fn query_exit(
        &self,
        input: &ExitInput,
        pool: &PoolState,
        ctx: &Context<'_>,
    ) -> Result<ExitQuery, Error> {
        let code = self.exit_code(pool, input.kind())?;
        let count = pool.tokens_without_bpt().count();
        let (user_data, min_amounts_out, token_out_index) = match input {
            ExitInput::Proportional { bpt_in, .. } => (
                user_data::exact_bpt(code, bpt_in.raw_amount),
                vec![U256::ZERO; count],
                None,
            ),
            ExitInput::SingleToken {
                bpt_in, token_out, ..
            } => {
                let index = token_index(pool, *token_out)?;
                (
                    user_data::exact_bpt_in_for_one_token_out(code, bpt_in.raw_amount, index),
                    vec![U256::ZERO; count],
                    Some(index),
                )
            }
            ExitInput::Unbalanced { amounts_out, .. } => {
                let amounts = ordered_amounts(pool, amounts_out);
                (
                    user_data::bpt_in_for_exact_tokens_out(code, amounts.clone(), U256::MAX),
                    amounts,
                    None,
                )
            }
        };

        let query = BalancerV2Helpers::queryExitCall {
            poolId: pool.id().0,
            sender: Address::ZERO,
            recipient: Address::ZERO,
            request: BalancerV2Vault::ExitPoolRequest {
                assets: pool.token_addresses(),
                minAmountsOut: with_bpt_slot(pool, &min_amounts_out),
                userData: user_data,
                toInternalBalance: false,
            }
            .into(),
        };
        let result = simulator::call(ctx.simulator, ctx.contracts.helpers, &query).await?;
        let amounts_out = without_bpt_slot(pool, result.amountsOut).ok_or_else(|| {
            SimulationError::unexpected(
                ctx.contracts.helpers,
                &query,
                "exit amounts do not match the pool tokens",
            )
        })?;

        Ok(ExitQuery {
            pool: pool.clone(),
            kind: input.kind(),
            bpt_in: TokenAmount::from_raw(pool.bpt(), result.bptIn),
            amounts_out: token_amounts(pool, amounts_out),
            token_out_index,
            route: None,
        })
    }

    pub fn build_exit_call(
        &self,
        query: &ExitQuery,
        params: &BuildParams,
        contracts: &Contracts,
    ) -> Result<ExitCall, Error> {
        let pool = &query.pool;
        let code = self.exit_code(pool, query.kind)?;
        ensure_amounts(&query.amounts_out, pool_token_addresses(pool))?;
        let amounts = query
            .amounts_out
            .iter()
            .map(TokenAmount::amount)
            .collect::<Vec<_>>();
        let bpt_in = query.bpt_in.amount();

        let (user_data, min_amounts_out, max_bpt_in) = match query.kind {
            ExitKind::Proportional => (
                user_data::exact_bpt(code, bpt_in),
                widen(&amounts, params.slippage, Bound::Min)?,
                bpt_in,
            ),
            ExitKind::SingleToken => {
                let index = query
                    .token_out_index
                    .ok_or(BuildError::MalformedQuery("single token exit without a token"))?;
                (
                    user_data::exact_bpt_in_for_one_token_out(code, bpt_in, index),
                    widen(&amounts, params.slippage, Bound::Min)?,
                    bpt_in,
                )
            }
            ExitKind::Unbalanced => {
                let max_bpt_in = params.slippage.apply_to(bpt_in, Bound::Max)?;
                (
                    user_data::bpt_in_for_exact_tokens_out(code, amounts.clone(), max_bpt_in),
                    amounts,
                    max_bpt_in,
                )
            }
        };

        let mut assets = pool.token_addresses();
        use_native_asset(
            &mut assets,
            contracts,
            pool.chain_id(),
            params.wrapped_native_as_native,
        )?;

        let call = BalancerV2Vault::exitPoolCall {
            poolId: pool.id().0,
            sender: params.sender,
            recipient: params.recipient,
            request: BalancerV2Vault::ExitPoolRequest {
                assets,
                minAmountsOut: with_bpt_slot(pool, &min_amounts_out),
                userData: user_data,
                toInternalBalance: false,
            },
        };

        Ok(ExitCall {
            to: contracts.vault,
            call: call.abi_encode().into(),
            value: U256::ZERO,
            max_bpt_in: query.bpt_in.with_amount(max_bpt_in),
            min_amounts_out: query
                .amounts_out
                .iter()
                .zip(min_amounts_out)
                .map(|(amount, min)| amount.with_amount(min))
                .collect(),
        })
    }

    pub fn build_init_call(
        &self,
        input: &InitInput,
        pool: &PoolState,
        params: &InitParams,
        contracts: &Contracts,
    ) -> Result<InitCall, Error> {
        let code = self
            .kinds
            .init
            .ok_or_else(|| ValidationError::InitNotSupported {
                pool_type: pool.pool_type().clone(),
            })?;
        let amounts = ordered_amounts(pool, &input.amounts_in);
        let max_amounts_in = with_bpt_slot(pool, &amounts);

        let mut assets = pool.token_addresses();
        let native = use_native_asset(
            &mut assets,
            contracts,
            pool.chain_id(),
            params.wrapped_native_as_native,
        )?;
        let value = native
            .map(|index| max_amounts_in[index])
            .unwrap_or_default();

        let call = BalancerV2Vault::joinPoolCall {
            poolId: pool.id().0,
            sender: params.sender,
            recipient: params.recipient,
            request: BalancerV2Vault::JoinPoolRequest {
                assets,
                maxAmountsIn: max_amounts_in,
                userData: user_data::init(code, amounts),
                fromInternalBalance: false,
            },
        };

        Ok(InitCall {
            to: contracts.vault,
            call: call.abi_encode().into(),
            value,
        })
    }

    fn join_code(&self, pool: &PoolState, kind: JoinKind) -> Result<u8, ValidationError> {
        match kind {
            JoinKind::Proportional => self.kinds.all_tokens_in_for_exact_bpt_out,
            JoinKind::Unbalanced | JoinKind::SingleToken => self.kinds.exact_tokens_in_for_bpt_out,
            JoinKind::SingleTokenExactOut => self.kinds.token_in_for_exact_bpt_out,
        }
        .ok_or_else(|| ValidationError::JoinKindNotSupported {
            pool_type: pool.pool_type().clone(),
            kind,
        })
    }

    fn exit_code(&self, pool: &PoolState, kind: ExitKind) -> Result<u8, ValidationError> {
        match kind {
            ExitKind::Proportional => self.kinds.exact_bpt_in_for_tokens_out,
            ExitKind::SingleToken => self.kinds.exact_bpt_in_for_one_token_out,
            ExitKind::Unbalanced => self.kinds.bpt_in_for_exact_tokens_out,
        }
        .ok_or_else(|| ValidationError::ExitKindNotSupported {
            pool_type: pool.pool_type().clone(),
            kind,
        })
    }

    /// The BPT minted for depositing `reference` proportionally, rounded down.
    async fn proportional_bpt(
        &self,
        pool: &PoolState,
        reference: &InputAmount,
        ctx: &Context<'_>,
    ) -> Result<U256, Error> {
        let pool_tokens = BalancerV2Vault::getPoolTokensCall { poolId: pool.id().0 };
        let (balances, supply) = futures::try_join!(
            simulator::call(ctx.simulator, ctx.contracts.vault, &pool_tokens),
            self.supply.query(ctx.simulator, pool.address()),
        )?;
        let balance = balances
            .tokens
            .iter()
            .position(|token| *token == reference.address)
            .and_then(|index| balances.balances.get(index))
            .ok_or_else(|| {
                SimulationError::unexpected(
                    ctx.contracts.vault,
                    &pool_tokens,
                    format!("the vault holds no {} for the pool", reference.address),
                )
            })?;
        tracing::debug!(%balance, %supply, "proportional join reference");

        Ok(reference
            .raw_amount
            .checked_mul_div_down(&supply, balance)
            .ok_or(BuildError::Arithmetic("proportional pool token amount"))?)
    }
}

/// Replaces the chain's wrapped native token with the zero address, which
/// the vault treats as the native asset. Returns the replaced position.
pub fn use_native_asset(
    assets: &mut [Address],
    contracts: &Contracts,
    chain_id: ChainId,
    enabled: bool,
) -> Result<Option<usize>, BuildError> {
    if !enabled {
        return Ok(None);
    }
    let wrapped = contracts
        .wrapped_native
        .ok_or(BuildError::UnknownNativeAsset(chain_id))?;
    let index = assets
        .iter()
        .position(|asset| *asset == wrapped)
        .ok_or(BuildError::NativeAssetNotInPool(wrapped))?;
    assets[index] = Address::ZERO;
    Ok(Some(index))
}

/// Queried amounts must list exactly the given tokens, in order.
pub fn ensure_amounts(
    amounts: &[TokenAmount],
    tokens: impl IntoIterator<Item = Address>,
) -> Result<(), BuildError> {
    if !amounts
        .iter()
        .map(|amount| amount.token().address())
        .eq(tokens)
    {
        return Err(BuildError::MalformedQuery(
            "amounts do not match the pool tokens",
        ));
    }
    Ok(())
}

fn pool_token_addresses(pool: &PoolState) -> impl Iterator<Item = Address> + '_ {
    pool.tokens_without_bpt().map(|token| token.token.address())
}

/// Applies the slippage tolerance to every amount.
pub fn widen(amounts: &[U256], slippage: Slippage, bound: Bound) -> Result<Vec<U256>, BuildError> {
    amounts
        .iter()
        .map(|amount| slippage.apply_to(*amount, bound))
        .collect()
}

/// Amounts in the order of the non-BPT pool tokens, zero for tokens without
/// an amount.
fn ordered_amounts(pool: &PoolState, amounts: &[InputAmount]) -> Vec<U256> {
    pool.tokens_without_bpt()
        .map(|token| {
            amounts
                .iter()
                .find(|amount| amount.address == token.token.address())
                .map(|amount| amount.raw_amount)
                .unwrap_or_default()
        })
        .collect()
}

/// Position of a token among the non-BPT pool tokens, as used in user data.
fn token_index(pool: &PoolState, token: Address) -> Result<usize, ValidationError> {
    pool.tokens_without_bpt()
        .position(|t| t.token.address() == token)
        .ok_or(ValidationError::UnknownToken(token))
}

/// Vault requests list an amount for every registered token, including the
/// BPT of pools that hold it.
fn with_bpt_slot(pool: &PoolState, amounts: &[U256]) -> Vec<U256> {
    let mut amounts = amounts.to_vec();
    if let Some(index) = pool.bpt_index() {
        amounts.insert(index.min(amounts.len()), U256::ZERO);
    }
    amounts
}

fn without_bpt_slot(pool: &PoolState, mut amounts: Vec<U256>) -> Option<Vec<U256>> {
    if amounts.len() != pool.tokens().len() {
        return None;
    }
    if let Some(index) = pool.bpt_index() {
        amounts.remove(index);
    }
    Some(amounts)
}

fn token_amounts(pool: &PoolState, amounts: Vec<U256>) -> Vec<TokenAmount> {
    pool.tokens_without_bpt()
        .zip(amounts)
        .map(|(token, amount)| TokenAmount::from_raw(token.token.clone(), amount))
        .collect()
}

/// ABI encoding of join and exit user data. The first word is always the
/// kind code.
mod user_data {
    use super::*;

    pub fn init(code: u8, amounts_in: Vec<U256>) -> Bytes {
        (U256::from(code), amounts_in).abi_encode_params().into()
    }

    pub fn exact_tokens_in(code: u8, amounts_in: Vec<U256>, min_bpt_out: U256) -> Bytes {
        (U256::from(code), amounts_in, min_bpt_out)
            .abi_encode_params()
            .into()
    }

    pub fn token_in_for_exact_bpt_out(code: u8, bpt_out: U256, token_index: usize) -> Bytes {
        (U256::from(code), bpt_out, U256::from(token_index))
            .abi_encode_params()
            .into()
    }

    /// Used both for proportional joins (exact BPT out) and proportional
    /// exits (exact BPT in).
    pub fn exact_bpt(code: u8, bpt: U256) -> Bytes {
        (U256::from(code), bpt).abi_encode_params().into()
    }

    pub fn exact_bpt_in_for_one_token_out(code: u8, bpt_in: U256, token_index: usize) -> Bytes {
        (U256::from(code), bpt_in, U256::from(token_index))
            .abi_encode_params()
            .into()
    }

    pub fn bpt_in_for_exact_tokens_out(code: u8, amounts_out: Vec<U256>, max_bpt_in: U256) -> Bytes {
        (U256::from(code), amounts_out, max_bpt_in)
            .abi_encode_params()
            .into()
    }
}
