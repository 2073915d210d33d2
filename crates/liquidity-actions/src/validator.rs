//! Checks that a request can possibly succeed for a pool before anything is
//! simulated.
//!
//! Checks run in a fixed order: the operation kind against the pool type's
//! capabilities, the shape of the amounts, token membership and finally the
//! amounts themselves.

use {
    crate::{
        domain::{
            ExitInput,
            ExitKind,
            InitInput,
            InputAmount,
            JoinInput,
            JoinKind,
            PoolState,
            PoolType,
            eth::{Address, Token},
            pool::BPT_DECIMALS,
            sorting::TokenOrdering,
        },
        error::ValidationError,
    },
    std::collections::HashSet,
};

/// What a pool family supports and how its tokens are addressed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Capabilities {
    pub join: &'static [JoinKind],
    pub exit: &'static [ExitKind],
    pub init: bool,
    pub ordering: TokenOrdering,
    pub tokens: InputTokens,
}

/// The tokens users deposit and withdraw.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InputTokens {
    /// The pool's own tokens, excluding its BPT.
    PoolTokens,
    /// The main tokens of nested linear pools in place of their BPT.
    LeafTokens,
}

impl Capabilities {
    pub fn supports_join(&self, kind: JoinKind) -> bool {
        self.join.contains(&kind)
    }

    pub fn supports_exit(&self, kind: ExitKind) -> bool {
        self.exit.contains(&kind)
    }

    pub fn ensure_join(&self, pool_type: &PoolType, kind: JoinKind) -> Result<(), ValidationError> {
        if !self.supports_join(kind) {
            return Err(ValidationError::JoinKindNotSupported {
                pool_type: pool_type.clone(),
                kind,
            });
        }
        Ok(())
    }

    pub fn ensure_exit(&self, pool_type: &PoolType, kind: ExitKind) -> Result<(), ValidationError> {
        if !self.supports_exit(kind) {
            return Err(ValidationError::ExitKindNotSupported {
                pool_type: pool_type.clone(),
                kind,
            });
        }
        Ok(())
    }

    pub fn ensure_init(&self, pool_type: &PoolType) -> Result<(), ValidationError> {
        if !self.init {
            return Err(ValidationError::InitNotSupported {
                pool_type: pool_type.clone(),
            });
        }
        Ok(())
    }

    /// The tokens a user can deposit into or withdraw from the pool, in vault
    /// order.
    pub fn input_tokens(&self, pool: &PoolState) -> Vec<Token> {
        match self.tokens {
            InputTokens::PoolTokens => pool.tokens_without_bpt().map(|t| t.token.clone()).collect(),
            InputTokens::LeafTokens => pool.leaf_tokens(),
        }
    }
}

pub fn validate_join(
    capabilities: &Capabilities,
    input: &JoinInput,
    pool: &PoolState,
) -> Result<(), ValidationError> {
    capabilities.ensure_join(pool.pool_type(), input.kind())?;
    let tokens = capabilities.input_tokens(pool);
    match input {
        JoinInput::Proportional {
            reference_amount, ..
        } => {
            if pool.is_bpt(reference_amount.address) {
                bpt_amount(pool, reference_amount)
            } else {
                token_amount(&tokens, pool, reference_amount)?;
                non_zero(reference_amount)
            }
        }
        JoinInput::Unbalanced { amounts_in, .. } => amounts(&tokens, pool, amounts_in),
        JoinInput::SingleToken { amount_in, .. } => {
            token_amount(&tokens, pool, amount_in)?;
            non_zero(amount_in)
        }
        JoinInput::SingleTokenExactOut {
            bpt_out, token_in, ..
        } => {
            token(&tokens, pool, *token_in)?;
            bpt_amount(pool, bpt_out)
        }
    }
}

pub fn validate_exit(
    capabilities: &Capabilities,
    input: &ExitInput,
    pool: &PoolState,
) -> Result<(), ValidationError> {
    capabilities.ensure_exit(pool.pool_type(), input.kind())?;
    let tokens = capabilities.input_tokens(pool);
    match input {
        ExitInput::Proportional { bpt_in, .. } => bpt_amount(pool, bpt_in),
        ExitInput::Unbalanced { amounts_out, .. } => amounts(&tokens, pool, amounts_out),
        ExitInput::SingleToken {
            bpt_in, token_out, ..
        } => {
            token(&tokens, pool, *token_out)?;
            bpt_amount(pool, bpt_in)
        }
    }
}

pub fn validate_init(
    capabilities: &Capabilities,
    input: &InitInput,
    pool: &PoolState,
) -> Result<(), ValidationError> {
    capabilities.ensure_init(pool.pool_type())?;
    let tokens = capabilities.input_tokens(pool);
    amounts(&tokens, pool, &input.amounts_in)?;
    // Every token needs an initial balance.
    input.amounts_in.iter().try_for_each(non_zero)
}

fn token<'a>(
    tokens: &'a [Token],
    pool: &PoolState,
    address: Address,
) -> Result<&'a Token, ValidationError> {
    if pool.is_bpt(address) {
        return Err(ValidationError::BptAsToken(address));
    }
    tokens
        .iter()
        .find(|token| token.address() == address)
        .ok_or(ValidationError::UnknownToken(address))
}

fn token_amount(
    tokens: &[Token],
    pool: &PoolState,
    amount: &InputAmount,
) -> Result<(), ValidationError> {
    let token = token(tokens, pool, amount.address)?;
    if token.decimals() != amount.decimals {
        return Err(ValidationError::DecimalsMismatch {
            token: amount.address,
            expected: token.decimals(),
            actual: amount.decimals,
        });
    }
    Ok(())
}

fn bpt_amount(pool: &PoolState, amount: &InputAmount) -> Result<(), ValidationError> {
    if !pool.is_bpt(amount.address) {
        return Err(ValidationError::ExpectedBpt {
            expected: pool.address(),
            actual: amount.address,
        });
    }
    if amount.decimals != BPT_DECIMALS {
        return Err(ValidationError::DecimalsMismatch {
            token: amount.address,
            expected: BPT_DECIMALS,
            actual: amount.decimals,
        });
    }
    non_zero(amount)
}

/// One amount for every token, each token exactly once.
fn amounts(
    tokens: &[Token],
    pool: &PoolState,
    amounts: &[InputAmount],
) -> Result<(), ValidationError> {
    if amounts.len() != tokens.len() {
        return Err(ValidationError::AmountsLength {
            expected: tokens.len(),
            actual: amounts.len(),
        });
    }
    let mut seen = HashSet::new();
    for amount in amounts {
        token_amount(tokens, pool, amount)?;
        if !seen.insert(amount.address) {
            return Err(ValidationError::DuplicateToken(amount.address));
        }
    }
    if amounts.iter().all(|amount| amount.raw_amount.is_zero()) {
        return Err(ValidationError::AllAmountsZero);
    }
    Ok(())
}

fn non_zero(amount: &InputAmount) -> Result<(), ValidationError> {
    if amount.raw_amount.is_zero() {
        return Err(ValidationError::ZeroAmount(amount.address));
    }
    Ok(())
}
