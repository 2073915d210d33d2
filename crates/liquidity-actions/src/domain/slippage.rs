use {
    super::eth::U256,
    crate::error::BuildError,
    number::U256Ext,
    serde_with::{DeserializeFromStr, SerializeDisplay},
    std::{fmt, str::FromStr},
    thiserror::Error,
};

/// Decimals of the fixed point representation, i.e. 1e18 is 100%.
const DECIMALS: u8 = 18;
/// Decimals of a percentage in the fixed point representation.
const PERCENT_DECIMALS: u8 = DECIMALS - 2;

fn one() -> U256 {
    U256::from(10).pow(U256::from(DECIMALS))
}

/// A relative slippage tolerance between 0% and 100% as a fixed point number
/// with 18 decimals.
#[derive(
    Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd, DeserializeFromStr,
    SerializeDisplay,
)]
pub struct Slippage(U256);

/// Which side of a queried amount a tolerance bound protects.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Bound {
    /// The least acceptable amount received. Rounds down.
    Min,
    /// The most acceptable amount paid. Rounds up.
    Max,
}

#[derive(Debug, Error, Eq, PartialEq)]
pub enum InvalidSlippage {
    #[error("invalid slippage {0:?}")]
    Malformed(String),
    #[error("slippage {0} exceeds 100%")]
    TooLarge(String),
}

impl Slippage {
    pub const ZERO: Self = Self(U256::ZERO);
    pub const ONE_PERCENT: Self = Self(U256::from_limbs([10_000_000_000_000_000, 0, 0, 0]));

    /// Creates a tolerance from a decimal percentage string, for example
    /// `"0.5"` for 0.5%.
    pub fn from_percentage(value: &str) -> Result<Self, InvalidSlippage> {
        let factor = number::units::parse_amount(value, PERCENT_DECIMALS)
            .map_err(|_| InvalidSlippage::Malformed(value.to_string()))?;
        Self::from_factor(factor).map_err(|_| InvalidSlippage::TooLarge(format!("{value}%")))
    }

    /// Creates a tolerance from basis points, where 10000 is 100%.
    pub fn from_basis_points(bps: u32) -> Result<Self, InvalidSlippage> {
        Self::from_factor(U256::from(bps) * U256::from(10).pow(U256::from(DECIMALS - 4)))
            .map_err(|_| InvalidSlippage::TooLarge(format!("{bps}bps")))
    }

    /// Creates a tolerance from its fixed point representation.
    pub fn from_factor(factor: U256) -> Result<Self, InvalidSlippage> {
        if factor > one() {
            return Err(InvalidSlippage::TooLarge(factor.to_string()));
        }
        Ok(Self(factor))
    }

    pub fn factor(&self) -> U256 {
        self.0
    }

    /// Widens a queried amount by the tolerance. [`Bound::Min`] lowers the
    /// amount rounding the deduction down, [`Bound::Max`] raises it rounding
    /// the addition up, so that the rounding never favours the counterparty.
    pub fn apply_to(&self, amount: U256, bound: Bound) -> Result<U256, BuildError> {
        match bound {
            Bound::Min => {
                let deduction = amount
                    .checked_mul_div_down(&self.0, &one())
                    .ok_or(BuildError::SlippageOverflow { amount })?;
                amount
                    .checked_sub(deduction)
                    .ok_or(BuildError::NegativeBound { amount })
            }
            Bound::Max => {
                let addition = amount
                    .checked_mul_div_up(&self.0, &one())
                    .ok_or(BuildError::SlippageOverflow { amount })?;
                amount
                    .checked_add(addition)
                    .ok_or(BuildError::SlippageOverflow { amount })
            }
        }
    }
}

impl FromStr for Slippage {
    type Err = InvalidSlippage;

    /// Parses a percentage, accepting an optional trailing `%`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_percentage(s.trim().trim_end_matches('%'))
    }
}

impl fmt::Display for Slippage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let percentage =
            number::units::format_amount(self.0, PERCENT_DECIMALS).map_err(|_| fmt::Error)?;
        write!(f, "{percentage}%")
    }
}
