use {
    alloy::primitives::{
        U256,
        utils::{ParseUnits, Unit, format_units, parse_units},
    },
    anyhow::{Result, anyhow, bail},
};

pub trait EthUnit: std::marker::Sized {
    /// Returns the current wei amount.
    fn wei(self) -> U256;

    /// Returns the current Eth amount as wei (i.e. 1e18 wei).
    fn eth(self) -> U256 {
        self.wei() * Unit::ETHER.wei()
    }
}

impl EthUnit for u64 {
    fn wei(self) -> U256 {
        U256::from(self)
    }
}

impl EthUnit for u128 {
    fn wei(self) -> U256 {
        U256::from(self)
    }
}

/// Parses a human readable decimal amount (e.g. `"1.5"`) into base units of a
/// token with the specified number of decimals. Negative amounts are rejected.
pub fn parse_amount(value: &str, decimals: u8) -> Result<U256> {
    match parse_units(value.trim(), decimals)
        .map_err(|err| anyhow!("invalid amount {value:?}: {err}"))?
    {
        ParseUnits::U256(amount) => Ok(amount),
        ParseUnits::I256(amount) if !amount.is_negative() => Ok(amount.into_raw()),
        ParseUnits::I256(_) => bail!("negative amount {value:?}"),
    }
}

/// Formats an amount in base units as a human readable decimal string for a
/// token with the specified number of decimals.
pub fn format_amount(amount: U256, decimals: u8) -> Result<String> {
    let formatted = format_units(amount, decimals)?;
    // `format_units` always prints every decimal place.
    Ok(match formatted.split_once('.') {
        Some((int, frac)) => {
            let frac = frac.trim_end_matches('0');
            if frac.is_empty() {
                int.to_string()
            } else {
                format!("{int}.{frac}")
            }
        }
        None => formatted,
    })
}
