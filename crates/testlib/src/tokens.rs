//! Addresses of commonly used tokens.

use alloy::primitives::{Address, address};

/// Address for the `WETH` token.
pub const WETH: Address = address!("c02aaa39b223fe8d0a0e5c4f27ead9083c756cc2");

/// Address for the `BAL` token.
pub const BAL: Address = address!("ba100000625a3754423978a60c9317c58a424e3D");

/// Address for the `DAI` token.
pub const DAI: Address = address!("6B175474E89094C44Da98b954EedeAC495271d0F");

/// Address for the `USDC` token.
pub const USDC: Address = address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");

/// Address for the `USDT` token.
pub const USDT: Address = address!("dAC17F958D2ee523a2206206994597C13D831ec7");

/// Address for the Aave static `waUSDC` wrapper.
pub const WA_USDC: Address = address!("d093fa4fb80d09bb30817fdcd442d4d02ed3e5de");

/// Polygon tokens.
pub mod polygon {
    use super::*;

    /// Address for the bridged `USDC` token.
    pub const USDC: Address = address!("2791bca1f2de4661ed88a30c99a7a9449aa84174");

    /// Address for the `TUSD` token.
    pub const TUSD: Address = address!("2e1ad108ff1d8c782fcbbb89aad783ac49586756");
}
