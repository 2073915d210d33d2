//! Balancer V2 pool IDs. The first 20 bytes of a pool ID are the pool address.

use alloy::primitives::{B256, b256};

/// The mainnet 80BAL-20WETH weighted pool.
pub const BAL_WETH_80_20: B256 =
    b256!("5c6ee304399dbdb9c8ef030ab642b10820db8f56000200000000000000000014");

/// The mainnet bb-a-USD boosted pool.
pub const BB_A_USD: B256 =
    b256!("a13a9247ea42d743238089903570127dda72fe4400000000000000000000035d");

/// The mainnet bb-a-DAI linear pool.
pub const BB_A_DAI: B256 =
    b256!("ae37d54ae477268b9997d4161b96b8200755935c000000000000000000000337");

/// The mainnet bb-a-USDC linear pool.
pub const BB_A_USDC: B256 =
    b256!("82698aecc9e28e9bb27608bd52cf57f704bd1b83000000000000000000000336");

/// The mainnet bb-a-USDT linear pool.
pub const BB_A_USDT: B256 =
    b256!("2f4eb100552ef93840d5adc30560e5513dfffacb000000000000000000000334");

/// The Polygon ECLP-TUSD-USDC Gyro E-CLP pool.
pub const ECLP_TUSD_USDC: B256 =
    b256!("97469e6236bd467cd147065f77752b00efadce8a0002000000000000000008c0");
