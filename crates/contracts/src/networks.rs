//! Chain IDs of the networks with Balancer V2 deployments.

pub const MAINNET: u64 = 1;
pub const OPTIMISM: u64 = 10;
pub const BNB: u64 = 56;
pub const GNOSIS: u64 = 100;
pub const POLYGON: u64 = 137;
pub const BASE: u64 = 8453;
pub const ARBITRUM_ONE: u64 = 42161;
pub const AVALANCHE: u64 = 43114;
pub const SEPOLIA: u64 = 11155111;
