use alloy::primitives::{Address, address};

/// The Balancer V2 vault, deployed at the same address on every chain.
pub const VAULT: Address = address!("0xBA12222222228d8Ba445958a75a0704d566BF2C8");

/// The Balancer V2 query helpers on mainnet and most L2s.
pub const HELPERS: Address = address!("0x5aDDCCa35b7A0D07C74063c48700C8590E87864E");
