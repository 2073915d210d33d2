pub mod serialization;
pub mod u256_ext;
pub mod units;

pub use {u256_ext::U256Ext, units::EthUnit};
