//! Well-known addresses used as fixtures across the liquidity action tests.
pub mod contracts;
pub mod pools;
pub mod tokens;
