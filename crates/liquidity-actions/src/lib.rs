//! Encodes Balancer V2 joins, exits and pool initializations.
//!
//! A request goes through three steps. It is validated against the pool's
//! capabilities, its outcome is queried by simulating it against the chain,
//! and the queried amounts are turned into a vault call with slippage bounds
//! applied. [`Actions`] drives these steps for any pool type known to its
//! [`Registry`].

pub mod actions;
pub mod domain;
pub mod error;
pub mod handler;
pub mod infra;
pub mod validator;

pub use {
    actions::{Actions, PreparedExit, PreparedJoin, QueriedExit, QueriedJoin},
    error::{BuildError, Error, ValidationError},
    handler::{Handler, Registry},
    infra::simulator::{ProviderSimulator, SimulationError, Simulator},
};

#[cfg(any(test, feature = "test-util"))]
pub use infra::simulator::MockSimulator;
