//! Everything that talks to the outside world: chain state through the
//! simulator, deployment addresses and configuration files.

pub mod config;
pub mod contracts;
pub mod simulator;
