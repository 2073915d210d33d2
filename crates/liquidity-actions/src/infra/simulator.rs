//! Read-only execution of contract calls against chain state.

use {
    crate::domain::eth::{Address, Bytes},
    alloy::{
        providers::{DynProvider, Provider},
        rpc::types::{BlockId, TransactionRequest},
        sol_types::SolCall,
        transports::RpcError,
    },
    thiserror::Error,
};

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("call to {to} reverted with {data}")]
    Reverted { to: Address, call: Bytes, data: Bytes },
    #[error("call to {to} failed: {message}")]
    Transport {
        to: Address,
        call: Bytes,
        message: String,
    },
    #[error("unexpected result of call to {to}: {message}")]
    Decode {
        to: Address,
        call: Bytes,
        message: String,
    },
}

impl SimulationError {
    /// The call succeeded but its result is inconsistent with the request.
    pub fn unexpected<C: SolCall>(to: Address, call: &C, message: impl Into<String>) -> Self {
        Self::Decode {
            to,
            call: call.abi_encode().into(),
            message: message.into(),
        }
    }

    /// The contract that was called.
    pub fn to(&self) -> Address {
        match self {
            Self::Reverted { to, .. } | Self::Transport { to, .. } | Self::Decode { to, .. } => {
                *to
            }
        }
    }

    /// The calldata that was simulated.
    pub fn call(&self) -> &Bytes {
        match self {
            Self::Reverted { call, .. }
            | Self::Transport { call, .. }
            | Self::Decode { call, .. } => call,
        }
    }
}

/// Executes calls without submitting transactions, returning the raw return
/// data.
#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
#[async_trait::async_trait]
pub trait Simulator: Send + Sync {
    async fn simulate(&self, to: Address, call: Bytes) -> Result<Bytes, SimulationError>;
}

/// Simulates a typed contract call and decodes its return value.
pub async fn call<C: SolCall>(
    simulator: &dyn Simulator,
    to: Address,
    call: &C,
) -> Result<C::Return, SimulationError> {
    let calldata = Bytes::from(call.abi_encode());
    let data = simulator.simulate(to, calldata.clone()).await?;
    C::abi_decode_returns(&data).map_err(|err| SimulationError::Decode {
        to,
        call: calldata,
        message: err.to_string(),
    })
}

/// Simulates calls with `eth_call` on a node.
#[derive(Clone, Debug)]
pub struct ProviderSimulator {
    provider: DynProvider,
    block: Option<BlockId>,
}

impl ProviderSimulator {
    pub fn new(provider: DynProvider) -> Self {
        Self {
            provider,
            block: None,
        }
    }

    /// Pins all simulations to a block so that queries and pool state agree.
    pub fn at_block(self, block: BlockId) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }
}

#[async_trait::async_trait]
impl Simulator for ProviderSimulator {
    async fn simulate(&self, to: Address, call: Bytes) -> Result<Bytes, SimulationError> {
        let tx = TransactionRequest::default()
            .to(to)
            .input(call.clone().into());
        let mut request = self.provider.call(tx);
        if let Some(block) = self.block {
            request = request.block(block);
        }
        request.await.map_err(|err| {
            // Nodes report reverts as error responses carrying the revert data.
            let revert = match &err {
                RpcError::ErrorResp(payload) => payload.as_revert_data(),
                _ => None,
            };
            match revert {
                Some(data) => SimulationError::Reverted { to, call, data },
                None => {
                    tracing::debug!(?err, %to, "node error during simulation");
                    SimulationError::Transport {
                        to,
                        call,
                        message: err.to_string(),
                    }
                }
            }
        })
    }
}
