use {
    crate::{
        domain::eth::{Address, ChainId},
        error::ValidationError,
    },
    contracts::{BalancerV2Helpers, BalancerV2Vault, wrapped_native},
    serde::Deserialize,
};

/// Addresses of the contracts liquidity operations are encoded against on a
/// single chain.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Contracts {
    pub vault: Address,
    pub helpers: Address,
    /// The wrapped version of the chain's native asset, if known.
    pub wrapped_native: Option<Address>,
}

/// Overrides for the deployments of a chain. Missing addresses fall back to
/// the canonical deployments.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Addresses {
    pub vault: Option<Address>,
    pub helpers: Option<Address>,
    pub wrapped_native: Option<Address>,
}

impl Contracts {
    pub fn new(chain_id: ChainId, addresses: Addresses) -> Result<Self, ValidationError> {
        let vault = addresses
            .vault
            .or_else(|| BalancerV2Vault::deployment_address(chain_id))
            .ok_or(ValidationError::UnsupportedChain(chain_id))?;
        let helpers = addresses
            .helpers
            .or_else(|| BalancerV2Helpers::deployment_address(chain_id))
            .ok_or(ValidationError::UnsupportedChain(chain_id))?;
        Ok(Self {
            vault,
            helpers,
            wrapped_native: addresses
                .wrapped_native
                .or_else(|| wrapped_native::deployment_address(chain_id)),
        })
    }

    /// The canonical deployments of a chain.
    pub fn for_chain(chain_id: ChainId) -> Result<Self, ValidationError> {
        Self::new(chain_id, Addresses::default())
    }
}

#[cfg(test)]
mod tests {
    use {super::*, contracts::networks};

    #[test]
    fn canonical_deployments() {
        let mainnet = Contracts::for_chain(networks::MAINNET).unwrap();
        assert_eq!(mainnet.vault, testlib::contracts::VAULT);
        assert_eq!(mainnet.wrapped_native, Some(testlib::tokens::WETH));

        assert_eq!(
            Contracts::for_chain(1337),
            Err(ValidationError::UnsupportedChain(1337))
        );
    }

    #[test]
    fn overrides_take_precedence() {
        let helpers = Address::repeat_byte(0x42);
        let contracts = Contracts::new(
            networks::GNOSIS,
            Addresses {
                helpers: Some(helpers),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(contracts.helpers, helpers);
        assert_eq!(contracts.vault, testlib::contracts::VAULT);
    }
}
