//! ABI bindings and deployment information for the Balancer V2 contracts
//! that liquidity operations are encoded against.

mod macros;
pub mod networks;

bindings!(
    BalancerV2Vault {
        struct JoinPoolRequest {
            address[] assets;
            uint256[] maxAmountsIn;
            bytes userData;
            bool fromInternalBalance;
        }

        struct ExitPoolRequest {
            address[] assets;
            uint256[] minAmountsOut;
            bytes userData;
            bool toInternalBalance;
        }

        struct BatchSwapStep {
            bytes32 poolId;
            uint256 assetInIndex;
            uint256 assetOutIndex;
            uint256 amount;
            bytes userData;
        }

        struct FundManagement {
            address sender;
            bool fromInternalBalance;
            address recipient;
            bool toInternalBalance;
        }

        function joinPool(
            bytes32 poolId,
            address sender,
            address recipient,
            JoinPoolRequest memory request
        ) external payable;

        function exitPool(
            bytes32 poolId,
            address sender,
            address recipient,
            ExitPoolRequest memory request
        ) external;

        function batchSwap(
            uint8 kind,
            BatchSwapStep[] memory swaps,
            address[] memory assets,
            FundManagement memory funds,
            int256[] memory limits,
            uint256 deadline
        ) external payable returns (int256[] memory assetDeltas);

        function queryBatchSwap(
            uint8 kind,
            BatchSwapStep[] memory swaps,
            address[] memory assets,
            FundManagement memory funds
        ) external returns (int256[] memory assetDeltas);

        function getPoolTokens(bytes32 poolId)
            external
            view
            returns (address[] memory tokens, uint256[] memory balances, uint256 lastChangeBlock);
    },
    maplit::hashmap! {
        MAINNET => address!("0xBA12222222228d8Ba445958a75a0704d566BF2C8"),
        OPTIMISM => address!("0xBA12222222228d8Ba445958a75a0704d566BF2C8"),
        GNOSIS => address!("0xBA12222222228d8Ba445958a75a0704d566BF2C8"),
        POLYGON => address!("0xBA12222222228d8Ba445958a75a0704d566BF2C8"),
        BASE => address!("0xBA12222222228d8Ba445958a75a0704d566BF2C8"),
        ARBITRUM_ONE => address!("0xBA12222222228d8Ba445958a75a0704d566BF2C8"),
        AVALANCHE => address!("0xBA12222222228d8Ba445958a75a0704d566BF2C8"),
        SEPOLIA => address!("0xBA12222222228d8Ba445958a75a0704d566BF2C8"),
    }
);

bindings!(
    BalancerV2Helpers {
        struct JoinPoolRequest {
            address[] assets;
            uint256[] maxAmountsIn;
            bytes userData;
            bool fromInternalBalance;
        }

        struct ExitPoolRequest {
            address[] assets;
            uint256[] minAmountsOut;
            bytes userData;
            bool toInternalBalance;
        }

        function queryJoin(
            bytes32 poolId,
            address sender,
            address recipient,
            JoinPoolRequest memory request
        ) external returns (uint256 bptOut, uint256[] memory amountsIn);

        function queryExit(
            bytes32 poolId,
            address sender,
            address recipient,
            ExitPoolRequest memory request
        ) external returns (uint256 bptIn, uint256[] memory amountsOut);
    },
    maplit::hashmap! {
        MAINNET => address!("0x5aDDCCa35b7A0D07C74063c48700C8590E87864E"),
        OPTIMISM => address!("0x5aDDCCa35b7A0D07C74063c48700C8590E87864E"),
        POLYGON => address!("0x5aDDCCa35b7A0D07C74063c48700C8590E87864E"),
        ARBITRUM_ONE => address!("0x5aDDCCa35b7A0D07C74063c48700C8590E87864E"),
    }
);

bindings!(BalancerV2BasePool {
    function totalSupply() external view returns (uint256);
    function getActualSupply() external view returns (uint256);
});

/// The wrapped version of each chain's native asset. The vault wraps and
/// unwraps it for requests that list the zero address as an asset.
pub mod wrapped_native {
    use {
        crate::networks::*,
        alloy::primitives::{Address, address},
        std::{collections::HashMap, sync::LazyLock},
    };

    pub static DEPLOYMENT_INFO: LazyLock<HashMap<u64, Address>> = LazyLock::new(|| {
        maplit::hashmap! {
            MAINNET => address!("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"),
            OPTIMISM => address!("0x4200000000000000000000000000000000000006"),
            BNB => address!("0xbb4CdB9CBd36B01bD1cBaEBF2De08d9173bc095c"),
            GNOSIS => address!("0xe91D153E0b41518A2Ce8Dd3D7944Fa863463a97d"),
            POLYGON => address!("0x0d500B1d8E8eF31E21C99d1Db9A6444d3ADf1270"),
            BASE => address!("0x4200000000000000000000000000000000000006"),
            ARBITRUM_ONE => address!("0x82aF49447D8a07e3bd95BD0d56f35241523fBab1"),
            AVALANCHE => address!("0xB31f66AA3C1e785363F0875A1B74E27b85FD66c7"),
            SEPOLIA => address!("0x7b79995e5f793A07Bc00c21412e50Ecae098E7f9"),
        }
    });

    /// Returns the wrapped native token of the specified chain.
    pub fn deployment_address(chain_id: u64) -> Option<Address> {
        DEPLOYMENT_INFO.get(&chain_id).copied()
    }
}

impl From<BalancerV2Vault::JoinPoolRequest> for BalancerV2Helpers::JoinPoolRequest {
    fn from(request: BalancerV2Vault::JoinPoolRequest) -> Self {
        Self {
            assets: request.assets,
            maxAmountsIn: request.maxAmountsIn,
            userData: request.userData,
            fromInternalBalance: request.fromInternalBalance,
        }
    }
}

impl From<BalancerV2Vault::ExitPoolRequest> for BalancerV2Helpers::ExitPoolRequest {
    fn from(request: BalancerV2Vault::ExitPoolRequest) -> Self {
        Self {
            assets: request.assets,
            minAmountsOut: request.minAmountsOut,
            userData: request.userData,
            toInternalBalance: request.toInternalBalance,
        }
    }
}
