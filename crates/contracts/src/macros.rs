/// Generates ABI bindings for a contract interface in a module of the same
/// name, optionally together with per-chain deployment addresses.
#[macro_export]
macro_rules! bindings {
    ($contract:ident { $($abi:tt)* } $(, $deployment_info:expr)? $(,)?) => {
        #[allow(non_snake_case)]
        pub mod $contract {
            alloy::sol! {
                #[allow(missing_docs)]
                #[sol(all_derives)]
                interface $contract {
                    $($abi)*
                }
            }

            pub use self::$contract::*;

            $(
            use {
                std::{sync::LazyLock, collections::HashMap},
                alloy::primitives::{address, Address},
                $crate::networks::*,
            };

            pub static DEPLOYMENT_INFO: LazyLock<HashMap<u64, Address>> = LazyLock::new(|| {
                $deployment_info
            });

            /// Returns the address the contract is deployed at on the
            /// specified chain.
            pub fn deployment_address(chain_id: u64) -> Option<Address> {
                DEPLOYMENT_INFO.get(&chain_id).copied()
            }
            )?
        }
    };
}
