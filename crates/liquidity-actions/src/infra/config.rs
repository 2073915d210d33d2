use {
    super::contracts::Addresses,
    crate::domain::{eth::ChainId, slippage::Slippage},
    anyhow::Context,
    serde::Deserialize,
    serde_with::{DisplayFromStr, serde_as},
    std::{collections::HashMap, path::Path},
    tokio::fs,
};

#[serde_as]
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    /// Contract address overrides keyed by chain ID. Chains without an entry
    /// use the canonical deployments.
    #[serde(default)]
    #[serde_as(as = "HashMap<DisplayFromStr, _>")]
    pub chains: HashMap<ChainId, Addresses>,

    /// Slippage applied when the caller does not specify one, as a
    /// percentage such as `"0.5"`.
    #[serde(default = "default_slippage")]
    pub default_slippage: Slippage,
}

fn default_slippage() -> Slippage {
    Slippage::ONE_PERCENT
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chains: Default::default(),
            default_slippage: default_slippage(),
        }
    }
}

impl Config {
    pub fn addresses(&self, chain_id: ChainId) -> Addresses {
        self.chains.get(&chain_id).copied().unwrap_or_default()
    }
}

/// Load the configuration from a TOML file.
pub async fn load(path: &Path) -> anyhow::Result<Config> {
    let data = fs::read_to_string(path)
        .await
        .with_context(|| format!("I/O error while reading {path:?}"))?;
    toml::de::from_str(&data).with_context(|| format!("TOML syntax error while reading {path:?}"))
}

#[cfg(test)]
mod tests {
    use {super::*, alloy::primitives::Address, std::io::Write};

    #[tokio::test]
    async fn loads_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
            default-slippage = "0.5"

            [chains.100]
            helpers = "0x4242424242424242424242424242424242424242"
            "#
        )
        .unwrap();

        let config = load(file.path()).await.unwrap();
        assert_eq!(
            config.default_slippage,
            Slippage::from_basis_points(50).unwrap()
        );
        assert_eq!(
            config.addresses(100).helpers,
            Some(Address::repeat_byte(0x42))
        );
        assert!(config.addresses(1).vault.is_none());
    }

    #[test]
    fn defaults() {
        let config: Config = toml::de::from_str("").unwrap();
        assert_eq!(
            config.default_slippage,
            Slippage::from_basis_points(100).unwrap()
        );
        assert!(config.chains.is_empty());
    }

    #[test]
    fn overrides_per_chain() {
        let config: Config = toml::de::from_str(
            r#"
            [chains.1]
            vault = "0x0101010101010101010101010101010101010101"

            [chains.1337]
            vault = "0x0202020202020202020202020202020202020202"
            helpers = "0x0303030303030303030303030303030303030303"
            wrapped-native = "0x0404040404040404040404040404040404040404"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.chains,
            maplit::hashmap! {
                1 => Addresses {
                    vault: Some(Address::repeat_byte(1)),
                    ..Default::default()
                },
                1337 => Addresses {
                    vault: Some(Address::repeat_byte(2)),
                    helpers: Some(Address::repeat_byte(3)),
                    wrapped_native: Some(Address::repeat_byte(4)),
                },
            }
        );
    }

    #[test]
    fn rejects_unknown_fields() {
        assert!(toml::de::from_str::<Config>("slippage = \"1\"").is_err());
        assert!(toml::de::from_str::<Config>("default-slippage = \"101\"").is_err());
    }
}
