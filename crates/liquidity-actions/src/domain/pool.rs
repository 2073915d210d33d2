use {
    super::{
        eth::{Address, B256, ChainId, Token},
        sorting::{self, TokenOrdering},
    },
    crate::error::ValidationError,
    serde::{Deserialize, Serialize},
    serde_with::{DeserializeFromStr, SerializeDisplay},
    std::{collections::HashSet, convert::Infallible, fmt, str::FromStr},
};

/// Pool tokens use fixed point arithmetic with 18 decimals and Balancer
/// scales every balance up to it, so tokens with more decimals cannot be
/// represented.
pub const MAX_TOKEN_DECIMALS: u8 = 18;

/// Balancer pool tokens (BPT) always have 18 decimals.
pub const BPT_DECIMALS: u8 = 18;

/// A Balancer V2 pool ID.
///
/// The first 20 bytes of the ID are the pool's address, the following 2
/// bytes encode its specialization and the remaining 10 bytes are a nonce
/// assigned by the vault.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct PoolId(pub B256);

impl PoolId {
    /// Returns the address of the pool contract the ID belongs to.
    pub fn address(&self) -> Address {
        Address::from_slice(&self.0[..20])
    }
}

impl From<B256> for PoolId {
    fn from(value: B256) -> Self {
        Self(value)
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The family of a pool, which determines how liquidity operations against it
/// are encoded.
#[derive(Clone, Debug, Eq, PartialEq, Hash, DeserializeFromStr, SerializeDisplay)]
pub enum PoolType {
    Weighted,
    ComposableStable,
    Gyro2,
    Gyro3,
    GyroE,
    Linear,
    Boosted,
    /// A pool type this crate has no built-in knowledge of. Operations on it
    /// only succeed if a handler was registered for it.
    Other(String),
}

impl FromStr for PoolType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_uppercase();
        let normalized = normalized.strip_suffix("POOL").unwrap_or(&normalized);
        Ok(match normalized {
            "WEIGHTED" | "WEIGHTED2TOKENS" => Self::Weighted,
            "COMPOSABLESTABLE" | "PHANTOMSTABLE" => Self::ComposableStable,
            "GYRO2" | "GYRO2CLP" => Self::Gyro2,
            "GYRO3" | "GYRO3CLP" => Self::Gyro3,
            "GYROE" | "GYROECLP" | "ECLP" => Self::GyroE,
            "BOOSTED" => Self::Boosted,
            linear if linear.ends_with("LINEAR") => Self::Linear,
            _ => Self::Other(s.to_string()),
        })
    }
}

impl fmt::Display for PoolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Weighted => "WEIGHTED",
            Self::ComposableStable => "COMPOSABLE_STABLE",
            Self::Gyro2 => "GYRO2",
            Self::Gyro3 => "GYRO3",
            Self::GyroE => "GYROE",
            Self::Linear => "LINEAR",
            Self::Boosted => "BOOSTED",
            Self::Other(name) => name,
        })
    }
}

/// A pool snapshot as reported by an external indexer. Tokens may be in any
/// order and composable pools may or may not list their own BPT.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolStateInput {
    pub id: PoolId,
    pub address: Address,
    #[serde(rename = "type")]
    pub pool_type: PoolType,
    pub tokens: Vec<PoolTokenInput>,
}

#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolTokenInput {
    pub address: Address,
    pub decimals: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    /// Set when the token is itself the BPT of a linear pool wrapping a
    /// main token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nested: Option<NestedPoolInput>,
}

#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NestedPoolInput {
    pub id: PoolId,
    pub main_token: Address,
    pub main_token_decimals: u8,
}

/// A token of a validated pool together with its position in the pool's
/// registered token list.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolToken {
    pub token: Token,
    pub index: usize,
    pub nested: Option<NestedPool>,
}

/// A linear pool whose BPT is a token of the parent pool.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NestedPool {
    pub id: PoolId,
    pub main_token: Token,
}

/// A validated pool snapshot whose tokens are in the order the vault
/// registered them.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolState {
    chain_id: ChainId,
    id: PoolId,
    address: Address,
    pool_type: PoolType,
    tokens: Vec<PoolToken>,
}

impl PoolState {
    /// Validates a pool snapshot and puts its tokens in the vault's order.
    pub fn new(
        input: &PoolStateInput,
        chain_id: ChainId,
        ordering: TokenOrdering,
    ) -> Result<Self, ValidationError> {
        if input.id.address() != input.address {
            return Err(ValidationError::InvalidPoolState(format!(
                "pool id {} does not belong to pool {}",
                input.id, input.address
            )));
        }

        let mut seen = HashSet::new();
        let mut tokens = Vec::with_capacity(input.tokens.len() + 1);
        for token in &input.tokens {
            if !seen.insert(token.address) {
                return Err(ValidationError::DuplicateToken(token.address));
            }
            if token.decimals > MAX_TOKEN_DECIMALS {
                return Err(ValidationError::UnsupportedDecimals {
                    token: token.address,
                    decimals: token.decimals,
                });
            }
            if token.address == input.address {
                if ordering == TokenOrdering::Ascending {
                    return Err(ValidationError::InvalidPoolState(format!(
                        "{} pools do not hold their own pool token",
                        input.pool_type
                    )));
                }
                if token.decimals != BPT_DECIMALS {
                    return Err(ValidationError::DecimalsMismatch {
                        token: token.address,
                        expected: BPT_DECIMALS,
                        actual: token.decimals,
                    });
                }
            }
            let mut pool_token = Token::new(chain_id, token.address, token.decimals);
            if let Some(symbol) = &token.symbol {
                pool_token = pool_token.with_symbol(symbol.as_str());
            }
            tokens.push(PoolToken {
                token: pool_token,
                index: token.index.unwrap_or_default(),
                nested: token
                    .nested
                    .as_ref()
                    .map(|nested| nested_pool(chain_id, token.address, nested))
                    .transpose()?,
            });
        }

        let bpt = Token::new(chain_id, input.address, BPT_DECIMALS);
        let sorted = sorting::sort_tokens(&tokens, ordering, &bpt);
        if sorted.iter().filter(|t| t.token != bpt).count() < 2 {
            return Err(ValidationError::InvalidPoolState(
                "pools need at least two tokens".to_string(),
            ));
        }

        // Indices reported by the indexer must agree with the vault's order.
        for (reported, token) in input.tokens.iter().filter_map(|t| Some((t.index?, t.address))) {
            let actual = sorted
                .iter()
                .position(|t| t.token.address() == token)
                .unwrap_or_default();
            if reported != actual {
                return Err(ValidationError::InvalidPoolState(format!(
                    "token {token} is reported at index {reported} but is registered at index \
                     {actual}"
                )));
            }
        }

        Ok(Self {
            chain_id,
            id: input.id,
            address: input.address,
            pool_type: input.pool_type.clone(),
            tokens: sorted,
        })
    }

    pub fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    pub fn id(&self) -> PoolId {
        self.id
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn pool_type(&self) -> &PoolType {
        &self.pool_type
    }

    /// All registered tokens in vault order, including the BPT for pools that
    /// hold their own pool token.
    pub fn tokens(&self) -> &[PoolToken] {
        &self.tokens
    }

    pub fn token_addresses(&self) -> Vec<Address> {
        self.tokens.iter().map(|t| t.token.address()).collect()
    }

    /// The pool's own token.
    pub fn bpt(&self) -> Token {
        Token::new(self.chain_id, self.address, BPT_DECIMALS)
    }

    pub fn is_bpt(&self, address: Address) -> bool {
        address == self.address
    }

    /// Position of the BPT in the registered tokens, if the pool holds it.
    pub fn bpt_index(&self) -> Option<usize> {
        self.tokens.iter().position(|t| self.is_bpt(t.token.address()))
    }

    /// Registered tokens other than the BPT, in vault order. Join and exit
    /// user data is expressed over these.
    pub fn tokens_without_bpt(&self) -> impl Iterator<Item = &PoolToken> {
        self.tokens.iter().filter(|t| !self.is_bpt(t.token.address()))
    }

    /// The tokens a user ultimately deposits or withdraws: the main token of
    /// every nested linear pool and every other non-BPT token as is.
    pub fn leaf_tokens(&self) -> Vec<Token> {
        self.tokens_without_bpt()
            .map(|t| match &t.nested {
                Some(nested) => nested.main_token.clone(),
                None => t.token.clone(),
            })
            .collect()
    }

    pub fn token(&self, address: Address) -> Option<&PoolToken> {
        self.tokens.iter().find(|t| t.token.address() == address)
    }
}

fn nested_pool(
    chain_id: ChainId,
    token: Address,
    nested: &NestedPoolInput,
) -> Result<NestedPool, ValidationError> {
    if nested.id.address() != token {
        return Err(ValidationError::InvalidPoolState(format!(
            "nested pool {} is not the pool of token {token}",
            nested.id
        )));
    }
    if nested.main_token_decimals > MAX_TOKEN_DECIMALS {
        return Err(ValidationError::UnsupportedDecimals {
            token: nested.main_token,
            decimals: nested.main_token_decimals,
        });
    }
    Ok(NestedPool {
        id: nested.id,
        main_token: Token::new(chain_id, nested.main_token, nested.main_token_decimals),
    })
}

#[cfg(test)]
mod tests {
    use {super::*, alloy::primitives::b256};

    const COMPOSABLE: B256 =
        b256!("0x1111111111111111111111111111111111111111000000000000000000000001");

    fn token(byte: u8, decimals: u8) -> PoolTokenInput {
        PoolTokenInput {
            address: Address::repeat_byte(byte),
            decimals,
            index: None,
            symbol: None,
            nested: None,
        }
    }

    fn composable(tokens: Vec<PoolTokenInput>) -> PoolStateInput {
        PoolStateInput {
            id: PoolId(COMPOSABLE),
            address: PoolId(COMPOSABLE).address(),
            pool_type: PoolType::ComposableStable,
            tokens,
        }
    }

    #[test]
    fn pool_id_address() {
        assert_eq!(
            PoolId(COMPOSABLE).address(),
            Address::repeat_byte(0x11)
        );
    }

    #[test]
    fn parses_pool_type_aliases() {
        for (name, expected) in [
            ("WEIGHTED", PoolType::Weighted),
            ("WeightedPool", PoolType::Weighted),
            ("ComposableStable", PoolType::ComposableStable),
            ("COMPOSABLE_STABLE", PoolType::ComposableStable),
            ("PHANTOM_STABLE", PoolType::ComposableStable),
            ("GYROE", PoolType::GyroE),
            ("GyroE", PoolType::GyroE),
            ("Gyro2", PoolType::Gyro2),
            ("GYRO3", PoolType::Gyro3),
            ("AaveLinear", PoolType::Linear),
            ("ERC4626_LINEAR", PoolType::Linear),
            ("Boosted", PoolType::Boosted),
        ] {
            assert_eq!(name.parse::<PoolType>().unwrap(), expected, "{name}");
        }
        assert_eq!(
            "MetaStable".parse::<PoolType>().unwrap(),
            PoolType::Other("MetaStable".to_string())
        );
    }

    #[test]
    fn pool_type_serde_uses_canonical_names() {
        let pool_type: PoolType = serde_json::from_str(r#""ComposableStablePool""#).unwrap();
        assert_eq!(pool_type, PoolType::ComposableStable);
        assert_eq!(
            serde_json::to_string(&pool_type).unwrap(),
            r#""COMPOSABLE_STABLE""#
        );
    }

    #[test]
    fn inserts_missing_bpt_in_address_order() {
        let input = composable(vec![token(0x22, 6), token(0x05, 18)]);
        let pool = PoolState::new(&input, 1, TokenOrdering::AscendingWithBpt).unwrap();

        assert_eq!(
            pool.token_addresses(),
            vec![
                Address::repeat_byte(0x05),
                Address::repeat_byte(0x11),
                Address::repeat_byte(0x22),
            ]
        );
        assert_eq!(pool.bpt_index(), Some(1));
        assert_eq!(
            pool.tokens().iter().map(|t| t.index).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
        assert_eq!(pool.tokens_without_bpt().count(), 2);
    }

    #[test]
    fn rejects_invalid_snapshots() {
        let duplicate = composable(vec![token(0x22, 6), token(0x22, 6)]);
        assert_eq!(
            PoolState::new(&duplicate, 1, TokenOrdering::AscendingWithBpt),
            Err(ValidationError::DuplicateToken(Address::repeat_byte(0x22)))
        );

        let decimals = composable(vec![token(0x22, 6), token(0x33, 24)]);
        assert!(matches!(
            PoolState::new(&decimals, 1, TokenOrdering::AscendingWithBpt),
            Err(ValidationError::UnsupportedDecimals { decimals: 24, .. })
        ));

        let mut wrong_id = composable(vec![token(0x22, 6), token(0x33, 18)]);
        wrong_id.address = Address::repeat_byte(0x99);
        assert!(matches!(
            PoolState::new(&wrong_id, 1, TokenOrdering::AscendingWithBpt),
            Err(ValidationError::InvalidPoolState(_))
        ));

        let with_bpt = composable(vec![token(0x22, 6), token(0x11, 18), token(0x33, 18)]);
        assert!(matches!(
            PoolState::new(&with_bpt, 1, TokenOrdering::Ascending),
            Err(ValidationError::InvalidPoolState(_))
        ));

        let mut misplaced = composable(vec![token(0x22, 6), token(0x33, 18)]);
        misplaced.tokens[0].index = Some(0);
        assert!(matches!(
            PoolState::new(&misplaced, 1, TokenOrdering::AscendingWithBpt),
            Err(ValidationError::InvalidPoolState(_))
        ));
    }

    #[test]
    fn leaf_tokens_resolve_nested_pools() {
        let mut nested = token(0x22, 18);
        nested.nested = Some(NestedPoolInput {
            id: PoolId(b256!(
                "0x2222222222222222222222222222222222222222000000000000000000000002"
            )),
            main_token: Address::repeat_byte(0xda),
            main_token_decimals: 18,
        });
        let input = PoolStateInput {
            pool_type: PoolType::Boosted,
            ..composable(vec![nested, token(0x33, 6)])
        };
        let pool = PoolState::new(&input, 1, TokenOrdering::AscendingWithBpt).unwrap();

        assert_eq!(
            pool.leaf_tokens()
                .iter()
                .map(Token::address)
                .collect::<Vec<_>>(),
            vec![Address::repeat_byte(0xda), Address::repeat_byte(0x33)]
        );
    }

    #[test]
    fn deserializes_indexer_snapshots() {
        let input: PoolStateInput = serde_json::from_str(
            r#"{
                "id": "0x5c6ee304399dbdb9c8ef030ab642b10820db8f56000200000000000000000014",
                "address": "0x5c6ee304399dbdb9c8ef030ab642b10820db8f56",
                "type": "Weighted",
                "tokens": [
                    {
                        "address": "0xba100000625a3754423978a60c9317c58a424e3d",
                        "decimals": 18,
                        "index": 0
                    },
                    {
                        "address": "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2",
                        "decimals": 18,
                        "index": 1,
                        "symbol": "WETH"
                    }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(input.pool_type, PoolType::Weighted);

        let pool = PoolState::new(&input, 1, TokenOrdering::Ascending).unwrap();
        assert_eq!(pool.tokens()[1].token.symbol(), Some("WETH"));
        assert_eq!(pool.bpt_index(), None);
    }
}
