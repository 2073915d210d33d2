pub use alloy::primitives::{Address, B256, Bytes, I256, U256};
use {
    std::{
        cmp::Ordering,
        fmt,
        hash::{Hash, Hasher},
    },
    thiserror::Error,
};

/// An EIP-155 chain ID.
pub type ChainId = u64;

/// An ERC20 token on a specific chain.
///
/// Two tokens are the same token if they live at the same address on the same
/// chain; decimals and symbol are descriptive only.
#[derive(Clone, Debug, Eq)]
pub struct Token {
    chain_id: ChainId,
    address: Address,
    decimals: u8,
    symbol: Option<String>,
}

impl Token {
    pub fn new(chain_id: ChainId, address: Address, decimals: u8) -> Self {
        Self {
            chain_id,
            address,
            decimals,
            symbol: None,
        }
    }

    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    pub fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    pub fn symbol(&self) -> Option<&str> {
        self.symbol.as_deref()
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.chain_id == other.chain_id && self.address == other.address
    }
}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.chain_id.hash(state);
        self.address.hash(state);
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.symbol {
            Some(symbol) => write!(f, "{symbol} ({})", self.address),
            None => write!(f, "{}", self.address),
        }
    }
}

/// An amount of a token in its base units.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TokenAmount {
    token: Token,
    amount: U256,
}

#[derive(Debug, Error)]
#[error("invalid amount {value:?} of token {token}: {reason}")]
pub struct InvalidAmount {
    pub token: Address,
    pub value: String,
    pub reason: String,
}

impl TokenAmount {
    pub fn from_raw(token: Token, amount: U256) -> Self {
        Self { token, amount }
    }

    /// Creates an amount from a human readable decimal string, for example
    /// `"1.5"`, using the token's decimals.
    pub fn from_human(token: Token, value: &str) -> Result<Self, InvalidAmount> {
        let amount =
            number::units::parse_amount(value, token.decimals).map_err(|err| InvalidAmount {
                token: token.address,
                value: value.to_string(),
                reason: err.to_string(),
            })?;
        Ok(Self { token, amount })
    }

    pub fn zero(token: Token) -> Self {
        Self::from_raw(token, U256::ZERO)
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    pub fn amount(&self) -> U256 {
        self.amount
    }

    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// The same token with a different amount.
    pub fn with_amount(&self, amount: U256) -> Self {
        Self::from_raw(self.token.clone(), amount)
    }

    /// The amount as a human readable decimal string.
    pub fn to_human(&self) -> String {
        number::units::format_amount(self.amount, self.token.decimals)
            .unwrap_or_else(|_| self.amount.to_string())
    }

    /// Adds two amounts of the same token. Returns `None` when the tokens
    /// differ or on overflow.
    pub fn checked_add(&self, other: &Self) -> Option<Self> {
        if self.token != other.token {
            return None;
        }
        Some(self.with_amount(self.amount.checked_add(other.amount)?))
    }

    /// Subtracts two amounts of the same token. Returns `None` when the tokens
    /// differ or on underflow.
    pub fn checked_sub(&self, other: &Self) -> Option<Self> {
        if self.token != other.token {
            return None;
        }
        Some(self.with_amount(self.amount.checked_sub(other.amount)?))
    }
}

/// Amounts are only ordered if they are of the same token.
impl PartialOrd for TokenAmount {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        (self.token == other.token).then(|| self.amount.cmp(&other.amount))
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.to_human(), self.token)
    }
}

#[cfg(test)]
mod tests {
    use {super::*, number::units::EthUnit};

    fn bal() -> Token {
        Token::new(1, Address::repeat_byte(0xba), 18).with_symbol("BAL")
    }

    fn usdc() -> Token {
        Token::new(1, Address::repeat_byte(0xa0), 6).with_symbol("USDC")
    }

    #[test]
    fn token_identity_ignores_metadata() {
        let plain = Token::new(1, Address::repeat_byte(0xba), 18);
        assert_eq!(plain, bal());
        assert_ne!(Token::new(137, Address::repeat_byte(0xba), 18), bal());
    }

    #[test]
    fn human_amounts() {
        let amount = TokenAmount::from_human(usdc(), "1.25").unwrap();
        assert_eq!(amount.amount(), U256::from(1_250_000));
        assert_eq!(amount.to_human(), "1.25");
        assert!(TokenAmount::from_human(usdc(), "-1").is_err());
        assert!(TokenAmount::from_human(usdc(), "abc").is_err());
    }

    #[test]
    fn arithmetic_requires_matching_tokens() {
        let one = TokenAmount::from_raw(bal(), 1u64.eth());
        let two = TokenAmount::from_raw(bal(), 2u64.eth());
        assert_eq!(one.checked_add(&one), Some(two.clone()));
        assert_eq!(two.checked_sub(&one), Some(one.clone()));
        assert_eq!(one.checked_sub(&two), None);
        assert!(one < two);

        let other = TokenAmount::from_raw(usdc(), U256::from(1));
        assert_eq!(one.checked_add(&other), None);
        assert_eq!(one.partial_cmp(&other), None);
    }
}
