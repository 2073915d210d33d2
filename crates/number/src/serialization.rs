use {
    alloy::primitives::U256,
    serde::{
        Deserializer,
        Serializer,
        de::{self, Visitor},
    },
    serde_with::{DeserializeAs, SerializeAs},
    std::fmt,
};

/// Serialize [`U256`] as a decimal string and deserialize [`U256`] from a
/// decimal string, a hex string prefixed with 0x or a JSON integer.
///
/// Intended to be used with `serde_with::serde_as`.
#[derive(Debug)]
pub struct HexOrDecimalU256;

impl<'de> DeserializeAs<'de, U256> for HexOrDecimalU256 {
    fn deserialize_as<D>(deserializer: D) -> Result<U256, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct U256Visitor;

        impl Visitor<'_> for U256Visitor {
            type Value = U256;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                write!(
                    formatter,
                    "a u256 encoded either as 0x hex prefixed or decimal encoded string"
                )
            }

            fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                let s = s.trim();
                if let Some(hex) = s.strip_prefix("0x") {
                    U256::from_str_radix(hex, 16).map_err(|err| {
                        E::custom(format!("failed to decode {s:?} as hex u256: {err}"))
                    })
                } else {
                    U256::from_str_radix(s, 10).map_err(|err| {
                        E::custom(format!("failed to decode {s:?} as decimal u256: {err}"))
                    })
                }
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(U256::from(v))
            }

            fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                u64::try_from(v)
                    .map(U256::from)
                    .map_err(|_| E::custom(format!("negative amount {v}")))
            }
        }

        deserializer.deserialize_any(U256Visitor)
    }
}

impl SerializeAs<U256> for HexOrDecimalU256 {
    fn serialize_as<S>(source: &U256, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&source.to_string())
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        serde::{Deserialize, Serialize},
        serde_with::serde_as,
    };

    #[serde_as]
    #[derive(Debug, Deserialize, Serialize, PartialEq)]
    struct Amount(#[serde_as(as = "HexOrDecimalU256")] U256);

    #[test]
    fn deserializes_hex_and_decimal() {
        let decimal: Amount = serde_json::from_str(r#""1000""#).unwrap();
        let hex: Amount = serde_json::from_str(r#""0x3e8""#).unwrap();
        let number: Amount = serde_json::from_str("1000").unwrap();
        assert_eq!(decimal, Amount(U256::from(1000)));
        assert_eq!(hex, decimal);
        assert_eq!(number, decimal);
    }

    #[test]
    fn rejects_negative_amounts() {
        assert!(serde_json::from_str::<Amount>("-1").is_err());
        assert!(serde_json::from_str::<Amount>(r#""-1""#).is_err());
    }

    #[test]
    fn serializes_as_decimal() {
        assert_eq!(
            serde_json::to_string(&Amount(U256::from(1000))).unwrap(),
            r#""1000""#
        );
    }
}
