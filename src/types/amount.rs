use std::fmt::Display;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

/// A monetary amount in the smallest currency unit (wei-equivalent).
///
/// Serialized as a decimal string: 18-decimal base units routinely exceed
/// what a JSON number can carry losslessly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct AmountValue(pub U256);

impl AmountValue {
    pub const ZERO: AmountValue = AmountValue(U256::ZERO);
}

impl From<u8> for AmountValue {
    fn from(value: u8) -> Self {
        AmountValue(U256::from(value))
    }
}

impl From<u32> for AmountValue {
    fn from(value: u32) -> Self {
        AmountValue(U256::from(value))
    }
}

impl From<u64> for AmountValue {
    fn from(value: u64) -> Self {
        AmountValue(U256::from(value))
    }
}

impl From<u128> for AmountValue {
    fn from(value: u128) -> Self {
        AmountValue(U256::from(value))
    }
}

impl From<U256> for AmountValue {
    fn from(value: U256) -> Self {
        AmountValue(value)
    }
}

impl Add for AmountValue {
    type Output = AmountValue;

    fn add(self, rhs: Self) -> Self::Output {
        AmountValue(self.0 + rhs.0)
    }
}

impl AddAssign for AmountValue {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl FromStr for AmountValue {
    type Err = alloy_primitives::ruint::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Decimal only; amounts never travel as hex.
        U256::from_str_radix(s, 10).map(AmountValue)
    }
}

impl Display for AmountValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for AmountValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for AmountValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_displays_decimal() {
        let amount: AmountValue = "10000000000000000".parse().unwrap();
        assert_eq!(amount.to_string(), "10000000000000000");
        assert!("not-a-number".parse::<AmountValue>().is_err());
    }

    #[test]
    fn serializes_as_string() {
        let amount = AmountValue::from(42u64);
        assert_eq!(serde_json::to_string(&amount).unwrap(), "\"42\"");

        let back: AmountValue = serde_json::from_str("\"42\"").unwrap();
        assert_eq!(back, amount);
    }

    #[test]
    fn accumulates() {
        let mut total = AmountValue::ZERO;
        total += AmountValue::from(100u64);
        total += AmountValue::from(50u64);
        assert_eq!(total, AmountValue::from(150u64));
    }

    #[test]
    fn orders_by_magnitude() {
        assert!(AmountValue::from(100u64) < AmountValue::from(110u64));
    }
}
