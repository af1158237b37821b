// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2015-2023 Nautech Systems Pty Ltd. All rights reserved.
//  https://nautechsystems.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

use std::{
    fmt::{Debug, Display, Formatter},
    hash::{Hash, Hasher},
    str::FromStr,
};

use anyhow::anyhow;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sextant_core::correctness::{check_valid_string, FAILED};
use ustr::Ustr;

use crate::enums::CurrencyType;

/// Represents a medium of exchange in a specified denomination with a fixed
/// decimal precision.
#[repr(C)]
#[derive(Clone, Copy, Eq)]
pub struct Currency {
    /// The ISO 4217 style currency code.
    pub code: Ustr,
    /// The decimal precision of the denomination.
    pub precision: u8,
    /// The ISO 4217 numeric code (zero for crypto assets).
    pub iso4217: u16,
    /// The English name of the currency.
    pub name: Ustr,
    /// The general currency classification.
    pub currency_type: CurrencyType,
}

impl Currency {
    /// Creates a new [`Currency`].
    ///
    /// # Panics
    ///
    /// Panics if `code` or `name` are invalid strings, or if `precision`
    /// exceeds the fixed-point maximum.
    #[must_use]
    pub fn new(
        code: &str,
        precision: u8,
        iso4217: u16,
        name: &str,
        currency_type: CurrencyType,
    ) -> Self {
        use crate::types::fixed::check_fixed_precision;

        check_valid_string(code, "`Currency` code").expect(FAILED);
        check_valid_string(name, "`Currency` name").expect(FAILED);
        check_fixed_precision(precision).expect(FAILED);

        Self {
            code: Ustr::from(code),
            precision,
            iso4217,
            name: Ustr::from(name),
            currency_type,
        }
    }

    #[must_use]
    pub fn is_fiat(&self) -> bool {
        self.currency_type == CurrencyType::Fiat
    }

    #[must_use]
    pub fn is_crypto(&self) -> bool {
        self.currency_type == CurrencyType::Crypto
    }
}

impl FromStr for Currency {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AUD" => Ok(Self::AUD()),
            "BRL" => Ok(Self::BRL()),
            "CAD" => Ok(Self::CAD()),
            "CHF" => Ok(Self::CHF()),
            "EUR" => Ok(Self::EUR()),
            "GBP" => Ok(Self::GBP()),
            "JPY" => Ok(Self::JPY()),
            "USD" => Ok(Self::USD()),
            "BTC" => Ok(Self::BTC()),
            "ETH" => Ok(Self::ETH()),
            "USDC" => Ok(Self::USDC()),
            "USDT" => Ok(Self::USDT()),
            _ => Err(anyhow!("Unknown `Currency` code: {s}")),
        }
    }
}

impl From<&str> for Currency {
    fn from(value: &str) -> Self {
        Self::from_str(value).expect(FAILED)
    }
}

impl PartialEq for Currency {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Hash for Currency {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state);
    }
}

impl Debug for Currency {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}(code={}, precision={}, currency_type={})",
            stringify!(Currency),
            self.code,
            self.precision,
            self.currency_type,
        )
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code)
    }
}

impl Serialize for Currency {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code.as_str())
    }
}

impl<'de> Deserialize<'de> for Currency {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Self::from_str(&code).map_err(serde::de::Error::custom)
    }
}

////////////////////////////////////////////////////////////////////////////////
// Internal currency registry
////////////////////////////////////////////////////////////////////////////////
#[allow(non_snake_case)]
impl Currency {
    #[must_use]
    pub fn AUD() -> Self {
        Self::new("AUD", 2, 36, "Australian dollar", CurrencyType::Fiat)
    }

    #[must_use]
    pub fn BRL() -> Self {
        Self::new("BRL", 2, 986, "Brazilian real", CurrencyType::Fiat)
    }

    #[must_use]
    pub fn CAD() -> Self {
        Self::new("CAD", 2, 124, "Canadian dollar", CurrencyType::Fiat)
    }

    #[must_use]
    pub fn CHF() -> Self {
        Self::new("CHF", 2, 756, "Swiss franc", CurrencyType::Fiat)
    }

    #[must_use]
    pub fn EUR() -> Self {
        Self::new("EUR", 2, 978, "Euro", CurrencyType::Fiat)
    }

    #[must_use]
    pub fn GBP() -> Self {
        Self::new("GBP", 2, 826, "British pound", CurrencyType::Fiat)
    }

    #[must_use]
    pub fn JPY() -> Self {
        Self::new("JPY", 0, 392, "Japanese yen", CurrencyType::Fiat)
    }

    #[must_use]
    pub fn USD() -> Self {
        Self::new("USD", 2, 840, "United States dollar", CurrencyType::Fiat)
    }

    #[must_use]
    pub fn BTC() -> Self {
        Self::new("BTC", 8, 0, "Bitcoin", CurrencyType::Crypto)
    }

    #[must_use]
    pub fn ETH() -> Self {
        Self::new("ETH", 8, 0, "Ether", CurrencyType::Crypto)
    }

    #[must_use]
    pub fn USDC() -> Self {
        Self::new("USDC", 8, 0, "USD Coin", CurrencyType::Crypto)
    }

    #[must_use]
    pub fn USDT() -> Self {
        Self::new("USDT", 8, 0, "Tether", CurrencyType::Crypto)
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_registry_lookup() {
        let usd = Currency::from_str("USD").unwrap();
        assert_eq!(usd.code.as_str(), "USD");
        assert_eq!(usd.precision, 2);
        assert_eq!(usd.iso4217, 840);
        assert!(usd.is_fiat());
    }

    #[rstest]
    fn test_unknown_code_is_error() {
        assert!(Currency::from_str("XAG").is_err());
    }

    #[rstest]
    fn test_equality_by_code() {
        assert_eq!(Currency::USD(), Currency::USD());
        assert_ne!(Currency::USD(), Currency::AUD());
    }

    #[rstest]
    fn test_crypto_classification() {
        assert!(Currency::BTC().is_crypto());
        assert!(!Currency::BTC().is_fiat());
    }

    #[rstest]
    fn test_serde_round_trip() {
        let currency = Currency::ETH();
        let json = serde_json::to_string(&currency).unwrap();
        assert_eq!(json, "\"ETH\"");
        let deserialized: Currency = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, currency);
    }
}
