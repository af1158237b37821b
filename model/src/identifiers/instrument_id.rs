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
    str::FromStr,
};

use anyhow::anyhow;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sextant_core::correctness::FAILED;

use super::{symbol::Symbol, venue::Venue};

/// A valid instrument ID, in the form `{symbol}.{venue}`.
///
/// The venue is taken from the portion after the *last* dot, so symbols may
/// themselves contain dots (e.g. `BRK.B.NYSE`).
#[repr(C)]
#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct InstrumentId {
    /// The instrument's ticker symbol.
    pub symbol: Symbol,
    /// The venue the instrument trades on.
    pub venue: Venue,
}

impl InstrumentId {
    /// Creates a new [`InstrumentId`].
    #[must_use]
    pub fn new(symbol: Symbol, venue: Venue) -> Self {
        Self { symbol, venue }
    }
}

impl FromStr for InstrumentId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (symbol, venue) = s.rsplit_once('.').ok_or_else(|| {
            anyhow!("Error parsing `InstrumentId` from '{s}': expected '{{symbol}}.{{venue}}'")
        })?;
        Ok(Self {
            symbol: Symbol::new_checked(symbol)?,
            venue: Venue::new_checked(venue)?,
        })
    }
}

impl From<&str> for InstrumentId {
    fn from(value: &str) -> Self {
        Self::from_str(value).expect(FAILED)
    }
}

/// Provides a default [`InstrumentId`] used for testing.
impl Default for InstrumentId {
    fn default() -> Self {
        Self {
            symbol: Symbol::default(),
            venue: Venue::default(),
        }
    }
}

impl Debug for InstrumentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}.{}\"", self.symbol, self.venue)
    }
}

impl Display for InstrumentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.symbol, self.venue)
    }
}

impl Serialize for InstrumentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for InstrumentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Self::from_str(&value).map_err(serde::de::Error::custom)
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
    fn test_from_str_round_trip() {
        let id = InstrumentId::from_str("ETHUSDT.BINANCE").unwrap();
        assert_eq!(id.symbol.to_string(), "ETHUSDT");
        assert_eq!(id.venue.to_string(), "BINANCE");
        assert_eq!(id.to_string(), "ETHUSDT.BINANCE");
    }

    #[rstest]
    fn test_from_str_dotted_symbol() {
        let id = InstrumentId::from_str("BRK.B.NYSE").unwrap();
        assert_eq!(id.symbol.to_string(), "BRK.B");
        assert_eq!(id.venue.to_string(), "NYSE");
    }

    #[rstest]
    fn test_from_str_missing_venue() {
        assert!(InstrumentId::from_str("ETHUSDT").is_err());
    }
}
