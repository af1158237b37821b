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

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use sextant_core::correctness::{check_equal_u8, FAILED};

use super::Instrument;
use crate::{
    identifiers::{instrument_id::InstrumentId, symbol::Symbol},
    types::{currency::Currency, price::Price, quantity::Quantity},
};

/// A crypto perpetual swap (a.k.a. perpetual future).
///
/// When `is_inverse` the payout is `1/price`-linear and PnL is expressed in
/// the base currency.
#[repr(C)]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CryptoPerpetual {
    pub id: InstrumentId,
    pub raw_symbol: Symbol,
    pub base_currency: Currency,
    pub quote_currency: Currency,
    pub settlement_currency: Currency,
    pub is_inverse: bool,
    pub price_precision: u8,
    pub size_precision: u8,
    pub price_increment: Price,
    pub size_increment: Quantity,
    pub multiplier: Quantity,
    pub lot_size: Option<Quantity>,
}

impl CryptoPerpetual {
    /// Creates a new [`CryptoPerpetual`].
    ///
    /// # Panics
    ///
    /// Panics if the increment precisions do not match the declared
    /// precisions.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: InstrumentId,
        raw_symbol: Symbol,
        base_currency: Currency,
        quote_currency: Currency,
        settlement_currency: Currency,
        is_inverse: bool,
        price_precision: u8,
        size_precision: u8,
        price_increment: Price,
        size_increment: Quantity,
        multiplier: Quantity,
        lot_size: Option<Quantity>,
    ) -> Self {
        check_equal_u8(
            price_increment.precision,
            price_precision,
            "`price_increment` precision",
            "`price_precision`",
        )
        .expect(FAILED);
        check_equal_u8(
            size_increment.precision,
            size_precision,
            "`size_increment` precision",
            "`size_precision`",
        )
        .expect(FAILED);

        Self {
            id,
            raw_symbol,
            base_currency,
            quote_currency,
            settlement_currency,
            is_inverse,
            price_precision,
            size_precision,
            price_increment,
            size_increment,
            multiplier,
            lot_size,
        }
    }
}

/// Provides a default [`CryptoPerpetual`] used for testing
/// (`XBTUSD.BITMEX`, inverse).
impl Default for CryptoPerpetual {
    fn default() -> Self {
        CryptoPerpetual::new(
            InstrumentId::from("XBTUSD.BITMEX"),
            Symbol::new("XBTUSD"),
            Currency::BTC(),
            Currency::USD(),
            Currency::BTC(),
            true,
            1,
            0,
            Price::new(0.5, 1),
            Quantity::new(1.0, 0),
            Quantity::new(1.0, 0),
            Some(Quantity::new(100.0, 0)),
        )
    }
}

impl PartialEq<Self> for CryptoPerpetual {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for CryptoPerpetual {}

impl Hash for CryptoPerpetual {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Instrument for CryptoPerpetual {
    fn id(&self) -> &InstrumentId {
        &self.id
    }

    fn raw_symbol(&self) -> &Symbol {
        &self.raw_symbol
    }

    fn quote_currency(&self) -> &Currency {
        &self.quote_currency
    }

    fn base_currency(&self) -> Option<&Currency> {
        Some(&self.base_currency)
    }

    fn is_inverse(&self) -> bool {
        self.is_inverse
    }

    fn price_precision(&self) -> u8 {
        self.price_precision
    }

    fn size_precision(&self) -> u8 {
        self.size_precision
    }

    fn price_increment(&self) -> Price {
        self.price_increment
    }

    fn size_increment(&self) -> Quantity {
        self.size_increment
    }

    fn multiplier(&self) -> Quantity {
        self.multiplier
    }

    fn lot_size(&self) -> Option<Quantity> {
        self.lot_size
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
    fn test_definition() {
        let xbtusd = CryptoPerpetual::default();
        assert_eq!(xbtusd.id.to_string(), "XBTUSD.BITMEX");
        assert!(xbtusd.is_inverse());
        assert_eq!(*xbtusd.cost_currency(), Currency::BTC());
        assert_eq!(xbtusd.price_increment(), Price::new(0.5, 1));
    }
}
