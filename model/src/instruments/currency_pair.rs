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

/// A generic deliverable spot pair (FX or crypto), never inverse.
#[repr(C)]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CurrencyPair {
    pub id: InstrumentId,
    pub raw_symbol: Symbol,
    pub base_currency: Currency,
    pub quote_currency: Currency,
    pub price_precision: u8,
    pub size_precision: u8,
    pub price_increment: Price,
    pub size_increment: Quantity,
    pub lot_size: Option<Quantity>,
}

impl CurrencyPair {
    /// Creates a new [`CurrencyPair`].
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
        price_precision: u8,
        size_precision: u8,
        price_increment: Price,
        size_increment: Quantity,
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
            price_precision,
            size_precision,
            price_increment,
            size_increment,
            lot_size,
        }
    }
}

/// Provides a default [`CurrencyPair`] used for testing (`AUD/USD.SIM`).
impl Default for CurrencyPair {
    fn default() -> Self {
        CurrencyPair::new(
            InstrumentId::from("AUD/USD.SIM"),
            Symbol::new("AUD/USD"),
            Currency::AUD(),
            Currency::USD(),
            5,
            0,
            Price::new(0.00001, 5),
            Quantity::new(1.0, 0),
            Some(Quantity::new(1_000.0, 0)),
        )
    }
}

impl PartialEq<Self> for CurrencyPair {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for CurrencyPair {}

impl Hash for CurrencyPair {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Instrument for CurrencyPair {
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
        false
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
        Quantity::new(1.0, 0)
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
    fn test_equality_by_id() {
        let a = CurrencyPair::default();
        let b = CurrencyPair::default();
        assert_eq!(a, b);
    }

    #[rstest]
    fn test_definition() {
        let audusd = CurrencyPair::default();
        assert_eq!(audusd.id.to_string(), "AUD/USD.SIM");
        assert!(!audusd.is_inverse());
        assert_eq!(audusd.multiplier(), Quantity::new(1.0, 0));
        assert_eq!(*audusd.cost_currency(), Currency::USD());
    }

    #[rstest]
    #[should_panic(expected = "Condition failed")]
    fn test_increment_precision_mismatch_panics() {
        let _ = CurrencyPair::new(
            InstrumentId::from("AUD/USD.SIM"),
            Symbol::new("AUD/USD"),
            Currency::AUD(),
            Currency::USD(),
            5,
            0,
            Price::new(0.001, 3),
            Quantity::new(1.0, 0),
            None,
        );
    }
}
