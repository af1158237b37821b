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

//! Tradable instrument definitions.
//!
//! Instruments are immutable once constructed and must be registered with
//! the cache before any tick referencing them arrives.

pub mod crypto_perpetual;
pub mod currency_pair;

use serde::{Deserialize, Serialize};

use crate::{
    identifiers::{instrument_id::InstrumentId, symbol::Symbol},
    types::{currency::Currency, money::Money, price::Price, quantity::Quantity},
};

pub use crypto_perpetual::CryptoPerpetual;
pub use currency_pair::CurrencyPair;

pub trait Instrument {
    fn id(&self) -> &InstrumentId;
    fn raw_symbol(&self) -> &Symbol;
    fn quote_currency(&self) -> &Currency;
    fn base_currency(&self) -> Option<&Currency>;
    fn is_inverse(&self) -> bool;
    fn price_precision(&self) -> u8;
    fn size_precision(&self) -> u8;
    fn price_increment(&self) -> Price;
    fn size_increment(&self) -> Quantity;
    fn multiplier(&self) -> Quantity;
    fn lot_size(&self) -> Option<Quantity>;

    /// The currency in which costs and PnL are expressed: the base currency
    /// for inverse instruments, otherwise the quote currency.
    fn cost_currency(&self) -> &Currency {
        if self.is_inverse() {
            self.base_currency()
                .expect("inverse instrument without `base_currency`")
        } else {
            self.quote_currency()
        }
    }

    /// Creates a [`Price`] at this instrument's price precision.
    fn make_price(&self, value: f64) -> Price {
        Price::new(value, self.price_precision())
    }

    /// Creates a [`Quantity`] at this instrument's size precision.
    fn make_qty(&self, value: f64) -> Quantity {
        Quantity::new(value, self.size_precision())
    }

    /// Returns the notional value of the given quantity at the given price.
    ///
    /// For inverse instruments the notional is `1/price`-linear and
    /// expressed in the base currency.
    fn calculate_notional_value(&self, quantity: Quantity, price: Price) -> Money {
        let amount = if self.is_inverse() {
            quantity.as_f64() * self.multiplier().as_f64() * (1.0 / price.as_f64())
        } else {
            quantity.as_f64() * self.multiplier().as_f64() * price.as_f64()
        };
        Money::new(amount, *self.cost_currency())
    }
}

/// A tagged sum over the concrete instrument definitions, for registry
/// storage and uniform dispatch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum InstrumentAny {
    CryptoPerpetual(CryptoPerpetual),
    CurrencyPair(CurrencyPair),
}

macro_rules! delegate {
    ($self:ident, $method:ident $(, $arg:expr)*) => {
        match $self {
            InstrumentAny::CryptoPerpetual(inst) => inst.$method($($arg),*),
            InstrumentAny::CurrencyPair(inst) => inst.$method($($arg),*),
        }
    };
}

impl Instrument for InstrumentAny {
    fn id(&self) -> &InstrumentId {
        delegate!(self, id)
    }

    fn raw_symbol(&self) -> &Symbol {
        delegate!(self, raw_symbol)
    }

    fn quote_currency(&self) -> &Currency {
        delegate!(self, quote_currency)
    }

    fn base_currency(&self) -> Option<&Currency> {
        delegate!(self, base_currency)
    }

    fn is_inverse(&self) -> bool {
        delegate!(self, is_inverse)
    }

    fn price_precision(&self) -> u8 {
        delegate!(self, price_precision)
    }

    fn size_precision(&self) -> u8 {
        delegate!(self, size_precision)
    }

    fn price_increment(&self) -> Price {
        delegate!(self, price_increment)
    }

    fn size_increment(&self) -> Quantity {
        delegate!(self, size_increment)
    }

    fn multiplier(&self) -> Quantity {
        delegate!(self, multiplier)
    }

    fn lot_size(&self) -> Option<Quantity> {
        delegate!(self, lot_size)
    }
}
