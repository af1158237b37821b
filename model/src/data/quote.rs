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

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use sextant_core::{
    correctness::{check_equal_u8, FAILED},
    time::UnixNanos,
};

use crate::{
    enums::PriceType,
    identifiers::instrument_id::InstrumentId,
    types::{
        fixed::FIXED_PRECISION,
        price::Price,
        quantity::Quantity,
    },
};

/// A top-of-book quote: best bid and ask with their sizes.
#[repr(C)]
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteTick {
    pub instrument_id: InstrumentId,
    pub bid_price: Price,
    pub ask_price: Price,
    pub bid_size: Quantity,
    pub ask_size: Quantity,
    pub ts_event: UnixNanos,
    pub ts_init: UnixNanos,
}

impl QuoteTick {
    /// Creates a new [`QuoteTick`].
    ///
    /// # Errors
    ///
    /// Returns an error if the bid/ask price or size precisions are
    /// mismatched.
    #[allow(clippy::too_many_arguments)]
    pub fn new_checked(
        instrument_id: InstrumentId,
        bid_price: Price,
        ask_price: Price,
        bid_size: Quantity,
        ask_size: Quantity,
        ts_event: UnixNanos,
        ts_init: UnixNanos,
    ) -> anyhow::Result<Self> {
        check_equal_u8(
            bid_price.precision,
            ask_price.precision,
            "`bid_price` precision",
            "`ask_price` precision",
        )?;
        check_equal_u8(
            bid_size.precision,
            ask_size.precision,
            "`bid_size` precision",
            "`ask_size` precision",
        )?;
        Ok(Self {
            instrument_id,
            bid_price,
            ask_price,
            bid_size,
            ask_size,
            ts_event,
            ts_init,
        })
    }

    /// Creates a new [`QuoteTick`].
    ///
    /// # Panics
    ///
    /// Panics if a correctness check fails (see [`QuoteTick::new_checked`]).
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        instrument_id: InstrumentId,
        bid_price: Price,
        ask_price: Price,
        bid_size: Quantity,
        ask_size: Quantity,
        ts_event: UnixNanos,
        ts_init: UnixNanos,
    ) -> Self {
        Self::new_checked(
            instrument_id,
            bid_price,
            ask_price,
            bid_size,
            ask_size,
            ts_event,
            ts_init,
        )
        .expect(FAILED)
    }

    /// Returns the price for the given price type (`MID` is the midpoint at
    /// one extra decimal of precision).
    #[must_use]
    pub fn extract_price(&self, price_type: PriceType) -> Price {
        match price_type {
            PriceType::Bid => self.bid_price,
            PriceType::Ask => self.ask_price,
            PriceType::Mid => Price::from_raw(
                (self.bid_price.raw + self.ask_price.raw) / 2,
                FIXED_PRECISION.min(self.bid_price.precision + 1),
            ),
            PriceType::Last => panic!("Cannot extract `LAST` price from `QuoteTick`"),
        }
    }

    /// Returns the size for the given price type.
    #[must_use]
    pub fn extract_size(&self, price_type: PriceType) -> Quantity {
        match price_type {
            PriceType::Bid => self.bid_size,
            PriceType::Ask => self.ask_size,
            PriceType::Mid => Quantity::from_raw(
                (self.bid_size.raw + self.ask_size.raw) / 2,
                FIXED_PRECISION.min(self.bid_size.precision + 1),
            ),
            PriceType::Last => panic!("Cannot extract `LAST` size from `QuoteTick`"),
        }
    }
}

impl Display for QuoteTick {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{},{},{},{},{},{}",
            self.instrument_id,
            self.bid_price,
            self.ask_price,
            self.bid_size,
            self.ask_size,
            self.ts_event,
        )
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn quote() -> QuoteTick {
        QuoteTick::new(
            InstrumentId::from("ETHUSDT.BINANCE"),
            Price::new(10_000.0, 4),
            Price::new(10_001.0, 4),
            Quantity::new(1.0, 8),
            Quantity::new(2.0, 8),
            1,
            0,
        )
    }

    #[rstest]
    #[case(PriceType::Bid, Price::new(10_000.0, 4))]
    #[case(PriceType::Ask, Price::new(10_001.0, 4))]
    #[case(PriceType::Mid, Price::new(10_000.5, 5))]
    fn test_extract_price(#[case] price_type: PriceType, #[case] expected: Price) {
        assert_eq!(quote().extract_price(price_type), expected);
    }

    #[rstest]
    fn test_mismatched_precision_is_error() {
        let result = QuoteTick::new_checked(
            InstrumentId::from("ETHUSDT.BINANCE"),
            Price::new(10_000.0, 4),
            Price::new(10_001.0, 5),
            Quantity::new(1.0, 8),
            Quantity::new(2.0, 8),
            1,
            0,
        );
        assert!(result.is_err());
    }

    #[rstest]
    fn test_to_string() {
        assert_eq!(
            quote().to_string(),
            "ETHUSDT.BINANCE,10000.0000,10001.0000,1.00000000,2.00000000,1"
        );
    }
}
