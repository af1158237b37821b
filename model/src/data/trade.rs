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
    correctness::{check_positive_u64, FAILED},
    time::UnixNanos,
};

use crate::{
    enums::AggressorSide,
    identifiers::{execution_id::ExecutionId, instrument_id::InstrumentId},
    types::{price::Price, quantity::Quantity},
};

/// A single trade (matched execution) in a market.
#[repr(C)]
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeTick {
    pub instrument_id: InstrumentId,
    pub price: Price,
    pub size: Quantity,
    pub aggressor_side: AggressorSide,
    pub trade_id: ExecutionId,
    pub ts_event: UnixNanos,
    pub ts_init: UnixNanos,
}

impl TradeTick {
    /// Creates a new [`TradeTick`].
    ///
    /// # Errors
    ///
    /// Returns an error if `size` is not positive.
    pub fn new_checked(
        instrument_id: InstrumentId,
        price: Price,
        size: Quantity,
        aggressor_side: AggressorSide,
        trade_id: ExecutionId,
        ts_event: UnixNanos,
        ts_init: UnixNanos,
    ) -> anyhow::Result<Self> {
        check_positive_u64(size.raw, "`size` raw")?;
        Ok(Self {
            instrument_id,
            price,
            size,
            aggressor_side,
            trade_id,
            ts_event,
            ts_init,
        })
    }

    /// Creates a new [`TradeTick`].
    ///
    /// # Panics
    ///
    /// Panics if a correctness check fails (see [`TradeTick::new_checked`]).
    #[must_use]
    pub fn new(
        instrument_id: InstrumentId,
        price: Price,
        size: Quantity,
        aggressor_side: AggressorSide,
        trade_id: ExecutionId,
        ts_event: UnixNanos,
        ts_init: UnixNanos,
    ) -> Self {
        Self::new_checked(
            instrument_id,
            price,
            size,
            aggressor_side,
            trade_id,
            ts_event,
            ts_init,
        )
        .expect(FAILED)
    }
}

impl Display for TradeTick {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{},{},{},{},{},{}",
            self.instrument_id,
            self.price,
            self.size,
            self.aggressor_side,
            self.trade_id,
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

    #[rstest]
    fn test_to_string() {
        let tick = TradeTick::new(
            InstrumentId::from("ETHUSDT.BINANCE"),
            Price::new(10_000.9, 1),
            Quantity::new(1.5, 1),
            AggressorSide::Buyer,
            ExecutionId::new("123456789"),
            1,
            0,
        );
        assert_eq!(
            tick.to_string(),
            "ETHUSDT.BINANCE,10000.9,1.5,BUYER,123456789,1"
        );
    }

    #[rstest]
    fn test_zero_size_is_error() {
        let result = TradeTick::new_checked(
            InstrumentId::from("ETHUSDT.BINANCE"),
            Price::new(10_000.9, 1),
            Quantity::zero(1),
            AggressorSide::Seller,
            ExecutionId::new("123456789"),
            1,
            0,
        );
        assert!(result.is_err());
    }

    #[rstest]
    fn test_serde_round_trip() {
        let tick = TradeTick::new(
            InstrumentId::from("ETHUSDT.BINANCE"),
            Price::new(10_000.9, 1),
            Quantity::new(1.5, 1),
            AggressorSide::Seller,
            ExecutionId::new("123456789"),
            1,
            0,
        );
        let json = serde_json::to_string(&tick).unwrap();
        let deserialized: TradeTick = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, tick);
    }
}
