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
use sextant_core::time::UnixNanos;

use crate::{
    enums::{BookAction, OrderSide},
    identifiers::instrument_id::InstrumentId,
    types::{price::Price, quantity::Quantity},
};

/// A resting order (or aggregated price level) within an order book.
#[repr(C)]
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookOrder {
    pub side: OrderSide,
    pub price: Price,
    pub size: Quantity,
    pub order_id: u64,
}

impl BookOrder {
    /// Creates a new [`BookOrder`].
    #[must_use]
    pub fn new(side: OrderSide, price: Price, size: Quantity, order_id: u64) -> Self {
        Self {
            side,
            price,
            size,
            order_id,
        }
    }
}

impl Display for BookOrder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.price, self.size, self.side, self.order_id,
        )
    }
}

/// A single order book operation, sequenced by a monotonically increasing
/// `sequence` number (the update ID).
#[repr(C)]
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBookDelta {
    pub instrument_id: InstrumentId,
    pub action: BookAction,
    pub order: BookOrder,
    pub flags: u8,
    pub sequence: u64,
    pub ts_event: UnixNanos,
    pub ts_init: UnixNanos,
}

impl OrderBookDelta {
    /// Creates a new [`OrderBookDelta`].
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        instrument_id: InstrumentId,
        action: BookAction,
        order: BookOrder,
        flags: u8,
        sequence: u64,
        ts_event: UnixNanos,
        ts_init: UnixNanos,
    ) -> Self {
        Self {
            instrument_id,
            action,
            order,
            flags,
            sequence,
            ts_event,
            ts_init,
        }
    }
}

/// A batch of order book deltas sharing an instrument.
#[derive(Clone, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBookDeltas {
    pub instrument_id: InstrumentId,
    pub deltas: Vec<OrderBookDelta>,
}

impl OrderBookDeltas {
    /// Creates a new [`OrderBookDeltas`].
    #[must_use]
    pub fn new(instrument_id: InstrumentId, deltas: Vec<OrderBookDelta>) -> Self {
        Self {
            instrument_id,
            deltas,
        }
    }
}

/// A complete order book image, replacing all prior state when applied.
#[derive(Clone, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBookSnapshot {
    pub instrument_id: InstrumentId,
    pub bids: Vec<BookOrder>,
    pub asks: Vec<BookOrder>,
    pub sequence: u64,
    pub ts_event: UnixNanos,
    pub ts_init: UnixNanos,
}

impl OrderBookSnapshot {
    /// Creates a new [`OrderBookSnapshot`].
    #[must_use]
    pub fn new(
        instrument_id: InstrumentId,
        bids: Vec<BookOrder>,
        asks: Vec<BookOrder>,
        sequence: u64,
        ts_event: UnixNanos,
        ts_init: UnixNanos,
    ) -> Self {
        Self {
            instrument_id,
            bids,
            asks,
            sequence,
            ts_event,
            ts_init,
        }
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
    fn test_delta_construction() {
        let order = BookOrder::new(OrderSide::Buy, Price::new(1.00, 2), Quantity::from(10_u64), 7);
        let delta = OrderBookDelta::new(
            InstrumentId::from("AUD/USD.SIM"),
            BookAction::Add,
            order,
            0,
            1,
            100,
            100,
        );

        assert_eq!(delta.action, BookAction::Add);
        assert_eq!(delta.order.order_id, 7);
        assert_eq!(delta.sequence, 1);
    }

    #[rstest]
    fn test_serde_round_trip() {
        let order = BookOrder::new(OrderSide::Sell, Price::new(1.01, 2), Quantity::from(5_u64), 8);
        let delta = OrderBookDelta::new(
            InstrumentId::from("AUD/USD.SIM"),
            BookAction::Update,
            order,
            0,
            2,
            200,
            200,
        );
        let json = serde_json::to_string(&delta).unwrap();
        let deserialized: OrderBookDelta = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, delta);
    }
}
