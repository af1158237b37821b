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

//! Snapshot events emitted by the position aggregate to subscribers.

use serde::{Deserialize, Serialize};
use sextant_core::{time::UnixNanos, uuid::UUID4};

use crate::{
    enums::{OrderSide, PositionSide},
    events::order::OrderFilled,
    identifiers::{
        account_id::AccountId, client_order_id::ClientOrderId, instrument_id::InstrumentId,
        position_id::PositionId, strategy_id::StrategyId, trader_id::TraderId,
    },
    position::Position,
    types::{currency::Currency, money::Money, price::Price, quantity::Quantity},
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PositionEvent {
    PositionOpened(PositionOpened),
    PositionChanged(PositionChanged),
    PositionClosed(PositionClosed),
}

#[repr(C)]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PositionOpened {
    pub trader_id: TraderId,
    pub strategy_id: StrategyId,
    pub instrument_id: InstrumentId,
    pub position_id: PositionId,
    pub account_id: AccountId,
    pub opening_order_id: ClientOrderId,
    pub entry: OrderSide,
    pub side: PositionSide,
    pub signed_qty: f64,
    pub quantity: Quantity,
    pub last_qty: Quantity,
    pub last_px: Price,
    pub currency: Currency,
    pub avg_px_open: f64,
    pub event_id: UUID4,
    pub ts_event: UnixNanos,
    pub ts_init: UnixNanos,
}

impl PositionOpened {
    /// Creates a new [`PositionOpened`] snapshot from the given position and
    /// the fill which opened it.
    #[must_use]
    pub fn create(
        position: &Position,
        fill: &OrderFilled,
        event_id: UUID4,
        ts_init: UnixNanos,
    ) -> Self {
        Self {
            trader_id: position.trader_id,
            strategy_id: position.strategy_id,
            instrument_id: position.instrument_id,
            position_id: position.id,
            account_id: position.account_id,
            opening_order_id: position.opening_order_id,
            entry: position.entry,
            side: position.side,
            signed_qty: position.signed_qty,
            quantity: position.quantity,
            last_qty: fill.last_qty,
            last_px: fill.last_px,
            currency: position.cost_currency,
            avg_px_open: position.avg_px_open,
            event_id,
            ts_event: fill.ts_event,
            ts_init,
        }
    }
}

#[repr(C)]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PositionChanged {
    pub trader_id: TraderId,
    pub strategy_id: StrategyId,
    pub instrument_id: InstrumentId,
    pub position_id: PositionId,
    pub account_id: AccountId,
    pub opening_order_id: ClientOrderId,
    pub entry: OrderSide,
    pub side: PositionSide,
    pub signed_qty: f64,
    pub quantity: Quantity,
    pub peak_qty: Quantity,
    pub last_qty: Quantity,
    pub last_px: Price,
    pub currency: Currency,
    pub avg_px_open: f64,
    pub avg_px_close: Option<f64>,
    pub realized_return: f64,
    pub realized_pnl: Option<Money>,
    pub event_id: UUID4,
    pub ts_opened: UnixNanos,
    pub ts_event: UnixNanos,
    pub ts_init: UnixNanos,
}

impl PositionChanged {
    /// Creates a new [`PositionChanged`] snapshot from the given position
    /// and the fill which changed it.
    #[must_use]
    pub fn create(
        position: &Position,
        fill: &OrderFilled,
        event_id: UUID4,
        ts_init: UnixNanos,
    ) -> Self {
        Self {
            trader_id: position.trader_id,
            strategy_id: position.strategy_id,
            instrument_id: position.instrument_id,
            position_id: position.id,
            account_id: position.account_id,
            opening_order_id: position.opening_order_id,
            entry: position.entry,
            side: position.side,
            signed_qty: position.signed_qty,
            quantity: position.quantity,
            peak_qty: position.peak_qty,
            last_qty: fill.last_qty,
            last_px: fill.last_px,
            currency: position.cost_currency,
            avg_px_open: position.avg_px_open,
            avg_px_close: position.avg_px_close,
            realized_return: position.realized_return,
            realized_pnl: position.realized_pnl,
            event_id,
            ts_opened: position.ts_opened,
            ts_event: fill.ts_event,
            ts_init,
        }
    }
}

#[repr(C)]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PositionClosed {
    pub trader_id: TraderId,
    pub strategy_id: StrategyId,
    pub instrument_id: InstrumentId,
    pub position_id: PositionId,
    pub account_id: AccountId,
    pub opening_order_id: ClientOrderId,
    pub closing_order_id: Option<ClientOrderId>,
    pub entry: OrderSide,
    pub side: PositionSide,
    pub signed_qty: f64,
    pub quantity: Quantity,
    pub peak_qty: Quantity,
    pub last_qty: Quantity,
    pub last_px: Price,
    pub currency: Currency,
    pub avg_px_open: f64,
    pub avg_px_close: Option<f64>,
    pub realized_return: f64,
    pub realized_pnl: Option<Money>,
    pub duration_ns: u64,
    pub event_id: UUID4,
    pub ts_opened: UnixNanos,
    pub ts_closed: Option<UnixNanos>,
    pub ts_event: UnixNanos,
    pub ts_init: UnixNanos,
}

impl PositionClosed {
    /// Creates a new [`PositionClosed`] snapshot from the given position and
    /// the fill which flattened it.
    #[must_use]
    pub fn create(
        position: &Position,
        fill: &OrderFilled,
        event_id: UUID4,
        ts_init: UnixNanos,
    ) -> Self {
        Self {
            trader_id: position.trader_id,
            strategy_id: position.strategy_id,
            instrument_id: position.instrument_id,
            position_id: position.id,
            account_id: position.account_id,
            opening_order_id: position.opening_order_id,
            closing_order_id: position.closing_order_id,
            entry: position.entry,
            side: position.side,
            signed_qty: position.signed_qty,
            quantity: position.quantity,
            peak_qty: position.peak_qty,
            last_qty: fill.last_qty,
            last_px: fill.last_px,
            currency: position.cost_currency,
            avg_px_open: position.avg_px_open,
            avg_px_close: position.avg_px_close,
            realized_return: position.realized_return,
            realized_pnl: position.realized_pnl,
            duration_ns: position.duration_ns,
            event_id,
            ts_opened: position.ts_opened,
            ts_closed: position.ts_closed,
            ts_event: fill.ts_event,
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
    use crate::{
        events::order::{
            OrderAcceptedBuilder, OrderFilledBuilder, OrderInitializedBuilder,
            OrderSubmittedBuilder,
        },
        identifiers::execution_id::ExecutionId,
        instruments::CurrencyPair,
        types::quantity::Quantity,
    };

    fn position_with_fill() -> (Position, OrderFilled) {
        let audusd = CurrencyPair::default();
        let init = OrderInitializedBuilder::default()
            .instrument_id(audusd.id)
            .quantity(Quantity::from(100_000_u64))
            .build();
        let submitted = OrderSubmittedBuilder::new(&init).build();
        let accepted = OrderAcceptedBuilder::new(&submitted).build();
        let fill = OrderFilledBuilder::new(&init, &accepted)
            .position_id(PositionId::default())
            .execution_id(ExecutionId::new("E-1"))
            .last_px(Price::new(1.0, 5))
            .ts_event(1_000)
            .build();
        (Position::new(&audusd, fill.clone()), fill)
    }

    #[rstest]
    fn test_position_opened_snapshot() {
        let (position, fill) = position_with_fill();

        let event = PositionOpened::create(&position, &fill, UUID4::new(), 2_000);

        assert_eq!(event.position_id, position.id);
        assert_eq!(event.side, PositionSide::Long);
        assert_eq!(event.quantity, Quantity::from(100_000_u64));
        assert_eq!(event.last_px, Price::new(1.0, 5));
        assert_eq!(event.ts_event, 1_000);
        assert_eq!(event.ts_init, 2_000);
    }

    #[rstest]
    fn test_position_closed_snapshot() {
        let (mut position, fill1) = position_with_fill();
        let closing = OrderFilled {
            order_side: crate::enums::OrderSide::Sell,
            execution_id: ExecutionId::new("E-2"),
            ts_event: 3_000,
            ..fill1
        };
        position.apply(&closing).unwrap();

        let event = PositionClosed::create(&position, &closing, UUID4::new(), 4_000);

        assert_eq!(event.side, PositionSide::Flat);
        assert_eq!(event.ts_closed, Some(3_000));
        assert_eq!(event.duration_ns, 2_000);
        assert_eq!(event.closing_order_id, Some(closing.client_order_id));
    }
}
