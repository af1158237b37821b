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

//! The position aggregate, folding order fills into net exposure and PnL.
//!
//! A position is an append-only log of [`OrderFilled`] events for a single
//! `(instrument_id, position_id)`. Fills in the direction of the position
//! open or add; opposing fills close the matched portion (realizing PnL) and
//! may flip the direction, with the residual opening anew at the fill price.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sextant_core::{correctness::check_predicate_true, time::UnixNanos};
use thiserror;

use crate::{
    enums::{OrderSide, PositionSide},
    events::order::OrderFilled,
    identifiers::{
        account_id::AccountId, client_order_id::ClientOrderId, execution_id::ExecutionId,
        instrument_id::InstrumentId, position_id::PositionId, strategy_id::StrategyId,
        trader_id::TraderId,
    },
    instruments::Instrument,
    types::{currency::Currency, fixed::FIXED_SCALAR, money::Money, price::Price, quantity::Quantity},
};

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum PositionError {
    #[error("Duplicate execution ID {0}")]
    DuplicateExecutionId(ExecutionId),
    #[error("Position {0} already closed")]
    AlreadyClosed(PositionId),
    #[error("Invalid fill order side")]
    InvalidOrderSide,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Position {
    pub events: Vec<OrderFilled>,
    pub execution_ids: Vec<ExecutionId>,
    pub id: PositionId,
    pub trader_id: TraderId,
    pub strategy_id: StrategyId,
    pub instrument_id: InstrumentId,
    pub account_id: AccountId,
    pub opening_order_id: ClientOrderId,
    pub closing_order_id: Option<ClientOrderId>,
    pub entry: OrderSide,
    pub side: PositionSide,
    pub signed_qty: f64,
    pub quantity: Quantity,
    pub peak_qty: Quantity,
    pub price_precision: u8,
    pub size_precision: u8,
    pub multiplier: Quantity,
    pub is_inverse: bool,
    pub base_currency: Option<Currency>,
    pub quote_currency: Currency,
    pub cost_currency: Currency,
    pub buy_qty: Quantity,
    pub sell_qty: Quantity,
    pub commissions: HashMap<Currency, Money>,
    pub avg_px_open: f64,
    pub avg_px_close: Option<f64>,
    pub realized_points: f64,
    pub realized_return: f64,
    pub realized_pnl: Option<Money>,
    pub ts_init: UnixNanos,
    pub ts_opened: UnixNanos,
    pub ts_last: UnixNanos,
    pub ts_closed: Option<UnixNanos>,
    pub duration_ns: u64,
}

impl Position {
    /// Opens a new [`Position`] from the given instrument and first fill.
    ///
    /// # Errors
    ///
    /// Returns an error if the fill carries no `position_id`, or an
    /// unspecified order side.
    pub fn new_checked<T: Instrument>(instrument: &T, fill: OrderFilled) -> anyhow::Result<Self> {
        check_predicate_true(fill.position_id.is_some(), "`fill.position_id` was `None`")?;
        check_predicate_true(
            fill.order_side != OrderSide::NoOrderSide,
            "`fill.order_side` was `NO_ORDER_SIDE`",
        )?;
        // SAFETY: `position_id` checked Some above
        let position_id = fill.position_id.unwrap();

        let mut position = Self {
            events: Vec::new(),
            execution_ids: Vec::new(),
            id: position_id,
            trader_id: fill.trader_id,
            strategy_id: fill.strategy_id,
            instrument_id: fill.instrument_id,
            account_id: fill.account_id,
            opening_order_id: fill.client_order_id,
            closing_order_id: None,
            entry: fill.order_side,
            side: PositionSide::Flat,
            signed_qty: 0.0,
            quantity: Quantity::zero(instrument.size_precision()),
            peak_qty: Quantity::zero(instrument.size_precision()),
            price_precision: instrument.price_precision(),
            size_precision: instrument.size_precision(),
            multiplier: instrument.multiplier(),
            is_inverse: instrument.is_inverse(),
            base_currency: instrument.base_currency().copied(),
            quote_currency: *instrument.quote_currency(),
            cost_currency: *instrument.cost_currency(),
            buy_qty: Quantity::zero(instrument.size_precision()),
            sell_qty: Quantity::zero(instrument.size_precision()),
            commissions: HashMap::new(),
            avg_px_open: fill.last_px.as_f64(),
            avg_px_close: None,
            realized_points: 0.0,
            realized_return: 0.0,
            realized_pnl: None,
            ts_init: fill.ts_init,
            ts_opened: fill.ts_event,
            ts_last: fill.ts_event,
            ts_closed: None,
            duration_ns: 0,
        };
        position
            .apply(&fill)
            .expect("first fill cannot be a duplicate");
        Ok(position)
    }

    /// Opens a new [`Position`] from the given instrument and first fill.
    ///
    /// # Panics
    ///
    /// Panics if a correctness check fails (see [`Position::new_checked`]).
    #[must_use]
    pub fn new<T: Instrument>(instrument: &T, fill: OrderFilled) -> Self {
        Self::new_checked(instrument, fill).expect(sextant_core::correctness::FAILED)
    }

    fn net_raw(&self) -> i128 {
        i128::from(self.buy_qty.raw) - i128::from(self.sell_qty.raw)
    }

    fn matched_raw(&self) -> i128 {
        i128::from(self.buy_qty.raw.min(self.sell_qty.raw))
    }

    /// Applies the given fill to the position.
    ///
    /// # Errors
    ///
    /// Returns an error (leaving the position unchanged) if the fill's
    /// `execution_id` was already applied, or the position is closed.
    pub fn apply(&mut self, fill: &OrderFilled) -> Result<(), PositionError> {
        if self.execution_ids.contains(&fill.execution_id) {
            return Err(PositionError::DuplicateExecutionId(fill.execution_id));
        }
        if self.is_closed() {
            return Err(PositionError::AlreadyClosed(self.id));
        }
        if fill.order_side == OrderSide::NoOrderSide {
            return Err(PositionError::InvalidOrderSide);
        }

        let prev_net_raw = self.net_raw();
        let prev_matched_raw = self.matched_raw();
        let prev_open_qty = prev_net_raw.unsigned_abs() as f64 / FIXED_SCALAR;
        let last_px = fill.last_px.as_f64();
        let last_qty = fill.last_qty.as_f64();

        match fill.order_side {
            OrderSide::Buy => self.buy_qty += fill.last_qty,
            OrderSide::Sell => self.sell_qty += fill.last_qty,
            OrderSide::NoOrderSide => unreachable!(),
        }
        let net_raw = self.net_raw();
        let fill_dir: i128 = if fill.order_side == OrderSide::Buy { 1 } else { -1 };

        if prev_net_raw == 0 || prev_net_raw.signum() == fill_dir {
            // Opening or adding to the position
            if prev_net_raw == 0 {
                self.entry = fill.order_side;
                self.avg_px_open = last_px;
                self.ts_opened = fill.ts_event;
            } else {
                self.avg_px_open =
                    weighted_avg(self.avg_px_open, prev_open_qty, last_px, last_qty);
            }
        } else {
            // Closing the matched portion, possibly flipping direction
            let closing_qty =
                (self.matched_raw() - prev_matched_raw).unsigned_abs() as f64 / FIXED_SCALAR;
            let prev_closed_qty = prev_matched_raw.unsigned_abs() as f64 / FIXED_SCALAR;

            let pnl = self.calculate_pnl(
                self.avg_px_open,
                last_px,
                Quantity::new(closing_qty, self.size_precision),
            );
            self.realized_pnl = Some(match self.realized_pnl {
                Some(realized) => realized + pnl,
                None => pnl,
            });
            self.avg_px_close = Some(weighted_avg(
                self.avg_px_close.unwrap_or(0.0),
                prev_closed_qty,
                last_px,
                closing_qty,
            ));
            // SAFETY: Unwrap safe as `avg_px_close` was set above
            self.realized_points =
                self.calculate_points(self.avg_px_open, self.avg_px_close.unwrap());
            self.realized_return = self.realized_points / self.avg_px_open;
            self.closing_order_id = Some(fill.client_order_id);

            if net_raw != 0 && net_raw.signum() == fill_dir {
                // Flipped: the residual opens in the new direction
                self.entry = fill.order_side;
                self.avg_px_open = last_px;
            }
        }

        self.events.push(fill.clone());
        self.execution_ids.push(fill.execution_id);
        self.signed_qty = net_raw as f64 / FIXED_SCALAR;
        self.quantity = Quantity::from_raw(net_raw.unsigned_abs() as u64, self.size_precision);
        if self.quantity > self.peak_qty {
            self.peak_qty = self.quantity;
        }
        self.side = match net_raw.signum() {
            1 => PositionSide::Long,
            -1 => PositionSide::Short,
            _ => PositionSide::Flat,
        };
        self.ts_last = fill.ts_event;
        if self.side == PositionSide::Flat {
            self.ts_closed = Some(fill.ts_event);
            self.duration_ns = fill.ts_event - self.ts_opened;
        }

        if let Some(commission) = fill.commission {
            self.commissions
                .entry(commission.currency)
                .and_modify(|total| *total += commission)
                .or_insert(commission);
            if commission.currency == self.cost_currency {
                self.realized_pnl = Some(match self.realized_pnl {
                    Some(realized) => realized - commission,
                    None => -commission,
                });
            }
        }

        Ok(())
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.side != PositionSide::Flat
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.side == PositionSide::Flat && !self.events.is_empty()
    }

    #[must_use]
    pub fn is_long(&self) -> bool {
        self.side == PositionSide::Long
    }

    #[must_use]
    pub fn is_short(&self) -> bool {
        self.side == PositionSide::Short
    }

    #[must_use]
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn last_event(&self) -> Option<&OrderFilled> {
        self.events.last()
    }

    /// Returns the raw price points captured between the given average
    /// prices, signed by the position direction.
    fn calculate_points(&self, avg_px_open: f64, avg_px_close: f64) -> f64 {
        match self.side {
            PositionSide::Long => {
                if self.is_inverse {
                    1.0 / avg_px_open - 1.0 / avg_px_close
                } else {
                    avg_px_close - avg_px_open
                }
            }
            PositionSide::Short => {
                if self.is_inverse {
                    1.0 / avg_px_close - 1.0 / avg_px_open
                } else {
                    avg_px_open - avg_px_close
                }
            }
            _ => 0.0,
        }
    }

    /// Calculates the PnL for the given quantity between the average open
    /// and close prices, in the cost currency.
    #[must_use]
    pub fn calculate_pnl(&self, avg_px_open: f64, avg_px_close: f64, quantity: Quantity) -> Money {
        let points = self.calculate_points(avg_px_open, avg_px_close);
        let amount = quantity.as_f64() * self.multiplier.as_f64() * points;
        Money::new(amount, self.cost_currency)
    }

    /// Returns the unrealized PnL at the given market price, in the cost
    /// currency.
    #[must_use]
    pub fn unrealized_pnl(&self, last: Price) -> Money {
        if self.side == PositionSide::Flat {
            Money::new(0.0, self.cost_currency)
        } else {
            self.calculate_pnl(self.avg_px_open, last.as_f64(), self.quantity)
        }
    }

    /// Returns the sum of realized and unrealized PnL at the given market
    /// price, in the cost currency.
    #[must_use]
    pub fn total_pnl(&self, last: Price) -> Money {
        let realized = self
            .realized_pnl
            .unwrap_or_else(|| Money::new(0.0, self.cost_currency));
        realized + self.unrealized_pnl(last)
    }

    /// Returns the notional exposure at the given market price (base
    /// currency for inverse instruments, otherwise quote currency).
    #[must_use]
    pub fn notional_value(&self, last: Price) -> Money {
        if self.is_inverse {
            Money::new(
                self.quantity.as_f64() * self.multiplier.as_f64() / last.as_f64(),
                *self
                    .base_currency
                    .as_ref()
                    .expect("inverse instrument without `base_currency`"),
            )
        } else {
            Money::new(
                self.quantity.as_f64() * self.multiplier.as_f64() * last.as_f64(),
                self.quote_currency,
            )
        }
    }

    #[must_use]
    pub fn commissions(&self) -> Vec<Money> {
        self.commissions.values().copied().collect()
    }
}

fn weighted_avg(avg_a: f64, qty_a: f64, px_b: f64, qty_b: f64) -> f64 {
    avg_a.mul_add(qty_a, px_b * qty_b) / (qty_a + qty_b)
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::{
        enums::LiquiditySide,
        events::order::{
            OrderAcceptedBuilder, OrderFilledBuilder, OrderInitializedBuilder,
            OrderSubmittedBuilder,
        },
        instruments::{CryptoPerpetual, CurrencyPair},
    };

    fn fill(
        instrument_id: InstrumentId,
        side: OrderSide,
        qty: Quantity,
        px: Price,
        execution_id: &str,
        ts_event: UnixNanos,
    ) -> OrderFilled {
        let init = OrderInitializedBuilder::default()
            .instrument_id(instrument_id)
            .order_side(side)
            .quantity(qty)
            .build();
        let submitted = OrderSubmittedBuilder::new(&init).build();
        let accepted = OrderAcceptedBuilder::new(&submitted).build();
        OrderFilledBuilder::new(&init, &accepted)
            .position_id(PositionId::default())
            .execution_id(ExecutionId::new(execution_id))
            .last_qty(qty)
            .last_px(px)
            .liquidity_side(LiquiditySide::Taker)
            .ts_event(ts_event)
            .build()
    }

    #[rstest]
    fn test_open_long() {
        let audusd = CurrencyPair::default();
        let fill1 = fill(
            audusd.id,
            OrderSide::Buy,
            Quantity::from(100_000_u64),
            Price::new(1.00001, 5),
            "E-1",
            1_000,
        );

        let position = Position::new(&audusd, fill1);

        assert_eq!(position.side, PositionSide::Long);
        assert_eq!(position.signed_qty, 100_000.0);
        assert_eq!(position.quantity, Quantity::from(100_000_u64));
        assert_eq!(position.peak_qty, Quantity::from(100_000_u64));
        assert_eq!(position.entry, OrderSide::Buy);
        assert_eq!(position.avg_px_open, 1.00001);
        assert_eq!(position.ts_opened, 1_000);
        assert!(position.is_open());
        assert!(!position.is_closed());
        assert_eq!(position.realized_pnl, None);
    }

    #[rstest]
    fn test_long_close_to_flat_realizes_pnl() {
        let audusd = CurrencyPair::default();
        let fill1 = fill(
            audusd.id,
            OrderSide::Buy,
            Quantity::from(100_000_u64),
            Price::new(1.00000, 5),
            "E-1",
            1_000,
        );
        let mut position = Position::new(&audusd, fill1);

        let fill2 = fill(
            audusd.id,
            OrderSide::Sell,
            Quantity::from(100_000_u64),
            Price::new(1.00010, 5),
            "E-2",
            2_000,
        );
        position.apply(&fill2).unwrap();

        assert_eq!(position.side, PositionSide::Flat);
        assert!(position.is_closed());
        assert_eq!(position.quantity, Quantity::from(0_u64));
        assert_eq!(position.avg_px_close, Some(1.0001));
        assert_eq!(position.realized_pnl, Some(Money::new(10.0, Currency::USD())));
        assert_eq!(position.ts_closed, Some(2_000));
        assert_eq!(position.duration_ns, 1_000);
        assert!((position.realized_return - 0.0001).abs() < 1e-9);
    }

    #[rstest]
    fn test_position_flip_scenario() {
        // Open LONG 5 @ 10.00, then SELL 8 @ 12.00
        let instrument = CurrencyPair::new(
            InstrumentId::from("TEST/USD.SIM"),
            crate::identifiers::symbol::Symbol::new("TEST/USD"),
            Currency::USD(),
            Currency::USD(),
            2,
            0,
            Price::new(0.01, 2),
            Quantity::new(1.0, 0),
            None,
        );
        let fill1 = fill(
            instrument.id,
            OrderSide::Buy,
            Quantity::from(5_u64),
            Price::new(10.00, 2),
            "E-1",
            1_000,
        );
        let mut position = Position::new(&instrument, fill1);

        let fill2 = fill(
            instrument.id,
            OrderSide::Sell,
            Quantity::from(8_u64),
            Price::new(12.00, 2),
            "E-2",
            2_000,
        );
        position.apply(&fill2).unwrap();

        assert_eq!(position.side, PositionSide::Short);
        assert_eq!(position.signed_qty, -3.0);
        assert_eq!(position.quantity, Quantity::from(3_u64));
        assert_eq!(position.entry, OrderSide::Sell);
        assert_eq!(position.avg_px_open, 12.00);
        assert_eq!(position.avg_px_close, Some(12.00));
        // Realized on the closed 5 units: 5 * (12 - 10) * multiplier(1)
        assert_eq!(position.realized_pnl, Some(Money::new(10.0, Currency::USD())));
        assert!(position.is_short());
        assert!(position.is_open());
    }

    #[rstest]
    fn test_commission_in_cost_currency_subtracts() {
        let audusd = CurrencyPair::default();
        let init = OrderInitializedBuilder::default()
            .instrument_id(audusd.id)
            .order_side(OrderSide::Buy)
            .quantity(Quantity::from(100_000_u64))
            .build();
        let submitted = OrderSubmittedBuilder::new(&init).build();
        let accepted = OrderAcceptedBuilder::new(&submitted).build();
        let fill1 = OrderFilledBuilder::new(&init, &accepted)
            .position_id(PositionId::default())
            .execution_id(ExecutionId::new("E-1"))
            .last_px(Price::new(1.0, 5))
            .commission(Money::new(2.0, Currency::USD()))
            .build();

        let position = Position::new(&audusd, fill1);

        assert_eq!(position.realized_pnl, Some(Money::new(-2.0, Currency::USD())));
        assert_eq!(position.commissions(), vec![Money::new(2.0, Currency::USD())]);
    }

    #[rstest]
    fn test_commission_in_other_currency_recorded_not_applied() {
        let audusd = CurrencyPair::default();
        let init = OrderInitializedBuilder::default()
            .instrument_id(audusd.id)
            .order_side(OrderSide::Buy)
            .quantity(Quantity::from(100_000_u64))
            .build();
        let submitted = OrderSubmittedBuilder::new(&init).build();
        let accepted = OrderAcceptedBuilder::new(&submitted).build();
        let fill1 = OrderFilledBuilder::new(&init, &accepted)
            .position_id(PositionId::default())
            .execution_id(ExecutionId::new("E-1"))
            .last_px(Price::new(1.0, 5))
            .commission(Money::new(2.0, Currency::AUD()))
            .build();

        let position = Position::new(&audusd, fill1);

        assert_eq!(position.realized_pnl, None);
        assert_eq!(position.commissions(), vec![Money::new(2.0, Currency::AUD())]);
    }

    #[rstest]
    fn test_duplicate_execution_id_rejected() {
        let audusd = CurrencyPair::default();
        let fill1 = fill(
            audusd.id,
            OrderSide::Buy,
            Quantity::from(100_000_u64),
            Price::new(1.0, 5),
            "E-1",
            1_000,
        );
        let mut position = Position::new(&audusd, fill1.clone());

        let result = position.apply(&fill1);

        assert_eq!(
            result,
            Err(PositionError::DuplicateExecutionId(ExecutionId::new("E-1")))
        );
        assert_eq!(position.event_count(), 1);
        assert_eq!(position.quantity, Quantity::from(100_000_u64));
    }

    #[rstest]
    fn test_fill_on_closed_position_rejected() {
        let audusd = CurrencyPair::default();
        let fill1 = fill(
            audusd.id,
            OrderSide::Buy,
            Quantity::from(100_000_u64),
            Price::new(1.0, 5),
            "E-1",
            1_000,
        );
        let mut position = Position::new(&audusd, fill1);
        let fill2 = fill(
            audusd.id,
            OrderSide::Sell,
            Quantity::from(100_000_u64),
            Price::new(1.0, 5),
            "E-2",
            2_000,
        );
        position.apply(&fill2).unwrap();
        assert!(position.is_closed());

        let fill3 = fill(
            audusd.id,
            OrderSide::Buy,
            Quantity::from(1_000_u64),
            Price::new(1.0, 5),
            "E-3",
            3_000,
        );
        let result = position.apply(&fill3);

        assert_eq!(result, Err(PositionError::AlreadyClosed(position.id)));
        assert_eq!(position.event_count(), 2);
    }

    #[rstest]
    fn test_unrealized_and_total_pnl_long() {
        let audusd = CurrencyPair::default();
        let fill1 = fill(
            audusd.id,
            OrderSide::Buy,
            Quantity::from(100_000_u64),
            Price::new(1.00000, 5),
            "E-1",
            1_000,
        );
        let position = Position::new(&audusd, fill1);

        let unrealized = position.unrealized_pnl(Price::new(1.00020, 5));
        assert_eq!(unrealized, Money::new(20.0, Currency::USD()));
        assert_eq!(
            position.total_pnl(Price::new(1.00020, 5)),
            Money::new(20.0, Currency::USD())
        );
    }

    #[rstest]
    fn test_inverse_instrument_pnl() {
        // Short 10,000 contracts of an inverse perpetual at 20,000 then
        // cover at 16,000: pnl = 10_000 * (1/16_000 - 1/20_000) BTC
        let xbtusd = CryptoPerpetual::default();
        let fill1 = fill(
            xbtusd.id,
            OrderSide::Sell,
            Quantity::from(10_000_u64),
            Price::new(20_000.0, 1),
            "E-1",
            1_000,
        );
        let mut position = Position::new(&xbtusd, fill1);
        assert!(position.is_short());

        let fill2 = fill(
            xbtusd.id,
            OrderSide::Buy,
            Quantity::from(10_000_u64),
            Price::new(16_000.0, 1),
            "E-2",
            2_000,
        );
        position.apply(&fill2).unwrap();

        assert!(position.is_closed());
        let realized = position.realized_pnl.unwrap();
        assert_eq!(realized.currency, Currency::BTC());
        assert!((realized.as_f64() - 0.125).abs() < 1e-8);
    }

    #[rstest]
    fn test_notional_value_inverse_in_base_currency() {
        let xbtusd = CryptoPerpetual::default();
        let fill1 = fill(
            xbtusd.id,
            OrderSide::Buy,
            Quantity::from(10_000_u64),
            Price::new(20_000.0, 1),
            "E-1",
            1_000,
        );
        let position = Position::new(&xbtusd, fill1);

        assert_eq!(
            position.notional_value(Price::new(20_000.0, 1)),
            Money::new(0.5, Currency::BTC())
        );
    }

    #[rstest]
    fn test_side_follows_net_qty_sign() {
        let audusd = CurrencyPair::default();
        let fill1 = fill(
            audusd.id,
            OrderSide::Sell,
            Quantity::from(50_000_u64),
            Price::new(1.0, 5),
            "E-1",
            1_000,
        );
        let mut position = Position::new(&audusd, fill1);
        assert_eq!(position.side, PositionSide::Short);
        assert_eq!(position.signed_qty, -50_000.0);

        let fill2 = fill(
            audusd.id,
            OrderSide::Buy,
            Quantity::from(20_000_u64),
            Price::new(1.0, 5),
            "E-2",
            2_000,
        );
        position.apply(&fill2).unwrap();
        assert_eq!(position.side, PositionSide::Short);
        assert_eq!(position.signed_qty, -30_000.0);
        assert_eq!(position.peak_qty, Quantity::from(50_000_u64));
    }
}
