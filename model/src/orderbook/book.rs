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

//! A performant, generic, multi-purpose order book.

use std::fmt::Display;

use sextant_core::time::UnixNanos;

use super::{
    error::{BookIntegrityError, InvalidBookOperation},
    ladder::BookLadder,
    level::BookLevel,
};
use crate::{
    data::{BookOrder, OrderBookDelta, OrderBookDeltas, OrderBookSnapshot, QuoteTick, TradeTick},
    enums::{AggressorSide, BookAction, BookType, OrderSide},
    identifiers::instrument_id::InstrumentId,
    types::{price::Price, quantity::Quantity},
};

/// Maintains bid and ask orders in price-time priority, supporting three
/// levels of book fidelity:
/// - L3 (MBO): market by order, every venue order tracked by unique ID.
/// - L2 (MBP): market by price, orders aggregated per price level.
/// - L1 (TBBO): top-of-book only, driven by quote and trade ticks.
#[derive(Clone, Debug)]
pub struct OrderBook {
    /// The instrument ID for the order book.
    pub instrument_id: InstrumentId,
    /// The order book granularity.
    pub book_type: BookType,
    /// The last applied update sequence number.
    pub sequence: u64,
    /// The timestamp of the last applied event.
    pub ts_last: UnixNanos,
    /// The running count of applied updates.
    pub update_count: u64,
    pub(crate) bids: BookLadder,
    pub(crate) asks: BookLadder,
}

impl PartialEq for OrderBook {
    fn eq(&self, other: &Self) -> bool {
        self.instrument_id == other.instrument_id && self.book_type == other.book_type
    }
}

impl Eq for OrderBook {}

impl Display for OrderBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}(instrument_id={}, book_type={}, update_count={})",
            stringify!(OrderBook),
            self.instrument_id,
            self.book_type,
            self.update_count,
        )
    }
}

impl OrderBook {
    /// Creates a new [`OrderBook`] instance.
    #[must_use]
    pub fn new(instrument_id: InstrumentId, book_type: BookType) -> Self {
        Self {
            instrument_id,
            book_type,
            sequence: 0,
            ts_last: 0,
            update_count: 0,
            bids: BookLadder::new(OrderSide::Buy),
            asks: BookLadder::new(OrderSide::Sell),
        }
    }

    /// Resets the order book to its initial empty state.
    pub fn reset(&mut self) {
        self.bids.clear();
        self.asks.clear();
        self.sequence = 0;
        self.ts_last = 0;
        self.update_count = 0;
    }

    /// Adds an order to the book after preprocessing based on book type.
    ///
    /// # Errors
    ///
    /// Returns an error for an L1 book (top-of-book state is only driven by
    /// ticks) or for an order with no side.
    pub fn add(
        &mut self,
        order: BookOrder,
        sequence: u64,
        ts_event: UnixNanos,
    ) -> Result<(), InvalidBookOperation> {
        if self.book_type == BookType::L1_TBBO {
            return Err(InvalidBookOperation::Add(self.book_type));
        }
        let order = self.pre_process_order(order);
        match order.side {
            OrderSide::Buy => self.bids.add(order),
            OrderSide::Sell => self.asks.add(order),
            OrderSide::NoOrderSide => return Ok(()), // Dropped, logged by caller paths
        }
        self.increment(sequence, ts_event);
        Ok(())
    }

    /// Updates an existing order in the book after preprocessing based on
    /// book type.
    pub fn update(&mut self, order: BookOrder, sequence: u64, ts_event: UnixNanos) {
        let order = self.pre_process_order(order);
        match order.side {
            OrderSide::Buy => self.bids.update(order),
            OrderSide::Sell => self.asks.update(order),
            OrderSide::NoOrderSide => return,
        }
        self.increment(sequence, ts_event);
    }

    /// Deletes an order from the book after preprocessing based on book
    /// type.
    pub fn delete(&mut self, order: BookOrder, sequence: u64, ts_event: UnixNanos) {
        let order = self.pre_process_order(order);
        match order.side {
            OrderSide::Buy => self.bids.delete(order),
            OrderSide::Sell => self.asks.delete(order),
            OrderSide::NoOrderSide => return,
        }
        self.increment(sequence, ts_event);
    }

    /// Clears all orders from both sides of the book.
    pub fn clear(&mut self, sequence: u64, ts_event: UnixNanos) {
        self.bids.clear();
        self.asks.clear();
        self.increment(sequence, ts_event);
    }

    /// Applies a single order book delta operation.
    ///
    /// Deltas with a `sequence` at or below the last applied sequence are
    /// idempotently dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the delta carries an operation unsupported for
    /// this book type.
    pub fn apply_delta(&mut self, delta: &OrderBookDelta) -> Result<(), InvalidBookOperation> {
        if self.update_count > 0 && delta.sequence <= self.sequence {
            tracing::debug!(
                instrument_id = %self.instrument_id,
                sequence = delta.sequence,
                last_sequence = self.sequence,
                "Dropping stale order book delta",
            );
            return Ok(());
        }

        match delta.action {
            BookAction::Add => self.add(delta.order, delta.sequence, delta.ts_event)?,
            BookAction::Update => self.update(delta.order, delta.sequence, delta.ts_event),
            BookAction::Delete => self.delete(delta.order, delta.sequence, delta.ts_event),
            BookAction::Clear => self.clear(delta.sequence, delta.ts_event),
        }

        Ok(())
    }

    /// Applies multiple order book delta operations.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered when applying deltas.
    pub fn apply_deltas(&mut self, deltas: &OrderBookDeltas) -> Result<(), InvalidBookOperation> {
        for delta in &deltas.deltas {
            self.apply_delta(delta)?;
        }
        Ok(())
    }

    /// Replaces the current book state with the given snapshot.
    pub fn apply_snapshot(&mut self, snapshot: &OrderBookSnapshot) {
        self.bids.clear();
        self.asks.clear();
        for order in &snapshot.bids {
            let order = self.pre_process_order(*order);
            self.bids.add(order);
        }
        for order in &snapshot.asks {
            let order = self.pre_process_order(*order);
            self.asks.add(order);
        }
        self.increment(snapshot.sequence, snapshot.ts_event);
    }

    /// Updates L1 top-of-book state from a quote tick, setting both sides.
    ///
    /// # Errors
    ///
    /// Returns an error if the book type is not `L1_TBBO`.
    pub fn update_quote_tick(&mut self, quote: &QuoteTick) -> Result<(), InvalidBookOperation> {
        if self.book_type != BookType::L1_TBBO {
            return Err(InvalidBookOperation::Update(self.book_type));
        }
        if quote.bid_price > quote.ask_price {
            tracing::warn!(
                instrument_id = %self.instrument_id,
                bid = %quote.bid_price,
                ask = %quote.ask_price,
                "Quote has crossed prices",
            );
        }

        self.set_book_bid(quote.bid_price, quote.bid_size);
        self.set_book_ask(quote.ask_price, quote.ask_size);
        self.increment(self.sequence.saturating_add(1), quote.ts_event);

        Ok(())
    }

    /// Updates L1 top-of-book state from a trade tick.
    ///
    /// A `SELL` aggressor updates the bid to the trade price and size; a
    /// `BUY` aggressor updates the ask. If the book is then crossed the
    /// untouched side is forced to the touched side's price (the trade
    /// consumed the opposing quote).
    ///
    /// # Errors
    ///
    /// Returns an error if the book type is not `L1_TBBO`.
    pub fn update_trade_tick(&mut self, trade: &TradeTick) -> Result<(), InvalidBookOperation> {
        if self.book_type != BookType::L1_TBBO {
            return Err(InvalidBookOperation::Update(self.book_type));
        }

        match trade.aggressor_side {
            AggressorSide::Seller => {
                self.set_book_bid(trade.price, trade.size);
                if self.is_crossed() {
                    if let Some(ask_size) = self.best_ask_size() {
                        self.set_book_ask(trade.price, ask_size);
                    }
                }
            }
            AggressorSide::Buyer => {
                self.set_book_ask(trade.price, trade.size);
                if self.is_crossed() {
                    if let Some(bid_size) = self.best_bid_size() {
                        self.set_book_bid(trade.price, bid_size);
                    }
                }
            }
            AggressorSide::NoAggressor => return Ok(()),
        }
        self.increment(self.sequence.saturating_add(1), trade.ts_event);

        Ok(())
    }

    /// Returns an iterator over bid price levels, best first.
    pub fn bids(&self) -> impl Iterator<Item = &BookLevel> {
        self.bids.levels.values()
    }

    /// Returns an iterator over ask price levels, best first.
    pub fn asks(&self) -> impl Iterator<Item = &BookLevel> {
        self.asks.levels.values()
    }

    #[must_use]
    pub fn has_bid(&self) -> bool {
        self.bids.top().is_some_and(|top| !top.orders.is_empty())
    }

    #[must_use]
    pub fn has_ask(&self) -> bool {
        self.asks.top().is_some_and(|top| !top.orders.is_empty())
    }

    /// Returns the best bid price if available.
    #[must_use]
    pub fn best_bid_price(&self) -> Option<Price> {
        self.bids.top().map(|top| top.price.value)
    }

    /// Returns the best ask price if available.
    #[must_use]
    pub fn best_ask_price(&self) -> Option<Price> {
        self.asks.top().map(|top| top.price.value)
    }

    /// Returns the size at the best bid price if available.
    #[must_use]
    pub fn best_bid_size(&self) -> Option<Quantity> {
        self.bids
            .top()
            .and_then(|top| top.first().map(|order| order.size))
    }

    /// Returns the size at the best ask price if available.
    #[must_use]
    pub fn best_ask_size(&self) -> Option<Quantity> {
        self.asks
            .top()
            .and_then(|top| top.first().map(|order| order.size))
    }

    /// Returns the spread between best ask and bid prices if both exist.
    #[must_use]
    pub fn spread(&self) -> Option<f64> {
        match (self.best_ask_price(), self.best_bid_price()) {
            (Some(ask), Some(bid)) => Some(ask.as_f64() - bid.as_f64()),
            _ => None,
        }
    }

    /// Returns the midpoint between best ask and bid prices if both exist.
    #[must_use]
    pub fn midpoint(&self) -> Option<f64> {
        match (self.best_ask_price(), self.best_bid_price()) {
            (Some(ask), Some(bid)) => Some((ask.as_f64() + bid.as_f64()) / 2.0),
            _ => None,
        }
    }

    /// Verifies the book's structural invariants: uncrossed top of book and
    /// consistent per-level order sums.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first violation found; the book must
    /// then be reconstructed from a snapshot.
    pub fn check_integrity(&self) -> Result<(), BookIntegrityError> {
        if let (Some(bid), Some(ask)) = (self.best_bid_price(), self.best_ask_price()) {
            // An L1 book is permitted to touch (bid == ask) after a trade
            // consumed the opposing quote
            let crossed = match self.book_type {
                BookType::L1_TBBO => bid > ask,
                _ => bid >= ask,
            };
            if crossed {
                return Err(BookIntegrityError::OrdersCrossed { bid, ask });
            }
        }

        for ladder in [&self.bids, &self.asks] {
            for (book_price, level) in &ladder.levels {
                if level.is_empty() {
                    return Err(BookIntegrityError::EmptyLevel(book_price.value));
                }
                for order in level.orders.values() {
                    if order.price != book_price.value {
                        return Err(BookIntegrityError::PriceMismatch {
                            order_id: order.order_id,
                            order_price: order.price,
                            level_price: book_price.value,
                        });
                    }
                    if !order.size.is_positive() {
                        return Err(BookIntegrityError::NonPositiveSize {
                            order_id: order.order_id,
                            size: order.size,
                        });
                    }
                }
            }
        }

        Ok(())
    }

    fn is_crossed(&self) -> bool {
        matches!(
            (self.best_bid_price(), self.best_ask_price()),
            (Some(bid), Some(ask)) if bid >= ask
        )
    }

    /// Normalizes order identity for aggregated book types: L2 keys orders
    /// by price level, L1 keys them by side.
    fn pre_process_order(&self, mut order: BookOrder) -> BookOrder {
        match self.book_type {
            BookType::L3_MBO => {}
            BookType::L2_MBP => order.order_id = order.price.raw as u64,
            BookType::L1_TBBO => order.order_id = order.side as u64,
        }
        order
    }

    fn set_book_bid(&mut self, price: Price, size: Quantity) {
        let order = self.pre_process_order(BookOrder::new(OrderSide::Buy, price, size, 0));
        self.bids.remove_order(order.order_id);
        self.bids.add(order);
    }

    fn set_book_ask(&mut self, price: Price, size: Quantity) {
        let order = self.pre_process_order(BookOrder::new(OrderSide::Sell, price, size, 0));
        self.asks.remove_order(order.order_id);
        self.asks.add(order);
    }

    fn increment(&mut self, sequence: u64, ts_event: UnixNanos) {
        debug_assert!(
            sequence >= self.sequence,
            "Sequence number should not go backwards: old={}, new={sequence}",
            self.sequence,
        );
        debug_assert!(
            ts_event >= self.ts_last,
            "Timestamp should not go backwards: old={}, new={ts_event}",
            self.ts_last,
        );
        self.sequence = sequence;
        self.ts_last = ts_event;
        self.update_count = self.update_count.saturating_add(1);
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::identifiers::execution_id::ExecutionId;

    fn instrument_id() -> InstrumentId {
        InstrumentId::from("AUD/USD.SIM")
    }

    fn order(side: OrderSide, price: f64, size: u64, id: u64) -> BookOrder {
        BookOrder::new(side, Price::new(price, 2), Quantity::from(size), id)
    }

    #[rstest]
    fn test_l3_add_update_delete() {
        let mut book = OrderBook::new(instrument_id(), BookType::L3_MBO);
        book.add(order(OrderSide::Buy, 1.00, 10, 1), 1, 100).unwrap();
        book.add(order(OrderSide::Buy, 1.00, 20, 2), 2, 200).unwrap();
        book.add(order(OrderSide::Sell, 1.01, 15, 3), 3, 300).unwrap();

        assert_eq!(book.best_bid_price(), Some(Price::new(1.00, 2)));
        assert_eq!(book.best_ask_price(), Some(Price::new(1.01, 2)));
        assert_eq!(book.best_bid_size(), Some(Quantity::from(10_u64)));
        assert_eq!(book.bids.top().unwrap().len(), 2);

        // Order-level modify by identifier
        book.update(order(OrderSide::Buy, 1.00, 5, 1), 4, 400);
        assert_eq!(book.best_bid_size(), Some(Quantity::from(5_u64)));

        // Order-level cancel by identifier
        book.delete(order(OrderSide::Buy, 1.00, 0, 1), 5, 500);
        assert_eq!(book.best_bid_size(), Some(Quantity::from(20_u64)));
        assert!(book.check_integrity().is_ok());
    }

    #[rstest]
    fn test_l2_aggregates_by_price() {
        let mut book = OrderBook::new(instrument_id(), BookType::L2_MBP);
        book.add(order(OrderSide::Buy, 1.00, 10, 1), 1, 100).unwrap();
        // Same price level replaces (aggregated size arrives pre-summed)
        book.update(order(OrderSide::Buy, 1.00, 30, 2), 2, 200);

        assert_eq!(book.bids.len(), 1);
        assert_eq!(book.best_bid_size(), Some(Quantity::from(30_u64)));

        // Deleting the level empties that side
        book.delete(order(OrderSide::Buy, 1.00, 0, 3), 3, 300);
        assert!(!book.has_bid());
    }

    #[rstest]
    fn test_l1_add_is_unsupported() {
        let mut book = OrderBook::new(instrument_id(), BookType::L1_TBBO);
        let result = book.add(order(OrderSide::Buy, 1.00, 10, 1), 1, 100);
        assert_eq!(result, Err(InvalidBookOperation::Add(BookType::L1_TBBO)));
    }

    #[rstest]
    fn test_l1_quote_tick_sets_both_sides() {
        let mut book = OrderBook::new(instrument_id(), BookType::L1_TBBO);
        let quote = QuoteTick::new(
            instrument_id(),
            Price::new(1.00, 2),
            Price::new(1.01, 2),
            Quantity::from(10_u64),
            Quantity::from(20_u64),
            100,
            100,
        );
        book.update_quote_tick(&quote).unwrap();

        assert_eq!(book.best_bid_price(), Some(Price::new(1.00, 2)));
        assert_eq!(book.best_ask_price(), Some(Price::new(1.01, 2)));
        assert_eq!(book.spread(), Some(0.01));
        assert_eq!(book.midpoint(), Some(1.005));
        assert!(book.check_integrity().is_ok());
    }

    #[rstest]
    fn test_l1_buy_aggressor_updates_ask_uncrossed() {
        // Quote bid=1.00 ask=1.01, then BUY aggressor trades at 1.02:
        // the ask becomes 1.02 and the bid remains 1.00
        let mut book = OrderBook::new(instrument_id(), BookType::L1_TBBO);
        let quote = QuoteTick::new(
            instrument_id(),
            Price::new(1.00, 2),
            Price::new(1.01, 2),
            Quantity::from(10_u64),
            Quantity::from(20_u64),
            100,
            100,
        );
        book.update_quote_tick(&quote).unwrap();

        let trade = TradeTick::new(
            instrument_id(),
            Price::new(1.02, 2),
            Quantity::from(1_u64),
            AggressorSide::Buyer,
            ExecutionId::new("T-1"),
            200,
            200,
        );
        book.update_trade_tick(&trade).unwrap();

        assert_eq!(book.best_ask_price(), Some(Price::new(1.02, 2)));
        assert_eq!(book.best_bid_price(), Some(Price::new(1.00, 2)));
        assert!(book.check_integrity().is_ok());
    }

    #[rstest]
    fn test_l1_sell_aggressor_forces_uncross() {
        // SELL aggressor prints above the ask: the stale ask is consumed and
        // forced to the trade price
        let mut book = OrderBook::new(instrument_id(), BookType::L1_TBBO);
        let quote = QuoteTick::new(
            instrument_id(),
            Price::new(1.00, 2),
            Price::new(1.01, 2),
            Quantity::from(10_u64),
            Quantity::from(20_u64),
            100,
            100,
        );
        book.update_quote_tick(&quote).unwrap();

        let trade = TradeTick::new(
            instrument_id(),
            Price::new(1.05, 2),
            Quantity::from(1_u64),
            AggressorSide::Seller,
            ExecutionId::new("T-1"),
            200,
            200,
        );
        book.update_trade_tick(&trade).unwrap();

        assert_eq!(book.best_bid_price(), Some(Price::new(1.05, 2)));
        assert_eq!(book.best_ask_price(), Some(Price::new(1.05, 2)));
        assert!(book.check_integrity().is_ok());
    }

    #[rstest]
    fn test_stale_deltas_dropped_idempotently() {
        let mut book = OrderBook::new(instrument_id(), BookType::L2_MBP);
        let delta1 = OrderBookDelta::new(
            instrument_id(),
            BookAction::Add,
            order(OrderSide::Buy, 1.00, 10, 1),
            0,
            10,
            100,
            100,
        );
        let stale = OrderBookDelta::new(
            instrument_id(),
            BookAction::Update,
            order(OrderSide::Buy, 1.00, 99, 1),
            0,
            10, // Same sequence: applied at most once
            100,
            100,
        );

        book.apply_delta(&delta1).unwrap();
        book.apply_delta(&stale).unwrap();

        assert_eq!(book.best_bid_size(), Some(Quantity::from(10_u64)));
        assert_eq!(book.update_count, 1);
    }

    #[rstest]
    fn test_apply_snapshot_replaces_state() {
        let mut book = OrderBook::new(instrument_id(), BookType::L2_MBP);
        book.add(order(OrderSide::Buy, 0.90, 10, 1), 1, 100).unwrap();

        let snapshot = OrderBookSnapshot::new(
            instrument_id(),
            vec![
                order(OrderSide::Buy, 1.00, 10, 0),
                order(OrderSide::Buy, 0.99, 20, 0),
            ],
            vec![
                order(OrderSide::Sell, 1.01, 15, 0),
                order(OrderSide::Sell, 1.02, 25, 0),
            ],
            2,
            200,
            200,
        );
        book.apply_snapshot(&snapshot);

        assert_eq!(book.bids.len(), 2);
        assert_eq!(book.asks.len(), 2);
        assert_eq!(book.best_bid_price(), Some(Price::new(1.00, 2)));
        assert_eq!(book.best_ask_price(), Some(Price::new(1.01, 2)));
        assert_eq!(book.sequence, 2);
        assert!(book.check_integrity().is_ok());
    }

    #[rstest]
    fn test_check_integrity_detects_crossed_book() {
        let mut book = OrderBook::new(instrument_id(), BookType::L2_MBP);
        book.add(order(OrderSide::Buy, 1.02, 10, 1), 1, 100).unwrap();
        book.add(order(OrderSide::Sell, 1.01, 10, 2), 2, 200).unwrap();

        assert!(matches!(
            book.check_integrity(),
            Err(BookIntegrityError::OrdersCrossed { .. })
        ));
    }
}
