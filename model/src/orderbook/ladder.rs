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
    cmp::Ordering,
    collections::{BTreeMap, HashMap},
    fmt::{Display, Formatter},
};

use super::level::BookLevel;
use crate::{
    data::BookOrder,
    enums::OrderSide,
    types::price::Price,
};

/// A price attached to its book side, ordered so that iterating a ladder's
/// levels always walks from best to worst: descending for bids, ascending
/// for asks.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct BookPrice {
    pub value: Price,
    pub side: OrderSide,
}

impl BookPrice {
    #[must_use]
    pub fn new(value: Price, side: OrderSide) -> Self {
        Self { value, side }
    }
}

impl PartialOrd for BookPrice {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BookPrice {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.side {
            OrderSide::Buy => other.value.cmp(&self.value),
            OrderSide::Sell => self.value.cmp(&other.value),
            OrderSide::NoOrderSide => panic!("`NO_ORDER_SIDE` has no price ordering"),
        }
    }
}

impl Display for BookPrice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// One side of an order book: price levels in best-first order with an
/// order-ID cache for O(1) lookups.
#[derive(Clone, Debug)]
pub struct BookLadder {
    pub side: OrderSide,
    pub levels: BTreeMap<BookPrice, BookLevel>,
    pub cache: HashMap<u64, BookPrice>,
}

impl BookLadder {
    /// Creates a new, empty [`BookLadder`].
    #[must_use]
    pub fn new(side: OrderSide) -> Self {
        Self {
            side,
            levels: BTreeMap::new(),
            cache: HashMap::new(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn clear(&mut self) {
        self.levels.clear();
        self.cache.clear();
    }

    /// Adds the given order to its price level, creating the level if
    /// absent.
    pub fn add(&mut self, order: BookOrder) {
        let book_price = BookPrice::new(order.price, self.side);
        self.cache.insert(order.order_id, book_price);
        match self.levels.get_mut(&book_price) {
            Some(level) => level.add(order),
            None => {
                let level = BookLevel::from_order(BookOrder { side: self.side, ..order });
                self.levels.insert(book_price, level);
            }
        }
    }

    /// Updates the given order in place, moving it to a new level when its
    /// price changed (forfeiting FIFO priority).
    pub fn update(&mut self, order: BookOrder) {
        match self.cache.get(&order.order_id).copied() {
            Some(book_price) if book_price.value == order.price => {
                if let Some(level) = self.levels.get_mut(&book_price) {
                    level.update(order);
                    if level.is_empty() {
                        self.levels.remove(&book_price);
                    }
                    if order.size.is_zero() {
                        self.cache.remove(&order.order_id);
                    }
                    return;
                }
                self.add(order);
            }
            Some(book_price) => {
                // Price changed: remove from the old level then re-add
                if let Some(level) = self.levels.get_mut(&book_price) {
                    level.delete(order.order_id);
                    if level.is_empty() {
                        self.levels.remove(&book_price);
                    }
                }
                self.cache.remove(&order.order_id);
                self.add(order);
            }
            None => self.add(order),
        }
    }

    /// Deletes the given order from the ladder.
    pub fn delete(&mut self, order: BookOrder) {
        self.remove_order(order.order_id);
    }

    /// Removes the order with the given ID, returning it if present.
    pub fn remove_order(&mut self, order_id: u64) -> Option<BookOrder> {
        let book_price = self.cache.remove(&order_id)?;
        let level = self.levels.get_mut(&book_price)?;
        let removed = level.orders.get(&order_id).copied();
        level.delete(order_id);
        if level.is_empty() {
            self.levels.remove(&book_price);
        }
        removed
    }

    /// Returns the best level of this side (highest bid or lowest ask).
    #[must_use]
    pub fn top(&self) -> Option<&BookLevel> {
        self.levels.values().next()
    }

    /// Returns the total size across all levels.
    #[must_use]
    pub fn sizes(&self) -> f64 {
        self.levels.values().map(BookLevel::size).sum()
    }

    /// Returns the total exposure across all levels.
    #[must_use]
    pub fn exposures(&self) -> f64 {
        self.levels.values().map(BookLevel::exposure).sum()
    }
}
