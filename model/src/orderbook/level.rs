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

use std::cmp::Ordering;

use indexmap::IndexMap;

use super::ladder::BookPrice;
use crate::data::BookOrder;

/// A price level within an order book ladder, holding its resting orders in
/// FIFO insertion order.
#[derive(Clone, Debug)]
pub struct BookLevel {
    pub price: BookPrice,
    pub orders: IndexMap<u64, BookOrder>,
}

impl BookLevel {
    /// Creates a new, empty [`BookLevel`].
    #[must_use]
    pub fn new(price: BookPrice) -> Self {
        Self {
            price,
            orders: IndexMap::new(),
        }
    }

    /// Creates a new [`BookLevel`] seeded with the given order.
    #[must_use]
    pub fn from_order(order: BookOrder) -> Self {
        let mut level = Self::new(BookPrice::new(order.price, order.side));
        level.add(order);
        level
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Returns the order at the front of the FIFO queue.
    #[must_use]
    pub fn first(&self) -> Option<&BookOrder> {
        self.orders.values().next()
    }

    /// Returns the orders in FIFO order.
    #[must_use]
    pub fn orders(&self) -> Vec<BookOrder> {
        self.orders.values().copied().collect()
    }

    /// Returns the total size resting at this level.
    #[must_use]
    pub fn size(&self) -> f64 {
        self.orders.values().map(|o| o.size.as_f64()).sum()
    }

    /// Returns the total size resting at this level as raw fixed-point.
    #[must_use]
    pub fn size_raw(&self) -> u64 {
        self.orders.values().map(|o| o.size.raw).sum()
    }

    /// Returns the total price * size exposure at this level.
    #[must_use]
    pub fn exposure(&self) -> f64 {
        self.orders
            .values()
            .map(|o| o.price.as_f64() * o.size.as_f64())
            .sum()
    }

    pub fn add(&mut self, order: BookOrder) {
        debug_assert_eq!(order.price, self.price.value);
        self.orders.insert(order.order_id, order);
    }

    /// Updates the size of the given resting order, removing it if the new
    /// size is zero. FIFO priority is retained for pure size decreases.
    pub fn update(&mut self, order: BookOrder) {
        if order.size.is_zero() {
            self.orders.shift_remove(&order.order_id);
        } else {
            self.orders.insert(order.order_id, order);
        }
    }

    /// Deletes the order with the given ID, returning whether it was found.
    pub fn delete(&mut self, order_id: u64) -> bool {
        self.orders.shift_remove(&order_id).is_some()
    }
}

impl PartialEq for BookLevel {
    fn eq(&self, other: &Self) -> bool {
        self.price == other.price
    }
}

impl Eq for BookLevel {}

impl PartialOrd for BookLevel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BookLevel {
    fn cmp(&self, other: &Self) -> Ordering {
        self.price.cmp(&other.price)
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
        enums::OrderSide,
        types::{price::Price, quantity::Quantity},
    };

    fn order(id: u64, size: u64) -> BookOrder {
        BookOrder::new(
            OrderSide::Buy,
            Price::new(1.00, 2),
            Quantity::from(size),
            id,
        )
    }

    #[rstest]
    fn test_fifo_order_preserved() {
        let mut level = BookLevel::from_order(order(1, 10));
        level.add(order(2, 20));
        level.add(order(3, 30));

        assert_eq!(level.len(), 3);
        assert_eq!(level.first().unwrap().order_id, 1);
        assert_eq!(level.size(), 60.0);

        level.delete(1);
        assert_eq!(level.first().unwrap().order_id, 2);
    }

    #[rstest]
    fn test_update_to_zero_removes() {
        let mut level = BookLevel::from_order(order(1, 10));
        level.update(order(1, 0));
        assert!(level.is_empty());
    }

    #[rstest]
    fn test_exposure() {
        let mut level = BookLevel::from_order(order(1, 10));
        level.add(order(2, 20));
        assert_eq!(level.exposure(), 30.0);
    }
}
