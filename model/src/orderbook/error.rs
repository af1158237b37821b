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

use thiserror::Error;

use crate::{
    enums::BookType,
    types::{price::Price, quantity::Quantity},
};

/// A violation of the order book's structural invariants. Fatal to the book:
/// the caller must reconstruct from a snapshot.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum BookIntegrityError {
    #[error("Orders in book crossed: bid {bid}, ask {ask}")]
    OrdersCrossed { bid: Price, ask: Price },
    #[error("Empty level at price {0}")]
    EmptyLevel(Price),
    #[error("Order {order_id} price {order_price} does not match level price {level_price}")]
    PriceMismatch {
        order_id: u64,
        order_price: Price,
        level_price: Price,
    },
    #[error("Order {order_id} has non-positive size {size}")]
    NonPositiveSize { order_id: u64, size: Quantity },
    #[error("Order side `NO_ORDER_SIDE` is invalid")]
    NoOrderSide,
}

/// An operation unsupported for the given book type.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum InvalidBookOperation {
    #[error("Invalid book operation: cannot add order for {0} book")]
    Add(BookType),
    #[error("Invalid book operation: cannot update from tick for {0} book")]
    Update(BookType),
}
