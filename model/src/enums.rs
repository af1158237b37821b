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

//! Enumerations for the trading domain model.
//!
//! All wire-facing enums parse from their SCREAMING_SNAKE_CASE display form
//! (case insensitive); an unknown value is a validation error at the parse
//! site.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, FromRepr};

/// The aggregation source for a bar series: external bars arrive already
/// aggregated, internal bars are built by the platform's own aggregators.
#[repr(C)]
#[derive(
    Copy, Clone, Debug, Display, Hash, PartialEq, Eq, PartialOrd, Ord,
    AsRefStr, FromRepr, EnumString, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AggregationSource {
    External = 1,
    Internal = 2,
}

/// The side of a trade which crossed the spread.
#[repr(C)]
#[derive(
    Copy, Clone, Debug, Display, Hash, PartialEq, Eq, PartialOrd, Ord,
    AsRefStr, FromRepr, EnumString, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AggressorSide {
    NoAggressor = 0,
    Buyer = 1,
    Seller = 2,
}

/// The method of aggregating a bar series from ticks.
#[repr(C)]
#[derive(
    Copy, Clone, Debug, Display, Hash, PartialEq, Eq, PartialOrd, Ord,
    AsRefStr, FromRepr, EnumString, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum BarAggregation {
    Tick = 1,
    Volume = 2,
    Value = 3,
    Second = 4,
    Minute = 5,
    Hour = 6,
    Day = 7,
}

impl BarAggregation {
    /// Returns whether the aggregation closes bars on wall-time boundaries.
    #[must_use]
    pub fn is_time_aggregated(&self) -> bool {
        matches!(self, Self::Second | Self::Minute | Self::Hour | Self::Day)
    }
}

/// The operation carried by an order book delta.
#[repr(C)]
#[derive(
    Copy, Clone, Debug, Display, Hash, PartialEq, Eq, PartialOrd, Ord,
    AsRefStr, FromRepr, EnumString, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum BookAction {
    Add = 1,
    Update = 2,
    Delete = 3,
    Clear = 4,
}

/// The order book granularity.
#[repr(C)]
#[allow(non_camel_case_types)]
#[derive(
    Copy, Clone, Debug, Display, Hash, PartialEq, Eq, PartialOrd, Ord,
    AsRefStr, FromRepr, EnumString, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum BookType {
    /// Top-of-book best bid and offer, driven by quote and trade ticks.
    L1_TBBO = 1,
    /// Market by price, orders aggregated per price level.
    L2_MBP = 2,
    /// Market by order, every venue order preserved in FIFO.
    L3_MBO = 3,
}

/// The relationship between orders in a contingent list.
#[repr(C)]
#[derive(
    Copy, Clone, Debug, Display, Hash, PartialEq, Eq, PartialOrd, Ord,
    AsRefStr, FromRepr, EnumString, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ContingencyType {
    NoContingency = 0,
    /// One-cancels-other.
    Oco = 1,
    /// One-triggers-other.
    Oto = 2,
    /// One-updates-other.
    Ouo = 3,
}

/// The general classification of a currency.
#[repr(C)]
#[derive(
    Copy, Clone, Debug, Display, Hash, PartialEq, Eq, PartialOrd, Ord,
    AsRefStr, FromRepr, EnumString, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum CurrencyType {
    Crypto = 1,
    Fiat = 2,
}

/// The liquidity side of an execution.
#[repr(C)]
#[derive(
    Copy, Clone, Debug, Display, Hash, PartialEq, Eq, PartialOrd, Ord,
    AsRefStr, FromRepr, EnumString, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum LiquiditySide {
    NoLiquiditySide = 0,
    Maker = 1,
    Taker = 2,
}

/// The order management scheme for a venue or strategy.
#[repr(C)]
#[derive(
    Copy, Clone, Debug, Display, Hash, PartialEq, Eq, PartialOrd, Ord,
    AsRefStr, FromRepr, EnumString, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum OmsType {
    Unspecified = 0,
    /// Fills collapse into one position per instrument.
    Netting = 1,
    /// Each open order keeps a separate position.
    Hedging = 2,
}

/// The side of an order or fill.
#[repr(C)]
#[derive(
    Copy, Clone, Debug, Display, Hash, PartialEq, Eq, PartialOrd, Ord,
    AsRefStr, FromRepr, EnumString, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderSide {
    NoOrderSide = 0,
    Buy = 1,
    Sell = 2,
}

/// The lifecycle state of an order, as governed by the shared
/// finite-state machine.
#[repr(C)]
#[derive(
    Copy, Clone, Debug, Display, Hash, PartialEq, Eq, PartialOrd, Ord,
    AsRefStr, FromRepr, EnumString, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Initialized = 1,
    Denied = 2,
    Submitted = 3,
    Accepted = 4,
    Rejected = 5,
    Canceled = 6,
    Expired = 7,
    Triggered = 8,
    PendingUpdate = 9,
    PendingCancel = 10,
    PartiallyFilled = 11,
    Filled = 12,
}

/// The type of an order.
#[repr(C)]
#[derive(
    Copy, Clone, Debug, Display, Hash, PartialEq, Eq, PartialOrd, Ord,
    AsRefStr, FromRepr, EnumString, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    Market = 1,
    Limit = 2,
    StopMarket = 3,
    StopLimit = 4,
}

/// The market side of a position.
#[repr(C)]
#[derive(
    Copy, Clone, Debug, Display, Hash, PartialEq, Eq, PartialOrd, Ord,
    AsRefStr, FromRepr, EnumString, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum PositionSide {
    NoPositionSide = 0,
    Flat = 1,
    Long = 2,
    Short = 3,
}

/// The price basis used when extracting values from quote ticks.
#[repr(C)]
#[derive(
    Copy, Clone, Debug, Display, Hash, PartialEq, Eq, PartialOrd, Ord,
    AsRefStr, FromRepr, EnumString, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum PriceType {
    Bid = 1,
    Ask = 2,
    Mid = 3,
    Last = 4,
}

/// How long an order remains active at the venue.
#[repr(C)]
#[derive(
    Copy, Clone, Debug, Display, Hash, PartialEq, Eq, PartialOrd, Ord,
    AsRefStr, FromRepr, EnumString, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeInForce {
    /// Good till canceled.
    Gtc = 1,
    /// Immediate or cancel.
    Ioc = 2,
    /// Fill or kill.
    Fok = 3,
    /// Good till date (requires an expire time).
    Gtd = 4,
    /// Good for the trading day.
    Day = 5,
    AtTheOpen = 6,
    AtTheClose = 7,
}

/// The price source which fires a stop trigger.
#[repr(C)]
#[derive(
    Copy, Clone, Debug, Display, Hash, PartialEq, Eq, PartialOrd, Ord,
    AsRefStr, FromRepr, EnumString, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TriggerType {
    NoTrigger = 0,
    Default = 1,
    BidAsk = 2,
    LastPrice = 3,
    MidPoint = 4,
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("BUY", OrderSide::Buy)]
    #[case("SELL", OrderSide::Sell)]
    #[case("buy", OrderSide::Buy)]
    fn test_order_side_from_str(#[case] s: &str, #[case] expected: OrderSide) {
        assert_eq!(OrderSide::from_str(s).unwrap(), expected);
    }

    #[rstest]
    fn test_unknown_enum_value_is_error() {
        assert!(OrderSide::from_str("HOLD").is_err());
        assert!(BarAggregation::from_str("WEEK").is_err());
    }

    #[rstest]
    fn test_display_round_trip() {
        assert_eq!(OrderStatus::PendingUpdate.to_string(), "PENDING_UPDATE");
        assert_eq!(TimeInForce::AtTheOpen.to_string(), "AT_THE_OPEN");
        assert_eq!(
            OrderStatus::from_str("PENDING_UPDATE").unwrap(),
            OrderStatus::PendingUpdate
        );
        assert_eq!(TimeInForce::Gtd.to_string(), "GTD");
        assert_eq!(BookType::L1_TBBO.to_string(), "L1_TBBO");
        assert_eq!(
            BookType::from_str("L1_TBBO").unwrap(),
            BookType::L1_TBBO
        );
    }

    #[rstest]
    fn test_from_repr() {
        assert_eq!(OrderSide::from_repr(1), Some(OrderSide::Buy));
        assert_eq!(OrderSide::from_repr(9), None);
    }

    #[rstest]
    fn test_time_aggregation_classification() {
        assert!(BarAggregation::Minute.is_time_aggregated());
        assert!(!BarAggregation::Volume.is_time_aggregated());
    }
}
