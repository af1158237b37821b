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

use serde::{Deserialize, Serialize};
use sextant_core::{time::UnixNanos, uuid::UUID4};
use ustr::Ustr;

use super::{
    base::{Order, OrderError},
    limit::LimitOrder,
    market::MarketOrder,
    stop_limit::StopLimitOrder,
    stop_market::StopMarketOrder,
};
use crate::{
    enums::{
        ContingencyType, LiquiditySide, OrderSide, OrderStatus, OrderType, TimeInForce, TriggerType,
    },
    events::order::{OrderEvent, OrderInitialized},
    identifiers::{
        account_id::AccountId, client_order_id::ClientOrderId, execution_id::ExecutionId,
        instrument_id::InstrumentId, order_list_id::OrderListId, position_id::PositionId,
        strategy_id::StrategyId, trader_id::TraderId, venue_order_id::VenueOrderId,
    },
    types::{price::Price, quantity::Quantity},
};

/// A tagged sum over the concrete order variants, for registry storage and
/// uniform dispatch.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum OrderAny {
    Market(MarketOrder),
    Limit(LimitOrder),
    StopMarket(StopMarketOrder),
    StopLimit(StopLimitOrder),
}

macro_rules! delegate {
    ($self:ident, $method:ident $(, $arg:expr)*) => {
        match $self {
            OrderAny::Market(order) => order.$method($($arg),*),
            OrderAny::Limit(order) => order.$method($($arg),*),
            OrderAny::StopMarket(order) => order.$method($($arg),*),
            OrderAny::StopLimit(order) => order.$method($($arg),*),
        }
    };
}

impl From<OrderInitialized> for OrderAny {
    fn from(event: OrderInitialized) -> Self {
        match event.order_type {
            OrderType::Market => Self::Market(MarketOrder::from(event)),
            OrderType::Limit => Self::Limit(LimitOrder::from(event)),
            OrderType::StopMarket => Self::StopMarket(StopMarketOrder::from(event)),
            OrderType::StopLimit => Self::StopLimit(StopLimitOrder::from(event)),
        }
    }
}

impl Order for OrderAny {
    fn status(&self) -> OrderStatus {
        delegate!(self, status)
    }

    fn trader_id(&self) -> TraderId {
        delegate!(self, trader_id)
    }

    fn strategy_id(&self) -> StrategyId {
        delegate!(self, strategy_id)
    }

    fn instrument_id(&self) -> InstrumentId {
        delegate!(self, instrument_id)
    }

    fn client_order_id(&self) -> ClientOrderId {
        delegate!(self, client_order_id)
    }

    fn venue_order_id(&self) -> Option<VenueOrderId> {
        delegate!(self, venue_order_id)
    }

    fn position_id(&self) -> Option<PositionId> {
        delegate!(self, position_id)
    }

    fn account_id(&self) -> Option<AccountId> {
        delegate!(self, account_id)
    }

    fn last_execution_id(&self) -> Option<ExecutionId> {
        delegate!(self, last_execution_id)
    }

    fn side(&self) -> OrderSide {
        delegate!(self, side)
    }

    fn order_type(&self) -> OrderType {
        delegate!(self, order_type)
    }

    fn quantity(&self) -> Quantity {
        delegate!(self, quantity)
    }

    fn time_in_force(&self) -> TimeInForce {
        delegate!(self, time_in_force)
    }

    fn expire_time(&self) -> Option<UnixNanos> {
        delegate!(self, expire_time)
    }

    fn price(&self) -> Option<Price> {
        delegate!(self, price)
    }

    fn trigger_price(&self) -> Option<Price> {
        delegate!(self, trigger_price)
    }

    fn trigger_type(&self) -> Option<TriggerType> {
        delegate!(self, trigger_type)
    }

    fn liquidity_side(&self) -> Option<LiquiditySide> {
        delegate!(self, liquidity_side)
    }

    fn is_post_only(&self) -> bool {
        delegate!(self, is_post_only)
    }

    fn is_reduce_only(&self) -> bool {
        delegate!(self, is_reduce_only)
    }

    fn display_qty(&self) -> Option<Quantity> {
        delegate!(self, display_qty)
    }

    fn contingency_type(&self) -> Option<ContingencyType> {
        delegate!(self, contingency_type)
    }

    fn order_list_id(&self) -> Option<OrderListId> {
        delegate!(self, order_list_id)
    }

    fn linked_order_ids(&self) -> Option<Vec<ClientOrderId>> {
        delegate!(self, linked_order_ids)
    }

    fn parent_order_id(&self) -> Option<ClientOrderId> {
        delegate!(self, parent_order_id)
    }

    fn tags(&self) -> Option<Ustr> {
        delegate!(self, tags)
    }

    fn filled_qty(&self) -> Quantity {
        delegate!(self, filled_qty)
    }

    fn leaves_qty(&self) -> Quantity {
        delegate!(self, leaves_qty)
    }

    fn avg_px(&self) -> Option<f64> {
        delegate!(self, avg_px)
    }

    fn slippage(&self) -> Option<f64> {
        delegate!(self, slippage)
    }

    fn init_id(&self) -> UUID4 {
        delegate!(self, init_id)
    }

    fn ts_init(&self) -> UnixNanos {
        delegate!(self, ts_init)
    }

    fn ts_last(&self) -> UnixNanos {
        delegate!(self, ts_last)
    }

    fn apply(&mut self, event: OrderEvent) -> Result<(), OrderError> {
        delegate!(self, apply, event)
    }

    fn events(&self) -> Vec<&OrderEvent> {
        delegate!(self, events)
    }

    fn execution_ids(&self) -> Vec<&ExecutionId> {
        delegate!(self, execution_ids)
    }
}
