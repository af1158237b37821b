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

//! Events for the order lifecycle.
//!
//! Every event carries the identifiers of the affected order plus an
//! `event_id`, the venue occurrence time `ts_event` and the platform
//! initialization time `ts_init`. Aggregates own their ordered event
//! histories; mutation equals appending an event.

use serde::{Deserialize, Serialize};
use sextant_core::{time::UnixNanos, uuid::UUID4};
use ustr::Ustr;

use crate::{
    enums::{
        ContingencyType, LiquiditySide, OrderSide, OrderType, TimeInForce, TriggerType,
    },
    identifiers::{
        account_id::AccountId, client_order_id::ClientOrderId, execution_id::ExecutionId,
        instrument_id::InstrumentId, order_list_id::OrderListId, position_id::PositionId,
        strategy_id::StrategyId, trader_id::TraderId, venue_order_id::VenueOrderId,
    },
    types::{currency::Currency, money::Money, price::Price, quantity::Quantity},
};

#[derive(Clone, Hash, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum OrderEvent {
    OrderInitialized(OrderInitialized),
    OrderDenied(OrderDenied),
    OrderSubmitted(OrderSubmitted),
    OrderAccepted(OrderAccepted),
    OrderRejected(OrderRejected),
    OrderPendingUpdate(OrderPendingUpdate),
    OrderPendingCancel(OrderPendingCancel),
    OrderUpdated(OrderUpdated),
    OrderTriggered(OrderTriggered),
    OrderCanceled(OrderCanceled),
    OrderExpired(OrderExpired),
    OrderFilled(OrderFilled),
}

impl OrderEvent {
    #[must_use]
    pub fn client_order_id(&self) -> ClientOrderId {
        match self {
            Self::OrderInitialized(e) => e.client_order_id,
            Self::OrderDenied(e) => e.client_order_id,
            Self::OrderSubmitted(e) => e.client_order_id,
            Self::OrderAccepted(e) => e.client_order_id,
            Self::OrderRejected(e) => e.client_order_id,
            Self::OrderPendingUpdate(e) => e.client_order_id,
            Self::OrderPendingCancel(e) => e.client_order_id,
            Self::OrderUpdated(e) => e.client_order_id,
            Self::OrderTriggered(e) => e.client_order_id,
            Self::OrderCanceled(e) => e.client_order_id,
            Self::OrderExpired(e) => e.client_order_id,
            Self::OrderFilled(e) => e.client_order_id,
        }
    }

    #[must_use]
    pub fn strategy_id(&self) -> StrategyId {
        match self {
            Self::OrderInitialized(e) => e.strategy_id,
            Self::OrderDenied(e) => e.strategy_id,
            Self::OrderSubmitted(e) => e.strategy_id,
            Self::OrderAccepted(e) => e.strategy_id,
            Self::OrderRejected(e) => e.strategy_id,
            Self::OrderPendingUpdate(e) => e.strategy_id,
            Self::OrderPendingCancel(e) => e.strategy_id,
            Self::OrderUpdated(e) => e.strategy_id,
            Self::OrderTriggered(e) => e.strategy_id,
            Self::OrderCanceled(e) => e.strategy_id,
            Self::OrderExpired(e) => e.strategy_id,
            Self::OrderFilled(e) => e.strategy_id,
        }
    }

    #[must_use]
    pub fn instrument_id(&self) -> InstrumentId {
        match self {
            Self::OrderInitialized(e) => e.instrument_id,
            Self::OrderDenied(e) => e.instrument_id,
            Self::OrderSubmitted(e) => e.instrument_id,
            Self::OrderAccepted(e) => e.instrument_id,
            Self::OrderRejected(e) => e.instrument_id,
            Self::OrderPendingUpdate(e) => e.instrument_id,
            Self::OrderPendingCancel(e) => e.instrument_id,
            Self::OrderUpdated(e) => e.instrument_id,
            Self::OrderTriggered(e) => e.instrument_id,
            Self::OrderCanceled(e) => e.instrument_id,
            Self::OrderExpired(e) => e.instrument_id,
            Self::OrderFilled(e) => e.instrument_id,
        }
    }

    #[must_use]
    pub fn event_id(&self) -> UUID4 {
        match self {
            Self::OrderInitialized(e) => e.event_id,
            Self::OrderDenied(e) => e.event_id,
            Self::OrderSubmitted(e) => e.event_id,
            Self::OrderAccepted(e) => e.event_id,
            Self::OrderRejected(e) => e.event_id,
            Self::OrderPendingUpdate(e) => e.event_id,
            Self::OrderPendingCancel(e) => e.event_id,
            Self::OrderUpdated(e) => e.event_id,
            Self::OrderTriggered(e) => e.event_id,
            Self::OrderCanceled(e) => e.event_id,
            Self::OrderExpired(e) => e.event_id,
            Self::OrderFilled(e) => e.event_id,
        }
    }

    #[must_use]
    pub fn ts_event(&self) -> UnixNanos {
        match self {
            Self::OrderInitialized(e) => e.ts_event,
            Self::OrderDenied(e) => e.ts_event,
            Self::OrderSubmitted(e) => e.ts_event,
            Self::OrderAccepted(e) => e.ts_event,
            Self::OrderRejected(e) => e.ts_event,
            Self::OrderPendingUpdate(e) => e.ts_event,
            Self::OrderPendingCancel(e) => e.ts_event,
            Self::OrderUpdated(e) => e.ts_event,
            Self::OrderTriggered(e) => e.ts_event,
            Self::OrderCanceled(e) => e.ts_event,
            Self::OrderExpired(e) => e.ts_event,
            Self::OrderFilled(e) => e.ts_event,
        }
    }

    #[must_use]
    pub fn ts_init(&self) -> UnixNanos {
        match self {
            Self::OrderInitialized(e) => e.ts_init,
            Self::OrderDenied(e) => e.ts_init,
            Self::OrderSubmitted(e) => e.ts_init,
            Self::OrderAccepted(e) => e.ts_init,
            Self::OrderRejected(e) => e.ts_init,
            Self::OrderPendingUpdate(e) => e.ts_init,
            Self::OrderPendingCancel(e) => e.ts_init,
            Self::OrderUpdated(e) => e.ts_init,
            Self::OrderTriggered(e) => e.ts_init,
            Self::OrderCanceled(e) => e.ts_init,
            Self::OrderExpired(e) => e.ts_init,
            Self::OrderFilled(e) => e.ts_init,
        }
    }
}

#[repr(C)]
#[derive(Clone, Hash, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct OrderInitialized {
    pub trader_id: TraderId,
    pub strategy_id: StrategyId,
    pub instrument_id: InstrumentId,
    pub client_order_id: ClientOrderId,
    pub order_side: OrderSide,
    pub order_type: OrderType,
    pub quantity: Quantity,
    pub price: Option<Price>,
    pub trigger_price: Option<Price>,
    pub trigger_type: Option<TriggerType>,
    pub time_in_force: TimeInForce,
    pub expire_time: Option<UnixNanos>,
    pub post_only: bool,
    pub reduce_only: bool,
    pub display_qty: Option<Quantity>,
    pub contingency_type: Option<ContingencyType>,
    pub order_list_id: Option<OrderListId>,
    pub linked_order_ids: Option<Vec<ClientOrderId>>,
    pub parent_order_id: Option<ClientOrderId>,
    pub tags: Option<Ustr>,
    pub event_id: UUID4,
    pub ts_event: UnixNanos,
    pub ts_init: UnixNanos,
    pub reconciliation: bool,
}

#[repr(C)]
#[derive(Clone, Hash, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct OrderDenied {
    pub trader_id: TraderId,
    pub strategy_id: StrategyId,
    pub instrument_id: InstrumentId,
    pub client_order_id: ClientOrderId,
    pub reason: Ustr,
    pub event_id: UUID4,
    pub ts_event: UnixNanos,
    pub ts_init: UnixNanos,
}

#[repr(C)]
#[derive(Clone, Hash, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct OrderSubmitted {
    pub trader_id: TraderId,
    pub strategy_id: StrategyId,
    pub instrument_id: InstrumentId,
    pub client_order_id: ClientOrderId,
    pub account_id: AccountId,
    pub event_id: UUID4,
    pub ts_event: UnixNanos,
    pub ts_init: UnixNanos,
}

#[repr(C)]
#[derive(Clone, Hash, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct OrderAccepted {
    pub trader_id: TraderId,
    pub strategy_id: StrategyId,
    pub instrument_id: InstrumentId,
    pub client_order_id: ClientOrderId,
    pub venue_order_id: VenueOrderId,
    pub account_id: AccountId,
    pub event_id: UUID4,
    pub ts_event: UnixNanos,
    pub ts_init: UnixNanos,
    pub reconciliation: bool,
}

#[repr(C)]
#[derive(Clone, Hash, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct OrderRejected {
    pub trader_id: TraderId,
    pub strategy_id: StrategyId,
    pub instrument_id: InstrumentId,
    pub client_order_id: ClientOrderId,
    pub account_id: AccountId,
    pub reason: Ustr,
    pub event_id: UUID4,
    pub ts_event: UnixNanos,
    pub ts_init: UnixNanos,
    pub reconciliation: bool,
}

#[repr(C)]
#[derive(Clone, Hash, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct OrderPendingUpdate {
    pub trader_id: TraderId,
    pub strategy_id: StrategyId,
    pub instrument_id: InstrumentId,
    pub client_order_id: ClientOrderId,
    pub venue_order_id: Option<VenueOrderId>,
    pub account_id: AccountId,
    pub event_id: UUID4,
    pub ts_event: UnixNanos,
    pub ts_init: UnixNanos,
    pub reconciliation: bool,
}

#[repr(C)]
#[derive(Clone, Hash, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct OrderPendingCancel {
    pub trader_id: TraderId,
    pub strategy_id: StrategyId,
    pub instrument_id: InstrumentId,
    pub client_order_id: ClientOrderId,
    pub venue_order_id: Option<VenueOrderId>,
    pub account_id: AccountId,
    pub event_id: UUID4,
    pub ts_event: UnixNanos,
    pub ts_init: UnixNanos,
    pub reconciliation: bool,
}

#[repr(C)]
#[derive(Clone, Hash, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct OrderUpdated {
    pub trader_id: TraderId,
    pub strategy_id: StrategyId,
    pub instrument_id: InstrumentId,
    pub client_order_id: ClientOrderId,
    pub venue_order_id: Option<VenueOrderId>,
    pub account_id: Option<AccountId>,
    pub quantity: Quantity,
    pub price: Option<Price>,
    pub trigger_price: Option<Price>,
    pub event_id: UUID4,
    pub ts_event: UnixNanos,
    pub ts_init: UnixNanos,
    pub reconciliation: bool,
}

#[repr(C)]
#[derive(Clone, Hash, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct OrderTriggered {
    pub trader_id: TraderId,
    pub strategy_id: StrategyId,
    pub instrument_id: InstrumentId,
    pub client_order_id: ClientOrderId,
    pub venue_order_id: Option<VenueOrderId>,
    pub account_id: Option<AccountId>,
    pub event_id: UUID4,
    pub ts_event: UnixNanos,
    pub ts_init: UnixNanos,
    pub reconciliation: bool,
}

#[repr(C)]
#[derive(Clone, Hash, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct OrderCanceled {
    pub trader_id: TraderId,
    pub strategy_id: StrategyId,
    pub instrument_id: InstrumentId,
    pub client_order_id: ClientOrderId,
    pub venue_order_id: Option<VenueOrderId>,
    pub account_id: Option<AccountId>,
    pub event_id: UUID4,
    pub ts_event: UnixNanos,
    pub ts_init: UnixNanos,
    pub reconciliation: bool,
}

#[repr(C)]
#[derive(Clone, Hash, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct OrderExpired {
    pub trader_id: TraderId,
    pub strategy_id: StrategyId,
    pub instrument_id: InstrumentId,
    pub client_order_id: ClientOrderId,
    pub venue_order_id: Option<VenueOrderId>,
    pub account_id: Option<AccountId>,
    pub event_id: UUID4,
    pub ts_event: UnixNanos,
    pub ts_init: UnixNanos,
    pub reconciliation: bool,
}

#[repr(C)]
#[derive(Clone, Hash, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct OrderFilled {
    pub trader_id: TraderId,
    pub strategy_id: StrategyId,
    pub instrument_id: InstrumentId,
    pub client_order_id: ClientOrderId,
    pub venue_order_id: VenueOrderId,
    pub account_id: AccountId,
    pub execution_id: ExecutionId,
    pub position_id: Option<PositionId>,
    pub order_side: OrderSide,
    pub order_type: OrderType,
    pub last_qty: Quantity,
    pub last_px: Price,
    pub currency: Currency,
    pub commission: Option<Money>,
    pub liquidity_side: LiquiditySide,
    pub event_id: UUID4,
    pub ts_event: UnixNanos,
    pub ts_init: UnixNanos,
    pub reconciliation: bool,
}

impl OrderFilled {
    #[must_use]
    pub fn is_buy(&self) -> bool {
        self.order_side == OrderSide::Buy
    }

    #[must_use]
    pub fn is_sell(&self) -> bool {
        self.order_side == OrderSide::Sell
    }
}

////////////////////////////////////////////////////////////////////////////////
// Builders
////////////////////////////////////////////////////////////////////////////////
pub struct OrderInitializedBuilder {
    trader_id: TraderId,
    strategy_id: StrategyId,
    instrument_id: InstrumentId,
    client_order_id: ClientOrderId,
    order_side: OrderSide,
    order_type: OrderType,
    quantity: Quantity,
    price: Option<Price>,
    trigger_price: Option<Price>,
    trigger_type: Option<TriggerType>,
    time_in_force: TimeInForce,
    expire_time: Option<UnixNanos>,
    post_only: bool,
    reduce_only: bool,
    display_qty: Option<Quantity>,
    contingency_type: Option<ContingencyType>,
    order_list_id: Option<OrderListId>,
    linked_order_ids: Option<Vec<ClientOrderId>>,
    parent_order_id: Option<ClientOrderId>,
    tags: Option<Ustr>,
    event_id: UUID4,
    ts_event: UnixNanos,
    ts_init: UnixNanos,
}

impl Default for OrderInitializedBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderInitializedBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            trader_id: TraderId::default(),
            strategy_id: StrategyId::default(),
            instrument_id: InstrumentId::default(),
            client_order_id: ClientOrderId::default(),
            order_side: OrderSide::Buy,
            order_type: OrderType::Market,
            quantity: Quantity::new(100_000.0, 0),
            price: None,
            trigger_price: None,
            trigger_type: None,
            time_in_force: TimeInForce::Day,
            expire_time: None,
            post_only: false,
            reduce_only: false,
            display_qty: None,
            contingency_type: None,
            order_list_id: None,
            linked_order_ids: None,
            parent_order_id: None,
            tags: None,
            event_id: UUID4::new(),
            ts_event: 0,
            ts_init: 0,
        }
    }

    #[must_use]
    pub fn build(self) -> OrderInitialized {
        OrderInitialized {
            trader_id: self.trader_id,
            strategy_id: self.strategy_id,
            instrument_id: self.instrument_id,
            client_order_id: self.client_order_id,
            order_side: self.order_side,
            order_type: self.order_type,
            quantity: self.quantity,
            price: self.price,
            trigger_price: self.trigger_price,
            trigger_type: self.trigger_type,
            time_in_force: self.time_in_force,
            expire_time: self.expire_time,
            post_only: self.post_only,
            reduce_only: self.reduce_only,
            display_qty: self.display_qty,
            contingency_type: self.contingency_type,
            order_list_id: self.order_list_id,
            linked_order_ids: self.linked_order_ids,
            parent_order_id: self.parent_order_id,
            tags: self.tags,
            event_id: self.event_id,
            ts_event: self.ts_event,
            ts_init: self.ts_init,
            reconciliation: false,
        }
    }

    #[must_use]
    pub fn instrument_id(mut self, instrument_id: InstrumentId) -> Self {
        self.instrument_id = instrument_id;
        self
    }

    #[must_use]
    pub fn client_order_id(mut self, client_order_id: ClientOrderId) -> Self {
        self.client_order_id = client_order_id;
        self
    }

    #[must_use]
    pub fn order_side(mut self, order_side: OrderSide) -> Self {
        self.order_side = order_side;
        self
    }

    #[must_use]
    pub fn order_type(mut self, order_type: OrderType) -> Self {
        self.order_type = order_type;
        self
    }

    #[must_use]
    pub fn quantity(mut self, quantity: Quantity) -> Self {
        self.quantity = quantity;
        self
    }

    #[must_use]
    pub fn price(mut self, price: Price) -> Self {
        self.price = Some(price);
        self
    }

    #[must_use]
    pub fn trigger_price(mut self, trigger_price: Price) -> Self {
        self.trigger_price = Some(trigger_price);
        self
    }

    #[must_use]
    pub fn trigger_type(mut self, trigger_type: TriggerType) -> Self {
        self.trigger_type = Some(trigger_type);
        self
    }

    #[must_use]
    pub fn time_in_force(mut self, time_in_force: TimeInForce) -> Self {
        self.time_in_force = time_in_force;
        self
    }

    #[must_use]
    pub fn expire_time(mut self, expire_time: UnixNanos) -> Self {
        self.expire_time = Some(expire_time);
        self
    }

    #[must_use]
    pub fn display_qty(mut self, display_qty: Quantity) -> Self {
        self.display_qty = Some(display_qty);
        self
    }

    #[must_use]
    pub fn ts_event(mut self, ts_event: UnixNanos) -> Self {
        self.ts_event = ts_event;
        self
    }
}

pub struct OrderDeniedBuilder {
    pub trader_id: TraderId,
    pub strategy_id: StrategyId,
    pub instrument_id: InstrumentId,
    pub client_order_id: ClientOrderId,
    pub reason: Ustr,
    pub event_id: UUID4,
    pub ts_event: UnixNanos,
    pub ts_init: UnixNanos,
}

impl OrderDeniedBuilder {
    #[must_use]
    pub fn new(init: &OrderInitialized) -> Self {
        Self {
            trader_id: init.trader_id,
            strategy_id: init.strategy_id,
            instrument_id: init.instrument_id,
            client_order_id: init.client_order_id,
            reason: Ustr::from("DENIED"),
            event_id: UUID4::new(),
            ts_event: 0,
            ts_init: 0,
        }
    }

    #[must_use]
    pub fn reason(mut self, reason: &str) -> Self {
        self.reason = Ustr::from(reason);
        self
    }

    #[must_use]
    pub fn build(self) -> OrderDenied {
        OrderDenied {
            trader_id: self.trader_id,
            strategy_id: self.strategy_id,
            instrument_id: self.instrument_id,
            client_order_id: self.client_order_id,
            reason: self.reason,
            event_id: self.event_id,
            ts_event: self.ts_event,
            ts_init: self.ts_init,
        }
    }
}

pub struct OrderSubmittedBuilder {
    pub trader_id: TraderId,
    pub strategy_id: StrategyId,
    pub instrument_id: InstrumentId,
    pub client_order_id: ClientOrderId,
    pub account_id: AccountId,
    pub event_id: UUID4,
    pub ts_event: UnixNanos,
    pub ts_init: UnixNanos,
}

impl OrderSubmittedBuilder {
    #[must_use]
    pub fn new(init: &OrderInitialized) -> Self {
        Self {
            trader_id: init.trader_id,
            strategy_id: init.strategy_id,
            instrument_id: init.instrument_id,
            client_order_id: init.client_order_id,
            account_id: AccountId::default(),
            event_id: UUID4::new(),
            ts_event: 0,
            ts_init: 0,
        }
    }

    #[must_use]
    pub fn ts_event(mut self, ts_event: UnixNanos) -> Self {
        self.ts_event = ts_event;
        self
    }

    #[must_use]
    pub fn build(self) -> OrderSubmitted {
        OrderSubmitted {
            trader_id: self.trader_id,
            strategy_id: self.strategy_id,
            instrument_id: self.instrument_id,
            client_order_id: self.client_order_id,
            account_id: self.account_id,
            event_id: self.event_id,
            ts_event: self.ts_event,
            ts_init: self.ts_init,
        }
    }
}

pub struct OrderAcceptedBuilder {
    pub trader_id: TraderId,
    pub strategy_id: StrategyId,
    pub instrument_id: InstrumentId,
    pub client_order_id: ClientOrderId,
    pub venue_order_id: VenueOrderId,
    pub account_id: AccountId,
    pub event_id: UUID4,
    pub ts_event: UnixNanos,
    pub ts_init: UnixNanos,
}

impl OrderAcceptedBuilder {
    #[must_use]
    pub fn new(event: &OrderSubmitted) -> Self {
        Self {
            trader_id: event.trader_id,
            strategy_id: event.strategy_id,
            instrument_id: event.instrument_id,
            client_order_id: event.client_order_id,
            venue_order_id: VenueOrderId::default(),
            account_id: event.account_id,
            event_id: UUID4::new(),
            ts_event: 0,
            ts_init: 0,
        }
    }

    #[must_use]
    pub fn venue_order_id(mut self, venue_order_id: VenueOrderId) -> Self {
        self.venue_order_id = venue_order_id;
        self
    }

    #[must_use]
    pub fn ts_event(mut self, ts_event: UnixNanos) -> Self {
        self.ts_event = ts_event;
        self
    }

    #[must_use]
    pub fn build(self) -> OrderAccepted {
        OrderAccepted {
            trader_id: self.trader_id,
            strategy_id: self.strategy_id,
            instrument_id: self.instrument_id,
            client_order_id: self.client_order_id,
            venue_order_id: self.venue_order_id,
            account_id: self.account_id,
            event_id: self.event_id,
            ts_event: self.ts_event,
            ts_init: self.ts_init,
            reconciliation: false,
        }
    }
}

pub struct OrderRejectedBuilder {
    pub trader_id: TraderId,
    pub strategy_id: StrategyId,
    pub instrument_id: InstrumentId,
    pub client_order_id: ClientOrderId,
    pub account_id: AccountId,
    pub reason: Ustr,
    pub event_id: UUID4,
    pub ts_event: UnixNanos,
    pub ts_init: UnixNanos,
}

impl OrderRejectedBuilder {
    #[must_use]
    pub fn new(event: &OrderSubmitted) -> Self {
        Self {
            trader_id: event.trader_id,
            strategy_id: event.strategy_id,
            instrument_id: event.instrument_id,
            client_order_id: event.client_order_id,
            account_id: event.account_id,
            reason: Ustr::from("REJECTED"),
            event_id: UUID4::new(),
            ts_event: 0,
            ts_init: 0,
        }
    }

    #[must_use]
    pub fn reason(mut self, reason: &str) -> Self {
        self.reason = Ustr::from(reason);
        self
    }

    #[must_use]
    pub fn build(self) -> OrderRejected {
        OrderRejected {
            trader_id: self.trader_id,
            strategy_id: self.strategy_id,
            instrument_id: self.instrument_id,
            client_order_id: self.client_order_id,
            account_id: self.account_id,
            reason: self.reason,
            event_id: self.event_id,
            ts_event: self.ts_event,
            ts_init: self.ts_init,
            reconciliation: false,
        }
    }
}

pub struct OrderPendingUpdateBuilder {
    pub trader_id: TraderId,
    pub strategy_id: StrategyId,
    pub instrument_id: InstrumentId,
    pub client_order_id: ClientOrderId,
    pub venue_order_id: Option<VenueOrderId>,
    pub account_id: AccountId,
    pub event_id: UUID4,
    pub ts_event: UnixNanos,
    pub ts_init: UnixNanos,
}

impl OrderPendingUpdateBuilder {
    #[must_use]
    pub fn new(event: &OrderAccepted) -> Self {
        Self {
            trader_id: event.trader_id,
            strategy_id: event.strategy_id,
            instrument_id: event.instrument_id,
            client_order_id: event.client_order_id,
            venue_order_id: Some(event.venue_order_id),
            account_id: event.account_id,
            event_id: UUID4::new(),
            ts_event: 0,
            ts_init: 0,
        }
    }

    #[must_use]
    pub fn build(self) -> OrderPendingUpdate {
        OrderPendingUpdate {
            trader_id: self.trader_id,
            strategy_id: self.strategy_id,
            instrument_id: self.instrument_id,
            client_order_id: self.client_order_id,
            venue_order_id: self.venue_order_id,
            account_id: self.account_id,
            event_id: self.event_id,
            ts_event: self.ts_event,
            ts_init: self.ts_init,
            reconciliation: false,
        }
    }
}

pub struct OrderPendingCancelBuilder {
    pub trader_id: TraderId,
    pub strategy_id: StrategyId,
    pub instrument_id: InstrumentId,
    pub client_order_id: ClientOrderId,
    pub venue_order_id: Option<VenueOrderId>,
    pub account_id: AccountId,
    pub event_id: UUID4,
    pub ts_event: UnixNanos,
    pub ts_init: UnixNanos,
}

impl OrderPendingCancelBuilder {
    #[must_use]
    pub fn new(event: &OrderAccepted) -> Self {
        Self {
            trader_id: event.trader_id,
            strategy_id: event.strategy_id,
            instrument_id: event.instrument_id,
            client_order_id: event.client_order_id,
            venue_order_id: Some(event.venue_order_id),
            account_id: event.account_id,
            event_id: UUID4::new(),
            ts_event: 0,
            ts_init: 0,
        }
    }

    #[must_use]
    pub fn build(self) -> OrderPendingCancel {
        OrderPendingCancel {
            trader_id: self.trader_id,
            strategy_id: self.strategy_id,
            instrument_id: self.instrument_id,
            client_order_id: self.client_order_id,
            venue_order_id: self.venue_order_id,
            account_id: self.account_id,
            event_id: self.event_id,
            ts_event: self.ts_event,
            ts_init: self.ts_init,
            reconciliation: false,
        }
    }
}

pub struct OrderUpdatedBuilder {
    pub trader_id: TraderId,
    pub strategy_id: StrategyId,
    pub instrument_id: InstrumentId,
    pub client_order_id: ClientOrderId,
    pub venue_order_id: Option<VenueOrderId>,
    pub account_id: Option<AccountId>,
    pub quantity: Quantity,
    pub price: Option<Price>,
    pub trigger_price: Option<Price>,
    pub event_id: UUID4,
    pub ts_event: UnixNanos,
    pub ts_init: UnixNanos,
}

impl OrderUpdatedBuilder {
    #[must_use]
    pub fn new(init: &OrderInitialized) -> Self {
        Self {
            trader_id: init.trader_id,
            strategy_id: init.strategy_id,
            instrument_id: init.instrument_id,
            client_order_id: init.client_order_id,
            venue_order_id: None,
            account_id: None,
            quantity: init.quantity,
            price: None,
            trigger_price: None,
            event_id: UUID4::new(),
            ts_event: 0,
            ts_init: 0,
        }
    }

    #[must_use]
    pub fn quantity(mut self, quantity: Quantity) -> Self {
        self.quantity = quantity;
        self
    }

    #[must_use]
    pub fn price(mut self, price: Price) -> Self {
        self.price = Some(price);
        self
    }

    #[must_use]
    pub fn trigger_price(mut self, trigger_price: Price) -> Self {
        self.trigger_price = Some(trigger_price);
        self
    }

    #[must_use]
    pub fn build(self) -> OrderUpdated {
        OrderUpdated {
            trader_id: self.trader_id,
            strategy_id: self.strategy_id,
            instrument_id: self.instrument_id,
            client_order_id: self.client_order_id,
            venue_order_id: self.venue_order_id,
            account_id: self.account_id,
            quantity: self.quantity,
            price: self.price,
            trigger_price: self.trigger_price,
            event_id: self.event_id,
            ts_event: self.ts_event,
            ts_init: self.ts_init,
            reconciliation: false,
        }
    }
}

pub struct OrderTriggeredBuilder {
    pub trader_id: TraderId,
    pub strategy_id: StrategyId,
    pub instrument_id: InstrumentId,
    pub client_order_id: ClientOrderId,
    pub venue_order_id: Option<VenueOrderId>,
    pub account_id: Option<AccountId>,
    pub event_id: UUID4,
    pub ts_event: UnixNanos,
    pub ts_init: UnixNanos,
}

impl OrderTriggeredBuilder {
    #[must_use]
    pub fn new(event: &OrderAccepted) -> Self {
        Self {
            trader_id: event.trader_id,
            strategy_id: event.strategy_id,
            instrument_id: event.instrument_id,
            client_order_id: event.client_order_id,
            venue_order_id: Some(event.venue_order_id),
            account_id: Some(event.account_id),
            event_id: UUID4::new(),
            ts_event: 0,
            ts_init: 0,
        }
    }

    #[must_use]
    pub fn ts_event(mut self, ts_event: UnixNanos) -> Self {
        self.ts_event = ts_event;
        self
    }

    #[must_use]
    pub fn build(self) -> OrderTriggered {
        OrderTriggered {
            trader_id: self.trader_id,
            strategy_id: self.strategy_id,
            instrument_id: self.instrument_id,
            client_order_id: self.client_order_id,
            venue_order_id: self.venue_order_id,
            account_id: self.account_id,
            event_id: self.event_id,
            ts_event: self.ts_event,
            ts_init: self.ts_init,
            reconciliation: false,
        }
    }
}

pub struct OrderCanceledBuilder {
    pub trader_id: TraderId,
    pub strategy_id: StrategyId,
    pub instrument_id: InstrumentId,
    pub client_order_id: ClientOrderId,
    pub venue_order_id: Option<VenueOrderId>,
    pub account_id: Option<AccountId>,
    pub event_id: UUID4,
    pub ts_event: UnixNanos,
    pub ts_init: UnixNanos,
}

impl OrderCanceledBuilder {
    #[must_use]
    pub fn new(init: &OrderInitialized) -> Self {
        Self {
            trader_id: init.trader_id,
            strategy_id: init.strategy_id,
            instrument_id: init.instrument_id,
            client_order_id: init.client_order_id,
            venue_order_id: None,
            account_id: None,
            event_id: UUID4::new(),
            ts_event: 0,
            ts_init: 0,
        }
    }

    #[must_use]
    pub fn build(self) -> OrderCanceled {
        OrderCanceled {
            trader_id: self.trader_id,
            strategy_id: self.strategy_id,
            instrument_id: self.instrument_id,
            client_order_id: self.client_order_id,
            venue_order_id: self.venue_order_id,
            account_id: self.account_id,
            event_id: self.event_id,
            ts_event: self.ts_event,
            ts_init: self.ts_init,
            reconciliation: false,
        }
    }
}

pub struct OrderExpiredBuilder {
    pub trader_id: TraderId,
    pub strategy_id: StrategyId,
    pub instrument_id: InstrumentId,
    pub client_order_id: ClientOrderId,
    pub venue_order_id: Option<VenueOrderId>,
    pub account_id: Option<AccountId>,
    pub event_id: UUID4,
    pub ts_event: UnixNanos,
    pub ts_init: UnixNanos,
}

impl OrderExpiredBuilder {
    #[must_use]
    pub fn new(init: &OrderInitialized) -> Self {
        Self {
            trader_id: init.trader_id,
            strategy_id: init.strategy_id,
            instrument_id: init.instrument_id,
            client_order_id: init.client_order_id,
            venue_order_id: None,
            account_id: None,
            event_id: UUID4::new(),
            ts_event: 0,
            ts_init: 0,
        }
    }

    #[must_use]
    pub fn ts_event(mut self, ts_event: UnixNanos) -> Self {
        self.ts_event = ts_event;
        self
    }

    #[must_use]
    pub fn build(self) -> OrderExpired {
        OrderExpired {
            trader_id: self.trader_id,
            strategy_id: self.strategy_id,
            instrument_id: self.instrument_id,
            client_order_id: self.client_order_id,
            venue_order_id: self.venue_order_id,
            account_id: self.account_id,
            event_id: self.event_id,
            ts_event: self.ts_event,
            ts_init: self.ts_init,
            reconciliation: false,
        }
    }
}

pub struct OrderFilledBuilder {
    pub trader_id: TraderId,
    pub strategy_id: StrategyId,
    pub instrument_id: InstrumentId,
    pub client_order_id: ClientOrderId,
    pub venue_order_id: VenueOrderId,
    pub account_id: AccountId,
    pub execution_id: ExecutionId,
    pub position_id: Option<PositionId>,
    pub order_side: OrderSide,
    pub order_type: OrderType,
    pub last_qty: Quantity,
    pub last_px: Price,
    pub currency: Currency,
    pub commission: Option<Money>,
    pub liquidity_side: LiquiditySide,
    pub event_id: UUID4,
    pub ts_event: UnixNanos,
    pub ts_init: UnixNanos,
}

impl OrderFilledBuilder {
    #[must_use]
    pub fn new(init: &OrderInitialized, accepted: &OrderAccepted) -> Self {
        Self {
            trader_id: init.trader_id,
            strategy_id: init.strategy_id,
            instrument_id: init.instrument_id,
            client_order_id: init.client_order_id,
            venue_order_id: accepted.venue_order_id,
            account_id: accepted.account_id,
            execution_id: ExecutionId::default(),
            position_id: None,
            order_side: init.order_side,
            order_type: init.order_type,
            last_qty: init.quantity,
            last_px: Price::new(1.0, 0),
            currency: Currency::USD(),
            commission: None,
            liquidity_side: LiquiditySide::Taker,
            event_id: UUID4::new(),
            ts_event: 0,
            ts_init: 0,
        }
    }

    #[must_use]
    pub fn execution_id(mut self, execution_id: ExecutionId) -> Self {
        self.execution_id = execution_id;
        self
    }

    #[must_use]
    pub fn position_id(mut self, position_id: PositionId) -> Self {
        self.position_id = Some(position_id);
        self
    }

    #[must_use]
    pub fn order_side(mut self, order_side: OrderSide) -> Self {
        self.order_side = order_side;
        self
    }

    #[must_use]
    pub fn last_qty(mut self, last_qty: Quantity) -> Self {
        self.last_qty = last_qty;
        self
    }

    #[must_use]
    pub fn last_px(mut self, last_px: Price) -> Self {
        self.last_px = last_px;
        self
    }

    #[must_use]
    pub fn currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    #[must_use]
    pub fn commission(mut self, commission: Money) -> Self {
        self.commission = Some(commission);
        self
    }

    #[must_use]
    pub fn liquidity_side(mut self, liquidity_side: LiquiditySide) -> Self {
        self.liquidity_side = liquidity_side;
        self
    }

    #[must_use]
    pub fn ts_event(mut self, ts_event: UnixNanos) -> Self {
        self.ts_event = ts_event;
        self
    }

    #[must_use]
    pub fn build(self) -> OrderFilled {
        OrderFilled {
            trader_id: self.trader_id,
            strategy_id: self.strategy_id,
            instrument_id: self.instrument_id,
            client_order_id: self.client_order_id,
            venue_order_id: self.venue_order_id,
            account_id: self.account_id,
            execution_id: self.execution_id,
            position_id: self.position_id,
            order_side: self.order_side,
            order_type: self.order_type,
            last_qty: self.last_qty,
            last_px: self.last_px,
            currency: self.currency,
            commission: self.commission,
            liquidity_side: self.liquidity_side,
            event_id: self.event_id,
            ts_event: self.ts_event,
            ts_init: self.ts_init,
            reconciliation: false,
        }
    }
}
