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

//! The shared order aggregate core and its finite-state machine.
//!
//! Every order variant composes an [`OrderCore`] which owns the ordered
//! event history and the denormalized lifecycle fields. Applying an event
//! first validates the state transition, then mutates; invalid events leave
//! the aggregate untouched.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sextant_core::{time::UnixNanos, uuid::UUID4};
use thiserror;
use ustr::Ustr;

use crate::{
    enums::{
        ContingencyType, LiquiditySide, OrderSide, OrderStatus, OrderType, PositionSide,
        TimeInForce, TriggerType,
    },
    events::order::{
        OrderAccepted, OrderCanceled, OrderDenied, OrderEvent, OrderExpired, OrderFilled,
        OrderInitialized, OrderPendingCancel, OrderPendingUpdate, OrderRejected, OrderSubmitted,
        OrderTriggered, OrderUpdated,
    },
    identifiers::{
        account_id::AccountId, client_order_id::ClientOrderId, execution_id::ExecutionId,
        instrument_id::InstrumentId, order_list_id::OrderListId, position_id::PositionId,
        strategy_id::StrategyId, symbol::Symbol, trader_id::TraderId, venue::Venue,
        venue_order_id::VenueOrderId,
    },
    types::{currency::Currency, money::Money, price::Price, quantity::Quantity},
};

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum OrderError {
    #[error("Invalid state transition")]
    InvalidStateTransition,
    #[error("Invalid event for order type")]
    InvalidOrderEvent,
    #[error("Unrecognized event")]
    UnrecognizedEvent,
    #[error("No previous state to roll back to")]
    NoPreviousState,
    #[error("Duplicate execution ID {0}")]
    DuplicateExecutionId(ExecutionId),
    #[error("Filled quantity {filled_qty} would exceed order quantity {quantity}")]
    OverFill {
        filled_qty: Quantity,
        quantity: Quantity,
    },
    #[error("Updated quantity {quantity} below filled quantity {filled_qty}")]
    UpdateBelowFilledQty {
        quantity: Quantity,
        filled_qty: Quantity,
    },
}

impl OrderStatus {
    /// Returns the candidate status for applying `event` in the current
    /// state, per the order state-transition table.
    ///
    /// The candidate for a fill is `Filled`; the aggregate downgrades to
    /// `PartiallyFilled` while `filled_qty < quantity`. Rollback of the
    /// `PENDING_*` states on a venue `Accepted` is resolved by the caller,
    /// which holds the remembered prior status.
    ///
    /// # Errors
    ///
    /// Returns an error if the transition is not in the table.
    #[rustfmt::skip]
    pub fn transition(&self, event: &OrderEvent) -> Result<OrderStatus, OrderError> {
        let new_state = match (self, event) {
            (OrderStatus::Initialized, OrderEvent::OrderDenied(_)) => OrderStatus::Denied,
            (OrderStatus::Initialized, OrderEvent::OrderSubmitted(_)) => OrderStatus::Submitted,
            (OrderStatus::Submitted, OrderEvent::OrderRejected(_)) => OrderStatus::Rejected,
            (OrderStatus::Submitted, OrderEvent::OrderAccepted(_)) => OrderStatus::Accepted,
            (OrderStatus::Submitted, OrderEvent::OrderPendingCancel(_)) => OrderStatus::PendingCancel,
            (OrderStatus::Submitted, OrderEvent::OrderCanceled(_)) => OrderStatus::Canceled,  // FOK and IOC cases
            (OrderStatus::Submitted, OrderEvent::OrderFilled(_)) => OrderStatus::Filled,
            (OrderStatus::Accepted, OrderEvent::OrderPendingUpdate(_)) => OrderStatus::PendingUpdate,
            (OrderStatus::Accepted, OrderEvent::OrderUpdated(_)) => OrderStatus::Accepted,
            (OrderStatus::Accepted, OrderEvent::OrderPendingCancel(_)) => OrderStatus::PendingCancel,
            (OrderStatus::Accepted, OrderEvent::OrderCanceled(_)) => OrderStatus::Canceled,
            (OrderStatus::Accepted, OrderEvent::OrderTriggered(_)) => OrderStatus::Triggered,
            (OrderStatus::Accepted, OrderEvent::OrderExpired(_)) => OrderStatus::Expired,
            (OrderStatus::Accepted, OrderEvent::OrderFilled(_)) => OrderStatus::Filled,
            (OrderStatus::PendingUpdate, OrderEvent::OrderAccepted(_)) => OrderStatus::Accepted,  // Rollback
            (OrderStatus::PendingUpdate, OrderEvent::OrderUpdated(_)) => OrderStatus::Accepted,
            (OrderStatus::PendingUpdate, OrderEvent::OrderPendingCancel(_)) => OrderStatus::PendingCancel,
            (OrderStatus::PendingUpdate, OrderEvent::OrderCanceled(_)) => OrderStatus::Canceled,
            (OrderStatus::PendingUpdate, OrderEvent::OrderTriggered(_)) => OrderStatus::Triggered,
            (OrderStatus::PendingUpdate, OrderEvent::OrderExpired(_)) => OrderStatus::Expired,
            (OrderStatus::PendingUpdate, OrderEvent::OrderFilled(_)) => OrderStatus::Filled,
            (OrderStatus::PendingCancel, OrderEvent::OrderAccepted(_)) => OrderStatus::Accepted,  // Rollback (failed cancel)
            (OrderStatus::PendingCancel, OrderEvent::OrderCanceled(_)) => OrderStatus::Canceled,
            (OrderStatus::PendingCancel, OrderEvent::OrderExpired(_)) => OrderStatus::Expired,
            (OrderStatus::PendingCancel, OrderEvent::OrderFilled(_)) => OrderStatus::Filled,
            (OrderStatus::Triggered, OrderEvent::OrderPendingUpdate(_)) => OrderStatus::PendingUpdate,
            (OrderStatus::Triggered, OrderEvent::OrderUpdated(_)) => OrderStatus::Triggered,
            (OrderStatus::Triggered, OrderEvent::OrderPendingCancel(_)) => OrderStatus::PendingCancel,
            (OrderStatus::Triggered, OrderEvent::OrderCanceled(_)) => OrderStatus::Canceled,
            (OrderStatus::Triggered, OrderEvent::OrderExpired(_)) => OrderStatus::Expired,
            (OrderStatus::Triggered, OrderEvent::OrderFilled(_)) => OrderStatus::Filled,
            (OrderStatus::PartiallyFilled, OrderEvent::OrderPendingUpdate(_)) => OrderStatus::PendingUpdate,
            (OrderStatus::PartiallyFilled, OrderEvent::OrderUpdated(_)) => OrderStatus::PartiallyFilled,
            (OrderStatus::PartiallyFilled, OrderEvent::OrderPendingCancel(_)) => OrderStatus::PendingCancel,
            (OrderStatus::PartiallyFilled, OrderEvent::OrderCanceled(_)) => OrderStatus::Canceled,
            (OrderStatus::PartiallyFilled, OrderEvent::OrderExpired(_)) => OrderStatus::Expired,
            (OrderStatus::PartiallyFilled, OrderEvent::OrderFilled(_)) => OrderStatus::Filled,
            _ => return Err(OrderError::InvalidStateTransition),
        };
        Ok(new_state)
    }
}

pub trait Order {
    fn status(&self) -> OrderStatus;
    fn trader_id(&self) -> TraderId;
    fn strategy_id(&self) -> StrategyId;
    fn instrument_id(&self) -> InstrumentId;
    fn client_order_id(&self) -> ClientOrderId;
    fn venue_order_id(&self) -> Option<VenueOrderId>;
    fn position_id(&self) -> Option<PositionId>;
    fn account_id(&self) -> Option<AccountId>;
    fn last_execution_id(&self) -> Option<ExecutionId>;
    fn side(&self) -> OrderSide;
    fn order_type(&self) -> OrderType;
    fn quantity(&self) -> Quantity;
    fn time_in_force(&self) -> TimeInForce;
    fn expire_time(&self) -> Option<UnixNanos>;
    fn price(&self) -> Option<Price>;
    fn trigger_price(&self) -> Option<Price>;
    fn trigger_type(&self) -> Option<TriggerType>;
    fn liquidity_side(&self) -> Option<LiquiditySide>;
    fn is_post_only(&self) -> bool;
    fn is_reduce_only(&self) -> bool;
    fn display_qty(&self) -> Option<Quantity>;
    fn contingency_type(&self) -> Option<ContingencyType>;
    fn order_list_id(&self) -> Option<OrderListId>;
    fn linked_order_ids(&self) -> Option<Vec<ClientOrderId>>;
    fn parent_order_id(&self) -> Option<ClientOrderId>;
    fn tags(&self) -> Option<Ustr>;
    fn filled_qty(&self) -> Quantity;
    fn leaves_qty(&self) -> Quantity;
    fn avg_px(&self) -> Option<f64>;
    fn slippage(&self) -> Option<f64>;
    fn init_id(&self) -> UUID4;
    fn ts_init(&self) -> UnixNanos;
    fn ts_last(&self) -> UnixNanos;

    /// Applies the given event to the order.
    ///
    /// # Errors
    ///
    /// Returns an error if the event is not a valid transition from the
    /// current state, or violates an order invariant; the order is then
    /// unchanged.
    fn apply(&mut self, event: OrderEvent) -> Result<(), OrderError>;

    fn events(&self) -> Vec<&OrderEvent>;

    fn last_event(&self) -> &OrderEvent {
        // SAFETY: Unwrap safe as `Order` specification guarantees at least one event (`OrderInitialized`)
        self.events().last().unwrap()
    }

    fn event_count(&self) -> usize {
        self.events().len()
    }

    fn execution_ids(&self) -> Vec<&ExecutionId>;

    fn symbol(&self) -> Symbol {
        self.instrument_id().symbol
    }

    fn venue(&self) -> Venue {
        self.instrument_id().venue
    }

    fn is_buy(&self) -> bool {
        self.side() == OrderSide::Buy
    }

    fn is_sell(&self) -> bool {
        self.side() == OrderSide::Sell
    }

    fn is_passive(&self) -> bool {
        self.order_type() != OrderType::Market
    }

    fn is_aggressive(&self) -> bool {
        self.order_type() == OrderType::Market
    }

    fn is_contingency(&self) -> bool {
        self.contingency_type().is_some()
    }

    fn is_parent_order(&self) -> bool {
        match self.contingency_type() {
            Some(c) => c == ContingencyType::Oto,
            None => false,
        }
    }

    fn is_child_order(&self) -> bool {
        self.parent_order_id().is_some()
    }

    fn is_open(&self) -> bool {
        matches!(
            self.status(),
            OrderStatus::Accepted
                | OrderStatus::Triggered
                | OrderStatus::PendingCancel
                | OrderStatus::PendingUpdate
                | OrderStatus::PartiallyFilled
        )
    }

    fn is_canceled(&self) -> bool {
        self.status() == OrderStatus::Canceled
    }

    fn is_closed(&self) -> bool {
        matches!(
            self.status(),
            OrderStatus::Denied
                | OrderStatus::Rejected
                | OrderStatus::Canceled
                | OrderStatus::Expired
                | OrderStatus::Filled
        )
    }

    fn is_inflight(&self) -> bool {
        matches!(
            self.status(),
            OrderStatus::Submitted | OrderStatus::PendingCancel | OrderStatus::PendingUpdate
        )
    }

    fn is_pending_update(&self) -> bool {
        self.status() == OrderStatus::PendingUpdate
    }

    fn is_pending_cancel(&self) -> bool {
        self.status() == OrderStatus::PendingCancel
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OrderCore {
    pub events: Vec<OrderEvent>,
    pub commissions: HashMap<Currency, Money>,
    pub venue_order_ids: Vec<VenueOrderId>,
    pub execution_ids: Vec<ExecutionId>,
    pub previous_status: Option<OrderStatus>,
    pub status: OrderStatus,
    pub trader_id: TraderId,
    pub strategy_id: StrategyId,
    pub instrument_id: InstrumentId,
    pub client_order_id: ClientOrderId,
    pub venue_order_id: Option<VenueOrderId>,
    pub position_id: Option<PositionId>,
    pub account_id: Option<AccountId>,
    pub last_execution_id: Option<ExecutionId>,
    pub side: OrderSide,
    pub order_type: OrderType,
    pub quantity: Quantity,
    pub time_in_force: TimeInForce,
    pub liquidity_side: Option<LiquiditySide>,
    pub is_reduce_only: bool,
    pub contingency_type: Option<ContingencyType>,
    pub order_list_id: Option<OrderListId>,
    pub linked_order_ids: Option<Vec<ClientOrderId>>,
    pub parent_order_id: Option<ClientOrderId>,
    pub tags: Option<Ustr>,
    pub filled_qty: Quantity,
    pub leaves_qty: Quantity,
    pub avg_px: Option<f64>,
    pub slippage: Option<f64>,
    pub init_id: UUID4,
    pub ts_init: UnixNanos,
    pub ts_last: UnixNanos,
}

impl OrderCore {
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        trader_id: TraderId,
        strategy_id: StrategyId,
        instrument_id: InstrumentId,
        client_order_id: ClientOrderId,
        order_side: OrderSide,
        order_type: OrderType,
        quantity: Quantity,
        time_in_force: TimeInForce,
        reduce_only: bool,
        contingency_type: Option<ContingencyType>,
        order_list_id: Option<OrderListId>,
        linked_order_ids: Option<Vec<ClientOrderId>>,
        parent_order_id: Option<ClientOrderId>,
        tags: Option<Ustr>,
        init_id: UUID4,
        ts_init: UnixNanos,
    ) -> Self {
        Self {
            events: Vec::new(),
            commissions: HashMap::new(),
            venue_order_ids: Vec::new(),
            execution_ids: Vec::new(),
            previous_status: None,
            status: OrderStatus::Initialized,
            trader_id,
            strategy_id,
            instrument_id,
            client_order_id,
            venue_order_id: None,
            position_id: None,
            account_id: None,
            last_execution_id: None,
            side: order_side,
            order_type,
            quantity,
            time_in_force,
            liquidity_side: None,
            is_reduce_only: reduce_only,
            contingency_type,
            order_list_id,
            linked_order_ids,
            parent_order_id,
            tags,
            filled_qty: Quantity::zero(quantity.precision),
            leaves_qty: quantity,
            avg_px: None,
            slippage: None,
            init_id,
            ts_init,
            ts_last: ts_init,
        }
    }

    /// Applies the given event, first validating against the state machine
    /// and the order invariants.
    ///
    /// # Errors
    ///
    /// Returns an error (leaving the order unchanged) if the transition is
    /// illegal, the event carries a duplicate `execution_id`, a fill would
    /// exceed the order quantity, or an update would set the quantity below
    /// the filled quantity.
    pub fn apply(&mut self, event: OrderEvent) -> Result<(), OrderError> {
        assert_eq!(self.client_order_id, event.client_order_id());
        assert_eq!(self.strategy_id, event.strategy_id());

        // Validate invariants before any mutation
        match &event {
            OrderEvent::OrderFilled(fill) => {
                if self.execution_ids.contains(&fill.execution_id) {
                    return Err(OrderError::DuplicateExecutionId(fill.execution_id));
                }
                if self.filled_qty + fill.last_qty > self.quantity {
                    return Err(OrderError::OverFill {
                        filled_qty: self.filled_qty + fill.last_qty,
                        quantity: self.quantity,
                    });
                }
            }
            OrderEvent::OrderUpdated(update) => {
                if update.quantity < self.filled_qty {
                    return Err(OrderError::UpdateBelowFilledQty {
                        quantity: update.quantity,
                        filled_qty: self.filled_qty,
                    });
                }
            }
            _ => {}
        }

        let new_status = match (self.status, &event) {
            // Restore the remembered pre-pending status on a venue accept
            // (an accept of a still-submitted order is a plain accept)
            (
                OrderStatus::PendingUpdate | OrderStatus::PendingCancel,
                OrderEvent::OrderAccepted(_),
            ) => {
                self.status.transition(&event)?;
                match self.previous_status.ok_or(OrderError::NoPreviousState)? {
                    OrderStatus::Submitted => OrderStatus::Accepted,
                    previous => previous,
                }
            }
            _ => self.status.transition(&event)?,
        };
        if matches!(
            new_status,
            OrderStatus::PendingUpdate | OrderStatus::PendingCancel
        ) && !matches!(
            self.status,
            OrderStatus::PendingUpdate | OrderStatus::PendingCancel
        ) {
            self.previous_status = Some(self.status);
        }
        self.status = new_status;

        match &event {
            OrderEvent::OrderInitialized(_) => return Err(OrderError::UnrecognizedEvent),
            OrderEvent::OrderDenied(event) => self.denied(event),
            OrderEvent::OrderSubmitted(event) => self.submitted(event),
            OrderEvent::OrderRejected(event) => self.rejected(event),
            OrderEvent::OrderAccepted(event) => self.accepted(event),
            OrderEvent::OrderPendingUpdate(event) => self.pending_update(event),
            OrderEvent::OrderPendingCancel(event) => self.pending_cancel(event),
            OrderEvent::OrderUpdated(event) => self.updated(event),
            OrderEvent::OrderTriggered(event) => self.triggered(event),
            OrderEvent::OrderCanceled(event) => self.canceled(event),
            OrderEvent::OrderExpired(event) => self.expired(event),
            OrderEvent::OrderFilled(event) => self.filled(event),
        }

        self.ts_last = event.ts_event();
        self.events.push(event);
        Ok(())
    }

    fn denied(&self, _event: &OrderDenied) {
        // Do nothing else
    }

    fn submitted(&mut self, event: &OrderSubmitted) {
        self.account_id = Some(event.account_id);
    }

    fn rejected(&self, _event: &OrderRejected) {
        // Do nothing else
    }

    fn accepted(&mut self, event: &OrderAccepted) {
        if self.venue_order_id != Some(event.venue_order_id) {
            self.venue_order_ids.push(event.venue_order_id);
        }
        self.venue_order_id = Some(event.venue_order_id);
    }

    fn pending_update(&self, _event: &OrderPendingUpdate) {
        // Do nothing else
    }

    fn pending_cancel(&self, _event: &OrderPendingCancel) {
        // Do nothing else
    }

    fn updated(&mut self, event: &OrderUpdated) {
        if let Some(venue_order_id) = &event.venue_order_id {
            if self.venue_order_id != Some(*venue_order_id) {
                self.venue_order_id = Some(*venue_order_id);
                self.venue_order_ids.push(*venue_order_id);
            }
        }
        self.quantity = event.quantity;
        self.leaves_qty = self.quantity - self.filled_qty;
    }

    fn triggered(&mut self, _event: &OrderTriggered) {}

    fn canceled(&mut self, _event: &OrderCanceled) {}

    fn expired(&mut self, _event: &OrderExpired) {}

    fn filled(&mut self, event: &OrderFilled) {
        self.set_avg_px(event.last_qty, event.last_px);
        self.venue_order_id = Some(event.venue_order_id);
        self.account_id = Some(event.account_id);
        self.position_id = event.position_id;
        self.execution_ids.push(event.execution_id);
        self.last_execution_id = Some(event.execution_id);
        self.liquidity_side = Some(event.liquidity_side);
        self.filled_qty += event.last_qty;
        self.leaves_qty -= event.last_qty;
        if let Some(commission) = event.commission {
            self.commissions
                .entry(commission.currency)
                .and_modify(|total| *total += commission)
                .or_insert(commission);
        }
        if self.filled_qty < self.quantity {
            self.status = OrderStatus::PartiallyFilled;
        }
    }

    fn set_avg_px(&mut self, last_qty: Quantity, last_px: Price) {
        // Quantity-weighted mean over the pre-fill filled quantity
        let filled_qty = self.filled_qty.as_f64();
        let total_qty = filled_qty + last_qty.as_f64();

        let avg_px = self
            .avg_px
            .unwrap_or(0.0)
            .mul_add(filled_qty, last_px.as_f64() * last_qty.as_f64())
            / total_qty;
        self.avg_px = Some(avg_px);
    }

    /// Sets the slippage given the passive `price`, signed by order side
    /// (positive when the average fill is worse than the passive price).
    pub fn set_slippage(&mut self, price: Price) {
        self.slippage = self.avg_px.map(|avg_px| match self.side {
            OrderSide::Buy => avg_px - price.as_f64(),
            OrderSide::Sell => price.as_f64() - avg_px,
            OrderSide::NoOrderSide => 0.0,
        });
    }

    #[must_use]
    pub fn opposite_side(side: OrderSide) -> OrderSide {
        match side {
            OrderSide::Buy => OrderSide::Sell,
            OrderSide::Sell => OrderSide::Buy,
            OrderSide::NoOrderSide => OrderSide::NoOrderSide,
        }
    }

    #[must_use]
    pub fn closing_side(side: PositionSide) -> OrderSide {
        match side {
            PositionSide::Long => OrderSide::Sell,
            PositionSide::Short => OrderSide::Buy,
            PositionSide::Flat | PositionSide::NoPositionSide => OrderSide::NoOrderSide,
        }
    }

    #[must_use]
    pub fn signed_decimal_qty(&self) -> Decimal {
        match self.side {
            OrderSide::Buy => self.quantity.as_decimal(),
            OrderSide::Sell => -self.quantity.as_decimal(),
            OrderSide::NoOrderSide => panic!("invalid order side"),
        }
    }

    #[must_use]
    pub fn would_reduce_only(&self, side: PositionSide, position_qty: Quantity) -> bool {
        if side == PositionSide::Flat {
            return false;
        }

        match (self.side, side) {
            (OrderSide::Buy, PositionSide::Long) => false,
            (OrderSide::Buy, PositionSide::Short) => self.leaves_qty <= position_qty,
            (OrderSide::Sell, PositionSide::Short) => false,
            (OrderSide::Sell, PositionSide::Long) => self.leaves_qty <= position_qty,
            _ => true,
        }
    }

    #[must_use]
    pub fn commission(&self, currency: &Currency) -> Option<Money> {
        self.commissions.get(currency).copied()
    }

    #[must_use]
    pub fn commissions(&self) -> HashMap<Currency, Money> {
        self.commissions.clone()
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::{
        events::order::{
            OrderAcceptedBuilder, OrderCanceledBuilder, OrderDeniedBuilder, OrderFilledBuilder,
            OrderInitializedBuilder, OrderPendingCancelBuilder, OrderPendingUpdateBuilder,
            OrderSubmittedBuilder, OrderTriggeredBuilder, OrderUpdatedBuilder,
        },
        orders::{limit::LimitOrder, market::MarketOrder, stop_market::StopMarketOrder},
    };

    fn filled_market_order_events() -> (OrderInitialized, OrderSubmitted, OrderAccepted) {
        let init = OrderInitializedBuilder::default().build();
        let submitted = OrderSubmittedBuilder::new(&init).build();
        let accepted = OrderAcceptedBuilder::new(&submitted).build();
        (init, submitted, accepted)
    }

    #[rstest]
    #[case(OrderSide::Buy, OrderSide::Sell)]
    #[case(OrderSide::Sell, OrderSide::Buy)]
    #[case(OrderSide::NoOrderSide, OrderSide::NoOrderSide)]
    fn test_order_opposite_side(#[case] order_side: OrderSide, #[case] expected_side: OrderSide) {
        assert_eq!(OrderCore::opposite_side(order_side), expected_side);
    }

    #[rstest]
    #[case(PositionSide::Long, OrderSide::Sell)]
    #[case(PositionSide::Short, OrderSide::Buy)]
    #[case(PositionSide::NoPositionSide, OrderSide::NoOrderSide)]
    fn test_closing_side(#[case] position_side: PositionSide, #[case] expected_side: OrderSide) {
        assert_eq!(OrderCore::closing_side(position_side), expected_side);
    }

    #[rstest]
    #[case(OrderSide::Buy, dec!(10_000))]
    #[case(OrderSide::Sell, dec!(-10_000))]
    fn test_signed_decimal_qty(#[case] order_side: OrderSide, #[case] expected: Decimal) {
        let order: MarketOrder = OrderInitializedBuilder::default()
            .order_side(order_side)
            .quantity(Quantity::from(10_000_u64))
            .build()
            .into();

        assert_eq!(order.signed_decimal_qty(), expected);
    }

    #[rustfmt::skip]
    #[rstest]
    #[case(OrderSide::Buy, Quantity::from(100_u64), PositionSide::Long, Quantity::from(50_u64), false)]
    #[case(OrderSide::Buy, Quantity::from(50_u64), PositionSide::Short, Quantity::from(50_u64), true)]
    #[case(OrderSide::Buy, Quantity::from(50_u64), PositionSide::Short, Quantity::from(100_u64), true)]
    #[case(OrderSide::Buy, Quantity::from(50_u64), PositionSide::Flat, Quantity::from(0_u64), false)]
    #[case(OrderSide::Sell, Quantity::from(50_u64), PositionSide::Flat, Quantity::from(0_u64), false)]
    #[case(OrderSide::Sell, Quantity::from(50_u64), PositionSide::Long, Quantity::from(50_u64), true)]
    #[case(OrderSide::Sell, Quantity::from(50_u64), PositionSide::Long, Quantity::from(100_u64), true)]
    #[case(OrderSide::Sell, Quantity::from(100_u64), PositionSide::Short, Quantity::from(50_u64), false)]
    fn test_would_reduce_only(
        #[case] order_side: OrderSide,
        #[case] order_qty: Quantity,
        #[case] position_side: PositionSide,
        #[case] position_qty: Quantity,
        #[case] expected: bool,
    ) {
        let order: MarketOrder = OrderInitializedBuilder::default()
            .order_side(order_side)
            .quantity(order_qty)
            .build()
            .into();

        assert_eq!(order.would_reduce_only(position_side, position_qty), expected);
    }

    #[rstest]
    fn test_order_state_transition_denied() {
        let init = OrderInitializedBuilder::default().build();
        let mut order: MarketOrder = init.clone().into();
        let denied = OrderDeniedBuilder::new(&init).build();
        let event = OrderEvent::OrderDenied(denied);

        order.apply(event.clone()).unwrap();

        assert_eq!(order.status(), OrderStatus::Denied);
        assert!(order.is_closed());
        assert!(!order.is_open());
        assert_eq!(order.event_count(), 2);
        assert_eq!(order.last_event(), &event);
    }

    #[rstest]
    fn test_order_life_cycle_to_filled() {
        let (init, submitted, accepted) = filled_market_order_events();
        let filled = OrderFilledBuilder::new(&init, &accepted).build();

        let mut order: MarketOrder = init.clone().into();
        order.apply(OrderEvent::OrderSubmitted(submitted)).unwrap();
        order.apply(OrderEvent::OrderAccepted(accepted)).unwrap();
        order.apply(OrderEvent::OrderFilled(filled)).unwrap();

        assert_eq!(order.client_order_id(), init.client_order_id);
        assert_eq!(order.status(), OrderStatus::Filled);
        assert_eq!(order.filled_qty(), Quantity::from(100_000_u64));
        assert_eq!(order.leaves_qty(), Quantity::from(0_u64));
        assert_eq!(order.avg_px(), Some(1.0));
        assert!(!order.is_open());
        assert!(order.is_closed());
        assert_eq!(order.commission(&Currency::USD()), None);
        assert_eq!(order.commissions(), HashMap::new());
    }

    #[rstest]
    fn test_illegal_transition_is_rejected_without_mutation() {
        let init = OrderInitializedBuilder::default().build();
        let mut order: MarketOrder = init.clone().into();
        let canceled = OrderCanceledBuilder::new(&init).build();

        // Cannot cancel an order which was never submitted
        let result = order.apply(OrderEvent::OrderCanceled(canceled));

        assert_eq!(result, Err(OrderError::InvalidStateTransition));
        assert_eq!(order.status(), OrderStatus::Initialized);
        assert_eq!(order.event_count(), 1);
    }

    #[rstest]
    fn test_duplicate_execution_id_rejected_with_state_unchanged() {
        let (init, submitted, accepted) = filled_market_order_events();
        let mut order: MarketOrder = init.clone().into();
        order.apply(OrderEvent::OrderSubmitted(submitted)).unwrap();
        order.apply(OrderEvent::OrderAccepted(accepted.clone())).unwrap();

        let fill1 = OrderFilledBuilder::new(&init, &accepted)
            .execution_id(ExecutionId::new("E-1"))
            .last_qty(Quantity::from(40_000_u64))
            .build();
        order.apply(OrderEvent::OrderFilled(fill1.clone())).unwrap();
        assert_eq!(order.status(), OrderStatus::PartiallyFilled);

        let result = order.apply(OrderEvent::OrderFilled(fill1));

        assert_eq!(
            result,
            Err(OrderError::DuplicateExecutionId(ExecutionId::new("E-1")))
        );
        assert_eq!(order.status(), OrderStatus::PartiallyFilled);
        assert_eq!(order.filled_qty(), Quantity::from(40_000_u64));
        assert_eq!(order.event_count(), 4);
    }

    #[rstest]
    fn test_fsm_scenario_partial_fills_to_filled() {
        // Limit BUY 10 @ 100.00, filled 4 @ 100.10 then 6 @ 100.20
        let init = OrderInitializedBuilder::default()
            .order_type(OrderType::Limit)
            .quantity(Quantity::from(10_u64))
            .price(Price::new(100.00, 2))
            .build();
        let submitted = OrderSubmittedBuilder::new(&init).build();
        let accepted = OrderAcceptedBuilder::new(&submitted).build();

        let mut order = LimitOrder::from(init.clone());
        order.apply(OrderEvent::OrderSubmitted(submitted)).unwrap();
        order.apply(OrderEvent::OrderAccepted(accepted.clone())).unwrap();

        let fill1 = OrderFilledBuilder::new(&init, &accepted)
            .execution_id(ExecutionId::new("E-1"))
            .last_qty(Quantity::from(4_u64))
            .last_px(Price::new(100.10, 2))
            .build();
        order.apply(OrderEvent::OrderFilled(fill1)).unwrap();

        assert_eq!(order.status(), OrderStatus::PartiallyFilled);
        assert_eq!(order.filled_qty(), Quantity::from(4_u64));
        assert_eq!(order.leaves_qty(), Quantity::from(6_u64));

        let fill2 = OrderFilledBuilder::new(&init, &accepted)
            .execution_id(ExecutionId::new("E-2"))
            .last_qty(Quantity::from(6_u64))
            .last_px(Price::new(100.20, 2))
            .build();
        order.apply(OrderEvent::OrderFilled(fill2)).unwrap();

        assert_eq!(order.status(), OrderStatus::Filled);
        assert_eq!(order.filled_qty(), Quantity::from(10_u64));
        assert_eq!(order.leaves_qty(), Quantity::from(0_u64));
        assert!((order.avg_px().unwrap() - 100.16).abs() < 1e-9);
        assert!((order.slippage().unwrap() - 0.16).abs() < 1e-9);
    }

    #[rstest]
    fn test_update_below_filled_qty_rejected() {
        let (init, submitted, accepted) = filled_market_order_events();
        let mut order: MarketOrder = init.clone().into();
        order.apply(OrderEvent::OrderSubmitted(submitted)).unwrap();
        order.apply(OrderEvent::OrderAccepted(accepted.clone())).unwrap();

        let fill = OrderFilledBuilder::new(&init, &accepted)
            .last_qty(Quantity::from(60_000_u64))
            .build();
        order.apply(OrderEvent::OrderFilled(fill)).unwrap();

        let update = OrderUpdatedBuilder::new(&init)
            .quantity(Quantity::from(50_000_u64))
            .build();
        let result = order.apply(OrderEvent::OrderUpdated(update));

        assert!(matches!(result, Err(OrderError::UpdateBelowFilledQty { .. })));
        assert_eq!(order.quantity(), Quantity::from(100_000_u64));
    }

    #[rstest]
    fn test_updated_reduces_quantity_and_leaves() {
        let (init, submitted, accepted) = filled_market_order_events();
        let mut order: MarketOrder = init.clone().into();
        order.apply(OrderEvent::OrderSubmitted(submitted)).unwrap();
        order.apply(OrderEvent::OrderAccepted(accepted)).unwrap();

        let update = OrderUpdatedBuilder::new(&init)
            .quantity(Quantity::from(80_000_u64))
            .build();
        order.apply(OrderEvent::OrderUpdated(update)).unwrap();

        assert_eq!(order.quantity(), Quantity::from(80_000_u64));
        assert_eq!(order.leaves_qty(), Quantity::from(80_000_u64));
        assert_eq!(order.status(), OrderStatus::Accepted);
    }

    #[rstest]
    fn test_pending_update_accept_rolls_back_to_accepted() {
        let (init, submitted, accepted) = filled_market_order_events();
        let mut order: MarketOrder = init.into();
        order.apply(OrderEvent::OrderSubmitted(submitted)).unwrap();
        order.apply(OrderEvent::OrderAccepted(accepted.clone())).unwrap();

        let pending = OrderPendingUpdateBuilder::new(&accepted).build();
        order.apply(OrderEvent::OrderPendingUpdate(pending)).unwrap();
        assert_eq!(order.status(), OrderStatus::PendingUpdate);
        assert!(order.is_pending_update());

        // Venue accept with no applied update rolls back
        order.apply(OrderEvent::OrderAccepted(accepted)).unwrap();

        assert_eq!(order.status(), OrderStatus::Accepted);
        assert!(order.is_open());
        assert!(!order.is_pending_update());
    }

    #[rstest]
    fn test_pending_update_accept_rolls_back_to_triggered() {
        let init = OrderInitializedBuilder::default()
            .order_type(OrderType::StopMarket)
            .trigger_price(Price::new(1.0, 5))
            .trigger_type(TriggerType::BidAsk)
            .time_in_force(TimeInForce::Gtc)
            .build();
        let submitted = OrderSubmittedBuilder::new(&init).build();
        let accepted = OrderAcceptedBuilder::new(&submitted).build();
        let mut order = StopMarketOrder::from(init);
        order.apply(OrderEvent::OrderSubmitted(submitted)).unwrap();
        order.apply(OrderEvent::OrderAccepted(accepted.clone())).unwrap();

        let triggered = OrderTriggeredBuilder::new(&accepted).build();
        order.apply(OrderEvent::OrderTriggered(triggered)).unwrap();
        assert_eq!(order.status(), OrderStatus::Triggered);

        let pending = OrderPendingUpdateBuilder::new(&accepted).build();
        order.apply(OrderEvent::OrderPendingUpdate(pending)).unwrap();
        assert_eq!(order.status(), OrderStatus::PendingUpdate);

        // The remembered pre-pending status survives through PENDING_UPDATE
        order.apply(OrderEvent::OrderAccepted(accepted)).unwrap();

        assert_eq!(order.status(), OrderStatus::Triggered);
        assert!(order.is_triggered);
        assert!(order.is_open());
    }

    #[rstest]
    fn test_pending_cancel_accept_from_submitted_resolves_to_accepted() {
        let init = OrderInitializedBuilder::default().build();
        let submitted = OrderSubmittedBuilder::new(&init).build();
        let mut order: MarketOrder = init.into();
        order
            .apply(OrderEvent::OrderSubmitted(submitted.clone()))
            .unwrap();

        let accepted = OrderAcceptedBuilder::new(&submitted).build();
        let pending = OrderPendingCancelBuilder::new(&accepted).build();
        order.apply(OrderEvent::OrderPendingCancel(pending)).unwrap();
        assert_eq!(order.status(), OrderStatus::PendingCancel);
        assert!(order.is_pending_cancel());

        // The cancel request failed and the venue accepted the order: a
        // remembered SUBMITTED resolves to a plain accept
        order.apply(OrderEvent::OrderAccepted(accepted.clone())).unwrap();

        assert_eq!(order.status(), OrderStatus::Accepted);
        assert_eq!(order.venue_order_id(), Some(accepted.venue_order_id));
        assert!(order.is_open());
    }

    #[rstest]
    fn test_overfill_rejected() {
        let (init, submitted, accepted) = filled_market_order_events();
        let mut order: MarketOrder = init.clone().into();
        order.apply(OrderEvent::OrderSubmitted(submitted)).unwrap();
        order.apply(OrderEvent::OrderAccepted(accepted.clone())).unwrap();

        let fill = OrderFilledBuilder::new(&init, &accepted)
            .last_qty(Quantity::from(100_001_u64))
            .build();
        let result = order.apply(OrderEvent::OrderFilled(fill));

        assert!(matches!(result, Err(OrderError::OverFill { .. })));
        assert_eq!(order.filled_qty(), Quantity::from(0_u64));
    }
}
