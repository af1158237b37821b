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

use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};
use sextant_core::{
    correctness::{check_positive_u64, check_predicate_true, FAILED},
    time::UnixNanos,
    uuid::UUID4,
};
use ustr::Ustr;

use super::base::{Order, OrderCore, OrderError};
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

/// A conditional order which becomes a limit order at `price` once its
/// trigger price is breached.
///
/// Before the trigger fires, an update's price routes to the trigger; after
/// it fires, the trigger is frozen and an update's price routes to the
/// resting limit.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StopLimitOrder {
    core: OrderCore,
    pub price: Price,
    pub trigger_price: Price,
    pub trigger_type: TriggerType,
    pub expire_time: Option<UnixNanos>,
    pub is_post_only: bool,
    pub display_qty: Option<Quantity>,
    pub is_triggered: bool,
    pub ts_triggered: Option<UnixNanos>,
}

impl StopLimitOrder {
    /// Creates a new [`StopLimitOrder`].
    ///
    /// # Errors
    ///
    /// Returns an error if `quantity` is not positive, if `display_qty`
    /// exceeds `quantity`, or if the time in force is `GTD` without an
    /// `expire_time`.
    #[allow(clippy::too_many_arguments)]
    pub fn new_checked(
        trader_id: TraderId,
        strategy_id: StrategyId,
        instrument_id: InstrumentId,
        client_order_id: ClientOrderId,
        order_side: OrderSide,
        quantity: Quantity,
        price: Price,
        trigger_price: Price,
        trigger_type: TriggerType,
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
        init_id: UUID4,
        ts_init: UnixNanos,
    ) -> anyhow::Result<Self> {
        check_positive_u64(quantity.raw, "`quantity` raw")?;
        if let Some(display_qty) = display_qty {
            check_predicate_true(
                display_qty <= quantity,
                "`display_qty` greater than `quantity`",
            )?;
        }
        if time_in_force == TimeInForce::Gtd {
            check_predicate_true(
                expire_time.is_some(),
                "`expire_time` is required for `GTD` order",
            )?;
        }
        let mut order = Self {
            core: OrderCore::new(
                trader_id,
                strategy_id,
                instrument_id,
                client_order_id,
                order_side,
                OrderType::StopLimit,
                quantity,
                time_in_force,
                reduce_only,
                contingency_type,
                order_list_id,
                linked_order_ids,
                parent_order_id,
                tags,
                init_id,
                ts_init,
            ),
            price,
            trigger_price,
            trigger_type,
            expire_time,
            is_post_only: post_only,
            display_qty,
            is_triggered: false,
            ts_triggered: None,
        };
        let init = OrderInitialized::from(&order);
        order.core.events.push(OrderEvent::OrderInitialized(init));
        Ok(order)
    }

    /// Creates a new [`StopLimitOrder`].
    ///
    /// # Panics
    ///
    /// Panics if a correctness check fails (see
    /// [`StopLimitOrder::new_checked`]).
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        trader_id: TraderId,
        strategy_id: StrategyId,
        instrument_id: InstrumentId,
        client_order_id: ClientOrderId,
        order_side: OrderSide,
        quantity: Quantity,
        price: Price,
        trigger_price: Price,
        trigger_type: TriggerType,
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
        init_id: UUID4,
        ts_init: UnixNanos,
    ) -> Self {
        Self::new_checked(
            trader_id,
            strategy_id,
            instrument_id,
            client_order_id,
            order_side,
            quantity,
            price,
            trigger_price,
            trigger_type,
            time_in_force,
            expire_time,
            post_only,
            reduce_only,
            display_qty,
            contingency_type,
            order_list_id,
            linked_order_ids,
            parent_order_id,
            tags,
            init_id,
            ts_init,
        )
        .expect(FAILED)
    }
}

/// Provides a default [`StopLimitOrder`] used for testing.
impl Default for StopLimitOrder {
    fn default() -> Self {
        StopLimitOrder::new(
            TraderId::default(),
            StrategyId::default(),
            InstrumentId::default(),
            ClientOrderId::default(),
            OrderSide::Buy,
            Quantity::new(100_000.0, 0),
            Price::new(1.0, 5),
            Price::new(1.1, 5),
            TriggerType::BidAsk,
            TimeInForce::Gtc,
            None,
            false,
            false,
            None,
            None,
            None,
            None,
            None,
            None,
            UUID4::new(),
            0,
        )
    }
}

impl Deref for StopLimitOrder {
    type Target = OrderCore;

    fn deref(&self) -> &Self::Target {
        &self.core
    }
}

impl DerefMut for StopLimitOrder {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.core
    }
}

impl Order for StopLimitOrder {
    fn status(&self) -> OrderStatus {
        self.status
    }

    fn trader_id(&self) -> TraderId {
        self.trader_id
    }

    fn strategy_id(&self) -> StrategyId {
        self.strategy_id
    }

    fn instrument_id(&self) -> InstrumentId {
        self.instrument_id
    }

    fn client_order_id(&self) -> ClientOrderId {
        self.client_order_id
    }

    fn venue_order_id(&self) -> Option<VenueOrderId> {
        self.venue_order_id
    }

    fn position_id(&self) -> Option<PositionId> {
        self.position_id
    }

    fn account_id(&self) -> Option<AccountId> {
        self.account_id
    }

    fn last_execution_id(&self) -> Option<ExecutionId> {
        self.last_execution_id
    }

    fn side(&self) -> OrderSide {
        self.side
    }

    fn order_type(&self) -> OrderType {
        self.order_type
    }

    fn quantity(&self) -> Quantity {
        self.quantity
    }

    fn time_in_force(&self) -> TimeInForce {
        self.time_in_force
    }

    fn expire_time(&self) -> Option<UnixNanos> {
        self.expire_time
    }

    fn price(&self) -> Option<Price> {
        Some(self.price)
    }

    fn trigger_price(&self) -> Option<Price> {
        Some(self.trigger_price)
    }

    fn trigger_type(&self) -> Option<TriggerType> {
        Some(self.trigger_type)
    }

    fn liquidity_side(&self) -> Option<LiquiditySide> {
        self.liquidity_side
    }

    fn is_post_only(&self) -> bool {
        self.is_post_only
    }

    fn is_reduce_only(&self) -> bool {
        self.is_reduce_only
    }

    fn display_qty(&self) -> Option<Quantity> {
        self.display_qty
    }

    fn contingency_type(&self) -> Option<ContingencyType> {
        self.contingency_type
    }

    fn order_list_id(&self) -> Option<OrderListId> {
        self.order_list_id
    }

    fn linked_order_ids(&self) -> Option<Vec<ClientOrderId>> {
        self.linked_order_ids.clone()
    }

    fn parent_order_id(&self) -> Option<ClientOrderId> {
        self.parent_order_id
    }

    fn tags(&self) -> Option<Ustr> {
        self.tags
    }

    fn filled_qty(&self) -> Quantity {
        self.filled_qty
    }

    fn leaves_qty(&self) -> Quantity {
        self.leaves_qty
    }

    fn avg_px(&self) -> Option<f64> {
        self.avg_px
    }

    fn slippage(&self) -> Option<f64> {
        self.slippage
    }

    fn init_id(&self) -> UUID4 {
        self.init_id
    }

    fn ts_init(&self) -> UnixNanos {
        self.ts_init
    }

    fn ts_last(&self) -> UnixNanos {
        self.ts_last
    }

    fn apply(&mut self, event: OrderEvent) -> Result<(), OrderError> {
        match &event {
            OrderEvent::OrderUpdated(updated) => {
                let price = updated.price;
                let trigger_price = updated.trigger_price;
                self.core.apply(event)?;
                if self.is_triggered {
                    // Trigger is frozen; price updates the resting limit
                    if let Some(price) = price {
                        self.price = price;
                    }
                } else {
                    match (trigger_price, price) {
                        (Some(trigger_price), Some(price)) => {
                            self.trigger_price = trigger_price;
                            self.price = price;
                        }
                        (Some(trigger_price), None) => self.trigger_price = trigger_price,
                        // A bare price re-quotes the stop before it fires
                        (None, Some(price)) => self.trigger_price = price,
                        (None, None) => {}
                    }
                }
                Ok(())
            }
            OrderEvent::OrderTriggered(triggered) => {
                let ts_event = triggered.ts_event;
                self.core.apply(event)?;
                self.is_triggered = true;
                self.ts_triggered = Some(ts_event);
                Ok(())
            }
            OrderEvent::OrderExpired(expired) => {
                if self.time_in_force != TimeInForce::Gtd {
                    return Err(OrderError::InvalidOrderEvent);
                }
                match self.expire_time {
                    Some(expire_time) if expired.ts_event >= expire_time => self.core.apply(event),
                    _ => Err(OrderError::InvalidOrderEvent),
                }
            }
            OrderEvent::OrderFilled(_) => {
                self.core.apply(event)?;
                let price = self.price;
                self.core.set_slippage(price);
                Ok(())
            }
            _ => self.core.apply(event),
        }
    }

    fn events(&self) -> Vec<&OrderEvent> {
        self.events.iter().collect()
    }

    fn execution_ids(&self) -> Vec<&ExecutionId> {
        self.execution_ids.iter().collect()
    }
}

impl From<OrderInitialized> for StopLimitOrder {
    fn from(event: OrderInitialized) -> Self {
        StopLimitOrder::new(
            event.trader_id,
            event.strategy_id,
            event.instrument_id,
            event.client_order_id,
            event.order_side,
            event.quantity,
            event
                .price
                .expect("Error initializing order: `price` was `None` for `StopLimitOrder`"),
            event.trigger_price.expect(
                "Error initializing order: `trigger_price` was `None` for `StopLimitOrder`",
            ),
            event
                .trigger_type
                .expect("Error initializing order: `trigger_type` was `None` for `StopLimitOrder`"),
            event.time_in_force,
            event.expire_time,
            event.post_only,
            event.reduce_only,
            event.display_qty,
            event.contingency_type,
            event.order_list_id,
            event.linked_order_ids,
            event.parent_order_id,
            event.tags,
            event.event_id,
            event.ts_event,
        )
    }
}

impl From<&StopLimitOrder> for OrderInitialized {
    fn from(order: &StopLimitOrder) -> Self {
        Self {
            trader_id: order.trader_id,
            strategy_id: order.strategy_id,
            instrument_id: order.instrument_id,
            client_order_id: order.client_order_id,
            order_side: order.side,
            order_type: order.order_type,
            quantity: order.quantity,
            price: Some(order.price),
            trigger_price: Some(order.trigger_price),
            trigger_type: Some(order.trigger_type),
            time_in_force: order.time_in_force,
            expire_time: order.expire_time,
            post_only: order.is_post_only,
            reduce_only: order.is_reduce_only,
            display_qty: order.display_qty,
            contingency_type: order.contingency_type,
            order_list_id: order.order_list_id,
            linked_order_ids: order.linked_order_ids.clone(),
            parent_order_id: order.parent_order_id,
            tags: order.tags,
            event_id: order.init_id,
            ts_event: order.ts_init,
            ts_init: order.ts_init,
            reconciliation: false,
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
    use crate::events::order::{
        OrderAccepted, OrderAcceptedBuilder, OrderInitializedBuilder, OrderSubmittedBuilder,
        OrderTriggeredBuilder, OrderUpdatedBuilder,
    };

    fn accepted_stop_limit() -> (OrderInitialized, OrderAccepted, StopLimitOrder) {
        let init = OrderInitializedBuilder::default()
            .order_type(OrderType::StopLimit)
            .price(Price::new(1.0, 5))
            .trigger_price(Price::new(1.1, 5))
            .trigger_type(TriggerType::BidAsk)
            .time_in_force(TimeInForce::Gtc)
            .build();
        let submitted = OrderSubmittedBuilder::new(&init).build();
        let accepted = OrderAcceptedBuilder::new(&submitted).build();
        let mut order = StopLimitOrder::from(init.clone());
        order
            .apply(OrderEvent::OrderSubmitted(submitted))
            .unwrap();
        order
            .apply(OrderEvent::OrderAccepted(accepted.clone()))
            .unwrap();
        (init, accepted, order)
    }

    #[rstest]
    fn test_updated_routes_price_to_trigger_before_trigger() {
        let (init, _accepted, mut order) = accepted_stop_limit();

        let updated = OrderUpdatedBuilder::new(&init)
            .price(Price::new(1.2, 5))
            .build();
        order.apply(OrderEvent::OrderUpdated(updated)).unwrap();

        assert_eq!(order.trigger_price, Price::new(1.2, 5));
        assert_eq!(order.price, Price::new(1.0, 5));
    }

    #[rstest]
    fn test_updated_routes_price_to_limit_after_trigger() {
        let (init, accepted, mut order) = accepted_stop_limit();

        let triggered = OrderTriggeredBuilder::new(&accepted).build();
        order.apply(OrderEvent::OrderTriggered(triggered)).unwrap();
        assert!(order.is_triggered);

        let updated = OrderUpdatedBuilder::new(&init)
            .price(Price::new(1.3, 5))
            .build();
        order.apply(OrderEvent::OrderUpdated(updated)).unwrap();

        assert_eq!(order.price, Price::new(1.3, 5));
        assert_eq!(order.trigger_price, Price::new(1.1, 5));
    }

    #[rstest]
    fn test_updated_touches_both_before_trigger() {
        let (init, _accepted, mut order) = accepted_stop_limit();

        let updated = OrderUpdatedBuilder::new(&init)
            .price(Price::new(1.05, 5))
            .trigger_price(Price::new(1.15, 5))
            .build();
        order.apply(OrderEvent::OrderUpdated(updated)).unwrap();

        assert_eq!(order.trigger_price, Price::new(1.15, 5));
        assert_eq!(order.price, Price::new(1.05, 5));
    }
}
