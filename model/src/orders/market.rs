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

/// An order to buy or sell at the best available market price, executed
/// immediately against resting liquidity.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MarketOrder {
    core: OrderCore,
}

impl MarketOrder {
    /// Creates a new [`MarketOrder`].
    ///
    /// # Errors
    ///
    /// Returns an error if `quantity` is not positive, or if the time in
    /// force is `GTD` (market orders cannot rest until a date).
    #[allow(clippy::too_many_arguments)]
    pub fn new_checked(
        trader_id: TraderId,
        strategy_id: StrategyId,
        instrument_id: InstrumentId,
        client_order_id: ClientOrderId,
        order_side: OrderSide,
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
    ) -> anyhow::Result<Self> {
        check_positive_u64(quantity.raw, "`quantity` raw")?;
        check_predicate_true(
            time_in_force != TimeInForce::Gtd,
            "`GTD` not supported for `MarketOrder`",
        )?;
        let mut order = Self {
            core: OrderCore::new(
                trader_id,
                strategy_id,
                instrument_id,
                client_order_id,
                order_side,
                OrderType::Market,
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
        };
        let init = OrderInitialized::from(&order);
        order.core.events.push(OrderEvent::OrderInitialized(init));
        Ok(order)
    }

    /// Creates a new [`MarketOrder`].
    ///
    /// # Panics
    ///
    /// Panics if a correctness check fails (see [`MarketOrder::new_checked`]).
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        trader_id: TraderId,
        strategy_id: StrategyId,
        instrument_id: InstrumentId,
        client_order_id: ClientOrderId,
        order_side: OrderSide,
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
        Self::new_checked(
            trader_id,
            strategy_id,
            instrument_id,
            client_order_id,
            order_side,
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
        )
        .expect(FAILED)
    }
}

/// Provides a default [`MarketOrder`] used for testing.
impl Default for MarketOrder {
    fn default() -> Self {
        MarketOrder::new(
            TraderId::default(),
            StrategyId::default(),
            InstrumentId::default(),
            ClientOrderId::default(),
            OrderSide::Buy,
            Quantity::new(100_000.0, 0),
            TimeInForce::Day,
            false,
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

impl Deref for MarketOrder {
    type Target = OrderCore;

    fn deref(&self) -> &Self::Target {
        &self.core
    }
}

impl DerefMut for MarketOrder {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.core
    }
}

impl Order for MarketOrder {
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
        None
    }

    fn price(&self) -> Option<Price> {
        None
    }

    fn trigger_price(&self) -> Option<Price> {
        None
    }

    fn trigger_type(&self) -> Option<TriggerType> {
        None
    }

    fn liquidity_side(&self) -> Option<LiquiditySide> {
        self.liquidity_side
    }

    fn is_post_only(&self) -> bool {
        false
    }

    fn is_reduce_only(&self) -> bool {
        self.is_reduce_only
    }

    fn display_qty(&self) -> Option<Quantity> {
        None
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
            // Market orders execute immediately and cannot rest until a date
            OrderEvent::OrderExpired(_) => Err(OrderError::InvalidOrderEvent),
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

impl From<OrderInitialized> for MarketOrder {
    fn from(event: OrderInitialized) -> Self {
        MarketOrder::new(
            event.trader_id,
            event.strategy_id,
            event.instrument_id,
            event.client_order_id,
            event.order_side,
            event.quantity,
            event.time_in_force,
            event.reduce_only,
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

impl From<&MarketOrder> for OrderInitialized {
    fn from(order: &MarketOrder) -> Self {
        Self {
            trader_id: order.trader_id,
            strategy_id: order.strategy_id,
            instrument_id: order.instrument_id,
            client_order_id: order.client_order_id,
            order_side: order.side,
            order_type: order.order_type,
            quantity: order.quantity,
            price: None,
            trigger_price: None,
            trigger_type: None,
            time_in_force: order.time_in_force,
            expire_time: None,
            post_only: false,
            reduce_only: order.is_reduce_only,
            display_qty: None,
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

    #[rstest]
    fn test_initialize() {
        let order = MarketOrder::default();
        assert_eq!(order.status(), OrderStatus::Initialized);
        assert_eq!(order.event_count(), 1);
        assert!(matches!(
            order.last_event(),
            OrderEvent::OrderInitialized(_)
        ));
        assert!(order.is_aggressive());
        assert!(!order.is_passive());
    }

    #[rstest]
    fn test_gtd_not_supported() {
        let result = MarketOrder::new_checked(
            TraderId::default(),
            StrategyId::default(),
            InstrumentId::default(),
            ClientOrderId::default(),
            OrderSide::Buy,
            Quantity::new(100_000.0, 0),
            TimeInForce::Gtd,
            false,
            None,
            None,
            None,
            None,
            None,
            UUID4::new(),
            0,
        );
        assert!(result.is_err());
    }

    #[rstest]
    fn test_from_initialized_round_trip() {
        let order = MarketOrder::default();
        let init = OrderInitialized::from(&order);
        let rebuilt = MarketOrder::from(init.clone());
        assert_eq!(OrderInitialized::from(&rebuilt), init);
    }
}
