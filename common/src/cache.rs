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

//! The in-memory cache: id-keyed registries owning the domain aggregates.
//!
//! Orders and positions refer to each other only by identifier; all lookups
//! go through the cache, which holds exclusive ownership per aggregate.
//! Instruments must be registered before any tick referencing them arrives.

use std::collections::{HashMap, HashSet};

use sextant_model::{
    identifiers::{
        client_order_id::ClientOrderId, instrument_id::InstrumentId, position_id::PositionId,
        venue_order_id::VenueOrderId,
    },
    instruments::{Instrument, InstrumentAny},
    orders::{any::OrderAny, base::Order},
    position::Position,
};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CacheError {
    #[error("Instrument {0} not registered")]
    InstrumentNotFound(InstrumentId),
    #[error("Order {0} not found")]
    OrderNotFound(ClientOrderId),
    #[error("Position {0} not found")]
    PositionNotFound(PositionId),
    #[error("Duplicate client order ID {0}")]
    DuplicateClientOrderId(ClientOrderId),
    #[error("Duplicate position ID {0}")]
    DuplicatePositionId(PositionId),
}

/// Provides id-keyed storage and indexes for instruments, orders and
/// positions within a single trading session.
#[derive(Default)]
pub struct Cache {
    instruments: HashMap<InstrumentId, InstrumentAny>,
    orders: HashMap<ClientOrderId, OrderAny>,
    positions: HashMap<PositionId, Position>,
    index_venue_order_ids: HashMap<VenueOrderId, ClientOrderId>,
    index_instrument_positions: HashMap<InstrumentId, HashSet<PositionId>>,
}

impl Cache {
    /// Creates a new, empty [`Cache`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the given instrument, replacing any prior definition.
    pub fn add_instrument(&mut self, instrument: InstrumentAny) {
        self.instruments.insert(*instrument.id(), instrument);
    }

    /// Returns the registered instrument for the given ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the instrument was never registered.
    pub fn instrument(&self, instrument_id: &InstrumentId) -> Result<&InstrumentAny, CacheError> {
        self.instruments
            .get(instrument_id)
            .ok_or(CacheError::InstrumentNotFound(*instrument_id))
    }

    /// Adds the given order to the cache.
    ///
    /// # Errors
    ///
    /// Returns an error if an order with the same client order ID exists.
    pub fn add_order(&mut self, order: OrderAny) -> Result<(), CacheError> {
        let client_order_id = order.client_order_id();
        if self.orders.contains_key(&client_order_id) {
            return Err(CacheError::DuplicateClientOrderId(client_order_id));
        }
        if let Some(venue_order_id) = order.venue_order_id() {
            self.index_venue_order_ids
                .insert(venue_order_id, client_order_id);
        }
        self.orders.insert(client_order_id, order);
        Ok(())
    }

    /// Returns the order for the given client order ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the order is absent.
    pub fn order(&self, client_order_id: &ClientOrderId) -> Result<&OrderAny, CacheError> {
        self.orders
            .get(client_order_id)
            .ok_or(CacheError::OrderNotFound(*client_order_id))
    }

    /// Returns a mutable reference to the order for the given client order
    /// ID. Call [`Cache::update_order_index`] after applying events which
    /// assign a venue order ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the order is absent.
    pub fn order_mut(
        &mut self,
        client_order_id: &ClientOrderId,
    ) -> Result<&mut OrderAny, CacheError> {
        self.orders
            .get_mut(client_order_id)
            .ok_or(CacheError::OrderNotFound(*client_order_id))
    }

    /// Re-indexes the venue order ID of the given order.
    ///
    /// # Errors
    ///
    /// Returns an error if the order is absent.
    pub fn update_order_index(&mut self, client_order_id: &ClientOrderId) -> Result<(), CacheError> {
        let order = self
            .orders
            .get(client_order_id)
            .ok_or(CacheError::OrderNotFound(*client_order_id))?;
        if let Some(venue_order_id) = order.venue_order_id() {
            self.index_venue_order_ids
                .insert(venue_order_id, *client_order_id);
        }
        Ok(())
    }

    /// Returns the order for the given venue order ID.
    ///
    /// # Errors
    ///
    /// Returns an error if no order is indexed for the ID.
    pub fn order_for_venue_order_id(
        &self,
        venue_order_id: &VenueOrderId,
    ) -> Result<&OrderAny, CacheError> {
        let client_order_id = self
            .index_venue_order_ids
            .get(venue_order_id)
            .ok_or_else(|| CacheError::OrderNotFound(ClientOrderId::new("UNKNOWN")))?;
        self.order(client_order_id)
    }

    #[must_use]
    pub fn orders_open_count(&self) -> usize {
        self.orders.values().filter(|order| order.is_open()).count()
    }

    /// Adds the given position to the cache and indexes it by instrument.
    ///
    /// # Errors
    ///
    /// Returns an error if a position with the same ID exists.
    pub fn add_position(&mut self, position: Position) -> Result<(), CacheError> {
        if self.positions.contains_key(&position.id) {
            return Err(CacheError::DuplicatePositionId(position.id));
        }
        self.index_instrument_positions
            .entry(position.instrument_id)
            .or_default()
            .insert(position.id);
        self.positions.insert(position.id, position);
        Ok(())
    }

    /// Returns the position for the given ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the position is absent.
    pub fn position(&self, position_id: &PositionId) -> Result<&Position, CacheError> {
        self.positions
            .get(position_id)
            .ok_or(CacheError::PositionNotFound(*position_id))
    }

    /// Returns a mutable reference to the position for the given ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the position is absent.
    pub fn position_mut(&mut self, position_id: &PositionId) -> Result<&mut Position, CacheError> {
        self.positions
            .get_mut(position_id)
            .ok_or(CacheError::PositionNotFound(*position_id))
    }

    /// Returns the IDs of open positions for the given instrument.
    #[must_use]
    pub fn position_ids_open(&self, instrument_id: &InstrumentId) -> Vec<PositionId> {
        self.index_instrument_positions
            .get(instrument_id)
            .map(|ids| {
                ids.iter()
                    .filter(|id| self.positions.get(*id).is_some_and(Position::is_open))
                    .copied()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Returns the IDs of closed positions for the given instrument.
    #[must_use]
    pub fn position_ids_closed(&self, instrument_id: &InstrumentId) -> Vec<PositionId> {
        self.index_instrument_positions
            .get(instrument_id)
            .map(|ids| {
                ids.iter()
                    .filter(|id| self.positions.get(*id).is_some_and(Position::is_closed))
                    .copied()
                    .collect()
            })
            .unwrap_or_default()
    }
}
