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

//! Market data atoms: quote and trade ticks, order book deltas and
//! snapshots, and aggregated bars.

pub mod bar;
pub mod delta;
pub mod quote;
pub mod trade;

pub use bar::{Bar, BarSpecification, BarType};
pub use delta::{BookOrder, OrderBookDelta, OrderBookDeltas, OrderBookSnapshot};
pub use quote::QuoteTick;
pub use trade::TradeTick;
