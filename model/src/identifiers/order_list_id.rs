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

use std::fmt::{Debug, Display, Formatter};

use sextant_core::correctness::{check_valid_string, FAILED};
use ustr::Ustr;

use super::impl_serialization_for_identifier;

/// A valid order list ID, grouping contingent orders.
#[repr(C)]
#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct OrderListId {
    pub value: Ustr,
}

impl OrderListId {
    /// Creates a new [`OrderListId`].
    ///
    /// # Errors
    ///
    /// Returns an error if `s` is not a valid string.
    pub fn new_checked(s: &str) -> anyhow::Result<Self> {
        check_valid_string(s, "`OrderListId` value")?;
        Ok(Self {
            value: Ustr::from(s),
        })
    }

    /// Creates a new [`OrderListId`].
    ///
    /// # Panics
    ///
    /// Panics if `s` is not a valid string.
    #[must_use]
    pub fn new(s: &str) -> Self {
        Self::new_checked(s).expect(FAILED)
    }
}

/// Provides a default [`OrderListId`] used for testing.
impl Default for OrderListId {
    fn default() -> Self {
        Self::new("OL-001")
    }
}

impl From<&str> for OrderListId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl Debug for OrderListId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.value)
    }
}

impl Display for OrderListId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl_serialization_for_identifier!(OrderListId);
