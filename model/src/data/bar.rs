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

use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use anyhow::{anyhow, Context};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sextant_core::{
    correctness::{check_predicate_true, FAILED},
    time::UnixNanos,
};

use crate::{
    enums::{AggregationSource, BarAggregation, PriceType},
    identifiers::instrument_id::InstrumentId,
    types::{price::Price, quantity::Quantity},
};

/// The aggregation method of a bar series: how many of which unit close a
/// bar, and which price basis feeds the builder.
#[repr(C)]
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct BarSpecification {
    /// The step count, volume, value or time units per bar.
    pub step: usize,
    /// The aggregation method.
    pub aggregation: BarAggregation,
    /// The price basis extracted from ticks.
    pub price_type: PriceType,
}

impl BarSpecification {
    /// Creates a new [`BarSpecification`].
    ///
    /// # Panics
    ///
    /// Panics if `step` is zero.
    #[must_use]
    pub fn new(step: usize, aggregation: BarAggregation, price_type: PriceType) -> Self {
        check_predicate_true(step > 0, "`step` was zero for `BarSpecification`").expect(FAILED);
        Self {
            step,
            aggregation,
            price_type,
        }
    }
}

impl Display for BarSpecification {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}-{}", self.step, self.aggregation, self.price_type)
    }
}

/// The fully-qualified type of a bar series:
/// `{instrument_id}-{step}-{aggregation}-{price_type}-{INTERNAL|EXTERNAL}`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct BarType {
    /// The instrument the series is built over.
    pub instrument_id: InstrumentId,
    /// The aggregation specification.
    pub spec: BarSpecification,
    /// Whether the platform builds the bars or the venue delivers them.
    pub aggregation_source: AggregationSource,
}

impl BarType {
    /// Creates a new [`BarType`].
    #[must_use]
    pub fn new(
        instrument_id: InstrumentId,
        spec: BarSpecification,
        aggregation_source: AggregationSource,
    ) -> Self {
        Self {
            instrument_id,
            spec,
            aggregation_source,
        }
    }
}

impl FromStr for BarType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Fields are taken from the right; the instrument ID may itself
        // contain hyphens
        let pieces: Vec<&str> = s.rsplitn(5, '-').collect();
        if pieces.len() != 5 {
            return Err(anyhow!(
                "Error parsing `BarType` from '{s}': expected \
                 '{{instrument_id}}-{{step}}-{{aggregation}}-{{price_type}}-{{source}}'"
            ));
        }
        let instrument_id = InstrumentId::from_str(pieces[4])?;
        let step = pieces[3]
            .parse::<usize>()
            .with_context(|| format!("Error parsing `BarType` step from '{}'", pieces[3]))?;
        if step == 0 {
            return Err(anyhow!("Error parsing `BarType` from '{s}': `step` was zero"));
        }
        let aggregation = BarAggregation::from_str(pieces[2])
            .map_err(|_| anyhow!("Error parsing `BarAggregation` from '{}'", pieces[2]))?;
        let price_type = PriceType::from_str(pieces[1])
            .map_err(|_| anyhow!("Error parsing `PriceType` from '{}'", pieces[1]))?;
        let aggregation_source = AggregationSource::from_str(pieces[0])
            .map_err(|_| anyhow!("Error parsing `AggregationSource` from '{}'", pieces[0]))?;

        Ok(Self {
            instrument_id,
            spec: BarSpecification::new(step, aggregation, price_type),
            aggregation_source,
        })
    }
}

impl From<&str> for BarType {
    fn from(value: &str) -> Self {
        Self::from_str(value).expect(FAILED)
    }
}

impl Display for BarType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}-{}-{}",
            self.instrument_id, self.spec, self.aggregation_source,
        )
    }
}

impl Serialize for BarType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for BarType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Self::from_str(&value).map_err(serde::de::Error::custom)
    }
}

/// An aggregated open-high-low-close-volume bar, immutable once emitted.
#[repr(C)]
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bar {
    pub bar_type: BarType,
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,
    pub volume: Quantity,
    pub ts_event: UnixNanos,
    pub ts_init: UnixNanos,
}

impl Bar {
    /// Creates a new [`Bar`].
    ///
    /// # Errors
    ///
    /// Returns an error if the OHLC ordering is violated
    /// (`low <= open, close <= high` must hold).
    #[allow(clippy::too_many_arguments)]
    pub fn new_checked(
        bar_type: BarType,
        open: Price,
        high: Price,
        low: Price,
        close: Price,
        volume: Quantity,
        ts_event: UnixNanos,
        ts_init: UnixNanos,
    ) -> anyhow::Result<Self> {
        check_predicate_true(high >= low, "`high` below `low`")?;
        check_predicate_true(high >= open && high >= close, "`high` below `open`/`close`")?;
        check_predicate_true(low <= open && low <= close, "`low` above `open`/`close`")?;
        Ok(Self {
            bar_type,
            open,
            high,
            low,
            close,
            volume,
            ts_event,
            ts_init,
        })
    }

    /// Creates a new [`Bar`].
    ///
    /// # Panics
    ///
    /// Panics if a correctness check fails (see [`Bar::new_checked`]).
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        bar_type: BarType,
        open: Price,
        high: Price,
        low: Price,
        close: Price,
        volume: Quantity,
        ts_event: UnixNanos,
        ts_init: UnixNanos,
    ) -> Self {
        Self::new_checked(bar_type, open, high, low, close, volume, ts_event, ts_init)
            .expect(FAILED)
    }
}

impl Display for Bar {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{},{},{},{},{},{},{}",
            self.bar_type, self.open, self.high, self.low, self.close, self.volume, self.ts_event,
        )
    }
}
