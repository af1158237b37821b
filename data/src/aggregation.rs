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

//! Bar aggregation machines.
//!
//! Each aggregator consumes ticks through a shared [`BarBuilder`] and emits
//! completed bars through its handler. Ticks must arrive with non-decreasing
//! `ts_event`; out-of-order ticks are dropped.

use std::{cell::RefCell, rc::Rc};

use anyhow::bail;
use sextant_common::{clock::Clock, timer::TimeEvent};
use sextant_core::{datetime::NANOSECONDS_IN_SECOND, time::UnixNanos};
use sextant_model::{
    data::{Bar, BarSpecification, BarType, QuoteTick, TradeTick},
    enums::BarAggregation,
    instruments::Instrument,
    types::{fixed::FIXED_SCALAR, price::Price, quantity::Quantity},
};

/// Accumulates the open-high-low-close-volume state of the bar under
/// construction.
///
/// On each build the close is carried forward as the next bar's initial
/// open/high/low, giving gapless series across updateless intervals.
#[derive(Debug)]
pub struct BarBuilder {
    bar_type: BarType,
    size_precision: u8,
    pub initialized: bool,
    pub ts_last: UnixNanos,
    pub count: usize,
    partial_set: bool,
    open: Option<Price>,
    high: Option<Price>,
    low: Option<Price>,
    close: Option<Price>,
    pub volume: Quantity,
}

impl BarBuilder {
    /// Creates a new [`BarBuilder`].
    #[must_use]
    pub fn new(bar_type: BarType, size_precision: u8) -> Self {
        Self {
            bar_type,
            size_precision,
            initialized: false,
            ts_last: 0,
            count: 0,
            partial_set: false,
            open: None,
            high: None,
            low: None,
            close: None,
            volume: Quantity::zero(size_precision),
        }
    }

    /// Seeds the builder from a partially-complete bar. A second call is a
    /// no-op.
    pub fn set_partial(&mut self, partial_bar: Bar) {
        if self.partial_set {
            return; // Already updated
        }

        if self.open.is_none() {
            self.open = Some(partial_bar.open);
            self.high = Some(partial_bar.high);
            self.low = Some(partial_bar.low);
            self.close = Some(partial_bar.close);
            self.volume = partial_bar.volume;
            self.initialized = true;
            if partial_bar.ts_event > self.ts_last {
                self.ts_last = partial_bar.ts_event;
            }
        }

        self.partial_set = true;
    }

    /// Pushes a `(price, size, ts_event)` update into the bar under
    /// construction. Updates older than the last are dropped.
    pub fn update(&mut self, price: Price, size: Quantity, ts_event: UnixNanos) {
        if ts_event < self.ts_last {
            tracing::debug!(
                bar_type = %self.bar_type,
                ts_event,
                ts_last = self.ts_last,
                "Dropping out-of-order update",
            );
            return;
        }

        match self.high {
            Some(high) if price > high => self.high = Some(price),
            None => self.high = Some(price),
            _ => {}
        }
        match self.low {
            Some(low) if price < low => self.low = Some(price),
            None => self.low = Some(price),
            _ => {}
        }
        if self.open.is_none() {
            self.open = Some(price);
            self.initialized = true;
        }
        self.close = Some(price);
        self.volume += size;
        self.count += 1;
        self.ts_last = ts_event;
    }

    /// Builds the bar at the builder's last update time.
    #[must_use]
    pub fn build_now(&mut self) -> Bar {
        self.build(self.ts_last, self.ts_last)
    }

    /// Builds the bar then resets for the next, rolling
    /// `open/high/low = close` so an updateless interval yields a
    /// volume-zero carry-forward bar.
    ///
    /// # Panics
    ///
    /// Panics if the builder has never received a value.
    #[must_use]
    pub fn build(&mut self, ts_event: UnixNanos, ts_init: UnixNanos) -> Bar {
        // SAFETY: Aggregators only build once the builder is initialized
        let open = self.open.expect("no initial values to build bar");
        let high = self.high.expect("no initial values to build bar");
        let low = self.low.expect("no initial values to build bar");
        let close = self.close.expect("no initial values to build bar");

        let bar = Bar::new(
            self.bar_type,
            open,
            high,
            low,
            close,
            self.volume,
            ts_event,
            ts_init,
        );

        self.open = self.close;
        self.high = self.close;
        self.low = self.close;
        self.volume = Quantity::zero(self.size_precision);
        self.count = 0;

        bar
    }
}

/// The common machinery composed by every aggregator: a builder plus the
/// bar handler.
pub struct BarAggregatorCore<H: FnMut(Bar)> {
    bar_type: BarType,
    pub builder: BarBuilder,
    handler: H,
}

impl<H: FnMut(Bar)> BarAggregatorCore<H> {
    #[must_use]
    pub fn new(bar_type: BarType, size_precision: u8, handler: H) -> Self {
        Self {
            bar_type,
            builder: BarBuilder::new(bar_type, size_precision),
            handler,
        }
    }

    /// Seeds the builder from a partially-complete bar.
    pub fn set_partial(&mut self, partial_bar: Bar) {
        self.builder.set_partial(partial_bar);
    }

    fn apply_update(&mut self, price: Price, size: Quantity, ts_event: UnixNanos) {
        self.builder.update(price, size, ts_event);
    }

    fn build_now_and_send(&mut self) {
        let bar = self.builder.build_now();
        (self.handler)(bar);
    }

    fn build_and_send(&mut self, ts_event: UnixNanos, ts_init: UnixNanos) {
        let bar = self.builder.build(ts_event, ts_init);
        (self.handler)(bar);
    }
}

/// The common aggregator surface: push ticks in, get bars out via the
/// handler.
pub trait BarAggregator {
    fn bar_type(&self) -> BarType;

    /// Pushes a `(price, size, ts_event)` update into the aggregation.
    fn apply_update(&mut self, price: Price, size: Quantity, ts_event: UnixNanos);

    /// Pushes the given quote tick, extracting price and size by the bar
    /// type's configured price basis.
    fn handle_quote_tick(&mut self, quote: &QuoteTick) {
        let price_type = self.bar_type().spec.price_type;
        self.apply_update(
            quote.extract_price(price_type),
            quote.extract_size(price_type),
            quote.ts_event,
        );
    }

    /// Pushes the given trade tick.
    fn handle_trade_tick(&mut self, trade: &TradeTick) {
        self.apply_update(trade.price, trade.size, trade.ts_event);
    }
}

/// Closes a bar every `step` updates.
pub struct TickBarAggregator<H: FnMut(Bar)> {
    core: BarAggregatorCore<H>,
}

impl<H: FnMut(Bar)> TickBarAggregator<H> {
    /// Creates a new [`TickBarAggregator`].
    #[must_use]
    pub fn new<I: Instrument>(instrument: &I, bar_type: BarType, handler: H) -> Self {
        Self {
            core: BarAggregatorCore::new(bar_type, instrument.size_precision(), handler),
        }
    }
}

impl<H: FnMut(Bar)> BarAggregator for TickBarAggregator<H> {
    fn bar_type(&self) -> BarType {
        self.core.bar_type
    }

    fn apply_update(&mut self, price: Price, size: Quantity, ts_event: UnixNanos) {
        self.core.apply_update(price, size, ts_event);
        if self.core.builder.count == self.core.bar_type.spec.step {
            self.core.build_now_and_send();
        }
    }
}

/// Closes a bar once `step` volume has accumulated, splitting an update
/// which would overflow the threshold: the exact remainder is consumed into
/// the current bar and the residual continues at the same price and time.
pub struct VolumeBarAggregator<H: FnMut(Bar)> {
    core: BarAggregatorCore<H>,
    size_precision: u8,
}

impl<H: FnMut(Bar)> VolumeBarAggregator<H> {
    /// Creates a new [`VolumeBarAggregator`].
    #[must_use]
    pub fn new<I: Instrument>(instrument: &I, bar_type: BarType, handler: H) -> Self {
        Self {
            core: BarAggregatorCore::new(bar_type, instrument.size_precision(), handler),
            size_precision: instrument.size_precision(),
        }
    }
}

impl<H: FnMut(Bar)> BarAggregator for VolumeBarAggregator<H> {
    fn bar_type(&self) -> BarType {
        self.core.bar_type
    }

    fn apply_update(&mut self, price: Price, size: Quantity, ts_event: UnixNanos) {
        let mut raw_size_update = size.raw;
        let raw_step = self.core.bar_type.spec.step as u64 * FIXED_SCALAR as u64;

        while raw_size_update > 0 {
            let raw_size_diff = raw_step - self.core.builder.volume.raw;
            if raw_size_update < raw_size_diff {
                // Update went under threshold
                self.core.apply_update(
                    price,
                    Quantity::from_raw(raw_size_update, self.size_precision),
                    ts_event,
                );
                break;
            }

            // Update at or over threshold: consume the exact remainder
            self.core.apply_update(
                price,
                Quantity::from_raw(raw_size_diff, self.size_precision),
                ts_event,
            );
            self.core.build_now_and_send();
            raw_size_update -= raw_size_diff;
        }
    }
}

/// Closes a bar once `step` notional value (price * size) has accumulated,
/// splitting an update which would overflow the threshold.
pub struct ValueBarAggregator<H: FnMut(Bar)> {
    core: BarAggregatorCore<H>,
    size_precision: u8,
    cum_value: f64,
}

impl<H: FnMut(Bar)> ValueBarAggregator<H> {
    /// Creates a new [`ValueBarAggregator`].
    #[must_use]
    pub fn new<I: Instrument>(instrument: &I, bar_type: BarType, handler: H) -> Self {
        Self {
            core: BarAggregatorCore::new(bar_type, instrument.size_precision(), handler),
            size_precision: instrument.size_precision(),
            cum_value: 0.0,
        }
    }

    /// Returns the cumulative value of the bar under construction.
    #[must_use]
    pub fn get_cumulative_value(&self) -> f64 {
        self.cum_value
    }
}

impl<H: FnMut(Bar)> BarAggregator for ValueBarAggregator<H> {
    fn bar_type(&self) -> BarType {
        self.core.bar_type
    }

    fn apply_update(&mut self, price: Price, size: Quantity, ts_event: UnixNanos) {
        let mut size_update = size.as_f64();
        let step = self.core.bar_type.spec.step as f64;

        while size_update > 0.0 {
            let value_update = price.as_f64() * size_update;
            if self.cum_value + value_update < step {
                // Update went under threshold
                self.cum_value += value_update;
                self.core.apply_update(
                    price,
                    Quantity::new(size_update, self.size_precision),
                    ts_event,
                );
                break;
            }

            // Update at or over threshold: consume the proportional size
            let value_diff = step - self.cum_value;
            let size_diff = size_update * (value_diff / value_update);
            self.core.apply_update(
                price,
                Quantity::new(size_diff, self.size_precision),
                ts_event,
            );
            self.core.build_now_and_send();
            self.cum_value = 0.0;
            size_update -= size_diff;
        }
    }
}

/// Closes a bar on wall-time interval boundaries
/// (`{SECOND,MINUTE,HOUR,DAY} * step`), scheduled on a shared clock.
///
/// On an updateless boundary the default is to emit a volume-zero
/// carry-forward bar; with `build_with_no_updates` off, a
/// `build_on_next_tick` flag carrying the stored close time defers emission
/// until the next update arrives.
pub struct TimeBarAggregator<H: FnMut(Bar)> {
    core: BarAggregatorCore<H>,
    clock: Rc<RefCell<dyn Clock>>,
    build_with_no_updates: bool,
    build_on_next_tick: bool,
    stored_close_ns: UnixNanos,
    timer_name: String,
    interval_ns: u64,
    next_close_ns: UnixNanos,
}

impl<H: FnMut(Bar)> TimeBarAggregator<H> {
    /// Creates a new [`TimeBarAggregator`], registering its interval timer
    /// on the given clock (the timer is named after the bar type).
    ///
    /// # Errors
    ///
    /// Returns an error if the bar type is not time aggregated.
    pub fn new<I: Instrument>(
        instrument: &I,
        bar_type: BarType,
        handler: H,
        clock: Rc<RefCell<dyn Clock>>,
        build_with_no_updates: bool,
    ) -> anyhow::Result<Self> {
        if !bar_type.spec.aggregation.is_time_aggregated() {
            bail!(
                "Aggregation not time based, was {}",
                bar_type.spec.aggregation
            );
        }

        let interval_ns = get_interval_ns(&bar_type.spec);
        let timer_name = bar_type.to_string();

        let mut aggregator = Self {
            core: BarAggregatorCore::new(bar_type, instrument.size_precision(), handler),
            clock,
            build_with_no_updates,
            build_on_next_tick: false,
            stored_close_ns: 0,
            timer_name,
            interval_ns,
            next_close_ns: 0,
        };

        let start_time = aggregator.get_start_time();
        aggregator.clock.borrow_mut().set_timer_ns(
            &aggregator.timer_name,
            interval_ns,
            start_time,
            None,
            None,
        )?;
        aggregator.next_close_ns = start_time + interval_ns;

        Ok(aggregator)
    }

    /// Returns the current time aligned to the nearest lower interval
    /// boundary (intervals are anchored to the UTC epoch, so days start at
    /// midnight and hours at the top of the hour).
    #[must_use]
    pub fn get_start_time(&self) -> UnixNanos {
        let now = self.clock.borrow().timestamp_ns();
        now - (now % self.interval_ns)
    }

    /// Seeds the builder from a partially-complete bar.
    pub fn set_partial(&mut self, partial_bar: Bar) {
        self.core.set_partial(partial_bar);
    }

    /// Stops the aggregation, canceling the interval timer.
    pub fn stop(&mut self) {
        self.clock.borrow_mut().cancel_timer(&self.timer_name);
    }

    /// Handles the scheduled boundary [`TimeEvent`] fired by the clock.
    pub fn build_bar(&mut self, event: TimeEvent) {
        if event.ts_event < self.next_close_ns {
            // Boundary already built when an update straddled it
            return;
        }
        self.build_at_boundary();
    }

    fn build_at_boundary(&mut self) {
        if !self.core.builder.initialized {
            self.next_close_ns += self.interval_ns;
            return;
        }
        if self.core.builder.count == 0 && !self.build_with_no_updates {
            // Defer emission until the next update arrives
            self.build_on_next_tick = true;
            self.stored_close_ns = self.next_close_ns;
            self.next_close_ns += self.interval_ns;
            return;
        }

        let close_ns = self.next_close_ns;
        self.core.build_and_send(close_ns, close_ns);
        self.next_close_ns += self.interval_ns;
    }
}

impl<H: FnMut(Bar)> BarAggregator for TimeBarAggregator<H> {
    fn bar_type(&self) -> BarType {
        self.core.bar_type
    }

    fn apply_update(&mut self, price: Price, size: Quantity, ts_event: UnixNanos) {
        // Close any boundary this update straddles before applying
        while self.next_close_ns < ts_event {
            self.build_at_boundary();
        }
        if self.build_on_next_tick {
            let close_ns = self.stored_close_ns;
            self.core.build_and_send(close_ns, ts_event);
            self.build_on_next_tick = false;
        }
        self.core.apply_update(price, size, ts_event);
        if self.next_close_ns == ts_event {
            // An update exactly on the boundary belongs to the closing bar
            self.build_at_boundary();
        }
    }
}

fn get_interval_ns(spec: &BarSpecification) -> u64 {
    let step = spec.step as u64;
    match spec.aggregation {
        BarAggregation::Second => step * NANOSECONDS_IN_SECOND,
        BarAggregation::Minute => step * 60 * NANOSECONDS_IN_SECOND,
        BarAggregation::Hour => step * 3_600 * NANOSECONDS_IN_SECOND,
        BarAggregation::Day => step * 86_400 * NANOSECONDS_IN_SECOND,
        _ => panic!("Aggregation not time based, was {}", spec.aggregation),
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;
    use sextant_common::clock::TestClock;
    use sextant_model::instruments::CurrencyPair;

    use super::*;

    fn bar_type(s: &str) -> BarType {
        BarType::from(s)
    }

    fn collector() -> (Rc<RefCell<Vec<Bar>>>, impl FnMut(Bar)) {
        let bars: Rc<RefCell<Vec<Bar>>> = Rc::new(RefCell::new(Vec::new()));
        let bars_clone = bars.clone();
        (bars, move |bar: Bar| bars_clone.borrow_mut().push(bar))
    }

    #[rstest]
    fn test_builder_rejects_out_of_order_updates() {
        let mut builder = BarBuilder::new(bar_type("AUD/USD.SIM-3-TICK-MID-INTERNAL"), 0);
        builder.update(Price::new(1.00, 2), Quantity::from(1_u64), 1_000);
        builder.update(Price::new(9.99, 2), Quantity::from(1_u64), 500); // Stale

        assert_eq!(builder.count, 1);
        assert_eq!(builder.ts_last, 1_000);
    }

    #[rstest]
    fn test_builder_set_partial_is_once_only() {
        let mut builder = BarBuilder::new(bar_type("AUD/USD.SIM-3-TICK-MID-INTERNAL"), 0);
        let partial = Bar::new(
            bar_type("AUD/USD.SIM-3-TICK-MID-INTERNAL"),
            Price::new(1.00, 2),
            Price::new(1.10, 2),
            Price::new(0.90, 2),
            Price::new(1.05, 2),
            Quantity::from(10_u64),
            1_000,
            1_000,
        );
        builder.set_partial(partial);

        let second = Bar::new(
            bar_type("AUD/USD.SIM-3-TICK-MID-INTERNAL"),
            Price::new(9.00, 2),
            Price::new(9.00, 2),
            Price::new(9.00, 2),
            Price::new(9.00, 2),
            Quantity::from(1_u64),
            2_000,
            2_000,
        );
        builder.set_partial(second); // No-op

        let bar = builder.build_now();
        assert_eq!(bar.open, Price::new(1.00, 2));
        assert_eq!(bar.high, Price::new(1.10, 2));
        assert_eq!(bar.volume, Quantity::from(10_u64));
    }

    #[rstest]
    fn test_builder_carries_close_forward() {
        let mut builder = BarBuilder::new(bar_type("AUD/USD.SIM-3-TICK-MID-INTERNAL"), 0);
        builder.update(Price::new(1.00, 2), Quantity::from(1_u64), 1_000);
        builder.update(Price::new(1.05, 2), Quantity::from(1_u64), 2_000);
        let _ = builder.build_now();

        let bar = builder.build(3_000, 3_000);
        assert_eq!(bar.open, Price::new(1.05, 2));
        assert_eq!(bar.high, Price::new(1.05, 2));
        assert_eq!(bar.low, Price::new(1.05, 2));
        assert_eq!(bar.close, Price::new(1.05, 2));
        assert_eq!(bar.volume, Quantity::from(0_u64));
    }

    #[rstest]
    fn test_tick_bar_aggregator_closes_on_step() {
        let audusd = CurrencyPair::default();
        let (bars, handler) = collector();
        let mut aggregator = TickBarAggregator::new(
            &audusd,
            bar_type("AUD/USD.SIM-3-TICK-MID-INTERNAL"),
            handler,
        );

        aggregator.apply_update(Price::new(1.00, 2), Quantity::from(1_u64), 1_000);
        aggregator.apply_update(Price::new(1.05, 2), Quantity::from(1_u64), 2_000);
        assert!(bars.borrow().is_empty());

        aggregator.apply_update(Price::new(0.95, 2), Quantity::from(1_u64), 3_000);

        let emitted = bars.borrow();
        assert_eq!(emitted.len(), 1);
        assert_eq!(emitted[0].open, Price::new(1.00, 2));
        assert_eq!(emitted[0].high, Price::new(1.05, 2));
        assert_eq!(emitted[0].low, Price::new(0.95, 2));
        assert_eq!(emitted[0].close, Price::new(0.95, 2));
        assert_eq!(emitted[0].volume, Quantity::from(3_u64));
        assert_eq!(emitted[0].ts_event, 3_000);
    }

    #[rstest]
    fn test_volume_bar_aggregator_splits_update() {
        // step=100: (p=1.0, size=60) then (p=1.1, size=80) closes one bar at
        // volume=100 with 40 of the second update; the builder carries the
        // residual 40 @ 1.1
        let audusd = CurrencyPair::default();
        let (bars, handler) = collector();
        let mut aggregator = VolumeBarAggregator::new(
            &audusd,
            bar_type("AUD/USD.SIM-100-VOLUME-MID-INTERNAL"),
            handler,
        );

        aggregator.apply_update(Price::new(1.0, 1), Quantity::from(60_u64), 1_000);
        aggregator.apply_update(Price::new(1.1, 1), Quantity::from(80_u64), 2_000);

        let emitted = bars.borrow();
        assert_eq!(emitted.len(), 1);
        assert_eq!(emitted[0].open, Price::new(1.0, 1));
        assert_eq!(emitted[0].high, Price::new(1.1, 1));
        assert_eq!(emitted[0].close, Price::new(1.1, 1));
        assert_eq!(emitted[0].volume, Quantity::from(100_u64));

        assert_eq!(aggregator.core.builder.volume, Quantity::from(40_u64));
        assert_eq!(aggregator.core.builder.count, 1);
    }

    #[rstest]
    fn test_volume_bar_aggregator_multiple_splits_single_update() {
        let audusd = CurrencyPair::default();
        let (bars, handler) = collector();
        let mut aggregator = VolumeBarAggregator::new(
            &audusd,
            bar_type("AUD/USD.SIM-100-VOLUME-MID-INTERNAL"),
            handler,
        );

        aggregator.apply_update(Price::new(1.0, 1), Quantity::from(250_u64), 1_000);

        assert_eq!(bars.borrow().len(), 2);
        assert_eq!(aggregator.core.builder.volume, Quantity::from(50_u64));
    }

    #[rstest]
    fn test_value_bar_aggregator_splits_on_value() {
        // step=1000 value: (p=100, size=5) accumulates 500, then
        // (p=100, size=7) crosses at size 5, leaving residual 2 @ 200 value
        let audusd = CurrencyPair::default();
        let (bars, handler) = collector();
        let mut aggregator = ValueBarAggregator::new(
            &audusd,
            bar_type("AUD/USD.SIM-1000-VALUE-MID-INTERNAL"),
            handler,
        );

        aggregator.apply_update(Price::new(100.0, 1), Quantity::from(5_u64), 1_000);
        assert_eq!(aggregator.get_cumulative_value(), 500.0);

        aggregator.apply_update(Price::new(100.0, 1), Quantity::from(7_u64), 2_000);

        let emitted = bars.borrow();
        assert_eq!(emitted.len(), 1);
        assert_eq!(emitted[0].volume, Quantity::from(10_u64));
        assert!((aggregator.get_cumulative_value() - 200.0).abs() < 1e-9);
    }

    #[rstest]
    fn test_time_bar_aggregator_gap_emits_carry_forward_bar() {
        // Minute bars: a tick at 00:00:30 then the clock advancing to
        // 00:02:15 emits the 00:01 bar from the tick and a volume-zero
        // carry-forward bar for 00:02
        let audusd = CurrencyPair::default();
        let (bars, handler) = collector();
        let test_clock = Rc::new(RefCell::new(TestClock::new()));
        let clock: Rc<RefCell<dyn Clock>> = test_clock.clone();
        let mut aggregator = TimeBarAggregator::new(
            &audusd,
            bar_type("AUD/USD.SIM-1-MINUTE-MID-INTERNAL"),
            handler,
            clock,
            true,
        )
        .unwrap();

        let one_min = 60 * NANOSECONDS_IN_SECOND;
        aggregator.apply_update(
            Price::new(1.05, 2),
            Quantity::from(10_u64),
            30 * NANOSECONDS_IN_SECOND,
        );

        let events = test_clock
            .borrow_mut()
            .advance_time(135 * NANOSECONDS_IN_SECOND, true);
        for event in events {
            aggregator.build_bar(event);
        }

        let emitted = bars.borrow();
        assert_eq!(emitted.len(), 2);

        assert_eq!(emitted[0].ts_event, one_min);
        assert_eq!(emitted[0].open, Price::new(1.05, 2));
        assert_eq!(emitted[0].close, Price::new(1.05, 2));
        assert_eq!(emitted[0].volume, Quantity::from(10_u64));

        assert_eq!(emitted[1].ts_event, 2 * one_min);
        assert_eq!(emitted[1].open, Price::new(1.05, 2));
        assert_eq!(emitted[1].high, Price::new(1.05, 2));
        assert_eq!(emitted[1].low, Price::new(1.05, 2));
        assert_eq!(emitted[1].close, Price::new(1.05, 2));
        assert_eq!(emitted[1].volume, Quantity::from(0_u64));
    }

    #[rstest]
    fn test_time_bar_aggregator_straddle_closes_before_applying() {
        // An update past the boundary closes the open bar first, then
        // applies into the new window
        let audusd = CurrencyPair::default();
        let (bars, handler) = collector();
        let test_clock = Rc::new(RefCell::new(TestClock::new()));
        let clock: Rc<RefCell<dyn Clock>> = test_clock.clone();
        let mut aggregator = TimeBarAggregator::new(
            &audusd,
            bar_type("AUD/USD.SIM-1-MINUTE-MID-INTERNAL"),
            handler,
            clock,
            true,
        )
        .unwrap();

        let one_min = 60 * NANOSECONDS_IN_SECOND;
        aggregator.apply_update(
            Price::new(1.00, 2),
            Quantity::from(10_u64),
            30 * NANOSECONDS_IN_SECOND,
        );
        aggregator.apply_update(Price::new(1.10, 2), Quantity::from(5_u64), one_min + 1);

        {
            let emitted = bars.borrow();
            assert_eq!(emitted.len(), 1);
            assert_eq!(emitted[0].ts_event, one_min);
            assert_eq!(emitted[0].close, Price::new(1.00, 2));
            assert_eq!(emitted[0].volume, Quantity::from(10_u64));
        }

        // The timer event for the already-built boundary is a no-op
        let events = test_clock.borrow_mut().advance_time(one_min, true);
        for event in events {
            aggregator.build_bar(event);
        }
        assert_eq!(bars.borrow().len(), 1);
    }

    #[rstest]
    fn test_time_bar_aggregator_update_on_boundary_applies_first() {
        let audusd = CurrencyPair::default();
        let (bars, handler) = collector();
        let test_clock = Rc::new(RefCell::new(TestClock::new()));
        let clock: Rc<RefCell<dyn Clock>> = test_clock.clone();
        let mut aggregator = TimeBarAggregator::new(
            &audusd,
            bar_type("AUD/USD.SIM-1-MINUTE-MID-INTERNAL"),
            handler,
            clock,
            true,
        )
        .unwrap();

        let one_min = 60 * NANOSECONDS_IN_SECOND;
        aggregator.apply_update(
            Price::new(1.00, 2),
            Quantity::from(10_u64),
            30 * NANOSECONDS_IN_SECOND,
        );
        // Exactly on the close: applied first, then the bar closes
        aggregator.apply_update(Price::new(1.10, 2), Quantity::from(5_u64), one_min);

        let emitted = bars.borrow();
        assert_eq!(emitted.len(), 1);
        assert_eq!(emitted[0].close, Price::new(1.10, 2));
        assert_eq!(emitted[0].volume, Quantity::from(15_u64));
    }

    #[rstest]
    fn test_time_bar_aggregator_deferred_emission_without_updates() {
        // With `build_with_no_updates` off, an updateless boundary defers
        // emission until the next update, stamped with the stored close
        let audusd = CurrencyPair::default();
        let (bars, handler) = collector();
        let test_clock = Rc::new(RefCell::new(TestClock::new()));
        let clock: Rc<RefCell<dyn Clock>> = test_clock.clone();
        let mut aggregator = TimeBarAggregator::new(
            &audusd,
            bar_type("AUD/USD.SIM-1-MINUTE-MID-INTERNAL"),
            handler,
            clock,
            false,
        )
        .unwrap();

        let one_min = 60 * NANOSECONDS_IN_SECOND;
        aggregator.apply_update(
            Price::new(1.00, 2),
            Quantity::from(10_u64),
            30 * NANOSECONDS_IN_SECOND,
        );

        let events = test_clock.borrow_mut().advance_time(2 * one_min, true);
        for event in events {
            aggregator.build_bar(event);
        }
        // First boundary had the update; second was empty and deferred
        assert_eq!(bars.borrow().len(), 1);

        aggregator.apply_update(
            Price::new(1.20, 2),
            Quantity::from(1_u64),
            2 * one_min + 30 * NANOSECONDS_IN_SECOND,
        );

        let emitted = bars.borrow();
        assert_eq!(emitted.len(), 2);
        assert_eq!(emitted[1].ts_event, 2 * one_min);
        assert_eq!(emitted[1].volume, Quantity::from(0_u64));
        assert_eq!(emitted[1].close, Price::new(1.00, 2));
    }
}
