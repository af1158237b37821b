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

//! Clock implementations driving scheduled [`TimeEvent`]s.
//!
//! The core is single-threaded-cooperative: no clock spawns threads, and
//! timer callbacks never fire concurrently with an in-flight time advance.
//! Drivers collect matured events first, then resolve and run handlers once
//! the clock borrow has ended:
//!
//! ```ignore
//! let events = clock.borrow_mut().advance_time(to, true);
//! let handlers = clock.borrow().match_handlers(events);
//! for handler in handlers {
//!     handler.run();
//! }
//! ```

use std::collections::HashMap;

use indexmap::IndexMap;
use sextant_core::time::{AtomicTime, UnixNanos};
use ustr::Ustr;

use crate::timer::{TestTimer, TimeEvent, TimeEventCallback, TimeEventHandler};

/// The shared clock contract: nanosecond timestamps plus named, recurring
/// timers.
pub trait Clock {
    /// Returns the current time in nanoseconds since the UNIX epoch.
    fn timestamp_ns(&self) -> UnixNanos;

    /// Returns the names of all active (non-expired) timers.
    fn timer_names(&self) -> Vec<&str>;

    /// Returns the count of active timers.
    fn timer_count(&self) -> usize;

    /// Returns the next fire time of the named timer, if it exists.
    fn next_time_ns(&self, name: &str) -> Option<UnixNanos>;

    /// Schedules a one-shot alert at `alert_time_ns`.
    ///
    /// A duplicate name replaces the prior timer.
    ///
    /// # Errors
    ///
    /// Returns an error if `name` is invalid.
    fn set_time_alert_ns(
        &mut self,
        name: &str,
        alert_time_ns: UnixNanos,
        callback: Option<TimeEventCallback>,
    ) -> anyhow::Result<()>;

    /// Schedules a recurring timer firing every `interval_ns` from
    /// `start_time_ns` (exclusive) until `stop_time_ns` (inclusive), if
    /// given.
    ///
    /// A duplicate name replaces the prior timer.
    ///
    /// # Errors
    ///
    /// Returns an error if `name` is invalid or `interval_ns` is zero.
    fn set_timer_ns(
        &mut self,
        name: &str,
        interval_ns: u64,
        start_time_ns: UnixNanos,
        stop_time_ns: Option<UnixNanos>,
        callback: Option<TimeEventCallback>,
    ) -> anyhow::Result<()>;

    /// Cancels the named timer.
    fn cancel_timer(&mut self, name: &str);

    /// Cancels all timers.
    fn cancel_timers(&mut self);
}

/// A clock for deterministic tests and backtests: time advances only by
/// explicit `advance_time` calls, which mature timers inline.
pub struct TestClock {
    time_ns: UnixNanos,
    timers: IndexMap<Ustr, TestTimer>,
    callbacks: HashMap<Ustr, TimeEventCallback>,
    default_callback: Option<TimeEventCallback>,
}

impl TestClock {
    /// Creates a new [`TestClock`] at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self {
            time_ns: 0,
            timers: IndexMap::new(),
            callbacks: HashMap::new(),
            default_callback: None,
        }
    }

    /// Registers a callback for events of timers registered without their
    /// own.
    pub fn register_default_handler(&mut self, callback: TimeEventCallback) {
        self.default_callback = Some(callback);
    }

    /// Sets the clock time without maturing timers.
    pub fn set_time(&mut self, to_time_ns: UnixNanos) {
        self.time_ns = to_time_ns;
    }

    /// Advances the clock to `to_time_ns`, returning every matured
    /// [`TimeEvent`] across all timers in timestamp order (ties broken by
    /// timer insertion order). Expired timers are removed.
    ///
    /// # Panics
    ///
    /// Panics if `to_time_ns` is before the current clock time.
    pub fn advance_time(&mut self, to_time_ns: UnixNanos, set_time: bool) -> Vec<TimeEvent> {
        assert!(
            to_time_ns >= self.time_ns,
            "`to_time_ns` {to_time_ns} was < `time_ns` {}",
            self.time_ns,
        );

        if set_time {
            self.time_ns = to_time_ns;
        }

        let mut events: Vec<TimeEvent> = self
            .timers
            .values_mut()
            .filter(|timer| !timer.is_expired)
            .flat_map(|timer| timer.advance(to_time_ns))
            .collect();
        self.timers.retain(|_, timer| !timer.is_expired);

        // Stable sort preserves per-timer (insertion) order on equal timestamps
        events.sort_by_key(|event| event.ts_event);
        events
    }

    /// Resolves the given events against registered callbacks, falling back
    /// to the default handler. Run the returned handlers only after the
    /// clock borrow has ended.
    #[must_use]
    pub fn match_handlers(&self, events: Vec<TimeEvent>) -> Vec<TimeEventHandler> {
        events
            .into_iter()
            .filter_map(|event| {
                self.callbacks
                    .get(&event.name)
                    .or(self.default_callback.as_ref())
                    .map(|callback| TimeEventHandler {
                        event,
                        callback: callback.clone(),
                    })
            })
            .collect()
    }
}

impl Default for TestClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TestClock {
    fn timestamp_ns(&self) -> UnixNanos {
        self.time_ns
    }

    fn timer_names(&self) -> Vec<&str> {
        self.timers
            .iter()
            .filter(|(_, timer)| !timer.is_expired)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    fn timer_count(&self) -> usize {
        self.timers
            .values()
            .filter(|timer| !timer.is_expired)
            .count()
    }

    fn next_time_ns(&self, name: &str) -> Option<UnixNanos> {
        self.timers
            .get(&Ustr::from(name))
            .map(|timer| timer.next_time_ns)
    }

    fn set_time_alert_ns(
        &mut self,
        name: &str,
        alert_time_ns: UnixNanos,
        callback: Option<TimeEventCallback>,
    ) -> anyhow::Result<()> {
        let interval_ns = alert_time_ns.saturating_sub(self.time_ns).max(1);
        self.set_timer_ns(
            name,
            interval_ns,
            self.time_ns,
            Some(alert_time_ns),
            callback,
        )
    }

    fn set_timer_ns(
        &mut self,
        name: &str,
        interval_ns: u64,
        start_time_ns: UnixNanos,
        stop_time_ns: Option<UnixNanos>,
        callback: Option<TimeEventCallback>,
    ) -> anyhow::Result<()> {
        let timer = TestTimer::new_checked(name, interval_ns, start_time_ns, stop_time_ns)?;
        let name = Ustr::from(name);
        // Duplicate names replace the prior timer
        self.timers.insert(name, timer);
        match callback {
            Some(callback) => {
                self.callbacks.insert(name, callback);
            }
            None => {
                self.callbacks.remove(&name);
            }
        }
        Ok(())
    }

    fn cancel_timer(&mut self, name: &str) {
        let name = Ustr::from(name);
        self.timers.shift_remove(&name);
        self.callbacks.remove(&name);
    }

    fn cancel_timers(&mut self) {
        self.timers.clear();
        self.callbacks.clear();
    }
}

/// A clock deriving times from the operating system's monotonic source.
///
/// Timer maturation is driven cooperatively by the owner polling
/// [`LiveClock::poll`] on its event loop; no background threads are
/// spawned.
pub struct LiveClock {
    time: AtomicTime,
    timers: IndexMap<Ustr, TestTimer>,
    callbacks: HashMap<Ustr, TimeEventCallback>,
}

impl LiveClock {
    /// Creates a new [`LiveClock`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            time: AtomicTime::new(),
            timers: IndexMap::new(),
            callbacks: HashMap::new(),
        }
    }

    /// Matures all timers up to the current wall-clock time, returning the
    /// fired events in timestamp order.
    pub fn poll(&mut self) -> Vec<TimeEvent> {
        let now = self.time.time_since_epoch();
        let mut events: Vec<TimeEvent> = self
            .timers
            .values_mut()
            .filter(|timer| !timer.is_expired)
            .flat_map(|timer| timer.advance(now))
            .collect();
        self.timers.retain(|_, timer| !timer.is_expired);
        events.sort_by_key(|event| event.ts_event);
        events
    }

    /// Resolves the given events against registered callbacks.
    #[must_use]
    pub fn match_handlers(&self, events: Vec<TimeEvent>) -> Vec<TimeEventHandler> {
        events
            .into_iter()
            .filter_map(|event| {
                self.callbacks
                    .get(&event.name)
                    .map(|callback| TimeEventHandler {
                        event,
                        callback: callback.clone(),
                    })
            })
            .collect()
    }
}

impl Default for LiveClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for LiveClock {
    fn timestamp_ns(&self) -> UnixNanos {
        self.time.time_since_epoch()
    }

    fn timer_names(&self) -> Vec<&str> {
        self.timers
            .iter()
            .filter(|(_, timer)| !timer.is_expired)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    fn timer_count(&self) -> usize {
        self.timers
            .values()
            .filter(|timer| !timer.is_expired)
            .count()
    }

    fn next_time_ns(&self, name: &str) -> Option<UnixNanos> {
        self.timers
            .get(&Ustr::from(name))
            .map(|timer| timer.next_time_ns)
    }

    fn set_time_alert_ns(
        &mut self,
        name: &str,
        alert_time_ns: UnixNanos,
        callback: Option<TimeEventCallback>,
    ) -> anyhow::Result<()> {
        let now = self.time.time_since_epoch();
        let interval_ns = alert_time_ns.saturating_sub(now).max(1);
        self.set_timer_ns(name, interval_ns, now, Some(alert_time_ns), callback)
    }

    fn set_timer_ns(
        &mut self,
        name: &str,
        interval_ns: u64,
        start_time_ns: UnixNanos,
        stop_time_ns: Option<UnixNanos>,
        callback: Option<TimeEventCallback>,
    ) -> anyhow::Result<()> {
        let timer = TestTimer::new_checked(name, interval_ns, start_time_ns, stop_time_ns)?;
        let name = Ustr::from(name);
        self.timers.insert(name, timer);
        match callback {
            Some(callback) => {
                self.callbacks.insert(name, callback);
            }
            None => {
                self.callbacks.remove(&name);
            }
        }
        Ok(())
    }

    fn cancel_timer(&mut self, name: &str) {
        let name = Ustr::from(name);
        self.timers.shift_remove(&name);
        self.callbacks.remove(&name);
    }

    fn cancel_timers(&mut self) {
        self.timers.clear();
        self.callbacks.clear();
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_advance_time_matures_timers_in_order() {
        let mut clock = TestClock::new();
        clock.set_timer_ns("TIMER-B", 100, 0, None, None).unwrap();
        clock.set_timer_ns("TIMER-A", 60, 0, None, None).unwrap();

        let events = clock.advance_time(200, true);

        let fired: Vec<(String, UnixNanos)> = events
            .iter()
            .map(|e| (e.name.to_string(), e.ts_event))
            .collect();
        assert_eq!(
            fired,
            vec![
                ("TIMER-A".to_string(), 60),
                ("TIMER-B".to_string(), 100),
                ("TIMER-A".to_string(), 120),
                ("TIMER-A".to_string(), 180),
                ("TIMER-B".to_string(), 200),
            ]
        );
        assert_eq!(clock.timestamp_ns(), 200);
    }

    #[rstest]
    fn test_tie_break_by_insertion_order() {
        let mut clock = TestClock::new();
        clock.set_timer_ns("FIRST", 100, 0, None, None).unwrap();
        clock.set_timer_ns("SECOND", 100, 0, None, None).unwrap();

        let events = clock.advance_time(100, true);

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].name.as_str(), "FIRST");
        assert_eq!(events[1].name.as_str(), "SECOND");
    }

    #[rstest]
    fn test_duplicate_name_replaces_timer() {
        let mut clock = TestClock::new();
        clock.set_timer_ns("TIMER", 60, 0, None, None).unwrap();
        clock.set_timer_ns("TIMER", 100, 0, None, None).unwrap();

        assert_eq!(clock.timer_count(), 1);
        assert_eq!(clock.next_time_ns("TIMER"), Some(100));
    }

    #[rstest]
    fn test_cancel_timer() {
        let mut clock = TestClock::new();
        clock.set_timer_ns("TIMER", 60, 0, None, None).unwrap();
        clock.cancel_timer("TIMER");

        assert_eq!(clock.timer_count(), 0);
        assert!(clock.advance_time(1_000, true).is_empty());
    }

    #[rstest]
    fn test_time_alert_fires_once() {
        let mut clock = TestClock::new();
        clock.set_time_alert_ns("ALERT", 500, None).unwrap();

        let events = clock.advance_time(1_000, true);

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].ts_event, 500);
        assert_eq!(clock.timer_count(), 0);
    }

    #[rstest]
    #[should_panic(expected = "was <")]
    fn test_advance_backwards_panics() {
        let mut clock = TestClock::new();
        clock.set_time(100);
        let _ = clock.advance_time(50, true);
    }

    #[rstest]
    fn test_match_handlers_runs_after_borrow_ends() {
        let clock = Rc::new(RefCell::new(TestClock::new()));
        let fired: Rc<RefCell<Vec<UnixNanos>>> = Rc::new(RefCell::new(Vec::new()));

        let fired_clone = fired.clone();
        clock
            .borrow_mut()
            .set_timer_ns(
                "TIMER",
                60,
                0,
                None,
                Some(Rc::new(move |event: TimeEvent| {
                    fired_clone.borrow_mut().push(event.ts_event);
                })),
            )
            .unwrap();

        let events = clock.borrow_mut().advance_time(150, true);
        let handlers = clock.borrow().match_handlers(events);
        for handler in handlers {
            handler.run();
        }

        assert_eq!(*fired.borrow(), vec![60, 120]);
    }

    #[rstest]
    fn test_reentrant_callback_can_schedule_timer() {
        let clock = Rc::new(RefCell::new(TestClock::new()));

        let clock_clone = clock.clone();
        clock
            .borrow_mut()
            .set_time_alert_ns(
                "ALERT",
                100,
                Some(Rc::new(move |_event: TimeEvent| {
                    clock_clone
                        .borrow_mut()
                        .set_timer_ns("CHAINED", 50, 100, None, None)
                        .unwrap();
                })),
            )
            .unwrap();

        let events = clock.borrow_mut().advance_time(100, true);
        let handlers = clock.borrow().match_handlers(events);
        for handler in handlers {
            handler.run();
        }

        assert_eq!(clock.borrow().timer_count(), 1);
        let chained = clock.borrow_mut().advance_time(200, true);
        assert_eq!(chained.len(), 2);
        assert_eq!(chained[0].name.as_str(), "CHAINED");
    }
}
