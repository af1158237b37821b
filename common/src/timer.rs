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
    cmp::Ordering,
    fmt::{Debug, Display, Formatter},
    rc::Rc,
};

use sextant_core::{
    correctness::{check_positive_u64, check_valid_string, FAILED},
    time::UnixNanos,
    uuid::UUID4,
};
use ustr::Ustr;

/// An event fired by a named timer.
#[repr(C)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimeEvent {
    /// The timer name which fired the event.
    pub name: Ustr,
    /// The unique identifier for the event.
    pub event_id: UUID4,
    /// UNIX timestamp (nanoseconds) when the event occurred.
    pub ts_event: UnixNanos,
    /// UNIX timestamp (nanoseconds) when the event was initialized.
    pub ts_init: UnixNanos,
}

impl TimeEvent {
    /// Creates a new [`TimeEvent`].
    #[must_use]
    pub fn new(name: Ustr, event_id: UUID4, ts_event: UnixNanos, ts_init: UnixNanos) -> Self {
        Self {
            name,
            event_id,
            ts_event,
            ts_init,
        }
    }
}

impl PartialOrd for TimeEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimeEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ts_event.cmp(&other.ts_event)
    }
}

impl Display for TimeEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}(name={}, ts_event={})",
            stringify!(TimeEvent),
            self.name,
            self.ts_event,
        )
    }
}

/// A callback invoked with a fired [`TimeEvent`].
pub type TimeEventCallback = Rc<dyn Fn(TimeEvent)>;

/// Pairs a fired event with its registered callback so a driver can run
/// callbacks strictly after the clock borrow ends (callbacks may themselves
/// schedule or cancel timers).
#[derive(Clone)]
pub struct TimeEventHandler {
    pub event: TimeEvent,
    pub callback: TimeEventCallback,
}

impl TimeEventHandler {
    /// Runs the callback with the event.
    pub fn run(self) {
        (self.callback)(self.event);
    }
}

impl Debug for TimeEventHandler {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}(event={})", stringify!(TimeEventHandler), self.event)
    }
}

/// A test timer which matures deterministically under explicit time
/// advancement.
#[derive(Clone, Copy, Debug)]
pub struct TestTimer {
    pub name: Ustr,
    pub interval_ns: u64,
    pub start_time_ns: UnixNanos,
    pub stop_time_ns: Option<UnixNanos>,
    pub next_time_ns: UnixNanos,
    pub is_expired: bool,
}

impl TestTimer {
    /// Creates a new [`TestTimer`].
    ///
    /// # Errors
    ///
    /// Returns an error if `name` is invalid or `interval_ns` is zero.
    pub fn new_checked(
        name: &str,
        interval_ns: u64,
        start_time_ns: UnixNanos,
        stop_time_ns: Option<UnixNanos>,
    ) -> anyhow::Result<Self> {
        check_valid_string(name, "`TestTimer` name")?;
        check_positive_u64(interval_ns, "`interval_ns`")?;
        Ok(Self {
            name: Ustr::from(name),
            interval_ns,
            start_time_ns,
            stop_time_ns,
            next_time_ns: start_time_ns + interval_ns,
            is_expired: false,
        })
    }

    /// Creates a new [`TestTimer`].
    ///
    /// # Panics
    ///
    /// Panics if a correctness check fails (see [`TestTimer::new_checked`]).
    #[must_use]
    pub fn new(
        name: &str,
        interval_ns: u64,
        start_time_ns: UnixNanos,
        stop_time_ns: Option<UnixNanos>,
    ) -> Self {
        Self::new_checked(name, interval_ns, start_time_ns, stop_time_ns).expect(FAILED)
    }

    /// Advances the timer to `to_time_ns`, returning an iterator over every
    /// event fired on the way (events mature at `next_time_ns <= to_time_ns`
    /// in timestamp order).
    pub fn advance(&mut self, to_time_ns: UnixNanos) -> impl Iterator<Item = TimeEvent> + '_ {
        let advances = to_time_ns
            .saturating_sub(self.next_time_ns.saturating_sub(self.interval_ns))
            / self.interval_ns;
        self.take(advances as usize)
    }

    /// Cancels the timer (no further events will fire).
    pub fn cancel(&mut self) {
        self.is_expired = true;
    }
}

impl Iterator for TestTimer {
    type Item = TimeEvent;

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_expired {
            return None;
        }
        let event = TimeEvent::new(
            self.name,
            UUID4::new(),
            self.next_time_ns,
            self.next_time_ns,
        );
        // If not expired, set `next_time_ns` to the next interval
        if let Some(stop_time_ns) = self.stop_time_ns {
            if self.next_time_ns >= stop_time_ns {
                self.is_expired = true;
            }
        }
        self.next_time_ns += self.interval_ns;

        Some(event)
    }
}
