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
    sync::atomic::{AtomicU64, Ordering},
    time::{SystemTime, UNIX_EPOCH},
};

/// Represents a timestamp in nanoseconds since the UNIX epoch.
pub type UnixNanos = u64;

/// Represents a duration in nanoseconds (possibly negative).
pub type TimedeltaNanos = i64;

/// Returns the duration since the UNIX epoch from the system wall clock.
///
/// # Panics
///
/// Panics if the system clock reads before the UNIX epoch.
#[must_use]
pub fn duration_since_unix_epoch() -> std::time::Duration {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Error calling `SystemTime::duration_since`")
}

/// A monotonic nanosecond clock source backed by an atomic.
///
/// Successive reads are guaranteed strictly increasing even when the
/// underlying wall clock stalls or steps backwards.
#[derive(Debug, Default)]
pub struct AtomicTime {
    timestamp_ns: AtomicU64,
}

impl AtomicTime {
    /// Creates a new [`AtomicTime`] initialized from the system wall clock.
    #[must_use]
    pub fn new() -> Self {
        Self {
            timestamp_ns: AtomicU64::new(duration_since_unix_epoch().as_nanos() as u64),
        }
    }

    /// Returns the last recorded time without advancing.
    #[must_use]
    pub fn get(&self) -> UnixNanos {
        self.timestamp_ns.load(Ordering::SeqCst)
    }

    /// Returns the current time, advanced to at least one nanosecond past
    /// the previous read.
    pub fn time_since_epoch(&self) -> UnixNanos {
        let now = duration_since_unix_epoch().as_nanos() as u64;
        let last = self.get() + 1;
        let time = now.max(last);
        self.timestamp_ns.store(time, Ordering::SeqCst);
        time
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_since_epoch_monotonic() {
        let clock = AtomicTime::new();
        let a = clock.time_since_epoch();
        let b = clock.time_since_epoch();
        let c = clock.time_since_epoch();
        assert!(b > a);
        assert!(c > b);
    }

    #[test]
    fn test_get_does_not_advance() {
        let clock = AtomicTime::new();
        let a = clock.get();
        let b = clock.get();
        assert_eq!(a, b);
    }
}
