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

/// Returns the decimal precision inferred from the given string.
///
/// Handles both fixed-point forms (`"1.2345"` has precision 4) and scientific
/// notation (`"1e-8"` has precision 8).
#[must_use]
pub fn precision_from_str(s: &str) -> u8 {
    let lower = s.to_lowercase();
    if let Some((_, exponent)) = lower.split_once("e-") {
        return exponent.parse::<u8>().unwrap_or(0);
    }
    match lower.split_once('.') {
        Some((_, decimals)) => decimals.len() as u8,
        None => 0,
    }
}
