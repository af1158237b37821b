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

//! Defensive condition checks which return a `Result` at the call site,
//! preventing invalid values from propagating into the domain model.

use anyhow::bail;

/// The prefix applied when a fallible constructor is unwrapped by its
/// infallible counterpart.
pub const FAILED: &str = "Condition failed:";

/// Checks the `predicate` is true.
///
/// # Errors
///
/// Returns an error with `fail_msg` if the predicate is false.
pub fn check_predicate_true(predicate: bool, fail_msg: &str) -> anyhow::Result<()> {
    if !predicate {
        bail!("{fail_msg}")
    }
    Ok(())
}

/// Checks the string `s` has semantic meaning: non-empty, not all whitespace
/// and only printable ASCII.
///
/// # Errors
///
/// Returns an error if the string is invalid.
pub fn check_valid_string(s: &str, param: &str) -> anyhow::Result<()> {
    if s.is_empty() {
        bail!("invalid string for {param}, was empty")
    }
    if s.chars().all(char::is_whitespace) {
        bail!("invalid string for {param}, was all whitespace")
    }
    if !s.chars().all(|c| c.is_ascii() && !c.is_ascii_control()) {
        bail!("invalid string for {param} contained invalid characters, was '{s}'")
    }
    Ok(())
}

/// Checks the `u8` value is in the inclusive range [`l`, `r`].
///
/// # Errors
///
/// Returns an error if the value is out of range.
pub fn check_in_range_inclusive_u8(value: u8, l: u8, r: u8, param: &str) -> anyhow::Result<()> {
    if value < l || value > r {
        bail!("invalid u8 for {param} not in range [{l}, {r}], was {value}")
    }
    Ok(())
}

/// Checks the `u8` values are equal.
///
/// # Errors
///
/// Returns an error if the values are not equal.
pub fn check_equal_u8(lhs: u8, rhs: u8, lhs_param: &str, rhs_param: &str) -> anyhow::Result<()> {
    if lhs != rhs {
        bail!("{lhs_param} u8 of {lhs} was not equal to {rhs_param} u8 of {rhs}")
    }
    Ok(())
}

/// Checks the `f64` value is positive and finite.
///
/// # Errors
///
/// Returns an error if the value is zero, negative, infinite or NaN.
pub fn check_positive_f64(value: f64, param: &str) -> anyhow::Result<()> {
    if !value.is_finite() {
        bail!("invalid f64 for {param}, was {value}")
    }
    if value <= 0.0 {
        bail!("invalid f64 for {param} not positive, was {value}")
    }
    Ok(())
}

/// Checks the `u64` value is positive.
///
/// # Errors
///
/// Returns an error if the value is zero.
pub fn check_positive_u64(value: u64, param: &str) -> anyhow::Result<()> {
    if value == 0 {
        bail!("invalid u64 for {param} not positive, was {value}")
    }
    Ok(())
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(" a")]
    #[case("a ")]
    #[case("abc")]
    #[case("AUD/USD")]
    fn test_check_valid_string_ok(#[case] s: &str) {
        assert!(check_valid_string(s, "value").is_ok());
    }

    #[rstest]
    #[case("")]
    #[case(" ")]
    #[case("  \t")]
    #[case("abc\u{7f}")]
    #[case("abc😀")]
    fn test_check_valid_string_err(#[case] s: &str) {
        assert!(check_valid_string(s, "value").is_err());
    }

    #[rstest]
    #[case(0, 0, 9, true)]
    #[case(9, 0, 9, true)]
    #[case(10, 0, 9, false)]
    fn test_check_in_range_inclusive_u8(
        #[case] value: u8,
        #[case] l: u8,
        #[case] r: u8,
        #[case] expected: bool,
    ) {
        assert_eq!(check_in_range_inclusive_u8(value, l, r, "value").is_ok(), expected);
    }

    #[rstest]
    #[case(1.0, true)]
    #[case(0.0, false)]
    #[case(-1.0, false)]
    #[case(f64::NAN, false)]
    #[case(f64::INFINITY, false)]
    fn test_check_positive_f64(#[case] value: f64, #[case] expected: bool) {
        assert_eq!(check_positive_f64(value, "value").is_ok(), expected);
    }
}
