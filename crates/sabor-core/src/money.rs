//! # Money Module
//!
//! Provides the `Money` type for handling monetary values exactly.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │    0.1 + 0.2 = 0.30000000000000004                                      │
//! │                                                                         │
//! │  Summing thousands of sale totals in floats drifts by cents.           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    "22,00" ──parse──► 2200 cents ──× 3──► 6600 cents ──► "66.00"        │
//! │    Every total, sum and average in the system is i64 arithmetic.       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use sabor_core::money::Money;
//!
//! let price = Money::from_cents(2200);
//! let total = price.multiply_quantity(3);
//! assert_eq!(total.to_string(), "66.00");
//!
//! let typed: Money = " 8,5 ".parse().unwrap();
//! assert_eq!(typed.cents(), 850);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ParseMoneyError;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in cents of the single operating currency.
///
/// ## Where Money is Used
/// ```text
/// Product.price_cents ──► PricedLine.unit_price ──► SaleItem.unit_price_cents
///                                  │
///                                  ▼
///                         PricedLine.subtotal ──Σ──► Sale.total_cents
///                                                         │
///                                                         ▼
///                                          SalesSummary.total_revenue
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-unit portion (truncated toward zero).
    #[inline]
    pub const fn units(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the cents portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies a unit price by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use sabor_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(2200);
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 6600);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Like [`Money::multiply_quantity`], but `None` when the product does
    /// not fit in an `i64` of cents.
    ///
    /// ## Example
    /// ```rust
    /// use sabor_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(2200);
    /// assert_eq!(unit_price.checked_multiply_quantity(3), Some(Money::from_cents(6600)));
    /// assert_eq!(unit_price.checked_multiply_quantity(i64::MAX), None);
    /// ```
    #[inline]
    pub const fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Average of `count` amounts summing to `total`, in whole cents.
    ///
    /// Rounds half away from zero. A zero count yields zero rather than an
    /// error so empty reports stay well defined.
    ///
    /// ## Example
    /// ```rust
    /// use sabor_core::money::Money;
    ///
    /// assert_eq!(Money::average(Money::from_cents(1000), 3).cents(), 333);
    /// assert_eq!(Money::average(Money::from_cents(1001), 2).cents(), 501);
    /// assert_eq!(Money::average(Money::from_cents(5000), 0), Money::zero());
    /// ```
    pub fn average(total: Money, count: i64) -> Money {
        if count <= 0 {
            return Money::zero();
        }

        // i128 keeps the doubled remainder safe for any i64 total
        let total = total.0 as i128;
        let count = count as i128;
        let quotient = total / count;
        let remainder = total % count;

        let rounded = if remainder.abs() * 2 >= count {
            quotient + total.signum()
        } else {
            quotient
        };

        Money(rounded as i64)
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Parses the decimal shapes operators type into a price field.
///
/// ## Accepted Input
/// ```text
/// "22"       → 2200
/// "22.5"     → 2250
/// "22,50"    → 2250   (comma is a decimal separator)
/// " 1 250 "  → 125000 (whitespace is ignored)
/// "-3.10"    → -310
/// "22.505"   → TooManyDecimals
/// "abc"      → InvalidCharacter
/// ```
impl FromStr for Money {
    type Err = ParseMoneyError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let normalized: String = input
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| if c == ',' { '.' } else { c })
            .collect();

        let (negative, digits) = match normalized.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, normalized.as_str()),
        };

        if digits.is_empty() {
            return Err(ParseMoneyError::Empty);
        }

        let (whole, fraction) = match digits.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (digits, ""),
        };

        if whole.is_empty() && fraction.is_empty() {
            return Err(ParseMoneyError::Empty);
        }

        let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
        if !all_digits(whole) || !all_digits(fraction) {
            return Err(ParseMoneyError::InvalidCharacter);
        }

        if fraction.len() > 2 {
            return Err(ParseMoneyError::TooManyDecimals);
        }

        let units: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| ParseMoneyError::Overflow)?
        };

        let cents_part: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| ParseMoneyError::InvalidCharacter)? * 10,
            _ => fraction.parse().map_err(|_| ParseMoneyError::InvalidCharacter)?,
        };

        let cents = units
            .checked_mul(100)
            .and_then(|c| c.checked_add(cents_part))
            .ok_or(ParseMoneyError::Overflow)?;

        Ok(Money(if negative { -cents } else { cents }))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Canonical two-decimal rendering, e.g. `66.00` or `-5.50`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.units().abs(), self.cents_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
