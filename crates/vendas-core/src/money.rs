//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  The sales API sends prices as JSON numbers:                            │
//! │    0.1 + 0.2 = 0.30000000000000004                                      │
//! │    summing a cart of floats drifts past the smallest currency unit      │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Centavos                                         │
//! │    JSON 5.5  ──► decimal::deserialize ──► Money(550)                    │
//! │    all cart math happens on i64                                         │
//! │    Money(2200) ──► decimal::serialize ──► JSON 22.0                     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use vendas_core::money::Money;
//!
//! let price = Money::from_cents(550); // R$ 5,50
//! let line_total = price.multiply_quantity(4);
//! assert_eq!(line_total.cents(), 2200);
//! assert_eq!(line_total.to_string(), "R$ 22,00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (centavos).
///
/// ## Design Decisions
/// - **i64 (signed)**: room for refunds and differences
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Serde**: serializes as plain centavos; use [`decimal`] at the HTTP
///   boundary where the API expects decimal numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from centavos.
    ///
    /// ## Example
    /// ```rust
    /// use vendas_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units (reais and centavos).
    ///
    /// For negative amounts only the major unit should be negative:
    /// `from_major_minor(-5, 50)` is -R$ 5,50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Converts a decimal amount received from the API into centavos.
    ///
    /// Rounds half away from zero to the nearest centavo. Returns `None`
    /// for NaN, infinities and values outside the `i64` centavo range.
    ///
    /// ## Example
    /// ```rust
    /// use vendas_core::money::Money;
    ///
    /// assert_eq!(Money::from_decimal(10.99), Some(Money::from_cents(1099)));
    /// assert_eq!(Money::from_decimal(0.125), Some(Money::from_cents(13)));
    /// assert_eq!(Money::from_decimal(f64::NAN), None);
    /// ```
    pub fn from_decimal(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        let cents = (value * 100.0).round();
        if cents < i64::MIN as f64 || cents > i64::MAX as f64 {
            return None;
        }
        Some(Money(cents as i64))
    }

    /// Returns the value as a decimal number for the wire format.
    ///
    /// Only for serialization; never do arithmetic on the result.
    #[inline]
    pub fn to_decimal(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns the value in centavos.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (reais) portion.
    #[inline]
    pub const fn reais(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (centavos) portion (always 0-99).
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
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity.
    ///
    /// ## User Workflow
    /// ```text
    /// Product: Café 500g  R$ 5,50
    /// Quantity: 4
    ///      │
    ///      ▼
    /// multiply_quantity(4) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// Line Total: R$ 22,00
    /// ```
    ///
    /// Saturates at the `i64` bounds; use [`Money::checked_mul_quantity`]
    /// where overflow must be reported.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// `None` if the product does not fit in `i64` centavos.
    #[inline]
    pub const fn checked_mul_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// `None` if the sum does not fit in `i64` centavos.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Exact sum, or `None` on overflow.
    pub fn checked_sum<I: IntoIterator<Item = Money>>(values: I) -> Option<Money> {
        values
            .into_iter()
            .try_fold(Money::zero(), |acc, m| acc.checked_add(m))
    }

    /// Divides into `parts` shares, rounding half away from zero.
    ///
    /// Used for the average ticket of a report. Returns zero when `parts`
    /// is zero.
    ///
    /// ## Example
    /// ```rust
    /// use vendas_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(1000).divide_rounded(3).cents(), 333);
    /// assert_eq!(Money::from_cents(1001).divide_rounded(2).cents(), 501);
    /// assert_eq!(Money::from_cents(1000).divide_rounded(0).cents(), 0);
    /// ```
    pub fn divide_rounded(&self, parts: u64) -> Money {
        if parts == 0 {
            return Money::zero();
        }
        let parts = parts as i128;
        let value = self.0 as i128;
        let half = parts / 2;
        // Integer rounding: add half a share before truncating, on the
        // side of zero the value sits on.
        let rounded = if value >= 0 {
            (value + half) / parts
        } else {
            (value - half) / parts
        };
        Money(rounded as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================
//
// Operators saturate instead of overflowing. Amounts near the i64 bound are
// rejected earlier (cart, submit); reports over huge backend totals clamp.

/// Shows money as Brazilian reais, e.g. `R$ 10,99`.
///
/// No thousands separator; this is for logs and the CLI tables.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}R$ {},{:02}",
            sign,
            self.reais().abs(),
            self.cents_part()
        )
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
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

/// Multiplication by a quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Wire Format Helpers
// =============================================================================

/// Serde adapter for fields the API transmits as decimal JSON numbers.
///
/// ## Usage
/// ```rust
/// use serde::{Deserialize, Serialize};
/// use vendas_core::money::{self, Money};
///
/// #[derive(Serialize, Deserialize)]
/// struct Wire {
///     #[serde(with = "money::decimal")]
///     preco: Money,
/// }
///
/// let wire: Wire = serde_json::from_str(r#"{"preco": 5.5}"#).unwrap();
/// assert_eq!(wire.preco.cents(), 550);
/// ```
pub mod decimal {
    use super::Money;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Money, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(value.to_decimal())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Money, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = f64::deserialize(deserializer)?;
        Money::from_decimal(raw)
            .ok_or_else(|| de::Error::custom(format!("invalid monetary amount: {raw}")))
    }

    /// Same as the parent module for `Option<Money>` (e.g. a sale whose
    /// total the backend has not computed yet).
    pub mod option {
        use super::Money;
        use serde::{de, Deserialize, Deserializer, Serializer};

        pub fn serialize<S>(value: &Option<Money>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match value {
                Some(m) => serializer.serialize_some(&m.to_decimal()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Money>, D::Error>
        where
            D: Deserializer<'de>,
        {
            match Option::<f64>::deserialize(deserializer)? {
                Some(raw) => Money::from_decimal(raw)
                    .map(Some)
                    .ok_or_else(|| de::Error::custom(format!("invalid monetary amount: {raw}"))),
                None => Ok(None),
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.reais(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_from_major_minor() {
        assert_eq!(Money::from_major_minor(10, 99).cents(), 1099);
        assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "R$ 10,99");
        assert_eq!(Money::from_cents(500).to_string(), "R$ 5,00");
        assert_eq!(Money::from_cents(-550).to_string(), "-R$ 5,50");
        assert_eq!(Money::zero().to_string(), "R$ 0,00");
    }

    #[test]
    fn test_from_decimal_rounds_to_nearest_centavo() {
        assert_eq!(Money::from_decimal(10.0).unwrap().cents(), 1000);
        assert_eq!(Money::from_decimal(5.5).unwrap().cents(), 550);
        // 10.99 * 100 is 1098.9999999999998 in binary floating point
        assert_eq!(Money::from_decimal(10.99).unwrap().cents(), 1099);
        assert_eq!(Money::from_decimal(-5.5).unwrap().cents(), -550);
        assert!(Money::from_decimal(f64::INFINITY).is_none());
        assert!(Money::from_decimal(1e300).is_none());
    }

    #[test]
    fn test_float_drift_does_not_accumulate() {
        // 0.1 + 0.2 in floats is 0.30000000000000004
        let a = Money::from_decimal(0.1).unwrap();
        let b = Money::from_decimal(0.2).unwrap();
        assert_eq!((a + b).cents(), 30);

        let total: Money = std::iter::repeat(Money::from_decimal(0.1).unwrap())
            .take(1000)
            .sum();
        assert_eq!(total.cents(), 10_000);
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);

        let mut c = a;
        c += b;
        c -= Money::from_cents(100);
        assert_eq!(c.cents(), 1400);
    }

    #[test]
    fn test_divide_rounded() {
        assert_eq!(Money::from_cents(1000).divide_rounded(3).cents(), 333);
        assert_eq!(Money::from_cents(1001).divide_rounded(2).cents(), 501);
        assert_eq!(Money::from_cents(-1001).divide_rounded(2).cents(), -501);
        assert_eq!(Money::from_cents(999).divide_rounded(0).cents(), 0);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());
        assert!(Money::from_cents(100).is_positive());
        assert!(Money::from_cents(-100).is_negative());
    }

    #[test]
    fn test_overflow_is_checked_or_saturated() {
        let huge = Money::from_cents(i64::MAX / 10);

        assert_eq!(huge.checked_mul_quantity(11), None);
        assert_eq!(huge.checked_add(Money::from_cents(i64::MAX)), None);
        assert_eq!(
            Money::checked_sum([huge, huge]),
            Some(Money::from_cents(i64::MAX / 10 * 2))
        );
        assert_eq!(Money::checked_sum(vec![huge; 11]), None);

        assert_eq!(huge.multiply_quantity(11).cents(), i64::MAX);
        assert_eq!((huge * 11).cents(), i64::MAX);
        assert_eq!((Money::from_cents(i64::MAX) + huge).cents(), i64::MAX);
        assert_eq!((Money::from_cents(i64::MIN) - huge).cents(), i64::MIN);
        assert_eq!(vec![huge; 11].into_iter().sum::<Money>().cents(), i64::MAX);
    }

    #[test]
    fn test_decimal_serde_adapter() {
        #[derive(Serialize, Deserialize)]
        struct Wire {
            #[serde(with = "decimal")]
            total: Money,
            #[serde(with = "decimal::option", default)]
            discount: Option<Money>,
        }

        let wire: Wire = serde_json::from_str(r#"{"total": 22.0, "discount": null}"#).unwrap();
        assert_eq!(wire.total.cents(), 2200);
        assert!(wire.discount.is_none());

        let json = serde_json::to_value(&Wire {
            total: Money::from_cents(3050),
            discount: Some(Money::from_cents(5)),
        })
        .unwrap();
        assert_eq!(json["total"], serde_json::json!(30.5));
        assert_eq!(json["discount"], serde_json::json!(0.05));
    }
}
