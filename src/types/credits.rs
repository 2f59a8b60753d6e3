use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use std::str::FromStr;

/// A credit amount held as an exact base-10 decimal.
///
/// Arithmetic stays in [`Decimal`]; the value is only converted to `f64`
/// at the output boundary via [`Credits::value`] or serialization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Credits(Decimal);

impl Credits {
    pub const ZERO: Credits = Credits(Decimal::ZERO);
    pub const MAX: Credits = Credits(Decimal::MAX);

    const fn scaled(value: i64, scale: u32) -> Self {
        let abs = value.unsigned_abs();
        Credits(Decimal::from_parts(
            abs as u32,
            (abs >> 32) as u32,
            0,
            value < 0,
            scale,
        ))
    }

    /// Create from whole credits
    #[inline]
    pub const fn whole(credits: i64) -> Self {
        Self::scaled(credits, 0)
    }

    /// Create from tenths of a credit (e.g. `tenths(3)` is 0.3)
    #[inline]
    pub const fn tenths(value: i64) -> Self {
        Self::scaled(value, 1)
    }

    /// Create from hundredths of a credit (e.g. `hundredths(5)` is 0.05)
    #[inline]
    pub const fn hundredths(value: i64) -> Self {
        Self::scaled(value, 2)
    }

    #[inline]
    pub fn new(value: Decimal) -> Self {
        Credits(value)
    }

    #[inline]
    pub fn decimal(&self) -> Decimal {
        self.0
    }

    /// Floating value for display and serialization only
    #[inline]
    pub fn value(&self) -> f64 {
        // every Decimal fits in an f64's range
        self.0.to_f64().unwrap_or_default()
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    #[inline]
    pub fn checked_add(self, rhs: Credits) -> Option<Credits> {
        self.0.checked_add(rhs.0).map(Credits)
    }

    /// Addition clamped to the representable range
    #[inline]
    pub fn saturating_add(self, rhs: Credits) -> Credits {
        Credits(self.0.saturating_add(rhs.0))
    }

    /// Format with two decimals (e.g. "1.25")
    pub fn to_formatted_string(&self) -> String {
        format!("{:.2}", self.0)
    }
}

impl fmt::Display for Credits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.normalize(), f)
    }
}

impl FromStr for Credits {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str_exact(s.trim()).map(Credits)
    }
}

impl Add for Credits {
    type Output = Credits;

    #[inline]
    fn add(self, rhs: Credits) -> Credits {
        Credits(self.0 + rhs.0)
    }
}

impl AddAssign for Credits {
    #[inline]
    fn add_assign(&mut self, rhs: Credits) {
        self.0 += rhs.0;
    }
}

impl Sub for Credits {
    type Output = Credits;

    #[inline]
    fn sub(self, rhs: Credits) -> Credits {
        Credits(self.0 - rhs.0)
    }
}

impl Mul<i64> for Credits {
    type Output = Credits;

    #[inline]
    fn mul(self, rhs: i64) -> Credits {
        Credits(self.0 * Decimal::from(rhs))
    }
}

// Totals saturate rather than overflow
impl Sum for Credits {
    fn sum<I: Iterator<Item = Credits>>(iter: I) -> Self {
        iter.fold(Credits::ZERO, Credits::saturating_add)
    }
}

impl<'a> Sum<&'a Credits> for Credits {
    fn sum<I: Iterator<Item = &'a Credits>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl From<Decimal> for Credits {
    fn from(value: Decimal) -> Self {
        Credits(value)
    }
}

impl From<Credits> for f64 {
    fn from(credits: Credits) -> Self {
        credits.value()
    }
}

impl Serialize for Credits {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.value())
    }
}

impl<'de> Deserialize<'de> for Credits {
    /// Reads the JSON number text exactly, without passing through `f64`
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        rust_decimal::serde::arbitrary_precision::deserialize(deserializer).map(Credits)
    }
}
