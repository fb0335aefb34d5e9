//! Strongly typed identifiers and exact-decimal quantities.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Div, Mul, Sub};
use uuid::Uuid;

/// Identifier for a transfer document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(Uuid);

impl DocumentId {
    /// Create a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Return the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for DocumentId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The document families tracked by the custody graph.
///
/// Each kind supports a different subset of ancestor relations,
/// mapped by its ancestor resolver:
///
/// - `General`: temporary-storage forwarding plus grouping
/// - `Construction`: forwarding plus grouping
/// - `Clinical`: grouping plus synthesis
/// - `Packaging`: container-scoped previous-packaging chains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentKind {
    /// General waste transfer document
    General,
    /// Construction and demolition waste document
    Construction,
    /// Clinical/infectious waste document
    Clinical,
    /// A single container tracked within a fluid-waste shipment
    Packaging,
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::General => "GENERAL",
            Self::Construction => "CONSTRUCTION",
            Self::Clinical => "CLINICAL",
            Self::Packaging => "PACKAGING",
        };
        f.write_str(name)
    }
}

/// An exact-decimal waste quantity (kilograms).
///
/// Wraps [`rust_decimal::Decimal`] so that fraction compounding across
/// arbitrarily many forwarding/grouping levels never drifts the way
/// binary floating point would.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Quantity(Decimal);

impl Quantity {
    /// Zero quantity.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a quantity from a decimal value.
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Return the underlying decimal.
    pub const fn value(self) -> Decimal {
        self.0
    }

    /// Whether the quantity is exactly zero.
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    /// Scale by an exact-decimal fraction.
    pub fn scale(self, fraction: Decimal) -> Self {
        Self(self.0 * fraction)
    }

    /// Ratio of `self` to `denominator`, or `None` when the
    /// denominator is zero.
    pub fn ratio_to(self, denominator: Quantity) -> Option<Decimal> {
        if denominator.is_zero() {
            None
        } else {
            Some(self.0 / denominator.0)
        }
    }
}

impl From<Decimal> for Quantity {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl From<i64> for Quantity {
    fn from(value: i64) -> Self {
        Self(Decimal::from(value))
    }
}

impl Add for Quantity {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Quantity {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Mul<Decimal> for Quantity {
    type Output = Self;

    fn mul(self, rhs: Decimal) -> Self {
        Self(self.0 * rhs)
    }
}

impl Div for Quantity {
    type Output = Decimal;

    fn div(self, rhs: Self) -> Decimal {
        self.0 / rhs.0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
