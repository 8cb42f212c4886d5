//! Length quantities with units, and the two-axis sizes built from them.
//!
//! A [`Unit`] is a magnitude tagged with a [`LengthUnit`]. Zero is special:
//! it carries no tag and combines with anything, so empty or default
//! quantities never block a computation. Combining two non-zero quantities
//! with different tags is a [`LayoutError::UnitMismatch`].
//!
//! A [`Dim`] pairs two [`Extent`]s. An axis may be
//! [`Extent::Unconstrained`], which tells a node to size itself from its
//! content along that axis; this is distinct from a zero extent.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::str::FromStr;

use serde::Serialize;
use strum_macros::{AsRefStr, Display, EnumString};
use thiserror::Error;

use crate::error::LayoutError;

/// Multiplier used to invent a missing axis when converting a half-constrained
/// [`Dim`] to pixels (the missing axis becomes `4 x` the defined one).
pub const UNCONSTRAINED_PIXEL_ASPECT: f64 = 4.0;

/// Multiplier used to invent a missing axis when converting a half-constrained
/// [`Dim`] to inches.
pub const UNCONSTRAINED_INCH_ASPECT: f64 = 1.0;

/// Physical length unit.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString, AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum LengthUnit {
    /// Device pixels; converted through the resolution.
    #[serde(rename = "px")]
    #[strum(to_string = "px", serialize = "pixel", serialize = "pixels")]
    Pixel,
    /// Inches.
    #[serde(rename = "in")]
    #[strum(to_string = "in", serialize = "inch", serialize = "inches")]
    Inch,
}

/// A scalar length with an optional unit tag.
///
/// The tag is only absent for zero.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct Unit {
    n: f64,
    unit: Option<LengthUnit>,
}

impl Unit {
    /// The unit-agnostic zero.
    #[must_use]
    pub const fn zero() -> Self {
        Self { n: 0.0, unit: None }
    }

    /// A quantity of `n` in `unit`.
    #[must_use]
    pub const fn new(n: f64, unit: LengthUnit) -> Self {
        Self {
            n,
            unit: Some(unit),
        }
    }

    /// `n` inches.
    #[must_use]
    pub const fn inches(n: f64) -> Self {
        Self::new(n, LengthUnit::Inch)
    }

    /// `n` pixels.
    #[must_use]
    pub const fn pixels(n: f64) -> Self {
        Self::new(n, LengthUnit::Pixel)
    }

    /// The magnitude, in whatever unit this quantity carries.
    #[must_use]
    pub const fn value(self) -> f64 {
        self.n
    }

    /// The unit tag (`None` only for untagged zero).
    #[must_use]
    pub const fn unit(self) -> Option<LengthUnit> {
        self.unit
    }

    /// Whether the magnitude is exactly zero.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_zero(self) -> bool {
        self.n == 0.0
    }

    /// Whether `self` and `other` may be combined arithmetically.
    #[must_use]
    pub fn is_compatible(self, other: Self) -> bool {
        self.unit == other.unit || self.is_zero() || other.is_zero()
    }

    /// Unit tag of a result combining `self` and `other`: the tag of whichever
    /// operand is non-zero.
    fn check(self, other: Self) -> Result<Option<LengthUnit>, LayoutError> {
        if !self.is_compatible(other) {
            return Err(LayoutError::UnitMismatch {
                left: self,
                right: other,
            });
        }
        Ok(if self.is_zero() {
            other.unit.or(self.unit)
        } else {
            self.unit.or(other.unit)
        })
    }

    /// Checked addition.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UnitMismatch`] if the units disagree.
    pub fn try_add(self, other: Self) -> Result<Self, LayoutError> {
        let unit = self.check(other)?;
        Ok(Self {
            n: self.n + other.n,
            unit,
        })
    }

    /// Checked subtraction.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UnitMismatch`] if the units disagree.
    pub fn try_sub(self, other: Self) -> Result<Self, LayoutError> {
        let unit = self.check(other)?;
        Ok(Self {
            n: self.n - other.n,
            unit,
        })
    }

    /// Checked multiplication by another quantity. The result keeps the shared
    /// unit tag rather than squaring it.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UnitMismatch`] if the units disagree.
    pub fn try_mul(self, other: Self) -> Result<Self, LayoutError> {
        let unit = self.check(other)?;
        Ok(Self {
            n: self.n * other.n,
            unit,
        })
    }

    /// Checked division by another quantity, keeping the shared unit tag.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UnitMismatch`] if the units disagree.
    pub fn try_div(self, other: Self) -> Result<Self, LayoutError> {
        let unit = self.check(other)?;
        Ok(Self {
            n: self.n / other.n,
            unit,
        })
    }

    /// Dimensionless ratio `self / other`.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UnitMismatch`] if the units disagree.
    pub fn ratio(self, other: Self) -> Result<f64, LayoutError> {
        Ok(self.try_div(other)?.n)
    }

    /// Checked comparison.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UnitMismatch`] if the units disagree.
    pub fn try_cmp(self, other: Self) -> Result<Ordering, LayoutError> {
        let _ = self.check(other)?;
        Ok(self
            .n
            .partial_cmp(&other.n)
            .unwrap_or_else(|| self.n.total_cmp(&other.n)))
    }

    /// Checked maximum.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UnitMismatch`] if the units disagree.
    pub fn try_max(self, other: Self) -> Result<Self, LayoutError> {
        Ok(match self.try_cmp(other)? {
            Ordering::Less => other,
            Ordering::Equal | Ordering::Greater => self,
        })
    }

    /// Checked minimum.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UnitMismatch`] if the units disagree.
    pub fn try_min(self, other: Self) -> Result<Self, LayoutError> {
        Ok(match self.try_cmp(other)? {
            Ordering::Greater => other,
            Ordering::Equal | Ordering::Less => self,
        })
    }

    /// Convert to pixels at `resolution` pixels per inch.
    #[must_use]
    pub fn to_px(self, resolution: f64) -> Self {
        match self.unit {
            Some(LengthUnit::Pixel) => self,
            Some(LengthUnit::Inch) => Self::pixels(self.n * resolution),
            None => Self::zero(),
        }
    }

    /// Convert to inches at `resolution` pixels per inch.
    #[must_use]
    pub fn to_in(self, resolution: f64) -> Self {
        match self.unit {
            Some(LengthUnit::Inch) => self,
            Some(LengthUnit::Pixel) => Self::inches(self.n / resolution),
            None => Self::zero(),
        }
    }

    /// Convert to `target` at `resolution` pixels per inch.
    #[must_use]
    pub fn to_unit(self, target: LengthUnit, resolution: f64) -> Self {
        match target {
            LengthUnit::Pixel => self.to_px(resolution),
            LengthUnit::Inch => self.to_in(resolution),
        }
    }
}

impl PartialEq for Unit {
    #[allow(clippy::float_cmp)]
    fn eq(&self, other: &Self) -> bool {
        if self.is_zero() && other.is_zero() {
            return true;
        }
        self.n == other.n && self.unit == other.unit
    }
}

/// Ordering is only defined between compatible quantities; mismatched units
/// compare as `None`. Use [`Unit::try_cmp`] to turn that into an error.
impl PartialOrd for Unit {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.is_compatible(*other) {
            self.n.partial_cmp(&other.n)
        } else {
            None
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unit {
            Some(unit) => write!(f, "{}{unit}", self.n),
            None => write!(f, "{}", self.n),
        }
    }
}

/// # Panics
///
/// Panics if both operands are non-zero with different units.
impl Add for Unit {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.try_add(rhs).unwrap_or_else(|e| panic!("{e}"))
    }
}

/// # Panics
///
/// Panics if both operands are non-zero with different units.
impl Sub for Unit {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self.try_sub(rhs).unwrap_or_else(|e| panic!("{e}"))
    }
}

impl Mul<f64> for Unit {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self {
            n: self.n * rhs,
            unit: self.unit,
        }
    }
}

impl Div<f64> for Unit {
    type Output = Self;

    fn div(self, rhs: f64) -> Self {
        Self {
            n: self.n / rhs,
            unit: self.unit,
        }
    }
}

impl Neg for Unit {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            n: -self.n,
            unit: self.unit,
        }
    }
}

/// Error returned when a length string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid length '{0}': expected a number followed by 'in' or 'px'")]
pub struct ParseUnitError(String);

/// Parses `"6in"`, `"300px"`, `"1.5 inches"`, or a bare `"0"`.
impl FromStr for Unit {
    type Err = ParseUnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseUnitError(s.to_string());
        let trimmed = s.trim();
        // the suffix is the trailing run of letters, so exponents stay numeric
        let number = trimmed.trim_end_matches(|c: char| c.is_ascii_alphabetic());
        let suffix = &trimmed[number.len()..];
        let n: f64 = number.trim().parse().map_err(|_| invalid())?;

        if suffix.is_empty() {
            return if Self::pixels(n).is_zero() {
                Ok(Self::zero())
            } else {
                Err(invalid())
            };
        }

        let unit = LengthUnit::from_str(suffix).map_err(|_| invalid())?;
        Ok(Self::new(n, unit))
    }
}

/// Extent along one axis: a defined length, or explicitly unconstrained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Extent {
    /// No constraint: size from content along this axis.
    #[default]
    Unconstrained,
    /// A definite length.
    Defined(Unit),
}

impl Extent {
    /// Whether this axis is unconstrained.
    #[must_use]
    pub const fn is_unconstrained(self) -> bool {
        matches!(self, Self::Unconstrained)
    }

    /// The defined length, if any.
    #[must_use]
    pub const fn defined(self) -> Option<Unit> {
        match self {
            Self::Defined(unit) => Some(unit),
            Self::Unconstrained => None,
        }
    }

    /// The defined length, or [`LayoutError::Unconstrained`] naming `what`.
    ///
    /// # Errors
    ///
    /// Returns an error if this axis is unconstrained.
    pub fn require(self, what: &'static str) -> Result<Unit, LayoutError> {
        match self {
            Self::Defined(unit) => Ok(unit),
            Self::Unconstrained => Err(LayoutError::Unconstrained(what)),
        }
    }

    /// Map the defined length; unconstrained stays unconstrained.
    #[must_use]
    pub fn map(self, f: impl FnOnce(Unit) -> Unit) -> Self {
        match self {
            Self::Defined(unit) => Self::Defined(f(unit)),
            Self::Unconstrained => Self::Unconstrained,
        }
    }

    /// Fallible [`Extent::map`].
    ///
    /// # Errors
    ///
    /// Propagates the error returned by `f`.
    pub fn try_map(
        self,
        f: impl FnOnce(Unit) -> Result<Unit, LayoutError>,
    ) -> Result<Self, LayoutError> {
        Ok(match self {
            Self::Defined(unit) => Self::Defined(f(unit)?),
            Self::Unconstrained => Self::Unconstrained,
        })
    }
}

impl From<Unit> for Extent {
    fn from(unit: Unit) -> Self {
        Self::Defined(unit)
    }
}

impl From<Option<Unit>> for Extent {
    fn from(unit: Option<Unit>) -> Self {
        unit.map_or(Self::Unconstrained, Self::Defined)
    }
}

impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Defined(unit) => write!(f, "{unit}"),
            Self::Unconstrained => f.write_str("*"),
        }
    }
}

/// The axis a container arranges its children along.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum Direction {
    /// Left to right; the main axis is width.
    #[strum(to_string = "horizontal", serialize = "horz", serialize = "row")]
    Horizontal,
    /// Top to bottom; the main axis is height.
    #[strum(to_string = "vertical", serialize = "vert", serialize = "column")]
    Vertical,
}

impl Direction {
    /// The perpendicular direction.
    #[must_use]
    pub const fn cross(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }

    /// Whether this is [`Direction::Horizontal`].
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Horizontal)
    }
}

/// Placement of content inside a larger extent along one axis.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Align {
    /// Leading edge (left or top); content is left where it is.
    #[default]
    Start,
    /// Centered.
    #[strum(to_string = "middle", serialize = "center")]
    Middle,
    /// Trailing edge (right or bottom).
    End,
}

/// A width by height pair; either axis may be unconstrained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Dim {
    /// Horizontal extent.
    pub width: Extent,
    /// Vertical extent.
    pub height: Extent,
}

impl Dim {
    /// Build a dim from anything convertible to an [`Extent`] (a [`Unit`], an
    /// `Option<Unit>`, or an [`Extent`]).
    #[must_use]
    pub fn new(width: impl Into<Extent>, height: impl Into<Extent>) -> Self {
        Self {
            width: width.into(),
            height: height.into(),
        }
    }

    /// Both axes unconstrained.
    #[must_use]
    pub const fn unconstrained() -> Self {
        Self {
            width: Extent::Unconstrained,
            height: Extent::Unconstrained,
        }
    }

    /// A fully defined dim in inches.
    #[must_use]
    pub const fn inches(width: f64, height: f64) -> Self {
        Self {
            width: Extent::Defined(Unit::inches(width)),
            height: Extent::Defined(Unit::inches(height)),
        }
    }

    /// A fully defined dim in pixels.
    #[must_use]
    pub const fn pixels(width: f64, height: f64) -> Self {
        Self {
            width: Extent::Defined(Unit::pixels(width)),
            height: Extent::Defined(Unit::pixels(height)),
        }
    }

    /// The extent along `direction`.
    #[must_use]
    pub const fn along(&self, direction: Direction) -> Extent {
        match direction {
            Direction::Horizontal => self.width,
            Direction::Vertical => self.height,
        }
    }

    /// Copy with the `direction` axis replaced by `replacement`.
    ///
    /// Containers pass `Extent::Unconstrained` to ask children to size
    /// themselves from the cross axis only.
    #[must_use]
    pub const fn partial(&self, direction: Direction, replacement: Extent) -> Self {
        match direction {
            Direction::Horizontal => Self {
                width: replacement,
                height: self.height,
            },
            Direction::Vertical => Self {
                width: self.width,
                height: replacement,
            },
        }
    }

    /// Whether both axes are unconstrained.
    #[must_use]
    pub const fn is_unconstrained(&self) -> bool {
        self.width.is_unconstrained() && self.height.is_unconstrained()
    }

    /// Both axes as defined lengths.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Unconstrained`] naming `what` if either axis is
    /// unconstrained.
    pub fn defined_size(&self, what: &'static str) -> Result<(Unit, Unit), LayoutError> {
        match (self.width, self.height) {
            (Extent::Defined(width), Extent::Defined(height)) => Ok((width, height)),
            _ => Err(LayoutError::Unconstrained(what)),
        }
    }

    /// Per-axis difference; an axis unconstrained on either side stays
    /// unconstrained.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UnitMismatch`] if the units disagree.
    pub fn try_sub(&self, other: &Self) -> Result<Self, LayoutError> {
        let axis = |a: Extent, b: Extent| match (a, b) {
            (Extent::Defined(a), Extent::Defined(b)) => a.try_sub(b).map(Extent::Defined),
            _ => Ok(Extent::Unconstrained),
        };
        Ok(Self {
            width: axis(self.width, other.width)?,
            height: axis(self.height, other.height)?,
        })
    }

    /// Shared unit of the defined axes, if any axis carries one.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UnitMismatch`] if width and height disagree.
    pub fn unit(&self) -> Result<Option<LengthUnit>, LayoutError> {
        match (self.width, self.height) {
            (Extent::Defined(w), Extent::Defined(h)) => {
                let _ = w.try_cmp(h)?;
                Ok(if w.is_zero() {
                    h.unit().or(w.unit())
                } else {
                    w.unit().or(h.unit())
                })
            }
            (Extent::Defined(unit), Extent::Unconstrained)
            | (Extent::Unconstrained, Extent::Defined(unit)) => Ok(unit.unit()),
            (Extent::Unconstrained, Extent::Unconstrained) => Ok(None),
        }
    }

    /// Return `self` unchanged, or an error if either defined axis is
    /// negative.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::NegativeExtent`] for a negative axis.
    pub fn nonnegative(self) -> Result<Self, LayoutError> {
        if let Extent::Defined(value) = self.width
            && value.value() < 0.0
        {
            return Err(LayoutError::NegativeExtent {
                axis: "width",
                value,
            });
        }
        if let Extent::Defined(value) = self.height
            && value.value() < 0.0
        {
            return Err(LayoutError::NegativeExtent {
                axis: "height",
                value,
            });
        }
        Ok(self)
    }

    /// Resolve a missing axis from the other one times `factor`.
    fn resolve_axes(&self, factor: f64, what: &'static str) -> Result<(Unit, Unit), LayoutError> {
        match (self.width, self.height) {
            (Extent::Defined(w), Extent::Defined(h)) => Ok((w, h)),
            (Extent::Unconstrained, Extent::Defined(h)) => Ok((h * factor, h)),
            (Extent::Defined(w), Extent::Unconstrained) => Ok((w, w * factor)),
            (Extent::Unconstrained, Extent::Unconstrained) => {
                Err(LayoutError::Unconstrained(what))
            }
        }
    }

    /// Fully defined copy in pixels. A single unconstrained axis becomes
    /// [`UNCONSTRAINED_PIXEL_ASPECT`] times the other.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Unconstrained`] if both axes are unconstrained.
    pub fn to_px(&self, resolution: f64) -> Result<Self, LayoutError> {
        let (w, h) = self.resolve_axes(UNCONSTRAINED_PIXEL_ASPECT, "pixel conversion")?;
        Ok(Self::new(w.to_px(resolution), h.to_px(resolution)))
    }

    /// Fully defined copy in inches. A single unconstrained axis copies the
    /// other.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Unconstrained`] if both axes are unconstrained.
    pub fn to_in(&self, resolution: f64) -> Result<Self, LayoutError> {
        let (w, h) = self.resolve_axes(UNCONSTRAINED_INCH_ASPECT, "inch conversion")?;
        Ok(Self::new(w.to_in(resolution), h.to_in(resolution)))
    }

    /// Fully defined copy in `target`.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Unconstrained`] if both axes are unconstrained.
    pub fn to_unit(&self, target: LengthUnit, resolution: f64) -> Result<Self, LayoutError> {
        match target {
            LengthUnit::Pixel => self.to_px(resolution),
            LengthUnit::Inch => self.to_in(resolution),
        }
    }

    /// Whole-pixel `(width, height)`, truncating fractions and clamping
    /// negatives to zero.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Unconstrained`] if both axes are unconstrained.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn pixel_size(&self, resolution: f64) -> Result<(u32, u32), LayoutError> {
        let px = self.to_px(resolution)?;
        let (w, h) = px.defined_size("pixel conversion")?;
        Ok((w.value() as u32, h.value() as u32))
    }
}

impl Mul<f64> for Dim {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self {
            width: self.width.map(|w| w * rhs),
            height: self.height.map(|h| h * rhs),
        }
    }
}

impl Div<f64> for Dim {
    type Output = Self;

    fn div(self, rhs: f64) -> Self {
        Self {
            width: self.width.map(|w| w / rhs),
            height: self.height.map(|h| h / rhs),
        }
    }
}

impl fmt::Display for Dim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {}", self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_takes_other_operands_unit() {
        let sum = Unit::inches(0.0).try_add(Unit::pixels(3.0)).unwrap();
        assert_eq!(sum.unit(), Some(LengthUnit::Pixel));
        assert_eq!(sum, Unit::pixels(3.0));
    }

    #[test]
    fn test_resolve_axes_uses_factor() {
        let dim = Dim::new(Unit::inches(2.0), Extent::Unconstrained);
        let (w, h) = dim.resolve_axes(3.0, "test").unwrap();
        assert_eq!(w, Unit::inches(2.0));
        assert_eq!(h, Unit::inches(6.0));
    }
}
