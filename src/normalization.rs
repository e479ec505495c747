//! Input/output normalization policies.
//!
//! The network operates on normalized variables. Raw inputs are mapped through an affine
//! transform before the input layer, and the output layer's values are mapped back afterwards.
//! Each variable carries a parameter pair whose meaning depends on the policy:
//!
//! | policy     | pair               | normalize               |
//! |------------|--------------------|-------------------------|
//! | `MinMax`   | `(lower, upper)`   | `(x - lower) / (upper - lower)` |
//! | `Standard` | `(mean, std)`      | `(x - mean) / std`      |
//! | `Robust`   | `(median, iqr)`    | `(x - median) / iqr`    |
//!
//! Because every policy is affine, the derivative of the raw variable with respect to its
//! normalized counterpart is the constant [`Normalizer::scale`].

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Normalization parameter pair of one variable. Interpretation depends on the policy.
pub type NormPair = (f64, f64);

/// Strategy for mapping a variable to and from the network's internal scale.
pub trait Normalizer: fmt::Debug + Send + Sync {
    /// Tag of this policy.
    fn regularization(&self) -> Regularization;

    /// `d raw / d normalized`.
    fn scale(&self, params: NormPair) -> f64;

    /// Raw value that maps to a normalized value of zero.
    fn offset(&self, params: NormPair) -> f64;

    /// Whether a raw value lies in the region the network was trained on.
    ///
    /// Advisory only: nothing is clamped.
    fn includes(&self, raw: f64, params: NormPair) -> bool;

    #[inline]
    fn normalize(&self, raw: f64, params: NormPair) -> f64 {
        (raw - self.offset(params)) / self.scale(params)
    }

    #[inline]
    fn denormalize(&self, normalized: f64, params: NormPair) -> f64 {
        self.scale(params) * normalized + self.offset(params)
    }
}

/// Scaling to the unit interval using the variable's bounds.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinMax;

/// Scaling by mean and standard deviation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Standard;

/// Scaling by a quantile-based center and spread (e.g. median and inter-quartile range).
#[derive(Debug, Clone, Copy, Default)]
pub struct Robust;

/// Normalized values outside `[-2, 2]` are flagged for `Standard`.
pub const STANDARD_TRUST_RADIUS: f64 = 2.0;
/// Normalized values outside `[-10, 10]` are flagged for `Robust`.
pub const ROBUST_TRUST_RADIUS: f64 = 10.0;

impl Normalizer for MinMax {
    fn regularization(&self) -> Regularization {
        Regularization::MinMax
    }

    #[inline]
    fn scale(&self, (lower, upper): NormPair) -> f64 {
        upper - lower
    }

    #[inline]
    fn offset(&self, (lower, _): NormPair) -> f64 {
        lower
    }

    fn includes(&self, raw: f64, (lower, upper): NormPair) -> bool {
        (lower..=upper).contains(&raw)
    }
}

impl Normalizer for Standard {
    fn regularization(&self) -> Regularization {
        Regularization::Standard
    }

    #[inline]
    fn scale(&self, (_, std): NormPair) -> f64 {
        std
    }

    #[inline]
    fn offset(&self, (mean, _): NormPair) -> f64 {
        mean
    }

    fn includes(&self, raw: f64, params: NormPair) -> bool {
        self.normalize(raw, params).abs() <= STANDARD_TRUST_RADIUS
    }
}

impl Normalizer for Robust {
    fn regularization(&self) -> Regularization {
        Regularization::Robust
    }

    #[inline]
    fn scale(&self, (_, spread): NormPair) -> f64 {
        spread
    }

    #[inline]
    fn offset(&self, (center, _): NormPair) -> f64 {
        center
    }

    fn includes(&self, raw: f64, params: NormPair) -> bool {
        self.normalize(raw, params).abs() <= ROBUST_TRUST_RADIUS
    }
}

/// Normalization policy tag, as named in network definitions.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Regularization {
    #[default]
    MinMax,
    Standard,
    Robust,
}

static MIN_MAX: MinMax = MinMax;
static STANDARD: Standard = Standard;
static ROBUST: Robust = Robust;

impl Regularization {
    /// The strategy implementing this policy.
    pub fn normalizer(self) -> &'static dyn Normalizer {
        match self {
            Regularization::MinMax => &MIN_MAX,
            Regularization::Standard => &STANDARD,
            Regularization::Robust => &ROBUST,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Regularization::MinMax => "minmax",
            Regularization::Standard => "standard",
            Regularization::Robust => "robust",
        }
    }

    /// Human-readable labels of the two parameters.
    pub fn parameter_labels(self) -> (&'static str, &'static str) {
        match self {
            Regularization::MinMax => ("lower limit", "upper limit"),
            Regularization::Standard => ("mean", "std"),
            Regularization::Robust => ("median", "IQ range"),
        }
    }
}

impl FromStr for Regularization {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "minmax" => Ok(Regularization::MinMax),
            "standard" => Ok(Regularization::Standard),
            "robust" => Ok(Regularization::Robust),
            other => Err(Error::InvalidConfig(format!(
                "unknown regularization method `{other}`"
            ))),
        }
    }
}

impl fmt::Display for Regularization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POLICIES: [Regularization; 3] = [
        Regularization::MinMax,
        Regularization::Standard,
        Regularization::Robust,
    ];

    #[test]
    fn min_max_maps_bounds_to_unit_interval() {
        let n = Regularization::MinMax.normalizer();
        let params = (-3.0, 5.0);
        assert_eq!(n.normalize(-3.0, params), 0.0);
        assert_eq!(n.normalize(5.0, params), 1.0);
        assert_eq!(n.normalize(1.0, params), 0.5);
        assert_eq!(n.denormalize(0.25, params), -1.0);
        assert_eq!(n.scale(params), 8.0);
    }

    #[test]
    fn standard_and_robust_share_formula() {
        let params = (2.0, 4.0);
        for reg in [Regularization::Standard, Regularization::Robust] {
            let n = reg.normalizer();
            assert_eq!(n.normalize(10.0, params), 2.0);
            assert_eq!(n.denormalize(-0.5, params), 0.0);
            assert_eq!(n.scale(params), 4.0);
            assert_eq!(n.offset(params), 2.0);
        }
    }

    #[test]
    fn denormalize_inverts_normalize() {
        let params = (-1.25, 7.5);
        for reg in POLICIES {
            let n = reg.normalizer();
            for x in [-100.0, -1.25, 0.0, 0.3, 7.5, 1e6] {
                let back = n.denormalize(n.normalize(x, params), params);
                let tol = 1e-12 * x.abs().max(1.0);
                assert!((back - x).abs() <= tol, "{reg}: {x} -> {back}");
            }
        }
    }

    #[test]
    fn min_max_inclusion_is_closed_interval() {
        let n = MinMax;
        assert!(n.includes(10.0, (0.0, 10.0)));
        assert!(n.includes(0.0, (0.0, 10.0)));
        assert!(!n.includes(10.000_000_1, (0.0, 10.0)));
        assert!(!n.includes(-1e-9, (0.0, 10.0)));
        assert!(!n.includes(f64::NAN, (0.0, 10.0)));
    }

    #[test]
    fn trust_radius_depends_on_policy() {
        let params = (1.0, 0.5);
        // normalized = 4
        assert!(!Standard.includes(3.0, params));
        assert!(Robust.includes(3.0, params));
        assert!(Standard.includes(2.0, params));
        assert!(Standard.includes(0.0, params));
        assert!(!Robust.includes(6.5, params));
    }

    #[test]
    fn policy_names_round_trip() {
        for reg in POLICIES {
            assert_eq!(reg.name().parse::<Regularization>().unwrap(), reg);
            assert_eq!(reg.normalizer().regularization(), reg);
        }
        assert!("zscore".parse::<Regularization>().is_err());
    }
}
