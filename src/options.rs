//! Per-call options for the matrix inverse.

use num_traits::Zero;

/// Options for [`inverse_with`](crate::ops::inverse_with).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InverseOptions<T> {
    /// A pivot whose magnitude is at or below this value counts as zero.
    pub pivot_tolerance: T,
    /// Swap in a lower row with a larger entry when a pivot counts as zero.
    /// When disabled, such a pivot makes the matrix singular.
    pub pivoting: bool,
}

impl<T: Zero> Default for InverseOptions<T> {
    fn default() -> Self {
        Self {
            pivot_tolerance: T::zero(),
            pivoting: true,
        }
    }
}

impl<T: Copy> InverseOptions<T> {
    /// Replaces every field that `options_override` sets.
    pub fn override_with(&mut self, options_override: &InverseOptionsOverride<T>) {
        if let Some(pivot_tolerance) = options_override.pivot_tolerance {
            self.pivot_tolerance = pivot_tolerance;
        }
        if let Some(pivoting) = options_override.pivoting {
            self.pivoting = pivoting;
        }
    }
}

/// Partial [`InverseOptions`]; unset fields keep their defaults.
///
/// ```
/// use nykdtb::{InverseOptions, InverseOptionsOverride};
///
/// let mut options = InverseOptions::<f64>::default();
/// options.override_with(&InverseOptionsOverride {
///     pivot_tolerance: Some(1e-12),
///     ..Default::default()
/// });
/// assert_eq!(options.pivot_tolerance, 1e-12);
/// assert!(options.pivoting);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InverseOptionsOverride<T> {
    pub pivot_tolerance: Option<T>,
    pub pivoting: Option<bool>,
}

impl<T> Default for InverseOptionsOverride<T> {
    fn default() -> Self {
        Self {
            pivot_tolerance: None,
            pivoting: None,
        }
    }
}
