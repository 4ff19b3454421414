//! Constant-time operations for security.

use subtle::{Choice, ConstantTimeEq};

/// Compare two byte slices in constant time.
///
/// Slices of different length never match; only the length is observable
/// through timing. Equal-length slices are compared without stopping at the
/// first differing byte.
///
/// # Arguments
/// * `a` - First byte slice
/// * `b` - Second byte slice
///
/// # Returns
/// true if slices are equal, false otherwise
pub fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    constant_time_eq_choice(a, b).into()
}

/// Same as [`constant_time_compare`] but returns a [`Choice`] so several
/// results can be combined without branching.
pub fn constant_time_eq_choice(a: &[u8], b: &[u8]) -> Choice {
    if a.len() != b.len() {
        return Choice::from(0);
    }
    a.ct_eq(b)
}
