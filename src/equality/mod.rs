//! # Structural equality engine
//!
//! Compares two values of the same static shape by structural decomposition and
//! reports the first difference as a [`Mismatch`]. Every comparable type implements
//! [`Comparable`] exactly once, so the rule for a value is chosen at compile time
//! by its [`Shape`]:
//!
//! | Shape | Rule |
//! |---|---|
//! | Unit | always equal |
//! | Primitive | `==` on the value |
//! | Pointer | address identity |
//! | Slice | pointer identity, then length; contents are not inspected |
//! | FixedArray | element-wise, recursively |
//! | Vector | lane-wise |
//! | Aggregate | every field in declaration order |
//! | TaggedUnion | discriminant first, then the shared active payload |
//! | Optional | both absent, or both present and equal |
//! | FallibleResult | same branch, and equal contents |
//!
//! Slices and fixed arrays deliberately disagree: two slices over different storage
//! never compare equal even when their contents match, while two arrays with the
//! same contents always do. Use [`check_slice_contents`] to compare slice contents.
//!
//! Types with no meaningful equality have no implementation and are rejected when
//! the test image is built:
//!
//! ```compile_fail
//! let never: Option<core::convert::Infallible> = None;
//! let _ = ontarget::check_equal(&never, &never);
//! ```
//!
//! ```compile_fail
//! fn opaque(blob: &core::ffi::c_void) {
//!     let _ = ontarget::check_equal(blob, blob);
//! }
//! ```
//!
//! ```compile_fail
//! let frame = async {};
//! let _ = ontarget::check_equal(&frame, &frame);
//! ```
//!
//! Comparison never allocates.

use core::fmt;

mod containers;
mod macros;
pub mod mismatch;
mod primitives;

pub use containers::Vector;
pub use mismatch::{Mismatch, MismatchKind, Path, Segment, MAX_DEPTH};

/// Static structural classification of a comparable value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    Unit,
    Primitive,
    Pointer,
    Slice,
    FixedArray,
    Vector,
    Aggregate,
    TaggedUnion,
    Optional,
    FallibleResult,
}

/// A value the equality engine knows how to compare.
///
/// Implement it for your own types with [`comparable_struct!`](crate::comparable_struct),
/// [`comparable_enum!`](crate::comparable_enum) or
/// [`comparable_by_eq!`](crate::comparable_by_eq).
pub trait Comparable: fmt::Debug {
    const SHAPE: Shape;

    /// Compares `self` (the expected value) against `actual`.
    fn compare<'a>(&'a self, actual: &'a Self) -> Result<(), Mismatch<'a>>;
}

/// Compares two values and returns the first difference.
#[inline]
pub fn check_equal<'a, T: Comparable>(
    expected: &'a T,
    actual: &'a T,
) -> Result<(), Mismatch<'a>> {
    expected.compare(actual)
}

/// Compares one component of a composite value, tagging any mismatch with `segment`.
#[inline]
pub fn check_field<'a, T: Comparable>(
    segment: Segment,
    expected: &'a T,
    actual: &'a T,
) -> Result<(), Mismatch<'a>> {
    expected.compare(actual).map_err(|mismatch| mismatch.within(segment))
}

/// Compares the contents of two slices element by element.
///
/// This is the content comparator fixed arrays delegate to.
pub fn check_slice_contents<'a, T: Comparable>(
    expected: &'a [T],
    actual: &'a [T],
) -> Result<(), Mismatch<'a>> {
    if expected.len() != actual.len() {
        return Err(Mismatch::new(MismatchKind::SliceLength {
            expected: expected.len(),
            found: actual.len(),
        }));
    }
    for (index, (expected, actual)) in expected.iter().zip(actual).enumerate() {
        check_field(Segment::Index(index), expected, actual)?;
    }
    Ok(())
}

/// Asserts two values are structurally equal.
///
/// On mismatch this takes the fatal path and does not return: the diagnostic is
/// raised as a panic, which the runner (or the firmware's panic handler through
/// [`report_panic`](crate::runner::report_panic)) reports before halting. Inside a
/// host runner the failure unwinds straight to the runner without running the
/// panic hook, so it is reported once.
#[track_caller]
pub fn assert_equal<T: Comparable>(expected: T, actual: T) {
    if let Err(mismatch) = check_equal(&expected, &actual) {
        fatal(&mismatch)
    }
}

/// Asserts two slices hold equal contents, whatever storage backs them.
#[track_caller]
pub fn assert_slice_contents<T: Comparable>(expected: &[T], actual: &[T]) {
    if let Err(mismatch) = check_slice_contents(expected, actual) {
        fatal(&mismatch)
    }
}

#[cold]
#[track_caller]
fn fatal(mismatch: &Mismatch<'_>) -> ! {
    #[cfg(feature = "std")]
    if crate::runner::catching_failures() {
        std::panic::resume_unwind(Box::new(crate::errors::Failure::from(*mismatch)));
    }
    panic!("{}", mismatch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_contents_reports_index() {
        let expected = [1u16, 2, 3];
        let actual = [1u16, 2, 4];
        let mismatch = check_slice_contents(&expected, &actual).unwrap_err();
        assert_eq!(mismatch.path().innermost(), Some(Segment::Index(2)));
        assert_eq!(mismatch.to_string(), "index 2 incorrect. expected 3, found 4");
    }

    #[test]
    fn test_slice_contents_reports_length_first() {
        let expected = [1u8, 2];
        let actual = [1u8, 2, 3];
        let mismatch = check_slice_contents(&expected, &actual).unwrap_err();
        assert_eq!(
            mismatch.to_string(),
            "slice length differs: expected 2, found 3"
        );
    }

    #[test]
    fn test_assert_equal_passes_silently() {
        assert_equal(5u8, 5u8);
        assert_equal([1i32, 2, 3], [1i32, 2, 3]);
        assert_equal(Some(Ok::<u8, i8>(1)), Some(Ok(1)));
    }

    #[test]
    fn test_assert_equal_outside_a_runner_panics_with_the_diagnostic() {
        let outcome = std::panic::catch_unwind(|| assert_equal(1u8, 2u8));
        let payload = outcome.unwrap_err();
        let message = payload.downcast_ref::<String>().unwrap();
        assert_eq!(message, "expected 1, found 2");
    }
}
