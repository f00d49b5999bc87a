// Slice, array, vector, optional, result and tuple shapes.

use core::fmt;

use super::{
    check_field, check_slice_contents, Comparable, Mismatch, MismatchKind, Segment, Shape,
};

// Slices compare by identity: same start address and same length.
// Contents are never read, so equal data in different storage is a mismatch.
fn compare_slice_identity<'a>(
    expected: (*const (), usize),
    found: (*const (), usize),
) -> Result<(), Mismatch<'a>> {
    if expected.0 != found.0 {
        return Err(Mismatch::new(MismatchKind::SlicePointer {
            expected: expected.0,
            found: found.0,
        }));
    }
    if expected.1 != found.1 {
        return Err(Mismatch::new(MismatchKind::SliceLength {
            expected: expected.1,
            found: found.1,
        }));
    }
    Ok(())
}

impl<T: fmt::Debug> Comparable for &[T] {
    const SHAPE: Shape = Shape::Slice;

    #[inline]
    fn compare<'a>(&'a self, actual: &'a Self) -> Result<(), Mismatch<'a>> {
        compare_slice_identity(
            (self.as_ptr().cast(), self.len()),
            (actual.as_ptr().cast(), actual.len()),
        )
    }
}

impl<T: fmt::Debug> Comparable for &mut [T] {
    const SHAPE: Shape = Shape::Slice;

    #[inline]
    fn compare<'a>(&'a self, actual: &'a Self) -> Result<(), Mismatch<'a>> {
        compare_slice_identity(
            (self.as_ptr().cast(), self.len()),
            (actual.as_ptr().cast(), actual.len()),
        )
    }
}

impl Comparable for &str {
    const SHAPE: Shape = Shape::Slice;

    #[inline]
    fn compare<'a>(&'a self, actual: &'a Self) -> Result<(), Mismatch<'a>> {
        compare_slice_identity(
            (self.as_ptr().cast(), self.len()),
            (actual.as_ptr().cast(), actual.len()),
        )
    }
}

impl<T: Comparable, const N: usize> Comparable for [T; N] {
    const SHAPE: Shape = Shape::FixedArray;

    #[inline]
    fn compare<'a>(&'a self, actual: &'a Self) -> Result<(), Mismatch<'a>> {
        check_slice_contents(self.as_slice(), actual.as_slice())
    }
}

/// A fixed group of lanes compared element-wise, the way SIMD registers are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Vector<T, const LANES: usize>(pub [T; LANES]);

impl<T: Copy, const LANES: usize> Vector<T, LANES> {
    pub const fn splat(value: T) -> Self {
        Self([value; LANES])
    }
}

impl<T, const LANES: usize> Vector<T, LANES> {
    pub const fn lanes(&self) -> &[T; LANES] {
        &self.0
    }
}

impl<T, const LANES: usize> From<[T; LANES]> for Vector<T, LANES> {
    fn from(lanes: [T; LANES]) -> Self {
        Self(lanes)
    }
}

impl<T: Comparable, const LANES: usize> Comparable for Vector<T, LANES> {
    const SHAPE: Shape = Shape::Vector;

    fn compare<'a>(&'a self, actual: &'a Self) -> Result<(), Mismatch<'a>> {
        for (lane, (expected, found)) in self.0.iter().zip(actual.0.iter()).enumerate() {
            check_field(Segment::Index(lane), expected, found)?;
        }
        Ok(())
    }
}

impl<T: Comparable> Comparable for Option<T> {
    const SHAPE: Shape = Shape::Optional;

    fn compare<'a>(&'a self, actual: &'a Self) -> Result<(), Mismatch<'a>> {
        match (self, actual) {
            (None, None) => Ok(()),
            (Some(expected), Some(found)) => check_field(Segment::Present, expected, found),
            (Some(expected), None) => Err(Mismatch::new(MismatchKind::FoundAbsent { expected })),
            (None, Some(found)) => Err(Mismatch::new(MismatchKind::ExpectedAbsent { found })),
        }
    }
}

impl<T: Comparable, E: Comparable> Comparable for Result<T, E> {
    const SHAPE: Shape = Shape::FallibleResult;

    fn compare<'a>(&'a self, actual: &'a Self) -> Result<(), Mismatch<'a>> {
        match (self, actual) {
            (Ok(expected), Ok(found)) => check_field(Segment::Value, expected, found),
            (Err(expected), Err(found)) => check_field(Segment::Error, expected, found),
            (Ok(value), Err(error)) => {
                Err(Mismatch::new(MismatchKind::ValueVersusError { value, error }))
            }
            (Err(error), Ok(value)) => {
                Err(Mismatch::new(MismatchKind::ErrorVersusValue { error, value }))
            }
        }
    }
}

// Tuples are aggregates whose fields are named by position.
macro_rules! tuple_aggregate {
    ($(($($name:ident $index:tt),+))+) => {
        $(
            impl<$($name: Comparable),+> Comparable for ($($name,)+) {
                const SHAPE: Shape = Shape::Aggregate;

                fn compare<'a>(&'a self, actual: &'a Self) -> Result<(), Mismatch<'a>> {
                    $(check_field(Segment::Field(stringify!($index)), &self.$index, &actual.$index)?;)+
                    Ok(())
                }
            }
        )+
    };
}

tuple_aggregate! {
    (A 0)
    (A 0, B 1)
    (A 0, B 1, C 2)
    (A 0, B 1, C 2, D 3)
    (A 0, B 1, C 2, D 3, E 4)
    (A 0, B 1, C 2, D 3, E 4, F 5)
}
