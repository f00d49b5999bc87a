// Unit, primitive and pointer shapes.

use core::marker::PhantomData;
use core::ptr::{self, NonNull};

use super::{Comparable, Mismatch, MismatchKind, Shape};

crate::comparable_by_eq!(
    bool, char, u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64,
);

impl Comparable for () {
    const SHAPE: Shape = Shape::Unit;

    #[inline]
    fn compare<'a>(&'a self, _actual: &'a Self) -> Result<(), Mismatch<'a>> {
        Ok(())
    }
}

impl<T: ?Sized> Comparable for PhantomData<T> {
    const SHAPE: Shape = Shape::Unit;

    #[inline]
    fn compare<'a>(&'a self, _actual: &'a Self) -> Result<(), Mismatch<'a>> {
        Ok(())
    }
}

fn compare_addresses<'a>(expected: *const (), found: *const ()) -> Result<(), Mismatch<'a>> {
    if ptr::eq(expected, found) {
        Ok(())
    } else {
        Err(Mismatch::new(MismatchKind::Address { expected, found }))
    }
}

impl<T: ?Sized> Comparable for *const T {
    const SHAPE: Shape = Shape::Pointer;

    #[inline]
    fn compare<'a>(&'a self, actual: &'a Self) -> Result<(), Mismatch<'a>> {
        compare_addresses(self.cast(), actual.cast())
    }
}

impl<T: ?Sized> Comparable for *mut T {
    const SHAPE: Shape = Shape::Pointer;

    #[inline]
    fn compare<'a>(&'a self, actual: &'a Self) -> Result<(), Mismatch<'a>> {
        compare_addresses(self.cast_const().cast(), actual.cast_const().cast())
    }
}

impl<T: ?Sized> Comparable for NonNull<T> {
    const SHAPE: Shape = Shape::Pointer;

    #[inline]
    fn compare<'a>(&'a self, actual: &'a Self) -> Result<(), Mismatch<'a>> {
        compare_addresses(
            self.as_ptr().cast_const().cast(),
            actual.as_ptr().cast_const().cast(),
        )
    }
}

// Function identity: two function pointers are equal when they share an address.
macro_rules! function_identity {
    ($(($($arg:ident),*))+) => {
        $(
            impl<R, $($arg),*> Comparable for fn($($arg),*) -> R {
                const SHAPE: Shape = Shape::Primitive;

                #[inline]
                fn compare<'a>(&'a self, actual: &'a Self) -> Result<(), Mismatch<'a>> {
                    if *self as usize == *actual as usize {
                        Ok(())
                    } else {
                        Err(Mismatch::values(self, actual))
                    }
                }
            }
        )+
    };
}

function_identity! {
    ()
    (A)
    (A, B)
    (A, B, C)
    (A, B, C, D)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check_equal;

    fn sample_a() -> u8 {
        1
    }

    fn sample_b() -> u8 {
        2
    }

    #[test]
    fn test_primitive_shapes() {
        assert_eq!(<u32 as Comparable>::SHAPE, Shape::Primitive);
        assert_eq!(<() as Comparable>::SHAPE, Shape::Unit);
        assert_eq!(<*const u8 as Comparable>::SHAPE, Shape::Pointer);
    }

    #[test]
    fn test_floats_use_ieee_equality() {
        assert!(check_equal(&0.5f32, &0.5f32).is_ok());
        assert!(check_equal(&0.0f64, &-0.0f64).is_ok());
        assert!(check_equal(&f64::NAN, &f64::NAN).is_err());
    }

    #[test]
    fn test_unit_always_passes() {
        assert!(check_equal(&(), &()).is_ok());
        assert!(check_equal(&PhantomData::<str>, &PhantomData::<str>).is_ok());
    }

    #[test]
    fn test_pointers_compare_addresses_not_targets() {
        let first = 9u32;
        let second = 9u32;
        let same: *const u32 = &first;
        assert!(check_equal(&same, &(&first as *const u32)).is_ok());

        let other: *const u32 = &second;
        let mismatch = check_equal(&same, &other).unwrap_err();
        assert!(matches!(mismatch.kind(), MismatchKind::Address { .. }));
        assert!(mismatch.to_string().starts_with("expected address 0x"));
    }

    #[test]
    fn test_function_identity() {
        let a: fn() -> u8 = sample_a;
        let b: fn() -> u8 = sample_b;
        assert!(check_equal(&a, &a).is_ok());
        assert!(check_equal(&a, &b).is_err());
    }
}
