//! Declarative implementations of [`Comparable`](crate::Comparable) for user types.
//!
//! These stand in for compile-time reflection: each macro lists the parts of a type
//! once, and the generated implementation compares them in that order.

/// Compares a type with its own `PartialEq`, as a primitive.
///
/// Intended for enum tags, error codes and other identity-like values.
///
/// ```
/// #[derive(Debug, PartialEq)]
/// enum BusError { Nack, Timeout }
/// ontarget::comparable_by_eq!(BusError);
///
/// assert!(ontarget::check_equal(&BusError::Nack, &BusError::Nack).is_ok());
/// assert!(ontarget::check_equal(&BusError::Nack, &BusError::Timeout).is_err());
/// ```
#[macro_export]
macro_rules! comparable_by_eq {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Comparable for $ty {
                const SHAPE: $crate::Shape = $crate::Shape::Primitive;

                #[inline]
                fn compare<'a>(
                    &'a self,
                    actual: &'a Self,
                ) -> ::core::result::Result<(), $crate::Mismatch<'a>> {
                    if self == actual {
                        ::core::result::Result::Ok(())
                    } else {
                        ::core::result::Result::Err($crate::Mismatch::values(self, actual))
                    }
                }
            }
        )+
    };
}

/// Compares a struct field by field, in the listed order.
///
/// Tuple structs list their positions: `comparable_struct!(Rgb { 0, 1, 2 })`.
/// Every field must be listed; leaving one out is a build error:
///
/// ```compile_fail
/// #[derive(Debug)]
/// struct Pin { port: u8, number: u8 }
/// ontarget::comparable_struct!(Pin { port });
/// ```
///
/// ```
/// #[derive(Debug)]
/// struct Calibration { gain: u16, offset: i16 }
/// ontarget::comparable_struct!(Calibration { gain, offset });
///
/// let expected = Calibration { gain: 4, offset: -2 };
/// let actual = Calibration { gain: 4, offset: 3 };
/// let mismatch = ontarget::check_equal(&expected, &actual).unwrap_err();
/// assert_eq!(mismatch.to_string(), ".offset: expected -2, found 3");
/// ```
#[macro_export]
macro_rules! comparable_struct {
    ($ty:ident $(<$($generic:ident),+>)? { $($field:tt),* $(,)? }) => {
        impl $(<$($generic: $crate::Comparable),+>)? $crate::Comparable for $ty $(<$($generic),+>)? {
            const SHAPE: $crate::Shape = $crate::Shape::Aggregate;

            fn compare<'a>(
                &'a self,
                actual: &'a Self,
            ) -> ::core::result::Result<(), $crate::Mismatch<'a>> {
                let $ty { $($field: _),* } = self;
                $(
                    $crate::check_field(
                        $crate::Segment::Field(::core::stringify!($field)),
                        &self.$field,
                        &actual.$field,
                    )?;
                )*
                ::core::result::Result::Ok(())
            }
        }
    };
}

/// Compares an enum as a tagged union.
///
/// Every variant must be listed (the generated match is exhaustive), each with the
/// payload fields to compare: names for struct variants, positions for tuple
/// variants, nothing for unit variants. The variant is compared first; payloads are
/// only read once both sides are known to hold the same variant. Leaving out a
/// payload field is a build error:
///
/// ```compile_fail
/// #[derive(Debug)]
/// enum Packet { Ping, Data { length: u8, checksum: u16 } }
/// ontarget::comparable_enum!(Packet { Ping, Data { length } });
/// ```
///
/// ```compile_fail
/// #[derive(Debug)]
/// enum Reading { Idle, Fault(u16) }
/// ontarget::comparable_enum!(Reading { Idle, Fault });
/// ```
///
/// ```
/// #[derive(Debug)]
/// enum Reading { Idle, Sample(u16), Fault { code: u8, latched: bool } }
/// ontarget::comparable_enum!(Reading { Idle, Sample { 0 }, Fault { code, latched } });
///
/// let mismatch = ontarget::check_equal(&Reading::Idle, &Reading::Sample(3)).unwrap_err();
/// assert_eq!(mismatch.to_string(), "expected variant Idle, found variant Sample");
/// ```
#[macro_export]
macro_rules! comparable_enum {
    (
        $ty:ident $(<$($generic:ident),+>)? {
            $($variant:ident $({ $($field:tt),* $(,)? })?),+ $(,)?
        }
    ) => {
        impl $(<$($generic: $crate::Comparable),+>)? $crate::Comparable for $ty $(<$($generic),+>)? {
            const SHAPE: $crate::Shape = $crate::Shape::TaggedUnion;

            #[allow(irrefutable_let_patterns)]
            fn compare<'a>(
                &'a self,
                actual: &'a Self,
            ) -> ::core::result::Result<(), $crate::Mismatch<'a>> {
                let variant_name = |value: &Self| -> &'static str {
                    match value {
                        $($ty::$variant { $($($field: _),*)? } => ::core::stringify!($variant),)+
                    }
                };
                let expected_variant = variant_name(self);
                let found_variant = variant_name(actual);
                if expected_variant != found_variant {
                    return ::core::result::Result::Err($crate::Mismatch::new(
                        $crate::MismatchKind::Variant {
                            expected: expected_variant,
                            found: found_variant,
                        },
                    ));
                }
                $($($(
                    if let (
                        $ty::$variant { $field: expected, .. },
                        $ty::$variant { $field: found, .. },
                    ) = (self, actual)
                    {
                        $crate::check_field(
                            $crate::Segment::Field(::core::stringify!($field)),
                            expected,
                            found,
                        )
                        .map_err(|mismatch| {
                            mismatch.within($crate::Segment::Variant(::core::stringify!($variant)))
                        })?;
                    }
                )*)?)+
                ::core::result::Result::Ok(())
            }
        }
    };
}
