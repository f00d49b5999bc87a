//! Built-in suites.
//!
//! [`SELFTEST`] checks the equality engine's contract from inside a test image, so
//! a new board bring-up can run it before any project tests exist. [`SHOWCASE`]
//! demonstrates the abort-on-first-failure behaviour end to end: its second case
//! fails and its third is never reached.

use crate::equality::{assert_equal, check_equal, check_slice_contents, Mismatch, Vector};
use crate::errors::{Failure, Message};

#[derive(Debug, Clone, Copy)]
struct Calibration {
    gain: u16,
    offset: i16,
}
crate::comparable_struct!(Calibration { gain, offset });

#[derive(Debug, Clone, Copy)]
enum Frame {
    Empty,
    Sample { channel: u8, value: i16 },
    Fault(u16),
}
crate::comparable_enum!(Frame { Empty, Sample { channel, value }, Fault { 0 } });

/// Passes when `outcome` is a mismatch whose diagnostic contains `needle`.
fn expect_mismatch(outcome: Result<(), Mismatch<'_>>, needle: &str) -> Result<(), Failure> {
    let Err(mismatch) = outcome else {
        return Err(Failure::Body(Message::from_args(format_args!(
            "values compared equal, expected a mismatch mentioning {needle:?}"
        ))));
    };
    let text = Message::from_args(format_args!("{mismatch}"));
    if text.as_str().contains(needle) {
        Ok(())
    } else {
        Err(Failure::Body(Message::from_args(format_args!(
            "diagnostic {text:?} does not mention {needle:?}"
        ))))
    }
}

// ============================================================================
// SELFTEST
// ============================================================================

fn reflexive_across_shapes() -> Result<(), Failure> {
    check_equal(&(), &())?;
    check_equal(&42u32, &42u32)?;
    check_equal(&-1.5f32, &-1.5f32)?;
    check_equal(&'µ', &'µ')?;

    let cell = 7u8;
    let address: *const u8 = &cell;
    check_equal(&address, &address)?;

    let hook: fn() = boots;
    check_equal(&hook, &hook)?;

    let buffer = [3u8, 1, 4];
    let view: &[u8] = &buffer;
    check_equal(&view, &view)?;
    check_equal(&buffer, &buffer)?;

    check_equal(&Vector::splat(9i16), &Vector::<i16, 4>::splat(9))?;
    check_equal(
        &Calibration { gain: 2, offset: -1 },
        &Calibration { gain: 2, offset: -1 },
    )?;
    check_equal(
        &Frame::Sample { channel: 1, value: -40 },
        &Frame::Sample { channel: 1, value: -40 },
    )?;
    check_equal(&Frame::Empty, &Frame::Empty)?;
    check_equal(&Some(5u8), &Some(5u8))?;
    check_equal(&None::<u8>, &None)?;
    check_equal(&Ok::<u8, u16>(1), &Ok(1))?;
    check_equal(&Err::<u8, u16>(2), &Err(2))?;
    check_equal(&(1u8, true, 'x'), &(1u8, true, 'x'))?;
    Ok(())
}

fn primitive_mismatch_names_both_values() -> Result<(), Failure> {
    expect_mismatch(check_equal(&1i32, &2i32), "expected 1, found 2")
}

fn nan_is_not_reflexive() -> Result<(), Failure> {
    expect_mismatch(check_equal(&f32::NAN, &f32::NAN), "NaN")
}

fn aggregate_reports_the_differing_field() -> Result<(), Failure> {
    let expected = Calibration { gain: 1, offset: 2 };
    let actual = Calibration { gain: 1, offset: 3 };
    expect_mismatch(check_equal(&expected, &actual), ".offset: expected 2, found 3")
}

fn union_compares_variant_first() -> Result<(), Failure> {
    expect_mismatch(
        check_equal(&Frame::Empty, &Frame::Fault(9)),
        "expected variant Empty, found variant Fault",
    )?;
    expect_mismatch(
        check_equal(
            &Frame::Sample { channel: 0, value: 1 },
            &Frame::Sample { channel: 0, value: 5 },
        ),
        "::Sample.value: expected 1, found 5",
    )
}

fn optional_sides_are_distinguished() -> Result<(), Failure> {
    expect_mismatch(check_equal(&Some(4u8), &None), "expected 4, found absent")?;
    expect_mismatch(check_equal(&None, &Some(4u8)), "expected absent, found 4")
}

fn slices_compare_identity_arrays_compare_contents() -> Result<(), Failure> {
    let left = [1u8, 2, 3];
    let right = [1u8, 2, 3];
    let left_view: &[u8] = &left;
    let right_view: &[u8] = &right;
    expect_mismatch(check_equal(&left_view, &right_view), "slice pointer differs")?;

    let prefix: &[u8] = &left[..2];
    expect_mismatch(
        check_equal(&left_view, &prefix),
        "slice length differs: expected 3, found 2",
    )?;

    check_equal(&left, &right)?;
    check_slice_contents(left_view, right_view)?;
    Ok(())
}

fn result_branches() -> Result<(), Failure> {
    expect_mismatch(
        check_equal(&Ok::<u8, u8>(1), &Err(1)),
        "expected value 1, found error 1",
    )?;
    expect_mismatch(
        check_equal(&Err::<u8, u8>(1), &Ok(1)),
        "expected error 1, found value 1",
    )?;
    expect_mismatch(check_equal(&Err::<u8, u8>(1), &Err(2)), "(err)")
}

fn vector_reports_the_lane() -> Result<(), Failure> {
    let expected = Vector([1u16, 2, 3, 4]);
    let actual = Vector([1u16, 2, 9, 4]);
    expect_mismatch(
        check_equal(&expected, &actual),
        "index 2 incorrect. expected 3, found 9",
    )
}

crate::test_suite! {
    /// Engine contract checks, runnable on target.
    pub static SELFTEST = [
        reflexive_across_shapes,
        primitive_mismatch_names_both_values,
        nan_is_not_reflexive,
        aggregate_reports_the_differing_field,
        union_compares_variant_first,
        optional_sides_are_distinguished,
        slices_compare_identity_arrays_compare_contents,
        result_branches,
        vector_reports_the_lane,
    ];
}

// ============================================================================
// SHOWCASE
// ============================================================================

fn boots() {}

fn calibration_matches() {
    let expected = Calibration { gain: 4, offset: -2 };
    let measured = Calibration { gain: 4, offset: 3 };
    assert_equal(expected, measured);
}

fn never_reached() -> Result<(), Failure> {
    Err(Failure::reason("ran after an aborted case"))
}

crate::test_suite! {
    /// Three cases; the second fails on `offset`.
    pub static SHOWCASE = [boots, calibration_matches, never_reached];
}
