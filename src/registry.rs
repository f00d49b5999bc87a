//! # Test registry
//!
//! An ordered, immutable list of named test cases, assembled at build time with
//! [`test_suite!`](crate::test_suite). Order of registration is order of execution.
//! Names are not required to be unique; duplicates simply run twice.

use core::any::Any;
use core::fmt;

use crate::errors::Failure;

/// Signature every registered body is lowered to.
pub type TestBody = fn() -> Result<(), Failure>;

/// A named, zero-argument test body.
#[derive(Clone, Copy)]
pub struct TestCase {
    name: &'static str,
    body: TestBody,
}

impl TestCase {
    pub const fn new(name: &'static str, body: TestBody) -> Self {
        Self { name, body }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Runs the body once.
    pub fn run(&self) -> Result<(), Failure> {
        (self.body)()
    }
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase").field("name", &self.name).finish()
    }
}

/// What a test function may return.
///
/// Implemented for `()` (always passes), `bool` (`false` fails) and
/// `Result<(), E>` for any `Debug` error. A [`Failure`] error is kept as is, so
/// bodies can use `?` on [`check_equal`](crate::check_equal) directly; any other
/// error becomes a body failure described by its `Debug` text.
pub trait TestOutcome {
    fn into_result(self) -> Result<(), Failure>;
}

impl TestOutcome for () {
    fn into_result(self) -> Result<(), Failure> {
        Ok(())
    }
}

impl TestOutcome for bool {
    fn into_result(self) -> Result<(), Failure> {
        if self {
            Ok(())
        } else {
            Err(Failure::reason("returned false"))
        }
    }
}

impl<E: fmt::Debug + 'static> TestOutcome for Result<(), E> {
    fn into_result(self) -> Result<(), Failure> {
        self.map_err(|error| match (&error as &dyn Any).downcast_ref::<Failure>() {
            Some(failure) => *failure,
            None => Failure::body(error),
        })
    }
}

/// The ordered set of cases a runner executes.
#[derive(Debug, Clone, Copy)]
pub struct Registry {
    cases: &'static [TestCase],
}

impl Registry {
    pub const fn new(cases: &'static [TestCase]) -> Self {
        Self { cases }
    }

    pub const fn len(&self) -> usize {
        self.cases.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&'static TestCase> {
        self.cases.get(index)
    }

    pub fn iter(&self) -> core::slice::Iter<'static, TestCase> {
        self.cases.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        self.cases.iter().map(TestCase::name)
    }
}

impl IntoIterator for Registry {
    type Item = &'static TestCase;
    type IntoIter = core::slice::Iter<'static, TestCase>;

    fn into_iter(self) -> Self::IntoIter {
        self.cases.iter()
    }
}

/// Declares a static [`Registry`] from an ordered list of test functions.
///
/// Each function takes no arguments and returns a [`TestOutcome`]. Cases are named
/// after the path they are listed by, or by an explicit label:
///
/// ```
/// use ontarget::{check_equal, test_suite, Failure};
///
/// fn gain_is_unity() -> Result<(), Failure> {
///     check_equal(&1u16, &1u16)?;
///     Ok(())
/// }
///
/// fn boots() {}
///
/// test_suite! {
///     pub static SMOKE = [gain_is_unity, boots];
/// }
///
/// test_suite! {
///     static LABELLED = ["adc gain" => gain_is_unity];
/// }
///
/// assert_eq!(SMOKE.names().collect::<Vec<_>>(), ["gain_is_unity", "boots"]);
/// assert_eq!(LABELLED.get(0).unwrap().name(), "adc gain");
/// ```
#[macro_export]
macro_rules! test_suite {
    ($(#[$meta:meta])* $vis:vis static $registry:ident = [$($label:literal => $case:path),* $(,)?];) => {
        $(#[$meta])*
        $vis static $registry: $crate::Registry = $crate::Registry::new(&[
            $(
                $crate::TestCase::new($label, || $crate::TestOutcome::into_result($case())),
            )*
        ]);
    };
    ($(#[$meta:meta])* $vis:vis static $registry:ident = [$($case:path),* $(,)?];) => {
        $(#[$meta])*
        $vis static $registry: $crate::Registry = $crate::Registry::new(&[
            $(
                $crate::TestCase::new(::core::stringify!($case), || {
                    $crate::TestOutcome::into_result($case())
                }),
            )*
        ]);
    };
}
