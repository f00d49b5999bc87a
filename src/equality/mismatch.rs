//! Mismatch diagnostics produced by the equality engine.
//!
//! A [`Mismatch`] borrows the operands it describes and records where in the
//! compared structure the difference was found. It never allocates: the location
//! is a fixed-depth stack of [`Segment`]s pushed while the comparison unwinds.

use core::fmt;

/// Deepest location a mismatch records. Outer segments beyond this are elided.
pub const MAX_DEPTH: usize = 8;

/// One step of the location of a mismatch inside a compared value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    /// A named (or positional) field of an aggregate.
    Field(&'static str),
    /// An element of a fixed array or a lane of a vector.
    Index(usize),
    /// The active variant of a tagged union.
    Variant(&'static str),
    /// The payload of a present optional.
    Present,
    /// The success branch of a fallible result.
    Value,
    /// The error branch of a fallible result.
    Error,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Field(name) => write!(f, ".{name}"),
            Segment::Index(index) => write!(f, "[{index}]"),
            Segment::Variant(name) => write!(f, "::{name}"),
            Segment::Present => f.write_str("(some)"),
            Segment::Value => f.write_str("(ok)"),
            Segment::Error => f.write_str("(err)"),
        }
    }
}

/// Location of a mismatch, stored innermost segment first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Path {
    segments: [Segment; MAX_DEPTH],
    depth: usize,
    elided: bool,
}

impl Path {
    pub const EMPTY: Path = Path {
        segments: [Segment::Present; MAX_DEPTH],
        depth: 0,
        elided: false,
    };

    fn push_outer(&mut self, segment: Segment) {
        if self.depth == MAX_DEPTH {
            self.elided = true;
            return;
        }
        self.segments[self.depth] = segment;
        self.depth += 1;
    }

    pub fn len(&self) -> usize {
        self.depth
    }

    pub fn is_empty(&self) -> bool {
        self.depth == 0 && !self.elided
    }

    /// True when outer segments were dropped because the path was too deep.
    pub fn is_elided(&self) -> bool {
        self.elided
    }

    /// The segment closest to the differing value.
    pub fn innermost(&self) -> Option<Segment> {
        self.segments[..self.depth].first().copied()
    }

    /// Segments from the outermost to the innermost.
    pub fn iter(&self) -> impl Iterator<Item = &Segment> + '_ {
        self.segments[..self.depth].iter().rev()
    }

    fn fmt_from(&self, f: &mut fmt::Formatter<'_>, skip_innermost: bool) -> fmt::Result {
        if self.elided {
            f.write_str("..")?;
        }
        let start = usize::from(skip_innermost && self.depth > 0);
        for segment in self.segments[start..self.depth].iter().rev() {
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_from(f, false)
    }
}

/// What differed, with borrowed views of both sides.
#[derive(Debug, Clone, Copy)]
pub enum MismatchKind<'a> {
    Value {
        expected: &'a dyn fmt::Debug,
        found: &'a dyn fmt::Debug,
    },
    Address {
        expected: *const (),
        found: *const (),
    },
    SlicePointer {
        expected: *const (),
        found: *const (),
    },
    SliceLength {
        expected: usize,
        found: usize,
    },
    Variant {
        expected: &'static str,
        found: &'static str,
    },
    /// Expected a present optional, found an absent one.
    FoundAbsent { expected: &'a dyn fmt::Debug },
    /// Expected an absent optional, found a present one.
    ExpectedAbsent { found: &'a dyn fmt::Debug },
    /// Expected a success value, found an error.
    ValueVersusError {
        value: &'a dyn fmt::Debug,
        error: &'a dyn fmt::Debug,
    },
    /// Expected an error, found a success value.
    ErrorVersusValue {
        error: &'a dyn fmt::Debug,
        value: &'a dyn fmt::Debug,
    },
}

impl fmt::Display for MismatchKind<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MismatchKind::Value { expected, found } => {
                write!(f, "expected {expected:?}, found {found:?}")
            }
            MismatchKind::Address { expected, found } => {
                write!(f, "expected address {expected:p}, found address {found:p}")
            }
            MismatchKind::SlicePointer { expected, found } => write!(
                f,
                "slice pointer differs: expected address {expected:p}, found address {found:p}"
            ),
            MismatchKind::SliceLength { expected, found } => {
                write!(f, "slice length differs: expected {expected}, found {found}")
            }
            MismatchKind::Variant { expected, found } => {
                write!(f, "expected variant {expected}, found variant {found}")
            }
            MismatchKind::FoundAbsent { expected } => {
                write!(f, "expected {expected:?}, found absent")
            }
            MismatchKind::ExpectedAbsent { found } => {
                write!(f, "expected absent, found {found:?}")
            }
            MismatchKind::ValueVersusError { value, error } => {
                write!(f, "expected value {value:?}, found error {error:?}")
            }
            MismatchKind::ErrorVersusValue { error, value } => {
                write!(f, "expected error {error:?}, found value {value:?}")
            }
        }
    }
}

/// A structural difference between two values of the same shape.
#[derive(Debug, Clone, Copy)]
pub struct Mismatch<'a> {
    kind: MismatchKind<'a>,
    path: Path,
}

impl<'a> Mismatch<'a> {
    pub fn new(kind: MismatchKind<'a>) -> Self {
        Self {
            kind,
            path: Path::EMPTY,
        }
    }

    /// A plain `==` mismatch between two primitives.
    pub fn values<T: fmt::Debug>(expected: &'a T, found: &'a T) -> Self {
        Self::new(MismatchKind::Value { expected, found })
    }

    /// Records that this mismatch was found inside `segment`.
    #[must_use]
    pub fn within(mut self, segment: Segment) -> Self {
        self.path.push_outer(segment);
        self
    }

    pub fn kind(&self) -> &MismatchKind<'a> {
        &self.kind
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for Mismatch<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.path.innermost() {
            Some(Segment::Index(index)) => {
                if self.path.len() > 1 || self.path.is_elided() {
                    self.path.fmt_from(f, true)?;
                    f.write_str(": ")?;
                }
                write!(f, "index {index} incorrect. {}", self.kind)
            }
            Some(_) => write!(f, "{}: {}", self.path, self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_mismatch_without_location() {
        let mismatch = Mismatch::values(&1u32, &2u32);
        assert_eq!(mismatch.to_string(), "expected 1, found 2");
        assert!(mismatch.path().is_empty());
    }

    #[test]
    fn test_location_reads_outermost_first() {
        let mismatch = Mismatch::values(&true, &false)
            .within(Segment::Field("enabled"))
            .within(Segment::Present)
            .within(Segment::Field("config"));
        assert_eq!(
            mismatch.to_string(),
            ".config(some).enabled: expected true, found false"
        );
    }

    #[test]
    fn test_innermost_index_is_phrased_as_incorrect_index() {
        let top = Mismatch::values(&3u8, &4u8).within(Segment::Index(2));
        assert_eq!(top.to_string(), "index 2 incorrect. expected 3, found 4");

        let nested = top.within(Segment::Field("pins"));
        assert_eq!(
            nested.to_string(),
            ".pins: index 2 incorrect. expected 3, found 4"
        );
    }

    #[test]
    fn test_deep_paths_are_elided() {
        let mut mismatch = Mismatch::values(&0u8, &1u8);
        for _ in 0..MAX_DEPTH + 2 {
            mismatch = mismatch.within(Segment::Field("inner"));
        }
        assert_eq!(mismatch.path().len(), MAX_DEPTH);
        assert!(mismatch.path().is_elided());
        assert!(mismatch.to_string().starts_with("...inner.inner"));
    }

    #[test]
    fn test_optional_and_result_phrasing() {
        let present = 7u8;
        let absent = MismatchKind::FoundAbsent { expected: &present };
        assert_eq!(absent.to_string(), "expected 7, found absent");

        let unexpected = MismatchKind::ExpectedAbsent { found: &present };
        assert_eq!(unexpected.to_string(), "expected absent, found 7");

        let code = -5i32;
        let branch = MismatchKind::ValueVersusError {
            value: &present,
            error: &code,
        };
        assert_eq!(branch.to_string(), "expected value 7, found error -5");
    }
}
