//! A byte span that remembers how far it is from the start of the buffer it
//! was cut from. Parsers use the offset to report where a malformed field
//! begins. Unlike `nom_locate`, no line or column numbers are tracked since
//! they are meaningless for binary protocols.

#[cfg(test)]
mod tests;

use nom::{AsBytes, InputIter, InputLength, InputTake, Needed, Slice};
use std::{
    iter::{Copied, Enumerate},
    ops::{Range, RangeFrom, RangeFull, RangeTo},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinarySpan<T> {
    offset: usize,
    fragment: T,
}

impl<T> BinarySpan<T> {
    pub const fn new(fragment: T) -> Self {
        Self {
            offset: 0,
            fragment,
        }
    }

    /// Number of bytes between the start of the original buffer and the start
    /// of this span
    #[inline]
    pub const fn location_offset(&self) -> usize {
        self.offset
    }

    #[inline]
    pub const fn fragment(&self) -> &T {
        &self.fragment
    }
}

impl<'a> From<&'a [u8]> for BinarySpan<&'a [u8]> {
    #[inline]
    fn from(fragment: &'a [u8]) -> Self {
        Self::new(fragment)
    }
}

impl<T> core::ops::Deref for BinarySpan<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.fragment
    }
}

impl<'a> Slice<RangeFrom<usize>> for BinarySpan<&'a [u8]> {
    #[inline]
    fn slice(&self, range: RangeFrom<usize>) -> Self {
        Self {
            offset: self.offset + range.start,
            fragment: &self.fragment[range],
        }
    }
}

impl<'a> Slice<RangeTo<usize>> for BinarySpan<&'a [u8]> {
    #[inline]
    fn slice(&self, range: RangeTo<usize>) -> Self {
        Self {
            offset: self.offset,
            fragment: &self.fragment[range],
        }
    }
}

impl<'a> Slice<Range<usize>> for BinarySpan<&'a [u8]> {
    #[inline]
    fn slice(&self, range: Range<usize>) -> Self {
        Self {
            offset: self.offset + range.start,
            fragment: &self.fragment[range],
        }
    }
}

impl<'a> Slice<RangeFull> for BinarySpan<&'a [u8]> {
    #[inline]
    fn slice(&self, _range: RangeFull) -> Self {
        *self
    }
}

impl<'a> InputIter for BinarySpan<&'a [u8]> {
    type Item = u8;
    type Iter = Enumerate<Self::IterElem>;
    type IterElem = Copied<std::slice::Iter<'a, u8>>;

    #[inline]
    fn iter_indices(&self) -> Self::Iter {
        self.fragment.iter_indices()
    }

    #[inline]
    fn iter_elements(&self) -> Self::IterElem {
        self.fragment.iter_elements()
    }

    #[inline]
    fn position<P>(&self, predicate: P) -> Option<usize>
    where
        P: Fn(Self::Item) -> bool,
    {
        self.fragment.position(predicate)
    }

    #[inline]
    fn slice_index(&self, count: usize) -> Result<usize, Needed> {
        self.fragment.slice_index(count)
    }
}

impl<'a> InputLength for BinarySpan<&'a [u8]> {
    #[inline]
    fn input_len(&self) -> usize {
        self.fragment.len()
    }
}

impl<'a> InputTake for BinarySpan<&'a [u8]> {
    #[inline]
    fn take(&self, count: usize) -> Self {
        self.slice(..count)
    }

    /// Returns `(remaining, taken)` as nom expects
    #[inline]
    fn take_split(&self, count: usize) -> (Self, Self) {
        (self.slice(count..), self.slice(..count))
    }
}

impl<'a> AsBytes for BinarySpan<&'a [u8]> {
    #[inline]
    fn as_bytes(&self) -> &[u8] {
        self.fragment
    }
}
