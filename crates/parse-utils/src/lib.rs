// Copyright (C) 2022-present The NetGauze Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//    http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or
// implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Traits shared by the wire (de)serializers and the helpers that glue nested
//! located errors together.

#[cfg(feature = "test-helpers")]
pub mod test_helpers;

use netgauze_locate::BinarySpan;
use nom::IResult;
use std::fmt::Debug;

pub type Span<'a> = BinarySpan<&'a [u8]>;

/// Protocol Data Unit that can be read from the wire without any outside
/// knowledge.
pub trait ReadablePdu<'a, Error: Debug> {
    fn from_wire(buf: Span<'a>) -> IResult<Span<'a>, Self, Error>
    where
        Self: Sized;
}

/// Protocol Data Unit that needs one piece of outside knowledge to be read,
/// for instance the address family negotiated for the session.
pub trait ReadablePduWithOneInput<'a, T, ErrorType> {
    fn from_wire(buf: Span<'a>, input: T) -> IResult<Span<'a>, Self, ErrorType>
    where
        Self: Sized;
}

/// Protocol Data Unit that can be written to the wire.
#[allow(clippy::len_without_is_empty)]
pub trait WritablePdu<ErrorType> {
    /// Smallest number of bytes the PDU occupies on the wire
    const BASE_LENGTH: usize;

    /// Exact number of bytes [`Self::write`] produces, including any length
    /// prefix the PDU writes for itself
    fn len(&self) -> usize;

    fn write<T: std::io::Write>(&self, writer: &mut T) -> Result<(), ErrorType>
    where
        Self: Sized;
}

/// Error raised while parsing, together with the span where it started. The
/// span offset points at the first byte of the offending field.
pub trait LocatedParsingError {
    type Span;
    type Error;

    fn span(&self) -> &Self::Span;
    fn error(&self) -> &Self::Error;
}

/// Convert the nom error of a nested PDU into the located error of the
/// enclosing PDU, keeping the `Incomplete`/`Error`/`Failure` distinction.
#[inline]
fn lift_err<Lin, L: From<Lin>>(err: nom::Err<Lin>) -> nom::Err<L> {
    match err {
        nom::Err::Incomplete(needed) => nom::Err::Incomplete(needed),
        nom::Err::Error(error) => nom::Err::Error(error.into()),
        nom::Err::Failure(failure) => nom::Err::Failure(failure.into()),
    }
}

#[inline]
pub fn parse_into_located<'a, Lin: Debug, L: From<Lin>, T: ReadablePdu<'a, Lin>>(
    buf: Span<'a>,
) -> IResult<Span<'a>, T, L> {
    T::from_wire(buf).map_err(lift_err)
}

#[inline]
pub fn parse_into_located_one_input<
    'a,
    I,
    Lin: Debug,
    L: From<Lin>,
    T: ReadablePduWithOneInput<'a, I, Lin>,
>(
    buf: Span<'a>,
    input: I,
) -> IResult<Span<'a>, T, L> {
    T::from_wire(buf, input).map_err(lift_err)
}

/// Serde mirror of [`nom::error::ErrorKind`] so parsing errors can derive
/// `Serialize`/`Deserialize`.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
#[serde(remote = "nom::error::ErrorKind")]
pub enum ErrorKindSerdeDeref {
    Tag,
    MapRes,
    MapOpt,
    Alt,
    IsNot,
    IsA,
    SeparatedList,
    SeparatedNonEmptyList,
    Many0,
    Many1,
    ManyTill,
    Count,
    TakeUntil,
    LengthValue,
    TagClosure,
    Alpha,
    Digit,
    HexDigit,
    OctDigit,
    AlphaNumeric,
    Space,
    MultiSpace,
    LengthValueFn,
    Eof,
    Switch,
    TagBits,
    OneOf,
    NoneOf,
    Char,
    CrLf,
    RegexpMatch,
    RegexpMatches,
    RegexpFind,
    RegexpCapture,
    RegexpCaptures,
    TakeWhile1,
    Complete,
    Fix,
    Escaped,
    EscapedTransform,
    NonEmpty,
    ManyMN,
    Not,
    Permutation,
    Verify,
    TakeTill1,
    TakeWhileMN,
    TooLarge,
    Many0Count,
    Many1Count,
    Float,
    Satisfy,
    Fail,
}
