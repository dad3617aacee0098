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

//! Assertions used by the unit tests of the wire (de)serializers

use crate::{ReadablePduWithOneInput, Span, WritablePdu};
use std::fmt::Debug;

/// Concatenate wire fragments, handy to build a PDU out of its fields
pub fn combine(v: Vec<&[u8]>) -> Vec<u8> {
    v.into_iter().flatten().copied().collect()
}

fn assert_fully_consumed<T: Debug, E: Debug>(
    parsed: nom::IResult<Span<'_>, T, E>,
    expected: &T,
) -> T
where
    T: PartialEq,
{
    let (span, value) = match parsed {
        Ok(ok) => ok,
        Err(err) => panic!(
            "Message failed parsing, while expecting it to pass.\n\tExpected : {expected:?}\n\tError: {err:?}"
        ),
    };
    assert_eq!(&value, expected);
    assert_eq!(
        span.fragment().len(),
        0,
        "Not all the input is consumed by the parser, didn't consume: {span:?}",
    );
    value
}

fn assert_error<T: Debug, E: Debug + PartialEq>(
    parsed: nom::IResult<Span<'_>, T, E>,
    expected_err: &E,
) {
    match parsed {
        Err(nom::Err::Error(parsed_error)) => assert_eq!(&parsed_error, expected_err),
        other => panic!(
            "Expected the parser to fail with Err(nom::Err::Error({expected_err:?})), got {other:?} instead"
        ),
    }
}

/// Parse `input` and check the result equals `expected` and that every byte
/// was consumed
pub fn test_parsed_completely_with_one_input<'a, T, I, E>(
    input: &'a [u8],
    parser_input: I,
    expected: &T,
) -> T
where
    T: ReadablePduWithOneInput<'a, I, E> + PartialEq + Debug,
    E: Debug,
{
    assert_fully_consumed(T::from_wire(Span::new(input), parser_input), expected)
}

/// Parse `input` and check it fails with exactly `expected_err`
pub fn test_parse_error_with_one_input<'a, T, I, E>(
    input: &'a [u8],
    parser_input: I,
    expected_err: &E,
) where
    T: ReadablePduWithOneInput<'a, I, E> + Debug,
    E: Debug + PartialEq,
{
    assert_error(T::from_wire(Span::new(input), parser_input), expected_err)
}

/// Serialize `input` and check both the bytes and [`WritablePdu::len`]
pub fn test_write<T: WritablePdu<E>, E>(input: &T, expected: &[u8]) -> Result<(), E> {
    let mut buf: Vec<u8> = vec![];
    input.write(&mut buf)?;
    assert_eq!(
        buf, expected,
        "Serialized buffer is different the the expected one"
    );
    assert_eq!(
        input.len(),
        expected.len(),
        "Packet::len() is different the serialized buffer length"
    );
    Ok(())
}
