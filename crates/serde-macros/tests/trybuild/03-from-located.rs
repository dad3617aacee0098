use netgauze_parse_utils::{parse_into_located, ReadablePdu, Span};
use netgauze_serde_macros::LocatedError;
use nom::{error::ErrorKind, number::complete::be_u8, IResult, Slice};

#[derive(LocatedError, Eq, PartialEq, Debug, Clone)]
pub enum PrefixError {
    NomError(#[from_nom] ErrorKind),
    TooLong(u8),
}

#[derive(LocatedError, Eq, PartialEq, Debug, Clone)]
pub enum NlriError {
    NomError(#[from_nom] ErrorKind),
    Prefix(#[from_located(module = "self")] PrefixError),
}

#[derive(Eq, PartialEq, Debug)]
struct PrefixLen(u8);

impl<'a> ReadablePdu<'a, LocatedPrefixError<'a>> for PrefixLen {
    fn from_wire(buf: Span<'a>) -> IResult<Span<'a>, Self, LocatedPrefixError<'a>> {
        let input = buf;
        let (buf, len) = be_u8(buf)?;
        if len > 32 {
            return Err(nom::Err::Error(LocatedPrefixError::new(
                input,
                PrefixError::TooLong(len),
            )));
        }
        Ok((buf, PrefixLen(len)))
    }
}

fn parse(buf: Span<'_>) -> IResult<Span<'_>, PrefixLen, LocatedNlriError<'_>> {
    let (buf, _len) = be_u8(buf)?;
    parse_into_located(buf)
}

fn main() {
    let wire = [0x01, 0x21];
    let span = Span::new(&wire);
    assert_eq!(
        parse(span),
        Err(nom::Err::Error(LocatedNlriError::new(
            span.slice(1..),
            NlriError::Prefix(PrefixError::TooLong(0x21))
        )))
    );
}
