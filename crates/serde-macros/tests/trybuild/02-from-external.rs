use netgauze_parse_utils::Span;
use netgauze_serde_macros::LocatedError;
use nom::{error::ErrorKind, number::complete::be_u8, IResult};

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct UndefinedComponentType(pub u8);

#[derive(LocatedError, Eq, PartialEq, Debug, Clone)]
pub enum ComponentError {
    NomError(#[from_nom] ErrorKind),
    UnknownType(#[from_external] UndefinedComponentType),
}

fn component_type(value: u8) -> Result<u8, UndefinedComponentType> {
    if (1..=12).contains(&value) {
        Ok(value)
    } else {
        Err(UndefinedComponentType(value))
    }
}

fn parse(buf: Span<'_>) -> IResult<Span<'_>, u8, LocatedComponentError<'_>> {
    nom::combinator::map_res(be_u8, component_type)(buf)
}

fn main() {
    let good = [0x04];
    let bad = [0x0d];
    assert!(parse(Span::new(&good)).is_ok());
    assert_eq!(
        parse(Span::new(&bad)),
        Err(nom::Err::Error(LocatedComponentError::new(
            Span::new(&bad),
            ComponentError::UnknownType(UndefinedComponentType(0x0d))
        )))
    );
    let empty: [u8; 0] = [];
    assert_eq!(
        parse(Span::new(&empty)),
        Err(nom::Err::Error(LocatedComponentError::new(
            Span::new(&empty),
            ComponentError::NomError(ErrorKind::Eof)
        )))
    );
}
