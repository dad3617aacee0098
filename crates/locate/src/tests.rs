use crate::BinarySpan;
use nom::{
    bytes::complete::take, number::complete::be_u16, IResult, InputIter, InputTake, Slice,
};

type BytesSpan<'a> = BinarySpan<&'a [u8]>;

#[test]
fn test_new_starts_at_zero() {
    let input = &[0x01, 0x02, 0x03][..];
    let span = BytesSpan::new(input);
    assert_eq!(span.location_offset(), 0);
    assert_eq!(span.fragment(), &input);
    assert_eq!(span, input.into());
}

#[test]
fn test_slice_moves_offset() {
    let span = BytesSpan::new(&[0x01, 0x02, 0x03, 0x04, 0x05]);
    let from = span.slice(2..);
    assert_eq!(from.location_offset(), 2);
    assert_eq!(*from.fragment(), &[0x03, 0x04, 0x05]);

    let to = from.slice(..1);
    assert_eq!(to.location_offset(), 2);
    assert_eq!(*to.fragment(), &[0x03]);

    let range = span.slice(1..3);
    assert_eq!(range.location_offset(), 1);
    assert_eq!(*range.fragment(), &[0x02, 0x03]);
}

#[test]
fn test_take_split() {
    let span = BytesSpan::new(&[0x0a, 0x0b, 0x0c]);
    let (rest, taken) = span.take_split(1);
    assert_eq!(*taken.fragment(), &[0x0a]);
    assert_eq!(taken.location_offset(), 0);
    assert_eq!(*rest.fragment(), &[0x0b, 0x0c]);
    assert_eq!(rest.location_offset(), 1);
}

#[test]
fn test_position() {
    let span = BytesSpan::new(&[0x00, 0x80, 0x81]);
    assert_eq!(span.position(|x| x & 0x80 == 0x80), Some(1));
    assert_eq!(span.position(|x| x == 0xff), None);
}

#[test]
fn test_capture_position_with_nom() {
    fn parser(buf: BytesSpan<'_>) -> IResult<BytesSpan<'_>, (BytesSpan<'_>, u16)> {
        let (buf, _) = take(2usize)(buf)?;
        let (rest, value) = be_u16(buf)?;
        Ok((rest, (buf, value)))
    }

    let span = BytesSpan::new(&[0x01, 0x02, 0x00, 0x50, 0xff]);
    let (rest, (at, value)) = parser(span).unwrap();
    assert_eq!(at.location_offset(), 2);
    assert_eq!(value, 80);
    assert_eq!(rest.location_offset(), 4);
}
