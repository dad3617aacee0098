use netgauze_parse_utils::{LocatedParsingError, Span};
use netgauze_serde_macros::LocatedError;

#[derive(LocatedError, Eq, PartialEq, Debug, Clone)]
pub enum OperatorError {
    Truncated,
    BothEolAndAnd,
}

fn main() {
    let span = Span::new(&[0xc1]);
    let located = LocatedOperatorError::new(span, OperatorError::BothEolAndAnd);
    assert_eq!(located.span(), &span);
    assert_eq!(located.error(), &OperatorError::BothEolAndAnd);
    let (span_back, error_back): (Span<'_>, OperatorError) = located.into();
    assert_eq!(span_back, span);
    assert_eq!(error_back, OperatorError::BothEolAndAnd);
}
