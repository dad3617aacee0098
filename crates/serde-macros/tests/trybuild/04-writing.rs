use netgauze_serde_macros::WritingError;

#[derive(WritingError, Eq, PartialEq, Debug, Clone)]
pub enum ComponentWritingError {
    StdIOError(#[from_std_io_error] String),
}

#[derive(WritingError, Eq, PartialEq, Debug, Clone)]
pub enum FlowWritingError {
    StdIOError(#[from_std_io_error] String),
    ComponentError(#[from] ComponentWritingError),
}

fn write_component() -> Result<(), ComponentWritingError> {
    let err = std::io::Error::new(std::io::ErrorKind::WriteZero, "full");
    Err(err.into())
}

fn write_flow() -> Result<(), FlowWritingError> {
    write_component()?;
    Ok(())
}

fn main() {
    assert_eq!(
        write_flow(),
        Err(FlowWritingError::ComponentError(
            ComponentWritingError::StdIOError("full".to_string())
        ))
    );
}
