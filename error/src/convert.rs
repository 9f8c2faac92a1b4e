use crate::{Error, ErrorKind, InternalError, InternalErrorKind};

impl From<InternalErrorKind> for Error {
    fn from(kind: InternalErrorKind) -> Self {
        Into::<InternalError>::into(kind).into()
    }
}

impl From<std::num::TryFromIntError> for Error {
    fn from(error: std::num::TryFromIntError) -> Self {
        InternalErrorKind::NumberOverflow.because(error).into()
    }
}

impl From<std::fmt::Error> for Error {
    fn from(error: std::fmt::Error) -> Self {
        ErrorKind::Internal.because(error)
    }
}
