//! Error management module

use crate::records::RecordKind;
use std::fmt;
use std::io::Error as IoError;
use std::sync::Arc;

/// Boxed error returned by user supplied callbacks and filters.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The error type used by this crate.
#[derive(Debug)]
pub enum Error {
    /// IO error.
    ///
    /// `Arc<IoError>` instead of `IoError` since `IoError` is not `Clone`.
    Io(Arc<IoError>),
    /// Error reported by the XML tokenizer
    Xml(quick_xml::Error),
    /// An end tag of a record element was seen while no record was open
    EmptyStack {
        /// Name of the closing element
        found: String,
    },
    /// An end tag of a record element does not close the record currently on
    /// the top of the stack
    UnexpectedEnd {
        /// Record which is currently open
        expected: RecordKind,
        /// Name of the closing element
        found: String,
    },
    /// A record element was opened without an attribute required to create it
    MissingAttribute {
        /// Element that lacks the attribute
        element: RecordKind,
        /// Name of the required attribute
        attribute: &'static str,
        /// Open records, outermost first, at the moment of the failure
        context: Vec<RecordKind>,
    },
    /// The record callback failed. The parse is aborted
    Callback(BoxError),
    /// The skip filter failed. The parse is aborted
    Filter(BoxError),
}

impl From<IoError> for Error {
    /// Creates a new `Error::Io` from the given error
    #[inline]
    fn from(error: IoError) -> Error {
        Error::Io(Arc::new(error))
    }
}

impl From<quick_xml::Error> for Error {
    /// Creates a new `Error::Xml` from the given error. I/O failures of the
    /// underlying reader are reported as `Error::Io`
    #[inline]
    fn from(error: quick_xml::Error) -> Error {
        match error {
            quick_xml::Error::Io(e) => Error::Io(e),
            e => Error::Xml(e),
        }
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    #[inline]
    fn from(error: quick_xml::events::attributes::AttrError) -> Error {
        Error::Xml(error.into())
    }
}

impl From<quick_xml::encoding::EncodingError> for Error {
    #[inline]
    fn from(error: quick_xml::encoding::EncodingError) -> Error {
        Error::Xml(error.into())
    }
}

/// A specialized `Result` type where the error is hard-wired to [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::Xml(e) => write!(f, "XML error: {}", e),
            Error::EmptyStack { found } => {
                write!(f, "found </{}> while no record is open", found)
            }
            Error::UnexpectedEnd { expected, found } => {
                write!(f, "expecting </{}> found </{}>", expected, found)
            }
            Error::MissingAttribute {
                element,
                attribute,
                context,
            } => {
                write!(
                    f,
                    "element <{}> requires attribute `{}` (open records: ",
                    element, attribute
                )?;
                write_path(f, context)?;
                write!(f, ")")
            }
            Error::Callback(e) => write!(f, "record callback failed: {}", e),
            Error::Filter(e) => write!(f, "skip filter failed: {}", e),
        }
    }
}

fn write_path(f: &mut fmt::Formatter, path: &[RecordKind]) -> fmt::Result {
    if path.is_empty() {
        return write!(f, "none");
    }
    for (i, kind) in path.iter().enumerate() {
        if i > 0 {
            write!(f, "/")?;
        }
        write!(f, "{}", kind)?;
    }
    Ok(())
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Xml(e) => Some(e),
            Error::Callback(e) | Error::Filter(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}
