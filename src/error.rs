use crate::types::FourCc;
use nom::error::{ErrorKind, ParseError};
use std::fmt::{self, Display};
use thiserror::Error;

/// A failure inside one of the record decoders.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The data ended before a required field or record could be read.
    #[error("unexpected end of data{}", needed_suffix(.needed))]
    Truncated { needed: Option<usize> },
    /// A stream entry carried a stream type outside of table 5-8.
    #[error("unrecognized stream type {0:#04x}")]
    UnrecognizedStreamType(u8),
    /// A stream attribute block carried an unknown coding type.
    #[error("unrecognized stream coding type {0:#04x}")]
    UnrecognizedCodingType(u8),
    /// A sub path declared a type outside the known set.
    #[error("unrecognized sub path type {0:#04x}")]
    UnrecognizedSubPathType(u8),
    /// A declared record count ran past the data available to it.
    #[error("declared {declared} {record} records but only {decoded} fit")]
    CountMismatch {
        record: &'static str,
        declared: usize,
        decoded: usize,
    },
    /// The file does not start with a supported `MPLS` header.
    #[error("not a supported MPLS header ({type_indicator}/{version})")]
    InvalidHeader { type_indicator: FourCc, version: FourCc },
    /// Any other combinator failure.
    #[error("malformed data ({0:?})")]
    Malformed(ErrorKind),
}

fn needed_suffix(needed: &Option<usize>) -> String {
    match needed {
        Some(n) => format!(", {} more bytes needed", n),
        None => String::new(),
    }
}

impl<'a> ParseError<&'a [u8]> for DecodeError {
    fn from_error_kind(_input: &'a [u8], kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Eof | ErrorKind::Complete => DecodeError::Truncated { needed: None },
            other => DecodeError::Malformed(other),
        }
    }

    fn append(_input: &'a [u8], _kind: ErrorKind, other: Self) -> Self {
        other
    }
}

impl From<nom::Err<DecodeError>> for DecodeError {
    fn from(err: nom::Err<DecodeError>) -> Self {
        match err {
            nom::Err::Incomplete(nom::Needed::Size(n)) => DecodeError::Truncated {
                needed: Some(n.get()),
            },
            nom::Err::Incomplete(nom::Needed::Unknown) => DecodeError::Truncated { needed: None },
            nom::Err::Error(e) | nom::Err::Failure(e) => e,
        }
    }
}

/// The step of a parse during which a decoder failed.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ParseStage {
    Header,
    Playlist,
    Chapters,
}

impl Display for ParseStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParseStage::Header => "header",
            ParseStage::Playlist => "playlist",
            ParseStage::Chapters => "playlist marks",
        };
        f.write_str(name)
    }
}

/// The error type of [`Mpls::from`] and [`Parser::parse`].
///
/// [`Mpls::from`]: ../types/struct.Mpls.html#method.from
/// [`Parser::parse`]: ../decoder/struct.Parser.html#method.parse
#[derive(Debug, Error)]
pub enum MplsError {
    /// An I/O error occurred while reading the input.
    #[error("{0}")]
    IoError(#[from] std::io::Error),
    /// The byte stream could not be decoded as valid MPLS.
    #[error("failed to parse {stage}: {source}")]
    ParseError {
        stage: ParseStage,
        #[source]
        source: DecodeError,
    },
}

impl MplsError {
    /// The underlying decoder error, if this is a parse failure.
    pub fn decode_error(&self) -> Option<&DecodeError> {
        match self {
            MplsError::IoError(_) => None,
            MplsError::ParseError { source, .. } => Some(source),
        }
    }
}
