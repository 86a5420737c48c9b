//! Whitespace separated token scanning.

use std::num::ParseIntError;
use std::str::{FromStr, SplitAsciiWhitespace};
use thiserror::Error;

/// A failure to read a single token.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: &'static str },

    #[error("invalid {expected} {token:?}: {source}")]
    InvalidInteger {
        expected: &'static str,
        token: String,
        #[source]
        source: ParseIntError,
    },

    #[error("{expected} must be positive")]
    NotPositive { expected: &'static str },
}

/// Reads tokens one at a time from a block of text.
pub(crate) struct Scanner<'a> {
    tokens: SplitAsciiWhitespace<'a>,
}

impl<'a> Scanner<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            tokens: text.split_ascii_whitespace(),
        }
    }

    /// Reads the next token.
    pub fn token(&mut self, expected: &'static str) -> Result<&'a str, ScanError> {
        self.tokens.next().ok_or(ScanError::UnexpectedEof { expected })
    }

    /// Reads the next token as an integer.
    pub fn int<T>(&mut self, expected: &'static str) -> Result<T, ScanError>
    where
        T: FromStr<Err = ParseIntError>,
    {
        let token = self.token(expected)?;
        token.parse().map_err(|source| ScanError::InvalidInteger {
            expected,
            token: token.to_owned(),
            source,
        })
    }

    /// Reads the next token as an integer greater than zero.
    pub fn positive(&mut self, expected: &'static str) -> Result<u32, ScanError> {
        match self.int(expected)? {
            0 => Err(ScanError::NotPositive { expected }),
            value => Ok(value),
        }
    }
}
