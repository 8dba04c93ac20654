//! Support for reading Lisp expressions from character input.
//!
//! Reading happens in two phases. Constructing a [`Reader`] drains a
//! [`Lexer`] into a buffer of positioned tokens; [`Reader::read`] then
//! validates the whole buffer and only afterwards builds the tree.
//! No tree is built, even partially, for input that fails validation.

use std::io::ErrorKind;

use crate::data::Object;

mod normalize;
mod parse;
mod token;
mod validate;


pub use normalize::{normalize, promote};
pub use token::{tokenize, Lexer, Token, TokenOffset};
pub use validate::MAX_DEPTH;

/// Error type if a read does not complete.
///
/// Lexical errors come from characters that cannot start or continue a token;
/// syntax errors come from a token sequence that does not form exactly one datum.
/// Either way the read is over: there is no partial result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadErr {
    Lexical(String),
    Syntax(String),
}

impl std::fmt::Display for ReadErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::result::Result<(), std::fmt::Error> {
        match self {
            ReadErr::Lexical(e) => write!(f, "lexical error: {e}"),
            ReadErr::Syntax(e) => write!(f, "syntax error: {e}"),
        }
    }
}

impl std::error::Error for ReadErr {}

impl ReadErr {
    /// Add additional context to an error.
    pub fn annotate(self, more: impl AsRef<str>) -> Self {
        match self {
            ReadErr::Lexical(e) => ReadErr::Lexical(format!("{}: {}", more.as_ref(), e)),
            ReadErr::Syntax(e) => ReadErr::Syntax(format!("{}: {}", more.as_ref(), e)),
        }
    }

    pub fn is_lexical(&self) -> bool {
        matches!(self, ReadErr::Lexical(_))
    }

    pub fn is_syntax(&self) -> bool {
        matches!(self, ReadErr::Syntax(_))
    }
}

/// The main result type for this module:
/// a T (token, expression, etc), or an error.
pub type ReadResult<T> = Result<T, ReadErr>;

impl From<ReadErr> for std::io::Error {
    fn from(value: ReadErr) -> Self {
        std::io::Error::new(ErrorKind::InvalidInput, value)
    }
}

/// A reader over a fully-buffered token sequence.
///
/// A reader reads exactly one datum; [`Reader::read`] consumes it.
#[derive(Debug)]
pub struct Reader {
    tokens: Vec<TokenOffset>,
}

impl Reader {
    /// Drain the lexer into a new reader.
    ///
    /// Fails with the first lexical error in the input.
    pub fn new<I>(mut lexer: Lexer<I>) -> ReadResult<Self>
    where
        I: Iterator<Item = char>,
    {
        let mut tokens = Vec::new();
        while let Some(token) = lexer.current_offset() {
            tokens.push(token.clone());
            lexer.advance()?;
        }
        tracing::debug!(tokens = tokens.len(), "buffered input");
        Ok(Reader { tokens })
    }

    /// Lex the characters into a new reader.
    pub fn from_chars<I>(input: I) -> ReadResult<Self>
    where
        I: IntoIterator<Item = char>,
    {
        Self::new(Lexer::new(input.into_iter())?)
    }

    /// The buffered tokens, in input order.
    pub fn tokens(&self) -> &[TokenOffset] {
        &self.tokens
    }

    /// Validate the buffered tokens and build the datum they spell.
    ///
    /// A top-level `()` is returned as [`Object::empty`], never as nil.
    pub fn read(self) -> ReadResult<Object> {
        let result = validate::validate(&self.tokens).and_then(|()| parse::parse(&self.tokens));
        if let Err(err) = &result {
            tracing::debug!(%err, "rejected input");
        }
        result
    }
}

/// Read a single datum from the string.
pub fn read(input: &str) -> ReadResult<Object> {
    Reader::from_chars(input.chars())?.read()
}

/// Read all of the input, then read a single datum from it.
pub fn read_from(mut input: impl std::io::Read) -> std::io::Result<Object> {
    let mut bytes = Vec::new();
    input.read_to_end(&mut bytes)?;
    let s = String::from_utf8(bytes)
        .map_err(|err| ReadErr::Lexical(format!("input is not UTF-8: {err}")))?;
    Ok(read(&s)?)
}
