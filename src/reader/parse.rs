//! Recursive-descent construction of the tree from validated tokens.

use crate::data::{Object, Symbol};

use super::normalize::promote;
use super::token::{Token, TokenOffset};
use super::{ReadErr, ReadResult};

/// Build the datum spelled by a validated token sequence.
pub(super) fn parse(tokens: &[TokenOffset]) -> ReadResult<Object> {
    let mut parser = Parser { tokens, cursor: 0 };
    let object = match tokens {
        [_] => {
            let only = parser.next()?;
            parser.atom(only)?
        }
        _ => {
            parser.expect(Token::LParen)?;
            // A top-level `()` still has to produce an object.
            promote(parser.list()?)
        }
    };
    debug_assert_eq!(parser.cursor, tokens.len(), "tokens left over after parse");
    Ok(object)
}

struct Parser<'a> {
    tokens: &'a [TokenOffset],
    cursor: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.cursor).map(|t| &t.token)
    }

    fn next(&mut self) -> ReadResult<&'a TokenOffset> {
        let token = self
            .tokens
            .get(self.cursor)
            .ok_or_else(|| ReadErr::Syntax("unexpected end of input".to_owned()))?;
        self.cursor += 1;
        Ok(token)
    }

    fn expect(&mut self, want: Token) -> ReadResult<()> {
        let got = self.next()?;
        if got.token == want {
            Ok(())
        } else {
            Err(got.syntax_error(format!("expected {:?}, found {:?}", want, got.token)))
        }
    }

    fn atom(&self, t: &TokenOffset) -> ReadResult<Object> {
        match &t.token {
            Token::Integer(i) => Ok(Object::Integer(*i)),
            Token::Symbol(s) => Ok(Object::Symbol(Symbol::new_unchecked(s.clone()))),
            other => Err(t.syntax_error(format!("expected an atom, found {:?}", other))),
        }
    }

    /// Read one element of a list: an atom, or a bracketed list (nil if empty).
    fn datum(&mut self) -> ReadResult<Option<Object>> {
        let t = self.next()?;
        match t.token {
            Token::LParen => self.list(),
            _ => self.atom(t).map(Some),
        }
    }

    /// Read list elements up to and including the closing paren.
    /// The cursor starts just after the opening paren.
    ///
    /// Returns nil for the empty list.
    fn list(&mut self) -> ReadResult<Option<Object>> {
        let mut items = Vec::new();
        let tail = loop {
            if let Some(Token::RParen) = self.peek() {
                self.cursor += 1;
                break None;
            }
            items.push(self.datum()?);

            if let Some(Token::Dot) = self.peek() {
                self.cursor += 1;
                let tail = self.datum()?;
                self.expect(Token::RParen)?;
                break tail;
            }
        };
        tracing::trace!(elements = items.len(), dotted = tail.is_some(), "built list");
        Ok(Object::dotted(items, tail))
    }
}
