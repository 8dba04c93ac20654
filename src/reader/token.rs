//! Module for extracting Lisp tokens from a character stream.

use std::iter::Peekable;

use crate::data;
use crate::reader::{ReadErr, ReadResult};

/// A Lisp token.
///
/// Whitespace is ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    LParen,
    RParen,
    Dot,
    Quote,
    Symbol(String),
    Integer(data::Integer),
}

impl Token {
    /// Integers and symbols: the tokens that are complete data on their own.
    pub fn is_atom(&self) -> bool {
        matches!(self, Token::Symbol(_) | Token::Integer(_))
    }
}

/// A token along with its starting position in the input stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenOffset {
    pub token: Token,
    pub line: usize,
    pub column: usize,
}

impl TokenOffset {
    fn new(line: usize, column: usize, token: Token) -> Self {
        // In useful output, lines and columns are 1-indexed
        TokenOffset {
            token,
            line: line + 1,
            column: column + 1,
        }
    }

    /// A syntax error located at this token.
    pub(crate) fn syntax_error(&self, message: impl Into<String>) -> ReadErr {
        ReadErr::Syntax(message.into())
            .annotate(format!("at line {} column {}", self.line, self.column))
    }
}

impl From<TokenOffset> for Token {
    fn from(value: TokenOffset) -> Self {
        value.token
    }
}

/// Characters that may appear in a symbol.
/// A sign may also lead a symbol; see [`Lexer::signed`].
fn is_symbol_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "<=>?!-*".contains(c)
}

/// Produces tokens one at a time from a character iterator,
/// with one token of lookahead.
pub struct Lexer<I>
where
    I: Iterator<Item = char>,
{
    input: Peekable<I>,
    current: Option<TokenOffset>,

    // Position of the next character (starting from 0 - fixed up in TokenOffset).
    line: usize,
    column: usize,
}

impl<I> Lexer<I>
where
    I: Iterator<Item = char>,
{
    /// Create a lexer positioned at the first token of the input.
    pub fn new(input: I) -> ReadResult<Self> {
        let mut lexer = Lexer {
            input: input.peekable(),
            current: None,
            line: 0,
            column: 0,
        };
        lexer.advance()?;
        Ok(lexer)
    }

    /// True until the input is exhausted, save for whitespace.
    pub fn has_more(&self) -> bool {
        self.current.is_some()
    }

    /// The most recently produced token; `None` once `has_more` is false.
    pub fn current(&self) -> Option<&Token> {
        self.current.as_ref().map(|t| &t.token)
    }

    pub fn current_offset(&self) -> Option<&TokenOffset> {
        self.current.as_ref()
    }

    /// Replace the current token with the next one from the input.
    pub fn advance(&mut self) -> ReadResult<()> {
        self.skip_whitespace();
        let (line, column) = (self.line, self.column);
        let token = self
            .next_token()
            .map_err(|err| err.annotate(format!("at line {} column {}", line + 1, column + 1)))?;
        self.current = token.map(|token| {
            tracing::trace!(?token, line = line + 1, column = column + 1, "lexed token");
            TokenOffset::new(line, column, token)
        });
        Ok(())
    }

    /// Consume one character, keeping the position up to date.
    fn bump(&mut self) -> Option<char> {
        let c = self.input.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    /// Consume the next character if it satisfies the predicate.
    fn bump_if(&mut self, pred: impl FnOnce(char) -> bool) -> Option<char> {
        match self.input.peek().copied() {
            Some(c) if pred(c) => self.bump(),
            _ => None,
        }
    }

    fn skip_whitespace(&mut self) {
        while self.bump_if(char::is_whitespace).is_some() {}
    }

    /// Lex a token starting at the next character.
    /// Returns None at end of input.
    fn next_token(&mut self) -> ReadResult<Option<Token>> {
        let Some(c) = self.bump() else {
            return Ok(None);
        };
        let token = match c {
            '(' => Token::LParen,
            ')' => Token::RParen,
            '.' => Token::Dot,
            '\'' => Token::Quote,
            '+' | '-' => self.signed(c)?,
            '0'..='9' => self.integer(c.to_string())?,
            c if is_symbol_char(c) => Token::Symbol(self.symbol(c.to_string())),
            c => {
                return Err(ReadErr::Lexical(format!(
                    "character {:?} cannot start a token",
                    c
                )))
            }
        };
        Ok(Some(token))
    }

    /// A sign leads an integer if a digit follows, and a symbol otherwise.
    /// The character after a lone sign is left for the next token.
    fn signed(&mut self, sign: char) -> ReadResult<Token> {
        match self.input.peek().copied() {
            Some(c) if c.is_ascii_digit() => self.integer(sign.to_string()),
            Some(c) if is_symbol_char(c) => Ok(Token::Symbol(self.symbol(sign.to_string()))),
            _ => Ok(Token::Symbol(sign.to_string())),
        }
    }

    fn integer(&mut self, mut s: String) -> ReadResult<Token> {
        while let Some(c) = self.bump_if(|c| c.is_ascii_digit()) {
            s.push(c);
        }
        let int: data::Integer = s.parse().map_err(|e| {
            ReadErr::Lexical(format!("failed to convert \"{}\" into integer: {}", s, e))
        })?;
        Ok(Token::Integer(int))
    }

    fn symbol(&mut self, mut s: String) -> String {
        while let Some(c) = self.bump_if(is_symbol_char) {
            s.push(c);
        }
        s
    }
}

/// Split the input into its constituent tokens.
pub fn tokenize(input: &str) -> ReadResult<Vec<TokenOffset>> {
    let mut lexer = Lexer::new(input.chars())?;
    let mut result = Vec::new();
    while let Some(token) = lexer.current.take() {
        result.push(token);
        lexer.advance()?;
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> ReadResult<Vec<Token>> {
        Ok(tokenize(input)?.into_iter().map(Token::from).collect())
    }

    fn sym(s: &str) -> Token {
        Token::Symbol(s.to_owned())
    }

    #[test]
    fn tokenize_atoms() -> ReadResult<()> {
        let output = tokens("hello world 24601 -6 +7 x2 tree->list <=> Queryable? *g*")?;

        let want = &[
            sym("hello"),
            sym("world"),
            Token::Integer(24601),
            Token::Integer(-6),
            Token::Integer(7),
            sym("x2"),
            sym("tree->list"),
            sym("<=>"),
            sym("Queryable?"),
            sym("*g*"),
        ];

        assert_eq!(output.len(), want.len());

        for ((i, got), want) in output.iter().enumerate().zip(want.iter()) {
            assert_eq!(got, want, "unexpected token in case {}", i);
        }
        Ok(())
    }

    #[test]
    fn tokenize_parens() -> ReadResult<()> {
        let output = tokens("(1)( 2 ) (hello) ( hello (x) (( y )))")?;

        let want = &[
            Token::LParen,
            Token::Integer(1),
            Token::RParen,
            Token::LParen,
            Token::Integer(2),
            Token::RParen,
            Token::LParen,
            sym("hello"),
            Token::RParen,
            Token::LParen,
            sym("hello"),
            Token::LParen,
            sym("x"),
            Token::RParen,
            Token::LParen,
            Token::LParen,
            sym("y"),
            Token::RParen,
            Token::RParen,
            Token::RParen,
        ];

        assert_eq!(output, want);
        Ok(())
    }

    #[test]
    fn tokenize_unbalanced() -> ReadResult<()> {
        let output = tokens(")))()(")?;

        let want = &[
            Token::RParen,
            Token::RParen,
            Token::RParen,
            Token::LParen,
            Token::RParen,
            Token::LParen,
        ];

        assert_eq!(output, want);
        Ok(())
    }

    #[test]
    fn dots_and_quotes() -> ReadResult<()> {
        assert_eq!(
            tokens("(a.b '1)")?,
            vec![
                Token::LParen,
                sym("a"),
                Token::Dot,
                sym("b"),
                Token::Quote,
                Token::Integer(1),
                Token::RParen,
            ]
        );
        Ok(())
    }

    #[test]
    fn signs() -> ReadResult<()> {
        assert_eq!(tokens("-")?, vec![sym("-")]);
        assert_eq!(tokens("+")?, vec![sym("+")]);
        assert_eq!(tokens("-x")?, vec![sym("-x")]);
        assert_eq!(tokens("-->")?, vec![sym("-->")]);
        assert_eq!(tokens("+-3")?, vec![sym("+-3")]);
        assert_eq!(tokens("-5a")?, vec![Token::Integer(-5), sym("a")]);
        assert_eq!(tokens("1+")?, vec![Token::Integer(1), sym("+")]);
        // A lone sign leaves the delimiter after it alone.
        assert_eq!(tokens("(-)")?, vec![Token::LParen, sym("-"), Token::RParen]);
        assert_eq!(tokens("+ 1")?, vec![sym("+"), Token::Integer(1)]);
        assert_eq!(tokens("a+b")?, vec![sym("a"), sym("+b")]);
        Ok(())
    }

    #[test]
    fn integer_limits() -> ReadResult<()> {
        assert_eq!(
            tokens("-9223372036854775808 9223372036854775807 007")?,
            vec![
                Token::Integer(i64::MIN),
                Token::Integer(i64::MAX),
                Token::Integer(7)
            ]
        );
        match tokens("99999999999999999999") {
            Err(ReadErr::Lexical(_)) => (),
            v => panic!("unexpected result: {:?}", v),
        }
        Ok(())
    }

    #[test]
    fn error_on_bad_character() {
        let input = "(\n  ok #no)";
        match tokenize(input) {
            Ok(v) => panic!("expected error for input, got {:?}", v),
            Err(ReadErr::Lexical(e)) => {
                assert!(e.contains("line 2"), "missing line info: {:?}", e);
                assert!(e.contains("column 6"), "missing column info: {:?}", e);
            }
            Err(e) => panic!("unexpected error kind: {:?}", e),
        }
        for input in ["\"str\"", "[1]", "λ", "a,b"] {
            assert!(
                matches!(tokenize(input), Err(ReadErr::Lexical(_))),
                "no lexical error for {:?}",
                input
            );
        }
    }

    #[test]
    fn positions() -> ReadResult<()> {
        let got = tokenize("(a\n  12)")?;
        let at: Vec<_> = got.iter().map(|t| (t.line, t.column)).collect();
        assert_eq!(at, vec![(1, 1), (1, 2), (2, 3), (2, 5)]);
        Ok(())
    }

    #[test]
    fn end_of_input() -> ReadResult<()> {
        for input in ["", "   ", "\n\t \n"] {
            let lexer = Lexer::new(input.chars())?;
            assert!(!lexer.has_more(), "expected no tokens in {:?}", input);
            assert_eq!(lexer.current(), None);
        }

        // Trailing whitespace does not produce an extra token,
        // and the final token is not lost when the input ends inside it.
        let mut lexer = Lexer::new("  abc  ".chars())?;
        assert!(lexer.has_more());
        assert_eq!(lexer.current(), Some(&sym("abc")));
        lexer.advance()?;
        assert!(!lexer.has_more());

        let mut lexer = Lexer::new("(12".chars())?;
        assert_eq!(lexer.current(), Some(&Token::LParen));
        lexer.advance()?;
        assert_eq!(lexer.current(), Some(&Token::Integer(12)));
        lexer.advance()?;
        assert!(!lexer.has_more());
        Ok(())
    }
}
