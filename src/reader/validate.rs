//! Whole-sequence checks, run before any tree is built.
//!
//! After [`validate`] passes, the token sequence is exactly one datum:
//! either a single atom, or a balanced bracketed form in which every dot
//! sits between the last two data of its list.

use super::token::{Token, TokenOffset};
use super::{ReadErr, ReadResult};

/// The deepest nesting of lists a read accepts.
///
/// Building and normalizing a tree recurse once per level of nesting.
pub const MAX_DEPTH: usize = 256;

/// Check that the tokens spell exactly one well-formed datum.
pub(super) fn validate(tokens: &[TokenOffset]) -> ReadResult<()> {
    check_not_empty(tokens)?;
    check_single_token(tokens)?;
    check_opener(tokens)?;
    let closers = check_brackets(tokens)?;
    check_quotes(tokens)?;
    check_dots(tokens, &closers)?;
    Ok(())
}

fn check_not_empty(tokens: &[TokenOffset]) -> ReadResult<()> {
    if tokens.is_empty() {
        Err(ReadErr::Syntax("empty input".to_owned()))
    } else {
        Ok(())
    }
}

fn check_single_token(tokens: &[TokenOffset]) -> ReadResult<()> {
    match tokens {
        [only] if !only.token.is_atom() => {
            Err(only.syntax_error("a lone token must be a symbol or an integer"))
        }
        _ => Ok(()),
    }
}

fn check_opener(tokens: &[TokenOffset]) -> ReadResult<()> {
    match tokens {
        [first, _, ..] if first.token != Token::LParen => {
            Err(first.syntax_error("expression must start with a left paren"))
        }
        _ => Ok(()),
    }
}

/// Check that brackets balance, that the first one closes only at the end,
/// and that lists nest no deeper than [`MAX_DEPTH`].
///
/// Returns, for each position, the index of the matching right paren if the
/// token there is a left paren.
fn check_brackets(tokens: &[TokenOffset]) -> ReadResult<Vec<Option<usize>>> {
    let mut closers = vec![None; tokens.len()];
    // Indices of the left parens that are still open.
    let mut open: Vec<usize> = Vec::new();

    for (i, t) in tokens.iter().enumerate() {
        match t.token {
            Token::LParen => {
                open.push(i);
                if open.len() > MAX_DEPTH {
                    return Err(t.syntax_error(format!(
                        "lists nested deeper than {} levels",
                        MAX_DEPTH
                    )));
                }
            }
            Token::RParen => {
                let start = open
                    .pop()
                    .ok_or_else(|| t.syntax_error("right paren without matching left paren"))?;
                closers[start] = Some(i);
                if open.is_empty() && i + 1 < tokens.len() {
                    return Err(tokens[i + 1].syntax_error("unexpected input after expression"));
                }
            }
            _ => (),
        }
    }

    if let Some(&start) = open.last() {
        return Err(ReadErr::Syntax(format!(
            "got end of input within an expression of depth {}",
            open.len()
        ))
        .annotate(format!(
            "unclosed paren at line {} column {}",
            tokens[start].line, tokens[start].column
        )));
    }
    Ok(closers)
}

fn check_quotes(tokens: &[TokenOffset]) -> ReadResult<()> {
    match tokens.iter().find(|t| t.token == Token::Quote) {
        Some(t) => Err(t.syntax_error("quoted expressions are not supported")),
        None => Ok(()),
    }
}

/// A dot must follow at least one datum of its list, be followed by exactly one
/// datum, and that datum must be the last element of the list.
fn check_dots(tokens: &[TokenOffset], closers: &[Option<usize>]) -> ReadResult<()> {
    for (i, dot) in tokens.iter().enumerate() {
        if dot.token != Token::Dot {
            continue;
        }

        // A right paren here closes a sub-list of the dot's own list.
        let follows_datum = i > 0
            && (tokens[i - 1].token == Token::RParen || tokens[i - 1].token.is_atom());
        if !follows_datum {
            return Err(dot.syntax_error("dot must follow an element of a list"));
        }

        let datum_end = match tokens.get(i + 1).map(|t| &t.token) {
            Some(t) if t.is_atom() => i + 1,
            Some(Token::LParen) => closers[i + 1].ok_or_else(|| {
                ReadErr::Syntax("internal error: unmatched paren after dot".to_owned())
            })?,
            _ => return Err(dot.syntax_error("dot must be followed by a datum")),
        };

        match tokens.get(datum_end + 1) {
            Some(t) if t.token == Token::RParen => (),
            Some(t) => {
                return Err(t.syntax_error("only one datum may follow a dot, before the right paren"))
            }
            None => return Err(dot.syntax_error("dot outside of a list")),
        }
    }
    Ok(())
}
