//! Parser for the exported nested-literal text format.
//!
//! An artifact is a sequence of top-level `name = <literal>`
//! statements. Literals are a small python-style subset: `None`,
//! `True`/`False`, integers, floats, quoted strings, tuples, lists,
//! sets (including the empty-set spelling `set()`), and dicts with
//! ordered pairs. `#` comments and backslash line continuations are
//! skipped. Everything from a top-level `if` statement onward is the
//! optional self-import bootstrap footer and is ignored; the footer
//! is a convenience for scripting hosts, never load-bearing.

use crate::literal::Literal;
use thiserror::Error;

/// Error type for artifact parsing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Invalid syntax.
    #[error("invalid syntax at line {line}: {message}")]
    InvalidSyntax {
        /// The line number where the error occurred.
        line: usize,
        /// The error message.
        message: String,
    },
    /// The input ended inside an unfinished literal.
    #[error("unexpected end of input at line {line}")]
    UnexpectedEnd {
        /// The line number where input ran out.
        line: usize,
    },
    /// A numeric literal could not be parsed.
    #[error("invalid number '{text}' at line {line}")]
    InvalidNumber {
        /// The line number of the number.
        line: usize,
        /// The offending text.
        text: String,
    },
}

/// Parse a whole artifact into its top-level assignments, in order.
///
/// # Errors
///
/// Returns an error if any statement or literal is malformed.
pub fn parse_document(source: &str) -> Result<Vec<(String, Literal)>, ParseError> {
    let mut parser = Parser::new(source);
    let mut statements = Vec::new();

    loop {
        parser.skip_trivia();
        let Some(ch) = parser.peek() else {
            break;
        };
        if !ch.is_alphabetic() && ch != '_' {
            return Err(parser.syntax_error("expected an assignment name"));
        }
        let name = parser.take_identifier();
        if name == "if" {
            // Bootstrap footer; nothing after it is data.
            break;
        }
        parser.skip_trivia();
        parser.expect('=')?;
        parser.skip_trivia();
        let value = parser.parse_value()?;
        statements.push((name, value));
    }

    Ok(statements)
}

/// Parse a single literal, requiring it to consume the whole input.
///
/// # Errors
///
/// Returns an error if the literal is malformed or followed by
/// trailing content.
pub fn parse_literal(source: &str) -> Result<Literal, ParseError> {
    let mut parser = Parser::new(source);
    parser.skip_trivia();
    let value = parser.parse_value()?;
    parser.skip_trivia();
    if parser.peek().is_some() {
        return Err(parser.syntax_error("trailing content after literal"));
    }
    Ok(value)
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
    line: usize,
}

impl Parser {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        if ch == '\n' {
            self.line += 1;
        }
        Some(ch)
    }

    fn expect(&mut self, expected: char) -> Result<(), ParseError> {
        match self.bump() {
            Some(ch) if ch == expected => Ok(()),
            Some(ch) => Err(self.syntax_error(format!("expected '{expected}', found '{ch}'"))),
            None => Err(ParseError::UnexpectedEnd { line: self.line }),
        }
    }

    fn syntax_error(&self, message: impl Into<String>) -> ParseError {
        ParseError::InvalidSyntax {
            line: self.line,
            message: message.into(),
        }
    }

    /// Skip whitespace, comments, and backslash line continuations.
    fn skip_trivia(&mut self) {
        while let Some(ch) = self.peek() {
            match ch {
                ' ' | '\t' | '\r' | '\n' => {
                    self.bump();
                }
                '\\' => {
                    // Only a continuation if a newline follows.
                    let next = self.chars.get(self.pos + 1).copied();
                    if matches!(next, Some('\n')) || matches!(next, Some('\r')) {
                        self.bump();
                        self.bump();
                    } else {
                        break;
                    }
                }
                '#' => {
                    while let Some(ch) = self.peek() {
                        if ch == '\n' {
                            break;
                        }
                        self.bump();
                    }
                }
                _ => break,
            }
        }
    }

    fn take_identifier(&mut self) -> String {
        let mut name = String::new();
        while let Some(ch) = self.peek() {
            if ch.is_alphanumeric() || ch == '_' {
                name.push(ch);
                self.bump();
            } else {
                break;
            }
        }
        name
    }

    fn parse_value(&mut self) -> Result<Literal, ParseError> {
        match self.peek() {
            Some('\'' | '"') => self.parse_string().map(Literal::Str),
            Some('(') => {
                self.bump();
                self.parse_elements(')').map(Literal::Tuple)
            }
            Some('[') => {
                self.bump();
                self.parse_elements(']').map(Literal::List)
            }
            Some('{') => {
                self.bump();
                self.parse_braced()
            }
            Some(ch) if ch.is_ascii_digit() || ch == '-' || ch == '+' || ch == '.' => {
                self.parse_number()
            }
            Some(ch) if ch.is_alphabetic() || ch == '_' => self.parse_keyword(),
            Some(ch) => Err(self.syntax_error(format!("unexpected character '{ch}'"))),
            None => Err(ParseError::UnexpectedEnd { line: self.line }),
        }
    }

    fn parse_string(&mut self) -> Result<String, ParseError> {
        let Some(quote) = self.bump() else {
            return Err(ParseError::UnexpectedEnd { line: self.line });
        };
        let mut value = String::new();
        loop {
            match self.bump() {
                Some(ch) if ch == quote => return Ok(value),
                Some('\\') => match self.bump() {
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some('r') => value.push('\r'),
                    Some(escaped @ ('\\' | '\'' | '"')) => value.push(escaped),
                    Some(other) => {
                        // Unknown escape: keep it verbatim.
                        value.push('\\');
                        value.push(other);
                    }
                    None => return Err(ParseError::UnexpectedEnd { line: self.line }),
                },
                Some(ch) => value.push(ch),
                None => return Err(ParseError::UnexpectedEnd { line: self.line }),
            }
        }
    }

    /// Comma-separated elements up to (and consuming) `close`.
    fn parse_elements(&mut self, close: char) -> Result<Vec<Literal>, ParseError> {
        let mut items = Vec::new();
        loop {
            self.skip_trivia();
            match self.peek() {
                Some(ch) if ch == close => {
                    self.bump();
                    return Ok(items);
                }
                Some(_) => {
                    items.push(self.parse_value()?);
                    self.skip_trivia();
                    match self.peek() {
                        Some(',') => {
                            self.bump();
                        }
                        Some(ch) if ch == close => {}
                        Some(ch) => {
                            return Err(self.syntax_error(format!(
                                "expected ',' or '{close}', found '{ch}'"
                            )));
                        }
                        None => return Err(ParseError::UnexpectedEnd { line: self.line }),
                    }
                }
                None => return Err(ParseError::UnexpectedEnd { line: self.line }),
            }
        }
    }

    /// Body of a `{...}` literal: a dict when the first element is
    /// followed by ':', otherwise a set. `{}` is the empty dict.
    fn parse_braced(&mut self) -> Result<Literal, ParseError> {
        self.skip_trivia();
        if self.peek() == Some('}') {
            self.bump();
            return Ok(Literal::Dict(Vec::new()));
        }
        let first = self.parse_value()?;
        self.skip_trivia();
        match self.peek() {
            Some(':') => {
                self.bump();
                self.skip_trivia();
                let value = self.parse_value()?;
                let mut pairs = vec![(first, value)];
                loop {
                    self.skip_trivia();
                    match self.peek() {
                        Some('}') => {
                            self.bump();
                            return Ok(Literal::Dict(pairs));
                        }
                        Some(',') => {
                            self.bump();
                            self.skip_trivia();
                            if self.peek() == Some('}') {
                                self.bump();
                                return Ok(Literal::Dict(pairs));
                            }
                            let key = self.parse_value()?;
                            self.skip_trivia();
                            self.expect(':')?;
                            self.skip_trivia();
                            let value = self.parse_value()?;
                            pairs.push((key, value));
                        }
                        Some(ch) => {
                            return Err(
                                self.syntax_error(format!("expected ',' or '}}', found '{ch}'"))
                            );
                        }
                        None => return Err(ParseError::UnexpectedEnd { line: self.line }),
                    }
                }
            }
            _ => {
                let mut items = vec![first];
                loop {
                    self.skip_trivia();
                    match self.peek() {
                        Some('}') => {
                            self.bump();
                            return Ok(Literal::Set(items));
                        }
                        Some(',') => {
                            self.bump();
                            self.skip_trivia();
                            if self.peek() == Some('}') {
                                self.bump();
                                return Ok(Literal::Set(items));
                            }
                            items.push(self.parse_value()?);
                        }
                        Some(ch) => {
                            return Err(
                                self.syntax_error(format!("expected ',' or '}}', found '{ch}'"))
                            );
                        }
                        None => return Err(ParseError::UnexpectedEnd { line: self.line }),
                    }
                }
            }
        }
    }

    fn parse_number(&mut self) -> Result<Literal, ParseError> {
        let mut text = String::new();
        let mut is_float = false;
        while let Some(ch) = self.peek() {
            match ch {
                '0'..='9' | '_' => {
                    text.push(ch);
                    self.bump();
                }
                '+' | '-' if text.is_empty() || text.ends_with(['e', 'E']) => {
                    text.push(ch);
                    self.bump();
                }
                '.' | 'e' | 'E' => {
                    is_float = true;
                    text.push(ch);
                    self.bump();
                }
                _ => break,
            }
        }
        let cleaned: String = text.chars().filter(|&c| c != '_').collect();
        if is_float {
            cleaned
                .parse::<f64>()
                .map(Literal::Float)
                .map_err(|_| ParseError::InvalidNumber {
                    line: self.line,
                    text,
                })
        } else {
            cleaned
                .parse::<i64>()
                .map(Literal::Int)
                .map_err(|_| ParseError::InvalidNumber {
                    line: self.line,
                    text,
                })
        }
    }

    fn parse_keyword(&mut self) -> Result<Literal, ParseError> {
        let word = self.take_identifier();
        match word.as_str() {
            "None" => Ok(Literal::None),
            "True" => Ok(Literal::Bool(true)),
            "False" => Ok(Literal::Bool(false)),
            "set" => {
                self.skip_trivia();
                self.expect('(')?;
                self.skip_trivia();
                self.expect(')')?;
                Ok(Literal::Set(Vec::new()))
            }
            other => Err(self.syntax_error(format!("unexpected identifier '{other}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_scalars() {
        assert_eq!(parse_literal("None").expect("parses"), Literal::None);
        assert_eq!(parse_literal("True").expect("parses"), Literal::Bool(true));
        assert_eq!(parse_literal("-42").expect("parses"), Literal::Int(-42));
        assert_eq!(parse_literal("0.3").expect("parses"), Literal::Float(0.3));
        assert_eq!(parse_literal("1e-3").expect("parses"), Literal::Float(0.001));
        assert_eq!(
            parse_literal("'a\\'b'").expect("parses"),
            Literal::Str("a'b".to_string())
        );
    }

    #[test]
    fn test_parse_collections() {
        assert_eq!(
            parse_literal("(1, 2,)").expect("parses"),
            Literal::Tuple(vec![Literal::Int(1), Literal::Int(2)])
        );
        assert_eq!(
            parse_literal("[('a', None)]").expect("parses"),
            Literal::List(vec![Literal::Tuple(vec![
                Literal::Str("a".to_string()),
                Literal::None
            ])])
        );
        assert_eq!(
            parse_literal("{'PRESS', 'RELEASE'}").expect("parses"),
            Literal::Set(vec![
                Literal::Str("PRESS".to_string()),
                Literal::Str("RELEASE".to_string())
            ])
        );
        assert_eq!(parse_literal("set()").expect("parses"), Literal::Set(Vec::new()));
        assert_eq!(
            parse_literal("{\"profile\": 'p'}").expect("parses"),
            Literal::Dict(vec![(
                Literal::Str("profile".to_string()),
                Literal::Str("p".to_string())
            )])
        );
        assert_eq!(parse_literal("{}").expect("parses"), Literal::Dict(Vec::new()));
    }

    #[test]
    fn test_document_with_continuation_and_footer() {
        let source = "\
actionconfig_version = (3, 0, 22)
actionconfig_data = \\
[(\"map\", {\"profile\": 'p'}, {\"items\": []}),
 ]

if __name__ == \"__main__\":
    this_is_ignored()
";
        let statements = parse_document(source).expect("parses");
        assert_eq!(statements.len(), 2);
        assert_eq!(statements[0].0, "actionconfig_version");
        assert_eq!(
            statements[0].1,
            Literal::Tuple(vec![Literal::Int(3), Literal::Int(0), Literal::Int(22)])
        );
        assert_eq!(statements[1].0, "actionconfig_data");
        assert!(matches!(statements[1].1, Literal::List(_)));
    }

    #[test]
    fn test_comments_are_skipped() {
        let source = "x = [1, # inline\n 2]\n";
        let statements = parse_document(source).expect("parses");
        assert_eq!(
            statements[0].1,
            Literal::List(vec![Literal::Int(1), Literal::Int(2)])
        );
    }

    #[test]
    fn test_errors_carry_line_numbers() {
        let err = parse_document("x =\n@").expect_err("bad literal");
        assert_eq!(
            err,
            ParseError::InvalidSyntax {
                line: 2,
                message: "unexpected character '@'".to_string()
            }
        );
        let err = parse_literal("[1, 2").expect_err("unterminated");
        assert!(matches!(err, ParseError::UnexpectedEnd { .. }));
    }
}
