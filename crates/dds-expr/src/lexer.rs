//! Lexer for custom-field expressions.

use std::iter::Peekable;
use std::str::CharIndices;

use crate::error::{ExprError, Result};
use crate::token::{Token, TokenKind};

pub struct Lexer<'a> {
    source: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
        }
    }

    /// Lexes the whole source. The last token is always `Eof`.
    pub fn tokenize(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace();
        let Some((pos, ch)) = self.chars.next() else {
            return Ok(Token::new(TokenKind::Eof, self.source.len()));
        };

        let kind = match ch {
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '^' => TokenKind::Caret,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            ',' => TokenKind::Comma,
            '&' => {
                if self.eat('&') {
                    TokenKind::And
                } else {
                    TokenKind::Amp
                }
            }
            '|' => {
                if self.eat('|') {
                    TokenKind::Or
                } else {
                    return Err(ExprError::UnexpectedChar {
                        found: '|',
                        position: pos,
                    });
                }
            }
            '=' => {
                self.eat('=');
                TokenKind::Eq
            }
            '!' => {
                if self.eat('=') {
                    TokenKind::NotEq
                } else {
                    TokenKind::Not
                }
            }
            '<' => {
                if self.eat('=') {
                    TokenKind::LtEq
                } else if self.eat('>') {
                    TokenKind::NotEq
                } else {
                    TokenKind::Lt
                }
            }
            '>' => {
                if self.eat('=') {
                    TokenKind::GtEq
                } else {
                    TokenKind::Gt
                }
            }
            '"' | '\'' => TokenKind::Str(self.read_string(ch, pos)?),
            '[' => TokenKind::Field(self.read_field(pos)?),
            c if c.is_ascii_digit() || (c == '.' && self.peek_is_digit()) => {
                self.read_number(pos)?
            }
            c if c.is_alphabetic() || c == '_' => {
                let word = self.read_identifier(pos);
                TokenKind::keyword(&word).unwrap_or(TokenKind::Ident(word))
            }
            found => {
                return Err(ExprError::UnexpectedChar {
                    found,
                    position: pos,
                });
            }
        };
        Ok(Token::new(kind, pos))
    }

    fn skip_whitespace(&mut self) {
        while self.chars.next_if(|(_, ch)| ch.is_whitespace()).is_some() {}
    }

    fn eat(&mut self, expected: char) -> bool {
        self.chars.next_if(|(_, ch)| *ch == expected).is_some()
    }

    fn peek_is_digit(&mut self) -> bool {
        self.chars.peek().is_some_and(|(_, ch)| ch.is_ascii_digit())
    }

    fn offset(&mut self) -> usize {
        self.chars.peek().map_or(self.source.len(), |(idx, _)| *idx)
    }

    /// Reads a quoted string. A doubled quote inside stands for one quote.
    fn read_string(&mut self, quote: char, start: usize) -> Result<String> {
        let mut value = String::new();
        loop {
            match self.chars.next() {
                None => return Err(ExprError::UnterminatedString { position: start }),
                Some((_, ch)) if ch == quote => {
                    if self.eat(quote) {
                        value.push(quote);
                    } else {
                        return Ok(value);
                    }
                }
                Some((_, ch)) => value.push(ch),
            }
        }
    }

    fn read_field(&mut self, start: usize) -> Result<String> {
        let mut name = String::new();
        loop {
            match self.chars.next() {
                None => return Err(ExprError::UnterminatedField { position: start }),
                Some((_, ']')) => break,
                Some((_, ch)) => name.push(ch),
            }
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(ExprError::EmptyField { position: start });
        }
        Ok(name.to_string())
    }

    fn read_number(&mut self, start: usize) -> Result<TokenKind> {
        while self.chars.next_if(|(_, ch)| ch.is_ascii_digit()).is_some() {}
        if self.chars.next_if(|(_, ch)| *ch == '.').is_some() {
            while self.chars.next_if(|(_, ch)| ch.is_ascii_digit()).is_some() {}
        }
        if self
            .chars
            .next_if(|(_, ch)| *ch == 'e' || *ch == 'E')
            .is_some()
        {
            self.chars.next_if(|(_, ch)| *ch == '+' || *ch == '-');
            while self.chars.next_if(|(_, ch)| ch.is_ascii_digit()).is_some() {}
        }
        let end = self.offset();
        let literal = &self.source[start..end];
        literal
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .map(TokenKind::Number)
            .ok_or_else(|| ExprError::InvalidNumber {
                literal: literal.to_string(),
                position: start,
            })
    }

    fn read_identifier(&mut self, start: usize) -> String {
        while self
            .chars
            .next_if(|(_, ch)| ch.is_alphanumeric() || *ch == '_')
            .is_some()
        {}
        let end = self.offset();
        self.source[start..end].to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            kinds("+ - * / % ^ & = == != <> < <= > >= && || !"),
            vec![
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Star,
                TokenKind::Slash,
                TokenKind::Percent,
                TokenKind::Caret,
                TokenKind::Amp,
                TokenKind::Eq,
                TokenKind::Eq,
                TokenKind::NotEq,
                TokenKind::NotEq,
                TokenKind::Lt,
                TokenKind::LtEq,
                TokenKind::Gt,
                TokenKind::GtEq,
                TokenKind::And,
                TokenKind::Or,
                TokenKind::Not,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_literals_and_names() {
        assert_eq!(
            kinds("12.5 .5 1e3 'it''s' \"x\" price [Unit Price] TRUE null And"),
            vec![
                TokenKind::Number(12.5),
                TokenKind::Number(0.5),
                TokenKind::Number(1000.0),
                TokenKind::Str("it's".to_string()),
                TokenKind::Str("x".to_string()),
                TokenKind::Ident("price".to_string()),
                TokenKind::Field("Unit Price".to_string()),
                TokenKind::True,
                TokenKind::Null,
                TokenKind::And,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_positions() {
        let tokens = Lexer::new("a +  [b c]").tokenize().unwrap();
        let positions: Vec<usize> = tokens.iter().map(|t| t.position).collect();
        assert_eq!(positions, vec![0, 2, 5, 10]);
    }

    #[test]
    fn test_lex_errors() {
        assert_eq!(
            Lexer::new("1 + $").tokenize(),
            Err(ExprError::UnexpectedChar {
                found: '$',
                position: 4
            })
        );
        assert_eq!(
            Lexer::new("'abc").tokenize(),
            Err(ExprError::UnterminatedString { position: 0 })
        );
        assert_eq!(
            Lexer::new("x + [abc").tokenize(),
            Err(ExprError::UnterminatedField { position: 4 })
        );
        assert_eq!(
            Lexer::new("[  ]").tokenize(),
            Err(ExprError::EmptyField { position: 0 })
        );
        assert_eq!(
            Lexer::new("a | b").tokenize(),
            Err(ExprError::UnexpectedChar {
                found: '|',
                position: 2
            })
        );
        assert!(matches!(
            Lexer::new("1e").tokenize(),
            Err(ExprError::InvalidNumber { .. })
        ));
    }
}
