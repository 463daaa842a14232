use log::trace;

use crate::error::{Error, Result};

/// A single lexical unit of a pattern.
///
/// Escaped metacharacters come out as [`Token::Literal`], so the parser
/// never has to look at backslashes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Literal(char),
    Dot,
    QuestionMark,
    Star,
    Plus,
    LBracket,
    RBracket,
    LParen,
    RParen,
    LBrace,
    RBrace,
    Pipe,
    Caret,
}

impl Token {
    /// Classify an unescaped character as a metacharacter token.
    fn meta(c: char) -> Option<Token> {
        let token = match c {
            '.' => Token::Dot,
            '?' => Token::QuestionMark,
            '*' => Token::Star,
            '+' => Token::Plus,
            '[' => Token::LBracket,
            ']' => Token::RBracket,
            '(' => Token::LParen,
            ')' => Token::RParen,
            '{' => Token::LBrace,
            '}' => Token::RBrace,
            '|' => Token::Pipe,
            '^' => Token::Caret,
            _ => return None,
        };
        Some(token)
    }

    /// The character this token was scanned from, with any metacharacter
    /// meaning dropped.
    pub fn glyph(self) -> char {
        match self {
            Token::Literal(c) => c,
            Token::Dot => '.',
            Token::QuestionMark => '?',
            Token::Star => '*',
            Token::Plus => '+',
            Token::LBracket => '[',
            Token::RBracket => ']',
            Token::LParen => '(',
            Token::RParen => ')',
            Token::LBrace => '{',
            Token::RBrace => '}',
            Token::Pipe => '|',
            Token::Caret => '^',
        }
    }
}

/// Pull-based tokenizer over the raw pattern bytes.
///
/// Once an error has been returned, every later call returns that same
/// error.
pub struct Lexer<'a> {
    src: &'a [u8],
    pos: usize,
    err: Option<Error>,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a [u8]) -> Self {
        Self {
            src,
            pos: 0,
            err: None,
        }
    }

    /// Returns the next token, `Ok(None)` at end of input.
    pub fn next_token(&mut self) -> Result<Option<Token>> {
        if let Some(err) = &self.err {
            return Err(err.clone());
        }
        let token = self.scan();
        if let Err(err) = &token {
            trace!("lexer error at byte {}: {}", self.pos, err);
            self.err = Some(err.clone());
        }
        token
    }

    fn scan(&mut self) -> Result<Option<Token>> {
        let Some(c) = self.advance()? else {
            return Ok(None);
        };
        let token = match c {
            '\\' => match self.advance()? {
                None => return Err(Error::TrailingBackslash),
                Some(c) if c == '\\' || Token::meta(c).is_some() => Token::Literal(c),
                Some(c) => return Err(Error::InvalidEscape(c)),
            },
            c => Token::meta(c).unwrap_or(Token::Literal(c)),
        };
        Ok(Some(token))
    }

    /// Decode one character and step past it.
    fn advance(&mut self) -> Result<Option<char>> {
        if self.pos >= self.src.len() {
            return Ok(None);
        }
        let (c, size) = bstr::decode_utf8(&self.src[self.pos..]);
        self.pos += size;
        c.map(Some).ok_or(Error::InvalidEncoding)
    }
}
