//! Recursive-descent reader producing [`Value`]s from lexed tokens.

use sx_ir::Value;

use crate::error::{ReadError, ReadErrorKind};
use crate::lexer::{lex, SpannedToken, Token};

/// Read every top-level form in `src`.
pub fn read_str(src: &str) -> Result<Vec<Value>, ReadError> {
    let tokens = lex(src)?;
    let mut reader = Reader {
        src,
        tokens,
        pos: 0,
    };
    let mut forms = Vec::new();
    while reader.peek().is_some() {
        forms.push(reader.read_form()?);
    }
    Ok(forms)
}

struct Reader<'src> {
    src: &'src str,
    tokens: Vec<SpannedToken>,
    pos: usize,
}

impl Reader<'_> {
    fn peek(&self) -> Option<&SpannedToken> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<&SpannedToken> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eof_offset(&self) -> usize {
        self.src.len()
    }

    fn read_form(&mut self) -> Result<Value, ReadError> {
        let Some(token) = self.next() else {
            return Err(ReadError::new(
                ReadErrorKind::UnexpectedEof,
                self.eof_offset(),
            ));
        };
        let (kind, start, end) = (token.token, token.start, token.end);
        let slice = &self.src[start..end];
        match kind {
            Token::LParen => self.read_list(start),
            Token::RParen => Err(ReadError::new(ReadErrorKind::UnexpectedCloseParen, start)),
            Token::Dot => Err(ReadError::new(ReadErrorKind::StrayDot, start)),
            Token::Quote => self.read_sugar("quote"),
            Token::Quasiquote => self.read_sugar("quasiquote"),
            Token::Unquote => self.read_sugar("unquote"),
            Token::UnquoteSplicing => self.read_sugar("unquote-splicing"),
            Token::Int => slice
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|_| ReadError::new(ReadErrorKind::InvalidNumber, start)),
            Token::Float => slice
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| ReadError::new(ReadErrorKind::InvalidNumber, start)),
            Token::Str => Ok(Value::string(&unescape(&slice[1..slice.len() - 1]))),
            Token::Char => parse_char(&slice[2..])
                .ok_or_else(|| ReadError::new(ReadErrorKind::InvalidChar, start)),
            Token::PipeSym => Ok(Value::sym(&slice[1..slice.len() - 1])),
            Token::Sym => {
                if slice == "nil" {
                    Ok(Value::Nil)
                } else {
                    Ok(Value::sym(slice))
                }
            }
        }
    }

    fn read_sugar(&mut self, head: &str) -> Result<Value, ReadError> {
        let inner = self.read_form()?;
        Ok(Value::list([Value::sym(head), inner]))
    }

    fn read_list(&mut self, open_offset: usize) -> Result<Value, ReadError> {
        let mut items = Vec::new();
        let mut tail = Value::Nil;
        loop {
            let Some(token) = self.peek() else {
                return Err(ReadError::new(ReadErrorKind::UnclosedParen, open_offset));
            };
            match token.token {
                Token::RParen => {
                    self.pos += 1;
                    break;
                }
                Token::Dot => {
                    let dot_offset = token.start;
                    if items.is_empty() {
                        return Err(ReadError::new(ReadErrorKind::StrayDot, dot_offset));
                    }
                    self.pos += 1;
                    tail = self.read_form()?;
                    match self.next() {
                        Some(close) if close.token == Token::RParen => break,
                        Some(other) => {
                            return Err(ReadError::new(
                                ReadErrorKind::ExpectedCloseAfterTail,
                                other.start,
                            ))
                        }
                        None => {
                            return Err(ReadError::new(
                                ReadErrorKind::UnclosedParen,
                                open_offset,
                            ))
                        }
                    }
                }
                _ => items.push(self.read_form()?),
            }
        }
        let mut out = tail;
        for item in items.into_iter().rev() {
            out = Value::cons(item, out);
        }
        Ok(out)
    }
}

fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            // The lexer guarantees no trailing lone backslash.
            None => {}
        }
    }
    out
}

fn parse_char(name: &str) -> Option<Value> {
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Some(Value::Char(c));
    }
    match name {
        "space" => Some(Value::Char(' ')),
        "newline" => Some(Value::Char('\n')),
        "tab" => Some(Value::Char('\t')),
        "return" => Some(Value::Char('\r')),
        _ => None,
    }
}
