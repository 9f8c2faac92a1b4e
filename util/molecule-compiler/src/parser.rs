//! Parser for the textual schema language.
//!
//! ```text
//! array Byte32 [byte; 32];
//! vector Bytes <byte>;
//! option BytesOpt (Bytes);
//! union Message { Byte32, Bytes: 8 }
//! struct OutPoint { tx_hash: Byte32, index: Uint32 }
//! table Script { code_hash: Byte32, hash_type: byte, args: Bytes }
//! ```
//!
//! Line comments, block comments and `syntax = ...;` lines are skipped. Imports are rejected.

use crate::{
    declaration::{Declaration, Field, UnionItem},
    error::SchemaError,
};

#[derive(Clone, Debug, PartialEq, Eq)]
enum Token {
    Ident(String),
    Number(u64),
    Punct(char),
}

/// Parses schema text into declarations, in source order.
pub fn parse(source: &str) -> Result<Vec<Declaration>, SchemaError> {
    let tokens = tokenize(source)?;
    let mut parser = Parser { tokens, pos: 0 };
    let mut declarations = Vec::new();
    while !parser.is_eof() {
        if let Some(declaration) = parser.declaration()? {
            declarations.push(declaration);
        }
    }
    Ok(declarations)
}

fn tokenize(source: &str) -> Result<Vec<(Token, usize)>, SchemaError> {
    let mut tokens = Vec::new();
    let mut chars = source.chars().peekable();
    let mut line = 1;
    while let Some(c) = chars.next() {
        match c {
            '\n' => line += 1,
            c if c.is_whitespace() => {}
            '/' if chars.peek() == Some(&'/') => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        line += 1;
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut last = '\0';
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == '\n' {
                        line += 1;
                    }
                    if last == '*' && c == '/' {
                        closed = true;
                        break;
                    }
                    last = c;
                }
                if !closed {
                    return Err(syntax(line, "unterminated block comment"));
                }
            }
            c if c.is_ascii_digit() => {
                let mut literal = c.to_string();
                while let Some(&next) = chars.peek() {
                    if !next.is_ascii_alphanumeric() && next != '_' {
                        break;
                    }
                    literal.push(next);
                    chars.next();
                }
                let literal = literal.replace('_', "");
                let number = match literal.strip_prefix("0x") {
                    Some(hex) => u64::from_str_radix(hex, 16),
                    None => literal.parse(),
                }
                .map_err(|_| syntax(line, format!("invalid number {literal}")))?;
                tokens.push((Token::Number(number), line));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut ident = c.to_string();
                while let Some(&next) = chars.peek() {
                    if !next.is_ascii_alphanumeric() && next != '_' {
                        break;
                    }
                    ident.push(next);
                    chars.next();
                }
                tokens.push((Token::Ident(ident), line));
            }
            '[' | ']' | ';' | '<' | '>' | '(' | ')' | '{' | '}' | ',' | ':' | '=' => {
                tokens.push((Token::Punct(c), line));
            }
            other => return Err(syntax(line, format!("unexpected character {other:?}"))),
        }
    }
    Ok(tokens)
}

fn syntax<M: Into<String>>(line: usize, message: M) -> SchemaError {
    SchemaError::Syntax {
        line,
        message: message.into(),
    }
}

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
}

impl Parser {
    fn is_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn line(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map(|(_, line)| *line)
            .unwrap_or(1)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|(token, _)| token.clone());
        self.pos += 1;
        token
    }

    fn peek_punct(&self, punct: char) -> bool {
        matches!(self.tokens.get(self.pos), Some((Token::Punct(c), _)) if *c == punct)
    }

    fn expect_punct(&mut self, punct: char) -> Result<(), SchemaError> {
        let line = self.line();
        match self.next() {
            Some(Token::Punct(c)) if c == punct => Ok(()),
            other => Err(syntax(line, format!("expected {punct:?}, found {other:?}"))),
        }
    }

    fn ident(&mut self) -> Result<String, SchemaError> {
        let line = self.line();
        match self.next() {
            Some(Token::Ident(ident)) => Ok(ident),
            other => Err(syntax(line, format!("expected identifier, found {other:?}"))),
        }
    }

    fn number(&mut self) -> Result<u64, SchemaError> {
        let line = self.line();
        match self.next() {
            Some(Token::Number(number)) => Ok(number),
            other => Err(syntax(line, format!("expected number, found {other:?}"))),
        }
    }

    fn declaration(&mut self) -> Result<Option<Declaration>, SchemaError> {
        let line = self.line();
        let keyword = self.ident()?;
        let declaration = match keyword.as_str() {
            "syntax" => {
                self.expect_punct('=')?;
                self.next();
                self.expect_punct(';')?;
                return Ok(None);
            }
            "import" => return Err(syntax(line, "imports are not supported")),
            "array" => {
                let name = self.ident()?;
                self.expect_punct('[')?;
                let item = self.ident()?;
                self.expect_punct(';')?;
                let item_count = usize::try_from(self.number()?)
                    .map_err(|_| syntax(line, "array item count is too large"))?;
                self.expect_punct(']')?;
                Declaration::Array {
                    name,
                    item,
                    item_count,
                }
            }
            "vector" => {
                let name = self.ident()?;
                self.expect_punct('<')?;
                let item = self.ident()?;
                self.expect_punct('>')?;
                Declaration::Vector { name, item }
            }
            "option" => {
                let name = self.ident()?;
                self.expect_punct('(')?;
                let item = self.ident()?;
                self.expect_punct(')')?;
                Declaration::Option { name, item }
            }
            "union" => {
                let name = self.ident()?;
                let items = self.braced(|parser| {
                    let item = parser.ident()?;
                    if parser.peek_punct(':') {
                        parser.next();
                        Ok(UnionItem::WithId(item, parser.number()?))
                    } else {
                        Ok(UnionItem::Named(item))
                    }
                })?;
                Declaration::Union { name, items }
            }
            "struct" | "table" => {
                let name = self.ident()?;
                let fields = self.braced(|parser| {
                    let field = parser.ident()?;
                    parser.expect_punct(':')?;
                    Ok(Field::new(field, parser.ident()?))
                })?;
                if keyword == "struct" {
                    Declaration::Struct { name, fields }
                } else {
                    Declaration::Table { name, fields }
                }
            }
            other => return Err(syntax(line, format!("unknown keyword {other}"))),
        };
        // Brace-delimited declarations may omit the trailing semicolon.
        if self.peek_punct(';') {
            self.next();
        } else if !matches!(
            declaration,
            Declaration::Union { .. } | Declaration::Struct { .. } | Declaration::Table { .. }
        ) {
            self.expect_punct(';')?;
        }
        Ok(Some(declaration))
    }

    // Parses `{ entry, entry, ... }` with an optional trailing comma.
    fn braced<T, F>(&mut self, mut entry: F) -> Result<Vec<T>, SchemaError>
    where
        F: FnMut(&mut Parser) -> Result<T, SchemaError>,
    {
        self.expect_punct('{')?;
        let mut entries = Vec::new();
        while !self.peek_punct('}') {
            entries.push(entry(self)?);
            if self.peek_punct(',') {
                self.next();
            } else if !self.peek_punct('}') {
                let line = self.line();
                return Err(syntax(line, "expected ',' or '}'"));
            }
        }
        self.expect_punct('}')?;
        Ok(entries)
    }
}
