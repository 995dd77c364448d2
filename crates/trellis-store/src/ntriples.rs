//! N-Triples serialization and parsing
//!
//! Writing relies on the `Display` forms of the term model. Parsing accepts
//! the full N-Triples line grammar: IRIs, blank node labels, literals with
//! string escapes and an optional language tag or datatype, comments and
//! blank lines. A literal without a suffix is read as `xsd:string`.

use crate::graph::GraphStore;
use std::io::{self, BufRead, Write};
use thiserror::Error;
use trellis_domain::{BlankId, Iri, Literal, Term, Triple};

/// Error type for N-Triples operations
#[derive(Error, Debug)]
pub enum NTriplesError {
    /// Malformed input
    #[error("Syntax error at line {line}, column {column}: {message}")]
    Syntax {
        /// 1-based line number
        line: usize,
        /// 1-based character column
        column: usize,
        /// What went wrong
        message: String,
    },

    /// I/O error while reading or writing
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for N-Triples operations
pub type Result<T> = std::result::Result<T, NTriplesError>;

/// Write every triple of the store, one per line
pub fn write_ntriples<W: Write>(graph: &GraphStore, mut writer: W) -> Result<usize> {
    let mut written = 0;
    for triple in graph.iter() {
        writeln!(writer, "{}", triple)?;
        written += 1;
    }
    writer.flush()?;
    Ok(written)
}

/// Render the store as an N-Triples document
pub fn to_ntriples_string(graph: &GraphStore) -> String {
    let mut out = String::new();
    for triple in graph.iter() {
        out.push_str(&triple.to_string());
        out.push('\n');
    }
    out
}

/// Parse an N-Triples document into a new store
pub fn parse_ntriples(input: &str) -> Result<GraphStore> {
    let mut graph = GraphStore::new();
    for (index, line) in input.lines().enumerate() {
        if let Some(triple) = parse_line(line, index + 1)? {
            graph.insert(triple);
        }
    }
    Ok(graph)
}

/// Parse N-Triples from a reader into a new store
pub fn read_ntriples<R: BufRead>(reader: R) -> Result<GraphStore> {
    let mut graph = GraphStore::new();
    for (index, line) in reader.lines().enumerate() {
        if let Some(triple) = parse_line(&line?, index + 1)? {
            graph.insert(triple);
        }
    }
    Ok(graph)
}

/// Parse a single term in N-Triples notation
pub fn parse_term(input: &str) -> Result<Term> {
    let mut cursor = Cursor::new(input, 1);
    cursor.skip_ws();
    let term = cursor.term()?;
    cursor.skip_ws();
    if !cursor.at_end() {
        return Err(cursor.error("trailing characters after term"));
    }
    Ok(term)
}

/// Parse one line; `None` for blank and comment lines
fn parse_line(line: &str, number: usize) -> Result<Option<Triple>> {
    let mut cursor = Cursor::new(line, number);
    cursor.skip_ws();
    if cursor.at_end() || cursor.peek() == Some('#') {
        return Ok(None);
    }

    let subject = cursor.term()?;
    cursor.skip_ws();
    let predicate = cursor.term()?;
    cursor.skip_ws();
    let object = cursor.term()?;
    cursor.skip_ws();
    cursor.expect('.')?;
    cursor.skip_ws();
    if !cursor.at_end() && cursor.peek() != Some('#') {
        return Err(cursor.error("expected end of line after '.'"));
    }

    Triple::new(subject, predicate, object)
        .map(Some)
        .map_err(|e| cursor.error(e.to_string()))
}

struct Cursor<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str, line: usize) -> Self {
        Self {
            chars: input.chars().peekable(),
            line,
            column: 1,
        }
    }

    fn error(&self, message: impl Into<String>) -> NTriplesError {
        NTriplesError::Syntax {
            line: self.line,
            column: self.column,
            message: message.into(),
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn next(&mut self) -> Option<char> {
        let c = self.chars.next();
        if c.is_some() {
            self.column += 1;
        }
        c
    }

    fn at_end(&mut self) -> bool {
        self.peek().is_none()
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(' ') | Some('\t')) {
            self.next();
        }
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        match self.next() {
            Some(c) if c == expected => Ok(()),
            Some(c) => Err(self.error(format!("expected '{}', found '{}'", expected, c))),
            None => Err(self.error(format!("expected '{}', found end of line", expected))),
        }
    }

    fn term(&mut self) -> Result<Term> {
        match self.peek() {
            Some('<') => self.iri().map(Term::Iri),
            Some('_') => self.blank(),
            Some('"') => self.literal(),
            Some(c) => Err(self.error(format!("unexpected character '{}'", c))),
            None => Err(self.error("unexpected end of line")),
        }
    }

    fn iri(&mut self) -> Result<Iri> {
        self.expect('<')?;
        let mut value = String::new();
        loop {
            match self.next() {
                Some('>') => break,
                Some('\\') => value.push(self.unicode_escape()?),
                Some(c) => value.push(c),
                None => return Err(self.error("unterminated IRI")),
            }
        }
        Iri::parse(&value).map_err(|e| self.error(e.to_string()))
    }

    fn blank(&mut self) -> Result<Term> {
        self.expect('_')?;
        self.expect(':')?;
        let mut label = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || matches!(c, '_' | '-' | '.') {
                label.push(c);
                self.next();
            } else {
                break;
            }
        }
        // A trailing '.' ends the statement rather than the label.
        if label.ends_with('.') {
            return Err(self.error("blank node label must be followed by whitespace"));
        }
        BlankId::new(&label)
            .map(Term::BlankNode)
            .map_err(|e| self.error(e.to_string()))
    }

    fn literal(&mut self) -> Result<Term> {
        self.expect('"')?;
        let mut lexical = String::new();
        loop {
            match self.next() {
                Some('"') => break,
                Some('\\') => lexical.push(self.string_escape()?),
                Some(c) => lexical.push(c),
                None => return Err(self.error("unterminated string literal")),
            }
        }

        match self.peek() {
            Some('@') => {
                self.next();
                let mut tag = String::new();
                while let Some(c) = self.peek() {
                    if c.is_ascii_alphanumeric() || c == '-' {
                        tag.push(c);
                        self.next();
                    } else {
                        break;
                    }
                }
                Literal::lang_string(lexical, &tag)
                    .map(Term::Literal)
                    .map_err(|e| self.error(e.to_string()))
            }
            Some('^') => {
                self.next();
                self.expect('^')?;
                let datatype = self.iri()?;
                Ok(Term::Literal(Literal::typed(lexical, datatype)))
            }
            _ => Ok(Term::Literal(Literal::string(lexical))),
        }
    }

    fn string_escape(&mut self) -> Result<char> {
        match self.next() {
            Some('t') => Ok('\t'),
            Some('b') => Ok('\u{8}'),
            Some('n') => Ok('\n'),
            Some('r') => Ok('\r'),
            Some('f') => Ok('\u{c}'),
            Some('"') => Ok('"'),
            Some('\'') => Ok('\''),
            Some('\\') => Ok('\\'),
            Some('u') => self.hex_char(4),
            Some('U') => self.hex_char(8),
            Some(c) => Err(self.error(format!("invalid escape '\\{}'", c))),
            None => Err(self.error("unterminated escape")),
        }
    }

    fn unicode_escape(&mut self) -> Result<char> {
        match self.next() {
            Some('u') => self.hex_char(4),
            Some('U') => self.hex_char(8),
            _ => Err(self.error("only \\u and \\U escapes are allowed in IRIs")),
        }
    }

    fn hex_char(&mut self, digits: usize) -> Result<char> {
        let mut code = 0u32;
        for _ in 0..digits {
            let digit = self
                .next()
                .and_then(|c| c.to_digit(16))
                .ok_or_else(|| self.error("invalid hex digit in escape"))?;
            code = code * 16 + digit;
        }
        char::from_u32(code).ok_or_else(|| self.error(format!("invalid code point U+{:X}", code)))
    }
}
