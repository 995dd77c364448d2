//! RDF term types: IRI, blank node, and literal
//!
//! Terms are immutable once constructed and compare structurally. The
//! `Display` implementations produce the N-Triples form of each term, which
//! is also the form the store's serializer writes.

use crate::vocab::{rdf, xsd};
use chrono::{DateTime, FixedOffset, SecondsFormat};
use std::fmt;
use std::fmt::Write as _;
use std::sync::Arc;

/// Errors raised when a term cannot be constructed from its parts
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TermError {
    /// The string is not an absolute IRI
    #[error("invalid IRI '{0}'")]
    InvalidIri(String),
    /// The blank node label contains characters N-Triples cannot carry
    #[error("invalid blank node label '{0}'")]
    InvalidBlankLabel(String),
    /// The language tag is not of the form `lang(-subtag)*`
    #[error("invalid language tag '{0}'")]
    InvalidLanguageTag(String),
}

/// An absolute IRI
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Iri(Arc<str>);

impl Iri {
    /// Parse and validate an absolute IRI
    ///
    /// # Examples
    ///
    /// ```
    /// use trellis_domain::Iri;
    ///
    /// assert!(Iri::parse("http://example.org/alice").is_ok());
    /// assert!(Iri::parse("alice").is_err());
    /// assert!(Iri::parse("http://example.org/a b").is_err());
    /// ```
    pub fn parse(value: impl AsRef<str>) -> Result<Self, TermError> {
        let value = value.as_ref();
        if is_valid_iri(value) {
            Ok(Self(Arc::from(value)))
        } else {
            Err(TermError::InvalidIri(value.to_string()))
        }
    }

    /// Wrap one of the vocabulary constants
    pub fn from_static(value: &'static str) -> Self {
        debug_assert!(is_valid_iri(value), "vocabulary IRI must be valid: {}", value);
        Self(Arc::from(value))
    }

    /// The IRI string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Validation excludes every character an IRIREF would need to escape.
        write!(f, "<{}>", self.0)
    }
}

/// Check the shape of an absolute IRI: a scheme followed by characters that
/// are legal inside an N-Triples IRIREF.
pub fn is_valid_iri(value: &str) -> bool {
    let Some((scheme, _rest)) = value.split_once(':') else {
        return false;
    };
    let mut scheme_chars = scheme.chars();
    match scheme_chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    if !scheme_chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
        return false;
    }
    value
        .chars()
        .all(|c| c > ' ' && !matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\'))
}

/// Blank node identifier
///
/// The label excludes the `_:` prefix. Blank node labels have no meaning
/// outside the graph that holds them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlankId(Arc<str>);

impl BlankId {
    /// Create a blank node ID from a label (without the `_:` prefix)
    pub fn new(label: impl AsRef<str>) -> Result<Self, TermError> {
        let label = label.as_ref();
        if is_valid_blank_label(label) {
            Ok(Self(Arc::from(label)))
        } else {
            Err(TermError::InvalidBlankLabel(label.to_string()))
        }
    }

    /// A label derived from a hash digest: `b` followed by lowercase hex
    pub fn from_digest(digest: &[u8]) -> Self {
        let mut label = String::with_capacity(1 + digest.len() * 2);
        label.push('b');
        for byte in digest {
            let _ = write!(label, "{:02x}", byte);
        }
        Self(Arc::from(label))
    }

    /// Get the label (without `_:` prefix)
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlankId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "_:{}", self.0)
    }
}

fn is_valid_blank_label(label: &str) -> bool {
    let mut chars = label.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphanumeric() || c == '_' => {}
        _ => return false,
    }
    !label.ends_with('.')
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

/// A literal: lexical form, datatype and optional language tag
///
/// Datatypes are always explicit. Plain strings carry `xsd:string` and
/// language-tagged strings carry `rdf:langString`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal {
    lexical: Arc<str>,
    datatype: Iri,
    language: Option<Arc<str>>,
}

impl Literal {
    /// A literal with an explicit datatype
    ///
    /// A datatype of `rdf:langString` without a tag is stored as given; use
    /// [`Literal::lang_string`] to attach a tag.
    pub fn typed(lexical: impl AsRef<str>, datatype: Iri) -> Self {
        Self {
            lexical: Arc::from(lexical.as_ref()),
            datatype,
            language: None,
        }
    }

    /// An `xsd:string` literal
    pub fn string(lexical: impl AsRef<str>) -> Self {
        Self::typed(lexical, Iri::from_static(xsd::STRING))
    }

    /// A language-tagged string (`rdf:langString`)
    pub fn lang_string(lexical: impl AsRef<str>, language: impl AsRef<str>) -> Result<Self, TermError> {
        let language = language.as_ref();
        if !is_valid_language_tag(language) {
            return Err(TermError::InvalidLanguageTag(language.to_string()));
        }
        Ok(Self {
            lexical: Arc::from(lexical.as_ref()),
            datatype: Iri::from_static(rdf::LANG_STRING),
            language: Some(Arc::from(language)),
        })
    }

    /// An `xsd:integer` literal
    pub fn integer(value: i64) -> Self {
        Self::typed(value.to_string(), Iri::from_static(xsd::INTEGER))
    }

    /// An `xsd:double` literal
    pub fn double(value: f64) -> Self {
        Self::typed(double_lexical(value), Iri::from_static(xsd::DOUBLE))
    }

    /// An `xsd:boolean` literal
    pub fn boolean(value: bool) -> Self {
        Self::typed(value.to_string(), Iri::from_static(xsd::BOOLEAN))
    }

    /// An `xsd:dateTime` literal
    pub fn date_time(value: &DateTime<FixedOffset>) -> Self {
        Self::typed(
            value.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            Iri::from_static(xsd::DATE_TIME),
        )
    }

    /// The lexical form
    pub fn lexical(&self) -> &str {
        &self.lexical
    }

    /// The datatype IRI
    pub fn datatype(&self) -> &Iri {
        &self.datatype
    }

    /// The language tag, if any
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("\"")?;
        for c in self.lexical.chars() {
            match c {
                '"' => f.write_str("\\\"")?,
                '\\' => f.write_str("\\\\")?,
                '\n' => f.write_str("\\n")?,
                '\r' => f.write_str("\\r")?,
                '\t' => f.write_str("\\t")?,
                c if c.is_control() => write!(f, "\\u{:04X}", c as u32)?,
                c => write!(f, "{}", c)?,
            }
        }
        f.write_str("\"")?;
        if let Some(language) = &self.language {
            write!(f, "@{}", language)
        } else if self.datatype.as_str() == xsd::STRING {
            Ok(())
        } else {
            write!(f, "^^{}", self.datatype)
        }
    }
}

/// Lexical form of a double following the XSD canonical spellings for the
/// special values.
pub fn double_lexical(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value.is_sign_positive() {
            "INF".to_string()
        } else {
            "-INF".to_string()
        }
    } else {
        value.to_string()
    }
}

/// BCP47-shaped language tag: `[a-zA-Z]+ ('-' [a-zA-Z0-9]+)*`
pub fn is_valid_language_tag(tag: &str) -> bool {
    let mut parts = tag.split('-');
    let primary_ok = parts
        .next()
        .map(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_alphabetic()))
        .unwrap_or(false);
    primary_ok && parts.all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_alphanumeric()))
}

/// An RDF term
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Term {
    /// An IRI
    Iri(Iri),
    /// A blank node
    BlankNode(BlankId),
    /// A literal
    Literal(Literal),
}

impl Term {
    /// Parse an IRI term
    pub fn iri(value: impl AsRef<str>) -> Result<Self, TermError> {
        Iri::parse(value).map(Term::Iri)
    }

    /// Create a blank node term
    pub fn blank(label: impl AsRef<str>) -> Result<Self, TermError> {
        BlankId::new(label).map(Term::BlankNode)
    }

    /// Create an `xsd:string` literal term
    pub fn string(value: impl AsRef<str>) -> Self {
        Term::Literal(Literal::string(value))
    }

    /// Whether this term is an IRI
    pub fn is_iri(&self) -> bool {
        matches!(self, Term::Iri(_))
    }

    /// Whether this term is a blank node
    pub fn is_blank(&self) -> bool {
        matches!(self, Term::BlankNode(_))
    }

    /// Whether this term is a literal
    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal(_))
    }

    /// The IRI, if this term is one
    pub fn as_iri(&self) -> Option<&Iri> {
        match self {
            Term::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    /// The literal, if this term is one
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Term::Literal(literal) => Some(literal),
            _ => None,
        }
    }
}

impl From<Iri> for Term {
    fn from(iri: Iri) -> Self {
        Term::Iri(iri)
    }
}

impl From<BlankId> for Term {
    fn from(id: BlankId) -> Self {
        Term::BlankNode(id)
    }
}

impl From<Literal> for Term {
    fn from(literal: Literal) -> Self {
        Term::Literal(literal)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri(iri) => iri.fmt(f),
            Term::BlankNode(id) => id.fmt(f),
            Term::Literal(literal) => literal.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iri_validation() {
        assert!(Iri::parse("http://example.org/p1").is_ok());
        assert!(Iri::parse("urn:isbn:0451450523").is_ok());
        assert!(Iri::parse("").is_err());
        assert!(Iri::parse("no-scheme").is_err());
        assert!(Iri::parse("1http://example.org").is_err());
        assert!(Iri::parse("http://example.org/<x>").is_err());
        assert!(Iri::parse("http://example.org/\"q\"").is_err());
    }

    #[test]
    fn test_blank_label_validation() {
        assert!(BlankId::new("b0").is_ok());
        assert!(BlankId::new("_x-y.z").is_ok());
        assert!(BlankId::new("").is_err());
        assert!(BlankId::new("-a").is_err());
        assert!(BlankId::new("a.").is_err());
        assert!(BlankId::new("a b").is_err());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            Iri::parse("no-scheme").unwrap_err().to_string(),
            "invalid IRI 'no-scheme'"
        );
        assert_eq!(
            BlankId::new("a b").unwrap_err().to_string(),
            "invalid blank node label 'a b'"
        );
        let err: Box<dyn std::error::Error> = Box::new(TermError::InvalidLanguageTag("en_GB".into()));
        assert_eq!(err.to_string(), "invalid language tag 'en_GB'");
    }

    #[test]
    fn test_language_tag() {
        assert!(Literal::lang_string("hei", "no").is_ok());
        assert!(Literal::lang_string("hi", "en-GB").is_ok());
        assert!(Literal::lang_string("x", "").is_err());
        assert!(Literal::lang_string("x", "en_GB").is_err());
    }

    #[test]
    fn test_display_forms() {
        let iri = Term::iri("http://example.org/a").unwrap();
        assert_eq!(iri.to_string(), "<http://example.org/a>");

        let blank = Term::blank("b1").unwrap();
        assert_eq!(blank.to_string(), "_:b1");

        assert_eq!(Term::string("Alice").to_string(), "\"Alice\"");
        assert_eq!(
            Term::Literal(Literal::integer(42)).to_string(),
            "\"42\"^^<http://www.w3.org/2001/XMLSchema#integer>"
        );
        assert_eq!(
            Term::Literal(Literal::lang_string("hei", "no").unwrap()).to_string(),
            "\"hei\"@no"
        );
        assert_eq!(
            Term::string("a \"quoted\"\nline").to_string(),
            "\"a \\\"quoted\\\"\\nline\""
        );
    }

    #[test]
    fn test_structural_equality() {
        assert_eq!(Term::string("x"), Term::string("x"));
        assert_ne!(
            Term::string("1"),
            Term::Literal(Literal::integer(1))
        );
    }

    #[test]
    fn test_double_lexical() {
        assert_eq!(double_lexical(1.5), "1.5");
        assert_eq!(double_lexical(f64::NAN), "NaN");
        assert_eq!(double_lexical(f64::NEG_INFINITY), "-INF");
    }
}
