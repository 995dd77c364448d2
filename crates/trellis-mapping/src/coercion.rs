//! Term coercion: raw row values to terms under a declared parameter type
//!
//! This is the single conversion point between [`RawValue`]s and [`Term`]s.
//! Failures are returned as a bare reason; the expander attaches the
//! parameter, row and declared type.

use chrono::DateTime;
use trellis_domain::term::double_lexical;
use trellis_domain::vocab::{rdf, xsd};
use trellis_domain::{Iri, Literal, ParameterType, RawValue, Term};

/// Coerce a non-null scalar value to a term
///
/// `language` tags string values that would otherwise become `xsd:string`.
/// Blank parameters never reach here: their terms are synthesized.
pub fn coerce(value: &RawValue, declared: &ParameterType, language: Option<&str>) -> Result<Term, String> {
    match value {
        RawValue::Null => return Err("null value".to_string()),
        RawValue::List(_) => return Err("list value bound to a scalar parameter".to_string()),
        _ => {}
    }

    match declared {
        ParameterType::Iri => coerce_iri(value),
        ParameterType::Literal(None) | ParameterType::Any => infer_literal(value, language).map(Term::Literal),
        ParameterType::Literal(Some(datatype)) => typed_literal(value, datatype, language).map(Term::Literal),
        ParameterType::Blank => Err("blank parameters take no value".to_string()),
    }
}

fn coerce_iri(value: &RawValue) -> Result<Term, String> {
    match value {
        RawValue::String(s) if s.is_empty() => Err("empty string is not an IRI".to_string()),
        RawValue::String(s) => Iri::parse(s)
            .map(Term::Iri)
            .map_err(|_| format!("'{}' is not a valid IRI", s)),
        other => Err(format!("{} value cannot be an IRI", other.kind())),
    }
}

/// Literal whose datatype follows the value's native kind
fn infer_literal(value: &RawValue, language: Option<&str>) -> Result<Literal, String> {
    match value {
        RawValue::String(s) => match language {
            Some(tag) => Literal::lang_string(s, tag).map_err(|e| e.to_string()),
            None => Ok(Literal::string(s)),
        },
        RawValue::Integer(i) => Ok(Literal::integer(*i)),
        RawValue::Float(x) => Ok(Literal::double(*x)),
        RawValue::Boolean(b) => Ok(Literal::boolean(*b)),
        RawValue::DateTime(dt) => Ok(Literal::date_time(dt)),
        other => Err(format!("{} value cannot be a literal", other.kind())),
    }
}

/// Literal with an explicit datatype; the lexical form is checked for the
/// XSD types this engine knows
fn typed_literal(value: &RawValue, datatype: &Iri, language: Option<&str>) -> Result<Literal, String> {
    if datatype.as_str() == rdf::LANG_STRING {
        let tag = language.ok_or_else(|| "rdf:langString needs a language tag".to_string())?;
        return match value {
            RawValue::String(s) => Literal::lang_string(s, tag).map_err(|e| e.to_string()),
            other => Err(format!("{} value cannot be a language-tagged string", other.kind())),
        };
    }

    let lexical = match value {
        RawValue::String(s) => s.clone(),
        RawValue::Integer(i) => i.to_string(),
        RawValue::Float(x) => double_lexical(*x),
        RawValue::Boolean(b) => b.to_string(),
        RawValue::DateTime(dt) => Literal::date_time(dt).lexical().to_string(),
        other => return Err(format!("{} value cannot be a literal", other.kind())),
    };

    check_lexical(&lexical, datatype.as_str())?;
    Ok(Literal::typed(lexical, datatype.clone()))
}

fn check_lexical(lexical: &str, datatype: &str) -> Result<(), String> {
    let ok = match datatype {
        xsd::INTEGER => is_integer(lexical),
        xsd::LONG => lexical.parse::<i64>().is_ok(),
        xsd::INT => lexical.parse::<i32>().is_ok(),
        xsd::DECIMAL => is_decimal(lexical),
        xsd::DOUBLE | xsd::FLOAT => {
            matches!(lexical, "NaN" | "INF" | "-INF") || lexical.parse::<f64>().is_ok()
        }
        xsd::BOOLEAN => matches!(lexical, "true" | "false" | "1" | "0"),
        xsd::DATE_TIME => DateTime::parse_from_rfc3339(lexical).is_ok(),
        xsd::ANY_URI => Iri::parse(lexical).is_ok(),
        _ => true,
    };
    if ok {
        Ok(())
    } else {
        Err(format!("'{}' is not a valid lexical form for <{}>", lexical, datatype))
    }
}

fn is_integer(lexical: &str) -> bool {
    let digits = lexical.strip_prefix(['+', '-']).unwrap_or(lexical);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

fn is_decimal(lexical: &str) -> bool {
    let unsigned = lexical.strip_prefix(['+', '-']).unwrap_or(lexical);
    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    !(whole.is_empty() && fraction.is_empty())
        && whole.chars().all(|c| c.is_ascii_digit())
        && fraction.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn dt(iri: &str) -> ParameterType {
        ParameterType::Literal(Some(Iri::parse(iri).unwrap()))
    }

    fn literal(term: Term) -> Literal {
        term.as_literal().cloned().unwrap()
    }

    #[test]
    fn test_iri_coercion() {
        let term = coerce(&RawValue::from("http://example.org/p1"), &ParameterType::Iri, None).unwrap();
        assert!(term.is_iri());

        assert!(coerce(&RawValue::from(""), &ParameterType::Iri, None).is_err());
        assert!(coerce(&RawValue::from("no scheme"), &ParameterType::Iri, None).is_err());
        let err = coerce(&RawValue::Integer(3), &ParameterType::Iri, None).unwrap_err();
        assert!(err.contains("integer"));
    }

    #[test]
    fn test_inferred_datatypes() {
        let cases = [
            (RawValue::from("x"), xsd::STRING),
            (RawValue::Integer(42), xsd::INTEGER),
            (RawValue::Float(1.5), xsd::DOUBLE),
            (RawValue::Boolean(true), xsd::BOOLEAN),
        ];
        for (value, datatype) in cases {
            let lit = literal(coerce(&value, &ParameterType::Literal(None), None).unwrap());
            assert_eq!(lit.datatype().as_str(), datatype);
        }
    }

    #[test]
    fn test_datetime_literal() {
        let when = DateTime::<FixedOffset>::parse_from_rfc3339("2024-03-01T12:00:00+02:00").unwrap();
        let lit = literal(coerce(&RawValue::DateTime(when), &ParameterType::Any, None).unwrap());
        assert_eq!(lit.datatype().as_str(), xsd::DATE_TIME);
        assert_eq!(lit.lexical(), "2024-03-01T12:00:00+02:00");
    }

    #[test]
    fn test_language_tag_applies_to_strings_only() {
        let lit = literal(coerce(&RawValue::from("chat"), &ParameterType::Literal(None), Some("fr")).unwrap());
        assert_eq!(lit.language(), Some("fr"));
        assert_eq!(lit.datatype().as_str(), rdf::LANG_STRING);

        let num = literal(coerce(&RawValue::Integer(1), &ParameterType::Literal(None), Some("fr")).unwrap());
        assert_eq!(num.language(), None);
    }

    #[test]
    fn test_explicit_datatype_overrides() {
        let lit = literal(coerce(&RawValue::from("17"), &dt(xsd::INTEGER), None).unwrap());
        assert_eq!(lit.datatype().as_str(), xsd::INTEGER);
        assert_eq!(lit.lexical(), "17");

        let lit = literal(coerce(&RawValue::Integer(5), &dt(xsd::DECIMAL), None).unwrap());
        assert_eq!(lit.datatype().as_str(), xsd::DECIMAL);

        let custom = literal(coerce(&RawValue::from("anything"), &dt("http://example.org/dt"), None).unwrap());
        assert_eq!(custom.datatype().as_str(), "http://example.org/dt");
    }

    #[test]
    fn test_explicit_datatype_checks_lexical_form() {
        assert!(coerce(&RawValue::from("abc"), &dt(xsd::INTEGER), None).is_err());
        assert!(coerce(&RawValue::Float(2.5), &dt(xsd::INTEGER), None).is_err());
        assert!(coerce(&RawValue::from("maybe"), &dt(xsd::BOOLEAN), None).is_err());
        assert!(coerce(&RawValue::from("yesterday"), &dt(xsd::DATE_TIME), None).is_err());
        assert!(coerce(&RawValue::from("99999999999"), &dt(xsd::INT), None).is_err());
    }

    #[test]
    fn test_null_and_list_rejected() {
        assert!(coerce(&RawValue::Null, &ParameterType::Any, None).is_err());
        let list = RawValue::from(vec!["a"]);
        assert!(coerce(&list, &ParameterType::Literal(None), None).is_err());
    }

    #[test]
    fn test_decimal_forms() {
        assert!(is_decimal("1.50"));
        assert!(is_decimal("-.5"));
        assert!(is_decimal("3"));
        assert!(!is_decimal("."));
        assert!(!is_decimal("1e3"));
    }
}
