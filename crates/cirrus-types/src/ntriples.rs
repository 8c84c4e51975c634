//! N-Triples rendering and parsing of single terms.
//!
//! This is the canonical textual form dictionaries hash and persist. Only
//! the term productions are supported, not whole statements.
//!
//! [`parse_as`] accepts every string [`format`] can produce, so any term a
//! dictionary stored can be read back. IRIs, blank-node labels, language
//! tags and datatypes are taken verbatim; only the literal label is escaped.

use crate::error::TermError;
use crate::term::{Annotation, Literal, Term, TermKind};

/// Render a term in N-Triples syntax.
pub fn format(term: &Term) -> String {
    match term {
        Term::Resource(iri) => format!("<{iri}>"),
        Term::BNode(label) => format!("_:{label}"),
        Term::Literal(lit) => format_literal(lit),
    }
}

fn format_literal(lit: &Literal) -> String {
    let mut out = String::with_capacity(lit.label().len() + 2);
    out.push('"');
    escape_into(lit.label(), &mut out);
    out.push('"');
    match lit.annotation() {
        Annotation::Plain => {}
        Annotation::Language(lang) => {
            out.push('@');
            out.push_str(lang);
        }
        Annotation::Datatype(dt) => {
            out.push_str("^^<");
            out.push_str(dt);
            out.push('>');
        }
    }
    out
}

fn escape_into(label: &str, out: &mut String) {
    for c in label.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
}

/// Parse a term, inferring its kind from the leading character.
pub fn parse(text: &str) -> Result<Term, TermError> {
    let kind = match text.as_bytes().first() {
        Some(b'<') => TermKind::Resource,
        Some(b'_') => TermKind::BNode,
        Some(b'"') => TermKind::Literal,
        _ => {
            return Err(TermError::Malformed {
                kind: TermKind::Literal,
                text: text.to_string(),
                reason: "unrecognised leading character".into(),
            })
        }
    };
    parse_as(kind, text)
}

/// Parse a term that must be of `kind`.
pub fn parse_as(kind: TermKind, text: &str) -> Result<Term, TermError> {
    let malformed = |reason: &str| TermError::Malformed {
        kind,
        text: text.to_string(),
        reason: reason.to_string(),
    };
    match kind {
        TermKind::Resource => {
            let iri = text
                .strip_prefix('<')
                .and_then(|t| t.strip_suffix('>'))
                .ok_or_else(|| malformed("expected <iri>"))?;
            Ok(Term::Resource(iri.to_string()))
        }
        TermKind::BNode => {
            let label = text
                .strip_prefix("_:")
                .ok_or_else(|| malformed("expected _:label"))?;
            Ok(Term::BNode(label.to_string()))
        }
        TermKind::Literal => parse_literal(text).map(Term::Literal),
    }
}

fn parse_literal(text: &str) -> Result<Literal, TermError> {
    let malformed = |reason: &str| TermError::Malformed {
        kind: TermKind::Literal,
        text: text.to_string(),
        reason: reason.to_string(),
    };
    let body = text
        .strip_prefix('"')
        .ok_or_else(|| malformed("expected opening quote"))?;

    let close = closing_quote(body).ok_or_else(|| malformed("unterminated label"))?;
    let label = unescape(&body[..close])?;
    let rest = &body[close + 1..];

    if rest.is_empty() {
        return Ok(Literal::plain(label));
    }
    if let Some(lang) = rest.strip_prefix('@') {
        return Ok(Literal::with_language(label, lang));
    }
    if let Some(dt) = rest.strip_prefix("^^") {
        let iri = dt
            .strip_prefix('<')
            .and_then(|t| t.strip_suffix('>'))
            .ok_or_else(|| malformed("expected ^^<datatype>"))?;
        return Ok(Literal::typed(label, iri));
    }
    Err(malformed("unexpected text after label"))
}

/// Byte offset of the first unescaped `"` in `body`.
fn closing_quote(body: &str) -> Option<usize> {
    let mut escaped = false;
    for (i, b) in body.bytes().enumerate() {
        match b {
            _ if escaped => escaped = false,
            b'\\' => escaped = true,
            b'"' => return Some(i),
            _ => {}
        }
    }
    None
}

fn unescape(raw: &str) -> Result<String, TermError> {
    let invalid = || TermError::InvalidEscape(raw.to_string());
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next().ok_or_else(invalid)? {
            '\\' => out.push('\\'),
            '"' => out.push('"'),
            '\'' => out.push('\''),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'u' => out.push(hex_char(&mut chars, 4).ok_or_else(invalid)?),
            'U' => out.push(hex_char(&mut chars, 8).ok_or_else(invalid)?),
            _ => return Err(invalid()),
        }
    }
    Ok(out)
}

fn hex_char(chars: &mut std::str::Chars<'_>, digits: usize) -> Option<char> {
    let hex: String = chars.by_ref().take(digits).collect();
    if hex.len() != digits {
        return None;
    }
    u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32)
}
