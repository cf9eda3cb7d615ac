//! Sanitizing functions for text interpolated into Cypher.
//!
//! Only names (labels, property keys) and generated identifiers are ever
//! placed in statement text. Property values always travel as bound
//! parameters and never pass through here.
//!
//! Identifiers are emitted as backtick-quoted Cypher identifiers. A literal
//! backtick is doubled. The parser also decodes unicode escapes inside
//! backticks (`\u0060` closes the name), so backslashes are rejected along
//! with control characters. Everything else (quotes, `;`, braces,
//! parentheses, whitespace, comment markers, `$`) loses its meaning.
//!
//! Literals are escaped for use inside a quoted Cypher string: backslash,
//! both quote characters and the backtick get a backslash prefix, control
//! characters become `\uXXXX` escapes.

use std::fmt::Write;

use crate::error::ValidationError;

/// Quote a label or property name for direct interpolation.
pub fn escape_identifier(name: &str) -> Result<String, ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::InvalidIdentifier {
            name: name.to_string(),
            reason: "identifier is empty",
        });
    }
    if name.chars().any(char::is_control) {
        return Err(ValidationError::InvalidIdentifier {
            name: name.to_string(),
            reason: "identifier contains a control character",
        });
    }
    if name.contains('\\') {
        return Err(ValidationError::InvalidIdentifier {
            name: name.to_string(),
            reason: "identifier contains a backslash",
        });
    }

    let mut quoted = String::with_capacity(name.len() + 2);
    quoted.push('`');
    for c in name.chars() {
        if c == '`' {
            quoted.push('`');
        }
        quoted.push(c);
    }
    quoted.push('`');
    Ok(quoted)
}

/// Escape text for embedding inside a quoted string literal.
pub fn escape_literal(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' | '\'' | '"' | '`' => {
                escaped.push('\\');
                escaped.push(c);
            }
            c if c.is_control() => {
                // Writing to a String cannot fail.
                let _ = write!(escaped, "\\u{:04X}", c as u32);
            }
            c => escaped.push(c),
        }
    }
    escaped
}
